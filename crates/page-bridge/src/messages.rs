//! Wire messages exchanged between the background coordinator and page contexts.

use palette_styler::Theme;
use serde::{Deserialize, Serialize};
use wander_core_types::SequenceId;

/// Background → page requests, keyed by `action` on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum PageRequest {
    #[serde(rename = "set-page-palette")]
    SetPagePalette { palette: Theme },
    #[serde(rename = "auto-explore")]
    AutoExplore {
        #[serde(default)]
        websites: Vec<String>,
    },
}

impl PageRequest {
    pub fn op(&self) -> &'static str {
        match self {
            PageRequest::SetPagePalette { .. } => "set-page-palette",
            PageRequest::AutoExplore { .. } => "auto-explore",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageReply {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Parameters of a `start_sequence` request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSequence {
    #[serde(default = "default_repetitions")]
    pub repetitions: i64,
    #[serde(default)]
    pub auto_explore: bool,
    #[serde(default)]
    pub websites: Vec<String>,
    #[serde(default, alias = "useTrendingCandidates")]
    pub use_trending: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

fn default_repetitions() -> i64 {
    1
}

/// Page/popup → background requests, keyed by `type` on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackgroundRequest {
    StartSequence(StartSequence),
    AutoExploreDone,
    Log { message: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartAck {
    pub ok: bool,
    pub sequence_id: SequenceId,
    pub used_trending: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExploreDoneAck {
    pub ok: bool,
    pub continued: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BackgroundReply {
    Started(StartAck),
    ExploreDone(ExploreDoneAck),
    Logged { ok: bool },
}

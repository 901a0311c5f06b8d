//! Auto-explore responder that runs inside a page: picks one visible
//! interactive element at random, clicks it and reports completion.
//!
//! The [`ReloadWatchdog`] is separate from the probe. Page hosts register it
//! as a [`ClickListener`] so it sees every click on the page.

pub mod api;
pub mod errors;
pub mod model;
pub mod policy;
pub mod ports;
pub mod select;
pub mod watchdog;

mod runner;

pub use api::{ClickProbe, ClickProbeBuilder};
pub use errors::ProbeError;
pub use model::{ElementSnapshot, ExploreReport, MarkerId, Rect, ReloadVerdict};
pub use policy::ProbeTimings;
pub use ports::{ClickListener, CompletionPort, PagePort};
pub use runner::ExplorePlan;
pub use watchdog::{reload_threshold, ReloadWatchdog};

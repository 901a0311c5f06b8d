use std::sync::Arc;

use async_trait::async_trait;

/// External source of candidate URLs (for example a trending feed).
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// `None` or an empty list means "use the caller's websites".
    async fn fetch_candidate_urls(&self) -> Option<Vec<String>>;
}

#[async_trait]
impl<T> CandidateSource for Arc<T>
where
    T: CandidateSource + ?Sized,
{
    async fn fetch_candidate_urls(&self) -> Option<Vec<String>> {
        (**self).fetch_candidate_urls().await
    }
}

/// Fixed list, handy for tests and offline runs.
#[derive(Clone, Debug, Default)]
pub struct StaticCandidates(pub Vec<String>);

#[async_trait]
impl CandidateSource for StaticCandidates {
    async fn fetch_candidate_urls(&self) -> Option<Vec<String>> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.clone())
        }
    }
}

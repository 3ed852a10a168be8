use futures::future::LocalBoxFuture;

use crate::domain::entities::page::NomenclaturePage;
use crate::domain::entities::query::PageRequest;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

// Futures are `!Send`: on the web target UI tasks run on the browser's only thread.
pub trait NomenclatureSource: Send + Sync {
    fn fetch_page(
        &self,
        request: PageRequest,
    ) -> LocalBoxFuture<'_, Result<NomenclaturePage, SourceError>>;
}

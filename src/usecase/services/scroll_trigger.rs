use serde::Deserialize;

use crate::usecase::services::loader::InfiniteLoader;

pub const FETCH_THRESHOLD: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollMetrics {
    pub scroll_height: f64,
    pub scroll_top: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn remaining(&self) -> f64 {
        self.scroll_height - self.scroll_top - self.client_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTrigger {
    pub view_height: f64,
    pub threshold: f64,
}

impl ScrollTrigger {
    pub fn new(view_height: f64) -> Self {
        Self {
            view_height,
            threshold: FETCH_THRESHOLD,
        }
    }

    pub fn should_fetch(
        &self,
        metrics: &ScrollMetrics,
        is_fetching: bool,
        total_fetched: usize,
        total_row_count: u64,
    ) -> bool {
        if is_fetching || (total_fetched as u64) >= total_row_count {
            return false;
        }
        metrics.remaining() < self.view_height - self.threshold
    }

    pub fn should_fetch_for(&self, metrics: &ScrollMetrics, loader: &InfiniteLoader) -> bool {
        loader.has_more()
            && self.should_fetch(
                metrics,
                loader.is_fetching(),
                loader.total_fetched(),
                loader.total_row_count(),
            )
    }
}

use std::collections::BTreeSet;
use std::sync::Arc;

use dioxus::prelude::{use_signal, Signal};

use crate::config::AppConfig;
use crate::domain::entities::query::QueryState;
use crate::usecase::services::loader::InfiniteLoader;
use crate::usecase::services::query_service::NomenclatureQueryService;
use crate::usecase::services::scroll_trigger::ScrollTrigger;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSettings {
    pub page_size: usize,
    pub view_height: f64,
    pub fetch_threshold: f64,
    pub row_height: f64,
    pub overscan: usize,
}

impl From<&AppConfig> for TableSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            page_size: config.page_size,
            view_height: config.view_height,
            fetch_threshold: config.fetch_threshold,
            row_height: config.row_height,
            overscan: config.overscan,
        }
    }
}

impl TableSettings {
    pub fn trigger(&self, view_height: f64) -> ScrollTrigger {
        ScrollTrigger {
            threshold: self.fetch_threshold,
            ..ScrollTrigger::new(view_height)
        }
    }
}

// Props need `PartialEq`; handles are equal when they share the service.
#[derive(Clone)]
pub struct QueryServiceHandle(pub Arc<NomenclatureQueryService>);

impl PartialEq for QueryServiceHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Clone, Copy)]
pub struct TableState {
    pub query: Signal<QueryState>,
    pub loader: Signal<InfiniteLoader>,
    pub scroll_top: Signal<f64>,
    pub view_height: Signal<f64>,
    pub selected_ids: Signal<BTreeSet<String>>,
    pub show_filters: Signal<bool>,
}

impl TableState {
    pub fn new(settings: TableSettings) -> Self {
        Self {
            query: use_signal(QueryState::default),
            loader: use_signal(move || InfiniteLoader::new(settings.page_size)),
            scroll_top: use_signal(|| 0.0_f64),
            view_height: use_signal(move || settings.view_height),
            selected_ids: use_signal(BTreeSet::<String>::new),
            show_filters: use_signal(|| false),
        }
    }
}

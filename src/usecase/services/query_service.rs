use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::page::NomenclaturePage;
use crate::domain::entities::query::PageRequest;
use crate::usecase::ports::source::{NomenclatureSource, SourceError};

pub struct NomenclatureQueryService {
    source: Arc<dyn NomenclatureSource>,
}

impl NomenclatureQueryService {
    pub fn new(source: Arc<dyn NomenclatureSource>) -> Self {
        Self { source }
    }

    pub async fn fetch_page(&self, request: PageRequest) -> Result<NomenclaturePage, SourceError> {
        let offset = request.offset();
        let page_index = request.page_index;
        debug!(
            page_index,
            offset,
            filters = request.query.filters.len(),
            sorting = request.query.sorting.len(),
            global_filter = request.query.global_filter.as_deref().unwrap_or(""),
            "requesting nomenclature page"
        );

        match self.source.fetch_page(request).await {
            Ok(page) => {
                debug!(
                    page_index,
                    rows = page.data.len(),
                    total_row_count = page.meta.total_row_count,
                    "nomenclature page loaded"
                );
                Ok(page)
            }
            Err(err) => {
                warn!(page_index, offset, error = %err, "nomenclature page failed");
                Err(err)
            }
        }
    }
}

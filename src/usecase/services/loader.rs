use tracing::{debug, info};

use crate::domain::entities::nomenclature::Nomenclature;
use crate::domain::entities::page::{NomenclaturePage, PAGE_SIZE};
use crate::domain::entities::query::{PageRequest, QueryState};
use crate::usecase::ports::source::SourceError;

/// Carries the query generation it was issued under, so a response that
/// outlives a query change can be recognised and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket {
    generation: u64,
    request: PageRequest,
}

impl PageTicket {
    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Appended { rows: usize },
    Failed,
    Stale,
}

/// Holds exactly the pages `0..k` fetched under the active query state.
#[derive(Debug, Clone, PartialEq)]
pub struct InfiniteLoader {
    page_size: usize,
    query: QueryState,
    generation: u64,
    pages: Vec<NomenclaturePage>,
    in_flight: Option<usize>,
    error: Option<String>,
}

impl Default for InfiniteLoader {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl InfiniteLoader {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            query: QueryState::default(),
            generation: 0,
            pages: Vec::new(),
            in_flight: None,
            error: None,
        }
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    // A fetch still running for the old query is abandoned, not cancelled.
    pub fn set_query(&mut self, query: QueryState) -> bool {
        if self.query == query {
            return false;
        }
        info!(
            discarded_pages = self.pages.len(),
            abandoned_fetch = self.in_flight.is_some(),
            "query changed, restarting from the first page"
        );
        self.query = query;
        self.generation += 1;
        self.pages.clear();
        self.in_flight = None;
        self.error = None;
        true
    }

    pub fn begin_next_page(&mut self) -> Option<PageTicket> {
        if self.in_flight.is_some() {
            return None;
        }
        if !self.pages.is_empty() && !self.has_more() {
            return None;
        }

        let page_index = self.pages.len();
        self.in_flight = Some(page_index);
        Some(PageTicket {
            generation: self.generation,
            request: PageRequest {
                query: self.query.clone(),
                page_index,
                page_size: self.page_size,
            },
        })
    }

    pub fn complete(
        &mut self,
        ticket: PageTicket,
        result: Result<NomenclaturePage, SourceError>,
    ) -> Completion {
        if ticket.generation != self.generation
            || self.in_flight != Some(ticket.request.page_index)
        {
            debug!(
                ticket_generation = ticket.generation,
                generation = self.generation,
                page_index = ticket.request.page_index,
                "dropping response for an abandoned request"
            );
            return Completion::Stale;
        }

        self.in_flight = None;
        match result {
            Ok(page) => {
                let rows = page.data.len();
                self.pages.push(page);
                self.error = None;
                Completion::Appended { rows }
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Completion::Failed
            }
        }
    }

    pub fn records(&self) -> impl Iterator<Item = &Nomenclature> + '_ {
        self.pages.iter().flat_map(|page| page.data.iter())
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn total_fetched(&self) -> usize {
        self.pages.iter().map(|page| page.data.len()).sum()
    }

    pub fn total_row_count(&self) -> u64 {
        self.pages
            .first()
            .map(|page| page.meta.total_row_count)
            .unwrap_or(0)
    }

    // An empty page ends the result set even when the first page promised more.
    pub fn has_more(&self) -> bool {
        let exhausted = self.pages.last().is_some_and(|page| page.data.is_empty());
        !exhausted && (self.total_fetched() as u64) < self.total_row_count()
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.is_fetching() && self.pages.is_empty()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::page::PageMeta;

    fn record(id: usize) -> Nomenclature {
        Nomenclature {
            id: format!("id-{id}"),
            nmid: id as i64,
            brand: "Acme".to_string(),
            color: "black".to_string(),
            title: format!("Item {id}"),
            vendor_code: format!("VC-{id}"),
            category: "Shoes".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            deleted_at: None,
            supplier: "Acme LLC".to_string(),
            kind: "wb".to_string(),
        }
    }

    fn page(range: std::ops::Range<usize>, total: u64) -> NomenclaturePage {
        NomenclaturePage {
            data: range.map(record).collect(),
            meta: PageMeta {
                total_row_count: total,
            },
        }
    }

    #[test]
    fn first_ticket_targets_offset_zero() {
        let mut loader = InfiniteLoader::new(25);

        let ticket = loader.begin_next_page().expect("first page should be requested");

        assert_eq!(ticket.request().offset(), 0);
        assert!(loader.is_loading());
        assert!(loader.begin_next_page().is_none(), "one fetch at a time");
    }

    #[test]
    fn total_row_count_comes_from_first_page() {
        let mut loader = InfiniteLoader::new(2);
        let first = loader.begin_next_page().expect("first ticket");
        loader.complete(first, Ok(page(0..2, 5)));
        let second = loader.begin_next_page().expect("second ticket");
        loader.complete(second, Ok(page(2..4, 99)));

        assert_eq!(loader.total_row_count(), 5);
        assert_eq!(loader.total_fetched(), 4);
        assert!(loader.has_more());
    }

    #[test]
    fn no_ticket_once_everything_is_loaded() {
        let mut loader = InfiniteLoader::new(25);
        let ticket = loader.begin_next_page().expect("first ticket");
        loader.complete(ticket, Ok(page(0..10, 10)));

        assert!(!loader.has_more());
        assert!(loader.begin_next_page().is_none());
    }

    #[test]
    fn empty_page_exhausts_the_loader() {
        let mut loader = InfiniteLoader::new(25);
        let first = loader.begin_next_page().expect("first ticket");
        loader.complete(first, Ok(page(0..25, 30)));
        assert!(loader.has_more());

        let second = loader.begin_next_page().expect("second ticket");
        loader.complete(second, Ok(page(0..0, 30)));

        assert!(!loader.has_more());
        assert!(loader.begin_next_page().is_none());
        assert_eq!(loader.total_fetched(), 25);
    }

    #[test]
    fn ticket_from_previous_generation_is_stale() {
        let mut loader = InfiniteLoader::new(25);
        let ticket = loader.begin_next_page().expect("first ticket");
        let mut query = QueryState::default();
        query.set_global_filter("boots");
        assert!(loader.set_query(query));

        let completion = loader.complete(ticket, Ok(page(0..25, 100)));

        assert_eq!(completion, Completion::Stale);
        assert_eq!(loader.total_fetched(), 0);
        assert!(!loader.is_fetching());
    }

    #[test]
    fn setting_the_same_query_keeps_pages() {
        let mut loader = InfiniteLoader::new(25);
        let ticket = loader.begin_next_page().expect("first ticket");
        loader.complete(ticket, Ok(page(0..25, 100)));

        assert!(!loader.set_query(QueryState::default()));
        assert_eq!(loader.page_count(), 1);
        let next = loader.begin_next_page().expect("second page ticket");
        assert_eq!(next.generation(), 0);
        assert_eq!(next.request().page_index, 1);
    }

    #[test]
    fn success_after_failure_clears_error() {
        let mut loader = InfiniteLoader::new(25);
        let ticket = loader.begin_next_page().expect("first ticket");
        loader.complete(ticket, Err(SourceError::Status(502)));
        assert!(loader.is_error());
        assert_eq!(
            loader.last_error(),
            Some("server responded with status 502")
        );

        let retry = loader.begin_next_page().expect("retry ticket");
        assert_eq!(retry.request().page_index, 0);
        loader.complete(retry, Ok(page(0..25, 30)));

        assert!(!loader.is_error());
        assert_eq!(loader.total_fetched(), 25);
    }
}

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use reqwest::Url;

use crate::domain::entities::page::NomenclaturePage;
use crate::domain::entities::query::PageRequest;
use crate::usecase::ports::source::{NomenclatureSource, SourceError};

const LIST_PATH: &str = "nm/list";

pub struct HttpNomenclatureSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpNomenclatureSource {
    pub fn new(base_url: &str) -> Result<Self, SourceError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        list_url(&base_url)?;
        Ok(Self {
            base_url,
            client: reqwest::Client::new(),
        })
    }

    async fn get_page(&self, request: PageRequest) -> Result<NomenclaturePage, SourceError> {
        let url = page_url(&self.base_url, &request)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        decode_page(&body)
    }
}

impl NomenclatureSource for HttpNomenclatureSource {
    fn fetch_page(
        &self,
        request: PageRequest,
    ) -> LocalBoxFuture<'_, Result<NomenclaturePage, SourceError>> {
        self.get_page(request).boxed_local()
    }
}

fn list_url(base_url: &str) -> Result<Url, SourceError> {
    Url::parse(&format!("{base_url}/{LIST_PATH}"))
        .map_err(|err| SourceError::InvalidRequest(format!("{base_url}: {err}")))
}

/// `{base}/nm/list?start=..&size=..&filters=[..]&globalFilter=..&sorting=[..]`
pub fn page_url(base_url: &str, request: &PageRequest) -> Result<Url, SourceError> {
    let mut url = list_url(base_url)?;
    let filters = serde_json::to_string(&request.query.filters)
        .map_err(|err| SourceError::InvalidRequest(err.to_string()))?;
    let sorting = serde_json::to_string(&request.query.sorting)
        .map_err(|err| SourceError::InvalidRequest(err.to_string()))?;

    url.query_pairs_mut()
        .append_pair("start", &request.offset().to_string())
        .append_pair("size", &request.page_size.to_string())
        .append_pair("filters", &filters)
        .append_pair(
            "globalFilter",
            request.query.global_filter.as_deref().unwrap_or(""),
        )
        .append_pair("sorting", &sorting);
    Ok(url)
}

pub fn decode_page(body: &[u8]) -> Result<NomenclaturePage, SourceError> {
    Ok(serde_json::from_slice(body)?)
}

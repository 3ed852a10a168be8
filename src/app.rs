use std::sync::Arc;

use dioxus::prelude::*;
use tracing::error;

use crate::config::AppConfig;
use crate::infra::http::client::HttpNomenclatureSource;
use crate::ui::nomenclature_page::NomenclaturePage;
use crate::ui::state::app_state::{QueryServiceHandle, TableSettings};
use crate::usecase::services::query_service::NomenclatureQueryService;

fn build_query_service(config: &AppConfig) -> Result<Arc<NomenclatureQueryService>, String> {
    let source = HttpNomenclatureSource::new(&config.api_url).map_err(|err| err.to_string())?;
    Ok(Arc::new(NomenclatureQueryService::new(Arc::new(source))))
}

#[component]
pub fn App() -> Element {
    let config = use_context::<AppConfig>();
    let settings = TableSettings::from(&config);
    let api_url = config.api_url.clone();
    let service = use_hook(move || build_query_service(&config));

    match service {
        Ok(service) => rsx! {
            NomenclaturePage { settings, service: QueryServiceHandle(service) }
        },
        Err(err) => {
            error!(api_url = %api_url, error = %err, "invalid nomenclature API url");
            rsx! {
                div {
                    p { "Неверный адрес API ({api_url}): {err}" }
                }
            }
        }
    }
}

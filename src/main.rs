mod app;
mod config;
mod logging;

mod domain {
    pub mod entities {
        pub mod nomenclature;
        pub mod page;
        pub mod query;
    }
}

mod usecase {
    pub mod ports {
        pub mod source;
    }
    pub mod services {
        pub mod loader;
        pub mod query_service;
        pub mod scroll_trigger;
        pub mod virtual_rows;
    }
}

mod infra {
    pub mod http {
        pub mod client;
    }
}

mod ui {
    pub mod nomenclature_page;
    pub mod state {
        pub mod app_state;
    }
}


use crate::app::App;
use crate::config::AppConfig;

fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("falling back to default configuration: {err:#}");
            AppConfig::default()
        }
    };

    if let Err(err) = logging::init(&config.log_filter) {
        eprintln!("logging disabled: {err:#}");
    }
    tracing::info!(api_url = %config.api_url, page_size = config.page_size, "starting");

    launch(config);
}

#[cfg(feature = "desktop")]
fn launch(config: AppConfig) {
    let webview_data_dir = config::default_webview_data_dir()
        .expect("should resolve and create WebView2 data directory");

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(
                    dioxus::desktop::WindowBuilder::new().with_title("Номенклатура"),
                )
                .with_data_directory(webview_data_dir),
        )
        .with_context(config)
        .launch(App);
}

#[cfg(not(feature = "desktop"))]
fn launch(config: AppConfig) {
    dioxus::LaunchBuilder::new().with_context(config).launch(App);
}

use std::sync::Arc;

use dioxus::prelude::*;
use tracing::{debug, warn};

use crate::domain::entities::nomenclature::{Nomenclature, NomenclatureColumn};
use crate::domain::entities::query::{QueryState, SortDirection};
use crate::ui::state::app_state::{QueryServiceHandle, TableSettings, TableState};
use crate::usecase::services::loader::{Completion, InfiniteLoader, PageTicket};
use crate::usecase::services::query_service::NomenclatureQueryService;
use crate::usecase::services::scroll_trigger::ScrollMetrics;
use crate::usecase::services::virtual_rows::visible_window;

const PAGE_ROOT_ID: &str = "nomenclature-page";
const TOOLBAR_ID: &str = "table-toolbar";
const TABLE_CONTAINER_ID: &str = "table-container";
const COLUMN_COUNT: usize = NomenclatureColumn::ALL.len() + 1;

const CELL_STYLE: &str = "border-bottom: 1px solid #e0e0e0; padding: 6px 8px; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; max-width: 280px;";
const HEADER_CELL_STYLE: &str = "position: sticky; top: 0; z-index: 2; background: #fafafa; border-bottom: 2px solid #ccc; padding: 8px; text-align: left; white-space: nowrap; cursor: pointer; user-select: none;";
const FILTER_CELL_STYLE: &str = "position: sticky; top: 37px; z-index: 2; background: #fafafa; border-bottom: 1px solid #ccc; padding: 4px 8px;";

fn scroll_metrics_script() -> String {
    format!(
        r#"const el = document.getElementById("{TABLE_CONTAINER_ID}");
if (!el) {{ return null; }}
return {{ scrollHeight: el.scrollHeight, scrollTop: el.scrollTop, clientHeight: el.clientHeight }};"#
    )
}

fn scroll_to_top_script() -> String {
    format!(
        r#"const el = document.getElementById("{TABLE_CONTAINER_ID}");
if (el) {{ el.scrollTop = 0; }}
return null;"#
    )
}

// Page height minus the toolbar.
fn view_height_script() -> String {
    format!(
        r#"const root = document.getElementById("{PAGE_ROOT_ID}");
const toolbar = document.getElementById("{TOOLBAR_ID}");
if (!root || !toolbar) {{ return null; }}
return root.offsetHeight - toolbar.offsetHeight;"#
    )
}

fn copy_script(value: &str) -> Option<String> {
    let literal = serde_json::to_string(value).ok()?;
    Some(format!(
        "await navigator.clipboard.writeText({literal}); return null;"
    ))
}

fn sort_indicator(direction: Option<SortDirection>) -> &'static str {
    match direction {
        Some(SortDirection::Asc) => " ▲",
        Some(SortDirection::Desc) => " ▼",
        None => "",
    }
}

async fn run_script(script: String, what: &'static str) {
    if let Err(err) = document::eval(&script).join::<serde_json::Value>().await {
        warn!(error = ?err, what, "script failed");
    }
}

async fn read_scroll_metrics() -> Option<ScrollMetrics> {
    match document::eval(&scroll_metrics_script())
        .join::<Option<ScrollMetrics>>()
        .await
    {
        Ok(metrics) => metrics,
        Err(err) => {
            warn!(error = ?err, "failed to read table scroll position");
            None
        }
    }
}

#[derive(Debug)]
struct QueryApplied {
    scroll_to_top: bool,
    ticket: Option<PageTicket>,
}

fn apply_query(loader: &mut InfiniteLoader, next: QueryState) -> QueryApplied {
    let changed = loader.set_query(next);
    let ticket = if changed || loader.page_count() == 0 {
        loader.begin_next_page()
    } else {
        None
    };
    QueryApplied {
        scroll_to_top: changed,
        ticket,
    }
}

fn request_next_page(mut loader: Signal<InfiniteLoader>, service: Arc<NomenclatureQueryService>) {
    let ticket = loader.write().begin_next_page();
    if let Some(ticket) = ticket {
        spawn_fetch(loader, service, ticket);
    }
}

fn spawn_fetch(
    mut loader: Signal<InfiniteLoader>,
    service: Arc<NomenclatureQueryService>,
    ticket: PageTicket,
) {
    let generation = ticket.generation();
    let page_index = ticket.request().page_index;
    spawn(async move {
        let result = service.fetch_page(ticket.request().clone()).await;
        match loader.write().complete(ticket, result) {
            Completion::Appended { rows } => debug!(generation, page_index, rows, "page appended"),
            Completion::Failed => debug!(generation, page_index, "page left the table unchanged"),
            Completion::Stale => debug!(generation, page_index, "page belonged to an older query"),
        }
    });
}

fn copy_to_clipboard(value: String) {
    let Some(script) = copy_script(&value) else {
        return;
    };
    spawn(run_script(script, "copy to clipboard"));
}

#[component]
pub fn NomenclaturePage(settings: TableSettings, service: QueryServiceHandle) -> Element {
    let service = service.0;
    let TableState {
        mut query,
        mut loader,
        mut scroll_top,
        mut view_height,
        mut selected_ids,
        mut show_filters,
    } = TableState::new(settings);

    // Any change of filters, search or sorting starts over from the first row.
    let service_for_query = service.clone();
    use_effect(move || {
        let next = query();
        let applied = apply_query(&mut loader.write(), next);
        if applied.scroll_to_top {
            scroll_top.set(0.0);
            spawn(run_script(scroll_to_top_script(), "scroll to top"));
        }
        if let Some(ticket) = applied.ticket {
            spawn_fetch(loader, service_for_query.clone(), ticket);
        }
    });

    // A page that does not fill the view never produces a scroll event.
    let service_for_arrival = service.clone();
    use_effect(move || {
        let fetched = loader.read().total_fetched();
        let current_view_height = view_height();
        let service = service_for_arrival.clone();
        spawn(async move {
            let Some(metrics) = read_scroll_metrics().await else {
                return;
            };
            let trigger = settings.trigger(current_view_height);
            if trigger.should_fetch_for(&metrics, &loader.peek()) {
                debug!(fetched, "table does not fill its view, loading more");
                request_next_page(loader, service);
            }
        });
    });

    use_effect(move || {
        spawn(async move {
            match document::eval(&view_height_script())
                .join::<Option<f64>>()
                .await
            {
                Ok(Some(height)) if height > 0.0 => view_height.set(height),
                Ok(_) => {}
                Err(err) => warn!(error = ?err, "failed to measure table height"),
            }
        });
    });

    let service_for_scroll = service.clone();
    let on_scroll = move |event: Event<ScrollData>| {
        let metrics = ScrollMetrics {
            scroll_height: event.scroll_height() as f64,
            scroll_top: event.scroll_top() as f64,
            client_height: event.client_height() as f64,
        };
        scroll_top.set(metrics.scroll_top);
        let trigger = settings.trigger(*view_height.peek());
        if trigger.should_fetch_for(&metrics, &loader.peek()) {
            request_next_page(loader, service_for_scroll.clone());
        }
    };

    let current_query = query();
    let height = view_height();
    let snapshot = loader.read();
    let total_fetched = snapshot.total_fetched();
    let total_row_count = snapshot.total_row_count();
    let is_fetching = snapshot.is_fetching();
    let is_loading = snapshot.is_loading();
    let show_error_banner = snapshot.is_error();
    let error_message = snapshot.last_error().unwrap_or_default().to_string();
    let window = visible_window(
        scroll_top(),
        height,
        settings.row_height,
        settings.overscan,
        total_fetched,
    );
    let visible_rows: Vec<Nomenclature> = snapshot
        .records()
        .skip(window.start)
        .take(window.len())
        .cloned()
        .collect();
    let loaded_ids: Vec<String> = snapshot.records().map(|record| record.id.clone()).collect();
    drop(snapshot);

    let selected_snapshot = selected_ids();
    let selected_count = selected_snapshot.len();
    let all_selected =
        !loaded_ids.is_empty() && loaded_ids.iter().all(|id| selected_snapshot.contains(id));
    let global_filter_value = current_query.global_filter.clone().unwrap_or_default();
    let query_is_default = current_query == QueryState::default();
    let row_height = settings.row_height;

    rsx! {
        div {
            id: PAGE_ROOT_ID,
            style: "font-family: 'Roboto', sans-serif; padding: 12px; background: #fff; height: 100vh; box-sizing: border-box; display: flex; flex-direction: column;",
            div {
                id: TOOLBAR_ID,
                style: "display: flex; gap: 8px; align-items: center; padding: 8px 0;",
                input {
                    placeholder: "Поиск",
                    value: global_filter_value,
                    oninput: move |event| {
                        let mut next = query();
                        if next.set_global_filter(&event.value()) {
                            query.set(next);
                        }
                    },
                }
                button {
                    onclick: move |_| show_filters.set(!show_filters()),
                    if show_filters() { "Скрыть фильтры" } else { "Фильтры" }
                }
                button {
                    disabled: query_is_default,
                    onclick: move |_| {
                        let mut next = query();
                        if next.clear() {
                            query.set(next);
                        }
                    },
                    "Сбросить"
                }
                if selected_count > 0 {
                    span { style: "margin-left: auto; color: #555;", "Выбрано: {selected_count}" }
                }
            }

            if show_error_banner {
                div {
                    style: "background: #fdecea; color: #b71c1c; border: 1px solid #f5c2c0; border-radius: 4px; padding: 8px 12px; margin-bottom: 8px;",
                    "Ошибка загрузки данных"
                    span { style: "color: #7f2a2a; margin-left: 8px; font-size: 12px;", "{error_message}" }
                }
            }

            div {
                style: "height: 4px; margin-bottom: 4px;",
                if is_fetching {
                    div { style: "height: 100%; width: 100%; background: linear-gradient(90deg, #90caf9, #1976d2, #90caf9);" }
                }
            }

            div {
                id: TABLE_CONTAINER_ID,
                style: "max-height: {height}px; overflow: auto; border: 1px solid #e0e0e0; border-radius: 4px;",
                onscroll: on_scroll,
                table { style: "border-collapse: collapse; width: 100%; background: #fff; font-size: 14px;",
                    thead {
                        tr {
                            th { style: "{HEADER_CELL_STYLE} width: 32px;",
                                input {
                                    r#type: "checkbox",
                                    checked: all_selected,
                                    onclick: move |_| {
                                        let mut ids = selected_ids.write();
                                        if all_selected {
                                            ids.clear();
                                        } else {
                                            ids.extend(loaded_ids.iter().cloned());
                                        }
                                    }
                                }
                            }
                            {NomenclatureColumn::ALL.into_iter().map(|column| {
                                let header = column.header();
                                let indicator = sort_indicator(current_query.sort_direction(column.id()));
                                rsx!(
                                    th {
                                        style: HEADER_CELL_STYLE,
                                        title: "Shift+клик: сортировка по нескольким столбцам",
                                        onclick: move |event: MouseEvent| {
                                            let multi = event.modifiers().contains(Modifiers::SHIFT);
                                            let mut next = query();
                                            next.cycle_sort(column.id(), multi);
                                            query.set(next);
                                        },
                                        "{header}{indicator}"
                                    }
                                )
                            })}
                        }
                        if show_filters() {
                            tr {
                                th { style: FILTER_CELL_STYLE }
                                {NomenclatureColumn::ALL.into_iter().map(|column| {
                                    let value = current_query
                                        .column_filter(column.id())
                                        .unwrap_or_default()
                                        .to_string();
                                    let placeholder = format!("Фильтр: {}", column.header());
                                    rsx!(
                                        th { style: FILTER_CELL_STYLE,
                                            input {
                                                style: "width: 100%; box-sizing: border-box;",
                                                placeholder: placeholder,
                                                value: value,
                                                oninput: move |event| {
                                                    let mut next = query();
                                                    if next.set_column_filter(column.id(), &event.value()) {
                                                        query.set(next);
                                                    }
                                                },
                                            }
                                        }
                                    )
                                })}
                            }
                        }
                    }
                    tbody {
                        if is_loading {
                            tr {
                                td { colspan: "{COLUMN_COUNT}", style: "padding: 16px; text-align: center; color: #777;", "Загрузка..." }
                            }
                        }
                        if !is_fetching && total_fetched == 0 && !query_is_default {
                            tr {
                                td { colspan: "{COLUMN_COUNT}", style: "padding: 16px; text-align: center; color: #777;", "Ничего не найдено" }
                            }
                        }
                        if window.padding_top > 0.0 {
                            tr { style: "height: {window.padding_top}px;" }
                        }
                        {visible_rows.into_iter().map(|record| {
                            let row_key = record.id.clone();
                            let record_id = record.id.clone();
                            let checked = selected_snapshot.contains(&record.id);
                            let row_style = if record.is_deleted() {
                                "color: #999; text-decoration: line-through;"
                            } else if checked {
                                "background: #eef4ff;"
                            } else {
                                ""
                            };
                            let cells: Vec<(NomenclatureColumn, String)> = NomenclatureColumn::ALL
                                .into_iter()
                                .map(|column| (column, record.cell(column)))
                                .collect();
                            rsx!(
                                tr {
                                    key: "{row_key}",
                                    style: "height: {row_height}px; {row_style}",
                                    td { style: CELL_STYLE,
                                        input {
                                            r#type: "checkbox",
                                            checked: checked,
                                            onclick: move |_| {
                                                let mut ids = selected_ids.write();
                                                if !ids.remove(&record_id) {
                                                    ids.insert(record_id.clone());
                                                }
                                            }
                                        }
                                    }
                                    {cells.into_iter().map(|(column, value)| {
                                        if column.click_to_copy() {
                                            let copy_value = value.clone();
                                            rsx!(
                                                td {
                                                    style: "{CELL_STYLE} cursor: copy;",
                                                    title: "Нажмите, чтобы скопировать",
                                                    onclick: move |_| copy_to_clipboard(copy_value.clone()),
                                                    "{value}"
                                                }
                                            )
                                        } else {
                                            rsx!( td { style: CELL_STYLE, "{value}" } )
                                        }
                                    })}
                                }
                            )
                        })}
                        if window.padding_bottom > 0.0 {
                            tr { style: "height: {window.padding_bottom}px;" }
                        }
                    }
                }
            }

            div { style: "padding: 6px 0; color: #555; font-size: 13px;",
                "Загружено {total_fetched} из {total_row_count}"
            }
        }
    }
}

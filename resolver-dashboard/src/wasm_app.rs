use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Element, HtmlInputElement, HtmlTableRowElement, HtmlTableSectionElement};

use crate::view::{
    fqdn_style_rule, network_filter_id, parse_snapshot, Column, Dashboard, Layout, LayoutKind,
    PollPolicy, PollSchedule, RenderPass, RenderedRow, Snapshot, SortMode, SummaryEntry,
    ToggleEffect, ToggleId, STATIC_TOGGLE_IDS,
};

const STATUS_URL_META: &str = "status-url";
const LAYOUT_META: &str = "dashboard-layout";
const POLL_INTERVAL_META: &str = "poll-interval-ms";
const POLL_RETRY_META: &str = "poll-retry-ms";
const POLL_MAX_RETRY_META: &str = "poll-max-retry-ms";

struct AppState {
    document: Document,
    dashboard: Dashboard,
    table_body: Option<HtmlTableSectionElement>,
    head_row: Option<Element>,
    summary_row: Option<Element>,
    fqdn_style: Option<Element>,
    status_el: Option<Element>,
    status_url: String,
    row_by_uid: HashMap<String, HtmlTableRowElement>,
    summary_by_network: HashMap<String, Element>,
    schedule: PollSchedule,
    poll_timer: Option<Timeout>,
    toggle_listener: Option<Function>,
}

impl AppState {
    fn new(document: Document) -> Self {
        let layout = resolve_meta(&document, LAYOUT_META)
            .and_then(|value| LayoutKind::parse(&value))
            .map(Layout::for_kind)
            .unwrap_or_else(Layout::status);
        let status_url = resolve_meta(&document, STATUS_URL_META)
            .unwrap_or_else(|| layout.json_path.to_string());
        let defaults = PollPolicy::default();
        let policy = PollPolicy {
            interval_ms: resolve_millis(&document, POLL_INTERVAL_META)
                .unwrap_or(defaults.interval_ms),
            retry_ms: resolve_millis(&document, POLL_RETRY_META).unwrap_or(defaults.retry_ms),
            max_retry_ms: resolve_millis(&document, POLL_MAX_RETRY_META)
                .unwrap_or(defaults.max_retry_ms),
        };

        let table_body = document
            .get_element_by_id("nodes")
            .and_then(|el| el.dyn_into::<HtmlTableSectionElement>().ok());
        let head_row = document
            .query_selector("#nodes-table thead tr")
            .ok()
            .flatten();
        let summary_row = document.get_element_by_id("status");
        let fqdn_style = document.get_element_by_id("fqdn-style");
        let status_el = document.get_element_by_id("feed-status");

        Self {
            document,
            dashboard: Dashboard::new(layout),
            table_body,
            head_row,
            summary_row,
            fqdn_style,
            status_el,
            status_url,
            row_by_uid: HashMap::new(),
            summary_by_network: HashMap::new(),
            schedule: PollSchedule::new(policy),
            poll_timer: None,
            toggle_listener: None,
        }
    }
}

fn window() -> web_sys::Window {
    web_sys::window().expect("window")
}

fn resolve_meta(document: &Document, name: &str) -> Option<String> {
    let meta = document
        .query_selector(&format!("meta[name=\"{}\"]", name))
        .ok()
        .flatten()?;
    let value = meta.get_attribute("content")?;
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.starts_with("{{") {
        return None;
    }
    Some(trimmed.to_string())
}

fn resolve_millis(document: &Document, name: &str) -> Option<u32> {
    resolve_meta(document, name)
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| *value > 0)
}

fn read_initial_payload(document: &Document) -> Option<Snapshot> {
    let el = document.get_element_by_id("initial-data")?;
    let text = el.text_content().unwrap_or_default();
    el.remove();
    if text.trim().is_empty() {
        return None;
    }
    parse_snapshot(&text).ok()
}

fn set_status(state: &AppState, text: &str, tone: &str) {
    if let Some(status_el) = &state.status_el {
        status_el.set_text_content(Some(text));
        let _ = status_el.set_attribute("data-tone", tone);
    }
}

fn update_status_loaded(state: &AppState) {
    let total = state.dashboard.rows().len();
    let shown = state
        .dashboard
        .rows()
        .iter()
        .filter(|row| !row.category.is_hidden())
        .count();
    let stamp: String = js_sys::Date::new_0().to_locale_time_string("en-US").into();
    let text = format!("{} of {} nodes shown - {}", shown, total, stamp);
    set_status(state, &text, "success");
}

fn input_by_id(document: &Document, id: &str) -> Option<HtmlInputElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
}

fn normalize_table_layout(state: &AppState) {
    let head_row = match &state.head_row {
        Some(row) => row,
        None => return,
    };
    head_row.set_inner_html("");
    for column in &state.dashboard.layout().columns {
        if let Ok(th) = state.document.create_element("th") {
            th.set_class_name(column.header_class());
            th.set_text_content(Some(column.header()));
            let _ = head_row.append_child(&th);
        }
    }
}

fn apply_row_data(document: &Document, tr: &HtmlTableRowElement, row: &RenderedRow) {
    tr.set_class_name(row.category.class_name());
    tr.set_inner_html("");
    for cell in &row.cells {
        if let Ok(td) = document.create_element("td") {
            if !cell.class.is_empty() {
                td.set_class_name(cell.class);
            }
            td.set_text_content(Some(&cell.text));
            let _ = tr.append_child(&td);
        }
    }
}

fn create_row(document: &Document, uid: &str) -> Option<HtmlTableRowElement> {
    let tr = document
        .create_element("tr")
        .ok()?
        .dyn_into::<HtmlTableRowElement>()
        .ok()?;
    let _ = tr.set_attribute("data-uid", uid);
    Some(tr)
}

fn apply_render_pass(state: &mut AppState, pass: &RenderPass) {
    for uid in &pass.reconciled.removed {
        if let Some(tr) = state.row_by_uid.remove(uid) {
            tr.remove();
        }
    }

    let table_body = match &state.table_body {
        Some(body) => body.clone(),
        None => return,
    };

    for row in state.dashboard.rows().iter() {
        let tr = match state.row_by_uid.get(&row.uid) {
            Some(tr) => tr.clone(),
            None => {
                let tr = match create_row(&state.document, &row.uid) {
                    Some(tr) => tr,
                    None => continue,
                };
                let _ = table_body.append_child(&tr);
                state.row_by_uid.insert(row.uid.clone(), tr.clone());
                tr
            }
        };
        apply_row_data(&state.document, &tr, row);
    }

    if pass.resorted {
        for row in state.dashboard.rows().iter() {
            if let Some(tr) = state.row_by_uid.get(&row.uid) {
                let _ = table_body.append_child(tr);
            }
        }
    }

    sync_summary(state, &pass.summary);
}

fn create_summary_cell(state: &AppState, network: &str) -> Option<Element> {
    let summary_row = state.summary_row.as_ref()?;
    let filter_id = network_filter_id(network);

    let td = state.document.create_element("td").ok()?;
    let input = state
        .document
        .create_element("input")
        .ok()?
        .dyn_into::<HtmlInputElement>()
        .ok()?;
    input.set_type("checkbox");
    input.set_id(&filter_id);
    input.set_checked(state.dashboard.state().networks.is_enabled(network));
    if let Some(listener) = &state.toggle_listener {
        let _ = input.add_event_listener_with_callback("change", listener);
    }

    let label = state.document.create_element("label").ok()?;
    let _ = label.set_attribute("for", &filter_id);
    label.set_text_content(Some(&format!("{}: ", network)));
    let data = state.document.create_element("span").ok()?;
    data.set_class_name("pre");
    let _ = label.append_child(&data);

    let _ = td.append_child(&input);
    let _ = td.append_child(&label);
    let _ = summary_row.append_child(&td);
    Some(data)
}

fn sync_summary(state: &mut AppState, entries: &[SummaryEntry]) {
    for entry in entries {
        let cell = match state.summary_by_network.get(&entry.network) {
            Some(cell) => cell.clone(),
            None => match create_summary_cell(state, &entry.network) {
                Some(cell) => {
                    state
                        .summary_by_network
                        .insert(entry.network.clone(), cell.clone());
                    cell
                }
                None => continue,
            },
        };
        cell.set_text_content(Some(&entry.text));
    }
}

fn apply_fqdn_style(state: &AppState) {
    if let Some(style) = &state.fqdn_style {
        let rule = fqdn_style_rule(state.dashboard.state().toggles.show_fqdn);
        style.set_text_content(Some(&rule));
    }
}

fn sync_sort_toggles(state: &AppState) {
    let active = state.dashboard.state().sort_mode;
    for mode in SortMode::ALL {
        if let Some(input) = input_by_id(&state.document, &ToggleId::Sort(mode).element_id()) {
            input.set_checked(mode == active);
            input.set_disabled(!state.dashboard.layout().supports(mode));
        }
    }
}

fn render(state: &mut AppState) {
    let pass = state.dashboard.render();
    apply_render_pass(state, &pass);
    update_status_loaded(state);
}

fn handle_toggle(state_rc: &Rc<RefCell<AppState>>, event: web_sys::Event) {
    let input = match event
        .target()
        .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
    {
        Some(input) => input,
        None => return,
    };
    let toggle = match ToggleId::parse(&input.id()) {
        Some(toggle) => toggle,
        None => return,
    };

    let mut state = state_rc.borrow_mut();
    match state.dashboard.apply_toggle(&toggle, input.checked()) {
        ToggleEffect::Render => render(&mut state),
        ToggleEffect::Restyle => apply_fqdn_style(&state),
        ToggleEffect::Ignored => {}
    }
    if matches!(toggle, ToggleId::Sort(_)) {
        sync_sort_toggles(&state);
    }
}

/// Seeds the view state from whatever the page markup has pre-checked.
fn read_initial_toggles(state: &mut AppState) {
    for id in STATIC_TOGGLE_IDS {
        let toggle = match ToggleId::parse(id) {
            Some(toggle) => toggle,
            None => continue,
        };
        if let Some(input) = input_by_id(&state.document, id) {
            state.dashboard.apply_toggle(&toggle, input.checked());
        }
    }
}

async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let response = JsFuture::from(window().fetch_with_str(url)).await?;
    let response: web_sys::Response = response.dyn_into()?;
    let text = JsFuture::from(response.text()?).await?;
    let text = text.as_string().unwrap_or_default();
    if !response.ok() {
        let message = if text.trim().is_empty() {
            format!("Request failed ({})", response.status())
        } else {
            text
        };
        return Err(JsValue::from_str(&message));
    }
    Ok(text)
}

async fn fetch_snapshot(url: &str) -> Result<Snapshot, JsValue> {
    let text = fetch_text(url).await?;
    parse_snapshot(&text).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn js_error_message(err: JsValue, fallback: &str) -> String {
    if let Some(message) = err.as_string() {
        return message;
    }
    if let Ok(error) = err.dyn_into::<js_sys::Error>() {
        return error.message().into();
    }
    fallback.to_string()
}

fn schedule_poll(state_rc: Rc<RefCell<AppState>>, delay_ms: u32) {
    let state_clone = state_rc.clone();
    let timeout = Timeout::new(delay_ms, move || {
        poll_status(state_clone);
    });
    state_rc.borrow_mut().poll_timer = Some(timeout);
}

/// One fetch; the next is scheduled only once this one settles.
fn poll_status(state_rc: Rc<RefCell<AppState>>) {
    let url = state_rc.borrow().status_url.clone();
    spawn_local(async move {
        let result = fetch_snapshot(&url).await;
        let delay_ms = {
            let mut state = state_rc.borrow_mut();
            match result {
                Ok(nodes) => {
                    let pass = state.dashboard.apply_snapshot(nodes);
                    apply_render_pass(&mut state, &pass);
                    update_status_loaded(&state);
                    state.schedule.on_success()
                }
                Err(err) => {
                    let message = js_error_message(err, "Request failed");
                    web_sys::console::error_1(&JsValue::from_str(&format!(
                        "status fetch from {} failed: {}",
                        url, message
                    )));
                    set_status(&state, &format!("Error: {}", message), "error");
                    state.schedule.on_failure()
                }
            }
        };
        schedule_poll(state_rc, delay_ms);
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let document = window()
        .document()
        .ok_or_else(|| JsValue::from_str("document unavailable"))?;
    let initial_payload = read_initial_payload(&document);
    let state_rc = Rc::new(RefCell::new(AppState::new(document)));

    let state_clone = state_rc.clone();
    let handler = Closure::wrap(Box::new(move |event: web_sys::Event| {
        handle_toggle(&state_clone, event);
    }) as Box<dyn FnMut(web_sys::Event)>);
    let listener: Function = handler.as_ref().unchecked_ref::<Function>().clone();
    handler.forget();

    {
        let mut state = state_rc.borrow_mut();
        state.toggle_listener = Some(listener.clone());
        normalize_table_layout(&state);
        read_initial_toggles(&mut state);
        for id in STATIC_TOGGLE_IDS {
            if let Some(input) = input_by_id(&state.document, id) {
                let _ = input.add_event_listener_with_callback("change", &listener);
            }
        }
        if let Some(input) = input_by_id(&state.document, &ToggleId::Fqdn.element_id()) {
            let has_fqdn = state.dashboard.layout().columns.contains(&Column::Fqdn);
            input.set_disabled(!has_fqdn);
        }
        apply_fqdn_style(&state);
        sync_sort_toggles(&state);
        set_status(&state, "Fetching node status...", "info");
    }

    match initial_payload {
        Some(nodes) => {
            let interval_ms = {
                let mut state = state_rc.borrow_mut();
                let pass = state.dashboard.apply_snapshot(nodes);
                apply_render_pass(&mut state, &pass);
                update_status_loaded(&state);
                state.schedule.on_success()
            };
            schedule_poll(state_rc, interval_ms);
        }
        None => poll_status(state_rc),
    }

    Ok(())
}

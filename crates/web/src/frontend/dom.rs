//! DOM binding: page controls → [`SessionEvent`]s, [`Effect`]s → DOM updates.
//!
//! The page owns the filter sidebar; the widget only reads its controls and
//! writes into the grid and the pagination container it creates.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement, ScrollBehavior,
    ScrollToOptions, Window,
};

use crate::client::CatalogClient;
use crate::config::WidgetConfig;
use crate::controls::{ControlSnapshot, page_from_attribute};
use crate::render::{RenderError, Renderer, price_label};
use crate::session::{Effect, PageSession, SessionEvent};

pub const GRID_ID: &str = "shortlist-grid";
pub const PRICE_RANGE_ID: &str = "price-max";
pub const PRICE_VALUE_ID: &str = "price-value";
pub const PAGINATION_ID: &str = "pagination-container";
pub const FILTER_SIDEBAR_SELECTOR: &str = ".filter-sidebar";
pub const PRODUCT_CONTENT_SELECTOR: &str = ".product-content";
pub const FILTER_CHECKBOX_SELECTOR: &str = ".filter-checkbox";
pub const CHECKED_FILTER_SELECTOR: &str = ".filter-checkbox:checked";
pub const FILTER_HEADER_SELECTOR: &str = ".filter-header";
pub const PAGE_BUTTON_SELECTOR: &str = "button.pagination-btn";

#[derive(Debug, thiserror::Error)]
pub enum BindError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("missing element: {0}")]
    MissingElement(&'static str),
    #[error("DOM call failed: {0}")]
    Js(String),
    #[error(transparent)]
    Render(#[from] RenderError),
}

fn js_err(e: JsValue) -> BindError {
    BindError::Js(format!("{e:?}"))
}

/// Elements the widget reads from or writes to.
struct Page {
    window: Window,
    document: Document,
    grid: Element,
    price_range: HtmlInputElement,
    price_value: Element,
    filter_sidebar: HtmlElement,
    pagination: Element,
}

impl Page {
    fn locate(window: Window) -> Result<Self, BindError> {
        let document = window.document().ok_or(BindError::NoDocument)?;

        let grid = document
            .get_element_by_id(GRID_ID)
            .ok_or(BindError::MissingElement(GRID_ID))?;
        let price_range = document
            .get_element_by_id(PRICE_RANGE_ID)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .ok_or(BindError::MissingElement(PRICE_RANGE_ID))?;
        let price_value = document
            .get_element_by_id(PRICE_VALUE_ID)
            .ok_or(BindError::MissingElement(PRICE_VALUE_ID))?;
        let filter_sidebar = document
            .query_selector(FILTER_SIDEBAR_SELECTOR)
            .map_err(js_err)?
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .ok_or(BindError::MissingElement(FILTER_SIDEBAR_SELECTOR))?;
        let product_content = document
            .query_selector(PRODUCT_CONTENT_SELECTOR)
            .map_err(js_err)?
            .ok_or(BindError::MissingElement(PRODUCT_CONTENT_SELECTOR))?;

        let pagination = document.create_element("div").map_err(js_err)?;
        pagination.set_id(PAGINATION_ID);
        product_content.append_child(&pagination).map_err(js_err)?;

        Ok(Self {
            window,
            document,
            grid,
            price_range,
            price_value,
            filter_sidebar,
            pagination,
        })
    }

    fn elements(&self, selector: &str) -> Result<Vec<Element>, BindError> {
        let list = self.document.query_selector_all(selector).map_err(js_err)?;
        Ok((0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    fn snapshot(&self) -> Result<ControlSnapshot, BindError> {
        let checked = self
            .elements(CHECKED_FILTER_SELECTOR)?
            .into_iter()
            .filter_map(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| (input.name(), input.value()))
            .collect();
        Ok(ControlSnapshot {
            price_value: self.price_range.value(),
            checked,
        })
    }

    fn show_price(&self) {
        self.price_value
            .set_text_content(Some(&price_label(&self.price_range.value())));
    }

    fn scroll_to_top(&self) {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }
}

struct Widget {
    page: Page,
    renderer: Renderer,
    session: RefCell<PageSession>,
}

impl Widget {
    fn dispatch(&self, event: SessionEvent) {
        let effect = self.session.borrow_mut().update(event);
        match effect {
            Effect::None => {}
            Effect::Render => self.paint(),
            Effect::RenderAndScrollTop => {
                self.paint();
                self.page.scroll_to_top();
            }
        }
    }

    fn paint(&self) {
        let session = self.session.borrow();
        let rendered = match self.renderer.render(&session) {
            Ok(rendered) => rendered,
            Err(err) => {
                report(&format!("render failed: {err}"));
                return;
            }
        };

        self.page.grid.set_inner_html(&rendered.grid_html);
        self.page.pagination.set_inner_html(&rendered.pagination_html);
        let opacity = if rendered.filters_dimmed { "0.5" } else { "1" };
        if let Err(e) = self.page.filter_sidebar.style().set_property("opacity", opacity) {
            report(&format!("could not update filter panel: {e:?}"));
        }
    }

    fn filters_changed(&self) {
        match self.page.snapshot() {
            Ok(snapshot) => self.dispatch(SessionEvent::FiltersChanged(snapshot.to_filter_state())),
            Err(err) => report(&format!("could not read filters: {err}")),
        }
    }
}

fn report(message: &str) {
    web_sys::console::error_1(&JsValue::from_str(message));
}

fn listen(
    target: &EventTarget,
    kind: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), BindError> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target
        .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
        .map_err(js_err)?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

/// Bind to the current page and start the catalog fetch.
pub fn start(config: WidgetConfig) -> Result<(), BindError> {
    let window = web_sys::window().ok_or(BindError::NoWindow)?;
    let page = Page::locate(window)?;
    let renderer = Renderer::new(config.clone())?;
    let client = CatalogClient::new(&config);

    let widget = Rc::new(Widget {
        page,
        renderer,
        session: RefCell::new(PageSession::new(config)),
    });

    widget.page.show_price();
    widget.paint();

    {
        let w = Rc::clone(&widget);
        listen(&widget.page.price_range, "input", move |_| {
            w.page.show_price();
            w.filters_changed();
        })?;
    }

    for checkbox in widget.page.elements(FILTER_CHECKBOX_SELECTOR)? {
        let w = Rc::clone(&widget);
        listen(&checkbox, "change", move |_| w.filters_changed())?;
    }

    for header in widget.page.elements(FILTER_HEADER_SELECTOR)? {
        let h = header.clone();
        listen(&header, "click", move |_| {
            if let Some(group) = h.parent_element() {
                if let Err(e) = group.class_list().toggle("active") {
                    report(&format!("could not toggle filter group: {e:?}"));
                }
            }
        })?;
    }

    {
        let w = Rc::clone(&widget);
        listen(&widget.page.pagination, "click", move |event| {
            let button = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(PAGE_BUTTON_SELECTOR).ok().flatten());
            let Some(button) = button else { return };
            if button.has_attribute("disabled") {
                return;
            }
            if let Some(page) = page_from_attribute(button.get_attribute("data-page").as_deref()) {
                w.dispatch(SessionEvent::PageSelected(page));
            }
        })?;
    }

    wasm_bindgen_futures::spawn_local(async move {
        let event = match client.fetch_catalog().await {
            Ok(catalog) => SessionEvent::CatalogLoaded(catalog),
            Err(err) => {
                report(&format!("Fetch error: {err}"));
                SessionEvent::CatalogFailed(err.user_message().to_string())
            }
        };
        widget.dispatch(event);
    });

    Ok(())
}

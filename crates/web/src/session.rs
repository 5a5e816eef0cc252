//! Page session: the single owner of catalog, filtered view and page state.
//!
//! Hosts translate user actions into [`SessionEvent`]s and apply the returned
//! [`Effect`]. `update` is synchronous and runs to completion, so the browser
//! binding only ever needs one mutable borrow at a time.

use shortlist_products::{FilterState, PageStrip, Pagination, Product};

use crate::config::WidgetConfig;
use crate::types::LoadStatus;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The fetch succeeded; the catalog becomes the initial filtered view.
    CatalogLoaded(Vec<Product>),
    /// The fetch failed; carries the user-facing message.
    CatalogFailed(String),
    /// Any checkbox or the price slider changed.
    FiltersChanged(FilterState),
    /// A numbered (or arrow) pagination button was clicked.
    PageSelected(usize),
    PreviousPage,
    NextPage,
}

/// What the host must do after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Render,
    RenderAndScrollTop,
}

/// Grid contents for the current state.
#[derive(Debug, Clone, PartialEq)]
pub enum GridView<'a> {
    Loading,
    Failed(&'a str),
    /// Ready, but the current page has no products.
    Empty,
    Page(Vec<&'a Product>),
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView<'a> {
    pub grid: GridView<'a>,
    pub pagination: Option<PageStrip>,
    /// The filter panel shows its loading affordance.
    pub filters_dimmed: bool,
}

#[derive(Debug, Clone)]
pub struct PageSession {
    config: WidgetConfig,
    catalog: Vec<Product>,
    /// Indices into `catalog`, in catalog order.
    filtered: Vec<usize>,
    pagination: Pagination,
    status: LoadStatus,
}

impl PageSession {
    /// A session waiting for its catalog.
    pub fn new(config: WidgetConfig) -> Self {
        let pagination = Pagination::new(config.page_size);
        Self {
            config,
            catalog: Vec::new(),
            filtered: Vec::new(),
            pagination,
            status: LoadStatus::Loading,
        }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    pub fn filtered(&self) -> Vec<&Product> {
        self.filtered.iter().map(|&i| &self.catalog[i]).collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn current_page(&self) -> usize {
        self.pagination.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages(self.filtered.len())
    }

    /// Products on the current page.
    pub fn page_products(&self) -> Vec<&Product> {
        self.pagination
            .slice(&self.filtered)
            .iter()
            .map(|&i| &self.catalog[i])
            .collect()
    }

    pub fn update(&mut self, event: SessionEvent) -> Effect {
        match event {
            SessionEvent::CatalogLoaded(products) => {
                self.filtered = (0..products.len()).collect();
                self.catalog = products;
                self.pagination.reset();
                self.status = LoadStatus::Ready;
                tracing::info!(products = self.catalog.len(), "session ready");
                Effect::Render
            }
            SessionEvent::CatalogFailed(message) => {
                tracing::error!(%message, "catalog load failed");
                self.catalog.clear();
                self.filtered.clear();
                self.pagination.reset();
                self.status = LoadStatus::Failed(message);
                Effect::Render
            }
            SessionEvent::FiltersChanged(filters) => {
                self.pagination.reset();
                if !self.status.is_ready() {
                    tracing::debug!(status = ?self.status, "filters changed before catalog was ready");
                    return Effect::None;
                }
                self.filtered = filters.select_indices(&self.catalog);
                tracing::debug!(
                    matched = self.filtered.len(),
                    total = self.catalog.len(),
                    max_price = filters.max_price(),
                    "filters applied"
                );
                Effect::Render
            }
            SessionEvent::PageSelected(page) => {
                match self.pagination.jump_to(page, self.filtered.len()) {
                    Ok(()) => {
                        tracing::debug!(page, "page selected");
                        Effect::RenderAndScrollTop
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "ignored page selection");
                        Effect::None
                    }
                }
            }
            SessionEvent::PreviousPage => {
                if self.pagination.previous() {
                    Effect::RenderAndScrollTop
                } else {
                    Effect::None
                }
            }
            SessionEvent::NextPage => {
                if self.pagination.next(self.filtered.len()) {
                    Effect::RenderAndScrollTop
                } else {
                    Effect::None
                }
            }
        }
    }

    pub fn view(&self) -> SessionView<'_> {
        match &self.status {
            LoadStatus::Loading => SessionView {
                grid: GridView::Loading,
                pagination: None,
                filters_dimmed: true,
            },
            // The panel keeps its loading affordance after a failed load.
            LoadStatus::Failed(message) => SessionView {
                grid: GridView::Failed(message),
                pagination: None,
                filters_dimmed: true,
            },
            LoadStatus::Ready => {
                let products = self.page_products();
                let grid = if products.is_empty() {
                    GridView::Empty
                } else {
                    GridView::Page(products)
                };
                SessionView {
                    grid,
                    pagination: self.pagination.strip(self.filtered.len()),
                    filters_dimmed: false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortlist_core::Entity;
    use shortlist_products::{Facet, ProductRecord, WireNumber};

    fn catalog(n: usize) -> Vec<Product> {
        (0..n)
            .map(|i| {
                Product::from_record(ProductRecord {
                    id: Some(format!("cpu-{i}")),
                    name: Some(format!("CPU {i}")),
                    brand: Some(if i % 2 == 0 { "Intel" } else { "AMD" }.to_string()),
                    category: Some("CPU Processors".to_string()),
                    price: WireNumber::Number(100.0 + i as f64),
                    ..ProductRecord::default()
                })
            })
            .collect()
    }

    fn loaded(n: usize) -> PageSession {
        let mut session = PageSession::new(WidgetConfig::default());
        assert_eq!(session.update(SessionEvent::CatalogLoaded(catalog(n))), Effect::Render);
        session
    }

    #[test]
    fn new_session_is_loading_with_dimmed_filters() {
        let session = PageSession::new(WidgetConfig::default());
        let view = session.view();
        assert_eq!(view.grid, GridView::Loading);
        assert!(view.filters_dimmed);
        assert!(view.pagination.is_none());
    }

    #[test]
    fn loaded_catalog_is_the_initial_filtered_view() {
        let session = loaded(23);
        assert_eq!(session.filtered_len(), 23);
        assert_eq!(session.total_pages(), 3);

        let view = session.view();
        assert!(!view.filters_dimmed);
        match view.grid {
            GridView::Page(products) => {
                assert_eq!(products.len(), 10);
                assert_eq!(products[0].id().as_str(), "cpu-0");
            }
            other => panic!("expected a page of products, got {other:?}"),
        }
        assert_eq!(view.pagination.unwrap().total_pages, 3);
    }

    #[test]
    fn failed_load_leaves_catalog_empty_and_shows_message() {
        let mut session = PageSession::new(WidgetConfig::default());
        let effect = session.update(SessionEvent::CatalogFailed("Could not connect to backend.".into()));
        assert_eq!(effect, Effect::Render);
        assert!(session.catalog().is_empty());

        let view = session.view();
        assert_eq!(view.grid, GridView::Failed("Could not connect to backend."));
        assert!(view.pagination.is_none());
        assert!(view.filters_dimmed);
    }

    #[test]
    fn filter_change_resets_page_even_past_new_total() {
        let mut session = loaded(23);
        assert_eq!(session.update(SessionEvent::PageSelected(3)), Effect::RenderAndScrollTop);
        assert_eq!(session.current_page(), 3);

        let intel_only = FilterState::default().with_selection(Facet::Brand, "Intel");
        assert_eq!(session.update(SessionEvent::FiltersChanged(intel_only)), Effect::Render);
        assert_eq!(session.current_page(), 1);
        assert_eq!(session.filtered_len(), 12);
        assert_eq!(session.total_pages(), 2);

        let none = FilterState::default().with_selection(Facet::Brand, "Arm");
        session.update(SessionEvent::FiltersChanged(none));
        assert_eq!(session.current_page(), 1);
        assert_eq!(session.view().grid, GridView::Empty);
        assert!(session.view().pagination.is_none());
    }

    #[test]
    fn reapplying_identical_filters_is_idempotent() {
        let mut session = loaded(23);
        let filters = FilterState::new(110.0).with_selection(Facet::Category, "CPU");
        session.update(SessionEvent::FiltersChanged(filters.clone()));
        let first: Vec<String> = session.filtered().iter().map(|p| p.id().to_string()).collect();
        session.update(SessionEvent::FiltersChanged(filters));
        let second: Vec<String> = session.filtered().iter().map(|p| p.id().to_string()).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 11);
    }

    #[test]
    fn page_navigation_is_guarded() {
        let mut session = loaded(23);
        assert_eq!(session.update(SessionEvent::PreviousPage), Effect::None);
        assert_eq!(session.update(SessionEvent::NextPage), Effect::RenderAndScrollTop);
        assert_eq!(session.update(SessionEvent::NextPage), Effect::RenderAndScrollTop);
        assert_eq!(session.update(SessionEvent::NextPage), Effect::None);
        assert_eq!(session.current_page(), 3);
        assert_eq!(session.page_products().len(), 3);

        assert_eq!(session.update(SessionEvent::PageSelected(0)), Effect::None);
        assert_eq!(session.update(SessionEvent::PageSelected(4)), Effect::None);
        assert_eq!(session.current_page(), 3);
    }

    #[test]
    fn selecting_current_page_still_scrolls() {
        let mut session = loaded(23);
        assert_eq!(session.update(SessionEvent::PageSelected(1)), Effect::RenderAndScrollTop);
    }

    #[test]
    fn filters_before_load_are_not_rendered() {
        let mut session = PageSession::new(WidgetConfig::default());
        let filters = FilterState::default().with_selection(Facet::Brand, "AMD");
        assert_eq!(session.update(SessionEvent::FiltersChanged(filters)), Effect::None);
        assert_eq!(session.view().grid, GridView::Loading);
    }

    #[test]
    fn single_page_has_no_strip() {
        let session = loaded(10);
        assert!(session.view().pagination.is_none());
    }
}

//! Markup for product cards, grid messages and the pagination strip.
//!
//! Cards are first turned into [`CardView`]s (plain strings, easy to test),
//! then rendered through Tera templates with auto-escaping: product fields
//! are always treated as text.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use shortlist_core::Entity;
use shortlist_products::{PageStrip, Product};
use tera::{Context, Tera};

use crate::config::WidgetConfig;
use crate::session::{GridView, PageSession, SessionView};

/// Minimum order quantity shown on every card (display only).
pub const MOQ_LABEL: &str = "20 pcs (MOQ)";

pub const EMPTY_MESSAGE: &str = "No products match your criteria.";
pub const LOADING_MESSAGE: &str = "Loading products...";

const GRID_TEMPLATE: &str = "grid.html";
const PAGINATION_TEMPLATE: &str = "pagination.html";

const GRID_HTML: &str = r#"{% if state == "loading" -%}
<p class="loading-message">{{ message }}</p>
{%- elif state == "failed" -%}
<p class="error-message">Error: {{ message }}</p>
{%- elif state == "empty" -%}
<p class="empty-message">{{ message }}</p>
{%- else -%}
{% for card in cards %}
<div class="product-card" data-product-id="{{ card.id }}">
    <a class="product-image-container" href="{{ card.brand_page }}">
        <img src="{{ card.image_url }}" alt="{{ card.name }}" onerror="this.onerror=null;this.src='{{ card.placeholder_image }}'">
    </a>
    <div class="product-details">
        <a href="{{ card.detail_page }}" class="product-link" style="text-decoration: none; color: inherit;">
        <h4 class="product-title">{{ card.name }}</h4></a>
        {% if card.shortlisted %}<span class="shortlist-badge">Shortlisted</span>{% endif %}
        <p class="product-spec-snippet">{{ card.description }}</p>
        <small class="product-meta">{{ card.specs }}</small>
    </div>
    <div class="product-actions">
        <div class="product-price-moq">
            <p class="price-value">US <span class="price-large">${{ card.price }}</span>/pcs</p>
            <p class="moq-info">{{ card.moq }} <span class="info-icon">ⓘ</span></p>
        </div>
        <a class="inquiry-btn" href="{{ card.inquiry_page }}">Inquiry</a>
    </div>
</div>
{%- endfor %}
{%- endif %}"#;

const PAGINATION_HTML: &str = r#"{% if strip -%}
{% for button in strip.buttons -%}
<button class="pagination-btn{% if button.active %} active{% endif %}{% if button.disabled %} disabled{% endif %}" data-page="{{ button.target }}"{% if button.disabled %} disabled{% endif %}>{{ button.label }}</button>
{%- endfor %}
{%- endif %}"#;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

/// Display data for one product card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub placeholder_image: String,
    pub brand_page: String,
    pub detail_page: String,
    pub inquiry_page: String,
    pub specs: String,
    pub price: String,
    pub moq: &'static str,
    pub shortlisted: bool,
}

impl CardView {
    pub fn from_product(product: &Product, config: &WidgetConfig) -> Self {
        Self {
            id: product.id().to_string(),
            name: product.name().to_string(),
            description: product.description().to_string(),
            image_url: config.image_url(product.image()),
            placeholder_image: config.placeholder_image.clone(),
            brand_page: brand_page(product.brand()),
            detail_page: detail_page(product.name()),
            inquiry_page: inquiry_page(product.name()),
            specs: spec_summary(product),
            price: format_price(product.price()),
            moq: MOQ_LABEL,
            shortlisted: product.is_shortlisted(),
        }
    }
}

/// Rendered markup for the two containers the widget owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub grid_html: String,
    pub pagination_html: String,
    pub filters_dimmed: bool,
}

#[derive(Debug)]
pub struct Renderer {
    tera: Tera,
    config: WidgetConfig,
}

impl Renderer {
    pub fn new(config: WidgetConfig) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (GRID_TEMPLATE, GRID_HTML),
            (PAGINATION_TEMPLATE, PAGINATION_HTML),
        ])?;
        Ok(Self { tera, config })
    }

    pub fn render(&self, session: &PageSession) -> Result<RenderedPage, RenderError> {
        self.render_view(&session.view())
    }

    pub fn render_view(&self, view: &SessionView<'_>) -> Result<RenderedPage, RenderError> {
        Ok(RenderedPage {
            grid_html: self.render_grid(&view.grid)?,
            pagination_html: self.render_pagination(view.pagination.as_ref())?,
            filters_dimmed: view.filters_dimmed,
        })
    }

    pub fn render_grid(&self, grid: &GridView<'_>) -> Result<String, RenderError> {
        let mut context = Context::new();
        match grid {
            GridView::Loading => {
                context.insert("state", "loading");
                context.insert("message", LOADING_MESSAGE);
            }
            GridView::Failed(message) => {
                context.insert("state", "failed");
                context.insert("message", message);
            }
            GridView::Empty => {
                context.insert("state", "empty");
                context.insert("message", EMPTY_MESSAGE);
            }
            GridView::Page(products) => {
                let cards: Vec<CardView> = products
                    .iter()
                    .map(|p| CardView::from_product(p, &self.config))
                    .collect();
                context.insert("state", "page");
                context.insert("cards", &cards);
            }
        }
        Ok(self.tera.render(GRID_TEMPLATE, &context)?)
    }

    pub fn render_pagination(&self, strip: Option<&PageStrip>) -> Result<String, RenderError> {
        let mut context = Context::new();
        context.insert("strip", &strip);
        Ok(self.tera.render(PAGINATION_TEMPLATE, &context)?)
    }
}

/// `Brand: .. | Socket: .. | Cores/Threads: ../.. | ...` line under the title.
pub fn spec_summary(product: &Product) -> String {
    [
        format!("Brand: {}", product.brand()),
        format!("Socket: {}", product.socket()),
        format!(
            "Cores/Threads: {}/{}",
            display_number(product.cores()),
            display_number(product.threads())
        ),
        format!("Cache: {} MB", display_number(product.cache())),
        format!("TDP: {} W", display_number(product.tdp())),
        format!("Freq: {} GHz", display_number(product.base_freq())),
        format!("Tech: {}", product.tech()),
        format!(
            "Memory: {} ({} GB Max)",
            product.memory_type(),
            display_number(product.max_memory_size())
        ),
    ]
    .join(" | ")
}

/// Numbers render as-is (`3`, `4.5`); not-a-number renders as `NaN`.
fn display_number<T: core::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "NaN".to_string(), |v| v.to_string())
}

/// Two decimals (`189.00`), or `NaN` when the price did not parse.
pub fn format_price(price: Option<f64>) -> String {
    price.map_or_else(|| "NaN".to_string(), |p| format!("{p:.2}"))
}

/// Brand listing page: `/productslist/{brand-lowercased}.html`.
pub fn brand_page(brand: &str) -> String {
    format!("/productslist/{}.html", brand.to_lowercase())
}

/// Product page: lowercased name with whitespace runs collapsed to `-`.
///
/// Unlike a plain lowercase, whitespace is hyphenated.
pub fn detail_page(name: &str) -> String {
    format!("{}.html", slugify(name))
}

pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Bytes escaped in the inquiry query value: everything except
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`, the set browsers leave untouched in
/// `encodeURIComponent`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Inquiry form with the product name as a query parameter.
pub fn inquiry_page(name: &str) -> String {
    format!("inquiry.html?product={}", utf8_percent_encode(name, QUERY_VALUE))
}

/// Text of the label next to the price slider.
pub fn price_label(raw_value: &str) -> String {
    format!("${raw_value}")
}

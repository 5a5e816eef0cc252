//! Translating raw control state into filter input.
//!
//! The browser binding and the preview binary both read strings (slider
//! value, checkbox `name`/`value`, `data-page`); parsing them lives here so it
//! can be tested without a DOM.

use shortlist_core::{DomainError, DomainResult};
use shortlist_products::{Facet, FilterState, parse_float_prefix, parse_int_prefix};

/// Filter controls as read from the page at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlSnapshot {
    /// Raw value of the price slider.
    pub price_value: String,
    /// `(name, value)` of every checked filter checkbox, in document order.
    pub checked: Vec<(String, String)>,
}

impl ControlSnapshot {
    /// An unreadable slider value imposes no price ceiling.
    pub fn to_filter_state(&self) -> FilterState {
        let max_price = parse_float_prefix(&self.price_value).unwrap_or(f64::NAN);
        FilterState::from_controls(max_price, self.checked.iter().map(|(n, v)| (n, v)))
    }
}

/// Target page carried by a pagination button's `data-page` attribute.
pub fn page_from_attribute(raw: Option<&str>) -> Option<usize> {
    let page = parse_int_prefix(raw?)?;
    usize::try_from(page).ok().filter(|&p| p > 0)
}

/// Parse a `facet=value` selection (preview command line).
pub fn parse_selection(raw: &str) -> DomainResult<(Facet, String)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| DomainError::validation(format!("expected facet=value, got `{raw}`")))?;
    Ok((name.trim().parse::<Facet>()?, value.to_string()))
}

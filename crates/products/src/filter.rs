//! Filter engine: facet selections plus a price ceiling, applied to the catalog.
//!
//! A [`FilterState`] is rebuilt from the page controls every time a filter
//! changes; it is never cached or patched. Applying it is pure and preserves
//! catalog order.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shortlist_core::DomainError;

use crate::product::{Product, parse_float_prefix, parse_int_prefix};

/// One filterable product attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Brand,
    Category,
    Application,
    Socket,
    Cores,
    Tdp,
    Threads,
    Cache,
    BaseFreq,
    Tech,
    MemoryType,
    MaxMemorySize,
    Packaging,
}

/// How a facet compares its selected values against a product field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetKind {
    /// Exact string membership.
    Exact,
    /// The product field contains the selected value as a substring.
    Substring,
    /// Selected values are parsed as integers.
    Integer,
    /// Selected values are parsed as floats.
    Float,
}

impl Facet {
    pub const ALL: [Facet; 13] = [
        Facet::Brand,
        Facet::Category,
        Facet::Application,
        Facet::Socket,
        Facet::Cores,
        Facet::Tdp,
        Facet::Threads,
        Facet::Cache,
        Facet::BaseFreq,
        Facet::Tech,
        Facet::MemoryType,
        Facet::MaxMemorySize,
        Facet::Packaging,
    ];

    /// The `name` attribute carried by this facet's checkboxes.
    pub fn control_name(self) -> &'static str {
        match self {
            Facet::Brand => "brand",
            Facet::Category => "category",
            Facet::Application => "application",
            Facet::Socket => "socket",
            Facet::Cores => "cores",
            Facet::Tdp => "tdp",
            Facet::Threads => "threads",
            Facet::Cache => "cache",
            Facet::BaseFreq => "base_freq",
            Facet::Tech => "tech",
            Facet::MemoryType => "memory_type",
            Facet::MaxMemorySize => "max_memory_size",
            Facet::Packaging => "packaging",
        }
    }

    pub fn from_control_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.control_name() == name)
    }

    pub fn kind(self) -> FacetKind {
        match self {
            Facet::Category => FacetKind::Substring,
            Facet::Cores | Facet::Tdp | Facet::Threads | Facet::Cache | Facet::MaxMemorySize => {
                FacetKind::Integer
            }
            Facet::BaseFreq => FacetKind::Float,
            Facet::Brand
            | Facet::Application
            | Facet::Socket
            | Facet::Tech
            | Facet::MemoryType
            | Facet::Packaging => FacetKind::Exact,
        }
    }
}

impl core::fmt::Display for Facet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.control_name())
    }
}

impl FromStr for Facet {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_control_name(s).ok_or_else(|| DomainError::unknown_facet(s))
    }
}

/// A selected value, parsed according to its facet's kind.
///
/// Numeric values that fail to parse are kept as `None`: they only match
/// products whose own field is also not-a-number.
#[derive(Debug, Clone, PartialEq)]
pub enum FacetValue {
    Text(String),
    Integer(Option<i64>),
    Float(Option<f64>),
}

impl FacetValue {
    pub fn parse(kind: FacetKind, raw: &str) -> Self {
        match kind {
            FacetKind::Exact | FacetKind::Substring => FacetValue::Text(raw.to_string()),
            FacetKind::Integer => FacetValue::Integer(parse_int_prefix(raw)),
            FacetKind::Float => FacetValue::Float(parse_float_prefix(raw)),
        }
    }
}

/// Filter selections read from the page.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    max_price: f64,
    selections: BTreeMap<Facet, Vec<FacetValue>>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(f64::INFINITY)
    }
}

impl FilterState {
    /// Empty selections with the given price ceiling.
    pub fn new(max_price: f64) -> Self {
        Self {
            max_price,
            selections: BTreeMap::new(),
        }
    }

    /// Build a state from the slider value and the `(name, value)` pairs of
    /// every checked control. Unknown control names are ignored.
    pub fn from_controls<I, N, V>(max_price: f64, checked: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let mut state = Self::new(max_price);
        for (name, value) in checked {
            state.select_control(name.as_ref(), value.as_ref());
        }
        state
    }

    /// Record a checked control. Returns `false` if `name` is not a facet.
    pub fn select_control(&mut self, name: &str, raw: &str) -> bool {
        match Facet::from_control_name(name) {
            Some(facet) => {
                self.select(facet, raw);
                true
            }
            None => false,
        }
    }

    pub fn select(&mut self, facet: Facet, raw: &str) {
        self.selections
            .entry(facet)
            .or_default()
            .push(FacetValue::parse(facet.kind(), raw));
    }

    pub fn with_selection(mut self, facet: Facet, raw: &str) -> Self {
        self.select(facet, raw);
        self
    }

    pub fn max_price(&self) -> f64 {
        self.max_price
    }

    pub fn values(&self, facet: Facet) -> &[FacetValue] {
        self.selections.get(&facet).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when no facet has a selection.
    pub fn has_no_selections(&self) -> bool {
        self.selections.values().all(Vec::is_empty)
    }

    /// Whether `product` passes the price ceiling and every non-empty facet.
    pub fn matches(&self, product: &Product) -> bool {
        // NaN on either side compares false and therefore keeps the product.
        if let Some(price) = product.price() {
            if price > self.max_price {
                return false;
            }
        }

        self.selections
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .all(|(facet, values)| facet_matches(*facet, values, product))
    }

    /// Indices (into `catalog`) of every matching product, in catalog order.
    pub fn select_indices(&self, catalog: &[Product]) -> Vec<usize> {
        catalog
            .iter()
            .enumerate()
            .filter(|(_, p)| self.matches(p))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn apply<'a>(&self, catalog: &'a [Product]) -> Vec<&'a Product> {
        catalog.iter().filter(|p| self.matches(p)).collect()
    }
}

fn facet_matches(facet: Facet, values: &[FacetValue], product: &Product) -> bool {
    match facet {
        Facet::Category => values.iter().any(|v| match v {
            FacetValue::Text(cat) => product.category().contains(cat.as_str()),
            _ => false,
        }),
        Facet::Brand => contains_text(values, product.brand()),
        Facet::Application => contains_text(values, product.application()),
        Facet::Socket => contains_text(values, product.socket()),
        Facet::Tech => contains_text(values, product.tech()),
        Facet::MemoryType => contains_text(values, product.memory_type()),
        Facet::Packaging => contains_text(values, product.packaging()),
        Facet::Cores => values.contains(&FacetValue::Integer(product.cores())),
        Facet::Tdp => values.contains(&FacetValue::Integer(product.tdp())),
        Facet::Threads => values.contains(&FacetValue::Integer(product.threads())),
        Facet::Cache => values.contains(&FacetValue::Integer(product.cache())),
        Facet::MaxMemorySize => values.contains(&FacetValue::Integer(product.max_memory_size())),
        Facet::BaseFreq => values.contains(&FacetValue::Float(product.base_freq())),
    }
}

fn contains_text(values: &[FacetValue], field: &str) -> bool {
    values
        .iter()
        .any(|v| matches!(v, FacetValue::Text(s) if s == field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductRecord;
    use serde_json::json;

    fn product(value: serde_json::Value) -> Product {
        Product::from_record(serde_json::from_value::<ProductRecord>(value).unwrap())
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(json!({
                "id": "cpu-101", "name": "Intel Core i9-13900K", "brand": "Intel",
                "category": "CPU Processors - Desktops", "application": "Gaming",
                "socket": "LGA1700", "cores": 24, "threads": 32, "cache": 36, "tdp": 125,
                "base_freq": 3.0, "tech": "7nm", "memory_type": "DDR5",
                "max_memory_size": 128, "packaging": "Boxed", "price": 189.0
            })),
            product(json!({
                "id": "cpu-102", "name": "AMD Ryzen 9 7950X", "brand": "AMD",
                "category": "CPU,Server", "application": "Desktop",
                "socket": "AM5", "cores": 16, "threads": 32, "cache": 64, "tdp": 170,
                "base_freq": 4.5, "tech": "5nm", "memory_type": "DDR5",
                "max_memory_size": 128, "packaging": "Boxed", "price": 699.0
            })),
            product(json!({
                "id": "cpu-104", "name": "AMD EPYC 9654", "brand": "AMD",
                "category": "Processors - Servers", "application": "Server",
                "socket": "SP5", "cores": 96, "threads": 192, "cache": 384, "tdp": 360,
                "base_freq": 2.7, "tech": "5nm", "memory_type": "DDR5",
                "max_memory_size": 2048, "packaging": "Tray", "price": 399.0
            })),
        ]
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        use shortlist_core::Entity;
        products.iter().map(|p| p.id().to_string()).collect()
    }

    #[test]
    fn empty_state_matches_everything() {
        let catalog = catalog();
        let state = FilterState::default();
        assert!(state.has_no_selections());
        assert_eq!(state.apply(&catalog).len(), 3);
    }

    #[test]
    fn price_ceiling_is_inclusive() {
        let catalog = catalog();
        let state = FilterState::new(399.0);
        assert_eq!(ids(&state.apply(&catalog)), vec!["cpu-101", "cpu-104"]);
    }

    #[test]
    fn nan_price_ceiling_excludes_nothing() {
        let catalog = catalog();
        let state = FilterState::new(f64::NAN);
        assert_eq!(state.apply(&catalog).len(), 3);
    }

    #[test]
    fn product_without_price_passes_ceiling() {
        let catalog = vec![product(json!({ "id": "x", "price": "call us" }))];
        assert_eq!(FilterState::new(1.0).apply(&catalog).len(), 1);
    }

    #[test]
    fn values_within_a_facet_are_ored() {
        let catalog = catalog();
        let state = FilterState::default()
            .with_selection(Facet::Socket, "AM5")
            .with_selection(Facet::Socket, "SP5");
        assert_eq!(ids(&state.apply(&catalog)), vec!["cpu-102", "cpu-104"]);
    }

    #[test]
    fn facets_are_anded() {
        let catalog = catalog();
        let state = FilterState::default()
            .with_selection(Facet::Brand, "AMD")
            .with_selection(Facet::Packaging, "Boxed");
        assert_eq!(ids(&state.apply(&catalog)), vec!["cpu-102"]);
    }

    #[test]
    fn category_matches_by_substring() {
        let catalog = catalog();
        let state = FilterState::default().with_selection(Facet::Category, "CPU");
        assert_eq!(ids(&state.apply(&catalog)), vec!["cpu-101", "cpu-102"]);

        let servers = FilterState::default().with_selection(Facet::Category, "Server");
        assert_eq!(ids(&servers.apply(&catalog)), vec!["cpu-102", "cpu-104"]);
    }

    #[test]
    fn brand_requires_exact_match() {
        let catalog = catalog();
        let state = FilterState::default().with_selection(Facet::Brand, "AM");
        assert!(state.apply(&catalog).is_empty());
    }

    #[test]
    fn numeric_facets_parse_control_values() {
        let catalog = catalog();
        let cores = FilterState::from_controls(f64::INFINITY, [("cores", "16")]);
        assert_eq!(ids(&cores.apply(&catalog)), vec!["cpu-102"]);

        let freq = FilterState::from_controls(f64::INFINITY, [("base_freq", "2.70")]);
        assert_eq!(ids(&freq.apply(&catalog)), vec!["cpu-104"]);

        let memory = FilterState::from_controls(f64::INFINITY, [("max_memory_size", "128")]);
        assert_eq!(ids(&memory.apply(&catalog)), vec!["cpu-101", "cpu-102"]);
    }

    #[test]
    fn unparseable_numeric_selection_matches_only_nan_fields() {
        let mut catalog = catalog();
        catalog.push(product(json!({ "id": "odd", "cores": "n/a" })));
        let state = FilterState::from_controls(f64::INFINITY, [("cores", "lots")]);
        assert_eq!(ids(&state.apply(&catalog)), vec!["odd"]);
    }

    #[test]
    fn unknown_controls_are_ignored() {
        let catalog = catalog();
        let mut state = FilterState::new(f64::INFINITY);
        assert!(!state.select_control("colour", "red"));
        assert!(state.has_no_selections());
        assert_eq!(state.apply(&catalog).len(), 3);
    }

    #[test]
    fn select_indices_follow_catalog_order() {
        let catalog = catalog();
        let state = FilterState::default().with_selection(Facet::Tech, "5nm");
        assert_eq!(state.select_indices(&catalog), vec![1, 2]);
    }

    #[test]
    fn facet_names_round_trip_through_from_str() {
        for facet in Facet::ALL {
            assert_eq!(facet.control_name().parse::<Facet>().unwrap(), facet);
        }
        assert_eq!(
            "colour".parse::<Facet>(),
            Err(DomainError::UnknownFacet("colour".into()))
        );
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        const BRANDS: [&str; 3] = ["Intel", "AMD", "Arm"];
        const SOCKETS: [&str; 3] = ["AM5", "LGA1700", "SP5"];
        const CATEGORIES: [&str; 3] = ["CPU Processors", "Processors - Servers", "CPU,Server"];

        fn arb_product() -> impl Strategy<Value = Product> {
            (
                0usize..3,
                0usize..3,
                0usize..3,
                prop::sample::select(vec![4i64, 8, 16, 24]),
                prop::sample::select(vec![2.5f64, 3.0, 4.5]),
                0u32..1500,
            )
                .prop_map(|(b, s, c, cores, freq, price)| {
                    product(json!({
                        "id": format!("p-{b}{s}{c}{cores}{price}"),
                        "brand": BRANDS[b],
                        "socket": SOCKETS[s],
                        "category": CATEGORIES[c],
                        "cores": cores,
                        "base_freq": freq,
                        "price": price as f64,
                    }))
                })
        }

        fn arb_state() -> impl Strategy<Value = FilterState> {
            (
                prop::collection::vec(prop::sample::select(BRANDS.to_vec()), 0..3),
                prop::collection::vec(prop::sample::select(SOCKETS.to_vec()), 0..3),
                prop::collection::vec(prop::sample::select(vec!["CPU", "Server", "Desk"]), 0..2),
                prop::collection::vec(prop::sample::select(vec!["4", "16", "24"]), 0..2),
                prop::collection::vec(prop::sample::select(vec!["3.0", "4.5"]), 0..2),
                0u32..1500,
            )
                .prop_map(|(brands, sockets, cats, cores, freqs, max)| {
                    let checked = brands
                        .into_iter()
                        .map(|v| ("brand", v))
                        .chain(sockets.into_iter().map(|v| ("socket", v)))
                        .chain(cats.into_iter().map(|v| ("category", v)))
                        .chain(cores.into_iter().map(|v| ("cores", v)))
                        .chain(freqs.into_iter().map(|v| ("base_freq", v)));
                    FilterState::from_controls(max as f64, checked)
                })
        }

        fn satisfies(state: &FilterState, p: &Product) -> bool {
            let price_ok = p.price().map_or(true, |price| price <= state.max_price());
            let text_ok = |facet: Facet, field: &str| {
                let values = state.values(facet);
                values.is_empty() || values.contains(&FacetValue::Text(field.to_string()))
            };
            let cats = state.values(Facet::Category);
            let cat_ok = cats.is_empty()
                || cats.iter().any(|v| match v {
                    FacetValue::Text(c) => p.category().contains(c.as_str()),
                    _ => false,
                });
            let cores = state.values(Facet::Cores);
            let cores_ok = cores.is_empty() || cores.contains(&FacetValue::Integer(p.cores()));
            let freqs = state.values(Facet::BaseFreq);
            let freq_ok = freqs.is_empty() || freqs.contains(&FacetValue::Float(p.base_freq()));

            price_ok
                && text_ok(Facet::Brand, p.brand())
                && text_ok(Facet::Socket, p.socket())
                && cat_ok
                && cores_ok
                && freq_ok
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 200,
                ..ProptestConfig::default()
            })]

            #[test]
            fn filtered_products_satisfy_every_constraint(
                catalog in prop::collection::vec(arb_product(), 0..40),
                state in arb_state(),
            ) {
                let kept = state.select_indices(&catalog);
                for (i, p) in catalog.iter().enumerate() {
                    prop_assert_eq!(kept.contains(&i), satisfies(&state, p));
                }
            }

            #[test]
            fn filtering_is_idempotent(
                catalog in prop::collection::vec(arb_product(), 0..40),
                state in arb_state(),
            ) {
                let first = state.select_indices(&catalog);
                let second = state.select_indices(&catalog);
                prop_assert_eq!(&first, &second);
                prop_assert!(first.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }
}

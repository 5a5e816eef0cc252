use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use shortlist_core::{Entity, ProductId};

/// Description shown when the backend sends none (or an empty one).
pub const DEFAULT_DESCRIPTION: &str = "No description available.";

/// A numeric field as it arrives on the wire.
///
/// The backend is loose about types: counts and prices may be JSON numbers,
/// numeric strings (`"24"`, `"4.5GHz"`), `null`, or absent. Anything else
/// (booleans, arrays, objects) is read as [`WireNumber::Missing`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WireNumber {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl WireNumber {
    /// Integer coercion: keeps the leading integer, truncating fractions.
    ///
    /// Returns `None` (not-a-number) when there is no numeric prefix.
    pub fn to_int(&self) -> Option<i64> {
        match self {
            WireNumber::Number(n) if n.is_finite() => {
                let truncated = n.trunc();
                if truncated.abs() < i64::MAX as f64 {
                    Some(truncated as i64)
                } else {
                    None
                }
            }
            WireNumber::Number(_) => None,
            WireNumber::Text(s) => parse_int_prefix(s),
            WireNumber::Missing => None,
        }
    }

    /// Float coercion: keeps the leading decimal number.
    ///
    /// Returns `None` (not-a-number) when there is no numeric prefix.
    pub fn to_float(&self) -> Option<f64> {
        match self {
            WireNumber::Number(n) if n.is_nan() => None,
            WireNumber::Number(n) => Some(*n),
            WireNumber::Text(s) => parse_float_prefix(s),
            WireNumber::Missing => None,
        }
    }
}

impl<'de> Deserialize<'de> for WireNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match LooseValue::deserialize(deserializer)? {
            LooseValue::Integer(n) => WireNumber::Number(n as f64),
            LooseValue::Float(n) => WireNumber::Number(n),
            LooseValue::Text(s) => WireNumber::Text(s),
            LooseValue::Flag(_) | LooseValue::Other(_) => WireNumber::Missing,
        })
    }
}

/// Any JSON value, split by the shapes the coercions care about.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Flag(bool),
    Other(IgnoredAny),
}

/// Text fields accept scalars of any type (`101` becomes `"101"`); null,
/// arrays and objects are treated as absent.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match LooseValue::deserialize(deserializer)? {
        LooseValue::Text(s) => Some(s),
        LooseValue::Integer(n) => Some(n.to_string()),
        LooseValue::Float(n) => Some(n.to_string()),
        LooseValue::Flag(b) => Some(b.to_string()),
        LooseValue::Other(_) => None,
    })
}

/// Truthiness of the shortlist flag: `true`, non-zero numbers and non-empty
/// strings are set.
fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(match LooseValue::deserialize(deserializer)? {
        LooseValue::Flag(b) => Some(b),
        LooseValue::Integer(n) => Some(n != 0),
        LooseValue::Float(n) => Some(n != 0.0 && !n.is_nan()),
        LooseValue::Text(s) => Some(!s.is_empty()),
        LooseValue::Other(_) => None,
    })
}

impl From<f64> for WireNumber {
    fn from(value: f64) -> Self {
        WireNumber::Number(value)
    }
}

impl From<&str> for WireNumber {
    fn from(value: &str) -> Self {
        WireNumber::Text(value.to_string())
    }
}

/// Parse the leading integer of `s` (leading whitespace, optional sign,
/// decimal digits or a `0x` hex literal). Trailing garbage is ignored.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = if rest.len() > 2 && (rest.starts_with("0x") || rest.starts_with("0X")) {
        (16, &rest[2..])
    } else {
        (10, rest)
    };

    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = i64::from_str_radix(&digits[..end], radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse the leading decimal number of `s` (leading whitespace, optional sign,
/// digits with an optional fraction and exponent, or `Infinity`).
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        return s[..end + "Infinity".len()]
            .replace("Infinity", "inf")
            .parse()
            .ok();
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Product as served by `/api/products/all`, before normalization.
///
/// Decoding never fails on a field's type, so one odd record cannot reject
/// the whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub application: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub socket: Option<String>,
    #[serde(default)]
    pub cores: WireNumber,
    #[serde(default)]
    pub tdp: WireNumber,
    #[serde(default)]
    pub threads: WireNumber,
    #[serde(default)]
    pub cache: WireNumber,
    #[serde(default)]
    pub base_freq: WireNumber,
    #[serde(default, deserialize_with = "lenient_text")]
    pub tech: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub memory_type: Option<String>,
    #[serde(default)]
    pub max_memory_size: WireNumber,
    #[serde(default, deserialize_with = "lenient_text")]
    pub packaging: Option<String>,
    #[serde(default)]
    pub price: WireNumber,
    #[serde(default, deserialize_with = "lenient_text")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default, rename = "isShortlisted", deserialize_with = "lenient_flag")]
    pub is_shortlisted: Option<bool>,
}

/// A normalized catalog product.
///
/// Numeric fields are `None` when the wire value had no numeric prefix; such a
/// value never equals a concrete filter value and renders as `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    id: ProductId,
    name: String,
    brand: String,
    category: String,
    application: String,
    socket: String,
    cores: Option<i64>,
    tdp: Option<i64>,
    threads: Option<i64>,
    cache: Option<i64>,
    base_freq: Option<f64>,
    tech: String,
    memory_type: String,
    max_memory_size: Option<i64>,
    packaging: String,
    price: Option<f64>,
    image: String,
    description: String,
    shortlisted: bool,
}

impl Product {
    pub fn from_record(record: ProductRecord) -> Self {
        let description = record
            .description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

        Self {
            id: record.id.unwrap_or_default().into(),
            name: record.name.unwrap_or_default(),
            brand: record.brand.unwrap_or_default(),
            category: record.category.unwrap_or_default(),
            application: record.application.unwrap_or_default(),
            socket: record.socket.unwrap_or_default(),
            cores: record.cores.to_int(),
            tdp: record.tdp.to_int(),
            threads: record.threads.to_int(),
            cache: record.cache.to_int(),
            base_freq: record.base_freq.to_float(),
            tech: record.tech.unwrap_or_default(),
            memory_type: record.memory_type.unwrap_or_default(),
            max_memory_size: record.max_memory_size.to_int(),
            packaging: record.packaging.unwrap_or_default(),
            price: record.price.to_float(),
            image: record.image.unwrap_or_default(),
            description,
            shortlisted: record.is_shortlisted.unwrap_or(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn application(&self) -> &str {
        &self.application
    }

    pub fn socket(&self) -> &str {
        &self.socket
    }

    pub fn cores(&self) -> Option<i64> {
        self.cores
    }

    pub fn tdp(&self) -> Option<i64> {
        self.tdp
    }

    pub fn threads(&self) -> Option<i64> {
        self.threads
    }

    pub fn cache(&self) -> Option<i64> {
        self.cache
    }

    pub fn base_freq(&self) -> Option<f64> {
        self.base_freq
    }

    pub fn tech(&self) -> &str {
        &self.tech
    }

    pub fn memory_type(&self) -> &str {
        &self.memory_type
    }

    pub fn max_memory_size(&self) -> Option<i64> {
        self.max_memory_size
    }

    pub fn packaging(&self) -> &str {
        &self.packaging
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_shortlisted(&self) -> bool {
        self.shortlisted
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self::from_record(record)
    }
}

/// Normalize a whole wire catalog, preserving order.
pub fn normalize_catalog(records: impl IntoIterator<Item = ProductRecord>) -> Vec<Product> {
    records.into_iter().map(Product::from_record).collect()
}

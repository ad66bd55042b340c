//! Item pool loading and record validation.
//!
//! Item files are JSON (an array of records, or an object with an `items` /
//! `products` array) or CSV with a header row. Field names accept the common
//! listing-export spellings (`productName`, `productPrice`, `productUrl`,
//! `productImage`, ...).
//!
//! Records missing a title, price, or URL are rejected and reported on the
//! pool instead of failing the load. Later records whose explicit id is
//! already in the pool are rejected as duplicates. Generated ids skip past
//! ids that are taken.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use weave_model::{Item, ItemId};

use crate::error::{IngestError, Result};

/// Options applied while building items from raw records.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Prefix for item URLs that start with `/`.
    pub base_url: Option<String>,
}

impl IngestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = (!base_url.trim().is_empty()).then_some(base_url);
        self
    }
}

/// Why a record did not make it into the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    MissingTitle,
    MissingPrice,
    InvalidPrice(String),
    MissingUrl,
    DuplicateId(ItemId),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTitle => f.write_str("missing title"),
            Self::MissingPrice => f.write_str("missing price"),
            Self::InvalidPrice(raw) => write!(f, "invalid price {raw:?}"),
            Self::MissingUrl => f.write_str("missing url"),
            Self::DuplicateId(id) => write!(f, "duplicate id {id}"),
        }
    }
}

/// A record that was dropped during ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    pub source: PathBuf,
    /// Zero-based record index within its source file.
    pub index: usize,
    pub reason: RejectReason,
}

/// Validated items plus the records that were dropped on the way.
#[derive(Debug, Clone, Default)]
pub struct ItemPool {
    pub items: Vec<Item>,
    pub rejected: Vec<RejectedRecord>,
}

impl ItemPool {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn dropped(&self) -> usize {
        self.rejected.len()
    }
}

/// A scalar that may arrive as a number or as text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawScalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawScalar {
    fn into_text(self) -> String {
        match self {
            Self::Int(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Text(value) => value,
        }
    }
}

/// One record as read from a source, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawItem {
    #[serde(default, alias = "productId", alias = "product_id")]
    id: Option<RawScalar>,
    #[serde(default, alias = "name", alias = "productName", alias = "product_name")]
    title: Option<String>,
    #[serde(default, alias = "productPrice", alias = "product_price")]
    price: Option<RawScalar>,
    #[serde(default, alias = "productUrl", alias = "product_url", alias = "link")]
    url: Option<String>,
    #[serde(
        default,
        alias = "image",
        alias = "image_url",
        alias = "imageUrl",
        alias = "productImage"
    )]
    image_ref: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonItems {
    List(Vec<RawItem>),
    Wrapped {
        #[serde(alias = "products")]
        items: Vec<RawItem>,
    },
}

const ID_COLUMNS: &[&str] = &["id", "productId", "product_id"];
const TITLE_COLUMNS: &[&str] = &["title", "name", "productName", "product_name"];
const PRICE_COLUMNS: &[&str] = &["price", "productPrice", "product_price"];
const URL_COLUMNS: &[&str] = &["url", "productUrl", "product_url", "link"];
const IMAGE_COLUMNS: &[&str] = &[
    "image_ref",
    "image",
    "image_url",
    "imageUrl",
    "productImage",
];

/// Loads and validates items from one or more files, in argument order.
///
/// Generated ids count records across all files so they stay unique.
pub fn load_items(paths: &[PathBuf], options: &IngestOptions) -> Result<ItemPool> {
    let mut builder = ItemPoolBuilder::new(options);
    for path in paths {
        let records = read_records(path)?;
        debug!(path = %path.display(), records = records.len(), "item source read");
        for (index, raw) in records.into_iter().enumerate() {
            builder.push(path, index, raw);
        }
    }
    Ok(builder.finish())
}

fn read_records(path: &Path) -> Result<Vec<RawItem>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("json") => {
            let contents =
                std::fs::read_to_string(path).map_err(|e| IngestError::read(path, e))?;
            parse_json_records(&contents).map_err(|source| IngestError::JsonParse {
                path: path.to_path_buf(),
                source,
            })
        }
        Some("csv") => {
            let bytes = std::fs::read(path).map_err(|e| IngestError::read(path, e))?;
            parse_csv_records(&bytes).map_err(|source| IngestError::CsvParse {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

pub(crate) fn parse_json_records(contents: &str) -> serde_json::Result<Vec<RawItem>> {
    let parsed: JsonItems = serde_json::from_str(contents)?;
    Ok(match parsed {
        JsonItems::List(items) | JsonItems::Wrapped { items } => items,
    })
}

pub(crate) fn parse_csv_records(bytes: &[u8]) -> std::result::Result<Vec<RawItem>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().trim_matches('\u{feff}').to_string())
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let get = |names: &[&str]| -> Option<String> {
            headers
                .iter()
                .position(|h| names.iter().any(|name| h.eq_ignore_ascii_case(name)))
                .and_then(|i| row.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        records.push(RawItem {
            id: get(ID_COLUMNS).map(RawScalar::Text),
            title: get(TITLE_COLUMNS),
            price: get(PRICE_COLUMNS).map(RawScalar::Text),
            url: get(URL_COLUMNS),
            image_ref: get(IMAGE_COLUMNS),
        });
    }
    Ok(records)
}

/// Accumulates validated items across sources.
struct ItemPoolBuilder<'a> {
    options: &'a IngestOptions,
    seen: BTreeSet<ItemId>,
    next_index: usize,
    pool: ItemPool,
}

impl<'a> ItemPoolBuilder<'a> {
    fn new(options: &'a IngestOptions) -> Self {
        Self {
            options,
            seen: BTreeSet::new(),
            next_index: 0,
            pool: ItemPool::default(),
        }
    }

    fn push(&mut self, source: &Path, index: usize, raw: RawItem) {
        let global_index = self.next_index;
        self.next_index += 1;
        match self.validate(global_index, raw) {
            Ok(item) => {
                self.seen.insert(item.id.clone());
                self.pool.items.push(item);
            }
            Err(reason) => {
                warn!(
                    source = %source.display(),
                    index,
                    reason = %reason,
                    "item record rejected"
                );
                self.pool.rejected.push(RejectedRecord {
                    source: source.to_path_buf(),
                    index,
                    reason,
                });
            }
        }
    }

    fn validate(&self, global_index: usize, raw: RawItem) -> std::result::Result<Item, RejectReason> {
        let title = non_blank(raw.title).ok_or(RejectReason::MissingTitle)?;
        let price = parse_price(raw.price.ok_or(RejectReason::MissingPrice)?)?;
        let url = non_blank(raw.url).ok_or(RejectReason::MissingUrl)?;
        let id = match raw
            .id
            .map(RawScalar::into_text)
            .and_then(|text| ItemId::new(text).ok())
        {
            Some(id) if self.seen.contains(&id) => return Err(RejectReason::DuplicateId(id)),
            Some(id) => id,
            None => self.generated_id(global_index),
        };
        Ok(Item::new(
            id,
            title,
            price,
            resolve_url(&url, self.options.base_url.as_deref()),
            non_blank(raw.image_ref).unwrap_or_default(),
        ))
    }

    fn generated_id(&self, global_index: usize) -> ItemId {
        let mut attempt = 0;
        loop {
            let id = ItemId::from_index_attempt(global_index, attempt);
            if !self.seen.contains(&id) {
                return id;
            }
            attempt += 1;
        }
    }

    fn finish(self) -> ItemPool {
        self.pool
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Normalizes a price to a non-negative integer.
///
/// Text prices may carry thousands separators and a currency marker on
/// either side (`"1,350,000"`, `"1350000원"`, `"₩ 19,900"`). Fractional
/// values are rounded.
pub(crate) fn parse_price(raw: RawScalar) -> std::result::Result<i64, RejectReason> {
    match raw {
        RawScalar::Int(value) if value >= 0 => Ok(value),
        RawScalar::Int(value) => Err(RejectReason::InvalidPrice(value.to_string())),
        RawScalar::Float(value) => float_price(value, || value.to_string()),
        RawScalar::Text(text) => {
            let compact: String = text
                .chars()
                .filter(|ch| !ch.is_whitespace() && *ch != ',')
                .collect();
            if compact.is_empty() {
                return Err(RejectReason::MissingPrice);
            }
            let number = compact
                .trim_start_matches(|ch: char| !(ch.is_ascii_digit() || ch == '-' || ch == '.'))
                .trim_end_matches(|ch: char| !ch.is_ascii_digit());
            if let Ok(value) = number.parse::<i64>() {
                return parse_price(RawScalar::Int(value))
                    .map_err(|_| RejectReason::InvalidPrice(text.clone()));
            }
            match number.parse::<f64>() {
                Ok(value) => float_price(value, || text.clone()),
                Err(_) => Err(RejectReason::InvalidPrice(text)),
            }
        }
    }
}

fn float_price(
    value: f64,
    raw: impl FnOnce() -> String,
) -> std::result::Result<i64, RejectReason> {
    if value.is_finite() && value >= 0.0 && value <= i64::MAX as f64 {
        Ok(value.round() as i64)
    } else {
        Err(RejectReason::InvalidPrice(raw()))
    }
}

/// Prefixes site-relative URLs (`/vp/products/..`) with `base_url`.
pub(crate) fn resolve_url(url: &str, base_url: Option<&str>) -> String {
    match base_url {
        Some(base) if url.starts_with('/') && !url.starts_with("//") => {
            format!("{}{}", base.trim_end_matches('/'), url)
        }
        _ => url.to_string(),
    }
}

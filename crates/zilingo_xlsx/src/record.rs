//! Product record: two-tier attribute resolution and computed attributes.
//!
//! Simple attributes go through [`ProductRecord::resolve`] (primary table,
//! then fallback table, then empty string). Computed attributes (`price`,
//! `special_price`, `stock`, `ship_fee`, `sizes`, `material`, `image_urls`)
//! never use that lookup and implement their own formula.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::conf::{
    C_FIELD_IMAGE_MARKER, C_FIELD_PRICE, C_MATERIAL_DEFAULT, N_SHIP_FEE_DEFAULT,
    N_SIZE_COUNT_MAX, N_STOCK_DEFAULT,
};
use crate::spec::{Result, SpecPricePolicy, SpecSizeRun, SpecSpecialPricePolicy};
use crate::table::KeyValueTable;
use crate::util::{normalize_field_name, parse_price_magnitude};

////////////////////////////////////////////////////////////////////////////////
// #region SimpleAttributes

/// Attributes resolved through the primary/fallback lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumProductAttribute {
    Name,
    Desc,
    Sku,
    Color,
    GemType,
    Polishing,
    StoneShape,
    MetalWeight,
    Warehouse,
    WeightUnit,
    WeightValue,
}

impl EnumProductAttribute {
    pub const ALL: [EnumProductAttribute; 11] = [
        Self::Name,
        Self::Desc,
        Self::Sku,
        Self::Color,
        Self::GemType,
        Self::Polishing,
        Self::StoneShape,
        Self::MetalWeight,
        Self::Warehouse,
        Self::WeightUnit,
        Self::WeightValue,
    ];

    /// Table key of the attribute.
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Desc => "Desc",
            Self::Sku => "Sku",
            Self::Color => "Color",
            Self::GemType => "GemType",
            Self::Polishing => "Polishing",
            Self::StoneShape => "StoneShape",
            Self::MetalWeight => "MetalWeight",
            Self::Warehouse => "Warehouse",
            Self::WeightUnit => "WeightUnit",
            Self::WeightValue => "WeightValue",
        }
    }

    /// Look up an attribute by logical name (`"gem_type"`, `"Sku"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let c_key = normalize_field_name(name);
        Self::ALL.into_iter().find(|attr| attr.key() == c_key)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FallbackSource

#[derive(Debug)]
enum EnumFallbackSource {
    None,
    Table(KeyValueTable),
    Path(PathBuf),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ProductRecord

/// Resolved attribute set of one product.
#[derive(Debug)]
pub struct ProductRecord {
    table_primary: KeyValueTable,
    source_fallback: EnumFallbackSource,
    table_fallback: OnceLock<KeyValueTable>,
}

impl ProductRecord {
    /// Record without fallback configuration.
    pub fn new(table_primary: KeyValueTable) -> Self {
        Self {
            table_primary,
            source_fallback: EnumFallbackSource::None,
            table_fallback: OnceLock::new(),
        }
    }

    /// Record with an already loaded fallback table.
    pub fn with_fallback_table(table_primary: KeyValueTable, table_fallback: KeyValueTable) -> Self {
        Self {
            table_primary,
            source_fallback: EnumFallbackSource::Table(table_fallback),
            table_fallback: OnceLock::new(),
        }
    }

    /// Record whose fallback config CSV is read on first fallback lookup.
    pub fn with_fallback_path(table_primary: KeyValueTable, path: impl Into<PathBuf>) -> Self {
        Self {
            table_primary,
            source_fallback: EnumFallbackSource::Path(path.into()),
            table_fallback: OnceLock::new(),
        }
    }

    /// Load the primary CSV and attach an optional fallback config path.
    pub fn from_csv_path(path_csv: impl AsRef<Path>, path_config: Option<&Path>) -> Result<Self> {
        let table_primary = KeyValueTable::from_path(path_csv)?;
        Ok(match path_config {
            Some(path) => Self::with_fallback_path(table_primary, path),
            None => Self::new(table_primary),
        })
    }

    pub fn primary(&self) -> &KeyValueTable {
        &self.table_primary
    }

    /// Fallback table, loading it on first access.
    ///
    /// A missing config file is an empty table; so is an unreadable one,
    /// after a warning.
    pub fn fallback(&self) -> &KeyValueTable {
        match &self.source_fallback {
            EnumFallbackSource::Table(table) => table,
            EnumFallbackSource::None => self.table_fallback.get_or_init(KeyValueTable::default),
            EnumFallbackSource::Path(path) => self.table_fallback.get_or_init(|| {
                if !path.exists() {
                    tracing::debug!(path = %path.display(), "fallback config not found");
                    return KeyValueTable::default();
                }
                KeyValueTable::from_path(path).unwrap_or_else(|err| {
                    tracing::warn!(path = %path.display(), %err, "ignoring unreadable fallback config");
                    KeyValueTable::default()
                })
            }),
        }
    }

    /// Primary value when non-empty, else fallback value, else `""`.
    pub fn resolve(&self, field: &str) -> String {
        if let Some(value) = self.table_primary.get(field)
            && !value.is_empty()
        {
            return value.to_string();
        }
        self.fallback().get(field).unwrap_or_default().to_string()
    }

    /// Resolve one of the enumerated simple attributes.
    pub fn attribute(&self, attr: EnumProductAttribute) -> String {
        self.resolve(attr.key())
    }

    /// Resolve an arbitrary logical name after key normalization.
    pub fn get(&self, name: &str) -> String {
        self.resolve(&normalize_field_name(name))
    }

    pub fn name(&self) -> String {
        self.attribute(EnumProductAttribute::Name)
    }

    pub fn sku(&self) -> String {
        self.attribute(EnumProductAttribute::Sku)
    }

    /// Special price with default policy.
    pub fn special_price(&self) -> f64 {
        self.special_price_by(&SpecSpecialPricePolicy::default())
    }

    /// `floor(amount * multiple) + suffix`, with `min_price` replacing a
    /// non-positive scaled amount.
    ///
    /// Reads only the primary `Price` field. An absent or malformed field
    /// counts as amount 0.
    pub fn special_price_by(&self, policy: &SpecSpecialPricePolicy) -> f64 {
        let c_raw = self.table_primary.get(C_FIELD_PRICE).unwrap_or_default();
        let n_amount = parse_price_magnitude(c_raw).unwrap_or_else(|| {
            tracing::debug!(raw = c_raw, "price unavailable, using minimum price");
            0.0
        });

        let mut n_price = n_amount * policy.multiple;
        if n_price.is_nan() || n_price <= 0.0 {
            n_price = policy.min_price;
        }
        n_price.floor() + policy.suffix
    }

    /// Regular price with default policy.
    pub fn price(&self) -> f64 {
        self.price_by(&SpecPricePolicy::default())
    }

    /// `floor(special_price() * multiple) + suffix`.
    pub fn price_by(&self, policy: &SpecPricePolicy) -> f64 {
        (self.special_price() * policy.multiple).floor() + policy.suffix
    }

    pub fn stock(&self) -> i64 {
        self.stock_or(N_STOCK_DEFAULT)
    }

    /// Stock does not vary per product; the argument is returned as is.
    pub fn stock_or(&self, stock: i64) -> i64 {
        stock
    }

    pub fn ship_fee(&self) -> f64 {
        self.ship_fee_or(N_SHIP_FEE_DEFAULT)
    }

    pub fn ship_fee_or(&self, fee: f64) -> f64 {
        fee
    }

    /// Default US size run, 4 to 12 by 0.5.
    pub fn sizes(&self) -> Vec<f64> {
        self.sizes_by(&SpecSizeRun::default())
    }

    /// Inclusive arithmetic run from `min` to `max`.
    ///
    /// Counts down when `min > max`. The sign of `step` is ignored; a zero or
    /// non-finite step yields an empty run, as does a run longer than
    /// `N_SIZE_COUNT_MAX` sizes.
    pub fn sizes_by(&self, run: &SpecSizeRun) -> Vec<f64> {
        let n_step = run.step.abs();
        if n_step == 0.0 || !n_step.is_finite() || !run.min.is_finite() || !run.max.is_finite() {
            return vec![];
        }

        let n_sign = if run.min <= run.max { 1.0 } else { -1.0 };
        let n_span = ((run.max - run.min).abs() / n_step + 1e-9).floor();
        if !n_span.is_finite() || n_span >= N_SIZE_COUNT_MAX as f64 {
            tracing::warn!(
                min = run.min,
                max = run.max,
                step = run.step,
                "size run exceeds {N_SIZE_COUNT_MAX} sizes, returning empty run"
            );
            return vec![];
        }

        let n_count = n_span as usize;
        (0..=n_count)
            .map(|n_idx| run.min + n_sign * n_idx as f64 * n_step)
            .collect()
    }

    pub fn material(&self) -> &'static str {
        C_MATERIAL_DEFAULT
    }

    /// Values of every primary field whose key contains `Image`, in table order.
    pub fn image_urls(&self) -> Vec<String> {
        self.table_primary
            .iter()
            .filter(|(key, _)| key.contains(C_FIELD_IMAGE_MARKER))
            .map(|(_, value)| value.to_string())
            .collect()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

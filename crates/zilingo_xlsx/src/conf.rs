//! Constants and default presets.

use std::borrow::Cow;

use crate::spec::SpecCellFormat;

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: u32 = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: u16 = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Record field holding `"<currency> <amount>"`.
pub const C_FIELD_PRICE: &str = "Price";
/// Substring marking image URL fields.
pub const C_FIELD_IMAGE_MARKER: &str = "Image";
/// Localised "metal"; the template only accepts listed material values.
pub const C_MATERIAL_DEFAULT: &str = "金属";

pub const N_SPECIAL_PRICE_MULTIPLE: f64 = 5.0;
pub const N_SPECIAL_PRICE_SUFFIX: f64 = 0.95;
pub const N_SPECIAL_PRICE_MIN: f64 = 100.0;
pub const N_PRICE_MULTIPLE: f64 = 2.2;
pub const N_PRICE_SUFFIX: f64 = 0.95;

pub const N_STOCK_DEFAULT: i64 = 10;
pub const N_SHIP_FEE_DEFAULT: f64 = 20.0;

/// US ring size run.
pub const N_SIZE_MIN: f64 = 4.0;
pub const N_SIZE_MAX: f64 = 12.0;
pub const N_SIZE_STEP: f64 = 0.5;
/// Longest size run; one size per worksheet column at most.
pub const N_SIZE_COUNT_MAX: usize = N_NCOLS_EXCEL_MAX as usize;

/// Bold centered banner style shared by rows 1-4 of the template.
pub static FMT_TEMPLATE_BANNER: SpecCellFormat = SpecCellFormat {
    font_name: Some(Cow::Borrowed("Calibri (Body)")),
    font_size: Some(12),
    bold: Some(true),
    align: Some(Cow::Borrowed("center")),
};

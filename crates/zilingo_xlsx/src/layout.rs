//! Zilingo bulk-upload sheet layout.
//!
//! The layout is a compatibility contract with the marketplace ingestion
//! pipeline: sheet name, labels, merge geometry and coordinates must not
//! drift. Keep every coordinate in this single literal.

use self::EnumFixedCell::{Blank, Number};
use self::EnumTemplateField::{Attribute, Material, Price};
use crate::conf::FMT_TEMPLATE_BANNER;
use crate::record::EnumProductAttribute;
use crate::record::EnumProductAttribute as Attr;
use crate::spec::{ProductXlsxError, Result, SpecCellFormat, SpecCellRange};
use crate::util::{parse_cell_range, parse_cell_ref, parse_column_cell};

////////////////////////////////////////////////////////////////////////////////
// #region LayoutModel

/// Literal cells, merges and styles written together as one step.
#[derive(Debug)]
pub struct SpecTemplateBand {
    /// `(A1 reference, text)` pairs.
    pub cells: &'static [(&'static str, &'static str)],
    /// A1 ranges merged after the cells are written.
    pub merge_regions: &'static [&'static str],
    /// A1 ranges styled after merging.
    pub style_rules: &'static [(&'static str, &'static SpecCellFormat)],
}

/// Per-product value placed in the record row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumTemplateField {
    /// Simple attribute resolved with fallback.
    Attribute(EnumProductAttribute),
    /// Computed regular price.
    Price,
    /// Computed material literal.
    Material,
}

/// Constant record-row cell required by the ingestion validator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnumFixedCell {
    /// Empty string.
    Blank,
    /// Fixed number.
    Number(f64),
}

/// Complete description of the target sheet.
#[derive(Debug)]
pub struct SpecTemplateLayout {
    pub sheet_name: &'static str,
    /// Document title is `title_prefix` followed by the SKU.
    pub title_prefix: &'static str,
    /// Cell receiving the document title.
    pub title_cell: &'static str,
    pub title_band: SpecTemplateBand,
    /// Rows 2 and 3, in write order.
    pub banner_bands: &'static [SpecTemplateBand],
    /// One-based header row.
    pub header_row: u32,
    /// `(column, label)` pairs.
    pub header_labels: &'static [(&'static str, &'static str)],
    pub header_band: SpecTemplateBand,
    /// One-based product row.
    pub record_row: u32,
    pub field_cell_map: &'static [(&'static str, EnumTemplateField)],
    pub fixed_values: &'static [(&'static str, EnumFixedCell)],
    /// Consecutive image slots, filled in image order.
    pub image_columns: &'static [&'static str],
}

impl SpecTemplateLayout {
    /// Title written into the sheet and the document properties.
    pub fn derive_title(&self, sku: &str) -> String {
        format!("{}{sku}", self.title_prefix)
    }

    fn bands(&self) -> impl Iterator<Item = &SpecTemplateBand> {
        std::iter::once(&self.title_band)
            .chain(self.banner_bands.iter())
            .chain(std::iter::once(&self.header_band))
    }

    /// Parse every reference and reject overlapping merges.
    pub fn validate(&self) -> Result<()> {
        parse_cell_ref(self.title_cell)?;

        let mut l_merges: Vec<SpecCellRange> = Vec::new();
        for band in self.bands() {
            for (c_cell, _) in band.cells {
                parse_cell_ref(c_cell)?;
            }
            for c_range in band.merge_regions {
                let range = parse_cell_range(c_range)?;
                if let Some(other) = l_merges.iter().find(|other| other.overlaps(&range)) {
                    return Err(ProductXlsxError::InvalidLayout(format!(
                        "Merge {range} overlaps {other}"
                    )));
                }
                l_merges.push(range);
            }
            for (c_range, _) in band.style_rules {
                parse_cell_range(c_range)?;
            }
        }

        for (c_col, _) in self.header_labels {
            parse_column_cell(c_col, self.header_row)?;
        }
        for c_col in self
            .field_cell_map
            .iter()
            .map(|(c_col, _)| c_col)
            .chain(self.fixed_values.iter().map(|(c_col, _)| c_col))
            .chain(self.image_columns.iter())
        {
            parse_column_cell(c_col, self.record_row)?;
        }
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ZilingoTemplate

/// Stock placeholder preset in every size column.
const N_STOCK_PLACEHOLDER: f64 = 10.0;

pub static ZILINGO_TEMPLATE: SpecTemplateLayout = SpecTemplateLayout {
    sheet_name: "WJEART-F,ARR-S,US",
    title_prefix: "Zilingo Product - ",
    title_cell: "A1",
    title_band: SpecTemplateBand {
        cells: &[],
        merge_regions: &["A1:U1"],
        style_rules: &[("A1:BC1", &FMT_TEMPLATE_BANNER)],
    },
    banner_bands: &[
        SpecTemplateBand {
            cells: &[
                ("D2", "Version:12"),
                ("E2", "Locale: zh-Hans"),
                ("F2", "CHV: 1.3.3"),
                ("G2", "PV:B2C"),
                ("H2", "AT:REGULAR"),
                ("I2", "FTS:F,ARR-S,US"),
            ],
            merge_regions: &[],
            style_rules: &[("D2:I2", &FMT_TEMPLATE_BANNER)],
        },
        SpecTemplateBand {
            cells: &[
                ("P3", "Enter the Stock"),
                ("AN3", "Weight （选填）"),
                ("AP3", "Dimensions （选填）"),
                ("AT3", "Bulk Image Upload (Provide at least one link)"),
            ],
            merge_regions: &["P3:AL3", "AN3:AO3", "AP3:AS3", "AT3:BC3"],
            style_rules: &[("P3:BC3", &FMT_TEMPLATE_BANNER)],
        },
    ],
    header_row: 4,
    header_labels: &[
        ("A", "颜色"),
        ("B", "名称"),
        ("C", "描述"),
        ("D", "Brand （选填）"),
        ("E", "卖家SKU编号"),
        ("F", "原生宝石类型 （选填）"),
        ("G", "NULL"),
        ("H", "NULL"),
        ("I", "抛光 （选填）"),
        ("J", "材质 (Select at least one)"),
        ("K", "NULL"),
        ("L", "NULL"),
        ("M", "宝石形状 （选填）"),
        ("N", "金属重量 （选填）"),
        ("O", "Warehouse"),
        ("P", "3 美国"),
        ("Q", "3.5美国"),
        ("R", "4 美国"),
        ("S", "4.5美国"),
        ("T", "5 美国"),
        ("U", "5.5美国"),
        ("V", "6 美国"),
        ("W", "6.5美国"),
        ("X", "7 美国"),
        ("Y", "7.5美国"),
        ("Z", "8 美国"),
        ("AA", "8.5美国"),
        ("AB", "9 美国"),
        ("AC", "9.5美国"),
        ("AD", "10美国"),
        ("AE", "10.5美国"),
        ("AF", "11美国"),
        ("AG", "11.5美国"),
        ("AH", "12美国"),
        ("AI", "12.5美国"),
        ("AJ", "13美国"),
        ("AK", "13.5美国"),
        ("AL", "14美国"),
        ("AM", "价格 (in CNY)"),
        ("AN", "Weight Unit"),
        ("AO", "Value"),
        ("AP", "Dimension Unit"),
        ("AQ", "Length"),
        ("AR", "Breadth"),
        ("AS", "Height"),
        ("AT", "图片 1"),
        ("AU", "图片 2"),
        ("AV", "图片 3"),
        ("AW", "图片 4"),
        ("AX", "图片 5"),
        ("AY", "图片 6"),
        ("AZ", "图片 7"),
        ("BA", "图片 8"),
        ("BB", "图片 9"),
        ("BC", "图片 10"),
    ],
    header_band: SpecTemplateBand {
        cells: &[],
        merge_regions: &["F4:H4", "J4:L4"],
        style_rules: &[("A4:BC4", &FMT_TEMPLATE_BANNER)],
    },
    record_row: 5,
    field_cell_map: &[
        ("A", Attribute(Attr::Color)),
        ("B", Attribute(Attr::Name)),
        ("C", Attribute(Attr::Desc)),
        ("E", Attribute(Attr::Sku)),
        ("F", Attribute(Attr::GemType)),
        ("I", Attribute(Attr::Polishing)),
        ("J", Material),
        ("M", Attribute(Attr::StoneShape)),
        ("N", Attribute(Attr::MetalWeight)),
        ("O", Attribute(Attr::Warehouse)),
        ("AM", Price),
        ("AN", Attribute(Attr::WeightUnit)),
        ("AO", Attribute(Attr::WeightValue)),
    ],
    fixed_values: &[
        ("D", Blank),
        ("P", Blank),
        ("Q", Blank),
        ("R", Number(N_STOCK_PLACEHOLDER)),
        ("S", Number(N_STOCK_PLACEHOLDER)),
        ("T", Number(N_STOCK_PLACEHOLDER)),
        ("U", Number(N_STOCK_PLACEHOLDER)),
        ("V", Number(N_STOCK_PLACEHOLDER)),
        ("W", Number(N_STOCK_PLACEHOLDER)),
        ("X", Number(N_STOCK_PLACEHOLDER)),
        ("Y", Number(N_STOCK_PLACEHOLDER)),
        ("Z", Number(N_STOCK_PLACEHOLDER)),
        ("AA", Number(N_STOCK_PLACEHOLDER)),
        ("AB", Number(N_STOCK_PLACEHOLDER)),
        ("AC", Number(N_STOCK_PLACEHOLDER)),
        ("AD", Number(N_STOCK_PLACEHOLDER)),
        ("AE", Number(N_STOCK_PLACEHOLDER)),
        ("AF", Number(N_STOCK_PLACEHOLDER)),
        ("AG", Number(N_STOCK_PLACEHOLDER)),
        ("AH", Number(N_STOCK_PLACEHOLDER)),
        ("AI", Blank),
        ("AJ", Blank),
        ("AK", Blank),
        ("AL", Blank),
        ("AP", Blank),
        ("AQ", Blank),
        ("AR", Blank),
        ("AS", Blank),
    ],
    image_columns: &["AT", "AU", "AV", "AW", "AX", "AY", "AZ", "BA", "BB", "BC"],
};

// #endregion
////////////////////////////////////////////////////////////////////////////////

//! `zilingo_xlsx` v1:
//! Zilingo marketplace bulk-upload workbook generator.
//!
//! Modules:
//! - `conf`      : constants and default presets
//! - `spec`      : models/policies/errors
//! - `util`      : pure helper functions
//! - `table`     : two-column key/value CSV table
//! - `record`    : product attribute resolution
//! - `layout`    : Zilingo sheet layout literal
//! - `writer`    : workbook sink backed by `rust_xlsxwriter`
//! - `projector` : record -> sheet projection
pub mod conf;
pub mod layout;
pub mod projector;
pub mod record;
pub mod spec;
pub mod table;
pub mod util;
pub mod writer;

pub use layout::{
    EnumFixedCell, EnumTemplateField, SpecTemplateBand, SpecTemplateLayout, ZILINGO_TEMPLATE,
};
pub use projector::{export_product_xlsx, populate, project};
pub use record::{EnumProductAttribute, ProductRecord};
pub use spec::{
    EnumCellValue, ProductXlsxError, Result, SpecCellCoord, SpecCellFormat, SpecCellRange,
    SpecDocumentProperties, SpecPricePolicy, SpecSizeRun, SpecSpecialPricePolicy,
};
pub use table::KeyValueTable;
pub use writer::{WorkbookSink, XlsxWorkbookSink};

//! Workbook sink capability and its `rust_xlsxwriter` implementation.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use rust_xlsxwriter::{DocProperties, Format, FormatAlign, Workbook, XlsxError};

use crate::spec::{
    EnumCellValue, ProductXlsxError, Result, SpecCellCoord, SpecCellFormat, SpecCellRange,
    SpecDocumentProperties,
};
use crate::util::validate_sheet_name;

/// Operations the projector needs from a workbook backend.
///
/// Only naming the sheet and persisting the workbook can fail; everything
/// else edits an in-memory model, and a later call on the same cell
/// overwrites an earlier one.
pub trait WorkbookSink {
    fn set_document_properties(&mut self, props: &SpecDocumentProperties);

    fn set_sheet_title(&mut self, name: &str) -> Result<()>;

    fn set_cell_value(&mut self, cell: SpecCellCoord, value: EnumCellValue);

    fn merge_cells(&mut self, range: SpecCellRange);

    /// Overlay `style` onto every cell of `range`.
    fn set_style(&mut self, range: SpecCellRange, style: &SpecCellFormat);

    /// Persist the workbook to `path`.
    fn write(&mut self, path: &Path) -> Result<()>;
}

/// Single-sheet workbook buffered in memory until [`WorkbookSink::write`].
#[derive(Debug, Default, Clone)]
pub struct XlsxWorkbookSink {
    props: SpecDocumentProperties,
    sheet_title: Option<String>,
    dict_cells: BTreeMap<SpecCellCoord, EnumCellValue>,
    dict_styles: BTreeMap<SpecCellCoord, SpecCellFormat>,
    l_merges: Vec<SpecCellRange>,
}

impl XlsxWorkbookSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document_properties(&self) -> &SpecDocumentProperties {
        &self.props
    }

    pub fn sheet_title(&self) -> Option<&str> {
        self.sheet_title.as_deref()
    }

    pub fn cell_value(&self, cell: SpecCellCoord) -> Option<&EnumCellValue> {
        self.dict_cells.get(&cell)
    }

    pub fn cell_style(&self, cell: SpecCellCoord) -> Option<&SpecCellFormat> {
        self.dict_styles.get(&cell)
    }

    /// Merged ranges in merge order.
    pub fn merges(&self) -> &[SpecCellRange] {
        &self.l_merges
    }

    /// Serialize the workbook without touching the filesystem.
    pub fn save_to_buffer(&self) -> std::result::Result<Vec<u8>, XlsxError> {
        self.build_workbook()?.save_to_buffer()
    }

    fn build_workbook(&self) -> std::result::Result<Workbook, XlsxError> {
        let mut workbook = Workbook::new();
        workbook.set_properties(
            &DocProperties::new()
                .set_title(&self.props.title)
                .set_subject(&self.props.subject)
                .set_comment(&self.props.description)
                .set_keywords(&self.props.keywords)
                .set_category(&self.props.category),
        );

        let worksheet = workbook.add_worksheet();
        if let Some(name) = &self.sheet_title {
            worksheet.set_name(name)?;
        }

        let mut dict_formats: HashMap<&SpecCellFormat, Format> = HashMap::new();
        let fmt_default = Format::new();

        for range in &self.l_merges {
            let fmt_anchor: &Format = match self.dict_styles.get(&range.first) {
                Some(spec) => dict_formats
                    .entry(spec)
                    .or_insert_with(|| derive_rust_xlsx_format(spec)),
                None => &fmt_default,
            };
            worksheet.merge_range(
                range.first.row,
                range.first.col,
                range.last.row,
                range.last.col,
                "",
                fmt_anchor,
            )?;
        }

        let set_cells: BTreeSet<SpecCellCoord> = self
            .dict_cells
            .keys()
            .chain(self.dict_styles.keys())
            .copied()
            .collect();

        for cell in set_cells {
            let fmt_cell = self.dict_styles.get(&cell).map(|spec| {
                dict_formats
                    .entry(spec)
                    .or_insert_with(|| derive_rust_xlsx_format(spec))
                    .clone()
            });
            let value = self.dict_cells.get(&cell).unwrap_or(&EnumCellValue::None);

            match (value, &fmt_cell) {
                (EnumCellValue::String(val), Some(fmt)) if !val.is_empty() => {
                    worksheet.write_string_with_format(cell.row, cell.col, val, fmt)?;
                }
                (EnumCellValue::String(val), None) if !val.is_empty() => {
                    worksheet.write_string(cell.row, cell.col, val)?;
                }
                (EnumCellValue::Number(val), Some(fmt)) => {
                    worksheet.write_number_with_format(cell.row, cell.col, *val, fmt)?;
                }
                (EnumCellValue::Number(val), None) => {
                    worksheet.write_number(cell.row, cell.col, *val)?;
                }
                (_, Some(fmt)) => {
                    worksheet.write_blank(cell.row, cell.col, fmt)?;
                }
                (_, None) => {}
            }
        }

        Ok(workbook)
    }
}

impl WorkbookSink for XlsxWorkbookSink {
    fn set_document_properties(&mut self, props: &SpecDocumentProperties) {
        self.props = props.clone();
    }

    fn set_sheet_title(&mut self, name: &str) -> Result<()> {
        validate_sheet_name(name)?;
        self.sheet_title = Some(name.to_string());
        Ok(())
    }

    fn set_cell_value(&mut self, cell: SpecCellCoord, value: EnumCellValue) {
        self.dict_cells.insert(cell, value);
    }

    fn merge_cells(&mut self, range: SpecCellRange) {
        if !self.l_merges.contains(&range) {
            self.l_merges.push(range);
        }
    }

    fn set_style(&mut self, range: SpecCellRange, style: &SpecCellFormat) {
        for cell in range.cells() {
            let fmt_new = match self.dict_styles.get(&cell) {
                Some(fmt_old) => fmt_old.merge(style),
                None => style.clone(),
            };
            self.dict_styles.insert(cell, fmt_new);
        }
    }

    /// Build and save the workbook.
    ///
    /// Empty-string cells without a style have no representation in the
    /// file format and are left out of the saved sheet; they remain visible
    /// through [`XlsxWorkbookSink::cell_value`]. Styled empty cells are saved
    /// as formatted blanks.
    fn write(&mut self, path: &Path) -> Result<()> {
        let derive_export_error = |err: XlsxError| ProductXlsxError::ExportIo {
            path: path.to_path_buf(),
            message: derive_xlsx_error_text(err),
        };

        let mut workbook = self.build_workbook().map_err(derive_export_error)?;
        workbook.save(path).map_err(derive_export_error)?;

        tracing::debug!(
            path = %path.display(),
            n_cells = self.dict_cells.len(),
            n_merges = self.l_merges.len(),
            "workbook saved"
        );
        Ok(())
    }
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.to_string());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    format
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "fill" => Some(FormatAlign::Fill),
        "justify" => Some(FormatAlign::Justify),
        "center_across" => Some(FormatAlign::CenterAcross),
        "distributed" => Some(FormatAlign::Distributed),
        _ => None,
    }
}

fn derive_xlsx_error_text(err: XlsxError) -> String {
    format!("xlsx write error: {err}")
}

//! Projection of a product record onto the template, step by step.
//!
//! Steps run in a fixed order and later writes to a cell replace earlier
//! ones:
//! 1. document properties
//! 2. sheet title
//! 3. title cell, merge, style
//! 4. row 2 literals
//! 5. row 3 captions
//! 6. header row
//! 7. record row (fields, fixed values, images)
//! 8. write

use std::path::Path;

use crate::layout::{
    EnumFixedCell, EnumTemplateField, SpecTemplateBand, SpecTemplateLayout, ZILINGO_TEMPLATE,
};
use crate::record::{EnumProductAttribute, ProductRecord};
use crate::spec::{EnumCellValue, Result, SpecDocumentProperties};
use crate::util::{parse_cell_range, parse_cell_ref, parse_column_cell};
use crate::writer::{WorkbookSink, XlsxWorkbookSink};

/// Run steps 1-7 against `sink` without persisting.
pub fn populate<S: WorkbookSink + ?Sized>(
    record: &ProductRecord,
    layout: &SpecTemplateLayout,
    sink: &mut S,
) -> Result<()> {
    layout.validate()?;

    let c_title = layout.derive_title(&record.attribute(EnumProductAttribute::Sku));
    sink.set_document_properties(&SpecDocumentProperties::uniform(&c_title));
    sink.set_sheet_title(layout.sheet_name)?;

    sink.set_cell_value(parse_cell_ref(layout.title_cell)?, c_title.into());
    apply_band(&layout.title_band, sink)?;

    for band in layout.banner_bands {
        apply_band(band, sink)?;
    }

    for (c_col, c_label) in layout.header_labels {
        sink.set_cell_value(parse_column_cell(c_col, layout.header_row)?, (*c_label).into());
    }
    apply_band(&layout.header_band, sink)?;

    write_record_row(record, layout, sink)
}

/// Populate `sink` and write it to `path`.
pub fn project<S: WorkbookSink + ?Sized>(
    record: &ProductRecord,
    layout: &SpecTemplateLayout,
    sink: &mut S,
    path: &Path,
) -> Result<()> {
    populate(record, layout, sink)?;
    sink.write(path)?;
    tracing::info!(path = %path.display(), sku = %record.sku(), "product workbook exported");
    Ok(())
}

/// Load a product CSV (plus optional fallback config) and export it with
/// the Zilingo template.
pub fn export_product_xlsx(
    path_csv: impl AsRef<Path>,
    path_config: Option<&Path>,
    path_out: impl AsRef<Path>,
) -> Result<()> {
    let record = ProductRecord::from_csv_path(path_csv, path_config)?;
    let mut sink = XlsxWorkbookSink::new();
    project(&record, &ZILINGO_TEMPLATE, &mut sink, path_out.as_ref())
}

fn apply_band<S: WorkbookSink + ?Sized>(band: &SpecTemplateBand, sink: &mut S) -> Result<()> {
    for (c_cell, c_text) in band.cells {
        sink.set_cell_value(parse_cell_ref(c_cell)?, (*c_text).into());
    }
    for c_range in band.merge_regions {
        sink.merge_cells(parse_cell_range(c_range)?);
    }
    for (c_range, fmt) in band.style_rules {
        sink.set_style(parse_cell_range(c_range)?, fmt);
    }
    Ok(())
}

fn write_record_row<S: WorkbookSink + ?Sized>(
    record: &ProductRecord,
    layout: &SpecTemplateLayout,
    sink: &mut S,
) -> Result<()> {
    for (c_col, field) in layout.field_cell_map {
        let value = match field {
            EnumTemplateField::Attribute(attr) => EnumCellValue::String(record.attribute(*attr)),
            EnumTemplateField::Price => EnumCellValue::Number(record.price()),
            EnumTemplateField::Material => record.material().into(),
        };
        sink.set_cell_value(parse_column_cell(c_col, layout.record_row)?, value);
    }

    for (c_col, fixed) in layout.fixed_values {
        let value = match fixed {
            EnumFixedCell::Blank => EnumCellValue::String(String::new()),
            EnumFixedCell::Number(val) => EnumCellValue::Number(*val),
        };
        sink.set_cell_value(parse_column_cell(c_col, layout.record_row)?, value);
    }

    let l_image_urls = record.image_urls();
    if l_image_urls.len() > layout.image_columns.len() {
        tracing::warn!(
            n_images = l_image_urls.len(),
            n_slots = layout.image_columns.len(),
            "extra product images dropped"
        );
    }
    for (n_idx, c_col) in layout.image_columns.iter().enumerate() {
        let c_url = l_image_urls.get(n_idx).cloned().unwrap_or_default();
        sink.set_cell_value(parse_column_cell(c_col, layout.record_row)?, c_url.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use calamine::{Data, Reader, Xlsx, open_workbook};

    use super::{export_product_xlsx, populate, project};
    use crate::conf::FMT_TEMPLATE_BANNER;
    use crate::layout::ZILINGO_TEMPLATE;
    use crate::record::ProductRecord;
    use crate::spec::{EnumCellValue, ProductXlsxError, SpecCellCoord};
    use crate::table::KeyValueTable;
    use crate::util::{parse_cell_range, parse_cell_ref};
    use crate::writer::{WorkbookSink, XlsxWorkbookSink};

    const C_CSV_SAMPLE: &str =
        "Price,USD 50\nSku,ABC123\nImage1,http://x/1.jpg\nImage2,http://x/2.jpg\n";

    fn populated(text: &str, config: &str) -> XlsxWorkbookSink {
        let record = ProductRecord::with_fallback_table(
            KeyValueTable::from_csv_str(text).unwrap(),
            KeyValueTable::from_csv_str(config).unwrap(),
        );
        let mut sink = XlsxWorkbookSink::new();
        populate(&record, &ZILINGO_TEMPLATE, &mut sink).expect("populate");
        sink
    }

    fn value<'a>(sink: &'a XlsxWorkbookSink, c_ref: &str) -> Option<&'a EnumCellValue> {
        sink.cell_value(parse_cell_ref(c_ref).unwrap())
    }

    fn text<'a>(sink: &'a XlsxWorkbookSink, c_ref: &str) -> &'a str {
        value(sink, c_ref).and_then(EnumCellValue::as_str).unwrap_or_else(|| {
            panic!("{c_ref} is not a text cell");
        })
    }

    #[test]
    fn metadata_title_and_sheet_name() {
        let sink = populated(C_CSV_SAMPLE, "");
        let props = sink.document_properties();

        assert_eq!(props.title, "Zilingo Product - ABC123");
        assert_eq!(props.subject, props.title);
        assert_eq!(props.description, props.title);
        assert_eq!(props.keywords, props.title);
        assert_eq!(props.category, props.title);
        assert_eq!(sink.sheet_title(), Some("WJEART-F,ARR-S,US"));
        assert_eq!(text(&sink, "A1"), "Zilingo Product - ABC123");
    }

    #[test]
    fn title_uses_fallback_sku() {
        let sink = populated("Price,USD 1\n", "Sku,CFG-9\n");
        assert_eq!(text(&sink, "A1"), "Zilingo Product - CFG-9");
        assert_eq!(text(&sink, "E5"), "CFG-9");
    }

    #[test]
    fn banners_headers_merges_and_styles() {
        let sink = populated(C_CSV_SAMPLE, "");

        assert_eq!(text(&sink, "D2"), "Version:12");
        assert_eq!(text(&sink, "I2"), "FTS:F,ARR-S,US");
        assert_eq!(text(&sink, "P3"), "Enter the Stock");
        assert_eq!(
            text(&sink, "AT3"),
            "Bulk Image Upload (Provide at least one link)"
        );
        assert_eq!(text(&sink, "A4"), "颜色");
        assert_eq!(text(&sink, "AM4"), "价格 (in CNY)");
        assert_eq!(text(&sink, "BC4"), "图片 10");

        let l_merges: Vec<String> = sink.merges().iter().map(ToString::to_string).collect();
        assert_eq!(
            l_merges,
            vec!["A1:U1", "P3:AL3", "AN3:AO3", "AP3:AS3", "AT3:BC3", "F4:H4", "J4:L4"]
        );

        for c_range in ["A1:BC1", "D2:I2", "P3:BC3", "A4:BC4"] {
            for cell in parse_cell_range(c_range).unwrap().cells() {
                assert_eq!(sink.cell_style(cell), Some(&FMT_TEMPLATE_BANNER), "{cell}");
            }
        }
        assert_eq!(sink.cell_style(parse_cell_ref("C2").unwrap()), None);
        assert_eq!(sink.cell_style(parse_cell_ref("A5").unwrap()), None);
    }

    #[test]
    fn record_row_fields_and_fixed_cells() {
        let sink = populated(
            "Price,USD 50\nSku,ABC123\nName,Ring\nColor,Gold\nImage1,http://x/1.jpg\nImage2,http://x/2.jpg\n",
            "Warehouse,Shenzhen\nWeightUnit,g\nWeightValue,5\n",
        );

        assert_eq!(text(&sink, "A5"), "Gold");
        assert_eq!(text(&sink, "B5"), "Ring");
        assert_eq!(text(&sink, "C5"), "");
        assert_eq!(text(&sink, "D5"), "");
        assert_eq!(text(&sink, "E5"), "ABC123");
        assert_eq!(text(&sink, "J5"), "金属");
        assert_eq!(text(&sink, "O5"), "Shenzhen");
        assert_eq!(text(&sink, "AN5"), "g");
        assert_eq!(text(&sink, "AO5"), "5");
        assert_eq!(value(&sink, "AM5"), Some(&EnumCellValue::Number(552.95)));

        for n_col in parse_cell_range("R5:AH5").unwrap().cells() {
            assert_eq!(sink.cell_value(n_col), Some(&EnumCellValue::Number(10.0)));
        }
        for c_ref in ["P5", "Q5", "AI5", "AL5", "AP5", "AS5"] {
            assert_eq!(text(&sink, c_ref), "", "{c_ref}");
        }
    }

    #[test]
    fn images_fill_slots_in_order_and_blank_the_rest() {
        let sink = populated(C_CSV_SAMPLE, "");

        assert_eq!(text(&sink, "AT5"), "http://x/1.jpg");
        assert_eq!(text(&sink, "AU5"), "http://x/2.jpg");
        for c_ref in ["AV5", "AW5", "AX5", "AY5", "AZ5", "BA5", "BB5", "BC5"] {
            assert_eq!(text(&sink, c_ref), "", "{c_ref}");
        }
    }

    #[test]
    fn images_beyond_ten_are_dropped() {
        let csv: String = (1..=12)
            .map(|n| format!("Image{n},http://x/{n}.jpg\n"))
            .collect();
        let sink = populated(&csv, "");

        assert_eq!(text(&sink, "BC5"), "http://x/10.jpg");
        assert_eq!(value(&sink, "BD5"), None);
    }

    #[test]
    fn minimal_record_still_exports() {
        let sink = populated("Sku,ONLY\n", "");
        assert_eq!(value(&sink, "AM5"), Some(&EnumCellValue::Number(222.95)));
        assert_eq!(text(&sink, "AT5"), "");
    }

    #[test]
    fn project_writes_readable_workbook() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path_out = dir.path().join("product.xlsx");

        let record = ProductRecord::new(KeyValueTable::from_csv_str(C_CSV_SAMPLE).unwrap());
        let mut sink = XlsxWorkbookSink::new();
        project(&record, &ZILINGO_TEMPLATE, &mut sink, &path_out).expect("project");

        let mut workbook: Xlsx<_> = open_workbook(&path_out).expect("open xlsx");
        assert_eq!(workbook.sheet_names(), vec!["WJEART-F,ARR-S,US".to_string()]);

        let range = workbook
            .worksheet_range("WJEART-F,ARR-S,US")
            .expect("read sheet");
        let cell = |c_ref: &str| {
            let coord: SpecCellCoord = parse_cell_ref(c_ref).unwrap();
            range.get_value((coord.row, u32::from(coord.col))).cloned()
        };

        assert_eq!(
            cell("A1"),
            Some(Data::String("Zilingo Product - ABC123".to_string()))
        );
        assert_eq!(cell("E5"), Some(Data::String("ABC123".to_string())));
        assert_eq!(cell("AM5"), Some(Data::Float(552.95)));
        assert_eq!(cell("R5"), Some(Data::Float(10.0)));
        assert_eq!(cell("AU5"), Some(Data::String("http://x/2.jpg".to_string())));

        // Unstyled blanks stay in the sink model only.
        assert_eq!(
            sink.cell_value(parse_cell_ref("D5").unwrap()),
            Some(&EnumCellValue::String(String::new()))
        );
        assert!(matches!(cell("D5"), None | Some(Data::Empty)));
        assert!(matches!(cell("AP5"), None | Some(Data::Empty)));
    }

    #[test]
    fn export_reports_unwritable_destination() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path_csv = dir.path().join("product.csv");
        std::fs::write(&path_csv, C_CSV_SAMPLE).expect("write csv");

        let err = export_product_xlsx(
            &path_csv,
            None,
            dir.path().join("no_such_dir").join("out.xlsx"),
        )
        .expect_err("must fail");
        assert!(matches!(err, ProductXlsxError::ExportIo { .. }));
    }

    #[test]
    fn export_reports_malformed_csv() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path_csv = dir.path().join("product.csv");
        std::fs::write(&path_csv, "Sku,A\nbroken\n").expect("write csv");

        let err = export_product_xlsx(&path_csv, None, dir.path().join("out.xlsx"))
            .expect_err("must fail");
        assert!(matches!(err, ProductXlsxError::MalformedRecord { .. }));
        assert!(!dir.path().join("out.xlsx").exists());
    }

    #[test]
    fn export_with_config_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path_csv = dir.path().join("product.csv");
        let path_config = dir.path().join("config.csv");
        let path_out = dir.path().join("out.xlsx");
        std::fs::write(&path_csv, "Price,CNY 30\nSku,S-1\n").expect("write csv");
        std::fs::write(&path_config, "Warehouse,Yiwu\n").expect("write config");

        export_product_xlsx(&path_csv, Some(Path::new(&path_config)), &path_out).expect("export");
        assert!(path_out.exists());
    }

    #[test]
    fn recording_sink_sees_ordered_operations() {
        #[derive(Default)]
        struct RecordingSink {
            l_ops: Vec<String>,
        }

        impl WorkbookSink for RecordingSink {
            fn set_document_properties(&mut self, _: &crate::spec::SpecDocumentProperties) {
                self.l_ops.push("props".to_string());
            }
            fn set_sheet_title(&mut self, name: &str) -> crate::spec::Result<()> {
                self.l_ops.push(format!("title {name}"));
                Ok(())
            }
            fn set_cell_value(&mut self, cell: SpecCellCoord, _: EnumCellValue) {
                self.l_ops.push(format!("set {cell}"));
            }
            fn merge_cells(&mut self, range: crate::spec::SpecCellRange) {
                self.l_ops.push(format!("merge {range}"));
            }
            fn set_style(&mut self, range: crate::spec::SpecCellRange, _: &crate::spec::SpecCellFormat) {
                self.l_ops.push(format!("style {range}"));
            }
            fn write(&mut self, path: &Path) -> crate::spec::Result<()> {
                self.l_ops.push(format!("write {}", path.display()));
                Ok(())
            }
        }

        let record = ProductRecord::new(KeyValueTable::from_csv_str(C_CSV_SAMPLE).unwrap());
        let mut sink = RecordingSink::default();
        project(&record, &ZILINGO_TEMPLATE, &mut sink, Path::new("out.xlsx")).expect("project");

        assert_eq!(&sink.l_ops[..5], &[
            "props",
            "title WJEART-F,ARR-S,US",
            "set A1",
            "merge A1:U1",
            "style A1:BC1",
        ]);
        assert_eq!(sink.l_ops.last().map(String::as_str), Some("write out.xlsx"));

        let n_header = sink.l_ops.iter().position(|op| op == "set A4").unwrap();
        let n_row = sink.l_ops.iter().position(|op| op == "set A5").unwrap();
        let n_caption = sink.l_ops.iter().position(|op| op == "set P3").unwrap();
        assert!(n_caption < n_header && n_header < n_row);
    }
}

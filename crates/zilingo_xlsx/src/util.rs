//! Stateless helpers: A1 references, field names, price tokens, sheet names.

use crate::conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
use crate::spec::{ProductXlsxError, Result, SpecCellCoord, SpecCellRange};

////////////////////////////////////////////////////////////////////////////////
// #region CellReferences

/// Convert a zero-based column index to Excel letters (`0` -> `A`, `26` -> `AA`).
pub fn derive_column_letters(col: u16) -> String {
    let mut n_rest = u32::from(col) + 1;
    let mut l_chars = Vec::new();
    while n_rest > 0 {
        let n_rem = (n_rest - 1) % 26;
        l_chars.push(char::from(b'A' + n_rem as u8));
        n_rest = (n_rest - 1) / 26;
    }
    l_chars.iter().rev().collect()
}

/// Convert Excel column letters to a zero-based column index.
pub fn parse_column_letters(letters: &str) -> Result<u16> {
    if letters.is_empty() || !letters.chars().all(|chr| chr.is_ascii_alphabetic()) {
        return Err(ProductXlsxError::InvalidLayout(format!(
            "Invalid column letters: {letters:?}"
        )));
    }

    let mut n_col: u32 = 0;
    for chr in letters.chars() {
        n_col = n_col * 26 + u32::from(chr.to_ascii_uppercase() as u8 - b'A' + 1);
        if n_col > u32::from(N_NCOLS_EXCEL_MAX) {
            return Err(ProductXlsxError::InvalidLayout(format!(
                "Column out of range: {letters:?}"
            )));
        }
    }
    Ok((n_col - 1) as u16)
}

/// Parse an A1 reference (`"AT5"`) into a zero-based coordinate.
pub fn parse_cell_ref(cell: &str) -> Result<SpecCellCoord> {
    let c_cell = cell.trim();
    let n_split = c_cell
        .find(|chr: char| chr.is_ascii_digit())
        .ok_or_else(|| ProductXlsxError::InvalidLayout(format!("Missing row in {cell:?}")))?;
    let (c_letters, c_digits) = c_cell.split_at(n_split);

    let n_col = parse_column_letters(c_letters)?;
    let n_row = c_digits
        .parse::<u32>()
        .ok()
        .filter(|n| (1..=N_NROWS_EXCEL_MAX).contains(n))
        .ok_or_else(|| ProductXlsxError::InvalidLayout(format!("Invalid row in {cell:?}")))?;

    Ok(SpecCellCoord::new(n_row - 1, n_col))
}

/// Parse an A1 range (`"A1:U1"`); a single reference is a one-cell range.
pub fn parse_cell_range(range: &str) -> Result<SpecCellRange> {
    match range.split_once(':') {
        Some((c_first, c_last)) => Ok(SpecCellRange::new(
            parse_cell_ref(c_first)?,
            parse_cell_ref(c_last)?,
        )),
        None => {
            let cell = parse_cell_ref(range)?;
            Ok(SpecCellRange::new(cell, cell))
        }
    }
}

/// Parse a bare column (`"AT"`) combined with a one-based row number.
pub fn parse_column_cell(col: &str, row_1based: u32) -> Result<SpecCellCoord> {
    parse_cell_ref(&format!("{col}{row_1based}"))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FieldNames

/// Normalize a logical attribute name to the record key convention.
///
/// Words split on `_`, `-` or whitespace get their first letter upper-cased
/// and are joined without separator: `gem_type` -> `GemType`, `sku` -> `Sku`.
/// Already title-cased keys are returned unchanged.
pub fn normalize_field_name(name: &str) -> String {
    name.split(|chr: char| chr == '_' || chr == '-' || chr.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Parse the amount from a `"<currency> <amount>"` price field.
///
/// Returns `None` when the second token is missing, not numeric or not finite.
pub fn parse_price_magnitude(raw: &str) -> Option<f64> {
    raw.split_whitespace()
        .nth(1)
        .and_then(|token| token.parse::<f64>().ok())
        .filter(|val| val.is_finite())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Check a sheet title against Excel naming rules.
pub fn validate_sheet_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ProductXlsxError::InvalidSheetName(
            "Sheet name must not be empty.".to_string(),
        ));
    }
    if name.chars().count() > N_LEN_EXCEL_SHEET_NAME_MAX {
        return Err(ProductXlsxError::InvalidSheetName(format!(
            "{name:?} exceeds {N_LEN_EXCEL_SHEET_NAME_MAX} characters."
        )));
    }
    if let Some(c_illegal) = TUP_EXCEL_ILLEGAL.iter().find(|c| name.contains(**c)) {
        return Err(ProductXlsxError::InvalidSheetName(format!(
            "{name:?} contains illegal character {c_illegal:?}."
        )));
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

//! Excel workbook assembly for table exports, returned as in-memory bytes
//! for a browser download.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook};

/// Build a one-sheet workbook: styled header row, banded data rows, numeric
/// cells right-aligned, auto column widths.
pub(crate) fn table_xlsx(
    sheet_name: &str,
    headers: &[&str],
    rows: &[Vec<String>],
) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name).map_err(err)?;

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2E7D32))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, *header, &header_format)
            .map_err(err)?;
    }
    worksheet.set_freeze_panes(1, 0).ok();

    let mut col_widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    let band1 = Color::RGB(0xEDF5EC);
    let band2 = Color::RGB(0xFFFFFF);

    for (row_index, row) in rows.iter().enumerate() {
        let sheet_row = (row_index + 1) as u32;
        let band = if row_index % 2 == 0 { band1 } else { band2 };
        for (col, value) in row.iter().enumerate() {
            write_cell(worksheet, sheet_row, col as u16, value, band)?;
            col_widths[col] = col_widths[col].max(value.chars().count());
        }
    }

    for (col, width) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(col as u16, *width as f64 + 2.0)
            .map_err(err)?;
    }

    workbook.save_to_buffer().map_err(err)
}

fn write_cell(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    col: u16,
    value: &str,
    band: Color,
) -> Result<(), String> {
    if let Ok(num) = value.parse::<f64>() {
        let fmt = Format::new()
            .set_align(FormatAlign::Right)
            .set_background_color(band)
            .set_pattern(FormatPattern::Solid)
            .set_border(FormatBorder::Thin);
        worksheet.write_with_format(row, col, num, &fmt).map_err(err)?;
        return Ok(());
    }

    let fmt = Format::new()
        .set_background_color(band)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);
    worksheet.write_with_format(row, col, value, &fmt).map_err(err)?;
    Ok(())
}

fn err<E: std::fmt::Display>(e: E) -> String {
    format!("izvoz ni uspel: {e}")
}

#[cfg(test)]
mod tests {
    use super::table_xlsx;

    #[test]
    fn produces_a_zip_container() {
        let rows = vec![vec!["Srnjad".to_string(), "10".to_string()]];
        let bytes = table_xlsx("Odvzem", &["species", "plan"], &rows).unwrap();
        // xlsx is a zip archive
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn empty_rows_is_still_a_valid_workbook() {
        let bytes = table_xlsx("Prazno", &["a"], &[]).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}

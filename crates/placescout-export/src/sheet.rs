//! Spreadsheet layout and writer.

use std::path::Path;

use rust_xlsxwriter::Workbook;

use placescout_core::PlaceRecord;

use crate::error::ExportError;

pub const SHEET_NAME: &str = "Google Maps Verileri";

pub const HEADERS: [&str; 6] = [
    "İşletme Adı",
    "Sektör/Kategori",
    "Değerlendirme",
    "Adres",
    "Telefon",
    "Web Sitesi",
];

/// Extra characters added to the widest cell of each column.
const WIDTH_PADDING: usize = 5;

/// Widest column the xlsx format accepts; the writer truncates anything
/// larger.
pub const MAX_COLUMN_WIDTH: usize = 255;

/// Rows per worksheet, header row included.
pub const MAX_SHEET_ROWS: usize = 1_048_576;

/// A data cell. Ratings stay numeric so the sheet can sort on them.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    /// Character count of the cell as it renders.
    fn display_len(&self) -> usize {
        match self {
            Cell::Text(s) => s.chars().count(),
            Cell::Number(n) => n.to_string().chars().count(),
        }
    }
}

/// Data rows (header excluded) in store order.
#[must_use]
pub fn sheet_rows(records: &[PlaceRecord]) -> Vec<[Cell; 6]> {
    records
        .iter()
        .map(|r| {
            let rating = r
                .rating
                .score()
                .map_or_else(|| Cell::Text(r.rating.to_string()), Cell::Number);
            [
                Cell::Text(r.name.clone()),
                Cell::Text(r.sector.clone()),
                rating,
                Cell::Text(r.address.clone()),
                Cell::Text(r.phone.clone()),
                Cell::Text(r.website.clone()),
            ]
        })
        .collect()
}

/// Width per column: longest cell (header included) plus five, capped at
/// [`MAX_COLUMN_WIDTH`].
#[must_use]
pub fn column_widths(rows: &[[Cell; 6]]) -> [usize; 6] {
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.display_len());
        }
    }
    widths.map(|w| (w + WIDTH_PADDING).min(MAX_COLUMN_WIDTH))
}

/// Rejects data sets that do not fit below the header row.
fn check_row_limit(data_rows: usize) -> Result<(), ExportError> {
    if data_rows >= MAX_SHEET_ROWS {
        return Err(ExportError::TooManyRows {
            rows: data_rows,
            max: MAX_SHEET_ROWS - 1,
        });
    }
    Ok(())
}

/// Writes `records` to a new `.xlsx` workbook at `path`, replacing any
/// existing file.
///
/// # Errors
///
/// Returns [`ExportError::Write`] if the workbook cannot be built or saved
/// (missing directory, permission denied, file locked by another program),
/// or [`ExportError::TooManyRows`] when the records do not fit in one
/// worksheet. Nothing is written in that case.
pub fn export(records: &[PlaceRecord], path: &Path) -> Result<(), ExportError> {
    check_row_limit(records.len())?;
    let rows = sheet_rows(records);
    let widths = column_widths(&rows);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in (0u16..).zip(HEADERS) {
        worksheet.write_string(0, col, header)?;
    }

    for (row_num, row) in (1u32..).zip(&rows) {
        for (col, cell) in (0u16..).zip(row) {
            match cell {
                Cell::Text(s) => worksheet.write_string(row_num, col, s)?,
                Cell::Number(n) => worksheet.write_number(row_num, col, *n)?,
            };
        }
    }

    for (col, width) in (0u16..).zip(widths) {
        // Bounded by MAX_COLUMN_WIDTH.
        let width = u32::try_from(width).unwrap_or(u32::MAX);
        worksheet.set_column_width(col, f64::from(width))?;
    }

    workbook.save(path)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "spreadsheet written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use placescout_core::Rating;

    use super::*;

    fn cafe() -> PlaceRecord {
        PlaceRecord {
            name: "Cafe X".to_owned(),
            sector: "Food".to_owned(),
            rating: Rating::Score(4.5),
            address: "Main St".to_owned(),
            phone: "905551234567".to_owned(),
            website: "cafex.com".to_owned(),
        }
    }

    #[test]
    fn rows_mirror_records_in_order() {
        let mut second = cafe();
        second.name = "Ikinci".to_owned();
        second.rating = Rating::NotAvailable;

        let rows = sheet_rows(&[cafe(), second]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], Cell::Text("Cafe X".to_owned()));
        assert_eq!(rows[0][2], Cell::Number(4.5));
        assert_eq!(rows[0][4], Cell::Text("905551234567".to_owned()));
        assert_eq!(rows[1][0], Cell::Text("Ikinci".to_owned()));
        assert_eq!(rows[1][2], Cell::Text("N/A".to_owned()));
    }

    #[test]
    fn widths_count_headers_and_cells_plus_padding() {
        let rows = sheet_rows(&[cafe()]);
        let widths = column_widths(&rows);
        // Headers win except address ("Main St") and phone ("905551234567").
        assert_eq!(widths, [11 + 5, 15 + 5, 13 + 5, 7 + 5, 12 + 5, 10 + 5]);

        for (col, width) in widths.iter().enumerate() {
            let header = HEADERS[col].chars().count();
            let longest = rows[0][col].display_len().max(header);
            assert!(*width >= longest + 5);
        }
    }

    #[test]
    fn widths_count_characters_not_bytes() {
        let mut record = cafe();
        record.address = "Şişli Çarşı".to_owned();
        let widths = column_widths(&sheet_rows(&[record]));
        assert_eq!(widths[3], "Şişli Çarşı".chars().count() + 5);
    }

    #[test]
    fn widths_for_empty_store_use_headers() {
        let widths = column_widths(&[]);
        assert_eq!(widths, HEADERS.map(|h| h.chars().count() + 5));
    }

    #[test]
    fn widths_stop_at_format_maximum() {
        let mut record = cafe();
        record.address = "x".repeat(300);
        let widths = column_widths(&sheet_rows(&[record]));
        assert_eq!(widths[3], MAX_COLUMN_WIDTH);
        assert_eq!(widths[0], 16);
    }

    #[test]
    fn row_limit_leaves_room_for_header() {
        assert!(check_row_limit(0).is_ok());
        assert!(check_row_limit(MAX_SHEET_ROWS - 1).is_ok());
        assert!(matches!(
            check_row_limit(MAX_SHEET_ROWS),
            Err(ExportError::TooManyRows { rows: 1_048_576, max: 1_048_575 })
        ));
    }
}

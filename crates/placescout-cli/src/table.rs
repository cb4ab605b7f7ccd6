//! Plain-text rendering of the result table.

use placescout_core::PlaceRecord;
use placescout_export::HEADERS;

/// Display cap per column, in characters. Rating is short by nature.
const COLUMN_CAPS: [usize; 6] = [32, 18, 13, 40, 18, 32];

fn truncate(text: &str, cap: usize) -> String {
    if text.chars().count() > cap {
        let kept: String = text.chars().take(cap.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        text.to_owned()
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}

/// Header line followed by one line per record, columns padded to the
/// widest (capped) cell.
pub(crate) fn format_table(records: &[PlaceRecord]) -> Vec<String> {
    let rows: Vec<[String; 6]> = records
        .iter()
        .map(|r| {
            let cells = r.display_cells();
            let mut out: [String; 6] = Default::default();
            for (slot, (cell, cap)) in out.iter_mut().zip(cells.iter().zip(COLUMN_CAPS)) {
                *slot = truncate(cell, cap);
            }
            out
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let index_width = records.len().to_string().len().max(1);

    let render = |index: &str, cells: &[String]| {
        let mut line = pad(index, index_width + 2);
        for (cell, width) in cells.iter().zip(widths) {
            line.push_str(&pad(cell, width + 2));
        }
        line.trim_end().to_owned()
    };

    let header: Vec<String> = HEADERS.iter().map(|h| (*h).to_owned()).collect();
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(render("#", &header));
    for (i, row) in rows.iter().enumerate() {
        lines.push(render(&(i + 1).to_string(), row));
    }
    lines
}

pub(crate) fn print_records(records: &[PlaceRecord]) {
    for line in format_table(records) {
        println!("{line}");
    }
    println!("{} kayıt", records.len());
}

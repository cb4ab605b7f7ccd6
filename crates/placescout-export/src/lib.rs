pub mod error;
pub mod filename;
pub mod sheet;

pub use error::ExportError;
pub use filename::{default_filename, default_filename_now};
pub use sheet::{
    column_widths, export, sheet_rows, Cell, HEADERS, MAX_COLUMN_WIDTH, MAX_SHEET_ROWS, SHEET_NAME,
};

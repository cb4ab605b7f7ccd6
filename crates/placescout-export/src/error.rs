use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// Any failure from the workbook writer, including the final file write.
    #[error("failed to write spreadsheet: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    /// More data rows than one worksheet holds under its header row.
    #[error("{rows} rows exceed the worksheet limit of {max}")]
    TooManyRows { rows: usize, max: usize },
}

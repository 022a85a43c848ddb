use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to compress artifact: {0}")]
    Compress(#[from] std::io::Error),
}

impl From<csv::IntoInnerError<csv::Writer<flate2::write::GzEncoder<Vec<u8>>>>> for ExportError {
    fn from(e: csv::IntoInnerError<csv::Writer<flate2::write::GzEncoder<Vec<u8>>>>) -> Self {
        ExportError::Compress(e.into_error())
    }
}

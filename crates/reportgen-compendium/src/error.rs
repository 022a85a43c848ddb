use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to build http client: {0}")]
    Client(String),

    #[error("error getting monsters: {0}")]
    Request(String),

    #[error("compendium returned HTTP {status}")]
    Status { status: u16 },

    #[error("error parsing monsters: {0}")]
    Decode(String),
}

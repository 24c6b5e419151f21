use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Paging is configured with an empty page table")]
    EmptyPages,

    #[error("Page {page} is out of range (have {len} pages)")]
    PageOutOfRange { page: usize, len: usize },

    #[error("Paging is not configured")]
    PagingDisabled,
}

pub type Result<T> = std::result::Result<T, Error>;

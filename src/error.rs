use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("not a CS2D map: header line is {found:?}")]
    BadHeader { found: String },

    #[error("not a CS2D map: footer check line is {found:?}")]
    BadFooter { found: String },

    #[error("unexpected end of data at offset {offset:#x} (need {need} bytes, have {have})")]
    UnexpectedEof {
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("a map is already loaded")]
    AlreadyLoaded,

    #[error("no map is loaded")]
    NotLoaded,
}

pub type Result<T> = std::result::Result<T, Error>;

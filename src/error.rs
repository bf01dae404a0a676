use thiserror::Error;

/// Errors surfaced by bitmap construction, aggregation, and the byte
/// envelope.
#[derive(Error, Debug)]
pub enum Error {
    /// `set` was asked to place a bit below the writable region. Bits must
    /// arrive in non-decreasing order; only the trailing word accepts
    /// write-backs.
    #[error("cannot set bit {position}: bitmap already covers {size_in_words} words")]
    OutOfOrder { position: u32, size_in_words: u32 },

    #[error("cannot aggregate zero iterators")]
    EmptyAggregate,

    /// The envelope must hold an even number of elements (gap, word pairs).
    #[error("corrupt stream: odd buffer length {0}")]
    CorruptStream(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Codec(#[from] bincode::error::DecodeError),
}

pub type Result<T> = std::result::Result<T, Error>;

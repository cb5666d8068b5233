use thiserror::Error;

pub use color_eyre::eyre::eyre;

/// Decoding failures surfaced to the connection handler.
///
/// Every value is constructed at the failure site; there are no shared
/// error sentinels, so concurrent decode calls never alias error state.
#[derive(Debug, Error)]
pub enum Error {
    /// The buffer is shorter than the minimum required for the fields it
    /// claims to contain, at any decoding stage.
    #[error("invalid packet length: need {expected} bytes, have {actual}")]
    InvalidPacketLength { expected: usize, actual: usize },

    /// A command or structure byte does not match the decoder invoked.
    #[error("invalid packet type: expected 0x{expected:02x}, got 0x{actual:02x}")]
    InvalidPacketType { expected: u8, actual: u8 },

    /// A type descriptor names a wire type outside the dispatch table, or
    /// the parameter's bytes cannot be rendered per its declared type.
    #[error("unsupported type 0x{code:02x} for parameter {index}")]
    UnsupportedParameterType { code: u8, index: usize },

    /// new-params-bind flag was 0 but no cached descriptor array was
    /// supplied; the caller must re-dispatch with the types it cached from
    /// the prior execution of this statement.
    #[error("packet reuses previously bound parameter types but none were supplied")]
    MissingParameterTypes,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("library bug: {0}")]
    LibraryBug(color_eyre::eyre::Report),
}

impl Error {
    pub(crate) fn from_debug<E: std::fmt::Debug>(err: E) -> Self {
        Self::LibraryBug(eyre!("{err:?}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

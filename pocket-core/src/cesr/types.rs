use derive_more::Display;

use rst_common::with_errors::thiserror::{self, Error};

/// `Kind` is the semantic category of a fully qualified primitive. Each derivation
/// code belongs to one or more categories, a digest code like `E` is both a valid
/// self-addressing prefix and a digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Kind {
    Prefix,
    SeqNum,
    Digest,
    Signature,
}

/// `Cold` is the result of sniffing the first tritet of a stream
///
/// - `Msg` the stream starts with a serialized message body (JSON, CBOR, MGPK)
/// - `Txt` the stream starts with a text domain (qb64) counter or primitive
/// - `Bny` the stream starts with a binary domain (qb2) counter or primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cold {
    Msg,
    Txt,
    Bny,
}

/// `CesrError` provides all error kinds raised while framing, encoding or decoding
/// CESR primitives, counters and credential bodies
///
/// Only [`CesrError::ShortInput`] is resumable, every other variant is a permanent
/// rejection of the current stream position
#[derive(Debug, PartialEq, Clone, Error)]
pub enum CesrError {
    #[error("short input: need {needed} bytes, have {available}")]
    ShortInput { needed: usize, available: usize },

    #[error("cold start error: {0}")]
    ColdStart(String),

    #[error("malformed attachment: {0}")]
    MalformedAttachment(String),

    #[error("wrong kind: expected {expected}, got code {code}")]
    WrongKind { expected: Kind, code: String },

    #[error("unknown code: {0}")]
    UnknownCode(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("version error: {0}")]
    VersionError(String),

    #[error("unsupported serialization kind: {0}")]
    UnsupportedKind(String),

    #[error("unserialize error: {0}")]
    UnserializeError(String),
}

impl CesrError {
    pub fn short(needed: usize, available: usize) -> Self {
        CesrError::ShortInput { needed, available }
    }

    /// `is_resumable` tells a stream driver whether appending more bytes and
    /// retrying from the same position may succeed
    pub fn is_resumable(&self) -> bool {
        matches!(self, CesrError::ShortInput { .. })
    }
}

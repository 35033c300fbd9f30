use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextCodecError {
    /// The bytes of a span can not be interpreted as a value of the target type.
    #[error("corrupt data: {message} at offset {offset}: `{}`", String::from_utf8_lossy(.span))]
    CorruptData {
        message: String,
        offset: usize,
        span: Vec<u8>,
    },
    /// The value handed to an encoder breaks an invariant of its type.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
    #[error("expected a `{expected}` column, found `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("invalid text encoding option `{key}`: {reason}")]
    InvalidOption { key: String, reason: String },
    #[error("no separator is configured for nesting depth {0}")]
    NestingTooDeep(usize),
    #[error("`{0}` is not supported by the text encoding")]
    UnsupportedType(String),
}

impl TextCodecError {
    pub(crate) fn corrupt(message: impl Into<String>, slice: &[u8], offset: usize, length: usize) -> Self {
        TextCodecError::CorruptData {
            message: message.into(),
            offset,
            span: slice[offset..offset + length].to_vec(),
        }
    }
}

pub type Result<T, E = TextCodecError> = std::result::Result<T, E>;

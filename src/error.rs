use thiserror::Error;

/// Outcome taxonomy shared by every fallible operation in the library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum JsonErrorType {
    /// Null-ish inputs, zero-length buffers, out-of-range indices
    #[error("invalid arguments")]
    InvalidArguments,

    /// Token pool exhausted, or the configured allocator refused a request
    #[error("out of memory")]
    OutOfMemory,

    /// Malformed escape, unexpected byte, stray close delimiter
    #[error("invalid input")]
    InvalidInput,

    /// Input ended mid-string or mid-container; more bytes expected
    #[error("partial input")]
    PartialInput,

    /// A token of unrecognized type reached the document builder
    #[error("unknown type")]
    UnknownType,

    /// The requested key or index does not exist
    #[error("not found")]
    NotFound,
}

/// Complete error value: machine-readable type plus diagnostic context.
///
/// The `error_type` alone is the failure contract; `message` and `position`
/// exist for humans and logs.
#[derive(Debug, Clone)]
pub struct JsonError {
    pub error_type: JsonErrorType,
    pub message: String,
    pub position: Option<usize>,
}

impl JsonError {
    /// Create basic error
    pub fn new(error_type: JsonErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
            position: None,
        }
    }

    /// Attach the byte offset the failure was detected at
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Generate complete and readable error message
    pub fn format_message(&self) -> String {
        match self.position {
            Some(pos) => format!("{}: {} (at byte {})", self.error_type, self.message, pos),
            None => format!("{}: {}", self.error_type, self.message),
        }
    }
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format_message())
    }
}

impl std::error::Error for JsonError {}

/// Result alias used across the crate
pub type JsonResult<T> = Result<T, JsonError>;

/// `true` only for a successful outcome
pub fn status_is_good<T>(result: &JsonResult<T>) -> bool {
    result.is_ok()
}

/// `true` for any outcome other than success
pub fn status_is_bad<T>(result: &JsonResult<T>) -> bool {
    !status_is_good(result)
}

/// Pre-defined specific errors for common cases

pub fn invalid_arguments(message: impl Into<String>) -> JsonError {
    JsonError::new(JsonErrorType::InvalidArguments, message)
}

pub fn out_of_memory(message: impl Into<String>) -> JsonError {
    JsonError::new(JsonErrorType::OutOfMemory, message)
}

pub fn invalid_input(message: impl Into<String>, position: usize) -> JsonError {
    JsonError::new(JsonErrorType::InvalidInput, message).with_position(position)
}

pub fn partial_input(message: impl Into<String>, position: usize) -> JsonError {
    JsonError::new(JsonErrorType::PartialInput, message).with_position(position)
}

pub fn unknown_type(message: impl Into<String>) -> JsonError {
    JsonError::new(JsonErrorType::UnknownType, message)
}

pub fn not_found(message: impl Into<String>) -> JsonError {
    JsonError::new(JsonErrorType::NotFound, message)
}

//! Error types for the ActionScript virtual machine

use thiserror::Error;

/// Main error type for the virtual machine
///
/// Every error is fatal for the script that raised it: `AsBuffer::run`
/// stops at the first one and hands it back to the host. State mutated
/// before the failure (registers, globals, object members) stays mutated.
#[derive(Debug, Error)]
pub enum AvmError {
    /// Malformed bytecode: bad instruction length, unknown push type,
    /// nonzero reserved bits, stack underflow.
    #[error("FormatError: {message}")]
    Format { message: String },

    /// A value of the wrong dynamic type reached an operation.
    #[error("TypeError: {operation}: {message}")]
    Type {
        operation: &'static str,
        message: String,
    },

    /// No callable or prototype could be resolved.
    #[error("ResolutionError: {message}")]
    Resolution { message: String },

    /// Scripted calls nested deeper than the configured limit.
    #[error("CallDepthError: maximum call depth {depth} exceeded")]
    CallDepth { depth: usize },

    /// A host callback reported a failure.
    #[error("HostError: {message}")]
    Host { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AvmError {
    pub fn format_error(message: impl Into<String>) -> Self {
        AvmError::Format {
            message: message.into(),
        }
    }

    /// The self-consistency failure raised when an instruction consumed a
    /// different number of bytes than its header declared.
    pub fn invalid_tag(opcode: u8, declared: usize, consumed: i64) -> Self {
        AvmError::Format {
            message: format!(
                "Invalid tag: opcode 0x{:02X} declared {} bytes, consumed {}",
                opcode, declared, consumed
            ),
        }
    }

    pub fn stack_underflow(operation: &'static str) -> Self {
        AvmError::Format {
            message: format!("{}: stack underflow", operation),
        }
    }

    pub fn type_error(operation: &'static str, message: impl Into<String>) -> Self {
        AvmError::Type {
            operation,
            message: message.into(),
        }
    }

    pub fn resolution_error(message: impl Into<String>) -> Self {
        AvmError::Resolution {
            message: message.into(),
        }
    }

    pub fn host_error(message: impl Into<String>) -> Self {
        AvmError::Host {
            message: message.into(),
        }
    }

    /// Create an internal error for unexpected interpreter states
    /// These should never happen in correctly-written code
    pub fn internal_error(message: impl Into<String>) -> Self {
        AvmError::Internal(message.into())
    }

    pub fn is_format_error(&self) -> bool {
        matches!(self, AvmError::Format { .. })
    }

    pub fn is_type_error(&self) -> bool {
        matches!(self, AvmError::Type { .. })
    }

    pub fn is_resolution_error(&self) -> bool {
        matches!(self, AvmError::Resolution { .. })
    }
}

//! Error types for the boundary adapter
//!
//! Two families live here. [`NativeError`] is what native code reports to the
//! managed runtime: a numeric [`NativeErrorCode`] plus a message, materialized
//! as the domain exception. [`BridgeError`] covers failures of the adapter
//! itself (lookups, marshaling, configuration).

use std::fmt;
use thiserror::Error;

/// Failures of the adapter's own machinery
#[derive(Error, Debug)]
pub enum BridgeError {
    /// A managed type could not be located by name
    #[error("Class not found: {class}")]
    ClassNotFound {
        class: String,
    },

    /// The `(int, text)` constructor is missing on a managed type
    #[error("Constructor not found on {class}: {signature}")]
    ConstructorNotFound {
        class: String,
        signature: String,
    },

    /// A null managed handle was passed where a live one is required
    #[error("Null handle: {what}")]
    NullHandle {
        what: &'static str,
    },

    /// The runtime's encoded characters could not be decoded
    #[error("Encoding error: {message}")]
    Encoding {
        message: String,
    },

    /// A runtime facility reported failure
    #[error("Runtime error in {operation}: {message}")]
    Runtime {
        operation: &'static str,
        message: String,
    },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Convenience type alias for Results using [`BridgeError`]
pub type Result<T> = std::result::Result<T, BridgeError>;

impl BridgeError {
    /// Create a runtime-facility error
    pub fn runtime(operation: &'static str, message: impl Into<String>) -> Self {
        BridgeError::Runtime {
            operation,
            message: message.into(),
        }
    }

    /// Create a configuration error without a source
    pub fn config(message: impl Into<String>) -> Self {
        BridgeError::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error wrapping its cause
    pub fn config_with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        BridgeError::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error is a failed lookup of a type or constructor
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            BridgeError::ClassNotFound { .. } | BridgeError::ConstructorNotFound { .. }
        )
    }
}

/// Codes carried by the domain exception's integer field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeErrorCode {
    /// Generic I/O failure
    IoError,
    /// Unclassified native failure
    Internal,
    /// Buffer is not usable for native I/O
    InvalidBuffer,
    /// Buffer or position is not aligned to the device block size
    NotAligned,
    /// The async I/O context could not be initialized
    CantInitializeAio,
    /// The async I/O context could not be released
    CantReleaseAio,
    /// A file could not be opened or closed
    CantOpenCloseFile,
    /// The submission queue could not be allocated
    CantAllocateQueue,
    /// Preallocating a file failed
    PreallocateFile,
    /// Native memory allocation failed
    AllocateMemory,
    /// The async I/O queue is full
    AioFull,
}

impl NativeErrorCode {
    /// All known codes
    pub const ALL: [NativeErrorCode; 11] = [
        NativeErrorCode::IoError,
        NativeErrorCode::Internal,
        NativeErrorCode::InvalidBuffer,
        NativeErrorCode::NotAligned,
        NativeErrorCode::CantInitializeAio,
        NativeErrorCode::CantReleaseAio,
        NativeErrorCode::CantOpenCloseFile,
        NativeErrorCode::CantAllocateQueue,
        NativeErrorCode::PreallocateFile,
        NativeErrorCode::AllocateMemory,
        NativeErrorCode::AioFull,
    ];

    /// The integer passed to the domain exception constructor
    pub fn code(self) -> i32 {
        match self {
            NativeErrorCode::IoError => 6,
            NativeErrorCode::Internal => 200,
            NativeErrorCode::InvalidBuffer => 201,
            NativeErrorCode::NotAligned => 202,
            NativeErrorCode::CantInitializeAio => 203,
            NativeErrorCode::CantReleaseAio => 204,
            NativeErrorCode::CantOpenCloseFile => 205,
            NativeErrorCode::CantAllocateQueue => 206,
            NativeErrorCode::PreallocateFile => 208,
            NativeErrorCode::AllocateMemory => 209,
            NativeErrorCode::AioFull => 211,
        }
    }

    /// Look up a code by its integer value
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }
}

impl fmt::Display for NativeErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NativeErrorCode::IoError => "IO_ERROR",
            NativeErrorCode::Internal => "NATIVE_ERROR_INTERNAL",
            NativeErrorCode::InvalidBuffer => "NATIVE_ERROR_INVALID_BUFFER",
            NativeErrorCode::NotAligned => "NATIVE_ERROR_NOT_ALIGNED",
            NativeErrorCode::CantInitializeAio => "NATIVE_ERROR_CANT_INITIALIZE_AIO",
            NativeErrorCode::CantReleaseAio => "NATIVE_ERROR_CANT_RELEASE_AIO",
            NativeErrorCode::CantOpenCloseFile => "NATIVE_ERROR_CANT_OPEN_CLOSE_FILE",
            NativeErrorCode::CantAllocateQueue => "NATIVE_ERROR_CANT_ALLOCATE_QUEUE",
            NativeErrorCode::PreallocateFile => "NATIVE_ERROR_PREALLOCATE_FILE",
            NativeErrorCode::AllocateMemory => "NATIVE_ERROR_ALLOCATE_MEMORY",
            NativeErrorCode::AioFull => "NATIVE_ERROR_AIO_FULL",
        };
        write!(f, "{}({})", name, self.code())
    }
}

/// A failure reported by native code, destined to become the domain exception
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct NativeError {
    pub code: NativeErrorCode,
    pub message: String,
}

impl NativeError {
    pub fn new(code: NativeErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(NativeErrorCode::Internal, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(NativeErrorCode::IoError, message)
    }

    pub fn invalid_buffer(message: impl Into<String>) -> Self {
        Self::new(NativeErrorCode::InvalidBuffer, message)
    }

    pub fn not_aligned(message: impl Into<String>) -> Self {
        Self::new(NativeErrorCode::NotAligned, message)
    }

    pub fn allocate_memory(message: impl Into<String>) -> Self {
        Self::new(NativeErrorCode::AllocateMemory, message)
    }

    pub fn aio_full(message: impl Into<String>) -> Self {
        Self::new(NativeErrorCode::AioFull, message)
    }
}

impl From<BridgeError> for NativeError {
    fn from(error: BridgeError) -> Self {
        NativeError::internal(error.to_string())
    }
}

impl From<std::io::Error> for NativeError {
    fn from(error: std::io::Error) -> Self {
        NativeError::io(error.to_string())
    }
}

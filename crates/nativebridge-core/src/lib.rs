//! Nativebridge Core - boundary adapter between native code and a managed runtime
//!
//! Native code that runs on behalf of a managed runtime (the JVM, reached
//! through JNI) needs two things from it: a way to report failures as
//! managed exceptions, and a way to read managed strings. This crate
//! provides both on top of the [`ManagedRuntime`] trait, which each runtime
//! backend implements.
//!
//! # Main Components
//!
//! - **Adapter**: raise generic and domain failures, convert strings
//! - **Marshaling**: scoped, always-released views of managed strings
//! - **Boundary**: panic-safe execution that reports through exceptions
//! - **Configuration**: which managed types get raised
//!
//! # Example
//!
//! ```no_run
//! use nativebridge_core::{raise_domain_failure, ManagedRuntime, NativeErrorCode};
//!
//! fn report_full<R: ManagedRuntime>(ctx: &mut R) {
//!     raise_domain_failure(ctx, NativeErrorCode::AioFull.code(), "disk full");
//! }
//! ```

pub mod adapter;
pub mod boundary;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod marshal;
pub mod runtime;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use adapter::{
    convert_text, default_adapter, raise_domain_failure, raise_generic_failure, BoundaryAdapter,
    CLASS_NOT_FOUND_MESSAGE, CONSTRUCTOR_NOT_FOUND_MESSAGE,
};
pub use boundary::guarded;
pub use config::AdapterConfig;
pub use diagnostics::{Captured, DiagnosticSink, Silent, Stderr};
pub use error::{BridgeError, NativeError, NativeErrorCode, Result};
pub use marshal::ScopedChars;
pub use runtime::ManagedRuntime;

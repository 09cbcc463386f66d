//! Nativebridge JNI - the boundary adapter for the JVM
//!
//! Wraps a `JNIEnv` in [`JvmContext`], which implements
//! [`nativebridge_core::ManagedRuntime`], and offers JNI-shaped helpers on
//! top of the core adapter.
//!
//! # Safety
//!
//! Every helper assumes it runs on the thread that owns the `JNIEnv`, inside
//! a native method call, with no exception already pending.

mod context;
mod entry;
#[cfg(feature = "onload")]
mod onload;

pub use nativebridge_core as bridge;

pub use context::{internal_name, JvmContext, CODE_MESSAGE_CONSTRUCTOR};
pub use entry::{
    convert_java_string, throw_exception, throw_native_error, throw_runtime_exception,
    with_boundary,
};
#[cfg(feature = "onload")]
pub use onload::{init_logging, LOG_ENV};

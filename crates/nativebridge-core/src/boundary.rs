//! Panic-safe execution of native work at the managed boundary
//!
//! Native code must never unwind into the managed runtime. [`guarded`] runs a
//! closure, turns its [`NativeError`] into the domain exception and any panic
//! into the generic failure, and tells the caller whether a value came back.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::adapter::BoundaryAdapter;
use crate::diagnostics::DiagnosticSink;
use crate::error::NativeError;
use crate::runtime::ManagedRuntime;

/// Run `f`, raising into `ctx` on error or panic.
///
/// Returns `None` exactly when an exception has been made pending.
pub fn guarded<R, D, T, F>(adapter: &BoundaryAdapter<D>, ctx: &mut R, f: F) -> Option<T>
where
    R: ManagedRuntime,
    D: DiagnosticSink,
    F: FnOnce(&mut R) -> Result<T, NativeError>,
{
    match panic::catch_unwind(AssertUnwindSafe(|| f(&mut *ctx))) {
        Ok(Ok(value)) => Some(value),
        Ok(Err(error)) => {
            adapter.raise(ctx, &error);
            None
        }
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            tracing::error!(panic = %msg, "native call panicked");
            adapter.raise_generic_failure(ctx, &format!("Panic occurred: {}", msg));
            None
        }
    }
}

/// Extract a message from a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    }
}

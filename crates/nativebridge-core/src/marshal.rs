//! Managed string → native string marshaling
//!
//! The runtime lends out a pinned, encoded view of a string's characters.
//! [`ScopedChars`] owns that loan and returns it in `Drop`, so the view is
//! released exactly once on every path out of [`convert_text`].

use std::borrow::Cow;
use std::ffi::CStr;
use std::os::raw::c_char;

use crate::error::{BridgeError, Result};
use crate::runtime::ManagedRuntime;

/// A pinned encoded view of a managed string, released on drop
pub struct ScopedChars<'r, 'h, R: ManagedRuntime> {
    runtime: &'r mut R,
    handle: &'h R::StringHandle,
    chars: *const c_char,
}

impl<'r, 'h, R: ManagedRuntime> ScopedChars<'r, 'h, R> {
    /// Pin the characters of `handle`
    pub fn acquire(runtime: &'r mut R, handle: &'h R::StringHandle) -> Result<Self> {
        let chars = runtime.acquire_chars(handle)?;
        if chars.is_null() {
            return Err(BridgeError::runtime(
                "acquire_chars",
                "runtime returned a null character view",
            ));
        }
        Ok(Self {
            runtime,
            handle,
            chars,
        })
    }

    /// The encoded bytes, without the terminating NUL
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: `chars` is non-null and NUL-terminated for as long as the
        // view is pinned, which is the lifetime of `self`.
        unsafe { CStr::from_ptr(self.chars) }.to_bytes()
    }
}

impl<R: ManagedRuntime> Drop for ScopedChars<'_, '_, R> {
    fn drop(&mut self) {
        // SAFETY: `chars` was acquired from this handle and is released only here.
        unsafe { self.runtime.release_chars(self.handle, self.chars) };
    }
}

/// Decode JVM modified UTF-8 into an owned `String`.
///
/// Handles the two-byte NUL form and surrogate-pair encoded supplementary
/// characters that plain UTF-8 decoding rejects.
pub fn decode_java_chars(bytes: &[u8]) -> Result<String> {
    cesu8::from_java_cesu8(bytes)
        .map(Cow::into_owned)
        .map_err(|e| BridgeError::Encoding {
            message: format!("{} ({} bytes)", e, bytes.len()),
        })
}

/// Copy a managed string into an independent native `String`.
///
/// A null handle is rejected before anything is pinned.
pub fn convert_text<R: ManagedRuntime>(runtime: &mut R, handle: &R::StringHandle) -> Result<String> {
    if runtime.is_null_text(handle) {
        return Err(BridgeError::NullHandle {
            what: "managed string",
        });
    }

    let view = ScopedChars::acquire(runtime, handle)?;
    let text = decode_java_chars(view.as_bytes())?;
    drop(view);

    tracing::trace!(len = text.len(), "converted managed string");
    Ok(text)
}

//! The seam between the adapter and a concrete managed runtime
//!
//! A [`ManagedRuntime`] is the execution context of one native call: it can
//! look up types, build and throw exceptions, and lend out encoded views of
//! managed strings. The adapter only ever talks to the runtime through this
//! trait.

use std::os::raw::c_char;

use crate::error::Result;

/// Per-call interface into a managed runtime
pub trait ManagedRuntime {
    /// A resolved managed type
    type Class;
    /// A resolved `(int, text)` constructor
    type Constructor;
    /// A managed text value created from native text
    type Text;
    /// A managed string handle received from managed code
    type StringHandle;

    /// Look up a type by its dotted fully-qualified name.
    ///
    /// On failure the runtime may leave its own lookup exception pending.
    fn find_class(&mut self, name: &str) -> Result<Self::Class>;

    /// Look up the `(int, text)` constructor of `class`.
    ///
    /// On failure the runtime may leave its own lookup exception pending.
    fn find_code_message_constructor(
        &mut self,
        class: &Self::Class,
        class_name: &str,
    ) -> Result<Self::Constructor>;

    /// Create a managed text value holding `value`
    fn new_text(&mut self, value: &str) -> Result<Self::Text>;

    /// Instantiate `class` from `message` and make it the pending exception
    fn throw_new(&mut self, class: &Self::Class, message: &str) -> Result<()>;

    /// Instantiate `class` through `(code, text)` and make it the pending exception
    fn throw_constructed(
        &mut self,
        class: &Self::Class,
        constructor: &Self::Constructor,
        code: i32,
        text: Self::Text,
    ) -> Result<()>;

    /// Drop whatever exception is currently pending
    fn clear_pending(&mut self);

    /// Whether `handle` refers to no string at all
    fn is_null_text(&self, handle: &Self::StringHandle) -> bool;

    /// Pin an encoded, NUL-terminated view of the string's characters.
    ///
    /// Every successful call must be matched by exactly one
    /// [`release_chars`](Self::release_chars) with the same pointer.
    fn acquire_chars(&mut self, handle: &Self::StringHandle) -> Result<*const c_char>;

    /// Return a view obtained from [`acquire_chars`](Self::acquire_chars).
    ///
    /// # Safety
    /// `chars` must come from `acquire_chars` on the same handle and must not
    /// have been released already.
    unsafe fn release_chars(&mut self, handle: &Self::StringHandle, chars: *const c_char);
}

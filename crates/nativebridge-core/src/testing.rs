//! In-memory managed runtime for tests
//!
//! [`RecordingRuntime`] behaves like a minimal JVM execution context: a type
//! registry, a string table, a single pending-exception slot and a ledger of
//! pinned character views for leak detection.

use std::collections::HashMap;
use std::ffi::CString;
use std::os::raw::c_char;

use crate::config::DEFAULT_GENERIC_FAILURE_CLASS;
use crate::error::{BridgeError, Result};
use crate::runtime::ManagedRuntime;

const NO_CLASS_DEF_FOUND: &str = "java.lang.NoClassDefFoundError";
const NO_SUCH_METHOD: &str = "java.lang.NoSuchMethodError";
const CODE_MESSAGE_SIGNATURE: &str = "(ILjava/lang/String;)V";

/// The exception currently pending on a [`RecordingRuntime`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingException {
    pub class: String,
    /// Set only when raised through the `(int, text)` constructor
    pub code: Option<i32>,
    pub message: String,
}

/// A managed string handle; `None` is the null handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagedString(Option<usize>);

/// A resolved type in a [`RecordingRuntime`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRef(String);

/// The resolved `(int, text)` constructor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeMessageConstructor;

#[derive(Debug, Default)]
pub struct RecordingRuntime {
    classes: HashMap<String, bool>,
    strings: Vec<String>,
    pending: Option<PendingException>,
    views: HashMap<usize, CString>,
    acquired: usize,
    released: usize,
    unknown_releases: usize,
    lookups_with_pending: usize,
    fail_text_creation: bool,
}

impl RecordingRuntime {
    /// Runtime knowing only the generic failure type
    pub fn new() -> Self {
        let mut runtime = Self::empty();
        runtime.register_class(DEFAULT_GENERIC_FAILURE_CLASS);
        runtime
    }

    /// Runtime with an empty type registry
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register a type without the `(int, text)` constructor
    pub fn register_class(&mut self, name: &str) -> &mut Self {
        self.classes.entry(name.to_string()).or_insert(false);
        self
    }

    /// Register a type that has the `(int, text)` constructor
    pub fn register_class_with_constructor(&mut self, name: &str) -> &mut Self {
        self.classes.insert(name.to_string(), true);
        self
    }

    /// Make `new_text` fail, as when the runtime is out of memory
    pub fn fail_text_creation(&mut self, fail: bool) -> &mut Self {
        self.fail_text_creation = fail;
        self
    }

    /// Intern a string and return its handle
    pub fn new_string(&mut self, value: &str) -> ManagedString {
        self.strings.push(value.to_string());
        ManagedString(Some(self.strings.len() - 1))
    }

    pub fn null_string(&self) -> ManagedString {
        ManagedString(None)
    }

    pub fn string_value(&self, handle: &ManagedString) -> Option<&str> {
        handle.0.and_then(|i| self.strings.get(i)).map(String::as_str)
    }

    pub fn pending(&self) -> Option<&PendingException> {
        self.pending.as_ref()
    }

    pub fn take_pending(&mut self) -> Option<PendingException> {
        self.pending.take()
    }

    pub fn views_acquired(&self) -> usize {
        self.acquired
    }

    pub fn views_released(&self) -> usize {
        self.released
    }

    /// Views acquired but not yet released
    pub fn outstanding_views(&self) -> usize {
        self.views.len()
    }

    /// Releases of pointers that were never handed out (or already released)
    pub fn unknown_releases(&self) -> usize {
        self.unknown_releases
    }

    /// Leave an exception pending, as a failed runtime call would
    pub fn simulate_exception(&mut self, class: &str, message: &str) -> &mut Self {
        self.set_pending(class, None, message);
        self
    }

    /// Type or constructor lookups made while an exception was pending
    pub fn lookups_with_pending(&self) -> usize {
        self.lookups_with_pending
    }

    fn set_pending(&mut self, class: &str, code: Option<i32>, message: impl Into<String>) {
        self.pending = Some(PendingException {
            class: class.to_string(),
            code,
            message: message.into(),
        });
    }
}

impl ManagedRuntime for RecordingRuntime {
    type Class = ClassRef;
    type Constructor = CodeMessageConstructor;
    type Text = ManagedString;
    type StringHandle = ManagedString;

    fn find_class(&mut self, name: &str) -> Result<ClassRef> {
        if self.pending.is_some() {
            self.lookups_with_pending += 1;
        }
        if self.classes.contains_key(name) {
            return Ok(ClassRef(name.to_string()));
        }
        self.set_pending(NO_CLASS_DEF_FOUND, None, name.replace('.', "/"));
        Err(BridgeError::ClassNotFound {
            class: name.to_string(),
        })
    }

    fn find_code_message_constructor(
        &mut self,
        class: &ClassRef,
        class_name: &str,
    ) -> Result<CodeMessageConstructor> {
        if self.pending.is_some() {
            self.lookups_with_pending += 1;
        }
        if self.classes.get(&class.0).copied().unwrap_or(false) {
            return Ok(CodeMessageConstructor);
        }
        self.set_pending(NO_SUCH_METHOD, None, "<init>");
        Err(BridgeError::ConstructorNotFound {
            class: class_name.to_string(),
            signature: CODE_MESSAGE_SIGNATURE.to_string(),
        })
    }

    fn new_text(&mut self, value: &str) -> Result<ManagedString> {
        if self.fail_text_creation {
            self.set_pending("java.lang.OutOfMemoryError", None, "string allocation");
            return Err(BridgeError::runtime("new_text", "allocation failed"));
        }
        Ok(self.new_string(value))
    }

    fn throw_new(&mut self, class: &ClassRef, message: &str) -> Result<()> {
        self.set_pending(&class.0, None, message);
        Ok(())
    }

    fn throw_constructed(
        &mut self,
        class: &ClassRef,
        _constructor: &CodeMessageConstructor,
        code: i32,
        text: ManagedString,
    ) -> Result<()> {
        let message = self
            .string_value(&text)
            .map(str::to_string)
            .ok_or_else(|| BridgeError::runtime("throw_constructed", "dangling text handle"))?;
        self.set_pending(&class.0, Some(code), message);
        Ok(())
    }

    fn clear_pending(&mut self) {
        self.pending = None;
    }

    fn is_null_text(&self, handle: &ManagedString) -> bool {
        handle.0.is_none()
    }

    fn acquire_chars(&mut self, handle: &ManagedString) -> Result<*const c_char> {
        let value = self
            .string_value(handle)
            .ok_or_else(|| BridgeError::runtime("acquire_chars", "dangling string handle"))?;
        let encoded = cesu8::to_java_cesu8(value).into_owned();
        let chars = CString::new(encoded)
            .map_err(|e| BridgeError::runtime("acquire_chars", e.to_string()))?;

        let ptr = chars.as_ptr();
        self.views.insert(ptr as usize, chars);
        self.acquired += 1;
        Ok(ptr)
    }

    unsafe fn release_chars(&mut self, _handle: &ManagedString, chars: *const c_char) {
        if self.views.remove(&(chars as usize)).is_some() {
            self.released += 1;
        } else {
            self.unknown_releases += 1;
        }
    }
}

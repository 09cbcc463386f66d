//! `ManagedRuntime` over a live `JNIEnv`

use std::os::raw::c_char;
use std::ptr;

use jni::objects::{JClass, JMethodID, JString, JThrowable, JValue};
use jni::JNIEnv;
use nativebridge_core::{BridgeError, ManagedRuntime, Result};

/// JNI signature of the `(int, String)` constructor
pub const CODE_MESSAGE_CONSTRUCTOR: &str = "(ILjava/lang/String;)V";

/// The execution context of one JNI call
pub struct JvmContext<'a, 'local> {
    env: &'a mut JNIEnv<'local>,
}

impl<'a, 'local> JvmContext<'a, 'local> {
    pub fn new(env: &'a mut JNIEnv<'local>) -> Self {
        Self { env }
    }

    pub fn env(&mut self) -> &mut JNIEnv<'local> {
        &mut *self.env
    }
}

/// `java.lang.Foo` → `java/lang/Foo`
pub fn internal_name(name: &str) -> String {
    name.replace('.', "/")
}

fn jni_error(operation: &'static str, error: jni::errors::Error) -> BridgeError {
    BridgeError::runtime(operation, error.to_string())
}

impl<'a, 'local> ManagedRuntime for JvmContext<'a, 'local> {
    type Class = JClass<'local>;
    type Constructor = JMethodID;
    type Text = JString<'local>;
    type StringHandle = JString<'local>;

    fn find_class(&mut self, name: &str) -> Result<JClass<'local>> {
        let internal = internal_name(name);
        self.env.find_class(internal.as_str()).map_err(|e| {
            tracing::debug!(class = name, error = %e, "FindClass failed");
            BridgeError::ClassNotFound {
                class: name.to_string(),
            }
        })
    }

    fn find_code_message_constructor(
        &mut self,
        class: &JClass<'local>,
        class_name: &str,
    ) -> Result<JMethodID> {
        self.env
            .get_method_id(class, "<init>", CODE_MESSAGE_CONSTRUCTOR)
            .map_err(|e| {
                tracing::debug!(class = class_name, error = %e, "GetMethodID failed");
                BridgeError::ConstructorNotFound {
                    class: class_name.to_string(),
                    signature: CODE_MESSAGE_CONSTRUCTOR.to_string(),
                }
            })
    }

    fn new_text(&mut self, value: &str) -> Result<JString<'local>> {
        self.env
            .new_string(value)
            .map_err(|e| jni_error("NewStringUTF", e))
    }

    fn throw_new(&mut self, class: &JClass<'local>, message: &str) -> Result<()> {
        self.env
            .throw_new(class, message)
            .map_err(|e| jni_error("ThrowNew", e))
    }

    fn throw_constructed(
        &mut self,
        class: &JClass<'local>,
        constructor: &JMethodID,
        code: i32,
        text: JString<'local>,
    ) -> Result<()> {
        let args = [JValue::Int(code).as_jni(), JValue::Object(&*text).as_jni()];
        // SAFETY: `constructor` was resolved on `class` with CODE_MESSAGE_CONSTRUCTOR,
        // which `args` matches: an int followed by a java.lang.String.
        let exception = unsafe { self.env.new_object_unchecked(class, *constructor, &args) }
            .map_err(|e| jni_error("NewObject", e))?;
        self.env
            .throw(JThrowable::from(exception))
            .map_err(|e| jni_error("Throw", e))
    }

    fn clear_pending(&mut self) {
        if let Err(e) = self.env.exception_clear() {
            tracing::warn!(error = %e, "ExceptionClear failed");
        }
    }

    fn is_null_text(&self, handle: &JString<'local>) -> bool {
        handle.is_null()
    }

    fn acquire_chars(&mut self, handle: &JString<'local>) -> Result<*const c_char> {
        let raw = self.env.get_raw();
        // SAFETY: `raw` is the live interface pointer of this call and `handle`
        // is a non-null reference to a java.lang.String.
        let chars = unsafe {
            let get = (**raw)
                .GetStringUTFChars
                .ok_or_else(|| BridgeError::runtime("GetStringUTFChars", "missing from JNI table"))?;
            get(raw, handle.as_raw(), ptr::null_mut())
        };
        if chars.is_null() {
            return Err(BridgeError::runtime("GetStringUTFChars", "returned null"));
        }
        Ok(chars)
    }

    unsafe fn release_chars(&mut self, handle: &JString<'local>, chars: *const c_char) {
        let raw = self.env.get_raw();
        match (**raw).ReleaseStringUTFChars {
            Some(release) => release(raw, handle.as_raw(), chars),
            None => tracing::error!("ReleaseStringUTFChars missing from JNI table"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_name() {
        assert_eq!(internal_name("java.lang.RuntimeException"), "java/lang/RuntimeException");
        assert_eq!(
            internal_name("org.apache.activemq.artemis.api.core.ActiveMQException"),
            "org/apache/activemq/artemis/api/core/ActiveMQException"
        );
        assert_eq!(internal_name("com.example.Outer$Inner"), "com/example/Outer$Inner");
    }

    #[test]
    fn test_constructor_signature() {
        assert!(CODE_MESSAGE_CONSTRUCTOR.starts_with("(I"));
        assert!(CODE_MESSAGE_CONSTRUCTOR.ends_with(")V"));
    }
}

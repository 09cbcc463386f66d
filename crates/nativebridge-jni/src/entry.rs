//! Entry points for native code holding a `JNIEnv`
//!
//! These use the process-wide adapter, configured from the environment on
//! first use.

use jni::objects::JString;
use jni::JNIEnv;
use nativebridge_core::{default_adapter, guarded, NativeError, Result};

use crate::context::JvmContext;

/// Throw a `java.lang.RuntimeException` (or the configured generic type)
pub fn throw_runtime_exception(env: &mut JNIEnv<'_>, message: &str) {
    default_adapter().raise_generic_failure(&mut JvmContext::new(env), message);
}

/// Throw the domain exception with `(code, message)`
pub fn throw_exception(env: &mut JNIEnv<'_>, code: i32, message: &str) {
    default_adapter().raise_domain_failure(&mut JvmContext::new(env), code, message);
}

/// Throw the domain exception for a native error
pub fn throw_native_error(env: &mut JNIEnv<'_>, error: &NativeError) {
    default_adapter().raise(&mut JvmContext::new(env), error);
}

/// Copy a Java string into a Rust `String`
pub fn convert_java_string<'local>(env: &mut JNIEnv<'local>, jstr: &JString<'local>) -> Result<String> {
    default_adapter().convert_text(&mut JvmContext::new(env), jstr)
}

/// Run `f` so that errors and panics surface as pending Java exceptions.
///
/// Returns `None` when an exception is pending; the caller should return to
/// Java immediately.
pub fn with_boundary<'local, T, F>(env: &mut JNIEnv<'local>, f: F) -> Option<T>
where
    F: FnOnce(&mut JvmContext<'_, 'local>) -> std::result::Result<T, NativeError>,
{
    guarded(default_adapter(), &mut JvmContext::new(env), f)
}

/// Run a fallible body inside a JNI function, returning `$default` to Java
/// when it failed and an exception is pending.
///
/// ```ignore
/// #[no_mangle]
/// pub extern "system" fn Java_org_example_Native_open<'local>(
///     mut env: JNIEnv<'local>,
///     _class: JClass<'local>,
///     path: JString<'local>,
/// ) -> jint {
///     jni_boundary!(&mut env, -1, |ctx| {
///         let path = nativebridge_jni::bridge::convert_text(ctx, &path)?;
///         open_journal(&path)
///     })
/// }
/// ```
#[macro_export]
macro_rules! jni_boundary {
    ($env:expr, $default:expr, $body:expr) => {
        match $crate::with_boundary($env, $body) {
            Some(value) => value,
            None => $default,
        }
    };
}

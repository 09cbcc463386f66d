//! `JvmContext` against an embedded JVM
//!
//! Requires a JDK; enable with `--features jvm-tests`. The JVM runs with
//! `-Xcheck:jni`, so a JNI call made with an exception pending aborts.

#![cfg(feature = "jvm-tests")]

use std::sync::OnceLock;

use jni::objects::{JObject, JString};
use jni::{InitArgsBuilder, JNIEnv, JNIVersion, JavaVM};
use nativebridge_core::{
    AdapterConfig, BoundaryAdapter, NativeError, Silent, CLASS_NOT_FOUND_MESSAGE,
    CONSTRUCTOR_NOT_FOUND_MESSAGE,
};
use nativebridge_jni::{convert_java_string, throw_runtime_exception, with_boundary, JvmContext};

fn jvm() -> &'static JavaVM {
    static JVM: OnceLock<JavaVM> = OnceLock::new();
    JVM.get_or_init(|| {
        let args = InitArgsBuilder::new()
            .version(JNIVersion::V8)
            .option("-Xcheck:jni")
            .build()
            .expect("JVM init args");
        JavaVM::new(args).expect("start JVM")
    })
}

/// Clear the pending exception and return (is instance of `class`, message)
fn take_exception(env: &mut JNIEnv<'_>, class: &str) -> (bool, String) {
    assert!(env.exception_check().unwrap(), "no exception pending");
    let exception = env.exception_occurred().unwrap();
    env.exception_clear().unwrap();

    let is_instance = env.is_instance_of(&exception, class).unwrap();
    let message = env
        .call_method(&exception, "getMessage", "()Ljava/lang/String;", &[])
        .unwrap()
        .l()
        .unwrap();
    let message = JString::from(message);
    let message: String = env.get_string(&message).unwrap().into();
    (is_instance, message)
}

#[test]
fn test_generic_raise() {
    let mut guard = jvm().attach_current_thread().unwrap();
    let env: &mut JNIEnv = &mut guard;

    throw_runtime_exception(env, "io_submit failed");

    let (is_runtime, message) = take_exception(env, "java/lang/RuntimeException");
    assert!(is_runtime);
    assert_eq!(message, "io_submit failed");
}

#[test]
fn test_domain_raise_without_domain_class_falls_back() {
    let mut guard = jvm().attach_current_thread().unwrap();
    let env: &mut JNIEnv = &mut guard;
    let adapter = BoundaryAdapter::with_sink(AdapterConfig::default(), Silent);

    adapter.raise_domain_failure(&mut JvmContext::new(env), 503, "disk full");

    let (is_runtime, message) = take_exception(env, "java/lang/RuntimeException");
    assert!(is_runtime);
    assert_eq!(message, CLASS_NOT_FOUND_MESSAGE);
}

#[test]
fn test_domain_raise_without_constructor_falls_back() {
    let mut guard = jvm().attach_current_thread().unwrap();
    let env: &mut JNIEnv = &mut guard;
    let config = AdapterConfig::default().domain_failure_class("java.lang.IllegalStateException");
    let adapter = BoundaryAdapter::with_sink(config, Silent);

    adapter.raise_domain_failure(&mut JvmContext::new(env), 503, "disk full");

    let (is_runtime, message) = take_exception(env, "java/lang/RuntimeException");
    assert!(is_runtime);
    assert_eq!(message, CONSTRUCTOR_NOT_FOUND_MESSAGE);
}

#[test]
fn test_string_round_trip() {
    let mut guard = jvm().attach_current_thread().unwrap();
    let env: &mut JNIEnv = &mut guard;

    for sample in ["/var/lib/journal", "journal-日本語", "clef 𝄞", "nul\0inside"] {
        let jstr = env.new_string(sample).unwrap();
        assert_eq!(convert_java_string(env, &jstr).unwrap(), sample);
    }
    assert!(!env.exception_check().unwrap());
}

#[test]
fn test_null_string_is_rejected() {
    let mut guard = jvm().attach_current_thread().unwrap();
    let env: &mut JNIEnv = &mut guard;

    let null = JString::from(JObject::null());
    assert!(convert_java_string(env, &null).is_err());
    assert!(!env.exception_check().unwrap());
}

#[test]
fn test_boundary_replaces_pending_exception() {
    let mut guard = jvm().attach_current_thread().unwrap();
    let env: &mut JNIEnv = &mut guard;

    let out: Option<()> = with_boundary(env, |ctx| {
        ctx.env()
            .throw_new("java/lang/IllegalArgumentException", "left over")
            .unwrap();
        Err(NativeError::internal("native call failed"))
    });

    assert!(out.is_none());
    let (is_runtime, message) = take_exception(env, "java/lang/RuntimeException");
    assert!(is_runtime);
    assert_eq!(message, CLASS_NOT_FOUND_MESSAGE);
}

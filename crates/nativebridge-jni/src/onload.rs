//! Library load hook
//!
//! Installs a `tracing` subscriber when the JVM loads the library. The filter
//! comes from `NATIVEBRIDGE_LOG` (e.g. `nativebridge_core=debug`) and
//! defaults to `warn`.

use std::os::raw::c_void;

use jni::sys::{jint, JavaVM, JNI_VERSION_1_8};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "NATIVEBRIDGE_LOG";

/// Install a stderr `fmt` subscriber unless one is already set
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("tracing subscriber installed");
    }
}

#[no_mangle]
#[allow(non_snake_case)]
pub extern "system" fn JNI_OnLoad(_vm: *mut JavaVM, _reserved: *mut c_void) -> jint {
    init_logging();
    let config = nativebridge_core::default_adapter().config();
    tracing::info!(
        generic = %config.generic_failure_class,
        domain = %config.domain_failure_class,
        "nativebridge loaded"
    );
    JNI_VERSION_1_8
}

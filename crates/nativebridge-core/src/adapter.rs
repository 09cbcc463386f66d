//! The boundary adapter
//!
//! Raises managed exceptions on behalf of native code and copies managed
//! strings out into native ones. Failures of the adapter's own lookups are
//! never handed back to native code: they degrade to the generic failure
//! type plus one diagnostic line, so reporting a failure cannot itself
//! become fatal to the host.

use std::sync::OnceLock;

use crate::config::AdapterConfig;
use crate::diagnostics::{DiagnosticSink, Stderr};
use crate::error::{BridgeError, NativeError, Result};
use crate::marshal;
use crate::runtime::ManagedRuntime;

/// Generic failure message used when the domain type is missing
pub const CLASS_NOT_FOUND_MESSAGE: &str = "Can't find Exception class";

/// Generic failure message used when the `(int, text)` constructor is missing
pub const CONSTRUCTOR_NOT_FOUND_MESSAGE: &str = "Can't find Constructor for Exception";

/// Translates native failures and strings into the managed runtime's terms
#[derive(Debug)]
pub struct BoundaryAdapter<D: DiagnosticSink = Stderr> {
    config: AdapterConfig,
    sink: D,
}

impl BoundaryAdapter<Stderr> {
    /// Adapter writing diagnostics to standard error
    pub fn new(config: AdapterConfig) -> Self {
        Self::with_sink(config, Stderr)
    }
}

impl Default for BoundaryAdapter<Stderr> {
    fn default() -> Self {
        Self::new(AdapterConfig::default())
    }
}

impl<D: DiagnosticSink> BoundaryAdapter<D> {
    pub fn with_sink(config: AdapterConfig, sink: D) -> Self {
        Self { config, sink }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    /// Raise the generic failure type carrying `message`.
    ///
    /// Any exception already pending is replaced. If the generic type itself
    /// cannot be found, whatever the runtime's lookup left pending stays.
    pub fn raise_generic_failure<R: ManagedRuntime>(&self, ctx: &mut R, message: &str) {
        let class_name = self.config.generic_failure_class.as_str();

        // Type lookups are illegal while an exception is pending.
        ctx.clear_pending();

        let class = match ctx.find_class(class_name) {
            Ok(class) => class,
            Err(e) => {
                tracing::error!(class = class_name, error = %e, msg = message, "generic failure type unavailable");
                return;
            }
        };

        match ctx.throw_new(&class, message) {
            Ok(()) => tracing::debug!(class = class_name, msg = message, "raised generic failure"),
            Err(e) => {
                tracing::error!(class = class_name, error = %e, msg = message, "failed to raise generic failure")
            }
        }
    }

    /// Raise the domain exception type carrying `(code, message)`.
    ///
    /// Falls back to the generic failure type, with a diagnostic line, when
    /// the domain type or its `(int, text)` constructor cannot be found.
    /// Any exception already pending is replaced.
    pub fn raise_domain_failure<R: ManagedRuntime>(&self, ctx: &mut R, code: i32, message: &str) {
        let class_name = self.config.domain_failure_class.as_str();

        ctx.clear_pending();

        let class = match ctx.find_class(class_name) {
            Ok(class) => class,
            Err(e) => {
                ctx.clear_pending();
                self.diagnose(&format!("Couldn't throw exception message:= {}", message), &e);
                self.raise_generic_failure(ctx, CLASS_NOT_FOUND_MESSAGE);
                return;
            }
        };

        let constructor = match ctx.find_code_message_constructor(&class, class_name) {
            Ok(constructor) => constructor,
            Err(e) => {
                ctx.clear_pending();
                let signature = match &e {
                    BridgeError::ConstructorNotFound { signature, .. } => signature.as_str(),
                    _ => "(int, text)",
                };
                self.diagnose(
                    &format!(
                        "Couldn't find the constructor {} on {} for exception message:= {}",
                        signature, class_name, message
                    ),
                    &e,
                );
                self.raise_generic_failure(ctx, CONSTRUCTOR_NOT_FOUND_MESSAGE);
                return;
            }
        };

        let raised = match ctx.new_text(message) {
            Ok(text) => ctx.throw_constructed(&class, &constructor, code, text),
            Err(e) => Err(e),
        };

        match raised {
            Ok(()) => tracing::debug!(class = class_name, code, msg = message, "raised domain failure"),
            Err(e) => {
                ctx.clear_pending();
                tracing::warn!(class = class_name, code, error = %e, "domain failure construction failed");
                self.raise_generic_failure(ctx, message);
            }
        }
    }

    /// Raise the domain exception for a native error
    pub fn raise<R: ManagedRuntime>(&self, ctx: &mut R, error: &NativeError) {
        self.raise_domain_failure(ctx, error.code.code(), &error.message);
    }

    /// Copy a managed string into a native `String`
    pub fn convert_text<R: ManagedRuntime>(
        &self,
        ctx: &mut R,
        handle: &R::StringHandle,
    ) -> Result<String> {
        marshal::convert_text(ctx, handle)
    }

    /// The sink is the only channel that carries the message text.
    fn diagnose(&self, line: &str, cause: &BridgeError) {
        tracing::debug!(error = %cause, "domain failure lookup missed, raising generic failure");
        if self.config.diagnostics {
            self.sink.line(line);
        }
    }
}

/// Process-wide adapter configured from the environment
pub fn default_adapter() -> &'static BoundaryAdapter {
    static ADAPTER: OnceLock<BoundaryAdapter> = OnceLock::new();
    ADAPTER.get_or_init(|| {
        let config = AdapterConfig::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring invalid adapter environment, using defaults");
            AdapterConfig::default()
        });
        BoundaryAdapter::new(config)
    })
}

/// Raise the generic failure type with the default adapter
pub fn raise_generic_failure<R: ManagedRuntime>(ctx: &mut R, message: &str) {
    default_adapter().raise_generic_failure(ctx, message)
}

/// Raise the domain exception type with the default adapter
pub fn raise_domain_failure<R: ManagedRuntime>(ctx: &mut R, code: i32, message: &str) {
    default_adapter().raise_domain_failure(ctx, code, message)
}

/// Copy a managed string into a native `String`
pub fn convert_text<R: ManagedRuntime>(ctx: &mut R, handle: &R::StringHandle) -> Result<String> {
    marshal::convert_text(ctx, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Captured;
    use crate::testing::RecordingRuntime;

    const DOMAIN: &str = "org.apache.activemq.artemis.api.core.ActiveMQException";

    fn adapter() -> BoundaryAdapter<Captured> {
        BoundaryAdapter::with_sink(AdapterConfig::default(), Captured::new())
    }

    #[test]
    fn test_text_creation_failure_degrades_to_generic() {
        let mut rt = RecordingRuntime::new();
        rt.register_class_with_constructor(DOMAIN);
        rt.fail_text_creation(true);

        let adapter = adapter();
        adapter.raise_domain_failure(&mut rt, 209, "out of memory");

        let pending = rt.pending().unwrap();
        assert_eq!(pending.class, "java.lang.RuntimeException");
        assert_eq!(pending.message, "out of memory");
        assert!(adapter.sink().lines().is_empty());
    }

    #[test]
    fn test_missing_generic_type_leaves_lookup_error_pending() {
        let mut rt = RecordingRuntime::empty();
        adapter().raise_generic_failure(&mut rt, "nothing to raise with");

        let pending = rt.pending().unwrap();
        assert_eq!(pending.class, "java.lang.NoClassDefFoundError");
    }

    #[test]
    fn test_diagnostics_can_be_disabled() {
        let mut rt = RecordingRuntime::new();
        let adapter =
            BoundaryAdapter::with_sink(AdapterConfig::default().diagnostics(false), Captured::new());

        adapter.raise_domain_failure(&mut rt, 200, "quiet");

        assert!(adapter.sink().lines().is_empty());
        assert_eq!(rt.pending().unwrap().message, CLASS_NOT_FOUND_MESSAGE);
    }

    #[test]
    fn test_constructor_miss_names_signature() {
        let mut rt = RecordingRuntime::new();
        rt.register_class(DOMAIN);

        let adapter = adapter();
        adapter.raise_domain_failure(&mut rt, 206, "queue allocation");

        let lines = adapter.sink().lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("(ILjava/lang/String;)V"));
        assert!(lines[0].contains(DOMAIN));
    }

    #[test]
    fn test_fallback_message_stays_out_of_warn_logs() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("warn"))
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let mut rt = RecordingRuntime::new();
        rt.register_class(DOMAIN);
        let adapter = adapter();
        tracing::subscriber::with_default(subscriber, || {
            adapter.raise_domain_failure(&mut rt, 503, "disk full");
            let mut other = RecordingRuntime::new();
            adapter.raise_domain_failure(&mut other, 503, "disk full");
        });

        assert_eq!(adapter.sink().lines().len(), 2);
        assert!(!logs.contents().contains("disk full"), "{}", logs.contents());
    }

    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_raise_native_error() {
        let mut rt = RecordingRuntime::new();
        rt.register_class_with_constructor(DOMAIN);

        adapter().raise(&mut rt, &NativeError::not_aligned("offset 17"));

        let pending = rt.pending().unwrap();
        assert_eq!(pending.class, DOMAIN);
        assert_eq!(pending.code, Some(202));
        assert_eq!(pending.message, "offset 17");
    }
}

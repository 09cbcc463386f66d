//! Diagnostic channel for failures the adapter cannot report as exceptions

use std::io::Write;
use std::sync::Mutex;

/// Destination for human-readable diagnostic lines
pub trait DiagnosticSink {
    /// Emit one line (no trailing newline in `text`)
    fn line(&self, text: &str);
}

/// Writes each line to standard error
#[derive(Debug, Default, Clone, Copy)]
pub struct Stderr;

impl DiagnosticSink for Stderr {
    fn line(&self, text: &str) {
        let stderr = std::io::stderr();
        let mut handle = stderr.lock();
        // Nothing sensible to do if stderr itself is gone.
        let _ = writeln!(handle, "{}", text);
        let _ = handle.flush();
    }
}

/// Discards every line
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl DiagnosticSink for Silent {
    fn line(&self, _text: &str) {}
}

/// Records lines in memory
#[derive(Debug, Default)]
pub struct Captured {
    lines: Mutex<Vec<String>>,
}

impl Captured {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines emitted so far
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticSink for Captured {
    fn line(&self, text: &str) {
        let mut lines = match self.lines.lock() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push(text.to_string());
    }
}

impl<D: DiagnosticSink + ?Sized> DiagnosticSink for &D {
    fn line(&self, text: &str) {
        (**self).line(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captured_keeps_order() {
        let sink = Captured::new();
        sink.line("first");
        sink.line("second");
        assert_eq!(sink.lines(), vec!["first", "second"]);
    }

    #[test]
    fn test_sink_by_reference() {
        let sink = Captured::new();
        let by_ref: &Captured = &sink;
        by_ref.line("via reference");
        assert_eq!(sink.lines().len(), 1);
    }
}

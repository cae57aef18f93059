//! Reporting sinks and run summaries.
//!
//! `describe`/`it` never print directly; they emit lines into an
//! [`OutputSink`], so runs can be captured in tests and colored on a terminal.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

// ============================================================================
// OUTPUT SINKS
// ============================================================================

/// Destination for report lines.
pub trait OutputSink {
    fn emit(&mut self, text: &str);

    /// Emits the outcome line of a case. Sinks that can color output
    /// override this; the default ignores `passed`.
    fn emit_status(&mut self, text: &str, passed: bool) {
        let _ = passed;
        self.emit(text);
    }
}

// Discards everything.
pub struct NullSink;

impl OutputSink for NullSink {
    fn emit(&mut self, _text: &str) {}
}

/// OutputBuffer: collects output for testing or programmatic capture.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    pub buffer: String,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn lines(&self) -> Vec<&str> {
        if self.buffer.is_empty() {
            Vec::new()
        } else {
            self.buffer.split('\n').collect()
        }
    }
}

impl OutputSink for OutputBuffer {
    fn emit(&mut self, text: &str) {
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        self.buffer.push_str(text);
    }
}

/// StdoutSink: writes to stdout, coloring case outcomes.
pub struct StdoutSink {
    stream: StandardStream,
}

impl StdoutSink {
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stream: StandardStream::stdout(choice),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new(ColorChoice::Auto)
    }
}

impl OutputSink for StdoutSink {
    fn emit(&mut self, text: &str) {
        let _ = writeln!(self.stream, "{text}");
    }

    fn emit_status(&mut self, text: &str, passed: bool) {
        let color = if passed { Color::Green } else { Color::Red };
        let _ = self.stream.set_color(ColorSpec::new().set_fg(Some(color)));
        let _ = writeln!(self.stream, "{text}");
        let _ = self.stream.reset();
    }
}

/// Shared, mutable handle on a sink.
#[derive(Clone)]
pub struct SharedOutput(pub Rc<RefCell<dyn OutputSink>>);

impl SharedOutput {
    pub fn new<T: OutputSink + 'static>(sink: T) -> Self {
        SharedOutput(Rc::new(RefCell::new(sink)))
    }

    /// Wraps a sink the caller keeps a handle on, e.g. an [`OutputBuffer`]
    /// inspected after a run.
    pub fn from_rc<T: OutputSink + 'static>(sink: Rc<RefCell<T>>) -> Self {
        SharedOutput(sink)
    }

    pub fn emit(&self, text: &str) {
        self.0.borrow_mut().emit(text);
    }

    pub fn emit_status(&self, text: &str, passed: bool) {
        self.0.borrow_mut().emit_status(text, passed);
    }
}

// ============================================================================
// SUMMARY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseFailure {
    pub should: String,
    pub error: String,
}

/// Pass/fail counts of a run, plus what failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestSummary {
    pub passed: usize,
    pub failed: usize,
    pub failures: Vec<CaseFailure>,
}

impl TestSummary {
    /// Records one case; `error` is the rendered failure, if any.
    pub fn record(&mut self, should: &str, error: Option<&str>) {
        match error {
            None => self.passed += 1,
            Some(error) => {
                self.failed += 1;
                self.failures.push(CaseFailure {
                    should: should.to_string(),
                    error: error.to_string(),
                });
            }
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn total_tests(&self) -> usize {
        self.passed + self.failed
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_tests() == 0 {
            return 0.0;
        }
        (self.passed as f64 / self.total_tests() as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_joins_lines() {
        let buffer = Rc::new(RefCell::new(OutputBuffer::new()));
        let output = SharedOutput::from_rc(Rc::clone(&buffer));
        output.emit("one");
        output.emit_status("two", false);
        assert_eq!(buffer.borrow().as_str(), "one\ntwo");
        assert_eq!(buffer.borrow().lines(), vec!["one", "two"]);
    }

    #[test]
    fn summary_rates() {
        let mut summary = TestSummary::default();
        assert_eq!(summary.success_rate(), 0.0);
        summary.record("a", None);
        summary.record("b", Some("boom"));
        assert!(summary.has_failures());
        assert_eq!(summary.total_tests(), 2);
        assert_eq!(summary.success_rate(), 50.0);
        assert_eq!(summary.failures[0].should, "b");
    }
}

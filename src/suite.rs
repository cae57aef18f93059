//! `describe`/`it` test organisation on top of the scoped execution engine.
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use gsunit::report::{OutputBuffer, SharedOutput};
//! use gsunit::suite::GsUnit;
//!
//! let buffer = Rc::new(RefCell::new(OutputBuffer::new()));
//! let gs = GsUnit::with_shared_output(SharedOutput::from_rc(Rc::clone(&buffer)));
//! gs.describe("math", || {
//!     gs.it("adds", || gs.assert().assert_true(1 + 1 == 2))
//! }).unwrap();
//! assert_eq!(buffer.borrow().as_str(), "math\n\tadds\n\t\t👍 PASSED");
//! ```

use std::cell::RefCell;
use std::panic::Location;
use std::rc::Rc;

use tracing::debug;

use crate::assert::{self, Assert};
use crate::error::{GsError, GsResult};
use crate::report::{OutputSink, SharedOutput, StdoutSink, TestSummary};
use crate::scope::{self, ErrorDecision, Runner, ScopeConfig};
use crate::value::Value;

const PASSED: &str = "\t\t👍 PASSED";

/// The outcome of one `it` case, built on entry and rewritten on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseOutcome {
    pub should: String,
    pub error: Option<String>,
}

impl CaseOutcome {
    fn entering(params: &[Value]) -> Self {
        Self {
            should: params.first().map(ToString::to_string).unwrap_or_default(),
            error: None,
        }
    }

    pub fn passed(&self) -> bool {
        self.error.is_none()
    }

    /// The report line for this outcome.
    pub fn line(&self) -> String {
        match &self.error {
            None => PASSED.to_string(),
            Some(error) => format!("\t\t👎{error}"),
        }
    }
}

/// A GsUnit instance: assertions, test organisation, and the scoped
/// execution engine, reporting into one sink.
#[derive(Clone)]
pub struct GsUnit {
    output: SharedOutput,
    summary: Rc<RefCell<TestSummary>>,
}

/// A fresh instance reporting to stdout.
pub fn load() -> GsUnit {
    GsUnit::new()
}

impl Default for GsUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl GsUnit {
    pub fn new() -> Self {
        Self::with_output(StdoutSink::default())
    }

    pub fn with_output<T: OutputSink + 'static>(sink: T) -> Self {
        Self::with_shared_output(SharedOutput::new(sink))
    }

    pub fn with_shared_output(output: SharedOutput) -> Self {
        Self {
            output,
            summary: Rc::new(RefCell::new(TestSummary::default())),
        }
    }

    pub fn output(&self) -> &SharedOutput {
        &self.output
    }

    /// Assertions without a failure comment.
    pub fn assert(&self) -> Assert {
        Assert::new()
    }

    pub fn assert_with(&self, comment: impl Into<String>) -> Assert {
        Assert::with_comment(comment)
    }

    /// Emits `description`, then runs `body`. Errors escaping the body
    /// propagate.
    pub fn describe<F>(&self, description: &str, body: F) -> GsResult<()>
    where
        F: FnOnce() -> GsResult<()>,
    {
        self.output.emit(description);
        body()
    }

    /// Runs one case. Any error raised by `body` is reported as a failure
    /// line and suppressed, so sibling cases keep running.
    #[track_caller]
    pub fn it<F>(&self, should: &str, body: F) -> GsResult<()>
    where
        F: FnOnce() -> GsResult<()>,
    {
        self.output.emit(&format!("\t{should}"));
        let output = self.output.clone();
        let summary = Rc::clone(&self.summary);
        let config = ScopeConfig::entering(CaseOutcome::entering)
            .params(vec![Value::from(should)])
            .on_error(|error: &GsError, outcome: &mut CaseOutcome| {
                outcome.error = Some(error.to_string());
                ErrorDecision::Suppress
            })
            .exit(move |outcome: &mut CaseOutcome| {
                output.emit_status(&outcome.line(), outcome.passed());
                summary
                    .borrow_mut()
                    .record(&outcome.should, outcome.error.as_deref());
            });
        let outcome = scope::run(|_| body().map(|()| None), config)?;
        debug!(should, passed = outcome.passed(), origin = %Location::caller(), "case finished");
        Ok(())
    }

    /// Runs `body` once under `config` for its effects. The final context
    /// is dropped; use [`GsUnit::context_manager`] to keep it.
    #[track_caller]
    pub fn with_context<'a, C, B>(&self, body: B, config: ScopeConfig<'a, C>) -> GsResult<()>
    where
        B: FnOnce(&mut C) -> GsResult<Option<C>>,
    {
        scope::run(body, config).map(|_| ())
    }

    /// Runs `body` once under `config` and returns the final context;
    /// see [`scope::run`].
    #[track_caller]
    pub fn context_manager<'a, C, B>(&self, body: B, config: ScopeConfig<'a, C>) -> GsResult<C>
    where
        B: FnOnce(&mut C) -> GsResult<Option<C>>,
    {
        scope::run(body, config)
    }

    pub fn make_runner<'a, C>(&self, config: ScopeConfig<'a, C>) -> GsResult<Runner<'a, C>> {
        scope::make_runner(config)
    }

    pub fn fail(&self, message: &str) -> GsResult<()> {
        assert::fail(message)
    }

    /// Counts of the cases run so far.
    pub fn summary(&self) -> TestSummary {
        self.summary.borrow().clone()
    }
}

//! Scoped execution: a body bracketed by enter, exit, and error hooks.
//!
//! [`run`] executes a body once; [`make_runner`] turns a config into a
//! reusable [`Runner`]; [`dispatch`] accepts the same inputs as a loose
//! argument list and picks between the two.
//!
//! For every invocation:
//!
//! 1. `enter` receives the `params` and produces the context value.
//! 2. The body runs with the context value and may return a replacement.
//! 3. If the body fails, `on_error` decides whether the error is suppressed.
//!    Propagated errors keep their variant and gain the call site in their
//!    message.
//! 4. `exit` runs exactly once, before the call returns or the error
//!    propagates.

use std::fmt;
use std::panic::Location;

use tracing::{debug, warn};

use crate::error::{GsError, GsResult};
use crate::value::Value;

/// What an error hook wants done with the error it observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDecision {
    /// Swallow the error; the invocation finishes normally.
    Suppress,
    /// Re-signal the error after `exit` has run.
    Propagate,
}

pub type EnterHook<'a, C> = Box<dyn FnMut(&[Value]) -> C + 'a>;
pub type ExitHook<'a, C> = Box<dyn FnMut(&mut C) + 'a>;
pub type ErrorHook<'a, C> = Box<dyn FnMut(&GsError, &mut C) -> ErrorDecision + 'a>;

/// The hooks and entry parameters of a scoped invocation.
pub struct ScopeConfig<'a, C> {
    enter: EnterHook<'a, C>,
    exit: ExitHook<'a, C>,
    on_error: ErrorHook<'a, C>,
    params: Value,
}

impl<'a, C: Default + 'a> ScopeConfig<'a, C> {
    /// A config whose `enter` produces `C::default()`, with a no-op `exit`,
    /// an error hook that propagates, and no params.
    pub fn new() -> Self {
        Self::entering(|_| C::default())
    }
}

impl<'a, C: Default + 'a> Default for ScopeConfig<'a, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, C: 'a> ScopeConfig<'a, C> {
    /// A config with the given `enter` hook and default everything else.
    pub fn entering(enter: impl FnMut(&[Value]) -> C + 'a) -> Self {
        Self {
            enter: Box::new(enter),
            exit: Box::new(|_| {}),
            on_error: Box::new(|_, _| ErrorDecision::Propagate),
            params: Value::Array(Vec::new()),
        }
    }

    pub fn enter(mut self, enter: impl FnMut(&[Value]) -> C + 'a) -> Self {
        self.enter = Box::new(enter);
        self
    }

    pub fn exit(mut self, exit: impl FnMut(&mut C) + 'a) -> Self {
        self.exit = Box::new(exit);
        self
    }

    pub fn on_error(
        mut self,
        on_error: impl FnMut(&GsError, &mut C) -> ErrorDecision + 'a,
    ) -> Self {
        self.on_error = Box::new(on_error);
        self
    }

    /// Arguments handed to `enter`. Must be an array; anything else is
    /// rejected when the config is used.
    pub fn params(mut self, params: impl Into<Value>) -> Self {
        self.params = params.into();
        self
    }

    fn validate(&self) -> GsResult<()> {
        if matches!(self.params, Value::Array(_)) {
            Ok(())
        } else {
            Err(GsError::config_type_mismatch(format!(
                "options.params must be an array, got {}",
                self.params.type_name()
            )))
        }
    }
}

impl<C> fmt::Debug for ScopeConfig<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeConfig")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// A validated config that can run any number of bodies.
#[derive(Debug)]
pub struct Runner<'a, C> {
    config: ScopeConfig<'a, C>,
}

impl<'a, C> Runner<'a, C> {
    /// Runs `body` inside this runner's hooks and returns the final context value.
    #[track_caller]
    pub fn run<B>(&mut self, body: B) -> GsResult<C>
    where
        B: FnOnce(&mut C) -> GsResult<Option<C>>,
    {
        execute(&mut self.config, body, Location::caller())
    }
}

/// Runs `body` once under `config` and returns the final context value.
///
/// ```rust
/// use gsunit::scope::{run, ScopeConfig};
/// use gsunit::value::Value;
/// let result = run(|_ctx: &mut Value| Ok(Some(Value::from("blah"))), ScopeConfig::new());
/// assert_eq!(result.unwrap(), Value::from("blah"));
/// ```
#[track_caller]
pub fn run<'a, C, B>(body: B, config: ScopeConfig<'a, C>) -> GsResult<C>
where
    B: FnOnce(&mut C) -> GsResult<Option<C>>,
{
    let origin = Location::caller();
    let mut config = config;
    config.validate()?;
    execute(&mut config, body, origin)
}

/// Validates `config` and returns a reusable runner.
pub fn make_runner<'a, C>(config: ScopeConfig<'a, C>) -> GsResult<Runner<'a, C>> {
    config.validate()?;
    Ok(Runner { config })
}

pub type BoxedBody<'a, C> = Box<dyn FnOnce(&mut C) -> GsResult<Option<C>> + 'a>;

/// One loose argument to [`dispatch`].
pub enum ScopeArg<'a, C> {
    Body(BoxedBody<'a, C>),
    Config(ScopeConfig<'a, C>),
}

impl<'a, C> ScopeArg<'a, C> {
    pub fn body(body: impl FnOnce(&mut C) -> GsResult<Option<C>> + 'a) -> Self {
        ScopeArg::Body(Box::new(body))
    }
}

impl<C> fmt::Debug for ScopeArg<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeArg::Body(_) => write!(f, "Body(..)"),
            ScopeArg::Config(config) => f.debug_tuple("Config").field(config).finish(),
        }
    }
}

/// What [`dispatch`] produced.
#[derive(Debug)]
pub enum Dispatched<'a, C> {
    /// One argument: the config became a reusable runner.
    Runner(Runner<'a, C>),
    /// Two arguments: the body ran; this is the final context value.
    Finished(C),
}

/// Chooses the invocation form from the number of arguments.
///
/// `[Config]` yields a runner, `[Body, Config]` runs immediately, and any
/// other count is an arity error. A valid count with the wrong shapes is a
/// type-mismatch error.
#[track_caller]
pub fn dispatch<'a, C>(args: Vec<ScopeArg<'a, C>>) -> GsResult<Dispatched<'a, C>> {
    let origin = Location::caller();
    let count = args.len();
    let mut args = args.into_iter();
    match (args.next(), args.next(), count) {
        (Some(ScopeArg::Config(config)), None, 1) => make_runner(config).map(Dispatched::Runner),
        (Some(ScopeArg::Body(body)), Some(ScopeArg::Config(mut config)), 2) => {
            config.validate()?;
            execute(&mut config, body, origin).map(Dispatched::Finished)
        }
        (_, _, 1) => Err(GsError::config_type_mismatch(
            "a single argument must be a config",
        )),
        (_, _, 2) => Err(GsError::config_type_mismatch(
            "two arguments must be a body followed by a config",
        )),
        _ => Err(GsError::config_arity(format!(
            "Pass either one or two arguments (got {count})"
        ))),
    }
}

fn execute<C, B>(config: &mut ScopeConfig<'_, C>, body: B, origin: &Location<'_>) -> GsResult<C>
where
    B: FnOnce(&mut C) -> GsResult<Option<C>>,
{
    let params: &[Value] = match &config.params {
        Value::Array(items) => items,
        _ => &[],
    };
    debug!(params = params.len(), %origin, "scope.enter");
    let mut context = (config.enter)(params);

    let outcome = match body(&mut context) {
        Ok(Some(replacement)) => {
            context = replacement;
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(error) => match (config.on_error)(&error, &mut context) {
            ErrorDecision::Suppress => {
                debug!(error_type = %error.error_type(), %origin, "scope error suppressed");
                Ok(())
            }
            ErrorDecision::Propagate => {
                warn!(error_type = %error.error_type(), %origin, "scope error propagated");
                Err(error.with_provenance(&origin.to_string()))
            }
        },
    };

    (config.exit)(&mut context);
    debug!(%origin, "scope.exit");
    outcome.map(|()| context)
}

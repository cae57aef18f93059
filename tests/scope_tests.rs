//! Scoped execution: hook ordering, suppression, provenance, and the arity law.

use std::cell::{Cell, RefCell};

use gsunit::error::{ConfigErrorKind, ErrorType, GsError};
use gsunit::scope::{dispatch, make_runner, run, Dispatched, ErrorDecision, ScopeArg, ScopeConfig};
use gsunit::value::Value;

#[cfg(test)]
mod propagation_tests {
    use super::*;

    #[test]
    fn test_propagated_error_runs_exit_first() {
        let events = RefCell::new(Vec::new());
        let config = ScopeConfig::entering(|_| events.borrow_mut().push("enter"))
            .exit(|_| events.borrow_mut().push("exit"))
            .on_error(|_, _| {
                events.borrow_mut().push("on_error");
                ErrorDecision::Propagate
            });

        let err = run(|_| Err(GsError::error("boom")), config).unwrap_err();

        assert_eq!(*events.borrow(), vec!["enter", "on_error", "exit"]);
        assert_eq!(err.error_type(), ErrorType::Error);
        assert!(err.message().starts_with("boom --> "));
        assert!(err.message().contains("scope_tests.rs"));
    }

    #[test]
    fn test_suppressed_error_returns_normally() {
        let config = ScopeConfig::<Value>::new().on_error(|_, _| ErrorDecision::Suppress);
        let result = run(|_| Err(GsError::error("boom")), config);
        assert_eq!(result.unwrap(), Value::Undefined);
    }

    #[test]
    fn test_propagation_keeps_assertion_failures() {
        let err = run(
            |_: &mut ()| Err(GsError::failure(Some("c"), "m")),
            ScopeConfig::new(),
        )
        .unwrap_err();
        match err {
            GsError::AssertionFailure { comment, message } => {
                assert_eq!(comment.as_deref(), Some("c"));
                assert!(message.starts_with("m --> "));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

#[cfg(test)]
mod exit_tests {
    use super::*;

    #[test]
    fn test_exit_runs_exactly_once_in_every_outcome() {
        let bodies: Vec<(ErrorDecision, bool)> = vec![
            (ErrorDecision::Propagate, false),
            (ErrorDecision::Propagate, true),
            (ErrorDecision::Suppress, true),
        ];
        for (decision, fails) in bodies {
            let exits = Cell::new(0);
            let config = ScopeConfig::<()>::new()
                .exit(|_| exits.set(exits.get() + 1))
                .on_error(move |_, _| decision);
            let _ = run(
                |_| {
                    if fails {
                        Err(GsError::type_error("x"))
                    } else {
                        Ok(None)
                    }
                },
                config,
            );
            assert_eq!(exits.get(), 1, "decision {decision:?}, fails {fails}");
        }
    }

    #[test]
    fn test_runner_reuses_hooks() {
        let entries = Cell::new(0);
        let mut runner =
            make_runner(ScopeConfig::entering(|_| entries.set(entries.get() + 1))).unwrap();
        runner.run(|_| Ok(None)).unwrap();
        runner.run(|_| Ok(None)).unwrap();
        assert_eq!(entries.get(), 2);
    }
}

#[cfg(test)]
mod configuration_tests {
    use super::*;

    #[test]
    fn test_runner_returns_body_value() {
        let mut runner = make_runner(ScopeConfig::<Value>::new()).unwrap();
        let result = runner.run(|_| Ok(Some(Value::from("x")))).unwrap();
        assert_eq!(result, Value::from("x"));
    }

    #[test]
    fn test_params_must_be_an_array() {
        let err = make_runner(ScopeConfig::<Value>::new().params("notalist")).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::TypeError);
        assert_eq!(
            err,
            GsError::Configuration {
                kind: ConfigErrorKind::TypeMismatch,
                message: "options.params must be an array, got String".to_string(),
            }
        );
    }

    #[test]
    fn test_bad_params_never_reach_on_error() {
        let seen = Cell::new(false);
        let config = ScopeConfig::<Value>::new()
            .params(3)
            .on_error(|_, _| {
                seen.set(true);
                ErrorDecision::Suppress
            });
        assert!(run(|_| Ok(None), config).is_err());
        assert!(!seen.get());
    }

    #[test]
    fn test_enter_receives_params() {
        let config = ScopeConfig::entering(|params: &[Value]| params.len())
            .params(vec![Value::from(1), Value::from("two")]);
        assert_eq!(run(|_| Ok(None), config).unwrap(), 2);
    }
}

#[cfg(test)]
mod arity_tests {
    use super::*;

    #[test]
    fn test_single_config_yields_runner() {
        let result = dispatch(vec![ScopeArg::Config(ScopeConfig::<Value>::new())]).unwrap();
        let Dispatched::Runner(mut runner) = result else {
            panic!("expected a runner");
        };
        assert_eq!(runner.run(|_| Ok(Some(Value::from(1)))).unwrap(), Value::from(1));
    }

    #[test]
    fn test_body_and_config_run_immediately() {
        let result = dispatch(vec![
            ScopeArg::body(|_: &mut Value| Ok(Some(Value::from("blah")))),
            ScopeArg::Config(ScopeConfig::new()),
        ])
        .unwrap();
        assert!(matches!(result, Dispatched::Finished(Value::String(ref s)) if s == "blah"));
    }

    #[test]
    fn test_other_counts_are_arity_errors() {
        for count in [0usize, 3, 4] {
            let args = (0..count)
                .map(|_| ScopeArg::Config(ScopeConfig::<Value>::new()))
                .collect();
            let err = dispatch(args).unwrap_err();
            assert_eq!(
                err,
                GsError::Configuration {
                    kind: ConfigErrorKind::ArityMismatch,
                    message: format!("Pass either one or two arguments (got {count})"),
                }
            );
        }
    }

    #[test]
    fn test_wrong_shapes_are_type_mismatches() {
        let err = dispatch(vec![ScopeArg::body(|_: &mut Value| Ok(None))]).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::TypeError);

        let err = dispatch(vec![
            ScopeArg::Config(ScopeConfig::<Value>::new()),
            ScopeArg::Config(ScopeConfig::new()),
        ])
        .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::TypeError);
    }
}

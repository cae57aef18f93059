//! The library's own describe/it suites, run by `gsunit selftest`.
//!
//! Failing assertions are exercised by wrapping them in
//! `assert_throws(.., ErrorType::AssertionFailure)`, so a healthy library
//! produces an all-green report.

use std::cell::RefCell;

use serde_json::json;

use crate::error::{ErrorType, GsError, GsResult};
use crate::scope::{self, dispatch, make_runner, Dispatched, ErrorDecision, ScopeArg, ScopeConfig};
use crate::suite::GsUnit;
use crate::value::{Object, Value};

fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}

/// Runs every suite against `gs`.
pub fn run(gs: &GsUnit) -> GsResult<()> {
    context_manager_suite(gs)?;
    nested_context_suite(gs)?;
    passing_assertions_suite(gs)?;
    failing_assertions_suite(gs)
}

// ============================================================================
// CONTEXT MANAGER
// ============================================================================

fn context_manager_suite(gs: &GsUnit) -> GsResult<()> {
    gs.describe("Context manager", || {
        gs.it("Returns a runner when passed a single config", || {
            let result = dispatch(vec![ScopeArg::Config(ScopeConfig::<Value>::new())])?;
            gs.assert().assert_true(matches!(result, Dispatched::Runner(_)))
        })?;

        gs.it("Has an embedded mode", || {
            let result = dispatch(vec![
                ScopeArg::body(|_: &mut Value| Ok(Some(Value::from("blah")))),
                ScopeArg::Config(ScopeConfig::new()),
            ])?;
            let Dispatched::Finished(value) = result else {
                return gs.fail("embedded mode returned a runner");
            };
            gs.assert_with("embedded mode").assert_equals(value, Value::from("blah"))
        })?;

        gs.it("Returns the body's value from a runner", || {
            let mut runner = make_runner(ScopeConfig::<Value>::new())?;
            let result = runner.run(|_| Ok(Some(Value::from("blah"))))?;
            gs.assert().assert_equals(result, Value::from("blah"))
        })?;

        gs.it("Raises an error when three arguments are passed", || {
            gs.assert().assert_throws_error(|| {
                dispatch::<Value>(vec![
                    ScopeArg::Config(ScopeConfig::new()),
                    ScopeArg::Config(ScopeConfig::new()),
                    ScopeArg::Config(ScopeConfig::new()),
                ])
                .map(|_| ())
            })
        })?;

        gs.it("Raises an error when no arguments are passed", || {
            gs.assert()
                .assert_throws_error(|| dispatch::<Value>(Vec::new()).map(|_| ()))
        })?;

        gs.it("Raises a TypeError for a params value that is not a list", || {
            gs.assert().assert_throws_type_error(|| {
                scope::run(
                    |_: &mut Value| Ok(None),
                    ScopeConfig::new().params("notalist"),
                )
                .map(|_| ())
            })
        })?;

        gs.it("Calls enter and exit functions", || {
            let config = ScopeConfig::entering(|params: &[Value]| {
                let mut items = params
                    .first()
                    .and_then(Value::as_array)
                    .map(<[Value]>::to_vec)
                    .unwrap_or_default();
                items.push(Value::from("enter"));
                Value::Array(items)
            })
            .exit(|context: &mut Value| {
                if let Value::Array(items) = context {
                    items.pop();
                }
            })
            .params(vec![Value::Array(Vec::new())]);
            let mut runner = make_runner(config)?;
            let result = runner.run(|context| {
                gs.assert()
                    .assert_array_equals(&*context, Value::from(vec!["enter"]))?;
                Ok(None)
            })?;
            gs.assert().assert_array_equals(result, Value::Array(Vec::new()))
        })?;

        gs.it("Calls exit function on a raised error", || {
            let log = RefCell::new(Vec::<String>::new());
            let config = ScopeConfig::entering(|_| log.borrow_mut().push("enter".into()))
                .exit(|_| log.borrow_mut().push("exit".into()));
            let mut runner = make_runner(config)?;
            let outcome = runner.run(|_| Err(GsError::error("I get swallowed")));
            gs.assert().assert_true(outcome.is_err())?;
            let seen = Value::from(log.borrow().clone());
            gs.assert()
                .assert_array_equals(seen, Value::from(vec!["enter", "exit"]))
        })?;

        gs.it("Passes arguments to enter function", || {
            let log = RefCell::new(Vec::<String>::new());
            let config = ScopeConfig::entering(|params: &[Value]| {
                let first = params.first().map(ToString::to_string).unwrap_or_default();
                log.borrow_mut().push(first);
            })
            .exit(|_| log.borrow_mut().push("exit".into()))
            .params(vec!["arg"]);
            make_runner(config)?.run(|_| Ok(None))?;
            let seen = Value::from(log.borrow().clone());
            gs.assert()
                .assert_array_equals(seen, Value::from(vec!["arg", "exit"]))
        })
    })?;

    gs.it("Threads the context value through the error hook", || {
        let returned = gs.context_manager(
            |_: &mut Value| Err(GsError::error("woops")),
            ScopeConfig::entering(|params: &[Value]| params.first().cloned().unwrap_or_default())
                .on_error(|_, context: &mut Value| {
                    if let Value::Object(object) = context {
                        object.insert("result", "modified");
                    }
                    ErrorDecision::Suppress
                })
                .params(vec![Object::new().with("result", "modifyme")]),
        )?;
        gs.assert().assert_equals(
            returned.member("result").cloned().unwrap_or_default(),
            Value::from("modified"),
        )
    })
}

// ============================================================================
// NESTED CONTEXTS
// ============================================================================

#[derive(Debug, Default)]
struct NestedReport {
    title: String,
    failed: bool,
    content: String,
}

fn nested_context_suite(gs: &GsUnit) -> GsResult<()> {
    gs.describe("Context manager contexts", || {
        gs.it("Inner scopes report into outer scopes", || {
            let report = RefCell::new(NestedReport::default());
            let outer = ScopeConfig::entering(|_| report.borrow_mut().title = "description".into())
                .exit(|_| {
                    let report = report.borrow();
                    let sign = if report.failed { '-' } else { '+' };
                    gs.output()
                        .emit(&format!("\t\t{}: {} {}", report.title, sign, report.content));
                });
            let inner = ScopeConfig::entering(|_| Value::from(Object::new().with("content", "hi")))
                .exit(|_| report.borrow_mut().content = "content".into())
                .on_error(|_, _| {
                    report.borrow_mut().failed = true;
                    ErrorDecision::Suppress
                });

            scope::run(
                |_: &mut ()| {
                    scope::run(|_: &mut Value| Err(GsError::error("hi")), inner)?;
                    Ok(None)
                },
                outer,
            )?;

            let report = report.borrow();
            gs.assert_with("inner failure recorded").assert_true(report.failed)?;
            gs.assert()
                .assert_equals(Value::from(report.content.as_str()), Value::from("content"))
        })?;

        gs.describe("This thing", || {
            gs.assert_with("should do something")
                .assert_throws_error(|| Err(GsError::error("throws")))
        })
    })
}

// ============================================================================
// ASSERTIONS
// ============================================================================

fn passing_assertions_suite(gs: &GsUnit) -> GsResult<()> {
    let a = gs.assert();
    gs.describe("These all pass", || {
        gs.it("assertTrue", || a.assert_true(true))?;
        gs.it("assertFalse", || a.assert_false(false))?;
        gs.it("assertEquals", || a.assert_equals(v(json!(true)), v(json!(true))))?;
        gs.it("assertNotEquals", || {
            a.assert_not_equals(v(json!(true)), v(json!(false)))
        })?;
        gs.it("assertNull", || a.assert_null(Value::Null))?;
        gs.it("assertNotNull", || {
            a.assert_not_null(Value::Undefined)?;
            a.assert_not_null(v(json!(0)))
        })?;
        gs.it("assertUndefined", || a.assert_undefined(Value::Undefined))?;
        gs.it("assertNotUndefined", || a.assert_not_undefined(Value::Null))?;
        gs.it("assertNaN", || a.assert_nan(Value::Number(f64::NAN)))?;
        gs.it("assertNotNaN", || a.assert_not_nan(v(json!(0))))?;
        gs.it("assertObjectEquals", || {
            a.assert_object_equals(v(json!({"hi": "hi"})), v(json!({"hi": "hi"})))
        })?;
        gs.it("assertArrayEquals", || {
            a.assert_array_equals(v(json!(["hello", "world"])), v(json!(["hello", "world"])))
        })?;
        gs.it("assertEvaluatesToTrue", || {
            a.assert_evaluates_to_true(v(json!(1)))?;
            a.assert_evaluates_to_true(v(json!(true)))?;
            a.assert_evaluates_to_true(v(json!("hi")))
        })?;
        gs.it("assertEvaluatesToFalse", || {
            a.assert_evaluates_to_false(v(json!(0)))?;
            a.assert_evaluates_to_false(v(json!(false)))?;
            a.assert_evaluates_to_false(v(json!("")))
        })?;
        gs.it("assertHashEquals", || {
            a.assert_hash_equals(v(json!({"hi": "hi"})), v(json!({"hi": "hi"})))
        })?;
        gs.it("assertRoughlyEquals", || a.assert_roughly_equals(1.0, 1.5, 1.0))?;
        gs.it("assertContains", || a.assert_contains(v(json!(1)), v(json!([1, 2]))))?;
        gs.it("assertArrayEqualsIgnoringOrder", || {
            a.assert_array_equals_ignoring_order(v(json!([2, 1])), v(json!([1, 2])))
        })?;
        gs.it("assertThrowsError", || {
            gs.assert_with("wrong")
                .assert_throws_error(|| Err(GsError::type_error("expected error thrown")))
        })?;
        gs.it("assertThrowsTypeError", || {
            a.assert_throws_type_error(|| Err(GsError::type_error("error thrown!")))
        })?;
        gs.it("assertThrowsRangeError", || {
            a.assert_throws_range_error(|| Err(GsError::range_error("error thrown!")))
        })?;
        gs.it("assertThrowsReferenceError", || {
            a.assert_throws_reference_error(|| Err(GsError::reference_error("error thrown!")))
        })
    })
}

/// Passes when `body` fails with an assertion failure.
fn expect_failure<F>(gs: &GsUnit, should: &str, body: F) -> GsResult<()>
where
    F: FnOnce() -> GsResult<()>,
{
    gs.it(should, || {
        gs.assert()
            .assert_throws(body, ErrorType::AssertionFailure)
    })
}

fn failing_assertions_suite(gs: &GsUnit) -> GsResult<()> {
    let a = gs.assert();
    gs.describe("These fail as expected", || {
        expect_failure(gs, "assertTrue", || a.assert_true(false))?;
        expect_failure(gs, "assertFalse", || a.assert_false(true))?;
        expect_failure(gs, "assertEquals", || {
            a.assert_equals(v(json!(true)), v(json!(false)))
        })?;
        expect_failure(gs, "assertNotEquals", || {
            a.assert_not_equals(v(json!(true)), v(json!(true)))
        })?;
        expect_failure(gs, "assertNull", || a.assert_null(v(json!(""))))?;
        expect_failure(gs, "assertNotNull", || a.assert_not_null(Value::Null))?;
        expect_failure(gs, "assertUndefined", || a.assert_undefined(Value::Null))?;
        expect_failure(gs, "assertNotUndefined", || {
            a.assert_not_undefined(Value::Undefined)
        })?;
        expect_failure(gs, "assertNaN", || a.assert_nan(v(json!(0))))?;
        expect_failure(gs, "assertNotNaN", || a.assert_not_nan(Value::Number(f64::NAN)))?;
        expect_failure(gs, "assertObjectEquals", || {
            a.assert_object_equals(
                v(json!({"hi": "hi"})),
                v(json!({"hi": "hi", "something": "hi"})),
            )
        })?;
        expect_failure(gs, "assertArrayEquals", || {
            a.assert_array_equals(v(json!(["hello", "world"])), v(json!(["hello"])))
        })?;
        expect_failure(gs, "assertEvaluatesToTrue", || {
            a.assert_evaluates_to_true(v(json!(false)))
        })?;
        expect_failure(gs, "assertEvaluatesToFalse", || {
            a.assert_evaluates_to_false(v(json!(true)))
        })?;
        expect_failure(gs, "assertHashEquals", || {
            a.assert_hash_equals(v(json!({"hi": "hi"})), v(json!({"hi": "hello"})))
        })?;
        expect_failure(gs, "assertRoughlyEquals", || {
            a.assert_roughly_equals(1.0, 2.0, 1.0)
        })?;
        expect_failure(gs, "assertContains", || {
            a.assert_contains(v(json!(1)), v(json!([0, 2])))
        })?;
        expect_failure(gs, "assertArrayEqualsIgnoringOrder", || {
            a.assert_array_equals_ignoring_order(v(json!([2, 1])), v(json!([1, 2, 3])))
        })?;
        expect_failure(gs, "assertThrowsTypeError", || {
            a.assert_throws_type_error(|| Err(GsError::error("error thrown!")))
        })?;
        expect_failure(gs, "assertThrowsReferenceError", || {
            a.assert_throws_reference_error(|| Err(GsError::type_error("error thrown!")))
        })?;
        expect_failure(gs, "assertThrowsRangeError", || {
            a.assert_throws_range_error(|| Err(GsError::error("error thrown!")))
        })?;
        expect_failure(gs, "assertThrows without an error", || {
            a.assert_throws_error(|| Ok(()))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NullSink;

    #[test]
    fn selftest_is_green() {
        let gs = GsUnit::with_output(NullSink);
        run(&gs).unwrap();
        let summary = gs.summary();
        assert!(!summary.has_failures(), "{:?}", summary.failures);
        assert!(summary.passed > 40);
    }
}

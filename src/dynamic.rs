//! Name-based assertion calls over loose argument lists.
//!
//! Scripts (the `check` subcommand, for one) name assertions by their
//! camelCase names and hand over a flat list of values. An optional leading
//! comment is detected with the [`crate::args`] helpers.

use tracing::debug;

use crate::args::{comment_arg, select_arg, validate_arguments};
use crate::assert::{fail, Assert};
use crate::error::{GsError, GsResult};
use crate::value::Value;

static UNDEFINED: Value = Value::Undefined;

/// Every name [`call`] understands, with its value-argument count.
pub const ASSERTIONS: &[(&str, usize)] = &[
    ("assert", 1),
    ("assertTrue", 1),
    ("assertFalse", 1),
    ("assertEquals", 2),
    ("assertNotEquals", 2),
    ("assertNull", 1),
    ("assertNotNull", 1),
    ("assertUndefined", 1),
    ("assertNotUndefined", 1),
    ("assertNaN", 1),
    ("assertNotNaN", 1),
    ("assertObjectEquals", 2),
    ("assertArrayEquals", 2),
    ("assertEvaluatesToTrue", 1),
    ("assertEvaluatesToFalse", 1),
    ("assertHashEquals", 2),
    ("assertRoughlyEquals", 3),
    ("assertContains", 2),
    ("assertArrayEqualsIgnoringOrder", 2),
    ("fail", 1),
];

fn arity(name: &str) -> GsResult<usize> {
    if name.starts_with("assertThrows") {
        return Err(GsError::argument(format!(
            "{name} needs a callable body and cannot be called by name"
        )));
    }
    ASSERTIONS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, count)| *count)
        .ok_or_else(|| GsError::argument(format!("Unknown assertion '{name}'")))
}

/// Calls the assertion called `name` with `args`.
///
/// ```rust
/// use gsunit::dynamic::call;
/// use gsunit::value::Value;
/// assert!(call("assertEquals", &[Value::from(1), Value::from(1)]).is_ok());
/// let err = call("assertEquals", &[Value::from("why"), Value::from(1), Value::from(2)]).unwrap_err();
/// assert!(err.to_string().starts_with("Comment: why"));
/// ```
pub fn call(name: &str, args: &[Value]) -> GsResult<()> {
    let expected = arity(name)?;
    validate_arguments(expected, args)?;
    debug!(assertion = name, args = args.len(), "dynamic call");

    let assert = Assert::from_comment(comment_arg(expected, args).map(str::to_string));
    let arg = |index: usize| nth(index, expected, args);

    match name {
        "assert" | "assertTrue" => assert.assert_true(boolean(arg(1), "assert")?),
        "assertFalse" => assert.assert_false(boolean(arg(1), "assertFalse")?),
        "assertEquals" => assert.assert_equals(arg(1), arg(2)),
        "assertNotEquals" => assert.assert_not_equals(arg(1), arg(2)),
        "assertNull" => assert.assert_null(arg(1)),
        "assertNotNull" => assert.assert_not_null(arg(1)),
        "assertUndefined" => assert.assert_undefined(arg(1)),
        "assertNotUndefined" => assert.assert_not_undefined(arg(1)),
        "assertNaN" => assert.assert_nan(arg(1)),
        "assertNotNaN" => assert.assert_not_nan(arg(1)),
        "assertObjectEquals" => assert.assert_object_equals(arg(1), arg(2)),
        "assertArrayEquals" => assert.assert_array_equals(arg(1), arg(2)),
        "assertEvaluatesToTrue" => assert.assert_evaluates_to_true(arg(1)),
        "assertEvaluatesToFalse" => assert.assert_evaluates_to_false(arg(1)),
        "assertHashEquals" => assert.assert_hash_equals(arg(1), arg(2)),
        "assertRoughlyEquals" => assert.assert_roughly_equals(
            number(arg(1), name)?,
            number(arg(2), name)?,
            number(arg(3), name)?,
        ),
        "assertContains" => assert.assert_contains(arg(1), arg(2)),
        "assertArrayEqualsIgnoringOrder" => assert.assert_array_equals_ignoring_order(arg(1), arg(2)),
        "fail" => fail(&arg(1).to_string()),
        _ => Err(GsError::argument(format!("Unknown assertion '{name}'"))),
    }
}

fn nth(index: usize, expected: usize, args: &[Value]) -> &Value {
    select_arg(index, expected, args).unwrap_or(&UNDEFINED)
}

fn boolean(value: &Value, name: &str) -> GsResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| GsError::argument(format!("Bad argument to {name}(boolean)")))
}

fn number(value: &Value, name: &str) -> GsResult<f64> {
    value.as_number().ok_or_else(|| {
        GsError::argument(format!(
            "{name} needs numeric arguments, got {}",
            value.type_name()
        ))
    })
}

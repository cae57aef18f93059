//! Positional argument conventions.
//!
//! Positional callers pass an optional leading comment followed by the
//! assertion's value arguments. These helpers detect the comment and pick the
//! value arguments out; indices are 1-based over the non-comment arguments.

use crate::error::{GsError, GsResult};
use crate::value::Value;

/// True when `args` carries one more argument than `expected`, i.e. a comment.
pub fn arg_count_includes_comment(expected: usize, args: &[Value]) -> bool {
    args.len() == expected + 1
}

/// Returns the `index`-th (1-based) non-comment argument.
///
/// ```rust
/// use gsunit::args::select_arg;
/// use gsunit::value::Value;
/// let with_comment = vec![Value::from("why"), Value::from(1), Value::from(2)];
/// assert_eq!(select_arg(2, 2, &with_comment), Some(&Value::from(2)));
/// let without = vec![Value::from(1), Value::from(2)];
/// assert_eq!(select_arg(1, 2, &without), Some(&Value::from(1)));
/// ```
pub fn select_arg(index: usize, expected: usize, args: &[Value]) -> Option<&Value> {
    if arg_count_includes_comment(expected, args) {
        args.get(index)
    } else {
        index.checked_sub(1).and_then(|i| args.get(i))
    }
}

/// The leading comment, when present and textual.
pub fn comment_arg(expected: usize, args: &[Value]) -> Option<&str> {
    if arg_count_includes_comment(expected, args) {
        args.first().and_then(Value::as_str)
    } else {
        None
    }
}

/// Accepts exactly `expected` arguments, or one more when the first is a
/// comment (a string, null, or undefined).
pub fn validate_arguments(expected: usize, args: &[Value]) -> GsResult<()> {
    let comment_slot_ok = args
        .first()
        .is_some_and(|first| matches!(first, Value::String(_)) || first.is_nullish());
    if args.len() == expected || (args.len() == expected + 1 && comment_slot_ok) {
        Ok(())
    } else {
        Err(GsError::argument(format!(
            "Incorrect arguments passed to assert function (expected {} value arguments, got {} arguments)",
            expected,
            args.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_detection_is_by_count() {
        let args = vec![Value::from(1), Value::from(2), Value::from(3)];
        assert!(arg_count_includes_comment(2, &args));
        assert!(!arg_count_includes_comment(3, &args));
        // a non-string in the comment slot is not reported as a comment
        assert_eq!(comment_arg(2, &args), None);
    }

    #[test]
    fn validation_accepts_null_comment() {
        assert!(validate_arguments(1, &[Value::Null, Value::from(true)]).is_ok());
        assert!(validate_arguments(1, &[Value::from("c"), Value::from(true)]).is_ok());
        assert!(validate_arguments(1, &[Value::from(1), Value::from(true)]).is_err());
        assert!(validate_arguments(2, &[Value::from(1)]).is_err());
        assert!(validate_arguments(0, &[]).is_ok());
    }

    #[test]
    fn select_arg_out_of_range() {
        assert_eq!(select_arg(0, 1, &[Value::from(1)]), None);
        assert_eq!(select_arg(3, 2, &[Value::from(1), Value::from(2)]), None);
    }
}

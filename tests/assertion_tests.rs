//! Assertion messages, comments, and argument errors.

use gsunit::assert::{fail, raise_failure, Assert};
use gsunit::dynamic::call;
use gsunit::error::{ErrorType, GsError};
use gsunit::value::Value;
use serde_json::json;

fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}

fn failure_parts(error: GsError) -> (Option<String>, String) {
    match error {
        GsError::AssertionFailure { comment, message } => (comment, message),
        other => panic!("expected an assertion failure, got {other:?}"),
    }
}

#[cfg(test)]
mod message_tests {
    use super::*;

    #[test]
    fn test_raise_failure_always_fails() {
        let result: Result<u8, _> = raise_failure(Some("c"), "m");
        assert_eq!(result.unwrap_err(), GsError::failure(Some("c"), "m"));
    }

    #[test]
    fn test_boolean_messages() {
        let a = Assert::new();
        assert_eq!(
            failure_parts(a.assert_true(false).unwrap_err()).1,
            "Call to assert(boolean) with false"
        );
        assert_eq!(
            failure_parts(a.assert_false(true).unwrap_err()).1,
            "Call to assertFalse(boolean) with true"
        );
        assert!(a.assert_that(true).is_ok());
    }

    #[test]
    fn test_equals_is_strict() {
        let a = Assert::new();
        assert!(a.assert_equals(v(json!("x")), v(json!("x"))).is_ok());
        let (_, message) = failure_parts(a.assert_equals(v(json!([1])), v(json!([1]))).unwrap_err());
        assert_eq!(message, "Expected <1> (Array) but was <1> (Array)");
        let (_, message) = failure_parts(a.assert_not_equals(v(json!(1)), v(json!(1))).unwrap_err());
        assert_eq!(message, "Expected not to be <1> (Number)");
    }

    #[test]
    fn test_null_and_undefined_messages() {
        let a = Assert::new();
        let (_, message) = failure_parts(a.assert_null(v(json!(""))).unwrap_err());
        assert_eq!(message, "Expected <null> but was <> (String)");
        let (_, message) = failure_parts(a.assert_not_undefined(Value::Undefined).unwrap_err());
        assert_eq!(message, "Expected not to be <undefined>");
        assert!(a.assert_not_null(Value::Undefined).is_ok());
    }

    #[test]
    fn test_nan_reads_values_as_numbers() {
        let a = Assert::new();
        assert!(a.assert_nan(v(json!("abc"))).is_ok());
        assert!(a.assert_not_nan(v(json!("12"))).is_ok());
        assert!(a.assert_nan(v(json!(0))).is_err());
    }

    #[test]
    fn test_fail_message() {
        assert_eq!(
            fail("stop").unwrap_err().to_string(),
            "Comment: Call to fail()  -- Failure: stop"
        );
    }
}

#[cfg(test)]
mod structural_tests {
    use super::*;

    #[test]
    fn test_object_equals_reports_key_sets() {
        let err = Assert::new()
            .assert_object_equals(v(json!({"hi": "hi"})), v(json!({"hi": "hi", "something": "hi"})))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "  -- Failure: Expected keys \"hi\" but found \"hi, something\""
        );
    }

    #[test]
    fn test_array_equals_rejects_non_arrays() {
        let err = Assert::new()
            .assert_array_equals(v(json!({"0": 1})), v(json!([1])))
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::ArgumentError);
        assert_eq!(err.to_string(), "Argument error: Non-array passed to assertArrayEquals");
    }

    #[test]
    fn test_hash_equals_names_the_key() {
        let (comment, message) = failure_parts(
            Assert::new()
                .assert_hash_equals(v(json!({"hi": "hi"})), v(json!({"hi": "hello"})))
                .unwrap_err(),
        );
        assert_eq!(
            comment.as_deref(),
            Some("Value for key hi mismatch - expected = hi, actual = hello")
        );
        assert_eq!(message, "Expected <hi> (String) but was <hello> (String)");

        let (comment, _) = failure_parts(
            Assert::new()
                .assert_hash_equals(v(json!({"a": 1})), v(json!({"a": 1, "b": 2})))
                .unwrap_err(),
        );
        assert_eq!(comment.as_deref(), Some("Actual hash had key b that was not expected"));

        let (comment, _) = failure_parts(
            Assert::new()
                .assert_hash_equals(v(json!({"a": 1})), v(json!({})))
                .unwrap_err(),
        );
        assert_eq!(comment.as_deref(), Some("Expected hash had key a that was not found"));
    }

    #[test]
    fn test_ignoring_order() {
        let a = Assert::new();
        assert!(a
            .assert_array_equals_ignoring_order(v(json!([2, 1])), v(json!([1, 2])))
            .is_ok());
        let (_, message) = failure_parts(
            a.assert_array_equals_ignoring_order(v(json!([2, 1])), v(json!([1, 2, 3])))
                .unwrap_err(),
        );
        assert_eq!(
            message,
            "Expected arrays <2,1> (Array) and <1,2,3> (Array) to be equal (ignoring order)"
        );
        let (_, message) = failure_parts(
            a.assert_array_equals_ignoring_order(v(json!("ab")), v(json!([1])))
                .unwrap_err(),
        );
        assert!(message.ends_with("to be arrays"));
    }

    #[test]
    fn test_contains() {
        let a = Assert::new();
        assert!(a.assert_contains(v(json!("ell")), v(json!("hello"))).is_ok());
        assert!(a.assert_contains(v(json!(1)), v(json!([1, 2]))).is_ok());
        assert!(a.assert_contains(v(json!(1)), v(json!([0, 2]))).is_err());
        let err = a.assert_contains(v(json!(1)), v(json!(5))).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::ArgumentError);
    }

    #[test]
    fn test_roughly_equals_comment() {
        let (comment, _) =
            failure_parts(Assert::new().assert_roughly_equals(1.0, 2.0, 1.0).unwrap_err());
        assert_eq!(
            comment.as_deref(),
            Some("Expected 1, but got 2 which was more than 1 away")
        );
        assert!(Assert::new().assert_roughly_equals(1.0, 1.5, 1.0).is_ok());
    }

    #[test]
    fn test_evaluates_to_uses_fail() {
        let (comment, message) = failure_parts(
            Assert::with_comment("should be truthy")
                .assert_evaluates_to_true(v(json!("")))
                .unwrap_err(),
        );
        assert_eq!(comment.as_deref(), Some("Call to fail()"));
        assert_eq!(message, "should be truthy");
        assert!(Assert::new().assert_evaluates_to_false(v(json!([]))).is_err());
    }
}

#[cfg(test)]
mod throws_tests {
    use super::*;

    #[test]
    fn test_base_error_type_matches_everything() {
        let a = Assert::new();
        assert!(a.assert_throws_error(|| Err(GsError::range_error("r"))).is_ok());
        assert!(a
            .assert_throws(|| Err(GsError::failure(None, "f")), ErrorType::AssertionFailure)
            .is_ok());
    }

    #[test]
    fn test_specific_types_must_match() {
        let a = Assert::with_comment("typed");
        assert!(a.assert_throws_type_error(|| Err(GsError::type_error("t"))).is_ok());
        let (comment, message) =
            failure_parts(a.assert_throws_range_error(|| Err(GsError::error("e"))).unwrap_err());
        assert_eq!(comment.as_deref(), Some("typed"));
        assert_eq!(message, "Expected thrown error of type Error to be of type RangeError");
    }

    #[test]
    fn test_missing_error_fails() {
        let (_, message) = failure_parts(
            Assert::new()
                .assert_throws_reference_error(|| Ok(()))
                .unwrap_err(),
        );
        assert_eq!(
            message,
            "No error was thrown, expecting error of type 'ReferenceError'"
        );
    }
}

#[cfg(test)]
mod dynamic_tests {
    use super::*;

    #[test]
    fn test_leading_comment_is_detected() {
        let err = call("assertEquals", &[v(json!("label")), v(json!(1)), v(json!(2))]).unwrap_err();
        let (comment, message) = failure_parts(err);
        assert_eq!(comment.as_deref(), Some("label"));
        assert_eq!(message, "Expected <1> (Number) but was <2> (Number)");
    }

    #[test]
    fn test_null_comment_is_accepted() {
        assert!(call("assertTrue", &[Value::Null, v(json!(true))]).is_ok());
    }

    #[test]
    fn test_unknown_names_are_argument_errors() {
        let err = call("assertBogus", &[]).unwrap_err();
        assert_eq!(err.to_string(), "Argument error: Unknown assertion 'assertBogus'");
    }
}

//! Assertions.
//!
//! Every assertion returns `Ok(())` when its expectation holds and an
//! [`GsError::AssertionFailure`] otherwise, so test bodies can chain them
//! with `?`. Misuse of the API (an array assertion handed a non-array, say)
//! is a [`GsError::Argument`] instead.
//!
//! The optional comment shown with a failure lives on the [`Assert`] value:
//!
//! ```rust
//! use gsunit::assert::Assert;
//! use gsunit::value::Value;
//! let err = Assert::with_comment("totals").assert_equals(Value::from(1), Value::from(2)).unwrap_err();
//! assert_eq!(err.to_string(), "Comment: totals  -- Failure: Expected <1> (Number) but was <2> (Number)");
//! ```

use crate::equality::{deep_equals, strict_equals, unordered_equals};
use crate::error::{ErrorType, GsError, GsResult};
use crate::kind::{classify, display_string, ValueKind};
use crate::scope::{self, ErrorDecision, ScopeConfig};
use crate::value::Value;

/// Aborts the current assertion with an assertion failure carrying `comment`
/// and `message`. Always returns `Err`.
pub fn raise_failure<T>(comment: Option<&str>, message: &str) -> GsResult<T> {
    Err(GsError::failure(comment, message))
}

/// Causes a failure.
pub fn fail(message: &str) -> GsResult<()> {
    raise_failure(Some("Call to fail()"), message)
}

/// The assertion set, parameterised by an optional failure comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assert {
    comment: Option<String>,
}

impl Assert {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comment(comment: impl Into<String>) -> Self {
        Self {
            comment: Some(comment.into()),
        }
    }

    pub fn from_comment(comment: Option<String>) -> Self {
        Self { comment }
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// All assertions end here.
    fn check(&self, condition: bool, message: impl AsRef<str>) -> GsResult<()> {
        if condition {
            Ok(())
        } else {
            raise_failure(self.comment(), message.as_ref())
        }
    }

    pub fn assert_true(&self, value: bool) -> GsResult<()> {
        self.check(value, "Call to assert(boolean) with false")
    }

    /// Alias of [`Assert::assert_true`].
    pub fn assert_that(&self, value: bool) -> GsResult<()> {
        self.assert_true(value)
    }

    pub fn assert_false(&self, value: bool) -> GsResult<()> {
        self.check(!value, "Call to assertFalse(boolean) with true")
    }

    /// Strict equality: primitives by value, composite values by identity.
    pub fn assert_equals(
        &self,
        expected: impl AsRef<Value>,
        actual: impl AsRef<Value>,
    ) -> GsResult<()> {
        let (expected, actual) = (expected.as_ref(), actual.as_ref());
        self.check(
            strict_equals(expected, actual),
            format!(
                "Expected {} but was {}",
                display_string(expected),
                display_string(actual)
            ),
        )
    }

    pub fn assert_not_equals(
        &self,
        value1: impl AsRef<Value>,
        value2: impl AsRef<Value>,
    ) -> GsResult<()> {
        let (value1, value2) = (value1.as_ref(), value2.as_ref());
        self.check(
            !strict_equals(value1, value2),
            format!("Expected not to be {}", display_string(value2)),
        )
    }

    pub fn assert_null(&self, value: impl AsRef<Value>) -> GsResult<()> {
        let value = value.as_ref();
        self.check(
            value.is_null(),
            format!(
                "Expected {} but was {}",
                display_string(&Value::Null),
                display_string(value)
            ),
        )
    }

    pub fn assert_not_null(&self, value: impl AsRef<Value>) -> GsResult<()> {
        self.check(
            !value.as_ref().is_null(),
            format!("Expected not to be {}", display_string(&Value::Null)),
        )
    }

    pub fn assert_undefined(&self, value: impl AsRef<Value>) -> GsResult<()> {
        let value = value.as_ref();
        self.check(
            value.is_undefined(),
            format!(
                "Expected {} but was {}",
                display_string(&Value::Undefined),
                display_string(value)
            ),
        )
    }

    pub fn assert_not_undefined(&self, value: impl AsRef<Value>) -> GsResult<()> {
        self.check(
            !value.as_ref().is_undefined(),
            format!("Expected not to be {}", display_string(&Value::Undefined)),
        )
    }

    /// Passes when the value does not read as a number.
    pub fn assert_nan(&self, value: impl AsRef<Value>) -> GsResult<()> {
        self.check(value.as_ref().to_number().is_nan(), "Expected NaN")
    }

    pub fn assert_not_nan(&self, value: impl AsRef<Value>) -> GsResult<()> {
        self.check(!value.as_ref().to_number().is_nan(), "Expected not NaN")
    }

    /// Deep structural equality.
    ///
    /// When a nested member differs, the comment is extended with one
    /// `found nested <Kind>@<key>` line per level so the failure points at
    /// the member.
    pub fn assert_object_equals(
        &self,
        expected: impl AsRef<Value>,
        actual: impl AsRef<Value>,
    ) -> GsResult<()> {
        let (expected, actual) = (expected.as_ref(), actual.as_ref());
        let verdict = deep_equals(expected, actual);
        if verdict.equal {
            return Ok(());
        }
        let mut comment = self.comment.clone().unwrap_or_default();
        for segment in &verdict.path {
            comment.push_str(&format!(" found nested {segment}\n"));
        }
        let message = verdict.explanation.unwrap_or_else(|| {
            format!(
                "Expected {} but was {}",
                display_string(expected),
                display_string(actual)
            )
        });
        let comment = (!comment.is_empty()).then_some(comment);
        raise_failure(comment.as_deref(), &message)
    }

    pub fn assert_array_equals(
        &self,
        expected: impl AsRef<Value>,
        actual: impl AsRef<Value>,
    ) -> GsResult<()> {
        let (expected, actual) = (expected.as_ref(), actual.as_ref());
        if classify(expected) != ValueKind::Array || classify(actual) != ValueKind::Array {
            return Err(GsError::argument("Non-array passed to assertArrayEquals"));
        }
        self.assert_object_equals(expected, actual)
    }

    pub fn assert_evaluates_to_true(&self, value: impl AsRef<Value>) -> GsResult<()> {
        let value = value.as_ref();
        if value.is_truthy() {
            return Ok(());
        }
        let message = self
            .comment
            .clone()
            .unwrap_or_else(|| format!("Expected {} to evaluate to true", display_string(value)));
        fail(&message)
    }

    pub fn assert_evaluates_to_false(&self, value: impl AsRef<Value>) -> GsResult<()> {
        let value = value.as_ref();
        if !value.is_truthy() {
            return Ok(());
        }
        let message = self
            .comment
            .clone()
            .unwrap_or_else(|| format!("Expected {} to evaluate to false", display_string(value)));
        fail(&message)
    }

    /// Checks that every key of each hash is present in the other, with
    /// strictly equal values. The failure comment names the offending key.
    pub fn assert_hash_equals(
        &self,
        expected: impl AsRef<Value>,
        actual: impl AsRef<Value>,
    ) -> GsResult<()> {
        let (expected, actual) = (expected.as_ref(), actual.as_ref());
        let missing = Value::Undefined;
        for key in expected.keys() {
            let expected_value = expected.member(&key).unwrap_or(&missing);
            let actual_value = actual.member(&key).unwrap_or(&missing);
            Assert::with_comment(format!(
                "Expected hash had key {key} that was not found"
            ))
            .assert_not_undefined(actual_value)?;
            Assert::with_comment(format!(
                "Value for key {key} mismatch - expected = {expected_value}, actual = {actual_value}"
            ))
            .assert_equals(expected_value, actual_value)?;
        }
        for key in actual.keys() {
            Assert::with_comment(format!(
                "Actual hash had key {key} that was not expected"
            ))
            .assert_not_undefined(expected.member(&key).unwrap_or(&missing))?;
        }
        Ok(())
    }

    /// Passes when `expected` and `actual` are strictly closer than `tolerance`.
    pub fn assert_roughly_equals(&self, expected: f64, actual: f64, tolerance: f64) -> GsResult<()> {
        Assert::with_comment(format!(
            "Expected {}, but got {} which was more than {} away",
            Value::Number(expected),
            Value::Number(actual),
            Value::Number(tolerance)
        ))
        .assert_true((expected - actual).abs() < tolerance)
    }

    /// Substring search for strings, strict element search for arrays.
    pub fn assert_contains(
        &self,
        value: impl AsRef<Value>,
        collection: impl AsRef<Value>,
    ) -> GsResult<()> {
        let (value, collection) = (value.as_ref(), collection.as_ref());
        let found = match collection {
            Value::String(text) => text.contains(&value.to_string()),
            Value::Array(items) => items.iter().any(|item| strict_equals(item, value)),
            other => {
                return Err(GsError::argument(format!(
                    "assertContains needs a string or array collection, got {}",
                    other.type_name()
                )))
            }
        };
        Assert::with_comment(format!("Expected '{collection}' to contain '{value}'"))
            .assert_true(found)
    }

    pub fn assert_array_equals_ignoring_order(
        &self,
        expected: impl AsRef<Value>,
        actual: impl AsRef<Value>,
    ) -> GsResult<()> {
        let (expected, actual) = (expected.as_ref(), actual.as_ref());
        let not_equal = format!(
            "Expected arrays {} and {} to be equal (ignoring order)",
            display_string(expected),
            display_string(actual)
        );
        let not_arrays = format!(
            "Expected arguments {} and {} to be arrays",
            display_string(expected),
            display_string(actual)
        );

        self.check(!expected.is_null() && !actual.is_null(), &not_equal)?;
        let (Some(expected_items), Some(actual_items)) = (expected.as_array(), actual.as_array())
        else {
            return raise_failure(self.comment(), &not_arrays);
        };
        self.check(unordered_equals(expected_items, actual_items).equal, &not_equal)
    }

    /// Runs `func` and passes when it fails with an error that is an
    /// instance of `expected`.
    ///
    /// The call goes through the scoped execution engine: the error hook
    /// captures the error and suppresses it, and the captured error is
    /// inspected afterwards.
    pub fn assert_throws<F>(&self, func: F, expected: ErrorType) -> GsResult<()>
    where
        F: FnOnce() -> GsResult<()>,
    {
        let caught = scope::run(
            |_: &mut Option<GsError>| func().map(|()| None),
            ScopeConfig::new().on_error(|error: &GsError, caught: &mut Option<GsError>| {
                *caught = Some(error.clone());
                ErrorDecision::Suppress
            }),
        )?;
        match caught {
            Some(error) => self.check(
                error.is_instance_of(expected),
                format!(
                    "Expected thrown error of type {} to be of type {}",
                    error.error_type(),
                    expected
                ),
            ),
            None => raise_failure(
                self.comment(),
                &format!("No error was thrown, expecting error of type '{expected}'"),
            ),
        }
    }

    pub fn assert_throws_error<F>(&self, func: F) -> GsResult<()>
    where
        F: FnOnce() -> GsResult<()>,
    {
        self.assert_throws(func, ErrorType::Error)
    }

    pub fn assert_throws_type_error<F>(&self, func: F) -> GsResult<()>
    where
        F: FnOnce() -> GsResult<()>,
    {
        self.assert_throws(func, ErrorType::TypeError)
    }

    pub fn assert_throws_range_error<F>(&self, func: F) -> GsResult<()>
    where
        F: FnOnce() -> GsResult<()>,
    {
        self.assert_throws(func, ErrorType::RangeError)
    }

    pub fn assert_throws_reference_error<F>(&self, func: F) -> GsResult<()>
    where
        F: FnOnce() -> GsResult<()>,
    {
        self.assert_throws(func, ErrorType::ReferenceError)
    }
}

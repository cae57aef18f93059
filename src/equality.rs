//! Structural equality.
//!
//! [`deep_equals`] decides whether two values are the same shape all the way
//! down. Primitive kinds are compared with a per-kind [`Predicate`]; everything
//! else is compared by key set and then member by member.

use crate::kind::{classify, display_string, ValueKind};
use crate::value::Value;

/// Equality predicate applied to a pair of values of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Type-converting equality.
    Loose,
    /// Equality including type.
    Strict,
    /// Equality of the canonical text form.
    Text,
}

impl Predicate {
    /// The predicate used for a kind, or `None` when the kind is compared
    /// structurally.
    pub fn for_kind(kind: &ValueKind) -> Option<Predicate> {
        match kind {
            ValueKind::String | ValueKind::Number | ValueKind::Boolean => Some(Predicate::Loose),
            ValueKind::Date => Some(Predicate::Strict),
            ValueKind::RegExp | ValueKind::Function => Some(Predicate::Text),
            _ => None,
        }
    }

    pub fn test(self, a: &Value, b: &Value) -> bool {
        match self {
            Predicate::Loose => loose_equals(a, b),
            Predicate::Strict => strict_equals(a, b),
            Predicate::Text => a.to_string() == b.to_string(),
        }
    }
}

/// Equality including type.
///
/// Primitives and dates compare by value (NaN equals nothing); composite
/// values are only strictly equal to themselves.
///
/// ```rust
/// use gsunit::equality::strict_equals;
/// use gsunit::value::Value;
/// let list = Value::from(vec![1]);
/// assert!(strict_equals(&list, &list));
/// assert!(!strict_equals(&list, &list.clone()));
/// assert!(!strict_equals(&Value::from(1), &Value::from("1")));
/// ```
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Date(x), Value::Date(y)) => x == y,
        _ if a.is_composite() && b.is_composite() => std::ptr::eq(a, b),
        _ => false,
    }
}

/// Type-converting equality.
///
/// Null and undefined only equal each other; booleans and numeric text are
/// converted to numbers; composite values and dates meeting a primitive are
/// compared through their text form.
///
/// ```rust
/// use gsunit::equality::loose_equals;
/// use gsunit::value::Value;
/// assert!(loose_equals(&Value::from(1), &Value::from("1")));
/// assert!(loose_equals(&Value::from(true), &Value::from(1)));
/// assert!(loose_equals(&Value::Null, &Value::Undefined));
/// assert!(!loose_equals(&Value::Null, &Value::from(0)));
/// ```
pub fn loose_equals(a: &Value, b: &Value) -> bool {
    if std::mem::discriminant(a) == std::mem::discriminant(b) {
        return strict_equals(a, b);
    }
    match (a, b) {
        (x, y) if x.is_nullish() || y.is_nullish() => x.is_nullish() && y.is_nullish(),
        (Value::Number(x), Value::String(_)) => *x == b.to_number(),
        (Value::String(_), Value::Number(y)) => a.to_number() == *y,
        (Value::Bool(_), _) => loose_equals(&Value::Number(a.to_number()), b),
        (_, Value::Bool(_)) => loose_equals(a, &Value::Number(b.to_number())),
        (x, y) if is_object_like(x) && !is_object_like(y) => {
            loose_equals(&Value::String(x.to_string()), y)
        }
        (x, y) if !is_object_like(x) && is_object_like(y) => {
            loose_equals(x, &Value::String(y.to_string()))
        }
        _ => false,
    }
}

fn is_object_like(value: &Value) -> bool {
    value.is_composite() || matches!(value, Value::Date(_))
}

/// The outcome of a structural comparison.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Verdict {
    pub equal: bool,
    /// Why the comparison failed; `None` when equal.
    pub explanation: Option<String>,
    /// `Kind@key` segments from the root to the first mismatching member.
    pub path: Vec<String>,
}

impl Verdict {
    pub fn pass() -> Self {
        Self {
            equal: true,
            explanation: None,
            path: Vec::new(),
        }
    }

    pub fn fail(explanation: impl Into<String>) -> Self {
        Self {
            equal: false,
            explanation: Some(explanation.into()),
            path: Vec::new(),
        }
    }

    pub fn is_equal(&self) -> bool {
        self.equal
    }

    fn within(mut self, segment: String) -> Self {
        self.path.insert(0, segment);
        self
    }
}

/// Compares `expected` and `actual` structurally.
///
/// ```rust
/// use gsunit::equality::deep_equals;
/// use gsunit::value::Value;
/// use serde_json::json;
/// let a = Value::from(json!({"hi": "hi"}));
/// assert!(deep_equals(&a, &Value::from(json!({"hi": "hi"}))).equal);
/// let v = deep_equals(&a, &Value::from(json!({"hi": "hi", "extra": "x"})));
/// assert_eq!(v.explanation.as_deref(), Some("Expected keys \"hi\" but found \"extra, hi\""));
/// ```
pub fn deep_equals(expected: &Value, actual: &Value) -> Verdict {
    if std::ptr::eq(expected, actual) || strict_equals(expected, actual) {
        return Verdict::pass();
    }

    let expected_kind = classify(expected);
    if !expected_kind.same_class(&classify(actual)) {
        return mismatch(expected, actual);
    }

    if let Some(predicate) = Predicate::for_kind(&expected_kind) {
        return if predicate.test(expected, actual) {
            Verdict::pass()
        } else {
            mismatch(expected, actual)
        };
    }

    let expected_keys = key_list(expected);
    let actual_keys = key_list(actual);
    if expected_keys != actual_keys {
        return Verdict::fail(format!(
            "Expected keys \"{}\" but found \"{}\"",
            expected_keys, actual_keys
        ));
    }

    for key in expected.keys() {
        let (Some(expected_member), Some(actual_member)) =
            (expected.member(&key), actual.member(&key))
        else {
            return mismatch(expected, actual);
        };
        let verdict = deep_equals(expected_member, actual_member);
        if !verdict.equal {
            return verdict.within(format!("{}@{}", expected_kind, key));
        }
    }
    Verdict::pass()
}

/// Compares two sequences ignoring order.
///
/// The lengths must match, and every element of `expected` must
/// [`deep_equals`] at least one element of `actual`. Elements of `actual`
/// may be matched more than once.
pub fn unordered_equals(expected: &[Value], actual: &[Value]) -> Verdict {
    if expected.len() != actual.len() {
        return Verdict::fail(format!(
            "Expected {} elements but found {}",
            expected.len(),
            actual.len()
        ));
    }
    for (index, item) in expected.iter().enumerate() {
        if !actual.iter().any(|candidate| deep_equals(item, candidate).equal) {
            return Verdict::fail(format!(
                "No element matching {} (index {})",
                display_string(item),
                index
            ));
        }
    }
    Verdict::pass()
}

fn key_list(value: &Value) -> String {
    let mut keys = value.keys();
    keys.sort();
    keys.join(", ")
}

fn mismatch(expected: &Value, actual: &Value) -> Verdict {
    Verdict::fail(format!(
        "Expected {} but was {}",
        display_string(expected),
        display_string(actual)
    ))
}

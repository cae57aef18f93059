//! Value classification.
//!
//! The equality engine picks its comparison strategy from the [`ValueKind`]
//! of both operands. Built-in shapes have fixed kinds; objects are classified
//! by their declared constructor name, and fall back to an explicit
//! [`ValueKind::Unresolved`] tag when no name can be recovered.

use std::fmt;

use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Date,
    RegExp,
    Function,
    Array,
    /// An object built by a constructor with a declared name.
    Named(String),
    /// Best-effort tag for values with no recoverable constructor name:
    /// `"Undefined"`, `"Null"`, or `"Object"` for anonymous constructors.
    Unresolved(String),
}

impl ValueKind {
    pub fn name(&self) -> &str {
        match self {
            ValueKind::String => "String",
            ValueKind::Number => "Number",
            ValueKind::Boolean => "Boolean",
            ValueKind::Date => "Date",
            ValueKind::RegExp => "RegExp",
            ValueKind::Function => "Function",
            ValueKind::Array => "Array",
            ValueKind::Named(name) | ValueKind::Unresolved(name) => name,
        }
    }
}

impl ValueKind {
    /// Whether two kinds are compared as the same class.
    ///
    /// An unresolved `"Object"` tag counts as a plain `Object`, so objects
    /// from anonymous constructors compare member by member with plain ones.
    pub fn same_class(&self, other: &ValueKind) -> bool {
        match (self, other) {
            (ValueKind::Named(a), ValueKind::Unresolved(b))
            | (ValueKind::Unresolved(a), ValueKind::Named(b)) => a == "Object" && b == "Object",
            _ => self == other,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Classifies `value`.
///
/// ```rust
/// use gsunit::kind::{classify, ValueKind};
/// use gsunit::value::{Object, Value};
/// assert_eq!(classify(&Value::from("s")), ValueKind::String);
/// assert_eq!(classify(&Value::from(Object::new())), ValueKind::Named("Object".into()));
/// assert_eq!(classify(&Value::from(Object::named("point"))), ValueKind::Named("Point".into()));
/// assert_eq!(classify(&Value::Null), ValueKind::Unresolved("Null".into()));
/// ```
pub fn classify(value: &Value) -> ValueKind {
    match value {
        Value::String(_) => ValueKind::String,
        Value::Bool(_) => ValueKind::Boolean,
        Value::Number(_) => ValueKind::Number,
        Value::Array(_) => ValueKind::Array,
        Value::RegExp(_) => ValueKind::RegExp,
        Value::Date(_) => ValueKind::Date,
        Value::Function(_) => ValueKind::Function,
        Value::Object(object) => match object.constructor() {
            Some(name) if !name.is_empty() => ValueKind::Named(capitalize(name)),
            _ => ValueKind::Unresolved("Object".to_string()),
        },
        Value::Null => ValueKind::Unresolved("Null".to_string()),
        Value::Undefined => ValueKind::Unresolved("Undefined".to_string()),
    }
}

/// `<value> (Kind)`, with the kind omitted for null and undefined.
///
/// ```rust
/// use gsunit::kind::display_string;
/// use gsunit::value::Value;
/// assert_eq!(display_string(&Value::from(1)), "<1> (Number)");
/// assert_eq!(display_string(&Value::Null), "<null>");
/// ```
pub fn display_string(value: &Value) -> String {
    if value.is_nullish() {
        format!("<{}>", value)
    } else {
        format!("<{}> ({})", value, classify(value))
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{FunctionValue, Object, RegexValue};

    #[test]
    fn builtins_have_fixed_kinds() {
        let cases = vec![
            (Value::from(true), "Boolean"),
            (Value::from(1.5), "Number"),
            (Value::from(vec![1, 2]), "Array"),
            (Value::from(RegexValue::new("a", "").unwrap()), "RegExp"),
            (Value::from(FunctionValue::from_source("function f() {}")), "Function"),
            (Value::Undefined, "Undefined"),
        ];
        for (value, expected) in cases {
            assert_eq!(classify(&value).name(), expected);
        }
    }

    #[test]
    fn anonymous_constructors_share_the_plain_object_class() {
        let kind = classify(&Value::from(Object::anonymous()));
        assert_eq!(kind, ValueKind::Unresolved("Object".to_string()));
        assert!(kind.same_class(&classify(&Value::from(Object::new()))));
        assert!(!kind.same_class(&classify(&Value::from(Object::named("point")))));
        assert!(!ValueKind::Unresolved("Null".into()).same_class(&ValueKind::Named("Null".into())));
    }
}

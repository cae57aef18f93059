//! The dynamic value model compared and inspected by every assertion.
//!
//! Values mirror the handful of runtime shapes the equality engine knows how to
//! classify: primitives, dates, regular expressions, function descriptors,
//! arrays, and keyed objects. The tree is owned, so a `Value` can never contain
//! itself.

use std::fmt;

use chrono::{DateTime, Utc};
use im::HashMap;

use crate::error::{GsError, GsResult};
use crate::util::function_name;

/// Represents a value handed to an assertion.
///
/// # Examples
///
/// ```rust
/// use gsunit::value::Value;
/// let n = Value::Number(3.14);
/// assert_eq!(n.type_name(), "Number");
/// let s = Value::from("hello");
/// assert_eq!(s.type_name(), "String");
/// assert!(Value::default().is_undefined());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Date(DateTime<Utc>),
    RegExp(RegexValue),
    Function(FunctionValue),
    Array(Vec<Value>),
    Object(Object),
}

impl Value {
    /// Returns the variant name of the value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use gsunit::value::Value;
    /// assert_eq!(Value::Bool(true).type_name(), "Bool");
    /// assert_eq!(Value::Array(vec![]).type_name(), "Array");
    /// ```
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "Undefined",
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::Date(_) => "Date",
            Value::RegExp(_) => "RegExp",
            Value::Function(_) => "Function",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for `Null` and `Undefined`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    /// True for values compared by member recursion rather than by a predicate.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Value::Array(_) | Value::Object(_) | Value::RegExp(_) | Value::Function(_)
        )
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Numeric conversion with the loose rules assertions rely on: blank
    /// strings are zero, unparsable text is NaN, arrays go through their
    /// joined text.
    ///
    /// ```rust
    /// use gsunit::value::Value;
    /// assert_eq!(Value::from(" 12 ").to_number(), 12.0);
    /// assert_eq!(Value::Null.to_number(), 0.0);
    /// assert!(Value::Undefined.to_number().is_nan());
    /// assert!(Value::from("abc").to_number().is_nan());
    /// ```
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => parse_numeric_text(s),
            Value::Date(d) => d.timestamp_millis() as f64,
            Value::Array(_) => parse_numeric_text(&self.to_string()),
            Value::RegExp(_) | Value::Function(_) | Value::Object(_) => f64::NAN,
        }
    }

    /// Whether the value counts as true in a boolean position.
    ///
    /// ```rust
    /// use gsunit::value::Value;
    /// assert!(Value::from("hi").is_truthy());
    /// assert!(!Value::from("").is_truthy());
    /// assert!(!Value::Number(f64::NAN).is_truthy());
    /// assert!(Value::Array(vec![]).is_truthy());
    /// ```
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Own enumerable keys in iteration order: indices for arrays, member
    /// names (sorted) for objects, nothing for everything else.
    pub fn keys(&self) -> Vec<String> {
        match self {
            Value::Array(items) => (0..items.len()).map(|i| i.to_string()).collect(),
            Value::Object(object) => object.keys(),
            _ => Vec::new(),
        }
    }

    /// Looks up an own member by key.
    pub fn member(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            Value::Object(object) => object.get(key),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Display formatting helpers
    // ------------------------------------------------------------------------

    fn fmt_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
        if n.is_nan() {
            write!(f, "NaN")
        } else if n.is_infinite() {
            write!(f, "{}Infinity", if n < 0.0 { "-" } else { "" })
        } else if n == 0.0 {
            // -0 prints as 0
            write!(f, "0")
        } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
            let text = format!("{:e}", n);
            match text.split_once('e') {
                Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                    write!(f, "{}e+{}", mantissa, exponent)
                }
                _ => write!(f, "{}", text),
            }
        } else if n.fract() == 0.0 {
            write!(f, "{}", (n as i128))
        } else {
            write!(f, "{}", n)
        }
    }

    fn fmt_array(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            if !item.is_nullish() {
                write!(f, "{}", item)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => Value::fmt_number(f, *n),
            Value::String(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", d.to_rfc3339()),
            Value::RegExp(r) => write!(f, "{}", r),
            Value::Function(func) => write!(f, "{}", func.source()),
            Value::Array(items) => Value::fmt_array(f, items),
            Value::Object(_) => write!(f, "[object Object]"),
        }
    }
}

impl AsRef<Value> for Value {
    fn as_ref(&self) -> &Value {
        self
    }
}

fn parse_numeric_text(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some((digits, radix)) = radix_prefix(trimmed) {
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return f64::NAN;
        }
        return u128::from_str_radix(digits, radix).map_or(f64::NAN, |n| n as f64);
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rust accepts "inf" and "nan" spellings that should stay NaN here
        other if other.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => {
            f64::NAN
        }
        other => other.parse::<f64>().unwrap_or(f64::NAN),
    }
}

/// Splits `0x`, `0o`, and `0b` literals into their digits and radix.
fn radix_prefix(text: &str) -> Option<(&str, u32)> {
    let (prefix, digits) = (text.get(..2)?, text.get(2..)?);
    let radix = match prefix {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    Some((digits, radix))
}

// ============================================================================
// COMPOSITE PAYLOADS
// ============================================================================

/// A keyed object with an optional constructor name.
///
/// Plain objects are built by [`Object::new`] and report `"Object"` as their
/// constructor; [`Object::anonymous`] builds one whose constructor has no name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    constructor: Option<String>,
    members: HashMap<String, Value>,
}

impl Object {
    pub fn new() -> Self {
        Self::named("Object")
    }

    /// An object built by a constructor with the given declared name.
    pub fn named(constructor: impl Into<String>) -> Self {
        Self {
            constructor: Some(constructor.into()),
            members: HashMap::new(),
        }
    }

    /// An object whose constructor name cannot be recovered.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn constructor(&self) -> Option<&str> {
        self.constructor.as_deref()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.members.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.members.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.members.remove(key)
    }

    /// Member names, sorted so iteration order is stable.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.members.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A regular expression: its source pattern, flags, and the compiled matcher.
#[derive(Debug, Clone)]
pub struct RegexValue {
    pattern: String,
    flags: String,
    compiled: regex::Regex,
}

impl RegexValue {
    /// Compiles `pattern` with `flags` (any of `g`, `i`, `m`, `s`, `u`, `y`).
    /// An invalid pattern or unknown flag is a `SyntaxError`.
    pub fn new(pattern: &str, flags: &str) -> GsResult<Self> {
        let mut builder = regex::RegexBuilder::new(pattern);
        for flag in flags.chars() {
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                'g' | 'u' | 'y' => {}
                other => {
                    return Err(GsError::syntax_error(format!(
                        "Invalid regular expression flags '{}': unknown flag '{}'",
                        flags, other
                    )))
                }
            }
        }
        let compiled = builder.build().map_err(|e| {
            GsError::syntax_error(format!("Invalid regular expression /{}/: {}", pattern, e))
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            flags: flags.to_string(),
            compiled,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.compiled.is_match(text)
    }
}

impl PartialEq for RegexValue {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.flags == other.flags
    }
}

impl fmt::Display for RegexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.pattern, self.flags)
    }
}

/// A function known only by its source text.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionValue {
    name: String,
    source: String,
}

impl FunctionValue {
    /// Builds a descriptor from source text; the name is read from a leading
    /// `function <name>` and is `"anonymous"` otherwise.
    pub fn from_source(source: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            name: function_name(&source),
            source,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<RegexValue> for Value {
    fn from(r: RegexValue) -> Self {
        Value::RegExp(r)
    }
}

impl From<FunctionValue> for Value {
    fn from(func: FunctionValue) -> Self {
        Value::Function(func)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(option: Option<T>) -> Self {
        option.map_or(Value::Null, Into::into)
    }
}

/// JSON objects become plain objects and JSON arrays become arrays.
///
/// ```rust
/// use gsunit::value::Value;
/// let v = Value::from(serde_json::json!({"hi": "hi", "n": [1, 2]}));
/// assert_eq!(v.keys(), vec!["hi".to_string(), "n".to_string()]);
/// ```
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                let mut object = Object::new();
                for (key, value) in map {
                    object.insert(key, Value::from(value));
                }
                Value::Object(object)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_follows_script_text_rules() {
        assert_eq!(Value::Number(2.0).to_string(), "2");
        assert_eq!(Value::Number(-0.0).to_string(), "0");
        assert_eq!(Value::Number(1.5).to_string(), "1.5");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::Number(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Value::from(json!([1, null, "a"])).to_string(), "1,,a");
        assert_eq!(Value::from(json!({"b": 1, "a": 2})).to_string(), "[object Object]");
        assert_eq!(Value::Number(1e21).to_string(), "1e+21");
        assert_eq!(Value::Number(1.5e-7).to_string(), "1.5e-7");
        assert_eq!(Value::Number(123456.0).to_string(), "123456");
        assert_eq!(Value::Number(0.000001).to_string(), "0.000001");
    }

    #[test]
    fn array_numbers_go_through_text() {
        assert_eq!(Value::from(json!([])).to_number(), 0.0);
        assert_eq!(Value::from(json!([7])).to_number(), 7.0);
        assert!(Value::from(json!([1, 2])).to_number().is_nan());
        assert!(Value::from("nan").to_number().is_nan());
        assert!(Value::from("inf").to_number().is_nan());
        assert_eq!(Value::from("1e3").to_number(), 1000.0);
        assert_eq!(Value::from("0x1A").to_number(), 26.0);
        assert_eq!(Value::from(" 0b101 ").to_number(), 5.0);
        assert!(Value::from("0x").to_number().is_nan());
        assert!(Value::from("0xZZ").to_number().is_nan());
    }

    #[test]
    fn members_resolve_by_string_key() {
        let v = Value::from(json!(["x", "y"]));
        assert_eq!(v.keys(), vec!["0", "1"]);
        assert_eq!(v.member("1"), Some(&Value::from("y")));
        assert_eq!(v.member("2"), None);
        assert_eq!(Value::from(3).member("0"), None);
    }

    #[test]
    fn regex_flags_are_validated() {
        let r = RegexValue::new("ab+c", "i").unwrap();
        assert!(r.is_match("xABBC"));
        assert_eq!(r.to_string(), "/ab+c/i");
        assert!(RegexValue::new("ab", "q").is_err());
        assert!(RegexValue::new("(", "").is_err());
    }

    #[test]
    fn function_names_come_from_source() {
        let f = FunctionValue::from_source("function add(a, b) { return a + b; }");
        assert_eq!(f.name(), "add");
        let g = FunctionValue::from_source("function (x) { return x; }");
        assert_eq!(g.name(), "anonymous");
    }
}

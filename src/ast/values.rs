use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ast::geometry::{Line2D, Point2D, Polygon2D};
use crate::ast::repeat::DateRepeat;

/// The declared SQL value type of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueType {
    /// An untyped NULL, compatible with every other type.
    Null,
    String,
    Number,
    Integer,
    Date,
    Boolean,
    /// Calendar period (years, months, days, hours, minutes, seconds).
    DateRepeat,
    /// Exact elapsed time, carried as seconds.
    Duration,
    Point,
    Line,
    Polygon,
    Bytes,
}

impl ValueType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ValueType::Number | ValueType::Integer)
    }

    pub fn is_geometry(self) -> bool {
        matches!(self, ValueType::Point | ValueType::Line | ValueType::Polygon)
    }

    /// Types that can be ordered with `<`, `>` and BETWEEN.
    pub fn is_comparable(self) -> bool {
        matches!(
            self,
            ValueType::String
                | ValueType::Number
                | ValueType::Integer
                | ValueType::Date
                | ValueType::Duration
                | ValueType::Null
        )
    }

    /// The common type of two operands, if they can meet.
    ///
    /// NULL joins anything, INTEGER widens to NUMBER, everything else must match.
    pub fn unify(self, other: ValueType) -> Option<ValueType> {
        match (self, other) {
            (a, b) if a == b => Some(a),
            (ValueType::Null, b) => Some(b),
            (a, ValueType::Null) => Some(a),
            (ValueType::Integer, ValueType::Number) | (ValueType::Number, ValueType::Integer) => {
                Some(ValueType::Number)
            }
            _ => None,
        }
    }

    /// `true` when a value of type `other` may stand where `self` is declared.
    pub fn accepts(self, other: ValueType) -> bool {
        match (self, other) {
            (a, b) if a == b => true,
            (_, ValueType::Null) => true,
            (ValueType::Number, ValueType::Integer) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Null => write!(f, "null"),
            ValueType::String => write!(f, "string"),
            ValueType::Number => write!(f, "number"),
            ValueType::Integer => write!(f, "integer"),
            ValueType::Date => write!(f, "date"),
            ValueType::Boolean => write!(f, "boolean"),
            ValueType::DateRepeat => write!(f, "date repeat"),
            ValueType::Duration => write!(f, "duration"),
            ValueType::Point => write!(f, "point"),
            ValueType::Line => write!(f, "line"),
            ValueType::Polygon => write!(f, "polygon"),
            ValueType::Bytes => write!(f, "bytes"),
        }
    }
}

/// A literal value carried by an expression leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    String(String),
    Timestamp(NaiveDateTime),
    DateRepeat(DateRepeat),
    Duration(TimeDelta),
    Point(Point2D),
    Line(Line2D),
    Polygon(Polygon2D),
    Bytes(Vec<u8>),
}

impl Value {
    /// Runtime type of the value; `ValueType::Null` for NULL.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Boolean,
            Value::Int(_) => ValueType::Integer,
            Value::Float(_) | Value::Decimal(_) => ValueType::Number,
            Value::String(_) => ValueType::String,
            Value::Timestamp(_) => ValueType::Date,
            Value::DateRepeat(_) => ValueType::DateRepeat,
            Value::Duration(_) => ValueType::Duration,
            Value::Point(_) => ValueType::Point,
            Value::Line(_) => ValueType::Line,
            Value::Polygon(_) => ValueType::Polygon,
            Value::Bytes(_) => ValueType::Bytes,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Decimal> for Value {
    fn from(n: Decimal) -> Self {
        Value::Decimal(n)
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

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Timestamp(d.and_time(chrono::NaiveTime::MIN))
    }
}

impl From<DateRepeat> for Value {
    fn from(r: DateRepeat) -> Self {
        Value::DateRepeat(r)
    }
}

impl From<TimeDelta> for Value {
    fn from(d: TimeDelta) -> Self {
        Value::Duration(d)
    }
}

impl From<Point2D> for Value {
    fn from(p: Point2D) -> Self {
        Value::Point(p)
    }
}

impl From<Line2D> for Value {
    fn from(l: Line2D) -> Self {
        Value::Line(l)
    }
}

impl From<Polygon2D> for Value {
    fn from(p: Polygon2D) -> Self {
        Value::Polygon(p)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unify() {
        assert_eq!(
            ValueType::Integer.unify(ValueType::Number),
            Some(ValueType::Number)
        );
        assert_eq!(ValueType::Null.unify(ValueType::Date), Some(ValueType::Date));
        assert_eq!(ValueType::String.unify(ValueType::Integer), None);
    }

    #[test]
    fn test_accepts_is_directional() {
        assert!(ValueType::Number.accepts(ValueType::Integer));
        assert!(!ValueType::Integer.accepts(ValueType::Number));
        assert!(ValueType::Boolean.accepts(ValueType::Null));
    }

    #[test]
    fn test_option_into_value() {
        let v: Value = Option::<i64>::None.into();
        assert!(v.is_null());
        let v: Value = Some("x").into();
        assert_eq!(v.value_type(), ValueType::String);
    }
}

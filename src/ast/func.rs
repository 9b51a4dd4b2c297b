//! Function catalogue and type signatures.

use serde::{Deserialize, Serialize};

use crate::ast::ValueType;
use crate::error::{CompileError, CompileResult};

/// Calendar unit for date arithmetic and extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateUnit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl DateUnit {
    pub fn keyword(self) -> &'static str {
        match self {
            DateUnit::Year => "YEAR",
            DateUnit::Month => "MONTH",
            DateUnit::Week => "WEEK",
            DateUnit::Day => "DAY",
            DateUnit::Hour => "HOUR",
            DateUnit::Minute => "MINUTE",
            DateUnit::Second => "SECOND",
        }
    }
}

impl std::fmt::Display for DateUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// Edge of a geometry's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryBound {
    MinX,
    MaxX,
    MinY,
    MaxY,
}

/// Scalar and window-only functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Func {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
    Negate,
    BitAnd,
    // Numeric
    Abs,
    Sign,
    Ceil,
    Floor,
    Round,
    RoundTo,
    Truncate,
    Sqrt,
    Power,
    Exp,
    Ln,
    Log10,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Cot,
    Sinh,
    Cosh,
    Tanh,
    Degrees,
    Radians,
    Pi,
    Random,
    Greatest,
    Least,
    // Generic
    Coalesce,
    NullIf,
    // Conversions
    ToStringValue,
    ToNumber,
    ToInteger,
    BooleanToInteger,
    // String
    Lower,
    Upper,
    Trim,
    LeftTrim,
    RightTrim,
    Length,
    Substring,
    Position,
    Replace,
    Concat,
    RegexMatch,
    // Date
    CurrentDate,
    CurrentTimestamp,
    DatePart(DateUnit),
    DayOfWeek,
    DateAdd(DateUnit),
    DateDiff(DateUnit),
    EndOfMonth,
    StartOfDay,
    // Date repeat
    DateAddRepeat,
    DateSubtractRepeat,
    RepeatBetween,
    RepeatPart(DateUnit),
    // Duration
    DurationBetween,
    DateAddDuration,
    DurationSeconds,
    // Geometry
    MakePoint,
    PointX,
    PointY,
    Distance,
    GeomEquals,
    Contains,
    Intersects,
    Area,
    LineLength,
    Bound(GeometryBound),
    AsText,
    // Window only
    RowNumber,
    Rank,
    DenseRank,
    PercentRank,
    CumeDist,
    Ntile,
    Lag,
    Lead,
    FirstValue,
    LastValue,
    NthValue,
}

impl Func {
    /// Name used in error messages.
    pub fn name(self) -> &'static str {
        use Func::*;
        match self {
            Add => "addition",
            Subtract => "subtraction",
            Multiply => "multiplication",
            Divide => "division",
            Modulus => "MOD",
            Negate => "negation",
            BitAnd => "bitwise AND",
            Abs => "ABS",
            Sign => "SIGN",
            Ceil => "CEIL",
            Floor => "FLOOR",
            Round | RoundTo => "ROUND",
            Truncate => "TRUNCATE",
            Sqrt => "SQRT",
            Power => "POWER",
            Exp => "EXP",
            Ln => "LN",
            Log10 => "LOG10",
            Sin => "SIN",
            Cos => "COS",
            Tan => "TAN",
            Asin => "ASIN",
            Acos => "ACOS",
            Atan => "ATAN",
            Atan2 => "ATAN2",
            Cot => "COT",
            Sinh => "SINH",
            Cosh => "COSH",
            Tanh => "TANH",
            Degrees => "DEGREES",
            Radians => "RADIANS",
            Pi => "PI",
            Random => "RANDOM",
            Greatest => "GREATEST",
            Least => "LEAST",
            Coalesce => "COALESCE",
            NullIf => "NULLIF",
            ToStringValue => "string conversion",
            ToNumber => "number conversion",
            ToInteger => "integer conversion",
            BooleanToInteger => "boolean conversion",
            Lower => "LOWER",
            Upper => "UPPER",
            Trim => "TRIM",
            LeftTrim => "LTRIM",
            RightTrim => "RTRIM",
            Length => "LENGTH",
            Substring => "SUBSTRING",
            Position => "POSITION",
            Replace => "REPLACE",
            Concat => "concatenation",
            RegexMatch => "regular expression match",
            CurrentDate => "CURRENT_DATE",
            CurrentTimestamp => "CURRENT_TIMESTAMP",
            DatePart(_) => "date part",
            DayOfWeek => "day of week",
            DateAdd(_) => "date addition",
            DateDiff(_) => "date difference",
            EndOfMonth => "end of month",
            StartOfDay => "start of day",
            DateAddRepeat => "date repeat addition",
            DateSubtractRepeat => "date repeat subtraction",
            RepeatBetween => "date repeat between",
            RepeatPart(_) => "date repeat part",
            DurationBetween => "duration between",
            DateAddDuration => "duration addition",
            DurationSeconds => "duration seconds",
            MakePoint => "point construction",
            PointX => "point X",
            PointY => "point Y",
            Distance => "distance",
            GeomEquals => "spatial equality",
            Contains => "spatial containment",
            Intersects => "spatial intersection",
            Area => "area",
            LineLength => "line length",
            Bound(_) => "bounding box",
            AsText => "WKT conversion",
            RowNumber => "ROW_NUMBER",
            Rank => "RANK",
            DenseRank => "DENSE_RANK",
            PercentRank => "PERCENT_RANK",
            CumeDist => "CUME_DIST",
            Ntile => "NTILE",
            Lag => "LAG",
            Lead => "LEAD",
            FirstValue => "FIRST_VALUE",
            LastValue => "LAST_VALUE",
            NthValue => "NTH_VALUE",
        }
    }

    /// Functions that are only legal inside an OVER clause.
    pub fn is_window_only(self) -> bool {
        use Func::*;
        matches!(
            self,
            RowNumber
                | Rank
                | DenseRank
                | PercentRank
                | CumeDist
                | Ntile
                | Lag
                | Lead
                | FirstValue
                | LastValue
                | NthValue
        )
    }

    /// Functions whose result is a predicate rather than a boolean value.
    pub(crate) fn is_predicate(self) -> bool {
        matches!(
            self,
            Func::RegexMatch | Func::GeomEquals | Func::Contains | Func::Intersects
        )
    }

    fn arity(self) -> (usize, Option<usize>) {
        use Func::*;
        match self {
            Pi | Random | CurrentDate | CurrentTimestamp | RowNumber | Rank | DenseRank
            | PercentRank | CumeDist => (0, Some(0)),
            Negate | Abs | Sign | Ceil | Floor | Round | Truncate | Sqrt | Exp | Ln | Log10
            | Sin | Cos | Tan | Asin | Acos | Atan | Cot | Sinh | Cosh | Tanh | Degrees
            | Radians | ToStringValue | ToNumber | ToInteger | BooleanToInteger | Lower
            | Upper | Trim | LeftTrim | RightTrim | Length | DatePart(_) | DayOfWeek
            | EndOfMonth | StartOfDay | RepeatPart(_) | DurationSeconds | PointX | PointY
            | Area | LineLength | Bound(_) | AsText | Ntile | FirstValue | LastValue => {
                (1, Some(1))
            }
            Add | Subtract | Multiply | Divide | Modulus | BitAnd | RoundTo | Power | Atan2
            | NullIf | Position | RegexMatch | DateAdd(_) | DateDiff(_) | DateAddRepeat
            | DateSubtractRepeat | RepeatBetween | DurationBetween | DateAddDuration
            | MakePoint | Distance | GeomEquals | Contains | Intersects | NthValue => {
                (2, Some(2))
            }
            Replace => (3, Some(3)),
            Substring => (2, Some(3)),
            Lag | Lead => (1, Some(3)),
            Greatest | Least | Coalesce => (1, None),
            Concat => (2, None),
        }
    }

    /// Validate argument types and infer the result type.
    pub fn result_type(self, args: &[ValueType]) -> CompileResult<ValueType> {
        let (min, max) = self.arity();
        if args.len() < min || max.is_some_and(|m| args.len() > m) {
            let expected = match max {
                Some(m) if m == min => min.to_string(),
                Some(m) => format!("{} to {}", min, m),
                None => format!("at least {}", min),
            };
            return Err(CompileError::arity(self.name(), expected, args.len()));
        }

        let ctx = self.name();
        use Func::*;
        use ValueType as T;
        match self {
            Add | Subtract | Multiply | Modulus | Negate | Abs => {
                all_numeric(ctx, args)?;
                Ok(widen(args))
            }
            Divide | Power | Atan2 | Sqrt | Exp | Ln | Log10 | Sin | Cos | Tan | Asin | Acos
            | Atan | Cot | Sinh | Cosh | Tanh | Degrees | Radians => {
                all_numeric(ctx, args)?;
                Ok(T::Number)
            }
            Sign | Ceil | Floor | Round | Truncate => {
                all_numeric(ctx, args)?;
                Ok(T::Integer)
            }
            RoundTo => {
                all_numeric(ctx, &args[..1])?;
                expect(ctx, T::Integer, args[1])?;
                Ok(T::Number)
            }
            Pi | Random => Ok(T::Number),
            BitAnd => {
                for a in args {
                    expect(ctx, T::Integer, *a)?;
                }
                Ok(T::Integer)
            }
            Greatest | Least => {
                let t = unify_all(ctx, args)?;
                if !t.is_comparable() {
                    return Err(CompileError::type_mismatch(ctx, T::Number, t));
                }
                Ok(t)
            }
            Coalesce | NullIf => unify_all(ctx, args),
            ToStringValue => match args[0] {
                T::String | T::Number | T::Integer | T::Date | T::Null => Ok(T::String),
                other => Err(CompileError::type_mismatch(ctx, T::Number, other)),
            },
            ToNumber | ToInteger => match args[0] {
                T::String | T::Number | T::Integer | T::Null => {
                    Ok(if self == ToNumber { T::Number } else { T::Integer })
                }
                other => Err(CompileError::type_mismatch(ctx, T::String, other)),
            },
            BooleanToInteger => {
                expect(ctx, T::Boolean, args[0])?;
                Ok(T::Integer)
            }
            Lower | Upper | Trim | LeftTrim | RightTrim | Replace | Concat => {
                for a in args {
                    expect(ctx, T::String, *a)?;
                }
                Ok(T::String)
            }
            Length => {
                expect(ctx, T::String, args[0])?;
                Ok(T::Integer)
            }
            Substring => {
                expect(ctx, T::String, args[0])?;
                for a in &args[1..] {
                    expect(ctx, T::Integer, *a)?;
                }
                Ok(T::String)
            }
            Position => {
                expect(ctx, T::String, args[0])?;
                expect(ctx, T::String, args[1])?;
                Ok(T::Integer)
            }
            RegexMatch => {
                expect(ctx, T::String, args[0])?;
                expect(ctx, T::String, args[1])?;
                Ok(T::Boolean)
            }
            CurrentDate | CurrentTimestamp => Ok(T::Date),
            DatePart(unit) => {
                expect(ctx, T::Date, args[0])?;
                Ok(if unit == DateUnit::Second { T::Number } else { T::Integer })
            }
            DayOfWeek => {
                expect(ctx, T::Date, args[0])?;
                Ok(T::Integer)
            }
            DateAdd(_) => {
                expect(ctx, T::Date, args[0])?;
                all_numeric(ctx, &args[1..])?;
                Ok(T::Date)
            }
            DateDiff(unit) => {
                expect(ctx, T::Date, args[0])?;
                expect(ctx, T::Date, args[1])?;
                Ok(if unit == DateUnit::Second { T::Number } else { T::Integer })
            }
            EndOfMonth | StartOfDay => {
                expect(ctx, T::Date, args[0])?;
                Ok(T::Date)
            }
            DateAddRepeat | DateSubtractRepeat => {
                expect(ctx, T::Date, args[0])?;
                expect(ctx, T::DateRepeat, args[1])?;
                Ok(T::Date)
            }
            RepeatBetween => {
                expect(ctx, T::Date, args[0])?;
                expect(ctx, T::Date, args[1])?;
                Ok(T::DateRepeat)
            }
            RepeatPart(unit) => {
                expect(ctx, T::DateRepeat, args[0])?;
                Ok(if unit == DateUnit::Second { T::Number } else { T::Integer })
            }
            DurationBetween => {
                expect(ctx, T::Date, args[0])?;
                expect(ctx, T::Date, args[1])?;
                Ok(T::Duration)
            }
            DateAddDuration => {
                expect(ctx, T::Date, args[0])?;
                expect(ctx, T::Duration, args[1])?;
                Ok(T::Date)
            }
            DurationSeconds => {
                expect(ctx, T::Duration, args[0])?;
                Ok(T::Number)
            }
            MakePoint => {
                all_numeric(ctx, args)?;
                Ok(T::Point)
            }
            PointX | PointY => {
                expect(ctx, T::Point, args[0])?;
                Ok(T::Number)
            }
            Distance | Bound(_) => {
                all_geometry(ctx, args)?;
                Ok(T::Number)
            }
            GeomEquals | Contains | Intersects => {
                all_geometry(ctx, args)?;
                Ok(T::Boolean)
            }
            AsText => {
                all_geometry(ctx, args)?;
                Ok(T::String)
            }
            Area => {
                expect(ctx, T::Polygon, args[0])?;
                Ok(T::Number)
            }
            LineLength => {
                expect(ctx, T::Line, args[0])?;
                Ok(T::Number)
            }
            RowNumber | Rank | DenseRank => Ok(T::Integer),
            PercentRank | CumeDist => Ok(T::Number),
            Ntile => {
                expect(ctx, T::Integer, args[0])?;
                Ok(T::Integer)
            }
            Lag | Lead => {
                if let Some(offset) = args.get(1) {
                    expect(ctx, T::Integer, *offset)?;
                }
                if let Some(default) = args.get(2) {
                    expect(ctx, args[0], *default)?;
                }
                Ok(args[0])
            }
            FirstValue | LastValue => Ok(args[0]),
            NthValue => {
                expect(ctx, T::Integer, args[1])?;
                Ok(args[0])
            }
        }
    }
}

/// Aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
    StdDevPop,
    StdDevSamp,
    VarPop,
    VarSamp,
}

impl AggregateFunc {
    pub fn name(self) -> &'static str {
        match self {
            AggregateFunc::Count => "COUNT",
            AggregateFunc::Sum => "SUM",
            AggregateFunc::Avg => "AVG",
            AggregateFunc::Min => "MIN",
            AggregateFunc::Max => "MAX",
            AggregateFunc::StdDevPop => "STDDEV_POP",
            AggregateFunc::StdDevSamp => "STDDEV_SAMP",
            AggregateFunc::VarPop => "VAR_POP",
            AggregateFunc::VarSamp => "VAR_SAMP",
        }
    }

    pub fn result_type(self, arg: Option<ValueType>) -> CompileResult<ValueType> {
        let ctx = self.name();
        let arg = match (self, arg) {
            (AggregateFunc::Count, _) => return Ok(ValueType::Integer),
            (_, Some(arg)) => arg,
            (_, None) => return Err(CompileError::arity(ctx, "1", 0)),
        };
        match self {
            AggregateFunc::Sum | AggregateFunc::Avg if arg == ValueType::Duration => {
                Ok(ValueType::Duration)
            }
            AggregateFunc::Sum => {
                all_numeric(ctx, &[arg])?;
                Ok(widen(&[arg]))
            }
            AggregateFunc::Min | AggregateFunc::Max => {
                if arg.is_comparable() {
                    Ok(arg)
                } else {
                    Err(CompileError::type_mismatch(ctx, ValueType::Number, arg))
                }
            }
            _ => {
                all_numeric(ctx, &[arg])?;
                Ok(ValueType::Number)
            }
        }
    }
}

impl std::fmt::Display for AggregateFunc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn expect(ctx: &str, expected: ValueType, got: ValueType) -> CompileResult<()> {
    if expected.accepts(got) {
        Ok(())
    } else {
        Err(CompileError::type_mismatch(ctx, expected, got))
    }
}

fn all_numeric(ctx: &str, args: &[ValueType]) -> CompileResult<()> {
    match args
        .iter()
        .find(|t| !t.is_numeric() && **t != ValueType::Null)
    {
        Some(t) => Err(CompileError::type_mismatch(ctx, ValueType::Number, *t)),
        None => Ok(()),
    }
}

fn all_geometry(ctx: &str, args: &[ValueType]) -> CompileResult<()> {
    match args
        .iter()
        .find(|t| !t.is_geometry() && **t != ValueType::Null)
    {
        Some(t) => Err(CompileError::type_mismatch(ctx, ValueType::Point, *t)),
        None => Ok(()),
    }
}

/// INTEGER when every numeric operand is, NUMBER otherwise.
pub(crate) fn widen(args: &[ValueType]) -> ValueType {
    if args.contains(&ValueType::Number) || !args.contains(&ValueType::Integer) {
        ValueType::Number
    } else {
        ValueType::Integer
    }
}

/// The single type every operand agrees on.
pub(crate) fn unify_all(ctx: &str, args: &[ValueType]) -> CompileResult<ValueType> {
    let mut acc = ValueType::Null;
    for &t in args {
        acc = acc
            .unify(t)
            .ok_or_else(|| CompileError::type_mismatch(ctx, acc, t))?;
    }
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_errors() {
        let err = Func::Replace
            .result_type(&[ValueType::String])
            .unwrap_err();
        assert_eq!(err.to_string(), "REPLACE expects 3 operand(s), got 1");

        let err = Func::Substring.result_type(&[ValueType::String]).unwrap_err();
        assert_eq!(err.to_string(), "SUBSTRING expects 2 to 3 operand(s), got 1");

        let err = Func::Coalesce.result_type(&[]).unwrap_err();
        assert_eq!(err.to_string(), "COALESCE expects at least 1 operand(s), got 0");
    }

    #[test]
    fn test_numeric_widening() {
        assert_eq!(
            Func::Add
                .result_type(&[ValueType::Integer, ValueType::Integer])
                .unwrap(),
            ValueType::Integer
        );
        assert_eq!(
            Func::Add
                .result_type(&[ValueType::Integer, ValueType::Number])
                .unwrap(),
            ValueType::Number
        );
        assert_eq!(
            Func::Divide
                .result_type(&[ValueType::Integer, ValueType::Integer])
                .unwrap(),
            ValueType::Number
        );
    }

    #[test]
    fn test_coalesce_mismatch() {
        let err = Func::Coalesce
            .result_type(&[ValueType::String, ValueType::Integer])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type mismatch in COALESCE: expected string, got integer"
        );
    }

    #[test]
    fn test_lag_default_must_match() {
        assert!(
            Func::Lag
                .result_type(&[ValueType::Date, ValueType::Integer, ValueType::Date])
                .is_ok()
        );
        assert!(
            Func::Lag
                .result_type(&[ValueType::Date, ValueType::Integer, ValueType::String])
                .is_err()
        );
    }

    #[test]
    fn test_aggregate_types() {
        assert_eq!(
            AggregateFunc::Count.result_type(None).unwrap(),
            ValueType::Integer
        );
        assert_eq!(
            AggregateFunc::Sum.result_type(Some(ValueType::Integer)).unwrap(),
            ValueType::Integer
        );
        assert_eq!(
            AggregateFunc::Avg.result_type(Some(ValueType::Integer)).unwrap(),
            ValueType::Number
        );
        assert!(AggregateFunc::Sum.result_type(Some(ValueType::String)).is_err());
        assert!(AggregateFunc::Max.result_type(None).is_err());
    }
}

use rust_decimal::Decimal;

use crate::ast::builders::{aggregate, call, IntegerExpr, StringExpr};
use crate::ast::{AggregateFunc, Expr, Func, ValueType};

typed_expr!(
    /// A floating or exact numeric value.
    NumberExpr,
    ValueType::Number
);
equality_ops!(NumberExpr);
comparable_ops!(NumberExpr);
literal_from!(NumberExpr, ValueType::Number, f64, Decimal, i32, i64);

impl From<IntegerExpr> for NumberExpr {
    fn from(e: IntegerExpr) -> Self {
        Self(e.into())
    }
}

impl NumberExpr {
    fn unary(&self, func: Func) -> Self {
        call(func, vec![self.0.clone()])
    }

    fn binary(&self, func: Func, other: impl Into<Self>) -> Self {
        call(func, vec![self.0.clone(), other.into().0])
    }

    pub fn plus(&self, other: impl Into<Self>) -> Self {
        self.binary(Func::Add, other)
    }

    pub fn minus(&self, other: impl Into<Self>) -> Self {
        self.binary(Func::Subtract, other)
    }

    pub fn times(&self, other: impl Into<Self>) -> Self {
        self.binary(Func::Multiply, other)
    }

    pub fn divided_by(&self, other: impl Into<Self>) -> Self {
        self.binary(Func::Divide, other)
    }

    pub fn modulus(&self, other: impl Into<Self>) -> Self {
        self.binary(Func::Modulus, other)
    }

    pub fn negate(&self) -> Self {
        self.unary(Func::Negate)
    }

    pub fn abs(&self) -> Self {
        self.unary(Func::Abs)
    }

    pub fn sign(&self) -> IntegerExpr {
        call(Func::Sign, vec![self.0.clone()])
    }

    pub fn ceil(&self) -> IntegerExpr {
        call(Func::Ceil, vec![self.0.clone()])
    }

    pub fn floor(&self) -> IntegerExpr {
        call(Func::Floor, vec![self.0.clone()])
    }

    /// Nearest integer, halves away from zero.
    pub fn round(&self) -> IntegerExpr {
        call(Func::Round, vec![self.0.clone()])
    }

    pub fn round_to(&self, places: impl Into<IntegerExpr>) -> Self {
        call(Func::RoundTo, vec![self.0.clone(), places.into().into()])
    }

    pub fn truncate(&self) -> IntegerExpr {
        call(Func::Truncate, vec![self.0.clone()])
    }

    pub fn sqrt(&self) -> Self {
        self.unary(Func::Sqrt)
    }

    pub fn power(&self, exponent: impl Into<Self>) -> Self {
        self.binary(Func::Power, exponent)
    }

    pub fn exp(&self) -> Self {
        self.unary(Func::Exp)
    }

    pub fn ln(&self) -> Self {
        self.unary(Func::Ln)
    }

    pub fn log10(&self) -> Self {
        self.unary(Func::Log10)
    }

    pub fn sin(&self) -> Self {
        self.unary(Func::Sin)
    }

    pub fn cos(&self) -> Self {
        self.unary(Func::Cos)
    }

    pub fn tan(&self) -> Self {
        self.unary(Func::Tan)
    }

    pub fn asin(&self) -> Self {
        self.unary(Func::Asin)
    }

    pub fn acos(&self) -> Self {
        self.unary(Func::Acos)
    }

    pub fn atan(&self) -> Self {
        self.unary(Func::Atan)
    }

    /// ATAN2(self, x)
    pub fn atan2(&self, x: impl Into<Self>) -> Self {
        self.binary(Func::Atan2, x)
    }

    pub fn cot(&self) -> Self {
        self.unary(Func::Cot)
    }

    pub fn sinh(&self) -> Self {
        self.unary(Func::Sinh)
    }

    pub fn cosh(&self) -> Self {
        self.unary(Func::Cosh)
    }

    pub fn tanh(&self) -> Self {
        self.unary(Func::Tanh)
    }

    /// Radians to degrees.
    pub fn degrees(&self) -> Self {
        self.unary(Func::Degrees)
    }

    /// Degrees to radians.
    pub fn radians(&self) -> Self {
        self.unary(Func::Radians)
    }

    pub fn pi() -> Self {
        call(Func::Pi, Vec::new())
    }

    /// Uniform in `[0, 1)`.
    pub fn random() -> Self {
        call(Func::Random, Vec::new())
    }

    pub fn to_string_value(&self) -> StringExpr {
        call(Func::ToStringValue, vec![self.0.clone()])
    }

    pub fn to_integer(&self) -> IntegerExpr {
        call(Func::ToInteger, vec![self.0.clone()])
    }

    pub fn sum(&self) -> Self {
        aggregate(AggregateFunc::Sum, Some(self.0.clone()), false)
    }

    pub fn sum_distinct(&self) -> Self {
        aggregate(AggregateFunc::Sum, Some(self.0.clone()), true)
    }

    pub fn average(&self) -> Self {
        aggregate(AggregateFunc::Avg, Some(self.0.clone()), false)
    }

    pub fn std_dev_pop(&self) -> Self {
        aggregate(AggregateFunc::StdDevPop, Some(self.0.clone()), false)
    }

    pub fn std_dev_samp(&self) -> Self {
        aggregate(AggregateFunc::StdDevSamp, Some(self.0.clone()), false)
    }

    pub fn var_pop(&self) -> Self {
        aggregate(AggregateFunc::VarPop, Some(self.0.clone()), false)
    }

    pub fn var_samp(&self) -> Self {
        aggregate(AggregateFunc::VarSamp, Some(self.0.clone()), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::TypedExpr;
    use crate::ast::Node;

    #[test]
    fn test_rounding_yields_integer() {
        let n = NumberExpr::from(2.5);
        assert_eq!(n.round().expr().value_type(), ValueType::Integer);
        assert_eq!(n.round_to(2).expr().value_type(), ValueType::Number);
    }

    #[test]
    fn test_integer_widens() {
        let n = NumberExpr::from(IntegerExpr::from(3));
        assert_eq!(n.expr().value_type(), ValueType::Integer);
        assert_eq!(n.plus(1.5).expr().value_type(), ValueType::Number);
    }

    #[test]
    fn test_sum_is_aggregator() {
        let s = NumberExpr::from(1.0).sum();
        assert!(s.is_aggregator());
        assert!(matches!(
            s.expr().node(),
            Node::Aggregate {
                func: AggregateFunc::Sum,
                ..
            }
        ));
    }
}

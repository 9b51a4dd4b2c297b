use crate::ast::builders::{aggregate, call, NumberExpr, StringExpr};
use crate::ast::{AggregateFunc, Condition, Expr, Func, Operator, ValueType};

typed_expr!(
    /// A whole number.
    IntegerExpr,
    ValueType::Integer
);
equality_ops!(IntegerExpr);
comparable_ops!(IntegerExpr);
literal_from!(IntegerExpr, ValueType::Integer, i32, i64, u32);

impl IntegerExpr {
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

    /// Exact division; both sides are widened so `7 / 2` is `3.5`.
    pub fn divided_by(&self, other: impl Into<Self>) -> NumberExpr {
        call(Func::Divide, vec![self.0.clone(), other.into().0])
    }

    pub fn modulus(&self, other: impl Into<Self>) -> Self {
        self.binary(Func::Modulus, other)
    }

    pub fn negate(&self) -> Self {
        call(Func::Negate, vec![self.0.clone()])
    }

    pub fn abs(&self) -> Self {
        call(Func::Abs, vec![self.0.clone()])
    }

    pub fn bitwise_and(&self, mask: impl Into<Self>) -> Self {
        self.binary(Func::BitAnd, mask)
    }

    /// Rows where every bit of `mask` is set.
    pub fn permitted_bits(&self, mask: impl Into<Self>) -> Condition {
        self.matches(Operator::bitwise_equals(mask.into()))
    }

    pub fn to_number(&self) -> NumberExpr {
        NumberExpr::from(self.clone())
    }

    pub fn to_string_value(&self) -> StringExpr {
        call(Func::ToStringValue, vec![self.0.clone()])
    }

    pub fn sum(&self) -> Self {
        aggregate(AggregateFunc::Sum, Some(self.0.clone()), false)
    }

    pub fn sum_distinct(&self) -> Self {
        aggregate(AggregateFunc::Sum, Some(self.0.clone()), true)
    }

    pub fn average(&self) -> NumberExpr {
        aggregate(AggregateFunc::Avg, Some(self.0.clone()), false)
    }

    /// COUNT(*)
    pub fn count_rows() -> Self {
        aggregate(AggregateFunc::Count, None, false)
    }
}

//! Typed expression wrappers.
//!
//! One wrapper per value type. Arguments are typed, so a string cannot be
//! added to a date; only column binding and the untyped `Expr` constructors
//! can fail at run time.
//!
//! # Example
//! ```ignore
//! let name = StringExpr::column(&people, "NAME")?;
//! let adults = IntegerExpr::column(&people, "AGE")?.permitted_range(18..);
//! name.lower().is("alice").to_sql_with_dialect(Dialect::Postgres)?;
//! ```

use std::collections::BTreeSet;
use std::ops::Bound;

use crate::ast::{ColumnRef, CompareOp, Expr, Func, Node, ValueType};
use crate::error::{CompileError, CompileResult};
use crate::typed::{IntoField, RowDef, TableRef};

/// Shared surface of every typed wrapper.
pub trait TypedExpr: Clone + AsRef<Expr> + Into<Expr> {
    const VALUE_TYPE: ValueType;

    #[doc(hidden)]
    fn from_expr_unchecked(expr: Expr) -> Self;

    fn expr(&self) -> &Expr {
        self.as_ref()
    }

    fn is_aggregator(&self) -> bool {
        self.as_ref().is_aggregator()
    }

    fn tables_involved(&self) -> BTreeSet<TableRef> {
        self.as_ref().tables_involved()
    }

    fn includes_null(&self) -> bool {
        self.as_ref().includes_null()
    }

    fn is_purely_functional(&self) -> bool {
        self.as_ref().is_purely_functional()
    }
}

pub(crate) fn typed_column(
    row: &RowDef,
    field: impl IntoField,
    expected: ValueType,
) -> CompileResult<Expr> {
    let col = ColumnRef::new(row, field)?;
    if !expected.accepts(col.value_type()) {
        return Err(CompileError::type_mismatch(
            format!("column {}.{}", row.table_name(), col.name()),
            expected,
            col.value_type(),
        ));
    }
    Ok(Expr::column(col))
}

/// Apply a function whose signature the typed API already guarantees.
pub(crate) fn call<T: TypedExpr>(func: Func, args: Vec<Expr>) -> T {
    T::from_expr_unchecked(Expr::from_parts(T::VALUE_TYPE, Node::Func { func, args }))
}

pub(crate) fn compare(left: &Expr, op: CompareOp, right: Expr) -> BooleanExpr {
    BooleanExpr::from_predicate(Expr::from_parts(
        ValueType::Boolean,
        Node::Compare {
            op,
            left: Box::new(left.clone()),
            right: Box::new(right),
        },
    ))
}

pub(crate) fn to_bound<V, T>(bound: Bound<&V>) -> Bound<Expr>
where
    V: Clone + Into<T>,
    T: TypedExpr,
{
    let lift = |v: &V| -> Expr {
        let typed: T = v.clone().into();
        typed.into()
    };
    match bound {
        Bound::Included(v) => Bound::Included(lift(v)),
        Bound::Excluded(v) => Bound::Excluded(lift(v)),
        Bound::Unbounded => Bound::Unbounded,
    }
}

/// Struct, conversions, column binding and NULL handling for a wrapper.
macro_rules! typed_expr {
    ($(#[$meta:meta])* $name:ident, $vt:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(Expr);

        impl $crate::ast::builders::TypedExpr for $name {
            const VALUE_TYPE: $crate::ast::ValueType = $vt;

            fn from_expr_unchecked(expr: Expr) -> Self {
                Self(expr)
            }
        }

        impl AsRef<Expr> for $name {
            fn as_ref(&self) -> &Expr {
                &self.0
            }
        }

        impl From<$name> for Expr {
            fn from(e: $name) -> Expr {
                e.0
            }
        }

        impl TryFrom<Expr> for $name {
            type Error = $crate::error::CompileError;

            fn try_from(expr: Expr) -> Result<Self, Self::Error> {
                if $vt.accepts(expr.value_type()) {
                    Ok(Self(expr))
                } else {
                    Err($crate::error::CompileError::type_mismatch(
                        stringify!($name),
                        $vt,
                        expr.value_type(),
                    ))
                }
            }
        }

        impl $crate::transpiler::ToSql for $name {
            fn to_sql_with(
                &self,
                generator: &dyn $crate::transpiler::SqlGenerator,
            ) -> $crate::error::CompileResult<String> {
                $crate::transpiler::ToSql::to_sql_with(&self.0, generator)
            }
        }

        impl $name {
            /// Bind to a column of `row` declared with this type.
            pub fn column(
                row: &$crate::typed::RowDef,
                field: impl $crate::typed::IntoField,
            ) -> $crate::error::CompileResult<Self> {
                $crate::ast::builders::typed_column(row, field, $vt).map(Self)
            }

            pub fn null() -> Self {
                Self(Expr::null($vt))
            }

            pub fn is_null(&self) -> $crate::ast::builders::BooleanExpr {
                $crate::ast::builders::BooleanExpr::from_predicate(Expr::is_null(self.0.clone()))
            }

            pub fn is_not_null(&self) -> $crate::ast::builders::BooleanExpr {
                $crate::ast::builders::BooleanExpr::from_predicate(Expr::is_not_null(
                    self.0.clone(),
                ))
            }

            /// COALESCE(self, fallback)
            pub fn if_null_then(&self, fallback: impl Into<Self>) -> Self {
                $crate::ast::builders::call(
                    $crate::ast::Func::Coalesce,
                    vec![self.0.clone(), fallback.into().0],
                )
            }

            pub fn count(&self) -> $crate::ast::builders::IntegerExpr {
                $crate::ast::builders::aggregate(
                    $crate::ast::AggregateFunc::Count,
                    Some(self.0.clone()),
                    false,
                )
            }

            pub fn count_distinct(&self) -> $crate::ast::builders::IntegerExpr {
                $crate::ast::builders::aggregate(
                    $crate::ast::AggregateFunc::Count,
                    Some(self.0.clone()),
                    true,
                )
            }

            /// Apply an operator with this expression as subject.
            pub fn matches(&self, operator: $crate::ast::Operator) -> $crate::ast::Condition {
                $crate::ast::Condition::new(self.0.clone(), operator)
            }
        }
    };
}

/// `=`, `<>`, IN, permitted values and sort keys.
macro_rules! equality_ops {
    ($name:ident) => {
        impl $name {
            /// `self = other`; a NULL operand compiles to `IS NULL`.
            pub fn is(&self, other: impl Into<Self>) -> $crate::ast::builders::BooleanExpr {
                $crate::ast::builders::compare(&self.0, $crate::ast::CompareOp::Eq, other.into().0)
            }

            pub fn is_not(&self, other: impl Into<Self>) -> $crate::ast::builders::BooleanExpr {
                $crate::ast::builders::compare(&self.0, $crate::ast::CompareOp::Ne, other.into().0)
            }

            pub fn is_in<I, V>(&self, values: I) -> $crate::ast::builders::BooleanExpr
            where
                I: IntoIterator<Item = V>,
                V: Into<Self>,
            {
                $crate::ast::builders::BooleanExpr::from_predicate(Expr::in_list(
                    self.0.clone(),
                    values.into_iter().map(|v| v.into().0).collect(),
                ))
            }

            /// Match any of `values`. A single value compiles as equality.
            pub fn permitted_values<I, V>(&self, values: I) -> $crate::ast::Condition
            where
                I: IntoIterator<Item = V>,
                V: Into<Self>,
            {
                let mut values: Vec<Expr> = values.into_iter().map(|v| v.into().0).collect();
                let operator = if values.len() == 1 {
                    $crate::ast::Operator::equals(values.remove(0))
                } else {
                    $crate::ast::Operator::is_in(values)
                };
                self.matches(operator)
            }

            pub fn excluded_values<I, V>(&self, values: I) -> $crate::ast::Condition
            where
                I: IntoIterator<Item = V>,
                V: Into<Self>,
            {
                self.permitted_values(values).not()
            }

            pub fn ascending(&self) -> $crate::ast::window::SortKey {
                $crate::ast::window::SortKey::ascending(self.0.clone())
            }

            pub fn descending(&self) -> $crate::ast::window::SortKey {
                $crate::ast::window::SortKey::descending(self.0.clone())
            }
        }
    };
}

/// Ordering comparisons, ranges, MIN/MAX and GREATEST/LEAST.
macro_rules! comparable_ops {
    ($name:ident) => {
        impl $name {
            pub fn is_less_than(&self, other: impl Into<Self>) -> $crate::ast::builders::BooleanExpr {
                $crate::ast::builders::compare(&self.0, $crate::ast::CompareOp::Lt, other.into().0)
            }

            pub fn is_less_than_or_equal(
                &self,
                other: impl Into<Self>,
            ) -> $crate::ast::builders::BooleanExpr {
                $crate::ast::builders::compare(&self.0, $crate::ast::CompareOp::Le, other.into().0)
            }

            pub fn is_greater_than(
                &self,
                other: impl Into<Self>,
            ) -> $crate::ast::builders::BooleanExpr {
                $crate::ast::builders::compare(&self.0, $crate::ast::CompareOp::Gt, other.into().0)
            }

            pub fn is_greater_than_or_equal(
                &self,
                other: impl Into<Self>,
            ) -> $crate::ast::builders::BooleanExpr {
                $crate::ast::builders::compare(&self.0, $crate::ast::CompareOp::Ge, other.into().0)
            }

            /// Inclusive on both ends.
            pub fn is_between(
                &self,
                low: impl Into<Self>,
                high: impl Into<Self>,
            ) -> $crate::ast::builders::BooleanExpr {
                $crate::ast::builders::BooleanExpr::from_predicate(Expr::from_parts(
                    $crate::ast::ValueType::Boolean,
                    $crate::ast::Node::Between {
                        arg: Box::new(self.0.clone()),
                        low: Box::new(low.into().0),
                        high: Box::new(high.into().0),
                    },
                ))
            }

            /// Match a Rust range: `18..` is `>= 18`, `1..=5` is BETWEEN,
            /// `1..5` excludes the upper end.
            pub fn permitted_range<R, V>(&self, range: R) -> $crate::ast::Condition
            where
                R: std::ops::RangeBounds<V>,
                V: Clone + Into<Self>,
            {
                self.matches($crate::ast::Operator::range_bounds(
                    $crate::ast::builders::to_bound::<V, Self>(range.start_bound()),
                    $crate::ast::builders::to_bound::<V, Self>(range.end_bound()),
                ))
            }

            /// Both ends excluded.
            pub fn permitted_range_exclusive(
                &self,
                low: impl Into<Self>,
                high: impl Into<Self>,
            ) -> $crate::ast::Condition {
                self.matches($crate::ast::Operator::range_exclusive(
                    Some(low.into().0),
                    Some(high.into().0),
                ))
            }

            pub fn min(&self) -> Self {
                $crate::ast::builders::aggregate($crate::ast::AggregateFunc::Min, Some(self.0.clone()), false)
            }

            pub fn max(&self) -> Self {
                $crate::ast::builders::aggregate($crate::ast::AggregateFunc::Max, Some(self.0.clone()), false)
            }

            /// GREATEST(self, others..)
            pub fn greatest_of<I, V>(&self, others: I) -> Self
            where
                I: IntoIterator<Item = V>,
                V: Into<Self>,
            {
                let mut args = vec![self.0.clone()];
                args.extend(others.into_iter().map(|v| v.into().0));
                $crate::ast::builders::call($crate::ast::Func::Greatest, args)
            }

            /// LEAST(self, others..)
            pub fn least_of<I, V>(&self, others: I) -> Self
            where
                I: IntoIterator<Item = V>,
                V: Into<Self>,
            {
                let mut args = vec![self.0.clone()];
                args.extend(others.into_iter().map(|v| v.into().0));
                $crate::ast::builders::call($crate::ast::Func::Least, args)
            }
        }
    };
}

/// `From` impls turning Rust values (and `None`) into typed literals.
macro_rules! literal_from {
    ($name:ident, $vt:expr, $($t:ty),+) => {
        $(
            impl From<$t> for $name {
                fn from(v: $t) -> Self {
                    Self(Expr::literal(v))
                }
            }

            impl From<Option<$t>> for $name {
                fn from(v: Option<$t>) -> Self {
                    match v {
                        Some(v) => Self(Expr::literal(v)),
                        None => Self(Expr::null($vt)),
                    }
                }
            }
        )+
    };
}

pub(crate) fn aggregate<T: TypedExpr>(
    func: crate::ast::AggregateFunc,
    arg: Option<Expr>,
    distinct: bool,
) -> T {
    let value_type = match (func, &arg) {
        (crate::ast::AggregateFunc::Min | crate::ast::AggregateFunc::Max, Some(a)) => {
            a.value_type()
        }
        _ => T::VALUE_TYPE,
    };
    T::from_expr_unchecked(Expr::from_parts(
        value_type,
        Node::Aggregate {
            func,
            distinct,
            arg: arg.map(Box::new),
        },
    ))
}

mod boolean;
mod bytes;
mod date;
mod duration;
mod geometry;
mod integer;
mod number;
mod repeat;
mod string;

pub use boolean::BooleanExpr;
pub use bytes::BytesExpr;
pub use date::DateExpr;
pub use duration::DurationExpr;
pub use geometry::{GeometryExpr, LineExpr, PointExpr, PolygonExpr};
pub use integer::IntegerExpr;
pub use number::NumberExpr;
pub use repeat::DateRepeatExpr;
pub use string::StringExpr;

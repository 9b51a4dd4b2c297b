//! Staged builder for window functions.
//!
//! Each stage is its own type, so a frame that ends before it starts, or a
//! frame without ORDER BY, cannot be written:
//!
//! ```ignore
//! let running = Window::new(amount.sum())
//!     .partition([customer_id])
//!     .order_by([date.ascending()])
//!     .rows()
//!     .unbounded_preceding()
//!     .current_row()
//!     .build();
//! ```

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::ast::builders::{IntegerExpr, NumberExpr, TypedExpr};
use crate::ast::{Expr, Func, Node, ValueType};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Placement of NULLs in a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NullsOrder {
    First,
    Last,
}

/// One ORDER BY term.
#[derive(Debug, Clone)]
pub struct SortKey {
    pub expr: Expr,
    pub direction: SortDirection,
    pub nulls: Option<NullsOrder>,
}

impl SortKey {
    pub fn new(expr: impl Into<Expr>, direction: SortDirection) -> Self {
        Self {
            expr: expr.into(),
            direction,
            nulls: None,
        }
    }

    pub fn ascending(expr: impl Into<Expr>) -> Self {
        Self::new(expr, SortDirection::Asc)
    }

    pub fn descending(expr: impl Into<Expr>) -> Self {
        Self::new(expr, SortDirection::Desc)
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = Some(NullsOrder::First);
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = Some(NullsOrder::Last);
        self
    }
}

/// Frame unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameKind {
    Rows,
    Range,
    Groups,
}

impl FrameKind {
    pub fn keyword(self) -> &'static str {
        match self {
            FrameKind::Rows => "ROWS",
            FrameKind::Range => "RANGE",
            FrameKind::Groups => "GROUPS",
        }
    }
}

/// Window frame boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameBound {
    UnboundedPreceding,
    Preceding(u64),
    CurrentRow,
    Following(u64),
    UnboundedFollowing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub kind: FrameKind,
    pub start: FrameBound,
    pub end: FrameBound,
}

/// How the rows of a window are ordered.
#[derive(Debug, Clone, Default)]
pub enum WindowOrder {
    #[default]
    Unordered,
    /// ORDER BY a constant, for dialects that insist on an ORDER BY before a frame.
    Constant,
    Keys(Vec<SortKey>),
}

/// A finished OVER clause.
#[derive(Debug, Clone, Default)]
pub struct WindowSpec {
    pub partition: Vec<Expr>,
    pub order: WindowOrder,
    pub frame: Option<Frame>,
}

impl WindowSpec {
    /// Expressions referenced by PARTITION BY and ORDER BY.
    pub fn exprs(&self) -> Vec<&Expr> {
        let mut out: Vec<&Expr> = self.partition.iter().collect();
        if let WindowOrder::Keys(keys) = &self.order {
            out.extend(keys.iter().map(|k| &k.expr));
        }
        out
    }
}

// Stages.
pub struct Unpartitioned;
pub struct Partitioned;
pub struct Sorted;
pub struct FrameType;
pub struct FrameStart<P>(PhantomData<P>);
pub struct FrameEnd;

// Frame start kinds. They restrict which ends are legal.
pub struct FromPreceding;
pub struct FromCurrentRow;
pub struct FromFollowing;

/// Starts that admit CURRENT ROW as the end.
pub trait EndsAtCurrentRow {}
impl EndsAtCurrentRow for FromPreceding {}
impl EndsAtCurrentRow for FromCurrentRow {}

/// A window function under construction, in stage `S`.
pub struct Window<E, S> {
    func: Expr,
    spec: WindowSpec,
    kind: FrameKind,
    start: FrameBound,
    _marker: PhantomData<fn() -> (E, S)>,
}

impl<E, S> Clone for Window<E, S> {
    fn clone(&self) -> Self {
        Window {
            func: self.func.clone(),
            spec: self.spec.clone(),
            kind: self.kind,
            start: self.start,
            _marker: PhantomData,
        }
    }
}

impl<E, S> Window<E, S> {
    fn advance<T>(self) -> Window<E, T> {
        Window {
            func: self.func,
            spec: self.spec,
            kind: self.kind,
            start: self.start,
            _marker: PhantomData,
        }
    }

    fn end_frame(mut self, end: FrameBound) -> Window<E, FrameEnd> {
        self.spec.frame = Some(Frame {
            kind: self.kind,
            start: self.start,
            end,
        });
        self.advance()
    }

    /// The clause as built so far.
    pub fn spec(&self) -> &WindowSpec {
        &self.spec
    }
}

impl<E: TypedExpr> Window<E, Unpartitioned> {
    /// Window an aggregate or window-only function.
    pub fn new(func: E) -> Self {
        Self::from_expr(func.into())
    }

    fn from_expr(func: Expr) -> Self {
        Window {
            func,
            spec: WindowSpec::default(),
            kind: FrameKind::Rows,
            start: FrameBound::UnboundedPreceding,
            _marker: PhantomData,
        }
    }

    pub fn partition<I, P>(mut self, columns: I) -> Window<E, Partitioned>
    where
        I: IntoIterator<Item = P>,
        P: Into<Expr>,
    {
        self.spec.partition = columns.into_iter().map(Into::into).collect();
        self.advance()
    }

    /// One partition over every row.
    pub fn all_rows(self) -> Window<E, Partitioned> {
        self.advance()
    }

    fn typed_call(func: Func, args: Vec<Expr>, value_type: ValueType) -> Self {
        Self::from_expr(Expr::from_parts(
            value_type,
            Node::Func { func, args },
        ))
    }

    pub fn lag(expr: E, offset: i64, default: Option<E>) -> Self {
        Self::shift(Func::Lag, expr, offset, default)
    }

    pub fn lead(expr: E, offset: i64, default: Option<E>) -> Self {
        Self::shift(Func::Lead, expr, offset, default)
    }

    fn shift(func: Func, expr: E, offset: i64, default: Option<E>) -> Self {
        let mut args = vec![expr.into(), Expr::literal(offset)];
        if let Some(d) = default {
            args.push(d.into());
        }
        Self::typed_call(func, args, E::VALUE_TYPE)
    }

    pub fn first_value(expr: E) -> Self {
        Self::typed_call(Func::FirstValue, vec![expr.into()], E::VALUE_TYPE)
    }

    pub fn last_value(expr: E) -> Self {
        Self::typed_call(Func::LastValue, vec![expr.into()], E::VALUE_TYPE)
    }

    /// Value of `expr` on the `n`th row of the frame, 1-based.
    pub fn nth_value(expr: E, n: i64) -> Self {
        Self::typed_call(
            Func::NthValue,
            vec![expr.into(), Expr::literal(n)],
            E::VALUE_TYPE,
        )
    }
}

impl Window<IntegerExpr, Unpartitioned> {
    pub fn row_number() -> Self {
        Self::typed_call(Func::RowNumber, Vec::new(), ValueType::Integer)
    }

    pub fn rank() -> Self {
        Self::typed_call(Func::Rank, Vec::new(), ValueType::Integer)
    }

    pub fn dense_rank() -> Self {
        Self::typed_call(Func::DenseRank, Vec::new(), ValueType::Integer)
    }

    pub fn ntile(buckets: i64) -> Self {
        Self::typed_call(
            Func::Ntile,
            vec![Expr::literal(buckets)],
            ValueType::Integer,
        )
    }
}

impl Window<NumberExpr, Unpartitioned> {
    pub fn percent_rank() -> Self {
        Self::typed_call(Func::PercentRank, Vec::new(), ValueType::Number)
    }

    pub fn cume_dist() -> Self {
        Self::typed_call(Func::CumeDist, Vec::new(), ValueType::Number)
    }
}

impl<E> Window<E, Partitioned> {
    pub fn order_by<I>(mut self, keys: I) -> Window<E, Sorted>
    where
        I: IntoIterator<Item = SortKey>,
    {
        self.spec.order = WindowOrder::Keys(keys.into_iter().collect());
        self.advance()
    }

    /// No ORDER BY and no frame.
    pub fn unsorted(self) -> Window<E, FrameEnd> {
        self.advance()
    }

    /// Order by a constant so a frame can still be given.
    pub fn unsorted_with_frame(mut self) -> Window<E, Sorted> {
        self.spec.order = WindowOrder::Constant;
        self.advance()
    }
}

impl<E> Window<E, Sorted> {
    pub fn rows(mut self) -> Window<E, FrameType> {
        self.kind = FrameKind::Rows;
        self.advance()
    }

    pub fn range(mut self) -> Window<E, FrameType> {
        self.kind = FrameKind::Range;
        self.advance()
    }

    pub fn groups(mut self) -> Window<E, FrameType> {
        self.kind = FrameKind::Groups;
        self.advance()
    }

    /// Keep the database's default frame.
    pub fn default_frame(self) -> Window<E, FrameEnd> {
        self.advance()
    }
}

impl<E> Window<E, FrameType> {
    pub fn unbounded_preceding(mut self) -> Window<E, FrameStart<FromPreceding>> {
        self.start = FrameBound::UnboundedPreceding;
        self.advance()
    }

    pub fn preceding(mut self, offset: u64) -> Window<E, FrameStart<FromPreceding>> {
        self.start = FrameBound::Preceding(offset);
        self.advance()
    }

    pub fn current_row(mut self) -> Window<E, FrameStart<FromCurrentRow>> {
        self.start = FrameBound::CurrentRow;
        self.advance()
    }

    pub fn following(mut self, offset: u64) -> Window<E, FrameStart<FromFollowing>> {
        self.start = FrameBound::Following(offset);
        self.advance()
    }
}

impl<E> Window<E, FrameStart<FromPreceding>> {
    pub fn preceding(self, offset: u64) -> Window<E, FrameEnd> {
        self.end_frame(FrameBound::Preceding(offset))
    }
}

impl<E, P: EndsAtCurrentRow> Window<E, FrameStart<P>> {
    pub fn current_row(self) -> Window<E, FrameEnd> {
        self.end_frame(FrameBound::CurrentRow)
    }
}

impl<E, P> Window<E, FrameStart<P>> {
    pub fn following(self, offset: u64) -> Window<E, FrameEnd> {
        self.end_frame(FrameBound::Following(offset))
    }

    pub fn unbounded_following(self) -> Window<E, FrameEnd> {
        self.end_frame(FrameBound::UnboundedFollowing)
    }
}

impl<E: TypedExpr> Window<E, FrameEnd> {
    pub fn build(self) -> E {
        let value_type = self.func.value_type();
        E::from_expr_unchecked(Expr::from_parts(
            value_type,
            Node::Window {
                func: Box::new(self.func),
                spec: self.spec,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_of(e: &IntegerExpr) -> &WindowSpec {
        match e.as_ref().node() {
            Node::Window { spec, .. } => spec,
            other => panic!("expected window, got {:?}", other),
        }
    }

    #[test]
    fn test_stages_record_frame() {
        let w = Window::row_number()
            .all_rows()
            .unsorted_with_frame()
            .rows()
            .preceding(2)
            .following(1)
            .build();
        let spec = spec_of(&w);
        assert!(spec.partition.is_empty());
        assert!(matches!(spec.order, WindowOrder::Constant));
        assert_eq!(
            spec.frame,
            Some(Frame {
                kind: FrameKind::Rows,
                start: FrameBound::Preceding(2),
                end: FrameBound::Following(1),
            })
        );
    }

    #[test]
    fn test_unsorted_has_no_frame() {
        let w = Window::rank().all_rows().unsorted().build();
        let spec = spec_of(&w);
        assert!(matches!(spec.order, WindowOrder::Unordered));
        assert!(spec.frame.is_none());
    }

    #[test]
    fn test_window_is_not_aggregator() {
        let w = Window::ntile(4).all_rows().unsorted().build();
        assert!(!w.as_ref().is_aggregator());
        assert_eq!(w.as_ref().value_type(), ValueType::Integer);
    }
}

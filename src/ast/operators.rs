//! Declarative match operators.
//!
//! An operator says *what* a subject should match ("one of these values",
//! "inside this range", "like this pattern"). It is turned into a boolean
//! expression against a subject by `Operator::generate_where_expression`.

use std::ops::Bound;
use std::sync::Arc;

use crate::ast::{ColumnRef, Expr};
use crate::error::{CompileError, CompileResult};
use crate::transpiler::query::{CorrelatedQueryLayer, QueryLayer};
use crate::typed::RowDef;

/// The comparison an operator performs.
#[derive(Debug, Clone)]
pub enum OperatorKind {
    Equals(Expr),
    EqualsIgnoreCase(Expr),
    LessThan(Expr),
    LessThanOrEqual(Expr),
    GreaterThan(Expr),
    GreaterThanOrEqual(Expr),
    In(Vec<Expr>),
    InIgnoreCase(Vec<Expr>),
    Like(Expr),
    LikeIgnoreCase(Expr),
    Range { low: Bound<Expr>, high: Bound<Expr> },
    /// `(x & mask) = mask`
    BitwiseEquals(Expr),
    IsNull,
    Exists(ExistsQuery),
}

/// A match specification with inversion and NULL inclusion.
#[derive(Debug, Clone)]
pub struct Operator {
    kind: OperatorKind,
    inverted: bool,
    include_nulls: bool,
}

impl Operator {
    pub fn new(kind: OperatorKind) -> Self {
        Self {
            kind,
            inverted: false,
            include_nulls: false,
        }
    }

    pub fn equals(value: impl Into<Expr>) -> Self {
        Self::new(OperatorKind::Equals(value.into()))
    }

    pub fn equals_ignore_case(value: impl Into<Expr>) -> Self {
        Self::new(OperatorKind::EqualsIgnoreCase(value.into()))
    }

    pub fn less_than(value: impl Into<Expr>) -> Self {
        Self::new(OperatorKind::LessThan(value.into()))
    }

    pub fn less_than_or_equal(value: impl Into<Expr>) -> Self {
        Self::new(OperatorKind::LessThanOrEqual(value.into()))
    }

    pub fn greater_than(value: impl Into<Expr>) -> Self {
        Self::new(OperatorKind::GreaterThan(value.into()))
    }

    pub fn greater_than_or_equal(value: impl Into<Expr>) -> Self {
        Self::new(OperatorKind::GreaterThanOrEqual(value.into()))
    }

    pub fn is_in<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Expr>,
    {
        Self::new(OperatorKind::In(values.into_iter().map(Into::into).collect()))
    }

    pub fn is_in_ignore_case<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Expr>,
    {
        Self::new(OperatorKind::InIgnoreCase(
            values.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn like(pattern: impl Into<Expr>) -> Self {
        Self::new(OperatorKind::Like(pattern.into()))
    }

    pub fn like_ignore_case(pattern: impl Into<Expr>) -> Self {
        Self::new(OperatorKind::LikeIgnoreCase(pattern.into()))
    }

    /// Lower bound inclusive, upper bound exclusive. `None` leaves a side open.
    pub fn range(low: Option<Expr>, high: Option<Expr>) -> Self {
        Self::range_bounds(
            low.map_or(Bound::Unbounded, Bound::Included),
            high.map_or(Bound::Unbounded, Bound::Excluded),
        )
    }

    pub fn range_inclusive(low: Option<Expr>, high: Option<Expr>) -> Self {
        Self::range_bounds(
            low.map_or(Bound::Unbounded, Bound::Included),
            high.map_or(Bound::Unbounded, Bound::Included),
        )
    }

    pub fn range_exclusive(low: Option<Expr>, high: Option<Expr>) -> Self {
        Self::range_bounds(
            low.map_or(Bound::Unbounded, Bound::Excluded),
            high.map_or(Bound::Unbounded, Bound::Excluded),
        )
    }

    pub fn range_bounds(low: Bound<Expr>, high: Bound<Expr>) -> Self {
        Self::new(OperatorKind::Range { low, high })
    }

    pub fn bitwise_equals(mask: impl Into<Expr>) -> Self {
        Self::new(OperatorKind::BitwiseEquals(mask.into()))
    }

    pub fn is_null() -> Self {
        Self::new(OperatorKind::IsNull)
    }

    pub fn exists(query: ExistsQuery) -> Self {
        Self::new(OperatorKind::Exists(query))
    }

    /// Invert the match. Applying twice restores the original.
    pub fn not(mut self) -> Self {
        self.inverted = !self.inverted;
        self
    }

    /// Also match rows where the subject is NULL.
    pub fn include_nulls(mut self) -> Self {
        self.include_nulls = true;
        self
    }

    pub fn kind(&self) -> &OperatorKind {
        &self.kind
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn includes_nulls(&self) -> bool {
        self.include_nulls
    }

    /// Every operand expression, in declaration order.
    pub fn operands(&self) -> Vec<&Expr> {
        match &self.kind {
            OperatorKind::Equals(e)
            | OperatorKind::EqualsIgnoreCase(e)
            | OperatorKind::LessThan(e)
            | OperatorKind::LessThanOrEqual(e)
            | OperatorKind::GreaterThan(e)
            | OperatorKind::GreaterThanOrEqual(e)
            | OperatorKind::Like(e)
            | OperatorKind::LikeIgnoreCase(e)
            | OperatorKind::BitwiseEquals(e) => vec![e],
            OperatorKind::In(v) | OperatorKind::InIgnoreCase(v) => v.iter().collect(),
            OperatorKind::Range { low, high } => [low, high]
                .into_iter()
                .filter_map(|b| match b {
                    Bound::Included(e) | Bound::Excluded(e) => Some(e),
                    Bound::Unbounded => None,
                })
                .collect(),
            OperatorKind::IsNull | OperatorKind::Exists(_) => Vec::new(),
        }
    }

    /// The same operator with every operand passed through `f`. Flags are kept.
    pub fn adapt<F>(self, mut f: F) -> CompileResult<Self>
    where
        F: FnMut(Expr) -> CompileResult<Expr>,
    {
        let bound = |b: Bound<Expr>, f: &mut F| -> CompileResult<Bound<Expr>> {
            Ok(match b {
                Bound::Included(e) => Bound::Included(f(e)?),
                Bound::Excluded(e) => Bound::Excluded(f(e)?),
                Bound::Unbounded => Bound::Unbounded,
            })
        };
        let kind = match self.kind {
            OperatorKind::Equals(e) => OperatorKind::Equals(f(e)?),
            OperatorKind::EqualsIgnoreCase(e) => OperatorKind::EqualsIgnoreCase(f(e)?),
            OperatorKind::LessThan(e) => OperatorKind::LessThan(f(e)?),
            OperatorKind::LessThanOrEqual(e) => OperatorKind::LessThanOrEqual(f(e)?),
            OperatorKind::GreaterThan(e) => OperatorKind::GreaterThan(f(e)?),
            OperatorKind::GreaterThanOrEqual(e) => OperatorKind::GreaterThanOrEqual(f(e)?),
            OperatorKind::Like(e) => OperatorKind::Like(f(e)?),
            OperatorKind::LikeIgnoreCase(e) => OperatorKind::LikeIgnoreCase(f(e)?),
            OperatorKind::BitwiseEquals(e) => OperatorKind::BitwiseEquals(f(e)?),
            OperatorKind::In(v) => {
                OperatorKind::In(v.into_iter().map(&mut f).collect::<CompileResult<_>>()?)
            }
            OperatorKind::InIgnoreCase(v) => OperatorKind::InIgnoreCase(
                v.into_iter().map(&mut f).collect::<CompileResult<_>>()?,
            ),
            OperatorKind::Range { low, high } => OperatorKind::Range {
                low: bound(low, &mut f)?,
                high: bound(high, &mut f)?,
            },
            kind @ (OperatorKind::IsNull | OperatorKind::Exists(_)) => kind,
        };
        Ok(Self {
            kind,
            inverted: self.inverted,
            include_nulls: self.include_nulls,
        })
    }
}

/// A correlated `EXISTS` between a row and a related table.
///
/// Both tables are copied so the nested query has its own aliases; the
/// outer copy is tied back to the original row by primary key.
#[derive(Debug, Clone)]
pub struct ExistsQuery {
    outer: RowDef,
    outer_copy: RowDef,
    inner_copy: RowDef,
    join: Vec<(String, String)>,
    layer: Arc<dyn QueryLayer>,
}

impl ExistsQuery {
    /// `on` pairs an outer column name with an inner column name.
    pub fn new(outer: &RowDef, inner: &RowDef, on: &[(&str, &str)]) -> CompileResult<Self> {
        if on.is_empty() {
            return Err(CompileError::arity("EXISTS join", "at least 1", 0));
        }
        if outer.primary_keys().is_empty() {
            return Err(CompileError::InvalidValue(format!(
                "EXISTS needs a primary key on '{}'",
                outer.table_name()
            )));
        }
        for (o, i) in on {
            let ot = outer.field_def(outer.field(o)?)?.value_type();
            let it = inner.field_def(inner.field(i)?)?.value_type();
            if ot.unify(it).is_none() {
                return Err(CompileError::type_mismatch("EXISTS join", ot, it));
            }
        }
        Ok(Self {
            outer: outer.clone(),
            outer_copy: outer.copy_with_suffix("_outer"),
            inner_copy: inner.copy_with_suffix("_inner"),
            join: on
                .iter()
                .map(|(o, i)| (o.to_string(), i.to_string()))
                .collect(),
            layer: Arc::new(CorrelatedQueryLayer),
        })
    }

    /// Render the nested query with another layer.
    pub fn with_layer(mut self, layer: Arc<dyn QueryLayer>) -> Self {
        self.layer = layer;
        self
    }

    pub fn outer(&self) -> &RowDef {
        &self.outer
    }

    pub fn outer_copy(&self) -> &RowDef {
        &self.outer_copy
    }

    pub fn inner_copy(&self) -> &RowDef {
        &self.inner_copy
    }

    pub fn layer(&self) -> &dyn QueryLayer {
        self.layer.as_ref()
    }

    /// Primary key columns of the outer copy, the only projected columns.
    pub fn projection(&self) -> CompileResult<Vec<ColumnRef>> {
        self.outer_copy
            .primary_keys()
            .into_iter()
            .map(|f| ColumnRef::new(&self.outer_copy, f))
            .collect()
    }

    /// Join condition pairs between the two copies.
    pub fn join_columns(&self) -> CompileResult<Vec<(ColumnRef, ColumnRef)>> {
        self.join
            .iter()
            .map(|(o, i)| {
                Ok((
                    ColumnRef::new(&self.outer_copy, o.as_str())?,
                    ColumnRef::new(&self.inner_copy, i.as_str())?,
                ))
            })
            .collect()
    }

    /// Primary key pairs tying the outer copy to the original row.
    pub fn correlation(&self) -> CompileResult<Vec<(ColumnRef, ColumnRef)>> {
        self.outer
            .primary_keys()
            .into_iter()
            .map(|f| {
                let original = ColumnRef::new(&self.outer, f)?;
                let copy = original.rebind(&self.outer_copy)?;
                Ok((copy, original))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ValueType;
    use crate::typed::FieldDef;

    #[test]
    fn test_double_not_restores() {
        let op = Operator::equals(1).not().not();
        assert!(!op.is_inverted());
        let op = Operator::equals(1).not();
        assert!(op.is_inverted());
    }

    #[test]
    fn test_adapt_preserves_flags() {
        let op = Operator::is_in([1, 2]).not().include_nulls();
        let adapted = op
            .adapt(|e| Ok(Expr::literal(e.value_type() == ValueType::Integer)))
            .unwrap();
        assert!(adapted.is_inverted());
        assert!(adapted.includes_nulls());
        assert_eq!(adapted.operands().len(), 2);
        assert!(
            adapted
                .operands()
                .iter()
                .all(|e| e.value_type() == ValueType::Boolean)
        );
    }

    #[test]
    fn test_range_operands_skip_unbounded() {
        let op = Operator::range(Some(Expr::from(18)), None);
        assert_eq!(op.operands().len(), 1);
    }

    #[test]
    fn test_exists_requires_primary_key() {
        let outer = RowDef::builder("A")
            .field(FieldDef::new("X", ValueType::Integer))
            .build();
        let inner = RowDef::builder("B")
            .field(FieldDef::new("X", ValueType::Integer))
            .build();
        assert!(ExistsQuery::new(&outer, &inner, &[("X", "X")]).is_err());
    }

    #[test]
    fn test_exists_copies_rows() {
        let outer = RowDef::builder("A")
            .field(FieldDef::new("ID", ValueType::Integer).primary_key())
            .build();
        let inner = RowDef::builder("B")
            .field(FieldDef::new("A_ID", ValueType::Integer))
            .build();
        let q = ExistsQuery::new(&outer, &inner, &[("ID", "A_ID")]).unwrap();
        assert_ne!(q.outer_copy(), &outer);
        assert_ne!(q.inner_copy(), &inner);
        let corr = q.correlation().unwrap();
        assert_eq!(corr.len(), 1);
        assert_eq!(corr[0].0.row(), q.outer_copy());
        assert_eq!(corr[0].1.row(), &outer);
        assert!(matches!(
            ExistsQuery::new(&outer, &inner, &[("ID", "NOPE")]),
            Err(CompileError::UnknownField { .. })
        ));
    }
}

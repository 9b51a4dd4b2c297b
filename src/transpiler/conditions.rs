//! Operator expansion and condition emission.

use std::ops::Bound;

use crate::ast::{CompareOp, Condition, Expr, Func, Node, Operator, OperatorKind, Value};
use crate::error::{CompileError, CompileResult};
use crate::transpiler::expr::render_condition;
use crate::transpiler::traits::SqlGenerator;
use crate::transpiler::ToSql;

fn lower(e: &Expr) -> CompileResult<Expr> {
    Expr::call(Func::Lower, vec![e.clone()])
}

/// A NULL bound leaves that side of a range open.
fn open_if_null(bound: &Bound<Expr>) -> Bound<&Expr> {
    match bound {
        Bound::Included(e) | Bound::Excluded(e)
            if matches!(e.node(), Node::Literal(Value::Null)) =>
        {
            Bound::Unbounded
        }
        Bound::Included(e) => Bound::Included(e),
        Bound::Excluded(e) => Bound::Excluded(e),
        Bound::Unbounded => Bound::Unbounded,
    }
}

fn range(subject: &Expr, low: &Bound<Expr>, high: &Bound<Expr>) -> CompileResult<Expr> {
    let (low, high) = (open_if_null(low), open_if_null(high));
    if let (Bound::Included(l), Bound::Included(h)) = (low, high) {
        return Expr::between(subject.clone(), l.clone(), h.clone());
    }

    let mut parts = Vec::with_capacity(2);
    match low {
        Bound::Included(l) => parts.push(Expr::compare(subject.clone(), CompareOp::Ge, l.clone())?),
        Bound::Excluded(l) => parts.push(Expr::compare(subject.clone(), CompareOp::Gt, l.clone())?),
        Bound::Unbounded => {}
    }
    match high {
        Bound::Included(h) => parts.push(Expr::compare(subject.clone(), CompareOp::Le, h.clone())?),
        Bound::Excluded(h) => parts.push(Expr::compare(subject.clone(), CompareOp::Lt, h.clone())?),
        Bound::Unbounded => {}
    }
    match parts.len() {
        0 => Ok(Expr::literal(true)),
        1 => Ok(parts.remove(0)),
        _ => Expr::and(parts),
    }
}

fn check_candidates(subject: &Expr, candidates: &[Expr]) -> CompileResult<()> {
    for c in candidates {
        if subject.value_type().unify(c.value_type()).is_none() {
            return Err(CompileError::type_mismatch(
                "IN",
                subject.value_type(),
                c.value_type(),
            ));
        }
    }
    Ok(())
}

impl Operator {
    /// The boolean expression matching `subject` against this operator.
    ///
    /// Inversion is applied before NULL inclusion, so an inverted operator
    /// that includes NULLs reads `NOT (..) OR subject IS NULL`.
    pub fn generate_where_expression(&self, subject: &Expr) -> CompileResult<Expr> {
        let compare = |op: CompareOp, v: &Expr| Expr::compare(subject.clone(), op, v.clone());

        let base = match self.kind() {
            OperatorKind::Equals(v) => compare(CompareOp::Eq, v)?,
            OperatorKind::EqualsIgnoreCase(v) => {
                Expr::compare(lower(subject)?, CompareOp::Eq, lower(v)?)?
            }
            OperatorKind::LessThan(v) => compare(CompareOp::Lt, v)?,
            OperatorKind::LessThanOrEqual(v) => compare(CompareOp::Le, v)?,
            OperatorKind::GreaterThan(v) => compare(CompareOp::Gt, v)?,
            OperatorKind::GreaterThanOrEqual(v) => compare(CompareOp::Ge, v)?,
            OperatorKind::In(values) => {
                check_candidates(subject, values)?;
                Expr::in_list(subject.clone(), values.clone())
            }
            OperatorKind::InIgnoreCase(values) => {
                check_candidates(subject, values)?;
                let lowered = values
                    .iter()
                    .map(|v| match v.node() {
                        Node::Literal(Value::Null) => Ok(v.clone()),
                        _ => lower(v),
                    })
                    .collect::<CompileResult<Vec<_>>>()?;
                Expr::in_list(lower(subject)?, lowered)
            }
            OperatorKind::Like(pattern) => Expr::like(subject.clone(), pattern.clone())?,
            OperatorKind::LikeIgnoreCase(pattern) => Expr::like(lower(subject)?, lower(pattern)?)?,
            OperatorKind::Range { low, high } => range(subject, low, high)?,
            OperatorKind::BitwiseEquals(mask) => {
                let masked = Expr::call(Func::BitAnd, vec![subject.clone(), mask.clone()])?;
                Expr::compare(masked, CompareOp::Eq, mask.clone())?
            }
            OperatorKind::IsNull => Expr::is_null(subject.clone()),
            OperatorKind::Exists(query) => Expr::exists(query.clone()),
        };

        let cond = if self.is_inverted() { base.negate() } else { base };
        if self.includes_nulls() && !self.already_matches_null() {
            Expr::or(vec![cond, Expr::is_null(subject.clone())])
        } else {
            Ok(cond)
        }
    }

    /// The uninverted operator already lets NULL subjects through.
    fn already_matches_null(&self) -> bool {
        if self.is_inverted() {
            return false;
        }
        match self.kind() {
            OperatorKind::IsNull => true,
            OperatorKind::In(values) | OperatorKind::InIgnoreCase(values) => values
                .iter()
                .any(|v| matches!(v.node(), Node::Literal(Value::Null))),
            _ => false,
        }
    }
}

impl ToSql for Condition {
    fn to_sql_with(&self, generator: &dyn SqlGenerator) -> CompileResult<String> {
        render_condition(generator, &self.to_expr()?)
    }
}

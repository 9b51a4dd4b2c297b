use crate::ast::builders::BooleanExpr;
use crate::ast::{Expr, Operator};
use crate::error::CompileResult;

/// An operator applied to a subject expression.
#[derive(Debug, Clone)]
pub struct Condition {
    /// Left hand side expression (usually a column)
    pub subject: Expr,
    pub operator: Operator,
}

impl Condition {
    pub fn new(subject: impl Into<Expr>, operator: Operator) -> Self {
        Self {
            subject: subject.into(),
            operator,
        }
    }

    pub fn not(self) -> Self {
        Self {
            subject: self.subject,
            operator: self.operator.not(),
        }
    }

    pub fn include_nulls(self) -> Self {
        Self {
            subject: self.subject,
            operator: self.operator.include_nulls(),
        }
    }

    /// The boolean expression this condition stands for.
    pub fn to_expr(&self) -> CompileResult<Expr> {
        self.operator.generate_where_expression(&self.subject)
    }

    pub fn to_boolean(&self) -> CompileResult<BooleanExpr> {
        Ok(BooleanExpr::from_predicate(self.to_expr()?))
    }
}

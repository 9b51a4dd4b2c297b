use crate::ast::builders::{call, IntegerExpr, TypedExpr};
use crate::ast::{Expr, Func, LogicalOp, Node, ValueType};

typed_expr!(
    /// A boolean value or predicate.
    BooleanExpr,
    ValueType::Boolean
);
equality_ops!(BooleanExpr);
literal_from!(BooleanExpr, ValueType::Boolean, bool);

impl BooleanExpr {
    pub(crate) fn from_predicate(expr: Expr) -> Self {
        Self(expr)
    }

    pub fn always_true() -> Self {
        Self(Expr::literal(true))
    }

    pub fn always_false() -> Self {
        Self(Expr::literal(false))
    }

    pub fn and(&self, other: impl Into<Self>) -> Self {
        Self::logic(LogicalOp::And, vec![self.clone(), other.into()])
    }

    pub fn or(&self, other: impl Into<Self>) -> Self {
        Self::logic(LogicalOp::Or, vec![self.clone(), other.into()])
    }

    /// Negation; `x.not().not()` is `x` again.
    pub fn not(&self) -> Self {
        Self(self.0.clone().negate())
    }

    /// AND of every condition; TRUE when there are none.
    pub fn all_of<I>(conditions: I) -> Self
    where
        I: IntoIterator<Item = BooleanExpr>,
    {
        Self::logic(LogicalOp::And, conditions.into_iter().collect())
    }

    /// OR of every condition; FALSE when there are none.
    pub fn any_of<I>(conditions: I) -> Self
    where
        I: IntoIterator<Item = BooleanExpr>,
    {
        Self::logic(LogicalOp::Or, conditions.into_iter().collect())
    }

    fn logic(op: LogicalOp, mut args: Vec<BooleanExpr>) -> Self {
        match args.len() {
            0 if op == LogicalOp::And => Self::always_true(),
            0 => Self::always_false(),
            1 => args.remove(0),
            _ => {
                // Flatten nested groups of the same operator.
                let mut flat = Vec::with_capacity(args.len());
                for a in args {
                    match a.0.into_parts() {
                        (_, Node::Logic { op: inner, args }) if inner == op => flat.extend(args),
                        (value_type, node) => flat.push(Expr::from_parts(value_type, node)),
                    }
                }
                Self(Expr::from_parts(
                    ValueType::Boolean,
                    Node::Logic { op, args: flat },
                ))
            }
        }
    }

    /// CASE WHEN self THEN then ELSE otherwise END
    pub fn if_then_else<T: TypedExpr>(&self, then: impl Into<T>, otherwise: impl Into<T>) -> T {
        T::from_expr_unchecked(Expr::from_parts(
            T::VALUE_TYPE,
            Node::Case {
                branches: vec![(self.0.clone(), then.into().into())],
                otherwise: Some(Box::new(otherwise.into().into())),
            },
        ))
    }

    /// CASE WHEN self THEN then END, NULL otherwise.
    pub fn if_then<T: TypedExpr>(&self, then: impl Into<T>) -> T {
        T::from_expr_unchecked(Expr::from_parts(
            T::VALUE_TYPE,
            Node::Case {
                branches: vec![(self.0.clone(), then.into().into())],
                otherwise: None,
            },
        ))
    }

    /// 1 for true, 0 otherwise.
    pub fn to_integer(&self) -> IntegerExpr {
        call(Func::BooleanToInteger, vec![self.0.clone()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_groups() {
        assert!(matches!(
            BooleanExpr::all_of(Vec::new()).as_ref().node(),
            Node::Literal(crate::ast::Value::Bool(true))
        ));
        assert!(matches!(
            BooleanExpr::any_of(Vec::new()).as_ref().node(),
            Node::Literal(crate::ast::Value::Bool(false))
        ));
    }

    #[test]
    fn test_and_flattens() {
        let a = BooleanExpr::from(true);
        let b = BooleanExpr::from(false);
        let c = BooleanExpr::from(true);
        let all = a.and(b).and(c);
        match all.as_ref().node() {
            Node::Logic { args, .. } => assert_eq!(args.len(), 3),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_double_not() {
        let a = BooleanExpr::from(true).is(false);
        let twice = a.not().not();
        assert!(matches!(
            twice.as_ref().node(),
            Node::Compare {
                op: crate::ast::CompareOp::Eq,
                ..
            }
        ));
    }
}

use crate::ast::builders::{call, BooleanExpr, IntegerExpr, NumberExpr};
use crate::ast::{Condition, Expr, Func, Node, Operator, ValueType};

typed_expr!(
    /// A character string.
    StringExpr,
    ValueType::String
);
equality_ops!(StringExpr);
comparable_ops!(StringExpr);
literal_from!(StringExpr, ValueType::String, &str, String);

impl From<&String> for StringExpr {
    fn from(v: &String) -> Self {
        Self(Expr::literal(v.as_str()))
    }
}

impl StringExpr {
    pub fn value(s: impl Into<String>) -> Self {
        Self(Expr::literal(s.into()))
    }

    fn unary(&self, func: Func) -> Self {
        call(func, vec![self.0.clone()])
    }

    pub fn lower(&self) -> Self {
        self.unary(Func::Lower)
    }

    pub fn upper(&self) -> Self {
        self.unary(Func::Upper)
    }

    pub fn trim(&self) -> Self {
        self.unary(Func::Trim)
    }

    pub fn left_trim(&self) -> Self {
        self.unary(Func::LeftTrim)
    }

    pub fn right_trim(&self) -> Self {
        self.unary(Func::RightTrim)
    }

    pub fn length(&self) -> IntegerExpr {
        call(Func::Length, vec![self.0.clone()])
    }

    /// Characters from the 1-based `start` to the end.
    pub fn substring_from(&self, start: impl Into<IntegerExpr>) -> Self {
        call(Func::Substring, vec![self.0.clone(), start.into().into()])
    }

    /// `length` characters from the 1-based `start`.
    pub fn substring(&self, start: impl Into<IntegerExpr>, length: impl Into<IntegerExpr>) -> Self {
        call(
            Func::Substring,
            vec![self.0.clone(), start.into().into(), length.into().into()],
        )
    }

    /// 1-based position of `needle`, 0 when absent.
    pub fn position_of(&self, needle: impl Into<Self>) -> IntegerExpr {
        call(Func::Position, vec![self.0.clone(), needle.into().0])
    }

    pub fn replace(&self, from: impl Into<Self>, to: impl Into<Self>) -> Self {
        call(
            Func::Replace,
            vec![self.0.clone(), from.into().0, to.into().0],
        )
    }

    pub fn append(&self, other: impl Into<Self>) -> Self {
        self.concat([other.into()])
    }

    /// Concatenation; nested concatenations are flattened.
    pub fn concat<I, V>(&self, others: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Self>,
    {
        let mut args = Vec::new();
        for part in std::iter::once(self.clone()).chain(others.into_iter().map(Into::into)) {
            match part.0.into_parts() {
                (_, Node::Func { func: Func::Concat, args: nested }) => args.extend(nested),
                (value_type, node) => args.push(Expr::from_parts(value_type, node)),
            }
        }
        call(Func::Concat, args)
    }

    pub fn is_like(&self, pattern: impl Into<Self>) -> BooleanExpr {
        BooleanExpr::from_predicate(Expr::from_parts(
            ValueType::Boolean,
            Node::Like {
                arg: Box::new(self.0.clone()),
                pattern: Box::new(pattern.into().0),
            },
        ))
    }

    pub fn is_like_ignore_case(&self, pattern: impl Into<Self>) -> BooleanExpr {
        self.lower().is_like(pattern.into().lower())
    }

    pub fn is_ignore_case(&self, other: impl Into<Self>) -> BooleanExpr {
        self.lower().is(other.into().lower())
    }

    /// Regular expression match, where the dialect has one.
    pub fn matches_regex(&self, pattern: impl Into<Self>) -> BooleanExpr {
        call(Func::RegexMatch, vec![self.0.clone(), pattern.into().0])
    }

    pub fn is_empty(&self) -> BooleanExpr {
        self.is("")
    }

    pub fn to_number(&self) -> NumberExpr {
        call(Func::ToNumber, vec![self.0.clone()])
    }

    pub fn to_integer(&self) -> IntegerExpr {
        call(Func::ToInteger, vec![self.0.clone()])
    }

    pub fn permitted_pattern(&self, pattern: impl Into<Self>) -> Condition {
        self.matches(Operator::like(pattern.into()))
    }

    pub fn permitted_pattern_ignore_case(&self, pattern: impl Into<Self>) -> Condition {
        self.matches(Operator::like_ignore_case(pattern.into()))
    }

    pub fn permitted_values_ignore_case<I, V>(&self, values: I) -> Condition
    where
        I: IntoIterator<Item = V>,
        V: Into<Self>,
    {
        let mut values: Vec<Expr> = values.into_iter().map(|v| v.into().0).collect();
        let operator = if values.len() == 1 {
            Operator::equals_ignore_case(values.remove(0))
        } else {
            Operator::is_in_ignore_case(values)
        };
        self.matches(operator)
    }
}

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ast::func::{unify_all, AggregateFunc, Func};
use crate::ast::geometry::{Line2D, Point2D, Polygon2D};
use crate::ast::operators::ExistsQuery;
use crate::ast::repeat::DateRepeat;
use crate::ast::window::{WindowOrder, WindowSpec};
use crate::ast::{ColumnRef, Value, ValueType};
use crate::error::{CompileError, CompileResult};
use crate::typed::TableRef;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// The operator with the opposite truth value.
    pub fn negated(self) -> Self {
        match self {
            CompareOp::Eq => CompareOp::Ne,
            CompareOp::Ne => CompareOp::Eq,
            CompareOp::Lt => CompareOp::Ge,
            CompareOp::Le => CompareOp::Gt,
            CompareOp::Gt => CompareOp::Le,
            CompareOp::Ge => CompareOp::Lt,
        }
    }

    pub fn is_ordering(self) -> bool {
        !matches!(self, CompareOp::Eq | CompareOp::Ne)
    }
}

/// Logical operator between conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LogicalOp {
    #[default]
    And,
    Or,
}

/// Which clause a condition belongs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Clause {
    Where,
    Having,
}

/// Node variants of an expression tree.
#[derive(Debug, Clone)]
pub enum Node {
    Literal(Value),
    Column(ColumnRef),
    Func {
        func: Func,
        args: Vec<Expr>,
    },
    Aggregate {
        func: AggregateFunc,
        distinct: bool,
        /// `None` for COUNT(*)
        arg: Option<Box<Expr>>,
    },
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logic {
        op: LogicalOp,
        args: Vec<Expr>,
    },
    Not(Box<Expr>),
    IsNull {
        arg: Box<Expr>,
        negated: bool,
    },
    /// Candidates may mix types; emission groups them.
    In {
        arg: Box<Expr>,
        candidates: Vec<Expr>,
    },
    Between {
        arg: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
    },
    Like {
        arg: Box<Expr>,
        pattern: Box<Expr>,
    },
    Case {
        branches: Vec<(Expr, Expr)>,
        otherwise: Option<Box<Expr>>,
    },
    Window {
        func: Box<Expr>,
        spec: WindowSpec,
    },
    Exists(ExistsQuery),
}

/// A typed SQL expression.
///
/// Immutable once built; `clone()` gives an independent equal copy.
#[derive(Debug, Clone)]
pub struct Expr {
    value_type: ValueType,
    node: Node,
}

impl Expr {
    pub(crate) fn from_parts(value_type: ValueType, node: Node) -> Self {
        Self { value_type, node }
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            value_type: value.value_type(),
            node: Node::Literal(value),
        }
    }

    /// A NULL carrying a declared type.
    pub fn null(value_type: ValueType) -> Self {
        Self {
            value_type,
            node: Node::Literal(Value::Null),
        }
    }

    pub fn column(column: ColumnRef) -> Self {
        Self {
            value_type: column.value_type(),
            node: Node::Column(column),
        }
    }

    /// Call a scalar function, checking arity and argument types.
    pub fn call(func: Func, args: Vec<Expr>) -> CompileResult<Self> {
        if func.is_window_only() {
            return Err(CompileError::InvalidValue(format!(
                "{} is only valid inside a window",
                func.name()
            )));
        }
        let types: Vec<ValueType> = args.iter().map(|a| a.value_type).collect();
        let value_type = func.result_type(&types)?;
        Ok(Self {
            value_type,
            node: Node::Func { func, args },
        })
    }

    pub fn aggregate(func: AggregateFunc, arg: Option<Expr>, distinct: bool) -> CompileResult<Self> {
        let value_type = func.result_type(arg.as_ref().map(|a| a.value_type))?;
        Ok(Self {
            value_type,
            node: Node::Aggregate {
                func,
                distinct,
                arg: arg.map(Box::new),
            },
        })
    }

    pub fn compare(left: Expr, op: CompareOp, right: Expr) -> CompileResult<Self> {
        let ctx = "comparison";
        let joined = left
            .value_type
            .unify(right.value_type)
            .ok_or_else(|| CompileError::type_mismatch(ctx, left.value_type, right.value_type))?;
        if op.is_ordering() && !joined.is_comparable() {
            return Err(CompileError::type_mismatch(ctx, ValueType::Number, joined));
        }
        Ok(Self::boolean(Node::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }))
    }

    pub fn and(args: Vec<Expr>) -> CompileResult<Self> {
        Self::logic(LogicalOp::And, args)
    }

    pub fn or(args: Vec<Expr>) -> CompileResult<Self> {
        Self::logic(LogicalOp::Or, args)
    }

    fn logic(op: LogicalOp, args: Vec<Expr>) -> CompileResult<Self> {
        let ctx = match op {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        };
        for a in &args {
            a.require(ctx, ValueType::Boolean)?;
        }
        Ok(Self::boolean(Node::Logic { op, args }))
    }

    /// Logical negation. Negating a negation gives back the original.
    pub fn not(expr: Expr) -> CompileResult<Self> {
        expr.require("NOT", ValueType::Boolean)?;
        Ok(expr.negate())
    }

    pub(crate) fn negate(self) -> Self {
        match self.node {
            Node::Not(inner) => *inner,
            Node::IsNull { arg, negated } => Self::boolean(Node::IsNull {
                arg,
                negated: !negated,
            }),
            Node::Compare {
                op: op @ (CompareOp::Eq | CompareOp::Ne),
                left,
                right,
            } => Self::boolean(Node::Compare {
                op: op.negated(),
                left,
                right,
            }),
            node => Self::boolean(Node::Not(Box::new(Self {
                value_type: ValueType::Boolean,
                node,
            }))),
        }
    }

    pub fn is_null(arg: Expr) -> Self {
        Self::boolean(Node::IsNull {
            arg: Box::new(arg),
            negated: false,
        })
    }

    pub fn is_not_null(arg: Expr) -> Self {
        Self::boolean(Node::IsNull {
            arg: Box::new(arg),
            negated: true,
        })
    }

    pub fn in_list(arg: Expr, candidates: Vec<Expr>) -> Self {
        Self::boolean(Node::In {
            arg: Box::new(arg),
            candidates,
        })
    }

    pub fn between(arg: Expr, low: Expr, high: Expr) -> CompileResult<Self> {
        unify_all("BETWEEN", &[arg.value_type, low.value_type, high.value_type])?;
        Ok(Self::boolean(Node::Between {
            arg: Box::new(arg),
            low: Box::new(low),
            high: Box::new(high),
        }))
    }

    pub fn like(arg: Expr, pattern: Expr) -> CompileResult<Self> {
        arg.require("LIKE", ValueType::String)?;
        pattern.require("LIKE", ValueType::String)?;
        Ok(Self::boolean(Node::Like {
            arg: Box::new(arg),
            pattern: Box::new(pattern),
        }))
    }

    /// `CASE WHEN .. THEN .. [ELSE ..] END`; every result must share a type.
    pub fn case(branches: Vec<(Expr, Expr)>, otherwise: Option<Expr>) -> CompileResult<Self> {
        if branches.is_empty() {
            return Err(CompileError::arity("CASE", "at least 1", 0));
        }
        let mut results = Vec::with_capacity(branches.len() + 1);
        for (cond, result) in &branches {
            cond.require("CASE", ValueType::Boolean)?;
            results.push(result.value_type);
        }
        if let Some(e) = &otherwise {
            results.push(e.value_type);
        }
        let value_type = unify_all("CASE", &results)?;
        Ok(Self {
            value_type,
            node: Node::Case {
                branches,
                otherwise: otherwise.map(Box::new),
            },
        })
    }

    pub fn coalesce(args: Vec<Expr>) -> CompileResult<Self> {
        Self::call(Func::Coalesce, args)
    }

    pub fn exists(query: ExistsQuery) -> Self {
        Self::boolean(Node::Exists(query))
    }

    fn boolean(node: Node) -> Self {
        Self {
            value_type: ValueType::Boolean,
            node,
        }
    }

    fn require(&self, ctx: &str, expected: ValueType) -> CompileResult<()> {
        if expected.accepts(self.value_type) {
            Ok(())
        } else {
            Err(CompileError::type_mismatch(ctx, expected, self.value_type))
        }
    }

    pub(crate) fn into_parts(self) -> (ValueType, Node) {
        (self.value_type, self.node)
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn is_boolean(&self) -> bool {
        self.value_type == ValueType::Boolean
    }

    /// Direct children, in emission order.
    pub fn children(&self) -> Vec<&Expr> {
        match &self.node {
            Node::Literal(_) | Node::Column(_) | Node::Exists(_) => Vec::new(),
            Node::Func { args, .. } | Node::Logic { args, .. } => args.iter().collect(),
            Node::Aggregate { arg, .. } => arg.iter().map(|a| a.as_ref()).collect(),
            Node::Compare { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Node::Not(arg) | Node::IsNull { arg, .. } => vec![arg.as_ref()],
            Node::In { arg, candidates } => {
                std::iter::once(arg.as_ref()).chain(candidates.iter()).collect()
            }
            Node::Between { arg, low, high } => vec![arg.as_ref(), low.as_ref(), high.as_ref()],
            Node::Like { arg, pattern } => vec![arg.as_ref(), pattern.as_ref()],
            Node::Case {
                branches,
                otherwise,
            } => branches
                .iter()
                .flat_map(|(c, r)| [c, r])
                .chain(otherwise.iter().map(|o| o.as_ref()))
                .collect(),
            Node::Window { func, spec } => {
                std::iter::once(func.as_ref()).chain(spec.exprs()).collect()
            }
        }
    }

    /// Whether this expression forces GROUP BY / HAVING.
    ///
    /// A windowed aggregate does not, but aggregates inside its
    /// PARTITION BY or ORDER BY do.
    pub fn is_aggregator(&self) -> bool {
        match &self.node {
            Node::Aggregate { .. } => true,
            Node::Window { spec, .. } => spec.exprs().iter().any(|e| e.is_aggregator()),
            _ => self.children().iter().any(|c| c.is_aggregator()),
        }
    }

    /// Every table instance this expression reads from.
    pub fn tables_involved(&self) -> BTreeSet<TableRef> {
        let mut tables = BTreeSet::new();
        self.collect_tables(&mut tables);
        tables
    }

    fn collect_tables(&self, tables: &mut BTreeSet<TableRef>) {
        match &self.node {
            Node::Column(c) => {
                tables.insert(c.table_ref());
            }
            Node::Exists(q) => {
                tables.insert(q.outer().table_ref());
            }
            _ => {
                for c in self.children() {
                    c.collect_tables(tables);
                }
            }
        }
    }

    /// Whether the expression always evaluates to NULL because of NULL literals.
    ///
    /// COALESCE, GREATEST and LEAST skip NULL arguments, so they are NULL
    /// only when every argument is. A CASE is NULL only when every result,
    /// including a missing ELSE, is.
    pub fn includes_null(&self) -> bool {
        match &self.node {
            Node::Literal(v) => v.is_null(),
            Node::Column(_) | Node::Exists(_) | Node::IsNull { .. } => false,
            Node::Func {
                func: Func::Coalesce | Func::Greatest | Func::Least,
                args,
            } => args.iter().all(|a| a.includes_null()),
            Node::Func {
                func: Func::NullIf,
                args,
            } => args.first().is_some_and(|a| a.includes_null()),
            Node::Case {
                branches,
                otherwise,
            } => {
                branches.iter().all(|(_, result)| result.includes_null())
                    && otherwise.as_ref().is_none_or(|e| e.includes_null())
            }
            Node::Window { func, .. } => func.includes_null(),
            _ => self.children().iter().any(|c| c.includes_null()),
        }
    }

    /// True iff no table is referenced.
    pub fn is_purely_functional(&self) -> bool {
        self.tables_involved().is_empty()
    }

    /// WHERE for row-level conditions, HAVING for aggregate ones.
    pub fn placement(&self) -> Clause {
        if self.is_aggregator() {
            Clause::Having
        } else {
            Clause::Where
        }
    }

    /// Literal `''`, which some dialects store as NULL.
    pub(crate) fn is_empty_string(&self) -> bool {
        matches!(&self.node, Node::Literal(Value::String(s)) if s.is_empty())
    }

    /// Nodes whose SQL is a predicate rather than a value.
    pub(crate) fn is_predicate(&self) -> bool {
        match &self.node {
            Node::Compare { .. }
            | Node::Logic { .. }
            | Node::Not(_)
            | Node::IsNull { .. }
            | Node::In { .. }
            | Node::Between { .. }
            | Node::Like { .. }
            | Node::Exists(_) => true,
            Node::Func { func, .. } => func.is_predicate(),
            _ => false,
        }
    }

    /// Rewrite every column leaf.
    pub fn map_columns<F>(self, f: &mut F) -> Expr
    where
        F: FnMut(ColumnRef) -> ColumnRef,
    {
        fn all<F: FnMut(ColumnRef) -> ColumnRef>(v: Vec<Expr>, f: &mut F) -> Vec<Expr> {
            v.into_iter().map(|e| e.map_columns(f)).collect()
        }
        fn boxed<F: FnMut(ColumnRef) -> ColumnRef>(b: Box<Expr>, f: &mut F) -> Box<Expr> {
            Box::new(b.map_columns(f))
        }

        let node = match self.node {
            Node::Column(c) => Node::Column(f(c)),
            node @ (Node::Literal(_) | Node::Exists(_)) => node,
            Node::Func { func, args } => Node::Func {
                func,
                args: all(args, f),
            },
            Node::Aggregate {
                func,
                distinct,
                arg,
            } => Node::Aggregate {
                func,
                distinct,
                arg: arg.map(|a| boxed(a, f)),
            },
            Node::Compare { op, left, right } => Node::Compare {
                op,
                left: boxed(left, f),
                right: boxed(right, f),
            },
            Node::Logic { op, args } => Node::Logic {
                op,
                args: all(args, f),
            },
            Node::Not(arg) => Node::Not(boxed(arg, f)),
            Node::IsNull { arg, negated } => Node::IsNull {
                arg: boxed(arg, f),
                negated,
            },
            Node::In { arg, candidates } => Node::In {
                arg: boxed(arg, f),
                candidates: all(candidates, f),
            },
            Node::Between { arg, low, high } => Node::Between {
                arg: boxed(arg, f),
                low: boxed(low, f),
                high: boxed(high, f),
            },
            Node::Like { arg, pattern } => Node::Like {
                arg: boxed(arg, f),
                pattern: boxed(pattern, f),
            },
            Node::Case {
                branches,
                otherwise,
            } => Node::Case {
                branches: branches
                    .into_iter()
                    .map(|(c, r)| (c.map_columns(f), r.map_columns(f)))
                    .collect(),
                otherwise: otherwise.map(|o| boxed(o, f)),
            },
            Node::Window { func, spec } => {
                let order = match spec.order {
                    WindowOrder::Keys(keys) => WindowOrder::Keys(
                        keys.into_iter()
                            .map(|mut k| {
                                k.expr = k.expr.map_columns(f);
                                k
                            })
                            .collect(),
                    ),
                    other => other,
                };
                Node::Window {
                    func: boxed(func, f),
                    spec: WindowSpec {
                        partition: all(spec.partition, f),
                        order,
                        frame: spec.frame,
                    },
                }
            }
        };
        Expr {
            value_type: self.value_type,
            node,
        }
    }
}

impl AsRef<Expr> for Expr {
    fn as_ref(&self) -> &Expr {
        self
    }
}

impl From<ColumnRef> for Expr {
    fn from(column: ColumnRef) -> Self {
        Expr::column(column)
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::literal(value)
    }
}

macro_rules! literal_into_expr {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Expr {
                fn from(v: $t) -> Self {
                    Expr::literal(v)
                }
            }

            impl From<Option<$t>> for Expr {
                fn from(v: Option<$t>) -> Self {
                    Expr::literal(v)
                }
            }
        )*
    };
}

literal_into_expr!(
    bool,
    i32,
    i64,
    u32,
    f64,
    Decimal,
    &str,
    String,
    NaiveDateTime,
    NaiveDate,
    DateRepeat,
    TimeDelta,
    Point2D,
    Line2D,
    Polygon2D,
    Vec<u8>,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typed::{FieldDef, RowDef};

    fn row() -> RowDef {
        RowDef::builder("T")
            .field(FieldDef::new("A", ValueType::Integer))
            .field(FieldDef::new("S", ValueType::String))
            .build()
    }

    fn col(row: &RowDef, name: &str) -> Expr {
        Expr::column(ColumnRef::new(row, name).unwrap())
    }

    #[test]
    fn test_literal_is_purely_functional() {
        let e = Expr::call(Func::Add, vec![Expr::literal(1), Expr::literal(2)]).unwrap();
        assert!(e.is_purely_functional());
        assert!(!e.is_aggregator());
        assert_eq!(e.value_type(), ValueType::Integer);
    }

    #[test]
    fn test_tables_involved_is_union() {
        let a = row();
        let b = row();
        let e = Expr::call(Func::Add, vec![col(&a, "A"), col(&b, "A")]).unwrap();
        assert_eq!(e.tables_involved().len(), 2);
        assert!(!e.is_purely_functional());
    }

    #[test]
    fn test_aggregate_propagates_but_window_does_not() {
        let r = row();
        let sum = Expr::aggregate(AggregateFunc::Sum, Some(col(&r, "A")), false).unwrap();
        let plus = Expr::call(Func::Add, vec![sum.clone(), Expr::literal(1)]).unwrap();
        assert!(plus.is_aggregator());
        assert_eq!(plus.placement(), Clause::Having);

        let windowed = Expr::from_parts(
            sum.value_type(),
            Node::Window {
                func: Box::new(sum),
                spec: WindowSpec::default(),
            },
        );
        assert!(!windowed.is_aggregator());
        assert_eq!(windowed.placement(), Clause::Where);
    }

    #[test]
    fn test_includes_null_coalesce_rule() {
        let r = row();
        let partial = Expr::coalesce(vec![col(&r, "A"), Expr::null(ValueType::Integer)]).unwrap();
        assert!(!partial.includes_null());
        let all_null =
            Expr::coalesce(vec![Expr::null(ValueType::Integer), Expr::literal(None::<i64>)])
                .unwrap();
        assert!(all_null.includes_null());
        let sum = Expr::call(Func::Add, vec![col(&r, "A"), Expr::null(ValueType::Integer)])
            .unwrap();
        assert!(sum.includes_null());
    }

    #[test]
    fn test_includes_null_case_and_extremes() {
        let r = row();
        let cond = Expr::compare(col(&r, "A"), CompareOp::Gt, Expr::literal(1)).unwrap();
        let null = || Expr::null(ValueType::Integer);

        let one_null_branch =
            Expr::case(vec![(cond.clone(), Expr::literal(1))], Some(null())).unwrap();
        assert!(!one_null_branch.includes_null());
        let no_else = Expr::case(vec![(cond.clone(), null())], None).unwrap();
        assert!(no_else.includes_null());
        let all_null = Expr::case(vec![(cond, null())], Some(null())).unwrap();
        assert!(all_null.includes_null());

        for func in [Func::Greatest, Func::Least] {
            let partial = Expr::call(func, vec![col(&r, "A"), null()]).unwrap();
            assert!(!partial.includes_null());
            let both = Expr::call(func, vec![null(), null()]).unwrap();
            assert!(both.includes_null());
        }
    }

    #[test]
    fn test_call_type_checks() {
        let r = row();
        let err = Expr::call(Func::Lower, vec![col(&r, "A")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type mismatch in LOWER: expected string, got integer"
        );
        assert!(Expr::compare(col(&r, "A"), CompareOp::Eq, Expr::literal("x")).is_err());
        assert!(Expr::call(Func::RowNumber, vec![]).is_err());
    }

    #[test]
    fn test_case_unifies_results() {
        let r = row();
        let cond = Expr::compare(col(&r, "A"), CompareOp::Gt, Expr::literal(1)).unwrap();
        let ok = Expr::case(vec![(cond.clone(), Expr::literal(1))], Some(Expr::literal(2.5)))
            .unwrap();
        assert_eq!(ok.value_type(), ValueType::Number);
        assert!(Expr::case(vec![(cond, Expr::literal(1))], Some(Expr::literal("x"))).is_err());
        assert!(Expr::case(vec![], None).is_err());
    }

    #[test]
    fn test_double_negation_is_identity() {
        let r = row();
        let cond = Expr::compare(col(&r, "A"), CompareOp::Lt, Expr::literal(3)).unwrap();
        let twice = Expr::not(Expr::not(cond).unwrap()).unwrap();
        assert!(matches!(
            twice.node(),
            Node::Compare {
                op: CompareOp::Lt,
                ..
            }
        ));
    }

    #[test]
    fn test_map_columns_drops_alias() {
        let r = row();
        let e = Expr::call(Func::Add, vec![col(&r, "A"), Expr::literal(1)]).unwrap();
        let mapped = e.map_columns(&mut |c| c.without_table_alias());
        match mapped.node() {
            Node::Func { args, .. } => match args[0].node() {
                Node::Column(c) => assert!(!c.uses_table_alias()),
                other => panic!("unexpected {:?}", other),
            },
            other => panic!("unexpected {:?}", other),
        }
    }
}

//! Expression emission.
//!
//! Two contexts exist. A *value* is anything that can be selected or passed
//! to a function; a *condition* is what WHERE, HAVING, CASE WHEN and the
//! logical operators expect. Dialects without a boolean type keep the two
//! apart, so every node is rendered through the context its parent needs and
//! converted with `boolean_as_value` / `boolean_as_condition` at the seams.

use rust_decimal::Decimal;
use tracing::trace;

use crate::ast::{CompareOp, DateUnit, Expr, Func, LogicalOp, Node, Value, ValueType};
use crate::error::{CompileError, CompileResult};
use crate::transpiler::traits::SqlGenerator;
use crate::transpiler::window::render_window;
use crate::transpiler::ToSql;

/// Boolean expressions compile as standalone conditions; use
/// [`render`] for the value form.
impl ToSql for Expr {
    fn to_sql_with(&self, generator: &dyn SqlGenerator) -> CompileResult<String> {
        if self.is_predicate() || self.value_type() == ValueType::Boolean {
            render_condition(generator, self)
        } else {
            render(generator, self)
        }
    }
}

/// Render `expr` where a value is expected.
pub fn render(g: &dyn SqlGenerator, expr: &Expr) -> CompileResult<String> {
    if expr.is_predicate() {
        return Ok(g.boolean_as_value(&render_condition(g, expr)?));
    }
    match expr.node() {
        Node::Literal(value) => render_literal(g, value, expr.value_type()),
        Node::Column(column) => Ok(column.to_sql_with(g)),
        Node::Func { func, args } => render_func(g, *func, args),
        Node::Aggregate {
            func,
            distinct,
            arg,
        } => {
            if !g.supports_aggregate(*func) {
                return Err(g.unsupported(func.name()));
            }
            match arg {
                None => Ok(g.count_star()),
                Some(arg) => Ok(format!(
                    "{}({}{})",
                    g.aggregate_name(*func),
                    if *distinct { "DISTINCT " } else { "" },
                    render(g, arg)?
                )),
            }
        }
        Node::Case {
            branches,
            otherwise,
        } => {
            let mut sql = String::from("CASE");
            for (cond, result) in branches {
                sql.push_str(&format!(
                    " WHEN {} THEN {}",
                    render_condition(g, cond)?,
                    render(g, result)?
                ));
            }
            if let Some(e) = otherwise {
                sql.push_str(&format!(" ELSE {}", render(g, e)?));
            }
            sql.push_str(" END");
            Ok(sql)
        }
        Node::Window { func, spec } => render_window(g, func, spec),
        // Predicates returned above.
        _ => render_condition(g, expr),
    }
}

/// Render `expr` where a condition is expected.
pub fn render_condition(g: &dyn SqlGenerator, expr: &Expr) -> CompileResult<String> {
    match expr.node() {
        Node::Literal(Value::Bool(true)) => Ok(g.true_operation()),
        Node::Literal(Value::Bool(false)) | Node::Literal(Value::Null) => Ok(g.false_operation()),
        Node::Compare { op, left, right } => render_compare(g, *op, left, right),
        Node::Logic { op, args } => render_logic(g, *op, args),
        Node::Not(inner) => Ok(g.not(&render_condition(g, inner)?)),
        Node::IsNull { arg, negated } => {
            let value = operand(g, arg)?;
            Ok(if *negated {
                g.is_not_null(&value)
            } else {
                g.is_null(&value)
            })
        }
        Node::In { arg, candidates } => render_in(g, arg, candidates),
        Node::Between { arg, low, high } => {
            // A NULL bound leaves that side open.
            match (low.includes_null(), high.includes_null()) {
                (true, true) => return Ok(g.true_operation()),
                (true, false) => return render_compare(g, CompareOp::Le, arg, high),
                (false, true) => return render_compare(g, CompareOp::Ge, arg, low),
                (false, false) => {}
            }
            let (value, low, high) = (operand(g, arg)?, operand(g, low)?, operand(g, high)?);
            if g.supports_between() {
                Ok(g.between(&value, &low, &high))
            } else {
                Ok(format!(
                    "({v} {ge} {low} {and} {v} {le} {high})",
                    v = value,
                    ge = g.compare_operator(CompareOp::Ge),
                    le = g.compare_operator(CompareOp::Le),
                    and = g.and_keyword(),
                    low = low,
                    high = high
                ))
            }
        }
        Node::Like { arg, pattern } => Ok(g.like(&operand(g, arg)?, &operand(g, pattern)?)),
        Node::Exists(query) => Ok(g.exists(&query.layer().render_subquery(query, g)?)),
        Node::Func { func, args } if func.is_predicate() => render_func(g, *func, args),
        _ => Ok(g.boolean_as_condition(&render(g, expr)?)),
    }
}

/// A child of an infix operator, parenthesized when it could bind wrongly.
fn operand(g: &dyn SqlGenerator, expr: &Expr) -> CompileResult<String> {
    let sql = render(g, expr)?;
    Ok(if needs_parens(expr) {
        format!("({})", sql)
    } else {
        sql
    })
}

fn needs_parens(expr: &Expr) -> bool {
    match expr.node() {
        Node::Func { func, .. } => matches!(
            func,
            Func::Add
                | Func::Subtract
                | Func::Multiply
                | Func::Divide
                | Func::Modulus
                | Func::Negate
                | Func::Concat
                | Func::BitAnd
        ),
        Node::Literal(Value::Int(n)) => *n < 0,
        Node::Literal(Value::Float(f)) => f.is_sign_negative(),
        Node::Literal(Value::Decimal(d)) => d.is_sign_negative(),
        _ => expr.is_predicate(),
    }
}

/// A NULL literal, or `''` where the database stores it as NULL.
fn is_null_operand(g: &dyn SqlGenerator, expr: &Expr) -> bool {
    expr.includes_null() || (g.empty_string_is_null() && expr.is_empty_string())
}

fn render_compare(
    g: &dyn SqlGenerator,
    op: CompareOp,
    left: &Expr,
    right: &Expr,
) -> CompileResult<String> {
    let other = if is_null_operand(g, right) {
        Some(left)
    } else if is_null_operand(g, left) {
        Some(right)
    } else {
        None
    };
    if let Some(other) = other {
        trace!(dialect = g.name(), "comparison with NULL rewritten as IS [NOT] NULL");
        let value = operand(g, other)?;
        return Ok(match op {
            CompareOp::Ne => g.is_not_null(&value),
            _ => g.is_null(&value),
        });
    }
    Ok(format!(
        "{} {} {}",
        operand(g, left)?,
        g.compare_operator(op),
        operand(g, right)?
    ))
}

fn render_logic(g: &dyn SqlGenerator, op: LogicalOp, args: &[Expr]) -> CompileResult<String> {
    let parts = args
        .iter()
        .map(|a| render_condition(g, a))
        .collect::<CompileResult<Vec<_>>>()?;
    Ok(match op {
        LogicalOp::And if parts.is_empty() => g.true_operation(),
        LogicalOp::Or if parts.is_empty() => g.false_operation(),
        LogicalOp::And => parts.join(&format!(" {} ", g.and_keyword())),
        LogicalOp::Or => format!("({})", parts.join(&format!(" {} ", g.or_keyword()))),
    })
}

/// IN, one list per candidate type, split to the dialect's list limit.
/// NULL candidates become `IS NULL`.
fn render_in(g: &dyn SqlGenerator, arg: &Expr, candidates: &[Expr]) -> CompileResult<String> {
    if candidates.is_empty() {
        return Ok(g.false_operation());
    }
    let value = operand(g, arg)?;
    let mut groups: Vec<(ValueType, Vec<String>)> = Vec::new();
    let mut has_null = false;
    for c in candidates {
        if matches!(c.node(), Node::Literal(Value::Null))
            || (g.empty_string_is_null() && c.is_empty_string())
        {
            has_null = true;
            continue;
        }
        let sql = render(g, c)?;
        match groups.iter_mut().find(|(t, _)| *t == c.value_type()) {
            Some((_, items)) => items.push(sql),
            None => groups.push((c.value_type(), vec![sql])),
        }
    }

    let mut parts = Vec::new();
    for (_, items) in &groups {
        match g.max_in_list_size() {
            Some(max) if max > 0 && items.len() > max => {
                trace!(dialect = g.name(), items = items.len(), max, "splitting IN list");
                for chunk in items.chunks(max) {
                    parts.push(g.in_list(&value, chunk));
                }
            }
            _ => parts.push(g.in_list(&value, items)),
        }
    }
    if has_null {
        parts.push(g.is_null(&value));
    }
    Ok(match parts.len() {
        1 => parts.remove(0),
        _ => format!("({})", parts.join(&format!(" {} ", g.or_keyword()))),
    })
}

fn render_literal(g: &dyn SqlGenerator, value: &Value, value_type: ValueType) -> CompileResult<String> {
    Ok(match value {
        Value::Null if value_type == ValueType::Null => g.null_literal(),
        Value::Null => g.typed_null(value_type),
        Value::Bool(b) => g.bool_literal(*b),
        Value::Int(n) => g.integer_literal(*n),
        Value::Float(f) => {
            if !f.is_finite() {
                return Err(CompileError::InvalidValue(format!(
                    "{} has no SQL representation",
                    f
                )));
            }
            g.number_literal(*f)
        }
        Value::Decimal(d) => g.decimal_literal(d),
        Value::String(s) => g.string_literal(s),
        Value::Timestamp(ts) => g.date_literal(ts),
        Value::DateRepeat(r) => {
            if !g.supports_date_repeat() {
                return Err(g.unsupported("date repeats"));
            }
            g.date_repeat_literal(r)?
        }
        Value::Duration(d) => g.duration_literal(&Decimal::new(d.num_milliseconds(), 3).normalize()),
        Value::Point(p) => geometry_literal(g, p.wkt()?)?,
        Value::Line(l) => geometry_literal(g, l.wkt()?)?,
        Value::Polygon(p) => geometry_literal(g, p.wkt()?)?,
        Value::Bytes(b) => g.bytes_literal(b),
    })
}

fn geometry_literal(g: &dyn SqlGenerator, wkt: String) -> CompileResult<String> {
    if !g.supports_geometry() {
        return Err(g.unsupported("geometry"));
    }
    Ok(g.geometry_literal(&wkt))
}

/// Positional access to a function's rendered arguments.
struct Args<'a> {
    g: &'a dyn SqlGenerator,
    func: Func,
    args: &'a [Expr],
}

impl<'a> Args<'a> {
    fn expr(&self, i: usize) -> CompileResult<&'a Expr> {
        self.args
            .get(i)
            .ok_or_else(|| CompileError::arity(self.func.name(), (i + 1).to_string(), self.args.len()))
    }

    fn value(&self, i: usize) -> CompileResult<String> {
        render(self.g, self.expr(i)?)
    }

    fn operand(&self, i: usize) -> CompileResult<String> {
        operand(self.g, self.expr(i)?)
    }

    fn values(&self) -> CompileResult<Vec<String>> {
        self.args.iter().map(|a| render(self.g, a)).collect()
    }
}

fn pi(g: &dyn SqlGenerator) -> String {
    if g.supports_pi() {
        g.pi()
    } else {
        "3.141592653589793".to_string()
    }
}

fn require(g: &dyn SqlGenerator, supported: bool, capability: &str) -> CompileResult<()> {
    if supported {
        Ok(())
    } else {
        Err(g.unsupported(capability))
    }
}

fn render_func(g: &dyn SqlGenerator, func: Func, args: &[Expr]) -> CompileResult<String> {
    let a = Args { g, func, args };
    use Func::*;
    Ok(match func {
        Add => g.add(&a.operand(0)?, &a.operand(1)?),
        Subtract => g.subtract(&a.operand(0)?, &a.operand(1)?),
        Multiply => g.multiply(&a.operand(0)?, &a.operand(1)?),
        Divide => {
            let integral = a.expr(0)?.value_type() == ValueType::Integer
                && a.expr(1)?.value_type() == ValueType::Integer;
            let left = if integral {
                trace!(dialect = g.name(), "widening integer division");
                g.integer_to_number(&a.operand(0)?)
            } else {
                a.operand(0)?
            };
            g.divide(&left, &a.operand(1)?)
        }
        Modulus => {
            if g.supports_modulus_function() {
                g.modulus_function(&a.value(0)?, &a.value(1)?)
            } else {
                g.modulus_operator(&a.operand(0)?, &a.operand(1)?)
            }
        }
        Negate => g.negate(&a.operand(0)?),
        BitAnd => {
            require(g, g.supports_bitwise_and(), "bitwise AND")?;
            g.bitwise_and(&a.operand(0)?, &a.operand(1)?)
        }
        Abs => g.abs(&a.value(0)?),
        Sign => g.sign(&a.value(0)?),
        Ceil => g.ceil(&a.value(0)?),
        Floor => g.floor(&a.value(0)?),
        Round => {
            if g.supports_round() {
                g.round(&a.value(0)?)
            } else {
                trace!(dialect = g.name(), "ROUND emulated with FLOOR");
                g.floor(&format!("{} + 0.5", a.operand(0)?))
            }
        }
        RoundTo => g.round_to(&a.value(0)?, &a.value(1)?),
        Truncate => g.truncate(&a.value(0)?),
        Sqrt => g.sqrt(&a.value(0)?),
        Power => g.power(&a.value(0)?, &a.value(1)?),
        Exp => g.exp(&a.value(0)?),
        Ln => g.ln(&a.value(0)?),
        Log10 => g.log10(&a.value(0)?),
        Sin => g.sin(&a.value(0)?),
        Cos => g.cos(&a.value(0)?),
        Tan => g.tan(&a.value(0)?),
        Asin => g.asin(&a.value(0)?),
        Acos => g.acos(&a.value(0)?),
        Atan => g.atan(&a.value(0)?),
        Atan2 => g.atan2(&a.value(0)?, &a.value(1)?),
        Cot => {
            if g.supports_cot() {
                g.cot(&a.value(0)?)
            } else {
                trace!(dialect = g.name(), "COT emulated with TAN");
                format!("(1 / {})", g.tan(&a.value(0)?))
            }
        }
        Sinh | Cosh | Tanh if !g.supports_hyperbolic() => {
            trace!(dialect = g.name(), func = func.name(), "hyperbolic function emulated with EXP");
            let x = a.operand(0)?;
            let pos = g.exp(&x);
            let neg = g.exp(&format!("-{}", x));
            match func {
                Sinh => format!("(({} - {}) / 2)", pos, neg),
                Cosh => format!("(({} + {}) / 2)", pos, neg),
                _ => format!("(({p} - {n}) / ({p} + {n}))", p = pos, n = neg),
            }
        }
        Sinh => g.sinh(&a.value(0)?),
        Cosh => g.cosh(&a.value(0)?),
        Tanh => g.tanh(&a.value(0)?),
        Degrees => {
            if g.supports_degrees() {
                g.degrees(&a.value(0)?)
            } else {
                format!("({} * 180 / {})", a.operand(0)?, pi(g))
            }
        }
        Radians => {
            if g.supports_degrees() {
                g.radians(&a.value(0)?)
            } else {
                format!("({} * {} / 180)", a.operand(0)?, pi(g))
            }
        }
        Pi => pi(g),
        Random => g.random(),
        Greatest | Least => {
            let values = a.values()?;
            if g.supports_greatest_least() {
                if func == Greatest {
                    g.greatest(&values)
                } else {
                    g.least(&values)
                }
            } else {
                trace!(dialect = g.name(), func = func.name(), "folded into CASE");
                let op = g.compare_operator(if func == Greatest {
                    CompareOp::Gt
                } else {
                    CompareOp::Lt
                });
                let mut iter = values.into_iter();
                let first = iter.next().unwrap_or_else(|| g.null_literal());
                iter.fold(first, |acc, next| {
                    format!(
                        "CASE WHEN {n} {op} {acc} THEN {n} ELSE {acc} END",
                        n = next,
                        op = op,
                        acc = acc
                    )
                })
            }
        }
        Coalesce => g.coalesce(&a.values()?),
        NullIf => g.null_if(&a.value(0)?, &a.value(1)?),
        ToStringValue => g.to_string_value(&a.value(0)?, a.expr(0)?.value_type()),
        ToNumber => g.to_number(&a.value(0)?),
        ToInteger => g.to_integer(&a.value(0)?),
        BooleanToInteger => format!(
            "CASE WHEN {} THEN 1 ELSE 0 END",
            render_condition(g, a.expr(0)?)?
        ),
        Lower => g.lower(&a.value(0)?),
        Upper => g.upper(&a.value(0)?),
        Trim => g.trim(&a.value(0)?),
        LeftTrim => g.left_trim(&a.value(0)?),
        RightTrim => g.right_trim(&a.value(0)?),
        Length => g.length(&a.value(0)?),
        Substring => {
            let length = match args.get(2) {
                Some(e) => Some(render(g, e)?),
                None => None,
            };
            g.substring(&a.value(0)?, &a.value(1)?, length.as_deref())
        }
        Position => g.position(&a.value(0)?, &a.value(1)?),
        Replace => g.replace(&a.value(0)?, &a.value(1)?, &a.value(2)?),
        Concat => {
            let parts = args
                .iter()
                .map(|e| operand(g, e))
                .collect::<CompileResult<Vec<_>>>()?;
            g.concat(&parts)
        }
        RegexMatch => {
            require(g, g.supports_regex(), "regular expressions")?;
            g.regex_match(&a.operand(0)?, &a.operand(1)?)
        }
        CurrentDate => g.current_date(),
        CurrentTimestamp => g.current_timestamp(),
        DatePart(unit) => g.date_part(unit, &a.value(0)?),
        DayOfWeek => g.day_of_week(&a.value(0)?),
        DateAdd(DateUnit::Week) => {
            trace!(dialect = g.name(), "weeks added as days");
            g.date_add(
                DateUnit::Day,
                &a.operand(0)?,
                &format!("{} * 7", a.operand(1)?),
            )
        }
        DateAdd(unit) => g.date_add(unit, &a.operand(0)?, &a.operand(1)?),
        DateDiff(DateUnit::Week) => {
            trace!(dialect = g.name(), "weeks counted as days");
            let days = g.date_diff(DateUnit::Day, &a.operand(0)?, &a.operand(1)?)?;
            g.floor(&format!("{} / 7", days))
        }
        DateDiff(unit) => g.date_diff(unit, &a.operand(0)?, &a.operand(1)?)?,
        EndOfMonth => g.end_of_month(&a.value(0)?)?,
        StartOfDay => g.start_of_day(&a.value(0)?),
        DateAddRepeat => {
            require(g, g.supports_date_repeat(), "date repeats")?;
            g.date_add_repeat(&a.operand(0)?, &a.operand(1)?)
        }
        DateSubtractRepeat => {
            require(g, g.supports_date_repeat(), "date repeats")?;
            g.date_subtract_repeat(&a.operand(0)?, &a.operand(1)?)
        }
        RepeatBetween => {
            require(g, g.supports_date_repeat(), "date repeats")?;
            g.repeat_between(&a.value(0)?, &a.value(1)?)
        }
        RepeatPart(unit) => {
            require(g, g.supports_date_repeat(), "date repeats")?;
            g.repeat_part(unit, &a.value(0)?)
        }
        DurationBetween => g.date_diff(DateUnit::Second, &a.operand(0)?, &a.operand(1)?)?,
        DateAddDuration => g.date_add(DateUnit::Second, &a.operand(0)?, &a.operand(1)?),
        DurationSeconds => a.value(0)?,
        MakePoint | PointX | PointY | Distance | GeomEquals | Contains | Intersects | Area
        | LineLength | Bound(_) | AsText
            if !g.supports_geometry() =>
        {
            return Err(g.unsupported("geometry"));
        }
        MakePoint => g.make_point(&a.value(0)?, &a.value(1)?),
        PointX => g.point_x(&a.value(0)?),
        PointY => g.point_y(&a.value(0)?),
        Distance => g.distance(&a.value(0)?, &a.value(1)?),
        GeomEquals => g.geometry_equals(&a.value(0)?, &a.value(1)?),
        Contains => g.contains(&a.value(0)?, &a.value(1)?),
        Intersects => g.intersects(&a.value(0)?, &a.value(1)?),
        Area => g.area(&a.value(0)?),
        LineLength => g.line_length(&a.value(0)?),
        Bound(bound) => g.geometry_bound(bound, &a.value(0)?),
        AsText => g.as_text(&a.value(0)?),
        RowNumber | Rank | DenseRank | PercentRank | CumeDist | Ntile | Lag | Lead
        | FirstValue | LastValue | NthValue => {
            return Err(CompileError::InvalidValue(format!(
                "{} is only valid inside a window",
                func.name()
            )));
        }
    })
}

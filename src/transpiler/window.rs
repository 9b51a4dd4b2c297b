//! OVER clauses and sort keys.

use crate::ast::window::{FrameBound, FrameKind, NullsOrder, WindowOrder};
use crate::ast::{Expr, Func, Node, SortKey, WindowSpec};
use crate::error::{CompileError, CompileResult};
use crate::transpiler::expr::render;
use crate::transpiler::traits::SqlGenerator;

/// `func OVER (...)`. Only aggregates and window-only functions qualify.
pub(crate) fn render_window(
    g: &dyn SqlGenerator,
    func: &Expr,
    spec: &WindowSpec,
) -> CompileResult<String> {
    if !g.supports_window_functions() {
        return Err(g.unsupported("window functions"));
    }
    let func_sql = match func.node() {
        Node::Aggregate { .. } => render(g, func)?,
        Node::Func { func: f, args } if f.is_window_only() => window_function(g, *f, args)?,
        _ => {
            return Err(CompileError::InvalidValue(
                "only aggregates and window functions can take an OVER clause".to_string(),
            ));
        }
    };
    Ok(format!("{} OVER ({})", func_sql, over_clause(g, spec)?))
}

fn window_function(g: &dyn SqlGenerator, func: Func, args: &[Expr]) -> CompileResult<String> {
    let args = args
        .iter()
        .map(|a| render(g, a))
        .collect::<CompileResult<Vec<_>>>()?;
    Ok(format!("{}({})", func.name(), args.join(", ")))
}

fn over_clause(g: &dyn SqlGenerator, spec: &WindowSpec) -> CompileResult<String> {
    let mut parts = Vec::new();

    if !spec.partition.is_empty() {
        let cols = spec
            .partition
            .iter()
            .map(|e| render(g, e))
            .collect::<CompileResult<Vec<_>>>()?;
        parts.push(format!("PARTITION BY {}", cols.join(", ")));
    }

    match &spec.order {
        WindowOrder::Keys(keys) if !keys.is_empty() => {
            parts.push(format!("{} {}", g.order_by_keyword(), render_sort_keys(g, keys)?));
        }
        WindowOrder::Unordered | WindowOrder::Keys(_) if spec.frame.is_none() => {}
        // A frame needs an ORDER BY.
        _ => parts.push(format!("{} {}", g.order_by_keyword(), g.window_constant_order())),
    }

    if let Some(frame) = &spec.frame {
        if frame.kind == FrameKind::Groups && !g.supports_groups_frame() {
            return Err(g.unsupported("GROUPS frames"));
        }
        parts.push(format!(
            "{} BETWEEN {} AND {}",
            frame.kind.keyword(),
            frame_bound(frame.start),
            frame_bound(frame.end)
        ));
    }

    Ok(parts.join(" "))
}

fn frame_bound(bound: FrameBound) -> String {
    match bound {
        FrameBound::UnboundedPreceding => "UNBOUNDED PRECEDING".to_string(),
        FrameBound::Preceding(n) => format!("{} PRECEDING", n),
        FrameBound::CurrentRow => "CURRENT ROW".to_string(),
        FrameBound::Following(n) => format!("{} FOLLOWING", n),
        FrameBound::UnboundedFollowing => "UNBOUNDED FOLLOWING".to_string(),
    }
}

/// One ORDER BY term. Without native NULLS FIRST/LAST a CASE key is
/// prepended to place the NULLs.
pub fn render_sort_key(g: &dyn SqlGenerator, key: &SortKey) -> CompileResult<String> {
    let value = render(g, &key.expr)?;
    let direction = g.sort_direction(key.direction);
    Ok(match key.nulls {
        None => format!("{} {}", value, direction),
        Some(nulls) if g.supports_nulls_ordering() => {
            format!("{} {} {}", value, direction, g.nulls_ordering(nulls))
        }
        Some(nulls) => {
            let (null_rank, other_rank) = match nulls {
                NullsOrder::First => (0, 1),
                NullsOrder::Last => (1, 0),
            };
            format!(
                "CASE WHEN {} THEN {} ELSE {} END, {} {}",
                g.is_null(&value),
                null_rank,
                other_rank,
                value,
                direction
            )
        }
    })
}

pub fn render_sort_keys(g: &dyn SqlGenerator, keys: &[SortKey]) -> CompileResult<String> {
    let keys = keys
        .iter()
        .map(|k| render_sort_key(g, k))
        .collect::<CompileResult<Vec<_>>>()?;
    Ok(keys.join(", "))
}

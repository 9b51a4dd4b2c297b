//! Nested queries behind EXISTS.

use std::fmt::Debug;

use crate::ast::ExistsQuery;
use crate::error::CompileResult;
use crate::transpiler::traits::SqlGenerator;

/// Renders the SELECT inside `EXISTS (...)`.
///
/// Kept behind a trait so callers with their own query builder can emit the
/// nested statement themselves.
pub trait QueryLayer: Debug + Send + Sync {
    fn render_subquery(&self, query: &ExistsQuery, g: &dyn SqlGenerator) -> CompileResult<String>;
}

/// Joins copies of both tables and ties the outer copy back to the
/// enclosing row by primary key:
///
/// `SELECT o.ID FROM A o INNER JOIN B i ON o.ID = i.A_ID WHERE o.ID = a.ID`
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrelatedQueryLayer;

impl QueryLayer for CorrelatedQueryLayer {
    fn render_subquery(&self, query: &ExistsQuery, g: &dyn SqlGenerator) -> CompileResult<String> {
        let projection: Vec<String> = query
            .projection()?
            .iter()
            .map(|c| c.to_sql_with(g))
            .collect();
        let on: Vec<String> = query
            .join_columns()?
            .iter()
            .map(|(o, i)| format!("{} = {}", o.to_sql_with(g), i.to_sql_with(g)))
            .collect();
        let correlation: Vec<String> = query
            .correlation()?
            .iter()
            .map(|(copy, original)| {
                format!("{} = {}", copy.to_sql_with(g), original.to_sql_with(g))
            })
            .collect();
        let and = format!(" {} ", g.and_keyword());

        Ok(format!(
            "{} {} {} {} {} {} ON {} {} {}",
            g.select_keyword(),
            projection.join(", "),
            g.from_keyword(),
            g.from_clause_entry(query.outer_copy()),
            g.inner_join(),
            g.from_clause_entry(query.inner_copy()),
            on.join(&and),
            g.where_keyword(),
            correlation.join(&and)
        ))
    }
}

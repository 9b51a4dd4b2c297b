//! Configured entry point for compiling expressions.

use tracing::{debug, warn};

use crate::ast::{Clause, ColumnRef, Condition, Expr, SortKey};
use crate::config::CompilerConfig;
use crate::error::CompileResult;
use crate::transpiler::expr::{render, render_condition};
use crate::transpiler::window::render_sort_keys;
use crate::transpiler::{Dialect, SqlGenerator};

/// Compiles expressions for one dialect.
///
/// ```ignore
/// let compiler = SqlCompiler::new(Dialect::Postgres);
/// let sql = compiler.compile_condition(&age.is_greater_than(18))?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SqlCompiler {
    dialect: Dialect,
    log_sql: bool,
    use_table_alias: bool,
}

impl SqlCompiler {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            log_sql: false,
            use_table_alias: true,
        }
    }

    pub fn from_config(config: &CompilerConfig) -> CompileResult<Self> {
        let dialect = config.dialect.parse::<Dialect>().inspect_err(|e| {
            warn!(dialect = %config.dialect, error = %e, "unknown dialect in compiler config");
        })?;
        Ok(Self {
            dialect,
            log_sql: config.log_sql,
            use_table_alias: config.use_table_alias,
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn generator(&self) -> &'static dyn SqlGenerator {
        self.dialect.generator()
    }

    fn prepare(&self, expr: &Expr) -> Expr {
        if self.use_table_alias {
            expr.clone()
        } else {
            expr.clone().map_columns(&mut ColumnRef::without_table_alias)
        }
    }

    fn emit(&self, kind: &'static str, sql: String) -> String {
        if self.log_sql {
            debug!(dialect = %self.dialect, kind, sql = %sql, "compiled");
        }
        sql
    }

    /// Value form: predicates are turned into a boolean value where the
    /// dialect has no boolean type.
    pub fn compile(&self, expr: impl AsRef<Expr>) -> CompileResult<String> {
        let sql = render(self.generator(), &self.prepare(expr.as_ref()))?;
        Ok(self.emit("value", sql))
    }

    /// Condition form, for WHERE and HAVING.
    pub fn compile_condition(&self, expr: impl AsRef<Expr>) -> CompileResult<String> {
        let sql = render_condition(self.generator(), &self.prepare(expr.as_ref()))?;
        Ok(self.emit("condition", sql))
    }

    pub fn compile_operator_condition(&self, condition: &Condition) -> CompileResult<String> {
        self.compile_condition(condition.to_expr()?)
    }

    /// The ORDER BY list, without the keyword.
    pub fn compile_sort(&self, keys: &[SortKey]) -> CompileResult<String> {
        let keys: Vec<SortKey> = keys
            .iter()
            .map(|k| SortKey {
                expr: self.prepare(&k.expr),
                direction: k.direction,
                nulls: k.nulls,
            })
            .collect();
        let sql = render_sort_keys(self.generator(), &keys)?;
        Ok(self.emit("sort", sql))
    }

    /// Which clause a filter on `expr` belongs in.
    pub fn where_or_having(&self, expr: impl AsRef<Expr>) -> Clause {
        expr.as_ref().placement()
    }
}

impl Default for SqlCompiler {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::IntegerExpr;
    use crate::ast::ValueType;
    use crate::error::CompileError;
    use crate::typed::{FieldDef, RowDef};

    fn people() -> RowDef {
        RowDef::builder("PEOPLE")
            .alias("p")
            .field(FieldDef::new("ID", ValueType::Integer).primary_key())
            .field(FieldDef::new("AGE", ValueType::Integer))
            .build()
    }

    #[test]
    fn test_from_config_resolves_alias() {
        let config = CompilerConfig::builder().dialect("pg").build();
        let compiler = SqlCompiler::from_config(&config).unwrap();
        assert_eq!(compiler.dialect(), Dialect::Postgres);
    }

    #[test]
    fn test_from_config_unknown_dialect() {
        let config = CompilerConfig::builder().dialect("postgress").build();
        let err = SqlCompiler::from_config(&config).unwrap_err();
        assert!(matches!(err, CompileError::UnknownDialect { .. }));
    }

    #[test]
    fn test_table_name_instead_of_alias() {
        let row = people();
        let age = IntegerExpr::column(&row, "AGE").unwrap();
        let cond = age.is_greater_than(18);

        let aliased = SqlCompiler::new(Dialect::Standard);
        assert_eq!(aliased.compile_condition(&cond).unwrap(), "p.AGE > 18");

        let config = CompilerConfig::builder().use_table_alias(false).build();
        let plain = SqlCompiler::from_config(&config).unwrap();
        assert_eq!(plain.compile_condition(&cond).unwrap(), "PEOPLE.AGE > 18");
    }

    #[test]
    fn test_where_or_having() {
        let row = people();
        let age = IntegerExpr::column(&row, "AGE").unwrap();
        let compiler = SqlCompiler::default();
        assert_eq!(compiler.where_or_having(age.is_greater_than(1)), Clause::Where);
        assert_eq!(compiler.where_or_having(age.sum().is_greater_than(1)), Clause::Having);
    }
}

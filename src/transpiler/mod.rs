//! SQL emission.
//!
//! Turns expressions, conditions and sort keys into SQL text for one of the
//! supported dialects. Everything dialect specific goes through a
//! [`SqlGenerator`]; the rest of this module only decides which hooks to call
//! and how to compose them when a dialect lacks a capability.

pub mod conditions;
pub mod dialect;
pub mod expr;
pub mod query;
pub mod sql;
pub mod traits;
pub mod window;

#[cfg(test)]
mod tests;

pub use dialect::Dialect;
pub use query::{CorrelatedQueryLayer, QueryLayer};
pub use traits::{java_hash, needs_quoting, quote_string, SqlGenerator, RESERVED_WORDS};

use crate::error::CompileResult;

/// Trait for converting AST nodes to SQL.
pub trait ToSql {
    /// Render with an explicit generator.
    fn to_sql_with(&self, generator: &dyn SqlGenerator) -> CompileResult<String>;

    /// Render for the ANSI standard dialect.
    fn to_sql(&self) -> CompileResult<String> {
        self.to_sql_with(Dialect::default().generator())
    }

    fn to_sql_with_dialect(&self, dialect: Dialect) -> CompileResult<String> {
        self.to_sql_with(dialect.generator())
    }
}

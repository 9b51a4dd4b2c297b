//! # sqlweave
//!
//! Typed SQL expressions compiled for many database dialects.
//!
//! Expressions are built against table definitions, checked for type
//! compatibility as they are composed, and rendered to SQL text by a
//! per-dialect generator. Capabilities a dialect lacks are either
//! synthesized from simpler SQL or reported as errors.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use sqlweave::prelude::*;
//!
//! let people = RowDef::builder("PEOPLE")
//!     .field(FieldDef::new("NAME", ValueType::String))
//!     .field(FieldDef::new("AGE", ValueType::Integer))
//!     .build();
//!
//! let name = StringExpr::column(&people, "NAME")?;
//! let age = IntegerExpr::column(&people, "AGE")?;
//! let adults = name.lower().is("alice").and(age.is_greater_than_or_equal(18));
//!
//! let sql = adults.to_sql_with_dialect(Dialect::Postgres)?;
//! ```

pub mod ast;
pub mod compiler;
pub mod config;
pub mod error;
pub mod transpiler;
pub mod typed;

pub mod prelude {
    pub use crate::ast::builders::*;
    pub use crate::ast::window::{SortDirection, SortKey, Window};
    pub use crate::ast::{
        Clause, Condition, DateRepeat, DateUnit, ExistsQuery, Expr, Line2D, Operator, Point2D,
        Polygon2D, Value, ValueType,
    };
    pub use crate::compiler::SqlCompiler;
    pub use crate::config::CompilerConfig;
    pub use crate::error::{CompileError, CompileResult};
    pub use crate::transpiler::{Dialect, SqlGenerator, ToSql};
    pub use crate::typed::{FieldDef, RowDef};
}

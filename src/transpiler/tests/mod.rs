//! Transpiler test modules.
//!
//! Tests are organized by category:
//! - `core`: comparisons, logic, IN lists, CASE and arithmetic
//! - `dialects`: output that differs between dialects
//! - `operators`: operator expansion into conditions
//! - `window`: OVER clauses and sort keys

mod core;
mod dialects;
mod operators;

use crate::ast::ValueType;
use crate::typed::{FieldDef, RowDef};

/// PEOPLE aliased `p`.
pub(super) fn people() -> RowDef {
    RowDef::builder("PEOPLE")
        .alias("p")
        .field(FieldDef::new("ID", ValueType::Integer).primary_key())
        .field(FieldDef::new("NAME", ValueType::String))
        .field(FieldDef::new("AGE", ValueType::Integer))
        .field(FieldDef::new("SCORE", ValueType::Number))
        .field(FieldDef::new("ACTIVE", ValueType::Boolean))
        .field(FieldDef::new("BORN", ValueType::Date))
        .build()
}

/// ORDERS aliased `o`.
pub(super) fn orders() -> RowDef {
    RowDef::builder("ORDERS")
        .alias("o")
        .field(FieldDef::new("ID", ValueType::Integer).primary_key())
        .field(FieldDef::new("PERSON_ID", ValueType::Integer))
        .field(FieldDef::new("AMOUNT", ValueType::Number))
        .field(FieldDef::new("PLACED", ValueType::Date))
        .build()
}

//! Row and field definitions that column references bind to.
//!
//! Every `RowDef` is one *instance* of a table: two definitions of the same
//! table (say, a self join) are different rows, and a field handle taken from
//! one cannot be used with the other.
//!
//! # Example
//! ```ignore
//! use sqlweave::prelude::*;
//!
//! let customer = RowDef::builder("CUSTOMER")
//!     .field(FieldDef::new("ID", ValueType::Integer).primary_key())
//!     .field(FieldDef::new("NAME", ValueType::String))
//!     .build();
//! let name = StringExpr::column(&customer, "NAME")?;
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::ast::ValueType;
use crate::error::{CompileError, CompileResult};

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

fn next_instance() -> u64 {
    NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed)
}

/// Trait for application row types.
///
/// Implementors describe their table once; `row()` mints a fresh instance.
pub trait Table {
    /// The table name as a static string.
    fn table_name() -> &'static str;

    /// Field declarations in column order.
    fn fields() -> Vec<FieldDef>;

    /// Get table name (instance method for convenience)
    fn name(&self) -> &'static str {
        Self::table_name()
    }

    fn row() -> RowDef {
        Self::fields()
            .into_iter()
            .fold(RowDef::builder(Self::table_name()), |b, f| b.field(f))
            .build()
    }
}

/// Declared shape of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    name: String,
    value_type: ValueType,
    nullable: bool,
    primary_key: bool,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            nullable: true,
            primary_key: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Mark as (part of) the primary key. Implies NOT NULL.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }
}

/// Handle to a field of one specific row instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldRef {
    instance: u64,
    index: usize,
}

impl FieldRef {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn instance(&self) -> u64 {
        self.instance
    }
}

/// Identity of a table instance, as reported by `tables_involved()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableRef {
    pub name: String,
    pub instance: u64,
}

#[derive(Debug)]
struct RowInner {
    instance: u64,
    table: String,
    alias: Option<String>,
    alias_seed: String,
    fields: Vec<FieldDef>,
}

/// One instance of a table definition. Cheap to clone; clones share identity.
#[derive(Debug, Clone)]
pub struct RowDef {
    inner: Arc<RowInner>,
}

impl PartialEq for RowDef {
    fn eq(&self, other: &Self) -> bool {
        self.inner.instance == other.inner.instance
    }
}

impl Eq for RowDef {}

impl RowDef {
    pub fn builder(table: impl Into<String>) -> RowDefBuilder {
        RowDefBuilder {
            table: table.into(),
            alias: None,
            fields: Vec::new(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.inner.table
    }

    /// Explicit alias, if one was given.
    pub fn alias(&self) -> Option<&str> {
        self.inner.alias.as_deref()
    }

    /// Text hashed into the generated alias when no explicit alias exists.
    pub fn alias_seed(&self) -> &str {
        &self.inner.alias_seed
    }

    pub fn instance(&self) -> u64 {
        self.inner.instance
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.inner.fields
    }

    pub fn table_ref(&self) -> TableRef {
        TableRef {
            name: self.inner.table.clone(),
            instance: self.inner.instance,
        }
    }

    /// Look a field up by column name.
    pub fn field(&self, name: &str) -> CompileResult<FieldRef> {
        self.inner
            .fields
            .iter()
            .position(|f| f.name == name)
            .map(|index| FieldRef {
                instance: self.inner.instance,
                index,
            })
            .ok_or_else(|| CompileError::UnknownField {
                table: self.inner.table.clone(),
                field: name.to_string(),
            })
    }

    /// Resolve a handle, failing if it was taken from another instance.
    pub fn field_def(&self, field: FieldRef) -> CompileResult<&FieldDef> {
        let def = self.inner.fields.get(field.index);
        match def {
            Some(def) if field.instance == self.inner.instance => Ok(def),
            _ => Err(CompileError::AmbiguousRow {
                table: self.inner.table.clone(),
                field: def
                    .map(|d| d.name.clone())
                    .unwrap_or_else(|| format!("#{}", field.index)),
            }),
        }
    }

    pub fn primary_keys(&self) -> Vec<FieldRef> {
        self.inner
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.primary_key)
            .map(|(index, _)| FieldRef {
                instance: self.inner.instance,
                index,
            })
            .collect()
    }

    /// A fresh instance of the same table, distinguishable in SQL by `suffix`.
    pub fn copy_with_suffix(&self, suffix: &str) -> RowDef {
        RowDef {
            inner: Arc::new(RowInner {
                instance: next_instance(),
                table: self.inner.table.clone(),
                alias: self.inner.alias.as_ref().map(|a| format!("{}{}", a, suffix)),
                alias_seed: format!("{}{}", self.inner.alias_seed, suffix),
                fields: self.inner.fields.clone(),
            }),
        }
    }
}

pub struct RowDefBuilder {
    table: String,
    alias: Option<String>,
    fields: Vec<FieldDef>,
}

impl RowDefBuilder {
    /// Use this alias verbatim instead of a generated one.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> RowDef {
        RowDef {
            inner: Arc::new(RowInner {
                instance: next_instance(),
                alias_seed: self.table.clone(),
                table: self.table,
                alias: self.alias,
                fields: self.fields,
            }),
        }
    }
}

/// Trait for things that can name a field of a row.
pub trait IntoField {
    fn resolve(self, row: &RowDef) -> CompileResult<FieldRef>;
}

impl IntoField for &str {
    fn resolve(self, row: &RowDef) -> CompileResult<FieldRef> {
        row.field(self)
    }
}

impl IntoField for String {
    fn resolve(self, row: &RowDef) -> CompileResult<FieldRef> {
        row.field(&self)
    }
}

impl IntoField for &String {
    fn resolve(self, row: &RowDef) -> CompileResult<FieldRef> {
        row.field(self)
    }
}

impl IntoField for FieldRef {
    fn resolve(self, row: &RowDef) -> CompileResult<FieldRef> {
        row.field_def(self)?;
        Ok(self)
    }
}

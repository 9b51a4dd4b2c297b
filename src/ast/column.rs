use crate::ast::ValueType;
use crate::error::CompileResult;
use crate::transpiler::SqlGenerator;
use crate::typed::{FieldDef, FieldRef, IntoField, RowDef, TableRef};

/// A field of one row instance, as it appears in SQL.
#[derive(Debug, Clone)]
pub struct ColumnRef {
    row: RowDef,
    field: FieldRef,
    use_table_alias: bool,
}

impl PartialEq for ColumnRef {
    fn eq(&self, other: &Self) -> bool {
        self.row == other.row
            && self.field == other.field
            && self.use_table_alias == other.use_table_alias
    }
}

impl ColumnRef {
    /// Bind to `field` of `row`. Fails if the field belongs to another instance.
    pub fn new(row: &RowDef, field: impl IntoField) -> CompileResult<Self> {
        let field = field.resolve(row)?;
        Ok(Self {
            row: row.clone(),
            field,
            use_table_alias: true,
        })
    }

    /// Render as `TABLE.COLUMN` rather than `alias.COLUMN`.
    pub fn without_table_alias(mut self) -> Self {
        self.use_table_alias = false;
        self
    }

    pub fn uses_table_alias(&self) -> bool {
        self.use_table_alias
    }

    pub fn row(&self) -> &RowDef {
        &self.row
    }

    pub fn field_ref(&self) -> FieldRef {
        self.field
    }

    pub fn field(&self) -> &FieldDef {
        // Resolved against this row at construction.
        &self.row.fields()[self.field.index()]
    }

    pub fn name(&self) -> &str {
        self.field().name()
    }

    pub fn value_type(&self) -> ValueType {
        self.field().value_type()
    }

    pub fn is_nullable(&self) -> bool {
        self.field().is_nullable()
    }

    pub fn is_primary_key(&self) -> bool {
        self.field().is_primary_key()
    }

    pub fn table_ref(&self) -> TableRef {
        self.row.table_ref()
    }

    /// Same field on another instance of the same table.
    pub fn rebind(&self, row: &RowDef) -> CompileResult<Self> {
        let mut col = ColumnRef::new(row, self.name())?;
        col.use_table_alias = self.use_table_alias;
        Ok(col)
    }

    pub fn to_sql_with(&self, generator: &dyn SqlGenerator) -> String {
        let qualifier = if self.use_table_alias {
            generator.table_alias(&self.row)
        } else {
            generator.format_table_name(self.row.table_name())
        };
        generator.table_and_column(&qualifier, &generator.format_column_name(self.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileError;
    use crate::transpiler::Dialect;

    fn people() -> RowDef {
        RowDef::builder("PEOPLE")
            .alias("p")
            .field(FieldDef::new("NAME", ValueType::String))
            .field(FieldDef::new("AGE", ValueType::Integer).not_null())
            .build()
    }

    #[test]
    fn test_column_with_explicit_alias() {
        let row = people();
        let col = ColumnRef::new(&row, "NAME").unwrap();
        assert_eq!(col.to_sql_with(Dialect::Standard.generator()), "p.NAME");
        assert!(col.is_nullable());
    }

    #[test]
    fn test_without_table_alias() {
        let row = people();
        let col = ColumnRef::new(&row, "AGE").unwrap().without_table_alias();
        assert_eq!(col.to_sql_with(Dialect::Standard.generator()), "PEOPLE.AGE");
    }

    #[test]
    fn test_field_from_other_row_rejected() {
        let a = people();
        let b = people();
        let field = a.field("NAME").unwrap();
        assert!(matches!(
            ColumnRef::new(&b, field),
            Err(CompileError::AmbiguousRow { .. })
        ));
    }

    #[test]
    fn test_rebind_keeps_flag() {
        let a = people();
        let b = a.copy_with_suffix("_2");
        let col = ColumnRef::new(&a, "AGE").unwrap().without_table_alias();
        let moved = col.rebind(&b).unwrap();
        assert!(!moved.uses_table_alias());
        assert_eq!(moved.row(), &b);
    }
}

//! SQL Dialect tests (Postgres, MySQL, SQL Server, Oracle, etc.)

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use super::people;
use crate::ast::builders::{BooleanExpr, DateExpr, IntegerExpr, NumberExpr, StringExpr};
use crate::ast::{ColumnRef, Expr, Point2D, Value, ValueType, Window};
use crate::compiler::SqlCompiler;
use crate::error::CompileError;
use crate::transpiler::{Dialect, ToSql};
use crate::typed::{FieldDef, RowDef};

#[test]
fn test_postgres_lower_cases_identifiers() {
    let name = StringExpr::column(&people(), "NAME").unwrap();
    assert_eq!(
        name.is("Alice").to_sql_with_dialect(Dialect::Postgres).unwrap(),
        "p.name = 'Alice'"
    );
}

#[test]
fn test_reserved_word_is_quoted_per_dialect() {
    let row = RowDef::builder("ITEMS")
        .alias("i")
        .field(FieldDef::new("ORDER", ValueType::Integer))
        .build();
    let order = IntegerExpr::column(&row, "ORDER").unwrap();
    assert_eq!(order.to_sql().unwrap(), "i.\"ORDER\"");
    assert_eq!(order.to_sql_with_dialect(Dialect::MySQL).unwrap(), "i.`ORDER`");
    assert_eq!(
        order.to_sql_with_dialect(Dialect::SqlServer).unwrap(),
        "i.[ORDER]"
    );
}

#[test]
fn test_mysql_dialect() {
    let name = StringExpr::column(&people(), "NAME").unwrap();
    let age = IntegerExpr::column(&people(), "AGE").unwrap();
    assert_eq!(
        name.append("!").to_sql_with_dialect(Dialect::MySQL).unwrap(),
        "CONCAT(p.NAME, '!')"
    );
    assert_eq!(
        age.divided_by(2).to_sql_with_dialect(Dialect::MySQL).unwrap(),
        "p.AGE / 2"
    );
    assert_eq!(
        name.is("a\\b").to_sql_with_dialect(Dialect::MySQL).unwrap(),
        "p.NAME = 'a\\\\b'"
    );
}

#[test]
fn test_sqlserver_dialect() {
    let name = StringExpr::column(&people(), "NAME").unwrap();
    let age = IntegerExpr::column(&people(), "AGE").unwrap();
    let d = Dialect::SqlServer;
    assert_eq!(name.is("Alice").to_sql_with_dialect(d).unwrap(), "p.NAME = N'Alice'");
    assert_eq!(name.length().to_sql_with_dialect(d).unwrap(), "LEN(p.NAME)");
    assert_eq!(name.append("!").to_sql_with_dialect(d).unwrap(), "p.NAME + N'!'");
    assert_eq!(age.modulus(2).to_sql_with_dialect(d).unwrap(), "p.AGE % 2");
}

#[test]
fn test_no_boolean_type() {
    let age = IntegerExpr::column(&people(), "AGE").unwrap();
    let active = BooleanExpr::column(&people(), "ACTIVE").unwrap();
    let compiler = SqlCompiler::new(Dialect::SqlServer);

    assert_eq!(
        compiler.compile(age.is_greater_than(1)).unwrap(),
        "CASE WHEN p.AGE > 1 THEN 1 ELSE 0 END"
    );
    assert_eq!(compiler.compile_condition(&active).unwrap(), "p.ACTIVE = 1");
    assert_eq!(compiler.compile(BooleanExpr::always_true()).unwrap(), "1");

    let standard = SqlCompiler::new(Dialect::Standard);
    assert_eq!(standard.compile_condition(&active).unwrap(), "p.ACTIVE");
}

#[test]
fn test_oracle_empty_string_is_null() {
    let name = StringExpr::column(&people(), "NAME").unwrap();
    assert_eq!(
        name.is("").to_sql_with_dialect(Dialect::Oracle12).unwrap(),
        "p.NAME IS NULL"
    );
    assert_eq!(
        name.is_not("").to_sql_with_dialect(Dialect::Oracle12).unwrap(),
        "p.NAME IS NOT NULL"
    );
    assert_eq!(name.is("").to_sql().unwrap(), "p.NAME = ''");
}

#[test]
fn test_oracle_splits_long_in_lists() {
    let age = IntegerExpr::column(&people(), "AGE").unwrap();
    let cond = age.is_in(0..1001);
    let sql = cond.to_sql_with_dialect(Dialect::Oracle12).unwrap();
    assert_eq!(sql.matches(" IN (").count(), 2);
    assert!(sql.starts_with("(p.AGE IN (0, 1, "));
    assert!(sql.ends_with(" OR p.AGE IN (1000))"));

    let sql = cond.to_sql().unwrap();
    assert_eq!(sql.matches(" IN (").count(), 1);
}

#[test]
fn test_regex_support() {
    let name = StringExpr::column(&people(), "NAME").unwrap();
    let cond = name.matches_regex("^A");
    assert_eq!(
        cond.to_sql_with_dialect(Dialect::Postgres).unwrap(),
        "p.name ~ '^A'"
    );
    assert_eq!(
        cond.to_sql_with_dialect(Dialect::MySQL).unwrap(),
        "p.NAME REGEXP '^A'"
    );
    assert!(matches!(
        cond.to_sql(),
        Err(CompileError::Unsupported { dialect: "standard", .. })
    ));
}

#[test]
fn test_greatest_folded_into_case() {
    let age = IntegerExpr::column(&people(), "AGE").unwrap();
    let e = age.greatest_of([5]);
    assert_eq!(e.to_sql().unwrap(), "GREATEST(p.AGE, 5)");
    assert_eq!(
        e.to_sql_with_dialect(Dialect::SqlServer).unwrap(),
        "CASE WHEN 5 > p.AGE THEN 5 ELSE p.AGE END"
    );
}

#[test]
fn test_hyperbolic_fallback() {
    let score = NumberExpr::column(&people(), "SCORE").unwrap();
    assert_eq!(
        score.sinh().to_sql().unwrap(),
        "((EXP(p.SCORE) - EXP(-p.SCORE)) / 2)"
    );
    assert_eq!(
        score.sinh().to_sql_with_dialect(Dialect::Postgres).unwrap(),
        "SINH(p.score)"
    );
}

#[test]
fn test_date_literals() {
    let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
        .and_then(|d| d.and_hms_opt(3, 4, 5))
        .unwrap();
    let e = Expr::literal(ts);
    assert_eq!(e.to_sql().unwrap(), "TIMESTAMP '2024-01-02 03:04:05.000'");
    assert_eq!(
        e.to_sql_with_dialect(Dialect::SQLite).unwrap(),
        "'2024-01-02 03:04:05.000'"
    );
}

#[test]
fn test_date_add_per_dialect() {
    let born = DateExpr::column(&people(), "BORN").unwrap();
    let later = born.add_days(3);
    assert_eq!(
        later.to_sql_with_dialect(Dialect::Postgres).unwrap(),
        "p.born + 3 * INTERVAL '1 day'"
    );
    assert_eq!(
        later.to_sql_with_dialect(Dialect::MySQL).unwrap(),
        "DATE_ADD(p.BORN, INTERVAL 3 DAY)"
    );
}

#[test]
fn test_bytes_literals() {
    let e = Expr::literal(Value::Bytes(vec![0x0a, 0xff]));
    assert_eq!(e.to_sql().unwrap(), "X'0AFF'");
    assert_eq!(e.to_sql_with_dialect(Dialect::Postgres).unwrap(), "'\\x0aff'::bytea");
    assert_eq!(e.to_sql_with_dialect(Dialect::SqlServer).unwrap(), "0x0AFF");
    assert_eq!(
        e.to_sql_with_dialect(Dialect::Oracle12).unwrap(),
        "HEXTORAW('0AFF')"
    );
}

#[test]
fn test_geometry_requires_support() {
    let p = Expr::literal(Point2D::new(1.0, 2.0));
    assert!(matches!(
        p.to_sql(),
        Err(CompileError::Unsupported { .. })
    ));
    assert!(p.to_sql_with_dialect(Dialect::Postgres).is_ok());
}

#[test]
fn test_windows_unsupported_on_derby() {
    let age = IntegerExpr::column(&people(), "AGE").unwrap();
    let w = Window::new(age.sum()).all_rows().unsorted().build();
    assert!(matches!(
        w.to_sql_with_dialect(Dialect::Derby),
        Err(CompileError::Unsupported { dialect: "derby", .. })
    ));
    assert_eq!(w.to_sql().unwrap(), "SUM(p.AGE) OVER ()");
}

#[test]
fn test_paging_hooks() {
    let standard = Dialect::Standard.generator();
    assert_eq!(
        standard.limit_offset(Some(10), Some(5)),
        " OFFSET 5 ROWS FETCH FIRST 10 ROWS ONLY"
    );
    assert_eq!(
        Dialect::MySQL.generator().limit_offset(Some(10), Some(5)),
        " LIMIT 10 OFFSET 5"
    );
    assert_eq!(
        Dialect::SQLite.generator().limit_offset(None, Some(5)),
        " LIMIT -1 OFFSET 5"
    );

    let mssql = Dialect::SqlServer.generator();
    assert_eq!(mssql.limit_in_select(Some(10), None).as_deref(), Some("TOP 10"));
    assert_eq!(mssql.limit_offset(Some(10), None), "");
    assert_eq!(
        mssql.limit_offset(Some(10), Some(5)),
        " OFFSET 5 ROWS FETCH NEXT 10 ROWS ONLY"
    );

    let oracle11 = Dialect::Oracle11.generator();
    assert_eq!(oracle11.limit_offset(Some(10), None), "");
    assert_eq!(oracle11.limit_in_where(Some(10)).as_deref(), Some("ROWNUM <= 10"));
    assert!(!oracle11.supports_offset());
    assert!(Dialect::Oracle12.generator().supports_offset());
}

#[test]
fn test_placeholders() {
    assert_eq!(Dialect::Standard.generator().placeholder(1), "?");
    assert_eq!(Dialect::Postgres.generator().placeholder(1), "$1");
    assert_eq!(Dialect::SqlServer.generator().placeholder(1), "@p1");
    assert_eq!(Dialect::Oracle12.generator().placeholder(1), ":1");
}

#[test]
fn test_ddl_hooks() {
    assert_eq!(
        Dialect::Standard.generator().drop_table("PEOPLE", true),
        "DROP TABLE IF EXISTS PEOPLE"
    );
    assert_eq!(
        Dialect::Derby.generator().drop_table("PEOPLE", true),
        "DROP TABLE PEOPLE"
    );
    assert_eq!(
        Dialect::Postgres.generator().sql_type(ValueType::String),
        "TEXT"
    );
    assert_eq!(
        Dialect::Postgres.generator().autoincrement_type(),
        "BIGSERIAL"
    );
}

#[test]
fn test_identifier_limit_truncates_alias() {
    let long = "a".repeat(40);
    let row = RowDef::builder("PEOPLE")
        .alias(long.clone())
        .field(FieldDef::new("ID", ValueType::Integer))
        .build();
    let id = Expr::column(ColumnRef::new(&row, "ID").unwrap());
    assert_eq!(
        id.to_sql_with_dialect(Dialect::Oracle11).unwrap(),
        format!("{}.ID", "a".repeat(30))
    );
    assert_eq!(id.to_sql().unwrap(), format!("{}.ID", long));
}

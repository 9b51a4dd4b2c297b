use std::sync::Once;

use pretty_assertions::assert_eq;
use sqlweave::ast::{ColumnRef, Operator};
use sqlweave::prelude::*;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("sqlweave=trace"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_ansi(false)
            .try_init();
    });
}

fn people() -> RowDef {
    RowDef::builder("PEOPLE")
        .alias("p")
        .field(FieldDef::new("ID", ValueType::Integer).primary_key())
        .field(FieldDef::new("NAME", ValueType::String))
        .field(FieldDef::new("AGE", ValueType::Integer))
        .field(FieldDef::new("X", ValueType::Integer))
        .build()
}

fn sales() -> RowDef {
    RowDef::builder("SALES")
        .alias("s")
        .field(FieldDef::new("ID", ValueType::Integer).primary_key())
        .field(FieldDef::new("CUSTOMER_ID", ValueType::Integer))
        .field(FieldDef::new("AMOUNT", ValueType::Number))
        .field(FieldDef::new("DATE", ValueType::Date))
        .build()
}

#[test]
fn scenario_string_equality() {
    init_tracing();
    let name = StringExpr::column(&people(), "NAME").unwrap();
    let cond = name.is("Alice");
    assert_eq!(cond.to_sql().unwrap(), "p.NAME = 'Alice'");
    assert_eq!(
        cond.to_sql_with_dialect(Dialect::Postgres).unwrap(),
        "p.name = 'Alice'"
    );
}

#[test]
fn scenario_open_range() {
    init_tracing();
    let age = IntegerExpr::column(&people(), "AGE").unwrap();
    assert_eq!(age.permitted_range(18..).to_sql().unwrap(), "p.AGE >= 18");
}

#[test]
fn scenario_running_sum() {
    init_tracing();
    let s = sales();
    let amount = NumberExpr::column(&s, "AMOUNT").unwrap();
    let customer = IntegerExpr::column(&s, "CUSTOMER_ID").unwrap();
    let date = DateExpr::column(&s, "DATE").unwrap();

    let running = Window::new(amount.sum())
        .partition([customer])
        .order_by([date.ascending()])
        .rows()
        .unbounded_preceding()
        .current_row()
        .build();
    // DATE is reserved, so it is quoted.
    assert_eq!(
        running.to_sql().unwrap(),
        "SUM(s.AMOUNT) OVER (PARTITION BY s.CUSTOMER_ID ORDER BY s.\"DATE\" ASC \
         ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW)"
    );
}

#[test]
fn scenario_in_with_null() {
    init_tracing();
    let x = IntegerExpr::column(&people(), "X").unwrap();
    let cond = x.matches(Operator::is_in([
        Expr::literal(1),
        Expr::from(Value::Null),
        Expr::literal(3),
    ]));
    assert_eq!(cond.to_sql().unwrap(), "(p.X IN (1, 3) OR p.X IS NULL)");
}

#[test]
fn clone_emits_identically_everywhere() {
    init_tracing();
    let row = people();
    let name = StringExpr::column(&row, "NAME").unwrap();
    let age = IntegerExpr::column(&row, "AGE").unwrap();
    let exprs: Vec<Expr> = vec![
        name.lower().is("alice").into(),
        age.plus(1).times(2).into(),
        age.is_in([1, 2, 3]).or(age.is_greater_than(60)).into(),
        name.length().into(),
        age.sum().into(),
    ];
    for dialect in Dialect::all() {
        for e in &exprs {
            let copy = e.clone();
            assert_eq!(
                copy.to_sql_with_dialect(*dialect).ok(),
                e.to_sql_with_dialect(*dialect).ok(),
                "{}",
                dialect
            );
        }
    }
}

#[test]
fn null_comparisons_never_use_equals() {
    init_tracing();
    let name = StringExpr::column(&people(), "NAME").unwrap();
    for dialect in Dialect::all() {
        let sql = name
            .is(StringExpr::null())
            .to_sql_with_dialect(*dialect)
            .unwrap();
        assert!(!sql.contains("= NULL"), "{}: {}", dialect, sql);
        assert!(sql.ends_with("IS NULL"), "{}: {}", dialect, sql);
    }
}

#[test]
fn double_inversion_is_identity() {
    init_tracing();
    let age = IntegerExpr::column(&people(), "AGE").unwrap();
    for op in [
        Operator::equals(3),
        Operator::greater_than(3),
        Operator::is_in([1, 2]),
        Operator::is_null(),
        Operator::less_than_or_equal(2),
    ] {
        let once = age.matches(op.clone()).to_sql().unwrap();
        let thrice = age.matches(op.not().not()).to_sql().unwrap();
        assert_eq!(once, thrice);
    }
    let cond = age.is_greater_than(3);
    assert_eq!(
        cond.not().not().to_sql().unwrap(),
        cond.to_sql().unwrap()
    );
}

#[test]
fn in_list_groups_by_type() {
    init_tracing();
    let row = people();
    let x = Expr::column(ColumnRef::new(&row, "X").unwrap());
    let sql = Expr::in_list(
        x,
        vec![Expr::literal(1), Expr::literal(1.5), Expr::literal(2)],
    )
    .to_sql()
    .unwrap();
    assert_eq!(sql, "(p.X IN (1, 2) OR p.X IN (1.5))");
}

#[test]
fn window_clauses_only_when_asked() {
    init_tracing();
    let s = sales();
    let amount = NumberExpr::column(&s, "AMOUNT").unwrap();
    let customer = IntegerExpr::column(&s, "CUSTOMER_ID").unwrap();

    let bare = Window::new(amount.sum()).all_rows().unsorted().build();
    assert_eq!(bare.to_sql().unwrap(), "SUM(s.AMOUNT) OVER ()");

    let partitioned = Window::new(amount.sum())
        .partition([customer.clone()])
        .unsorted()
        .build();
    assert_eq!(
        partitioned.to_sql().unwrap(),
        "SUM(s.AMOUNT) OVER (PARTITION BY s.CUSTOMER_ID)"
    );

    let sorted = Window::new(amount.sum())
        .all_rows()
        .order_by([customer.ascending()])
        .default_frame()
        .build();
    assert_eq!(
        sorted.to_sql().unwrap(),
        "SUM(s.AMOUNT) OVER (ORDER BY s.CUSTOMER_ID ASC)"
    );
}

#[test]
fn dialects_differ_only_where_they_diverge() {
    init_tracing();
    let row = people();
    let name = StringExpr::column(&row, "NAME").unwrap();
    let age = IntegerExpr::column(&row, "AGE").unwrap();
    let cond = name.is("Alice").and(age.is_between(18, 65));

    // MariaDB only adds RETURNING on top of MySQL.
    assert_eq!(
        cond.to_sql_with_dialect(Dialect::MariaDB).unwrap(),
        cond.to_sql_with_dialect(Dialect::MySQL).unwrap()
    );
    // SQL Server changes the string literal and nothing else here.
    assert_eq!(
        cond.to_sql_with_dialect(Dialect::SqlServer).unwrap(),
        cond.to_sql().unwrap().replace("'Alice'", "N'Alice'")
    );
}

#[test]
fn compiler_from_toml_config() {
    init_tracing();
    let config = CompilerConfig::from_toml(
        r#"
        dialect = "mssql"
        log_sql = true
        "#,
    )
    .unwrap();
    let compiler = SqlCompiler::from_config(&config).unwrap();
    assert_eq!(compiler.dialect(), Dialect::SqlServer);

    let age = IntegerExpr::column(&people(), "AGE").unwrap();
    assert_eq!(
        compiler.compile_condition(age.is_greater_than(18)).unwrap(),
        "p.AGE > 18"
    );
    assert_eq!(compiler.where_or_having(age.sum()), Clause::Having);
}

#[test]
fn unknown_dialect_suggests_closest() {
    init_tracing();
    let err = "postgress".parse::<Dialect>().unwrap_err();
    match err {
        CompileError::UnknownDialect { suggestion, .. } => {
            assert_eq!(suggestion.as_deref(), Some("postgres"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

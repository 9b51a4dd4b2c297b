//! Operators expanded into conditions.

use pretty_assertions::assert_eq;

use super::{orders, people};
use crate::ast::builders::{IntegerExpr, StringExpr};
use crate::ast::{Condition, ExistsQuery, Expr, Operator, Value};
use crate::error::CompileError;
use crate::transpiler::{Dialect, ToSql};

fn age() -> IntegerExpr {
    IntegerExpr::column(&people(), "AGE").unwrap()
}

fn name() -> StringExpr {
    StringExpr::column(&people(), "NAME").unwrap()
}

#[test]
fn test_range_open_above() {
    assert_eq!(age().permitted_range(18..).to_sql().unwrap(), "p.AGE >= 18");
}

#[test]
fn test_range_shapes() {
    assert_eq!(
        age().permitted_range(1..=5).to_sql().unwrap(),
        "p.AGE BETWEEN 1 AND 5"
    );
    assert_eq!(
        age().permitted_range(1..5).to_sql().unwrap(),
        "p.AGE >= 1 AND p.AGE < 5"
    );
    assert_eq!(age().permitted_range(..5).to_sql().unwrap(), "p.AGE < 5");
    assert_eq!(
        age().permitted_range_exclusive(1, 5).to_sql().unwrap(),
        "p.AGE > 1 AND p.AGE < 5"
    );
}

#[test]
fn test_range_null_bound_is_open() {
    let op = Operator::range(Some(Expr::from(Value::Null)), Some(Expr::literal(10)));
    assert_eq!(age().matches(op).to_sql().unwrap(), "p.AGE < 10");
}

#[test]
fn test_range_without_bounds_is_true() {
    let cond = age().matches(Operator::range(None, None));
    assert_eq!(cond.to_sql().unwrap(), "(1=1)");
}

#[test]
fn test_permitted_and_excluded_values() {
    assert_eq!(age().permitted_values([1]).to_sql().unwrap(), "p.AGE = 1");
    assert_eq!(
        age().permitted_values([1, 2]).to_sql().unwrap(),
        "p.AGE IN (1, 2)"
    );
    assert_eq!(age().excluded_values([1]).to_sql().unwrap(), "p.AGE <> 1");
    assert_eq!(
        age().excluded_values([1, 2]).to_sql().unwrap(),
        "NOT (p.AGE IN (1, 2))"
    );
}

#[test]
fn test_in_with_null_candidate() {
    let cond = age().matches(Operator::is_in([
        Expr::literal(1),
        Expr::from(Value::Null),
        Expr::literal(3),
    ]));
    assert_eq!(
        cond.to_sql().unwrap(),
        "(p.AGE IN (1, 3) OR p.AGE IS NULL)"
    );
}

#[test]
fn test_in_rejects_other_types() {
    let cond = name().matches(Operator::is_in([1, 2]));
    assert!(matches!(
        cond.to_sql(),
        Err(CompileError::TypeMismatch { .. })
    ));
}

#[test]
fn test_include_nulls() {
    let cond = age().matches(Operator::equals(1).include_nulls());
    assert_eq!(
        cond.to_sql().unwrap(),
        "(p.AGE = 1 OR p.AGE IS NULL)"
    );

    let cond = age().matches(Operator::equals(1).not().include_nulls());
    assert_eq!(
        cond.to_sql().unwrap(),
        "(p.AGE <> 1 OR p.AGE IS NULL)"
    );

    let cond = age().matches(Operator::greater_than(1)).not().include_nulls();
    assert_eq!(
        cond.to_sql().unwrap(),
        "(NOT (p.AGE > 1) OR p.AGE IS NULL)"
    );
}

#[test]
fn test_include_nulls_when_null_already_matches() {
    let cond = age().matches(
        Operator::is_in([Expr::literal(1), Expr::from(Value::Null)]).include_nulls(),
    );
    assert_eq!(cond.to_sql().unwrap(), "(p.AGE IN (1) OR p.AGE IS NULL)");

    let cond = age().matches(Operator::is_null().include_nulls());
    assert_eq!(cond.to_sql().unwrap(), "p.AGE IS NULL");

    let cond = age().matches(
        Operator::is_in([Expr::literal(1), Expr::from(Value::Null)])
            .not()
            .include_nulls(),
    );
    assert_eq!(
        cond.to_sql().unwrap(),
        "(NOT ((p.AGE IN (1) OR p.AGE IS NULL)) OR p.AGE IS NULL)"
    );
}

#[test]
fn test_double_inversion() {
    let plain = age().matches(Operator::less_than(5));
    let twice = age().matches(Operator::less_than(5).not().not());
    assert_eq!(twice.to_sql().unwrap(), plain.to_sql().unwrap());
}

#[test]
fn test_ignore_case() {
    let cond = name().matches(Operator::equals_ignore_case("Alice"));
    assert_eq!(
        cond.to_sql().unwrap(),
        "LOWER(p.NAME) = LOWER('Alice')"
    );

    let cond = name().matches(Operator::is_in_ignore_case([
        Expr::literal("A"),
        Expr::from(Value::Null),
    ]));
    assert_eq!(
        cond.to_sql().unwrap(),
        "(LOWER(p.NAME) IN (LOWER('A')) OR LOWER(p.NAME) IS NULL)"
    );

    let cond = name().matches(Operator::like_ignore_case("a%"));
    assert_eq!(cond.to_sql().unwrap(), "LOWER(p.NAME) LIKE LOWER('a%')");
}

#[test]
fn test_like() {
    assert_eq!(
        name().matches(Operator::like("A%")).to_sql().unwrap(),
        "p.NAME LIKE 'A%'"
    );
}

#[test]
fn test_bitwise_equals() {
    let cond = age().matches(Operator::bitwise_equals(4));
    assert_eq!(cond.to_sql().unwrap(), "(p.AGE & 4) = 4");
    assert!(matches!(
        cond.to_sql_with_dialect(Dialect::Derby),
        Err(CompileError::Unsupported { .. })
    ));
}

#[test]
fn test_is_null_operator() {
    assert_eq!(
        age().matches(Operator::is_null()).to_sql().unwrap(),
        "p.AGE IS NULL"
    );
    assert_eq!(
        age().matches(Operator::is_null().not()).to_sql().unwrap(),
        "p.AGE IS NOT NULL"
    );
}

#[test]
fn test_not_exists() {
    let q = ExistsQuery::new(&people(), &orders(), &[("ID", "PERSON_ID")]).unwrap();
    let id = IntegerExpr::column(&people(), "ID").unwrap();
    let cond = Condition::new(id, Operator::exists(q).not());
    let sql = cond.to_sql().unwrap();
    assert!(sql.starts_with("NOT (EXISTS (SELECT p_outer.ID FROM PEOPLE p_outer"));
    assert!(sql.ends_with("WHERE p_outer.ID = p.ID))"));
}

#[test]
fn test_exists_needs_join_columns() {
    assert!(matches!(
        ExistsQuery::new(&people(), &orders(), &[]),
        Err(CompileError::Arity { .. })
    ));
    assert!(matches!(
        ExistsQuery::new(&people(), &orders(), &[("NAME", "PERSON_ID")]),
        Err(CompileError::TypeMismatch { .. })
    ));
}

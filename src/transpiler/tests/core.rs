//! Dialect independent emission: comparisons, logic, IN lists, CASE.

use pretty_assertions::assert_eq;

use super::{orders, people};
use crate::ast::builders::{BooleanExpr, DateExpr, IntegerExpr, NumberExpr, StringExpr};
use crate::ast::{ColumnRef, ExistsQuery, Expr, Value};
use crate::transpiler::{Dialect, ToSql};

fn column(name: &str) -> Expr {
    Expr::column(ColumnRef::new(&people(), name).unwrap())
}

#[test]
fn test_compare_with_string() {
    let name = StringExpr::column(&people(), "NAME").unwrap();
    assert_eq!(name.is("Alice").to_sql().unwrap(), "p.NAME = 'Alice'");
    assert_eq!(name.is_not("Bob").to_sql().unwrap(), "p.NAME <> 'Bob'");
}

#[test]
fn test_compare_with_null_becomes_is_null() {
    let name = StringExpr::column(&people(), "NAME").unwrap();
    assert_eq!(name.is(StringExpr::null()).to_sql().unwrap(), "p.NAME IS NULL");
    assert_eq!(
        name.is_not(StringExpr::null()).to_sql().unwrap(),
        "p.NAME IS NOT NULL"
    );
    assert_eq!(name.is(None::<&str>).to_sql().unwrap(), "p.NAME IS NULL");
}

#[test]
fn test_string_quotes_are_doubled() {
    let name = StringExpr::column(&people(), "NAME").unwrap();
    assert_eq!(name.is("O'Brien").to_sql().unwrap(), "p.NAME = 'O''Brien'");
}

#[test]
fn test_and_or_not() {
    let age = IntegerExpr::column(&people(), "AGE").unwrap();
    let adult = age.is_greater_than_or_equal(18);
    let senior = age.is_greater_than(65);

    assert_eq!(
        adult.and(age.is_less_than(65)).to_sql().unwrap(),
        "p.AGE >= 18 AND p.AGE < 65"
    );
    assert_eq!(
        age.is_less_than(18).or(senior.clone()).to_sql().unwrap(),
        "(p.AGE < 18 OR p.AGE > 65)"
    );
    assert_eq!(senior.not().to_sql().unwrap(), "NOT (p.AGE > 65)");
    assert_eq!(age.is(30).not().to_sql().unwrap(), "p.AGE <> 30");
}

#[test]
fn test_nested_and_is_flattened() {
    let age = IntegerExpr::column(&people(), "AGE").unwrap();
    let cond = age
        .is_greater_than(1)
        .and(age.is_greater_than(2))
        .and(age.is_greater_than(3));
    assert_eq!(
        cond.to_sql().unwrap(),
        "p.AGE > 1 AND p.AGE > 2 AND p.AGE > 3"
    );
}

#[test]
fn test_or_inside_and_keeps_parentheses() {
    let age = IntegerExpr::column(&people(), "AGE").unwrap();
    let name = StringExpr::column(&people(), "NAME").unwrap();
    let cond = name
        .is("Alice")
        .and(age.is_less_than(18).or(age.is_greater_than(65)));
    assert_eq!(
        cond.to_sql().unwrap(),
        "p.NAME = 'Alice' AND (p.AGE < 18 OR p.AGE > 65)"
    );
}

#[test]
fn test_empty_groups() {
    assert_eq!(BooleanExpr::all_of([]).to_sql().unwrap(), "(1=1)");
    assert_eq!(BooleanExpr::any_of([]).to_sql().unwrap(), "(1=0)");
    for dialect in [Dialect::SqlServer, Dialect::Oracle12] {
        assert_eq!(
            BooleanExpr::all_of([]).to_sql_with_dialect(dialect).unwrap(),
            "(1=1)"
        );
    }
    let active = BooleanExpr::column(&people(), "ACTIVE").unwrap();
    assert_eq!(
        active.to_sql_with_dialect(Dialect::SqlServer).unwrap(),
        "p.ACTIVE = 1"
    );
}

#[test]
fn test_in_list() {
    let age = IntegerExpr::column(&people(), "AGE").unwrap();
    assert_eq!(age.is_in([1, 2, 3]).to_sql().unwrap(), "p.AGE IN (1, 2, 3)");
}

#[test]
fn test_empty_in_list_is_false() {
    let age = IntegerExpr::column(&people(), "AGE").unwrap();
    assert_eq!(age.is_in(Vec::<i32>::new()).to_sql().unwrap(), "(1=0)");
}

#[test]
fn test_in_list_groups_candidates_by_type() {
    let e = Expr::in_list(
        column("SCORE"),
        vec![Expr::literal(1), Expr::literal(2.5), Expr::literal(2)],
    );
    assert_eq!(
        e.to_sql().unwrap(),
        "(p.SCORE IN (1, 2) OR p.SCORE IN (2.5))"
    );
}

#[test]
fn test_in_list_null_candidate() {
    let e = Expr::in_list(
        column("AGE"),
        vec![Expr::literal(1), Expr::from(Value::Null), Expr::literal(3)],
    );
    assert_eq!(e.to_sql().unwrap(), "(p.AGE IN (1, 3) OR p.AGE IS NULL)");
}

#[test]
fn test_between() {
    let age = IntegerExpr::column(&people(), "AGE").unwrap();
    assert_eq!(
        age.is_between(18, 65).to_sql().unwrap(),
        "p.AGE BETWEEN 18 AND 65"
    );
}

#[test]
fn test_like() {
    let name = StringExpr::column(&people(), "NAME").unwrap();
    assert_eq!(name.is_like("A%").to_sql().unwrap(), "p.NAME LIKE 'A%'");
    assert_eq!(
        name.is_like_ignore_case("a%").to_sql().unwrap(),
        "LOWER(p.NAME) LIKE LOWER('a%')"
    );
}

#[test]
fn test_case_when() {
    let age = IntegerExpr::column(&people(), "AGE").unwrap();
    let label: StringExpr = age.is_greater_than_or_equal(18).if_then_else("adult", "minor");
    assert_eq!(
        label.to_sql().unwrap(),
        "CASE WHEN p.AGE >= 18 THEN 'adult' ELSE 'minor' END"
    );
    let maybe: StringExpr = age.is_greater_than_or_equal(18).if_then("adult");
    assert_eq!(
        maybe.to_sql().unwrap(),
        "CASE WHEN p.AGE >= 18 THEN 'adult' END"
    );
}

#[test]
fn test_arithmetic() {
    let age = IntegerExpr::column(&people(), "AGE").unwrap();
    assert_eq!(age.plus(1).times(2).to_sql().unwrap(), "(p.AGE + 1) * 2");
    assert_eq!(age.modulus(2).to_sql().unwrap(), "MOD(p.AGE, 2)");
    assert_eq!(age.plus(-1).to_sql().unwrap(), "p.AGE + (-1)");
}

#[test]
fn test_integer_division_is_widened() {
    let age = IntegerExpr::column(&people(), "AGE").unwrap();
    assert_eq!(
        age.divided_by(2).to_sql().unwrap(),
        "CAST(p.AGE AS DOUBLE PRECISION) / 2"
    );
    let score = NumberExpr::column(&people(), "SCORE").unwrap();
    assert_eq!(score.divided_by(2).to_sql().unwrap(), "p.SCORE / 2");
}

#[test]
fn test_string_functions() {
    let name = StringExpr::column(&people(), "NAME").unwrap();
    assert_eq!(name.upper().to_sql().unwrap(), "UPPER(p.NAME)");
    assert_eq!(name.length().to_sql().unwrap(), "CHAR_LENGTH(p.NAME)");
    assert_eq!(name.append("!").to_sql().unwrap(), "p.NAME || '!'");
    assert_eq!(
        name.substring(2, 3).to_sql().unwrap(),
        "SUBSTRING(p.NAME FROM 2 FOR 3)"
    );
}

#[test]
fn test_coalesce() {
    let name = StringExpr::column(&people(), "NAME").unwrap();
    assert_eq!(
        name.if_null_then("nobody").to_sql().unwrap(),
        "COALESCE(p.NAME, 'nobody')"
    );
}

#[test]
fn test_aggregates() {
    let age = IntegerExpr::column(&people(), "AGE").unwrap();
    assert_eq!(age.sum().to_sql().unwrap(), "SUM(p.AGE)");
    assert_eq!(age.count_distinct().to_sql().unwrap(), "COUNT(DISTINCT p.AGE)");
    assert_eq!(IntegerExpr::count_rows().to_sql().unwrap(), "COUNT(*)");
}

#[test]
fn test_date_arithmetic() {
    let born = DateExpr::column(&people(), "BORN").unwrap();
    assert_eq!(
        born.add_days(3).to_sql().unwrap(),
        "p.BORN + 3 * INTERVAL '1' DAY"
    );
    assert_eq!(
        born.add_weeks(2).to_sql().unwrap(),
        "p.BORN + 2 * 7 * INTERVAL '1' DAY"
    );
}

#[test]
fn test_boolean_column_as_condition() {
    let active = BooleanExpr::column(&people(), "ACTIVE").unwrap();
    assert_eq!(active.to_sql().unwrap(), "p.ACTIVE");
    assert_eq!(active.is(true).to_sql().unwrap(), "p.ACTIVE = TRUE");
}

#[test]
fn test_compare_with_partly_null_case() {
    let id = IntegerExpr::column(&people(), "ID").unwrap();
    let age = IntegerExpr::column(&people(), "AGE").unwrap();
    let adult = age.is_greater_than(18);

    let maybe = adult.if_then_else::<IntegerExpr>(1, IntegerExpr::null());
    assert_eq!(
        id.is(maybe).to_sql().unwrap(),
        "p.ID = CASE WHEN p.AGE > 18 THEN 1 ELSE NULL END"
    );

    let never = adult.if_then_else::<IntegerExpr>(IntegerExpr::null(), IntegerExpr::null());
    assert_eq!(id.is(never).to_sql().unwrap(), "p.ID IS NULL");
}

#[test]
fn test_compare_with_greatest_and_least_of_null() {
    let id = IntegerExpr::column(&people(), "ID").unwrap();
    let age = IntegerExpr::column(&people(), "AGE").unwrap();

    let greatest = id.is(age.greatest_of([IntegerExpr::null()]));
    assert_eq!(greatest.to_sql().unwrap(), "p.ID = GREATEST(p.AGE, NULL)");
    assert_eq!(
        greatest.to_sql_with_dialect(Dialect::SqlServer).unwrap(),
        "p.ID = CASE WHEN NULL > p.AGE THEN NULL ELSE p.AGE END"
    );

    let least = id.is(age.least_of([IntegerExpr::null()]));
    assert_eq!(least.to_sql().unwrap(), "p.ID = LEAST(p.AGE, NULL)");

    let all_null = id.is(IntegerExpr::null().greatest_of([IntegerExpr::null()]));
    assert_eq!(all_null.to_sql().unwrap(), "p.ID IS NULL");
}

#[test]
fn test_between_with_null_bound_is_open() {
    let age = IntegerExpr::column(&people(), "AGE").unwrap();
    assert_eq!(
        age.is_between(IntegerExpr::null(), 65).to_sql().unwrap(),
        "p.AGE <= 65"
    );
    assert_eq!(
        age.is_between(18, IntegerExpr::null()).to_sql().unwrap(),
        "p.AGE >= 18"
    );
    assert_eq!(
        age.is_between(IntegerExpr::null(), IntegerExpr::null())
            .to_sql()
            .unwrap(),
        "(1=1)"
    );
}

#[test]
fn test_generated_alias() {
    let row = crate::typed::RowDef::builder("PEOPLE")
        .field(crate::typed::FieldDef::new("NAME", crate::ast::ValueType::String))
        .build();
    let name = StringExpr::column(&row, "NAME").unwrap();
    assert_eq!(name.to_sql().unwrap(), "__1938479473.NAME");
}

#[test]
fn test_exists_subquery() {
    let q = ExistsQuery::new(&people(), &orders(), &[("ID", "PERSON_ID")]).unwrap();
    assert_eq!(
        Expr::exists(q).to_sql().unwrap(),
        "EXISTS (SELECT p_outer.ID FROM PEOPLE p_outer INNER JOIN ORDERS o_inner \
         ON p_outer.ID = o_inner.PERSON_ID WHERE p_outer.ID = p.ID)"
    );
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn parses_six_field_expression() {
    let expr = CronExpression::parse("0 30 9 ? * MON-FRI").unwrap();
    assert_eq!(expr.seconds, vec![RecurrenceRule::values([0])]);
    assert_eq!(expr.minutes, vec![RecurrenceRule::values([30])]);
    assert_eq!(expr.hours, vec![RecurrenceRule::values([9])]);
    assert!(expr.days_of_month.is_empty());
    assert!(expr.months.is_empty());
    assert_eq!(expr.days_of_week, vec![RecurrenceRule::range(2, 6)]);
    assert!(expr.years.is_empty());
}

#[test]
fn parses_optional_year_field() {
    let expr = CronExpression::parse("0 0 12 1 1 ? 2027").unwrap();
    assert_eq!(expr.years, vec![RecurrenceRule::values([2027])]);
    assert_eq!(expr.to_string(), "0 0 12 1 1 ? 2027");
}

#[parameterized(
    five = { "0 0 12 * *" },
    eight = { "0 0 12 * * ? 2027 x" },
    empty = { "" },
)]
fn wrong_field_count_is_rejected(text: &str) {
    assert!(matches!(
        CronExpression::parse(text),
        Err(CodecError::FieldCount { .. })
    ));
}

#[test]
fn invalid_field_reports_raw_field_text() {
    let err = CronExpression::parse("0 0 25 * * ?").unwrap_err();
    assert_eq!(
        err,
        CodecError::InvalidExpression {
            field: CronField::Hour,
            text: "25".to_string(),
        }
    );
}

#[test]
fn day_of_month_wins_when_both_days_populated() {
    let mut expr = CronExpression::default();
    expr.days_of_month = vec![RecurrenceRule::values([15])];
    expr.days_of_week = vec![RecurrenceRule::values([2])];
    assert_eq!(expr.to_string(), "* * * 15 * ?");
}

#[test]
fn day_of_week_only_writes_question_mark_for_day_of_month() {
    let mut expr = CronExpression::default();
    expr.seconds = vec![RecurrenceRule::values([0])];
    expr.days_of_week = vec![RecurrenceRule::nth_weekday(3, Weekday::Friday)];
    assert_eq!(expr.to_string(), "0 * * ? * 6#3");
}

#[test]
fn no_day_constraints_writes_star_and_question_mark() {
    let expr = CronExpression::default();
    assert_eq!(expr.to_string(), "* * * * * ?");
}

#[parameterized(
    weekdays = { "0 30 9 ? * 2-6" },
    last_day = { "0 0 0 L * ?" },
    steps = { "*/10 0/5 * * 1/3 ?" },
    qualified = { "0 0 8 ? * 2L" },
)]
fn canonical_expressions_encode_unchanged(text: &str) {
    assert_eq!(CronExpression::parse(text).unwrap().to_string(), text);
}

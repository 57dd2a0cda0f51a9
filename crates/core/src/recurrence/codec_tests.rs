// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use yare::parameterized;

fn parse(field: CronField, text: &str) -> Vec<RecurrenceRule> {
    parse_field(field, text).unwrap()
}

#[parameterized(
    star = { "*" },
    question = { "?" },
    padded_star = { " * " },
)]
fn wildcard_is_unconstrained(text: &str) {
    assert!(parse(CronField::Minute, text).is_empty());
}

#[test]
fn integers_collect_into_one_value_list() {
    assert_eq!(
        parse(CronField::Minute, "1,15,30"),
        vec![RecurrenceRule::values([1, 15, 30])]
    );
}

#[test]
fn duplicate_integers_are_dropped() {
    assert_eq!(
        parse(CronField::Hour, "3,5,3"),
        vec![RecurrenceRule::values([3, 5])]
    );
}

#[test]
fn range_token() {
    assert_eq!(
        parse(CronField::Minute, "10-20"),
        vec![RecurrenceRule::range(10, 20)]
    );
}

#[parameterized(
    star_start = { "*/15", RecurrenceRule::every(15) },
    explicit_start = { "5/10", RecurrenceRule::step(5, 10) },
)]
fn step_tokens(text: &str, expected: RecurrenceRule) {
    assert_eq!(parse(CronField::Second, text), vec![expected]);
}

#[test]
fn nth_weekday_in_day_of_week() {
    assert_eq!(
        parse(CronField::DayOfWeek, "6#3"),
        vec![RecurrenceRule::nth_weekday(3, Weekday::Friday)]
    );
}

#[test]
fn last_weekday_in_day_of_week() {
    assert_eq!(
        parse(CronField::DayOfWeek, "2L"),
        vec![RecurrenceRule::last_weekday(Weekday::Monday)]
    );
}

#[test]
fn bare_l_in_day_of_month() {
    assert_eq!(
        parse(CronField::DayOfMonth, "L"),
        vec![RecurrenceRule::LastDayOfMonth]
    );
}

#[test]
fn weekday_name_range_resolves_through_table() {
    assert_eq!(
        parse(CronField::DayOfWeek, "MON-FRI"),
        vec![RecurrenceRule::range(2, 6)]
    );
}

#[test]
fn bare_weekday_name_is_single_value() {
    assert_eq!(
        parse(CronField::DayOfWeek, "sun"),
        vec![RecurrenceRule::values([1])]
    );
}

#[test]
fn month_names_resolve_in_month_field() {
    assert_eq!(
        parse(CronField::Month, "JAN-MAR,DEC"),
        vec![RecurrenceRule::range(1, 3), RecurrenceRule::values([12])]
    );
}

#[test]
fn non_integer_token_flushes_pending_values() {
    assert_eq!(
        parse(CronField::Minute, "1,2,10-20,30,40,*/7"),
        vec![
            RecurrenceRule::values([1, 2]),
            RecurrenceRule::range(10, 20),
            RecurrenceRule::values([30, 40]),
            RecurrenceRule::every(7),
        ]
    );
}

#[test]
fn mixed_day_of_week_keeps_encounter_order() {
    assert_eq!(
        parse(CronField::DayOfWeek, "2,3,6#1,7L"),
        vec![
            RecurrenceRule::values([2, 3]),
            RecurrenceRule::nth_weekday(1, Weekday::Friday),
            RecurrenceRule::last_weekday(Weekday::Saturday),
        ]
    );
}

#[parameterized(
    garbage = { CronField::Minute, "abc" },
    empty_token = { CronField::Minute, "1,,2" },
    empty_field = { CronField::Minute, "" },
    out_of_range = { CronField::Minute, "60" },
    reversed_range = { CronField::Hour, "20-10" },
    wrap_around_hours = { CronField::Hour, "22-2" },
    wrap_around_weekdays = { CronField::DayOfWeek, "FRI-MON" },
    zero_step = { CronField::Second, "*/0" },
    hash_outside_day_of_week = { CronField::DayOfMonth, "6#3" },
    l_outside_day_of_month = { CronField::Hour, "L" },
    weekday_l_in_day_of_month = { CronField::DayOfMonth, "2L" },
    sixth_occurrence = { CronField::DayOfWeek, "2#6" },
    weekday_eight = { CronField::DayOfWeek, "8L" },
    weekday_name_in_month = { CronField::Month, "MON" },
    wildcard_inside_list = { CronField::Minute, "1,*" },
)]
fn unparseable_tokens_are_rejected(field: CronField, text: &str) {
    let err = parse_field(field, text).unwrap_err();
    assert_eq!(
        err,
        CodecError::InvalidExpression {
            field,
            text: text.to_string(),
        }
    );
}

#[test]
fn encode_empty_is_wildcard() {
    assert_eq!(encode_field(&[]), "*");
}

#[test]
fn encode_every_rule_kind() {
    let rules = vec![
        RecurrenceRule::values([1, 15]),
        RecurrenceRule::range(20, 25),
        RecurrenceRule::every(5),
        RecurrenceRule::step(2, 3),
        RecurrenceRule::nth_weekday(2, Weekday::Tuesday),
        RecurrenceRule::last_weekday(Weekday::Sunday),
        RecurrenceRule::LastDayOfMonth,
    ];
    assert_eq!(encode_field(&rules), "1,15,20-25,*/5,2/3,3#2,1L,L");
}

/// Adjacent value lists are indistinguishable once comma-joined.
fn merge_adjacent_values(rules: Vec<RecurrenceRule>) -> Vec<RecurrenceRule> {
    let mut merged: Vec<RecurrenceRule> = Vec::new();
    for rule in rules {
        match (merged.last_mut(), rule) {
            (
                Some(RecurrenceRule::ValueList { values: existing }),
                RecurrenceRule::ValueList { values },
            ) => {
                for v in values {
                    if !existing.contains(&v) {
                        existing.push(v);
                    }
                }
            }
            (_, rule) => merged.push(rule),
        }
    }
    merged
}

fn minute_rule() -> impl Strategy<Value = RecurrenceRule> {
    prop_oneof![
        proptest::collection::vec(0u32..60, 1..5).prop_map(RecurrenceRule::values),
        (0u32..60, 0u32..60).prop_map(|(a, b)| RecurrenceRule::range(a.min(b), a.max(b))),
        (proptest::option::of(0u32..60), 1u32..30)
            .prop_map(|(start, interval)| RecurrenceRule::Step { start, interval }),
    ]
}

proptest! {
    #[test]
    fn plain_rules_survive_encode_then_parse(rules in proptest::collection::vec(minute_rule(), 1..6)) {
        let encoded = encode_field(&rules);
        let parsed = parse_field(CronField::Minute, &encoded).unwrap();
        prop_assert_eq!(parsed, merge_adjacent_values(rules));
    }
}

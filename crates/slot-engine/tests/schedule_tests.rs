//! Tests for weekly salon schedules: opening hours, closed days, past dates
//! and lead time.

use chrono::{NaiveDate, NaiveDateTime};
use slot_engine::{
    Appointment, DayHours, OpeningHours, SalonConfig, SalonSchedule, ServiceSpec, SlotError,
    TimeOfDay,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn t(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap()
}

/// 2026-03-16 is a Monday.
const MONDAY: &str = "2026-03-16";
const SATURDAY: &str = "2026-03-21";
const SUNDAY: &str = "2026-03-22";

fn salon_json() -> &'static str {
    r#"{
        "opening_hours": {
            "ma": {"start": "09:00", "end": "18:00", "closed": false},
            "di": {"start": "09:00", "end": "18:00", "closed": false},
            "wo": {"start": "09:00", "end": "18:00", "closed": false},
            "do": {"start": "09:00", "end": "21:00", "closed": false},
            "vr": {"start": "09:00", "end": "18:00", "closed": false},
            "za": {"start": "10:00", "end": "17:00", "closed": false},
            "zo": {"start": "", "end": "", "closed": true}
        },
        "lead_time_hours": 0
    }"#
}

fn week_before() -> NaiveDateTime {
    at("2026-03-09T08:00")
}

// ── Opening hours ───────────────────────────────────────────────────────────

#[test]
fn stored_salon_document_builds_schedule() {
    // "zo" carries empty strings for start/end; a closed day must still parse.
    let schedule = SalonSchedule::from_json(salon_json()).unwrap();

    assert!(!schedule.is_open_on(date(SUNDAY)));
    let thursday = schedule.available_times(
        date("2026-03-19"),
        ServiceSpec::with_duration(60),
        &[],
        week_before(),
    );
    assert_eq!(thursday.last(), Some(&t("20:00")));
}

#[test]
fn weekday_hours_come_from_opening_hours() {
    let schedule = SalonSchedule::new(&SalonConfig {
        opening_hours: Some(OpeningHours {
            monday: Some(DayHours::open(t("09:00"), t("18:00"))),
            saturday: Some(DayHours::open(t("10:00"), t("17:00"))),
            sunday: Some(DayHours::closed()),
            ..OpeningHours::default()
        }),
        ..SalonConfig::default()
    })
    .unwrap();

    let monday = schedule.available_times(
        date(MONDAY),
        ServiceSpec::with_duration(30),
        &[],
        week_before(),
    );
    assert_eq!(monday.first(), Some(&t("09:00")));
    assert_eq!(monday.last(), Some(&t("17:30")));
    assert_eq!(monday.len(), 18);

    let saturday = schedule.available_times(
        date(SATURDAY),
        ServiceSpec::with_duration(30),
        &[],
        week_before(),
    );
    assert_eq!(saturday.first(), Some(&t("10:00")));
    assert_eq!(saturday.last(), Some(&t("16:30")));
}

#[test]
fn closed_and_unlisted_days_have_no_slots() {
    let schedule = SalonSchedule::new(&SalonConfig {
        opening_hours: Some(OpeningHours {
            monday: Some(DayHours::open(t("09:00"), t("18:00"))),
            sunday: Some(DayHours::closed()),
            ..OpeningHours::default()
        }),
        ..SalonConfig::default()
    })
    .unwrap();

    assert!(schedule.is_open_on(date(MONDAY)));
    assert!(!schedule.is_open_on(date(SUNDAY)));
    assert!(!schedule.is_open_on(date("2026-03-17")), "Tuesday has no entry");
    assert!(schedule
        .available_times(date(SUNDAY), ServiceSpec::default(), &[], week_before())
        .is_empty());
    assert!(schedule.calculator_for(date(SUNDAY)).is_none());
}

#[test]
fn missing_opening_hours_means_open_with_default_policy() {
    let schedule = SalonSchedule::new(&SalonConfig::default()).unwrap();

    for d in [MONDAY, SATURDAY, SUNDAY] {
        assert!(schedule.is_open_on(date(d)));
        let slots = schedule.available_times(date(d), ServiceSpec::default(), &[], week_before());
        assert_eq!(slots.len(), 16);
        assert_eq!(slots.last(), Some(&t("16:30")));
    }
}

#[test]
fn day_without_times_uses_nine_to_six() {
    let schedule = SalonSchedule::from_json(r#"{"openingHours":{"ma":{"closed":false}}}"#).unwrap();
    let calculator = schedule.calculator_for(date(MONDAY)).unwrap();

    assert_eq!(calculator.policy().hours.open, t("09:00"));
    assert_eq!(calculator.policy().hours.close, t("18:00"));
}

#[test]
fn english_weekday_aliases_accepted() {
    let schedule = SalonSchedule::from_json(
        r#"{"opening_hours":{"monday":{"start":"08:00","end":"12:00"}},"granularity_minutes":60}"#,
    )
    .unwrap();

    let slots = schedule.available_times(date(MONDAY), ServiceSpec::default(), &[], week_before());
    assert_eq!(slots, vec![t("08:00"), t("09:00"), t("10:00"), t("11:00")]);
}

// ── Appointments ────────────────────────────────────────────────────────────

#[test]
fn appointments_on_other_dates_do_not_block() {
    let schedule = SalonSchedule::new(&SalonConfig::default()).unwrap();
    let appointments = vec![
        Appointment::new(date("2026-03-17"), t("09:00"), Some(480)),
        Appointment::new(date(MONDAY), t("10:00"), Some(60)),
    ];

    let slots = schedule.available_times(
        date(MONDAY),
        ServiceSpec::with_duration(30),
        &appointments,
        week_before(),
    );
    assert_eq!(slots.len(), 14);
    assert!(!slots.contains(&t("10:00")));
    assert!(!slots.contains(&t("10:30")));
}

// ── Past dates and lead time ────────────────────────────────────────────────

#[test]
fn past_dates_are_unavailable() {
    let schedule = SalonSchedule::new(&SalonConfig::default()).unwrap();
    let now = at("2026-03-17T08:00");

    assert!(SalonSchedule::is_past(date(MONDAY), now.date()));
    assert!(!schedule.is_date_available(date(MONDAY), now.date()));
    assert!(schedule.is_date_available(date("2026-03-17"), now.date()));
    assert!(schedule
        .available_times(date(MONDAY), ServiceSpec::default(), &[], now)
        .is_empty());
}

#[test]
fn today_drops_slots_already_started() {
    let schedule = SalonSchedule::new(&SalonConfig::default()).unwrap();
    let slots = schedule.available_times(
        date(MONDAY),
        ServiceSpec::default(),
        &[],
        at("2026-03-16T12:10"),
    );

    assert_eq!(slots.first(), Some(&t("12:30")));
    assert_eq!(slots.len(), 9);
}

#[test]
fn lead_time_pushes_cutoff_forward() {
    let schedule = SalonSchedule::new(&SalonConfig {
        lead_time_hours: 3,
        ..SalonConfig::default()
    })
    .unwrap();
    let now = at("2026-03-16T10:00");

    assert_eq!(schedule.lead_time_cutoff(now), at("2026-03-16T13:00"));
    let slots = schedule.available_times(date(MONDAY), ServiceSpec::default(), &[], now);
    assert_eq!(slots.first(), Some(&t("13:00")), "a slot exactly at the cutoff is allowed");
}

#[test]
fn lead_time_can_spill_into_next_day() {
    let schedule = SalonSchedule::new(&SalonConfig {
        lead_time_hours: 24,
        ..SalonConfig::default()
    })
    .unwrap();
    let now = at("2026-03-16T11:00");

    let tuesday = schedule.available_times(date("2026-03-17"), ServiceSpec::default(), &[], now);
    assert_eq!(tuesday.first(), Some(&t("11:00")));
    let wednesday = schedule.available_times(date("2026-03-18"), ServiceSpec::default(), &[], now);
    assert_eq!(wednesday.len(), 16);
}

// ── Configuration ───────────────────────────────────────────────────────────

#[test]
fn inverted_day_hours_fail_fast() {
    let err =
        SalonSchedule::from_json(r#"{"opening_hours":{"vr":{"start":"18:00","end":"09:00"}}}"#)
            .unwrap_err();
    assert!(matches!(err, SlotError::InvalidConfig(_)));
}

#[test]
fn zero_granularity_fails_even_when_all_days_closed() {
    let err = SalonSchedule::new(&SalonConfig {
        opening_hours: Some(OpeningHours::default()),
        granularity_minutes: 0,
        ..SalonConfig::default()
    })
    .unwrap_err();
    assert!(matches!(err, SlotError::InvalidConfig(_)));
}

#[test]
fn malformed_salon_json_is_a_json_error() {
    assert!(matches!(
        SalonSchedule::from_json("{not json"),
        Err(SlotError::Json(_))
    ));
}

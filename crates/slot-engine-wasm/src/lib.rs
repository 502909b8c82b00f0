//! WASM bindings for slot-engine.
//!
//! Exposes the candidate grid, single-day slot computation and the weekly
//! salon schedule to the browser booking widget via `wasm-bindgen`. All
//! complex types are passed as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::NaiveDateTime;
use slot_engine::records::{self, RawAppointment, RawService};
use slot_engine::{AvailabilityCalculator, SalonSchedule, SlotPolicy, TimeOfDay};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers: JSON in, JSON out
// ---------------------------------------------------------------------------

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Parse a policy document; an empty string means the default 09:00–17:00 policy.
fn parse_policy(json: &str) -> Result<AvailabilityCalculator, JsValue> {
    let policy = if json.trim().is_empty() {
        SlotPolicy::default()
    } else {
        SlotPolicy::from_json(json).map_err(js_err)?
    };
    AvailabilityCalculator::new(policy).map_err(js_err)
}

fn parse_service(json: &str) -> Result<RawService, JsValue> {
    if json.trim().is_empty() {
        return Ok(RawService::default());
    }
    serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid service JSON: {}", e)))
}

fn parse_appointments(json: &str) -> Result<Vec<RawAppointment>, JsValue> {
    records::parse_appointments_json(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid appointments JSON: {}", e)))
}

/// Accepts `YYYY-MM-DDTHH:MM[:SS]`, the shape `Date.toISOString().slice(0, 19)` produces.
fn parse_now(s: &str) -> Result<NaiveDateTime, JsValue> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|e| JsValue::from_str(&format!("Invalid datetime '{}': {}", s, e)))
}

fn to_json(slots: &[TimeOfDay]) -> Result<String, JsValue> {
    serde_json::to_string(slots)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Every candidate start time for a policy, as a JSON array of `"HH:MM"`.
///
/// `policy_json` is `{open, close, granularity_minutes}` or an empty string
/// for the default policy.
#[wasm_bindgen(js_name = "candidateGrid")]
pub fn candidate_grid(policy_json: &str) -> Result<String, JsValue> {
    to_json(&parse_policy(policy_json)?.candidate_grid())
}

/// Bookable start times for one day.
///
/// `appointments_json` is an array of `{date, time, duration_minutes}` rows
/// already scoped to the target date; rows with malformed times are ignored.
#[wasm_bindgen(js_name = "availableSlots")]
pub fn available_slots(
    policy_json: &str,
    service_json: &str,
    appointments_json: &str,
) -> Result<String, JsValue> {
    let calculator = parse_policy(policy_json)?;
    let service = parse_service(service_json)?.coerce();
    let appointments = records::coerce_all(&parse_appointments(appointments_json)?);

    to_json(&calculator.available_slots(service.duration_minutes, &appointments))
}

/// Bookable start times on `date` using the salon's weekly hours and lead time.
///
/// `appointments_json` may contain every appointment the salon has; only
/// those on `date` are considered. `now` is the browser's local time.
#[wasm_bindgen(js_name = "availableTimes")]
pub fn available_times(
    salon_json: &str,
    date: &str,
    service_json: &str,
    appointments_json: &str,
    now: &str,
) -> Result<String, JsValue> {
    let schedule = SalonSchedule::from_json(salon_json).map_err(js_err)?;
    let date = records::parse_date_strict(date).map_err(js_err)?;
    let service = parse_service(service_json)?.coerce();
    let appointments = records::coerce_all(&parse_appointments(appointments_json)?);
    let now = parse_now(now)?;

    to_json(&schedule.available_times(date, service, &appointments, now))
}

/// Whether the salon accepts bookings on `date` at all (not past, not closed).
#[wasm_bindgen(js_name = "isDateAvailable")]
pub fn is_date_available(salon_json: &str, date: &str, now: &str) -> Result<bool, JsValue> {
    let schedule = SalonSchedule::from_json(salon_json).map_err(js_err)?;
    let date = records::parse_date_strict(date).map_err(js_err)?;
    let now = parse_now(now)?;
    Ok(schedule.is_date_available(date, now.date()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // JsValue cannot be constructed off-wasm, so only success paths run natively.

    #[test]
    fn default_grid_has_sixteen_entries() {
        let json = candidate_grid("").unwrap();
        let grid: Vec<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(grid.len(), 16);
        assert_eq!(grid[0], "09:00");
    }

    #[test]
    fn available_slots_skips_malformed_rows() {
        let json = available_slots(
            "",
            r#"{"durationMinutes":30}"#,
            r#"[{"date":"2026-03-16","time":"09:00","duration_minutes":30},
                {"date":"2026-03-16","time":"??","duration_minutes":480}]"#,
        )
        .unwrap();
        let slots: Vec<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(slots.len(), 15);
        assert_eq!(slots[0], "09:30");
    }

    #[test]
    fn available_times_uses_salon_hours() {
        let json = available_times(
            r#"{"openingHours":{"za":{"start":"10:00","end":"12:00"}},"leadTimeHours":1}"#,
            "2026-03-21",
            "{}",
            "[]",
            "2026-03-21T09:45:00",
        )
        .unwrap();
        let slots: Vec<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(slots, ["11:00", "11:30"]);
    }

    #[test]
    fn closed_day_is_not_available() {
        let salon = r#"{"opening_hours":{"ma":{"start":"09:00","end":"17:00"}}}"#;
        assert!(is_date_available(salon, "2026-03-16", "2026-03-10T12:00").unwrap());
        assert!(!is_date_available(salon, "2026-03-17", "2026-03-10T12:00").unwrap());
    }
}

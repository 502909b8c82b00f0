//! # slot-engine
//!
//! Deterministic appointment slot availability for salon booking.
//!
//! Given business hours, a slot granularity, a service duration and the
//! appointments already booked on a date, the engine returns the ordered start
//! times at which the service can still be booked without overlapping anything
//! and without running past closing time.
//!
//! ## Quick start
//!
//! ```rust
//! use slot_engine::{AvailabilityCalculator, SlotPolicy};
//!
//! let calculator = AvailabilityCalculator::new(SlotPolicy::default()).unwrap();
//! let slots = calculator.available_slots(Some(60), &[]);
//! assert_eq!(slots.first().unwrap().to_string(), "09:00");
//! assert_eq!(slots.last().unwrap().to_string(), "16:00");
//! ```
//!
//! ## Modules
//!
//! - [`calculator`] — candidate grid and bookable slots for one day
//! - [`schedule`] — weekly opening hours, closed days, lead time
//! - [`records`] — coercion of loosely-typed storage rows at the boundary
//! - [`policy`] — business hours and slot granularity with validation
//! - [`interval`] — half-open minute intervals and the overlap test
//! - [`time`] — `TimeOfDay` parsing and formatting
//! - [`model`] — strict `Appointment` and `ServiceSpec` inputs
//! - [`error`] — Error types

pub mod calculator;
pub mod error;
pub mod interval;
pub mod model;
pub mod policy;
pub mod records;
pub mod schedule;
pub mod time;

pub use calculator::{available_slots, AvailabilityCalculator};
pub use error::SlotError;
pub use model::{Appointment, ServiceSpec};
pub use policy::{BusinessHours, SlotPolicy};
pub use records::{appointments_on, RawAppointment, RawService};
pub use schedule::{DayHours, OpeningHours, SalonConfig, SalonSchedule};
pub use time::TimeOfDay;

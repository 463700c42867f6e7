//! Pure scheduling engine for CHIRP Radio's on-air surfaces.
//!
//! Everything in this crate is a synchronous pure function over immutable
//! inputs: the host hands in the member roster, the weekly schedule table,
//! the live now-playing signal, and the clock, and gets back "who is on air",
//! a bucketed day grid, or the next concrete occurrence of a recurring show.
//! The crate holds no clocks, no I/O, and no shared state; the daemon owns
//! all of that and is free to call in redundantly.

pub mod error;
pub mod ics;
pub mod project;
pub mod roster;
pub mod schedule;
pub mod timefmt;

pub use error::ScheduleError;
pub use project::{Occurrence, ShowSlot};
pub use roster::{Member, NowPlaying, OnAirSource, ResolvedOnAir};
pub use schedule::{DayColumn, ScheduleEntry};

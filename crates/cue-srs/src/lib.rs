//! SRS (Spaced Repetition System) library for Cue
//!
//! This crate provides the core spaced repetition algorithm and the rules that
//! hang off a successful review: experience points, the daily streak and the
//! level derived from experience.
//!
//! Everything in here is pure. Callers supply "now" (or use the convenience
//! wrappers that read the system clock) and persist the results themselves.

mod progress;
mod rating;
mod schedule;

pub use progress::{Level, XP_PER_REVIEW, level_for_xp, next_streak};
pub use rating::{Rating, quality_from_verdict, quality_from_voice_score};
pub use schedule::{
    DEFAULT_EASE_FACTOR, MAX_QUALITY, MIN_EASE_FACTOR, PASSING_QUALITY, Schedule,
    SchedulingState, compute_next_schedule, compute_next_schedule_at,
};

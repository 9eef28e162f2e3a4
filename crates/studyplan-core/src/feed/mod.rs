//! Backend feed: one-shot reads of events, courses, time-blockers and
//! assignments, plus the schedule-generation trigger.
//!
//! No retry, no caching. Lenient `fetch_*` calls log failures and return
//! an empty list, so "no events" and "fetch error" look the same to the
//! layout engine; `try_fetch_*` keep the error for callers that care.

pub mod assignment;
pub mod client;

pub use assignment::{Assignment, Difficulty};
pub use client::{ApiClient, API_TOKEN_ENV};

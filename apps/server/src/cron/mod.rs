//! Scheduled jobs
//!
//! A [`CronTrigger`] owns one [`ScheduledJob`] and gives every firing its own
//! execution context, mirroring what the request middleware does for HTTP.

pub mod job;
pub mod trigger;

pub use job::{HeartbeatJob, ScheduledJob};
pub use trigger::{CronTrigger, FireReport};

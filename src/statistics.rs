//! Hourly and multi-day power statistics.
//!
//! Five-minute readings are folded into 24 hourly buckets per day, and then the days
//! are rolled up into per-hour-of-day aggregates. Everything in here is pure:
//! no I/O, no shared state, and «no data» is signalled with [`None`].

pub mod hourly;
pub mod moments;
pub mod multi_day;
pub mod profile;
pub mod rows;

pub use self::{
    hourly::DailyStatistics,
    multi_day::MultiDayStatistics,
    profile::HourlyProfile,
    rows::hourly_rows,
};

pub const HOURS_PER_DAY: usize = 24;

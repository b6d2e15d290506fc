//! Library crate behind the `nowtask` binary: the task model, JSON
//! storage, and the pure read-model engines (statistics, free time,
//! gauge occupancy, ranking, calendar, history).

pub mod analytics;
pub mod calendar;
pub mod charts;
pub mod commands;
pub mod filter;
pub mod gauge;
pub mod migration;
pub mod models;
pub mod ranking;
pub mod repository;
pub mod storage;
pub mod tui;
pub mod validate;

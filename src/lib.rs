//! azcost — price Azure Commerce usage aggregates against a rate card and
//! report the top-N most expensive line items per day.
//!
//! The pricing pipeline (`services::report::build`) is a pure function of
//! (rate card, usage sequence, date window, top-N); all I/O lives in `client`.

pub mod cli;
pub mod client;
pub mod services;
pub mod types;

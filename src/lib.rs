//! Overtime risk & compliance analysis engine.
//!
//! Given an employee's clock events, scheduled shifts, and breaks for the
//! current pay week, the engine computes actual and projected hours, maps the
//! projection to a risk tier, detects schedule violations (early clock-ins,
//! late clock-outs, short breaks), and generates ranked remediation
//! strategies, including a capacity-constrained shift-swap search across the
//! workforce.
//!
//! The crate is a library invoked by two schedulers: a periodic sweep over
//! all employees ([`domain::OvertimeMonitor`]) and a synchronous per-employee
//! check fired after every clock event
//! ([`domain::OvertimeMonitor::on_clock_event`]). Storage, directory lookup,
//! and message delivery live behind the outbound ports in
//! [`domain::ports::outbound`].

pub mod config;
pub mod domain;

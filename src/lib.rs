//! Fleet ledger engine for small vehicle fleets
//!
//! This crate tracks driver shifts through an approval workflow, keeps an
//! append-only cash ledger, and derives payroll, cash position and
//! performance reports from both tables. Persistence goes through a
//! table store with a read cache and rate-limit retries; an axum API
//! exposes every operation behind HTTP Basic authentication.

#![warn(missing_docs)]

pub mod api;
pub mod auth;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod store;

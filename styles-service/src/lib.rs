//! HTTP service for per-element margin and padding styles stored in Postgres

pub mod config;
pub mod db;
pub mod error;
pub mod store;
pub mod telemetry;
pub mod web;

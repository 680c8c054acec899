//! Asset template studio backend.
//!
//! Turns uploaded HTML into placeholder templates bound to JSON data, stores
//! them, and renders filled templates to JPEG or PDF through an external
//! render API.

pub mod clients;
pub mod config;
pub mod engine;
pub mod error;
pub mod job_controller;
pub mod pdf;
pub mod services;
pub mod state;
pub mod store;

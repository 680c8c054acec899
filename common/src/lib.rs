//! Data model shared by the asset studio backend and its clients.
//!
//! - `model`: field paths, placeholder tokens, element mappings and the persisted
//!   template, collection and case study records.
//! - `requests`: JSON payloads accepted and returned by the HTTP API.
//! - `jobs`: status of background batch render jobs, as polled by clients.

pub mod jobs;
pub mod model;
pub mod requests;

//! DCA Case API Library
//!
//! Serves debt-collection cases, read from a CSV source on every request,
//! to an admin dashboard (every case plus aggregate metrics) and a
//! collections-agent dashboard (the assigned subset).
//!
//! # Modules
//!
//! - `api`: HTTP-facing components.
//! - `core`: Case normalization, classification, views and metrics.
//! - `data`: Case sources.
//! - `app`: Router assembly.
//! - `classifier`: Recovery probability to priority mapping.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `metrics`: Aggregate metrics.
//! - `models`: Case, view and response models.
//! - `normalizer`: Raw row to `Case` conversion.
//! - `prepare`: Batch preparation of the served CSV.
//! - `source`: CSV loading.
//! - `views`: Full and assigned case views.

pub mod api;
pub mod core;
pub mod data;

pub mod app;
pub mod classifier;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod normalizer;
pub mod prepare;
pub mod source;
pub mod views;

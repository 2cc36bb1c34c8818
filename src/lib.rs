//! textclass — terminal and web client for a text-classification service.
//!
//! Two independent front ends share one HTTP client:
//!
//! - [`dashboard`] ranks model-comparison records and renders charts plus a
//!   table, falling back to built-in sample data when the backend has none.
//! - [`classify`] drives a classification form through one request per
//!   submission and renders the prediction.

pub mod analytics;
pub mod api;
pub mod classify;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod web;

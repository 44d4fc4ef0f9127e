//! Outlay - Expense Tracking and Approval Backend
//!
//! This crate implements the expense lifecycle, segment allocation,
//! configurable multi-step approval workflows, and budget consumption
//! monitoring with threshold-triggered alerting.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

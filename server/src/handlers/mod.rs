//! HTTP handlers

pub mod health;
pub mod exhibits;
pub mod readings;
pub mod anomaly;
pub mod vision;

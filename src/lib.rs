//! Household TV guide: library browsing, streaming-service resolution and
//! Fire TV / Sonos remote control through Home Assistant.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

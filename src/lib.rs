pub mod api;
pub mod calendar;
pub mod config;
pub mod error;
pub mod geo;
pub mod map;
pub mod models;
pub mod observability;
pub mod state;

pub mod commands;
pub mod match_data;
pub mod router;
pub mod session;
pub mod stats;
pub mod templates;
pub mod views;

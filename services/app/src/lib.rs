pub mod adapters;
pub mod config;
pub mod error;
pub mod notes;
pub mod state;

// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod health;
pub mod photos;
pub mod review;

pub use health::config as health_config;
pub use photos::config as photos_config;
pub use review::config as review_config;

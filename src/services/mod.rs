// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod imaging;
pub mod photo_service;
pub mod review_service;
pub mod storage;

pub use photo_service::*;
pub use review_service::*;
pub use storage::*;

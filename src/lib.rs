pub mod configuration;
pub mod dao;
pub mod error;
pub mod farms;
pub mod handler;
pub mod helpers;
pub mod provider;
pub mod types;

//! Request handlers

pub mod auth;
pub mod health;
pub mod model;
pub mod predict;
pub mod sensor;

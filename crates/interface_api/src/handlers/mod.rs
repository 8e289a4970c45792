//! Request handlers

pub mod health;
pub mod members;
pub mod transfers;

//! Request and response bodies

pub mod member;

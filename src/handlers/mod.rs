// src/handlers/mod.rs
pub mod compare;
pub mod coverage;
pub mod error;
pub mod metals;

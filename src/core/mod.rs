//! Core library components.
//!
//! This module contains the rotation workflow and the collaborators it
//! drives: key generation, the secret store, and run configuration.

pub mod audit;
pub mod batch;
pub mod config;
pub mod constants;
pub mod keygen;
pub mod pair;
pub mod rotation;
pub mod sink;
pub mod types;
pub mod validation;

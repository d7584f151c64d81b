//! High-level operations.
//!
//! This module contains the implementation of cmakegen commands.

pub mod clean;
pub mod generate;

pub use clean::{clean, CleanOptions, CleanOutcome};
pub use generate::{build_root_for, generate, plan, GenerateOptions, GenerationPlan};

//! Foundational types: monetary parsing and formatting, identifiers,
//! and validated quote inputs.

pub mod ids;
pub mod input;
pub mod money;

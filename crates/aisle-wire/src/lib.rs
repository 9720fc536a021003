#![doc = include_str!("../README.md")]

mod common;
pub use common::*;
// Public re-export so downstream crates can access `aisle` via
// `aisle_wire::aisle`
pub use aisle;

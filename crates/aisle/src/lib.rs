#![doc = include_str!("../README.md")]

mod error;
mod grid;

pub use crate::error::*;
pub use crate::grid::*;

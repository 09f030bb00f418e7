pub mod inlining;

pub use crate::inlining::*;

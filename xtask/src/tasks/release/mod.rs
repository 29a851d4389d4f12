//! The runnable `release/` tree: assembly and launch.

pub mod assemble;
pub mod launch;

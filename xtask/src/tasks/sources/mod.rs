//! Source acquisition: pinned git checkouts and the map compiler toolchain.

pub mod clone;
pub mod toolchain;

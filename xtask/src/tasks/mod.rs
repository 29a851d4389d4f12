pub mod build;
pub mod release;
pub mod sources;
pub mod tooling;

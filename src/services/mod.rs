//! Business logic services

pub mod library;
pub mod seed;

pub use library::Library;
pub use seed::SeedData;

//! CLI Commands

pub mod dump;
pub mod eval;
pub mod person;
pub mod seed;

pub use dump::DumpCommand;
pub use eval::EvalCommand;
pub use person::PersonCommand;
pub use seed::SeedCommand;

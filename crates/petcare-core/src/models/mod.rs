//! Domain models for the petcare system.

mod account;
mod appointment;
mod clinic;
mod pet;

pub use account::*;
pub use appointment::*;
pub use clinic::*;
pub use pet::*;

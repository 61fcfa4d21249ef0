//! HTTP endpoint handlers.

pub mod appointments;
pub mod clinics;
pub mod health;
pub mod pets;
pub mod slots;

//! PetCare Core Library
//!
//! Appointment scheduling for veterinary clinics: conflict-free booking,
//! owner requests with clinic-side approval, and free-slot discovery.
//!
//! # Architecture
//!
//! ```text
//!   Owner request ──────────┐        Vet direct booking
//!   (PENDING_APPROVAL)      │        (CONFIRMED)
//!                           ▼               │
//!                ┌─────────────────────┐    │
//!                │  Access checks      │◄───┘
//!                │  (ACTIVE membership │
//!                │   + clinic role)    │
//!                └──────────┬──────────┘
//!                           │
//!              BEGIN IMMEDIATE transaction
//!                           │
//!                ┌──────────▼──────────┐
//!                │  Conflict checker   │  [start, end) overlap per (vet, clinic)
//!                └──────────┬──────────┘
//!                           │
//!                ┌──────────▼──────────┐
//!                │  SQLite + overlap   │
//!                │  triggers           │
//!                └─────────────────────┘
//!
//!   PENDING_APPROVAL ──► CONFIRMED ──► COMPLETED
//!          │                 │
//!          └──► CANCELLED ◄──┤
//!          └──► NO_SHOW   ◄──┘
//! ```
//!
//! # Core Principle
//!
//! **A vet is never double-booked within a clinic.** Every check-then-write
//! runs under one write lock, and the storage layer rejects overlapping rows.
//!
//! # Modules
//!
//! - [`db`]: SQLite storage for accounts, clinics, pets and appointments
//! - [`models`]: Domain types (Account, Clinic, Pet, Appointment, etc.)
//! - [`scheduling`]: Time ranges, conflict detection and slot generation
//! - [`access`]: Clinic role checks
//! - [`booking`]: The booking workflow built on the layers above

pub mod access;
pub mod booking;
pub mod db;
pub mod models;
pub mod scheduling;

// Re-export commonly used types
pub use booking::{
    AppointmentRequest, BookingError, BookingPolicy, BookingResult, DirectBooking, ManageAction,
    ScheduleQuery, Scheduler,
};
pub use db::{hash_token, Database, DbError, DbResult};
pub use models::{
    Account, AccountKind, Appointment, AppointmentStatus, Clinic, ClinicMember, MemberRole,
    MemberStatus, Pet,
};
pub use scheduling::{ConflictChecker, SlotFinder, TimeRange, WorkWindow};

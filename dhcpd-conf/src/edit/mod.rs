//! Add, update and remove host reservations in configuration text.

pub mod engine;
pub mod outcome;

pub use engine::{
    add_reservation, remove_reservation, AlwaysAccept, AlwaysDecline, Confirm, ConfirmFn,
    ConflictPolicy, ReservationEditor,
};
pub use outcome::{EditError, Outcome};

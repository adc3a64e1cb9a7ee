//! Reservation export formatters.

pub mod csv;
pub mod json;

pub use csv::format_csv;
pub use json::format_json;

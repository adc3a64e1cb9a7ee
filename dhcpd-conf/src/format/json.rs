use crate::record::Reservation;

/// Format reservations as a pretty-printed JSON array.
pub fn format_json(reservations: &[Reservation]) -> String {
    serde_json::to_string_pretty(reservations).unwrap_or_else(|_| "[]".to_string())
}

//! Structured editing of host reservations in ISC dhcpd configuration text.
//!
//! The configuration is never rebuilt from a model: a single scan locates
//! every `host <name> { ... }` block and all edits splice text at the spans it
//! reports, so everything outside the touched block is preserved byte for byte.

pub mod document;
pub mod edit;
pub mod format;
pub mod record;
pub mod scanner;
pub mod writer;

pub use document::{
    extract_all_reservations, find_reservation_block, find_reservation_by_mac, read_file,
    ConfigDocument, Segment,
};
pub use edit::{
    add_reservation, remove_reservation, AlwaysAccept, AlwaysDecline, Confirm, ConfirmFn,
    ConflictPolicy, EditError, Outcome, ReservationEditor,
};
pub use format::{format_csv, format_json};
pub use record::{
    build_fqdn, normalize_mac, validate_ip, RecordError, Reservation, ReservationRecord,
};
pub use scanner::{scan_blocks, HostBlock};
pub use writer::{build_reservation_block, line_ending, render_block, with_line_ending};

//! Guarded editing of host reservations in an ISC dhcpd configuration file.
//!
//! Text-level editing lives in `dhcpd-conf`; this crate wraps it with
//! everything needed to touch a live configuration safely.
//!
//! # Architecture
//!
//! - [`settings`]: Built-in defaults, settings file, environment and flag precedence
//! - [`batch`]: `hostname,mac,ip` rows from a CSV file
//! - [`oracle`]: Syntax checking through `dhcpd -t -cf`
//! - [`backup`]: Timestamped backups, restores and atomic writes
//! - [`prompt`]: Yes/no conflict confirmation on the terminal
//! - [`pipeline`]: Validate, back up, edit, write, re-validate and roll back
//! - [`report`]: Colored per-record results and the run summary
//!
//! # Examples
//!
//! ```ignore
//! use dhcp_reservations::batch::read_records;
//! use dhcp_reservations::oracle::DhcpdOracle;
//! use dhcp_reservations::pipeline::{BatchAction, Pipeline, PipelineOptions};
//! use dhcp_reservations::settings::{resolve, Overrides};
//! use dhcpd_conf::AlwaysDecline;
//!
//! let settings = resolve(None, Overrides::default())?;
//! let oracle = DhcpdOracle::from_settings(&settings.validator);
//! let pipeline = Pipeline {
//!     config_path: &settings.config_path,
//!     domain: &settings.domain,
//!     options: PipelineOptions::default(),
//!     oracle: &oracle,
//! };
//! let report = pipeline.run(BatchAction::Add, &read_records("hosts.csv".as_ref())?, &mut AlwaysDecline)?;
//! println!("{} of {} applied", report.succeeded(), report.total());
//! ```

pub mod backup;
pub mod batch;
pub mod oracle;
pub mod pipeline;
pub mod prompt;
pub mod report;
pub mod settings;

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use dhcp_reservations::batch::{read_records, BatchRow};
use dhcp_reservations::oracle::DhcpdOracle;
use dhcp_reservations::pipeline::{BatchAction, BatchReport, Pipeline, PipelineOptions};
use dhcp_reservations::prompt::{Interrupt, TerminalConfirm};
use dhcp_reservations::report::{render_records, render_summary};
use dhcp_reservations::settings::Settings;
use dhcpd_conf::{ConflictPolicy, ReservationRecord};

use crate::cli::{AddArgs, RemoveArgs, SafetyArgs};

pub fn run_add(settings: &Settings, args: AddArgs) -> Result<()> {
    let rows = match &args.file {
        Some(file) => read_records(file)?,
        None => {
            let row = BatchRow {
                line: 0,
                hostname: args.hostname.unwrap_or_default(),
                mac: args.mac.unwrap_or_default(),
                ip: args.ip.unwrap_or_default(),
            };
            // Reject bad input before a backup is taken.
            ReservationRecord::new(&row.hostname, &row.mac, &row.ip)
                .with_context(|| format!("invalid reservation for {}", row.hostname))?;
            vec![row]
        }
    };
    run_pipeline(settings, BatchAction::Add, &rows, &args.safety)
}

pub fn run_remove(settings: &Settings, args: RemoveArgs) -> Result<()> {
    let rows = match &args.file {
        Some(file) => read_records(file)?,
        None => vec![BatchRow {
            line: 0,
            hostname: args.hostname.unwrap_or_default(),
            mac: String::new(),
            ip: String::new(),
        }],
    };
    run_pipeline(settings, BatchAction::Remove, &rows, &args.safety)
}

fn run_pipeline(
    settings: &Settings,
    action: BatchAction,
    rows: &[BatchRow],
    safety: &SafetyArgs,
) -> Result<()> {
    let oracle = DhcpdOracle::from_settings(&settings.validator);
    let options = PipelineOptions {
        backup: !safety.no_backup,
        validate: !safety.skip_validation,
        policy: if safety.non_interactive {
            ConflictPolicy::Fail
        } else {
            ConflictPolicy::Prompt
        },
    };
    let pipeline = Pipeline {
        config_path: &settings.config_path,
        domain: &settings.domain,
        options,
        oracle: &oracle,
    };

    let interrupt = Arc::new(Interrupt::default());
    if options.policy == ConflictPolicy::Prompt {
        install_interrupt_handler(Arc::clone(&interrupt))?;
    }
    let mut confirm = TerminalConfirm::stdio(interrupt);
    let report = match pipeline.run(action, rows, &mut confirm) {
        Ok(report) => report,
        Err(failure) => {
            if let Some(report) = &failure.report {
                print_report(report, &settings.config_path);
            }
            return Err(failure.error.into());
        }
    };

    print_report(&report, &settings.config_path);
    if !report.is_success() {
        bail!("{} of {} records failed", report.failed(), report.total());
    }
    Ok(())
}

/// Ctrl-C at a conflict prompt declines that record; anywhere else it ends
/// the process with the usual status.
fn install_interrupt_handler(interrupt: Arc<Interrupt>) -> Result<()> {
    ctrlc::set_handler(move || {
        if !interrupt.signal() {
            std::process::exit(130);
        }
    })
    .context("failed to install Ctrl-C handler")
}

fn print_report(report: &BatchReport, config_path: &Path) {
    println!("{}", render_records(report));
    if let Some(backup) = &report.backup {
        println!("Backup: {}", backup.display());
    }
    if !report.changed {
        println!("No changes written to {}", config_path.display());
    }
    println!("{}", render_summary(report));
}

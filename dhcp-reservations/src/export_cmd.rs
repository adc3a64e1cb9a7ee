use std::fs;

use anyhow::{Context, Result};
use dhcp_reservations::settings::Settings;
use dhcpd_conf::{extract_all_reservations, format_csv, format_json, read_file};

use crate::cli::{ExportArgs, ExportFormat};
use crate::path_guard;

pub fn run_export(settings: &Settings, args: ExportArgs) -> Result<()> {
    let config = &settings.config_path;
    if let Some(out_path) = &args.output {
        path_guard::ensure_not_config(out_path, config)?;
    }

    let text = read_file(config)
        .with_context(|| format!("failed reading config {}", config.display()))?;
    let reservations = extract_all_reservations(&text);
    if reservations.is_empty() {
        println!("No DHCP reservations found");
        return Ok(());
    }

    let payload = match args.format {
        ExportFormat::Csv => format_csv(&reservations, !args.no_header),
        ExportFormat::Json => format!("{}\n", format_json(&reservations)),
    };

    match &args.output {
        Some(out_path) => {
            fs::write(out_path, payload)
                .with_context(|| format!("failed to write export {}", out_path.display()))?;
            println!(
                "Exported {} reservations to {}",
                reservations.len(),
                out_path.display()
            );
        }
        None => print!("{payload}"),
    }
    Ok(())
}

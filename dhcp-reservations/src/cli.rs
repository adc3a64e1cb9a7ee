use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "dhcp-reservations")]
#[command(about = "Manage host reservations in an ISC dhcpd configuration file")]
pub struct Cli {
    /// dhcpd.conf to edit (overrides DHCPD_CONF_PATH and the settings file).
    #[arg(long, global = true)]
    pub config_file: Option<PathBuf>,
    /// Domain appended to hostnames (overrides DHCPD_DOMAIN and the settings file).
    #[arg(long, global = true)]
    pub domain: Option<String>,
    /// Settings TOML file (defaults to DHCP_RESERVATIONS_SETTINGS, then built-in values).
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,
    /// Enable debug logging on stderr.
    #[arg(long, global = true)]
    pub debug: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Add or update reservations.
    Add(AddArgs),
    /// Remove reservations by hostname.
    Remove(RemoveArgs),
    /// Print every reservation as CSV or JSON.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Hostname without domain.
    #[arg(long, required_unless_present = "file", conflicts_with = "file", requires_all = ["mac", "ip"])]
    pub hostname: Option<String>,
    /// MAC address, colon or dash separated.
    #[arg(long, requires = "hostname")]
    pub mac: Option<String>,
    /// IPv4 address.
    #[arg(long, requires = "hostname")]
    pub ip: Option<String>,
    /// CSV file of `hostname,mac,ip` rows.
    #[arg(long)]
    pub file: Option<PathBuf>,
    #[command(flatten)]
    pub safety: SafetyArgs,
}

#[derive(Parser, Debug)]
pub struct RemoveArgs {
    /// Hostname without domain.
    #[arg(long, required_unless_present = "file", conflicts_with = "file")]
    pub hostname: Option<String>,
    /// CSV file whose first column lists hostnames.
    #[arg(long)]
    pub file: Option<PathBuf>,
    #[command(flatten)]
    pub safety: SafetyArgs,
}

#[derive(Args, Debug)]
pub struct SafetyArgs {
    /// Do not back up the configuration before writing.
    #[arg(long)]
    pub no_backup: bool,
    /// Skip `dhcpd -t` before and after the edit.
    #[arg(long)]
    pub skip_validation: bool,
    /// Fail on MAC conflicts instead of prompting.
    #[arg(long)]
    pub non_interactive: bool,
    /// dhcpd binary used for syntax validation.
    #[arg(long)]
    pub validator: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Write to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Omit the CSV header row.
    #[arg(long)]
    pub no_header: bool,
    /// Output format.
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

use std::fmt::Write as _;

use crate::record::build_fqdn;

/// Render the canonical host block for a reservation.
///
/// ```text
/// host <fqdn> {
///   hardware ethernet <mac>;
///   fixed-address <ip>;
/// }
/// ```
pub fn build_reservation_block(hostname: &str, mac: &str, ip: &str, domain: &str) -> String {
    render_block(&build_fqdn(hostname, domain), mac, ip, "", &[])
}

/// Render a host block at `indent`, re-emitting `extras` after the two
/// modelled statements.
pub fn render_block(fqdn: &str, mac: &str, ip: &str, indent: &str, extras: &[String]) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "{indent}host {fqdn} {{");
    let _ = writeln!(out, "{indent}  hardware ethernet {mac};");
    let _ = writeln!(out, "{indent}  fixed-address {ip};");
    for extra in extras {
        let _ = writeln!(out, "{indent}  {extra}");
    }
    let _ = writeln!(out, "{indent}}}");
    out
}

/// Line terminator used by `text`: `\r\n` when its first line ends that way.
pub fn line_ending(text: &str) -> &'static str {
    match text.find('\n') {
        Some(pos) if text[..pos].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

/// Convert a rendered block to `newline` terminators. Verbatim extras may
/// already carry `\r\n`, so those are folded first.
pub fn with_line_ending(rendered: String, newline: &str) -> String {
    if newline == "\n" {
        rendered
    } else {
        rendered.replace("\r\n", "\n").replace('\n', newline)
    }
}

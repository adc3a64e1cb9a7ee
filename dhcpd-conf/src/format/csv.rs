use crate::record::Reservation;

/// Format reservations as `hostname,mac,ip` rows, one per line.
pub fn format_csv(reservations: &[Reservation], include_header: bool) -> String {
    let mut lines = Vec::with_capacity(reservations.len() + 1);
    if include_header {
        lines.push("hostname,mac,ip".to_string());
    }
    for reservation in reservations {
        lines.push(format!(
            "{},{},{}",
            quote(&reservation.fqdn),
            quote(&reservation.mac),
            quote(&reservation.ip)
        ));
    }
    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

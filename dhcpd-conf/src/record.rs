use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use thiserror::Error;

/// Errors raised while validating a reservation triple.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Hostname was empty after trimming.
    #[error("hostname is empty")]
    EmptyHostname,
    /// MAC address is not six colon or dash separated hex octets.
    #[error("invalid MAC address: {0}")]
    InvalidMac(String),
    /// IP address is not a dotted quad with octets in 0-255.
    #[error("invalid IP address: {0}")]
    InvalidIp(String),
}

/// A validated `(hostname, mac, ip)` triple ready to be written as a host block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRecord {
    /// Short hostname or FQDN as supplied by the caller.
    pub hostname: String,
    /// Canonical MAC (`aa:bb:cc:dd:ee:ff`).
    pub mac: String,
    /// IPv4 address exactly as supplied.
    pub ip: String,
}

impl ReservationRecord {
    /// Validate and normalize a raw triple.
    pub fn new(hostname: &str, mac: &str, ip: &str) -> Result<Self, RecordError> {
        let hostname = hostname.trim();
        if hostname.is_empty() {
            return Err(RecordError::EmptyHostname);
        }
        let mac = normalize_mac(mac).ok_or_else(|| RecordError::InvalidMac(mac.to_string()))?;
        let ip = ip.trim();
        if !validate_ip(ip) {
            return Err(RecordError::InvalidIp(ip.to_string()));
        }
        Ok(Self {
            hostname: hostname.to_string(),
            mac,
            ip: ip.to_string(),
        })
    }
}

/// A reservation as found in configuration text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    #[serde(rename = "hostname")]
    pub fqdn: String,
    pub mac: String,
    pub ip: String,
}

impl Display for Reservation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} -> {}", self.fqdn, self.mac, self.ip)
    }
}

/// Normalize a MAC address to lowercase colon-separated form.
///
/// Dashes are accepted as separators. Returns `None` for anything that is not
/// exactly six two-digit hex groups.
pub fn normalize_mac(raw: &str) -> Option<String> {
    let mac = raw.trim().to_ascii_lowercase().replace('-', ":");
    let groups: Vec<&str> = mac.split(':').collect();
    let well_formed = groups.len() == 6
        && groups
            .iter()
            .all(|group| group.len() == 2 && group.bytes().all(|b| b.is_ascii_hexdigit()));
    well_formed.then_some(mac)
}

/// Check that `raw` is a dotted quad with every octet in `0..=255`.
///
/// The literal is not canonicalized; `010.0.0.1` passes and is stored as is.
pub fn validate_ip(raw: &str) -> bool {
    let parts: Vec<&str> = raw.split('.').collect();
    parts.len() == 4
        && parts.iter().all(|part| {
            !part.is_empty()
                && part.bytes().all(|b| b.is_ascii_digit())
                && part.parse::<u32>().is_ok_and(|octet| octet <= 255)
        })
}

/// Append `domain` to `hostname` unless it is already qualified with it.
pub fn build_fqdn(hostname: &str, domain: &str) -> String {
    if domain.is_empty() || hostname.ends_with(&format!(".{domain}")) {
        hostname.to_string()
    } else {
        format!("{hostname}.{domain}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_and_colon_macs_normalize_to_same_value() {
        assert_eq!(
            normalize_mac("AA-BB-CC-DD-EE-FF"),
            Some("aa:bb:cc:dd:ee:ff".to_string())
        );
        assert_eq!(
            normalize_mac("aa:bb:cc:dd:ee:ff"),
            normalize_mac("AA-BB-CC-DD-EE-FF")
        );
    }

    #[test]
    fn malformed_macs_are_rejected() {
        assert_eq!(normalize_mac("aa:bb:cc"), None);
        assert_eq!(normalize_mac("not-a-mac"), None);
        assert_eq!(normalize_mac("aa:bb:cc:dd:ee:fg"), None);
        assert_eq!(normalize_mac("aabb.ccdd.eeff"), None);
        assert_eq!(normalize_mac("a:bb:cc:dd:ee:fff"), None);
    }

    #[test]
    fn ip_validation_checks_shape_and_range() {
        assert!(validate_ip("192.168.1.100"));
        assert!(validate_ip("0.0.0.0"));
        assert!(!validate_ip("256.1.1.1"));
        assert!(!validate_ip("1.2.3"));
        assert!(!validate_ip("1.2.3.4.5"));
        assert!(!validate_ip("1.2.3.-4"));
        assert!(!validate_ip("1..2.3"));
        assert!(!validate_ip("a.b.c.d"));
    }

    #[test]
    fn fqdn_is_not_double_qualified() {
        assert_eq!(build_fqdn("mac01", "example.com"), "mac01.example.com");
        assert_eq!(
            build_fqdn("mac01.example.com", "example.com"),
            "mac01.example.com"
        );
        assert_eq!(build_fqdn("mac01", ""), "mac01");
    }

    #[test]
    fn record_rejects_each_bad_field() {
        assert_eq!(
            ReservationRecord::new("  ", "aa:bb:cc:dd:ee:ff", "10.0.0.1"),
            Err(RecordError::EmptyHostname)
        );
        assert!(matches!(
            ReservationRecord::new("a", "zz", "10.0.0.1"),
            Err(RecordError::InvalidMac(_))
        ));
        assert!(matches!(
            ReservationRecord::new("a", "aa:bb:cc:dd:ee:ff", "10.0.0.256"),
            Err(RecordError::InvalidIp(_))
        ));

        let record = ReservationRecord::new(" a ", "AA-BB-CC-DD-EE-FF", " 10.0.0.1 ").unwrap();
        assert_eq!(record.hostname, "a");
        assert_eq!(record.mac, "aa:bb:cc:dd:ee:ff");
        assert_eq!(record.ip, "10.0.0.1");
    }
}

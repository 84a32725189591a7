//! `value_parser` functions for arguments clap cannot check on its own.

use std::fs::File;
use std::net::IpAddr;
use std::path::PathBuf;

/// Longest DNS name accepted for `--host`.
const MAX_HOSTNAME_LEN: usize = 253;

pub fn validate_port(raw: &str) -> Result<u16, String> {
    match raw.parse::<u16>() {
        Ok(0) => Err("port 0 would bind a random port; pick 1-65535".to_string()),
        Ok(port) => Ok(port),
        Err(_) => Err(format!("'{raw}' is not a port number (1-65535)")),
    }
}

/// The file must exist, be a regular file, and be readable by this process.
pub fn validate_config_file_path(raw: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(raw);
    if !path.is_file() {
        return Err(format!("no configuration file at '{raw}'"));
    }
    File::open(&path).map_err(|e| format!("cannot read configuration file '{raw}': {e}"))?;
    Ok(path)
}

/// Application ids are the row store's serial keys, so only positive
/// integers can name one.
pub fn validate_application_id(raw: &str) -> Result<i64, String> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(format!("application id must be a positive integer, got '{raw}'")),
    }
}

/// Accepts IP literals and plausible hostnames.
pub fn validate_host_address(raw: &str) -> Result<String, String> {
    let host = raw.trim();
    if host.is_empty() {
        return Err("host cannot be empty".to_string());
    }
    if host.parse::<IpAddr>().is_ok() {
        return Ok(host.to_string());
    }
    // All digits and dots but not a valid IPv4 literal, e.g. 999.1.1.1
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(format!("'{host}' is not a valid IPv4 address"));
    }
    if host.len() > MAX_HOSTNAME_LEN {
        return Err(format!("host is longer than {MAX_HOSTNAME_LEN} characters"));
    }
    let valid_labels = host.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    if !valid_labels {
        return Err(format!("'{host}' is not a valid hostname"));
    }
    Ok(host.to_string())
}

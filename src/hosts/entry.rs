use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One `<ip> <hostname>...` mapping of a hosts file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEntry {
    pub ip: String,
    pub hostnames: Vec<String>,
    /// The source line, untouched.
    pub line: String,
    /// False when the mapping is commented out.
    pub enabled: bool,
}

impl HostEntry {
    fn from_line(line: &str) -> Option<Self> {
        let trimmed = line.trim_start();

        let (enabled, body) = match trimmed.strip_prefix('#') {
            Some(rest) => (false, rest),
            None => (true, trimmed),
        };

        // drop trailing comment
        let body = match body.find('#') {
            Some(idx) => &body[..idx],
            None => body,
        };

        let mut parts = body.split_whitespace();

        let ip = parts.next()?;
        ip.parse::<IpAddr>().ok()?;

        let hostnames = parts.map(String::from).collect::<Vec<_>>();
        if hostnames.is_empty() {
            return None;
        }

        Some(Self {
            ip: ip.to_string(),
            hostnames,
            line: line.to_string(),
            enabled,
        })
    }
}

/// Parses the content of a hosts file.
///
/// Lines commented out with a leading `#` are kept as disabled entries when
/// the rest of the line is still a valid mapping. Anything else that does not
/// start with an ip address followed by at least one hostname is skipped.
pub fn parse(content: &str) -> Vec<HostEntry> {
    content.lines().filter_map(HostEntry::from_line).collect()
}

/// Returns whether the first entry bound to `ip` is enabled.
pub fn status(entries: &[HostEntry], ip: &str) -> Result<bool> {
    check_ip(ip)?;

    entries
        .iter()
        .find(|it| it.ip == ip)
        .map(|it| it.enabled)
        .ok_or_else(|| anyhow!(Error::IpNotFound(ip.into())))
}

/// Comments out every line mapping `ip`, or uncomments it when it is already
/// commented. Returns the new content and the new state of the first matched
/// line.
pub fn toggle(content: &str, ip: &str) -> Result<(String, bool)> {
    check_ip(ip)?;

    let re = regex::Regex::new(&format!(r"^(\s*)(#\s*)?({})(\s+.+)$", regex::escape(ip)))?;

    let mut dst = String::with_capacity(content.len() + 8);
    let mut state = None;

    for line in content.lines() {
        match re.captures(line) {
            Some(caps) => {
                let leading = caps.get(1).map_or("", |m| m.as_str());
                let commented = caps.get(2).is_some();
                let matched = caps.get(3).map_or("", |m| m.as_str());
                let rest = caps.get(4).map_or("", |m| m.as_str());

                dst.push_str(leading);
                if !commented {
                    dst.push_str("# ");
                }
                dst.push_str(matched);
                dst.push_str(rest);

                state.get_or_insert(commented);
                debug!(
                    "{} host line: {}",
                    if commented { "enable" } else { "disable" },
                    line
                );
            }
            None => dst.push_str(line),
        }
        dst.push('\n');
    }

    match state {
        Some(enabled) => Ok((dst, enabled)),
        None => bail!(Error::IpNotFound(ip.into())),
    }
}

#[inline]
fn check_ip(ip: &str) -> Result<()> {
    if ip.parse::<IpAddr>().is_err() {
        bail!(Error::InvalidIp(ip.into()));
    }
    Ok(())
}

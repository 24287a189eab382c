//! resolv.conf(5) parser.
//!
//! Understands `nameserver`, `domain`, `search` and the `ndots`, `timeout`
//! and `attempts` options, plus a `blacklist` directive listing addresses
//! or networks, separated by spaces or commas, that only forged replies
//! carry. Unknown directives and options are skipped.

use super::{ConfigError, IpBlacklist, ResolverConfig, MAX_NAMESERVERS};
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

const DNS_PORT: u16 = 53;

pub fn parse(contents: &str) -> Result<ResolverConfig, ConfigError> {
    let mut config = ResolverConfig::default();
    let mut blacklist = IpBlacklist::new();

    for (index, raw_line) in contents.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(raw_line);
        let mut words = line.split_whitespace();

        let Some(directive) = words.next() else {
            continue;
        };

        match directive {
            "nameserver" => {
                if let Some(addr) = words.next().and_then(parse_nameserver) {
                    if config.servers.len() < MAX_NAMESERVERS {
                        config.servers.push(addr);
                    }
                }
            }
            "domain" => {
                config.search = words.next().map(|d| vec![d.to_string()]).unwrap_or_default();
            }
            "search" => {
                config.search = words.map(str::to_string).collect();
            }
            "options" => {
                for option in words {
                    apply_option(&mut config, option);
                }
            }
            "blacklist" => {
                for entry in words.flat_map(|w| w.split(',')).filter(|e| !e.is_empty()) {
                    blacklist
                        .insert_str(entry)
                        .map_err(|e| ConfigError::Parse(line_no, e))?;
                }
            }
            _ => {}
        }
    }

    if !blacklist.is_empty() {
        config.blacklist = Some(Arc::new(blacklist));
    }

    Ok(config)
}

fn strip_comment(line: &str) -> &str {
    match line.find(['#', ';']) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Only literal addresses are accepted, so dialing a server never needs a
/// lookup of its own. Host names are dropped.
fn parse_nameserver(word: &str) -> Option<SocketAddr> {
    if let Ok(ip) = IpAddr::from_str(word) {
        return Some(SocketAddr::new(ip, DNS_PORT));
    }
    SocketAddr::from_str(word).ok()
}

fn apply_option(config: &mut ResolverConfig, option: &str) {
    let Some((key, value)) = option.split_once(':') else {
        return;
    };
    let n = leading_number(value).max(1);

    match key {
        "ndots" => config.ndots = n,
        "timeout" => config.timeout = Duration::from_secs(n as u64),
        "attempts" => config.attempts = n,
        _ => {}
    }
}

/// Reads the decimal prefix of `value`, yielding 0 when there is none.
fn leading_number(value: &str) -> usize {
    value
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0usize, |acc, b| {
            acc.saturating_mul(10).saturating_add((b - b'0') as usize)
        })
}

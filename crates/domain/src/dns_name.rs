//! Host name syntax (RFC 1035 §2.3.1, relaxed per RFC 3696).
//!
//! Labels may hold letters, digits, `-` and `_`. A label cannot be empty,
//! cannot start or end with `-`, and is at most 63 octets. The whole name
//! is at most 255 octets and must contain at least one letter or `_`, so
//! bare dotted quads are rejected.

pub const MAX_NAME_LEN: usize = 255;
pub const MAX_LABEL_LEN: usize = 63;

pub fn is_domain_name(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return false;
    }

    let mut last = b'.';
    let mut seen_letter = false;
    let mut label_len = 0usize;

    for &c in name.as_bytes() {
        match c {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                seen_letter = true;
                label_len += 1;
            }
            b'0'..=b'9' => label_len += 1,
            b'-' => {
                if last == b'.' {
                    return false;
                }
                label_len += 1;
            }
            b'.' => {
                if last == b'.' || last == b'-' {
                    return false;
                }
                if label_len == 0 || label_len > MAX_LABEL_LEN {
                    return false;
                }
                label_len = 0;
            }
            _ => return false,
        }
        last = c;
    }

    if last == b'-' || label_len > MAX_LABEL_LEN {
        return false;
    }

    seen_letter
}

/// A rooted name ends with the root separator and is never suffix-expanded.
pub fn is_rooted(name: &str) -> bool {
    name.ends_with('.')
}

pub fn count_dots(name: &str) -> usize {
    name.bytes().filter(|&b| b == b'.').count()
}

pub fn to_rooted(name: &str) -> String {
    if is_rooted(name) {
        name.to_string()
    } else {
        format!("{}.", name)
    }
}

/// Joins a relative name with a search suffix, root-terminated.
pub fn with_suffix(name: &str, suffix: &str) -> String {
    to_rooted(&format!("{}.{}", name, suffix))
}

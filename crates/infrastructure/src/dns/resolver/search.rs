use super::failover::try_one_name;
use ferrous_resolv_domain::dns_name::{count_dots, is_domain_name, is_rooted, to_rooted, with_suffix};
use ferrous_resolv_domain::{RecordType, Resolution, ResolveError, ResolveErrorKind, ResolverConfig};
use tracing::debug;

/// Candidate names for `name`, in the order they are tried.
///
/// Rooted names are tried as-is and nothing else. Otherwise the name
/// itself comes first when it has at least `ndots` dots, then each search
/// suffix, then the bare name as a last resort, even if it led the list.
pub fn candidates(config: &ResolverConfig, name: &str) -> Vec<String> {
    if is_rooted(name) {
        return vec![name.to_string()];
    }

    let mut names = Vec::with_capacity(config.search.len() + 2);

    if count_dots(name) >= config.ndots {
        names.push(to_rooted(name));
    }
    names.extend(config.search.iter().map(|suffix| with_suffix(name, suffix)));
    names.push(to_rooted(name));

    names
}

/// Resolves `name` through the search list, stopping at the first success.
pub async fn lookup(
    config: &ResolverConfig,
    name: &str,
    record_type: RecordType,
) -> Result<Resolution, ResolveError> {
    if !is_domain_name(name) {
        return Err(ResolveError::new(ResolveErrorKind::InvalidDomainName, name));
    }

    let mut last_error = ResolveError::new(ResolveErrorKind::NoServers, name);

    for candidate in candidates(config, name) {
        match try_one_name(config, &candidate, record_type).await {
            Ok(resolution) => return Ok(resolution),
            Err(e) => {
                debug!(candidate = %candidate, error = %e, "Candidate failed");
                last_error = e;
            }
        }
    }

    // Report what the caller asked for, not the last suffixed variant.
    last_error.name = name.to_string();
    Err(last_error)
}

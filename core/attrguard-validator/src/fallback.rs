//! Default-fallback policy.

use crate::host::ModelHost;
use crate::outcome::ValidationErrors;
use crate::runner::run_rules;
use tracing::{debug, info, warn};

/// Writes declared defaults for every attribute that failed.
///
/// A default is itself run through the attribute's rules first. A default
/// that passes is written with [`ModelHost::set_raw`]; one that fails is
/// left unwritten and its own failures are appended. Attributes without a
/// default keep their stored value. The host is notified once if anything
/// was written.
///
/// Returns the (possibly extended) error list.
pub fn apply_defaults<H>(host: &mut H, mut errors: ValidationErrors) -> ValidationErrors
where
    H: ModelHost + ?Sized,
{
    let failing: Vec<String> = errors.attributes().into_iter().map(str::to_owned).collect();
    let mut substituted = 0usize;

    for attribute in &failing {
        let Some(default) = host.defaults().and_then(|d| d.get(attribute)).cloned() else {
            debug!(attribute = %attribute, "no default declared, keeping stored value");
            continue;
        };

        let default_errors = host
            .rule_specs()
            .and_then(|specs| specs.get(attribute))
            .map(|spec| run_rules(attribute, &default, spec))
            .unwrap_or_default();

        if default_errors.is_empty() {
            info!(attribute = %attribute, default = %default, "invalid value replaced by default");
            host.set_raw(attribute, default);
            substituted += 1;
        } else {
            warn!(
                attribute = %attribute,
                failures = default_errors.len(),
                "declared default fails its own rules, not applied"
            );
            errors.extend(default_errors);
        }
    }

    if substituted > 0 {
        host.on_fallback(&errors);
    }
    errors
}

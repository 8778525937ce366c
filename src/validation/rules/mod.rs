//! Built-in rules.

pub mod requests_limits;

pub use requests_limits::RequestLimitRule;

use super::metrics::MetricsRegistry;
use super::registry::RegistryBuilder;

/// Register every built-in rule, wiring each to a gauge in `metrics`.
///
/// A rule whose gauge cannot be created is logged and left out.
pub fn register_builtin(builder: &mut RegistryBuilder, metrics: &MetricsRegistry) {
    builder.register_with(requests_limits::RULE_NAME, || {
        RequestLimitRule::register(metrics)
    });
}

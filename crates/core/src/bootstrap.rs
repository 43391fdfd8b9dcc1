//! Register configured hooks
//!
//! This is the layer that decides how registration failures surface: the
//! registry only reports them, bootstrap logs and counts them.

use tracing::{info, warn};

use tracehook_sdk::Callable;

use crate::config::TracerConfig;
use crate::dispatch::HookRegistry;

/// Outcome of registering a config's hooks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Hooks stored in the registry
    pub registered: usize,
    /// Hooks rejected (bad options, empty names, uninitialized registry)
    pub failed: usize,
}

/// Register every hook declared in `config`
///
/// A failing hook is logged and skipped; the rest are still registered.
/// Later declarations for the same symbol replace earlier ones.
pub fn register_hooks(registry: &HookRegistry, config: &TracerConfig) -> BootstrapReport {
    let mut report = BootstrapReport::default();

    if !config.enabled {
        info!("Hook registration disabled by config");
        return report;
    }

    for spec in &config.hooks {
        let options = match spec.hook_options() {
            Ok(options) => options,
            Err(e) => {
                warn!("Skipping hook {}: {}", spec.target(), e);
                report.failed += 1;
                continue;
            }
        };

        let callable = spec.callable.as_deref().map(Callable::symbol);
        match registry.register(spec.class.as_deref(), &spec.function, callable, options) {
            Ok(()) => report.registered += 1,
            Err(e) => {
                warn!("Failed to register hook {}: {}", spec.target(), e);
                report.failed += 1;
            }
        }
    }

    info!(
        "Registered {} configured hooks ({} failed)",
        report.registered, report.failed
    );
    report
}

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "otterc_inline=info";

/// Initialise tracing subscriber once per process.
///
/// Inlining trace records are emitted at `debug` under the
/// `otterc_inline::trace` target, so `RUST_LOG=otterc_inline::trace=debug`
/// shows them without the rest of the compiler's debug output.
pub fn init_logging() {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // A host may already have installed its own subscriber.
        let _ = fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .try_init();
    });
}

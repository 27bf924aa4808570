use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `RUST_LOG` wins over the built-in `info` default.
pub fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry.with(fmt::layer().with_target(false).with_ansi(false).json()).init();
    } else {
        registry.with(fmt::layer().with_target(false)).init();
    }
}

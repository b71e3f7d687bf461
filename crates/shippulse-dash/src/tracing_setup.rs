//! Tracing subscriber initialization for the dashboard binary.
//!
//! Wires CLI flags (`--verbose`, `--quiet`, `--no-color`) and environment
//! variables (`SHIPPULSE_LOG`, `RUST_LOG`) into a single
//! `tracing-subscriber` stack that writes structured logs to stderr.
//!
//! # Priority (highest to lowest)
//!
//! 1. `SHIPPULSE_LOG` env var (per-target directives, e.g. `shippulse=debug,warn`)
//! 2. `RUST_LOG` env var (standard fallback)
//! 3. CLI flags (`-v` → debug, `-q` → error)
//! 4. Default level: `warn`

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use shippulse_core::tracing_config;

/// Verbosity level derived from CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// `--quiet` / `-q`: only errors.
    Quiet,
    /// Default: warnings and above.
    Normal,
    /// `--verbose` / `-v`: debug-level output.
    Verbose,
}

impl Verbosity {
    /// Determine verbosity from the parsed CLI flags. When both are set,
    /// verbose wins.
    #[must_use]
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    /// Map to a default `tracing::Level`.
    #[must_use]
    pub const fn default_level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, early in `main()`, so config and filter
/// derivation traces are captured.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_subscriber(verbosity: Verbosity, no_color: bool) {
    let filter = build_env_filter(verbosity);

    let stderr_is_tty = std::io::IsTerminal::is_terminal(&std::io::stderr());
    let use_ansi = !no_color && stderr_is_tty;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(use_ansi)
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true);

    // Verbose mode gets timestamps and full output for diagnosing cache
    // and fetch behavior; otherwise keep stderr compact.
    if verbosity == Verbosity::Verbose {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.with_timer(fmt::time::uptime()))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.without_time().compact())
            .init();
    }
}

/// Build an `EnvFilter` respecting the priority chain:
/// `SHIPPULSE_LOG` > `RUST_LOG` > CLI verbosity default.
fn build_env_filter(verbosity: Verbosity) -> EnvFilter {
    // Unparseable SHIPPULSE_LOG values fall through to RUST_LOG rather
    // than failing hard.
    if let Ok(directives) = std::env::var("SHIPPULSE_LOG")
        && let Ok(filter) = EnvFilter::try_new(&directives)
    {
        return filter;
    }

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    // In verbose mode, elevate shippulse internals to debug so cache
    // subscriptions, fetches, and invalidations show up.
    let level = verbosity.default_level();
    let directive = if verbosity == Verbosity::Verbose {
        format!(
            "{level},{prefix}=debug",
            prefix = tracing_config::TARGET_PREFIX,
        )
    } else {
        level.to_string()
    };

    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

//! Logging setup for paddock.
//!
//! Output goes to stderr through `tracing-subscriber`, so stdout only carries
//! command output such as chart paths and `--json` documents.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Crates of the HTTP stack that are held at `warn` below trace verbosity.
const HTTP_CRATES: &[&str] = &["reqwest", "hyper", "hyper_util", "rustls"];

/// How much the binary logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only (`-q`).
    Quiet,
    /// Progress messages (info and above).
    #[default]
    Normal,
    /// Debug output from paddock (`-v`).
    Verbose,
    /// Everything, including the HTTP stack (`-vv`).
    Trace,
}

impl Verbosity {
    /// Map the `-q` flag and the `-v` count to a verbosity. `-q` wins.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// The `tracing` level for paddock's own events.
    #[must_use]
    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directives used when `RUST_LOG` is not set.
    #[must_use]
    pub fn directives(self) -> String {
        let mut directives = format!("paddock={}", self.level());
        if self != Self::Trace {
            for krate in HTTP_CRATES {
                directives.push_str(&format!(",{krate}=warn"));
            }
        }
        directives
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `verbosity`. Calling this more than once
/// is harmless; only the first subscriber is kept.
///
/// ```no_run
/// use paddock::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::from_flags(false, 1));
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directives()));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

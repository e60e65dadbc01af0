//! Logging utilities
//!
//! Subscriber setup plus small helpers for structured logging with tracing.

use std::time::{Duration, Instant};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::{Result, ToolingError};

/// Install the global fmt subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_directive` (e.g.
/// `"maestro=info"`) is used. Log lines go to stderr so stdout stays free for
/// user-facing output.
pub fn init_tracing(default_directive: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| ToolingError::Logging(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| ToolingError::Logging(e.to_string()))
}

/// Log execution time of a future at debug level
///
/// # Example
///
/// ```rust,ignore
/// use tooling::logging::timed;
///
/// let tracks = timed("core.library.search", client.search(query)).await;
/// ```
pub async fn timed<F, T>(name: &str, future: F) -> T
where
    F: std::future::Future<Output = T>,
{
    let start = Instant::now();
    debug!("Starting: {}", name);

    let result = future.await;

    debug!("Completed: {} in {}", name, format_duration(start.elapsed()));
    result
}

/// Format duration in human-readable form
///
/// ```rust
/// use std::time::Duration;
/// use tooling::logging::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();
    if micros < 1_000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{}ms", duration.as_millis())
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}

/// Mask a secret for display, keeping only its last four characters
///
/// ```rust
/// use tooling::logging::mask_secret;
///
/// assert_eq!(mask_secret("sk-abcdef123456"), "****3456");
/// assert_eq!(mask_secret("abc"), "****");
/// ```
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

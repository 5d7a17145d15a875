//! TCP readiness wait
//!
//! Polls a `host:port` until it accepts a TCP connection, sleeping with
//! exponential backoff between attempts. Only reachability is checked here;
//! the Postgres handshake happens afterwards in [`super::Database::connect`].

use std::time::{Duration, Instant};

use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};

use crate::config::ReadinessConfig;
use crate::error::ConnectError;

/// Backoff policy for the readiness wait
#[derive(Debug, Clone)]
pub struct ReadinessPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub max_elapsed: Duration,
    pub attempt_timeout: Duration,
}

impl From<&ReadinessConfig> for ReadinessPolicy {
    fn from(config: &ReadinessConfig) -> Self {
        Self {
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            // A shrinking delay would turn the wait into a busy loop
            multiplier: if config.multiplier.is_finite() {
                config.multiplier.max(1.0)
            } else {
                1.0
            },
            max_elapsed: Duration::from_secs(config.max_elapsed_secs),
            attempt_timeout: Duration::from_millis(config.attempt_timeout_ms),
        }
    }
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self::from(&ReadinessConfig::default())
    }
}

impl ReadinessPolicy {
    /// Delay to use after `current`, capped at `max_delay`
    pub fn next_delay(&self, current: Duration) -> Duration {
        Duration::try_from_secs_f64(current.as_secs_f64() * self.multiplier)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// Block until `address` accepts a TCP connection or the policy gives up.
///
/// Returns the number of attempts it took. A name that fails to resolve is
/// treated like a refused connection, since DNS for a starting container
/// often appears late.
pub async fn wait_for_tcp(address: &str, policy: &ReadinessPolicy) -> Result<u32, ConnectError> {
    let start = Instant::now();
    let mut delay = policy.initial_delay.min(policy.max_delay);
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        match timeout(policy.attempt_timeout, TcpStream::connect(address)).await {
            Ok(Ok(_stream)) => {
                tracing::debug!(address, attempts, "tcp endpoint is accepting connections");
                return Ok(attempts);
            }
            Ok(Err(e)) => {
                tracing::debug!(address, attempts, error = %e, "tcp endpoint not ready");
            }
            Err(_) => {
                tracing::debug!(address, attempts, "tcp connect attempt timed out");
            }
        }

        let elapsed = start.elapsed();
        if elapsed >= policy.max_elapsed {
            return Err(ConnectError::Unreachable {
                address: address.to_string(),
                attempts,
                elapsed,
            });
        }

        sleep(delay.min(policy.max_elapsed - elapsed)).await;
        delay = policy.next_delay(delay);
    }
}

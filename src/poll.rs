use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_POLL_ATTEMPTS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_POLL_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    pub attempts: u32,
    pub succeeded: bool,
}

/// Runs `op` until it succeeds or the attempt budget is spent.
///
/// Intermediate errors are logged and swallowed; the caller decides what an
/// exhausted budget means.
pub async fn poll_until_success<T, E, F, Fut>(config: &PollConfig, mut op: F) -> PollOutcome
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = config.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        match op().await {
            Ok(_) => {
                return PollOutcome {
                    attempts: attempt,
                    succeeded: true,
                };
            }
            Err(e) => {
                tracing::debug!(attempt, max_attempts, error = %e, "poll attempt failed");
            }
        }

        if attempt < max_attempts {
            tokio::time::sleep(config.interval).await;
        }
    }

    PollOutcome {
        attempts: max_attempts,
        succeeded: false,
    }
}

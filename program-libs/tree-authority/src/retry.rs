use std::time::Duration;

use log::warn;

use crate::error::TreeAuthorityError;

/// Backoff for resubmitting operations that failed transiently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(400),
            max_backoff: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry`, starting at 0. Doubles per retry.
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.initial_backoff
            .checked_mul(factor)
            .map_or(self.max_backoff, |backoff| backoff.min(self.max_backoff))
    }

    /// Runs `operation` until it succeeds, fails with a non transient error
    /// or runs out of attempts.
    pub fn run<T, S, F>(&self, mut sleep: S, mut operation: F) -> Result<T, TreeAuthorityError>
    where
        S: FnMut(Duration),
        F: FnMut() -> Result<T, TreeAuthorityError>,
    {
        let mut retry = 0;
        loop {
            match operation() {
                Err(error) if error.is_transient() && retry + 1 < self.max_attempts => {
                    let backoff = self.backoff(retry);
                    warn!("{}, retrying in {:?}", error, backoff);
                    sleep(backoff);
                    retry += 1;
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(1000),
        };
        assert_eq!(policy.backoff(0), Duration::from_millis(100));
        assert_eq!(policy.backoff(1), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(800));
        assert_eq!(policy.backoff(4), Duration::from_millis(1000));
        assert_eq!(policy.backoff(40), Duration::from_millis(1000));
    }

    #[test]
    fn test_run_retries_transient_errors() {
        let policy = RetryPolicy::default();
        let mut sleeps = Vec::new();
        let mut failures = 2;
        let result = policy.run(
            |backoff| sleeps.push(backoff),
            || {
                if failures > 0 {
                    failures -= 1;
                    Err(TreeAuthorityError::BufferExhausted {
                        max_buffer_size: 8,
                    })
                } else {
                    Ok(7)
                }
            },
        );
        assert_eq!(result, Ok(7));
        assert_eq!(sleeps, vec![policy.backoff(0), policy.backoff(1)]);
    }

    #[test]
    fn test_run_gives_up() {
        let policy = RetryPolicy {
            max_attempts: 3,
            ..Default::default()
        };
        let mut attempts = 0;
        let result: Result<(), _> = policy.run(
            |_| {},
            || {
                attempts += 1;
                Err(TreeAuthorityError::BufferExhausted {
                    max_buffer_size: 8,
                })
            },
        );
        assert_eq!(
            result,
            Err(TreeAuthorityError::BufferExhausted {
                max_buffer_size: 8
            })
        );
        assert_eq!(attempts, 3);
    }

    #[test]
    fn test_run_does_not_retry_fatal_errors() {
        let mut attempts = 0;
        let result: Result<(), _> = RetryPolicy::default().run(
            |_| panic!("fatal errors are not retried"),
            || {
                attempts += 1;
                Err(TreeAuthorityError::TreeFull { capacity: 8 })
            },
        );
        assert_eq!(result, Err(TreeAuthorityError::TreeFull { capacity: 8 }));
        assert_eq!(attempts, 1);
    }
}

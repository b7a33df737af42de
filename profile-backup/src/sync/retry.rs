//! Bounded retry for file operations against a flaky network share.

use crate::utils::errors::BackupError;
use std::fmt;
use std::time::Duration;
use tracing::{error, info, warn};

/// Fixed-interval retry policy. No exponential growth, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first try included. Never below 1.
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(5))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Run `op` until it succeeds, fails with an error `is_transient` rejects,
    /// or the attempt budget runs out. Returns the last error on failure.
    ///
    /// Blocks the calling thread for the backoff between attempts.
    pub fn run<T, E, F, C>(&self, op_name: &str, mut op: F, is_transient: C) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        C: Fn(&E) -> bool,
        E: fmt::Display,
    {
        let max = self.policy.max_attempts;
        let mut attempt = 1;

        loop {
            match op() {
                Ok(value) => {
                    info!(op = op_name, attempt, "Operation succeeded");
                    return Ok(value);
                }
                Err(e) if !is_transient(&e) => {
                    error!(op = op_name, attempt, error = %e, "Permanent error, not retrying");
                    return Err(e);
                }
                Err(e) if attempt >= max => {
                    error!(op = op_name, attempt, error = %e, "Giving up after {} attempts", max);
                    return Err(e);
                }
                Err(e) => {
                    warn!(
                        op = op_name,
                        attempt,
                        error = %e,
                        "Transient error (attempt {}/{}), retrying in {:?}",
                        attempt,
                        max,
                        self.policy.backoff
                    );
                    if !self.policy.backoff.is_zero() {
                        std::thread::sleep(self.policy.backoff);
                    }
                    attempt += 1;
                }
            }
        }
    }

    /// [`run`](Self::run) with the crate's error classifier, reduced to a
    /// success flag.
    pub fn execute<T, F>(&self, op_name: &str, op: F) -> bool
    where
        F: FnMut() -> Result<T, BackupError>,
    {
        self.run(op_name, op, BackupError::is_transient).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io;

    fn executor() -> RetryExecutor {
        RetryExecutor::new(RetryPolicy::new(3, Duration::ZERO))
    }

    fn transient() -> BackupError {
        BackupError::Io(io::Error::new(io::ErrorKind::ConnectionReset, "share dropped"))
    }

    #[test]
    fn test_succeeds_first_try() {
        let calls = Cell::new(0);
        let ok = executor().execute("copy", || {
            calls.set(calls.get() + 1);
            Ok::<_, BackupError>(())
        });
        assert!(ok);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_recovers_after_transient_failures() {
        for k in 0..3u32 {
            let calls = Cell::new(0u32);
            let ok = executor().execute("copy", || {
                calls.set(calls.get() + 1);
                if calls.get() <= k {
                    Err(transient())
                } else {
                    Ok(())
                }
            });
            assert!(ok, "k = {k}");
            assert_eq!(calls.get(), k + 1);
        }
    }

    #[test]
    fn test_gives_up_after_max_attempts() {
        let calls = Cell::new(0);
        let ok = executor().execute("copy", || -> Result<(), BackupError> {
            calls.set(calls.get() + 1);
            Err(transient())
        });
        assert!(!ok);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_permanent_error_aborts_immediately() {
        let calls = Cell::new(0);
        let ok = executor().execute("copy", || -> Result<(), BackupError> {
            calls.set(calls.get() + 1);
            Err(BackupError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied")))
        });
        assert!(!ok);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_run_returns_last_error_and_value() {
        let calls = Cell::new(0);
        let result: Result<u32, String> = executor().run(
            "lookup",
            || {
                calls.set(calls.get() + 1);
                if calls.get() == 1 {
                    Err("flaky".to_string())
                } else {
                    Ok(42)
                }
            },
            |e| e == "flaky",
        );
        assert_eq!(result, Ok(42));

        let result: Result<u32, String> =
            executor().run("lookup", || Err("fatal".to_string()), |e| e == "flaky");
        assert_eq!(result, Err("fatal".to_string()));
    }

    #[test]
    fn test_policy_never_below_one_attempt() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(RetryPolicy::default().max_attempts, 3);
        assert_eq!(RetryPolicy::default().backoff, Duration::from_secs(5));
    }
}

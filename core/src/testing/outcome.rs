use std::{borrow::Cow, time::Duration};

/// Result of running the solution once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// `None` on timeout or when the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub timed_out: bool,
    pub execution_time: Duration,
}

impl ExecutionOutcome {
    pub fn timed_out(execution_time: Duration) -> Self {
        Self {
            status: None,
            stdout: Vec::new(),
            stderr: Vec::new(),
            timed_out: true,
            execution_time,
        }
    }

    /// The process could not be started or talked to; `reason` stands in for its stderr.
    pub fn failed_to_run(reason: impl Into<String>) -> Self {
        Self {
            status: None,
            stdout: Vec::new(),
            stderr: reason.into().into_bytes(),
            timed_out: false,
            execution_time: Duration::ZERO,
        }
    }

    pub fn success(&self) -> bool {
        !self.timed_out && self.status == Some(0)
    }

    pub fn stdout_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    pub fn stderr_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }
}

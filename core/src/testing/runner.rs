use std::{io, process::Stdio, time::Duration};

use anyhow::{bail, Context};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    process::{Child, Command},
    time::Instant,
};

use super::outcome::ExecutionOutcome;
use crate::command::Invocation;

#[derive(Debug, Clone)]
pub struct ProcessRunner {
    time_limit: Option<Duration>,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner {
    pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_millis(4000);

    pub fn new() -> Self {
        Self {
            time_limit: Some(Self::DEFAULT_TIME_LIMIT),
        }
    }

    pub fn time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Waits for the process as long as it takes.
    pub fn unlimited(mut self) -> Self {
        self.time_limit = None;
        self
    }

    pub fn get_time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Runs `inv` once with `input` as its entire stdin.
    ///
    /// On timeout the whole process group of the child is killed and reaped, and any
    /// partial output is dropped. Failing to spawn is an error, not an outcome.
    pub async fn run(&self, inv: &Invocation, input: &[u8]) -> anyhow::Result<ExecutionOutcome> {
        let mut cmd = Command::new(&inv.program);
        cmd.args(&inv.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);

        let mut proc = cmd
            .spawn()
            .with_context(|| format!("Failed to spawn '{}'", inv))?;
        let pgid = proc.id();

        let mut stdin = proc.stdin.take().context("Failed to open stdin")?;
        let mut stdout = proc.stdout.take().context("Failed to open stdout")?;
        let mut stderr = proc.stderr.take().context("Failed to open stderr")?;

        let mut stdout_buf = Vec::new();
        let mut stderr_buf = Vec::new();

        let start_at = Instant::now();
        let res = {
            let fut_stdin = async move {
                let res = match stdin.write_all(input).await {
                    // the solution may exit without reading its input
                    Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                    res => res,
                };
                drop(stdin); // EOF
                res
            };
            let fut_stdout = stdout.read_to_end(&mut stdout_buf);
            let fut_stderr = stderr.read_to_end(&mut stderr_buf);
            let fut_exit_status = proc.wait();

            let communicate = async move {
                tokio::try_join!(fut_stdin, fut_stdout, fut_stderr, fut_exit_status)
                    .context("Failed to communicate with subprocess")
            };

            match self.time_limit {
                Some(limit) => tokio::time::timeout(limit, communicate).await.ok(),
                None => Some(communicate.await),
            }
        };
        let execution_time = start_at.elapsed();

        match res {
            None => {
                log::debug!("Time limit exceeded: '{}' ({:?})", inv, execution_time);
                kill_process_group(&mut proc, pgid).await;
                Ok(ExecutionOutcome::timed_out(execution_time))
            }
            Some(Err(e)) => {
                kill_process_group(&mut proc, pgid).await;
                bail!(e)
            }
            Some(Ok((_, _, _, exit_status))) => Ok(ExecutionOutcome {
                status: exit_status.code(),
                stdout: stdout_buf,
                stderr: stderr_buf,
                timed_out: false,
                execution_time,
            }),
        }
    }
}

/// SIGKILLs every process in the child's group, then reaps the child itself.
async fn kill_process_group(proc: &mut Child, pgid: Option<u32>) {
    #[cfg(unix)]
    if let Some(pgid) = pgid.and_then(|id| i32::try_from(id).ok()) {
        // SAFETY: kill(2) takes no pointers; a negative pid addresses the process group.
        if unsafe { libc::kill(-pgid, libc::SIGKILL) } != 0 {
            log::warn!(
                "Failed to kill process group {}: {}",
                pgid,
                io::Error::last_os_error()
            );
        }
    }
    #[cfg(not(unix))]
    let _ = pgid;

    if let Ok(Some(_)) = proc.try_wait() {
        return;
    }
    proc.kill()
        .await
        .unwrap_or_else(|e| log::warn!("Failed to kill TLE process: {:#}", e));
}

/// Attaches the caller's stdin/stdout/stderr to the child. No time limit.
pub async fn run_interactive(inv: &Invocation) -> anyhow::Result<Option<i32>> {
    let status = Command::new(&inv.program)
        .args(&inv.args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .with_context(|| format!("Failed to spawn '{}'", inv))?;
    Ok(status.code())
}

// Process-Isolation Boundary
// Runs short-lived external tools (extractors, legacy scorers) without
// coupling the service lifecycle to their failures.

use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::warn;

/// Default wall-clock budget for one child process.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sentinel status reported when the child was killed on timeout.
pub const TIMEOUT_STATUS: i32 = -9;

/// Captured output of one child run. Non-zero exit is data, not an error;
/// the caller interprets the status and parses stdout.
#[derive(Debug, Clone)]
pub struct SubprocessOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: i32,
}

impl SubprocessOutput {
    pub fn succeeded(&self) -> bool {
        self.status == 0
    }

    pub fn timed_out(&self) -> bool {
        self.status == TIMEOUT_STATUS
    }
}

/// Run `program args...`, optionally feeding `input` on stdin, enforcing
/// `budget` as a wall-clock timeout. On timeout the child is forcibly
/// terminated and the sentinel status is reported instead of hanging the
/// caller. Spawn failure (missing executable) is the only `Err` case.
pub async fn run_subprocess(
    program: &str,
    args: &[String],
    input: Option<&[u8]>,
    budget: Duration,
) -> std::io::Result<SubprocessOutput> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(if input.is_some() { Stdio::piped() } else { Stdio::null() })
        .kill_on_drop(true);

    let mut child = command.spawn()?;

    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();
    let stdout_task = tokio::spawn(read_pipe(stdout_pipe));
    let stderr_task = tokio::spawn(read_pipe(stderr_pipe));

    if let Some(bytes) = input {
        if let Some(mut stdin) = child.stdin.take() {
            let bytes = bytes.to_vec();
            // Feed stdin off-task so a chatty child cannot deadlock the write.
            // A child that exits early closes its end; the broken pipe is ignored.
            tokio::spawn(async move {
                let _ = stdin.write_all(&bytes).await;
                let _ = stdin.shutdown().await;
            });
        }
    }

    let status = match timeout(budget, child.wait()).await {
        Ok(waited) => exit_code(waited?),
        Err(_) => {
            warn!(program, budget_secs = budget.as_secs(), "[SUBPROCESS] timeout, killing child");
            let _ = child.kill().await;
            stdout_task.abort();
            stderr_task.abort();
            return Ok(SubprocessOutput {
                stdout: String::new(),
                stderr: "Subprocess timed out".to_string(),
                status: TIMEOUT_STATUS,
            });
        }
    };

    let stdout = stdout_task.await.unwrap_or_default();
    let stderr = stderr_task.await.unwrap_or_default();

    Ok(SubprocessOutput { stdout, stderr, status })
}

/// Signal deaths are reported as negative codes, matching the legacy
/// tooling's convention.
fn exit_code(status: std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    TIMEOUT_STATUS
}

async fn read_pipe<R>(pipe: Option<R>) -> String
where
    R: tokio::io::AsyncRead + Unpin + Send,
{
    use tokio::io::AsyncReadExt;
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf).await;
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_stdout_and_zero_status() {
        let out = run_subprocess("echo", &["hello".to_string()], None, DEFAULT_TIMEOUT)
            .await
            .unwrap();
        assert!(out.succeeded());
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_not_an_error() {
        let out = run_subprocess(
            "sh",
            &["-c".to_string(), "echo diag >&2; exit 3".to_string()],
            None,
            DEFAULT_TIMEOUT,
        )
        .await
        .unwrap();
        assert_eq!(out.status, 3);
        assert_eq!(out.stderr.trim(), "diag");
    }

    #[tokio::test]
    async fn test_stdin_is_fed_to_child() {
        let out = run_subprocess("cat", &[], Some(b"payload"), DEFAULT_TIMEOUT)
            .await
            .unwrap();
        assert!(out.succeeded());
        assert_eq!(out.stdout, "payload");
    }

    #[tokio::test]
    async fn test_timeout_kills_child_and_reports_sentinel() {
        let out = run_subprocess(
            "sleep",
            &["5".to_string()],
            None,
            Duration::from_millis(100),
        )
        .await
        .unwrap();
        assert!(out.timed_out());
        assert_eq!(out.status, TIMEOUT_STATUS);
        assert!(out.stderr.contains("timed out"));
    }

    #[tokio::test]
    async fn test_missing_executable_is_spawn_error() {
        let res = run_subprocess("definitely-not-a-real-binary", &[], None, DEFAULT_TIMEOUT).await;
        assert!(res.is_err());
    }
}

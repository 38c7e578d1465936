//! Invocation of the Go benchmark harness, one run per backend.
//!
//! Each run executes `go test -bench <filter> -benchmem -run ^$` in the
//! package directory and captures stdout for the line parser. The wait on the
//! child is bounded; a timed-out backend is abandoned (killed) so the report
//! can proceed with whatever the other backend produced.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::Error;

/// Poll interval while waiting on the child process.
const WAIT_POLL: Duration = Duration::from_millis(50);

/// How to invoke the harness.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Directory containing the Go package with the benchmarks.
    pub dir: PathBuf,
    /// Minimum run duration per benchmark (`-benchtime`), e.g. "1s".
    pub benchtime: String,
    /// Upper bound on one harness invocation.
    pub timeout: Duration,
    /// Set `CGO_ENABLED=1` so the native-library-accelerated backend builds.
    pub native: bool,
}

/// Captured output of one harness run.
#[derive(Debug)]
pub struct RunOutput {
    pub stdout: String,
    pub success: bool,
}

/// Benchmark name filter selecting one backend's Sign/Verify benchmarks.
pub fn bench_filter(backend: &str) -> String {
    format!("^Benchmark(Sign|Verify)[0-9]+_{backend}$")
}

/// Run the harness for one backend and capture its stdout.
///
/// Returns `Error::HarnessTimeout` if the child outlives the configured
/// timeout; the child is killed in that case.
pub fn run_backend(cfg: &HarnessConfig, backend: &str) -> Result<RunOutput, Error> {
    let mut cmd = Command::new("go");
    cmd.arg("test")
        .arg("-bench")
        .arg(bench_filter(backend))
        .arg("-benchmem")
        .arg("-run")
        .arg("^$")
        .arg("-benchtime")
        .arg(&cfg.benchtime)
        .current_dir(&cfg.dir);
    if cfg.native {
        cmd.env("CGO_ENABLED", "1");
    }

    match run_with_timeout(cmd, cfg.timeout)? {
        Some(output) => Ok(output),
        None => Err(Error::HarnessTimeout {
            backend: backend.to_string(),
            timeout_secs: cfg.timeout.as_secs(),
        }),
    }
}

/// Spawn a command with captured stdout and wait at most `timeout` for it.
///
/// `Ok(None)` means the deadline expired; the child has been killed. Stdout
/// is drained on a helper thread because a full pipe buffer would otherwise
/// block the child and turn every long run into a timeout.
fn run_with_timeout(mut cmd: Command, timeout: Duration) -> io::Result<Option<RunOutput>> {
    cmd.stdout(Stdio::piped()).stderr(Stdio::null());
    let mut child = cmd.spawn()?;
    let mut pipe = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("child stdout was not captured"))?;

    let reader = thread::spawn(move || {
        let mut buf = String::new();
        pipe.read_to_string(&mut buf).map(|_| buf)
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            child.kill().ok();
            child.wait().ok();
            let _ = reader.join();
            return Ok(None);
        }
        thread::sleep(WAIT_POLL);
    };

    let stdout = reader
        .join()
        .map_err(|_| io::Error::other("stdout reader thread panicked"))??;

    Ok(Some(RunOutput {
        stdout,
        success: status.success(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bench_filter_selects_both_operations() {
        assert_eq!(
            bench_filter("Ethereum"),
            "^Benchmark(Sign|Verify)[0-9]+_Ethereum$"
        );
    }

    #[test]
    fn test_run_with_timeout_captures_stdout() {
        let mut cmd = Command::new("echo");
        cmd.arg("BenchmarkSign2_Decred-10  795  1550968 ns/op");

        let output = run_with_timeout(cmd, Duration::from_secs(5))
            .unwrap()
            .expect("echo should finish well within the deadline");
        assert!(output.success);
        assert!(output.stdout.contains("BenchmarkSign2_Decred-10"));
    }

    #[test]
    fn test_run_with_timeout_kills_slow_child() {
        let mut cmd = Command::new("sleep");
        cmd.arg("30");

        let started = Instant::now();
        let output = run_with_timeout(cmd, Duration::from_millis(200)).unwrap();
        assert!(output.is_none());
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_run_with_timeout_reports_failure_status() {
        let cmd = Command::new("false");
        let output = run_with_timeout(cmd, Duration::from_secs(5)).unwrap().unwrap();
        assert!(!output.success);
    }
}

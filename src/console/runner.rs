use crate::config::Platform;
use crate::console::ConsoleError;
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

pub const TIMEOUT_MESSAGE: &str = "Timeout exceeded";

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Locale forced into the child on POSIX so the tool emits UTF-8 instead of
/// whatever the ambient locale dictates. Windows has no equivalent knob;
/// there the console code page decides and the resolver sorts it out.
const FORCED_LOCALE: &str = "ru_RU.UTF-8";

/// Raw result of one tool invocation. A timed-out run carries no output;
/// a non-zero exit code is a tool-level failure, not an execution error.
#[derive(Debug, Clone, Default)]
pub struct ExecutionOutput {
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub timed_out: bool,
}

impl ExecutionOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0) && !self.timed_out
    }
}

/// Run the tool once with the given argument vector. Spawns exactly one
/// child, drains stdout/stderr on reader threads as raw bytes, and enforces
/// the wall-clock timeout by killing and reaping the child.
pub fn execute_tool(
    tool: &str,
    args: &[String],
    timeout: Duration,
    platform: Platform,
) -> Result<ExecutionOutput, ConsoleError> {
    let mut command = Command::new(tool);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if platform == Platform::Posix {
        command
            .env("LANG", FORCED_LOCALE)
            .env("LC_ALL", FORCED_LOCALE)
            .env("LC_CTYPE", FORCED_LOCALE);
    }

    let mut child = command.spawn().map_err(|source| ConsoleError::Spawn {
        tool: tool.to_string(),
        source,
    })?;

    let stdout = child.stdout.take().ok_or_else(|| ConsoleError::Spawn {
        tool: tool.to_string(),
        source: std::io::Error::other("missing stdout pipe"),
    })?;
    let stderr = child.stderr.take().ok_or_else(|| ConsoleError::Spawn {
        tool: tool.to_string(),
        source: std::io::Error::other("missing stderr pipe"),
    })?;

    let stdout_reader = thread::spawn(move || {
        let mut buf = Vec::new();
        let mut stdout = stdout;
        let _ = stdout.read_to_end(&mut buf);
        buf
    });
    let stderr_reader = thread::spawn(move || {
        let mut buf = Vec::new();
        let mut stderr = stderr;
        let _ = stderr.read_to_end(&mut buf);
        buf
    });

    let start = Instant::now();
    let exit_status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    let _ = stdout_reader.join();
                    let _ = stderr_reader.join();
                    debug!(
                        timeout_secs = timeout.as_secs(),
                        "administration tool exceeded the timeout and was killed"
                    );
                    return Ok(ExecutionOutput {
                        exit_code: None,
                        stdout: Vec::new(),
                        stderr: Vec::new(),
                        timed_out: true,
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(source) => {
                return Err(ConsoleError::Wait {
                    tool: tool.to_string(),
                    source,
                })
            }
        }
    };

    let stdout = stdout_reader.join().unwrap_or_default();
    let stderr = stderr_reader.join().unwrap_or_default();

    Ok(ExecutionOutput {
        exit_code: exit_status.code(),
        stdout,
        stderr,
        timed_out: false,
    })
}

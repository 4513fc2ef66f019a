use super::error::EngineError;
use super::ms;
use super::progress::{Progress, ProgressReporter};
use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use std::thread;
use tracing::{debug, info, warn};

pub const DEFAULT_PROGRAM: &str = "mspms";

const BUFFER_SIZE: usize = 64 * 1024;

/// Something that can run one simulation from an ms-style argument list.
pub trait Simulator {
    fn program(&self) -> &str;

    /// The full command as a user could type it.
    fn command_line(&self, args: &[String]) -> String;

    /// Runs the simulation and forwards everything it prints to `out`.
    /// Returns the number of bytes written.
    fn run(
        &self,
        args: &[String],
        out: &mut dyn Write,
        reporter: &ProgressReporter,
    ) -> Result<u64, EngineError>;
}

/// An ms-compatible simulator run as a child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalSimulator {
    pub program: String,
    /// Placed before the generated arguments.
    pub extra_args: Vec<String>,
}

impl ExternalSimulator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    fn full_args(&self, args: &[String]) -> Vec<String> {
        self.extra_args.iter().chain(args).cloned().collect()
    }
}

impl Default for ExternalSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl Simulator for ExternalSimulator {
    fn program(&self) -> &str {
        &self.program
    }

    fn command_line(&self, args: &[String]) -> String {
        ms::command_line(&self.program, &self.full_args(args))
    }

    fn run(
        &self,
        args: &[String],
        out: &mut dyn Write,
        reporter: &ProgressReporter,
    ) -> Result<u64, EngineError> {
        info!("Running {}", self.command_line(args));
        let mut child = Command::new(&self.program)
            .args(self.full_args(args))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let (Some(stdout), Some(mut stderr)) = (child.stdout.take(), child.stderr.take()) else {
            return Err(io::Error::other("simulator pipes were not captured").into());
        };

        // stderr is drained on its own thread so a chatty simulator cannot block on a
        // full pipe while stdout is being forwarded.
        let (forwarded, stderr_text) = thread::scope(|scope| {
            let stderr_reader = scope.spawn(move || {
                let mut text = String::new();
                stderr.read_to_string(&mut text).map(|_| text)
            });
            let forwarded = forward(stdout, out, reporter);
            let stderr_text = match stderr_reader.join() {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => {
                    warn!("Could not read simulator stderr: {}", e);
                    String::new()
                }
                Err(_) => String::new(),
            };
            (forwarded, stderr_text)
        });

        let written = match forwarded {
            Ok(written) => written,
            Err(e) => {
                if let Err(kill_error) = child.kill() {
                    debug!("Simulator already exited: {}", kill_error);
                }
                child.wait()?;
                return Err(e.into());
            }
        };

        let status = child.wait()?;
        if !stderr_text.trim().is_empty() {
            debug!("Simulator stderr: {}", stderr_text.trim());
        }
        if !status.success() {
            return Err(EngineError::SimulatorFailed {
                status: status.to_string(),
                stderr: stderr_text.trim().to_string(),
            });
        }

        out.flush()?;
        debug!("Simulator exited cleanly after writing {} bytes", written);
        Ok(written)
    }
}

fn forward(
    mut from: impl Read,
    to: &mut dyn Write,
    reporter: &ProgressReporter,
) -> io::Result<u64> {
    let mut buffer = vec![0u8; BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let n = match from.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        to.write_all(&buffer[..n])?;
        total += n as u64;
        reporter.report(Progress::OutputWritten { bytes: total });
    }
    Ok(total)
}

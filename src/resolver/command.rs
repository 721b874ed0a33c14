//! Running the external resolver process.
//!
//! `CommandRunner` is the seam between the resolver and the OS so tests can
//! count invocations and script outputs without spawning anything.

use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

/// Captured result of one finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Stdout followed by stderr, the way a terminal would have shown them.
    pub fn combined(&self) -> String {
        let mut out = self.stdout.clone();
        if !out.is_empty() && !out.ends_with('\n') && !self.stderr.is_empty() {
            out.push('\n');
        }
        out.push_str(&self.stderr);
        out
    }
}

pub trait CommandRunner {
    /// Run `program` with `args` to completion and capture its output.
    ///
    /// Returns `ErrorKind::TimedOut` when `timeout` elapses first and
    /// `ErrorKind::Interrupted` when `cancel` stops it; the child is killed in
    /// both cases.
    fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Option<Duration>,
    ) -> io::Result<CommandOutput>;

    /// Kill whatever `run` is currently waiting on, from another thread.
    fn cancel(&self) {}
}

/// Runs commands with `std::process` (no shell involved).
///
/// Clones share the running child, so one clone can `cancel` what another is
/// waiting on.
#[derive(Debug, Default, Clone)]
pub struct SystemRunner {
    running: Arc<Mutex<Option<Child>>>,
}

impl SystemRunner {
    fn running(&self) -> MutexGuard<'_, Option<Child>> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Option<Duration>,
    ) -> io::Result<CommandOutput> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain both pipes on their own threads so a chatty child can't fill a
        // pipe buffer and stall while we wait on it.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        *self.running() = Some(child);
        let deadline = timeout.map(|limit| Instant::now() + limit);

        let status = loop {
            let mut running = self.running();
            let Some(child) = running.as_mut() else {
                return Err(io::Error::new(
                    io::ErrorKind::Interrupted,
                    format!("{program} was cancelled"),
                ));
            };
            if let Some(status) = child.try_wait()? {
                running.take();
                break status;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                kill(running.take());
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("{program} timed out"),
                ));
            }
            drop(running);
            thread::sleep(Duration::from_millis(25));
        };

        Ok(CommandOutput {
            success: status.success(),
            code: status.code(),
            stdout: stdout.join().unwrap_or_default(),
            stderr: stderr.join().unwrap_or_default(),
        })
    }

    fn cancel(&self) {
        let child = self.running().take();
        if child.is_some() {
            tracing::debug!("killing running resolver process");
        }
        kill(child);
    }
}

fn kill(child: Option<Child>) {
    if let Some(mut child) = child {
        let _ = child.kill();
        let _ = child.wait();
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

//! mpv JSON IPC: newline-delimited `{"command": [...], "request_id": n}`.

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use serde_json::{Value, json};

use super::PlayerError;

/// Encode one IPC command as a single line (including the trailing newline).
pub fn command_line(args: &[Value], request_id: u64) -> Result<String, PlayerError> {
    let mut line = serde_json::to_string(&json!({
        "command": args,
        "request_id": request_id,
    }))?;
    line.push('\n');
    Ok(line)
}

pub struct IpcClient {
    stream: UnixStream,
    next_request_id: u64,
}

impl IpcClient {
    /// Connect to `path`, retrying until `timeout` while the server starts up.
    ///
    /// `still_starting` is polled between attempts; returning false aborts early
    /// (the server process died).
    pub fn connect(
        path: &Path,
        timeout: Duration,
        mut still_starting: impl FnMut() -> bool,
    ) -> Result<Self, PlayerError> {
        let deadline = Instant::now() + timeout;
        loop {
            match UnixStream::connect(path) {
                Ok(stream) => {
                    spawn_reply_reader(&stream);
                    return Ok(Self {
                        stream,
                        next_request_id: 1,
                    });
                }
                Err(source) => {
                    if !still_starting() {
                        return Err(PlayerError::Exited);
                    }
                    if Instant::now() >= deadline {
                        return Err(PlayerError::Connect {
                            path: path.to_path_buf(),
                            source,
                        });
                    }
                    thread::sleep(Duration::from_millis(50));
                }
            }
        }
    }

    /// Send a command; returns the request id it was tagged with.
    pub fn send(&mut self, args: &[Value]) -> Result<u64, PlayerError> {
        let id = self.next_request_id;
        self.next_request_id += 1;
        let line = command_line(args, id)?;
        self.stream.write_all(line.as_bytes())?;
        self.stream.flush()?;
        Ok(id)
    }

    pub fn set_property(&mut self, name: &str, value: Value) -> Result<u64, PlayerError> {
        self.send(&[json!("set_property"), json!(name), value])
    }
}

/// Read replies and events so the server never blocks on a full socket.
/// Failed requests are logged; everything else is dropped.
fn spawn_reply_reader(stream: &UnixStream) {
    let Ok(reader) = stream.try_clone() else {
        tracing::warn!("could not clone IPC stream; replies will not be read");
        return;
    };
    let _ = thread::Builder::new()
        .name("mpv-ipc".to_string())
        .spawn(move || {
            for line in BufReader::new(reader).lines() {
                let Ok(line) = line else { break };
                let Ok(v) = serde_json::from_str::<Value>(&line) else {
                    continue;
                };
                match v.get("error").and_then(Value::as_str) {
                    Some("success") | None => {
                        if let Some(event) = v.get("event").and_then(Value::as_str) {
                            tracing::trace!(event, "mpv event");
                        }
                    }
                    Some(err) => {
                        let id = v.get("request_id").and_then(Value::as_u64);
                        tracing::debug!(?id, error = err, "mpv rejected command");
                    }
                }
            }
        });
}

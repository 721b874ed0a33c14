use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use serde_json::json;

use crate::config::{PlayerSettings, WindowSettings};
use crate::media::MediaReference;

use super::ipc::IpcClient;
use super::{MediaSurface, PlayerError};

/// An idle `mpv` window driven over `--input-ipc-server`.
pub struct MpvSurface {
    child: Child,
    ipc: IpcClient,
    socket_path: PathBuf,
}

impl MpvSurface {
    pub fn spawn(player: &PlayerSettings, window: &WindowSettings) -> Result<Self, PlayerError> {
        let socket_path = player.ipc_socket.clone().unwrap_or_else(default_socket_path);
        // A socket left behind by a crashed run would make mpv fail to bind.
        let _ = std::fs::remove_file(&socket_path);

        let args = launch_args(player, window, &socket_path);
        tracing::info!(program = %player.program, ?args, "launching video surface");

        let mut child = Command::new(&player.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| PlayerError::Spawn {
                program: player.program.clone(),
                source,
            })?;

        let ipc = IpcClient::connect(
            &socket_path,
            Duration::from_millis(player.connect_timeout_ms),
            || matches!(child.try_wait(), Ok(None)),
        );
        let ipc = match ipc {
            Ok(ipc) => ipc,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        };

        Ok(Self {
            child,
            ipc,
            socket_path,
        })
    }
}

/// Command line for an idle window that waits for `loadfile` over IPC.
pub(super) fn launch_args(
    player: &PlayerSettings,
    window: &WindowSettings,
    socket_path: &std::path::Path,
) -> Vec<String> {
    let mut args = vec![
        "--idle=yes".to_string(),
        "--force-window=yes".to_string(),
        "--keep-open=yes".to_string(),
        // mpv must not draw its status line over our terminal UI.
        "--no-terminal".to_string(),
        format!("--input-ipc-server={}", socket_path.display()),
        format!("--geometry={}x{}", window.width, window.height),
        format!("--title={}", window.title),
    ];
    if window.fullscreen {
        args.push("--fullscreen".to_string());
    }
    if !window.header_visible {
        args.push("--no-border".to_string());
    }
    if !window.cursor_visible {
        args.push("--cursor-autohide=always".to_string());
    }
    args.extend(player.extra_args.iter().cloned());
    args
}

fn default_socket_path() -> PathBuf {
    dirs::runtime_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(format!("pasteplay-{}.sock", std::process::id()))
}

impl MediaSurface for MpvSurface {
    fn load(&mut self, media: &MediaReference) -> Result<(), PlayerError> {
        self.ipc
            .send(&[json!("loadfile"), json!(media.locator()), json!("replace")])?;
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<(), PlayerError> {
        self.ipc.set_property("title", json!(title))?;
        Ok(())
    }

    fn set_fullscreen(&mut self, on: bool) -> Result<(), PlayerError> {
        self.ipc.set_property("fullscreen", json!(on))?;
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<(), PlayerError> {
        let mode = if visible { "no" } else { "always" };
        self.ipc.set_property("cursor-autohide", json!(mode))?;
        Ok(())
    }

    fn set_decorations(&mut self, visible: bool) -> Result<(), PlayerError> {
        self.ipc.set_property("border", json!(visible))?;
        Ok(())
    }

    fn set_geometry(&mut self, width: u32, height: u32) -> Result<(), PlayerError> {
        self.ipc
            .set_property("geometry", json!(format!("{width}x{height}")))?;
        Ok(())
    }

    fn set_paused(&mut self, paused: bool) -> Result<(), PlayerError> {
        self.ipc.set_property("pause", json!(paused))?;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), PlayerError> {
        self.ipc.send(&[json!("stop")])?;
        Ok(())
    }

    fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    fn quit(&mut self) -> Result<(), PlayerError> {
        if !self.is_alive() {
            return Ok(());
        }
        let sent = self.ipc.send(&[json!("quit")]);
        if sent.is_err() {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
        sent.map(|_| ())
    }
}

impl Drop for MpvSurface {
    fn drop(&mut self) {
        if self.is_alive() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

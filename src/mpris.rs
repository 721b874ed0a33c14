use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::{Timer, block_on};
use zbus::{Connection, interface};
use zvariant::{OwnedValue, Value};

use crate::app::PlaybackState;

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.pasteplay";

/// Commands delivered to the event loop from outside the terminal
/// (MPRIS clients, the file dialog).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    /// Open a raw input (path or URL) as if it had been pasted.
    Open(String),
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    url: Option<String>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlaybackState) {
        if let Ok(mut s) = self.state.lock() {
            if s.playback == playback {
                return;
            }
            s.playback = playback;
        }
        let _ = self.notify.send(());
    }

    /// A handle with no bus service behind it; updates go nowhere.
    pub fn detached() -> Self {
        let (notify, _rx) = mpsc::channel::<()>();
        Self {
            state: Arc::new(Mutex::new(SharedState::default())),
            notify,
        }
    }

    pub fn set_now_playing(&self, title: Option<&str>, url: Option<&str>) {
        if let Ok(mut s) = self.state.lock() {
            s.title = title.map(str::to_string);
            s.url = url.map(str::to_string);
        }
        let _ = self.notify.send(());
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
    mime_types: Vec<String>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // The video window is owned by mpv; we can't raise it.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "pasteplay"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string(), "http".to_string(), "https".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        self.mime_types.clone()
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {}

    fn previous(&self) {}

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    fn open_uri(&self, uri: String) {
        let _ = self.tx.send(ControlCmd::Open(uri));
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        playback_status_str(s.playback)
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let (title, url) = self
            .state
            .lock()
            .map(|s| (s.title.clone(), s.url.clone()))
            .unwrap_or_default();
        metadata_map(title, url)
    }
}

fn playback_status_str(playback: PlaybackState) -> &'static str {
    match playback {
        PlaybackState::Stopped => "Stopped",
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
    }
}

fn metadata_map(title: Option<String>, url: Option<String>) -> HashMap<String, OwnedValue> {
    let mut map = HashMap::new();
    if let Some(title) = title {
        if let Ok(v) = OwnedValue::try_from(Value::from(title)) {
            map.insert("xesam:title".to_string(), v);
        }
    }
    if let Some(url) = url {
        if let Ok(v) = OwnedValue::try_from(Value::from(url)) {
            map.insert("xesam:url".to_string(), v);
        }
    }
    map
}

pub fn spawn_mpris(tx: Sender<ControlCmd>, mime_types: Vec<String>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify, notify_rx) = mpsc::channel::<()>();

    let state_for_thread = state.clone();
    let spawned = std::thread::Builder::new()
        .name("mpris".to_string())
        .spawn(move || {
            block_on(serve(tx, mime_types, state_for_thread, notify_rx));
        });
    if let Err(e) = spawned {
        tracing::warn!("MPRIS: failed to spawn thread: {e}");
    }

    MprisHandle { state, notify }
}

async fn serve(
    tx: Sender<ControlCmd>,
    mime_types: Vec<String>,
    state: Arc<Mutex<SharedState>>,
    notify_rx: Receiver<()>,
) {
    let connection = match Connection::session().await {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("MPRIS: failed to connect to session bus: {e}");
            return;
        }
    };

    if let Err(e) = connection.request_name(BUS_NAME).await {
        tracing::warn!("MPRIS: failed to acquire name: {e}");
        return;
    }

    let object_server = connection.object_server();

    let root = RootIface {
        tx: tx.clone(),
        mime_types,
    };
    if let Err(e) = object_server.at(OBJECT_PATH, root).await {
        tracing::warn!("MPRIS: failed to register root iface: {e}");
        return;
    }

    if let Err(e) = object_server.at(OBJECT_PATH, PlayerIface { tx, state }).await {
        tracing::warn!("MPRIS: failed to register player iface: {e}");
        return;
    }

    tracing::info!("MPRIS: registered {BUS_NAME}");

    loop {
        Timer::after(Duration::from_millis(200)).await;

        let mut changed = false;
        loop {
            match notify_rx.try_recv() {
                Ok(()) => changed = true,
                Err(mpsc::TryRecvError::Empty) => break,
                // Handle dropped: the app is shutting down.
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }
        if !changed {
            continue;
        }

        let iface = match object_server
            .interface::<_, PlayerIface>(OBJECT_PATH)
            .await
        {
            Ok(i) => i,
            Err(e) => {
                tracing::debug!("MPRIS: player iface lookup failed: {e}");
                continue;
            }
        };
        let emitter = iface.signal_emitter();
        let player = iface.get().await;
        if let Err(e) = player.playback_status_changed(emitter).await {
            tracing::debug!("MPRIS: PlaybackStatus signal failed: {e}");
        }
        if let Err(e) = player.metadata_changed(emitter).await {
            tracing::debug!("MPRIS: Metadata signal failed: {e}");
        }
    }
}

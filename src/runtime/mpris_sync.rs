use crate::app::App;
use crate::mpris::MprisHandle;

/// Publish what is loaded and whether it plays.
pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    match app.now_playing.as_ref() {
        Some(r) => {
            let uri = r.reference.uri();
            mpris.set_now_playing(Some(&r.title), Some(&uri));
        }
        None => mpris.set_now_playing(None, None),
    }
    mpris.set_playback(app.playback);
}

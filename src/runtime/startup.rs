use crate::clipboard::ClipboardSource;
use crate::player::MediaSurface;
use crate::resolver::CommandRunner;

use super::session::Session;

/// Open the command-line input, if any, as if it had been pasted.
pub fn open_startup_input<S, C, R>(session: &mut Session<S, C, R>, input: Option<&str>)
where
    S: MediaSurface,
    C: ClipboardSource,
    R: CommandRunner + Clone + Send + 'static,
{
    let Some(input) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return;
    };
    tracing::info!(input, "opening startup input");
    session.open_input(input);
}

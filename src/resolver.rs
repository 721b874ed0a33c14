//! External stream resolution.
//!
//! Streaming-site pages can't be played directly; the resolver runs
//! `yt-dlp -g -f <format> <url>` and keeps the first stream URL it prints.
//! `ResolverWorker` moves that work off the event loop.

mod command;
mod error;
mod resolve;
mod worker;

pub use command::{CommandOutput, CommandRunner, SystemRunner};
pub use error::ResolveError;
pub use resolve::{Resolver, first_stream_url};
pub use worker::{ResolveCmd, ResolveOutcome, ResolveRequest, ResolverWorker};

use std::io;

use thiserror::Error;

/// Why a streaming page could not be turned into a stream URL.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {}: {}", status_text(.code), first_line(.output))]
    Failed {
        program: String,
        code: Option<i32>,
        output: String,
    },

    #[error("{program} printed no stream URL: {}", first_line(.output))]
    NoStreamUrl { program: String, output: String },

    #[error("{program} did not finish within {secs}s")]
    TimedOut { program: String, secs: u64 },

    #[error("{program} was stopped before it finished")]
    Cancelled { program: String },
}

fn status_text(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "a signal".to_string(),
    }
}

fn first_line(output: &str) -> &str {
    output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("(no output)")
}

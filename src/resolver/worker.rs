//! Background resolution with request sequencing.
//!
//! The event loop hands streaming pages to a single worker thread. Every
//! request carries a sequence number; the worker skips requests that were
//! superseded while it was busy, and the app drops outcomes whose sequence
//! number is no longer the latest. Shutting down kills a resolver process
//! that is still running.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::media::Resolution;

use super::command::CommandRunner;
use super::error::ResolveError;
use super::resolve::Resolver;

#[derive(Debug)]
pub enum ResolveCmd {
    Resolve(ResolveRequest),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub seq: u64,
    pub input: String,
}

#[derive(Debug)]
pub struct ResolveOutcome {
    pub seq: u64,
    pub input: String,
    pub result: Result<Resolution, ResolveError>,
}

pub struct ResolverWorker {
    tx: Sender<ResolveCmd>,
    rx: Receiver<ResolveOutcome>,
    join: Option<JoinHandle<()>>,
    cancel: Box<dyn Fn() + Send>,
}

impl ResolverWorker {
    pub fn spawn<R>(resolver: Resolver<R>) -> Self
    where
        R: CommandRunner + Clone + Send + 'static,
    {
        let runner = resolver.runner().clone();
        let cancel = Box::new(move || runner.cancel());

        let (tx, cmd_rx) = mpsc::channel::<ResolveCmd>();
        let (outcome_tx, rx) = mpsc::channel::<ResolveOutcome>();

        let join = thread::Builder::new()
            .name("resolver".to_string())
            .spawn(move || run_worker(resolver, cmd_rx, outcome_tx))
            .ok();

        if join.is_none() {
            tracing::error!("failed to spawn resolver thread");
        }

        Self {
            tx,
            rx,
            join,
            cancel,
        }
    }

    pub fn submit(&self, request: ResolveRequest) -> Result<(), mpsc::SendError<ResolveCmd>> {
        self.tx.send(ResolveCmd::Resolve(request))
    }

    /// Next finished outcome, if any, without blocking.
    pub fn try_recv(&self) -> Option<ResolveOutcome> {
        self.rx.try_recv().ok()
    }

    /// Blocking receive.
    #[cfg(test)]
    pub fn recv(&self) -> Option<ResolveOutcome> {
        self.rx.recv().ok()
    }

    /// Stop the worker, killing a resolver process that is still running, and
    /// wait for the thread to exit.
    pub fn shutdown(&mut self) {
        let _ = self.tx.send(ResolveCmd::Quit);
        (self.cancel)();
        if let Some(h) = self.join.take() {
            if h.join().is_err() {
                tracing::warn!("resolver thread panicked");
            }
        }
    }
}

impl Drop for ResolverWorker {
    fn drop(&mut self) {
        let _ = self.tx.send(ResolveCmd::Quit);
        (self.cancel)();
    }
}

fn run_worker<R: CommandRunner>(
    resolver: Resolver<R>,
    cmd_rx: Receiver<ResolveCmd>,
    outcome_tx: Sender<ResolveOutcome>,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        let mut request = match cmd {
            ResolveCmd::Resolve(r) => r,
            ResolveCmd::Quit => return,
        };

        // Collapse anything queued behind it down to the newest request.
        loop {
            match cmd_rx.try_recv() {
                Ok(ResolveCmd::Resolve(newer)) => {
                    tracing::debug!(
                        seq = request.seq,
                        newer = newer.seq,
                        "skipping superseded request"
                    );
                    request = newer;
                }
                Ok(ResolveCmd::Quit) => return,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return,
            }
        }

        let result = resolver.resolve(&request.input);
        let outcome = ResolveOutcome {
            seq: request.seq,
            input: request.input,
            result,
        };
        if outcome_tx.send(outcome).is_err() {
            return;
        }
    }
}

//! Pairs connected players and launches one independent task per match.

use crate::endpoint::{Endpoint, TcpEndpoint};
use crate::protocol::Notice;
use crate::session::{MatchReport, MatchSession};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, info_span, instrument, warn};

/// Launches match sessions onto the tokio runtime.
///
/// Cheap to clone; clones share the match counters. Matches never share
/// anything else.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    next_id: Arc<AtomicU64>,
    active: Arc<AtomicUsize>,
}

/// Decrements the active-match count when a match task ends, including by panic.
struct ActiveGuard(Arc<AtomicUsize>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Dispatcher {
    /// Creates a dispatcher with no running matches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a match between two connected endpoints and returns at once.
    ///
    /// `first` becomes slot 0 (X), `second` slot 1 (O). The returned handle
    /// resolves to the match report; dropping it does not cancel the match.
    #[instrument(skip_all, fields(first = first.label(), second = second.label()))]
    pub fn start_match<E>(&self, first: E, second: E) -> JoinHandle<MatchReport>
    where
        E: Endpoint + 'static,
    {
        let match_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.active.fetch_add(1, Ordering::SeqCst);
        let guard = ActiveGuard(Arc::clone(&self.active));
        info!(match_id, "Launching match");

        let session = MatchSession::with_id(match_id, first, second);
        tokio::spawn(
            async move {
                let _guard = guard;
                session.run().await
            }
            .instrument(info_span!("match", match_id)),
        )
    }

    /// Number of matches currently running.
    pub fn active_matches(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Number of matches started so far.
    pub fn matches_started(&self) -> u64 {
        self.next_id.load(Ordering::SeqCst)
    }
}

/// Accept loop: pairs connections in arrival order and starts a match per pair.
///
/// The first arrival of each pair is told to wait for an opponent. Accept
/// errors are logged and the loop keeps going. Runs until the task is
/// cancelled.
#[instrument(skip_all, fields(addr = ?listener.local_addr().ok()))]
pub async fn serve(listener: TcpListener, dispatcher: Dispatcher) {
    info!("Accepting players");
    let mut waiting: Option<TcpEndpoint> = None;

    loop {
        let stream = match listener.accept().await {
            Ok((stream, addr)) => {
                debug!(%addr, "Connection accepted");
                stream
            }
            Err(err) => {
                warn!(error = %err, "Failed to accept connection");
                continue;
            }
        };
        let mut endpoint = TcpEndpoint::from_tcp(stream);

        match waiting.take() {
            Some(first) => {
                dispatcher.start_match(first, endpoint);
            }
            None => {
                // A first player who is already gone is found out when the
                // match runs, through the "other player has left" path.
                if let Err(err) = endpoint
                    .send_notice(Notice::AwaitingOpponentConnection)
                    .await
                {
                    debug!(endpoint = endpoint.label(), error = %err, "First player unreachable");
                }
                info!(endpoint = endpoint.label(), "Player waiting for an opponent");
                waiting = Some(endpoint);
            }
        }
    }
}

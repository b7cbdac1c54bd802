use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

use super::ipc::{MpvConnection, MpvEvent, MpvIpc, OBSERVE_DURATION, OBSERVE_TIME_POS};
use crate::error::{Error, Result};
use crate::session::{Decision, Session};

/// Replaces what the current player is showing
#[async_trait]
pub trait Navigator {
    async fn navigate(&mut self, identifier: &str) -> Result<()>;
}

#[async_trait]
impl<S> Navigator for MpvConnection<S>
where
    S: AsyncRead + AsyncWrite + Send,
{
    async fn navigate(&mut self, identifier: &str) -> Result<()> {
        self.load_file(identifier)
            .await
            .map_err(|e| Error::Ipc(e.to_string()))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// Player endpoint not reachable yet
    Waiting,
    /// Receiving progress events
    Attached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Apply one player event to the session, navigating when it says so.
pub async fn handle_event<N>(session: &mut Session, event: MpvEvent, navigator: &mut N) -> Result<Flow>
where
    N: Navigator + Send + ?Sized,
{
    let decision = match event {
        MpvEvent::PropertyChange { name, value } => match name.as_str() {
            "time-pos" => session.update_position(value),
            "duration" => session.update_duration(value),
            _ => Decision::Idle,
        },
        MpvEvent::StartFile => {
            session.reset_progress();
            Decision::Idle
        }
        MpvEvent::Shutdown => return Ok(Flow::Stop),
        MpvEvent::Reply { request_id, error } => {
            if error != "success" {
                warn!(request_id, error = %error, "Player rejected command");
            }
            Decision::Idle
        }
        MpvEvent::EndFile | MpvEvent::Other(_) => Decision::Idle,
    };

    if let Decision::Advance(next) = decision {
        if next != session.current() {
            navigator.navigate(&next).await?;
            session.advance_to(next);
        }
    }

    Ok(Flow::Continue)
}

/// Watches one player instance for the lifetime of a `watch` run
pub struct Monitor {
    ipc: MpvIpc,
    poll_interval: Duration,
    state: MonitorState,
}

impl Monitor {
    pub fn new(ipc: MpvIpc, poll_interval: Duration) -> Self {
        Self {
            ipc,
            poll_interval,
            state: MonitorState::Waiting,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Poll until the player accepts a connection. Runs until cancelled.
    async fn attach(&mut self) -> MpvConnection<super::ipc::IpcStream> {
        let mut interval = tokio::time::interval(self.poll_interval);
        loop {
            interval.tick().await;
            match self.ipc.connect().await {
                Ok(conn) => {
                    self.state = MonitorState::Attached;
                    info!(socket = %self.ipc.socket_path().display(), "Attached to player");
                    return conn;
                }
                Err(e) => {
                    debug!(error = %e, "Player not ready yet");
                }
            }
        }
    }

    /// Attach, subscribe to progress and drive the session until the player
    /// goes away.
    pub async fn run(&mut self, session: &mut Session) -> Result<()> {
        let mut conn = self.attach().await;

        for (id, property) in [(OBSERVE_TIME_POS, "time-pos"), (OBSERVE_DURATION, "duration")] {
            conn.observe(id, property)
                .await
                .map_err(|e| Error::Ipc(e.to_string()))?;
        }

        loop {
            let event = match conn.next_event().await {
                Ok(Some(event)) => event,
                Ok(None) => break,
                Err(e) => {
                    debug!(error = %e, "Player connection closed");
                    break;
                }
            };

            if handle_event(session, event, &mut conn).await? == Flow::Stop {
                break;
            }
        }

        info!(current = %session.current(), "Player detached");
        Ok(())
    }
}

//! Broadcast session
//!
//! A [`Session`] owns the document, the frame scheduler, and the socket
//! server for the lifetime between [`Session::init`] and
//! [`Session::shutdown`]. The host calls into it from its own loop:
//!
//! ```text
//! frame_start ──► accept pending clients, arm or suppress this cycle
//! channel     ──► telemetry.<name> = value
//! frame_end   ──► if armed: encode document, broadcast, prune failures
//! ```
//!
//! All methods take `&mut self`; a host that calls from several threads
//! should use [`SharedSession`].

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::config::DashConfig;
use crate::document::{Document, SessionState};
use crate::error::Result;
use crate::frame;
use crate::scheduler::{CycleDecision, TickScheduler};
use crate::socket_server::{BroadcastReport, ConnectionManager, HostEvent, NamedValue};
use crate::value::ChannelValue;

/// Aggregator that turns host callbacks into broadcast frames
#[derive(Debug)]
pub struct Session {
    document: Document,
    scheduler: TickScheduler,
    /// `None` once shut down
    server: Option<ConnectionManager>,
}

impl Session {
    /// Bind the listener and start with an empty document.
    ///
    /// Failure here is fatal for broadcasting; the caller logs it and keeps
    /// running without a session.
    pub fn init(config: &DashConfig) -> Result<Self> {
        tracing::info!("Session initialising");
        let addr = config.server.bind_addr()?;
        let server = ConnectionManager::bind(addr, config.server.backlog)?;
        let scheduler = TickScheduler::new(config.broadcast.interval());
        tracing::info!(
            "Session initialised on {}, one frame per {:?}",
            server.local_addr(),
            scheduler.interval()
        );

        Ok(Self {
            document: Document::new(),
            scheduler,
            server: Some(server),
        })
    }

    /// Close every connection and release the listener
    pub fn shutdown(&mut self) {
        if let Some(mut server) = self.server.take() {
            server.close_all();
            tracing::info!("Session shut down");
        }
    }

    pub fn is_running(&self) -> bool {
        self.server.is_some()
    }

    /// Route a host event to its handler
    pub fn dispatch(&mut self, event: HostEvent) {
        match event {
            HostEvent::FrameStart => self.on_frame_start(),
            HostEvent::FrameEnd => {
                self.on_frame_end();
            }
            HostEvent::Started => self.on_started(),
            HostEvent::Paused => self.on_paused(),
            HostEvent::Configuration { id, attributes } => self.on_configuration(&id, &attributes),
            HostEvent::Channel { name, index, value } => self.on_channel(&name, index, &value),
        }
    }

    pub fn on_frame_start(&mut self) {
        self.on_frame_start_at(Instant::now());
    }

    /// Start a cycle at `now`. Pending clients are accepted on every cycle,
    /// throttled or not.
    pub fn on_frame_start_at(&mut self, now: Instant) {
        let Some(server) = self.server.as_mut() else {
            return;
        };
        server.accept_pending();

        if self.scheduler.begin_cycle(now) == CycleDecision::Suppressed {
            tracing::trace!("Cycle suppressed");
        }
    }

    /// End the cycle; broadcasts if the cycle was armed.
    ///
    /// Returns the broadcast outcome, or `None` if nothing was sent.
    pub fn on_frame_end(&mut self) -> Option<BroadcastReport> {
        let server = self.server.as_mut()?;
        if !self.scheduler.end_cycle() {
            return None;
        }

        match frame::encode(&self.document) {
            Ok(bytes) => Some(server.broadcast(&bytes)),
            Err(e) => {
                tracing::error!("Skipping frame: {}", e);
                None
            }
        }
    }

    pub fn on_started(&mut self) {
        self.set_state(SessionState::Drive);
    }

    pub fn on_paused(&mut self) {
        self.set_state(SessionState::Pause);
    }

    fn set_state(&mut self, state: SessionState) {
        tracing::debug!("State: {}", state.as_str());
        self.document.set_state(state);
    }

    /// Apply each attribute as `config.<id>.<attribute>`
    pub fn on_configuration(&mut self, id: &str, attributes: &[NamedValue]) {
        tracing::debug!("Configuration '{}' with {} attribute(s)", id, attributes.len());
        for attr in attributes {
            let Some(value) = attr.value.to_document_value() else {
                continue;
            };
            if let Err(e) = self.document.upsert_config(id, &attr.name, value) {
                tracing::warn!("Ignoring configuration attribute: {}", e);
            }
        }
    }

    /// Apply a channel update as `telemetry.<name>`. The index is ignored.
    pub fn on_channel(&mut self, name: &str, _index: Option<u32>, value: &ChannelValue) {
        let Some(value) = value.to_document_value() else {
            tracing::trace!("Dropping unsupported value for '{}'", name);
            return;
        };
        let kind = value.kind();
        if let Err(e) = self.document.upsert_telemetry(name, value) {
            tracing::warn!("Ignoring {} channel update: {}", kind, e);
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn connection_count(&self) -> usize {
        self.server.as_ref().map_or(0, ConnectionManager::connection_count)
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.as_ref().map(ConnectionManager::local_addr)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Thread-safe handle to a session for hosts with multi-threaded callbacks
#[derive(Debug, Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn dispatch(&self, event: HostEvent) {
        self.inner.lock().dispatch(event);
    }

    /// Run `f` with exclusive access to the session
    pub fn with<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn shutdown(&self) {
        self.inner.lock().shutdown();
    }
}

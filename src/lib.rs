//! dashcast: telemetry aggregation and dashboard broadcast
//!
//! A host (a simulator plugin, a replay tool, anything with a main loop)
//! feeds typed channel updates into a [`Session`]. Updates are merged into a
//! single JSON [`Document`] by dotted name, and at most every 500ms the whole
//! document is framed and sent to every connected TCP client.
//!
//! # Example
//!
//! ```no_run
//! use dashcast::{ChannelValue, DashConfig, HostEvent, Session};
//!
//! let mut session = Session::init(&DashConfig::default())?;
//!
//! // One host cycle
//! session.dispatch(HostEvent::FrameStart);
//! session.dispatch(HostEvent::Channel {
//!     name: "truck.engine_rpm".into(),
//!     index: None,
//!     value: ChannelValue::Float(1500.0),
//! });
//! session.dispatch(HostEvent::FrameEnd);
//!
//! session.shutdown();
//! # Ok::<(), dashcast::DashError>(())
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod frame;
pub mod scheduler;
pub mod session;
pub mod socket_server;
pub mod value;

// Re-export commonly used types
pub use config::DashConfig;
pub use document::{Document, Node, SessionState, Tree};
pub use error::{DashError, Result};
pub use frame::{encode, FrameDecoder, FrameHeader, PROTOCOL_VERSION};
pub use scheduler::{CycleDecision, TickScheduler};
pub use session::{Session, SharedSession};
pub use socket_server::{BroadcastReport, HostEvent, NamedValue};
pub use value::{ChannelValue, DPlacement, Euler, FPlacement, Value};

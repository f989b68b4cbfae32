//! Host event types
//!
//! These are the callbacks a host delivers to the session. They are also
//! accepted as newline-delimited JSON by `dashcast serve`:
//!
//! ```json
//! {"event":"frame_start"}
//! {"event":"channel","name":"truck.speed","value":{"float":22.5}}
//! {"event":"configuration","id":"truck","attributes":[{"name":"brand","value":{"string":"Volvo"}}]}
//! {"event":"started"}
//! {"event":"frame_end"}
//! ```

use serde::{Deserialize, Serialize};

use crate::value::ChannelValue;

/// A named attribute value announced by a configuration source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub value: ChannelValue,
}

impl NamedValue {
    pub fn new(name: impl Into<String>, value: ChannelValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Host-to-session event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    /// Start of a host cycle
    FrameStart,
    /// End of a host cycle
    FrameEnd,
    /// Simulation started or resumed
    Started,
    /// Simulation paused
    Paused,
    /// Static attributes for a configuration source
    Configuration {
        id: String,
        #[serde(default)]
        attributes: Vec<NamedValue>,
    },
    /// Channel value update
    Channel {
        name: String,
        /// Array index for indexed channels; not used by the document
        #[serde(default)]
        index: Option<u32>,
        value: ChannelValue,
    },
}

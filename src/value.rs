//! Channel values and their document representation
//!
//! The host delivers [`ChannelValue`]s, which mirror the value kinds of the
//! telemetry SDK. Each one converts into at most one [`Value`], the leaf type
//! stored in the document. Vector-like kinds flatten into fixed-length number
//! arrays:
//!
//! | Channel kind   | Value    | JSON                              |
//! |----------------|----------|-----------------------------------|
//! | `fvector`      | `Vec3F`  | `[x, y, z]`                       |
//! | `euler`        | `Vec3F`  | `[heading, pitch, roll]`          |
//! | `fplacement`   | `Vec6F`  | `[x, y, z, heading, pitch, roll]` |
//! | `dplacement`   | `Vec6D`  | `[x, y, z, heading, pitch, roll]` |
//!
//! `u64` values are written as exact JSON integers. Clients that parse JSON
//! numbers as doubles lose precision above 2^53.

use serde::{Deserialize, Serialize};

/// A leaf value in the document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    I32(i32),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Vec3F([f32; 3]),
    Vec3D([f64; 3]),
    Vec6F([f32; 6]),
    Vec6D([f64; 6]),
    String(String),
}

impl Value {
    /// Short name of the variant, used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::I32(_) => "i32",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Vec3F(_) => "vec3f",
            Value::Vec3D(_) => "vec3d",
            Value::Vec6F(_) => "vec6f",
            Value::Vec6D(_) => "vec6d",
            Value::String(_) => "string",
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

/// Orientation in heading/pitch/roll, single precision
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Euler {
    pub heading: f32,
    pub pitch: f32,
    pub roll: f32,
}

/// Single precision position plus orientation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FPlacement {
    pub position: [f32; 3],
    pub orientation: Euler,
}

/// Double precision position plus single precision orientation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DPlacement {
    pub position: [f64; 3],
    pub orientation: Euler,
}

/// Typed value delivered by the host for a channel or configuration attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelValue {
    Bool(bool),
    S32(i32),
    U32(u32),
    U64(u64),
    /// Signed 64-bit values have no document representation and are dropped
    S64(i64),
    Float(f32),
    Double(f64),
    Fvector([f32; 3]),
    Dvector([f64; 3]),
    Euler(Euler),
    Fplacement(FPlacement),
    Dplacement(DPlacement),
    String(String),
}

impl ChannelValue {
    /// Convert into the document representation.
    ///
    /// Returns `None` for kinds the document does not carry; callers treat
    /// that as a no-op.
    pub fn to_document_value(&self) -> Option<Value> {
        let value = match self {
            ChannelValue::Bool(v) => Value::Bool(*v),
            ChannelValue::S32(v) => Value::I32(*v),
            ChannelValue::U32(v) => Value::U32(*v),
            ChannelValue::U64(v) => Value::U64(*v),
            ChannelValue::S64(_) => return None,
            ChannelValue::Float(v) => Value::F32(*v),
            ChannelValue::Double(v) => Value::F64(*v),
            ChannelValue::Fvector(v) => Value::Vec3F(*v),
            ChannelValue::Dvector(v) => Value::Vec3D(*v),
            ChannelValue::Euler(e) => Value::Vec3F([e.heading, e.pitch, e.roll]),
            ChannelValue::Fplacement(p) => {
                let [x, y, z] = p.position;
                let o = p.orientation;
                Value::Vec6F([x, y, z, o.heading, o.pitch, o.roll])
            }
            ChannelValue::Dplacement(p) => {
                let [x, y, z] = p.position;
                let o = p.orientation;
                Value::Vec6D([
                    x,
                    y,
                    z,
                    f64::from(o.heading),
                    f64::from(o.pitch),
                    f64::from(o.roll),
                ])
            }
            ChannelValue::String(s) => Value::String(s.clone()),
        };
        Some(value)
    }
}

//! Broadcast integration tests
//!
//! Frames, throttling, fan-out, pruning, and late joiners, all observed from
//! real TCP clients.

pub mod lifecycle_tests;

//! Loopback session harness
//!
//! Cycle times are passed explicitly so throttling is deterministic. Helper
//! cycles used for accepting clients stay inside the throttle window, so they
//! never emit frames on their own.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use dashcast::client::WatchClient;
use dashcast::{BroadcastReport, ChannelValue, DashConfig, Session};

/// Read timeout for clients that expect a frame
pub const FRAME_TIMEOUT: Duration = Duration::from_secs(2);

/// Read timeout for clients that expect silence
pub const QUIET_TIMEOUT: Duration = Duration::from_millis(200);

/// A session bound to an ephemeral loopback port with a controlled clock
pub struct TestSession {
    pub session: Session,
    start: Instant,
    /// Offset of the most recent cycle from `start`
    now: Duration,
}

impl TestSession {
    pub fn new() -> Self {
        let mut config = DashConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        let mut test = Self {
            session: Session::init(&config).expect("Failed to init session"),
            start: Instant::now(),
            now: Duration::ZERO,
        };
        // Prime the throttle so accept cycles are suppressed
        test.cycle_after(Duration::ZERO)
            .expect("First cycle should broadcast");
        test
    }

    pub fn addr(&self) -> SocketAddr {
        self.session.local_addr().expect("Session not running")
    }

    /// Run one full cycle `after` the previous one
    pub fn cycle_after(&mut self, after: Duration) -> Option<BroadcastReport> {
        self.now += after;
        self.session.on_frame_start_at(self.start + self.now);
        self.session.on_frame_end()
    }

    /// Run a cycle that is guaranteed to be armed
    pub fn emit(&mut self) -> BroadcastReport {
        self.cycle_after(Duration::from_millis(500))
            .expect("Armed cycle did not broadcast")
    }

    /// Run throttled cycles until `count` clients are connected
    pub fn wait_for_clients(&mut self, count: usize) {
        let deadline = Instant::now() + FRAME_TIMEOUT;
        while self.session.connection_count() < count {
            assert!(
                Instant::now() < deadline,
                "Timed out waiting for {} clients (have {})",
                count,
                self.session.connection_count()
            );
            let report = self.cycle_after(Duration::from_micros(1));
            assert!(report.is_none(), "Accept cycle should be suppressed");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    pub fn channel(&mut self, name: &str, value: ChannelValue) {
        self.session.on_channel(name, None, &value);
    }
}

/// Connect a client with a read timeout
pub fn connect(addr: SocketAddr, timeout: Duration) -> WatchClient {
    let client = WatchClient::connect(addr).expect("Failed to connect");
    client.set_read_timeout(Some(timeout)).unwrap();
    client
}

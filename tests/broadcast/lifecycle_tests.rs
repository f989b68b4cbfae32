//! Session init and shutdown

use dashcast::{DashConfig, DashError, Session};

use crate::common::harness::FRAME_TIMEOUT;
use crate::common::{assert_disconnected, connect, TestSession};

#[test]
fn test_shutdown_closes_clients() {
    let mut test = TestSession::new();
    let mut client = connect(test.addr(), FRAME_TIMEOUT);
    test.wait_for_clients(1);

    test.session.shutdown();
    assert_eq!(test.session.connection_count(), 0);
    assert_disconnected(&mut client);
}

#[test]
fn test_shutdown_releases_port() {
    let test = TestSession::new();
    let addr = test.addr();
    drop(test);

    let mut config = DashConfig::default();
    config.server.host = addr.ip().to_string();
    config.server.port = addr.port();
    let session = Session::init(&config).expect("Port should be free after shutdown");
    assert_eq!(session.local_addr(), Some(addr));
}

#[cfg(unix)]
#[test]
fn test_bind_failure_is_reported() {
    let test = TestSession::new();
    let addr = test.addr();

    let mut config = DashConfig::default();
    config.server.host = addr.ip().to_string();
    config.server.port = addr.port();
    match Session::init(&config) {
        Err(DashError::Bind { .. }) => {}
        other => panic!("Expected Bind error, got {:?}", other.map(|s| s.local_addr())),
    }
}

#[test]
fn test_invalid_host_is_config_error() {
    let mut config = DashConfig::default();
    config.server.host = "dashboard.local".to_string();
    assert!(matches!(
        Session::init(&config),
        Err(DashError::ConfigError { .. })
    ));
}

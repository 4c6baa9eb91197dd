//! Integration tests for metrics server functionality.

use logrecycler::metrics_server;
use logrecycler_core::config::PrometheusConfig;
use serial_test::serial;

#[test]
fn test_listen_addr_combines_host_and_port() {
    let config = PrometheusConfig {
        listen_addr: "127.0.0.1".to_string(),
        port: 19200,
        ..PrometheusConfig::default()
    };

    let addr = metrics_server::listen_addr(&config).expect("valid address");
    assert_eq!(addr.to_string(), "127.0.0.1:19200");
}

#[tokio::test]
#[serial]
async fn test_install_metrics_recorder_fails_with_invalid_address() {
    // Given: An invalid listen address
    let config = PrometheusConfig {
        listen_addr: "999.999.999.999".to_string(),
        port: 9100,
        ..PrometheusConfig::default()
    };

    // When: Installing the metrics recorder
    let result = metrics_server::install_metrics_recorder(&config);

    // Then: Should fail before touching the global recorder
    assert!(
        result.is_err(),
        "install_metrics_recorder should fail with invalid address"
    );
}

#[tokio::test]
#[serial]
async fn test_install_metrics_recorder_succeeds_with_valid_config() {
    let config = PrometheusConfig {
        listen_addr: "127.0.0.1".to_string(),
        port: 19201,
        ..PrometheusConfig::default()
    };

    let result = metrics_server::install_metrics_recorder(&config);
    assert!(
        result.is_ok(),
        "install_metrics_recorder should succeed with valid config: {:?}",
        result.err()
    );
}

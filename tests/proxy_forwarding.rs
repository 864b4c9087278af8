//! Backend forwarding through a running gateway.

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use media_gateway::config::{GatewayConfig, VirtualHostConfig};

mod common;

struct Site {
    media: TempDir,
    logs: TempDir,
}

impl Site {
    fn new() -> Self {
        Self {
            media: tempfile::tempdir().unwrap(),
            logs: tempfile::tempdir().unwrap(),
        }
    }

    fn error_log(&self) -> std::path::PathBuf {
        self.logs.path().join("error.log")
    }

    fn access_log(&self) -> std::path::PathBuf {
        self.logs.path().join("access.log")
    }

    fn config(&self, backend: SocketAddr) -> GatewayConfig {
        let mut vhost =
            VirtualHostConfig::new("a.example", self.media.path(), backend.to_string());
        vhost.access_log = Some(self.access_log());
        vhost.error_log = Some(self.error_log());

        let mut config = GatewayConfig::default();
        config.virtual_hosts.push(vhost);
        config
    }
}

#[tokio::test]
async fn forwards_with_host_and_client_headers() {
    let site = Site::new();
    let (backend, hits) = common::start_echo_backend().await;
    let (addr, shutdown) = common::start_gateway(site.config(backend)).await;

    let res = common::client()
        .get(format!("http://{addr}/api/v1/movies/?page=2"))
        .header("Host", "a.example")
        .header("X-Forwarded-For", "203.0.113.7")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "text/plain");
    let seen = res.text().await.unwrap().to_lowercase();
    assert!(seen.starts_with("get /api/v1/movies/?page=2 http/1.1"), "{seen}");
    assert!(seen.contains("host: a.example\r\n"), "{seen}");
    assert!(seen.contains("x-forwarded-host: a.example\r\n"), "{seen}");
    assert!(seen.contains("x-real-ip: 127.0.0.1\r\n"), "{seen}");
    assert!(seen.contains("x-forwarded-for: 203.0.113.7, 127.0.0.1\r\n"), "{seen}");
    assert!(seen.contains("x-forwarded-proto: http\r\n"), "{seen}");
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let log = std::fs::read_to_string(site.access_log()).unwrap();
    assert!(log.contains("\"GET /api/v1/movies/?page=2\" 200"), "{log}");
    assert!(log.contains("route=proxy"), "{log}");

    shutdown.trigger();
}

#[tokio::test]
async fn paths_outside_static_prefix_reach_backend() {
    let site = Site::new();
    let (backend, hits) = common::start_echo_backend().await;
    let (addr, shutdown) = common::start_gateway(site.config(backend)).await;
    let client = common::client();

    for path in ["/", "/media", "/mediafiles/x.jpg"] {
        let res = client
            .get(format!("http://{addr}{path}"))
            .header("Host", "a.example")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200, "{path}");
        let seen = res.text().await.unwrap();
        assert!(seen.starts_with(&format!("GET {path} HTTP/1.1")), "{seen}");
    }
    assert_eq!(hits.load(Ordering::SeqCst), 3);

    shutdown.trigger();
}

#[tokio::test]
async fn unreachable_backend_is_bad_gateway() {
    let site = Site::new();
    let backend = common::unused_addr().await;
    let (addr, shutdown) = common::start_gateway(site.config(backend)).await;

    let res = common::client()
        .post(format!("http://{addr}/api/orders"))
        .header("Host", "a.example")
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 502);

    let errors = std::fs::read_to_string(site.error_log()).unwrap();
    assert_eq!(errors.lines().count(), 1, "{errors}");
    assert!(errors.contains("\"POST /api/orders\""), "{errors}");
    assert!(errors.contains("status=502"), "{errors}");

    let access = std::fs::read_to_string(site.access_log()).unwrap();
    assert!(access.contains("\"POST /api/orders\" 502"), "{access}");

    shutdown.trigger();
}

#[tokio::test]
async fn hung_connect_is_bad_gateway_not_timeout() {
    let site = Site::new();
    let backend = common::start_saturated_listener().await;
    let mut config = site.config(backend.addr);
    config.timeouts.connect_secs = 1;
    config.timeouts.backend_secs = 5;
    assert!(media_gateway::config::validation::validate_config(&config).is_ok());
    let (addr, shutdown) = common::start_gateway(config).await;

    let started = Instant::now();
    let res = common::client()
        .get(format!("http://{addr}/x"))
        .header("Host", "a.example")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    assert!(started.elapsed() < Duration::from_secs(5));

    let errors = std::fs::read_to_string(site.error_log()).unwrap();
    assert_eq!(errors.lines().count(), 1, "{errors}");
    assert!(errors.contains("status=502"), "{errors}");

    shutdown.trigger();
}

#[tokio::test]
async fn slow_backend_times_out_without_retry() {
    let site = Site::new();
    let (backend, hits) = common::start_hanging_backend().await;
    let mut config = site.config(backend);
    config.timeouts.connect_secs = 1;
    config.timeouts.backend_secs = 2;
    let (addr, shutdown) = common::start_gateway(config).await;

    let started = Instant::now();
    let res = common::client()
        .get(format!("http://{addr}/slow"))
        .header("Host", "a.example")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 504);
    assert!(started.elapsed() < Duration::from_secs(10));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(hits.load(Ordering::SeqCst), 1, "request must not be retried");

    let errors = std::fs::read_to_string(site.error_log()).unwrap();
    assert_eq!(errors.lines().count(), 1, "{errors}");
    assert!(errors.contains("status=504"), "{errors}");

    shutdown.trigger();
}

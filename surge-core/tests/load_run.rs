//! End-to-end load run tests against in-process stub servers

mod common;

use common::StubServer;
use std::collections::HashMap;
use std::thread;
use std::time::{Duration, Instant};
use surge_core::{
    EndpointWeight, EndpointWeightTable, Error, LoadCoordinator, RunConfig,
};

fn fast_config(base_url: &str) -> RunConfig {
    RunConfig {
        base_url: base_url.to_string(),
        duration: Some(Duration::from_millis(300)),
        requests_per_second: 200.0,
        worker_count: 4,
        worker_delay: None,
        request_timeout: Duration::from_secs(2),
        seed: Some(7),
    }
}

fn two_endpoint_table() -> EndpointWeightTable {
    EndpointWeightTable::new(vec![
        EndpointWeight::new("/api/fast", 0.7),
        EndpointWeight::new("/api/medium", 0.3),
    ])
    .unwrap()
}

#[test]
fn all_success_run_has_exact_success_rate() {
    let server = StubServer::start();
    let coordinator = LoadCoordinator::new(fast_config(server.base_url()), two_endpoint_table());

    let summary = coordinator.run().expect("run should succeed");

    assert!(summary.stats.total() > 0, "workers should have issued requests");
    assert_eq!(summary.stats.success_rate(), 1.0, "all-200 run must report exactly 1.0");
    assert_eq!(summary.stats.failures(), 0);
    assert_eq!(
        summary.stats.total(),
        summary.stats.successes() + summary.stats.failures()
    );
    assert_eq!(summary.stats.total(), server.load_hits());
}

#[test]
fn failing_endpoint_is_recorded_not_fatal() {
    let server = StubServer::with_statuses(HashMap::from([(
        "/api/unreliable".to_string(),
        500u16,
    )]));
    let table = EndpointWeightTable::new(vec![
        EndpointWeight::new("/api/fast", 0.5),
        EndpointWeight::new("/api/unreliable", 0.5),
    ])
    .unwrap();
    let coordinator = LoadCoordinator::new(fast_config(server.base_url()), table);

    let summary = coordinator.run().expect("per-request failures never abort the run");

    assert!(summary.stats.failures() > 0, "unreliable endpoint should fail");
    assert!(summary.stats.successes() > 0, "fast endpoint should succeed");
    assert_eq!(
        summary.stats.total(),
        summary.stats.successes() + summary.stats.failures()
    );
    assert_eq!(summary.stats.by_status()[&500], summary.stats.failures());
    assert!(summary.stats.average_duration() <= summary.stats.max_duration().unwrap());
}

#[test]
fn unhealthy_target_aborts_before_any_load() {
    let server = StubServer::with_statuses(HashMap::from([("/health".to_string(), 503u16)]));
    let coordinator = LoadCoordinator::new(fast_config(server.base_url()), two_endpoint_table());

    let err = coordinator.run().expect_err("unhealthy target must abort startup");
    match err {
        Error::Health { status, .. } => assert_eq!(status, Some(503)),
        other => panic!("expected health error, got {other}"),
    }

    assert_eq!(server.hits("/health"), 1, "exactly one probe");
    assert_eq!(server.load_hits(), 0, "no worker may have started");
}

#[test]
fn unreachable_target_aborts_with_health_error() {
    // Allocate a port with nothing listening behind it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = fast_config(&format!("http://{addr}"));
    config.request_timeout = Duration::from_millis(500);
    let coordinator = LoadCoordinator::new(config, two_endpoint_table());

    match coordinator.run() {
        Err(Error::Health { status: None, .. }) => {}
        other => panic!("expected transport-level health error, got {other:?}"),
    }
}

#[test]
fn invalid_config_rejected_before_any_network_call() {
    let server = StubServer::start();

    let mut zero_workers = fast_config(server.base_url());
    zero_workers.worker_count = 0;
    match LoadCoordinator::new(zero_workers, two_endpoint_table()).run() {
        Err(Error::Config(_)) => {}
        other => panic!("expected config error, got {other:?}"),
    }

    let mut zero_rate = fast_config(server.base_url());
    zero_rate.requests_per_second = 0.0;
    match LoadCoordinator::new(zero_rate, two_endpoint_table()).run() {
        Err(Error::Config(_)) => {}
        other => panic!("expected config error, got {other:?}"),
    }

    assert_eq!(server.total_hits(), 0, "rejected configs must not touch the network");
}

#[test]
fn manual_stop_terminates_all_workers_promptly() {
    let server = StubServer::start();

    // Until-stopped run with a 500ms pacing interval
    let mut config = fast_config(server.base_url());
    config.duration = None;
    config.worker_count = 2;
    config.requests_per_second = 4.0;

    let pacing = config.pacing_interval();
    assert_eq!(pacing, Duration::from_millis(500));

    let coordinator = LoadCoordinator::new(config, two_endpoint_table());
    let stop = coordinator.stop_signal();

    let handle = thread::spawn(move || coordinator.run());

    thread::sleep(Duration::from_millis(150));
    let stopped_at = Instant::now();
    stop.trigger();

    let summary = handle.join().unwrap().expect("stopped run still succeeds");
    let stop_latency = stopped_at.elapsed();

    // Bound: one pacing interval plus an in-flight request against a
    // local stub, with generous scheduler margin
    assert!(
        stop_latency < pacing + Duration::from_secs(2),
        "stop took {stop_latency:?}"
    );
    assert!(summary.stats.total() >= 2, "each worker sends its first request immediately");
}

#[test]
fn pacing_bounds_request_count() {
    let server = StubServer::start();

    let mut config = fast_config(server.base_url());
    config.worker_count = 1;
    config.worker_delay = Some(Duration::from_millis(100));
    config.duration = Some(Duration::from_millis(350));

    let summary = LoadCoordinator::new(config, two_endpoint_table())
        .run()
        .expect("paced run succeeds");

    // One request at t=0 plus one per 100ms pacing interval until the
    // 350ms deadline: about 4, never the hundreds an unpaced loop would
    // fire against a local stub
    let total = summary.stats.total();
    assert!((2..=6).contains(&total), "expected ~4 paced requests, got {total}");
}

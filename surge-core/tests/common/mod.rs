//! Common test utilities for integration tests
//!
//! Provides an in-process stub HTTP server bound to port 0, with scripted
//! per-path status codes and hit counters.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Minimal HTTP/1.1 server answering GETs with scripted statuses
///
/// Unlisted paths answer 200. Every request closes its connection, so the
/// client opens a fresh one per request and the accept loop stays simple.
pub struct StubServer {
    base_url: String,
    hits: Arc<Mutex<HashMap<String, u64>>>,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl StubServer {
    /// Start a stub answering 200 to everything
    pub fn start() -> Self {
        Self::with_statuses(HashMap::new())
    }

    /// Start a stub with per-path status overrides
    pub fn with_statuses(statuses: HashMap<String, u16>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        listener.set_nonblocking(true).expect("nonblocking listener");
        let port = listener.local_addr().expect("local addr").port();

        let hits = Arc::new(Mutex::new(HashMap::new()));
        let shutdown = Arc::new(AtomicBool::new(false));

        let handle = {
            let hits = Arc::clone(&hits);
            let shutdown = Arc::clone(&shutdown);
            thread::spawn(move || serve(listener, statuses, hits, shutdown))
        };

        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            hits,
            shutdown,
            handle: Some(handle),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests observed for one path
    pub fn hits(&self, path: &str) -> u64 {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    /// Requests observed across all paths, health probes included
    pub fn total_hits(&self) -> u64 {
        self.hits.lock().unwrap().values().sum()
    }

    /// Requests observed excluding the health endpoint
    pub fn load_hits(&self) -> u64 {
        self.hits
            .lock()
            .unwrap()
            .iter()
            .filter(|(path, _)| path.as_str() != "/health")
            .map(|(_, count)| count)
            .sum()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn serve(
    listener: TcpListener,
    statuses: HashMap<String, u16>,
    hits: Arc<Mutex<HashMap<String, u64>>>,
    shutdown: Arc<AtomicBool>,
) {
    let statuses = Arc::new(statuses);
    while !shutdown.load(Ordering::Relaxed) {
        match listener.accept() {
            Ok((stream, _)) => {
                let statuses = Arc::clone(&statuses);
                let hits = Arc::clone(&hits);
                thread::spawn(move || handle_connection(stream, &statuses, &hits));
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                thread::sleep(Duration::from_millis(2));
            }
            Err(_) => break,
        }
    }
}

fn handle_connection(
    mut stream: TcpStream,
    statuses: &HashMap<String, u16>,
    hits: &Mutex<HashMap<String, u64>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_millis(500)));
    let Ok(peer) = stream.try_clone() else { return };
    let mut reader = BufReader::new(peer);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() || request_line.is_empty() {
        return;
    }
    let path = request_line.split_whitespace().nth(1).unwrap_or("/").to_string();

    // Drain headers up to the blank line; GETs carry no body
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) if line == "\r\n" => break,
            Ok(_) => {}
            Err(_) => return,
        }
    }

    *hits.lock().unwrap().entry(path.clone()).or_insert(0) += 1;

    let status = statuses.get(&path).copied().unwrap_or(200);
    let reason = if status < 400 { "OK" } else { "Error" };
    let body = r#"{"status":"OK"}"#;
    let _ = write!(
        stream,
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
}

//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves registered routes (path → status + body) and 404 for anything else.
//! Counts GET requests and records the highest number of requests being
//! served at the same time.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::Duration;

type Routes = RwLock<HashMap<String, (u16, Vec<u8>)>>;

#[derive(Default)]
struct Shared {
    routes: Routes,
    delay: RwLock<Option<Duration>>,
    requests: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

/// Handle to a running server. The server runs until the process exits.
#[derive(Clone)]
pub struct ImageServer {
    base: String,
    shared: Arc<Shared>,
}

/// Starts a server in a background thread with no routes.
pub fn start() -> ImageServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let shared = Arc::new(Shared::default());
    {
        let shared = Arc::clone(&shared);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let shared = Arc::clone(&shared);
                thread::spawn(move || handle(stream, &shared));
            }
        });
    }
    ImageServer {
        base: format!("http://127.0.0.1:{}", port),
        shared,
    }
}

impl ImageServer {
    /// Absolute URL for `path` (with or without a leading `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    /// Serves `body` with 200 at `path`.
    pub fn route(&self, path: &str, body: impl Into<Vec<u8>>) -> &Self {
        self.route_status(path, 200, body)
    }

    pub fn route_status(&self, path: &str, status: u16, body: impl Into<Vec<u8>>) -> &Self {
        let path = format!("/{}", path.trim_start_matches('/'));
        self.shared.routes.write().unwrap().insert(path, (status, body.into()));
        self
    }

    /// Holds every response for `delay` before writing it.
    pub fn set_delay(&self, delay: Duration) {
        *self.shared.delay.write().unwrap() = Some(delay);
    }

    /// GET requests received so far.
    pub fn requests(&self) -> usize {
        self.shared.requests.load(Ordering::SeqCst)
    }

    /// Largest number of requests that were being served at once.
    pub fn peak_concurrency(&self) -> usize {
        self.shared.peak.load(Ordering::SeqCst)
    }
}

fn handle(mut stream: TcpStream, shared: &Shared) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut request_line = request.lines().next().unwrap_or("").split_whitespace();
    let method = request_line.next().unwrap_or("");
    let target = request_line.next().unwrap_or("/");
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }

    shared.requests.fetch_add(1, Ordering::SeqCst);
    let now = shared.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    shared.peak.fetch_max(now, Ordering::SeqCst);
    let delay = *shared.delay.read().unwrap();
    if let Some(delay) = delay {
        thread::sleep(delay);
    }

    let path = target.split('?').next().unwrap_or(target);
    let (status, body) = shared
        .routes
        .read()
        .unwrap()
        .get(path)
        .cloned()
        .unwrap_or_else(|| (404, b"not found".to_vec()));
    shared.in_flight.fetch_sub(1, Ordering::SeqCst);

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason(status),
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(&body);
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

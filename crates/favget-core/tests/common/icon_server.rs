//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves canned responses keyed by request path (query ignored). Unknown
//! paths get 404. Routes can redirect or delay their answer.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub location: Option<String>,
    pub delay: Option<Duration>,
}

impl Route {
    pub fn ok(content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type.to_string()),
            body: body.into(),
            location: None,
            delay: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: Some("text/html".to_string()),
            body: b"<html>error</html>".to_vec(),
            location: None,
            delay: None,
        }
    }

    pub fn redirect(location: &str) -> Self {
        Self {
            status: 302,
            content_type: None,
            body: Vec::new(),
            location: Some(location.to_string()),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Running server handle. Requested targets are recorded in order.
pub struct IconServer {
    pub base: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl IconServer {
    /// `http://127.0.0.1:<port>` plus `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn host(&self) -> String {
        self.base.trim_start_matches("http://").to_string()
    }

    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> IconServer {
    let routes: HashMap<String, Route> = routes
        .into_iter()
        .map(|(p, r)| (p.to_string(), r))
        .collect();
    let routes = Arc::new(routes);
    let hits = Arc::new(Mutex::new(Vec::new()));

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let thread_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let hits = Arc::clone(&thread_hits);
            thread::spawn(move || handle(stream, &routes, &hits));
        }
    });

    IconServer {
        base: format!("http://127.0.0.1:{}", port),
        hits,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &HashMap<String, Route>,
    hits: &Mutex<Vec<String>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let target = request
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    hits.lock().unwrap().push(target.clone());

    let path = target.split('?').next().unwrap_or("/");
    let route = routes.get(path).cloned().unwrap_or_else(|| Route::status(404));
    if let Some(delay) = route.delay {
        thread::sleep(delay);
    }

    let mut head = format!(
        "HTTP/1.1 {} X\r\nContent-Length: {}\r\nConnection: close\r\n",
        route.status,
        route.body.len()
    );
    if let Some(ct) = &route.content_type {
        head.push_str(&format!("Content-Type: {}\r\n", ct));
    }
    if let Some(loc) = &route.location {
        head.push_str(&format!("Location: {}\r\n", loc));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&route.body);
}

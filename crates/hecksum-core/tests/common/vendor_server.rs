//! Minimal HTTP/1.1 server standing in for vendor sites in integration tests.
//!
//! Serves a fixed route table: bodies, redirects, and error statuses. One
//! request per connection; every response carries `Connection: close`.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone)]
pub enum Route {
    /// 200 with this body.
    Body(Vec<u8>),
    /// 302 to another path on the same server.
    Redirect(String),
    /// Bare status with a short HTML error page.
    Status(u16, &'static str),
}

#[derive(Debug, Default, Clone)]
pub struct Routes(HashMap<String, Route>);

impl Routes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, path: &str, body: impl Into<Vec<u8>>) -> Self {
        self.0.insert(path.to_string(), Route::Body(body.into()));
        self
    }

    pub fn redirect(mut self, path: &str, to: &str) -> Self {
        self.0.insert(path.to_string(), Route::Redirect(to.to_string()));
        self
    }

    pub fn status(mut self, path: &str, code: u16, reason: &'static str) -> Self {
        self.0.insert(path.to_string(), Route::Status(code, reason));
        self
    }
}

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
pub fn start(routes: Routes) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(routes);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            thread::spawn(move || handle(stream, &routes));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

/// A base URL nothing listens on.
pub fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: std::net::TcpStream, routes: &Routes) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(5)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let path = request_path(request);

    let (status, extra_header, body): (String, String, Vec<u8>) = match routes.0.get(path) {
        Some(Route::Body(body)) => ("200 OK".to_string(), String::new(), body.clone()),
        Some(Route::Redirect(to)) => (
            "302 Found".to_string(),
            format!("Location: {}\r\n", to),
            Vec::new(),
        ),
        Some(Route::Status(code, reason)) => (
            format!("{} {}", code, reason),
            String::new(),
            format!("<html><body>{}</body></html>", reason).into_bytes(),
        ),
        None => (
            "404 Not Found".to_string(),
            String::new(),
            b"<html><body>Not Found</body></html>".to_vec(),
        ),
    };
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        status,
        body.len(),
        extra_header
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&body);
}

/// Path of the request line (`GET /path HTTP/1.1`).
fn request_path(request: &str) -> &str {
    request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
}

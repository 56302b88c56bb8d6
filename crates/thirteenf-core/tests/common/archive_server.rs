//! Minimal HTTP/1.1 server standing in for the EDGAR hosts in integration tests.
//!
//! Routes map a request target (path plus query) to a sequence of
//! `(status, body)` responses; the last entry repeats once the sequence is
//! used up. Unknown targets get 404. Every request is recorded with its
//! `User-Agent`.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// One served request: target and the `User-Agent` it carried.
#[derive(Debug, Clone)]
pub struct Hit {
    pub target: String,
    pub user_agent: Option<String>,
}

#[derive(Default)]
pub struct Routes {
    map: HashMap<String, Vec<(u32, String)>>,
}

impl Routes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `target` with 200 and `body`.
    pub fn ok(self, target: &str, body: &str) -> Self {
        self.script(target, &[(200, body)])
    }

    /// Answer `target` with each response in turn, repeating the last.
    pub fn script(mut self, target: &str, responses: &[(u32, &str)]) -> Self {
        self.map.insert(
            target.to_string(),
            responses.iter().map(|(s, b)| (*s, b.to_string())).collect(),
        );
        self
    }
}

pub struct ArchiveServer {
    /// e.g. "http://127.0.0.1:12345" (no trailing slash).
    pub base: String,
    hits: Arc<Mutex<Vec<Hit>>>,
}

impl ArchiveServer {
    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    pub fn count(&self, target: &str) -> usize {
        self.hits().iter().filter(|h| h.target == target).count()
    }
}

/// Starts the server in a background thread. It runs until the process exits.
pub fn start(routes: Routes) -> ArchiveServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(Mutex::new(routes.map));
    let hits = Arc::new(Mutex::new(Vec::new()));
    let server_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let hits = Arc::clone(&server_hits);
            thread::spawn(move || handle(stream, &routes, &hits));
        }
    });
    ArchiveServer {
        base: format!("http://127.0.0.1:{}", port),
        hits,
    }
}

fn handle(
    mut stream: TcpStream,
    routes: &Mutex<HashMap<String, Vec<(u32, String)>>>,
    hits: &Mutex<Vec<Hit>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let (target, user_agent) = parse_request(request);
    hits.lock().unwrap().push(Hit {
        target: target.clone(),
        user_agent,
    });

    let (status, body) = {
        let mut routes = routes.lock().unwrap();
        match routes.get_mut(&target) {
            Some(seq) if seq.len() > 1 => seq.remove(0),
            Some(seq) => seq[0].clone(),
            None => (404, "not found".to_string()),
        }
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason(status),
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(body.as_bytes());
}

fn reason(status: u32) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        429 => "Too Many Requests",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

/// Returns (request target, optional User-Agent).
fn parse_request(request: &str) -> (String, Option<String>) {
    let mut lines = request.lines();
    let target = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("")
        .to_string();
    let user_agent = lines
        .take_while(|l| !l.trim().is_empty())
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("user-agent"))
        .map(|(_, v)| v.trim().to_string());
    (target, user_agent)
}

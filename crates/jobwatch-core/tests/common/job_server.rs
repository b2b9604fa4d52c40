//! Minimal HTTP/1.1 job server for integration tests.
//!
//! `GET /jobs/{id}` plays back a scripted list of (status code, body) pairs,
//! repeating the last one once the script runs out. `POST` requests answer
//! with a per-path canned reply (default `200 {}`). Every request is
//! recorded so tests can assert on what the client sent.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: String,
}

#[derive(Default)]
struct State {
    statuses: VecDeque<(u16, String)>,
    last_status: Option<(u16, String)>,
    replies: HashMap<String, (u16, String)>,
    requests: Vec<Recorded>,
}

pub struct JobServer {
    pub base_url: String,
    state: Arc<Mutex<State>>,
}

/// Starts a server in a background thread. The server runs until the process exits.
pub fn start(statuses: &[(u16, &str)]) -> JobServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let state = Arc::new(Mutex::new(State {
        statuses: statuses
            .iter()
            .map(|(code, body)| (*code, body.to_string()))
            .collect(),
        ..State::default()
    }));
    let shared = Arc::clone(&state);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let state = Arc::clone(&shared);
            thread::spawn(move || handle(stream, &state));
        }
    });
    JobServer {
        base_url: format!("http://127.0.0.1:{}/api/", port),
        state,
    }
}

/// A base URL nothing listens on.
pub fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/api/", port)
}

impl JobServer {
    /// Canned reply for `POST /api/{path}`.
    pub fn with_reply(self, path: &str, code: u16, body: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .replies
            .insert(format!("/api/{}", path), (code, body.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn status_fetches(&self) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == "GET" && r.path.starts_with("/api/jobs/"))
            .count()
    }
}

fn handle(mut stream: TcpStream, state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some((method, path, body)) = read_request(&mut stream) else {
        return;
    };

    let (code, reply) = {
        let mut st = state.lock().unwrap();
        st.requests.push(Recorded {
            method: method.clone(),
            path: path.clone(),
            body: body.clone(),
        });
        if method == "GET" && path.starts_with("/api/jobs/") {
            match st.statuses.pop_front() {
                Some(next) => {
                    st.last_status = Some(next.clone());
                    next
                }
                None => st
                    .last_status
                    .clone()
                    .unwrap_or((404, "{\"detail\":\"not found\"}".to_string())),
            }
        } else if method == "POST" {
            st.replies
                .get(&path)
                .cloned()
                .unwrap_or((200, "{}".to_string()))
        } else {
            (405, String::new())
        }
    };

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        code,
        reason(code),
        reply.len(),
        reply
    );
    let _ = stream.write_all(response.as_bytes());
}

/// Reads one request; returns (method, path, body).
fn read_request(stream: &mut TcpStream) -> Option<(String, String, String)> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = find(&data, b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&data[..header_end]).to_string();
    let mut lines = head.lines();
    let mut first = lines.next()?.split_whitespace();
    let method = first.next()?.to_string();
    let path = first.next()?.to_string();
    let content_length = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while data.len() < header_end + content_length {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
    }
    let body_end = (header_end + content_length).min(data.len());
    let body = String::from_utf8_lossy(&data[header_end..body_end]).to_string();
    Some((method, path, body))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn reason(code: u16) -> &'static str {
    match code {
        200 => "OK",
        202 => "Accepted",
        404 => "Not Found",
        405 => "Method Not Allowed",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

//! Lightweight HTTP fixture standing in for the MagicPod API.
//!
//! [`spawn_api_server`] serves canned JSON bodies keyed by request target
//! (path plus query). Each connection carries a single request and is closed
//! after the response, so clients never reuse a connection. The listener is
//! polled in non-blocking mode and guarded by a deadline so hung clients
//! cannot stall the test suite.

use std::{
    io::{self, Read, Write},
    net::{SocketAddr, TcpListener, TcpStream},
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

/// Canned response for one request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Path and query, for example `/api/v1.0/Org/Proj/test-cases/1/`.
    pub target: String,
    /// Status code to answer with.
    pub status: u16,
    /// JSON body to answer with.
    pub body: String,
}

impl Route {
    /// Answer `target` with `200 OK` and `body`.
    pub fn ok(target: impl Into<String>, body: impl Into<String>) -> Self {
        Self::status(target, 200, body)
    }

    /// Answer `target` with `status` and `body`.
    pub fn status(target: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            status,
            body: body.into(),
        }
    }
}

/// A request received by the fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Request method, such as `GET`.
    pub method: String,
    /// Path and query as sent by the client.
    pub target: String,
    /// Headers with lower-cased names, in arrival order.
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Value of the first header called `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        let wanted = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(key, _)| *key == wanted)
            .map(|(_, value)| value.as_str())
    }
}

/// Handle for a spawned API fixture.
///
/// The handle stops and joins the server thread when dropped to avoid
/// leaking background work if a test aborts early.
#[derive(Debug)]
#[must_use]
pub struct ApiServer {
    handle: Option<thread::JoinHandle<()>>,
    addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ApiServer {
    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Stop the server thread and propagate any panic.
    pub fn join(mut self) -> thread::Result<()> {
        self.shutdown_listener();
        self.handle.take().expect("server already joined").join()
    }

    fn shutdown_listener(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        // Connect to unblock the accept loop; the outcome is irrelevant.
        let _ = TcpStream::connect(self.addr);
    }
}

impl Drop for ApiServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.shutdown_listener();
            let _ = handle.join();
        }
    }
}

/// Spawn a fixture answering `routes` on `127.0.0.1`.
///
/// Returns the base URL (`http://127.0.0.1:<port>`) and the server handle.
/// Unknown targets receive `404 Not Found`. The server stops when the handle
/// is dropped or after a few seconds without shutdown.
pub fn spawn_api_server(routes: Vec<Route>) -> (String, ApiServer) {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind HTTP listener");
    listener
        .set_nonblocking(true)
        .expect("set listener non-blocking");
    let addr = listener.local_addr().expect("local addr");
    let url = format!("http://{addr}");
    let shutdown = Arc::new(AtomicBool::new(false));
    let requests = Arc::new(Mutex::new(Vec::new()));
    let handle = {
        let shutdown = Arc::clone(&shutdown);
        let requests = Arc::clone(&requests);
        thread::spawn(move || serve(&listener, &routes, &shutdown, &requests))
    };
    (
        url,
        ApiServer {
            handle: Some(handle),
            addr,
            shutdown,
            requests,
        },
    )
}

fn serve(
    listener: &TcpListener,
    routes: &[Route],
    shutdown: &AtomicBool,
    requests: &Mutex<Vec<RecordedRequest>>,
) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !shutdown.load(Ordering::SeqCst) && Instant::now() < deadline {
        match listener.accept() {
            Ok((stream, _)) => handle_connection(stream, routes, requests),
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(Duration::from_millis(5));
            }
            Err(err) => panic!("failed to accept connection: {err}"),
        }
    }
}

fn handle_connection(
    mut stream: TcpStream,
    routes: &[Route],
    requests: &Mutex<Vec<RecordedRequest>>,
) {
    stream
        .set_nonblocking(false)
        .expect("set stream blocking");
    stream
        .set_read_timeout(Some(Duration::from_millis(500)))
        .expect("set read timeout");
    let Some(request) = read_request(&mut stream) else {
        return;
    };
    let (status, body) = routes
        .iter()
        .find(|route| route.target == request.target)
        .map_or((404, r#"{"detail":"Not found."}"#), |route| {
            (route.status, route.body.as_str())
        });
    requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(request);
    write_response(&mut stream, status, body);
}

fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut raw = Vec::new();
    let mut buf = [0u8; 1024];
    while !raw.windows(4).any(|window| window == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => raw.extend_from_slice(&buf[..n]),
        }
    }
    let head = String::from_utf8_lossy(&raw);
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_owned();
    let target = request_line.next()?.to_owned();
    let headers = lines
        .take_while(|line| !line.is_empty())
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_owned()))
        .collect();
    Some(RecordedRequest {
        method,
        target,
        headers,
    })
}

fn write_response(stream: &mut TcpStream, status: u16, body: &str) {
    let reason = match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

use std::{
    io::{ErrorKind, Read, Write},
    net::{Shutdown, SocketAddr, TcpListener, TcpStream},
    time::Duration,
};

use crate::options::{ConfigUpdate, TreeOptions};

/// Path segment that introduces a `/<key>/<value>` update, as in
/// `GET /arduino/scheme/3`.
pub const MARKER: &str = "arduino";

const RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n";
const REQUEST_BUFFER_SIZE: usize = 1024;
// A client that connects but stays silent may only hold up one frame by this much
const READ_TIMEOUT: Duration = Duration::from_millis(5);
const MAX_DRAIN_READS: usize = 64;

/// Pull a configuration update out of an HTTP request line.
///
/// `Ok(None)` means the path carries no marker and is none of our business.
/// An `Err` means it does but the key or value is unusable.
pub fn parse_request_line(line: &str) -> Result<Option<ConfigUpdate>, String> {
    let path = line.split_whitespace().nth(1).unwrap_or(line);
    let path = path.split('?').next().unwrap_or(path);

    let mut segments = path.split('/').filter(|segment| !segment.is_empty());
    if !segments.any(|segment| segment == MARKER) {
        return Ok(None);
    }

    let (key, value) = match (segments.next(), segments.next()) {
        (Some(key), Some(value)) => (key, value),
        _ => return Err(format!("{} Expected /{}/<key>/<value>", path, MARKER)),
    };

    let value = match value.parse::<usize>() {
        Ok(value) => value,
        Err(err) => return Err(format!("{} Unexpected value {:?}: {}", path, value, err)),
    };

    match ConfigUpdate::from_key_value(key, value) {
        Some(update) => Ok(Some(update)),
        None => Err(format!("{} Unknown key {:?}", path, key)),
    }
}

/// Non-blocking HTTP endpoint that turns `GET /arduino/<key>/<value>` into
/// configuration updates.
pub struct RequestListener {
    listener: TcpListener,
}

impl RequestListener {
    pub fn new(listen_addr: SocketAddr) -> Result<Self, String> {
        let listener = match TcpListener::bind(listen_addr) {
            Ok(listener) => listener,
            Err(error) => return Err(format!("Cannot listen on {}: {}", listen_addr, error)),
        };

        if let Err(error) = listener.set_nonblocking(true) {
            return Err(error.to_string());
        }

        Ok(RequestListener { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, String> {
        self.listener.local_addr().map_err(|err| err.to_string())
    }

    /// Serve at most one pending connection. Returns immediately, false when
    /// nobody was waiting.
    pub fn poll(&self, options: &mut TreeOptions) -> bool {
        match self.listener.accept() {
            Ok((stream, addr)) => {
                self.handle_connection(stream, addr, options);
                true
            }
            Err(err) if err.kind() == ErrorKind::WouldBlock => false,
            Err(err) => {
                log::debug!("Accept failed: {err}");
                false
            }
        }
    }

    fn handle_connection(
        &self,
        mut stream: TcpStream,
        addr: SocketAddr,
        options: &mut TreeOptions,
    ) {
        match Self::read_request_line(&mut stream) {
            Some(line) => self.handle_request(&line, addr, options),
            None => log::debug!("{addr} sent no request"),
        }

        if let Err(err) = stream.write_all(RESPONSE) {
            log::warn!("Cannot respond to {addr}: {err}");
        }
        let _ = stream.shutdown(Shutdown::Both);
    }

    fn read_request_line(stream: &mut TcpStream) -> Option<String> {
        if let Err(err) = stream
            .set_nonblocking(false)
            .and_then(|_| stream.set_read_timeout(Some(READ_TIMEOUT)))
        {
            log::warn!("Cannot configure connection: {err}");
            return None;
        }

        let mut buf = [0u8; REQUEST_BUFFER_SIZE];
        let size = match stream.read(&mut buf) {
            Ok(0) => return None,
            Ok(size) => size,
            Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                return None;
            }
            Err(err) => {
                log::warn!("Cannot read request: {err}");
                return None;
            }
        };
        Self::drain(stream);

        let request = String::from_utf8_lossy(&buf[..size]);
        request.lines().next().map(|line| line.to_string())
    }

    /// Discard whatever else the client already sent, so closing the socket
    /// does not reset the connection before the response is delivered.
    fn drain(stream: &mut TcpStream) {
        if stream.set_nonblocking(true).is_err() {
            return;
        }

        let mut scratch = [0u8; REQUEST_BUFFER_SIZE];
        for _ in 0..MAX_DRAIN_READS {
            match stream.read(&mut scratch) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
        }
    }

    fn handle_request(&self, line: &str, addr: SocketAddr, options: &mut TreeOptions) {
        match parse_request_line(line) {
            Ok(Some(update)) => match options.apply(update) {
                Ok(()) => log::info!("{addr} set {:?}, now {}", update, options.describe()),
                Err(msg) => log::warn!("{addr} {msg}"),
            },
            Ok(None) => log::debug!("{addr} ignored: {line}"),
            Err(msg) => log::warn!("{addr} {msg}"),
        }
    }
}

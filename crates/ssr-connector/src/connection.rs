//! Synchronous TCP connection to the renderer

use std::io::{ErrorKind, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use crate::config::NetworkConfig;
use crate::framing::{FrameBuffer, Scan};

/// Connection lifecycle state.
///
/// `Error` is entered on hard I/O failures (reset, broken pipe, peer close),
/// so `is_connected` reports "established and not failed since", not just
/// "was established once".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
    Error,
}

/// Byte-stream connection the controller drives.
///
/// Failures surface as bool/Option returns and are logged where they occur;
/// the GUI only ever shows a connected indicator.
pub trait Connection {
    /// Establish the connection. False on failure.
    fn connect(&mut self) -> bool;

    /// Tear the connection down.
    fn disconnect(&mut self);

    /// Whether the connection is established and has not failed since.
    fn is_connected(&self) -> bool;

    /// Apply new network settings, effective on the next connect. The
    /// default is a no-op for transports without settings.
    fn reconfigure(&mut self, _config: &NetworkConfig) {}

    /// Send one message plus the delimiter, waiting at most `timeout`.
    fn send_message(&mut self, message: &str, timeout: Duration) -> bool;

    /// Next complete inbound message, waiting at most `timeout`. A zero
    /// timeout is a single non-blocking poll.
    fn receive_message(&mut self, timeout: Duration) -> Option<String>;
}

/// TCP implementation over std::net: timeout-bounded blocking calls, no
/// background I/O thread.
pub struct TcpConnection {
    config: NetworkConfig,
    stream: Option<TcpStream>,
    frame: FrameBuffer,
    state: ConnectionState,
}

impl TcpConnection {
    pub fn new(config: NetworkConfig) -> Self {
        let delimiter = config.delimiter();
        Self {
            config,
            stream: None,
            frame: FrameBuffer::new(delimiter),
            state: ConnectionState::Disconnected,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    fn try_connect(&mut self) -> std::io::Result<()> {
        let address = resolve(&self.config.host, self.config.port)?;
        let timeout = self.config.timeout();
        // connect_timeout rejects a zero duration; zero means a plain
        // blocking connect here, as on the send path.
        let stream = if timeout.is_zero() {
            TcpStream::connect(address)?
        } else {
            TcpStream::connect_timeout(&address, timeout)?
        };
        self.stream = Some(stream);
        self.frame.reset();
        Ok(())
    }

    fn mark_error(&mut self) {
        self.state = ConnectionState::Error;
        self.stream = None;
    }

    /// Refill the frame buffer with one read bounded by `deadline` (None is
    /// a single non-blocking attempt). True when new bytes arrived.
    fn load_more(&mut self, deadline: Option<Instant>) -> bool {
        let Some(stream) = self.stream.as_mut() else {
            return false;
        };

        let result = match deadline {
            None => {
                if let Err(error) = stream.set_nonblocking(true) {
                    log::error!("[Connection] Cannot arm non-blocking read: {error}");
                    return false;
                }
                let result = self.frame.load(stream);
                let _ = stream.set_nonblocking(false);
                result
            }
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return false;
                }
                if let Err(error) = stream.set_read_timeout(Some(remaining)) {
                    log::error!("[Connection] Cannot arm read timeout: {error}");
                    return false;
                }
                self.frame.load(stream)
            }
        };

        match result {
            Ok(0) => {
                log::warn!("[Connection] Peer closed the connection");
                self.mark_error();
                false
            }
            Ok(_) => true,
            Err(error)
                if matches!(
                    error.kind(),
                    ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
                ) =>
            {
                false
            }
            Err(error) => {
                log::error!("[Connection] Read failed: {error}");
                self.mark_error();
                false
            }
        }
    }
}

fn resolve(host: &str, port: u16) -> std::io::Result<SocketAddr> {
    (host, port).to_socket_addrs()?.next().ok_or_else(|| {
        std::io::Error::new(ErrorKind::AddrNotAvailable, "host resolved to no addresses")
    })
}

impl Connection for TcpConnection {
    fn connect(&mut self) -> bool {
        match self.try_connect() {
            Ok(()) => {
                log::info!(
                    "[Connection] Connected to {}:{}",
                    self.config.host,
                    self.config.port
                );
                self.state = ConnectionState::Connected;
                true
            }
            Err(error) => {
                log::error!(
                    "[Connection] Connect to {}:{} failed: {error}",
                    self.config.host,
                    self.config.port
                );
                self.state = ConnectionState::Error;
                false
            }
        }
    }

    fn disconnect(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
            log::info!("[Connection] Disconnected");
        }
        self.state = ConnectionState::Disconnected;
    }

    fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    fn reconfigure(&mut self, config: &NetworkConfig) {
        self.frame = FrameBuffer::new(config.delimiter());
        self.config = config.clone();
    }

    fn send_message(&mut self, message: &str, timeout: Duration) -> bool {
        let Some(stream) = self.stream.as_mut() else {
            return false;
        };

        // A zero timeout degenerates to a blocking write; request payloads
        // are far below the socket send buffer.
        let write_timeout = (!timeout.is_zero()).then_some(timeout);
        if let Err(error) = stream.set_write_timeout(write_timeout) {
            log::error!("[Connection] Cannot arm write timeout: {error}");
            return false;
        }

        let delimiter = [self.config.delimiter()];
        let outcome = stream
            .write_all(message.as_bytes())
            .and_then(|()| stream.write_all(&delimiter));

        match outcome {
            Ok(()) => true,
            Err(error)
                if matches!(error.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                log::warn!("[Connection] Send timed out");
                false
            }
            Err(error) => {
                log::error!("[Connection] Send failed: {error}");
                self.mark_error();
                false
            }
        }
    }

    fn receive_message(&mut self, timeout: Duration) -> Option<String> {
        let deadline = (!timeout.is_zero()).then(|| Instant::now() + timeout);

        loop {
            match self.frame.scan() {
                Scan::Message(message) => return Some(message),
                Scan::NeedData => {
                    if !self.load_more(deadline) {
                        return None;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disconnected() {
        let connection = TcpConnection::new(NetworkConfig::default());
        assert_eq!(connection.state(), ConnectionState::Disconnected);
        assert!(!connection.is_connected());
    }

    #[test]
    fn operations_without_a_stream_fail_soft() {
        let mut connection = TcpConnection::new(NetworkConfig::default());
        assert!(!connection.send_message("<request/>", Duration::ZERO));
        assert!(connection.receive_message(Duration::ZERO).is_none());
        assert!(connection.receive_message(Duration::from_millis(10)).is_none());
    }

    #[test]
    fn connecting_to_a_closed_port_fails() {
        let config = NetworkConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            timeout_ms: 200,
            end_of_message: 0,
        };
        let mut connection = TcpConnection::new(config);
        assert!(!connection.connect());
        assert!(!connection.is_connected());
        assert_eq!(connection.state(), ConnectionState::Error);
    }

    #[test]
    fn disconnect_without_a_stream_is_harmless() {
        let mut connection = TcpConnection::new(NetworkConfig::default());
        connection.disconnect();
        assert_eq!(connection.state(), ConnectionState::Disconnected);
    }
}

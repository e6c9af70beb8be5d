use super::events::NotificationEmitter;
use super::handler::DnsRequestHandler;
use super::socket::create_udp_socket;
use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const DEFAULT_RECV_BUFFER_SIZE: usize = 512;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServerError {
    #[error("You need admin privileges to run on port {port}.")]
    PermissionDenied { port: u16 },

    #[error("Invalid bind address '{0}'")]
    InvalidBindAddress(String),

    #[error("{0}")]
    Bind(String),

    #[error("{0}")]
    Socket(String),
}

/// How a call to [`DnsServer::start`] ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The receive loop ran and was stopped by [`DnsServer::stop`].
    Stopped,
    /// Another `start` already owns the socket; nothing was done.
    AlreadyRunning,
}

enum ServerState {
    Idle,
    Running(RunningServer),
    /// Stopped, but the loop of this generation still owns its socket
    /// (e.g. finishing an in-flight request).
    Draining { generation: u64 },
}

enum BindAttempt {
    Bound(BoundSocket),
    AlreadyRunning,
    Draining,
}

struct RunningServer {
    generation: u64,
    cancel: CancellationToken,
    local_addr: SocketAddr,
}

struct BoundSocket {
    socket: UdpSocket,
    cancel: CancellationToken,
    generation: u64,
}

/// The UDP responder.
///
/// `start` binds and then serves until `stop` is called, so it is meant to run
/// on its own task. `stop` is synchronous and may be called from anywhere.
/// Requests are handled one at a time: a slow system-resolver lookup delays
/// every datagram queued behind it.
pub struct DnsServer {
    handler: DnsRequestHandler,
    emitter: NotificationEmitter,
    port: u16,
    recv_buffer_size: usize,
    state: Mutex<ServerState>,
    generation: AtomicU64,
    drained: Notify,
}

impl DnsServer {
    pub fn new(handler: DnsRequestHandler, emitter: NotificationEmitter, port: u16) -> Self {
        Self {
            handler,
            emitter,
            port,
            recv_buffer_size: DEFAULT_RECV_BUFFER_SIZE,
            state: Mutex::new(ServerState::Idle),
            generation: AtomicU64::new(0),
            drained: Notify::new(),
        }
    }

    pub fn with_recv_buffer_size(mut self, size: usize) -> Self {
        self.recv_buffer_size = size.max(DEFAULT_RECV_BUFFER_SIZE);
        self
    }

    /// Binds `bind_address` on the configured port and serves until stopped.
    ///
    /// If a previous run is still draining after `stop`, waits for its socket
    /// to close before binding. Every failure is also reported through the
    /// notification channel.
    pub async fn start(&self, bind_address: &str) -> Result<StartOutcome, ServerError> {
        let bound = loop {
            let drained = self.drained.notified();
            tokio::pin!(drained);
            drained.as_mut().enable();

            match self.bind(bind_address) {
                Ok(BindAttempt::Bound(bound)) => break bound,
                Ok(BindAttempt::AlreadyRunning) => {
                    info!("Server is already running");
                    self.emitter.info("Server is already running");
                    return Ok(StartOutcome::AlreadyRunning);
                }
                Ok(BindAttempt::Draining) => {
                    debug!("Waiting for the previous run to release its socket");
                    drained.await;
                }
                Err(e) => {
                    error!(bind_address = %bind_address, port = self.port, error = %e, "Failed to start DNS server");
                    self.emitter.error(format!("Error: {}", e));
                    return Err(e);
                }
            }
        };

        info!(bind_address = %bind_address, port = self.port, "DNS server started");
        self.emitter
            .info(format!("DNS server started on {}", bind_address));

        let BoundSocket {
            socket,
            cancel,
            generation,
        } = bound;
        let result = self.serve(socket, cancel).await;
        self.finish(generation);

        match &result {
            Ok(_) => info!("DNS server stopped"),
            Err(e) => {
                error!(error = %e, "DNS server terminated");
                self.emitter.error(format!("Error: {}", e));
            }
        }
        result
    }

    /// Stops a running server. Returns `false` if it was not running.
    ///
    /// The server reports not running as soon as this returns; the socket is
    /// closed once the loop finishes the request it may be handling.
    pub fn stop(&self) -> bool {
        let mut state = self.lock_state();
        let generation = match &*state {
            ServerState::Running(running) => {
                info!(local_addr = %running.local_addr, "Stopping DNS server");
                running.cancel.cancel();
                running.generation
            }
            ServerState::Draining { .. } | ServerState::Idle => {
                debug!("Server is not running");
                return false;
            }
        };
        *state = ServerState::Draining { generation };
        true
    }

    pub fn is_running(&self) -> bool {
        matches!(*self.lock_state(), ServerState::Running(_))
    }

    /// Address the socket is actually bound to, while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        match &*self.lock_state() {
            ServerState::Running(running) => Some(running.local_addr),
            ServerState::Draining { .. } | ServerState::Idle => None,
        }
    }

    /// Idle → Running under the state lock, so concurrent starts cannot both bind.
    fn bind(&self, bind_address: &str) -> Result<BindAttempt, ServerError> {
        let mut state = self.lock_state();
        match *state {
            ServerState::Running(_) => return Ok(BindAttempt::AlreadyRunning),
            ServerState::Draining { .. } => return Ok(BindAttempt::Draining),
            ServerState::Idle => {}
        }

        let ip: Ipv4Addr = bind_address
            .trim()
            .parse()
            .map_err(|_| ServerError::InvalidBindAddress(bind_address.to_string()))?;

        let std_socket = create_udp_socket(SocketAddrV4::new(ip, self.port))
            .map_err(|e| classify_bind_error(e, self.port))?;
        let socket = UdpSocket::from_std(std_socket).map_err(|e| ServerError::Bind(e.to_string()))?;
        let local_addr = socket
            .local_addr()
            .map_err(|e| ServerError::Bind(e.to_string()))?;

        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let cancel = CancellationToken::new();
        *state = ServerState::Running(RunningServer {
            generation,
            cancel: cancel.clone(),
            local_addr,
        });

        Ok(BindAttempt::Bound(BoundSocket {
            socket,
            cancel,
            generation,
        }))
    }

    /// Receive loop. The socket is dropped (closed) when this returns.
    async fn serve(
        &self,
        socket: UdpSocket,
        cancel: CancellationToken,
    ) -> Result<StartOutcome, ServerError> {
        let mut buf = vec![0u8; self.recv_buffer_size];

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => return Ok(StartOutcome::Stopped),

                received = socket.recv_from(&mut buf) => match received {
                    Ok((len, peer)) => self.respond(&socket, &buf[..len], peer).await,
                    Err(e) if is_transient(&e) => {
                        debug!(error = %e, "Transient UDP receive error");
                    }
                    Err(e) => return Err(ServerError::Socket(e.to_string())),
                },
            }
        }
    }

    async fn respond(&self, socket: &UdpSocket, payload: &[u8], peer: SocketAddr) {
        let handled = self.handler.handle(payload, peer).await;
        self.emitter.emit(handled.notification);

        if let Some(reply) = handled.reply {
            if let Err(e) = socket.send_to(&reply, peer).await {
                warn!(client = %peer, error = %e, "Failed to send DNS response");
            }
        }
    }

    /// Running/Draining → Idle once the loop of `generation` has dropped its
    /// socket, then wakes any `start` waiting on the drain.
    fn finish(&self, generation: u64) {
        let mut state = self.lock_state();
        let owned = match &*state {
            ServerState::Running(running) => running.generation == generation,
            ServerState::Draining { generation: draining } => *draining == generation,
            ServerState::Idle => false,
        };
        if owned {
            *state = ServerState::Idle;
        }
        drop(state);
        self.drained.notify_waiters();
    }

    fn lock_state(&self) -> MutexGuard<'_, ServerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn classify_bind_error(e: io::Error, port: u16) -> ServerError {
    if e.kind() == io::ErrorKind::PermissionDenied {
        ServerError::PermissionDenied { port }
    } else {
        ServerError::Bind(e.to_string())
    }
}

/// ICMP errors from earlier replies surface on the next receive on some
/// platforms; they say nothing about the listening socket.
fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionRefused
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
    )
}

//! Thin peer. Sends its input flags every tick and renders whatever
//! snapshot the server last sent; it never advances the simulation itself.

use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{sync_channel, Receiver, TrySendError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use chesspong_core::{GameConfig, InputFrame, Snapshot};

use crate::wire::{self, Message};
use crate::CHANNEL_DEPTH;

/// Timeout for the initial connection attempt. The steady-state receive
/// loop deliberately has none; a vanished server surfaces as end-of-stream.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct GameClient {
    stream: TcpStream,
    running: Arc<AtomicBool>,
    config_rx: Receiver<GameConfig>,
    state_rx: Receiver<Snapshot>,
    last_state: Option<Snapshot>,
}

impl GameClient {
    /// Connect to a server and start the receive thread. `addr` is anything
    /// resolvable, typically `"host:port"`.
    pub fn connect<A: ToSocketAddrs>(addr: A) -> io::Result<Self> {
        let mut last_err = None;
        let mut stream = None;
        for candidate in addr.to_socket_addrs()? {
            match TcpStream::connect_timeout(&candidate, CONNECT_TIMEOUT) {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => last_err = Some(e),
            }
        }
        let stream = match stream {
            Some(s) => s,
            None => {
                return Err(last_err.unwrap_or_else(|| {
                    io::Error::new(io::ErrorKind::InvalidInput, "address resolved to nothing")
                }))
            }
        };
        info!(peer = %stream.peer_addr()?, "connected to server");

        let running = Arc::new(AtomicBool::new(true));
        let (config_tx, config_rx) = sync_channel::<GameConfig>(1);
        let (state_tx, state_rx) = sync_channel::<Snapshot>(CHANNEL_DEPTH);

        let thread_stream = stream.try_clone()?;
        let thread_running = Arc::clone(&running);
        thread::spawn(move || {
            let mut stream = thread_stream;
            while thread_running.load(Ordering::Relaxed) {
                match wire::read_message(&mut stream) {
                    Ok(Message::Config(config)) => {
                        let _ = config_tx.try_send(config);
                    }
                    Ok(Message::State(snapshot)) => {
                        if let Err(TrySendError::Full(_)) = state_tx.try_send(snapshot) {
                            // Stale snapshots are droppable by design; the
                            // reader keeps only the newest one anyway.
                            trace!("state channel full, dropping snapshot");
                        }
                    }
                    Ok(other) => {
                        debug!(?other, "ignoring unexpected message from server");
                    }
                    Err(e) => {
                        debug!(error = %e, "server receive loop ending");
                        thread_running.store(false, Ordering::Relaxed);
                        break;
                    }
                }
            }
        });

        Ok(Self {
            stream,
            running,
            config_rx,
            state_rx,
            last_state: None,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Wait for the match configuration the server sends on connect.
    pub fn wait_for_config(&self, timeout: Duration) -> Option<GameConfig> {
        self.config_rx.recv_timeout(timeout).ok()
    }

    /// Newest snapshot received, draining anything older (last-write-wins).
    /// Returns the previous snapshot again when nothing new arrived.
    pub fn latest_state(&mut self) -> Option<Snapshot> {
        if let Some(snapshot) = self.state_rx.try_iter().last() {
            self.last_state = Some(snapshot);
        }
        self.last_state.clone()
    }

    /// Ship this tick's input flags. Returns false once the session is dead.
    pub fn send_input(&mut self, frame: &InputFrame) -> bool {
        if !self.is_connected() {
            return false;
        }
        if let Err(e) = wire::write_message(&mut self.stream, &Message::Input(*frame)) {
            warn!(error = %e, "send to server failed, closing session");
            self.close();
            return false;
        }
        true
    }

    pub fn close(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        let _ = self.stream.shutdown(std::net::Shutdown::Both);
    }
}

impl Drop for GameClient {
    fn drop(&mut self) {
        self.close();
    }
}

//! Authoritative peer. Owns the single source of truth each tick and
//! replicates it to one connected client; never blocks the simulation on
//! network I/O.

use std::io;
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{sync_channel, Receiver, TrySendError};
use std::sync::Arc;
use std::thread;

use tracing::{debug, info, trace, warn};

use chesspong_core::{GameConfig, InputFrame, Snapshot};

use crate::wire::{self, Message};
use crate::CHANNEL_DEPTH;

struct Peer {
    stream: TcpStream,
    running: Arc<AtomicBool>,
    input_rx: Receiver<InputFrame>,
}

pub struct GameServer {
    listener: TcpListener,
    peer: Option<Peer>,
    /// Sticky copy of the newest input seen, reused on ticks where nothing
    /// arrived (a held key keeps working across network jitter).
    last_input: Option<InputFrame>,
}

impl GameServer {
    pub fn bind(port: u16) -> io::Result<Self> {
        let listener = TcpListener::bind(("0.0.0.0", port))?;
        info!(port, "server listening");
        Ok(Self {
            listener,
            peer: None,
            last_input: None,
        })
    }

    pub fn local_addr(&self) -> io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Block until a client connects, then start its receive thread.
    pub fn wait_for_peer(&mut self) -> io::Result<()> {
        let (stream, addr) = self.listener.accept()?;
        info!(%addr, "client connected");

        let running = Arc::new(AtomicBool::new(true));
        let (input_tx, input_rx) = sync_channel::<InputFrame>(CHANNEL_DEPTH);

        let thread_stream = stream.try_clone()?;
        let thread_running = Arc::clone(&running);
        thread::spawn(move || {
            let mut stream = thread_stream;
            while thread_running.load(Ordering::Relaxed) {
                match wire::read_message(&mut stream) {
                    Ok(Message::Input(frame)) => {
                        if let Err(TrySendError::Full(_)) = input_tx.try_send(frame) {
                            // Overflow drops the frame; the reader keeps the
                            // newest drained item, so nothing meaningful is
                            // lost.
                            trace!("input channel full, dropping frame");
                        }
                    }
                    Ok(other) => {
                        debug!(?other, "ignoring unexpected message from client");
                    }
                    Err(e) => {
                        // EOF or a broken frame both mean the peer is gone.
                        debug!(error = %e, "client receive loop ending");
                        thread_running.store(false, Ordering::Relaxed);
                        break;
                    }
                }
            }
        });

        self.peer = Some(Peer {
            stream,
            running,
            input_rx,
        });
        self.last_input = None;
        Ok(())
    }

    pub fn has_peer(&self) -> bool {
        self.peer
            .as_ref()
            .is_some_and(|p| p.running.load(Ordering::Relaxed))
    }

    /// Newest input frame from the client. Drains everything received since
    /// the last call and keeps the final item (last-write-wins); returns the
    /// previous frame again when nothing new arrived.
    pub fn latest_input(&mut self) -> Option<InputFrame> {
        if let Some(peer) = &self.peer {
            if let Some(frame) = peer.input_rx.try_iter().last() {
                self.last_input = Some(frame);
            }
        }
        self.last_input
    }

    pub fn send_config(&mut self, config: &GameConfig) {
        self.send(Message::Config(config.clone()));
    }

    pub fn send_state(&mut self, snapshot: &Snapshot) {
        self.send(Message::State(snapshot.clone()));
    }

    /// Send failures demote the peer to "unavailable" instead of surfacing
    /// an error; the simulation keeps running with a null peer.
    fn send(&mut self, message: Message) {
        let failed = match self.peer.as_mut() {
            None => return,
            Some(peer) => {
                if !peer.running.load(Ordering::Relaxed) {
                    true
                } else if let Err(e) = wire::write_message(&mut peer.stream, &message) {
                    warn!(error = %e, "send to client failed, dropping peer");
                    true
                } else {
                    false
                }
            }
        };
        if failed {
            self.drop_peer();
        }
    }

    fn drop_peer(&mut self) {
        if let Some(peer) = self.peer.take() {
            peer.running.store(false, Ordering::Relaxed);
            let _ = peer.stream.shutdown(std::net::Shutdown::Both);
        }
        self.last_input = None;
    }

    /// Stop the session. The receive thread observes the cleared running
    /// flag once its blocking read fails after the socket shutdown.
    pub fn close(&mut self) {
        self.drop_peer();
    }
}

impl Drop for GameServer {
    fn drop(&mut self) {
        self.close();
    }
}

//! Single-client TCP command server.
//!
//! The accept thread numbers each connection and announces it to the control
//! loop before spawning its reader, so a connection's bytes always follow its
//! `Connected` message. Accepting a new client makes every older connection
//! stale; stale readers stop on their next wakeup.

use crossbeam_channel as xch;
use std::io::{self, ErrorKind, Read};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::runner::Message;

/// Accept poll interval and per-read timeout; bounds shutdown latency.
const POLL: Duration = Duration::from_millis(50);

pub struct CommandServer {
    local_addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<JoinHandle<()>>,
}

impl CommandServer {
    /// Bind `addr` and start accepting clients on a background thread.
    pub fn bind<A: ToSocketAddrs>(addr: A, tx: xch::Sender<Message>) -> io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;
        let local_addr = listener.local_addr()?;
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let join_handle = std::thread::Builder::new()
            .name("tilt-accept".into())
            .spawn(move || accept_loop(&listener, &tx, &shutdown_clone))?;

        tracing::info!(addr = %local_addr, "command server listening");
        Ok(Self {
            local_addr,
            shutdown,
            join_handle: Some(join_handle),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Drop for CommandServer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take()
            && let Err(e) = handle.join()
        {
            tracing::warn!(?e, "accept thread panicked during shutdown");
        }
    }
}

fn accept_loop(listener: &TcpListener, tx: &xch::Sender<Message>, shutdown: &Arc<AtomicBool>) {
    let active = Arc::new(AtomicU64::new(0));
    let mut next_id: u64 = 0;
    let mut readers: Vec<JoinHandle<()>> = Vec::new();

    while !shutdown.load(Ordering::Relaxed) {
        match listener.accept() {
            Ok((stream, peer)) => {
                next_id += 1;
                let id = next_id;
                let reader = match prepare(&stream).and_then(|()| stream.try_clone()) {
                    Ok(r) => r,
                    Err(e) => {
                        tracing::warn!(%peer, error = %e, "failed to set up connection");
                        continue;
                    }
                };
                active.store(id, Ordering::Relaxed);
                tracing::debug!(%peer, id, "connection accepted");
                if tx.send(Message::Connected { id, stream }).is_err() {
                    break;
                }
                let tx = tx.clone();
                let active = active.clone();
                let shutdown = shutdown.clone();
                let spawned = std::thread::Builder::new()
                    .name(format!("tilt-conn-{id}"))
                    .spawn(move || read_loop(id, reader, &tx, &active, &shutdown));
                match spawned {
                    Ok(h) => readers.push(h),
                    Err(e) => tracing::warn!(id, error = %e, "failed to spawn connection reader"),
                }
                readers.retain(|h| !h.is_finished());
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => std::thread::sleep(POLL),
            Err(e) => {
                tracing::warn!(error = %e, "accept failed");
                std::thread::sleep(POLL);
            }
        }
    }

    for h in readers {
        if let Err(e) = h.join() {
            tracing::warn!(?e, "connection reader panicked");
        }
    }
    tracing::trace!("accept thread exiting cleanly");
}

fn prepare(stream: &TcpStream) -> io::Result<()> {
    stream.set_nonblocking(false)?;
    stream.set_nodelay(true)?;
    stream.set_read_timeout(Some(POLL))
}

fn read_loop(
    id: u64,
    mut stream: TcpStream,
    tx: &xch::Sender<Message>,
    active: &AtomicU64,
    shutdown: &AtomicBool,
) {
    let mut buf = [0u8; 64];
    loop {
        if shutdown.load(Ordering::Relaxed) || active.load(Ordering::Relaxed) != id {
            // replaced or shutting down: drop quietly
            return;
        }
        match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                for &byte in &buf[..n] {
                    if tx.send(Message::Byte { id, byte }).is_err() {
                        return;
                    }
                }
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => {
                tracing::debug!(id, error = %e, "connection read failed");
                break;
            }
        }
    }
    let _ = tx.send(Message::Disconnected { id });
}

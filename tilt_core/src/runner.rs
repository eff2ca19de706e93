//! Control loop: the only owner of the `Rig`.
//!
//! Sensor and network threads send `Message`s; the runner applies each one
//! to completion before taking the next, and writes status and telemetry
//! lines back to the active client.

use crossbeam_channel as xch;
use std::io::{ErrorKind, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tilt_traits::{Actuator, InputEvent};

use crate::rig::Rig;

/// How often the loop checks the shutdown flag while idle.
const IDLE_POLL: Duration = Duration::from_millis(100);
/// Longest a status write may stall before the client is dropped.
const WRITE_TIMEOUT: Duration = Duration::from_millis(50);

#[derive(Debug)]
pub enum Message {
    /// One accelerometer event.
    Event(InputEvent),
    /// A new client was accepted; it replaces any current client.
    Connected { id: u64, stream: TcpStream },
    /// One command byte from connection `id`.
    Byte { id: u64, byte: u8 },
    /// Connection `id` reached end of stream or failed.
    Disconnected { id: u64 },
}

#[derive(Debug)]
struct Client {
    id: u64,
    stream: TcpStream,
}

pub struct Runner<A: Actuator> {
    rig: Rig<A>,
    rx: xch::Receiver<Message>,
    shutdown: Arc<AtomicBool>,
    client: Option<Client>,
}

impl<A: Actuator> Runner<A> {
    pub fn new(rig: Rig<A>, rx: xch::Receiver<Message>, shutdown: Arc<AtomicBool>) -> Self {
        Self {
            rig,
            rx,
            shutdown,
            client: None,
        }
    }

    pub fn rig(&self) -> &Rig<A> {
        &self.rig
    }

    pub fn into_rig(self) -> Rig<A> {
        self.rig
    }

    /// Id of the connection currently receiving status lines.
    pub fn active_client(&self) -> Option<u64> {
        self.client.as_ref().map(|c| c.id)
    }

    /// Process messages until shutdown is requested or every sender is gone.
    pub fn run(&mut self) {
        tracing::info!("control loop started");
        while !self.shutdown.load(Ordering::Relaxed) {
            match self.rx.recv_timeout(IDLE_POLL) {
                Ok(msg) => self.handle(msg),
                Err(xch::RecvTimeoutError::Timeout) => {}
                Err(xch::RecvTimeoutError::Disconnected) => {
                    tracing::debug!("all message sources closed");
                    break;
                }
            }
        }
        self.drop_client();
        tracing::info!(power = self.rig.controller().power(), "control loop stopped");
    }

    pub fn handle(&mut self, msg: Message) {
        match msg {
            Message::Event(ev) => {
                if let Some(line) = self.rig.on_event(&ev) {
                    self.send_line(&line);
                }
            }
            Message::Connected { id, stream } => {
                if self.client.is_some() {
                    tracing::info!(id, "replacing existing connection");
                    self.drop_client();
                }
                if let Err(e) = stream.set_write_timeout(Some(WRITE_TIMEOUT)) {
                    tracing::warn!(id, error = %e, "cannot bound status writes; refusing client");
                    let _ = stream.shutdown(Shutdown::Both);
                    return;
                }
                match stream.peer_addr() {
                    Ok(peer) => tracing::info!(id, %peer, "client connected"),
                    Err(_) => tracing::info!(id, "client connected"),
                }
                self.client = Some(Client { id, stream });
            }
            Message::Byte { id, byte } => {
                if self.active_client() != Some(id) {
                    tracing::trace!(id, byte, "byte from stale connection ignored");
                    return;
                }
                let status = self.rig.on_command(byte);
                self.send_line(&status);
            }
            Message::Disconnected { id } => {
                if self.active_client() == Some(id) {
                    tracing::info!(id, "client disconnected");
                    self.client = None;
                }
            }
        }
    }

    fn send_line(&mut self, line: &str) {
        let Some(client) = self.client.as_mut() else {
            return;
        };
        let res = client
            .stream
            .write_all(line.as_bytes())
            .and_then(|()| client.stream.write_all(b"\n"));
        match res {
            Ok(()) => {}
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                tracing::warn!(id = client.id, "client not reading status; dropping client");
                self.drop_client();
            }
            Err(e) => {
                tracing::warn!(id = client.id, error = %e, "status write failed; dropping client");
                self.drop_client();
            }
        }
    }

    fn drop_client(&mut self) {
        if let Some(old) = self.client.take() {
            let _ = old.stream.shutdown(Shutdown::Both);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{SpyChannel, SpyRig};
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;
    use std::time::Instant;
    use tilt_traits::{ABS_X, ABS_Y};

    fn runner(spy: &SpyRig) -> (Runner<SpyChannel>, xch::Sender<Message>) {
        let rig = Rig::builder()
            .with_channels(spy.channels())
            .with_window(1)
            .try_build()
            .unwrap();
        let (tx, rx) = xch::unbounded();
        (Runner::new(rig, rx, Arc::new(AtomicBool::new(false))), tx)
    }

    fn pair() -> (TcpStream, TcpStream) {
        let l = TcpListener::bind("127.0.0.1:0").unwrap();
        let client = TcpStream::connect(l.local_addr().unwrap()).unwrap();
        let (server, _) = l.accept().unwrap();
        (server, client)
    }

    #[test]
    fn stale_bytes_are_ignored() {
        let spy = SpyRig::default();
        let (mut r, _tx) = runner(&spy);
        let (s1, _c1) = pair();
        let (s2, _c2) = pair();
        r.handle(Message::Connected { id: 1, stream: s1 });
        r.handle(Message::Connected { id: 2, stream: s2 });
        r.handle(Message::Byte { id: 1, byte: b'V' });
        assert_eq!(r.rig().controller().power(), 0);
        r.handle(Message::Byte { id: 2, byte: b'c' });
        assert_eq!(r.rig().controller().power(), 1);
        assert_eq!(r.active_client(), Some(2));
    }

    #[test]
    fn status_line_follows_each_byte() {
        let spy = SpyRig::default();
        let (mut r, _tx) = runner(&spy);
        let (s, c) = pair();
        r.handle(Message::Connected { id: 7, stream: s });
        r.handle(Message::Byte { id: 7, byte: b'v' });
        r.handle(Message::Byte { id: 7, byte: b'?' });
        let mut lines = BufReader::new(c).lines();
        let first = lines.next().unwrap().unwrap();
        let second = lines.next().unwrap().unwrap();
        assert!(first.ends_with("power 5"), "{first}");
        assert_eq!(first, second);
    }

    #[test]
    fn telemetry_goes_to_client_in_verbose_mode() {
        let spy = SpyRig::default();
        let (mut r, _tx) = runner(&spy);
        let (s, c) = pair();
        r.handle(Message::Connected { id: 1, stream: s });
        r.handle(Message::Byte { id: 1, byte: b'I' });
        r.handle(Message::Event(InputEvent::abs(ABS_X, 2)));
        r.handle(Message::Event(InputEvent::abs(ABS_Y, 3)));
        r.handle(Message::Event(InputEvent::sync()));
        let mut lines = BufReader::new(c).lines();
        let _status = lines.next().unwrap().unwrap();
        assert_eq!(
            lines.next().unwrap().unwrap(),
            "sample x=2 y=3 z=0, avg x=2.000 y=3.000"
        );
    }

    #[test]
    fn disconnect_of_stale_id_keeps_active_client() {
        let spy = SpyRig::default();
        let (mut r, _tx) = runner(&spy);
        let (s1, _c1) = pair();
        let (s2, _c2) = pair();
        r.handle(Message::Connected { id: 1, stream: s1 });
        r.handle(Message::Connected { id: 2, stream: s2 });
        r.handle(Message::Disconnected { id: 1 });
        assert_eq!(r.active_client(), Some(2));
        r.handle(Message::Disconnected { id: 2 });
        assert_eq!(r.active_client(), None);
    }

    #[test]
    fn client_that_never_reads_cannot_stall_the_loop() {
        let spy = SpyRig::default();
        let rig = Rig::builder()
            .with_channels(spy.channels())
            .with_window(1)
            .try_build()
            .unwrap();
        let (tx, rx) = xch::unbounded();
        let shutdown = Arc::new(AtomicBool::new(false));
        let mut r = Runner::new(rig, rx, shutdown.clone());
        let (done_tx, done_rx) = xch::bounded(1);
        let worker = std::thread::spawn(move || {
            r.run();
            let _ = done_tx.send(());
        });

        let (s, _silent) = pair();
        tx.send(Message::Connected { id: 1, stream: s }).unwrap();
        tx.send(Message::Byte { id: 1, byte: b'I' }).unwrap();
        // far more telemetry than any socket buffer holds
        for _ in 0..300_000 {
            tx.send(Message::Event(InputEvent::sync())).unwrap();
        }
        let deadline = Instant::now() + Duration::from_secs(10);
        while !tx.is_empty() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(tx.is_empty(), "control loop stopped draining messages");
        shutdown.store(true, Ordering::Relaxed);
        drop(tx);

        done_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("control loop ignored shutdown");
        worker.join().unwrap();
    }

    #[test]
    fn run_returns_when_senders_are_gone() {
        let spy = SpyRig::default();
        let (mut r, tx) = runner(&spy);
        tx.send(Message::Byte { id: 1, byte: b'V' }).unwrap();
        drop(tx);
        r.run();
        // no client was connected, so the byte is stale
        assert_eq!(r.rig().controller().power(), 0);
    }
}

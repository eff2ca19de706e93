//! Command server and control loop over loopback TCP.

use crossbeam_channel as xch;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;
use tilt_core::mocks::{SpyChannel, SpyRig};
use tilt_core::{CommandServer, Rig, Runner};

struct Harness {
    server: Option<CommandServer>,
    shutdown: Arc<AtomicBool>,
    runner: Option<JoinHandle<Runner<SpyChannel>>>,
}

impl Harness {
    fn start(spy: &SpyRig) -> Self {
        let rig = Rig::builder()
            .with_channels(spy.channels())
            .try_build()
            .unwrap();
        let (tx, rx) = xch::unbounded();
        let shutdown = Arc::new(AtomicBool::new(false));
        let server = CommandServer::bind("127.0.0.1:0", tx).unwrap();
        let mut runner = Runner::new(rig, rx, shutdown.clone());
        let handle = std::thread::spawn(move || {
            runner.run();
            runner
        });
        Self {
            server: Some(server),
            shutdown,
            runner: Some(handle),
        }
    }

    fn connect(&self) -> (TcpStream, BufReader<TcpStream>) {
        let addr = self.server.as_ref().unwrap().local_addr();
        let s = TcpStream::connect(addr).unwrap();
        s.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let r = BufReader::new(s.try_clone().unwrap());
        (s, r)
    }

    fn stop(mut self) -> Runner<SpyChannel> {
        self.shutdown.store(true, Ordering::Relaxed);
        drop(self.server.take());
        self.runner.take().unwrap().join().unwrap()
    }
}

fn roundtrip(w: &mut TcpStream, r: &mut BufReader<TcpStream>, byte: u8) -> String {
    w.write_all(&[byte]).unwrap();
    let mut line = String::new();
    r.read_line(&mut line).unwrap();
    line.trim_end().to_string()
}

#[test]
fn every_byte_gets_a_status_line() {
    let spy = SpyRig::default();
    let h = Harness::start(&spy);
    let (mut w, mut r) = h.connect();

    assert!(roundtrip(&mut w, &mut r, b'V').ends_with("power 100"));
    assert_eq!(spy.last_levels(), [Some(72); 4]);
    assert!(roundtrip(&mut w, &mut r, b'x').ends_with("power 99"));
    assert!(roundtrip(&mut w, &mut r, b'#').ends_with("power 99"));
    assert!(roundtrip(&mut w, &mut r, b'>').contains("window 11"));

    let runner = h.stop();
    assert_eq!(runner.rig().controller().power(), 99);
}

#[test]
fn second_connection_replaces_the_first() {
    let spy = SpyRig::default();
    let h = Harness::start(&spy);
    let (mut w1, mut r1) = h.connect();
    assert!(roundtrip(&mut w1, &mut r1, b'c').ends_with("power 1"));

    let (mut w2, mut r2) = h.connect();
    assert!(roundtrip(&mut w2, &mut r2, b'c').ends_with("power 2"));

    // first client is stale now; its bytes must not reach the rig
    let _ = w1.write_all(b"VVV");
    std::thread::sleep(Duration::from_millis(200));
    assert!(roundtrip(&mut w2, &mut r2, b'c').ends_with("power 3"));

    let runner = h.stop();
    assert_eq!(runner.rig().controller().power(), 3);
}

#[test]
fn client_can_reconnect_after_disconnect() {
    let spy = SpyRig::default();
    let h = Harness::start(&spy);
    {
        let (mut w, mut r) = h.connect();
        roundtrip(&mut w, &mut r, b'v');
    }
    let (mut w, mut r) = h.connect();
    assert!(roundtrip(&mut w, &mut r, b'v').ends_with("power 10"));
    h.stop();
}

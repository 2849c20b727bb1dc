//! End-to-end session tests: a scripted client drives a full `RemoteGdb`
//! session over an in-memory transport, against a mock simulator with a
//! 4×u64 little-endian register file.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use remote_gdb::arch::Arch;
use remote_gdb::arch::RegCache;
use remote_gdb::common::Signal;
use remote_gdb::conn::Connection;
use remote_gdb::conn::ConnectionExt;
use remote_gdb::conn::Listener;
use remote_gdb::sim::EventQueue;
use remote_gdb::sim::GdbEvent;
use remote_gdb::sim::ThreadContext;
use remote_gdb::RemoteGdb;

// ------------------------- mock simulator ------------------------- //

#[derive(Default)]
struct Cpu {
    pc: u64,
    regs: [u64; 4],
    mem: BTreeMap<u64, u8>,
    hooks: Vec<u64>,
    step_armed: bool,
}

/// Shared handle to one mock CPU, so tests can inspect state the session
/// owns. The real embedding looks the same: thread contexts are handles into
/// CPU-owned state.
#[derive(Clone, Default)]
struct TestTc(Rc<RefCell<Cpu>>);

impl ThreadContext for TestTc {
    fn read_pc(&self) -> u64 {
        self.0.borrow().pc
    }

    fn write_pc(&mut self, pc: u64) {
        self.0.borrow_mut().pc = pc;
    }

    fn read_mem(&mut self, vaddr: u64, data: &mut [u8]) -> bool {
        let cpu = self.0.borrow();
        for (i, b) in data.iter_mut().enumerate() {
            *b = cpu.mem.get(&(vaddr + i as u64)).copied().unwrap_or(0);
        }
        true
    }

    fn write_mem(&mut self, vaddr: u64, data: &[u8]) -> bool {
        let mut cpu = self.0.borrow_mut();
        for (i, b) in data.iter().enumerate() {
            cpu.mem.insert(vaddr + i as u64, *b);
        }
        true
    }

    fn install_pc_hook(&mut self, addr: u64) -> bool {
        self.0.borrow_mut().hooks.push(addr);
        true
    }

    fn remove_pc_hook(&mut self, addr: u64) -> bool {
        let mut cpu = self.0.borrow_mut();
        match cpu.hooks.iter().position(|a| *a == addr) {
            Some(i) => {
                cpu.hooks.remove(i);
                true
            }
            None => false,
        }
    }

    fn schedule_inst_commit_event(&mut self, _delta: u64) {
        self.0.borrow_mut().step_armed = true;
    }

    fn deschedule_inst_commit_event(&mut self) {
        self.0.borrow_mut().step_armed = false;
    }
}

struct TestRegCache {
    buf: [u8; 32],
}

impl RegCache<TestTc> for TestRegCache {
    fn name(&self) -> &'static str {
        "test-regs"
    }

    fn data(&self) -> &[u8] {
        &self.buf
    }

    fn data_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    fn get_regs(&mut self, tc: &TestTc) {
        let cpu = tc.0.borrow();
        for (i, reg) in cpu.regs.iter().enumerate() {
            self.buf[i * 8..][..8].copy_from_slice(&reg.to_le_bytes());
        }
    }

    fn set_regs(&self, tc: &mut TestTc) {
        let mut cpu = tc.0.borrow_mut();
        for i in 0..4 {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&self.buf[i * 8..][..8]);
            cpu.regs[i] = u64::from_le_bytes(bytes);
        }
    }
}

/// Debugger accesses are valid in [0x1000, 0x9000).
struct TestArch {
    xml: Option<String>,
}

impl Arch for TestArch {
    type Tc = TestTc;

    fn gdb_regs(&self, _tc: &TestTc) -> Box<dyn RegCache<TestTc>> {
        Box::new(TestRegCache { buf: [0; 32] })
    }

    fn acc(&mut self, _tc: &mut TestTc, addr: u64, len: usize) -> bool {
        addr >= 0x1000 && addr + len as u64 <= 0x9000
    }

    fn target_description_xml(&self, annex: &str) -> Option<String> {
        if annex == "target.xml" {
            self.xml.clone()
        } else {
            None
        }
    }
}

// ------------------------- mock transport ------------------------- //

#[derive(Default)]
struct Pipe {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    closed: bool,
}

#[derive(Clone, Default)]
struct TestConn(Rc<RefCell<Pipe>>);

impl TestConn {
    fn push_client(&self, bytes: &[u8]) {
        self.0.borrow_mut().rx.extend(bytes.iter().copied());
    }

    fn take_tx(&self) -> Vec<u8> {
        std::mem::take(&mut self.0.borrow_mut().tx)
    }

    fn close(&self) {
        self.0.borrow_mut().closed = true;
    }
}

#[derive(Debug)]
struct TestConnError;

impl Connection for TestConn {
    type Error = TestConnError;

    fn write(&mut self, byte: u8) -> Result<(), TestConnError> {
        let mut pipe = self.0.borrow_mut();
        if pipe.closed {
            return Err(TestConnError);
        }
        pipe.tx.push(byte);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TestConnError> {
        Ok(())
    }
}

impl ConnectionExt for TestConn {
    fn read(&mut self) -> Result<u8, TestConnError> {
        let mut pipe = self.0.borrow_mut();
        if pipe.closed {
            return Err(TestConnError);
        }
        pipe.rx.pop_front().ok_or(TestConnError)
    }

    fn peek(&mut self) -> Result<Option<u8>, TestConnError> {
        let pipe = self.0.borrow();
        if pipe.closed {
            return Err(TestConnError);
        }
        Ok(pipe.rx.front().copied())
    }
}

#[derive(Default)]
struct TestListener {
    pending: VecDeque<TestConn>,
}

impl Listener for TestListener {
    type Conn = TestConn;

    fn listen(&mut self) -> io::Result<u16> {
        Ok(7000)
    }

    fn accept(&mut self) -> io::Result<TestConn> {
        self.pending
            .pop_front()
            .ok_or_else(|| io::ErrorKind::WouldBlock.into())
    }
}

#[derive(Default)]
struct TestEventQueue(Vec<GdbEvent>);

impl EventQueue for TestEventQueue {
    fn post(&mut self, ev: GdbEvent) {
        self.0.push(ev);
    }
}

// --------------------------- harness ---------------------------- //

fn csum(body: &[u8]) -> u8 {
    body.iter().fold(0u8, |a, b| a.wrapping_add(*b))
}

/// Frame a client command with its checksum.
fn pkt(body: &str) -> Vec<u8> {
    let mut out = format!("${}#", body).into_bytes();
    out.extend_from_slice(format!("{:02x}", csum(body.as_bytes())).as_bytes());
    out
}

fn pkt_s(body: &str) -> String {
    String::from_utf8(pkt(body)).unwrap()
}

/// The reply payloads in a transmit capture, acks stripped.
fn replies(tx: &[u8]) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < tx.len() {
        if tx[i] == b'$' {
            let end = tx[i..].iter().position(|b| *b == b'#').unwrap() + i;
            out.push(tx[i + 1..end].to_vec());
            i = end + 3;
        } else {
            i += 1;
        }
    }
    out
}

fn attach_session(
    script: &[u8],
    ncpus: usize,
    xml: Option<String>,
) -> (RemoteGdb<TestArch, TestListener>, TestConn, Vec<TestTc>) {
    let conn = TestConn::default();
    conn.push_client(script);

    let mut listener = TestListener::default();
    listener.pending.push_back(conn.clone());

    let mut gdb = RemoteGdb::new(TestArch { xml }, listener);
    gdb.listen().unwrap();
    assert_eq!(gdb.port(), 7000);

    let mut tcs = Vec::new();
    for _ in 0..ncpus {
        let tc = TestTc::default();
        tcs.push(tc.clone());
        gdb.add_thread_context(tc);
    }

    (gdb, conn, tcs)
}

// --------------------------- scenarios --------------------------- //

#[test]
fn attach_read_detach() {
    let (mut gdb, conn, _tcs) = attach_session(b"+$?#3f+$g#67+$D#44+", 1, None);
    gdb.connect().unwrap();

    let expected = format!("+$S05#b8+${}#00+$OK#9a", "0".repeat(64));
    assert_eq!(String::from_utf8(conn.take_tx()).unwrap(), expected);
    assert!(!gdb.is_attached());
}

#[test]
fn memory_write_then_read() {
    let script = [
        pkt("M1000,4:deadbeef"),
        b"+".to_vec(),
        pkt("m1000,4"),
        b"+".to_vec(),
        pkt("D"),
        b"+".to_vec(),
    ]
    .concat();
    let (mut gdb, conn, tcs) = attach_session(&script, 1, None);
    gdb.connect().unwrap();

    let tx = String::from_utf8(conn.take_tx()).unwrap();
    assert!(tx.contains("$OK#9a"));
    assert!(tx.contains(&pkt_s("deadbeef")));
    assert_eq!(tcs[0].0.borrow().mem.get(&0x1000), Some(&0xde));
    assert_eq!(tcs[0].0.borrow().mem.get(&0x1003), Some(&0xef));
}

#[test]
fn denied_memory_write_leaves_memory_unchanged() {
    let script = [pkt("M100,4:deadbeef"), b"+".to_vec(), pkt("m100,4"), b"+".to_vec()].concat();
    let (mut gdb, conn, tcs) = attach_session(&script, 1, None);
    gdb.connect().unwrap();

    let tx = String::from_utf8(conn.take_tx()).unwrap();
    // both the write and the read fault; nothing was stored
    assert_eq!(tx.matches(&pkt_s("E01")).count(), 2);
    assert!(tcs[0].0.borrow().mem.is_empty());
}

#[test]
fn breakpoint_and_continue() {
    let script = [pkt("Z0,4000,4"), b"+".to_vec(), pkt("c")].concat();
    let (mut gdb, conn, tcs) = attach_session(&script, 1, None);
    gdb.connect().unwrap();

    // breakpoint armed, simulation resumed
    assert!(gdb.is_attached());
    assert!(!gdb.is_active());
    assert_eq!(tcs[0].0.borrow().hooks, vec![0x4000]);
    conn.take_tx();

    // execution reaches the breakpoint
    tcs[0].0.borrow_mut().pc = 0x4000;
    let mut eq = TestEventQueue::default();
    gdb.trap(&mut eq, 0, Signal::SIGTRAP);
    assert_eq!(
        eq.0,
        vec![GdbEvent::Trap {
            id: 0,
            signal: Signal::SIGTRAP
        }]
    );

    conn.push_client(&[b"+".to_vec(), pkt("z0,4000,4"), b"+".to_vec(), pkt("c")].concat());
    for ev in eq.0.drain(..) {
        gdb.process_event(ev);
    }

    let tx = String::from_utf8(conn.take_tx()).unwrap();
    assert!(tx.starts_with(&pkt_s("T05thread:1;")));
    assert!(tx.contains("$OK#9a"));
    assert_eq!(tcs[0].0.borrow().pc, 0x4000);
    assert!(tcs[0].0.borrow().hooks.is_empty());
    assert!(!gdb.is_active());

    // the program runs to completion and the peer goes away: tolerated
    conn.close();
    let mut eq = TestEventQueue::default();
    gdb.incoming_data(&mut eq);
    assert!(!gdb.is_attached());
}

#[test]
fn ctrl_c_interrupt() {
    let (mut gdb, conn, _tcs) = attach_session(&pkt("c"), 1, None);
    gdb.connect().unwrap();
    assert!(!gdb.is_active());
    conn.take_tx();

    // raw 0x03 arrives while the simulation is running
    conn.push_client(&[0x03]);
    let mut eq = TestEventQueue::default();
    gdb.incoming_data(&mut eq);
    assert_eq!(
        eq.0,
        vec![GdbEvent::Trap {
            id: 0,
            signal: Signal::SIGINT
        }]
    );

    conn.push_client(&[b"+".to_vec(), pkt("D"), b"+".to_vec()].concat());
    for ev in eq.0.drain(..) {
        gdb.process_event(ev);
    }

    let tx = String::from_utf8(conn.take_tx()).unwrap();
    assert!(tx.starts_with(&pkt_s("T02thread:1;")));
    assert!(!gdb.is_attached());
}

#[test]
fn bad_checksum_recovers() {
    let script = [
        b"$?#00".to_vec(), // corrupted checksum
        pkt("?"),          // retransmission
        b"+".to_vec(),
        pkt("D"),
        b"+".to_vec(),
    ]
    .concat();
    let (mut gdb, conn, _tcs) = attach_session(&script, 1, None);
    gdb.connect().unwrap();

    let tx = String::from_utf8(conn.take_tx()).unwrap();
    assert_eq!(tx, "-+$S05#b8+$OK#9a");
}

#[test]
fn nack_causes_retransmission() {
    // the client nacks our stop reply once, then acks the retransmission;
    // the `?` command is never re-executed
    let script = [pkt("?"), b"-".to_vec(), b"+".to_vec(), pkt("D"), b"+".to_vec()].concat();
    let (mut gdb, conn, _tcs) = attach_session(&script, 1, None);
    gdb.connect().unwrap();

    let tx = String::from_utf8(conn.take_tx()).unwrap();
    assert_eq!(tx.matches("$S05#b8").count(), 2);
    assert_eq!(tx.matches("$OK#9a").count(), 1);
}

#[test]
fn qxfer_paging_reassembles_the_document() {
    let xml: String = "abcd".repeat(750); // 3000 bytes, no metacharacters
    let script = [
        pkt("qXfer:features:read:target.xml:0,400"),
        b"+".to_vec(),
        pkt("qXfer:features:read:target.xml:400,400"),
        b"+".to_vec(),
        pkt("qXfer:features:read:target.xml:800,400"),
        b"+".to_vec(),
        pkt("qXfer:features:read:bogus.xml:0,400"),
        b"+".to_vec(),
        pkt("D"),
        b"+".to_vec(),
    ]
    .concat();
    let (mut gdb, conn, _tcs) = attach_session(&script, 1, Some(xml.clone()));
    gdb.connect().unwrap();

    let tx = conn.take_tx();
    let replies = replies(&tx);
    assert_eq!(replies.len(), 5);
    assert_eq!(replies[0][0], b'm');
    assert_eq!(replies[1][0], b'm');
    assert_eq!(replies[2][0], b'l');
    assert_eq!(replies[3], b"E00");

    let mut doc = Vec::new();
    for window in &replies[..3] {
        doc.extend_from_slice(&window[1..]);
    }
    assert_eq!(doc, xml.as_bytes());
}

#[test]
fn qsupported_negotiation() {
    let script = [
        pkt("qSupported:multiprocess+;swbreak+;xmlRegisters=i386"),
        b"+".to_vec(),
        pkt("D"),
        b"+".to_vec(),
    ]
    .concat();
    let (mut gdb, conn, _tcs) =
        attach_session(&script, 1, Some("<target></target>".to_string()));
    gdb.connect().unwrap();

    let tx = String::from_utf8(conn.take_tx()).unwrap();
    assert!(tx.contains(&pkt_s("PacketSize=1000;qXfer:features:read+")));
}

#[test]
fn register_round_trip() {
    let regs: [u64; 4] = [1, 2, 0xdeadbeef, u64::MAX];
    let hex: String = regs
        .iter()
        .flat_map(|r| r.to_le_bytes())
        .map(|b| format!("{:02x}", b))
        .collect();

    let script = [
        pkt(&format!("G{}", hex)),
        b"+".to_vec(),
        pkt("g"),
        b"+".to_vec(),
        pkt("D"),
        b"+".to_vec(),
    ]
    .concat();
    let (mut gdb, conn, tcs) = attach_session(&script, 1, None);
    gdb.connect().unwrap();

    let tx = String::from_utf8(conn.take_tx()).unwrap();
    assert!(tx.contains(&pkt_s(&hex)));
    assert_eq!(tcs[0].0.borrow().regs, regs);
}

#[test]
fn binary_write_with_escapes() {
    // 0x7d must be escaped; a raw 0x03 inside a frame body is just a byte
    let mut body = b"X1000,4:".to_vec();
    body.extend_from_slice(&[b'}', 0x7d ^ 0x20, 0x03, 0xde, 0xad]);
    let mut frame = b"$".to_vec();
    frame.extend_from_slice(&body);
    frame.push(b'#');
    frame.extend_from_slice(format!("{:02x}", csum(&body)).as_bytes());

    let script = [
        frame,
        b"+".to_vec(),
        pkt("m1000,4"),
        b"+".to_vec(),
        pkt("X1000,0:"),
        b"+".to_vec(),
        pkt("D"),
        b"+".to_vec(),
    ]
    .concat();
    let (mut gdb, conn, _tcs) = attach_session(&script, 1, None);
    gdb.connect().unwrap();

    let tx = String::from_utf8(conn.take_tx()).unwrap();
    assert!(tx.contains(&pkt_s("7d03dead")));
    // the zero-length write probe also succeeds
    assert_eq!(tx.matches("$OK#9a").count(), 3);
}

#[test]
fn breakpoint_idempotence() {
    let script = [
        pkt("Z0,4000,4"),
        b"+".to_vec(),
        pkt("Z0,4000,4"),
        b"+".to_vec(),
        pkt("z0,4000,4"),
        b"+".to_vec(),
        pkt("z0,4000,4"),
        b"+".to_vec(),
        pkt("Z0,4000,2"), // bad length for this arch
        b"+".to_vec(),
    ]
    .concat();
    let (mut gdb, conn, tcs) = attach_session(&script, 1, None);
    gdb.connect().unwrap();

    let tx = String::from_utf8(conn.take_tx()).unwrap();
    // set, set (no-op), remove succeed; second remove and bad length fail
    assert_eq!(tx.matches("$OK#9a").count(), 3);
    assert_eq!(tx.matches(&pkt_s("E01")).count(), 2);
    assert!(tcs[0].0.borrow().hooks.is_empty());
}

#[test]
fn hardware_breakpoints_and_watchpoints() {
    let script = [
        pkt("Z1,4000,4"),
        b"+".to_vec(),
        pkt("Z2,2000,8"), // write watchpoint: arbitrary length allowed
        b"+".to_vec(),
        pkt("z1,4000,4"),
        b"+".to_vec(),
        pkt("z2,2000,8"),
        b"+".to_vec(),
        pkt("Z9,4000,4"), // unsupported type
        b"+".to_vec(),
    ]
    .concat();
    let (mut gdb, conn, tcs) = attach_session(&script, 1, None);
    gdb.connect().unwrap();

    let tx = conn.take_tx();
    assert_eq!(replies(&tx), vec![
        b"OK".to_vec(),
        b"OK".to_vec(),
        b"OK".to_vec(),
        b"OK".to_vec(),
        b"".to_vec(),
    ]);
    assert!(tcs[0].0.borrow().hooks.is_empty());
}

#[test]
fn thread_switch_is_visible_in_stop_reply() {
    let script = [pkt("Hg3"), b"+".to_vec(), pkt("c")].concat();
    let (mut gdb, conn, _tcs) = attach_session(&script, 3, None);
    gdb.connect().unwrap();
    conn.take_tx();

    // the trap comes from thread 0, but the client explicitly switched to
    // wire thread 3; the stop reply must report the switch
    let mut eq = TestEventQueue::default();
    gdb.trap(&mut eq, 0, Signal::SIGTRAP);
    conn.push_client(b"+");
    for ev in eq.0.drain(..) {
        gdb.process_event(ev);
    }

    let tx = String::from_utf8(conn.take_tx()).unwrap();
    assert!(tx.starts_with(&pkt_s("T05thread:3;")));
}

#[test]
fn thread_listing_and_current_thread() {
    let script = [
        pkt("qC"),
        b"+".to_vec(),
        pkt("qfThreadInfo"),
        b"+".to_vec(),
        pkt("qsThreadInfo"),
        b"+".to_vec(),
        pkt("qsThreadInfo"),
        b"+".to_vec(),
        pkt("qAttached"),
        b"+".to_vec(),
    ]
    .concat();
    let (mut gdb, conn, _tcs) = attach_session(&script, 2, None);
    gdb.connect().unwrap();

    let tx = conn.take_tx();
    assert_eq!(replies(&tx), vec![
        b"QC1".to_vec(),
        b"m1".to_vec(),
        b"m2".to_vec(),
        b"l".to_vec(),
        b"1".to_vec(),
    ]);
}

#[test]
fn vcont_step_arms_single_step() {
    let script = [
        pkt("vCont?"),
        b"+".to_vec(),
        pkt("vCont;s:1;c"),
    ]
    .concat();
    let (mut gdb, conn, tcs) = attach_session(&script, 1, None);
    gdb.connect().unwrap();

    let tx = String::from_utf8(conn.take_tx()).unwrap();
    assert!(tx.contains(&pkt_s("vCont;c;C;s;S")));
    assert!(!gdb.is_active());
    assert!(tcs[0].0.borrow().step_armed);

    // the instruction commits and the step event fires
    conn.push_client(&[b"+".to_vec(), pkt("D"), b"+".to_vec()].concat());
    gdb.process_event(GdbEvent::SingleStep);

    let tx = String::from_utf8(conn.take_tx()).unwrap();
    assert!(tx.starts_with(&pkt_s("T05thread:1;")));
}

#[test]
fn step_then_continue_disarms() {
    let script = [pkt("s"), b"+".to_vec()].concat();
    let (mut gdb, conn, tcs) = attach_session(&script, 1, None);
    gdb.connect().unwrap();
    assert!(tcs[0].0.borrow().step_armed);
    conn.take_tx();

    // the commit event fires; the client then continues, which must not
    // leave stale step state behind
    conn.push_client(&[b"+".to_vec(), pkt("c")].concat());
    tcs[0].0.borrow_mut().step_armed = false;
    gdb.process_event(GdbEvent::SingleStep);
    assert!(!tcs[0].0.borrow().step_armed);
    assert!(!gdb.is_active());
    assert!(gdb.is_attached());
}

#[test]
fn unknown_command_gets_the_empty_packet() {
    let script = [pkt("qFoo"), b"+".to_vec(), pkt("p12"), b"+".to_vec()].concat();
    let (mut gdb, conn, _tcs) = attach_session(&script, 1, None);
    gdb.connect().unwrap();

    let tx = String::from_utf8(conn.take_tx()).unwrap();
    assert_eq!(tx.matches("$#00").count(), 2);
}

#[test]
fn kill_is_treated_as_detach() {
    let script = [pkt("k"), b"+".to_vec()].concat();
    let (mut gdb, conn, _tcs) = attach_session(&script, 1, None);
    gdb.connect().unwrap();

    let tx = String::from_utf8(conn.take_tx()).unwrap();
    assert!(tx.contains("$OK#9a"));
    assert!(!gdb.is_attached());
}

#[test]
fn detach_clears_breakpoints() {
    let script = [pkt("Z0,4000,4"), b"+".to_vec(), pkt("Z1,5000,4"), b"+".to_vec(), pkt("D"), b"+".to_vec()].concat();
    let (mut gdb, _conn, tcs) = attach_session(&script, 1, None);
    gdb.connect().unwrap();

    assert!(!gdb.is_attached());
    assert!(tcs[0].0.borrow().hooks.is_empty());
}

#[test]
fn traps_coalesce_while_one_is_pending() {
    let (mut gdb, conn, _tcs) = attach_session(&pkt("c"), 1, None);
    gdb.connect().unwrap();
    conn.take_tx();

    let mut eq = TestEventQueue::default();
    gdb.trap(&mut eq, 0, Signal::SIGTRAP);
    gdb.trap(&mut eq, 0, Signal::SIGTRAP);
    assert_eq!(eq.0.len(), 1);
}

#[test]
fn tcp_transport_smoke() {
    use remote_gdb::conn::TcpServer;
    use std::io::Read;
    use std::net::TcpStream;

    let mut gdb = RemoteGdb::new(TestArch { xml: None }, TcpServer::new(0));
    gdb.listen().unwrap();
    gdb.add_thread_context(TestTc::default());
    let port = gdb.port();

    let client = std::thread::spawn(move || {
        let mut sock = TcpStream::connect(("127.0.0.1", port)).unwrap();
        std::io::Write::write_all(&mut sock, b"+$?#3f").unwrap();

        let mut reply = [0u8; 8];
        sock.read_exact(&mut reply).unwrap();
        assert_eq!(&reply, b"+$S05#b8");
        std::io::Write::write_all(&mut sock, b"+").unwrap();

        std::io::Write::write_all(&mut sock, b"$D#44").unwrap();
        let mut reply = [0u8; 7];
        sock.read_exact(&mut reply).unwrap();
        assert_eq!(&reply, b"+$OK#9a");
        std::io::Write::write_all(&mut sock, b"+").unwrap();
    });

    gdb.connect().unwrap();
    client.join().unwrap();
    assert!(!gdb.is_attached());
}

#[test]
fn switching_to_an_unknown_thread_fails() {
    let script = [pkt("Hg9"), b"+".to_vec(), pkt("Hg2"), b"+".to_vec()].concat();
    let (mut gdb, conn, _tcs) = attach_session(&script, 2, None);
    gdb.connect().unwrap();

    let tx = conn.take_tx();
    assert_eq!(replies(&tx), vec![b"E01".to_vec(), b"OK".to_vec()]);
}

//! The debug session: lifecycle, simulator-facing entry points, and the
//! state that outlives individual packets.

mod breakpoints;
mod core_impl;
mod error;
mod threads;

use std::io;

use bitflags::bitflags;
use log::debug;
use log::info;
use log::warn;

use crate::arch::Arch;
use crate::arch::RegCache;
use crate::common::ContextId;
use crate::common::Signal;
use crate::conn::Connection;
use crate::conn::ConnectionExt;
use crate::conn::Listener;
use crate::sim::EventQueue;
use crate::sim::GdbEvent;
use crate::stub::breakpoints::BreakpointTables;
use crate::stub::error::DisconnectReason;
use crate::stub::threads::ThreadRegistry;

/// Largest packet payload this stub accepts or emits, advertised to the
/// client in the `qSupported` reply.
pub const PACKET_BUF_LEN: usize = 4096;

bitflags! {
    #[derive(Debug, Clone, Copy, Default)]
    struct SessionFlags: u8 {
        /// A client connection is established.
        const ATTACHED = 1 << 0;
        /// The target is under debugger control: the simulation was halted
        /// on entry to the command loop and stays halted until a resume
        /// command exits it.
        const ACTIVE = 1 << 1;
        /// An explicit `H` thread switch is pending; the next stop reply
        /// reports the switched-to thread so the client observes it.
        const THREAD_SWITCHING = 1 << 2;
        /// A trap event is sitting on the event queue and further traps are
        /// coalesced into it.
        const TRAP_PENDING = 1 << 3;
    }
}

impl SessionFlags {
    #[inline(always)]
    fn attached(&self) -> bool {
        self.contains(SessionFlags::ATTACHED)
    }

    #[inline(always)]
    fn set_attached(&mut self, val: bool) {
        self.set(SessionFlags::ATTACHED, val)
    }

    #[inline(always)]
    fn active(&self) -> bool {
        self.contains(SessionFlags::ACTIVE)
    }

    #[inline(always)]
    fn set_active(&mut self, val: bool) {
        self.set(SessionFlags::ACTIVE, val)
    }

    #[inline(always)]
    fn thread_switching(&self) -> bool {
        self.contains(SessionFlags::THREAD_SWITCHING)
    }

    #[inline(always)]
    fn set_thread_switching(&mut self, val: bool) {
        self.set(SessionFlags::THREAD_SWITCHING, val)
    }

    #[inline(always)]
    fn trap_pending(&self) -> bool {
        self.contains(SessionFlags::TRAP_PENDING)
    }

    #[inline(always)]
    fn set_trap_pending(&mut self, val: bool) {
        self.set(SessionFlags::TRAP_PENDING, val)
    }
}

/// One debug session: a listening port, at most one connected client, and
/// the set of simulated thread contexts it may inspect.
pub struct RemoteGdb<A: Arch, L: Listener> {
    arch: A,
    listener: L,
    port: u16,
    conn: Option<L::Conn>,

    flags: SessionFlags,
    last_signal: Signal,
    /// Thread the pending single-step is armed on, if any.
    step_armed: Option<ContextId>,

    threads: ThreadRegistry<A::Tc>,
    reg_cache: Option<Box<dyn RegCache<A::Tc>>>,
    breakpoints: BreakpointTables,

    /// Paging cursor for `qfThreadInfo`/`qsThreadInfo`.
    thread_info_idx: usize,

    // reusable scratch buffers for the raw frame and the decoded payload
    raw_buf: Vec<u8>,
    payload_buf: Vec<u8>,
}

impl<A: Arch, L: Listener> RemoteGdb<A, L> {
    pub fn new(arch: A, listener: L) -> RemoteGdb<A, L> {
        RemoteGdb {
            arch,
            listener,
            port: 0,
            conn: None,
            flags: SessionFlags::default(),
            last_signal: Signal::SIGZERO,
            step_armed: None,
            threads: ThreadRegistry::new(),
            reg_cache: None,
            breakpoints: BreakpointTables::new(),
            thread_info_idx: 0,
            raw_buf: Vec::new(),
            payload_buf: Vec::new(),
        }
    }

    /// Bind the listener and announce the port.
    pub fn listen(&mut self) -> io::Result<()> {
        self.port = self.listener.listen()?;
        println!("Listening for remote gdb connection on port {}", self.port);
        Ok(())
    }

    /// The bound port (0 until [`listen`](RemoteGdb::listen) succeeds).
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Accept the pending client and service it.
    ///
    /// Call when the listener's fd polls readable. Blocks in the command
    /// loop — the simulation is halted — until the client resumes execution,
    /// detaches, or drops the connection.
    pub fn connect(&mut self) -> io::Result<()> {
        let conn = self.listener.accept()?;
        self.attach(conn);
        self.process_commands(None);
        Ok(())
    }

    /// Take control of an established connection.
    ///
    /// [`connect`](RemoteGdb::connect) calls this internally; it is public
    /// for embedders with their own accept path. Does not enter the command
    /// loop.
    pub fn attach(&mut self, mut conn: L::Conn) {
        if conn.on_session_start().is_err() {
            warn!("session start hook failed; continuing anyway");
        }
        self.conn = Some(conn);
        self.flags.set_attached(true);
        // A fresh attach halts the target, so `?` reports a trap.
        self.last_signal = Signal::SIGTRAP;
        info!("remote gdb attached");
    }

    /// Tear the connection down and return to listening. Breakpoints are
    /// disarmed, the register cache dropped, and the simulation left free to
    /// run.
    pub fn detach(&mut self) {
        self.teardown(DisconnectReason::Detach);
    }

    pub fn is_attached(&self) -> bool {
        self.flags.attached()
    }

    /// True while the simulation is halted under debugger control.
    pub fn is_active(&self) -> bool {
        self.flags.active()
    }

    /// Register a thread context. The assigned id is what
    /// [`trap`](RemoteGdb::trap) expects when this thread stops.
    pub fn add_thread_context(&mut self, tc: A::Tc) -> ContextId {
        let id = self.threads.add(tc);
        debug!("registered thread context {}", id);
        id
    }

    /// Swap the context registered under `id` (CPU migration). Returns false
    /// if `id` was never registered.
    pub fn replace_thread_context(&mut self, id: ContextId, tc: A::Tc) -> bool {
        let ok = self.threads.replace(id, tc);
        if ok && self.threads.current_id() == Some(id) {
            self.reg_cache = None;
        }
        ok
    }

    /// Make `id` the current thread. Returns false if it is not registered.
    pub fn select_thread_context(&mut self, id: ContextId) -> bool {
        if self.threads.select(id) {
            self.reg_cache = None;
            true
        } else {
            false
        }
    }

    pub fn thread_context(&self, id: ContextId) -> Option<&A::Tc> {
        self.threads.get(id)
    }

    pub fn thread_context_mut(&mut self, id: ContextId) -> Option<&mut A::Tc> {
        self.threads.get_mut(id)
    }

    /// Report that thread `id` stopped with `signal`.
    ///
    /// Called by the simulator when an armed instruction-fetch hook fires
    /// (with [`Signal::SIGTRAP`]); the stub calls it itself for interrupt
    /// requests. The actual stop reply is deferred through the event queue
    /// so it is issued on a well-defined tick; concurrent traps coalesce
    /// into the pending event.
    pub fn trap(&mut self, eq: &mut impl EventQueue, id: ContextId, signal: Signal) {
        if !self.flags.attached() || self.flags.trap_pending() {
            return;
        }
        self.flags.set_trap_pending(true);
        eq.post(GdbEvent::Trap { id, signal });
    }

    /// Service bytes arriving while the simulation is running.
    ///
    /// Call when the data fd polls readable outside the command loop. A raw
    /// 0x03 is an interrupt request; anything else re-enters the command
    /// loop without a stop reply to consume it there.
    pub fn incoming_data(&mut self, eq: &mut impl EventQueue) {
        if !self.flags.attached() || self.flags.active() || self.flags.trap_pending() {
            return;
        }
        let id = match self.threads.current_id() {
            Some(id) => id,
            None => return,
        };
        let conn = match self.conn.as_mut() {
            Some(c) => c,
            None => return,
        };
        match conn.peek() {
            Ok(Some(0x03)) => {
                let _ = conn.read();
                debug!("interrupt request from client");
                self.trap(eq, id, Signal::SIGINT);
            }
            Ok(Some(_)) => self.trap(eq, id, Signal::SIGZERO),
            Ok(None) => {}
            Err(_) => {
                self.clear_single_step();
                self.teardown(DisconnectReason::PeerClosed);
            }
        }
    }

    /// Dispatch an event previously [`post`](EventQueue::post)ed by this
    /// session. Blocks in the command loop if the event halts the target.
    pub fn process_event(&mut self, ev: GdbEvent) {
        match ev {
            GdbEvent::Trap { id, signal } => {
                self.flags.set_trap_pending(false);
                self.handle_trap(id, signal);
            }
            GdbEvent::SingleStep => self.single_step(),
        }
    }

    fn teardown(&mut self, reason: DisconnectReason) {
        self.clear_single_step();
        self.breakpoints.clear(&mut self.threads);
        self.reg_cache = None;
        self.conn = None;
        self.thread_info_idx = 0;
        self.flags = SessionFlags::empty();
        info!("remote gdb detached ({:?})", reason);
    }
}

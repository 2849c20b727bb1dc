//! Contracts to the embedding simulator.
//!
//! The stub never owns a CPU model, an event queue, or a poll loop. It talks
//! to all three through the traits in this module, and the simulator hands
//! control back through [`RemoteGdb::trap`](crate::RemoteGdb::trap) /
//! [`RemoteGdb::process_event`](crate::RemoteGdb::process_event).

use crate::common::ContextId;
use crate::common::Signal;

/// Simulator-side handle to one architectural thread's register file and
/// memory mapping.
///
/// All methods are functional accesses: they must not advance simulated time
/// or perturb timing state. They are only invoked while the simulation is
/// halted under debugger control, or from the simulator itself while the
/// debugger is waiting — never both at once.
pub trait ThreadContext {
    /// Current program counter.
    fn read_pc(&self) -> u64;

    /// Redirect execution to `pc` (used by `c addr` / `s addr` resumes).
    fn write_pc(&mut self, pc: u64);

    /// Functional read of `data.len()` bytes at virtual address `vaddr`.
    ///
    /// Access validity has already been established via
    /// [`Arch::acc`](crate::arch::Arch::acc); returning `false` here reports
    /// the access as faulted anyway.
    fn read_mem(&mut self, vaddr: u64, data: &mut [u8]) -> bool;

    /// Functional write, counterpart to [`read_mem`](ThreadContext::read_mem).
    fn write_mem(&mut self, vaddr: u64, data: &[u8]) -> bool;

    /// Arm an instruction-fetch hook at `addr` on this thread's CPU.
    ///
    /// When the simulated PC reaches `addr`, the simulator must call
    /// [`RemoteGdb::trap`](crate::RemoteGdb::trap) with this thread's id and
    /// [`Signal::SIGTRAP`]. Multiple hooks may be armed at the same address;
    /// each install is matched by exactly one
    /// [`remove_pc_hook`](ThreadContext::remove_pc_hook).
    fn install_pc_hook(&mut self, addr: u64) -> bool;

    /// Disarm one instruction-fetch hook at `addr`.
    fn remove_pc_hook(&mut self, addr: u64) -> bool;

    /// Schedule delivery of [`GdbEvent::SingleStep`] after `delta` further
    /// instructions have committed on this thread.
    fn schedule_inst_commit_event(&mut self, delta: u64);

    /// Cancel a pending instruction-commit event.
    fn deschedule_inst_commit_event(&mut self);
}

/// An event the session has asked the simulator to hand back via
/// [`RemoteGdb::process_event`](crate::RemoteGdb::process_event).
///
/// Hopping through the event queue (rather than re-entering the command loop
/// from an arbitrary CPU callback) guarantees the stop reply is issued on a
/// well-defined simulation tick, deterministically ordered relative to other
/// simulator events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GdbEvent {
    /// A thread stopped (breakpoint hit, interrupt request, or a
    /// signal-less wakeup to service mid-run client traffic).
    Trap { id: ContextId, signal: Signal },
    /// A previously scheduled instruction-commit event fired.
    SingleStep,
}

/// Zero-delay scheduling primitive on the simulator's event queue.
pub trait EventQueue {
    /// Schedule `ev` at the current tick. When the simulator's event loop
    /// dequeues it, it must call
    /// [`RemoteGdb::process_event`](crate::RemoteGdb::process_event) with it.
    fn post(&mut self, ev: GdbEvent);
}

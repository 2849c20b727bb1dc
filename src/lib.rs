//! Target-side implementation of the GDB Remote Serial Protocol for
//! event-driven CPU simulators.
//!
//! This crate lets an external GDB client attach over TCP to one or more
//! simulated thread contexts: inspect and alter architectural state, read and
//! write simulated memory, plant breakpoints, and single-step, while the
//! simulator's event-driven execution is paused or resumed accordingly.
//!
//! The protocol itself is documented at
//! <https://sourceware.org/gdb/current/onlinedocs/gdb/Remote-Protocol.html>.
//!
//! ## Integration model
//!
//! Everything runs on the simulator's main event-loop thread. The embedding
//! simulator provides three things:
//!
//! - an implementation of [`sim::ThreadContext`] for each simulated thread
//!   (PC/memory access, instruction-fetch hooks, instruction-commit events),
//! - an implementation of [`sim::EventQueue`] so the stub can re-enter itself
//!   on a well-defined simulation tick (see [`sim::GdbEvent`]),
//! - an implementation of [`arch::Arch`] describing how register state is
//!   marshalled on the wire for the simulated architecture.
//!
//! The simulator's poll loop then drives the session:
//!
//! - listener fd readable → [`RemoteGdb::connect`] (blocks in the command
//!   loop until the client resumes execution),
//! - data fd readable while the simulation is running →
//!   [`RemoteGdb::incoming_data`],
//! - an armed instruction-fetch hook fires → [`RemoteGdb::trap`],
//! - a posted [`sim::GdbEvent`] is dequeued → [`RemoteGdb::process_event`].
//!
//! While the session sits in its command loop the simulation is halted; a
//! continue or step command returns control to the event loop.

#![forbid(unsafe_code)]

pub mod arch;
pub mod common;
pub mod conn;
pub mod sim;
pub mod stub;

mod protocol;

pub use stub::{RemoteGdb, PACKET_BUF_LEN};

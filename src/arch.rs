//! The architecture-port contract.
//!
//! Each simulated architecture supplies one [`Arch`] implementation: how
//! registers are laid out in `g`/`G` packets, how debugger memory accesses
//! are validated, and what the target description XML looks like.

use crate::sim::ThreadContext;

/// How register values are transmitted on the wire.
///
/// Usually each architecture defines one implementation, but there can be
/// more if there is more than one possible wire format — e.g. ARM ports
/// define both an AArch32 and an AArch64 cache, and which one is live depends
/// on the thread's current execution mode. The session re-creates the cache
/// on thread switches and on every stop, so mode changes are picked up
/// without any notification protocol.
pub trait RegCache<Tc: ThreadContext> {
    /// Name used in log output. Useful because the concrete type backing the
    /// cache can change on the fly.
    fn name(&self) -> &'static str;

    /// The raw byte buffer holding the register values. Each byte is
    /// literally encoded as two hex digits in the `g`/`G` packet, in
    /// architecture wire order.
    fn data(&self) -> &[u8];

    /// Mutable access to the raw buffer, used to apply a `G` packet.
    fn data_mut(&mut self) -> &mut [u8];

    /// Fill the raw buffer from the registers in the thread context.
    fn get_regs(&mut self, tc: &Tc);

    /// Set the thread context's registers from the values in the raw buffer.
    fn set_regs(&self, tc: &mut Tc);
}

/// Architecture-specific half of a debug session.
pub trait Arch {
    /// The thread-context type this port debugs.
    type Tc: ThreadContext;

    /// Return a fresh register cache matching `tc`'s current execution mode.
    fn gdb_regs(&self, tc: &Self::Tc) -> Box<dyn RegCache<Self::Tc>>;

    /// Validity predicate for a debugger access to `[addr, addr + len)`,
    /// typically a page-table walk. A range that fails this check is
    /// reported to the client as a fault and the access is not attempted.
    fn acc(&mut self, tc: &mut Self::Tc, addr: u64, len: usize) -> bool;

    /// Feature strings advertised in the `qSupported` reply, e.g.
    /// `"swbreak+"`. `PacketSize` and `qXfer:features:read+` are appended by
    /// the session itself.
    fn available_features(&self) -> Vec<String> {
        Vec::new()
    }

    /// The target description XML for `annex` (`"target.xml"` at minimum, if
    /// a description is provided at all).
    fn target_description_xml(&self, annex: &str) -> Option<String> {
        let _ = annex;
        None
    }

    /// Whether `len` is a valid breakpoint kind for this architecture.
    /// Defaults to the common fixed 4-byte instruction size.
    fn check_bp_len(&self, len: usize) -> bool {
        len == 4
    }
}

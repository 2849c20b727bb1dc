use std::collections::BTreeMap;

use log::debug;

use crate::common::ContextId;
use crate::sim::ThreadContext;
use crate::stub::threads::ThreadRegistry;

/// A software breakpoint: an instruction-fetch hook armed on the owning
/// thread's CPU. Nothing is patched into simulated memory.
#[derive(Debug)]
struct SoftBreakpoint {
    owner: ContextId,
}

/// A hardware breakpoint or watchpoint.
///
/// Kept as a distinct entry type so a port with real architectural
/// watchpoint resources has somewhere to hang them; the default
/// implementation uses the same fetch-hook mechanism as software
/// breakpoints, which is exact in a simulator.
#[derive(Debug)]
struct HardBreakpoint {
    owner: ContextId,
}

/// The session's breakpoint state, keyed by `(address, length)`.
///
/// Inserting an existing breakpoint is a no-op; removing an absent one
/// fails (the caller replies `E01`). Both tables are cleared wholesale on
/// detach.
pub(crate) struct BreakpointTables {
    soft: BTreeMap<(u64, usize), SoftBreakpoint>,
    hard: BTreeMap<(u64, usize), HardBreakpoint>,
}

impl BreakpointTables {
    pub fn new() -> BreakpointTables {
        BreakpointTables {
            soft: BTreeMap::new(),
            hard: BTreeMap::new(),
        }
    }

    pub fn insert_soft<Tc: ThreadContext>(
        &mut self,
        owner: ContextId,
        tc: &mut Tc,
        addr: u64,
        len: usize,
    ) -> bool {
        if self.soft.contains_key(&(addr, len)) {
            return true;
        }
        if !tc.install_pc_hook(addr) {
            return false;
        }
        debug!("inserted software breakpoint at {:#x}/{}", addr, len);
        self.soft.insert((addr, len), SoftBreakpoint { owner });
        true
    }

    pub fn remove_soft<Tc: ThreadContext>(
        &mut self,
        threads: &mut ThreadRegistry<Tc>,
        addr: u64,
        len: usize,
    ) -> bool {
        match self.soft.remove(&(addr, len)) {
            None => false,
            Some(bp) => {
                if let Some(tc) = threads.get_mut(bp.owner) {
                    tc.remove_pc_hook(addr);
                }
                debug!("removed software breakpoint at {:#x}/{}", addr, len);
                true
            }
        }
    }

    pub fn insert_hard<Tc: ThreadContext>(
        &mut self,
        owner: ContextId,
        tc: &mut Tc,
        addr: u64,
        len: usize,
    ) -> bool {
        if self.hard.contains_key(&(addr, len)) {
            return true;
        }
        if !tc.install_pc_hook(addr) {
            return false;
        }
        debug!("inserted hardware breakpoint at {:#x}/{}", addr, len);
        self.hard.insert((addr, len), HardBreakpoint { owner });
        true
    }

    pub fn remove_hard<Tc: ThreadContext>(
        &mut self,
        threads: &mut ThreadRegistry<Tc>,
        addr: u64,
        len: usize,
    ) -> bool {
        match self.hard.remove(&(addr, len)) {
            None => false,
            Some(bp) => {
                if let Some(tc) = threads.get_mut(bp.owner) {
                    tc.remove_pc_hook(addr);
                }
                debug!("removed hardware breakpoint at {:#x}/{}", addr, len);
                true
            }
        }
    }

    /// Disarm everything. Contexts that have since been removed simply lose
    /// their hooks along with the rest of their CPU state.
    pub fn clear<Tc: ThreadContext>(&mut self, threads: &mut ThreadRegistry<Tc>) {
        for ((addr, _), bp) in std::mem::take(&mut self.soft) {
            if let Some(tc) = threads.get_mut(bp.owner) {
                tc.remove_pc_hook(addr);
            }
        }
        for ((addr, _), bp) in std::mem::take(&mut self.hard) {
            if let Some(tc) = threads.get_mut(bp.owner) {
                tc.remove_pc_hook(addr);
            }
        }
    }
}

use crate::arch::Arch;
use crate::conn::Listener;
use crate::protocol::commands::breakpoint::BasicBreakpoint;
use crate::protocol::commands::ext::Breakpoints;
use crate::stub::core_impl::HandlerStatus;
use crate::stub::error::CmdError;
use crate::stub::RemoteGdb;

impl<A: Arch, L: Listener> RemoteGdb<A, L> {
    pub(crate) fn handle_breakpoints(
        &mut self,
        cmd: Breakpoints,
    ) -> Result<HandlerStatus, CmdError> {
        match cmd {
            Breakpoints::Z(cmd) => self.insert_breakpoint(cmd.0),
            Breakpoints::z(cmd) => self.remove_breakpoint(cmd.0),
        }
    }

    /// `Z0` is a software breakpoint, `Z1` a hardware breakpoint, and
    /// `Z2`–`Z4` are watchpoints routed to the hardware table. The kind
    /// field is validated as a breakpoint length for the instruction
    /// variants only; watchpoint ranges are arbitrary.
    fn insert_breakpoint(&mut self, bp: BasicBreakpoint) -> Result<HandlerStatus, CmdError> {
        let ok = match bp.type_ {
            0 | 1 if !self.arch.check_bp_len(bp.kind) => return Err(CmdError::EREQ),
            0 => {
                let (id, tc) = self
                    .threads
                    .current()
                    .expect("no thread context registered");
                self.breakpoints.insert_soft(id, tc, bp.addr, bp.kind)
            }
            1..=4 => {
                let (id, tc) = self
                    .threads
                    .current()
                    .expect("no thread context registered");
                self.breakpoints.insert_hard(id, tc, bp.addr, bp.kind)
            }
            // not supported: let the client fall back
            _ => return Ok(HandlerStatus::Handled),
        };

        if ok {
            Ok(HandlerStatus::NeedsOk)
        } else {
            Err(CmdError::EREQ)
        }
    }

    fn remove_breakpoint(&mut self, bp: BasicBreakpoint) -> Result<HandlerStatus, CmdError> {
        let ok = match bp.type_ {
            0 => self
                .breakpoints
                .remove_soft(&mut self.threads, bp.addr, bp.kind),
            1..=4 => self
                .breakpoints
                .remove_hard(&mut self.threads, bp.addr, bp.kind),
            _ => return Ok(HandlerStatus::Handled),
        };

        if ok {
            Ok(HandlerStatus::NeedsOk)
        } else {
            Err(CmdError::EREQ)
        }
    }
}

//! The execution-controller half of the session: resume commands on one
//! side, trap/single-step re-entry on the other.

use log::debug;
use log::warn;

use crate::arch::Arch;
use crate::common::ContextId;
use crate::common::Signal;
use crate::conn::Listener;
use crate::protocol::commands::ext::Resume;
use crate::protocol::commands::_vCont::VContKind;
use crate::protocol::common::thread_id::IdKind;
use crate::protocol::response_writer::ResponseWriter;
use crate::sim::ThreadContext;
use crate::stub::core_impl::HandlerStatus;
use crate::stub::error::CmdError;
use crate::stub::RemoteGdb;

impl<A: Arch, L: Listener> RemoteGdb<A, L> {
    pub(crate) fn handle_resume(
        &mut self,
        res: &mut ResponseWriter,
        cmd: Resume<'_>,
    ) -> Result<HandlerStatus, CmdError> {
        let status = match cmd {
            Resume::c(cmd) => {
                self.do_continue(cmd.addr);
                HandlerStatus::Resume
            }
            Resume::s(cmd) => {
                self.do_step(cmd.addr);
                HandlerStatus::Resume
            }
            Resume::vContQuestionMark(_) => {
                res.write_str("vCont;c;C;s;S");
                HandlerStatus::Handled
            }
            Resume::vCont(cmd) => {
                // One execution stream: apply the first action. An explicit
                // thread id selects that thread first, like `Hc`.
                let action = cmd
                    .actions
                    .into_iter()
                    .next()
                    .ok_or(CmdError::EREQ)?
                    .ok_or(CmdError::EREQ)?;
                if let Some(IdKind::WithId(id)) = action.thread {
                    if self.threads.current_id() != Some(id) {
                        if !self.select_thread_context(id) {
                            return Err(CmdError::EREQ);
                        }
                        self.flags.set_thread_switching(true);
                    }
                }
                match action.kind {
                    VContKind::Continue | VContKind::ContinueWithSig(_) => self.do_continue(None),
                    VContKind::Step | VContKind::StepWithSig(_) => self.do_step(None),
                }
                HandlerStatus::Resume
            }
        };
        Ok(status)
    }

    fn do_continue(&mut self, addr: Option<u64>) {
        if let Some(addr) = addr {
            if let Some((_, tc)) = self.threads.current() {
                tc.write_pc(addr);
            }
        }
        self.clear_single_step();
        debug!("continuing simulated execution");
    }

    fn do_step(&mut self, addr: Option<u64>) {
        if let Some(addr) = addr {
            if let Some((_, tc)) = self.threads.current() {
                tc.write_pc(addr);
            }
        }
        self.set_single_step();
        debug!("single stepping");
    }

    /// Arm delivery of a single-step event after one committed instruction
    /// on the current thread.
    pub(crate) fn set_single_step(&mut self) {
        if self.step_armed.is_some() {
            return;
        }
        if let Some((id, tc)) = self.threads.current() {
            tc.schedule_inst_commit_event(1);
            self.step_armed = Some(id);
        }
    }

    /// Cancel a pending single-step, on whichever thread it was armed.
    pub(crate) fn clear_single_step(&mut self) {
        if let Some(id) = self.step_armed.take() {
            if let Some(tc) = self.threads.get_mut(id) {
                tc.deschedule_inst_commit_event();
            }
        }
    }

    /// A scheduled instruction-commit event fired.
    pub(crate) fn single_step(&mut self) {
        self.step_armed = None;
        let id = match self.threads.current_id() {
            Some(id) => id,
            None => return,
        };
        self.handle_trap(id, Signal::SIGTRAP);
    }

    /// The deferred half of [`RemoteGdb::trap`]: halt under debugger
    /// control, report the stop, and service commands until the client
    /// resumes the target.
    pub(crate) fn handle_trap(&mut self, id: ContextId, signal: Signal) {
        if !self.flags.attached() {
            return;
        }
        debug!("trap: thread context {} raised {}", id, signal);

        // An explicit `H` switch since the last resume wins over the
        // trapping thread; the client is told about the thread it asked for.
        if self.flags.thread_switching() {
            self.flags.set_thread_switching(false);
        } else if self.threads.current_id() != Some(id) {
            if !self.select_thread_context(id) {
                warn!("trap for unregistered thread context {}", id);
                return;
            }
        }

        // the thread may have changed execution mode while it ran
        self.reg_cache = None;

        if signal == Signal::SIGZERO {
            // no stop reply, just service whatever traffic woke us
            self.process_commands(None);
        } else {
            self.last_signal = signal;
            self.process_commands(Some(signal));
        }
    }

    /// `T <sig> thread:<wire-id>;` — the stop reply format used after a
    /// resume, so the client always learns which thread stopped.
    pub(crate) fn write_stop_reply(&mut self, res: &mut ResponseWriter, signal: Signal) {
        res.write_str("T");
        res.write_hex(signal.0);
        res.write_str("thread:");
        res.write_thread_id(
            self.threads
                .current_id()
                .expect("no thread context registered"),
        );
        res.write_str(";");
    }
}

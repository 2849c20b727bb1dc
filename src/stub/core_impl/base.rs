use log::debug;

use crate::arch::Arch;
use crate::conn::Listener;
use crate::protocol::commands::ext::Base;
use crate::protocol::common::thread_id::IdKind;
use crate::protocol::response_writer::ResponseWriter;
use crate::sim::ThreadContext;
use crate::stub::core_impl::HandlerStatus;
use crate::stub::error::CmdError;
use crate::stub::error::DisconnectReason;
use crate::stub::RemoteGdb;

impl<A: Arch, L: Listener> RemoteGdb<A, L> {
    pub(crate) fn handle_base(
        &mut self,
        res: &mut ResponseWriter,
        cmd: Base<'_>,
    ) -> Result<HandlerStatus, CmdError> {
        let status = match cmd {
            Base::QuestionMark(_) => {
                res.write_str("S");
                res.write_hex(self.last_signal.0);
                HandlerStatus::Handled
            }

            // ------------------- Register access ------------------- //
            Base::g(_) => {
                let (_, tc) = self
                    .threads
                    .current()
                    .expect("no thread context registered");
                let arch = &self.arch;
                let cache = self.reg_cache.get_or_insert_with(|| {
                    let cache = arch.gdb_regs(tc);
                    debug!("created register cache {}", cache.name());
                    cache
                });
                cache.get_regs(tc);
                res.write_hex_buf(cache.data());
                HandlerStatus::Handled
            }
            Base::G(cmd) => {
                let (_, tc) = self
                    .threads
                    .current()
                    .expect("no thread context registered");
                let arch = &self.arch;
                let cache = self.reg_cache.get_or_insert_with(|| arch.gdb_regs(tc));
                if cmd.vals.len() != cache.data().len() {
                    return Err(CmdError::EREQ);
                }
                cache.data_mut().copy_from_slice(cmd.vals);
                cache.set_regs(tc);
                HandlerStatus::NeedsOk
            }

            // -------------------- Memory access -------------------- //
            Base::m(cmd) => {
                let mut data = vec![0; cmd.len];
                self.read_memory(cmd.addr, &mut data)?;
                res.write_hex_buf(&data);
                HandlerStatus::Handled
            }
            Base::M(cmd) => {
                if cmd.val.len() != cmd.len {
                    return Err(CmdError::EREQ);
                }
                self.write_memory(cmd.addr, cmd.val)?;
                HandlerStatus::NeedsOk
            }
            Base::X(cmd) => {
                if cmd.val.len() != cmd.len {
                    return Err(CmdError::EREQ);
                }
                // `X addr,0:` is the client probing for binary-write support
                if cmd.len > 0 {
                    self.write_memory(cmd.addr, cmd.val)?;
                }
                HandlerStatus::NeedsOk
            }

            // ----------------------- Threads ----------------------- //
            Base::H(cmd) => {
                match cmd.id {
                    IdKind::Any | IdKind::All => {}
                    IdKind::WithId(id) => {
                        if self.threads.current_id() != Some(id) {
                            if !self.select_thread_context(id) {
                                return Err(CmdError::EREQ);
                            }
                            debug!("H{} switched current thread to {}", cmd.kind as char, id);
                            self.flags.set_thread_switching(true);
                        }
                    }
                }
                HandlerStatus::NeedsOk
            }
            Base::qC(_) => {
                res.write_str("QC");
                res.write_thread_id(
                    self.threads
                        .current_id()
                        .expect("no thread context registered"),
                );
                HandlerStatus::Handled
            }
            Base::qfThreadInfo(_) => {
                self.thread_info_idx = 0;
                self.write_thread_info(res);
                HandlerStatus::Handled
            }
            Base::qsThreadInfo(_) => {
                self.write_thread_info(res);
                HandlerStatus::Handled
            }
            Base::qAttached(_) => {
                // always attached to an existing "process"
                res.write_str("1");
                HandlerStatus::Handled
            }

            // ---------------------- Lifecycle ---------------------- //
            Base::D(_) => HandlerStatus::Disconnect(DisconnectReason::Detach),
            Base::k(_) => HandlerStatus::Disconnect(DisconnectReason::Kill),
        };
        Ok(status)
    }

    /// Emit one id per reply; the final reply is the bare `l` terminator and
    /// resets the cursor.
    fn write_thread_info(&mut self, res: &mut ResponseWriter) {
        match self.threads.ids().nth(self.thread_info_idx) {
            Some(id) => {
                self.thread_info_idx += 1;
                res.write_str("m");
                res.write_thread_id(id);
            }
            None => {
                self.thread_info_idx = 0;
                res.write_str("l");
            }
        }
    }

    /// Debugger read of simulated memory: access-checked, all-or-nothing.
    pub(crate) fn read_memory(&mut self, addr: u64, data: &mut [u8]) -> Result<(), CmdError> {
        let (_, tc) = self
            .threads
            .current()
            .expect("no thread context registered");
        if !self.arch.acc(tc, addr, data.len()) {
            return Err(CmdError::EREQ);
        }
        if !tc.read_mem(addr, data) {
            return Err(CmdError::EREQ);
        }
        Ok(())
    }

    /// Debugger write of simulated memory. The access check runs before any
    /// byte is written, so a denied range leaves memory untouched.
    pub(crate) fn write_memory(&mut self, addr: u64, data: &[u8]) -> Result<(), CmdError> {
        let (_, tc) = self
            .threads
            .current()
            .expect("no thread context registered");
        if !self.arch.acc(tc, addr, data.len()) {
            return Err(CmdError::EREQ);
        }
        if !tc.write_mem(addr, data) {
            return Err(CmdError::EREQ);
        }
        Ok(())
    }
}

//! The command loop: receive, ack, dispatch, reply, retransmit.

mod base;
mod breakpoints;
mod resume;
mod target_xml;

use std::mem;

use log::debug;
use log::info;
use log::trace;
use log::warn;

use crate::arch::Arch;
use crate::common::Signal;
use crate::conn::Connection;
use crate::conn::ConnectionExt;
use crate::conn::Listener;
use crate::protocol::commands::Command;
use crate::protocol::packet;
use crate::protocol::packet::PacketBuf;
use crate::protocol::recv_packet;
use crate::protocol::recv_packet::RawPacket;
use crate::protocol::response_writer::ResponseWriter;
use crate::stub::error::CmdError;
use crate::stub::error::DisconnectReason;
use crate::stub::RemoteGdb;

/// What the loop does after a handler returns.
pub(crate) enum HandlerStatus {
    /// Send whatever the handler wrote (the empty packet if nothing) and
    /// keep reading commands.
    Handled,
    /// As `Handled`, with an `OK` appended.
    NeedsOk,
    /// Send no reply and exit the loop: the simulation resumes, and the stop
    /// reply follows whenever the target halts again.
    Resume,
    /// Reply `OK`, then tear the session down.
    Disconnect(DisconnectReason),
}

impl<A: Arch, L: Listener> RemoteGdb<A, L> {
    /// The blocking packet loop. While it runs, the simulation is halted.
    ///
    /// `signal`, if given, is reported as a `T` stop reply before the first
    /// command is read (the resume path: breakpoint, step, interrupt).
    pub(crate) fn process_commands(&mut self, signal: Option<Signal>) {
        self.flags.set_active(true);

        if let Some(signal) = signal {
            let mut res = ResponseWriter::new();
            self.write_stop_reply(&mut res, signal);
            if self.send_packet(res.as_payload()).is_err() {
                self.teardown(DisconnectReason::PeerClosed);
                return;
            }
        }

        loop {
            match self.next_command_status() {
                Ok(None) => continue,
                Ok(Some(HandlerStatus::Handled)) | Ok(Some(HandlerStatus::NeedsOk)) => continue,
                Ok(Some(HandlerStatus::Resume)) => {
                    self.flags.set_active(false);
                    return;
                }
                Ok(Some(HandlerStatus::Disconnect(reason))) => {
                    self.teardown(reason);
                    return;
                }
                Err(_) => {
                    self.teardown(DisconnectReason::PeerClosed);
                    return;
                }
            }
        }
    }

    /// Read and fully service one packet. `Ok(None)` means nothing
    /// dispatchable arrived (stray ack, recoverable framing error, interrupt
    /// byte while already halted). Replies for `Handled`/`NeedsOk`/
    /// `Disconnect` have been sent by the time this returns.
    fn next_command_status(&mut self) -> Result<Option<HandlerStatus>, CmdError> {
        match self.recv_raw_packet()? {
            RawPacket::Frame => {}
            RawPacket::Ack | RawPacket::Nack => return Ok(None),
            RawPacket::Interrupt => {
                debug!("interrupt byte while already halted; ignored");
                return Ok(None);
            }
        }

        // validate and decode; a corrupt frame is nack'd and the client
        // retransmits
        let mut payload = mem::take(&mut self.payload_buf);
        let decoded = packet::frame_body(&self.raw_buf)
            .and_then(|body| packet::decode_body(body, &mut payload));
        match decoded {
            Ok(()) => self.send_byte(b'+')?,
            Err(e) => {
                warn!("bad packet from client: {:?}", e);
                self.payload_buf = payload;
                self.send_byte(b'-')?;
                return Ok(None);
            }
        }

        let mut res = ResponseWriter::new();
        let status = match Command::from_packet(PacketBuf::new(&mut payload)) {
            Some(cmd) => self.handle_command(&mut res, cmd),
            // recognized command, malformed arguments
            None => Err(CmdError::EREQ),
        };
        self.payload_buf = payload;

        let status = match status {
            Ok(status) => status,
            Err(CmdError::Request(code)) => {
                let mut res = ResponseWriter::new();
                res.write_str("E");
                res.write_hex(code);
                self.send_packet(res.as_payload())?;
                return Ok(Some(HandlerStatus::Handled));
            }
            Err(e @ CmdError::PeerClosed) => return Err(e),
        };

        match &status {
            HandlerStatus::Handled => self.send_packet(res.as_payload())?,
            HandlerStatus::NeedsOk | HandlerStatus::Disconnect(_) => {
                res.write_str("OK");
                self.send_packet(res.as_payload())?;
            }
            HandlerStatus::Resume => {}
        }

        Ok(Some(status))
    }

    fn handle_command(
        &mut self,
        res: &mut ResponseWriter,
        cmd: Command<'_>,
    ) -> Result<HandlerStatus, CmdError> {
        match cmd {
            Command::Base(cmd) => self.handle_base(res, cmd),
            Command::Resume(cmd) => self.handle_resume(res, cmd),
            Command::Breakpoints(cmd) => self.handle_breakpoints(cmd),
            Command::TargetXml(cmd) => self.handle_target_xml(res, cmd),
            Command::Unknown(body) => {
                info!(
                    "unknown command {:?}; replying with the empty packet",
                    core::str::from_utf8(body).unwrap_or("<binary>")
                );
                Ok(HandlerStatus::Handled)
            }
        }
    }

    fn recv_raw_packet(&mut self) -> Result<RawPacket, CmdError> {
        let conn = self.conn.as_mut().ok_or(CmdError::PeerClosed)?;
        let mut raw = mem::take(&mut self.raw_buf);
        let out = recv_packet::recv_raw(&mut raw, || conn.read().map_err(drop));
        self.raw_buf = raw;
        out.map_err(|()| CmdError::PeerClosed)
    }

    fn send_byte(&mut self, byte: u8) -> Result<(), CmdError> {
        let conn = self.conn.as_mut().ok_or(CmdError::PeerClosed)?;
        conn.write(byte)
            .and_then(|()| conn.flush())
            .map_err(|_| CmdError::PeerClosed)
    }

    /// Frame a payload and transmit it until the client acks it. Any `-`
    /// restarts the transmission; the packet is identical each time, so
    /// retransmission can never make a command execute twice.
    fn send_packet(&mut self, payload: &[u8]) -> Result<(), CmdError> {
        let frame = packet::encode_frame(payload);
        let conn = self.conn.as_mut().ok_or(CmdError::PeerClosed)?;
        loop {
            conn.write_all(&frame)
                .and_then(|()| conn.flush())
                .map_err(|_| CmdError::PeerClosed)?;
            trace!("--> {}", String::from_utf8_lossy(&frame));

            loop {
                match conn.read() {
                    Ok(b'+') => return Ok(()),
                    Ok(b'-') => {
                        debug!("client nack'd reply; retransmitting");
                        break;
                    }
                    Ok(b) => trace!("ignoring byte {:#04x} while awaiting ack", b),
                    Err(_) => return Err(CmdError::PeerClosed),
                }
            }
        }
    }
}

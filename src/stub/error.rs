/// How a command handler failed.
///
/// Framing errors never get this far: a bad checksum is nack'd and the client
/// retransmits. Everything the handlers can signal is either a per-request
/// error code (reported as `E NN` and the session carries on) or a dead peer
/// (the session detaches cleanly). Invariant violations — a missing thread
/// context where one is required — are simulator corruption and panic
/// instead.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum CmdError {
    /// Reply `E<code>` and keep going.
    Request(u8),
    /// The client went away mid-exchange.
    PeerClosed,
}

impl CmdError {
    /// Generic bad-request/access-fault code.
    pub const EREQ: CmdError = CmdError::Request(0x01);
    /// Unknown qXfer annex.
    pub const EANNEX: CmdError = CmdError::Request(0x00);
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DisconnectReason {
    /// Client sent `D`.
    Detach,
    /// Client sent `k`, which this stub treats as a detach: the simulated
    /// machine is not ours to kill.
    Kill,
    /// Socket EOF or I/O error.
    PeerClosed,
}

use crate::common::ContextId;
use crate::protocol::common::hex::decode_hex;

/// A thread id as it appears on the wire, e.g. in `H` or `vCont` packets.
///
/// Wire ids are 1-based; internal [`ContextId`]s are 0-based. The offset is
/// applied here, and only here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// All threads (-1).
    All,
    /// Any thread (0).
    Any,
    /// A specific thread, already converted to its internal id.
    WithId(ContextId),
}

impl IdKind {
    pub fn from_wire(buf: &[u8]) -> Option<IdKind> {
        match buf {
            b"-1" => Some(IdKind::All),
            _ => match decode_hex::<usize>(buf).ok()? {
                0 => Some(IdKind::Any),
                wire => Some(IdKind::WithId(wire - 1)),
            },
        }
    }
}

/// The 1-based wire rendition of an internal id.
pub fn wire_id(id: ContextId) -> u64 {
    id as u64 + 1
}

use super::prelude::*;

use crate::protocol::common::thread_id::IdKind;

#[derive(PartialEq, Eq, Debug)]
pub struct H {
    /// `'c'` (step/continue operations) or `'g'` (everything else).
    pub kind: u8,
    pub id: IdKind,
}

impl<'a> ParseCommand<'a> for H {
    fn from_packet(buf: PacketBuf<'a>) -> Option<Self> {
        let body = buf.into_body();
        let (kind, id) = body.split_first()?;
        let kind = match kind {
            b'c' | b'g' => *kind,
            _ => return None,
        };
        Some(H {
            kind,
            id: IdKind::from_wire(id)?,
        })
    }
}

use super::prelude::*;

use crate::protocol::common::thread_id::IdKind;

#[derive(Debug)]
pub struct vCont<'a> {
    pub actions: Actions<'a>,
}

impl<'a> ParseCommand<'a> for vCont<'a> {
    fn from_packet(buf: PacketBuf<'a>) -> Option<Self> {
        let body = buf.into_body_str()?;
        Some(vCont {
            actions: Actions(body),
        })
    }
}

/// A lazily evaluated iterator over the actions specified in a vCont packet.
#[derive(Debug)]
pub struct Actions<'a>(&'a str);

impl<'a> Actions<'a> {
    pub fn into_iter(self) -> impl Iterator<Item = Option<VContAction>> + 'a {
        self.0.split(';').skip(1).map(|act| {
            let mut s = act.split(':');
            let kind = s.next()?;
            let thread = match s.next() {
                Some(t) => Some(IdKind::from_wire(t.as_bytes())?),
                None => None,
            };

            Some(VContAction {
                kind: VContKind::from_bytes(kind.as_bytes())?,
                thread,
            })
        })
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct VContAction {
    pub kind: VContKind,
    pub thread: Option<IdKind>,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum VContKind {
    Continue,
    ContinueWithSig(u8),
    Step,
    StepWithSig(u8),
}

impl VContKind {
    fn from_bytes(s: &[u8]) -> Option<VContKind> {
        use self::VContKind::*;

        let res = match s {
            [b'c'] => Continue,
            [b's'] => Step,
            [b'C', sig @ ..] => ContinueWithSig(decode_hex(sig).ok()?),
            [b'S', sig @ ..] => StepWithSig(decode_hex(sig).ok()?),
            _ => return None,
        };

        Some(res)
    }
}

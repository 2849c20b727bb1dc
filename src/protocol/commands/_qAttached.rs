use super::prelude::*;

/// `qAttached` / `qAttached:pid` — the pid form is multiprocess-only and the
/// argument is ignored.
#[derive(PartialEq, Eq, Debug)]
pub struct qAttached;

impl<'a> ParseCommand<'a> for qAttached {
    fn from_packet(buf: PacketBuf<'a>) -> Option<Self> {
        let body = buf.as_body();
        if body.is_empty() || body[0] == b':' {
            return Some(qAttached);
        }
        None
    }
}

use super::prelude::*;

/// `D` / `D;pid`
///
/// The pid form belongs to the multiprocess extensions, which this stub does
/// not speak; a trailing `;pid` is tolerated and ignored.
#[derive(PartialEq, Eq, Debug)]
pub struct D;

impl<'a> ParseCommand<'a> for D {
    fn from_packet(buf: PacketBuf<'a>) -> Option<Self> {
        let body = buf.as_body();
        if body.is_empty() || body[0] == b';' {
            return Some(D);
        }
        None
    }
}

use super::breakpoint::BasicBreakpoint;
use super::prelude::*;

#[derive(PartialEq, Eq, Debug)]
pub struct Z(pub BasicBreakpoint);

impl<'a> ParseCommand<'a> for Z {
    fn from_packet(buf: PacketBuf<'a>) -> Option<Self> {
        Some(Z(BasicBreakpoint::from_slice(buf.into_body())?))
    }
}

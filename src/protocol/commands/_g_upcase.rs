use super::prelude::*;

#[derive(Debug)]
pub struct G<'a> {
    /// Register buffer contents, hex-decoded in place.
    pub vals: &'a [u8],
}

impl<'a> ParseCommand<'a> for G<'a> {
    fn from_packet(buf: PacketBuf<'a>) -> Option<Self> {
        let body = buf.into_body();
        Some(G {
            vals: decode_hex_buf(body).ok()?,
        })
    }
}

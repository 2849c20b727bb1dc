use super::prelude::*;

/// `X addr,len:data` — binary memory write.
///
/// The codec undoes `}`-escapes right after checksum validation, so `val`
/// here is the raw binary payload.
#[derive(Debug)]
pub struct X<'a> {
    pub addr: u64,
    pub len: usize,
    pub val: &'a [u8],
}

impl<'a> ParseCommand<'a> for X<'a> {
    fn from_packet(buf: PacketBuf<'a>) -> Option<Self> {
        let body = buf.into_body();
        // splitn: the third chunk is the unsplit remainder, so ',' or ':'
        // bytes inside the binary data are preserved
        let mut body = body.splitn_mut(3, |b| *b == b',' || *b == b':');
        let addr = decode_hex(body.next()?).ok()?;
        let len = decode_hex(body.next()?).ok()?;
        let val = body.next()?;

        Some(X {
            addr,
            len,
            val,
        })
    }
}

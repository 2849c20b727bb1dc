use super::prelude::*;

/// `qXfer:features:read:<annex>:<offset>,<length>`
#[derive(Debug)]
pub struct qXferFeaturesRead<'a> {
    pub annex: &'a [u8],
    pub offset: usize,
    pub length: usize,
}

impl<'a> ParseCommand<'a> for qXferFeaturesRead<'a> {
    fn from_packet(buf: PacketBuf<'a>) -> Option<Self> {
        let body: &'a [u8] = buf.into_body();
        let mut parts = body.splitn(2, |b| *b == b':');
        let annex = parts.next()?;
        let mut rest = parts.next()?.split(|b| *b == b',');
        let offset = decode_hex(rest.next()?).ok()?;
        let length = decode_hex(rest.next()?).ok()?;

        Some(qXferFeaturesRead {
            annex,
            offset,
            length,
        })
    }
}

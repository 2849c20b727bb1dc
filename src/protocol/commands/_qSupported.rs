use super::prelude::*;

#[derive(Debug)]
pub struct qSupported<'a> {
    pub features: Features<'a>,
}

impl<'a> ParseCommand<'a> for qSupported<'a> {
    fn from_packet(buf: PacketBuf<'a>) -> Option<Self> {
        let body = buf.into_body_str()?;
        let body = body.strip_prefix(':').unwrap_or(body);
        Some(qSupported {
            features: Features(body),
        })
    }
}

/// A lazily evaluated iterator over the features offered by the client.
#[derive(Debug)]
pub struct Features<'a>(&'a str);

impl<'a> Features<'a> {
    pub fn into_iter(self) -> impl Iterator<Item = Option<Feature<'a>>> + 'a {
        self.0.split(';').filter(|s| !s.is_empty()).map(|s| {
            match *s.as_bytes().last()? {
                c @ (b'+' | b'-' | b'?') => Some(Feature {
                    name: &s[..s.len() - 1],
                    val: None,
                    supported: c == b'+',
                }),
                _ => {
                    let mut parts = s.split('=');
                    Some(Feature {
                        name: parts.next()?,
                        val: Some(parts.next()?),
                        supported: true,
                    })
                }
            }
        })
    }
}

#[derive(PartialEq, Eq, Debug)]
pub struct Feature<'a> {
    pub name: &'a str,
    pub val: Option<&'a str>,
    pub supported: bool,
}

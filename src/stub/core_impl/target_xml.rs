use log::debug;

use crate::arch::Arch;
use crate::conn::Listener;
use crate::protocol::commands::ext::TargetXml;
use crate::protocol::response_writer::ResponseWriter;
use crate::stub::core_impl::HandlerStatus;
use crate::stub::error::CmdError;
use crate::stub::RemoteGdb;
use crate::stub::PACKET_BUF_LEN;

impl<A: Arch, L: Listener> RemoteGdb<A, L> {
    pub(crate) fn handle_target_xml(
        &mut self,
        res: &mut ResponseWriter,
        cmd: TargetXml<'_>,
    ) -> Result<HandlerStatus, CmdError> {
        let status = match cmd {
            TargetXml::qSupported(cmd) => {
                // the offers are recorded for the log; this stub's behavior
                // does not depend on any of them
                for feature in cmd.features.into_iter() {
                    match feature {
                        Some(feature) => debug!(
                            "client offers {}{}{}",
                            feature.name,
                            feature.val.map(|v| format!("={}", v)).unwrap_or_default(),
                            if feature.supported { "" } else { " (unsupported)" },
                        ),
                        None => debug!("skipping malformed qSupported entry"),
                    }
                }

                res.write_str("PacketSize=");
                res.write_num(PACKET_BUF_LEN as u64);

                let features = self.arch.available_features();
                for feature in &features {
                    res.write_str(";");
                    res.write_str(feature);
                }
                let already_advertised = features
                    .iter()
                    .any(|f| f.starts_with("qXfer:features:read"));
                if !already_advertised && self.arch.target_description_xml("target.xml").is_some()
                {
                    res.write_str(";qXfer:features:read+");
                }
                HandlerStatus::Handled
            }

            TargetXml::qXferFeaturesRead(cmd) => {
                let annex =
                    core::str::from_utf8(cmd.annex).map_err(|_| CmdError::EANNEX)?;
                let xml = self
                    .arch
                    .target_description_xml(annex)
                    .ok_or(CmdError::EANNEX)?;
                encode_xfer_response(res, xml.as_bytes(), cmd.offset, cmd.length);
                HandlerStatus::Handled
            }
        };
        Ok(status)
    }
}

/// The `m`/`l`-prefixed window of an annex: `l` exactly when the window
/// reaches the end of the document, bare `l` when the offset is past it.
fn encode_xfer_response(res: &mut ResponseWriter, data: &[u8], offset: usize, length: usize) {
    if offset >= data.len() {
        res.write_str("l");
        return;
    }
    let end = data.len().min(offset.saturating_add(length));
    res.write(if end == data.len() { b'l' } else { b'm' });
    res.write_binary(&data[offset..end]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(data: &[u8], offset: usize, length: usize) -> Vec<u8> {
        let mut res = ResponseWriter::new();
        encode_xfer_response(&mut res, data, offset, length);
        res.as_payload().to_vec()
    }

    #[test]
    fn paging_prefixes() {
        let xml = b"<target version=\"1.0\"></target>";
        assert_eq!(window(xml, 0, 16), b"m<target version=".to_vec());
        assert_eq!(window(xml, 16, 1024), {
            let mut v = b"l".to_vec();
            v.extend_from_slice(&xml[16..]);
            v
        });
        assert_eq!(window(xml, xml.len(), 16), b"l".to_vec());
        assert_eq!(window(xml, xml.len() + 10, 16), b"l".to_vec());
    }

    #[test]
    fn window_slices_reassemble() {
        let data: Vec<u8> = (0..=255u8).cycle().take(3000).collect();
        let mut out = Vec::new();
        let mut offset = 0;
        loop {
            let reply = window(&data, offset, 0x400);
            let (prefix, chunk) = reply.split_first().unwrap();
            // the test document contains metacharacters, so undo the escaping
            let mut decoded = Vec::new();
            crate::protocol::packet::decode_body(chunk, &mut decoded).unwrap();
            out.extend_from_slice(&decoded);
            offset += decoded.len();
            if *prefix == b'l' {
                break;
            }
        }
        assert_eq!(out, data);
    }
}

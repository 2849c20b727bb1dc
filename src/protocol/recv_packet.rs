use log::trace;

/// What `recv_raw` pulled off the wire.
pub enum RawPacket {
    /// A complete `$<body>#<hh>` frame is sitting in the buffer, not yet
    /// checksum-validated.
    Frame,
    /// A stray acknowledgement (acks for our own packets are consumed by the
    /// transmit path; one showing up here is client noise).
    Ack,
    Nack,
    /// A raw 0x03 outside any frame: asynchronous interrupt request.
    Interrupt,
}

/// Receive one packet (or control byte) by pulling bytes from a callback,
/// typically backed by a blocking `ConnectionExt::read`.
///
/// Bytes that are neither a frame header nor a control byte are discarded, so
/// a session survives line noise between packets.
pub fn recv_raw<E>(
    buf: &mut Vec<u8>,
    mut get_byte: impl FnMut() -> Result<u8, E>,
) -> Result<RawPacket, E> {
    loop {
        match get_byte()? {
            b'+' => return Ok(RawPacket::Ack),
            b'-' => return Ok(RawPacket::Nack),
            0x03 => return Ok(RawPacket::Interrupt),
            b'$' => break,
            b => trace!("skipping stray byte {:#04x}", b),
        }
    }

    buf.clear();
    buf.push(b'$');

    // read the frame body
    loop {
        let c = get_byte()?;
        buf.push(c);
        if c == b'#' {
            break;
        }
    }

    // read the checksum as well
    buf.push(get_byte()?);
    buf.push(get_byte()?);

    trace!("<-- {}", String::from_utf8_lossy(buf));

    Ok(RawPacket::Frame)
}

use btoi::btou_radix;
use btoi::ParseIntegerError;
use num_traits::CheckedAdd;
use num_traits::CheckedMul;
use num_traits::FromPrimitive;
use num_traits::Zero;

/// Parse a hex integer field out of a packet body: an address, a length, or
/// a wire thread id.
#[inline]
pub fn decode_hex<I>(buf: &[u8]) -> Result<I, ParseIntegerError>
where
    I: FromPrimitive + Zero + CheckedAdd + CheckedMul,
{
    btou_radix(buf, 16)
}

#[derive(Debug, PartialEq, Eq)]
pub enum HexDecodeError {
    OddLength,
    BadDigit,
}

fn nibble(c: u8) -> Result<u8, HexDecodeError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        // a client writes "xx" for a register it has no value for; those
        // bytes land in the register buffer as zeros
        b'x' | b'X' => Ok(0),
        _ => Err(HexDecodeError::BadDigit),
    }
}

/// Decode the hex data of a `G`/`M` payload in place, reusing the front half
/// of the buffer, and return the decoded bytes.
pub fn decode_hex_buf(buf: &mut [u8]) -> Result<&mut [u8], HexDecodeError> {
    if buf.len() % 2 != 0 {
        return Err(HexDecodeError::OddLength);
    }

    let decoded_len = buf.len() / 2;
    for i in 0..decoded_len {
        buf[i] = nibble(buf[i * 2])? << 4 | nibble(buf[i * 2 + 1])?;
    }

    Ok(&mut buf[..decoded_len])
}

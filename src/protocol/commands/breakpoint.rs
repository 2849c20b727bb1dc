use crate::protocol::common::hex::decode_hex;

/// The common `type,addr,kind` form shared by `z` and `Z` packets.
///
/// `kind` is architecture dependent; on this stub it is the breakpoint length
/// in bytes, validated against the port's `check_bp_len`.
#[derive(PartialEq, Eq, Debug)]
pub struct BasicBreakpoint {
    pub type_: u8,
    pub addr: u64,
    pub kind: usize,
}

impl BasicBreakpoint {
    pub fn from_slice(body: &[u8]) -> Option<BasicBreakpoint> {
        let mut body = body.splitn(4, |b| matches!(*b, b',' | b';'));
        let type_ = decode_hex(body.next()?).ok()?;
        let addr = decode_hex(body.next()?).ok()?;
        let kind = decode_hex(body.next()?).ok()?;

        Some(BasicBreakpoint { type_, addr, kind })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn software_breakpoint() {
        assert_eq!(
            BasicBreakpoint::from_slice(b"0,4000,4"),
            Some(BasicBreakpoint {
                type_: 0,
                addr: 0x4000,
                kind: 4
            })
        );
    }

    #[test]
    fn condition_list_ignored() {
        // bytecode conditions are not evaluated, but must not break parsing
        assert_eq!(
            BasicBreakpoint::from_slice(b"1,80000,4;X3,220a01"),
            Some(BasicBreakpoint {
                type_: 1,
                addr: 0x80000,
                kind: 4
            })
        );
    }

    #[test]
    fn malformed() {
        assert_eq!(BasicBreakpoint::from_slice(b"0,4000"), None);
        assert_eq!(BasicBreakpoint::from_slice(b"zz,1,2"), None);
    }
}

//! Wire-level pieces of the remote serial protocol: framing and checksums,
//! escape/run-length decoding, packet reception, command parsing, and reply
//! construction.

pub mod commands;
pub mod common;
pub mod packet;
pub mod recv_packet;
pub mod response_writer;

//! Traits to perform in-order, serial, byte-wise I/O with the debugger.

mod impls;

pub use impls::TcpServer;

use std::io;

/// A trait to perform in-order, serial, byte-wise I/O.
///
/// Implemented for [`TcpStream`](std::net::TcpStream) out of the box.
pub trait Connection {
    /// Transport-specific error type.
    type Error;

    /// Write a single byte.
    fn write(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Write the entire buffer, blocking until complete.
    ///
    /// This method's default implementation calls `self.write()` on each byte
    /// in the buffer. This can be quite inefficient, so if a more efficient
    /// implementation exists (such as calling `write_all()` on an underlying
    /// `std::io::Write` object), this method should be overwritten.
    fn write_all(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        for b in buf {
            self.write(*b)?;
        }
        Ok(())
    }

    /// Flush this Connection, ensuring that all intermediately buffered
    /// contents reach their destination.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Called once when a client attaches, _before_ any packets have been
    /// exchanged.
    ///
    /// This method's default implementation is a no-op.
    ///
    /// The `TcpStream` implementation uses this hook to
    /// [`set_nodelay(true)`](std::net::TcpStream::set_nodelay): the protocol
    /// exchanges many small packets, and forgetting to enable `TCP_NODELAY`
    /// results in a massively degraded debugging experience.
    fn on_session_start(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Extends [`Connection`] with `read` and `peek` methods.
pub trait ConnectionExt: Connection {
    /// Read a single byte, blocking until one is available.
    fn read(&mut self) -> Result<u8, Self::Error>;

    /// Peek a single byte. This MUST be a **non-blocking** operation,
    /// returning `None` if no byte is available.
    ///
    /// Returns a byte (if one is available) without removing it from the
    /// stream. Subsequent calls to `peek` MUST return the same byte.
    fn peek(&mut self) -> Result<Option<u8>, Self::Error>;
}

/// A source of debugger connections, one session at a time.
///
/// The session owns its listener for the whole simulation: it binds once via
/// [`listen`](Listener::listen) and accepts a fresh connection after every
/// detach. The embedder is responsible for watching the listener's fd in its
/// poll loop and calling [`RemoteGdb::connect`](crate::RemoteGdb::connect)
/// when a client is pending.
pub trait Listener {
    /// Connection type produced by [`accept`](Listener::accept).
    type Conn: ConnectionExt;

    /// Bind (if not already bound) and return the bound port.
    fn listen(&mut self) -> io::Result<u16>;

    /// Accept a pending client connection.
    fn accept(&mut self) -> io::Result<Self::Conn>;
}

use std::io;
use std::io::Read;
use std::io::Write;
use std::net::Ipv4Addr;
use std::net::TcpListener;
use std::net::TcpStream;

use log::info;

use crate::conn::Connection;
use crate::conn::ConnectionExt;
use crate::conn::Listener;

/// TCP transport for a debug session.
///
/// Binds on loopback only: the protocol has no authentication or transport
/// security. Passing port 0 lets the OS pick a free port (handy in tests);
/// the bound port is reported by [`listen`](Listener::listen).
pub struct TcpServer {
    port: u16,
    sock: Option<TcpListener>,
}

impl TcpServer {
    pub fn new(port: u16) -> TcpServer {
        TcpServer { port, sock: None }
    }

    /// The underlying listener socket, once bound. Embedders use this to
    /// register the accept fd with their poll loop.
    pub fn socket(&self) -> Option<&TcpListener> {
        self.sock.as_ref()
    }
}

impl Listener for TcpServer {
    type Conn = TcpStream;

    fn listen(&mut self) -> io::Result<u16> {
        if self.sock.is_none() {
            let sock = TcpListener::bind((Ipv4Addr::LOCALHOST, self.port))?;
            self.port = sock.local_addr()?.port();
            self.sock = Some(sock);
        }
        Ok(self.port)
    }

    fn accept(&mut self) -> io::Result<TcpStream> {
        let sock = self
            .sock
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "not listening"))?;
        let (stream, addr) = sock.accept()?;
        info!("remote gdb client connected from {}", addr);
        Ok(stream)
    }
}

impl Connection for TcpStream {
    type Error = io::Error;

    fn write(&mut self, byte: u8) -> io::Result<()> {
        Write::write_all(self, &[byte])
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        Write::write_all(self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(self)
    }

    fn on_session_start(&mut self) -> io::Result<()> {
        // see the `Connection::on_session_start` docs
        self.set_nodelay(true)
    }
}

impl ConnectionExt for TcpStream {
    fn read(&mut self) -> io::Result<u8> {
        let mut buf = [0u8];
        Read::read_exact(self, &mut buf)?;
        Ok(buf[0])
    }

    fn peek(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8];
        self.set_nonblocking(true)?;
        let res = match TcpStream::peek(self, &mut buf) {
            Ok(0) => Err(io::ErrorKind::UnexpectedEof.into()),
            Ok(_) => Ok(Some(buf[0])),
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        };
        self.set_nonblocking(false)?;
        res
    }
}

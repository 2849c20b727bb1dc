mod tcp;

pub use tcp::TcpServer;

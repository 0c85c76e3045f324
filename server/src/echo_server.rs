use futures::StreamExt;
use log::*;
use netchan::{Connection, Frames, PumpConfig, connect, readlines};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, UnixListener};
use tokio_vsock::{VsockAddr, VsockListener};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerTarget {
    Unix(PathBuf),
    Tcp(SocketAddr),
    Vsock { cid: u32, port: u32 },
}

impl ServerTarget {
    /// Parses `tcp ADDR`, `unix PATH` or `vsock CID PORT`.
    pub fn parse(args: &[String]) -> Result<Self, String> {
        match args {
            [] => crate::DEFAULT_TCP_ADDR
                .parse::<SocketAddr>()
                .map(ServerTarget::Tcp)
                .map_err(|e| e.to_string()),
            [kind, addr] if kind == "tcp" => addr
                .parse::<SocketAddr>()
                .map(ServerTarget::Tcp)
                .map_err(|e| format!("bad tcp address {:?}: {}", addr, e)),
            [kind, path] if kind == "unix" => Ok(ServerTarget::Unix(PathBuf::from(path))),
            [kind, cid, port] if kind == "vsock" => {
                let cid = cid.parse::<u32>().map_err(|e| format!("bad vsock cid {:?}: {}", cid, e))?;
                let port = port.parse::<u32>().map_err(|e| format!("bad vsock port {:?}: {}", port, e))?;
                Ok(ServerTarget::Vsock { cid, port })
            }
            _ => Err(format!("unrecognised target {:?}", args)),
        }
    }
}

pub struct EchoServer {
    target: ServerTarget,
}

impl EchoServer {
    pub fn new(target: ServerTarget) -> Self {
        Self { target }
    }

    pub async fn run(&self) -> io::Result<()> {
        match &self.target {
            ServerTarget::Unix(path) => {
                if path.exists() {
                    if let Err(e) = std::fs::remove_file(path) {
                        warn!("Failed to remove stale socket {:?}: {}", path, e);
                    }
                }
                let listener = UnixListener::bind(path)?;
                info!("Server listening on Unix Socket {:?}", path);
                for id in 0u64.. {
                    let (stream, _) = listener.accept().await?;
                    info!("Accepted Unix connection #{}", id);
                    tokio::spawn(Self::handle_connection(stream, format!("unix-{}", id)));
                }
            }
            ServerTarget::Tcp(addr) => {
                let listener = TcpListener::bind(addr).await?;
                info!("Server listening on TCP {:?}", addr);
                loop {
                    let (stream, peer) = listener.accept().await?;
                    info!("Accepted TCP connection from {:?}", peer);
                    tokio::spawn(Self::handle_connection(stream, peer.to_string()));
                }
            }
            ServerTarget::Vsock { cid, port } => {
                let listener = VsockListener::bind(VsockAddr::new(*cid, *port))?;
                info!("Server listening on Vsock CID:{} Port:{}", cid, port);
                loop {
                    let (stream, addr) = listener.accept().await?;
                    info!("Accepted Vsock connection from {:?}", addr);
                    tokio::spawn(Self::handle_connection(stream, format!("{:?}", addr)));
                }
            }
        }
        Ok(())
    }

    /// Echoes every line received on `stream` back to the peer.
    pub async fn handle_connection<T>(stream: T, name: String)
    where
        T: AsyncRead + AsyncWrite + Send + 'static,
    {
        let config = PumpConfig::new()
            .with_name(name)
            .with_debug(log_enabled!(Level::Debug));
        let Connection {
            outbound,
            inbound,
            writer,
            reader,
        } = connect(stream, &config);

        let mut lines = Frames::new(readlines(inbound));
        let mut count = 0usize;
        while let Some(mut line) = lines.next().await {
            info!("[{}] {}", config.name, String::from_utf8_lossy(&line));
            line.push(b'\n');
            if outbound.send(line).await.is_err() {
                warn!("[{}] writer gone, dropping remaining lines", config.name);
                break;
            }
            count += 1;
        }

        drop(outbound);
        if let Err(e) = writer.join().await {
            error!("[{}] write side failed: {}", config.name, e);
        }
        if let Err(e) = reader.join().await {
            error!("[{}] read side failed: {}", config.name, e);
        }
        info!("[{}] connection finished, echoed {} lines", config.name, count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netchan::readline;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_targets() {
        assert_eq!(
            ServerTarget::parse(&args(&[])).unwrap(),
            ServerTarget::Tcp("127.0.0.1:7070".parse().unwrap())
        );
        assert_eq!(
            ServerTarget::parse(&args(&["unix", "/tmp/netchan.sock"])).unwrap(),
            ServerTarget::Unix(PathBuf::from("/tmp/netchan.sock"))
        );
        assert_eq!(
            ServerTarget::parse(&args(&["vsock", "3", "1234"])).unwrap(),
            ServerTarget::Vsock { cid: 3, port: 1234 }
        );
        assert!(ServerTarget::parse(&args(&["tcp", "nonsense"])).is_err());
        assert!(ServerTarget::parse(&args(&["carrier-pigeon"])).is_err());
    }

    #[tokio::test]
    async fn test_unremovable_socket_path_is_reported() {
        let dir = std::env::temp_dir().join(format!("netchan-server-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        // A directory cannot be removed as a stale socket, so bind fails.
        let result = EchoServer::new(ServerTarget::Unix(dir.clone())).run().await;
        assert!(result.is_err());
        assert!(dir.is_dir());

        std::fs::remove_dir(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_handle_connection_echoes_lines() {
        let (near, far) = tokio::io::duplex(64);
        let server = tokio::spawn(EchoServer::handle_connection(far, "test".to_string()));

        let mut conn = connect(near, &PumpConfig::default());
        conn.outbound.send(b"alpha\nbeta\n".to_vec()).await.unwrap();
        assert_eq!(readline(&mut conn.inbound).await, (b"alpha".to_vec(), false));
        assert_eq!(readline(&mut conn.inbound).await, (b"beta".to_vec(), false));

        conn.outbound.send(b"unterminated".to_vec()).await.unwrap();
        drop(conn.outbound);
        assert_eq!(readline(&mut conn.inbound).await, (Vec::new(), true));
        server.await.unwrap();
    }
}

use log::*;
use netchan::{Connection, PumpConfig, connect, readline};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, UnixStream};
use tokio_vsock::{VsockAddr, VsockStream};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientTarget {
    Unix(PathBuf),
    Tcp(SocketAddr),
    Vsock { cid: u32, port: u32 },
}

impl ClientTarget {
    /// Splits `args` into a target (`tcp ADDR`, `unix PATH`, `vsock CID PORT`)
    /// and the lines to send. Without a target keyword the default TCP
    /// address is used and every argument is a line.
    pub fn parse(args: &[String]) -> Result<(Self, &[String]), String> {
        match args.first().map(String::as_str) {
            Some("tcp") => {
                let addr = args.get(1).ok_or("tcp needs an address")?;
                let addr = addr
                    .parse::<SocketAddr>()
                    .map_err(|e| format!("bad tcp address {:?}: {}", addr, e))?;
                Ok((ClientTarget::Tcp(addr), &args[2..]))
            }
            Some("unix") => {
                let path = args.get(1).ok_or("unix needs a path")?;
                Ok((ClientTarget::Unix(PathBuf::from(path)), &args[2..]))
            }
            Some("vsock") => {
                let (Some(cid), Some(port)) = (args.get(1), args.get(2)) else {
                    return Err("vsock needs a cid and a port".to_string());
                };
                let cid = cid.parse::<u32>().map_err(|e| format!("bad vsock cid {:?}: {}", cid, e))?;
                let port = port.parse::<u32>().map_err(|e| format!("bad vsock port {:?}: {}", port, e))?;
                Ok((ClientTarget::Vsock { cid, port }, &args[3..]))
            }
            _ => {
                let addr = crate::DEFAULT_TCP_ADDR
                    .parse::<SocketAddr>()
                    .map_err(|e| format!("{}", e))?;
                Ok((ClientTarget::Tcp(addr), args))
            }
        }
    }
}

pub struct LineClient {
    target: ClientTarget,
}

impl LineClient {
    pub fn new(target: ClientTarget) -> Self {
        Self { target }
    }

    /// Sends each line and waits for its echo. Returns the replies.
    pub async fn send_lines(&self, lines: &[String]) -> io::Result<Vec<String>> {
        info!("Connecting to target: {:?}", self.target);
        match &self.target {
            ClientTarget::Unix(path) => {
                let stream = UnixStream::connect(path).await?;
                info!("Unix socket connected.");
                Ok(Self::process_stream(stream, lines).await)
            }
            ClientTarget::Tcp(addr) => {
                let stream = TcpStream::connect(addr).await?;
                info!("TCP socket connected.");
                Ok(Self::process_stream(stream, lines).await)
            }
            ClientTarget::Vsock { cid, port } => {
                let stream = VsockStream::connect(VsockAddr::new(*cid, *port)).await?;
                info!("Vsock socket connected.");
                Ok(Self::process_stream(stream, lines).await)
            }
        }
    }

    async fn process_stream<T>(stream: T, lines: &[String]) -> Vec<String>
    where
        T: AsyncRead + AsyncWrite + Send + 'static,
    {
        let config = PumpConfig::new()
            .with_name("client")
            .with_debug(log_enabled!(Level::Debug));
        let Connection {
            outbound,
            mut inbound,
            writer,
            reader,
        } = connect(stream, &config);

        let start = Instant::now();
        let mut replies = Vec::with_capacity(lines.len());
        for line in lines {
            let mut block = line.clone().into_bytes();
            block.push(b'\n');
            if outbound.send(block).await.is_err() {
                error!("Writer stopped before all lines were sent");
                break;
            }

            let (reply, eof) = readline(&mut inbound).await;
            if eof {
                warn!("Server closed the connection early");
                break;
            }
            let reply = String::from_utf8_lossy(&reply).into_owned();
            info!("[Client] Received: {}", reply);
            replies.push(reply);
        }
        info!(
            "{} lines round-tripped in {:.2} ms",
            replies.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        // Closing the outbound side lets the server finish and close its end.
        drop(outbound);
        let (_, eof) = readline(&mut inbound).await;
        if !eof {
            warn!("Unexpected data after the last reply");
        }
        if let Err(e) = writer.join().await {
            error!("Write side failed: {}", e);
        }
        if let Err(e) = reader.join().await {
            error!("Read side failed: {}", e);
        }
        replies
    }
}

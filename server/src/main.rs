use log::{error, info};

mod echo_server;

use echo_server::{EchoServer, ServerTarget};

const DEFAULT_TCP_ADDR: &str = "127.0.0.1:7070";

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let target = match ServerTarget::parse(&args) {
        Ok(target) => target,
        Err(e) => {
            error!("{}", e);
            eprintln!("usage: server [tcp ADDR | unix PATH | vsock CID PORT]");
            std::process::exit(2);
        }
    };

    info!("Starting line echo server on {:?}", target);
    if let Err(e) = EchoServer::new(target).run().await {
        error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}

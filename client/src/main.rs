use log::{error, info};

mod line_client;

use line_client::{ClientTarget, LineClient};

const DEFAULT_TCP_ADDR: &str = "127.0.0.1:7070";

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (target, lines) = match ClientTarget::parse(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!("{}", e);
            eprintln!("usage: client [tcp ADDR | unix PATH | vsock CID PORT] [LINE...]");
            std::process::exit(2);
        }
    };
    let lines: Vec<String> = if lines.is_empty() {
        vec!["hello".to_string(), "world".to_string()]
    } else {
        lines.to_vec()
    };

    match LineClient::new(target).send_lines(&lines).await {
        Ok(replies) => info!("Received {} of {} replies", replies.len(), lines.len()),
        Err(e) => {
            error!("Failed to connect: {}", e);
            std::process::exit(1);
        }
    }
}

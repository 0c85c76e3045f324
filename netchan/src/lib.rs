//! # netchan - connections as channels
//!
//! netchan turns a full-duplex byte stream into channels:
//!
//! - **Writer pump**: byte-blocks sent on a channel are written to the
//!   connection whole and in order; dropping the channel closes the connection
//! - **Reader pump**: bytes read from the connection are published one at a
//!   time; the channel closes at end of stream
//! - **EOF classification**: the different ways a socket reports that the
//!   peer went away all end the stream the same way
//! - **Delimiter framing**: split the inbound bytes into lines or any other
//!   single-byte-delimited frames
//!
//! ## Architecture
//!
//! ```text
//!            ┌──────────────┐   Vec<u8>   ┌──────────────┐
//! caller ───►│ outbound tx  ├────────────►│ writer pump  ├───► connection
//!            └──────────────┘             └──────────────┘
//!
//!            ┌──────────────┐     u8      ┌──────────────┐
//! caller ◄───┤ framer       │◄────────────┤ reader pump  │◄─── connection
//!            └──────────────┘             └──────┬───────┘
//!                                                │ is_eof
//! ```
//!
//! Each pump is its own tokio task and ends with a [`PumpHandle`] result. A
//! connection fault fails that pump only.
//!
//! ## Example
//!
//! ```rust,ignore
//! use netchan::{connect, readlines, PumpConfig};
//!
//! let stream = tokio::net::TcpStream::connect("127.0.0.1:7070").await?;
//! let conn = connect(stream, &PumpConfig::default());
//!
//! conn.outbound.send(b"hello\n".to_vec()).await?;
//!
//! let mut lines = readlines(conn.inbound);
//! while let Some(line) = lines.recv().await {
//!     println!("{}", String::from_utf8_lossy(&line));
//! }
//! ```

#![deny(unsafe_code)]

pub mod channel;
pub mod config;
pub mod connection;
pub mod eof;
pub mod error;
pub mod framing;
pub mod observer;

mod io;

pub use channel::{PumpHandle, connection_reader, connection_reader_until, connection_writer};
pub use config::PumpConfig;
pub use connection::{Connection, connect, connect_compat};
pub use eof::is_eof;
pub use error::{Error, ErrorKind, Result};
pub use framing::{Frames, read_delim, read_delims, readline, readlines};
pub use observer::{LogObserver, NoopObserver, Observer};

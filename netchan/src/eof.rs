//! End-of-stream classification.
//!
//! Sockets report "the peer is gone" in several shapes depending on platform
//! and on which layer produced the error. Everything that decides whether an
//! I/O error is a normal end of stream goes through [`is_eof`].

use std::io;

const CLOSED_CONNECTION: &str = "use of closed network connection";
const RESET_BY_PEER: &str = "connection reset by peer";

/// The error a read sees once the connection was closed on this side.
pub(crate) fn closed_connection() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, CLOSED_CONNECTION)
}

/// Returns true if `err` means the stream simply ended.
///
/// A read returning `Ok(0)` is the usual end-of-file signal and never reaches
/// this function. `None` is not EOF.
pub fn is_eof(err: Option<&io::Error>) -> bool {
    let Some(err) = err else {
        return false;
    };

    match err.kind() {
        io::ErrorKind::UnexpectedEof
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::NotConnected => return true,
        _ => {}
    }

    // Errors that only carry the condition as text.
    if let Some(inner) = err.get_ref() {
        let msg = inner.to_string();
        if msg == CLOSED_CONNECTION || msg == RESET_BY_PEER {
            return true;
        }
    }

    err.to_string() == CLOSED_CONNECTION
}

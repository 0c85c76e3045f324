use std::fmt;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Read,
    Write,
    WriteZero,
    Aborted,
}

/// Terminal failure of a pump task.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<io::Error>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Error { kind, source: None }
    }

    pub fn with_source(kind: ErrorKind, source: io::Error) -> Self {
        Error {
            kind,
            source: Some(source),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The underlying I/O error, if the failure came from the connection.
    pub fn io_error(&self) -> Option<&io::Error> {
        self.source.as_ref()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            ErrorKind::Read => "connection read failed",
            ErrorKind::Write => "connection write failed",
            ErrorKind::WriteZero => "connection accepted zero bytes",
            ErrorKind::Aborted => "pump task aborted",
        };
        match &self.source {
            Some(e) => write!(f, "{}: {}", what, e),
            None => write!(f, "{}", what),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        let kind = match err.kind {
            ErrorKind::WriteZero => io::ErrorKind::WriteZero,
            _ => match &err.source {
                Some(e) => e.kind(),
                None => io::ErrorKind::Other,
            },
        };
        io::Error::new(kind, err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_source() {
        let err = Error::with_source(
            ErrorKind::Read,
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "connection read failed: denied");
        assert_eq!(err.kind(), ErrorKind::Read);
    }

    #[test]
    fn test_into_io_error_keeps_kind() {
        let err: io::Error = Error::new(ErrorKind::WriteZero).into();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);

        let err: io::Error = Error::with_source(
            ErrorKind::Write,
            io::Error::from(io::ErrorKind::BrokenPipe),
        )
        .into();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}

//! Mirrors `columndb-server`'s wire framing: one status byte, a 4-byte
//! little-endian payload length, then the payload. Kept as its own small
//! module rather than a shared crate, since client and server are
//! separate boundary processes and the framing is a handful of lines on
//! either side.

use std::io::{self, Read, Write};

/// The status codes a server response can carry. The client only needs
/// to display these, not branch on most of them, so this stays a plain
/// byte-to-name mapping rather than importing the engine crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    OkDone,
    OkWaitForResponse,
    UnknownCommand,
    IncorrectFormat,
    ObjectNotFound,
    InvalidArgument,
    QueryUnsupported,
    ExecutionError,
}

impl StatusCode {
    fn from_wire(byte: u8) -> io::Result<Self> {
        Ok(match byte {
            0 => StatusCode::OkDone,
            1 => StatusCode::OkWaitForResponse,
            2 => StatusCode::UnknownCommand,
            3 => StatusCode::IncorrectFormat,
            4 => StatusCode::ObjectNotFound,
            5 => StatusCode::InvalidArgument,
            6 => StatusCode::QueryUnsupported,
            7 => StatusCode::ExecutionError,
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unknown status byte {other}"),
                ))
            }
        })
    }

    fn to_wire(self) -> u8 {
        match self {
            StatusCode::OkDone => 0,
            StatusCode::OkWaitForResponse => 1,
            StatusCode::UnknownCommand => 2,
            StatusCode::IncorrectFormat => 3,
            StatusCode::ObjectNotFound => 4,
            StatusCode::InvalidArgument => 5,
            StatusCode::QueryUnsupported => 6,
            StatusCode::ExecutionError => 7,
        }
    }

    pub fn is_ok(self) -> bool {
        matches!(self, StatusCode::OkDone | StatusCode::OkWaitForResponse)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            StatusCode::OkDone => "OK_DONE",
            StatusCode::OkWaitForResponse => "OK_WAIT_FOR_RESPONSE",
            StatusCode::UnknownCommand => "UNKNOWN_COMMAND",
            StatusCode::IncorrectFormat => "INCORRECT_FORMAT",
            StatusCode::ObjectNotFound => "OBJECT_NOT_FOUND",
            StatusCode::InvalidArgument => "INVALID_ARGUMENT",
            StatusCode::QueryUnsupported => "QUERY_UNSUPPORTED",
            StatusCode::ExecutionError => "EXECUTION_ERROR",
        };
        f.write_str(text)
    }
}

pub struct Message {
    pub status: StatusCode,
    pub payload: Vec<u8>,
}

impl Message {
    /// A request carries the statement text as its payload; the status
    /// is meaningless on the way in and ignored by the server.
    pub fn request(statement: &str) -> Self {
        Message {
            status: StatusCode::OkWaitForResponse,
            payload: statement.as_bytes().to_vec(),
        }
    }

    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        let mut header = [0u8; 5];
        header[0] = self.status.to_wire();
        header[1..5].copy_from_slice(&(self.payload.len() as u32).to_le_bytes());
        writer.write_all(&header)?;
        writer.write_all(&self.payload)?;
        writer.flush()
    }

    pub fn read_from(reader: &mut impl Read) -> io::Result<Self> {
        let mut header = [0u8; 5];
        reader.read_exact(&mut header)?;
        let status = StatusCode::from_wire(header[0])?;
        let length = u32::from_le_bytes(header[1..5].try_into().unwrap()) as usize;
        let mut payload = vec![0u8; length];
        reader.read_exact(&mut payload)?;
        Ok(Message { status, payload })
    }
}

//! Message framing over the local stream socket: a fixed-size header
//! (status code and payload length) followed by that many bytes of
//! payload. The length prefix is all a receiver needs to know how much
//! to read.

use std::io::{self, Read, Write};

use columndb_engine::error::StatusCode;

/// One byte per [`StatusCode`] variant, in wire order. Kept independent of
/// the enum's declaration order so adding a variant there can never
/// silently renumber an already-deployed wire value.
fn status_to_wire(status: StatusCode) -> u8 {
    match status {
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

fn wire_to_status(byte: u8) -> io::Result<StatusCode> {
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

/// A framed message: a status and an optional payload.
pub struct Message {
    pub status: StatusCode,
    pub payload: Vec<u8>,
}

impl Message {
    pub fn new(status: StatusCode, payload: Vec<u8>) -> Self {
        Message { status, payload }
    }

    pub fn status_only(status: StatusCode) -> Self {
        Message::new(status, Vec::new())
    }

    /// Header is one status byte followed by a 4-byte little-endian
    /// payload length, then the payload itself.
    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        let mut header = [0u8; 5];
        header[0] = status_to_wire(self.status);
        header[1..5].copy_from_slice(&(self.payload.len() as u32).to_le_bytes());
        writer.write_all(&header)?;
        writer.write_all(&self.payload)?;
        writer.flush()
    }

    pub fn read_from(reader: &mut impl Read) -> io::Result<Option<Self>> {
        let mut header = [0u8; 5];
        match read_exact_or_eof(reader, &mut header)? {
            false => return Ok(None),
            true => {}
        }
        let status = wire_to_status(header[0])?;
        let length = u32::from_le_bytes(header[1..5].try_into().unwrap()) as usize;
        let mut payload = vec![0u8; length];
        reader.read_exact(&mut payload)?;
        Ok(Some(Message { status, payload }))
    }
}

/// Like `read_exact`, but treats zero bytes read before any byte arrives
/// as a clean disconnect (`Ok(false)`) rather than an error.
fn read_exact_or_eof(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed mid-header",
                ))
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn a_message_round_trips_through_its_wire_encoding() {
        let message = Message::new(StatusCode::OkDone, b"200,20\n300,30\n".to_vec());
        let mut buf = Vec::new();
        message.write_to(&mut buf).unwrap();

        let mut cursor = Cursor::new(buf);
        let decoded = Message::read_from(&mut cursor).unwrap().unwrap();
        assert_eq!(decoded.status, StatusCode::OkDone);
        assert_eq!(decoded.payload, b"200,20\n300,30\n");
    }

    #[test]
    fn an_empty_payload_round_trips() {
        let message = Message::status_only(StatusCode::InvalidArgument);
        let mut buf = Vec::new();
        message.write_to(&mut buf).unwrap();

        let mut cursor = Cursor::new(buf);
        let decoded = Message::read_from(&mut cursor).unwrap().unwrap();
        assert_eq!(decoded.status, StatusCode::InvalidArgument);
        assert!(decoded.payload.is_empty());
    }

    #[test]
    fn reading_from_a_closed_stream_is_a_clean_disconnect() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        assert!(Message::read_from(&mut cursor).unwrap().is_none());
    }
}

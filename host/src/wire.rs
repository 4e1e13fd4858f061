//! Message framing: a 4-byte unsigned big-endian length prefix followed by
//! that many bytes of bincode payload. The receiver reads exactly the
//! prefixed length before deserializing; partial reads loop until complete
//! or the connection is dead.

use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};

use chesspong_core::{GameConfig, InputFrame, Snapshot};

/// Upper bound on a frame payload. An 8-column snapshot is under 1 KiB, so
/// anything near this cap is a corrupt or hostile stream; the length check
/// runs before the payload buffer is allocated.
pub const MAX_FRAME_LEN: u32 = 64 * 1024;

/// Everything that crosses the wire, tagged so configuration can be told
/// apart from state without peeking at payload bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    /// Match settings, sent once by the server before the first state frame.
    Config(GameConfig),
    /// Authoritative full-state snapshot, server → client, every tick.
    State(Snapshot),
    /// One tick of input flags, client → server, every tick.
    Input(InputFrame),
}

pub fn write_message<W: Write>(writer: &mut W, message: &Message) -> io::Result<()> {
    let payload = bincode::serialize(message)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    if payload.len() > MAX_FRAME_LEN as usize {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame payload of {} bytes exceeds cap", payload.len()),
        ));
    }

    writer.write_all(&(payload.len() as u32).to_be_bytes())?;
    writer.write_all(&payload)?;
    writer.flush()
}

pub fn read_message<R: Read>(reader: &mut R) -> io::Result<Message> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_be_bytes(len_buf);
    if len > MAX_FRAME_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("declared frame length {len} exceeds cap"),
        ));
    }

    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload)?;
    bincode::deserialize(&payload).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn messages_round_trip() {
        let messages = [
            Message::Config(GameConfig::default()),
            Message::Input(InputFrame {
                left: true,
                launch: true,
                ..Default::default()
            }),
        ];

        let mut buf = Vec::new();
        for m in &messages {
            write_message(&mut buf, m).unwrap();
        }

        let mut cursor = Cursor::new(buf);
        for m in &messages {
            assert_eq!(&read_message(&mut cursor).unwrap(), m);
        }
    }

    #[test]
    fn oversized_length_is_rejected_before_allocation() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(MAX_FRAME_LEN + 1).to_be_bytes());
        let err = read_message(&mut Cursor::new(buf)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn truncated_payload_reports_eof() {
        let mut buf = Vec::new();
        write_message(&mut buf, &Message::Input(InputFrame::default())).unwrap();
        buf.truncate(buf.len() - 1);
        let err = read_message(&mut Cursor::new(buf)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn garbage_payload_is_invalid_data() {
        let payload = [0xffu8; 16];
        let mut buf = Vec::new();
        buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        buf.extend_from_slice(&payload);
        let err = read_message(&mut Cursor::new(buf)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}

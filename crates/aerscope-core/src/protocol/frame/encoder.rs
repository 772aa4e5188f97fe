use super::error::FrameError;
use super::layout;

/// Encode one packet: 8-byte header followed by the payload.
///
/// The length field is 16 bits, so payloads over `u16::MAX` bytes are
/// rejected rather than truncated.
///
/// # Examples
/// ```
/// use aerscope_core::encode_packet;
///
/// let bytes = encode_packet(1, 2, &[0xAA])?;
/// assert_eq!(&bytes[..4], b"AERS");
/// assert_eq!(bytes.len(), 9);
/// # Ok::<(), aerscope_core::FrameError>(())
/// ```
pub fn encode_packet(
    version: u8,
    stream_type: u8,
    payload: &[u8],
) -> Result<Vec<u8>, FrameError> {
    if payload.len() > layout::MAX_PAYLOAD_LEN {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: layout::MAX_PAYLOAD_LEN,
        });
    }

    let mut bytes = Vec::with_capacity(layout::HEADER_LEN + payload.len());
    bytes.extend_from_slice(layout::MAGIC);
    bytes.push(version);
    bytes.push(stream_type);
    bytes.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    bytes.extend_from_slice(payload);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::encode_packet;
    use crate::protocol::frame::layout;
    use crate::protocol::frame::parser::FrameBuffer;

    #[test]
    fn encoded_packet_round_trips_through_framer() {
        let bytes = encode_packet(1, layout::STREAM_EVENT_BIN, &[1, 2, 3]).unwrap();

        let mut framer = FrameBuffer::new();
        framer.feed(&bytes);
        let packet = framer.try_read_packet().expect("packet");
        assert_eq!(packet.version, 1);
        assert_eq!(packet.stream_type, layout::STREAM_EVENT_BIN);
        assert_eq!(packet.payload, [1, 2, 3]);
    }

    #[test]
    fn header_fields_are_little_endian() {
        let bytes = encode_packet(2, layout::STREAM_LOG_TEXT, &[0u8; 0x0104]).unwrap();
        assert_eq!(bytes[layout::VERSION_OFFSET], 2);
        assert_eq!(bytes[layout::TYPE_OFFSET], layout::STREAM_LOG_TEXT);
        assert_eq!(&bytes[layout::LENGTH_RANGE], &[0x04, 0x01]);
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let payload = vec![0u8; layout::MAX_PAYLOAD_LEN + 1];
        let err = encode_packet(1, layout::STREAM_RAW_BIN, &payload).unwrap_err();
        assert!(err.to_string().contains("payload too large"));
    }
}

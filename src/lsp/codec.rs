// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::config::consts::DEFAULT_MAX_FRAME_BYTES;
use crate::errors::LspCodecError;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";
const MAX_HEADER_BYTES: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    Header,
    Body(usize),
}

/// `Content-Length` framing for language server messages.
///
/// Headers are matched case-insensitively and everything except
/// `Content-Length` is ignored. Bodies are returned as UTF-8 text; the encoder
/// writes the body's byte length.
#[derive(Debug, Clone)]
pub struct LspCodec {
    max_frame_bytes: usize,
    state: DecodeState,
}

impl Default for LspCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_BYTES)
    }
}

impl LspCodec {
    pub fn new(max_frame_bytes: usize) -> Self {
        Self {
            max_frame_bytes,
            state: DecodeState::Header,
        }
    }

    fn decode_header(&self, src: &mut BytesMut) -> Result<Option<usize>, LspCodecError> {
        let Some(end) = src
            .windows(HEADER_TERMINATOR.len())
            .position(|w| w == HEADER_TERMINATOR)
        else {
            if src.len() > MAX_HEADER_BYTES {
                return Err(LspCodecError::MalformedHeader(format!(
                    "no header terminator within {} bytes",
                    MAX_HEADER_BYTES
                )));
            }
            return Ok(None);
        };

        let header = std::str::from_utf8(&src[..end])
            .map_err(|_| LspCodecError::InvalidHeaderEncoding)?;

        let mut content_length = None;
        for line in header.split("\r\n").filter(|l| !l.is_empty()) {
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| LspCodecError::MalformedHeader(line.to_string()))?;
            if name.trim().eq_ignore_ascii_case("content-length") {
                let value = value.trim();
                let length = value
                    .parse::<usize>()
                    .map_err(|_| LspCodecError::InvalidContentLength(value.to_string()))?;
                content_length = Some(length);
            }
        }

        let length = content_length.ok_or(LspCodecError::MissingContentLength)?;
        if length > self.max_frame_bytes {
            return Err(LspCodecError::FrameTooLarge {
                length,
                max: self.max_frame_bytes,
            });
        }

        src.advance(end + HEADER_TERMINATOR.len());
        Ok(Some(length))
    }
}

impl Decoder for LspCodec {
    type Item = String;
    type Error = LspCodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let length = match self.state {
            DecodeState::Body(length) => length,
            DecodeState::Header => match self.decode_header(src)? {
                Some(length) => {
                    self.state = DecodeState::Body(length);
                    length
                }
                None => return Ok(None),
            },
        };

        if src.len() < length {
            src.reserve(length - src.len());
            return Ok(None);
        }

        let body = src.split_to(length);
        self.state = DecodeState::Header;
        String::from_utf8(body.to_vec())
            .map(Some)
            .map_err(|_| LspCodecError::InvalidBodyEncoding)
    }
}

impl Encoder<String> for LspCodec {
    type Error = LspCodecError;

    fn encode(&mut self, item: String, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let header = format!("Content-Length: {}\r\n\r\n", item.len());
        dst.reserve(header.len() + item.len());
        dst.put_slice(header.as_bytes());
        dst.put_slice(item.as_bytes());
        Ok(())
    }
}

//! Image frames submitted for scoring.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;

use crate::errors::domain::{DomainError, ValidationKind};

pub const DEFAULT_MIME: &str = "image/jpeg";

/// Decoded image bytes plus the MIME type they arrived with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFrame {
    mime: String,
    bytes: Bytes,
}

impl ImageFrame {
    pub fn new(mime: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// Accepts `data:<mime>;base64,<payload>` or bare base64.
    pub fn decode(encoded: &str, max_bytes: usize) -> Result<Self, DomainError> {
        let encoded = encoded.trim();
        let (mime, payload) = match encoded.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest.split_once(',').ok_or_else(|| {
                    invalid("data URL is missing the ',' separator")
                })?;
                let mime = header.strip_suffix(";base64").ok_or_else(|| {
                    invalid("only base64 data URLs are supported")
                })?;
                let mime = if mime.is_empty() { DEFAULT_MIME } else { mime };
                (mime, payload)
            }
            None => (DEFAULT_MIME, encoded),
        };

        if payload.is_empty() {
            return Err(invalid("image payload is empty"));
        }
        // base64 expands 3 bytes into 4 chars
        if payload.len() / 4 * 3 > max_bytes + 3 {
            return Err(invalid(format!("image exceeds {max_bytes} bytes")));
        }

        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| invalid(format!("image is not valid base64: {e}")))?;
        if bytes.is_empty() {
            return Err(invalid("image payload is empty"));
        }
        if bytes.len() > max_bytes {
            return Err(invalid(format!("image exceeds {max_bytes} bytes")));
        }

        Ok(Self::new(mime, bytes))
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

fn invalid(detail: impl Into<String>) -> DomainError {
    DomainError::validation(ValidationKind::InvalidImage, detail)
}

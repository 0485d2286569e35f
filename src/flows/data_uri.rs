use crate::{Error, Result};
use base64::Engine as _;

/// A self-describing `data:<mime>;base64,<payload>` reference.
#[derive(Debug, Clone, PartialEq)]
pub struct DataUri {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl DataUri {
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| Error::validation("data URI must start with 'data:'"))?;

        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::validation("data URI is missing the ',' separator"))?;

        let params = match header.rsplit_once(';') {
            Some((params, encoding)) if encoding.eq_ignore_ascii_case("base64") => params,
            _ => return Err(Error::validation("data URI must use base64 encoding")),
        };

        // Extra parameters such as `;name=photo.png` may sit between the
        // MIME type and `;base64`.
        let mime_type = params.split(';').next().unwrap_or_default().trim();
        match mime_type.split_once('/') {
            Some((kind, subtype)) if !kind.is_empty() && !subtype.is_empty() => {}
            _ => {
                return Err(Error::validation(format!(
                    "data URI has an invalid MIME type: '{mime_type}'"
                )));
            }
        }

        if payload.is_empty() {
            return Err(Error::validation("data URI payload is empty"));
        }

        let data = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| Error::validation(format!("data URI payload is not valid base64: {e}")))?;

        Ok(Self {
            mime_type: mime_type.to_ascii_lowercase(),
            data,
        })
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

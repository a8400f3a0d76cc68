//! The on-disk record envelope.
//!
//! # Responsibilities
//! - Wrap a payload with its arrival time and declared content-type
//! - Encode to / decode from self-delimiting CBOR
//!
//! # Design Decisions
//! - Records are CBOR maps `{"t": int, "d": bytes, "Content-Type": text}`,
//!   built as a `ciborium::Value` tree so the payload is a real CBOR
//!   byte string rather than an array of integers
//! - Records concatenate: a file is decoded by calling
//!   [`Envelope::decode_from`] until end-of-stream
//! - A malformed trailing record (e.g. a crashed mid-write) decodes as
//!   end-of-stream, never as a partial record

use ciborium::Value;
use thiserror::Error;

/// Map key for the arrival timestamp (milliseconds since epoch).
const KEY_WHEN: &str = "t";
/// Map key for the payload bytes.
const KEY_DATA: &str = "d";
/// Map key for the declared content-type.
const KEY_CONTENT_TYPE: &str = "Content-Type";

/// One wrapped ingestion record. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Arrival time in milliseconds since the Unix epoch, captured
    /// after the body was fully read.
    pub when_millis: i64,
    /// The POSTed payload, byte for byte.
    pub payload: Vec<u8>,
    /// The request's declared Content-Type; empty if the header was absent.
    pub content_type: String,
}

/// Error type for envelope encoding and decoding.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("cbor encode: {0}")]
    Encode(#[from] ciborium::ser::Error<std::io::Error>),

    #[error("cbor decode: {0}")]
    Decode(#[from] ciborium::de::Error<std::io::Error>),

    #[error("malformed record: {0}")]
    Malformed(&'static str),
}

impl Envelope {
    /// Build an envelope for an accepted payload.
    pub fn new(when_millis: i64, payload: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            when_millis,
            payload,
            content_type: content_type.into(),
        }
    }

    /// Serialize to CBOR bytes.
    pub fn encode(&self) -> Result<Vec<u8>, EnvelopeError> {
        let value = Value::Map(vec![
            (
                Value::Text(KEY_WHEN.to_string()),
                Value::Integer(self.when_millis.into()),
            ),
            (
                Value::Text(KEY_DATA.to_string()),
                Value::Bytes(self.payload.clone()),
            ),
            (
                Value::Text(KEY_CONTENT_TYPE.to_string()),
                Value::Text(self.content_type.clone()),
            ),
        ]);
        let mut buf = Vec::new();
        ciborium::into_writer(&value, &mut buf)?;
        Ok(buf)
    }

    /// Decode the next record from a reader positioned inside a record
    /// stream. Call repeatedly to walk a concatenated file.
    pub fn decode_from<R: std::io::Read>(reader: R) -> Result<Self, EnvelopeError> {
        let value: Value = ciborium::from_reader(reader)?;
        Self::from_value(value)
    }

    fn from_value(value: Value) -> Result<Self, EnvelopeError> {
        let Value::Map(entries) = value else {
            return Err(EnvelopeError::Malformed("record is not a map"));
        };

        let mut when_millis = None;
        let mut payload = None;
        let mut content_type = None;
        for (key, val) in entries {
            let Value::Text(key) = key else { continue };
            match (key.as_str(), val) {
                (KEY_WHEN, Value::Integer(n)) => {
                    when_millis =
                        Some(i64::try_from(n).map_err(|_| {
                            EnvelopeError::Malformed("timestamp out of i64 range")
                        })?);
                }
                (KEY_DATA, Value::Bytes(b)) => payload = Some(b),
                (KEY_CONTENT_TYPE, Value::Text(t)) => content_type = Some(t),
                _ => {}
            }
        }

        Ok(Self {
            when_millis: when_millis.ok_or(EnvelopeError::Malformed("missing timestamp"))?,
            payload: payload.ok_or(EnvelopeError::Malformed("missing payload"))?,
            content_type: content_type.unwrap_or_default(),
        })
    }

    /// True when a decode error means "no more records", i.e. the reader
    /// was already at end-of-stream or the trailing record is truncated.
    pub fn is_end_of_stream(err: &EnvelopeError) -> bool {
        match err {
            EnvelopeError::Decode(ciborium::de::Error::Io(e)) => {
                e.kind() == std::io::ErrorKind::UnexpectedEof
            }
            EnvelopeError::Decode(_) => true,
            _ => false,
        }
    }
}

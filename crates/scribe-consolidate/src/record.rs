use scribe_types::RawRecord;
use serde_json::Value;

use crate::error::{MalformedReason, MalformedRecordError};

/// Decode one queried row. Every attribute must be a string; an empty string is
/// kept here and judged by the consolidator that cares about the key.
pub fn decode_record(position: usize, value: &Value) -> Result<RawRecord, MalformedRecordError> {
    let Value::Object(map) = value else {
        return Err(MalformedRecordError::new(position, MalformedReason::NotAnObject));
    };
    map.iter()
        .map(|(key, value)| match value {
            Value::String(s) => Ok((key.clone(), s.clone())),
            _ => Err(MalformedRecordError::new(
                position,
                MalformedReason::NonStringValue { key: key.clone() },
            )),
        })
        .collect()
}

pub fn decode_records(values: &[Value]) -> Result<Vec<RawRecord>, MalformedRecordError> {
    values
        .iter()
        .enumerate()
        .map(|(position, value)| decode_record(position, value))
        .collect()
}

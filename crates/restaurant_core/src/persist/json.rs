//! JSON extent documents.
//!
//! Written as `{ "metadata": {...}, "records": [...] }`; a bare top-level
//! array of records is accepted on read.

use super::{ExtentMetadata, PersistResult};
use crate::extent::Entity;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct MetadataField<'a> {
    generated_by: &'a str,
    generated_on: &'a str,
}

#[derive(Serialize)]
struct ExtentEnvelope<'a, T> {
    metadata: MetadataField<'a>,
    records: &'a [T],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExtentDocument<T> {
    Envelope { records: Vec<T> },
    Bare(Vec<T>),
}

pub(super) fn encode<T: Entity>(records: &[T], metadata: &ExtentMetadata) -> PersistResult<String> {
    let envelope = ExtentEnvelope {
        metadata: MetadataField {
            generated_by: &metadata.generated_by,
            generated_on: &metadata.generated_on,
        },
        records,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

pub(super) fn decode<T: Entity>(text: &str) -> PersistResult<Vec<T>> {
    let records = match serde_json::from_str::<ExtentDocument<T>>(text)? {
        ExtentDocument::Envelope { records } | ExtentDocument::Bare(records) => records,
    };
    Ok(records)
}

//! Opaque binary persistence for learned templates.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::features::FeatureSet;
use crate::objects::MultiModalObjectStore;
use crate::util::{LinemodError, LinemodResult};

fn encode<T: Serialize>(value: &T) -> LinemodResult<Vec<u8>> {
    bincode::serialize(value).map_err(|e| LinemodError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> LinemodResult<T> {
    bincode::deserialize(bytes).map_err(|e| LinemodError::Serialization(e.to_string()))
}

/// Serializes a whole template store to an opaque blob.
pub fn to_bytes(store: &MultiModalObjectStore) -> LinemodResult<Vec<u8>> {
    encode(store)
}

/// Restores a template store from [`to_bytes`] output.
pub fn from_bytes(bytes: &[u8]) -> LinemodResult<MultiModalObjectStore> {
    decode(bytes)
}

/// Serializes a single feature set.
pub fn feature_set_to_bytes(set: &FeatureSet) -> LinemodResult<Vec<u8>> {
    encode(set)
}

/// Restores a feature set from [`feature_set_to_bytes`] output.
pub fn feature_set_from_bytes(bytes: &[u8]) -> LinemodResult<FeatureSet> {
    decode(bytes)
}

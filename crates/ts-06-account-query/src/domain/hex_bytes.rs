//! Serde adapters for optional binary fields, written as hex strings or
//! `null`.

/// `Option<Vec<u8>>`
pub mod option {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes present bytes as hex.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => serializer.serialize_str(&hex::encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    /// Reads hex or `null`.
    ///
    /// # Errors
    ///
    /// Fails on invalid hex.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| hex::decode(text).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// `Option<[u8; 32]>`
pub mod option_array {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes a present hash as hex.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &Option<[u8; 32]>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => serializer.serialize_str(&hex::encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    /// Reads 64 hex characters or `null`.
    ///
    /// # Errors
    ///
    /// Fails on invalid hex or a wrong length.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<[u8; 32]>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| {
                let mut out = [0u8; 32];
                hex::decode_to_slice(text, &mut out).map_err(serde::de::Error::custom)?;
                Ok(out)
            })
            .transpose()
    }
}

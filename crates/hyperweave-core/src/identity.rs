//! Identity types shared by every hypergraph element

use crate::config::DigestAlgorithm;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384};

/// Globally unique identifier of an element or relation (fixed-length bytes)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Guid(pub Vec<u8>);

impl Guid {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        Ok(Self(hex::decode(s)?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Guid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Secondary identifier derived at domain inception. Currently shares the GUID
/// representation and, for relations, the GUID value itself.
pub type Suid = Guid;

/// Stable handle to an element slot in a [`crate::Hypergraph`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementKey(pub(crate) usize);

impl ElementKey {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ElementKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immutable identity quadruple plus label and parent link.
///
/// Only `parent` ever changes after construction, and only through the
/// composite operations of the owning graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityRecord {
    timestamp: i64,
    serial: u64,
    guid: Guid,
    suid: Suid,
    label: String,
    parent: Option<ElementKey>,
}

impl IdentityRecord {
    pub fn new(
        timestamp: i64,
        serial: u64,
        guid: Guid,
        suid: Suid,
        label: impl Into<String>,
        parent: Option<ElementKey>,
    ) -> Self {
        Self {
            timestamp,
            serial,
            guid,
            suid,
            label: label.into(),
            parent,
        }
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Position within the enclosing domain (arena insertion, edge association)
    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn guid(&self) -> &Guid {
        &self.guid
    }

    pub fn suid(&self) -> &Suid {
        &self.suid
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn parent(&self) -> Option<ElementKey> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ElementKey>) {
        self.parent = parent;
    }
}

/// Produces fixed-length unique identifiers from a label
pub trait IdentityProvider: Send + Sync {
    fn derive(&self, label: &str) -> Guid;
}

/// Identity provider backed by a SHA-2 digest of the UTF-8 label
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestProvider {
    algorithm: DigestAlgorithm,
}

impl DigestProvider {
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }
}

impl IdentityProvider for DigestProvider {
    fn derive(&self, label: &str) -> Guid {
        let bytes = match self.algorithm {
            DigestAlgorithm::Sha384 => Sha384::digest(label.as_bytes()).to_vec(),
            DigestAlgorithm::Sha256 => Sha256::digest(label.as_bytes()).to_vec(),
        };
        Guid(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_deterministic() {
        let provider = DigestProvider::default();
        let a = provider.derive("E->root");
        let b = provider.derive("E->root");
        assert_eq!(a, b);
        assert_eq!(a.len(), 48);
        assert_ne!(a, provider.derive("E<-root"));
    }

    #[test]
    fn test_sha256_length() {
        let provider = DigestProvider::new(DigestAlgorithm::Sha256);
        assert_eq!(provider.derive("x").len(), 32);
    }

    #[test]
    fn test_guid_hex_roundtrip() {
        let guid = Guid::from_bytes(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(guid.to_string(), "deadbeef");
        assert_eq!(Guid::from_hex("deadbeef").unwrap(), guid);
        assert!(Guid::from_hex("xyz").is_err());
    }

    #[test]
    fn test_parent_is_only_mutable_field() {
        let guid = Guid::from_bytes(vec![1, 2, 3]);
        let mut record = IdentityRecord::new(7, 0, guid.clone(), guid, "V", None);
        assert!(record.parent().is_none());

        record.set_parent(Some(ElementKey(3)));
        assert_eq!(record.parent(), Some(ElementKey(3)));
        assert_eq!(record.label(), "V");
        assert_eq!(record.timestamp(), 7);
    }
}

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Mapping from an owner to the identities whose messages they suppress.
///
/// An owner key is present if and only if their list is non-empty; list order
/// is insertion order and carries no meaning. Identities are opaque strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BlockListRegistry {
    owners: HashMap<String, Vec<String>>,
}

impl BlockListRegistry {
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// The owner's blocked identities, oldest first. Empty slice for an
    /// unknown owner.
    pub fn blocked(&self, owner: &str) -> &[String] {
        self.owners.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_blocked(&self, owner: &str, sender: &str) -> bool {
        self.blocked(owner).iter().any(|id| id == sender)
    }

    /// Appends `target` to the owner's list unless already present.
    /// Returns whether the registry changed.
    pub fn block(&mut self, owner: &str, target: &str) -> bool {
        let list = self.owners.entry(owner.to_owned()).or_default();
        if list.iter().any(|id| id == target) {
            return false;
        }
        list.push(target.to_owned());
        true
    }

    /// Removes `target` from the owner's list, dropping the owner key when
    /// the list empties. Returns whether the target was present.
    pub fn unblock(&mut self, owner: &str, target: &str) -> bool {
        let Some(list) = self.owners.get_mut(owner) else {
            return false;
        };
        let Some(position) = list.iter().position(|id| id == target) else {
            return false;
        };
        list.remove(position);
        if list.is_empty() {
            self.owners.remove(owner);
        }
        true
    }

    /// Drops the owner's entire list. Returns whether one existed.
    pub fn clear(&mut self, owner: &str) -> bool {
        self.owners.remove(owner).is_some()
    }
}

/// A blocked set as found on disk: either the current sequence encoding or
/// the legacy object encoding whose keys are the blocked identities.
#[derive(Deserialize)]
#[serde(untagged)]
enum BlockedEncoding {
    Sequence(Vec<String>),
    Legacy(serde_json::Map<String, serde_json::Value>),
}

impl BlockedEncoding {
    fn into_sequence(self) -> Vec<String> {
        match self {
            BlockedEncoding::Sequence(ids) => ids,
            BlockedEncoding::Legacy(map) => map.into_iter().map(|(id, _)| id).collect(),
        }
    }
}

impl<'de> Deserialize<'de> for BlockListRegistry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RegistryVisitor;

        impl<'de> Visitor<'de> for RegistryVisitor {
            type Value = BlockListRegistry;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from owner to blocked identities")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut owners = HashMap::new();
                while let Some((owner, encoding)) =
                    access.next_entry::<String, BlockedEncoding>()?
                {
                    let blocked = encoding.into_sequence();
                    // empty lists never survive into memory
                    if !blocked.is_empty() {
                        owners.insert(owner, blocked);
                    }
                }
                Ok(BlockListRegistry { owners })
            }
        }

        deserializer.deserialize_map(RegistryVisitor)
    }
}

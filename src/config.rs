use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::store::JsonFileBlockListStore;

/// Where the ignore registry lives on disk.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnoreConfig {
    pub ignores_path: PathBuf,
}

impl IgnoreConfig {
    /// The conventional location: `ignores.json` next to the capability's
    /// installation root.
    pub fn at_install_root(root: impl AsRef<Path>) -> Self {
        Self {
            ignores_path: root.as_ref().join("ignores.json"),
        }
    }

    pub fn load<R: std::io::Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn into_store(self) -> JsonFileBlockListStore {
        JsonFileBlockListStore::new(self.ignores_path)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn loads_from_json() {
        let config =
            IgnoreConfig::load(r#"{"ignoresPath": "/srv/chat/ignores.json"}"#.as_bytes())
                .expect("config parses");
        assert_eq!(config.ignores_path, PathBuf::from("/srv/chat/ignores.json"));
    }

    #[test]
    fn install_root_convention() {
        let config = IgnoreConfig::at_install_root("/srv/chat");
        assert_eq!(config.ignores_path, PathBuf::from("/srv/chat/ignores.json"));
    }
}

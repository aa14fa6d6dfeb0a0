//! Where the lesson catalog lives.

use serde::{Deserialize, Serialize};

fn default_root() -> String {
    "lessons".to_string()
}

fn default_fixtures_dir() -> String {
    "fixtures".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Catalog root, relative to the project root unless absolute.
    #[serde(default = "default_root")]
    pub root: String,

    /// Fixture directory name inside the catalog root. Never scanned for units.
    #[serde(default = "default_fixtures_dir")]
    pub fixtures_dir: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            fixtures_dir: default_fixtures_dir(),
        }
    }
}

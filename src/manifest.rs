//! Pre-cache asset manifest.
//!
//! The manifest ships inside the binary (`assets.json`) and holds two ordered
//! lists: `mandatory` assets must all be cached for an install to succeed,
//! `optional` assets are cached on a best-effort basis.

use once_cell::sync::Lazy;
use serde::Deserialize;

static EMBEDDED_JSON: &str = include_str!("assets.json");

/// Manifest compiled into the worker.
pub static MANIFEST: Lazy<AssetManifest> =
    Lazy::new(|| AssetManifest::from_json(EMBEDDED_JSON).unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AssetManifest {
    pub mandatory: Vec<String>,
    #[serde(default)]
    pub optional: Vec<String>,
}

impl AssetManifest {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

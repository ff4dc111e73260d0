use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    sections: HashMap<String, String>,
    pages: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Stored section descriptors (`fixtures/sections/*.json`).
pub mod sections {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.sections.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn json(name: &str) -> Result<String> {
        read_to_string(lookup(&MANIFEST.sections, "section", name)?)
    }
}

/// Page layouts: viewport, scroll extent, section order and measured boxes.
pub mod pages {
    use super::*;

    #[derive(Clone, Debug, Deserialize)]
    pub struct PageBox {
        pub top: f32,
        pub height: f32,
    }

    #[derive(Clone, Debug, Deserialize)]
    pub struct PageLayout {
        pub viewport_height: f32,
        pub max_scroll: f32,
        /// Section fixture names in mount order.
        pub sections: Vec<String>,
        /// Measured boxes keyed by section target.
        pub layout: HashMap<String, PageBox>,
    }

    impl PageLayout {
        pub fn section_json(&self) -> Result<Vec<String>> {
            self.sections.iter().map(|s| super::sections::json(s)).collect()
        }
    }

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.pages.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn load(name: &str) -> Result<PageLayout> {
        super::load_json(lookup(&MANIFEST.pages, "page", name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_manifest_entry_reads() {
        for key in sections::keys() {
            sections::json(&key).unwrap();
        }
        assert_eq!(pages::keys(), vec!["home".to_string()]);
        for key in pages::keys() {
            let page = pages::load(&key).unwrap();
            assert_eq!(page.section_json().unwrap().len(), page.sections.len());
        }
    }

    #[test]
    fn unknown_names_error() {
        assert!(sections::json("missing").is_err());
        assert!(pages::load("missing").is_err());
    }
}

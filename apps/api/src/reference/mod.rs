//! Reference data: the three read-only YAML tables (ad limits, asset specs,
//! taxonomies) behind a TTL read-through cache.
//!
//! Nothing outside this module touches the cache; reloads go through
//! `ReferenceStore::clear_cache`.

pub mod cache;
pub mod handlers;
pub mod resolver;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::limits::{AssetSpec, ChannelLimitSet, FieldLimit, Taxonomies};
use crate::reference::cache::TtlCache;
use crate::reference::resolver::{resolve_limit_set, specs_for_channel};

pub const AD_LIMITS_FILE: &str = "ad_limits.yaml";
pub const ASSET_SPECS_FILE: &str = "asset_specs.yaml";
pub const TAXONOMIES_FILE: &str = "taxonomies.yaml";

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Loads and caches the reference tables from `data_dir`.
#[derive(Clone)]
pub struct ReferenceStore {
    data_dir: PathBuf,
    cache: Arc<TtlCache<Arc<serde_yaml::Value>>>,
}

impl ReferenceStore {
    pub fn new(data_dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            data_dir: data_dir.into(),
            cache: Arc::new(TtlCache::new(ttl)),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn load_document(&self, file: &str) -> Result<Arc<serde_yaml::Value>, ReferenceError> {
        let key = format!("yaml:{file}");
        self.cache.get_or_try_insert_with(&key, || {
            let path = self.data_dir.join(file);
            info!("Loading YAML from {}", path.display());

            let text = std::fs::read_to_string(&path).map_err(|source| ReferenceError::Io {
                path: path.clone(),
                source,
            })?;
            let document = serde_yaml::from_str(&text)
                .map_err(|source| ReferenceError::Yaml { path, source })?;
            Ok(Arc::new(document))
        })
    }

    fn load_table<T: DeserializeOwned>(&self, file: &str) -> Result<T, ReferenceError> {
        let document = self.load_document(file)?;
        serde_yaml::from_value(document.as_ref().clone()).map_err(|source| {
            ReferenceError::Yaml {
                path: self.data_dir.join(file),
                source,
            }
        })
    }

    pub fn ad_limits(&self) -> Result<Vec<ChannelLimitSet>, ReferenceError> {
        self.load_table(AD_LIMITS_FILE)
    }

    pub fn asset_specs(&self) -> Result<Vec<AssetSpec>, ReferenceError> {
        self.load_table(ASSET_SPECS_FILE)
    }

    pub fn taxonomies(&self) -> Result<Taxonomies, ReferenceError> {
        self.load_table(TAXONOMIES_FILE)
    }

    /// Limit set for `(channel, subtype)` with fallback to the channel default.
    pub fn limits_for(
        &self,
        channel: &str,
        subtype: Option<&str>,
    ) -> Result<Option<ChannelLimitSet>, ReferenceError> {
        let sets = self.ad_limits()?;
        Ok(resolve_limit_set(&sets, channel, subtype).cloned())
    }

    /// Field list for `(channel, subtype)`; empty when nothing matches.
    pub fn field_limits_for(
        &self,
        channel: &str,
        subtype: Option<&str>,
    ) -> Result<Vec<FieldLimit>, ReferenceError> {
        match self.limits_for(channel, subtype)? {
            Some(set) => Ok(set.fields),
            None => {
                warn!("No limits found for channel '{channel}' subtype '{subtype:?}'");
                Ok(Vec::new())
            }
        }
    }

    pub fn asset_specs_for(&self, channel: &str) -> Result<Vec<AssetSpec>, ReferenceError> {
        Ok(specs_for_channel(&self.asset_specs()?, channel))
    }

    /// Clears every cached table and returns the number of entries removed.
    pub fn clear_cache(&self) -> usize {
        let count = self.cache.clear();
        info!("Configuration cache cleared: {count} entries");
        count
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    pub(crate) const AD_LIMITS_YAML: &str = r#"
- channel: Meta
  subtype: null
  fields:
    - field: Primary Text
      max_chars: 125
      emojis_allowed: true
    - field: Headline
      max_chars: 40
      emojis_allowed: false
    - field: Call To Action
      max_chars: 20
      emojis_allowed: false
      is_dropdown: true
      dropdown_options: [Learn More, Apply Now, Sign Up]
- channel: Search
  subtype: Responsive Search Ad
  fields:
    - field: Headlines
      max_chars: 30
      emojis_allowed: false
      count: 3
    - field: Descriptions
      max_chars: 90
      emojis_allowed: false
      count: 2
"#;

    pub(crate) const ASSET_SPECS_YAML: &str = r#"
- channel: Meta
  placement_or_format: Feed Image
  aspect_ratio: "1:1"
  recommended_px: 1080x1080
  file_types: [jpg, png]
  max_file_size_mb: 30
  caption_limit_chars: 125
- channel: TikTok
  placement_or_format: In-Feed Video
  aspect_ratio: "9:16"
  duration_seconds_max: 60
  file_types: [mp4, mov]
  max_file_size_mb: 500
"#;

    pub(crate) const TAXONOMIES_YAML: &str = r#"
social_channels: [Meta, TikTok]
non_emoji_channels: [Search]
all_channels: [Meta, TikTok, Search]
tones: [Inspiring, Professional]
audiences: [School Leavers, Parents]
subtypes: [Open Day, Clearing]
tone_hints:
  Inspiring: Aspirational and uplifting.
subtype_hints:
  Clearing: Emphasise that places are still available.
"#;

    /// Writes the three fixture tables into a fresh temporary directory.
    pub(crate) fn fixture_store(ttl: Duration) -> (TempDir, ReferenceStore) {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(AD_LIMITS_FILE), AD_LIMITS_YAML).unwrap();
        std::fs::write(dir.path().join(ASSET_SPECS_FILE), ASSET_SPECS_YAML).unwrap();
        std::fs::write(dir.path().join(TAXONOMIES_FILE), TAXONOMIES_YAML).unwrap();
        let store = ReferenceStore::new(dir.path(), ttl);
        (dir, store)
    }

    #[test]
    fn test_loads_all_three_tables() {
        let (_dir, store) = fixture_store(Duration::from_secs(600));
        assert_eq!(store.ad_limits().unwrap().len(), 2);
        assert_eq!(store.asset_specs().unwrap().len(), 2);
        assert_eq!(store.taxonomies().unwrap().tones.len(), 2);
    }

    #[test]
    fn test_field_limits_fallback_and_empty() {
        let (_dir, store) = fixture_store(Duration::from_secs(600));

        let meta = store.field_limits_for("Meta", Some("Video")).unwrap();
        assert_eq!(meta.len(), 3);
        assert!(meta[2].is_dropdown);

        let unknown = store.field_limits_for("Snapchat", None).unwrap();
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_asset_specs_for_is_case_insensitive() {
        let (_dir, store) = fixture_store(Duration::from_secs(600));
        let specs = store.asset_specs_for("tiktok").unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].duration_seconds_max, 60);
    }

    #[test]
    fn test_clear_cache_forces_fresh_read() {
        let (dir, store) = fixture_store(Duration::from_secs(600));
        store.ad_limits().unwrap();
        store.asset_specs().unwrap();
        store.taxonomies().unwrap();

        // Change the file underneath the cache: still served from cache.
        std::fs::write(
            dir.path().join(TAXONOMIES_FILE),
            TAXONOMIES_YAML.replace("[Inspiring, Professional]", "[Inspiring]"),
        )
        .unwrap();
        assert_eq!(store.taxonomies().unwrap().tones.len(), 2);

        assert_eq!(store.clear_cache(), 3);
        assert_eq!(store.taxonomies().unwrap().tones.len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let store = ReferenceStore::new(dir.path(), Duration::from_secs(600));
        assert!(matches!(store.ad_limits(), Err(ReferenceError::Io { .. })));
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(AD_LIMITS_FILE), "- channel: [unclosed").unwrap();
        let store = ReferenceStore::new(dir.path(), Duration::from_secs(600));
        assert!(matches!(store.ad_limits(), Err(ReferenceError::Yaml { .. })));
    }

    #[test]
    fn test_bundled_tables_parse() {
        let store = ReferenceStore::new(
            concat!(env!("CARGO_MANIFEST_DIR"), "/data"),
            Duration::from_secs(600),
        );
        let taxonomies = store.taxonomies().unwrap();
        for channel in &taxonomies.all_channels {
            assert!(
                !store.field_limits_for(channel, None).unwrap().is_empty(),
                "no limits for {channel}"
            );
            assert!(
                !store.asset_specs_for(channel).unwrap().is_empty(),
                "no asset specs for {channel}"
            );
        }

        let rsa = store
            .field_limits_for("Search", Some("Responsive Search Ad"))
            .unwrap();
        assert_eq!(rsa[0].count, Some(15));

        let search = store.asset_specs_for("search").unwrap();
        assert_eq!(search.len(), 2);
        assert!(search.iter().all(|s| s.channel == "Search"));
    }
}

//! Subtag registry: single source of truth for every subtag category.
//!
//! The registry is built once (from the embedded IANA/CLDR extract or from a
//! JSON file), is read-only afterwards, and can be shared freely between
//! threads. Tags never own records; they clone `Arc` handles out of it.

mod records;

pub use records::{
    ExtlangRecord, GrandfatheredRecord, LanguageRecord, RedundantRecord, RegionRecord,
    ScriptRecord, SubtagRecord, VariantRecord,
};

use crate::error::{Error, Result};
use crate::extension::{ExtensionModule, ExtensionModuleRegistry};
use records::Synthetic;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// Registry data shipped with the crate.
const BUILTIN_REGISTRY: &str = include_str!("../../data/registry.json");

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// On-disk shape of the registry data.
#[derive(Debug, Default, Deserialize)]
struct RegistryData {
    #[serde(default)]
    languages: Vec<LanguageRecord>,
    #[serde(default)]
    extlangs: Vec<ExtlangRecord>,
    #[serde(default)]
    scripts: Vec<ScriptRecord>,
    #[serde(default)]
    regions: Vec<RegionRecord>,
    #[serde(default)]
    variants: Vec<VariantRecord>,
    #[serde(default)]
    grandfathered: Vec<GrandfatheredRecord>,
    #[serde(default)]
    redundant: Vec<RedundantRecord>,
    #[serde(default)]
    likely_subtags: BTreeMap<String, String>,
}

/// Case-insensitive per-category lookup tables.
pub struct Registry {
    languages: HashMap<String, Arc<LanguageRecord>>,
    extlangs: HashMap<String, Arc<ExtlangRecord>>,
    scripts: HashMap<String, Arc<ScriptRecord>>,
    regions: HashMap<String, Arc<RegionRecord>>,
    variants: HashMap<String, Arc<VariantRecord>>,
    grandfathered: HashMap<String, Arc<GrandfatheredRecord>>,
    redundant: HashMap<String, Arc<RedundantRecord>>,
    likely_subtags: HashMap<String, String>,
    extension_modules: ExtensionModuleRegistry,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("languages", &self.languages.len())
            .field("extlangs", &self.extlangs.len())
            .field("scripts", &self.scripts.len())
            .field("regions", &self.regions.len())
            .field("variants", &self.variants.len())
            .field("grandfathered", &self.grandfathered.len())
            .field("redundant", &self.redundant.len())
            .field("likely_subtags", &self.likely_subtags.len())
            .finish()
    }
}

impl Registry {
    /// Build the registry from the data embedded in the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_REGISTRY)
    }

    /// Build the registry from a JSON document.
    ///
    /// Entries without a description are skipped, and for duplicate subtags
    /// the first entry wins. Both cases are logged.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let data: RegistryData = serde_json::from_str(json)
            .map_err(|e| Error::Registry(format!("Failed to decode registry data: {}", e)))?;

        let mut languages = index("language", data.languages);
        let mut extlangs = index("extlang", data.extlangs);
        let mut scripts = index("script", data.scripts);
        let mut regions = index("region", data.regions);
        let mut variants = index("variant", data.variants);
        let grandfathered = index("grandfathered", data.grandfathered);
        let redundant = index("redundant", data.redundant);

        add_synthetic(&mut languages, true, false);
        add_synthetic(&mut extlangs, true, true);
        add_synthetic(&mut scripts, true, true);
        add_synthetic(&mut regions, true, true);
        add_synthetic(&mut variants, true, true);

        let mut likely_subtags = HashMap::with_capacity(data.likely_subtags.len());
        for (from, to) in data.likely_subtags {
            let key = normalize_likely_key(&from);
            if likely_subtags.contains_key(&key) {
                warn!("Multiple likely subtags for '{}', keeping the first one", from);
                continue;
            }
            likely_subtags.insert(key, to.replace('_', "-"));
        }

        debug!(
            languages = languages.len(),
            extlangs = extlangs.len(),
            scripts = scripts.len(),
            regions = regions.len(),
            variants = variants.len(),
            "Loaded subtag registry"
        );

        Ok(Self {
            languages,
            extlangs,
            scripts,
            regions,
            variants,
            grandfathered,
            redundant,
            likely_subtags,
            extension_modules: ExtensionModuleRegistry::with_builtin_modules(),
        })
    }

    /// Build the registry from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::Registry(format!("Failed to read registry file {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Get the global registry instance.
    ///
    /// Initializes from the embedded data on first call unless
    /// [`Registry::install`] ran before.
    pub fn global() -> &'static Registry {
        REGISTRY.get_or_init(|| Registry::builtin().expect("embedded registry data must be valid"))
    }

    /// Replace the global registry. Only possible before the first call to
    /// [`Registry::global`].
    pub fn install(registry: Registry) -> Result<&'static Registry> {
        REGISTRY
            .set(registry)
            .map_err(|_| Error::Registry("Global registry is already initialized".to_string()))?;
        Ok(Self::global())
    }

    pub fn lookup_language(&self, code: &str) -> Option<Arc<LanguageRecord>> {
        self.languages.get(&code.to_ascii_lowercase()).cloned()
    }

    pub fn lookup_extlang(&self, code: &str) -> Option<Arc<ExtlangRecord>> {
        self.extlangs.get(&code.to_ascii_lowercase()).cloned()
    }

    pub fn lookup_script(&self, code: &str) -> Option<Arc<ScriptRecord>> {
        self.scripts.get(&code.to_ascii_lowercase()).cloned()
    }

    pub fn lookup_region(&self, code: &str) -> Option<Arc<RegionRecord>> {
        self.regions.get(&code.to_ascii_lowercase()).cloned()
    }

    pub fn lookup_variant(&self, code: &str) -> Option<Arc<VariantRecord>> {
        self.variants.get(&code.to_ascii_lowercase()).cloned()
    }

    pub fn lookup_grandfathered(&self, tag: &str) -> Option<Arc<GrandfatheredRecord>> {
        self.grandfathered.get(&tag.to_ascii_lowercase()).cloned()
    }

    pub fn lookup_redundant(&self, tag: &str) -> Option<Arc<RedundantRecord>> {
        self.redundant.get(&tag.to_ascii_lowercase()).cloned()
    }

    /// CLDR likely-subtags expansion, e.g. `zh` to `zh-Hans-CN`.
    ///
    /// Accepts `_` or `-` as the separator.
    pub fn lookup_likely_subtags(&self, tag: &str) -> Option<&str> {
        self.likely_subtags
            .get(&normalize_likely_key(tag))
            .map(String::as_str)
    }

    /// Per-singleton grammar validators for extensions.
    pub fn extension_modules(&self) -> &ExtensionModuleRegistry {
        &self.extension_modules
    }

    /// Register a validator for an extension singleton, replacing the
    /// built-in or generic one.
    pub fn register_extension_module(
        &mut self,
        singleton: char,
        module: Arc<dyn ExtensionModule>,
    ) -> Result<()> {
        self.extension_modules.register(singleton, module)
    }
}

fn normalize_likely_key(tag: &str) -> String {
    tag.replace('_', "-").to_ascii_lowercase()
}

/// Key records by lower-cased tag, dropping undescribed and duplicate entries.
fn index<R: SubtagRecord>(category: &str, records: Vec<R>) -> HashMap<String, Arc<R>> {
    let mut map = HashMap::with_capacity(records.len() + 2);

    for record in records {
        if record.descriptions().is_empty() {
            warn!(
                "No description for {} '{}', skipping entry",
                category,
                record.tag()
            );
            continue;
        }
        let key = record.tag().to_ascii_lowercase();
        if map.contains_key(&key) {
            warn!(
                "Duplicate {} entry '{}', keeping the first one",
                category,
                record.tag()
            );
            continue;
        }
        map.insert(key, Arc::new(record));
    }

    map
}

fn add_synthetic<R: Synthetic>(map: &mut HashMap<String, Arc<R>>, wildcard: bool, empty: bool) {
    if wildcard {
        map.insert(
            "*".to_string(),
            Arc::new(R::synthetic("*", "Wildcard entry")),
        );
    }
    if empty {
        map.insert("".to_string(), Arc::new(R::synthetic("", "Empty entry")));
    }
}

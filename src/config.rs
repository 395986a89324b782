//! Generation options and project configuration file (tsgen.toml) parsing.

use std::fmt;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

/// Rewrites a resolved service URL before it is embedded in endpoint metadata.
pub type UrlRewriter = Box<dyn Fn(&str) -> String>;

/// Options controlling generation.
pub struct GenConfig {
    /// Emit const enums (no runtime representation) instead of runtime enums.
    pub const_enums: bool,
    /// When set, replaces every descriptor namespace in the emitted
    /// declarations.
    pub global_namespace: Option<String>,
    /// Identifier used for the promise wrapper in service stub return types.
    pub promise_type: String,
    /// Fully-qualified type identity -> literal rendered name
    /// (e.g. `System.Guid` -> `string`). Applied before any other
    /// classification rule.
    pub scalar_overrides: IndexMap<String, String>,
    /// Namespace prefixes whose types are host built-ins and are never
    /// emitted.
    pub reserved_namespaces: Vec<String>,
    /// Applied to each resolved service URL.
    pub url_rewriter: Option<UrlRewriter>,
}

impl GenConfig {
    pub fn rewrite_url(&self, url: &str) -> String {
        match &self.url_rewriter {
            Some(rewrite) => rewrite(url),
            None => url.to_string(),
        }
    }

    /// Whether `namespace` belongs to a reserved host namespace.
    pub fn is_reserved_namespace(&self, namespace: &str) -> bool {
        self.reserved_namespaces.iter().any(|prefix| {
            namespace == prefix
                || (namespace.len() > prefix.len()
                    && namespace.starts_with(prefix.as_str())
                    && namespace.as_bytes()[prefix.len()] == b'.')
        })
    }
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            const_enums: true,
            global_namespace: None,
            promise_type: "Promise".to_string(),
            scalar_overrides: IndexMap::new(),
            reserved_namespaces: vec!["System".to_string()],
            url_rewriter: None,
        }
    }
}

impl fmt::Debug for GenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenConfig")
            .field("const_enums", &self.const_enums)
            .field("global_namespace", &self.global_namespace)
            .field("promise_type", &self.promise_type)
            .field("scalar_overrides", &self.scalar_overrides)
            .field("reserved_namespaces", &self.reserved_namespaces)
            .field("url_rewriter", &self.url_rewriter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Root configuration structure for tsgen.toml.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TsgenConfig {
    /// Path to the descriptor manifest JSON.
    pub manifest: Option<String>,
    /// Output paths.
    #[serde(default)]
    pub output: OutputConfig,
    /// Generation options.
    #[serde(default)]
    pub generate: GenerateConfig,
}

/// Output paths section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OutputConfig {
    /// Directory the three artifacts are written into.
    pub dir: Option<String>,
    /// File name for the structural declarations.
    pub definitions: Option<String>,
    /// File name for the service/hub stubs.
    pub services: Option<String>,
    /// File name for the enum declarations.
    pub enums: Option<String>,
}

impl OutputConfig {
    pub fn dir(&self) -> &str {
        self.dir.as_deref().unwrap_or("generated")
    }

    pub fn definitions_name(&self) -> &str {
        self.definitions.as_deref().unwrap_or("definitions.d.ts")
    }

    pub fn services_name(&self) -> &str {
        self.services.as_deref().unwrap_or("services.ts")
    }

    pub fn enums_name(&self) -> &str {
        self.enums.as_deref().unwrap_or("enums.ts")
    }
}

/// Generation options section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GenerateConfig {
    /// Emit const enums (default: true).
    pub const_enums: Option<bool>,
    /// Wrap all declarations in this namespace.
    pub global_namespace: Option<String>,
    /// Promise wrapper identifier (default: "Promise").
    pub promise_type: Option<String>,
    /// Prefix prepended to every resolved service URL.
    pub url_prefix: Option<String>,
    /// Fully-qualified type identity -> rendered name.
    pub scalar_overrides: Option<IndexMap<String, String>>,
    /// Reserved host namespace prefixes (default: ["System"]).
    pub reserved_namespaces: Option<Vec<String>>,
}

impl TsgenConfig {
    /// Load configuration from a specific path. Returns None if the file
    /// doesn't exist or fails to read/parse.
    pub fn load_from_path(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let content = fs::read_to_string(path).ok()?;
        Self::parse(&content).ok()
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

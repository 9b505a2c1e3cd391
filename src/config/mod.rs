use dashmap::DashMap;
use std::env;
use std::sync::Arc;

/// Config key for the controller class prefix convention.
pub const CLASS_PREFIX_KEY: &str = "controller.class_prefix";
/// Config key for the controller class suffix convention.
pub const CLASS_SUFFIX_KEY: &str = "controller.class_suffix";
/// Config key for the action method suffix convention.
pub const METHOD_SUFFIX_KEY: &str = "controller.method_suffix";

/// Configuration service
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    /// Create a config service seeded from the process environment.
    pub fn new() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }
}

/// Naming conventions applied when resolving a `"Controller:action"` token.
///
/// The controller registry key is `class_prefix + alias + class_suffix` and
/// the dispatched method name is `action + method_suffix`. A non-empty prefix
/// is normalized to end with the `.` namespace separator.
#[derive(Clone, Debug)]
pub struct Conventions {
    pub class_prefix: String,
    pub class_suffix: String,
    pub method_suffix: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            class_prefix: String::new(),
            class_suffix: String::new(),
            method_suffix: "_action".to_string(),
        }
    }
}

impl Conventions {
    /// Read conventions from a config service.
    ///
    /// Missing keys fall back to the defaults. An explicitly empty
    /// `controller.method_suffix` disables method suffixing, matching the
    /// distinction between an unset and an empty key.
    pub fn from_config(config: &ConfigService) -> Self {
        let mut class_prefix = config.get(CLASS_PREFIX_KEY).unwrap_or_default();
        if !class_prefix.is_empty() && !class_prefix.ends_with('.') {
            class_prefix.push('.');
        }
        let class_suffix = config.get(CLASS_SUFFIX_KEY).unwrap_or_default();
        let method_suffix = config
            .get(METHOD_SUFFIX_KEY)
            .unwrap_or_else(|| "_action".to_string());
        Self {
            class_prefix,
            class_suffix,
            method_suffix,
        }
    }
}

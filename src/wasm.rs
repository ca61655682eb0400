//! WebAssembly bindings for browser deployment.
//!
//! Browser host for the experiment service:
//! - Persistence: `window.localStorage`
//! - Analytics: the global `gtag` function, when the analytics script loaded
//!
//! # Architecture
//!
//! ```text
//! Browser JS → wasm-bindgen → AbTesting → ExperimentService
//!                                            ↓            ↓
//!                                      LocalStorage    GtagSink
//! ```

#![cfg(target_arch = "wasm32")]

use std::sync::Arc;

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, window, Storage};

use crate::analytics::{AnalyticsSink, EventProperties};
use crate::config::{ExecutionMode, ServiceConfig};
use crate::environment::Environment;
use crate::experiment::ExperimentRegistry;
use crate::service::ExperimentService;
use crate::storage::{StorageBackend, StorageRepository};
use crate::{Error, Result};

fn js_error(context: &str, e: &JsValue) -> Error {
    Error::StorageError(format!("{context}: {e:?}"))
}

/// `window.localStorage`, or nothing when the browser denies access
/// (private mode, sandboxed iframe).
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    /// Attach to the current window's local storage.
    #[must_use]
    pub fn new() -> Self {
        let storage = window().and_then(|w| w.local_storage().ok().flatten());
        Self { storage }
    }

    /// Whether local storage is reachable.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.storage.is_some()
    }

    fn storage(&self) -> Result<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| Error::StorageError("localStorage unavailable".into()))
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match &self.storage {
            Some(storage) => storage
                .get_item(key)
                .map_err(|e| js_error("localStorage.getItem", &e)),
            None => Ok(None),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| js_error("localStorage.setItem", &e))
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| js_error("localStorage.removeItem", &e))
    }
}

fn gtag() -> Option<Function> {
    let window = window()?;
    Reflect::get(&window, &JsValue::from_str("gtag"))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

/// Sink calling `gtag('event', action, { event_category, event_label, value })`.
///
/// Looks `gtag` up on every emit, so it starts working once the script loads.
#[derive(Debug, Default, Clone, Copy)]
pub struct GtagSink;

impl GtagSink {
    /// Whether `window.gtag` is currently defined.
    #[must_use]
    pub fn is_loaded() -> bool {
        gtag().is_some()
    }
}

impl AnalyticsSink for GtagSink {
    fn emit(&self, action: &str, properties: &EventProperties) -> Result<()> {
        let gtag = gtag().ok_or_else(|| Error::SinkError("gtag not loaded".into()))?;

        let params = Object::new();
        let set = |key: &str, value: JsValue| {
            Reflect::set(&params, &JsValue::from_str(key), &value)
                .map_err(|e| Error::SinkError(format!("{e:?}")))
        };
        set("event_category", JsValue::from_str(&properties.category))?;
        set("event_label", JsValue::from_str(&properties.label))?;
        if let Some(value) = properties.value {
            set("value", JsValue::from_f64(value))?;
        }

        gtag.call3(
            &JsValue::NULL,
            &JsValue::from_str("event"),
            &JsValue::from_str(action),
            &params,
        )
        .map(|_| ())
        .map_err(|e| Error::SinkError(format!("{e:?}")))
    }
}

impl Environment {
    /// Detect browser capabilities: local storage, `gtag`, and development
    /// mode for debug builds.
    #[must_use]
    pub fn browser() -> Self {
        let mode = if cfg!(debug_assertions) {
            ExecutionMode::Development
        } else {
            ExecutionMode::Production
        };
        let mut builder = Self::builder()
            .persistent_storage(LocalStorage::new().is_available())
            .mode(mode);
        if GtagSink::is_loaded() {
            builder = builder.analytics_sink(Arc::new(GtagSink));
        }
        builder.build()
    }
}

/// Initialize WASM module with panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// In-browser experiment client
#[wasm_bindgen]
pub struct AbTesting {
    service: ExperimentService<StorageRepository<LocalStorage>>,
}

#[wasm_bindgen]
impl AbTesting {
    /// Create a client. `registry_json` replaces the built-in catalog,
    /// `config_json` the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(
        registry_json: Option<String>,
        config_json: Option<String>,
    ) -> std::result::Result<AbTesting, JsValue> {
        let to_js = |e: Error| JsValue::from_str(&e.to_string());

        let registry = match registry_json {
            Some(json) => ExperimentRegistry::from_json(&json).map_err(to_js)?,
            None => ExperimentRegistry::default_catalog(),
        };
        let config = match config_json {
            Some(json) => ServiceConfig::from_json(&json).map_err(to_js)?,
            None => ServiceConfig::default(),
        };
        let environment = Environment::browser();
        if environment.mode().is_development() {
            console::log_1(&format!("trueno-ab: {environment:?}").into());
        }

        Ok(Self {
            service: ExperimentService::from_config(
                LocalStorage::new(),
                registry,
                environment,
                config,
            ),
        })
    }

    /// Assigned variant id, or `undefined`.
    #[wasm_bindgen(js_name = getVariant)]
    pub fn get_variant(&self, experiment_id: &str) -> Option<String> {
        self.service.get_variant(experiment_id)
    }

    /// Whether the browser is in `variant_id`.
    #[wasm_bindgen(js_name = isVariant)]
    pub fn is_variant(&self, experiment_id: &str, variant_id: &str) -> bool {
        self.service.is_variant(experiment_id, variant_id)
    }

    /// Track a conversion.
    #[wasm_bindgen(js_name = trackConversion)]
    pub fn track_conversion(&self, experiment_id: &str, event_name: &str, value: Option<f64>) {
        self.service.track_conversion(experiment_id, event_name, value);
    }

    /// Track an experiment view.
    #[wasm_bindgen(js_name = trackExperimentView)]
    pub fn track_experiment_view(&self, experiment_id: &str) {
        self.service.track_experiment_view(experiment_id);
    }

    /// Clear assignments and the event log. Reload to re-assign.
    #[wasm_bindgen(js_name = clearAllAssignments)]
    pub fn clear_all_assignments(&self) {
        self.service.clear_all_assignments();
    }

    /// Admin overview as a JSON string.
    #[wasm_bindgen(js_name = overviewJson)]
    pub fn overview_json(&self) -> std::result::Result<String, JsValue> {
        serde_json::to_string(&self.service.overview())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

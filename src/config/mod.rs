//! Configuration loading and management
//!
//! Guards can be declared in YAML instead of code:
//!
//! ```yaml
//! xhr_only: 415
//! headers: [X-Api-Key]
//! cookies: [session]
//! args: [page]
//! arg_values:
//!   paginate: "true"
//! form: [name, address]
//! ```

use crate::core::error::{ConfigError, ExtrasResult, TemplateError};
use crate::core::guard::GuardSet;
use crate::filters::{config_filters, config_globals};
use crate::guards::{
    GuardLayer, RequireArgValues, RequireArgs, RequireCookies, RequireForm, RequireHeaders,
    XhrOnly,
};
use axum::http::StatusCode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tera::Tera;

/// Declarative guard requirements for one route or router
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardConfig {
    /// Status to abort non-AJAX requests with; absent means no AJAX check
    #[serde(default)]
    pub xhr_only: Option<u16>,

    #[serde(default)]
    pub headers: Vec<String>,

    #[serde(default)]
    pub cookies: Vec<String>,

    #[serde(default)]
    pub args: Vec<String>,

    /// Query args that must carry exactly these values
    #[serde(default)]
    pub arg_values: IndexMap<String, String>,

    /// Form fields required on POST
    #[serde(default)]
    pub form: Vec<String>,
}

impl GuardConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> ExtrasResult<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                file: Some(path.to_string()),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> ExtrasResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Build the guards this configuration declares
    ///
    /// Order: xhr, headers, cookies, args, arg values, form. Empty
    /// requirements add no guard.
    pub fn into_guard_set(self) -> ExtrasResult<GuardSet> {
        let mut set = GuardSet::new();

        if let Some(code) = self.xhr_only {
            let status = StatusCode::from_u16(code).map_err(|e| ConfigError::InvalidValue {
                field: "xhr_only".to_string(),
                value: code.to_string(),
                message: e.to_string(),
            })?;
            set = set.with(XhrOnly::with_status(status));
        }
        if !self.headers.is_empty() {
            set = set.with(RequireHeaders::new(self.headers));
        }
        if !self.cookies.is_empty() {
            set = set.with(RequireCookies::new(self.cookies));
        }
        if !self.args.is_empty() {
            set = set.with(RequireArgs::new(self.args));
        }
        if !self.arg_values.is_empty() {
            set = set.with(RequireArgValues::new(self.arg_values));
        }
        if !self.form.is_empty() {
            set = set.with(RequireForm::new(self.form));
        }

        Ok(set)
    }

    /// Build a layer running every declared guard
    pub fn into_layer(self) -> ExtrasResult<GuardLayer<GuardSet>> {
        Ok(GuardLayer::new(self.into_guard_set()?))
    }
}

/// Template engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Glob of template files, e.g. `templates/**/*.html`; none for an empty engine
    #[serde(default)]
    pub templates_glob: Option<String>,

    #[serde(default = "default_true")]
    pub register_filters: bool,

    #[serde(default = "default_true")]
    pub register_globals: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            templates_glob: None,
            register_filters: true,
            register_globals: true,
        }
    }
}

impl TemplateConfig {
    pub fn from_yaml_str(yaml: &str) -> ExtrasResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Build a tera engine with the configured registrations applied
    pub fn build_engine(&self) -> ExtrasResult<Tera> {
        let mut tera = match &self.templates_glob {
            Some(glob) => Tera::new(glob).map_err(TemplateError::from)?,
            None => Tera::default(),
        };
        if self.register_filters {
            config_filters(&mut tera);
        }
        if self.register_globals {
            config_globals(&mut tera);
        }
        tracing::debug!(
            templates = tera.get_template_names().count(),
            filters = self.register_filters,
            globals = self.register_globals,
            "template engine built"
        );
        Ok(tera)
    }
}

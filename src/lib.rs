//! # this-extras
//!
//! Small helpers for axum applications rendering with tera.
//!
//! ## Features
//!
//! - **Request guards**: reject requests missing required headers, cookies,
//!   query args or form fields before the handler runs
//! - **AJAX-only routes**: abort non-XHR requests with a chosen status
//! - **Typed rejections**: missing items surface as `MissingRequiredFieldError`
//! - **Template filters**: static catalogues registered as tera filters and
//!   global functions
//! - **YAML configuration**: declare guards per route in configuration files
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use extras::prelude::*;
//!
//! let app: Router = Router::new()
//!     .route("/items", get(list_items))
//!     .route_layer(require_arg_values([("paginate", "true")]))
//!     .route("/poll", get(poll).route_layer(xhr_only()));
//!
//! let mut tera = Tera::new("templates/**/*.html")?;
//! config_globals(config_filters(&mut tera));
//! ```

pub mod config;
pub mod core;
pub mod filters;
pub mod guards;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{
            ErrorResponse, ExtrasError, ExtrasResult, MissingRequiredFieldError, RequestError,
            RequirementKind, ValidationError,
        },
        guard::{Guard, GuardSet},
        request::{RequestView, RequestViewBuilder},
    };

    // === Guards ===
    pub use crate::guards::{
        GuardLayer, RequireArgValues, RequireArgs, RequireCookies, RequireForm, RequireHeaders,
        XhrOnly, require_arg_values, require_args, require_cookies, require_form,
        require_headers, xhr_only, xhr_only_with_status,
    };

    // === Filters ===
    pub use crate::filters::{FilterFn, FilterTable, TemplateEnv, config_filters, config_globals};

    // === Config ===
    pub use crate::config::{GuardConfig, TemplateConfig};

    // === External dependencies ===
    pub use tera::{Context, Tera};

    // === Axum ===
    pub use axum::{
        Router,
        http::StatusCode,
        routing::{get, post},
    };
}

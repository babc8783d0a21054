//! Request guards
//!
//! Each factory captures its requirement once and returns a [`GuardLayer`]
//! to put in front of a route with `route_layer`. A passing request reaches
//! the handler unchanged; a failing one is answered by the guard:
//!
//! - membership guards answer `400` with a `MISSING_REQUIRED_FIELD` body
//! - [`require_arg_values`] answers `400` naming the first bad argument
//! - [`xhr_only`] aborts with its configured status
//!
//! ```rust,ignore
//! use axum::{Router, routing::{get, post}};
//! use extras::guards::{require_arg_values, require_form, xhr_only};
//!
//! let app: Router = Router::new()
//!     .route("/items", get(list_items).route_layer(require_arg_values([("paginate", "true")])))
//!     .route("/contact", post(contact).route_layer(require_form(["name", "address"])))
//!     .route("/poll", get(poll).route_layer(xhr_only()));
//! ```

pub mod args;
pub mod cookies;
pub mod form;
pub mod headers;
pub mod layer;
pub mod xhr;

pub use args::{RequireArgValues, RequireArgs};
pub use cookies::RequireCookies;
pub use form::RequireForm;
pub use headers::RequireHeaders;
pub use layer::{DEFAULT_FORM_BODY_LIMIT, GuardLayer, GuardService};
pub use xhr::XhrOnly;

use axum::http::StatusCode;

/// Require every named header to be present
pub fn require_headers<I, N>(names: I) -> GuardLayer<RequireHeaders>
where
    I: IntoIterator<Item = N>,
    N: Into<String>,
{
    GuardLayer::new(RequireHeaders::new(names))
}

/// Require every named cookie to be present
pub fn require_cookies<I, N>(names: I) -> GuardLayer<RequireCookies>
where
    I: IntoIterator<Item = N>,
    N: Into<String>,
{
    GuardLayer::new(RequireCookies::new(names))
}

/// Require every named query argument to be present
pub fn require_args<I, N>(names: I) -> GuardLayer<RequireArgs>
where
    I: IntoIterator<Item = N>,
    N: Into<String>,
{
    GuardLayer::new(RequireArgs::new(names))
}

/// Require query arguments to be present with exactly these values
pub fn require_arg_values<I, K, V>(expected: I) -> GuardLayer<RequireArgValues>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    GuardLayer::new(RequireArgValues::new(expected))
}

/// Require every named form field on POST requests
pub fn require_form<I, N>(names: I) -> GuardLayer<RequireForm>
where
    I: IntoIterator<Item = N>,
    N: Into<String>,
{
    GuardLayer::new(RequireForm::new(names))
}

/// Only let AJAX requests through; others get `415 Unsupported Media Type`
pub fn xhr_only() -> GuardLayer<XhrOnly> {
    GuardLayer::new(XhrOnly::new())
}

/// Only let AJAX requests through; others get `status`
pub fn xhr_only_with_status(status: StatusCode) -> GuardLayer<XhrOnly> {
    GuardLayer::new(XhrOnly::with_status(status))
}

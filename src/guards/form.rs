//! Required form fields on POST requests

use crate::core::error::{ExtrasResult, RequirementKind};
use crate::core::guard::{Guard, check_membership, requirement_set};
use crate::core::request::RequestView;
use std::sync::Arc;

/// Rejects POST requests whose form lacks a configured field
///
/// Urlencoded and multipart bodies are decoded; file parts do not count as
/// form fields.
///
/// Requests with any other method pass untouched and their body is never
/// buffered.
#[derive(Debug, Clone)]
pub struct RequireForm {
    names: Arc<[String]>,
}

impl RequireForm {
    pub fn new<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self {
            names: requirement_set(names, false),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl Guard for RequireForm {
    fn name(&self) -> &'static str {
        "require_form"
    }

    fn check(&self, view: &RequestView) -> ExtrasResult<()> {
        if !view.is_post() {
            return Ok(());
        }
        check_membership(RequirementKind::FormField, &self.names, |name| {
            view.has_form_field(name)
        })?;
        Ok(())
    }

    fn needs_form(&self, view: &RequestView) -> bool {
        view.is_post() && !self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request::RequestViewBuilder;
    use axum::http::Method;

    #[test]
    fn test_post_with_all_fields_passes() {
        let guard = RequireForm::new(["name", "address"]);
        let view = RequestViewBuilder::new(Method::POST)
            .form_field("name", "Ada")
            .form_field("address", "London")
            .build();

        assert!(guard.check(&view).is_ok());
    }

    #[test]
    fn test_post_missing_field_fails() {
        let guard = RequireForm::new(["name", "address"]);
        let view = RequestViewBuilder::new(Method::POST)
            .form_field("name", "Ada")
            .build();

        let err = guard.check(&view).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required form field(s): ['address']"
        );
    }

    #[test]
    fn test_non_post_always_passes() {
        let guard = RequireForm::new(["name"]);
        for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH] {
            let view = RequestViewBuilder::new(method).build();
            assert!(!guard.needs_form(&view));
            assert!(guard.check(&view).is_ok());
        }
    }

    #[test]
    fn test_empty_requirement_skips_body() {
        let guard = RequireForm::new(Vec::<String>::new());
        let view = RequestViewBuilder::new(Method::POST).build();
        assert!(!guard.needs_form(&view));
        assert!(guard.check(&view).is_ok());
    }
}

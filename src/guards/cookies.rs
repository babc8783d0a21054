//! Required cookies

use crate::core::error::{ExtrasResult, RequirementKind};
use crate::core::guard::{Guard, check_membership, requirement_set};
use crate::core::request::RequestView;
use std::sync::Arc;

/// Rejects requests missing any of the configured cookies
#[derive(Debug, Clone)]
pub struct RequireCookies {
    names: Arc<[String]>,
}

impl RequireCookies {
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

impl Guard for RequireCookies {
    fn name(&self) -> &'static str {
        "require_cookies"
    }

    fn check(&self, view: &RequestView) -> ExtrasResult<()> {
        check_membership(RequirementKind::Cookie, &self.names, |name| {
            view.has_cookie(name)
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request::RequestViewBuilder;
    use axum::http::Method;

    #[test]
    fn test_all_cookies_present() {
        let guard = RequireCookies::new(["csrftoken", "session"]);
        let view = RequestViewBuilder::new(Method::GET)
            .cookie("session", "abc")
            .cookie("csrftoken", "xyz")
            .build();

        assert!(guard.check(&view).is_ok());
    }

    #[test]
    fn test_missing_cookies_listed() {
        let guard = RequireCookies::new(["csrftoken", "session"]);
        let view = RequestViewBuilder::new(Method::GET)
            .cookie("session", "abc")
            .build();

        let err = guard.check(&view).unwrap_err();
        assert_eq!(err.to_string(), "Missing required cookie(s): ['csrftoken']");
    }

    #[test]
    fn test_cookie_names_are_case_sensitive() {
        let guard = RequireCookies::new(["session"]);
        let view = RequestViewBuilder::new(Method::GET)
            .cookie("Session", "abc")
            .build();

        assert!(guard.check(&view).is_err());
    }
}

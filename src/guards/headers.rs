//! Required request headers

use crate::core::error::{ExtrasResult, RequirementKind};
use crate::core::guard::{Guard, check_membership, requirement_set};
use crate::core::request::RequestView;
use std::sync::Arc;

/// Rejects requests missing any of the configured headers
///
/// Header names are matched case-insensitively; the rejection lists them
/// as configured.
#[derive(Debug, Clone)]
pub struct RequireHeaders {
    names: Arc<[String]>,
}

impl RequireHeaders {
    pub fn new<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self {
            names: requirement_set(names, true),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl Guard for RequireHeaders {
    fn name(&self) -> &'static str {
        "require_headers"
    }

    fn check(&self, view: &RequestView) -> ExtrasResult<()> {
        check_membership(RequirementKind::Header, &self.names, |name| {
            view.has_header(name)
        })?;
        Ok(())
    }
}

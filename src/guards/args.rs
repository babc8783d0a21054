//! Required query arguments
//!
//! Two guards: [`RequireArgs`] only checks that arguments are present,
//! [`RequireArgValues`] also checks each value against an expected literal.

use crate::core::error::{ExtrasResult, RequirementKind, ValidationError};
use crate::core::guard::{Guard, check_membership, requirement_set};
use crate::core::request::RequestView;
use indexmap::IndexMap;
use std::sync::Arc;

/// Rejects requests missing any of the configured query arguments
#[derive(Debug, Clone)]
pub struct RequireArgs {
    names: Arc<[String]>,
}

impl RequireArgs {
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

impl Guard for RequireArgs {
    fn name(&self) -> &'static str {
        "require_args"
    }

    fn check(&self, view: &RequestView) -> ExtrasResult<()> {
        check_membership(RequirementKind::Arg, &self.names, |name| {
            view.arg(name).is_some()
        })?;
        Ok(())
    }
}

/// Rejects requests whose query arguments are missing or differ from the
/// expected values
///
/// Entries are checked in insertion order and only the first offending
/// argument is reported. When an argument repeats, its first value counts.
#[derive(Debug, Clone)]
pub struct RequireArgValues {
    expected: Arc<IndexMap<String, String>>,
}

impl RequireArgValues {
    pub fn new<I, K, V>(expected: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            expected: Arc::new(
                expected
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub fn expected(&self) -> &IndexMap<String, String> {
        &self.expected
    }
}

impl Guard for RequireArgValues {
    fn name(&self) -> &'static str {
        "require_arg_values"
    }

    fn check(&self, view: &RequestView) -> ExtrasResult<()> {
        for (name, expected) in self.expected.iter() {
            let Some(actual) = view.arg(name) else {
                return Err(ValidationError::MissingParam { name: name.clone() }.into());
            };
            if actual != expected {
                return Err(ValidationError::InvalidValue {
                    name: name.clone(),
                    expected: expected.clone(),
                    actual: actual.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ExtrasError;
    use crate::core::request::RequestViewBuilder;
    use axum::http::Method;

    fn view(args: &[(&str, &str)]) -> RequestView {
        args.iter()
            .fold(RequestViewBuilder::new(Method::GET), |b, (k, v)| b.arg(*k, *v))
            .build()
    }

    #[test]
    fn test_membership_only() {
        let guard = RequireArgs::new(["paginate"]);
        assert!(guard.check(&view(&[("paginate", "anything")])).is_ok());

        let err = guard.check(&view(&[("page", "1")])).unwrap_err();
        assert_eq!(err.to_string(), "Missing required arg(s): ['paginate']");
    }

    #[test]
    fn test_value_match_passes() {
        let guard = RequireArgValues::new([("paginate", "true")]);
        assert!(guard.check(&view(&[("paginate", "true")])).is_ok());
    }

    #[test]
    fn test_value_mismatch_is_reported() {
        let guard = RequireArgValues::new([("paginate", "true")]);
        let err = guard.check(&view(&[("paginate", "false")])).unwrap_err();

        assert!(matches!(
            err,
            ExtrasError::Validation(ValidationError::InvalidValue { ref name, .. }) if name == "paginate"
        ));
        assert_eq!(err.to_string(), "Invalid value `false` for param paginate.");
    }

    #[test]
    fn test_missing_value_param_is_reported() {
        let guard = RequireArgValues::new([("paginate", "true")]);
        let err = guard.check(&view(&[])).unwrap_err();
        assert_eq!(err.to_string(), "Missing param `paginate`");
    }

    #[test]
    fn test_first_offending_argument_wins() {
        let guard = RequireArgValues::new([("a", "1"), ("b", "2")]);
        let err = guard.check(&view(&[("a", "0")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value `0` for param a.");
    }

    #[test]
    fn test_first_of_repeated_values_counts() {
        let guard = RequireArgValues::new([("page", "1")]);
        assert!(guard.check(&view(&[("page", "1"), ("page", "2")])).is_ok());
        assert!(guard.check(&view(&[("page", "2"), ("page", "1")])).is_err());
    }

    #[test]
    fn test_empty_mapping_is_noop() {
        let guard = RequireArgValues::new(Vec::<(String, String)>::new());
        assert!(guard.check(&view(&[])).is_ok());
    }
}

//! Template filters and their registration
//!
//! Filters live in four static catalogues:
//!
//! - [`general`]: string and value helpers, also exposed as template globals
//! - [`random`]: randomised values for mock-ups and placeholders
//! - [`munging`]: reshaping lists and maps
//! - [`datetimes`]: parsing and formatting dates
//!
//! [`config_filters`] installs all of them as filters, [`config_globals`]
//! installs [`general`] as global functions.

pub mod datetimes;
pub mod general;
pub mod munging;
pub mod random;
pub mod registrar;

pub use registrar::{FilterTable, TemplateEnv, config_filters, config_globals};

use std::collections::HashMap;
use tera::{Error, Result, Value};

/// Signature shared by every catalogue entry
pub type FilterFn = fn(&Value, &HashMap<String, Value>) -> Result<Value>;

/// A named, ordered list of filters
pub type Catalogue = &'static [(&'static str, FilterFn)];

/// Catalogues installed by [`config_filters`], in registration order
pub fn filter_catalogues() -> [(&'static str, Catalogue); 4] {
    [
        ("general", general::CATALOGUE),
        ("random", random::CATALOGUE),
        ("munging", munging::CATALOGUE),
        ("datetimes", datetimes::CATALOGUE),
    ]
}

// -----------------------------------------------------------------------------
// Argument helpers shared by the catalogues
// -----------------------------------------------------------------------------

pub(crate) fn value_str<'a>(filter: &str, value: &'a Value) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| Error::msg(format!("Filter `{}` expects a string value", filter)))
}

pub(crate) fn value_array<'a>(filter: &str, value: &'a Value) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| Error::msg(format!("Filter `{}` expects an array value", filter)))
}

pub(crate) fn value_object<'a>(
    filter: &str,
    value: &'a Value,
) -> Result<&'a serde_json::Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| Error::msg(format!("Filter `{}` expects an object value", filter)))
}

pub(crate) fn opt_str_arg<'a>(
    filter: &str,
    args: &'a HashMap<String, Value>,
    name: &str,
) -> Result<Option<&'a str>> {
    match args.get(name) {
        None => Ok(None),
        Some(v) => v.as_str().map(Some).ok_or_else(|| {
            Error::msg(format!(
                "Filter `{}` expects argument `{}` to be a string",
                filter, name
            ))
        }),
    }
}

pub(crate) fn str_arg<'a>(
    filter: &str,
    args: &'a HashMap<String, Value>,
    name: &str,
) -> Result<&'a str> {
    opt_str_arg(filter, args, name)?.ok_or_else(|| {
        Error::msg(format!(
            "Filter `{}` requires argument `{}`",
            filter, name
        ))
    })
}

pub(crate) fn opt_i64_arg(
    filter: &str,
    args: &HashMap<String, Value>,
    name: &str,
) -> Result<Option<i64>> {
    match args.get(name) {
        None => Ok(None),
        Some(v) => v.as_i64().map(Some).ok_or_else(|| {
            Error::msg(format!(
                "Filter `{}` expects argument `{}` to be an integer",
                filter, name
            ))
        }),
    }
}

pub(crate) fn array_arg<'a>(
    filter: &str,
    args: &'a HashMap<String, Value>,
    name: &str,
) -> Result<&'a Vec<Value>> {
    args.get(name).and_then(Value::as_array).ok_or_else(|| {
        Error::msg(format!(
            "Filter `{}` requires array argument `{}`",
            filter, name
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalogue_names_are_unique_within_each_catalogue() {
        for (module, catalogue) in filter_catalogues() {
            let names: HashSet<_> = catalogue.iter().map(|(name, _)| *name).collect();
            assert_eq!(names.len(), catalogue.len(), "duplicate in {}", module);
        }
    }

    #[test]
    fn test_str_arg_reports_missing_argument() {
        let err = str_arg("cut", &HashMap::new(), "arg").unwrap_err();
        assert!(err.to_string().contains("requires argument `arg`"));
    }
}

//! Installs the filter catalogues into a template engine
//!
//! Registration overwrites any entry of the same name, so calling either
//! function twice leaves the engine in the same state as calling it once.

use super::{Catalogue, FilterFn, filter_catalogues, general};
use std::collections::{BTreeMap, HashMap};
use tera::{Tera, Value};

/// A template engine that accepts filters and global functions
pub trait TemplateEnv {
    /// Register `filter` under `name`, replacing any previous filter
    fn set_filter(&mut self, name: &'static str, filter: FilterFn);

    /// Register `filter` as a global function under `name`
    ///
    /// The filter input is read from the `value` argument; all other
    /// arguments are passed through.
    fn set_global(&mut self, name: &'static str, filter: FilterFn);
}

impl TemplateEnv for Tera {
    fn set_filter(&mut self, name: &'static str, filter: FilterFn) {
        self.register_filter(name, filter);
    }

    fn set_global(&mut self, name: &'static str, filter: FilterFn) {
        self.register_function(name, move |args: &HashMap<String, Value>| {
            let mut rest = args.clone();
            let value = rest.remove("value").unwrap_or(Value::Null);
            filter(&value, &rest)
        });
    }
}

/// Plain lookup tables, for inspecting what the registrar installs
#[derive(Debug, Default, Clone)]
pub struct FilterTable {
    pub filters: BTreeMap<&'static str, FilterFn>,
    pub globals: BTreeMap<&'static str, FilterFn>,
}

impl FilterTable {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateEnv for FilterTable {
    fn set_filter(&mut self, name: &'static str, filter: FilterFn) {
        self.filters.insert(name, filter);
    }

    fn set_global(&mut self, name: &'static str, filter: FilterFn) {
        self.globals.insert(name, filter);
    }
}

fn inject_filters<E: TemplateEnv + ?Sized>(env: &mut E, catalogue: Catalogue) -> usize {
    for (name, filter) in catalogue {
        env.set_filter(name, *filter);
    }
    catalogue.len()
}

fn inject_globals<E: TemplateEnv + ?Sized>(env: &mut E, catalogue: Catalogue) -> usize {
    for (name, filter) in catalogue {
        env.set_global(name, *filter);
    }
    catalogue.len()
}

/// Register every catalogue as template filters
pub fn config_filters<E: TemplateEnv + ?Sized>(env: &mut E) -> &mut E {
    let mut total = 0;
    for (module, catalogue) in filter_catalogues() {
        let count = inject_filters(env, catalogue);
        tracing::debug!(module, count, "registered template filters");
        total += count;
    }
    tracing::info!(total, "template filters configured");
    env
}

/// Register the general catalogue as template globals
pub fn config_globals<E: TemplateEnv + ?Sized>(env: &mut E) -> &mut E {
    let total = inject_globals(env, general::CATALOGUE);
    tracing::info!(total, "template globals configured");
    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use tera::Context;

    #[test]
    fn test_config_filters_installs_every_catalogue() {
        let mut table = FilterTable::new();
        config_filters(&mut table);

        for (_, catalogue) in filter_catalogues() {
            for (name, _) in catalogue {
                assert!(table.filters.contains_key(name), "missing {}", name);
            }
        }
        assert!(table.globals.is_empty());
    }

    #[test]
    fn test_config_filters_is_idempotent() {
        let mut once = FilterTable::new();
        config_filters(&mut once);

        let mut twice = FilterTable::new();
        config_filters(config_filters(&mut twice));

        assert_eq!(
            once.filters.keys().collect::<Vec<_>>(),
            twice.filters.keys().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_config_globals_only_general() {
        let mut table = FilterTable::new();
        config_globals(&mut table);

        assert_eq!(table.globals.len(), general::CATALOGUE.len());
        assert!(table.globals.contains_key("greet"));
        assert!(!table.globals.contains_key("rand_uuid"));
        assert!(table.filters.is_empty());
    }

    #[test]
    fn test_tera_filters_render() {
        let mut tera = Tera::default();
        config_filters(&mut tera);

        let out = tera
            .render_str("{{ name | camel2hyphen }}", &{
                let mut ctx = Context::new();
                ctx.insert("name", "camelCaseWord");
                ctx
            })
            .unwrap();
        assert_eq!(out, "camel-case-word");
    }

    #[test]
    fn test_tera_globals_take_value_argument() {
        let mut tera = Tera::default();
        config_globals(&mut tera);

        let out = tera
            .render_str(
                r#"{{ greet(value="Ada", greeting="Hi") }}"#,
                &Context::new(),
            )
            .unwrap();
        assert_eq!(out, "Hi, Ada!");
    }

    #[test]
    fn test_registrar_returns_same_engine_for_chaining() {
        let mut tera = Tera::default();
        let out = config_globals(config_filters(&mut tera))
            .render_str("{{ 'a-b' | cut(arg='-') }}", &Context::new())
            .unwrap();
        assert_eq!(out, "ab");
    }
}

//! Integration tests for filter and global registration on tera

use extras::filters::{filter_catalogues, general};
use extras::prelude::*;
use serde_json::json;
use std::fs;

fn context(pairs: &[(&str, serde_json::Value)]) -> Context {
    let mut ctx = Context::new();
    for (key, value) in pairs {
        ctx.insert(*key, value);
    }
    ctx
}

mod registration_tests {
    use super::*;

    #[test]
    fn test_every_catalogue_entry_is_registered_once() {
        let mut table = FilterTable::new();
        config_filters(&mut table);

        let expected: usize = filter_catalogues()
            .iter()
            .map(|(_, catalogue)| catalogue.len())
            .sum();
        assert_eq!(table.filters.len(), expected);
    }

    #[test]
    fn test_repeated_registration_renders_identically() {
        let template = "{{ word | camel2hyphen }}|{{ 'x' | ljust(width=3, fillchar='-') }}";
        let ctx = context(&[("word", json!("helloWorld"))]);

        let mut once = Tera::default();
        config_filters(&mut once);
        let first = once.render_str(template, &ctx).unwrap();

        let mut twice = Tera::default();
        config_filters(config_filters(&mut twice));
        let second = twice.render_str(template, &ctx).unwrap();

        assert_eq!(first, "hello-world|x--");
        assert_eq!(first, second);
    }

    #[test]
    fn test_globals_mirror_general_catalogue() {
        let mut table = FilterTable::new();
        config_globals(&mut table);

        let names: Vec<_> = general::CATALOGUE.iter().map(|(name, _)| *name).collect();
        assert_eq!(table.globals.keys().count(), names.len());
        for name in names {
            assert!(table.globals.contains_key(name));
        }
    }
}

mod rendering_tests {
    use super::*;

    #[test]
    fn test_munging_and_datetime_filters_in_templates() {
        let mut tera = Tera::default();
        config_filters(&mut tera);

        let ctx = context(&[
            ("scores", json!({"a": 1, "b": 2, "c": 3})),
            ("when", json!("2024-01-15 08:30:00")),
        ]);
        let out = tera
            .render_str(
                "{% for pair in scores | sort_dict_keys_from_reflist(reflist=['c', 'a']) %}{{ pair.0 }}{% endfor %} {{ when | str2dt }}",
                &ctx,
            )
            .unwrap();

        assert_eq!(out, "ca 2024-01-15T08:30:00");
    }

    #[test]
    fn test_filter_error_surfaces_as_render_error() {
        let mut tera = Tera::default();
        config_filters(&mut tera);

        let result = tera.render_str("{{ 42 | camel2hyphen }}", &Context::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_global_function_without_value_gets_null() {
        let mut tera = Tera::default();
        config_globals(&mut tera);

        let out = tera
            .render_str("{{ islist() }}", &Context::new())
            .unwrap();
        assert_eq!(out, "false");
    }
}

mod template_config_tests {
    use super::*;

    #[test]
    fn test_build_engine_from_glob() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("hello.txt"),
            "{{ greet(value=name) }} {{ name | questionize_label }}",
        )
        .unwrap();

        let config = TemplateConfig {
            templates_glob: Some(format!("{}/*.txt", dir.path().display())),
            ..TemplateConfig::default()
        };
        let tera = config.build_engine().unwrap();

        let out = tera
            .render("hello.txt", &context(&[("name", json!("is_ready"))]))
            .unwrap();
        assert_eq!(out, "Hello, is_ready! ready?");
    }

    #[test]
    fn test_build_engine_without_registration() {
        let config = TemplateConfig {
            templates_glob: None,
            register_filters: false,
            register_globals: false,
        };
        let mut tera = config.build_engine().unwrap();

        assert!(tera.render_str("{{ 'a' | cut(arg='a') }}", &Context::new()).is_err());
    }
}

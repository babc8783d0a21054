//! Randomised values for placeholders and mock-ups

use super::{Catalogue, opt_i64_arg, value_array, value_str};
use rand::Rng;
use rand::seq::IndexedRandom;
use std::collections::HashMap;
use tera::{Error, Result, Value};

pub const CATALOGUE: Catalogue = &[
    ("rand_choice", rand_choice),
    ("rand_int", rand_int),
    ("rand_color", rand_color),
    ("rand_name_title", rand_name_title),
    ("rand_uuid", rand_uuid),
];

const NAME_TITLES: &[&str] = &["Mr.", "Mrs.", "Ms.", "Dr.", "Prof.", "Sir", "Dame"];

/// A random element of a list; null for an empty list
pub fn rand_choice(value: &Value, _: &HashMap<String, Value>) -> Result<Value> {
    let items = value_array("rand_choice", value)?;
    Ok(items.choose(&mut rand::rng()).cloned().unwrap_or(Value::Null))
}

/// A random integer between `min` (default 0) and the input, inclusive
pub fn rand_int(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let max = value
        .as_i64()
        .ok_or_else(|| Error::msg("Filter `rand_int` expects an integer value"))?;
    let min = opt_i64_arg("rand_int", args, "min")?.unwrap_or(0);
    if min > max {
        return Err(Error::msg(format!(
            "Filter `rand_int` got min {} greater than max {}",
            min, max
        )));
    }
    Ok(Value::from(rand::rng().random_range(min..=max)))
}

/// A random `#rrggbb` colour; the input is ignored
pub fn rand_color(_: &Value, _: &HashMap<String, Value>) -> Result<Value> {
    let [r, g, b]: [u8; 3] = rand::rng().random();
    Ok(Value::String(format!("#{:02x}{:02x}{:02x}", r, g, b)))
}

/// Prefix a name with a random title
pub fn rand_name_title(value: &Value, _: &HashMap<String, Value>) -> Result<Value> {
    let name = value_str("rand_name_title", value)?;
    let title = NAME_TITLES.choose(&mut rand::rng()).copied().unwrap_or("Mx.");
    Ok(Value::String(format!("{} {}", title, name)))
}

/// A fresh v4 UUID; the input is ignored
pub fn rand_uuid(_: &Value, _: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(uuid::Uuid::new_v4().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rand_choice_picks_member() {
        let items = json!(["a", "b", "c"]);
        let picked = rand_choice(&items, &HashMap::new()).unwrap();
        assert!(items.as_array().unwrap().contains(&picked));
    }

    #[test]
    fn test_rand_choice_empty_is_null() {
        assert_eq!(rand_choice(&json!([]), &HashMap::new()).unwrap(), json!(null));
    }

    #[test]
    fn test_rand_int_within_bounds() {
        let args = HashMap::from([("min".to_string(), json!(5))]);
        for _ in 0..50 {
            let n = rand_int(&json!(10), &args).unwrap().as_i64().unwrap();
            assert!((5..=10).contains(&n));
        }
        assert!(rand_int(&json!(1), &args).is_err());
    }

    #[test]
    fn test_rand_color_format() {
        let color = rand_color(&json!(null), &HashMap::new()).unwrap();
        let color = color.as_str().unwrap();
        assert_eq!(color.len(), 7);
        assert!(color.starts_with('#'));
        assert!(color[1..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_rand_name_title_keeps_name() {
        let out = rand_name_title(&json!("Lovelace"), &HashMap::new()).unwrap();
        let out = out.as_str().unwrap();
        assert!(out.ends_with(" Lovelace"));
        assert!(NAME_TITLES.iter().any(|t| out.starts_with(t)));
    }

    #[test]
    fn test_rand_uuid_parses() {
        let out = rand_uuid(&json!(null), &HashMap::new()).unwrap();
        assert!(uuid::Uuid::parse_str(out.as_str().unwrap()).is_ok());
    }
}

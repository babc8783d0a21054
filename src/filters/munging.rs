//! Filters reshaping lists and maps

use super::{Catalogue, array_arg, str_arg, value_array, value_object};
use indexmap::IndexMap;
use serde_json::Map;
use std::collections::HashMap;
use tera::{Result, Value};

pub const CATALOGUE: Catalogue = &[
    ("filter_list", filter_list),
    ("filter_keys", filter_keys),
    ("filter_vals", filter_vals),
    ("filter_key_vals", filter_key_vals),
    ("group_by", group_by),
    ("sort_dict_keys_from_reflist", sort_dict_keys_from_reflist),
    ("sort_dict_vals_from_reflist", sort_dict_vals_from_reflist),
];

/// Group label for items lacking the grouping key
pub const UNLABELED: &str = "unlabeled";

/// Drop list items equal to any of `remove`
pub fn filter_list(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let items = value_array("filter_list", value)?;
    let remove = array_arg("filter_list", args, "remove")?;
    Ok(Value::Array(
        items
            .iter()
            .filter(|item| !remove.contains(item))
            .cloned()
            .collect(),
    ))
}

/// Drop map entries whose key is in `keys`
pub fn filter_keys(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let map = value_object("filter_keys", value)?;
    let keys = array_arg("filter_keys", args, "keys")?;
    Ok(retain(map, |k, _| !keys.iter().any(|key| key.as_str() == Some(k))))
}

/// Drop map entries whose value is in `vals`
pub fn filter_vals(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let map = value_object("filter_vals", value)?;
    let vals = array_arg("filter_vals", args, "vals")?;
    Ok(retain(map, |_, v| !vals.contains(v)))
}

/// Keep only map entries whose key is in `keys`
pub fn filter_key_vals(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let map = value_object("filter_key_vals", value)?;
    let keys = array_arg("filter_key_vals", args, "keys")?;
    Ok(retain(map, |k, _| keys.iter().any(|key| key.as_str() == Some(k))))
}

fn retain(map: &Map<String, Value>, keep: impl Fn(&str, &Value) -> bool) -> Value {
    Value::Object(
        map.iter()
            .filter(|(k, v)| keep(k.as_str(), v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    )
}

/// Group a list of objects by the value of `key`
///
/// Returns `[[label, [items...]], ...]` in order of first appearance.
pub fn group_by(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let items = value_array("group_by", value)?;
    let key = str_arg("group_by", args, "key")?;

    let mut groups: IndexMap<String, Vec<Value>> = IndexMap::new();
    for item in items {
        let label = match item.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => UNLABELED.to_string(),
            Some(other) => other.to_string(),
        };
        groups.entry(label).or_default().push(item.clone());
    }

    Ok(Value::Array(
        groups
            .into_iter()
            .map(|(label, members)| Value::Array(vec![Value::String(label), Value::Array(members)]))
            .collect(),
    ))
}

/// Order map entries by the position of their key in `reflist`
///
/// Returns `[[key, value], ...]`; keys absent from `reflist` are dropped.
pub fn sort_dict_keys_from_reflist(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let map = value_object("sort_dict_keys_from_reflist", value)?;
    let reflist = array_arg("sort_dict_keys_from_reflist", args, "reflist")?;
    Ok(Value::Array(
        reflist
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|k| map.get(k).map(|v| pair(k, v)))
            .collect(),
    ))
}

/// Order map entries by the position of their value in `reflist`
///
/// Returns `[[key, value], ...]`; entries whose value is absent from
/// `reflist` are dropped.
pub fn sort_dict_vals_from_reflist(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let map = value_object("sort_dict_vals_from_reflist", value)?;
    let reflist = array_arg("sort_dict_vals_from_reflist", args, "reflist")?;

    let mut ranked: Vec<(usize, &String, &Value)> = map
        .iter()
        .filter_map(|(k, v)| reflist.iter().position(|r| r == v).map(|pos| (pos, k, v)))
        .collect();
    ranked.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    Ok(Value::Array(
        ranked.into_iter().map(|(_, k, v)| pair(k, v)).collect(),
    ))
}

fn pair(key: &str, value: &Value) -> Value {
    Value::Array(vec![Value::String(key.to_string()), value.clone()])
}

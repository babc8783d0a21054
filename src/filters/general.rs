//! General purpose string and value filters
//!
//! These are also registered as template globals by
//! [`config_globals`](super::config_globals).

use super::{Catalogue, opt_i64_arg, opt_str_arg, str_arg, value_array, value_str};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tera::{Error, Result, Value};

pub const CATALOGUE: Catalogue = &[
    ("camel2hyphen", camel2hyphen),
    ("to_json", to_json),
    ("questionize_label", questionize_label),
    ("add", add),
    ("cut", cut),
    ("addslashes", addslashes),
    ("default_if_none", default_if_none),
    ("get_digit", get_digit),
    ("length_is", length_is),
    ("is_url", is_url),
    ("ljust", ljust),
    ("rjust", rjust),
    ("make_list", make_list),
    ("phone2numeric", phone2numeric),
    ("greet", greet),
    ("islist", islist),
    ("str2dict", str2dict),
    ("firstof", firstof),
];

static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(https?|ftp)://[^\s/$.?#][^\s]*$").expect("valid regex"));

/// `camelCaseWord` -> `camel-case-word`
pub fn camel2hyphen(value: &Value, _: &HashMap<String, Value>) -> Result<Value> {
    let s = value_str("camel2hyphen", value)?;
    Ok(Value::String(
        CAMEL_BOUNDARY.replace_all(s, "$1-$2").to_lowercase(),
    ))
}

pub fn to_json(value: &Value, _: &HashMap<String, Value>) -> Result<Value> {
    serde_json::to_string(value)
        .map(Value::String)
        .map_err(|e| Error::msg(format!("Filter `to_json` failed: {}", e)))
}

/// Turn a boolean field name into a question: `is_active` -> `active?`,
/// `has_owner` -> `has owner?`
pub fn questionize_label(value: &Value, _: &HashMap<String, Value>) -> Result<Value> {
    let s = value_str("questionize_label", value)?;
    if s.is_empty() {
        return Ok(Value::String(String::new()));
    }
    let label = if let Some(rest) = s.strip_prefix("is_") {
        rest.to_string()
    } else if let Some(rest) = s.strip_prefix("has_") {
        format!("has {}", rest)
    } else {
        s.to_string()
    };
    let label = label.replace('_', " ");
    if label.ends_with('?') {
        Ok(Value::String(label))
    } else {
        Ok(Value::String(format!("{}?", label)))
    }
}

/// Add `amount` to a number, or concatenate two strings
pub fn add(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let amount = args
        .get("amount")
        .ok_or_else(|| Error::msg("Filter `add` requires argument `amount`"))?;

    match (value, amount) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => Ok(Value::from(a.saturating_add(b))),
            _ => {
                let sum = a.as_f64().unwrap_or_default() + b.as_f64().unwrap_or_default();
                Ok(Value::from(sum))
            }
        },
        (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
        (Value::Array(a), Value::Array(b)) => {
            Ok(Value::Array(a.iter().chain(b.iter()).cloned().collect()))
        }
        _ => Err(Error::msg(
            "Filter `add` expects two numbers, two strings or two arrays",
        )),
    }
}

/// Remove every occurrence of `arg`
pub fn cut(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let s = value_str("cut", value)?;
    let needle = str_arg("cut", args, "arg")?;
    Ok(Value::String(s.replace(needle, "")))
}

/// Backslash-escape quotes and backslashes
pub fn addslashes(value: &Value, _: &HashMap<String, Value>) -> Result<Value> {
    let s = value_str("addslashes", value)?;
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '\'' | '"') {
            out.push('\\');
        }
        out.push(c);
    }
    Ok(Value::String(out))
}

pub fn default_if_none(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    if value.is_null() {
        Ok(args.get("default").cloned().unwrap_or(Value::Null))
    } else {
        Ok(value.clone())
    }
}

/// The `digit`-th digit from the right (1-based); anything invalid returns
/// the input unchanged
pub fn get_digit(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let (Some(number), Some(digit)) = (value.as_i64(), opt_i64_arg("get_digit", args, "digit")?)
    else {
        return Ok(value.clone());
    };
    if digit < 1 {
        return Ok(value.clone());
    }
    let digits = number.unsigned_abs().to_string();
    let Ok(index) = usize::try_from(digit) else {
        return Ok(value.clone());
    };
    if index > digits.len() {
        return Ok(Value::from(0));
    }
    let c = digits.as_bytes()[digits.len() - index];
    Ok(Value::from(i64::from(c - b'0')))
}

pub fn length_is(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let expected = opt_i64_arg("length_is", args, "length")?
        .ok_or_else(|| Error::msg("Filter `length_is` requires argument `length`"))?;
    let len = match value {
        Value::String(s) => s.chars().count(),
        Value::Array(a) => a.len(),
        Value::Object(o) => o.len(),
        _ => return Ok(Value::Bool(false)),
    };
    Ok(Value::Bool(i64::try_from(len).is_ok_and(|len| len == expected)))
}

pub fn is_url(value: &Value, _: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::Bool(value.as_str().is_some_and(|s| URL.is_match(s))))
}

fn pad_args(filter: &str, args: &HashMap<String, Value>) -> Result<(usize, char)> {
    let width = opt_i64_arg(filter, args, "width")?
        .ok_or_else(|| Error::msg(format!("Filter `{}` requires argument `width`", filter)))?;
    let fill = opt_str_arg(filter, args, "fillchar")?
        .and_then(|s| s.chars().next())
        .unwrap_or(' ');
    Ok((usize::try_from(width).unwrap_or(0), fill))
}

/// Left-justify in a field of `width` characters
pub fn ljust(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let s = value_str("ljust", value)?;
    let (width, fill) = pad_args("ljust", args)?;
    let pad = width.saturating_sub(s.chars().count());
    Ok(Value::String(format!(
        "{}{}",
        s,
        std::iter::repeat_n(fill, pad).collect::<String>()
    )))
}

/// Right-justify in a field of `width` characters
pub fn rjust(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let s = value_str("rjust", value)?;
    let (width, fill) = pad_args("rjust", args)?;
    let pad = width.saturating_sub(s.chars().count());
    Ok(Value::String(format!(
        "{}{}",
        std::iter::repeat_n(fill, pad).collect::<String>(),
        s
    )))
}

/// Split a string (or the digits of a number) into a list of characters
pub fn make_list(value: &Value, _: &HashMap<String, Value>) -> Result<Value> {
    let chars = |s: &str| {
        Value::Array(
            s.chars()
                .map(|c| Value::String(c.to_string()))
                .collect(),
        )
    };
    match value {
        Value::Array(_) => Ok(value.clone()),
        Value::String(s) => Ok(chars(s)),
        Value::Number(n) => Ok(chars(&n.to_string())),
        _ => Err(Error::msg(
            "Filter `make_list` expects a string, number or array",
        )),
    }
}

/// Convert phone keypad letters to digits: `1-800-COLLECT` -> `1-800-2655328`
pub fn phone2numeric(value: &Value, _: &HashMap<String, Value>) -> Result<Value> {
    let s = value_str("phone2numeric", value)?;
    let converted = s
        .chars()
        .map(|c| match c.to_ascii_lowercase() {
            'a' | 'b' | 'c' => '2',
            'd' | 'e' | 'f' => '3',
            'g' | 'h' | 'i' => '4',
            'j' | 'k' | 'l' => '5',
            'm' | 'n' | 'o' => '6',
            'p' | 'q' | 'r' | 's' => '7',
            't' | 'u' | 'v' => '8',
            'w' | 'x' | 'y' | 'z' => '9',
            _ => c,
        })
        .collect();
    Ok(Value::String(converted))
}

pub fn greet(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let name = value_str("greet", value)?;
    let greeting = opt_str_arg("greet", args, "greeting")?.unwrap_or("Hello");
    Ok(Value::String(format!("{}, {}!", greeting, name)))
}

pub fn islist(value: &Value, _: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::Bool(value.is_array()))
}

/// Parse a JSON object literal
pub fn str2dict(value: &Value, _: &HashMap<String, Value>) -> Result<Value> {
    let s = value_str("str2dict", value)?;
    match serde_json::from_str::<Value>(s) {
        Ok(parsed @ Value::Object(_)) => Ok(parsed),
        Ok(_) => Err(Error::msg("Filter `str2dict` expects a JSON object")),
        Err(e) => Err(Error::msg(format!("Filter `str2dict` failed: {}", e))),
    }
}

/// First truthy entry of a list, or null
pub fn firstof(value: &Value, _: &HashMap<String, Value>) -> Result<Value> {
    let items = value_array("firstof", value)?;
    Ok(items
        .iter()
        .find(|item| is_truthy(item))
        .cloned()
        .unwrap_or(Value::Null))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

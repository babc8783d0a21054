//! Date and time filters built on chrono

use super::{Catalogue, opt_str_arg, str_arg, value_str};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use tera::{Error, Result, Value};

pub const CATALOGUE: Catalogue = &[
    ("str2dt", str2dt),
    ("dt_format", dt_format),
    ("days_between", days_between),
];

/// ISO-8601 output format used by [`str2dt`]
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const FALLBACK_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse with an explicit format, or try RFC 3339 and the common ISO shapes
fn parse(filter: &str, input: &str, fmt: Option<&str>) -> Result<NaiveDateTime> {
    let input = input.trim();
    let parsed = match fmt {
        Some(fmt) => NaiveDateTime::parse_from_str(input, fmt).ok().or_else(|| {
            NaiveDate::parse_from_str(input, fmt)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        }),
        None => DateTime::parse_from_rfc3339(input)
            .map(|dt| dt.naive_utc())
            .ok()
            .or_else(|| {
                FALLBACK_FORMATS
                    .iter()
                    .find_map(|f| NaiveDateTime::parse_from_str(input, f).ok())
            })
            .or_else(|| {
                NaiveDate::parse_from_str(input, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            }),
    };
    parsed.ok_or_else(|| {
        Error::msg(format!(
            "Filter `{}` could not parse `{}` as a date",
            filter, input
        ))
    })
}

/// Normalise a date string to `YYYY-MM-DDTHH:MM:SS`
pub fn str2dt(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let input = value_str("str2dt", value)?;
    let fmt = opt_str_arg("str2dt", args, "fmt")?;
    let dt = parse("str2dt", input, fmt)?;
    Ok(Value::String(dt.format(ISO_FORMAT).to_string()))
}

/// Reformat a date string with a strftime pattern (default `%Y-%m-%d`)
pub fn dt_format(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let input = value_str("dt_format", value)?;
    let fmt = opt_str_arg("dt_format", args, "fmt")?.unwrap_or("%Y-%m-%d");
    let dt = parse("dt_format", input, None)?;

    let mut out = String::new();
    std::fmt::Write::write_fmt(&mut out, format_args!("{}", dt.format(fmt)))
        .map_err(|_| Error::msg(format!("Filter `dt_format` got invalid format `{}`", fmt)))?;
    Ok(Value::String(out))
}

/// Whole days from the input date to `other`
pub fn days_between(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let start = parse("days_between", value_str("days_between", value)?, None)?;
    let end = parse("days_between", str_arg("days_between", args, "other")?, None)?;
    Ok(Value::from((end - start).num_days()))
}

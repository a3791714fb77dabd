//! Field coercion between raw JSON values and typed field values.
//!
//! Reads are lenient: a value of the wrong JSON type coerces to "absent"
//! (or `false` for booleans), never to an error. Writes are strict: a
//! value is shaped for the server using the field metadata advertised by
//! the create/edit-metadata endpoints, and unknown fields or
//! unrecognizable metadata fail with
//! [`Error::MalformedMetadata`](crate::Error::MalformedMetadata).

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Map, Value};

use crate::error::{Error, Result};

/// Timestamp pattern used by JIRA for datetime fields.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Pattern used by JIRA for date-only fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// Well-known issue field names.
pub const ASSIGNEE: &str = "assignee";
pub const COMPONENTS: &str = "components";
pub const DESCRIPTION: &str = "description";
pub const DUE_DATE: &str = "duedate";
pub const FIX_VERSIONS: &str = "fixVersions";
pub const ISSUE_TYPE: &str = "issuetype";
pub const LABELS: &str = "labels";
pub const PARENT: &str = "parent";
pub const PRIORITY: &str = "priority";
pub const PROJECT: &str = "project";
pub const REPORTER: &str = "reporter";
pub const SUMMARY: &str = "summary";

/// Coerce a JSON value to a string.
///
/// Returns the value as-is if it is a string, `None` otherwise.
pub fn string_of(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

/// Coerce a JSON value to an integer.
///
/// Non-numeric input yields `None`, so an absent duration is
/// distinguishable from a real zero.
pub fn integer_of(value: &Value) -> Option<i64> {
    value.as_i64()
}

/// Coerce a JSON value to a float.
pub fn float_of(value: &Value) -> Option<f64> {
    value.as_f64()
}

/// Coerce a JSON value to a boolean.
///
/// Only the JSON boolean `true` yields `true`; everything else,
/// including the string `"true"`, is `false`.
pub fn boolean_of(value: &Value) -> bool {
    matches!(value, Value::Bool(true))
}

/// Parse a JSON value as a JIRA datetime.
///
/// Unparseable or non-string input yields `None`, not an error.
pub fn datetime_of(value: &Value) -> Option<DateTime<FixedOffset>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_str(s, DATETIME_FORMAT).ok())
}

/// Parse a JSON value as a JIRA date.
pub fn date_of(value: &Value) -> Option<NaiveDate> {
    value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
}

/// Coerce a JSON value to a list of strings, dropping non-string items.
pub fn string_array_of(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(|v| v.as_str().map(str::to_owned)).collect())
        .unwrap_or_default()
}

// serde adapters exposing the same coercions to derived entities.

pub(crate) fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(string_of(&value))
}

pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(integer_of(&value))
}

pub(crate) fn strict_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(boolean_of(&value))
}

pub(crate) fn lenient_datetime<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(datetime_of(&value))
}

pub(crate) fn lenient_date<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(date_of(&value))
}

/// Parse a JSON value as an ISO-8601 datetime, accepting both the
/// RFC 3339 offsets the agile API emits (`+10:00`) and the compact
/// offsets of the core API (`+1000`).
pub fn iso_datetime_of(value: &Value) -> Option<DateTime<FixedOffset>> {
    let s = value.as_str()?;
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, DATETIME_FORMAT))
        .ok()
}

pub(crate) fn lenient_iso_datetime<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(iso_datetime_of(&value))
}

pub(crate) fn lenient_strings<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(string_array_of(&value))
}

/// Deserialize a nested entity, yielding `None` on a shape mismatch.
pub(crate) fn lenient_entity<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Deserialize an entity array, yielding an empty list on mismatch and
/// dropping undeserializable items.
pub(crate) fn lenient_entities<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// One step of an update verb list applied to a multi-valued field.
#[derive(Debug, Clone)]
pub struct Operation {
    /// The update verb: "add", "remove", or "set".
    pub verb: &'static str,
    /// The value the verb applies to, shaped later against metadata.
    pub value: Value,
}

/// Shape a caller-supplied value for a write request.
///
/// `metadata` is the field map advertised by the create- or
/// edit-metadata endpoint; it decides the JSON representation the server
/// expects for the named field. Reference-typed fields (project,
/// issuetype, priority, ...) wrap plain strings as `{"name": value}`.
///
/// # Errors
///
/// Fails with `Error::MalformedMetadata` when the field is absent from
/// the metadata or the advertised schema is unrecognizable.
pub fn to_json(name: &str, value: &Value, metadata: &Value) -> Result<Value> {
    let schema = field_schema(name, metadata)?;
    let type_name = schema
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(name, "schema has no type"))?;

    shape(name, value, type_name, schema)
}

/// Shape an ordered operation list into the server's update form:
/// `[{"add": v}, {"remove": v}, ...]` with each value shaped per the
/// field's item type.
pub fn operations_to_json(name: &str, operations: &[Operation], metadata: &Value) -> Result<Value> {
    let schema = field_schema(name, metadata)?;
    let item_type = match schema.get("type").and_then(Value::as_str) {
        Some("array") => schema
            .get("items")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed(name, "array schema has no item type"))?,
        Some(other) => other,
        None => return Err(malformed(name, "schema has no type")),
    };

    let shaped = operations
        .iter()
        .map(|op| {
            let value = shape(name, &op.value, item_type, schema)?;
            let mut step = Map::new();
            step.insert(op.verb.to_string(), value);
            Ok(Value::Object(step))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Value::Array(shaped))
}

fn field_schema<'a>(name: &str, metadata: &'a Value) -> Result<&'a Value> {
    let field = metadata
        .get(name)
        .ok_or_else(|| malformed(name, "field is not present in metadata"))?;

    field
        .get("schema")
        .filter(|schema| schema.is_object())
        .ok_or_else(|| malformed(name, "field metadata has no schema"))
}

fn shape(name: &str, value: &Value, type_name: &str, schema: &Value) -> Result<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    match type_name {
        "string" | "any" | "number" | "date" | "datetime" | "timetracking" => Ok(value.clone()),
        "array" => {
            let item_type = schema
                .get("items")
                .and_then(Value::as_str)
                .ok_or_else(|| malformed(name, "array schema has no item type"))?;

            // A bare value is promoted to a one-element list.
            let items = match value {
                Value::Array(items) => items.clone(),
                other => vec![other.clone()],
            };

            let shaped = items
                .iter()
                .map(|item| shape(name, item, item_type, schema))
                .collect::<Result<Vec<_>>>()?;

            Ok(Value::Array(shaped))
        }
        "issuetype" | "priority" | "user" | "project" | "version" | "component" | "resolution"
        | "securitylevel" | "status" | "group" => match value {
            Value::String(s) => Ok(json!({ "name": s })),
            Value::Number(n) => Ok(json!({ "id": n.to_string() })),
            Value::Object(_) => Ok(value.clone()),
            _ => Err(malformed(
                name,
                &format!("cannot shape {} as '{}'", value, type_name),
            )),
        },
        "option" => match value {
            Value::String(s) => Ok(json!({ "value": s })),
            Value::Object(_) => Ok(value.clone()),
            _ => Err(malformed(
                name,
                &format!("cannot shape {} as an option", value),
            )),
        },
        other => Err(malformed(name, &format!("unrecognized field type '{}'", other))),
    }
}

fn malformed(field: &str, detail: &str) -> Error {
    Error::MalformedMetadata {
        field: field.to_string(),
        detail: detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> Value {
        json!({
            "summary": { "schema": { "type": "string", "system": "summary" } },
            "priority": { "schema": { "type": "priority", "system": "priority" } },
            "assignee": { "schema": { "type": "user", "system": "assignee" } },
            "duedate": { "schema": { "type": "date", "system": "duedate" } },
            "labels": { "schema": { "type": "array", "items": "string", "system": "labels" } },
            "fixVersions": { "schema": { "type": "array", "items": "version", "system": "fixVersions" } },
            "customfield_10500": {
                "schema": {
                    "type": "option",
                    "custom": "com.atlassian.jira.plugin.system.customfieldtypes:select"
                }
            },
            "broken": { "schema": { "type": "hologram" } },
            "schemaless": { "name": "Schemaless" }
        })
    }

    #[test]
    fn test_boolean_exact_type_match_only() {
        assert!(boolean_of(&json!(true)));
        assert!(!boolean_of(&json!("true")));
        assert!(!boolean_of(&json!(false)));
        assert!(!boolean_of(&json!(1)));
        assert!(!boolean_of(&Value::Null));
    }

    #[test]
    fn test_string_of_rejects_non_strings() {
        assert_eq!(string_of(&json!("summary text")), Some("summary text".to_string()));
        assert_eq!(string_of(&json!(42)), None);
        assert_eq!(string_of(&Value::Null), None);
    }

    #[test]
    fn test_integer_of_absent_is_none_not_zero() {
        assert_eq!(integer_of(&json!(0)), Some(0));
        assert_eq!(integer_of(&json!(3600)), Some(3600));
        assert_eq!(integer_of(&Value::Null), None);
        assert_eq!(integer_of(&json!("3600")), None);
    }

    #[test]
    fn test_datetime_of_parses_jira_timestamps() {
        let parsed = datetime_of(&json!("2024-01-15T10:30:00.000+0000")).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-01-15T10:30:00+00:00");
    }

    #[test]
    fn test_datetime_of_unparseable_is_none() {
        assert_eq!(datetime_of(&json!("January 15th")), None);
        assert_eq!(datetime_of(&Value::Null), None);
        assert_eq!(datetime_of(&json!(1705314600)), None);
    }

    #[test]
    fn test_date_of_parses_date_only() {
        let parsed = date_of(&json!("2024-03-01")).unwrap();
        assert_eq!(parsed.to_string(), "2024-03-01");
        assert_eq!(date_of(&json!("03/01/2024")), None);
    }

    #[test]
    fn test_string_array_of_drops_non_strings() {
        assert_eq!(
            string_array_of(&json!(["backend", 7, "urgent"])),
            vec!["backend".to_string(), "urgent".to_string()]
        );
        assert!(string_array_of(&json!("backend")).is_empty());
    }

    #[test]
    fn test_to_json_string_field_passes_through() {
        let shaped = to_json("summary", &json!("Fix the flux capacitor"), &metadata()).unwrap();
        assert_eq!(shaped, json!("Fix the flux capacitor"));
    }

    #[test]
    fn test_to_json_wraps_reference_typed_fields() {
        let shaped = to_json("priority", &json!("High"), &metadata()).unwrap();
        assert_eq!(shaped, json!({ "name": "High" }));

        let shaped = to_json("assignee", &json!("fred"), &metadata()).unwrap();
        assert_eq!(shaped, json!({ "name": "fred" }));
    }

    #[test]
    fn test_to_json_reference_object_passes_through() {
        let shaped = to_json("priority", &json!({ "id": "2" }), &metadata()).unwrap();
        assert_eq!(shaped, json!({ "id": "2" }));
    }

    #[test]
    fn test_to_json_array_shapes_items() {
        let shaped = to_json("fixVersions", &json!(["1.0", "1.1"]), &metadata()).unwrap();
        assert_eq!(shaped, json!([{ "name": "1.0" }, { "name": "1.1" }]));

        // bare values promote to one-element lists
        let shaped = to_json("labels", &json!("backend"), &metadata()).unwrap();
        assert_eq!(shaped, json!(["backend"]));
    }

    #[test]
    fn test_to_json_select_option_wraps_value() {
        let shaped = to_json("customfield_10500", &json!("Blue"), &metadata()).unwrap();
        assert_eq!(shaped, json!({ "value": "Blue" }));
    }

    #[test]
    fn test_to_json_unknown_field_is_malformed_metadata() {
        let err = to_json("nope", &json!("x"), &metadata()).unwrap_err();
        assert!(matches!(err, Error::MalformedMetadata { ref field, .. } if field == "nope"));
    }

    #[test]
    fn test_to_json_schemaless_field_is_malformed_metadata() {
        let err = to_json("schemaless", &json!("x"), &metadata()).unwrap_err();
        assert!(matches!(err, Error::MalformedMetadata { .. }));
    }

    #[test]
    fn test_to_json_unrecognized_type_is_malformed_metadata() {
        let err = to_json("broken", &json!("x"), &metadata()).unwrap_err();
        assert!(
            matches!(err, Error::MalformedMetadata { ref detail, .. }
                if detail.contains("hologram"))
        );
    }

    #[test]
    fn test_operations_to_json_shapes_each_verb() {
        let operations = vec![
            Operation { verb: "add", value: json!("triage") },
            Operation { verb: "remove", value: json!("backlog") },
        ];

        let shaped = operations_to_json("labels", &operations, &metadata()).unwrap();
        assert_eq!(shaped, json!([{ "add": "triage" }, { "remove": "backlog" }]));
    }

    #[test]
    fn test_operations_to_json_wraps_reference_items() {
        let operations = vec![Operation { verb: "add", value: json!("2.0") }];

        let shaped = operations_to_json("fixVersions", &operations, &metadata()).unwrap();
        assert_eq!(shaped, json!([{ "add": { "name": "2.0" } }]));
    }
}

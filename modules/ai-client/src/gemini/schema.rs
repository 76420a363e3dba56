use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Keywords Gemini's `responseSchema` (an OpenAPI 3.0 subset) rejects.
const UNSUPPORTED_KEYWORDS: &[&str] = &[
    "$schema",
    "$id",
    "definitions",
    "title",
    "additionalProperties",
    "default",
    "examples",
];

/// Trait for types that can be used as Gemini structured output.
///
/// Automatically implemented for any type that implements `JsonSchema + DeserializeOwned`.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Generate a Gemini-compatible response schema for this type.
    ///
    /// Gemini requires:
    /// 1. Fully inlined schemas (no `$ref` references)
    /// 2. Upper-case OpenAPI type names (`OBJECT`, `ARRAY`, `STRING`, ...)
    /// 3. `nullable: true` instead of `["T", "null"]` type unions
    fn gemini_schema() -> Value {
        let schema = schema_for!(Self);
        let mut value = serde_json::to_value(schema).unwrap_or_default();

        inline_refs(&mut value);
        to_openapi_subset(&mut value);

        value
    }

    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

fn inline_refs(value: &mut Value) {
    let definitions = if let Value::Object(map) = value {
        map.get("definitions").cloned()
    } else {
        None
    };

    if let Some(defs) = definitions {
        inline_refs_recursive(value, &defs);
    }
}

fn inline_refs_recursive(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(ref_path)) = map.get("$ref").cloned() {
                if let Some(type_name) = ref_path.strip_prefix("#/definitions/") {
                    if let Some(def) = definitions.get(type_name) {
                        let description = map.get("description").cloned();
                        *value = def.clone();
                        carry_description(value, description);
                        inline_refs_recursive(value, definitions);
                        return;
                    }
                }
            }

            if let Some(Value::Array(all_of)) = map.get("allOf").cloned() {
                if all_of.len() == 1 {
                    let description = map.get("description").cloned();
                    if let Some(single) = all_of.into_iter().next() {
                        *value = single;
                        carry_description(value, description);
                    }
                    inline_refs_recursive(value, definitions);
                    return;
                }
            }

            for (_, v) in map.iter_mut() {
                inline_refs_recursive(v, definitions);
            }
        }
        Value::Array(arr) => {
            for item in arr.iter_mut() {
                inline_refs_recursive(item, definitions);
            }
        }
        _ => {}
    }
}

/// Field docs live next to the `$ref`, not in the definition; keep them.
fn carry_description(value: &mut Value, description: Option<Value>) {
    if let (Some(description), Value::Object(inlined)) = (description, value) {
        inlined.insert("description".to_string(), description);
    }
}

fn to_openapi_subset(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for keyword in UNSUPPORTED_KEYWORDS {
                map.remove(*keyword);
            }

            collapse_nullable_any_of(map);
            merge_enum_variants(map);
            normalize_type(map);

            if let Some(Value::Object(properties)) = map.get_mut("properties") {
                for (_, property) in properties.iter_mut() {
                    to_openapi_subset(property);
                }
            }
            for keyword in ["items", "anyOf"] {
                if let Some(child) = map.get_mut(keyword) {
                    to_openapi_subset(child);
                }
            }
        }
        Value::Array(arr) => {
            for item in arr.iter_mut() {
                to_openapi_subset(item);
            }
        }
        _ => {}
    }
}

/// `anyOf: [{...}, {"type": "null"}]` (how schemars renders `Option<Struct>`)
/// becomes the non-null branch marked `nullable`.
fn collapse_nullable_any_of(map: &mut Map<String, Value>) {
    let replacement = {
        let Some(Value::Array(branches)) = map.get("anyOf") else {
            return;
        };

        let mut non_null = branches
            .iter()
            .filter(|branch| branch.get("type").and_then(Value::as_str) != Some("null"));
        match (non_null.next(), non_null.next()) {
            (Some(only), None) if branches.len() > 1 => only.clone(),
            _ => return,
        }
    };

    if let Value::Object(inner) = replacement {
        map.remove("anyOf");
        for (key, val) in inner {
            map.entry(key).or_insert(val);
        }
        map.insert("nullable".to_string(), Value::Bool(true));
    }
}

/// schemars renders a unit enum with documented variants as a `oneOf` of
/// single-value string enums; Gemini wants one flat `enum`.
fn merge_enum_variants(map: &mut Map<String, Value>) {
    let Some(Value::Array(variants)) = map.get("oneOf") else {
        return;
    };

    let mut values = Vec::new();
    for variant in variants {
        match variant.get("enum") {
            Some(Value::Array(options)) if options.iter().all(Value::is_string) => {
                values.extend(options.iter().cloned());
            }
            _ => return,
        }
    }

    map.remove("oneOf");
    map.insert("type".to_string(), Value::String("string".to_string()));
    map.insert("enum".to_string(), Value::Array(values));
}

fn normalize_type(map: &mut Map<String, Value>) {
    let normalized = match map.get("type") {
        Some(Value::String(name)) => Some((name.to_uppercase(), false)),
        Some(Value::Array(names)) => {
            let nullable = names.iter().any(|n| n == "null");
            names
                .iter()
                .filter_map(Value::as_str)
                .find(|n| *n != "null")
                .map(|n| (n.to_uppercase(), nullable))
        }
        _ => None,
    };

    if let Some((name, nullable)) = normalized {
        map.insert("type".to_string(), Value::String(name));
        if nullable {
            map.insert("nullable".to_string(), Value::Bool(true));
        }
    }
}

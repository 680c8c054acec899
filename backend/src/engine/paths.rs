// backend/src/engine/paths.rs
use common::model::field_path::FieldPath;
use common::model::mapping::MappingSet;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Flattens `data` into `(path, leaf)` pairs.
///
/// Object keys are joined with `.` and array elements are marked as
/// `field[idx]`, e.g. `results[0].title`.
pub fn leaf_paths(data: &Value) -> Vec<(String, &Value)> {
    let mut out = Vec::new();
    if let Value::Object(map) = data {
        collect_object(map, "", &mut out);
    }
    out
}

fn collect_object<'a>(map: &'a Map<String, Value>, prefix: &str, out: &mut Vec<(String, &'a Value)>) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        collect(value, path, out);
    }
}

fn collect<'a>(value: &'a Value, path: String, out: &mut Vec<(String, &'a Value)>) {
    match value {
        Value::Object(map) => collect_object(map, &path, out),
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                collect(item, format!("{}[{}]", path, idx), out);
            }
        }
        leaf => out.push((path, leaf)),
    }
}

/// Number of whitespace separated words of every string leaf. Leaves without
/// words are left out.
pub fn word_counts(data: &Value) -> BTreeMap<String, usize> {
    leaf_paths(data)
        .into_iter()
        .filter_map(|(path, value)| {
            let words = value.as_str()?.split_whitespace().count();
            (words > 0).then_some((path, words))
        })
        .collect()
}

/// Sets the leaf at `path`, creating intermediate objects. A non-object value
/// standing where an object is needed is replaced.
pub fn set_path(data: &mut Value, path: &FieldPath, value: Value) {
    let mut current = data;
    for segment in path.segments() {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Some(map) = current.as_object_mut() else {
            return;
        };
        current = map.entry(segment.clone()).or_insert(Value::Null);
    }
    *current = value;
}

/// Data snapshot built from the literal contents captured with each mapping.
pub fn data_from_mappings(mappings: &MappingSet) -> Value {
    let mut data = Value::Object(Map::new());
    for mapping in mappings {
        set_path(
            &mut data,
            &mapping.field_path,
            Value::String(mapping.content.clone()),
        );
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::mapping::ElementMapping;
    use serde_json::json;

    #[test]
    fn flattens_with_array_markers() {
        let data = json!({
            "author": { "name": "Jane" },
            "results": [{ "title": "Faster" }, "plain"],
            "score": 5
        });
        let paths: Vec<String> = leaf_paths(&data).into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            paths,
            vec!["author.name", "results[0].title", "results[1]", "score"]
        );
    }

    #[test]
    fn counts_words_of_string_leaves() {
        let data = json!({
            "quote": "  This product changed   everything ",
            "author": { "name": "Jane Doe", "role": "" },
            "tags": ["one two", "three"],
            "rating": 5
        });
        let counts = word_counts(&data);
        assert_eq!(counts.get("quote"), Some(&4));
        assert_eq!(counts.get("author.name"), Some(&2));
        assert_eq!(counts.get("tags[0]"), Some(&2));
        assert_eq!(counts.get("tags[1]"), Some(&1));
        assert!(!counts.contains_key("author.role"));
        assert!(!counts.contains_key("rating"));
    }

    #[test]
    fn set_path_creates_intermediate_objects() {
        let mut data = json!({ "author": "flat" });
        set_path(&mut data, &FieldPath::parse("author.name").unwrap(), json!("Jane"));
        set_path(&mut data, &FieldPath::parse("title").unwrap(), json!("Hi"));
        assert_eq!(data, json!({ "author": { "name": "Jane" }, "title": "Hi" }));
    }

    #[test]
    fn snapshot_from_mappings() {
        let mappings = MappingSet::from_mappings([
            ElementMapping::text("el-3", FieldPath::parse("author.name").unwrap(), "Jane"),
            ElementMapping::text("el-4", FieldPath::parse("accentColor").unwrap(), "#112233"),
        ]);
        assert_eq!(
            data_from_mappings(&mappings),
            json!({ "author": { "name": "Jane" }, "accentColor": "#112233" })
        );
    }
}

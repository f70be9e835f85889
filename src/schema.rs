//! Schema documents and the on-disk loader.
//!
//! A contract publishes one JSON Schema file per message section (or a single
//! packed IDL bundle). The loader reads every `*.json` under the schema
//! directory, runs the [`crate::cleanse`] rename pass, and deserializes each
//! document into [`SchemaDocument`]. The resulting [`ContractSchemaSet`] is
//! immutable for the rest of the pipeline.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::cleanse::cleanse;
use crate::error::{GenError, Result};

/// One JSON Schema document. Only the fields the generator consumes are
/// modeled; unknown keys are ignored by serde.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SchemaDocument {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<TypeName>,
    pub properties: Option<IndexMap<String, SchemaDocument>>,
    pub items: Option<Box<Items>>,
    #[serde(rename = "oneOf")]
    pub one_of: Option<Vec<SchemaDocument>>,
    #[serde(rename = "anyOf")]
    pub any_of: Option<Vec<SchemaDocument>>,
    #[serde(rename = "allOf")]
    pub all_of: Option<Vec<SchemaDocument>>,
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    pub definitions: Option<IndexMap<String, SchemaDocument>>,
    pub required: Option<Vec<String>>,
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
}

/// `"type"` is usually a single name, but schemars emits lists like
/// `["integer", "null"]` for nullable scalars.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TypeName {
    One(String),
    Many(Vec<String>),
}

/// `items` is a single schema for lists, a schema list for tuples.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Items {
    One(SchemaDocument),
    Many(Vec<SchemaDocument>),
}

impl SchemaDocument {
    pub fn is_required(&self, field: &str) -> bool {
        self.required
            .as_ref()
            .is_some_and(|req| req.iter().any(|name| name == field))
    }
}

/// A schema document plus where it came from (file path, or
/// `<file>#<section>` for packed bundle entries). The origin is carried into
/// every error raised while processing the document.
#[derive(Debug, Clone)]
pub struct SchemaEntry {
    pub origin: String,
    pub doc: SchemaDocument,
}

/// The full, ordered schema collection for one contract.
#[derive(Debug, Clone)]
pub struct ContractSchemaSet {
    pub entries: Vec<SchemaEntry>,
}

const EXECUTE_TITLES: [&str; 3] = ["ExecuteMsg", "ExecuteMsg_for_Empty", "ExecuteMsgForEmpty"];
const QUERY_TITLES: [&str; 3] = ["QueryMsg", "QueryMsg_for_Empty", "QueryMsgForEmpty"];

impl ContractSchemaSet {
    /// Read every `*.json` under `schema_dir` (recursively). In packed mode
    /// exactly one file is expected, whose top level maps IDL section names
    /// to sub-schemas.
    pub fn from_dir(schema_dir: &Path, packed: bool) -> Result<Self> {
        let pattern = format!("{}/**/*.json", schema_dir.display());
        let mut files = Vec::new();
        for entry in glob::glob(&pattern).map_err(|source| GenError::BadPattern {
            pattern: pattern.clone(),
            source,
        })? {
            match entry {
                Ok(path) => files.push(path),
                Err(e) => {
                    return Err(GenError::ReadFile {
                        path: e.path().to_path_buf(),
                        source: e.into_error(),
                    });
                }
            }
        }

        if files.is_empty() {
            return Err(GenError::NoSchemas { dir: schema_dir.to_path_buf() });
        }

        if packed {
            if files.len() != 1 {
                return Err(GenError::PackedNotSingle {
                    dir: schema_dir.to_path_buf(),
                    count: files.len(),
                });
            }
            let origin = files[0].display().to_string();
            let bundle = cleanse(&read_json(&files[0])?);
            return Self::from_values(unpack(&origin, bundle)?);
        }

        let mut pairs = Vec::with_capacity(files.len());
        for path in &files {
            pairs.push((path.display().to_string(), read_json(path)?));
        }
        Self::from_values(pairs)
    }

    /// Build a set from in-memory `(origin, value)` pairs. Each value goes
    /// through the cleanse pass before deserialization, so callers may hand
    /// over raw exports.
    pub fn from_values(pairs: Vec<(String, Value)>) -> Result<Self> {
        let mut entries = Vec::with_capacity(pairs.len());
        for (origin, value) in pairs {
            let doc = into_schema(&origin, cleanse(&value))?;
            entries.push(SchemaEntry { origin, doc });
        }
        Ok(Self { entries })
    }

    pub fn find_execute_msg(&self) -> Option<&SchemaEntry> {
        self.find_by_titles(&EXECUTE_TITLES)
    }

    pub fn find_query_msg(&self) -> Option<&SchemaEntry> {
        self.find_by_titles(&QUERY_TITLES)
    }

    fn find_by_titles(&self, candidates: &[&str]) -> Option<&SchemaEntry> {
        self.entries.iter().find(|entry| {
            entry
                .doc
                .title
                .as_deref()
                .is_some_and(|title| candidates.contains(&title))
        })
    }

    /// Titles of all documents that look like query responses.
    pub fn response_titles(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|entry| entry.doc.title.clone())
            .filter(|title| title.contains("Response"))
            .collect()
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path).map_err(|source| GenError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let mut de = serde_json::Deserializer::from_str(&text);
    serde_path_to_error::deserialize(&mut de).map_err(|source| GenError::ParseJson {
        origin: path.display().to_string(),
        source,
    })
}

fn into_schema(origin: &str, value: Value) -> Result<SchemaDocument> {
    serde_path_to_error::deserialize(value).map_err(|source| GenError::ParseJson {
        origin: origin.to_string(),
        source,
    })
}

/// Flatten a packed IDL bundle into `(origin, schema)` pairs, in bundle
/// order. String metadata (`contract_name`, `idl_version`, ...) and null
/// sections are skipped; the `responses` section is a title→schema map and
/// is flattened entry-wise, defaulting each entry's title from its key.
pub(crate) fn unpack(origin: &str, bundle: Value) -> Result<Vec<(String, Value)>> {
    let Value::Object(sections) = bundle else {
        return Err(GenError::PackedNotObject { origin: origin.to_string() });
    };
    let mut out = Vec::new();
    for (section, value) in sections {
        match (section.as_str(), value) {
            ("responses", Value::Object(responses)) => {
                for (title, mut sub) in responses {
                    if let Value::Object(fields) = &mut sub {
                        if !fields.contains_key("title") {
                            fields.insert("title".to_string(), Value::String(title.clone()));
                        }
                        out.push((format!("{origin}#responses/{title}"), sub));
                    }
                }
            }
            (_, sub @ Value::Object(_)) => out.push((format!("{origin}#{section}"), sub)),
            // metadata strings and null/absent sections are not schemas
            _ => {}
        }
    }
    Ok(out)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn set_of(values: Vec<(&str, Value)>) -> ContractSchemaSet {
        ContractSchemaSet::from_values(
            values.into_iter().map(|(o, v)| (o.to_string(), v)).collect(),
        )
        .unwrap()
    }

    #[test]
    fn finds_messages_including_for_empty_aliases() {
        let set = set_of(vec![
            ("execute_msg.json", json!({ "title": "ExecuteMsg_for_Empty", "oneOf": [] })),
            ("query_msg.json", json!({ "title": "QueryMsg", "oneOf": [] })),
        ]);
        // cleanse collapses the `_for_` spelling before matching
        let exec = set.find_execute_msg().unwrap();
        assert_eq!(exec.doc.title.as_deref(), Some("ExecuteMsgForEmpty"));
        assert!(set.find_query_msg().is_some());
    }

    #[test]
    fn response_titles_filters_by_suffix() {
        let set = set_of(vec![
            ("count_response.json", json!({ "title": "CountResponse", "type": "object" })),
            ("state.json", json!({ "title": "State", "type": "object" })),
        ]);
        assert_eq!(set.response_titles(), vec!["CountResponse".to_string()]);
    }

    #[test]
    fn unpack_flattens_sections_and_responses_in_order() {
        let bundle = json!({
            "contract_name": "counter",
            "idl_version": "1.0.0",
            "instantiate": { "title": "InstantiateMsg", "type": "object" },
            "query": { "title": "QueryMsg", "oneOf": [] },
            "migrate": null,
            "responses": {
                "get_count": { "type": "object" },
                "CountResponse": { "title": "CountResponse", "type": "object" }
            }
        });
        let pairs = unpack("idl.json", bundle).unwrap();
        let origins: Vec<&str> = pairs.iter().map(|(o, _)| o.as_str()).collect();
        assert_eq!(
            origins,
            [
                "idl.json#instantiate",
                "idl.json#query",
                "idl.json#responses/get_count",
                "idl.json#responses/CountResponse",
            ]
        );
        // missing title is defaulted from the responses key
        assert_eq!(pairs[2].1["title"], "get_count");
        // present titles are kept
        assert_eq!(pairs[3].1["title"], "CountResponse");
    }

    #[test]
    fn unpack_rejects_non_object_bundles() {
        let err = unpack("idl.json", json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, GenError::PackedNotObject { .. }));
    }

    #[test]
    fn loader_reads_directories_and_reports_empty_ones() {
        let dir = std::env::temp_dir().join(format!("cw-typegen-loader-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let err = ContractSchemaSet::from_dir(&dir, false).unwrap_err();
        assert!(matches!(err, GenError::NoSchemas { .. }));

        std::fs::write(
            dir.join("query_msg.json"),
            serde_json::to_string(&json!({ "title": "QueryMsg", "oneOf": [] })).unwrap(),
        )
        .unwrap();
        std::fs::write(
            dir.join("count_response.json"),
            serde_json::to_string(&json!({ "title": "CountResponse", "type": "object" })).unwrap(),
        )
        .unwrap();

        let set = ContractSchemaSet::from_dir(&dir, false).unwrap();
        assert_eq!(set.entries.len(), 2);
        assert!(set.find_query_msg().is_some());

        // two files is one too many for packed mode
        let err = ContractSchemaSet::from_dir(&dir, true).unwrap_err();
        assert!(matches!(err, GenError::PackedNotSingle { count: 2, .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn type_names_deserialize_single_and_list_forms() {
        let doc: SchemaDocument =
            serde_json::from_value(json!({ "type": ["integer", "null"] })).unwrap();
        assert_eq!(
            doc.kind,
            Some(TypeName::Many(vec!["integer".to_string(), "null".to_string()]))
        );
        let doc: SchemaDocument = serde_json::from_value(json!({ "type": "string" })).unwrap();
        assert_eq!(doc.kind, Some(TypeName::One("string".to_string())));
    }
}

//! Message classification and response correlation.
//!
//! ExecuteMsg/QueryMsg documents are discriminated unions: each `oneOf`
//! member is an object schema with exactly one property, whose name is the
//! snake_case action and whose value schema carries the action's arguments.

use crate::casing::{camel, pascal};
use crate::error::{GenError, Result};
use crate::schema::{SchemaDocument, SchemaEntry};

/// One arm of a message union.
#[derive(Debug, Clone)]
pub struct MessageVariant {
    /// The action name, in its original snake_case wire form.
    pub discriminant: String,
    /// The action's argument schema (often an object with zero fields).
    pub args: SchemaDocument,
}

/// Extract the ordered variant list from a message document. The union
/// array is `oneOf`, else `anyOf`, else `allOf`, else empty: a message
/// with no union at all simply has no variants.
pub fn message_variants(entry: &SchemaEntry) -> Result<Vec<MessageVariant>> {
    let doc = &entry.doc;
    let title = doc.title.as_deref().unwrap_or("<untitled>");
    let (arms, union_key) = match (&doc.one_of, &doc.any_of, &doc.all_of) {
        (Some(arms), _, _) => (arms.as_slice(), "oneOf"),
        (None, Some(arms), _) => (arms.as_slice(), "anyOf"),
        (None, None, Some(arms)) => (arms.as_slice(), "allOf"),
        (None, None, None) => (&[] as &[SchemaDocument], "oneOf"),
    };

    let mut variants = Vec::with_capacity(arms.len());
    for (index, arm) in arms.iter().enumerate() {
        let path = format!("{title}/{union_key}/{index}");
        let props = arm
            .properties
            .as_ref()
            .filter(|props| props.len() == 1)
            .ok_or_else(|| GenError::SchemaShape {
                origin: entry.origin.clone(),
                path,
                reason: "message variant must be an object schema with exactly one property"
                    .to_string(),
            })?;
        let (discriminant, args) = props.first().expect("len checked above");
        variants.push(MessageVariant {
            discriminant: discriminant.clone(),
            args: args.clone(),
        });
    }
    Ok(variants)
}

/// Infer the response-type title for a query variant.
///
/// `get_count` camel-cases to `getCount`, giving candidate
/// `GetCountResponse`; if that title is unknown, a leading `get` is
/// stripped and `CountResponse` is tried once. An exhausted fallback is
/// fatal; emitting a reference to a type that does not exist would only
/// move the failure into the generated code's compiler.
pub fn correlate_response(discriminant: &str, known: &[String]) -> Result<String> {
    let method = camel(discriminant);
    let first = format!("{}Response", pascal(&method));
    if known.iter().any(|title| *title == first) {
        return Ok(first);
    }

    let mut candidates = vec![first];
    if let Some(stripped) = method.strip_prefix("get") {
        let second = format!("{}Response", pascal(stripped));
        if known.iter().any(|title| *title == second) {
            return Ok(second);
        }
        candidates.push(second);
    }

    Err(GenError::UnmatchedResponse {
        variant: discriminant.to_string(),
        candidates,
    })
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ContractSchemaSet;
    use serde_json::{json, Value};

    fn entry_of(value: Value) -> SchemaEntry {
        ContractSchemaSet::from_values(vec![("msg.json".to_string(), value)])
            .unwrap()
            .entries
            .remove(0)
    }

    #[test]
    fn variants_come_out_in_order_with_snake_discriminants() {
        let entry = entry_of(json!({
            "title": "ExecuteMsg",
            "oneOf": [
                { "type": "object", "properties": { "increment": { "type": "object" } }, "required": ["increment"] },
                { "type": "object", "properties": { "reset": { "type": "object", "properties": {
                    "count": { "type": "integer" }
                }, "required": ["count"] } }, "required": ["reset"] }
            ]
        }));
        let variants = message_variants(&entry).unwrap();
        let names: Vec<&str> = variants.iter().map(|v| v.discriminant.as_str()).collect();
        assert_eq!(names, ["increment", "reset"]);
        assert!(variants[1].args.properties.as_ref().unwrap().contains_key("count"));
    }

    #[test]
    fn any_of_is_accepted_as_the_union_array() {
        let entry = entry_of(json!({
            "title": "QueryMsg",
            "anyOf": [
                { "type": "object", "properties": { "get_count": { "type": "object" } } }
            ]
        }));
        let variants = message_variants(&entry).unwrap();
        assert_eq!(variants[0].discriminant, "get_count");
    }

    #[test]
    fn missing_union_means_no_variants() {
        let entry = entry_of(json!({ "title": "QueryMsg", "type": "object" }));
        assert!(message_variants(&entry).unwrap().is_empty());
    }

    #[test]
    fn non_single_key_member_is_fatal() {
        let entry = entry_of(json!({
            "title": "ExecuteMsg",
            "oneOf": [
                { "type": "object", "properties": {
                    "increment": { "type": "object" },
                    "reset": { "type": "object" }
                } }
            ]
        }));
        let err = message_variants(&entry).unwrap_err();
        assert!(matches!(err, GenError::SchemaShape { path, .. } if path == "ExecuteMsg/oneOf/0"));

        let entry = entry_of(json!({
            "title": "ExecuteMsg",
            "oneOf": [ { "type": "string", "enum": ["ping"] } ]
        }));
        assert!(message_variants(&entry).is_err());
    }

    #[test]
    fn correlates_exact_and_get_stripped_names() {
        let known = vec!["CountResponse".to_string(), "GetOwnerResponse".to_string()];
        assert_eq!(correlate_response("get_owner", &known).unwrap(), "GetOwnerResponse");
        assert_eq!(correlate_response("get_count", &known).unwrap(), "CountResponse");
        assert_eq!(correlate_response("count", &known).unwrap(), "CountResponse");
    }

    #[test]
    fn exhausted_fallback_is_fatal_and_names_both_candidates() {
        let known = vec!["CountResponse".to_string()];
        let err = correlate_response("get_balance", &known).unwrap_err();
        match err {
            GenError::UnmatchedResponse { variant, candidates } => {
                assert_eq!(variant, "get_balance");
                assert_eq!(candidates, ["GetBalanceResponse", "BalanceResponse"]);
            }
            other => panic!("expected UnmatchedResponse, got {other}"),
        }
    }
}

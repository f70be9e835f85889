//! Two-phase type resolution.
//!
//! Phase 1 walks the whole document set and registers every named schema
//! (each document under its `title`, each `definitions` entry under its map
//! key) in first-encounter order. Phase 2 resolves each registered body into
//! a [`ResolvedType`]. Because `$ref`s resolve to *names* against the phase-1
//! registry and are never inlined, forward and cyclic references cost
//! nothing and cannot recurse.

use indexmap::IndexMap;

use crate::error::{GenError, Result};
use crate::schema::{ContractSchemaSet, Items, SchemaDocument, TypeName};

#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedType {
    Primitive(Primitive),
    /// A string type constrained to a fixed set of literals.
    StringEnum(Vec<String>),
    ArrayOf(Box<ResolvedType>),
    /// List-form `items`: a fixed-arity heterogeneous array.
    Tuple(Vec<ResolvedType>),
    ObjectOf(Vec<FieldDef>),
    /// A named declaration, referenced by title.
    Reference(String),
    UnionOf(Vec<ResolvedType>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Number,
    Boolean,
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub ty: ResolvedType,
    pub required: bool,
}

/// A resolved declaration: `title` names it, `ty` is its body.
#[derive(Debug, Clone)]
pub struct NamedType {
    pub title: String,
    pub origin: String,
    pub ty: ResolvedType,
}

#[derive(Debug)]
pub struct TypeRegistry {
    named: IndexMap<String, (String, SchemaDocument)>,
}

impl TypeRegistry {
    /// Phase 1: register every named schema in first-encounter order.
    /// Identical re-definitions of a title deduplicate to the first one;
    /// structurally different bodies under one title are fatal.
    pub fn collect(set: &ContractSchemaSet) -> Result<Self> {
        let mut named: IndexMap<String, (String, SchemaDocument)> = IndexMap::new();
        for entry in &set.entries {
            let title = entry.doc.title.clone().ok_or_else(|| GenError::SchemaShape {
                origin: entry.origin.clone(),
                path: String::new(),
                reason: "top-level schema document has no title".to_string(),
            })?;
            register(&mut named, &title, &entry.origin, entry.doc.clone())?;

            if let Some(defs) = &entry.doc.definitions {
                for (key, def) in defs {
                    // definitions take their map key as title, the way the
                    // contract build step intends them to be referenced
                    let mut def = def.clone();
                    def.title = Some(key.clone());
                    register(&mut named, key, &entry.origin, def)?;
                }
            }
        }
        Ok(Self { named })
    }

    pub fn contains(&self, title: &str) -> bool {
        self.named.contains_key(title)
    }

    /// Phase 2: resolve every registered body, in registration order.
    pub fn resolve_all(&self) -> Result<Vec<NamedType>> {
        self.named
            .iter()
            .map(|(title, (origin, doc))| {
                let ty = self.resolve(doc, origin, title)?;
                Ok(NamedType {
                    title: title.clone(),
                    origin: origin.clone(),
                    ty,
                })
            })
            .collect()
    }

    /// Resolve one schema node. `path` locates the node inside its document
    /// for error reporting.
    pub fn resolve(&self, doc: &SchemaDocument, origin: &str, path: &str) -> Result<ResolvedType> {
        // $ref first: a reference resolves to its target's name, never to
        // the referencing node's own title.
        if let Some(reference) = &doc.reference {
            let title = ref_title(reference);
            if !self.named.contains_key(title) {
                return Err(GenError::UnresolvedReference {
                    reference: reference.clone(),
                    origin: origin.to_string(),
                    path: path.to_string(),
                });
            }
            return Ok(ResolvedType::Reference(title.to_string()));
        }

        // schemars wraps referenced types in a single-member allOf
        if let Some(all) = &doc.all_of {
            match all.as_slice() {
                [] => {}
                [inner] => return self.resolve(inner, origin, &format!("{path}/allOf/0")),
                _ => {
                    return Err(GenError::SchemaShape {
                        origin: origin.to_string(),
                        path: path.to_string(),
                        reason: "allOf with multiple members is not supported".to_string(),
                    });
                }
            }
        }

        if let Some(arms) = &doc.one_of {
            return self.resolve_union(arms, origin, path, "oneOf");
        }
        if let Some(arms) = &doc.any_of {
            return self.resolve_union(arms, origin, path, "anyOf");
        }

        let kind = match &doc.kind {
            Some(TypeName::One(name)) => Some(name.as_str()),
            _ => None,
        };

        if kind == Some("object") || doc.properties.is_some() {
            let mut fields = Vec::new();
            if let Some(props) = &doc.properties {
                for (name, prop) in props {
                    let ty = self.resolve(prop, origin, &format!("{path}/properties/{name}"))?;
                    fields.push(FieldDef {
                        name: name.clone(),
                        ty,
                        required: doc.is_required(name),
                    });
                }
            }
            return Ok(ResolvedType::ObjectOf(fields));
        }

        if kind == Some("array") {
            return match doc.items.as_deref() {
                Some(Items::One(item)) => Ok(ResolvedType::ArrayOf(Box::new(self.resolve(
                    item,
                    origin,
                    &format!("{path}/items"),
                )?))),
                Some(Items::Many(items)) => {
                    let elems = items
                        .iter()
                        .enumerate()
                        .map(|(i, item)| self.resolve(item, origin, &format!("{path}/items/{i}")))
                        .collect::<Result<Vec<_>>>()?;
                    Ok(ResolvedType::Tuple(elems))
                }
                None => Err(GenError::SchemaShape {
                    origin: origin.to_string(),
                    path: path.to_string(),
                    reason: "array schema without items".to_string(),
                }),
            };
        }

        match &doc.kind {
            Some(TypeName::One(name)) => return self.primitive(doc, name, origin, path),
            Some(TypeName::Many(names)) => {
                let members = names
                    .iter()
                    .map(|name| self.primitive(doc, name, origin, path))
                    .collect::<Result<Vec<_>>>()?;
                return Ok(ResolvedType::UnionOf(members));
            }
            None => {}
        }

        // enum without a type annotation: a bare literal set
        if doc.enum_values.is_some() {
            return Ok(ResolvedType::StringEnum(self.enum_literals(doc, origin, path)?));
        }

        // loose fallback: a schema with nothing but a title aliases the
        // declaration of that name
        if let Some(title) = &doc.title {
            return Ok(ResolvedType::Reference(title.clone()));
        }

        Err(GenError::SchemaShape {
            origin: origin.to_string(),
            path: path.to_string(),
            reason: "schema cannot be classified (no $ref, type, properties, or title)".to_string(),
        })
    }

    fn resolve_union(
        &self,
        arms: &[SchemaDocument],
        origin: &str,
        path: &str,
        key: &str,
    ) -> Result<ResolvedType> {
        let members = arms
            .iter()
            .enumerate()
            .map(|(i, arm)| self.resolve(arm, origin, &format!("{path}/{key}/{i}")))
            .collect::<Result<Vec<_>>>()?;
        Ok(ResolvedType::UnionOf(members))
    }

    fn primitive(
        &self,
        doc: &SchemaDocument,
        name: &str,
        origin: &str,
        path: &str,
    ) -> Result<ResolvedType> {
        match name {
            "string" => {
                if doc.enum_values.is_some() {
                    Ok(ResolvedType::StringEnum(self.enum_literals(doc, origin, path)?))
                } else {
                    Ok(ResolvedType::Primitive(Primitive::String))
                }
            }
            "integer" | "number" => Ok(ResolvedType::Primitive(Primitive::Number)),
            "boolean" => Ok(ResolvedType::Primitive(Primitive::Boolean)),
            "null" => Ok(ResolvedType::Primitive(Primitive::Null)),
            other => Err(GenError::SchemaShape {
                origin: origin.to_string(),
                path: path.to_string(),
                reason: format!("unknown type name `{other}`"),
            }),
        }
    }

    fn enum_literals(
        &self,
        doc: &SchemaDocument,
        origin: &str,
        path: &str,
    ) -> Result<Vec<String>> {
        doc.enum_values
            .as_ref()
            .map(|values| {
                values
                    .iter()
                    .map(|v| {
                        v.as_str().map(str::to_string).ok_or_else(|| GenError::SchemaShape {
                            origin: origin.to_string(),
                            path: path.to_string(),
                            reason: "enum with non-string members is not supported".to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

fn register(
    named: &mut IndexMap<String, (String, SchemaDocument)>,
    title: &str,
    origin: &str,
    doc: SchemaDocument,
) -> Result<()> {
    if let Some((first_origin, existing)) = named.get(title) {
        if *existing != doc {
            return Err(GenError::DuplicateTitle {
                title: title.to_string(),
                first_origin: first_origin.clone(),
                second_origin: origin.to_string(),
            });
        }
        return Ok(());
    }
    named.insert(title.to_string(), (origin.to_string(), doc));
    Ok(())
}

/// `#/definitions/Uint128` → `Uint128`.
fn ref_title(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

// ------------------------------- Tests ------------------------------------ //

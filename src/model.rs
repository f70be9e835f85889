//! Portable declaration model for generated clients.
//!
//! The emitter lowers schema semantics into these tagged variants; the
//! TypeScript-specific text lives entirely in [`crate::codegen`]. Nothing in
//! this module knows how the output is spelled.

/// A TypeScript type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    /// A named type: a declaration title or a builtin (`string`, `number`).
    Named(String),
    StringLiteral(String),
    Array(Box<TsType>),
    Tuple(Vec<TsType>),
    /// An empty union renders as `never`.
    Union(Vec<TsType>),
    /// An inline object type.
    Object(Vec<TsField>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TsField {
    pub name: String,
    pub ty: TsType,
    pub optional: bool,
}

/// One camelCased method argument backed by a snake_case payload key.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgField {
    /// Key used in the wire payload object.
    pub wire_name: String,
    /// camelCase parameter binding.
    pub binding: String,
    pub ty: TsType,
    pub optional: bool,
}

/// One generated client method, shared between the interface (signature
/// only) and the class (signature plus body).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientMethod {
    pub name: String,
    /// snake_case action name, used as the single payload key.
    pub discriminant: String,
    /// `None` when the variant carries no argument properties, in which
    /// case the method takes no business parameter at all.
    pub args: Option<Vec<ArgField>>,
    /// The type inside the returned `Promise<...>`.
    pub response: TsType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    /// Read-only surface: methods delegate to the generic contract query.
    Query,
    /// Read-write surface: methods sign and broadcast an execute message
    /// and take a trailing optional funds parameter.
    Execute,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Import { names: Vec<String>, from: String },
    /// Helper source included as-is ahead of the generated declarations.
    Verbatim(String),
    TypeAlias { name: String, ty: TsType },
    /// A plain data interface for a resolved object type.
    TypeInterface { name: String, fields: Vec<TsField> },
    /// A client-surface interface: `contractAddress` plus one callable
    /// signature per message variant.
    Interface {
        name: String,
        extends: Option<String>,
        kind: ClientKind,
        methods: Vec<ClientMethod>,
    },
    Class {
        name: String,
        implements: String,
        extends: Option<String>,
        kind: ClientKind,
        methods: Vec<ClientMethod>,
    },
}

/// The ordered declaration list for one contract, rendered into a single
/// output file.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedArtifact {
    pub decls: Vec<Declaration>,
}

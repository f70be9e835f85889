//! Build the declaration model from a contract's schema set.
//!
//! Artifact order is fixed: imports, helper preamble, one declaration per
//! resolved named type (first-seen order), query interface + class, execute
//! interface + class. Nothing is sorted; output order depends only on input
//! order.

use crate::casing::{camel, pascal};
use crate::error::Result;
use crate::message::{MessageVariant, correlate_response, message_variants};
use crate::model::{
    ArgField, ClientKind, ClientMethod, Declaration, GeneratedArtifact, TsField, TsType,
};
use crate::resolve::{FieldDef, Primitive, ResolvedType, TypeRegistry};
use crate::schema::{ContractSchemaSet, SchemaEntry};

const TERRA_IMPORTS: [&str; 6] = [
    "LCDClient",
    "Coins",
    "Wallet",
    "MsgExecuteContract",
    "TxInfo",
    "WaitTxBroadcastResult",
];

/// Wallet type guard, included ahead of the generated declarations.
const IS_CONNECTED_WALLET: &str = r#"function isConnectedWallet(x: Wallet | ConnectedWallet): x is ConnectedWallet {
  return typeof (x as Wallet).key === "undefined";
}"#;

/// Post-broadcast poll loop: resolves to the transaction info once the
/// transaction lands in a block, or to undefined after ~25s of polling.
const WAIT_FOR_INCLUSION: &str = r#"async function waitForInclusionInBlock(lcd: LCDClient, txHash: string): Promise<TxInfo | undefined> {
  let res;
  for (let i = 0; i <= 50; i++) {
    try {
      res = await lcd.tx.txInfo(txHash);
    } catch (error) {
      // NOOP
    }

    if (res) {
      break;
    }

    await new Promise((resolve) => setTimeout(resolve, 500));
  }

  return res;
}"#;

pub fn build_artifact(name: &str, set: &ContractSchemaSet) -> Result<GeneratedArtifact> {
    let registry = TypeRegistry::collect(set)?;

    let mut decls = vec![
        Declaration::Import {
            names: TERRA_IMPORTS.iter().map(|s| s.to_string()).collect(),
            from: "@terra-money/terra.js".to_string(),
        },
        Declaration::Import {
            names: vec!["ConnectedWallet".to_string()],
            from: "@terra-money/wallet-provider".to_string(),
        },
        Declaration::Verbatim(IS_CONNECTED_WALLET.to_string()),
        Declaration::Verbatim(WAIT_FOR_INCLUSION.to_string()),
    ];

    for named in registry.resolve_all()? {
        decls.push(match named.ty {
            ResolvedType::ObjectOf(fields) => Declaration::TypeInterface {
                name: named.title,
                fields: fields.into_iter().map(ts_field).collect(),
            },
            ty => Declaration::TypeAlias {
                name: named.title,
                ty: ts_type_of(&ty),
            },
        });
    }

    let responses = set.response_titles();

    let mut read_only_name = None;
    let mut query_client_name = None;
    if let Some(entry) = set.find_query_msg() {
        let variants = message_variants(entry)?;
        let methods = variants
            .iter()
            .map(|variant| query_method(variant, &responses, &registry, entry))
            .collect::<Result<Vec<_>>>()?;
        let interface = pascal(&format!("{name}ReadOnlyInterface"));
        let class = pascal(&format!("{name}QueryClient"));
        decls.push(Declaration::Interface {
            name: interface.clone(),
            extends: None,
            kind: ClientKind::Query,
            methods: methods.clone(),
        });
        decls.push(Declaration::Class {
            name: class.clone(),
            implements: interface.clone(),
            extends: None,
            kind: ClientKind::Query,
            methods,
        });
        read_only_name = Some(interface);
        query_client_name = Some(class);
    }

    if let Some(entry) = set.find_execute_msg() {
        let variants = message_variants(entry)?;
        // an execute message with no variants has nothing callable to wire
        if !variants.is_empty() {
            let methods = variants
                .iter()
                .map(|variant| execute_method(variant, &registry, entry))
                .collect::<Result<Vec<_>>>()?;
            let interface = pascal(&format!("{name}Interface"));
            let class = pascal(&format!("{name}Client"));
            decls.push(Declaration::Interface {
                name: interface.clone(),
                extends: read_only_name,
                kind: ClientKind::Execute,
                methods: methods.clone(),
            });
            decls.push(Declaration::Class {
                name: class,
                implements: interface,
                extends: query_client_name,
                kind: ClientKind::Execute,
                methods,
            });
        }
    }

    Ok(GeneratedArtifact { decls })
}

fn query_method(
    variant: &MessageVariant,
    responses: &[String],
    registry: &TypeRegistry,
    entry: &SchemaEntry,
) -> Result<ClientMethod> {
    let response = correlate_response(&variant.discriminant, responses)?;
    Ok(ClientMethod {
        name: format!("query{}", pascal(&variant.discriminant)),
        discriminant: variant.discriminant.clone(),
        args: arg_fields(variant, registry, entry)?,
        response: TsType::Named(response),
    })
}

fn execute_method(
    variant: &MessageVariant,
    registry: &TypeRegistry,
    entry: &SchemaEntry,
) -> Result<ClientMethod> {
    Ok(ClientMethod {
        name: camel(&variant.discriminant),
        discriminant: variant.discriminant.clone(),
        args: arg_fields(variant, registry, entry)?,
        response: execute_result(),
    })
}

/// What an execute call resolves to: the broadcast result, the transaction
/// info once included, or undefined when inclusion polling gives up.
fn execute_result() -> TsType {
    TsType::Union(vec![
        TsType::Named("WaitTxBroadcastResult".to_string()),
        TsType::Named("TxInfo".to_string()),
        TsType::Named("undefined".to_string()),
    ])
}

fn arg_fields(
    variant: &MessageVariant,
    registry: &TypeRegistry,
    entry: &SchemaEntry,
) -> Result<Option<Vec<ArgField>>> {
    let Some(props) = &variant.args.properties else {
        return Ok(None);
    };
    if props.is_empty() {
        return Ok(None);
    }
    let title = entry.doc.title.as_deref().unwrap_or("<untitled>");
    let mut out = Vec::with_capacity(props.len());
    for (wire_name, schema) in props {
        let path = format!("{title}/{}/properties/{wire_name}", variant.discriminant);
        let ty = registry.resolve(schema, &entry.origin, &path)?;
        out.push(ArgField {
            wire_name: wire_name.clone(),
            binding: camel(wire_name),
            ty: ts_type_of(&ty),
            optional: !variant.args.is_required(wire_name),
        });
    }
    Ok(Some(out))
}

fn ts_field(field: FieldDef) -> TsField {
    TsField {
        optional: !field.required,
        ty: ts_type_of(&field.ty),
        name: field.name,
    }
}

fn ts_type_of(ty: &ResolvedType) -> TsType {
    match ty {
        ResolvedType::Primitive(Primitive::String) => TsType::Named("string".to_string()),
        ResolvedType::Primitive(Primitive::Number) => TsType::Named("number".to_string()),
        ResolvedType::Primitive(Primitive::Boolean) => TsType::Named("boolean".to_string()),
        ResolvedType::Primitive(Primitive::Null) => TsType::Named("null".to_string()),
        ResolvedType::StringEnum(lits) => {
            TsType::Union(lits.iter().map(|s| TsType::StringLiteral(s.clone())).collect())
        }
        ResolvedType::ArrayOf(item) => TsType::Array(Box::new(ts_type_of(item))),
        ResolvedType::Tuple(items) => TsType::Tuple(items.iter().map(ts_type_of).collect()),
        ResolvedType::ObjectOf(fields) => {
            TsType::Object(fields.iter().cloned().map(ts_field).collect())
        }
        ResolvedType::Reference(title) => TsType::Named(title.clone()),
        ResolvedType::UnionOf(members) => {
            TsType::Union(members.iter().map(ts_type_of).collect())
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

//! TypeScript printer for the declaration model.
//!
//! The whole artifact is rendered into one in-memory string; the writer
//! persists it in a single step. Everything here is deterministic: the only
//! inputs are the declaration list and fixed formatting rules.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{
    ArgField, ClientKind, ClientMethod, Declaration, GeneratedArtifact, TsField, TsType,
};

/// Property names that can be written bare; everything else gets quoted.
static IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

const HEADER: &str = "/**\n\
* This file was automatically generated, DO NOT MODIFY IT BY HAND.\n\
* Regenerate it by re-running the generator against the contract schema export.\n\
*/\n";

pub fn render(artifact: &GeneratedArtifact) -> String {
    let mut cg = Codegen::new();
    cg.emit(artifact);
    cg.into_string()
}

pub struct Codegen {
    out: String,
    indent: usize,
}

impl Codegen {
    pub fn new() -> Self {
        Self { out: String::new(), indent: 0 }
    }

    pub fn emit(&mut self, artifact: &GeneratedArtifact) {
        self.out.push_str(HEADER);
        let mut prev_import = false;
        for decl in &artifact.decls {
            let is_import = matches!(decl, Declaration::Import { .. });
            // imports sit in one block; everything else is blank-line
            // separated
            if !(is_import && prev_import) {
                self.blank();
            }
            self.emit_decl(decl);
            prev_import = is_import;
        }
    }

    pub fn into_string(self) -> String {
        self.out
    }

    // ------------------------------ Declarations -------------------------- //

    fn emit_decl(&mut self, decl: &Declaration) {
        match decl {
            Declaration::Import { names, from } => {
                self.line(&format!("import {{ {} }} from \"{from}\";", names.join(", ")));
            }
            Declaration::Verbatim(source) => {
                for l in source.lines() {
                    self.line(l);
                }
            }
            Declaration::TypeAlias { name, ty } => {
                self.line(&format!("export type {name} = {};", ty_string(ty)));
            }
            Declaration::TypeInterface { name, fields } => {
                if fields.is_empty() {
                    self.line(&format!("export interface {name} {{}}"));
                    return;
                }
                self.line(&format!("export interface {name} {{"));
                self.indent += 1;
                for field in fields {
                    self.line(&format!("{};", field_sig(field)));
                }
                self.indent -= 1;
                self.line("}");
            }
            Declaration::Interface { name, extends, kind, methods } => {
                self.emit_client_interface(name, extends.as_deref(), *kind, methods);
            }
            Declaration::Class { name, implements, extends, kind, methods } => {
                self.emit_client_class(name, implements, extends.as_deref(), *kind, methods);
            }
        }
    }

    fn emit_client_interface(
        &mut self,
        name: &str,
        extends: Option<&str>,
        kind: ClientKind,
        methods: &[ClientMethod],
    ) {
        match extends {
            Some(parent) => self.line(&format!("export interface {name} extends {parent} {{")),
            None => self.line(&format!("export interface {name} {{")),
        }
        self.indent += 1;
        self.line("contractAddress: string;");
        for method in methods {
            let params = interface_params(method, kind);
            self.line(&format!(
                "{}: ({params}) => Promise<{}>;",
                method.name,
                ty_string(&method.response)
            ));
        }
        self.indent -= 1;
        self.line("}");
    }

    fn emit_client_class(
        &mut self,
        name: &str,
        implements: &str,
        extends: Option<&str>,
        kind: ClientKind,
        methods: &[ClientMethod],
    ) {
        let heading = match extends {
            Some(parent) => {
                format!("export class {name} extends {parent} implements {implements} {{")
            }
            None => format!("export class {name} implements {implements} {{"),
        };
        self.line(&heading);
        self.indent += 1;

        self.line("client: LCDClient;");
        if kind == ClientKind::Execute {
            self.line("wallet: Wallet | ConnectedWallet;");
        }
        self.line("contractAddress: string;");
        self.blank();

        match kind {
            ClientKind::Query => {
                self.line("constructor(client: LCDClient, contractAddress: string) {");
                self.indent += 1;
                self.line("this.client = client;");
                self.line("this.contractAddress = contractAddress;");
                self.indent -= 1;
                self.line("}");
            }
            ClientKind::Execute => {
                self.line(
                    "constructor(client: LCDClient, wallet: Wallet | ConnectedWallet, contractAddress: string) {",
                );
                self.indent += 1;
                if extends.is_some() {
                    self.line("super(client, contractAddress);");
                }
                self.line("this.client = client;");
                self.line("this.wallet = wallet;");
                self.line("this.contractAddress = contractAddress;");
                self.indent -= 1;
                self.line("}");
            }
        }

        for method in methods {
            self.blank();
            match kind {
                ClientKind::Query => self.emit_query_method(method),
                ClientKind::Execute => self.emit_execute_method(method),
            }
        }

        self.indent -= 1;
        self.line("}");
    }

    // -------------------------------- Methods ----------------------------- //

    fn emit_query_method(&mut self, method: &ClientMethod) {
        self.line(&format!(
            "{} = async ({}): Promise<{}> => {{",
            method.name,
            class_params(method, ClientKind::Query),
            ty_string(&method.response)
        ));
        self.indent += 1;
        self.line("return this.client.wasm.contractQuery(this.contractAddress, {");
        self.emit_payload(method);
        self.line("});");
        self.indent -= 1;
        self.line("};");
    }

    fn emit_execute_method(&mut self, method: &ClientMethod) {
        self.line(&format!(
            "{} = async ({}): Promise<{}> => {{",
            method.name,
            class_params(method, ClientKind::Execute),
            ty_string(&method.response)
        ));
        self.indent += 1;
        self.line("const senderAddress = isConnectedWallet(this.wallet)");
        self.indent += 1;
        self.line("? this.wallet.walletAddress");
        self.line(": this.wallet.key.accAddress;");
        self.indent -= 1;
        self.line("const execMsg = new MsgExecuteContract(senderAddress, this.contractAddress, {");
        self.emit_payload(method);
        self.line("}, funds);");
        self.blank();
        self.line("if (isConnectedWallet(this.wallet)) {");
        self.indent += 1;
        self.line("const tx = await this.wallet.post({ msgs: [execMsg] });");
        self.line("return waitForInclusionInBlock(this.client, tx.result.txhash);");
        self.indent -= 1;
        self.line("}");
        self.blank();
        self.line("const execTx = await this.wallet.createAndSignTx({ msgs: [execMsg] });");
        self.line("return this.client.tx.broadcast(execTx);");
        self.indent -= 1;
        self.line("};");
    }

    /// The single-key payload object: `{ discriminant: { args... } }`,
    /// rendered inside an already-open outer brace.
    fn emit_payload(&mut self, method: &ClientMethod) {
        self.indent += 1;
        match &method.args {
            None => self.line(&format!("{}: {{}}", quote_prop(&method.discriminant))),
            Some(args) => {
                self.line(&format!("{}: {{", quote_prop(&method.discriminant)));
                self.indent += 1;
                for (i, arg) in args.iter().enumerate() {
                    let entry = if arg.wire_name == arg.binding {
                        arg.binding.clone()
                    } else {
                        format!("{}: {}", quote_prop(&arg.wire_name), arg.binding)
                    };
                    let comma = if i + 1 < args.len() { "," } else { "" };
                    self.line(&format!("{entry}{comma}"));
                }
                self.indent -= 1;
                self.line("}");
            }
        }
        self.indent -= 1;
    }

    // -------------------------------- Plumbing ---------------------------- //

    fn line(&mut self, text: &str) {
        if !text.is_empty() {
            for _ in 0..self.indent {
                self.out.push_str("  ");
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }
}

impl Default for Codegen {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------- Type expressions ---------------------------- //

pub fn ty_string(ty: &TsType) -> String {
    match ty {
        TsType::Named(name) => name.clone(),
        TsType::StringLiteral(lit) => format!("\"{lit}\""),
        TsType::Array(item) => {
            let inner = ty_string(item);
            if matches!(item.as_ref(), TsType::Union(members) if members.len() > 1) {
                format!("({inner})[]")
            } else {
                format!("{inner}[]")
            }
        }
        TsType::Tuple(items) => {
            let items: Vec<String> = items.iter().map(ty_string).collect();
            format!("[{}]", items.join(", "))
        }
        TsType::Union(members) => {
            if members.is_empty() {
                return "never".to_string();
            }
            let members: Vec<String> = members.iter().map(ty_string).collect();
            members.join(" | ")
        }
        TsType::Object(fields) => {
            if fields.is_empty() {
                return "{}".to_string();
            }
            let fields: Vec<String> = fields.iter().map(field_sig).collect();
            format!("{{ {} }}", fields.join("; "))
        }
    }
}

fn field_sig(field: &TsField) -> String {
    let optional = if field.optional { "?" } else { "" };
    format!("{}{optional}: {}", quote_prop(&field.name), ty_string(&field.ty))
}

fn quote_prop(name: &str) -> String {
    if IDENT.is_match(name) {
        name.to_string()
    } else {
        format!("\"{name}\"")
    }
}

/// Interface position: the args object is a named parameter, not a pattern.
fn interface_params(method: &ClientMethod, kind: ClientKind) -> String {
    let mut parts = Vec::new();
    if let Some(args) = &method.args {
        parts.push(format!("args: {}", args_type(args)));
    }
    if kind == ClientKind::Execute {
        parts.push("funds?: Coins".to_string());
    }
    parts.join(", ")
}

/// Class position: destructure the args object into camelCase bindings.
fn class_params(method: &ClientMethod, kind: ClientKind) -> String {
    let mut parts = Vec::new();
    if let Some(args) = &method.args {
        parts.push(format!("{}: {}", args_pattern(args), args_type(args)));
    }
    if kind == ClientKind::Execute {
        parts.push("funds?: Coins".to_string());
    }
    parts.join(", ")
}

fn args_pattern(args: &[ArgField]) -> String {
    let bindings: Vec<&str> = args.iter().map(|a| a.binding.as_str()).collect();
    format!("{{ {} }}", bindings.join(", "))
}

fn args_type(args: &[ArgField]) -> String {
    let fields: Vec<String> = args
        .iter()
        .map(|a| {
            let optional = if a.optional { "?" } else { "" };
            format!("{}{optional}: {}", a.binding, ty_string(&a.ty))
        })
        .collect();
    format!("{{ {} }}", fields.join("; "))
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::build_artifact;
    use crate::schema::ContractSchemaSet;
    use serde_json::json;

    fn counter_code() -> String {
        let set = ContractSchemaSet::from_values(vec![
            (
                "execute_msg.json".to_string(),
                json!({
                    "title": "ExecuteMsg",
                    "oneOf": [
                        { "type": "object", "properties": { "increment": { "type": "object" } }, "required": ["increment"] },
                        { "type": "object", "properties": { "reset": { "type": "object", "properties": {
                            "count": { "type": "integer" }
                        }, "required": ["count"] } }, "required": ["reset"] }
                    ]
                }),
            ),
            (
                "query_msg.json".to_string(),
                json!({
                    "title": "QueryMsg",
                    "oneOf": [
                        { "type": "object", "properties": { "get_count": { "type": "object" } }, "required": ["get_count"] }
                    ]
                }),
            ),
            (
                "count_response.json".to_string(),
                json!({
                    "title": "CountResponse",
                    "type": "object",
                    "properties": { "count": { "type": "integer" } },
                    "required": ["count"]
                }),
            ),
        ])
        .unwrap();
        render(&build_artifact("counter", &set).unwrap())
    }

    #[test]
    fn renders_imports_and_helpers_first() {
        let code = counter_code();
        let import_pos = code
            .find("import { LCDClient, Coins, Wallet, MsgExecuteContract, TxInfo, WaitTxBroadcastResult } from \"@terra-money/terra.js\";")
            .unwrap();
        let wallet_pos = code
            .find("import { ConnectedWallet } from \"@terra-money/wallet-provider\";")
            .unwrap();
        let guard_pos = code.find("function isConnectedWallet(").unwrap();
        assert!(import_pos < wallet_pos && wallet_pos < guard_pos);
        assert!(code.contains("async function waitForInclusionInBlock("));
    }

    #[test]
    fn renders_type_declarations() {
        let code = counter_code();
        assert!(code.contains("export interface CountResponse {\n  count: number;\n}"));
        assert!(code.contains(
            "export type ExecuteMsg = { increment: {} } | { reset: { count: number } };"
        ));
    }

    #[test]
    fn renders_the_query_surface() {
        let code = counter_code();
        assert!(code.contains("export interface CounterReadOnlyInterface {"));
        assert!(code.contains("  queryGetCount: () => Promise<CountResponse>;"));
        assert!(code.contains("export class CounterQueryClient implements CounterReadOnlyInterface {"));
        assert!(code.contains("  queryGetCount = async (): Promise<CountResponse> => {"));
        assert!(code.contains("    return this.client.wasm.contractQuery(this.contractAddress, {\n      get_count: {}\n    });"));
    }

    #[test]
    fn renders_the_execute_surface() {
        let code = counter_code();
        assert!(code.contains("export interface CounterInterface extends CounterReadOnlyInterface {"));
        assert!(code.contains(
            "  increment: (funds?: Coins) => Promise<WaitTxBroadcastResult | TxInfo | undefined>;"
        ));
        assert!(code.contains(
            "  reset: (args: { count: number }, funds?: Coins) => Promise<WaitTxBroadcastResult | TxInfo | undefined>;"
        ));
        assert!(code.contains(
            "export class CounterClient extends CounterQueryClient implements CounterInterface {"
        ));
        assert!(code.contains(
            "  reset = async ({ count }: { count: number }, funds?: Coins): Promise<WaitTxBroadcastResult | TxInfo | undefined> => {"
        ));
        assert!(code.contains("    const execMsg = new MsgExecuteContract(senderAddress, this.contractAddress, {\n      reset: {\n        count\n      }\n    }, funds);"));
        assert!(code.contains("super(client, contractAddress);"));
    }

    #[test]
    fn payload_maps_snake_wire_names_to_camel_bindings() {
        let set = ContractSchemaSet::from_values(vec![
            (
                "query_msg.json".to_string(),
                json!({ "title": "QueryMsg", "oneOf": [
                    { "type": "object", "properties": { "balance": { "type": "object", "properties": {
                        "owner_addr": { "type": "string" }
                    }, "required": ["owner_addr"] } } }
                ] }),
            ),
            (
                "balance_response.json".to_string(),
                json!({ "title": "BalanceResponse", "type": "object" }),
            ),
        ])
        .unwrap();
        let code = render(&build_artifact("counter", &set).unwrap());
        assert!(code.contains("queryBalance = async ({ ownerAddr }: { ownerAddr: string }): Promise<BalanceResponse> => {"));
        assert!(code.contains("      balance: {\n        owner_addr: ownerAddr\n      }"));
    }

    #[test]
    fn quotes_property_names_that_are_not_identifiers() {
        let field = TsField {
            name: "2fa-code".to_string(),
            ty: TsType::Named("string".to_string()),
            optional: true,
        };
        assert_eq!(field_sig(&field), "\"2fa-code\"?: string");
    }

    #[test]
    fn union_arrays_get_parenthesized() {
        let ty = TsType::Array(Box::new(TsType::Union(vec![
            TsType::Named("string".to_string()),
            TsType::Named("null".to_string()),
        ])));
        assert_eq!(ty_string(&ty), "(string | null)[]");
        let ty = TsType::Array(Box::new(TsType::Named("string".to_string())));
        assert_eq!(ty_string(&ty), "string[]");
    }

    #[test]
    fn empty_union_renders_never() {
        assert_eq!(ty_string(&TsType::Union(Vec::new())), "never");
    }
}

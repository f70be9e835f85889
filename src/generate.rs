//! Top-level generation entry point and the artifact writer.
//!
//! The full client source is assembled in memory before anything touches the
//! filesystem, so a failed run never leaves a partial file behind. Re-running
//! on unchanged input overwrites the output with byte-identical content.

use std::fs;
use std::path::{Path, PathBuf};

use crate::casing::pascal;
use crate::codegen::render;
use crate::emit::build_artifact;
use crate::error::{GenError, Result};
use crate::schema::ContractSchemaSet;

/// Generate the TypeScript client for one contract and write it to
/// `<out_dir>/<PascalName>Client.ts`. Returns the written path.
pub fn generate(name: &str, schemas: &ContractSchemaSet, out_dir: &Path) -> Result<PathBuf> {
    let artifact = build_artifact(name, schemas)?;
    let code = render(&artifact);

    // "already exists" is success; concurrent contract runs share out_dir
    fs::create_dir_all(out_dir).map_err(|source| GenError::WriteFile {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let out_file = out_dir.join(format!("{}Client.ts", pascal(name)));
    fs::write(&out_file, &code).map_err(|source| GenError::WriteFile {
        path: out_file.clone(),
        source,
    })?;
    Ok(out_file)
}

// ------------------------------- Tests ------------------------------------ //

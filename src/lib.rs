//! Generate statically-typed TypeScript clients from the JSON Schema files
//! a CosmWasm contract build step exports.
//!
//! The pipeline is a small special-purpose compiler:
//! 1. load + [`cleanse`] the schema documents ([`schema`])
//! 2. resolve every named definition into a type ([`resolve`])
//! 3. classify message variants and correlate query responses ([`message`])
//! 4. build the portable declaration model ([`emit`], [`model`])
//! 5. print TypeScript and write the client file ([`codegen`], [`generate`])
//!
//! Only the loader and the writer touch the filesystem; everything between
//! is a pure, deterministic transform.

pub mod casing;
pub mod cleanse;
pub mod cli;
pub mod codegen;
pub mod emit;
pub mod error;
pub mod generate;
pub mod message;
pub mod model;
pub mod resolve;
pub mod schema;

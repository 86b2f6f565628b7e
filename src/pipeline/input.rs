//! Input loading: schema files, node-pair files and change documents.

use crate::changes::Change;
use crate::codec::{decode_pairs, ChangeCodec};
use crate::error::GraphDeltaError;
use crate::metamodel::{MetadataSource, NodePair, TypeMapper};
use anyhow::Context;
use std::path::Path;

/// Load the metamodel from a YAML schema file.
pub fn load_schema(path: &Path, quiet: bool) -> anyhow::Result<TypeMapper> {
    let mapper = TypeMapper::from_schema_file(path)
        .with_context(|| format!("Failed to load schema: {}", path.display()))?;
    if !quiet {
        tracing::info!("Loaded {} managed classes from {}", mapper.len(), path.display());
    }
    Ok(mapper)
}

/// Read node pairs from a pairs file.
pub fn read_pairs(path: &Path, metadata: &dyn MetadataSource, quiet: bool) -> anyhow::Result<Vec<NodePair>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| GraphDeltaError::io(path, e))
        .with_context(|| format!("Failed to read pairs file: {}", path.display()))?;
    let pairs = decode_pairs(&text, metadata)
        .with_context(|| format!("Failed to decode pairs: {}", path.display()))?;
    if !quiet {
        tracing::info!("Read {} node pairs", pairs.len());
    }
    Ok(pairs)
}

/// Read change documents (one document or an array) from a file.
pub fn read_changes(path: &Path, codec: &ChangeCodec<'_>, quiet: bool) -> anyhow::Result<Vec<Change>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| GraphDeltaError::io(path, e))
        .with_context(|| format!("Failed to read change documents: {}", path.display()))?;
    let changes = codec
        .decode_document_str(&text)
        .with_context(|| format!("Failed to decode change documents: {}", path.display()))?;
    if !quiet {
        tracing::info!("Decoded {} changes", changes.len());
    }
    Ok(changes)
}

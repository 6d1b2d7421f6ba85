//! # Document Handle
//!
//! A `Document` owns one parsed component file and its editing state.
//! Documents are memory-backed (temporary, for tests and one-shot edits)
//! or file-backed (persisted through the `weave-common` `FileSystem`
//! abstraction, so persistence is testable against a mock).
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Parse → Mutate → Generate → Save
//!   ↓      ↓        ↓         ↓        ↓
//! File   Tree   Mutations  Source   File
//! ```
//!
//! The stored source is refreshed from the tree after every successful
//! mutation, so `source()` is always current.

use crate::errors::EditorError;
use crate::mutations::{Mutation, MutationOutcome};
use std::path::PathBuf;
use tracing::debug;
use weave_common::FileSystem;
use weave_parser::ast::Document as AstDocument;
use weave_parser::{generate, parse};

/// Editable component document
#[derive(Debug)]
pub struct Document {
    /// Path to the source file (informational for memory-backed docs)
    pub path: PathBuf,

    /// Increments on each applied mutation
    pub version: u64,

    storage: DocumentStorage,
}

/// Storage backend for a document
#[derive(Debug)]
enum DocumentStorage {
    /// In-memory only (tests, temp docs)
    Memory { source: String, ast: AstDocument },

    /// File-backed (persisted on save)
    File {
        source: String,
        ast: AstDocument,
        dirty: bool,
    },
}

impl Document {
    /// Create a memory-backed document from source text
    pub fn from_source(path: PathBuf, source: String) -> Result<Self, EditorError> {
        let ast = parse(&source)?;
        Ok(Self {
            path,
            version: 0,
            storage: DocumentStorage::Memory { source, ast },
        })
    }

    /// Load a file-backed document
    pub fn load(path: PathBuf, fs: &dyn FileSystem) -> Result<Self, EditorError> {
        let source = fs.read_to_string(&path)?;
        let ast = parse(&source)?;
        debug!(path = %path.display(), blocks = ast.markup_blocks().count(), "loaded document");

        Ok(Self {
            path,
            version: 0,
            storage: DocumentStorage::File {
                source,
                ast,
                dirty: false,
            },
        })
    }

    pub fn ast(&self) -> &AstDocument {
        match &self.storage {
            DocumentStorage::Memory { ast, .. } | DocumentStorage::File { ast, .. } => ast,
        }
    }

    /// Mutable tree access for callers going around the mutation enum.
    /// Marks the document dirty; `generate()` refreshes the source.
    pub fn ast_mut(&mut self) -> &mut AstDocument {
        match &mut self.storage {
            DocumentStorage::Memory { ast, .. } => ast,
            DocumentStorage::File { ast, dirty, .. } => {
                *dirty = true;
                ast
            }
        }
    }

    /// Current source text
    pub fn source(&self) -> &str {
        match &self.storage {
            DocumentStorage::Memory { source, .. } | DocumentStorage::File { source, .. } => {
                source
            }
        }
    }

    /// Apply a mutation and refresh the stored source. On `Err` the
    /// document (tree, source, version) is unchanged.
    pub fn apply(&mut self, mutation: &Mutation) -> Result<MutationOutcome, EditorError> {
        let outcome = match &mut self.storage {
            DocumentStorage::Memory { ast, .. } | DocumentStorage::File { ast, .. } => {
                mutation.apply(ast)?
            }
        };

        self.version += 1;
        self.regenerate()?;
        debug!(path = %self.path.display(), version = self.version, message = %outcome.message, "applied mutation");
        Ok(outcome)
    }

    /// Regenerate the stored source from the tree and return it
    pub fn generate(&mut self) -> Result<&str, EditorError> {
        self.regenerate()?;
        Ok(self.source())
    }

    pub fn is_dirty(&self) -> bool {
        matches!(self.storage, DocumentStorage::File { dirty: true, .. })
    }

    /// Persist a file-backed document
    pub fn save(&mut self, fs: &dyn FileSystem) -> Result<(), EditorError> {
        match &mut self.storage {
            DocumentStorage::File { source, dirty, .. } => {
                fs.write(&self.path, source)?;
                *dirty = false;
                debug!(path = %self.path.display(), "saved document");
                Ok(())
            }
            DocumentStorage::Memory { .. } => Err(EditorError::NotFileBacked),
        }
    }

    fn regenerate(&mut self) -> Result<(), EditorError> {
        match &mut self.storage {
            DocumentStorage::Memory { source, ast } => {
                *source = generate(ast)?;
            }
            DocumentStorage::File { source, ast, dirty } => {
                *source = generate(ast)?;
                *dirty = true;
            }
        }
        Ok(())
    }
}

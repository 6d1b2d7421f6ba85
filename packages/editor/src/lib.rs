//! # Weave Editor
//!
//! Mutation engine for component markup, driving a live visual editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ weave-parser: source text → document tree   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ weave-editor                                │
//! │  - locate elements by data-editable id      │
//! │  - resolve templates/snippets into nodes    │
//! │  - apply validated mutations                │
//! │  - Document lifecycle (load/apply/save)     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ weave-parser: document tree → source text   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The tree is the source of truth**: generated text is a projection
//! 2. **Identity over position**: elements are addressed by their
//!    `data-editable` value, which survives regeneration
//! 3. **Validate, then splice**: a failed mutation leaves the document
//!    byte-identical to before the call
//! 4. **Stateless engine**: every call works on a freshly owned tree; the
//!    host serializes edits per file
//!
//! ## Usage
//!
//! ```rust,ignore
//! use weave_editor::{Document, Mutation};
//!
//! let mut doc = Document::from_source("Hero.jsx".into(), source)?;
//! doc.apply(&Mutation::UpdateText {
//!     target_id: "hero-title".to_string(),
//!     text: "Hello!".to_string(),
//! })?;
//! let updated = doc.source();
//! ```

mod document;
mod errors;
mod insert;
mod locator;
mod movement;
mod mutations;
mod remove;
mod styles;
mod templates;
mod update;

pub use document::Document;
pub use errors::EditorError;
pub use insert::{
    insert_after, insert_as_first_child, insert_as_last_child, insert_at_root, insert_before,
    RootPosition,
};
pub use locator::{
    component_root, find_all_editable, find_by_editable_id, find_by_tag_name, resolve,
    EditableElement, SearchResult,
};
pub use movement::{move_down, move_into, move_to_index, move_up, swap_elements};
pub use mutations::{Mutation, MutationError, MutationOutcome};
pub use remove::{clear_children, remove_element};
pub use styles::{
    add_class_name, clear_styles, get_styles, remove_class_name, set_margin, set_padding,
    set_spacing, update_styles, Sides, StyleInput,
};
pub use templates::{resolve as resolve_template, ElementSpec, TemplateError, TemplateParams};
pub use update::{
    replace_children, update_attribute, update_tag_name, update_text, AttributeUpdate, NewChild,
};

// Re-export the tree types most callers need
pub use weave_parser::ast::{Document as AstDocument, Node, NodePath};

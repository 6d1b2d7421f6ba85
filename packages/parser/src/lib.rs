//! Parser and code generator for Weave component files.
//!
//! A component file is JavaScript-like code with embedded markup regions.
//! [`parse`] splits the file into verbatim code segments and parsed markup
//! trees; [`generate`] writes them back out. The pair is lossless: parsing
//! followed by generation reproduces the input byte-for-byte, so edits made
//! between the two touch only the mutated markup.

pub mod ast;
pub mod error;
pub mod parser;
pub mod serializer;
pub mod tokenizer;

pub use ast::{Document, Node, NodePath};
pub use error::{ParseError, ParseResult};
pub use parser::{parse, parse_expression, parse_snippet};
pub use serializer::{generate, generate_expression, generate_node, GenerateError};

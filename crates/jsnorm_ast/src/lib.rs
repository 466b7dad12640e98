//! jsnorm_ast: Abstract Syntax Tree definitions for the JavaScript normalizer.
//!
//! This crate defines the owned node types for the accepted input grammar,
//! the `SyntaxKind` token enum, operator tables, node flags, visitors and a
//! small factory for synthesized nodes.

pub mod factory;
pub mod node;
pub mod operators;
pub mod precedence;
pub mod syntax_kind;
pub mod types;
pub mod visitor;

// Re-export key types
pub use node::*;
pub use operators::*;
pub use precedence::Precedence;
pub use syntax_kind::SyntaxKind;
pub use types::*;
pub use visitor::{AstVisitor, AstVisitorMut};

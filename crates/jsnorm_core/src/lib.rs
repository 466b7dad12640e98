//! jsnorm_core: Core utilities shared by every stage of the normalizer.
//!
//! Provides text spans and line maps, string interning, and the hash
//! collections used for scope tables.

pub mod collections;
pub mod intern;
pub mod text;

// Re-export commonly used types
pub use intern::{InternedString, StringInterner};
pub use text::{LineAndColumn, LineMap, TextSpan};

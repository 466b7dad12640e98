//! jsnorm_resolver: Scope and name resolution.
//!
//! The resolver walks the AST once, builds the scope chain, and annotates
//! every declaration and reference with its binding. It also owns the
//! allocators for collision-free temporaries and statement labels.

mod binding;
mod resolver;
mod scope;

pub use binding::{Binding, BindingFlags, BindingKind, BindingTable};
pub use resolver::{resolve, Resolver};
pub use scope::{Scope, ScopeKind, ScopeTree};

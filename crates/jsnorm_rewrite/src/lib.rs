//! jsnorm_rewrite: The normalization rule set and its fixpoint engine.
//!
//! Rewrites a resolved program into the canonical subset:
//! - `with` statements become explicit property lookups
//! - `for`, `for-in`, `for-of` and `do-while` become labeled `while` loops
//! - compound assignments and updates become read-compute-assign sequences
//! - `&&`, `||` and `?:` become `if` statements over temporaries
//! - every `break`/`continue` names its target
//!
//! Constructs that cannot be rewritten safely are marked `PRESERVED` and
//! reported as warnings.

mod cflow;
mod checker;
mod context;
mod engine;
mod error;
mod guard;
mod query;
mod rules;
mod spill;

pub use checker::check_canonical;
pub use cflow::completes_normally;
pub use context::RuleContext;
pub use engine::{normalize, RewriteOptions, RewriteOutcome};
pub use error::{InvariantViolation, ViolationKind};
pub use guard::mark_direct_eval;
pub use rules::{Rule, RULES};

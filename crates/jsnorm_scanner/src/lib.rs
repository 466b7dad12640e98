//! jsnorm_scanner: Lexer/tokenizer for JavaScript source code.
//!
//! The scanner works on the UTF-8 bytes of the source and reports byte
//! offsets. It tokenizes:
//! - ES5.1 punctuators, plus `=>`, `**` and `**=`
//! - String, numeric and regular expression literals
//! - Unicode identifiers, including `\uXXXX` escapes
//!
//! Tokens for syntax the parser rejects (templates, `?.`, `??`, bigints)
//! are still produced so the parser can name what it refused.

mod char_codes;
mod scanner;

pub use char_codes::{is_identifier_part, is_identifier_start, is_line_break};
pub use scanner::{numeric_value, Scanner, ScannerState};

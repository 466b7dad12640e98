//! jsnorm_parser: Recursive descent parser for JavaScript.
//!
//! Parses the scanner's token stream into an owned AST. Parsing is
//! fail-fast: the first syntax error, early error or use of syntax outside
//! the accepted grammar ends the parse with a [`ParseError`].

mod error;
mod parser;
mod precedence;
mod utilities;

use jsnorm_ast::node::Program;

pub use error::ParseError;
pub use parser::Parser;

/// Parse a complete script.
pub fn parse(source_text: &str) -> Result<Program, ParseError> {
    Parser::new(source_text).parse_program()
}

//! The embedded expression language: lexer, parser, and tree-walking
//! evaluator with a persistent variable table.

pub mod ast;
pub mod builtins;
pub mod env;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod value;

use thiserror::Error;

pub use env::Environment;
pub use eval::{ConsoleSink, EvalError, Evaluator};
pub use parser::ParseError;
pub use value::Value;

/// Any failure produced while running a piece of submitted text.
#[derive(Error, Debug)]
pub enum LangError {
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Eval(#[from] EvalError),
}

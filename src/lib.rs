//! # Quill - a small statically typed language with a bytecode toolchain
//!
//! Quill programs are a list of functions with declared argument and return
//! types. The toolchain lexes, parses, type checks and compiles them into a
//! stack bytecode module, which the bundled VM executes.
//!
//! ## Pipeline Flow
//!
//! ```text
//! Source Code (String)
//!     ↓
//! [strip_comments + Lexer] → Token Stream
//!     ↓
//! [Parser] → Surface AST (ast::Program)
//!     ↓
//! [Type Checker] → Annotation Table + Context (types::TypeCheckOutput)
//!     ↓
//! [Compiler] → Bytecode Module (bytecode::Module)
//!     ↓
//! [VM] → Runtime Value (vm::Value)
//! ```
//!
//! ## Type Inference
//!
//! The checker lowers each statement into a three-case expression language
//! (variables, single-argument applications, `let`) and solves it with
//! substitution-based unification. Identifiers are made globally unique by
//! prefixing them with the path of their declaring scope, so shadowing in a
//! conditional body gets its own binding (`main::if1::x`). Bindings are
//! monomorphic; there is no let-polymorphism.
//!
//! ## Example Program
//!
//! ```text
//! fn int sub(int a, int b) {
//!     return a - b;
//! }
//!
//! fn int main() {
//!     echo(concat("result: ", to_string(sub(5, 2))));
//!     return sub(5, 2);
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`lexer`] - Tokenization using lachs
//! - [`ast`] - Surface syntax tree with stable node ids
//! - [`parser`] - Parsing using combinator-based grammar
//! - [`types`] - Scope mangling, translation and unification-based inference
//! - [`stdlib`] - Built-in functions shared by checker and VM
//! - [`bytecode`] - Instruction set, module format and compiler
//! - [`vm`] - Stack virtual machine

pub mod ast;
pub mod bytecode;
pub mod lexer;
pub mod parser;
pub mod stdlib;
pub mod types;
pub mod vm;

use thiserror::Error;
use tracing::debug;

use ast::Program;
use bytecode::{CompileError, Module};
use lexer::{Token, strip_comments};
use parser::{ParseError, ParseState, parse};
use types::{FailedTypeCheck, TypeCheckOutput, check};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("lexing failed: {0}")]
    Lex(String),
    #[error("{}", render_parse_errors(.0))]
    Parse(Vec<ParseError>),
    #[error(transparent)]
    Check(#[from] FailedTypeCheck),
    #[error(transparent)]
    Compile(#[from] CompileError),
}

fn render_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lex and parse `source`.
pub fn parse_source(source: &str) -> Result<Program, BuildError> {
    let stripped = strip_comments(source);
    let tokens = Token::lex(&stripped).map_err(|e| BuildError::Lex(e.to_string()))?;
    debug!(tokens = tokens.len(), "lexed source");

    let mut state = ParseState::new(tokens);
    match parse(&mut state) {
        (Some(program), _) => {
            debug!(functions = program.functions.len(), "parsed program");
            Ok(program)
        }
        (None, errors) => Err(BuildError::Parse(errors)),
    }
}

/// Lex, parse and type check `source`.
pub fn check_source(source: &str) -> Result<(Program, TypeCheckOutput), BuildError> {
    let program = parse_source(source)?;
    let checked = check(&program)?;
    debug!(annotations = checked.annotations.len(), "type checked program");
    Ok((program, checked))
}

/// Run the whole front end and compile `source` into a bytecode module.
pub fn build_source(source: &str) -> Result<Module, BuildError> {
    let (program, checked) = check_source(source)?;
    let module = bytecode::compile(&program, &checked)?;
    debug!(functions = module.functions.len(), "compiled module");
    Ok(module)
}

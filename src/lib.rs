#![allow(clippy::needless_return)]

//! An implementation of a small dynamically typed scripting language, built as two independent
//! pipelines sharing a single lexer. [`interpreter`] walks a parsed AST directly. [`vm`] runs
//! a stack-based bytecode compiled by [`compiler`] from the same token stream. The two pipelines
//! do not share state: the tree-walk side resolves closures, `this`, and classes; the bytecode
//! side covers the flat, function-free subset of the language that fits in one implicit chunk.
//!
//! ## Scanning
//! The first step in the interpreter is scanning. Scanning is the process of converting a string of
//! characters into a list of tokens. A token is a single unit of a programming language. For
//! example, the string `1 + 2` would be converted into the following tokens:
//! ```text
//! [Number(1), Plus, Number(2)]
//! ```
//! The scanner is implemented in the [`scanner`](scanner) module as an iterator over the characters
//! in the source code. It is a simple state machine that returns the next token in the source code
//! when called.
//!
//! The scanner reports syntax errors in the source code as a [`ScanError`](error::ScanError).
//! These errors are trivial problems like an unterminated string literal or an unexpected character.
//! Scan errors are reported as soon as they are encountered. This means that the scanner will
//! continue scanning the source code even if it has already encountered a syntax error. This is
//! useful because it allows the user to fix multiple syntax errors at once.
//!
//! ## Parsing
//! The second step in the interpreter is parsing. Parsing is the process of converting a list of
//! tokens into an abstract syntax tree (AST). The parser is implemented in the [`parser`](parser)
//! module as a recursive descent parser. The parser transforms the list of tokens into expressions
//! and statements. [`Expressions`](expr::Expr) are pieces of code that produce a value, specifically an
//! [`Object`](object::Object). Objects are an umbrella term for all types of values in this language,
//! including literals, functions, classes and instances. [`Statements`](stmt::Stmt) are pieces of code
//! that do not produce a value but instead perform some action. These actions modify the state of the
//! program and thus, are called side-effects. For example, a variable decleration or an if clause
//! would be classified as statements.
//!
//! For example, the string `print 1 + 2;` would be converted into the following AST:
//! ```text
//! PrintStatement {
//!     BinaryExpression {
//!         left: Number(1),
//!         operator: Plus,
//!         right: Number(2),
//!     }
//! }
//! ```
//! The parser reports syntax errors in the source code as a [`ParseError`](error::ParseError).
//! Unlike the scanner, the parser catches errors that span multiple tokens. For example, the
//! following expression is invalid because it is missing the right-hand operand:
//! ```text
//! 1 !=
//! ```
//! However, much like the scanner, the parser will continue parsing the source code even if it
//! has already encountered a syntax error using a technique called synchronization. This is useful
//! because it allows the user to fix multiple syntax errors at once.
//!
//! ## Resolving
//! The third step in the interpreter is resolving. Resolving is the process of statically analyzing
//! the AST to determine the scope of each variable. While this requires a pre-pass of the AST, it
//! is necessary to construct robust lexiacl scoping. The resolver is implemented in the
//! [`resolver`](resolver) module as a tree-walk interpreter. The resolver is run after the parser
//! because it requires the AST to be fully constructed. The resolver reports errors as a
//! [`ResolveError`](error::ResolveError). These errors are syntactically valid but semantically invalid.
//! and therefore, cannot be caught by the scanner or the parser. For example, the following expression
//! is syntactically valid but it is semantically invalid because the variable `a` is defined
//! twice in the same scope:
//! ```text
//! {
//!    var a = 1;
//!    var a = 2;
//! }
//! ```
//!
//! ## Interpreting
//! The final step in the interpreter is _interpreting_. Interpreting is the process of evaluating the
//! AST. The interpreter is implemented in the [`interpreter`](interpreter) module as a tree-walk
//! interpreter. Thanks to all the previous steps, the interpreter is able to evaluate the AST and produce
//! a result. The interpreter reports errors as a [`RuntimeError`](error::RuntimeError). While the
//! scanner, the parser and the resolver try to catch as many errors as possible before running the
//! code, most errors can only be caught at runtime. For example, the following expression is
//! syntactically valid but it is semantically invalid because it tries to add a string and a number:
//! ```text
//! var a = "123";
//! var b = a + 123;
//! ```
//! The interpreter is also responsible for managing the environment. The environment is a mapping of
//! variable names to their values. The environment is implemented in the [`environment`](environment)
//! module as a chain of scopes, each one a name-to-value map linked to its enclosing scope. This
//! allows the interpreter to implement lexical scoping without a separate call stack structure.
//!
//! ## Bytecode
//! The alternative pipeline skips the AST entirely. [`compiler`] is a single-pass Pratt parser
//! that emits opcodes directly as it recognizes each production, and [`vm`] executes the resulting
//! [`Chunk`](chunk::Chunk) on a value stack. It supports the same expression grammar, scoping, and
//! control flow as the tree-walk side, but not user-defined functions or classes.

use std::fs;

pub mod ast;
pub mod chunk;
pub mod class;
pub mod compiler;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;
pub mod value;
pub mod vm;

use ast::AstPrinter;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// Exit code used by both binaries when a file had a scan or parse error.
pub const EX_DATAERR: i32 = 65;
/// Exit code used by both binaries when a file raised an error while running.
pub const EX_SOFTWARE: i32 = 70;

/// Owns the interpreter state across REPL lines so that top-level variable
/// and function declarations persist from one line to the next.
pub struct TreeWalk {
    interpreter: Interpreter,
}

impl TreeWalk {
    pub fn new() -> Self {
        TreeWalk { interpreter: Interpreter::new() }
    }

    pub fn run_file(&mut self, path: &str) -> i32 {
        let contents = fs::read_to_string(path).expect("Should have been able to read the file");
        self.run_source(&contents)
    }

    /// Runs one chunk of source, returning a shell-style exit code: 0 on
    /// success, [`EX_DATAERR`] on a scan/parse/resolve error, [`EX_SOFTWARE`]
    /// on a runtime error.
    pub fn run_source(&mut self, source: &str) -> i32 {
        error::reset_error();

        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens();

        let mut parser = Parser::new(tokens);
        let statements = parser.parse();

        if error::did_error() {
            return EX_DATAERR;
        }

        let mut resolver = Resolver::new(&mut self.interpreter);
        resolver.resolve(&statements);

        if error::did_error() {
            return EX_DATAERR;
        }

        self.interpreter.interpret(&statements);

        if error::did_runtime_error() {
            return EX_SOFTWARE;
        }

        0
    }
}

impl Default for TreeWalk {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses `source` and renders each top-level statement as a parenthesized
/// tree, without resolving or running it. Used by the `--ast` debug flag.
pub fn debug_ast(source: &str) -> Vec<String> {
    error::reset_error();

    let mut scanner = Scanner::new(source);
    let tokens = scanner.scan_tokens();

    let mut parser = Parser::new(tokens);
    let statements = parser.parse();

    let mut printer = AstPrinter;
    statements.iter().map(|stmt| stmt.accept(&mut printer)).collect()
}

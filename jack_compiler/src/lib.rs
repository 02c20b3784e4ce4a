pub mod compile;
pub mod error;
pub mod lex;
pub mod parsing;
pub mod preprocess;
pub mod token_stream;
pub mod tokens;
pub mod xml;

use compile::{vm, CodeGen, CompileConf};
use error::JackResult;
use parsing::ClassDecl;

/// Compile one class from comment-free source text to VM text.
pub fn compile_class(source: &str) -> JackResult<String> {
    compile_class_with(source, CompileConf::default())
}

pub fn compile_class_with(source: &str, conf: CompileConf) -> JackResult<String> {
    // Lexical analysis
    let tokens = lex::tokenize(source)?;

    // Syntactic analysis
    let class = parsing::parse_class(tokens)?;

    // Semantic analysis and code generation
    let code = CodeGen::with_conf(conf).generate(&class)?;

    Ok(vm::to_text(&code))
}

/// Compile the contents of a `.jack` file, comments included.
pub fn compile_str(source: &str) -> JackResult<String> {
    compile_class(&preprocess::strip_comments(source)?)
}

/// Syntax tree of the contents of a `.jack` file.
pub fn parse_str(source: &str) -> JackResult<ClassDecl> {
    let tokens = lex::tokenize(&preprocess::strip_comments(source)?)?;
    Ok(parsing::parse_class(tokens)?)
}

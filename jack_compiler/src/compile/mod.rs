//! Code generation from the syntax tree to VM instructions.
mod codegen;
mod context;
mod symbol;
pub mod vm;

pub use codegen::CodeGen;
pub use context::CompilationContext;
pub use symbol::{Symbol, SymbolCounts, SymbolKind, SymbolTable};
pub use vm::{Arithmetic, Segment, VmInstruction};

/// Code generator settings.
#[derive(Debug, Clone)]
pub struct CompileConf {
    /// Append `push constant 0` and `return` to subroutines whose
    /// statements do not end with a `return`.
    pub implicit_return: bool,
}

impl Default for CompileConf {
    fn default() -> Self {
        Self {
            implicit_return: true,
        }
    }
}

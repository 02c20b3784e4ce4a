//! Per-class compilation state.
use super::{
    symbol::{Symbol, SymbolTable},
    vm::VmInstruction,
    CompileConf,
};
use crate::{error::ResolutionError, parsing::SubroutineKind};
use smol_str::SmolStr;

/// Everything that changes while one class is being compiled.
///
/// Created fresh for each class and dropped once its code is
/// emitted, so no state leaks between compilation units.
pub struct CompilationContext {
    pub(super) conf: CompileConf,
    pub(super) class_name: SmolStr,
    pub(super) symbols: SymbolTable,
    /// Resulting generated code.
    pub(super) code: Vec<VmInstruction>,
    pub(super) subroutine: Option<SubroutineState>,
}

/// State scoped to the subroutine currently being emitted.
pub(super) struct SubroutineState {
    pub(super) name: SmolStr,
    pub(super) kind: SubroutineKind,
    if_count: u16,
    while_count: u16,
}

/// Labels of one `if` statement.
pub(super) struct IfLabels {
    pub(super) if_true: SmolStr,
    pub(super) if_false: SmolStr,
    pub(super) end: SmolStr,
}

/// Labels of one `while` statement.
pub(super) struct WhileLabels {
    pub(super) exp: SmolStr,
    pub(super) end: SmolStr,
}

impl CompilationContext {
    pub fn new(class_name: &str, conf: CompileConf) -> Self {
        Self {
            conf,
            class_name: SmolStr::from(class_name),
            symbols: SymbolTable::new(class_name),
            code: vec![],
            subroutine: None,
        }
    }

    /// Takes the generated code, consuming the context.
    #[inline]
    pub fn into_code(self) -> Vec<VmInstruction> {
        self.code
    }

    #[inline]
    pub(super) fn emit(&mut self, instr: VmInstruction) {
        self.code.push(instr)
    }

    /// Begin emitting a subroutine. Label counters restart at zero.
    pub(super) fn enter_subroutine(&mut self, name: &str, kind: SubroutineKind) {
        self.subroutine = Some(SubroutineState {
            name: SmolStr::from(name),
            kind,
            if_count: 0,
            while_count: 0,
        });
    }

    /// `Class.subroutine` name of a routine in the current class.
    pub(super) fn qualified(&self, name: &str) -> SmolStr {
        SmolStr::from(format!("{}.{}", self.class_name, name))
    }

    pub(super) fn subroutine_name(&self) -> SmolStr {
        self.subroutine
            .as_ref()
            .map(|state| state.name.clone())
            .unwrap_or_default()
    }

    pub(super) fn subroutine_kind(&self) -> Option<SubroutineKind> {
        self.subroutine.as_ref().map(|state| state.kind)
    }

    /// Lookup a variable that must exist.
    pub(super) fn resolve(&self, name: &str) -> Result<Symbol, ResolutionError> {
        self.symbols
            .resolve(name)
            .cloned()
            .ok_or_else(|| ResolutionError::Unresolved {
                name: SmolStr::from(name),
                subroutine: self.subroutine_name(),
            })
    }

    /// Allocate the labels for the next `if` in source order.
    pub(super) fn next_if_labels(&mut self) -> IfLabels {
        let n = match self.subroutine.as_mut() {
            Some(state) => {
                state.if_count += 1;
                state.if_count - 1
            }
            None => 0,
        };

        IfLabels {
            if_true: SmolStr::from(format!("IF_TRUE{n}")),
            if_false: SmolStr::from(format!("IF_FALSE{n}")),
            end: SmolStr::from(format!("IF_END{n}")),
        }
    }

    /// Allocate the labels for the next `while` in source order.
    pub(super) fn next_while_labels(&mut self) -> WhileLabels {
        let n = match self.subroutine.as_mut() {
            Some(state) => {
                state.while_count += 1;
                state.while_count - 1
            }
            None => 0,
        };

        WhileLabels {
            exp: SmolStr::from(format!("WHILE_EXP{n}")),
            end: SmolStr::from(format!("WHILE_END{n}")),
        }
    }
}

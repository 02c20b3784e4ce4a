//! Scoped symbol table.
use super::vm::Segment;
use crate::{
    error::ResolutionError,
    parsing::{ClassVarDec, ClassVarScope, Param, SubroutineKind, Type, VarDec},
};
use smol_str::SmolStr;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: SmolStr,
    pub ty: Type,
    pub kind: SymbolKind,
    /// 0-based ordinal within its kind, in declaration order.
    pub index: u16,
}

impl Symbol {
    /// Memory segment the symbol lives in.
    #[inline]
    pub fn segment(&self) -> Segment {
        self.kind.segment()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Static,
    /// Instance variable, addressed through the `this` segment.
    Field,
    Argument,
    Local,
    /// The fixed `this`/`that` pointer registers.
    Predefined,
}

impl SymbolKind {
    #[rustfmt::skip]
    pub fn segment(&self) -> Segment {
        match self {
            SymbolKind::Static     => Segment::Static,
            SymbolKind::Field      => Segment::This,
            SymbolKind::Argument   => Segment::Argument,
            SymbolKind::Local      => Segment::Local,
            SymbolKind::Predefined => Segment::Pointer,
        }
    }
}

/// Number of slots allocated per kind.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SymbolCounts {
    pub statics: u16,
    pub fields: u16,
    /// Includes the receiver slot of a method.
    pub arguments: u16,
    pub locals: u16,
}

/// Names visible while compiling one class.
///
/// Statics and fields live for the whole class. Arguments and
/// locals are replaced each time a subroutine scope is declared.
#[derive(Debug)]
pub struct SymbolTable {
    statics: BTreeMap<SmolStr, Symbol>,
    fields: BTreeMap<SmolStr, Symbol>,
    arguments: BTreeMap<SmolStr, Symbol>,
    locals: BTreeMap<SmolStr, Symbol>,
    predefined: [Symbol; 2],
    counts: SymbolCounts,
}

impl SymbolTable {
    pub fn new(class_name: &str) -> Self {
        Self {
            statics: BTreeMap::new(),
            fields: BTreeMap::new(),
            arguments: BTreeMap::new(),
            locals: BTreeMap::new(),
            predefined: [
                Symbol {
                    name: SmolStr::from("this"),
                    ty: Type::Class(SmolStr::from(class_name)),
                    kind: SymbolKind::Predefined,
                    index: 0,
                },
                Symbol {
                    name: SmolStr::from("that"),
                    ty: Type::Class(SmolStr::from("Array")),
                    kind: SymbolKind::Predefined,
                    index: 1,
                },
            ],
            counts: SymbolCounts::default(),
        }
    }

    /// Declare the static and field variables of the class.
    ///
    /// A name may only be declared once across both kinds.
    pub fn declare_class_vars(&mut self, var_decs: &[ClassVarDec]) -> Result<(), ResolutionError> {
        for var_dec in var_decs {
            for name in &var_dec.names {
                if self.statics.contains_key(name) || self.fields.contains_key(name) {
                    return Err(ResolutionError::Redeclared {
                        name: name.clone(),
                        scope: "class",
                    });
                }

                let (table, counter, kind) = match var_dec.scope {
                    ClassVarScope::Static => {
                        (&mut self.statics, &mut self.counts.statics, SymbolKind::Static)
                    }
                    ClassVarScope::Field => {
                        (&mut self.fields, &mut self.counts.fields, SymbolKind::Field)
                    }
                };
                insert(table, counter, kind, name, &var_dec.ty);
                log::trace!("declared {kind:?} {} {name} #{}", var_dec.ty, *counter - 1);
            }
        }

        Ok(())
    }

    /// Start a fresh subroutine scope.
    ///
    /// Clears earlier arguments and locals. Class variables are untouched.
    /// Methods reserve argument 0 for the receiver, so their declared
    /// parameters start at slot 1.
    pub fn declare_subroutine_scope(
        &mut self,
        kind: SubroutineKind,
        params: &[Param],
        locals: &[VarDec],
    ) -> Result<(), ResolutionError> {
        self.arguments.clear();
        self.locals.clear();
        self.counts.arguments = match kind {
            SubroutineKind::Method => 1,
            SubroutineKind::Constructor | SubroutineKind::Function => 0,
        };
        self.counts.locals = 0;

        for param in params {
            if self.arguments.contains_key(&param.name) {
                return Err(ResolutionError::Redeclared {
                    name: param.name.clone(),
                    scope: "argument",
                });
            }
            insert(
                &mut self.arguments,
                &mut self.counts.arguments,
                SymbolKind::Argument,
                &param.name,
                &param.ty,
            );
        }

        for var_dec in locals {
            for name in &var_dec.names {
                if self.locals.contains_key(name) {
                    return Err(ResolutionError::Redeclared {
                        name: name.clone(),
                        scope: "local",
                    });
                }
                insert(
                    &mut self.locals,
                    &mut self.counts.locals,
                    SymbolKind::Local,
                    name,
                    &var_dec.ty,
                );
            }
        }

        log::trace!(
            "subroutine scope with {} arguments and {} locals",
            self.counts.arguments,
            self.counts.locals
        );

        Ok(())
    }

    /// Lookup the given name according to the scope rules.
    ///
    /// Searches local, argument, field, static and finally the
    /// predefined pointers. The first match wins.
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.locals
            .get(name)
            .or_else(|| self.arguments.get(name))
            .or_else(|| self.fields.get(name))
            .or_else(|| self.statics.get(name))
            .or_else(|| self.predefined.iter().find(|symbol| symbol.name == name))
    }

    #[inline]
    pub fn counts(&self) -> SymbolCounts {
        self.counts
    }
}

fn insert(
    table: &mut BTreeMap<SmolStr, Symbol>,
    counter: &mut u16,
    kind: SymbolKind,
    name: &SmolStr,
    ty: &Type,
) {
    table.insert(
        name.clone(),
        Symbol {
            name: name.clone(),
            ty: ty.clone(),
            kind,
            index: *counter,
        },
    );
    *counter += 1;
}

#[cfg(test)]
mod test {
    use super::*;

    fn param(ty: Type, name: &str) -> Param {
        Param {
            ty,
            name: name.into(),
        }
    }

    fn table() -> SymbolTable {
        let mut table = SymbolTable::new("Point");
        table
            .declare_class_vars(&[
                ClassVarDec {
                    scope: ClassVarScope::Field,
                    ty: Type::Int,
                    names: vec!["x".into(), "y".into()],
                },
                ClassVarDec {
                    scope: ClassVarScope::Static,
                    ty: Type::Int,
                    names: vec!["count".into()],
                },
            ])
            .unwrap();
        table
    }

    #[test]
    fn test_class_slots() {
        let table = table();
        let y = table.resolve("y").unwrap();
        assert_eq!((y.kind, y.index, y.segment()), (SymbolKind::Field, 1, Segment::This));
        let count = table.resolve("count").unwrap();
        assert_eq!((count.kind, count.index), (SymbolKind::Static, 0));
        assert_eq!(
            table.counts(),
            SymbolCounts {
                statics: 1,
                fields: 2,
                arguments: 0,
                locals: 0
            }
        );
    }

    #[test]
    fn test_method_reserves_receiver() {
        let mut table = table();
        table
            .declare_subroutine_scope(
                SubroutineKind::Method,
                &[param(Type::Int, "dx"), param(Type::Int, "dy")],
                &[],
            )
            .unwrap();
        assert_eq!(table.resolve("dx").unwrap().index, 1);
        assert_eq!(table.resolve("dy").unwrap().index, 2);
        assert_eq!(table.counts().arguments, 3);

        table
            .declare_subroutine_scope(SubroutineKind::Function, &[param(Type::Int, "a")], &[])
            .unwrap();
        assert_eq!(table.resolve("a").unwrap().index, 0);
        assert!(table.resolve("dx").is_none(), "arguments leaked across scopes");
        assert!(table.resolve("x").is_some(), "fields must persist");
    }

    #[test]
    fn test_shadowing_order() {
        let mut table = table();
        table
            .declare_subroutine_scope(
                SubroutineKind::Function,
                &[param(Type::Boolean, "x")],
                &[VarDec {
                    ty: Type::Class("Array".into()),
                    names: vec!["x".into(), "count".into()],
                }],
            )
            .unwrap();

        let x = table.resolve("x").unwrap();
        assert_eq!((x.kind, x.index), (SymbolKind::Local, 0));
        let count = table.resolve("count").unwrap();
        assert_eq!((count.kind, count.index), (SymbolKind::Local, 1));
        assert_eq!(table.resolve("y").unwrap().kind, SymbolKind::Field);
    }

    #[test]
    fn test_predefined_pointers() {
        let table = table();
        let this = table.resolve("this").unwrap();
        assert_eq!((this.segment(), this.index), (Segment::Pointer, 0));
        assert_eq!(this.ty, Type::Class("Point".into()));
        let that = table.resolve("that").unwrap();
        assert_eq!((that.segment(), that.index), (Segment::Pointer, 1));
        assert!(table.resolve("missing").is_none());
    }

    #[test]
    fn test_redeclaration() {
        let mut table = table();
        let err = table
            .declare_class_vars(&[ClassVarDec {
                scope: ClassVarScope::Static,
                ty: Type::Char,
                names: vec!["x".into()],
            }])
            .unwrap_err();
        assert_eq!(
            err,
            ResolutionError::Redeclared {
                name: "x".into(),
                scope: "class"
            }
        );

        let err = table
            .declare_subroutine_scope(
                SubroutineKind::Function,
                &[],
                &[VarDec {
                    ty: Type::Int,
                    names: vec!["i".into(), "i".into()],
                }],
            )
            .unwrap_err();
        assert!(matches!(err, ResolutionError::Redeclared { scope: "local", .. }));
    }
}

use super::{
    context::CompilationContext,
    vm::{Arithmetic, Segment, VmInstruction},
    CompileConf,
};
use crate::{
    error::{CodegenError, JackResult},
    parsing::{
        BinaryOp, ClassDecl, Expression, KeywordConst, Statement, SubroutineCall, SubroutineDec,
        SubroutineKind, Term, UnaryOp,
    },
};
use smol_str::SmolStr;

/// Code generator.
///
/// Holds only configuration. Every call to [`CodeGen::generate`] builds
/// a fresh [`CompilationContext`], so one generator can be shared
/// between classes and threads.
pub struct CodeGen {
    conf: CompileConf,
}

impl CodeGen {
    #[inline]
    pub fn new() -> Self {
        Self::with_conf(CompileConf::default())
    }

    #[inline]
    pub fn with_conf(conf: CompileConf) -> Self {
        Self { conf }
    }

    /// Translate one class into VM instructions.
    pub fn generate(&self, class: &ClassDecl) -> JackResult<Vec<VmInstruction>> {
        log::debug!("generating class '{}'", class.name);

        let mut ctx = CompilationContext::new(&class.name, self.conf.clone());
        ctx.emit_class(class)?;
        Ok(ctx.into_code())
    }
}

impl Default for CodeGen {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursive visitor
impl CompilationContext {
    fn emit_class(&mut self, class: &ClassDecl) -> JackResult<()> {
        self.symbols.declare_class_vars(&class.var_decs)?;

        for subroutine in &class.subroutines {
            self.emit_subroutine(subroutine)?;
        }

        Ok(())
    }

    fn emit_subroutine(&mut self, subroutine: &SubroutineDec) -> JackResult<()> {
        let SubroutineDec {
            kind, name, body, ..
        } = subroutine;

        self.symbols
            .declare_subroutine_scope(*kind, &subroutine.params, &body.locals)?;
        self.enter_subroutine(name, *kind);

        let counts = self.symbols.counts();
        log::debug!(
            "{} {} with {} arguments and {} locals",
            kind.keyword(),
            self.qualified(name),
            counts.arguments,
            counts.locals
        );

        self.emit(VmInstruction::Function(self.qualified(name), counts.locals));

        match kind {
            SubroutineKind::Constructor => {
                self.emit(VmInstruction::Push(Segment::Constant, counts.fields));
                self.emit(VmInstruction::Call(SmolStr::from("Memory.alloc"), 1));
                self.emit(VmInstruction::Pop(Segment::Pointer, 0));
            }
            SubroutineKind::Method => {
                self.emit(VmInstruction::Push(Segment::Argument, 0));
                self.emit(VmInstruction::Pop(Segment::Pointer, 0));
            }
            SubroutineKind::Function => {}
        }

        self.emit_statements(&body.statements)?;

        let returns = matches!(body.statements.last(), Some(Statement::Return(_)));
        if self.conf.implicit_return && !returns {
            log::trace!("appending implicit return to {}", self.qualified(name));
            self.emit(VmInstruction::Push(Segment::Constant, 0));
            self.emit(VmInstruction::Return);
        }

        Ok(())
    }

    fn emit_statements(&mut self, statements: &[Statement]) -> JackResult<()> {
        for statement in statements {
            self.emit_statement(statement)?;
        }
        Ok(())
    }

    fn emit_statement(&mut self, statement: &Statement) -> JackResult<()> {
        match statement {
            Statement::Let {
                target,
                index: None,
                value,
            } => {
                self.emit_expression(value)?;
                let symbol = self.resolve(target)?;
                self.emit(VmInstruction::Pop(symbol.segment(), symbol.index));
            }
            Statement::Let {
                target,
                index: Some(index),
                value,
            } => {
                // Address first, the value may repoint `that`.
                let symbol = self.resolve(target)?;
                self.emit(VmInstruction::Push(symbol.segment(), symbol.index));
                self.emit_expression(index)?;
                self.emit(VmInstruction::Arithmetic(Arithmetic::Add));
                self.emit_expression(value)?;
                self.emit(VmInstruction::Pop(Segment::Temp, 0));
                self.emit(VmInstruction::Pop(Segment::Pointer, 1));
                self.emit(VmInstruction::Push(Segment::Temp, 0));
                self.emit(VmInstruction::Pop(Segment::That, 0));
            }
            Statement::If {
                cond,
                then,
                otherwise,
            } => {
                let labels = self.next_if_labels();
                self.emit_expression(cond)?;
                self.emit(VmInstruction::IfGoto(labels.if_true.clone()));
                self.emit(VmInstruction::Goto(labels.if_false.clone()));
                self.emit(VmInstruction::Label(labels.if_true));
                self.emit_statements(then)?;

                match otherwise {
                    Some(otherwise) => {
                        self.emit(VmInstruction::Goto(labels.end.clone()));
                        self.emit(VmInstruction::Label(labels.if_false));
                        self.emit_statements(otherwise)?;
                        self.emit(VmInstruction::Label(labels.end));
                    }
                    None => self.emit(VmInstruction::Label(labels.if_false)),
                }
            }
            Statement::While { cond, body } => {
                let labels = self.next_while_labels();
                self.emit(VmInstruction::Label(labels.exp.clone()));
                self.emit_expression(cond)?;
                self.emit(VmInstruction::Arithmetic(Arithmetic::Not));
                self.emit(VmInstruction::IfGoto(labels.end.clone()));
                self.emit_statements(body)?;
                self.emit(VmInstruction::Goto(labels.exp));
                self.emit(VmInstruction::Label(labels.end));
            }
            Statement::Do(call) => {
                self.emit_call(call)?;
                // Discard the return value.
                self.emit(VmInstruction::Pop(Segment::Temp, 0));
            }
            Statement::Return(value) => {
                match value {
                    Some(expr) => self.emit_expression(expr)?,
                    None => self.emit(VmInstruction::Push(Segment::Constant, 0)),
                }
                self.emit(VmInstruction::Return);
            }
        }

        Ok(())
    }

    /// Terms are evaluated strictly left to right.
    fn emit_expression(&mut self, expr: &Expression) -> JackResult<()> {
        self.emit_term(&expr.first)?;

        for (op, term) in &expr.rest {
            self.emit_term(term)?;
            self.emit_binary_op(*op);
        }

        Ok(())
    }

    #[rustfmt::skip]
    fn emit_binary_op(&mut self, op: BinaryOp) {
        let instr = match op {
            BinaryOp::Add => VmInstruction::Arithmetic(Arithmetic::Add),
            BinaryOp::Sub => VmInstruction::Arithmetic(Arithmetic::Sub),
            BinaryOp::Mul => VmInstruction::Call(SmolStr::from("Math.multiply"), 2),
            BinaryOp::Div => VmInstruction::Call(SmolStr::from("Math.divide"), 2),
            BinaryOp::And => VmInstruction::Arithmetic(Arithmetic::And),
            BinaryOp::Or  => VmInstruction::Arithmetic(Arithmetic::Or),
            BinaryOp::Lt  => VmInstruction::Arithmetic(Arithmetic::Lt),
            BinaryOp::Gt  => VmInstruction::Arithmetic(Arithmetic::Gt),
            BinaryOp::Eq  => VmInstruction::Arithmetic(Arithmetic::Eq),
        };
        self.emit(instr);
    }

    fn emit_term(&mut self, term: &Term) -> JackResult<()> {
        match term {
            Term::IntLiteral(value) => self.emit(VmInstruction::Push(Segment::Constant, *value)),
            Term::StringLiteral(text) => self.emit_string(text),
            Term::KeywordConst(constant) => self.emit_keyword_const(*constant)?,
            Term::VarRef(name) => {
                let symbol = self.resolve(name)?;
                self.emit(VmInstruction::Push(symbol.segment(), symbol.index));
            }
            Term::IndexedVarRef { name, index } => {
                let symbol = self.resolve(name)?;
                self.emit(VmInstruction::Push(symbol.segment(), symbol.index));
                self.emit_expression(index)?;
                self.emit(VmInstruction::Arithmetic(Arithmetic::Add));
                self.emit(VmInstruction::Pop(Segment::Pointer, 1));
                self.emit(VmInstruction::Push(Segment::That, 0));
            }
            Term::Call(call) => self.emit_call(call)?,
            Term::Unary { op, operand } => {
                self.emit_term(operand)?;
                let arith = match op {
                    UnaryOp::Neg => Arithmetic::Neg,
                    UnaryOp::Not => Arithmetic::Not,
                };
                self.emit(VmInstruction::Arithmetic(arith));
            }
            Term::Paren(inner) => self.emit_expression(inner)?,
        }

        Ok(())
    }

    /// Build the string at runtime one character at a time.
    ///
    /// The lexer limits the length and every character code to 15 bits.
    fn emit_string(&mut self, text: &str) {
        let len = text.chars().count();
        self.emit(VmInstruction::Push(Segment::Constant, len as u16));
        self.emit(VmInstruction::Call(SmolStr::from("String.new"), 1));

        for c in text.chars() {
            self.emit(VmInstruction::Push(Segment::Constant, c as u16));
            self.emit(VmInstruction::Call(SmolStr::from("String.appendChar"), 2));
        }
    }

    fn emit_keyword_const(&mut self, constant: KeywordConst) -> JackResult<()> {
        match constant {
            KeywordConst::True => {
                self.emit(VmInstruction::Push(Segment::Constant, 0));
                self.emit(VmInstruction::Arithmetic(Arithmetic::Not));
            }
            KeywordConst::False | KeywordConst::Null => {
                self.emit(VmInstruction::Push(Segment::Constant, 0));
            }
            KeywordConst::This => {
                if self.subroutine_kind() == Some(SubroutineKind::Function) {
                    return Err(CodegenError::NoReceiver {
                        subroutine: self.subroutine_name(),
                    }
                    .into());
                }
                let symbol = self.resolve("this")?;
                self.emit(VmInstruction::Push(symbol.segment(), symbol.index));
            }
        }

        Ok(())
    }

    /// Three call forms:
    ///
    /// - `name(..)` calls a method on the current object.
    /// - `var.name(..)` calls a method on the object held by `var`.
    /// - `Class.name(..)` calls a function or constructor.
    ///
    /// Methods receive their object as an extra leading argument.
    fn emit_call(&mut self, call: &SubroutineCall) -> JackResult<()> {
        let mut n_args = call.args.len() as u16;

        let target = match &call.receiver {
            None => {
                self.emit(VmInstruction::Push(Segment::Pointer, 0));
                n_args += 1;
                self.qualified(&call.name)
            }
            Some(receiver) => match self.symbols.resolve(receiver).cloned() {
                Some(symbol) => {
                    if symbol.ty.is_primitive() {
                        return Err(CodegenError::PrimitiveReceiver {
                            name: receiver.clone(),
                            ty: SmolStr::from(symbol.ty.name()),
                            method: call.name.clone(),
                        }
                        .into());
                    }
                    self.emit(VmInstruction::Push(symbol.segment(), symbol.index));
                    n_args += 1;
                    SmolStr::from(format!("{}.{}", symbol.ty.name(), call.name))
                }
                None => SmolStr::from(format!("{}.{}", receiver, call.name)),
            },
        };

        for arg in &call.args {
            self.emit_expression(arg)?;
        }

        self.emit(VmInstruction::Call(target, n_args));
        Ok(())
    }
}

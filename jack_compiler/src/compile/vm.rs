//! VM instruction set emitted by the code generator.
use smol_str::SmolStr;
use std::fmt;

/// Named storage region addressed by push and pop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Constant,
    Argument,
    Local,
    Static,
    This,
    That,
    Pointer,
    Temp,
}

impl fmt::Display for Segment {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Segment::Constant => "constant",
            Segment::Argument => "argument",
            Segment::Local    => "local",
            Segment::Static   => "static",
            Segment::This     => "this",
            Segment::That     => "that",
            Segment::Pointer  => "pointer",
            Segment::Temp     => "temp",
        };
        f.write_str(name)
    }
}

/// Stack arithmetic and logic commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arithmetic {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl fmt::Display for Arithmetic {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Arithmetic::Add => "add",
            Arithmetic::Sub => "sub",
            Arithmetic::Neg => "neg",
            Arithmetic::Eq  => "eq",
            Arithmetic::Gt  => "gt",
            Arithmetic::Lt  => "lt",
            Arithmetic::And => "and",
            Arithmetic::Or  => "or",
            Arithmetic::Not => "not",
        };
        f.write_str(name)
    }
}

/// One line of VM code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmInstruction {
    Push(Segment, u16),
    Pop(Segment, u16),
    Arithmetic(Arithmetic),
    Label(SmolStr),
    Goto(SmolStr),
    IfGoto(SmolStr),
    /// Qualified `Class.subroutine` name and argument count.
    Call(SmolStr, u16),
    /// Qualified `Class.subroutine` name and local variable count.
    Function(SmolStr, u16),
    Return,
}

/// Outputs instruction as VM text, the format consumed by the VM translator.
impl fmt::Display for VmInstruction {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VmInstruction::Push(segment, index)    => write!(f, "push {} {}", segment, index),
            VmInstruction::Pop(segment, index)     => write!(f, "pop {} {}", segment, index),
            VmInstruction::Arithmetic(op)          => write!(f, "{}", op),
            VmInstruction::Label(name)             => write!(f, "label {}", name),
            VmInstruction::Goto(name)              => write!(f, "goto {}", name),
            VmInstruction::IfGoto(name)            => write!(f, "if-goto {}", name),
            VmInstruction::Call(name, args)        => write!(f, "call {} {}", name, args),
            VmInstruction::Function(name, locals)  => write!(f, "function {} {}", name, locals),
            VmInstruction::Return                  => write!(f, "return"),
        }
    }
}

/// Render instructions as newline terminated lines.
pub fn to_text(code: &[VmInstruction]) -> String {
    use fmt::Write;

    let mut text = String::new();
    for instr in code {
        // Writing into a String cannot fail.
        let _ = writeln!(text, "{}", instr);
    }
    text
}

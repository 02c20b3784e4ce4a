//! Analyzer XML output of tokens and syntax trees.
use crate::{
    parsing::{
        ClassDecl, ClassVarDec, Expression, Param, Statement, SubroutineCall, SubroutineDec, Term,
        Type, VarDec,
    },
    tokens::{Keyword, Symbol, Token},
};
use std::fmt::Write;

/// Flat listing of a token sequence wrapped in `<tokens>`.
///
/// Token lines are not indented.
pub fn tokens_to_xml(tokens: &[Token]) -> String {
    let mut out = XmlWriter::new();
    out.raw_line("<tokens>");
    for token in tokens {
        out.leaf(token.kind.xml_tag(), &token.text);
    }
    out.raw_line("</tokens>");
    out.finish()
}

/// Nested syntax tree of one class.
///
/// Terminals are reconstructed from the tree, so the output is the
/// same whichever source formatting produced it.
pub fn class_to_xml(class: &ClassDecl) -> String {
    let mut out = XmlWriter::new();
    out.class(class);
    out.finish()
}

/// Replace the characters with special meaning in XML.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

struct XmlWriter {
    out: String,
    depth: usize,
}

impl XmlWriter {
    const INDENT: usize = 2;

    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn finish(self) -> String {
        self.out
    }

    fn indent(&mut self) {
        for _ in 0..self.depth * Self::INDENT {
            self.out.push(' ');
        }
    }

    fn open(&mut self, tag: &str) {
        self.indent();
        let _ = writeln!(self.out, "<{tag}>");
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        let _ = writeln!(self.out, "</{tag}>");
    }

    fn raw_line(&mut self, line: &str) {
        self.indent();
        self.out.push_str(line);
        self.out.push('\n');
    }

    fn leaf(&mut self, tag: &str, text: &str) {
        self.indent();
        let _ = writeln!(self.out, "<{tag}> {} </{tag}>", escape(text));
    }

    #[inline]
    fn keyword(&mut self, keyword: Keyword) {
        self.leaf("keyword", keyword.as_str());
    }

    #[inline]
    fn symbol(&mut self, symbol: Symbol) {
        self.leaf("symbol", symbol.as_str());
    }

    #[inline]
    fn ident(&mut self, name: &str) {
        self.leaf("identifier", name);
    }

    fn ty(&mut self, ty: &Type) {
        match ty {
            Type::Int => self.keyword(Keyword::Int),
            Type::Char => self.keyword(Keyword::Char),
            Type::Boolean => self.keyword(Keyword::Boolean),
            Type::Class(name) => self.ident(name),
        }
    }

    /// `name (, name)*`
    fn names(&mut self, names: &[smol_str::SmolStr]) {
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.symbol(Symbol::Comma);
            }
            self.ident(name);
        }
    }
}

/// Grammar rules
impl XmlWriter {
    fn class(&mut self, class: &ClassDecl) {
        self.open("class");
        self.keyword(Keyword::Class);
        self.ident(&class.name);
        self.symbol(Symbol::LeftBrace);
        for var_dec in &class.var_decs {
            self.class_var_dec(var_dec);
        }
        for subroutine in &class.subroutines {
            self.subroutine_dec(subroutine);
        }
        self.symbol(Symbol::RightBrace);
        self.close("class");
    }

    fn class_var_dec(&mut self, var_dec: &ClassVarDec) {
        self.open("classVarDec");
        self.keyword(var_dec.scope.keyword());
        self.ty(&var_dec.ty);
        self.names(&var_dec.names);
        self.symbol(Symbol::Semicolon);
        self.close("classVarDec");
    }

    fn subroutine_dec(&mut self, subroutine: &SubroutineDec) {
        self.open("subroutineDec");
        self.keyword(subroutine.kind.keyword());
        match &subroutine.return_type {
            Some(ty) => self.ty(ty),
            None => self.keyword(Keyword::Void),
        }
        self.ident(&subroutine.name);
        self.symbol(Symbol::LeftParen);
        self.parameter_list(&subroutine.params);
        self.symbol(Symbol::RightParen);

        self.open("subroutineBody");
        self.symbol(Symbol::LeftBrace);
        for var_dec in &subroutine.body.locals {
            self.var_dec(var_dec);
        }
        self.statements(&subroutine.body.statements);
        self.symbol(Symbol::RightBrace);
        self.close("subroutineBody");

        self.close("subroutineDec");
    }

    fn parameter_list(&mut self, params: &[Param]) {
        self.open("parameterList");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.symbol(Symbol::Comma);
            }
            self.ty(&param.ty);
            self.ident(&param.name);
        }
        self.close("parameterList");
    }

    fn var_dec(&mut self, var_dec: &VarDec) {
        self.open("varDec");
        self.keyword(Keyword::Var);
        self.ty(&var_dec.ty);
        self.names(&var_dec.names);
        self.symbol(Symbol::Semicolon);
        self.close("varDec");
    }

    fn statements(&mut self, statements: &[Statement]) {
        self.open("statements");
        for statement in statements {
            self.statement(statement);
        }
        self.close("statements");
    }

    /// `{ statements }`
    fn block(&mut self, statements: &[Statement]) {
        self.symbol(Symbol::LeftBrace);
        self.statements(statements);
        self.symbol(Symbol::RightBrace);
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Let {
                target,
                index,
                value,
            } => {
                self.open("letStatement");
                self.keyword(Keyword::Let);
                self.ident(target);
                if let Some(index) = index {
                    self.symbol(Symbol::LeftBracket);
                    self.expression(index);
                    self.symbol(Symbol::RightBracket);
                }
                self.symbol(Symbol::Eq);
                self.expression(value);
                self.symbol(Symbol::Semicolon);
                self.close("letStatement");
            }
            Statement::If {
                cond,
                then,
                otherwise,
            } => {
                self.open("ifStatement");
                self.keyword(Keyword::If);
                self.symbol(Symbol::LeftParen);
                self.expression(cond);
                self.symbol(Symbol::RightParen);
                self.block(then);
                if let Some(otherwise) = otherwise {
                    self.keyword(Keyword::Else);
                    self.block(otherwise);
                }
                self.close("ifStatement");
            }
            Statement::While { cond, body } => {
                self.open("whileStatement");
                self.keyword(Keyword::While);
                self.symbol(Symbol::LeftParen);
                self.expression(cond);
                self.symbol(Symbol::RightParen);
                self.block(body);
                self.close("whileStatement");
            }
            Statement::Do(call) => {
                self.open("doStatement");
                self.keyword(Keyword::Do);
                self.call(call);
                self.symbol(Symbol::Semicolon);
                self.close("doStatement");
            }
            Statement::Return(value) => {
                self.open("returnStatement");
                self.keyword(Keyword::Return);
                if let Some(value) = value {
                    self.expression(value);
                }
                self.symbol(Symbol::Semicolon);
                self.close("returnStatement");
            }
        }
    }

    fn expression(&mut self, expr: &Expression) {
        self.open("expression");
        self.term(&expr.first);
        for (op, term) in &expr.rest {
            self.symbol(op.symbol());
            self.term(term);
        }
        self.close("expression");
    }

    fn term(&mut self, term: &Term) {
        self.open("term");
        match term {
            Term::IntLiteral(value) => self.leaf("integerConstant", &value.to_string()),
            Term::StringLiteral(text) => self.leaf("stringConstant", text),
            Term::KeywordConst(constant) => self.keyword(constant.keyword()),
            Term::VarRef(name) => self.ident(name),
            Term::IndexedVarRef { name, index } => {
                self.ident(name);
                self.symbol(Symbol::LeftBracket);
                self.expression(index);
                self.symbol(Symbol::RightBracket);
            }
            Term::Call(call) => self.call(call),
            Term::Unary { op, operand } => {
                self.symbol(op.symbol());
                self.term(operand);
            }
            Term::Paren(inner) => {
                self.symbol(Symbol::LeftParen);
                self.expression(inner);
                self.symbol(Symbol::RightParen);
            }
        }
        self.close("term");
    }

    /// Calls are not wrapped in an element of their own.
    fn call(&mut self, call: &SubroutineCall) {
        if let Some(receiver) = &call.receiver {
            self.ident(receiver);
            self.symbol(Symbol::Dot);
        }
        self.ident(&call.name);
        self.symbol(Symbol::LeftParen);
        self.open("expressionList");
        for (i, arg) in call.args.iter().enumerate() {
            if i > 0 {
                self.symbol(Symbol::Comma);
            }
            self.expression(arg);
        }
        self.close("expressionList");
        self.symbol(Symbol::RightParen);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{lex::tokenize, parsing::parse_class};

    #[test]
    fn test_escape() {
        assert_eq!(escape("a < b & \"c\" > d"), "a &lt; b &amp; &quot;c&quot; &gt; d");
    }

    #[test]
    fn test_tokens() {
        let tokens = tokenize("let x = a < \"hi\";").unwrap();
        assert_eq!(
            tokens_to_xml(&tokens),
            "<tokens>\n\
             <keyword> let </keyword>\n\
             <identifier> x </identifier>\n\
             <symbol> = </symbol>\n\
             <identifier> a </identifier>\n\
             <symbol> &lt; </symbol>\n\
             <stringConstant> hi </stringConstant>\n\
             <symbol> ; </symbol>\n\
             </tokens>\n"
        );
    }

    #[test]
    fn test_class_tree() {
        let tokens = tokenize("class A { function void f() { do g(1); return; } }").unwrap();
        let class = parse_class(tokens).unwrap();
        let expected = "\
<class>
  <keyword> class </keyword>
  <identifier> A </identifier>
  <symbol> { </symbol>
  <subroutineDec>
    <keyword> function </keyword>
    <keyword> void </keyword>
    <identifier> f </identifier>
    <symbol> ( </symbol>
    <parameterList>
    </parameterList>
    <symbol> ) </symbol>
    <subroutineBody>
      <symbol> { </symbol>
      <statements>
        <doStatement>
          <keyword> do </keyword>
          <identifier> g </identifier>
          <symbol> ( </symbol>
          <expressionList>
            <expression>
              <term>
                <integerConstant> 1 </integerConstant>
              </term>
            </expression>
          </expressionList>
          <symbol> ) </symbol>
          <symbol> ; </symbol>
        </doStatement>
        <returnStatement>
          <keyword> return </keyword>
          <symbol> ; </symbol>
        </returnStatement>
      </statements>
      <symbol> } </symbol>
    </subroutineBody>
  </subroutineDec>
  <symbol> } </symbol>
</class>
";
        assert_eq!(class_to_xml(&class), expected);
    }
}

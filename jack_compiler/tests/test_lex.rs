use jack_compiler::{
    lex::{debug_print_lexer, tokenize, Lexer},
    preprocess::strip_comments,
    tokens::{Keyword, Symbol, TokenKind},
    xml::tokens_to_xml,
};

const POINT: &str = include_str!("Point.jack");
const MAIN: &str = include_str!("Main.jack");

#[test]
fn test_lex_point() {
    let source = strip_comments(POINT).unwrap();
    debug_print_lexer(Lexer::new(&source));

    let tokens = tokenize(&source).unwrap();
    assert!(tokens[0].is_keyword(Keyword::Class));
    assert_eq!(tokens[1].kind, TokenKind::Ident);
    assert_eq!(tokens[1].text, "Point");
    assert!(tokens[2].is_symbol(Symbol::LeftBrace));
    assert!(tokens.last().unwrap().is_symbol(Symbol::RightBrace));

    // Comments are blanked, positions of the rest are kept.
    assert_eq!(tokens[0].span.line, 2);
    assert!(tokens.iter().all(|token| token.text != "Creates"));
}

#[test]
fn test_lex_main_constants() {
    let tokens = tokenize(&strip_comments(MAIN).unwrap()).unwrap();

    let string = tokens
        .iter()
        .find(|token| token.kind == TokenKind::StrConst)
        .unwrap();
    assert_eq!(string.text, "a<b");

    let ints: Vec<&str> = tokens
        .iter()
        .filter(|token| token.kind == TokenKind::IntConst)
        .map(|token| token.text.as_str())
        .collect();
    assert_eq!(ints, vec!["90", "1", "2", "3"]);
}

#[test]
fn test_tokens_xml() {
    let tokens = tokenize(&strip_comments(MAIN).unwrap()).unwrap();
    let xml = tokens_to_xml(&tokens);

    assert!(xml.starts_with("<tokens>\n<keyword> class </keyword>\n<identifier> Main </identifier>\n"));
    assert!(xml.contains("<stringConstant> a&lt;b </stringConstant>\n"));
    assert!(xml.contains("<integerConstant> 90 </integerConstant>\n"));
    assert!(xml.ends_with("<symbol> } </symbol>\n</tokens>\n"));
    assert_eq!(xml.lines().count(), tokens.len() + 2);
}

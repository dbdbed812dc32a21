use quill::lexer::{Token, strip_comments};

#[test]
fn lex_keywords() {
    let tokens = Token::lex("fn let return if true false").unwrap();
    assert_eq!(tokens.len(), 6);
    assert!(matches!(tokens[0], Token::Fn(_)));
    assert!(matches!(tokens[1], Token::Let(_)));
    assert!(matches!(tokens[2], Token::Return(_)));
    assert!(matches!(tokens[3], Token::If(_)));
    assert!(matches!(tokens[4], Token::True(_)));
    assert!(matches!(tokens[5], Token::False(_)));
}

#[test]
fn lex_identifiers() {
    let tokens = Token::lex("foo _bar baz9").unwrap();
    assert_eq!(tokens.len(), 3);
    assert!(matches!(&tokens[0], Token::Ident(i) if i.value == "foo"));
    assert!(matches!(&tokens[1], Token::Ident(i) if i.value == "_bar"));
    assert!(matches!(&tokens[2], Token::Ident(i) if i.value == "baz9"));
}

#[test]
fn lex_integers() {
    let tokens = Token::lex("42 0 123").unwrap();
    assert_eq!(tokens.len(), 3);
    assert!(matches!(&tokens[0], Token::Integer(i) if i.value == "42"));
    assert!(matches!(&tokens[2], Token::Integer(i) if i.value == "123"));
}

#[test]
fn lex_string_literals() {
    let tokens = Token::lex(r#""hello" "with \"quotes\"""#).unwrap();
    assert_eq!(tokens.len(), 2);
    assert!(matches!(&tokens[0], Token::StringLiteral(s) if s.value == "\"hello\""));
    assert!(matches!(&tokens[1], Token::StringLiteral(_)));
}

#[test]
fn lex_symbols() {
    let tokens = Token::lex("( ) { } , ; = + -").unwrap();
    assert_eq!(tokens.len(), 9);
    assert!(matches!(tokens[0], Token::LParen(_)));
    assert!(matches!(tokens[1], Token::RParen(_)));
    assert!(matches!(tokens[2], Token::LBrace(_)));
    assert!(matches!(tokens[3], Token::RBrace(_)));
    assert!(matches!(tokens[4], Token::Comma(_)));
    assert!(matches!(tokens[5], Token::Semicolon(_)));
    assert!(matches!(tokens[6], Token::Equals(_)));
    assert!(matches!(tokens[7], Token::Plus(_)));
    assert!(matches!(tokens[8], Token::Minus(_)));
}

#[test]
fn lex_function_header() {
    let tokens = Token::lex("fn int add(int a, int b) {").unwrap();
    let described: Vec<_> = tokens.iter().map(Token::describe).collect();
    assert_eq!(
        described,
        vec![
            "'fn'",
            "identifier 'int'",
            "identifier 'add'",
            "'('",
            "identifier 'int'",
            "identifier 'a'",
            "','",
            "identifier 'int'",
            "identifier 'b'",
            "')'",
            "'{'",
        ]
    );
}

#[test]
fn comments_are_stripped_before_lexing() {
    let source = strip_comments("fn unit main() { // this is a comment\n}");
    let tokens = Token::lex(&source).unwrap();

    let has_comment = tokens
        .iter()
        .any(|t| matches!(t, Token::Ident(i) if i.value == "comment"));
    assert!(!has_comment, "comment tokens should be stripped");
    assert_eq!(tokens.len(), 7);
}

#[test]
fn comment_marker_inside_string_is_kept() {
    let source = strip_comments(r#"echo("a // b"); // gone"#);
    assert_eq!(source, r#"echo("a // b"); "#);
}

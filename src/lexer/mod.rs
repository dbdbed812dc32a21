use lachs::Span;

#[lachs::token]
pub enum Token {
    #[terminal("fn")]
    Fn,
    #[terminal("let")]
    Let,
    #[terminal("return")]
    Return,
    #[terminal("if")]
    If,
    #[terminal("true")]
    True,
    #[terminal("false")]
    False,
    #[literal("[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
    #[literal("[0-9]+")]
    Integer,
    #[literal(r#""([^"\\]|\\.)*""#)]
    StringLiteral,
    #[terminal("=")]
    Equals,
    #[terminal("+")]
    Plus,
    #[terminal("-")]
    Minus,
    #[terminal(",")]
    Comma,
    #[terminal(";")]
    Semicolon,
    #[terminal("(")]
    LParen,
    #[terminal(")")]
    RParen,
    #[terminal("{")]
    LBrace,
    #[terminal("}")]
    RBrace,
}

impl Token {
    pub fn pos(&self) -> Span {
        match self {
            Token::Fn(inner) => inner.position.clone(),
            Token::Let(inner) => inner.position.clone(),
            Token::Return(inner) => inner.position.clone(),
            Token::If(inner) => inner.position.clone(),
            Token::True(inner) => inner.position.clone(),
            Token::False(inner) => inner.position.clone(),
            Token::Ident(inner) => inner.position.clone(),
            Token::Integer(inner) => inner.position.clone(),
            Token::StringLiteral(inner) => inner.position.clone(),
            Token::Equals(inner) => inner.position.clone(),
            Token::Plus(inner) => inner.position.clone(),
            Token::Minus(inner) => inner.position.clone(),
            Token::Comma(inner) => inner.position.clone(),
            Token::Semicolon(inner) => inner.position.clone(),
            Token::LParen(inner) => inner.position.clone(),
            Token::RParen(inner) => inner.position.clone(),
            Token::LBrace(inner) => inner.position.clone(),
            Token::RBrace(inner) => inner.position.clone(),
        }
    }

    /// Returns a human-readable description of the token
    pub fn describe(&self) -> String {
        match self {
            Token::Fn(_) => "'fn'".to_string(),
            Token::Let(_) => "'let'".to_string(),
            Token::Return(_) => "'return'".to_string(),
            Token::If(_) => "'if'".to_string(),
            Token::True(_) => "'true'".to_string(),
            Token::False(_) => "'false'".to_string(),
            Token::Ident(inner) => format!("identifier '{}'", inner.value),
            Token::Integer(inner) => format!("integer '{}'", inner.value),
            Token::StringLiteral(inner) => format!("string {}", inner.value),
            Token::Equals(_) => "'='".to_string(),
            Token::Plus(_) => "'+'".to_string(),
            Token::Minus(_) => "'-'".to_string(),
            Token::Comma(_) => "','".to_string(),
            Token::Semicolon(_) => "';'".to_string(),
            Token::LParen(_) => "'('".to_string(),
            Token::RParen(_) => "')'".to_string(),
            Token::LBrace(_) => "'{'".to_string(),
            Token::RBrace(_) => "'}'".to_string(),
        }
    }
}

/// Remove `//` line comments, keeping the newline so that spans of the
/// remaining tokens still point at their original lines.
///
/// Comment markers inside string literals are left alone.
pub fn strip_comments(source: &str) -> String {
    let mut output = String::with_capacity(source.len());

    for (index, line) in source.split('\n').enumerate() {
        if index > 0 {
            output.push('\n');
        }
        output.push_str(&line[..comment_start(line)]);
    }

    output
}

fn comment_start(line: &str) -> usize {
    let bytes = line.as_bytes();
    let mut in_string = false;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_string => i += 1,
            b'"' => in_string = !in_string,
            b'/' if !in_string && bytes.get(i + 1) == Some(&b'/') => return i,
            _ => {}
        }
        i += 1;
    }

    line.len()
}

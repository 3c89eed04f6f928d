use crate::token::{Token, TokenKind};

/// Hand-written scanner over Unicode scalar values.
///
/// Produces one token per `next_token` call and never fails: malformed
/// input comes back as `TokenKind::Error` tokens, and every call after the
/// end of input returns `TokenKind::Eof` again.
pub struct Lexer {
    source: Vec<char>,
    arrow: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            arrow: 0,
            line: 1,
            column: 1,
        }
    }

    /// Rewinds to the start of the source.
    pub fn reset(&mut self) {
        self.arrow = 0;
        self.line = 1;
        self.column = 1;
    }

    pub fn next_token(&mut self) -> Token {
        let (line, column) = loop {
            self.skip_whitespace();
            let line = self.line;
            let column = self.column;
            match (self.peek(), self.peek_at(1)) {
                (Some('/'), Some('/')) => self.skip_line_comment(),
                (Some('/'), Some('*')) => {
                    if let Some(error) = self.skip_block_comment(line, column) {
                        return error;
                    }
                }
                _ => break (line, column),
            }
        };

        let Some(c) = self.read() else {
            return Token::new(TokenKind::Eof, "", line, column);
        };

        // Longest match on the `=` / `!` families.
        if (c == '=' || c == '!') && self.peek() == Some('=') {
            self.read();
            let kind = if self.peek() == Some('=') {
                self.read();
                if c == '=' { TokenKind::Is } else { TokenKind::Isnt }
            } else if c == '=' {
                TokenKind::Eq
            } else {
                TokenKind::Ne
            };
            return Token::new(kind, kind.to_string(), line, column);
        }

        let dual = match (c, self.peek()) {
            ('<', Some('=')) => Some(TokenKind::Le),
            ('>', Some('=')) => Some(TokenKind::Ge),
            ('-', Some('>')) => Some(TokenKind::Arrow),
            (':', Some('=')) => Some(TokenKind::Define),
            ('+', Some('=')) => Some(TokenKind::PlusAssign),
            ('-', Some('=')) => Some(TokenKind::MinusAssign),
            ('*', Some('=')) => Some(TokenKind::StarAssign),
            ('/', Some('=')) => Some(TokenKind::SlashAssign),
            _ => None,
        };
        if let Some(kind) = dual {
            self.read();
            return Token::new(kind, kind.to_string(), line, column);
        }

        let mono = match c {
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            '[' => Some(TokenKind::LBrack),
            ']' => Some(TokenKind::RBrack),
            ';' => Some(TokenKind::Semi),
            ':' => Some(TokenKind::Colon),
            '?' => Some(TokenKind::Quest),
            ',' => Some(TokenKind::Comma),
            '=' => Some(TokenKind::Assign),
            '.' => Some(TokenKind::Dot),
            '!' => Some(TokenKind::Bang),
            '<' => Some(TokenKind::Lt),
            '>' => Some(TokenKind::Gt),
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Star),
            '/' => Some(TokenKind::Slash),
            _ => None,
        };
        if let Some(kind) = mono {
            return Token::new(kind, c.to_string(), line, column);
        }

        if is_alpha(c) {
            self.read_identifier(c, line, column)
        } else if c.is_ascii_digit() {
            self.read_number(c, line, column)
        } else if c == '"' {
            self.read_string(line, column)
        } else if c == '`' {
            self.read_universal_identifier(line, column)
        } else {
            Token::new(TokenKind::Error, c.to_string(), line, column)
        }
    }

    fn read(&mut self) -> Option<char> {
        let c = self.peek()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.arrow += 1;
        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.arrow).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.source.get(self.arrow + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r' | '\n')) {
            self.read();
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.read() {
            if c == '\n' {
                return;
            }
        }
    }

    /// Consumes `/* ... */`; an unterminated comment yields one error token
    /// positioned at its opening.
    fn skip_block_comment(&mut self, line: u32, column: u32) -> Option<Token> {
        self.read();
        self.read();
        loop {
            match self.read() {
                Some('*') if self.peek() == Some('/') => {
                    self.read();
                    return None;
                }
                Some(_) => {}
                None => return Some(Token::new(TokenKind::Error, "/*...", line, column)),
            }
        }
    }

    fn read_identifier(&mut self, first: char, line: u32, column: u32) -> Token {
        let mut name = String::from(first);
        while let Some(c) = self.peek() {
            if !is_alpha(c) && !c.is_ascii_digit() {
                break;
            }
            name.push(c);
            self.read();
        }
        let kind = keyword_kind(&name).unwrap_or(TokenKind::Ident);
        Token::new(kind, name, line, column)
    }

    /// Backtick-quoted identifier: any characters except line breaks, tabs
    /// and backticks. An empty pair is an error.
    fn read_universal_identifier(&mut self, line: u32, column: u32) -> Token {
        if self.peek() == Some('`') {
            self.read();
            return Token::new(TokenKind::Error, "``", line, column);
        }
        let mut name = String::new();
        loop {
            match self.read() {
                Some('`') => return Token::new(TokenKind::Ident, name, line, column),
                Some('\n') | Some('\r') | Some('\t') | None => {
                    return Token::new(TokenKind::Error, format!("`{}", name), line, column);
                }
                Some(c) => name.push(c),
            }
        }
    }

    fn read_number(&mut self, first: char, line: u32, column: u32) -> Token {
        let mut digits = String::from(first);
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c);
            self.read();
        }
        // A dot belongs to the number only when a digit follows it.
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            digits.push('.');
            self.read();
            while let Some(c) = self.peek() {
                if !c.is_ascii_digit() {
                    break;
                }
                digits.push(c);
                self.read();
            }
        }
        Token::new(TokenKind::Number, digits, line, column)
    }

    fn read_string(&mut self, line: u32, column: u32) -> Token {
        let mut text = String::new();
        loop {
            match self.read() {
                Some('"') => return Token::new(TokenKind::String, text, line, column),
                Some('\n') | Some('\r') | None => {
                    return Token::new(TokenKind::Error, format!("\"{}", text), line, column);
                }
                Some('\\') => match self.peek() {
                    Some('n') => {
                        self.read();
                        text.push('\n');
                    }
                    Some('r') => {
                        self.read();
                        text.push('\r');
                    }
                    Some('t') => {
                        self.read();
                        text.push('\t');
                    }
                    Some('"') => {
                        self.read();
                        text.push('"');
                    }
                    Some('\\') => {
                        self.read();
                        text.push('\\');
                    }
                    _ => text.push('\\'),
                },
                Some(c) => text.push(c),
            }
        }
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn keyword_kind(name: &str) -> Option<TokenKind> {
    let kind = match name {
        "or" => TokenKind::Or,
        "and" => TokenKind::And,
        "var" => TokenKind::Var,
        "fun" => TokenKind::Fun,
        "class" => TokenKind::Class,
        "vec" => TokenKind::Vec,
        "map" => TokenKind::Map,
        "null" => TokenKind::Null,
        "true" | "false" => TokenKind::Boolean,
        "for" => TokenKind::For,
        "while" => TokenKind::While,
        "do" => TokenKind::Do,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "throw" => TokenKind::Throw,
        "try" => TokenKind::Try,
        "catch" => TokenKind::Catch,
        "finally" => TokenKind::Finally,
        "self" => TokenKind::SelfKw,
        "return" => TokenKind::Return,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "import" => TokenKind::Import,
        "say" => TokenKind::Say,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("var fun class say self"),
            vec![
                TokenKind::Var,
                TokenKind::Fun,
                TokenKind::Class,
                TokenKind::Say,
                TokenKind::SelfKw,
                TokenKind::Eof,
            ]
        );
        let booleans = lex("true false null");
        assert_eq!(booleans[0].kind, TokenKind::Boolean);
        assert_eq!(booleans[0].lexeme, "true");
        assert_eq!(booleans[1].kind, TokenKind::Boolean);
        assert_eq!(booleans[1].lexeme, "false");
        assert_eq!(booleans[2].kind, TokenKind::Null);
    }

    #[test]
    fn test_identifiers() {
        let tokens = lex("foo bar123 _test");
        assert_eq!(tokens[0].lexeme, "foo");
        assert_eq!(tokens[1].lexeme, "bar123");
        assert_eq!(tokens[2].lexeme, "_test");
        assert!(tokens[..3].iter().all(|t| t.kind == TokenKind::Ident));
    }

    #[test]
    fn test_universal_identifiers() {
        let tokens = lex("`hello world!`");
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].lexeme, "hello world!");
    }

    #[test]
    fn test_empty_universal_identifier_is_error() {
        let tokens = lex("``");
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(tokens[0].lexeme, "``");
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn test_numbers() {
        let tokens = lex("42 0 3.14 123.456");
        assert_eq!(tokens[0].lexeme, "42");
        assert_eq!(tokens[1].lexeme, "0");
        assert_eq!(tokens[2].lexeme, "3.14");
        assert_eq!(tokens[3].lexeme, "123.456");
        assert!(tokens[..4].iter().all(|t| t.kind == TokenKind::Number));
    }

    #[test]
    fn test_trailing_dot_is_not_part_of_number() {
        assert_eq!(
            kinds("1."),
            vec![TokenKind::Number, TokenKind::Dot, TokenKind::Eof]
        );
        assert_eq!(
            kinds("v[1].pop"),
            vec![
                TokenKind::Ident,
                TokenKind::LBrack,
                TokenKind::Number,
                TokenKind::RBrack,
                TokenKind::Dot,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        let tokens = lex(r#""a\nb\tc\"d\\e""#);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].lexeme, "a\nb\tc\"d\\e");
    }

    #[test]
    fn test_unterminated_string_is_single_error_then_eof() {
        let tokens = lex("\"abc");
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(tokens[0].lexeme, "\"abc");
        assert_eq!(tokens[1].kind, TokenKind::Eof);
        assert_eq!(tokens.len(), 2);

        let tokens = lex("\"abc\nvar");
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(tokens[1].kind, TokenKind::Var);
    }

    #[test]
    fn test_longest_match_equality_family() {
        assert_eq!(kinds("==="), vec![TokenKind::Is, TokenKind::Eof]);
        assert_eq!(kinds("!=="), vec![TokenKind::Isnt, TokenKind::Eof]);
        assert_eq!(kinds("=="), vec![TokenKind::Eq, TokenKind::Eof]);
        assert_eq!(kinds("!="), vec![TokenKind::Ne, TokenKind::Eof]);
        assert_eq!(kinds("="), vec![TokenKind::Assign, TokenKind::Eof]);
        assert_eq!(kinds("!"), vec![TokenKind::Bang, TokenKind::Eof]);
        assert_eq!(
            kinds("== ="),
            vec![TokenKind::Eq, TokenKind::Assign, TokenKind::Eof]
        );
    }

    #[test]
    fn test_two_char_operators() {
        assert_eq!(
            kinds("<= >= -> := += -= *= /="),
            vec![
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::Arrow,
                TokenKind::Define,
                TokenKind::PlusAssign,
                TokenKind::MinusAssign,
                TokenKind::StarAssign,
                TokenKind::SlashAssign,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("// whole line\nvar /* inline */ x;"),
            vec![
                TokenKind::Var,
                TokenKind::Ident,
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        let tokens = lex("var x; /* runs on");
        assert_eq!(tokens[2].kind, TokenKind::Semi);
        assert_eq!(tokens[3].kind, TokenKind::Error);
        assert_eq!(tokens[3].lexeme, "/*...");
        assert_eq!(tokens[4].kind, TokenKind::Eof);
    }

    #[test]
    fn test_positions() {
        let tokens = lex("var x;\n  say x;");
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (1, 5));
        assert_eq!((tokens[2].line, tokens[2].column), (1, 6));
        assert_eq!((tokens[3].line, tokens[3].column), (2, 3));
        assert_eq!((tokens[4].line, tokens[4].column), (2, 7));
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().kind, TokenKind::Ident);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn test_reset() {
        let mut lexer = Lexer::new("say 1;");
        while lexer.next_token().kind != TokenKind::Eof {}
        lexer.reset();
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Say);
        assert_eq!((token.line, token.column), (1, 1));
    }

    #[test]
    fn test_stray_character_is_error_token() {
        let tokens = lex("var #;");
        assert_eq!(tokens[0].kind, TokenKind::Var);
        assert_eq!(tokens[1].kind, TokenKind::Error);
        assert_eq!(tokens[1].lexeme, "#");
        assert_eq!(tokens[2].kind, TokenKind::Semi);
    }

    #[test]
    fn test_lexeme_round_trip() {
        let source = r#"var v = vec{1, 2.5}; if v[0] <= 2 -> say "ok";"#;
        let first = lex(source);
        let rebuilt = first
            .iter()
            .map(|t| match t.kind {
                TokenKind::String => format!("\"{}\"", t.lexeme),
                _ => t.lexeme.clone(),
            })
            .collect::<Vec<_>>()
            .join(" ");
        let second = lex(&rebuilt);
        let kinds_of = |ts: &[Token]| ts.iter().map(|t| t.kind).collect::<Vec<_>>();
        assert_eq!(kinds_of(&first), kinds_of(&second));
    }
}

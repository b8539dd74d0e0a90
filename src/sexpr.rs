//! S-expression lexer and reader for the Scheme surface syntax.
//!
//! The reader turns source text into [`Value`] data; evaluation never sees
//! text. `'d` expands to `(quote d)` while reading, so the evaluator only
//! ever deals with the list form.

use std::fmt;

use crate::engine::cons::{cons, list_from_vec};
use crate::engine::{Result, SchemeError, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LParen,
    RParen,
    VecOpen,
    Quote,
    Dot,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Str(String),
    Character(char),
    Symbol(String),
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::VecOpen => write!(f, "#("),
            Token::Quote => write!(f, "'"),
            Token::Dot => write!(f, "."),
            Token::Boolean(true) => write!(f, "#t"),
            Token::Boolean(false) => write!(f, "#f"),
            Token::Integer(n) => write!(f, "{}", n),
            Token::Real(r) => write!(f, "{}", r),
            Token::Str(s) => write!(f, "\"{}\"", s),
            Token::Character(c) => write!(f, "#\\{}", c),
            Token::Symbol(s) => write!(f, "{}", s),
            Token::Eof => write!(f, "EOF"),
        }
    }
}

fn is_delimiter(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | '\'' | '"' | ';')
}

/// Hand-written lexer tracking line and column for error reporting.
pub struct Lexer {
    input: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn current(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.current()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn error(&self, message: impl Into<String>) -> SchemeError {
        SchemeError::Parse {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.current() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some(';') => {
                    while let Some(ch) = self.advance() {
                        if ch == '\n' {
                            break;
                        }
                    }
                }
                _ => return,
            }
        }
    }

    fn read_string(&mut self) -> Result<String> {
        let mut result = String::new();
        self.advance(); // opening quote
        loop {
            match self.advance() {
                Some('"') => return Ok(result),
                Some('\\') => match self.advance() {
                    Some('n') => result.push('\n'),
                    Some('t') => result.push('\t'),
                    Some('r') => result.push('\r'),
                    Some('\\') => result.push('\\'),
                    Some('"') => result.push('"'),
                    Some(other) => {
                        return Err(self.error(format!("unknown string escape \\{}", other)))
                    }
                    None => return Err(self.error("unterminated string literal")),
                },
                Some(ch) => result.push(ch),
                None => return Err(self.error("unterminated string literal")),
            }
        }
    }

    fn read_hash(&mut self) -> Result<Token> {
        self.advance(); // '#'
        match self.current() {
            Some('t') => {
                self.advance();
                Ok(Token::Boolean(true))
            }
            Some('f') => {
                self.advance();
                Ok(Token::Boolean(false))
            }
            Some('(') => {
                self.advance();
                Ok(Token::VecOpen)
            }
            Some('\\') => {
                self.advance();
                self.read_character()
            }
            Some(other) => Err(self.error(format!("unknown # syntax: #{}", other))),
            None => Err(self.error("unexpected end of input after #")),
        }
    }

    fn read_character(&mut self) -> Result<Token> {
        let first = match self.advance() {
            Some(ch) => ch,
            None => return Err(self.error("unexpected end of input in character literal")),
        };
        // A multi-letter sequence is a named character.
        if first.is_alphabetic() && self.current().is_some_and(|c| !is_delimiter(c)) {
            let mut name = String::from(first);
            while let Some(ch) = self.current() {
                if is_delimiter(ch) {
                    break;
                }
                name.push(ch);
                self.advance();
            }
            return match name.as_str() {
                "space" => Ok(Token::Character(' ')),
                "newline" => Ok(Token::Character('\n')),
                "tab" => Ok(Token::Character('\t')),
                other => Err(self.error(format!("unknown character name #\\{}", other))),
            };
        }
        Ok(Token::Character(first))
    }

    /// Numbers and symbols share a start set, so read the whole word first
    /// and decide afterwards. A lone `.` is the dotted-pair marker.
    fn read_word(&mut self) -> Result<Token> {
        let mut word = String::new();
        while let Some(ch) = self.current() {
            if is_delimiter(ch) {
                break;
            }
            word.push(ch);
            self.advance();
        }
        if word == "." {
            return Ok(Token::Dot);
        }
        if let Ok(n) = word.parse::<i64>() {
            return Ok(Token::Integer(n));
        }
        let looks_numeric = word
            .strip_prefix(&['+', '-'][..])
            .unwrap_or(&word)
            .starts_with(|c: char| c.is_ascii_digit() || c == '.');
        if looks_numeric && word != "+" && word != "-" {
            return match word.parse::<f64>() {
                Ok(r) => Ok(Token::Real(r)),
                Err(_) => Err(self.error(format!("malformed number: {}", word))),
            };
        }
        Ok(Token::Symbol(word))
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();
        match self.current() {
            None => Ok(Token::Eof),
            Some('(') => {
                self.advance();
                Ok(Token::LParen)
            }
            Some(')') => {
                self.advance();
                Ok(Token::RParen)
            }
            Some('\'') => {
                self.advance();
                Ok(Token::Quote)
            }
            Some('"') => Ok(Token::Str(self.read_string()?)),
            Some('#') => self.read_hash(),
            Some(_) => self.read_word(),
        }
    }

    fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }
}

const MAX_NESTING: usize = 512;

/// Reads data from source text, one datum per call.
pub struct Reader {
    lexer: Lexer,
    depth: usize,
}

impl Reader {
    pub fn new(input: &str) -> Self {
        Reader {
            lexer: Lexer::new(input),
            depth: 0,
        }
    }

    /// The next datum, or `None` at end of input.
    pub fn next_datum(&mut self) -> Result<Option<Value>> {
        match self.lexer.next_token()? {
            Token::Eof => Ok(None),
            token => self.parse_datum(token).map(Some),
        }
    }

    fn parse_error(&self, message: impl Into<String>) -> SchemeError {
        let (line, column) = self.lexer.position();
        SchemeError::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    fn parse_datum(&mut self, token: Token) -> Result<Value> {
        if self.depth > MAX_NESTING {
            return Err(self.parse_error("input nested too deeply"));
        }
        match token {
            Token::LParen => {
                self.depth += 1;
                let list = self.parse_list();
                self.depth -= 1;
                list
            }
            Token::VecOpen => {
                self.depth += 1;
                let vector = self.parse_vector();
                self.depth -= 1;
                vector
            }
            Token::Quote => {
                let quoted = match self.lexer.next_token()? {
                    Token::Eof => {
                        return Err(self.parse_error("unexpected end of input after quote"))
                    }
                    inner => self.parse_datum(inner)?,
                };
                Ok(list_from_vec(vec![Value::symbol("quote"), quoted]))
            }
            Token::Boolean(b) => Ok(Value::Boolean(b)),
            Token::Integer(n) => Ok(Value::Integer(n)),
            Token::Real(r) => Ok(Value::Real(r)),
            Token::Str(s) => Ok(Value::string(s)),
            Token::Character(c) => Ok(Value::Char(c)),
            Token::Symbol(s) => Ok(Value::symbol(&s)),
            Token::RParen => Err(self.parse_error("unexpected )")),
            Token::Dot => Err(self.parse_error("unexpected . outside a list")),
            Token::Eof => Err(self.parse_error("unexpected end of input")),
        }
    }

    fn parse_list(&mut self) -> Result<Value> {
        let mut items = Vec::new();
        loop {
            match self.lexer.next_token()? {
                Token::RParen => return Ok(list_from_vec(items)),
                Token::Dot => {
                    if items.is_empty() {
                        return Err(self.parse_error("dotted pair needs a car"));
                    }
                    let tail_token = self.lexer.next_token()?;
                    let tail = self.parse_datum(tail_token)?;
                    match self.lexer.next_token()? {
                        Token::RParen => {
                            let mut list = tail;
                            for item in items.into_iter().rev() {
                                list = cons(item, list);
                            }
                            return Ok(list);
                        }
                        other => {
                            return Err(self
                                .parse_error(format!("expected ) after dotted tail, found {}", other)))
                        }
                    }
                }
                Token::Eof => return Err(self.parse_error("unterminated list")),
                token => items.push(self.parse_datum(token)?),
            }
        }
    }

    fn parse_vector(&mut self) -> Result<Value> {
        let mut items = Vec::new();
        loop {
            match self.lexer.next_token()? {
                Token::RParen => return Ok(Value::vector(items)),
                Token::Eof => return Err(self.parse_error("unterminated vector")),
                Token::Dot => return Err(self.parse_error("unexpected . inside a vector")),
                token => items.push(self.parse_datum(token)?),
            }
        }
    }
}

/// Reads every datum in `input`.
pub fn read_all(input: &str) -> Result<Vec<Value>> {
    let mut reader = Reader::new(input);
    let mut data = Vec::new();
    while let Some(datum) = reader.next_datum()? {
        data.push(datum);
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_one(input: &str) -> Value {
        Reader::new(input)
            .next_datum()
            .expect("read")
            .expect("datum")
    }

    #[test]
    fn atoms() {
        assert_eq!(read_one("42").to_string(), "42");
        assert_eq!(read_one("-7").to_string(), "-7");
        assert_eq!(read_one("3.5").to_string(), "3.5");
        assert_eq!(read_one("#t").to_string(), "#t");
        assert_eq!(read_one("#\\a").to_string(), "#\\a");
        assert_eq!(read_one("#\\space").to_string(), "#\\space");
        assert_eq!(read_one("hello").to_string(), "hello");
        assert_eq!(read_one("\"hi\\nthere\"").to_string(), "\"hi\nthere\"");
    }

    #[test]
    fn plus_and_minus_are_symbols() {
        assert!(matches!(read_one("+"), Value::Symbol(_)));
        assert!(matches!(read_one("-"), Value::Symbol(_)));
    }

    #[test]
    fn lists_and_nesting() {
        assert_eq!(read_one("(1 2 3)").to_string(), "(1 2 3)");
        assert_eq!(read_one("()").to_string(), "()");
        assert_eq!(read_one("(a (b c) d)").to_string(), "(a (b c) d)");
    }

    #[test]
    fn dotted_pairs() {
        assert_eq!(read_one("(1 . 2)").to_string(), "(1 . 2)");
        assert_eq!(read_one("(1 2 . 3)").to_string(), "(1 2 . 3)");
        assert!(Reader::new("(. 2)").next_datum().is_err());
        assert!(Reader::new("(1 . 2 3)").next_datum().is_err());
    }

    #[test]
    fn quote_shorthand_expands() {
        assert_eq!(read_one("'x").to_string(), "(quote x)");
        assert_eq!(read_one("'(1 2)").to_string(), "(quote (1 2))");
    }

    #[test]
    fn vectors() {
        assert_eq!(read_one("#(1 2 3)").to_string(), "#(1 2 3)");
    }

    #[test]
    fn comments_are_skipped() {
        let data = read_all("1 ; a comment\n2").unwrap();
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn multiple_data() {
        let data = read_all("(define x 1) (+ x 2)").unwrap();
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn errors_carry_position() {
        let err = Reader::new("(1 2").next_datum().unwrap_err();
        assert!(matches!(err, SchemeError::Parse { .. }));
        let err = Reader::new("\n\n  )").next_datum().unwrap_err();
        if let SchemeError::Parse { line, .. } = err {
            assert_eq!(line, 3);
        } else {
            panic!("expected a parse error");
        }
    }

    #[test]
    fn printed_data_reads_back_equal() {
        let datum = read_one("(1 (2 #t) \"hi\" #\\a (3 . 4))");
        let reread = read_one(&datum.to_string());
        assert!(datum.equal(&reread));
    }

    #[test]
    fn empty_input_is_none() {
        assert!(Reader::new("").next_datum().unwrap().is_none());
        assert!(Reader::new("  ; only a comment").next_datum().unwrap().is_none());
    }
}

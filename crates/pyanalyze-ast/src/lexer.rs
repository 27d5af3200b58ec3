//! A CPython-tokenizer-style lexer: resolves leading whitespace into
//! `Indent`/`Dedent` tokens and suppresses `Newline` while inside brackets
//! (so a call's arguments can span multiple lines).

use crate::token::{Token, TokenKind};
use pyanalyze_common::Span;

pub struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    indent_stack: Vec<usize>,
    bracket_depth: u32,
    at_line_start: bool,
    pending: Vec<Token>,
}

const KEYWORDS: &[(&str, TokenKind)] = &[
    ("def", TokenKind::Def),
    ("class", TokenKind::Class),
    ("return", TokenKind::Return),
    ("if", TokenKind::If),
    ("elif", TokenKind::Elif),
    ("else", TokenKind::Else),
    ("while", TokenKind::While),
    ("for", TokenKind::For),
    ("in", TokenKind::In),
    ("not", TokenKind::Not),
    ("and", TokenKind::And),
    ("or", TokenKind::Or),
    ("is", TokenKind::Is),
    ("pass", TokenKind::Pass),
    ("break", TokenKind::Break),
    ("continue", TokenKind::Continue),
    ("import", TokenKind::Import),
    ("from", TokenKind::From),
    ("as", TokenKind::As),
    ("with", TokenKind::With),
    ("try", TokenKind::Try),
    ("except", TokenKind::Except),
    ("finally", TokenKind::Finally),
    ("raise", TokenKind::Raise),
    ("assert", TokenKind::Assert),
    ("global", TokenKind::Global),
    ("nonlocal", TokenKind::Nonlocal),
    ("lambda", TokenKind::Lambda),
    ("True", TokenKind::True),
    ("False", TokenKind::False),
    ("None", TokenKind::None),
    ("async", TokenKind::Async),
    ("await", TokenKind::Await),
    ("del", TokenKind::Del),
    ("yield", TokenKind::Yield),
];

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            indent_stack: vec![0],
            bracket_depth: 0,
            at_line_start: true,
            pending: Vec::new(),
        }
    }

    #[must_use]
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek_byte()?;
        self.pos += 1;
        Some(b)
    }

    fn next_token(&mut self) -> Token {
        if let Some(tok) = self.pending.pop() {
            return tok;
        }

        if self.at_line_start && self.bracket_depth == 0 {
            if let Some(tok) = self.handle_line_start() {
                return tok;
            }
        }

        self.skip_intra_line_whitespace_and_comments();

        let start = self.pos;
        let Some(b) = self.peek_byte() else {
            if self.indent_stack.len() > 1 {
                let pending_dedents = self.indent_stack.len() - 1;
                self.indent_stack.truncate(1);
                self.pending.push(Token { kind: TokenKind::Eof, span: Span::at(start as u32) });
                for _ in 0..pending_dedents - 1 {
                    self.pending.push(Token { kind: TokenKind::Dedent, span: Span::at(start as u32) });
                }
                return Token { kind: TokenKind::Dedent, span: Span::at(start as u32) };
            }
            return Token { kind: TokenKind::Eof, span: Span::at(start as u32) };
        };

        if b == b'\n' {
            self.pos += 1;
            self.at_line_start = true;
            if self.bracket_depth > 0 {
                return self.next_token();
            }
            return Token { kind: TokenKind::Newline, span: Span::new(start as u32, self.pos as u32) };
        }

        if b.is_ascii_digit() {
            return self.lex_number(start);
        }

        if b == b'"' || b == b'\'' {
            return self.lex_string(start);
        }

        if b == b'_' || b.is_ascii_alphabetic() {
            return self.lex_name(start);
        }

        self.lex_operator(start)
    }

    /// Computes indentation for a fresh logical line and emits Indent/Dedent
    /// tokens as needed. Returns `None` if the line is blank/comment-only
    /// and lexing should continue on the next physical line.
    fn handle_line_start(&mut self) -> Option<Token> {
        let mut indent = 0usize;
        let line_start = self.pos;
        loop {
            match self.peek_byte() {
                Some(b' ') => {
                    indent += 1;
                    self.pos += 1;
                }
                Some(b'\t') => {
                    indent += 8 - (indent % 8);
                    self.pos += 1;
                }
                _ => break,
            }
        }

        match self.peek_byte() {
            None => return None,
            Some(b'\n') | Some(b'#') => {
                // Blank or comment-only line: consume it and retry.
                while let Some(b) = self.peek_byte() {
                    if b == b'\n' {
                        self.pos += 1;
                        break;
                    }
                    self.pos += 1;
                }
                self.pos = line_start + (self.pos - line_start);
                return None;
            }
            _ => {}
        }

        self.at_line_start = false;
        let current = *self.indent_stack.last().unwrap();
        if indent > current {
            self.indent_stack.push(indent);
            return Some(Token { kind: TokenKind::Indent, span: Span::new(line_start as u32, self.pos as u32) });
        }
        if indent < current {
            let mut dedents = 0;
            while *self.indent_stack.last().unwrap() > indent {
                self.indent_stack.pop();
                dedents += 1;
            }
            for _ in 0..dedents - 1 {
                self.pending.push(Token { kind: TokenKind::Dedent, span: Span::at(self.pos as u32) });
            }
            return Some(Token { kind: TokenKind::Dedent, span: Span::at(self.pos as u32) });
        }
        None
    }

    fn skip_intra_line_whitespace_and_comments(&mut self) {
        loop {
            match self.peek_byte() {
                Some(b' ') | Some(b'\t') | Some(b'\r') => {
                    self.pos += 1;
                }
                Some(b'\\') if self.byte_at(1) == Some(b'\n') => {
                    self.pos += 2;
                }
                Some(b'#') => {
                    while let Some(b) = self.peek_byte() {
                        if b == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_number(&mut self, start: usize) -> Token {
        let mut is_float = false;
        while let Some(b) = self.peek_byte() {
            if b.is_ascii_digit() || b == b'_' {
                self.pos += 1;
            } else if b == b'.' && !is_float {
                is_float = true;
                self.pos += 1;
            } else {
                break;
            }
        }
        let text: String = self.source[start..self.pos].chars().filter(|c| *c != '_').collect();
        let span = Span::new(start as u32, self.pos as u32);
        if is_float {
            Token { kind: TokenKind::Float(text.parse().unwrap_or(0.0)), span }
        } else {
            Token { kind: TokenKind::Int(text.parse().unwrap_or(0)), span }
        }
    }

    fn lex_string(&mut self, start: usize) -> Token {
        let quote = self.advance().unwrap();
        let mut value = String::new();
        while let Some(b) = self.peek_byte() {
            if b == quote {
                self.pos += 1;
                break;
            }
            if b == b'\\' {
                self.pos += 1;
                if let Some(escaped) = self.advance() {
                    value.push(escaped as char);
                }
                continue;
            }
            value.push(b as char);
            self.pos += 1;
        }
        Token { kind: TokenKind::Str(value), span: Span::new(start as u32, self.pos as u32) }
    }

    fn lex_name(&mut self, start: usize) -> Token {
        while let Some(b) = self.peek_byte() {
            if b == b'_' || b.is_ascii_alphanumeric() {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = &self.source[start..self.pos];
        let span = Span::new(start as u32, self.pos as u32);
        for (kw, kind) in KEYWORDS {
            if *kw == text {
                return Token { kind: kind.clone(), span };
            }
        }
        Token { kind: TokenKind::Name(text.to_string()), span }
    }

    fn lex_operator(&mut self, start: usize) -> Token {
        let two = |s: &Self| -> Option<[u8; 2]> { Some([s.peek_byte()?, s.byte_at(1)?]) };

        macro_rules! emit {
            ($len:expr, $kind:expr) => {{
                self.pos += $len;
                return Token { kind: $kind, span: Span::new(start as u32, self.pos as u32) };
            }};
        }

        if let Some(pair) = two(self) {
            match &pair {
                b"**" => emit!(2, TokenKind::DoubleStar),
                b"//" => emit!(2, TokenKind::DoubleSlash),
                b"->" => emit!(2, TokenKind::Arrow),
                b"<=" => emit!(2, TokenKind::Le),
                b">=" => emit!(2, TokenKind::Ge),
                b"==" => emit!(2, TokenKind::Eq),
                b"!=" => emit!(2, TokenKind::Ne),
                b":=" => emit!(2, TokenKind::Walrus),
                b"+=" => emit!(2, TokenKind::PlusEq),
                b"-=" => emit!(2, TokenKind::MinusEq),
                b"*=" => emit!(2, TokenKind::StarEq),
                b"/=" => emit!(2, TokenKind::SlashEq),
                b"<<" => emit!(2, TokenKind::LShift),
                b">>" => emit!(2, TokenKind::RShift),
                _ => {}
            }
        }

        if self.source[self.pos..].starts_with("...") {
            emit!(3, TokenKind::Ellipsis);
        }

        let b = self.advance().unwrap();
        let kind = match b {
            b'(' => {
                self.bracket_depth += 1;
                TokenKind::LParen
            }
            b')' => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
                TokenKind::RParen
            }
            b'[' => {
                self.bracket_depth += 1;
                TokenKind::LBracket
            }
            b']' => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
                TokenKind::RBracket
            }
            b'{' => {
                self.bracket_depth += 1;
                TokenKind::LBrace
            }
            b'}' => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
                TokenKind::RBrace
            }
            b':' => TokenKind::Colon,
            b',' => TokenKind::Comma,
            b'.' => TokenKind::Dot,
            b'=' => TokenKind::Assign,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'@' => TokenKind::At,
            b'&' => TokenKind::Amp,
            b'|' => TokenKind::Pipe,
            b'^' => TokenKind::Caret,
            b'~' => TokenKind::Tilde,
            b'<' => TokenKind::Lt,
            b'>' => TokenKind::Gt,
            other => TokenKind::Name(format!("\u{fffd}{}", other as char)),
        };
        Token { kind, span: Span::new(start as u32, self.pos as u32) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).tokenize().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn indents_and_dedents_bracket_a_block() {
        let source = "if x:\n    pass\ny = 1\n";
        let toks = kinds(source);
        assert!(toks.contains(&TokenKind::Indent));
        assert!(toks.contains(&TokenKind::Dedent));
    }

    #[test]
    fn brackets_suppress_newlines() {
        let source = "f(1,\n  2)\n";
        let toks = kinds(source);
        let newline_count = toks.iter().filter(|k| **k == TokenKind::Newline).count();
        assert_eq!(newline_count, 1);
    }

    #[test]
    fn keywords_are_not_names() {
        let toks = kinds("class Foo:\n    pass\n");
        assert_eq!(toks[0], TokenKind::Class);
    }
}

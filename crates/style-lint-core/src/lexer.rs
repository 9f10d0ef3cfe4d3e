//! Lexical scanner producing the token view of a file.
//!
//! This is not a parser: it only classifies comments, string literals,
//! numbers, identifiers and keywords so that rules can tell code apart from
//! text that merely looks like code. Unterminated literals and comments run
//! to the end of the input (strings stop at the end of their line).

use crate::syntax::{Token, TokenKind};

const KEYWORDS: &[&str] = &[
    "as", "associatedtype", "async", "await", "break", "case", "catch", "class", "continue",
    "default", "defer", "deinit", "do", "else", "enum", "extension", "fallthrough", "false",
    "fileprivate", "final", "for", "func", "guard", "if", "import", "in", "init", "inout",
    "internal", "is", "lazy", "let", "mutating", "nil", "open", "operator", "override",
    "private", "protocol", "public", "repeat", "rethrows", "return", "self", "Self", "static",
    "struct", "subscript", "super", "switch", "throw", "throws", "true", "try", "typealias",
    "var", "weak", "where", "while",
];

/// Splits `text` into tokens, in ascending offset order.
#[must_use]
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut lexer = Lexer {
        text,
        bytes: text.as_bytes(),
        pos: 0,
        tokens: Vec::new(),
    };
    lexer.run();
    lexer.tokens
}

struct Lexer<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    tokens: Vec<Token>,
}

impl Lexer<'_> {
    fn run(&mut self) {
        while let Some(byte) = self.peek(0) {
            let start = self.pos;
            match byte {
                b'/' if self.peek(1) == Some(b'/') => {
                    let doc = self.starts_with("///") && !self.starts_with("////");
                    self.skip_line();
                    self.push(doc_or_comment(doc), start);
                }
                b'/' if self.peek(1) == Some(b'*') => {
                    let doc = self.starts_with("/**") && !self.starts_with("/**/");
                    self.skip_block_comment();
                    self.push(doc_or_comment(doc), start);
                }
                b'"' => {
                    self.scan_string();
                    self.push(TokenKind::String, start);
                }
                b'#' if self.raw_string_hashes().is_some() => {
                    self.scan_raw_string();
                    self.push(TokenKind::String, start);
                }
                b'0'..=b'9' => {
                    self.scan_number();
                    self.push(TokenKind::Number, start);
                }
                _ if self.current_char().is_some_and(is_identifier_start) => {
                    self.scan_identifier();
                    let kind = if KEYWORDS.contains(&&self.text[start..self.pos]) {
                        TokenKind::Keyword
                    } else {
                        TokenKind::Identifier
                    };
                    self.push(kind, start);
                }
                _ => self.bump(),
            }
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token::new(kind, start, self.pos - start));
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.text[self.pos..].starts_with(prefix)
    }

    fn current_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.current_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_line(&mut self) {
        while let Some(byte) = self.peek(0) {
            if byte == b'\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) {
        let mut depth = 0usize;
        while self.pos < self.bytes.len() {
            if self.starts_with("/*") {
                depth += 1;
                self.pos += 2;
            } else if self.starts_with("*/") {
                depth -= 1;
                self.pos += 2;
                if depth == 0 {
                    return;
                }
            } else {
                self.bump();
            }
        }
    }

    /// Scans a `"…"` or `"""…"""` literal starting at the opening quote.
    fn scan_string(&mut self) {
        let multiline = self.starts_with("\"\"\"");
        self.pos += if multiline { 3 } else { 1 };

        while let Some(byte) = self.peek(0) {
            match byte {
                b'\\' if self.peek(1) == Some(b'(') => {
                    self.pos += 1;
                    self.scan_interpolation();
                }
                b'\\' => {
                    self.pos += 1;
                    self.bump();
                }
                b'"' if multiline => {
                    if self.starts_with("\"\"\"") {
                        self.pos += 3;
                        return;
                    }
                    self.pos += 1;
                }
                b'"' => {
                    self.pos += 1;
                    return;
                }
                b'\n' if !multiline => return,
                _ => self.bump(),
            }
        }
    }

    /// Scans `( … )` after a backslash, including nested literals.
    fn scan_interpolation(&mut self) {
        let mut depth = 0usize;
        while let Some(byte) = self.peek(0) {
            match byte {
                b'(' => {
                    depth += 1;
                    self.pos += 1;
                }
                b')' => {
                    self.pos += 1;
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                b'"' => self.scan_string(),
                b'\n' => return,
                _ => self.bump(),
            }
        }
    }

    fn raw_string_hashes(&self) -> Option<usize> {
        let hashes = self.bytes[self.pos..]
            .iter()
            .take_while(|&&b| b == b'#')
            .count();
        (self.peek(hashes) == Some(b'"')).then_some(hashes)
    }

    fn scan_raw_string(&mut self) {
        let Some(hashes) = self.raw_string_hashes() else {
            return;
        };
        self.pos += hashes;
        let multiline = self.starts_with("\"\"\"");
        let quotes = if multiline { "\"\"\"" } else { "\"" };
        self.pos += quotes.len();
        let terminator = format!("{quotes}{}", "#".repeat(hashes));

        while self.pos < self.bytes.len() {
            if self.starts_with(&terminator) {
                self.pos += terminator.len();
                return;
            }
            if !multiline && self.peek(0) == Some(b'\n') {
                return;
            }
            self.bump();
        }
    }

    fn scan_number(&mut self) {
        while let Some(byte) = self.peek(0) {
            let fraction = byte == b'.' && self.peek(1).is_some_and(|b| b.is_ascii_digit());
            if byte.is_ascii_alphanumeric() || byte == b'_' || fraction {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn scan_identifier(&mut self) {
        self.bump();
        while self.current_char().is_some_and(is_identifier_continue) {
            self.bump();
        }
    }
}

const fn doc_or_comment(doc: bool) -> TokenKind {
    if doc {
        TokenKind::DocComment
    } else {
        TokenKind::Comment
    }
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

fn is_identifier_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_and_text(text: &str) -> Vec<(TokenKind, &str)> {
        tokenize(text)
            .into_iter()
            .map(|t| (t.kind, &text[t.range.location..t.range.end()]))
            .collect()
    }

    #[test]
    fn test_keywords_identifiers_numbers() {
        assert_eq!(
            kinds_and_text("let count = 1_000.5"),
            vec![
                (TokenKind::Keyword, "let"),
                (TokenKind::Identifier, "count"),
                (TokenKind::Number, "1_000.5"),
            ]
        );
    }

    #[test]
    fn test_implicit_parameter_is_identifier() {
        assert_eq!(
            kinds_and_text("{ $0 }"),
            vec![(TokenKind::Identifier, "$0")]
        );
    }

    #[test]
    fn test_comments() {
        let tokens = kinds_and_text("a // {x}\n/// doc\n/* outer /* inner */ still */ b");
        assert_eq!(tokens[1], (TokenKind::Comment, "// {x}"));
        assert_eq!(tokens[2], (TokenKind::DocComment, "/// doc"));
        assert_eq!(
            tokens[3],
            (TokenKind::Comment, "/* outer /* inner */ still */")
        );
        assert_eq!(tokens[4], (TokenKind::Identifier, "b"));
    }

    #[test]
    fn test_string_with_interpolation() {
        let text = r#"print("a {b} \(dict["k"]) c") + x"#;
        let tokens = kinds_and_text(text);
        assert_eq!(tokens[1], (TokenKind::String, r#""a {b} \(dict["k"]) c""#));
        assert_eq!(tokens[2], (TokenKind::Identifier, "x"));
    }

    #[test]
    fn test_escaped_quote() {
        let tokens = kinds_and_text(r#""a\"{" y"#);
        assert_eq!(tokens[0], (TokenKind::String, r#""a\"{""#));
        assert_eq!(tokens[1], (TokenKind::Identifier, "y"));
    }

    #[test]
    fn test_multiline_and_raw_strings() {
        let text = "\"\"\"\n{ \"x\" }\n\"\"\" #\"raw \"{\" here\"# z";
        let tokens = kinds_and_text(text);
        assert_eq!(tokens[0], (TokenKind::String, "\"\"\"\n{ \"x\" }\n\"\"\""));
        assert_eq!(tokens[1], (TokenKind::String, "#\"raw \"{\" here\"#"));
        assert_eq!(tokens[2], (TokenKind::Identifier, "z"));
    }

    #[test]
    fn test_unterminated_string_stops_at_line_end() {
        let tokens = kinds_and_text("\"abc\nlet");
        assert_eq!(tokens[0], (TokenKind::String, "\"abc"));
        assert_eq!(tokens[1], (TokenKind::Keyword, "let"));
    }
}

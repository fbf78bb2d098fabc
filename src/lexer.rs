use std::collections::HashSet;
use regex::Regex;
use crate::token::{Kind, Token};

const KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do",
    "double", "else", "enum", "extern", "float", "for", "goto", "if",
    "inline", "int", "long", "register", "return", "short", "signed", "sizeof",
    "static", "struct", "switch", "typedef", "union", "unsigned", "void", "volatile",
    "while",
];

const OPERATORS: &[&str] = &[
    "==", "!=", "<=", ">=", "++", "--", "+=", "-=", "*=", "/=", "%=",
    "+", "-", "*", "/", "=", "<", ">", "%", "<<", ">>", "::",
];

pub struct Lexer<'a> {
    source: &'a str,
    comments: Regex,
    pattern: Regex,
    keywords: HashSet<&'static str>,
    operators: HashSet<&'static str>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            comments: Regex::new(r"//[^\n]*|/\*[\s\S]*?\*/").unwrap(),
            // Multi-character operators must come first so that `==` never
            // splits into two `=` tokens.
            pattern: Regex::new(
                r#"::|<<|>>|==|!=|<=|>=|\+=|-=|\*=|/=|%=|--|\+\+|[a-zA-Z_][a-zA-Z0-9_]*|\d+|"[^"]*"|'[^']*'|[{}();,#:<>\[\]=+\-*/%&|^!~?]"#,
            )
            .unwrap(),
            keywords: KEYWORDS.iter().copied().collect(),
            operators: OPERATORS.iter().copied().collect(),
        }
    }

    pub fn tokenize(&self) -> Vec<Token> {
        let stripped = self.comments.replace_all(self.source, "");

        self.pattern
            .find_iter(&stripped)
            .map(|m| {
                let text = m.as_str();
                Token {
                    text: text.to_string(),
                    kind: self.classify(text),
                }
            })
            .collect()
    }

    pub fn report(&self) -> String {
        self.tokenize()
            .iter()
            .enumerate()
            .map(|(i, t)| format!("{}. {:<15} - {}", i + 1, t.text, t.kind))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn classify(&self, text: &str) -> Kind {
        if self.keywords.contains(text) {
            Kind::Keyword
        } else if self.operators.contains(text) {
            Kind::Operator
        } else if is_numeric(text) {
            Kind::Number
        } else if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
            Kind::StringLiteral
        } else if text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'') {
            Kind::CharLiteral
        } else if let Some(kind) = symbol_kind(text) {
            kind
        } else {
            Kind::Identifier
        }
    }
}

fn symbol_kind(text: &str) -> Option<Kind> {
    match text {
        ";" => Some(Kind::Semicolon),
        "{" | "}" => Some(Kind::Brace),
        "(" | ")" => Some(Kind::Parenthesis),
        "," => Some(Kind::Comma),
        ":" => Some(Kind::Colon),
        "#" => Some(Kind::Preprocessor),
        "\"" | "'" => Some(Kind::Quote),
        _ => None,
    }
}

// Base-10 integer or decimal only; `inf`/`nan`/exponent forms that f64
// parsing would accept are not numeric literals here.
pub(crate) fn is_numeric(text: &str) -> bool {
    !text.is_empty()
        && text.chars().all(|c| c.is_ascii_digit() || c == '.')
        && text.parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_tokens() {
        let tokens = Lexer::new("int x = 10;").tokenize();

        let expected = [
            ("int", Kind::Keyword),
            ("x", Kind::Identifier),
            ("=", Kind::Operator),
            ("10", Kind::Number),
            (";", Kind::Semicolon),
        ];

        assert_eq!(tokens.len(), expected.len());
        for (token, (text, kind)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(token.text, *text);
            assert_eq!(token.kind, *kind);
        }
    }

    #[test]
    fn test_empty_and_comment_only_input() {
        assert!(Lexer::new("").tokenize().is_empty());
        assert!(Lexer::new("   \n\t  ").tokenize().is_empty());
        assert!(Lexer::new("// just a comment\n/* and\nanother */").tokenize().is_empty());
    }

    #[test]
    fn test_multi_character_operators_do_not_split() {
        let tokens = Lexer::new("a == b << c :: d ++").tokenize();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "==", "b", "<<", "c", "::", "d", "++"]);
        assert_eq!(tokens[1].kind, Kind::Operator);
        assert_eq!(tokens[3].kind, Kind::Operator);
        assert_eq!(tokens[5].kind, Kind::Operator);
        assert_eq!(tokens[7].kind, Kind::Operator);
    }

    #[test]
    fn test_literals() {
        let tokens = Lexer::new(r#"char c = 'x'; "hello""#).tokenize();
        assert_eq!(tokens[3].kind, Kind::CharLiteral);
        assert_eq!(tokens[3].text, "'x'");
        assert_eq!(tokens[5].kind, Kind::StringLiteral);
        assert_eq!(tokens[5].text, "\"hello\"");
    }

    #[test]
    fn test_preprocessor_line() {
        let tokens = Lexer::new("#include <iostream>").tokenize();
        assert_eq!(tokens[0].kind, Kind::Preprocessor);
        assert_eq!(tokens[1].text, "include");
        assert_eq!(tokens[1].kind, Kind::Identifier);
        assert_eq!(tokens[2].kind, Kind::Operator);
        assert_eq!(tokens[3].kind, Kind::Identifier);
        assert_eq!(tokens[4].kind, Kind::Operator);
    }

    #[test]
    fn test_unterminated_literal_is_dropped() {
        // A quote without its closing partner never matches the literal
        // alternative, so its characters fall out of the stream.
        let tokens = Lexer::new("int x = \"oops").tokenize();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["int", "x", "=", "oops"]);
    }

    #[test]
    fn test_report_format() {
        let report = Lexer::new("int x = 10;").report();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], format!("1. {:<15} - KEYWORD", "int"));
        assert_eq!(lines[3], format!("4. {:<15} - NUMBER", "10"));
        assert_eq!(lines[4], format!("5. {:<15} - SEMICOLON", ";"));
    }

    #[test]
    fn test_report_is_idempotent() {
        let lexer = Lexer::new("int main() { return 0; }");
        assert_eq!(lexer.report(), lexer.report());
    }
}

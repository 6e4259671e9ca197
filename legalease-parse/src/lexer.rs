//! Tokenizer for the surface policy grammar.

use legalease_error::{legalease_bail, LegaleaseResult};

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Allow,
    And,
    Or,
    Filter,
    Redact,
    Schema,
    Privacy,
    Role,
    Purpose,
    Eq,
    Le,
    Ge,
    Lt,
    Gt,
    Ne,
    LParen,
    RParen,
    Colon,
    Comma,
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
}

/// Splits a policy source string into a flat token stream.
///
/// Whitespace-separated, case-sensitive keywords; identifiers are bare
/// alphanumeric/underscore runs, strings are single-quoted, and numbers may
/// carry a leading `-` and (for floats) a single `.`.
pub fn tokenize(src: &str) -> LegaleaseResult<Vec<Token>> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            },
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            },
            ':' => {
                tokens.push(Token::Colon);
                i += 1;
            },
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            },
            '=' if chars.get(i + 1) == Some(&'=') => {
                tokens.push(Token::Eq);
                i += 2;
            },
            '<' if chars.get(i + 1) == Some(&'=') => {
                tokens.push(Token::Le);
                i += 2;
            },
            '>' if chars.get(i + 1) == Some(&'=') => {
                tokens.push(Token::Ge);
                i += 2;
            },
            '!' if chars.get(i + 1) == Some(&'=') => {
                tokens.push(Token::Ne);
                i += 2;
            },
            '<' => {
                tokens.push(Token::Lt);
                i += 1;
            },
            '>' => {
                tokens.push(Token::Gt);
                i += 1;
            },
            '\'' => {
                let start = i + 1;
                let mut j = start;
                while j < chars.len() && chars[j] != '\'' {
                    j += 1;
                }
                if j >= chars.len() {
                    legalease_bail!(ParseError: "unterminated string literal starting at byte {start}");
                }
                tokens.push(Token::Str(chars[start..j].iter().collect()));
                i = j + 1;
            },
            c if c.is_ascii_digit() || (c == '-' && chars.get(i + 1).is_some_and(|d| d.is_ascii_digit())) => {
                let start = i;
                let mut j = i + 1;
                let mut is_float = false;
                while j < chars.len() && (chars[j].is_ascii_digit() || chars[j] == '.') {
                    if chars[j] == '.' {
                        is_float = true;
                    }
                    j += 1;
                }
                // Scientific notation: a trailing `e`/`E`, optional sign, digits.
                if j < chars.len() && (chars[j] == 'e' || chars[j] == 'E') {
                    let mut k = j + 1;
                    if k < chars.len() && (chars[k] == '+' || chars[k] == '-') {
                        k += 1;
                    }
                    if k < chars.len() && chars[k].is_ascii_digit() {
                        while k < chars.len() && chars[k].is_ascii_digit() {
                            k += 1;
                        }
                        is_float = true;
                        j = k;
                    }
                }
                let text: String = chars[start..j].iter().collect();
                if is_float {
                    let v: f64 = text.parse().map_err(|_| {
                        legalease_error::legalease_err!(ParseError: "invalid float literal '{}'", text)
                    })?;
                    tokens.push(Token::Float(v));
                } else {
                    let v: i64 = text.parse().map_err(|_| {
                        legalease_error::legalease_err!(ParseError: "invalid integer literal '{}'", text)
                    })?;
                    tokens.push(Token::Int(v));
                }
                i = j;
            },
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                let mut j = i + 1;
                while j < chars.len() && (chars[j].is_alphanumeric() || chars[j] == '_' || chars[j] == '-') {
                    j += 1;
                }
                let word: String = chars[start..j].iter().collect();
                tokens.push(keyword_or_ident(&word));
                i = j;
            },
            other => {
                legalease_bail!(ParseError: "unexpected character '{other}' at byte {i}");
            },
        }
    }
    Ok(tokens)
}

fn keyword_or_ident(word: &str) -> Token {
    match word {
        "ALLOW" => Token::Allow,
        "AND" => Token::And,
        "OR" => Token::Or,
        "FILTER" => Token::Filter,
        "REDACT" => Token::Redact,
        "SCHEMA" => Token::Schema,
        "PRIVACY" => Token::Privacy,
        "ROLE" => Token::Role,
        "PURPOSE" => Token::Purpose,
        _ => Token::Ident(word.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_a_filter_clause() {
        let tokens = tokenize("ALLOW FILTER age >= 18").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Allow,
                Token::Filter,
                Token::Ident("age".into()),
                Token::Ge,
                Token::Int(18),
            ]
        );
    }

    #[test]
    fn tokenizes_quoted_strings_and_floats() {
        let tokens = tokenize("FILTER gender == 'M' PRIVACY DP(1.0, 1e-5)").unwrap();
        assert!(tokens.contains(&Token::Str("M".into())));
        assert!(tokens.iter().any(|t| matches!(t, Token::Float(_))));
    }

    #[test]
    fn rejects_unterminated_string() {
        assert!(tokenize("FILTER gender == 'M").is_err());
    }
}

//! Recursive-descent parser: surface syntax → attribute tree → DNF.

use chrono::NaiveDate;
use legalease_error::{legalease_bail, LegaleaseResult};
use ordered_float::OrderedFloat;

use crate::attribute::{Attribute, PrivacyTechnique};
use crate::domain::{ColumnSet, Interval};
use crate::lexer::{tokenize, Token};
use crate::policy::{ConjunctClause, Dnf, Policy};
use crate::value::ExtendedValue;

/// The attribute tree yielded by the expression grammar, before flattening
/// into DNF. `AND`/`OR` are kept right-associative, matching the grammar.
#[derive(Clone, Debug, PartialEq)]
enum Expr {
    Attr(Attribute),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Distributes AND over OR to produce a flat list of conjunct clauses.
    fn to_dnf(&self) -> Vec<Vec<Attribute>> {
        match self {
            Expr::Attr(a) => vec![vec![a.clone()]],
            Expr::Or(lhs, rhs) => {
                let mut clauses = lhs.to_dnf();
                clauses.extend(rhs.to_dnf());
                clauses
            },
            Expr::And(lhs, rhs) => {
                let left = lhs.to_dnf();
                let right = rhs.to_dnf();
                let mut out = Vec::with_capacity(left.len() * right.len());
                for l in &left {
                    for r in &right {
                        let mut combined = l.clone();
                        combined.extend(r.clone());
                        out.push(combined);
                    }
                }
                out
            },
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        t
    }

    fn expect(&mut self, want: &Token) -> LegaleaseResult<()> {
        match self.advance() {
            Some(ref t) if t == want => Ok(()),
            other => legalease_bail!(ParseError: "expected {want:?}, found {other:?}"),
        }
    }

    fn expect_ident(&mut self) -> LegaleaseResult<String> {
        match self.advance() {
            Some(Token::Ident(s)) => Ok(s),
            other => legalease_bail!(ParseError: "expected identifier, found {other:?}"),
        }
    }

    fn expect_int(&mut self) -> LegaleaseResult<i64> {
        match self.advance() {
            Some(Token::Int(v)) => Ok(v),
            other => legalease_bail!(ParseError: "expected integer, found {other:?}"),
        }
    }

    /// `policy := clause+`, each clause OR'd together into one DNF.
    fn parse_policy(&mut self) -> LegaleaseResult<Dnf> {
        let mut clauses = Vec::new();
        while self.peek().is_some() {
            let expr = self.parse_clause()?;
            for attrs in expr.to_dnf() {
                clauses.push(ConjunctClause::new(attrs));
            }
        }
        if clauses.is_empty() {
            legalease_bail!(ParseError: "policy must contain at least one ALLOW clause");
        }
        Ok(Dnf::new(clauses))
    }

    /// `clause := "ALLOW" expr`.
    fn parse_clause(&mut self) -> LegaleaseResult<Expr> {
        self.expect(&Token::Allow)?;
        self.parse_or()
    }

    /// `expr := expr "OR" expr | <and-expr>`, right-associative.
    fn parse_or(&mut self) -> LegaleaseResult<Expr> {
        let lhs = self.parse_and()?;
        if matches!(self.peek(), Some(Token::Or)) {
            self.advance();
            let rhs = self.parse_or()?;
            Ok(Expr::Or(Box::new(lhs), Box::new(rhs)))
        } else {
            Ok(lhs)
        }
    }

    /// `expr := expr "AND" expr | <atom>`, right-associative, binds tighter than OR.
    fn parse_and(&mut self) -> LegaleaseResult<Expr> {
        let lhs = self.parse_atom()?;
        if matches!(self.peek(), Some(Token::And)) {
            self.advance();
            let rhs = self.parse_and()?;
            Ok(Expr::And(Box::new(lhs), Box::new(rhs)))
        } else {
            Ok(lhs)
        }
    }

    /// `atom := attr | "(" expr ")"`.
    fn parse_atom(&mut self) -> LegaleaseResult<Expr> {
        match self.peek() {
            Some(Token::LParen) => {
                self.advance();
                let inner = self.parse_or()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            },
            Some(Token::Filter) => self.parse_filter(),
            Some(Token::Redact) => self.parse_redact(),
            Some(Token::Schema) => self.parse_schema(),
            Some(Token::Privacy) => self.parse_privacy(),
            Some(Token::Role) => {
                self.advance();
                Ok(Expr::Attr(Attribute::Role(self.expect_ident()?)))
            },
            Some(Token::Purpose) => {
                self.advance();
                Ok(Expr::Attr(Attribute::Purpose(self.expect_ident()?)))
            },
            other => legalease_bail!(ParseError: "expected an attribute or '(', found {other:?}"),
        }
    }

    fn parse_filter(&mut self) -> LegaleaseResult<Expr> {
        self.advance();
        let col = self.expect_ident()?;
        let op = self.advance();
        let value = match self.advance() {
            Some(Token::Int(v)) => ExtendedValue::integer(v),
            Some(Token::Str(s)) => ExtendedValue::string(s),
            other => legalease_bail!(ParseError: "expected a filter value, found {other:?}"),
        };
        let interval = match op {
            Some(Token::Eq) => Interval::new(value.clone(), value),
            Some(Token::Le) => Interval::new(ExtendedValue::neg_infinity(), value),
            Some(Token::Ge) => Interval::new(value, ExtendedValue::pos_infinity()),
            Some(Token::Lt) | Some(Token::Gt) | Some(Token::Ne) => {
                legalease_bail!(UnsupportedOperator: "filters only support ==, <=, >=")
            },
            other => legalease_bail!(ParseError: "expected a comparison operator, found {other:?}"),
        };
        Ok(Expr::Attr(Attribute::Filter { col, interval }))
    }

    fn parse_redact(&mut self) -> LegaleaseResult<Expr> {
        self.advance();
        let col = self.expect_ident()?;
        self.expect(&Token::LParen)?;
        let left = self.parse_optional_bound()?;
        self.expect(&Token::Colon)?;
        let right = self.parse_optional_bound()?;
        self.expect(&Token::RParen)?;
        Ok(Expr::Attr(Attribute::Redact { col, left, right }))
    }

    fn parse_optional_bound(&mut self) -> LegaleaseResult<Option<i64>> {
        if matches!(self.peek(), Some(Token::Colon) | Some(Token::RParen)) {
            Ok(None)
        } else {
            Ok(Some(self.expect_int()?))
        }
    }

    fn parse_schema(&mut self) -> LegaleaseResult<Expr> {
        self.advance();
        let mut cols = vec![self.expect_ident()?];
        while matches!(self.peek(), Some(Token::Comma)) {
            self.advance();
            cols.push(self.expect_ident()?);
        }
        Ok(Expr::Attr(Attribute::Schema(ColumnSet::new(cols))))
    }

    fn parse_privacy(&mut self) -> LegaleaseResult<Expr> {
        self.advance();
        let name = self.expect_ident()?;
        let tech = match name.as_str() {
            "Anonymization" => PrivacyTechnique::Anonymization,
            "Aggregation" => PrivacyTechnique::Aggregation,
            "k-anonymity" => PrivacyTechnique::KAnonymity(self.expect_int()? as u64),
            "l-diversity" => PrivacyTechnique::LDiversity(self.expect_int()? as u64),
            "t-closeness" => PrivacyTechnique::TCloseness(self.expect_int()? as u64),
            "DP" => {
                self.expect(&Token::LParen)?;
                let epsilon = self.expect_float()?;
                self.expect(&Token::Comma)?;
                let delta = self.expect_float()?;
                self.expect(&Token::RParen)?;
                PrivacyTechnique::DifferentialPrivacy {
                    epsilon: OrderedFloat(epsilon),
                    delta: OrderedFloat(delta),
                }
            },
            other => legalease_bail!(UnsupportedPrivacyTech: "unknown privacy technique '{other}'"),
        };
        Ok(Expr::Attr(Attribute::Privacy(tech)))
    }

    fn expect_float(&mut self) -> LegaleaseResult<f64> {
        match self.advance() {
            Some(Token::Float(v)) => Ok(v),
            Some(Token::Int(v)) => Ok(v as f64),
            other => legalease_bail!(ParseError: "expected a number, found {other:?}"),
        }
    }
}

/// Parses a policy source string directly into a canonicalized `Policy`.
pub fn parse_policy(src: &str) -> LegaleaseResult<Policy> {
    let tokens = tokenize(src)?;
    let dnf = Parser::new(tokens).parse_policy()?;
    Ok(Policy::from_dnf(dnf))
}

/// Parses an ISO-8601 date (`YYYY-MM-DD`); exposed for surrogate-library code
/// that needs to interpret a filter bound read from a data fixture as a date
/// rather than an integer.
pub fn parse_date(src: &str) -> LegaleaseResult<NaiveDate> {
    NaiveDate::parse_from_str(src, "%Y-%m-%d")
        .map_err(|e| legalease_error::legalease_err!(ParseError: "invalid date '{}': {}", src, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_single_filter_clause() {
        let policy = parse_policy("ALLOW FILTER age >= 18").unwrap();
        assert_eq!(policy.0 .0.len(), 1);
        assert_eq!(policy.0 .0[0].0.len(), 1);
        assert!(matches!(policy.0 .0[0].0[0], Attribute::Filter { .. }));
    }

    #[test]
    fn and_binds_tighter_than_or() {
        // a AND b OR c  ==  (a AND b) OR c  -> two clauses, first with two attrs.
        let policy = parse_policy("ALLOW ROLE A AND ROLE B OR ROLE C").unwrap();
        assert_eq!(policy.0 .0.len(), 2);
    }

    #[test]
    fn parentheses_override_precedence() {
        let policy = parse_policy("ALLOW ROLE A AND (ROLE B OR ROLE C)").unwrap();
        assert_eq!(policy.0 .0.len(), 2);
        for clause in &policy.0 .0 {
            assert_eq!(clause.0.len(), 2);
        }
    }

    #[test]
    fn schema_attribute_collects_all_columns() {
        let policy = parse_policy("ALLOW SCHEMA age, gender, race").unwrap();
        match &policy.0 .0[0].0[0] {
            Attribute::Schema(cols) => assert_eq!(cols.iter().count(), 3),
            other => panic!("expected Schema, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unsupported_comparison_operators() {
        assert!(parse_policy("ALLOW FILTER age < 18").is_err());
        assert!(parse_policy("ALLOW FILTER age != 18").is_err());
    }

    #[test]
    fn rejects_unknown_privacy_technique() {
        assert!(parse_policy("ALLOW PRIVACY Teleportation").is_err());
    }

    #[test]
    fn scenario_two_from_the_data_model_parses_into_expected_clause_shape() {
        let src = "ALLOW FILTER age >= 18 AND (SCHEMA age OR (FILTER gender == 'M' AND (ROLE MANAGER OR FILTER age <= 90)))";
        let policy = parse_policy(src).unwrap();
        // (age>=18 AND schema) OR (age>=18 AND gender=='M' AND role) OR (age>=18 AND gender=='M' AND age<=90)
        assert_eq!(policy.0 .0.len(), 3);
    }

    #[test]
    fn a_subsumed_clause_is_dropped_on_parse() {
        // (ROLE A AND ROLE B) OR ROLE A: the second clause only demands ROLE A,
        // which the first clause already demands alongside ROLE B, so the
        // first clause subsumes the second and it is dropped.
        let policy = parse_policy("ALLOW (ROLE A AND ROLE B) OR ROLE A").unwrap();
        assert_eq!(policy.0 .0.len(), 1);
        assert_eq!(policy.0 .0[0].0.len(), 2);
    }
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Host-side evaluation of threshold predicates
//!
//! Threshold and event-threshold fragments of the standard models are single
//! comparisons (`$(V) >= $(ip2)`) or constants (`0`). This module parses that
//! subset so tools can check spike conditions without a kernel compiler.

use super::{CodeTemplate, Placeholder, Segment};
use crate::error::{ModelError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Ge,
    Gt,
    Le,
    Lt,
    Eq,
    Ne,
}

impl CmpOp {
    fn apply(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            CmpOp::Ge => lhs >= rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Le => lhs <= rhs,
            CmpOp::Lt => lhs < rhs,
            CmpOp::Eq => lhs == rhs,
            CmpOp::Ne => lhs != rhs,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(f64),
    Ref(Placeholder),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Operand(Operand),
    Op(CmpOp),
}

/// A parsed `operand [op operand]` predicate
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    lhs: Operand,
    rhs: Option<(CmpOp, Operand)>,
}

impl Condition {
    /// Parse a threshold template
    ///
    /// # Errors
    ///
    /// `InvalidCondition` if the template is not a single comparison or constant.
    pub fn parse(template: &CodeTemplate) -> Result<Self> {
        let invalid = |reason: &str| ModelError::InvalidCondition {
            condition: template.source().to_string(),
            reason: reason.to_string(),
        };

        let mut tokens = Vec::new();
        for segment in template.segments() {
            match segment {
                Segment::Placeholder(p) => tokens.push(Token::Operand(Operand::Ref(p.clone()))),
                Segment::Text(text) => tokenize(text, &mut tokens).map_err(|r| invalid(&r))?,
            }
        }

        let mut iter = tokens.into_iter();
        let lhs = match iter.next() {
            Some(Token::Operand(o)) => o,
            Some(Token::Op(_)) => return Err(invalid("expected operand before operator")),
            None => return Err(invalid("empty condition")),
        };
        let rhs = match (iter.next(), iter.next()) {
            (None, _) => None,
            (Some(Token::Op(op)), Some(Token::Operand(o))) => Some((op, o)),
            _ => return Err(invalid("expected `operand op operand`")),
        };
        if iter.next().is_some() {
            return Err(invalid("only a single comparison is supported"));
        }

        Ok(Self { lhs, rhs })
    }

    /// Evaluate with placeholder values supplied by `lookup`
    ///
    /// A lone operand is true when non-zero.
    pub fn evaluate<F>(&self, lookup: F) -> Result<bool>
    where
        F: Fn(&Placeholder) -> Option<f64>,
    {
        let value = |operand: &Operand| match operand {
            Operand::Literal(v) => Ok(*v),
            Operand::Ref(p) => lookup(p).ok_or_else(|| ModelError::UnresolvedPlaceholder(p.token())),
        };
        let lhs = value(&self.lhs)?;
        match &self.rhs {
            None => Ok(lhs != 0.0),
            Some((op, rhs)) => Ok(op.apply(lhs, value(rhs)?)),
        }
    }

    /// The condition never holds regardless of state (e.g. `0`)
    pub fn is_never(&self) -> bool {
        matches!((&self.lhs, &self.rhs), (Operand::Literal(v), None) if *v == 0.0)
    }
}

fn tokenize(text: &str, tokens: &mut Vec<Token>) -> core::result::Result<(), String> {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let next = chars.get(i + 1).copied();
        let two = |op: CmpOp| (Token::Op(op), 2);
        let op = match (c, next) {
            ('>', Some('=')) => Some(two(CmpOp::Ge)),
            ('<', Some('=')) => Some(two(CmpOp::Le)),
            ('=', Some('=')) => Some(two(CmpOp::Eq)),
            ('!', Some('=')) => Some(two(CmpOp::Ne)),
            ('>', _) => Some((Token::Op(CmpOp::Gt), 1)),
            ('<', _) => Some((Token::Op(CmpOp::Lt), 1)),
            _ => None,
        };
        if let Some((token, width)) = op {
            tokens.push(token);
            i += width;
            continue;
        }

        let expects_operand = !matches!(tokens.last(), Some(Token::Operand(_)));
        let starts_number = c.is_ascii_digit()
            || c == '.'
            || (c == '-' && expects_operand && next.is_some_and(|n| n.is_ascii_digit() || n == '.'));
        if !starts_number {
            return Err(format!("unexpected character '{}'", c));
        }

        let start = i;
        i += 1;
        while i < chars.len() {
            let d = chars[i];
            let exponent_sign = (d == '-' || d == '+') && matches!(chars[i - 1], 'e' | 'E');
            if d.is_ascii_digit() || d == '.' || d == 'e' || d == 'E' || exponent_sign {
                i += 1;
            } else {
                break;
            }
        }
        let literal: String = chars[start..i].iter().collect();
        // C float suffix
        if chars.get(i) == Some(&'f') {
            i += 1;
        }
        let value = literal
            .parse::<f64>()
            .map_err(|_| format!("invalid number '{}'", literal))?;
        tokens.push(Token::Operand(Operand::Literal(value)));
    }
    Ok(())
}

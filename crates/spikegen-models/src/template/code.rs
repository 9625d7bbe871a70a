// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Parsing and substitution of `$(...)` code templates

use super::Placeholder;
use crate::error::{ModelError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Placeholder(Placeholder),
}

/// A parsed code fragment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeTemplate {
    source: String,
    segments: Vec<Segment>,
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl CodeTemplate {
    /// Parse template text
    ///
    /// A `$` not followed by `(` is literal text.
    ///
    /// # Errors
    ///
    /// `InvalidTemplate` for an unterminated `$(` or a placeholder whose name
    /// is not an identifier.
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(start) = rest.find("$(") {
            text.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find(')').ok_or_else(|| ModelError::InvalidTemplate {
                position: offset + start,
                reason: "unterminated placeholder".to_string(),
            })?;
            let token = &after[..end];
            if !is_identifier(token) {
                return Err(ModelError::InvalidTemplate {
                    position: offset + start,
                    reason: format!("'{}' is not a valid placeholder name", token),
                });
            }
            if !text.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut text)));
            }
            segments.push(Segment::Placeholder(Placeholder::from_token(token)));

            let consumed = start + 2 + end + 1;
            offset += consumed;
            rest = &rest[consumed..];
        }
        text.push_str(rest);
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// All placeholders in order of appearance (repeats included)
    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(p) => Some(p),
            Segment::Text(_) => None,
        })
    }

    /// Whether the template mentions `$(token)`
    pub fn references(&self, token: &str) -> bool {
        self.placeholders().any(|p| p.token() == token)
    }

    /// Render the template, replacing every placeholder with the resolver's text
    ///
    /// # Errors
    ///
    /// `UnresolvedPlaceholder` for the first placeholder the resolver returns
    /// `None` for.
    pub fn substitute<F>(&self, mut resolve: F) -> Result<String>
    where
        F: FnMut(&Placeholder) -> Option<String>,
    {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder(p) => {
                    let value = resolve(p)
                        .ok_or_else(|| ModelError::UnresolvedPlaceholder(p.token()))?;
                    out.push_str(&value);
                }
            }
        }
        Ok(out)
    }
}

impl Serialize for CodeTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for CodeTemplate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        CodeTemplate::parse(&source).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Partner;
    use std::collections::HashMap;

    #[test]
    fn test_parse_segments() {
        let t = CodeTemplate::parse("$(inSyn)*($(E)-$(V))").unwrap();
        let names: Vec<String> = t.placeholders().map(|p| p.token()).collect();
        assert_eq!(names, vec!["inSyn", "E", "V"]);
        assert_eq!(t.segments().len(), 6);
        assert_eq!(t.source(), "$(inSyn)*($(E)-$(V))");
    }

    #[test]
    fn test_partner_qualified() {
        let t = CodeTemplate::parse("$(V_pre) > $(Epre)").unwrap();
        let first = t.placeholders().next().unwrap();
        assert_eq!(first.name, "V");
        assert_eq!(first.partner, Some(Partner::Pre));
        assert!(t.references("V_pre"));
        assert!(!t.references("V"));
    }

    #[test]
    fn test_dollar_without_paren_is_text() {
        let t = CodeTemplate::parse("cost $5 and $(x)").unwrap();
        assert_eq!(t.placeholders().count(), 1);
        assert_eq!(t.segments()[0], Segment::Text("cost $5 and ".to_string()));
    }

    #[test]
    fn test_unterminated_placeholder() {
        let err = CodeTemplate::parse("$(V) + $(U").unwrap_err();
        assert!(matches!(err, ModelError::InvalidTemplate { position: 7, .. }));
    }

    #[test]
    fn test_invalid_placeholder_name() {
        assert!(CodeTemplate::parse("$() + 1").is_err());
        assert!(CodeTemplate::parse("$(a b)").is_err());
        assert!(CodeTemplate::parse("$(1x)").is_err());
    }

    #[test]
    fn test_substitute() {
        let t = CodeTemplate::parse("$(inSyn)*=$(expDecay);\n").unwrap();
        let values: HashMap<&str, &str> =
            [("inSyn", "inSynExc[n]"), ("expDecay", "0.904837f")].into_iter().collect();
        let out = t
            .substitute(|p| values.get(p.token().as_str()).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(out, "inSynExc[n]*=0.904837f;\n");
    }

    #[test]
    fn test_substitute_unresolved() {
        let t = CodeTemplate::parse("$(V) >= $(ip2)").unwrap();
        let err = t
            .substitute(|p| (p.name == "V").then(|| "lV".to_string()))
            .unwrap_err();
        assert_eq!(err, ModelError::UnresolvedPlaceholder("ip2".to_string()));
    }

    #[test]
    fn test_empty_template() {
        let t = CodeTemplate::parse("").unwrap();
        assert!(t.is_empty());
        assert_eq!(t.substitute(|_| None).unwrap(), "");
    }
}

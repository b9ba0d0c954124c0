//! CSS selector subset understood by the kernel and the in-memory document.
//!
//! Supported: comma groups of compound selectors built from an optional tag
//! (or `*`), `#id`, `.class` and attribute predicates (`[a]`, `[a=v]`,
//! `[a*=v]`, `[a^=v]`, `[a$=v]`, each with an optional `i` flag).
//! Combinators and pseudo-classes are rejected at parse time.

use crate::errors::SelectorError;
use crate::model::ElementSnapshot;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AttrOp {
    Exists,
    Equals,
    Contains,
    Prefix,
    Suffix,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttrPredicate {
    pub name: String,
    pub op: AttrOp,
    pub value: String,
    pub case_insensitive: bool,
}

impl AttrPredicate {
    fn matches(&self, actual: Option<&str>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        if self.op == AttrOp::Exists {
            return true;
        }
        let (actual, expected) = if self.case_insensitive {
            (actual.to_lowercase(), self.value.to_lowercase())
        } else {
            (actual.to_string(), self.value.clone())
        };
        match self.op {
            AttrOp::Exists => true,
            AttrOp::Equals => actual == expected,
            // An empty needle never matches for substring operators, as in CSS.
            AttrOp::Contains => !expected.is_empty() && actual.contains(&expected),
            AttrOp::Prefix => !expected.is_empty() && actual.starts_with(&expected),
            AttrOp::Suffix => !expected.is_empty() && actual.ends_with(&expected),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrPredicate>,
}

impl Compound {
    pub fn matches(&self, el: &ElementSnapshot) -> bool {
        if let Some(tag) = &self.tag {
            if !tag.eq_ignore_ascii_case(&el.tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if el.id() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let class_attr = el.attr("class").unwrap_or("");
            let present: Vec<&str> = class_attr.split_whitespace().collect();
            if !self.classes.iter().all(|c| present.contains(&c.as_str())) {
                return false;
            }
        }
        self.attrs.iter().all(|pred| pred.matches(el.attr(&pred.name)))
    }
}

/// Parsed selector list; an element matches when any group matches.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Selector {
    source: String,
    groups: Vec<Compound>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut groups = Vec::new();
        for (offset, part) in split_groups(trimmed)? {
            let part_trimmed = part.trim();
            if part_trimmed.is_empty() {
                return Err(SelectorError::Unexpected {
                    selector: trimmed.to_string(),
                    found: ',',
                    offset,
                });
            }
            let lead = part.len() - part.trim_start().len();
            groups.push(Parser::new(trimmed, part_trimmed, offset + lead).compound()?);
        }
        Ok(Self {
            source: trimmed.to_string(),
            groups,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn groups(&self) -> &[Compound] {
        &self.groups
    }

    pub fn matches(&self, el: &ElementSnapshot) -> bool {
        self.groups.iter().any(|group| group.matches(el))
    }
}

/// Splits on top-level commas, keeping the byte offset of every group.
fn split_groups(source: &str) -> Result<Vec<(usize, &str)>, SelectorError> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0usize;
    for (idx, ch) in source.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push((start, &source[start..idx]));
                start = idx + 1;
            }
            _ => {}
        }
    }
    if quote.is_some() {
        return Err(SelectorError::Unterminated {
            selector: source.to_string(),
            what: "string",
        });
    }
    if depth != 0 {
        return Err(SelectorError::Unterminated {
            selector: source.to_string(),
            what: "attribute predicate",
        });
    }
    parts.push((start, &source[start..]));
    Ok(parts)
}

struct Parser<'a> {
    full: &'a str,
    chars: Vec<char>,
    pos: usize,
    base: usize,
}

impl<'a> Parser<'a> {
    fn new(full: &'a str, group: &'a str, base: usize) -> Self {
        Self {
            full,
            chars: group.chars().collect(),
            pos: 0,
            base,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn unexpected(&self, found: char) -> SelectorError {
        SelectorError::Unexpected {
            selector: self.full.to_string(),
            found,
            offset: self.base + self.pos,
        }
    }

    fn unsupported(&self, feature: &'static str) -> SelectorError {
        SelectorError::Unsupported {
            selector: self.full.to_string(),
            feature,
        }
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                out.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        if out.is_empty() {
            return Err(match self.peek() {
                Some(c) => self.unexpected(c),
                None => SelectorError::Unterminated {
                    selector: self.full.to_string(),
                    what: "identifier",
                },
            });
        }
        Ok(out)
    }

    fn compound(mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        match self.peek() {
            Some('*') => {
                self.pos += 1;
            }
            Some(c) if c.is_alphabetic() => {
                compound.tag = Some(self.ident()?.to_ascii_lowercase());
            }
            _ => {}
        }
        while let Some(c) = self.peek() {
            match c {
                '#' => {
                    self.pos += 1;
                    compound.id = Some(self.ident()?);
                }
                '.' => {
                    self.pos += 1;
                    compound.classes.push(self.ident()?);
                }
                '[' => {
                    self.pos += 1;
                    compound.attrs.push(self.attribute()?);
                }
                ':' => return Err(self.unsupported("pseudo-class")),
                c if c.is_whitespace() || matches!(c, '>' | '+' | '~') => {
                    return Err(self.unsupported("combinator"))
                }
                other => return Err(self.unexpected(other)),
            }
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<AttrPredicate, SelectorError> {
        self.skip_ws();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_ws();
        let op = match self.bump() {
            Some(']') => {
                return Ok(AttrPredicate {
                    name,
                    op: AttrOp::Exists,
                    value: String::new(),
                    case_insensitive: false,
                })
            }
            Some('=') => AttrOp::Equals,
            Some(c @ ('*' | '^' | '$')) => {
                if self.bump() != Some('=') {
                    self.pos -= 1;
                    return Err(self.unexpected(self.peek().unwrap_or(c)));
                }
                match c {
                    '*' => AttrOp::Contains,
                    '^' => AttrOp::Prefix,
                    _ => AttrOp::Suffix,
                }
            }
            Some('~' | '|') => return Err(self.unsupported("attribute operator")),
            Some(other) => {
                self.pos -= 1;
                return Err(self.unexpected(other));
            }
            None => {
                return Err(SelectorError::Unterminated {
                    selector: self.full.to_string(),
                    what: "attribute predicate",
                })
            }
        };
        self.skip_ws();
        let value = match self.peek() {
            Some(q @ ('"' | '\'')) => {
                self.pos += 1;
                let mut out = String::new();
                loop {
                    match self.bump() {
                        Some(c) if c == q => break,
                        Some(c) => out.push(c),
                        None => {
                            return Err(SelectorError::Unterminated {
                                selector: self.full.to_string(),
                                what: "string",
                            })
                        }
                    }
                }
                out
            }
            _ => self.ident()?,
        };
        self.skip_ws();
        let mut case_insensitive = false;
        if let Some(flag @ ('i' | 'I' | 's' | 'S')) = self.peek() {
            self.pos += 1;
            case_insensitive = flag.eq_ignore_ascii_case(&'i');
            self.skip_ws();
        }
        match self.bump() {
            Some(']') => Ok(AttrPredicate {
                name,
                op,
                value,
                case_insensitive,
            }),
            Some(other) => {
                self.pos -= 1;
                Err(self.unexpected(other))
            }
            None => Err(SelectorError::Unterminated {
                selector: self.full.to_string(),
                what: "attribute predicate",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementHandle;

    fn el(tag: &str, attrs: &[(&str, &str)]) -> ElementSnapshot {
        let mut snap = ElementSnapshot::new(ElementHandle("n".into()), tag);
        for (k, v) in attrs {
            snap.attributes.insert(k.to_string(), v.to_string());
        }
        snap
    }

    #[test]
    fn parses_portal_selectors() {
        for source in [
            r#"input[id*="firstName"]"#,
            r#"input[aria-label*="First name" i]"#,
            r#"#name,[name="name"],[placeholder*="name" i]"#,
            r#".jobs-easy-apply-modal, [data-test-modal]"#,
            r#"a[role="button"]"#,
            r#"h1.title"#,
            r#"[name="applicant.name"]"#,
        ] {
            Selector::parse(source).unwrap_or_else(|e| panic!("{source}: {e}"));
        }
    }

    #[test]
    fn case_flag_controls_matching() {
        let target = el("input", &[("placeholder", "Your First Name")]);
        assert!(Selector::parse(r#"input[placeholder*="first name" i]"#)
            .unwrap()
            .matches(&target));
        assert!(!Selector::parse(r#"input[placeholder*="first name"]"#)
            .unwrap()
            .matches(&target));
    }

    #[test]
    fn groups_are_alternatives() {
        let sel = Selector::parse(r#"#mobile,[name="mobile"]"#).unwrap();
        assert_eq!(sel.groups().len(), 2);
        assert!(sel.matches(&el("input", &[("name", "mobile")])));
        assert!(sel.matches(&el("input", &[("id", "mobile")])));
        assert!(!sel.matches(&el("input", &[("id", "phone")])));
    }

    #[test]
    fn class_and_presence_predicates() {
        let modal = el("div", &[("class", "artdeco-modal jobs-easy-apply-modal")]);
        assert!(Selector::parse(".jobs-easy-apply-modal").unwrap().matches(&modal));
        let tagged = el("div", &[("data-test-modal", "")]);
        assert!(Selector::parse("[data-test-modal]").unwrap().matches(&tagged));
        assert!(Selector::parse(r#"[class*="applyModal"]"#)
            .unwrap()
            .matches(&el("section", &[("class", "x-applyModal-root")])));
    }

    #[test]
    fn tag_must_match() {
        let sel = Selector::parse(r#"input[type="tel"]"#).unwrap();
        assert!(sel.matches(&el("input", &[("type", "tel")])));
        assert!(!sel.matches(&el("textarea", &[("type", "tel")])));
    }

    #[test]
    fn empty_substring_never_matches() {
        let sel = Selector::parse(r#"[name*=""]"#).unwrap();
        assert!(!sel.matches(&el("input", &[("name", "email")])));
    }

    #[test]
    fn rejects_unsupported_syntax() {
        assert!(matches!(
            Selector::parse("input:not([type=hidden])"),
            Err(SelectorError::Unsupported { feature: "pseudo-class", .. })
        ));
        assert!(matches!(
            Selector::parse(".company-name a"),
            Err(SelectorError::Unsupported { feature: "combinator", .. })
        ));
        assert!(matches!(
            Selector::parse(r#"[name="email"#),
            Err(SelectorError::Unterminated { .. })
        ));
        assert!(matches!(Selector::parse("  "), Err(SelectorError::Empty)));
        assert!(Selector::parse("input,,textarea").is_err());
        assert!(Selector::parse("input[id=]").is_err());
    }
}

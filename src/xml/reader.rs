//! Namespace-aware element tree over `quick-xml` events.
//!
//! Fiscal documents are small (a few hundred KB at most) and every parser
//! needs random access to sibling groups, so the event stream is folded
//! into an owned tree first and queried afterwards.

use chrono::{DateTime, FixedOffset};
use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use rust_decimal::Decimal;

use super::number::{parse_decimal, parse_timestamp};
use crate::core::ParseError;

/// One XML element with its resolved namespace.
#[derive(Debug, Clone, Default)]
pub(crate) struct Element {
    pub ns: Option<String>,
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

/// Deepest element nesting accepted. Fiscal layouts stay well under 20.
const MAX_DEPTH: usize = 64;

fn malformed(e: impl std::fmt::Display) -> ParseError {
    ParseError::Malformed(e.to_string())
}

/// Read a whole document into a tree and return its root element.
pub(crate) fn read_tree(xml: &str) -> Result<Element, ParseError> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_resolved_event() {
            Ok((ns, Event::Start(ref e))) => {
                let element = open(ns, e)?;
                if stack.is_empty() && root.is_some() {
                    return Err(malformed("more than one root element"));
                }
                if stack.len() >= MAX_DEPTH {
                    return Err(malformed("nesting too deep"));
                }
                stack.push(element);
            }
            Ok((ns, Event::Empty(ref e))) => {
                let element = open(ns, e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None if root.is_none() => root = Some(element),
                    None => return Err(malformed("more than one root element")),
                }
            }
            Ok((_, Event::Text(ref e))) => {
                let text = e.unescape().map_err(malformed)?;
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&text),
                    None => return Err(malformed("text outside the root element")),
                }
            }
            Ok((_, Event::CData(e))) => {
                let bytes = e.into_inner();
                let text = std::str::from_utf8(&bytes).map_err(malformed)?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(text);
                }
            }
            Ok((_, Event::End(_))) => {
                let Some(done) = stack.pop() else {
                    return Err(malformed("unexpected closing tag"));
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(done),
                    None => root = Some(done),
                }
            }
            Ok((_, Event::Eof)) => break,
            Err(e) => return Err(malformed(e)),
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| malformed("no root element"))
}

fn open(ns: ResolveResult<'_>, start: &BytesStart<'_>) -> Result<Element, ParseError> {
    let ns = match ns {
        ResolveResult::Bound(ns) => Some(
            std::str::from_utf8(ns.as_ref())
                .map_err(malformed)?
                .to_string(),
        ),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            return Err(malformed(format!(
                "undeclared namespace prefix '{}'",
                String::from_utf8_lossy(&prefix)
            )));
        }
    };
    let name = std::str::from_utf8(start.local_name().as_ref())
        .map_err(malformed)?
        .to_string();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(malformed)?;
        let key = std::str::from_utf8(attr.key.local_name().as_ref())
            .map_err(malformed)?
            .to_string();
        let value = attr.unescape_value().map_err(malformed)?.into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        ns,
        name,
        attributes,
        ..Default::default()
    })
}

/// Read-only view of an element that resolves child names against one
/// preferred namespace, falling back to unqualified elements.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Node<'a> {
    element: &'a Element,
    ns: &'static str,
}

impl<'a> Node<'a> {
    pub fn new(element: &'a Element, ns: &'static str) -> Self {
        Self { element, ns }
    }

    pub fn name(&self) -> &'a str {
        &self.element.name
    }

    fn wrap(&self, element: &'a Element) -> Node<'a> {
        Node::new(element, self.ns)
    }

    fn in_scope<'b>(
        &self,
        qualified: bool,
        name: &'b str,
    ) -> impl Iterator<Item = &'a Element> + use<'a, 'b> {
        let ns = self.ns;
        self.element.children.iter().filter(move |c| {
            c.name == name
                && if qualified {
                    c.ns.as_deref() == Some(ns)
                } else {
                    c.ns.is_none()
                }
        })
    }

    /// First child named `name`, qualified match first.
    pub fn child(&self, name: &str) -> Option<Node<'a>> {
        self.in_scope(true, name)
            .next()
            .or_else(|| self.in_scope(false, name).next())
            .map(|e| self.wrap(e))
    }

    /// All children named `name`: the qualified ones if any exist,
    /// otherwise the unqualified ones.
    pub fn children(&self, name: &str) -> Vec<Node<'a>> {
        let qualified: Vec<_> = self.in_scope(true, name).map(|e| self.wrap(e)).collect();
        if !qualified.is_empty() {
            return qualified;
        }
        self.in_scope(false, name).map(|e| self.wrap(e)).collect()
    }

    /// First element child in scope, whatever its name. Used for tax groups
    /// whose element name encodes the situation (`ICMS00`, `ICMSSN102`, ...).
    pub fn first_child(&self) -> Option<Node<'a>> {
        let ns = self.ns;
        self.element
            .children
            .iter()
            .find(|c| c.ns.as_deref() == Some(ns) || c.ns.is_none())
            .map(|e| self.wrap(e))
    }

    /// Descend a `/`-separated path.
    pub fn at(&self, path: &str) -> Option<Node<'a>> {
        path.split('/')
            .try_fold(*self, |node, segment| node.child(segment))
    }

    pub fn require_node(&self, path: &str) -> Result<Node<'a>, ParseError> {
        self.at(path)
            .ok_or_else(|| ParseError::MissingField(path.to_string()))
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Trimmed text of the node itself.
    pub fn content(&self) -> &'a str {
        self.element.text.trim()
    }

    /// Trimmed text at `path`; `None` when absent or empty.
    pub fn text(&self, path: &str) -> Option<&'a str> {
        self.at(path).map(|n| n.content()).filter(|t| !t.is_empty())
    }

    pub fn owned(&self, path: &str) -> Option<String> {
        self.text(path).map(str::to_string)
    }

    pub fn require(&self, path: &str) -> Result<&'a str, ParseError> {
        self.text(path)
            .ok_or_else(|| ParseError::MissingField(path.to_string()))
    }

    /// Optional decimal; present-but-unparseable is an error.
    pub fn decimal(&self, path: &str) -> Result<Option<Decimal>, ParseError> {
        self.text(path).map(|t| parse_decimal(path, t)).transpose()
    }

    /// Optional decimal defaulting to zero.
    pub fn amount(&self, path: &str) -> Result<Decimal, ParseError> {
        Ok(self.decimal(path)?.unwrap_or(Decimal::ZERO))
    }

    pub fn require_decimal(&self, path: &str) -> Result<Decimal, ParseError> {
        parse_decimal(path, self.require(path)?)
    }

    pub fn require_timestamp(&self, path: &str) -> Result<DateTime<FixedOffset>, ParseError> {
        parse_timestamp(path, self.require(path)?)
    }
}

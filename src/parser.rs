//! PubMed EFetch XML parser using quick-xml.
//!
//! The response is read into a small element tree, then each `PubmedArticle`
//! fragment is turned into a [`Paper`]. Lookups follow path semantics
//! ("first `PMID` anywhere below the article", "`Title` directly under a
//! `Journal`"), which a tree makes simple to express.

use crate::error::{OptionExt, PubmedError, Result};
use crate::paper::Paper;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

/// Node of the element tree
#[derive(Debug, Clone)]
enum Node {
    Element(Element),
    Text(String),
}

/// XML element with its children in document order
#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    children: Vec<Node>,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Vec::new(),
        }
    }

    /// Tag name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full text content, including text of nested inline elements.
    ///
    /// Unlike a leading-text-only lookup, `<i>` and `<sup>` words inside titles are kept.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Direct child elements
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// First direct child with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children().find(|e| e.name == name)
    }

    /// Text of the first direct child with the given name, `""` if absent
    pub fn child_text(&self, name: &str) -> String {
        self.child(name).map(Element::text).unwrap_or_default()
    }

    /// All elements below this one, pre-order (document order), excluding self
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<&Element> = self.children().collect();
        stack.reverse();
        Descendants { stack }
    }

    /// First descendant with the given name
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.descendants().find(|e| e.name == name)
    }

    /// Every `child` element whose parent is a descendant named `parent`
    pub fn find_nested<'a>(
        &'a self,
        parent: &'a str,
        child: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.descendants()
            .filter(move |e| e.name == parent)
            .flat_map(move |p| p.children().filter(move |c| c.name == child))
    }
}

/// Pre-order iterator over descendant elements
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        let start = self.stack.len();
        self.stack.extend(next.children());
        self.stack[start..].reverse();
        Some(next)
    }
}

/// Parse an XML document into its root element.
///
/// Fails on malformed XML, on a document without a root element, and on
/// content after the root element.
pub fn parse_document(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            PubmedError::Parse(format!(
                "XML error at position {}: {}",
                reader.error_position(),
                e
            ))
        })?;

        match event {
            Event::Start(e) => {
                if root.is_some() {
                    return Err(PubmedError::Parse(
                        "junk after document element".to_string(),
                    ));
                }
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                stack.push(Element::new(name));
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                attach(&mut stack, &mut root, Element::new(name))?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_parse("unexpected closing tag")?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| PubmedError::Parse(format!("Bad text content: {}", e)))?;
                match stack.last_mut() {
                    Some(current) => current.children.push(Node::Text(text.into_owned())),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(PubmedError::Parse(
                            "text outside of document element".to_string(),
                        ))
                    }
                }
            }
            Event::CData(c) => {
                if let Some(current) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                    current.children.push(Node::Text(text));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(PubmedError::Parse(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }

    root.ok_or_parse("document has no root element")
}

/// Attach a finished element to its parent, or make it the root
fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(PubmedError::Parse(
                "junk after document element".to_string(),
            ))
        }
    }
    Ok(())
}

/// Parsed EFetch response
#[derive(Debug)]
pub struct ArticleSet {
    root: Element,
}

impl ArticleSet {
    /// Parse an EFetch XML body
    pub fn parse(xml: &str) -> Result<Self> {
        Ok(Self {
            root: parse_document(xml)?,
        })
    }

    /// Number of `PubmedArticle` fragments
    pub fn len(&self) -> usize {
        self.fragments().count()
    }

    /// True when the response holds no article
    pub fn is_empty(&self) -> bool {
        self.fragments().next().is_none()
    }

    /// `PubmedArticle` fragments in document order
    pub fn fragments(&self) -> impl Iterator<Item = &Element> {
        self.root
            .descendants()
            .filter(|e| e.name == "PubmedArticle")
    }

    /// Papers, built lazily one fragment at a time
    pub fn papers(&self) -> impl Iterator<Item = Paper> + '_ {
        self.fragments().map(parse_article)
    }
}

/// Build a [`Paper`] from one `PubmedArticle` fragment
pub fn parse_article(article: &Element) -> Paper {
    let pubmed_id = article.find("PMID").map(Element::text);

    let title = article
        .find("ArticleTitle")
        .map(Element::text)
        .unwrap_or_default();

    let authors = article
        .descendants()
        .filter(|e| e.name == "Author")
        .map(|author| {
            let fore_name = author.child_text("ForeName");
            let last_name = author.child_text("LastName");
            format!("{} {}", fore_name, last_name).trim().to_string()
        })
        .collect();

    let journal = article
        .find_nested("Journal", "Title")
        .next()
        .map(Element::text)
        .unwrap_or_default();

    let publication_date = article
        .find("PubDate")
        .map(|date| {
            format_pub_date(
                &date.child_text("Year"),
                &date.child_text("Month"),
                &date.child_text("Day"),
            )
        })
        .unwrap_or_default();

    let affiliations = article
        .find_nested("AffiliationInfo", "Affiliation")
        .map(Element::text)
        .collect::<Vec<_>>()
        .join("; ");

    let abstract_text = article
        .find_nested("Abstract", "AbstractText")
        .next()
        .map(Element::text)
        .unwrap_or_default();

    let paper = Paper {
        pubmed_id,
        title,
        authors,
        journal,
        publication_date,
        affiliations,
        abstract_text,
    };
    debug!(pmid = paper.id_for_log(), authors = paper.authors.len(), "Parsed article");
    paper
}

/// Join year, month and day with "-" and strip leading/trailing "-".
///
/// `("2020", "", "")` gives `"2020"`; `("2020", "Mar", "5")` gives `"2020-Mar-5"`.
pub fn format_pub_date(year: &str, month: &str, day: &str) -> String {
    format!("{}-{}-{}", year, month, day)
        .trim_matches('-')
        .to_string()
}

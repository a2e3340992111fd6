// src/templating/node.rs
use super::escape::escape_markup;

/// A markup tree node. Text is always escaped when written, so quote content
/// can never introduce tags or break out of an attribute.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// A fluent builder for one element and its children.
#[derive(Debug, Clone)]
pub struct Element {
    tag: &'static str,
    class: Option<&'static str>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self { tag, class: None, children: Vec::new() }
    }

    pub fn class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// `<p><strong>{label}</strong> {value}</p>`
    pub fn labelled(label: &str, value: impl Into<String>) -> Self {
        Element::new("p")
            .child(Element::new("strong").text(label))
            .text(format!(" {}", value.into()))
    }

    pub fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        if let Some(class) = self.class {
            out.push_str(" class=\"");
            out.push_str(class);
            out.push('"');
        }
        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(element) => element.write_to(out),
                Node::Text(text) => out.push_str(&escape_markup(text)),
            }
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push_str(">\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_children_are_escaped() {
        let mut out = String::new();
        Element::new("p").class("price").text("<b>&").write_to(&mut out);
        assert_eq!(out, "<p class=\"price\">&lt;b&gt;&amp;</p>\n");
    }

    #[test]
    fn labelled_paragraph() {
        let mut out = String::new();
        Element::labelled("Client:", "Ada").write_to(&mut out);
        assert_eq!(out, "<p><strong>Client:</strong>\n Ada</p>\n");
    }
}

#![forbid(unsafe_code)]

//! Deterministic markup serialization.
//!
//! Attributes are written in name order, followed by a `style` attribute
//! holding the inline style map (also in name order) when it is non-empty.
//! The output is stable, so two documents with equal markup have equal tree
//! structure, attributes, and inline style.

use std::fmt::Write as _;

use sdeck_core::node::NodeId;

use crate::document::{Document, NodeData};

impl Document {
    /// Serialize `id` and its subtree.
    #[must_use]
    pub fn outer_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(id, None, &mut out);
        out
    }

    /// Serialize only the children of `id`.
    #[must_use]
    pub fn inner_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_markup(child, None, &mut out);
        }
        out
    }

    /// Serialize `id` and its subtree, writing each element's [`NodeId`] into
    /// the attribute `id_attr` first so a host can map its nodes back.
    #[must_use]
    pub fn outer_markup_tagged(&self, id: NodeId, id_attr: &str) -> String {
        let mut out = String::new();
        self.write_markup(id, Some(id_attr), &mut out);
        out
    }

    fn write_markup(&self, id: NodeId, id_attr: Option<&str>, out: &mut String) {
        match self.data(id) {
            None => {}
            Some(NodeData::Text(text)) => escape_into(text, false, out),
            Some(NodeData::Element(el)) => {
                let _ = write!(out, "<{}", el.tag());
                if let Some(attr) = id_attr {
                    let _ = write!(out, " {attr}=\"{}\"", id.get());
                }
                for (name, value) in el.attrs() {
                    let _ = write!(out, " {name}=\"");
                    escape_into(value, true, out);
                    out.push('"');
                }
                let style = el
                    .style()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect::<Vec<_>>()
                    .join("; ");
                if !style.is_empty() {
                    out.push_str(" style=\"");
                    escape_into(&style, true, out);
                    out.push('"');
                }
                out.push('>');
                for &child in self.children(id) {
                    self.write_markup(child, id_attr, out);
                }
                let _ = write!(out, "</{}>", el.tag());
            }
        }
    }
}

fn escape_into(raw: &str, attribute: bool, out: &mut String) {
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Document;

    #[test]
    fn attributes_then_style_in_name_order() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_attr(div, "id", "a").unwrap();
        doc.set_attr(div, "class", "x y").unwrap();
        doc.set_style(div, "top", "50%").unwrap();
        doc.set_style(div, "left", "50%").unwrap();
        assert_eq!(
            doc.outer_markup(div),
            r#"<div class="x y" id="a" style="left: 50%; top: 50%"></div>"#
        );
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        doc.set_attr(p, "title", "\"a\" & b").unwrap();
        let t = doc.create_text("1 < 2 & \"ok\"");
        doc.append_child(p, t).unwrap();
        assert_eq!(
            doc.outer_markup(p),
            r#"<p title="&quot;a&quot; &amp; b">1 &lt; 2 &amp; "ok"</p>"#
        );
    }

    #[test]
    fn inner_markup_skips_the_wrapper() {
        let mut doc = Document::new();
        let root = doc.root();
        let em = doc.create_element("em");
        doc.append_child(root, em).unwrap();
        assert_eq!(doc.inner_markup(root), "<em></em>");
        assert_eq!(doc.outer_markup(root), "<body><em></em></body>");
    }

    #[test]
    fn tagged_markup_carries_node_ids() {
        let mut doc = Document::new();
        let root = doc.root();
        let em = doc.create_element("em");
        doc.append_child(root, em).unwrap();
        let t = doc.create_text("x");
        doc.append_child(em, t).unwrap();
        assert_eq!(
            doc.outer_markup_tagged(root, "data-node"),
            format!(
                r#"<body data-node="{}"><em data-node="{}">x</em></body>"#,
                root.get(),
                em.get()
            )
        );
    }
}

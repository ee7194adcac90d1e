#![forbid(unsafe_code)]

//! Markup serialization for surface content.
//!
//! Hand-rolled string building: output is a small, fixed grammar (one flat
//! element list with attributes, an optional `style` attribute, and optional
//! text content), so a templating or XML dependency would be dead weight.

use crate::node::ElementNode;

/// Escape a value for use inside a double-quoted attribute.
#[must_use]
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

/// Escape character data between tags.
#[must_use]
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}

/// Render a style map as a `style` attribute value: `"key: value; key: value"`.
#[must_use]
pub fn style_attr_value(style: &std::collections::BTreeMap<String, String>) -> String {
    let mut out = String::new();
    for (key, value) in style {
        if !out.is_empty() {
            out.push_str("; ");
        }
        out.push_str(key);
        out.push_str(": ");
        out.push_str(value);
    }
    out
}

/// Append one element's markup to `out`.
pub fn push_element(out: &mut String, node: &ElementNode) {
    out.push('<');
    out.push_str(node.tag());
    for (key, value) in node.attrs() {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    if !node.style().is_empty() {
        out.push_str(" style=\"");
        out.push_str(&escape_attr(&style_attr_value(node.style())));
        out.push('"');
    }
    match node.text() {
        Some(text) => {
            out.push('>');
            out.push_str(&escape_text(text));
            out.push_str("</");
            out.push_str(node.tag());
            out.push('>');
        }
        None => out.push_str("/>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn element_without_text_self_closes() {
        let mut node = ElementNode::new("rect", "r1");
        node.set_attr("x", "1".to_string());
        node.set_attr("width", "10".to_string());
        let mut out = String::new();
        push_element(&mut out, &node);
        assert_eq!(out, r#"<rect width="10" x="1"/>"#);
    }

    #[test]
    fn element_with_text_and_style() {
        let mut node = ElementNode::new("text", "label");
        node.set_attr("x", "5".to_string());
        node.set_style("fill", "red".to_string());
        node.set_style("font-size", "12px".to_string());
        node.set_text("hi <there>");
        let mut out = String::new();
        push_element(&mut out, &node);
        assert_eq!(
            out,
            r#"<text x="5" style="fill: red; font-size: 12px">hi &lt;there&gt;</text>"#
        );
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut node = ElementNode::new("rect", "r1");
        node.set_attr("data-label", r#"a"b&c"#.to_string());
        let mut out = String::new();
        push_element(&mut out, &node);
        assert_eq!(out, r#"<rect data-label="a&quot;b&amp;c"/>"#);
    }
}

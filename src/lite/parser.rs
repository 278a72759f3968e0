//! Lenient HTML fragment parser for [`LiteDocument`].
//!
//! Handles elements with quoted or bare attributes, void and self-closing
//! elements, comments, raw-text elements (`script`, `style`) and character
//! references. Malformed markup never fails: stray closing tags are dropped
//! and unclosed elements are closed at the end of the input.

use super::{LiteData, LiteDocument, NodeId, VOID_ELEMENTS};

const RAW_TEXT_ELEMENTS: [&str; 3] = ["script", "style", "textarea"];

pub(super) fn parse_into(document: &mut LiteDocument, parent: NodeId, html: &str) {
    let mut parser = Parser {
        document,
        input: html,
        pos: 0,
        stack: vec![parent],
    };
    parser.run();
}

struct Parser<'doc, 'src> {
    document: &'doc mut LiteDocument,
    input: &'src str,
    pos: usize,
    stack: Vec<NodeId>,
}

impl<'src> Parser<'_, 'src> {
    fn rest(&self) -> &'src str {
        &self.input[self.pos..]
    }

    fn current(&self) -> NodeId {
        // The stack always holds at least the parent passed to `parse_into`.
        self.stack[self.stack.len() - 1]
    }

    fn append(&mut self, node: NodeId) {
        let parent = self.current();
        self.document.attach(parent, node, None);
    }

    fn run(&mut self) {
        while self.pos < self.input.len() {
            let rest = self.rest();
            if let Some(comment) = rest.strip_prefix("<!--") {
                let (text, consumed) = match comment.find("-->") {
                    Some(end) => (&comment[..end], 4 + end + 3),
                    None => (comment, rest.len()),
                };
                let node = self.document.alloc_comment(text);
                self.append(node);
                self.pos += consumed;
            } else if rest.starts_with("</") && starts_tag_name(&rest[2..]) {
                self.close_tag();
            } else if rest.starts_with('<') && starts_tag_name(&rest[1..]) {
                self.open_tag();
            } else if rest.starts_with("<!") {
                // Doctype and other declarations carry nothing we keep.
                self.pos += rest.find('>').map_or(rest.len(), |end| end + 1);
            } else {
                self.text();
            }
        }
    }

    fn text(&mut self) {
        let rest = self.rest();
        // Skip the first character so that a lone `<` is consumed as text.
        let first = rest.chars().next().map_or(1, char::len_utf8);
        let end = rest[first..]
            .find('<')
            .map_or(rest.len(), |index| index + first);
        let decoded = decode_entities(&rest[..end]);
        self.pos += end;

        // Text split around a stray `<` stays one node.
        let parent = self.current();
        if let Some(last) = self.document.children(parent).last().copied()
            && let LiteData::Text(existing) = &mut self.document.node_mut(last).data
        {
            existing.push_str(&decoded);
            return;
        }
        let node = self.document.alloc_text(&decoded);
        self.append(node);
    }

    fn close_tag(&mut self) {
        let rest = &self.rest()[2..];
        let name_len = tag_name_len(rest);
        let name = rest[..name_len].to_ascii_lowercase();
        self.pos += 2 + rest.find('>').map_or(rest.len(), |end| end + 1);

        // The bottom of the stack is the fragment parent and is never closed.
        if let Some(depth) = self.stack[1..]
            .iter()
            .rposition(|node| self.document.tag(*node) == Some(name.as_str()))
        {
            self.stack.truncate(depth + 1);
        }
    }

    fn open_tag(&mut self) {
        self.pos += 1;
        let name_len = tag_name_len(self.rest());
        let name = self.rest()[..name_len].to_ascii_lowercase();
        self.pos += name_len;
        let element = self.document.alloc_element(&name);

        let mut self_closing = false;
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.is_empty() {
                break;
            }
            if let Some(after) = rest.strip_prefix("/>") {
                self_closing = true;
                self.pos = self.input.len() - after.len();
                break;
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break;
            }
            if rest.starts_with('/') {
                self.pos += 1;
                continue;
            }
            let (attribute, value) = self.attribute();
            self.document.push_attribute(element, &attribute, &value);
        }

        self.append(element);
        if self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
            return;
        }
        if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            self.raw_text(element, &name);
            return;
        }
        self.stack.push(element);
    }

    fn raw_text(&mut self, element: NodeId, name: &str) {
        let rest = self.rest();
        let closing = format!("</{name}");
        let end = rest
            .to_ascii_lowercase()
            .find(&closing)
            .unwrap_or(rest.len());
        if end > 0 {
            let content = &rest[..end];
            let text = if name == "textarea" {
                decode_entities(content)
            } else {
                content.to_owned()
            };
            let node = self.document.alloc_text(&text);
            self.document.attach(element, node, None);
        }
        self.pos += end;
        let rest = self.rest();
        self.pos += rest.find('>').map_or(rest.len(), |end| end + 1);
    }

    fn attribute(&mut self) -> (String, String) {
        let rest = self.rest();
        let name_len = rest
            .find(|c: char| c.is_ascii_whitespace() || matches!(c, '=' | '>' | '/'))
            .unwrap_or(rest.len())
            .max(1.min(rest.len()));
        let name = rest[..name_len].to_ascii_lowercase();
        self.pos += name_len;
        self.skip_whitespace();

        let Some(after_eq) = self.rest().strip_prefix('=') else {
            return (name, String::new());
        };
        self.pos = self.input.len() - after_eq.len();
        self.skip_whitespace();

        let rest = self.rest();
        let value = match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let body = &rest[1..];
                let end = body.find(quote).unwrap_or(body.len());
                self.pos += 1 + end + usize::from(end < body.len());
                &body[..end]
            }
            _ => {
                let end = rest
                    .find(|c: char| c.is_ascii_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                self.pos += end;
                &rest[..end]
            }
        };
        (name, decode_entities(value))
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }
}

fn starts_tag_name(rest: &str) -> bool {
    rest.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}

fn tag_name_len(rest: &str) -> usize {
    rest.find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == ':'))
        .unwrap_or(rest.len())
}

/// Decodes the character references that matter for math source.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_owned();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest[1..].find(';').and_then(|semi| {
            let name = &rest[1..=semi];
            decode_reference(name).map(|ch| (ch, semi + 2))
        });
        match decoded {
            Some((ch, len)) => {
                out.push(ch);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        return char::from_u32(code);
    }
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(html: &str) -> String {
        let doc = LiteDocument::from_html(html);
        doc.inner_html(doc.body())
    }

    #[test]
    fn nested_elements_and_attributes() {
        assert_eq!(
            round_trip(r#"<div class="cell" data-x='1'><p>a<b>b</b>c</p></div>"#),
            r#"<div class="cell" data-x="1"><p>a<b>b</b>c</p></div>"#
        );
    }

    #[test]
    fn void_and_self_closing_elements_have_no_children() {
        assert_eq!(round_trip("a<br>b<hr/>c"), "a<br>b<hr>c");
        assert_eq!(round_trip("<span/>x"), "<span></span>x");
    }

    #[test]
    fn entities_are_decoded_and_re_escaped() {
        let doc = LiteDocument::from_html("<p>a &lt; b &amp;&amp; c &#36; &#x24; &unknown;</p>");
        let p = doc.elements_by_tag("p")[0];
        assert_eq!(doc.text_content(p), "a < b && c $ $ &unknown;");
        assert_eq!(
            doc.inner_html(p),
            "a &lt; b &amp;&amp; c $ $ &amp;unknown;"
        );
    }

    #[test]
    fn stray_closing_tags_are_ignored() {
        assert_eq!(round_trip("<p>a</span>b</p></div>c"), "<p>ab</p>c");
        assert_eq!(round_trip("<p><i>unclosed</p>"), "<p><i>unclosed</i></p>");
    }

    #[test]
    fn raw_text_elements_keep_markup() {
        let doc = LiteDocument::from_html("<script>if (a < b) { $x$ }</script><p>1 < 2</p>");
        let script = doc.elements_by_tag("script")[0];
        assert_eq!(doc.text_content(script), "if (a < b) { $x$ }");
        assert_eq!(
            doc.inner_html(doc.body()),
            "<script>if (a < b) { $x$ }</script><p>1 &lt; 2</p>"
        );
    }

    #[test]
    fn comments_are_preserved() {
        assert_eq!(round_trip("a<!-- note -->b"), "a<!-- note -->b");
    }
}

use crate::render::{RenderMode, Renderer};
use crate::vnode::VNode;
use pagecraft_model::{Breakpoint, PageData};

/// Title used when the page has no SEO title
pub const DEFAULT_TITLE: &str = "Untitled page";

/// Options for HTML serialization
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl HtmlOptions {
    /// Single-line output
    pub fn compact() -> Self {
        Self {
            pretty: false,
            indent: String::new(),
        }
    }
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
        }
    }
}

struct Context<'o> {
    options: &'o HtmlOptions,
    depth: usize,
    buffer: String,
}

impl<'o> Context<'o> {
    fn new(options: &'o HtmlOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        self.start_line();
        self.add(text);
        self.end_line();
    }

    fn start_line(&mut self) {
        if self.options.pretty {
            for _ in 0..self.depth {
                self.buffer.push_str(&self.options.indent);
            }
        }
    }

    fn end_line(&mut self) {
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn into_output(self) -> String {
        self.buffer
    }
}

/// Serialize rendered nodes to an HTML fragment
pub fn to_html(nodes: &[VNode], options: &HtmlOptions) -> String {
    let mut ctx = Context::new(options);
    for node in nodes {
        write_node(node, &mut ctx);
    }
    ctx.into_output()
}

/// Render a page at a breakpoint as a standalone HTML document.
///
/// The head carries the page's SEO title and description when present.
pub fn render_document(page: &PageData, breakpoint: Breakpoint, options: &HtmlOptions) -> String {
    let nodes = Renderer::new(breakpoint, RenderMode::Preview).render_all(&page.elements);
    document(page, &nodes, options)
}

pub(crate) fn document(page: &PageData, body: &[VNode], options: &HtmlOptions) -> String {
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html lang=\"en\">");
    ctx.indent();

    ctx.add_line("<head>");
    ctx.indent();
    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    ctx.add_line(&format!(
        "<title>{}</title>",
        escape_html(page.seo_str("title").unwrap_or(DEFAULT_TITLE))
    ));
    if let Some(description) = page.seo_str("description") {
        ctx.add_line(&format!(
            "<meta name=\"description\" content=\"{}\">",
            escape_html(description)
        ));
    }
    if let Some(robots) = page.seo_str("robots") {
        ctx.add_line(&format!("<meta name=\"robots\" content=\"{}\">", escape_html(robots)));
    }
    if let Some(canonical) = page.seo_str("canonicalUrl") {
        ctx.add_line(&format!("<link rel=\"canonical\" href=\"{}\">", escape_html(canonical)));
    }
    ctx.dedent();
    ctx.add_line("</head>");

    ctx.add_line("<body>");
    ctx.indent();
    for node in body {
        write_node(node, &mut ctx);
    }
    ctx.dedent();
    ctx.add_line("</body>");

    ctx.dedent();
    ctx.add_line("</html>");

    ctx.into_output()
}

fn write_node(node: &VNode, ctx: &mut Context) {
    match node {
        VNode::Element {
            tag,
            attributes,
            styles,
            classes,
            element_id,
            children,
        } => {
            let mut open = format!("<{}", tag);
            if !classes.is_empty() {
                push_attr(&mut open, "class", &classes.join(" "));
            }
            for (name, value) in attributes {
                push_attr(&mut open, name, value);
            }
            if let Some(id) = element_id {
                push_attr(&mut open, "data-element-id", id);
            }
            if !styles.is_empty() {
                let css = styles
                    .iter()
                    .map(|(name, value)| format!("{}: {};", name, value))
                    .collect::<Vec<_>>()
                    .join(" ");
                push_attr(&mut open, "style", &css);
            }

            if children.is_empty() && is_self_closing(tag) {
                open.push_str(" />");
                ctx.add_line(&open);
                return;
            }
            open.push('>');

            if !has_element_children(children) {
                let text: String = children.iter().map(inline_text).collect();
                ctx.add_line(&format!("{}{}</{}>", open, text, tag));
                return;
            }

            ctx.add_line(&open);
            ctx.indent();
            for child in children {
                write_node(child, ctx);
            }
            ctx.dedent();
            ctx.add_line(&format!("</{}>", tag));
        }

        VNode::Text { content } => ctx.add_line(&escape_html(content)),

        VNode::Comment { content } => ctx.add_line(&format!("<!-- {} -->", comment_safe(content))),

        VNode::Placeholder {
            element_id,
            label,
            reason,
        } => {
            let mut open = String::from("<div");
            push_attr(&mut open, "class", "pb-placeholder");
            push_attr(&mut open, "data-element-id", element_id);
            push_attr(&mut open, "role", "note");
            push_attr(&mut open, "title", reason);
            ctx.add_line(&format!("{}>{}</div>", open, escape_html(label)));
        }
    }
}

fn inline_text(node: &VNode) -> String {
    match node {
        VNode::Text { content } => escape_html(content),
        VNode::Comment { content } => format!("<!-- {} -->", comment_safe(content)),
        _ => String::new(),
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_html(value));
    out.push('"');
}

/// Escape text for use in element content and quoted attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn comment_safe(text: &str) -> String {
    text.replace("--", "- -")
}

fn is_self_closing(tag: &str) -> bool {
    matches!(
        tag,
        "img" | "input" | "br" | "hr" | "meta" | "link" | "area" | "base" | "col" | "embed"
            | "source" | "track" | "wbr"
    )
}

fn has_element_children(children: &[VNode]) -> bool {
    children
        .iter()
        .any(|child| matches!(child, VNode::Element { .. } | VNode::Placeholder { .. }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_compact_fragment() {
        let node = VNode::element("section")
            .with_class("hero")
            .with_style("padding", "16px")
            .with_child(VNode::element("h1").with_child(VNode::text("Hi <there>")))
            .with_child(VNode::element("img").with_attr("src", "/a.png"));

        let html = to_html(&[node], &HtmlOptions::compact());
        assert_eq!(
            html,
            "<section class=\"hero\" style=\"padding: 16px;\"><h1>Hi &lt;there&gt;</h1><img src=\"/a.png\" /></section>"
        );
    }

    #[test]
    fn test_pretty_indentation() {
        let node = VNode::element("div")
            .with_child(VNode::element("p").with_child(VNode::text("One")))
            .with_child(VNode::comment("note -- here"));

        let html = to_html(&[node], &HtmlOptions::default());
        assert_eq!(html, "<div>\n  <p>One</p>\n  <!-- note - - here -->\n</div>\n");
    }

    #[test]
    fn test_placeholder_markup() {
        let node = VNode::placeholder("x-1", "Unknown element type: carousel", "not \"supported\"");
        let html = to_html(&[node], &HtmlOptions::compact());
        assert_eq!(
            html,
            "<div class=\"pb-placeholder\" data-element-id=\"x-1\" role=\"note\" title=\"not &quot;supported&quot;\">Unknown element type: carousel</div>"
        );
    }
}

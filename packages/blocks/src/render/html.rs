//! HTML output for rendered views

use super::VNode;

/// Options for HTML output
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Page title, used by [`render_page`]
    pub title: String,
    pub primary_color: String,
    pub background_color: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
            title: "Form preview".to_string(),
            primary_color: "#673ab7".to_string(),
            background_color: "#e6f3ff".to_string(),
        }
    }
}

struct Context<'a> {
    options: &'a HtmlOptions,
    depth: usize,
    buffer: String,
}

impl<'a> Context<'a> {
    fn new(options: &'a HtmlOptions) -> Self {
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
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Render a fragment of nodes
pub fn render_html(nodes: &[VNode], options: &HtmlOptions) -> String {
    let mut ctx = Context::new(options);
    for node in nodes {
        render_node(node, &mut ctx);
    }
    ctx.get_output()
}

/// Render nodes as a standalone page themed with the configured colours
pub fn render_page(nodes: &[VNode], options: &HtmlOptions) -> String {
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html>");
    ctx.indent();

    ctx.add_line("<head>");
    ctx.indent();
    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line(&format!("<title>{}</title>", escape_html(&options.title)));
    ctx.add_line(&format!(
        "<style>:root {{ --primary: {}; --background: {}; }}</style>",
        escape_html(&options.primary_color),
        escape_html(&options.background_color)
    ));
    ctx.dedent();
    ctx.add_line("</head>");

    ctx.add_line("<body>");
    ctx.indent();
    for node in nodes {
        render_node(node, &mut ctx);
    }
    ctx.dedent();
    ctx.add_line("</body>");

    ctx.dedent();
    ctx.add_line("</html>");

    ctx.get_output()
}

fn render_node(node: &VNode, ctx: &mut Context<'_>) {
    match node {
        VNode::Text { content } => {
            if !content.trim().is_empty() {
                ctx.add_line(&escape_html(content));
            }
        }
        VNode::Element {
            tag,
            attributes,
            children,
            block_id,
        } => {
            let mut open = format!("<{}", tag);
            if let Some(id) = block_id {
                open.push_str(&format!(" data-block-id=\"{}\"", escape_html(id)));
            }
            for (key, value) in attributes {
                if value.is_empty() {
                    open.push_str(&format!(" {}", key));
                } else {
                    open.push_str(&format!(" {}=\"{}\"", key, escape_html(value)));
                }
            }

            if is_self_closing(tag) {
                open.push_str(" />");
                ctx.add_line(&open);
                return;
            }

            open.push('>');

            // Keep single text children inline
            if let [VNode::Text { content }] = children.as_slice() {
                ctx.add_line(&format!("{}{}</{}>", open, escape_html(content), tag));
                return;
            }

            ctx.add_line(&open);
            ctx.indent();
            for child in children {
                render_node(child, ctx);
            }
            ctx.dedent();
            ctx.add_line(&format!("</{}>", tag));
        }
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn is_self_closing(tag: &str) -> bool {
    matches!(tag, "img" | "input" | "br" | "hr" | "meta")
}

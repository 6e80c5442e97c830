//! HTML → Markdown.
//!
//! ATX headings, `---` rules, `-` bullets, fenced code blocks, `_` emphasis,
//! `**` strong and inline links. Tables become GFM pipe tables with the first
//! row as header. `<del>`, `<s>` and `<strike>` pass through as raw HTML.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node};

static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("blank-run pattern is valid"));
static ORDERED_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*[0-9]+)\.(\s|$)").expect("ordered-marker pattern is valid"));

/// Elements whose whitespace-only text children are layout, not content.
const FLOW_CONTAINERS: &[&str] = &[
    "html", "body", "div", "section", "article", "main", "header", "footer", "nav", "aside",
    "figure", "blockquote", "ul", "ol", "dl", "table", "thead", "tbody", "tfoot", "tr",
];
const BLOCK_WRAPPERS: &[&str] = &[
    "p", "div", "section", "article", "main", "header", "footer", "nav", "aside", "figure",
    "figcaption", "dl", "dt", "dd", "address",
];

pub fn html_to_markdown(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(html);
    let rendered = render_children(fragment.root_element());

    let lines: Vec<&str> = rendered
        .lines()
        .map(|line| if line.trim().is_empty() { "" } else { line })
        .collect();
    BLANK_RUN
        .replace_all(&lines.join("\n"), "\n\n")
        .trim()
        .to_string()
}

fn render_children(element: ElementRef<'_>) -> String {
    let flow = FLOW_CONTAINERS.contains(&element.value().name());
    element
        .children()
        .map(|child| match child.value() {
            Node::Text(text) if flow && text.trim().is_empty() => String::new(),
            Node::Text(text) => escape_markdown(&collapse_whitespace(text)),
            Node::Element(_) => ElementRef::wrap(child)
                .map(render_element)
                .unwrap_or_default(),
            _ => String::new(),
        })
        .collect()
}

fn render_element(element: ElementRef<'_>) -> String {
    let name = element.value().name();
    match name {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = name[1..].parse::<usize>().unwrap_or(1);
            let content = single_line(&render_children(element));
            block(&format!("{} {}", "#".repeat(level), content))
        }
        "br" => "  \n".to_string(),
        "hr" => block("---"),
        "strong" | "b" => wrap_inline(&render_children(element), "**"),
        "em" | "i" => wrap_inline(&render_children(element), "_"),
        "code" => inline_code(&element.text().collect::<String>()),
        "pre" => fenced_code(element),
        "a" => link(element),
        "img" => image(element),
        "blockquote" => blockquote(&render_children(element)),
        "ul" | "ol" => list(element, name == "ol"),
        "table" => table(element),
        "del" | "s" | "strike" => element.html(),
        "script" | "style" | "head" | "title" | "noscript" | "template" => String::new(),
        _ if BLOCK_WRAPPERS.contains(&name) => block(&render_children(element)),
        _ => render_children(element),
    }
}

fn block(content: &str) -> String {
    let content = content.trim();
    if content.is_empty() {
        String::new()
    } else {
        format!("\n\n{}\n\n", content)
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn wrap_inline(content: &str, delimiter: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return content.to_string();
    }
    let leading = if content.starts_with(char::is_whitespace) { " " } else { "" };
    let trailing = if content.ends_with(char::is_whitespace) { " " } else { "" };
    format!("{}{}{}{}{}", leading, delimiter, trimmed, delimiter, trailing)
}

fn inline_code(code: &str) -> String {
    if code.is_empty() {
        String::new()
    } else if code.contains('`') {
        format!("`` {} ``", code)
    } else {
        format!("`{}`", code)
    }
}

fn fenced_code(element: ElementRef<'_>) -> String {
    let code_child = element
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == "code");
    let language = code_child
        .into_iter()
        .chain(std::iter::once(element))
        .find_map(|el| {
            el.value()
                .classes()
                .find_map(|class| class.strip_prefix("language-"))
                .map(str::to_string)
        })
        .unwrap_or_default();

    let code: String = element.text().collect();
    let code = code.strip_suffix('\n').unwrap_or(&code);
    let fence = if code.contains("```") { "````" } else { "```" };
    format!("\n\n{}{}\n{}\n{}\n\n", fence, language, code, fence)
}

fn link(element: ElementRef<'_>) -> String {
    let content = render_children(element);
    let Some(href) = element.value().attr("href") else {
        return content;
    };
    let text = single_line(&content);
    match element.value().attr("title") {
        Some(title) => format!("[{}]({} \"{}\")", text, href, title.replace('"', "\\\"")),
        None => format!("[{}]({})", text, href),
    }
}

fn image(element: ElementRef<'_>) -> String {
    let Some(src) = element.value().attr("src") else {
        return String::new();
    };
    let alt = element.value().attr("alt").unwrap_or_default();
    match element.value().attr("title") {
        Some(title) => format!("![{}]({} \"{}\")", alt, src, title.replace('"', "\\\"")),
        None => format!("![{}]({})", alt, src),
    }
}

fn blockquote(content: &str) -> String {
    let content = BLANK_RUN.replace_all(content.trim(), "\n\n");
    let quoted: Vec<String> = content
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                ">".to_string()
            } else {
                format!("> {}", line)
            }
        })
        .collect();
    block(&quoted.join("\n"))
}

fn list(element: ElementRef<'_>, ordered: bool) -> String {
    let start = element
        .value()
        .attr("start")
        .and_then(|s| s.trim().parse::<usize>().ok())
        .unwrap_or(1);

    let items: Vec<String> = element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "li")
        .enumerate()
        .map(|(index, item)| {
            let marker = if ordered {
                format!("{}. ", start + index)
            } else {
                "- ".to_string()
            };
            let content = BLANK_RUN.replace_all(render_children(item).trim(), "\n\n").into_owned();
            let indented = content.replace('\n', "\n    ");
            format!("{}{}", marker, indented)
        })
        .collect();
    block(&items.join("\n"))
}

/// Rows are the `<tr>` elements owned by this table; a nested table is
/// rendered inside its cell. The first row is the header and a `---`
/// separator row is always emitted after it.
fn table(element: ElementRef<'_>) -> String {
    let rows: Vec<Vec<String>> = element
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|row| row.value().name() == "tr" && belongs_to(*row, element))
        .map(|row| {
            row.children()
                .filter_map(ElementRef::wrap)
                .filter(|cell| matches!(cell.value().name(), "th" | "td"))
                .map(|cell| single_line(&render_children(cell)).replace('|', "\\|"))
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect();

    let Some((header, body)) = rows.split_first() else {
        return String::new();
    };

    let mut lines = vec![pipe_row(header)];
    lines.push(format!("|{}", " --- |".repeat(header.len())));
    lines.extend(body.iter().map(|cells| pipe_row(cells)));
    block(&lines.join("\n"))
}

/// The closest enclosing `<table>` of `row` is `table`.
fn belongs_to(row: ElementRef<'_>, table: ElementRef<'_>) -> bool {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "table")
        .is_some_and(|closest| closest.id() == table.id())
}

fn pipe_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

fn collapse_whitespace(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                collapsed.push(' ');
            }
            in_space = true;
        } else {
            collapsed.push(c);
            in_space = false;
        }
    }
    collapsed
}

fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    let lead = escaped.len() - escaped.trim_start().len();
    let rest = &escaped[lead..];
    if rest.starts_with('#') || rest.starts_with('>') || rest.starts_with("- ") || rest.starts_with("+ ") {
        escaped.insert(lead, '\\');
        return escaped;
    }
    ORDERED_MARKER.replace(&escaped, "$1\\.$2").into_owned()
}

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static FENCED_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```\w*\n(.*?)```").unwrap());
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static STRIKETHROUGH: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~([^~]+)~~").unwrap());
static HEADER_4: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#### (.+)$").unwrap());
static HEADER_3: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^### (.+)$").unwrap());
static HEADER_2: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^## (.+)$").unwrap());
static UNORDERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^- (.+)$").unwrap());
static ORDERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\d+\. (.+)$").unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());
static HORIZONTAL_RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^---$").unwrap());

/// Renders the restricted markdown dialect used by daily-log bodies to an
/// HTML fragment.
///
/// Code spans and fenced blocks are lifted out first so the inline
/// substitutions cannot rewrite their contents; unknown or malformed
/// constructs pass through as literal text. The renderer performs no HTML
/// escaping of the source text: callers interpolating free-text fields such
/// as titles or author names must run them through [`escape_html`]
/// themselves.
pub fn render(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let mut stash: Vec<String> = Vec::new();
    let html = protect(&FENCED_CODE, text, &mut stash, |caps| {
        format!("<pre><code>{}</code></pre>", &caps[1])
    });
    let html = protect(&INLINE_CODE, &html, &mut stash, |caps| {
        format!("<code>{}</code>", &caps[1])
    });

    let html = BOLD.replace_all(&html, "<strong>$1</strong>").into_owned();
    let html = ITALIC.replace_all(&html, "<em>$1</em>").into_owned();
    let html = STRIKETHROUGH
        .replace_all(&html, "<del>$1</del>")
        .into_owned();
    let html = HEADER_4.replace_all(&html, "<h4>$1</h4>").into_owned();
    let html = HEADER_3.replace_all(&html, "<h3>$1</h3>").into_owned();
    let html = HEADER_2.replace_all(&html, "<h2>$1</h2>").into_owned();
    let html = UNORDERED_ITEM
        .replace_all(&html, "<li>$1</li>")
        .into_owned();
    let html = ORDERED_ITEM.replace_all(&html, "<li>$1</li>").into_owned();
    let html = LINK
        .replace_all(&html, r#"<a href="$2" target="_blank" rel="noopener">$1</a>"#)
        .into_owned();
    let html = HORIZONTAL_RULE.replace_all(&html, "<hr>").into_owned();

    let html = html.replace("\n\n", "</p><p>");
    let html = html.replace('\n', "<br>");

    let mut out = format!("<p>{html}</p>");
    for (idx, fragment) in stash.iter().enumerate() {
        out = out.replace(&placeholder(idx), fragment);
    }
    out
}

/// Escapes the five HTML-significant characters. Required for any free-text
/// field interpolated outside of [`render`], since bodies originate from an
/// open-writable issue tracker.
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

// \u{1} cannot appear in issue bodies fetched as JSON text and contains no
// markdown-significant characters, so later passes leave placeholders alone.
fn placeholder(idx: usize) -> String {
    format!("\u{1}{idx}\u{1}")
}

fn protect<F>(re: &Regex, text: &str, stash: &mut Vec<String>, to_html: F) -> String
where
    F: Fn(&Captures) -> String,
{
    re.replace_all(text, |caps: &Captures| {
        let idx = stash.len();
        stash.push(to_html(caps));
        placeholder(idx)
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_renders_empty() {
        assert_eq!(render(""), "");
        assert_eq!(render("   \n  "), "");
    }

    #[test]
    fn plain_text_wraps_in_paragraph() {
        assert_eq!(render("hello world"), "<p>hello world</p>");
    }

    #[test]
    fn bold_and_italic() {
        assert_eq!(
            render("**strong** and *soft*"),
            "<p><strong>strong</strong> and <em>soft</em></p>"
        );
    }

    #[test]
    fn code_span_protects_emphasis() {
        assert_eq!(
            render("`*not emphasis*`"),
            "<p><code>*not emphasis*</code></p>"
        );
    }

    #[test]
    fn fenced_block_protects_list_markers() {
        let out = render("```rust\n- item\n## nope\n```");
        assert_eq!(out, "<p><pre><code>- item\n## nope\n</code></pre></p>");
    }

    #[test]
    fn headers_levels_two_to_four() {
        assert_eq!(render("## Two"), "<p><h2>Two</h2></p>");
        assert_eq!(render("### Three"), "<p><h3>Three</h3></p>");
        assert_eq!(render("#### Four"), "<p><h4>Four</h4></p>");
    }

    #[test]
    fn list_items_are_not_grouped() {
        assert_eq!(
            render("- one\n- two"),
            "<p><li>one</li><br><li>two</li></p>"
        );
        assert_eq!(render("1. first"), "<p><li>first</li></p>");
    }

    #[test]
    fn links_open_in_new_tab() {
        assert_eq!(
            render("[docs](https://example.com)"),
            "<p><a href=\"https://example.com\" target=\"_blank\" rel=\"noopener\">docs</a></p>"
        );
    }

    #[test]
    fn double_newline_splits_paragraphs() {
        assert_eq!(render("one\n\ntwo"), "<p>one</p><p>two</p>");
        assert_eq!(render("one\ntwo"), "<p>one<br>two</p>");
    }

    #[test]
    fn strikethrough_and_rule() {
        assert_eq!(render("~~gone~~"), "<p><del>gone</del></p>");
        assert_eq!(render("---"), "<p><hr></p>");
    }

    #[test]
    fn malformed_constructs_pass_through() {
        assert_eq!(render("**unclosed"), "<p>**unclosed</p>");
        assert_eq!(render("[text](broken"), "<p>[text](broken</p>");
    }

    #[test]
    fn raw_html_is_not_escaped_by_render() {
        // Contract: escaping is the caller's job, via escape_html.
        assert_eq!(render("<b>raw</b>"), "<p><b>raw</b></p>");
    }

    #[test]
    fn escape_html_covers_all_five() {
        assert_eq!(
            escape_html(r#"<img src="x" onerror='y'> & more"#),
            "&lt;img src=&quot;x&quot; onerror=&#39;y&#39;&gt; &amp; more"
        );
    }
}

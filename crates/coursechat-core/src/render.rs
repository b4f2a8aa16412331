//! Message rendering: conversation records to display-ready content.
//!
//! `MessageRenderer` is a pure projection. Text escaping and markdown
//! conversion are injected through [`ContentFormatter`], so the same logic
//! serves the terminal surface and headless tests.
//!
//! Citation handling: sources arrive as two parallel lists (labels and
//! optional links). Duplicated labels collapse to their first occurrence,
//! which also decides the link; later duplicates are dropped with their links.

use std::collections::HashSet;

use coursechat_types::chat::{Message, MessageKind, MessageRole};
use uuid::Uuid;

/// Output-specific text transforms supplied by the rendering surface.
pub trait ContentFormatter: Send + Sync {
    /// Make untrusted text inert for the output medium, verbatim otherwise.
    fn escape(&self, text: &str) -> String;

    /// Convert markdown to the output medium.
    fn markdown(&self, text: &str) -> String;
}

/// A single deduplicated citation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Escaped source label.
    pub label: String,
    /// External link, when the backend supplied one.
    pub link: Option<String>,
}

/// The citations block under an assistant answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcesBlock {
    pub entries: Vec<SourceEntry>,
    /// Surfaces show only the summary line until expanded.
    pub collapsed: bool,
}

impl SourcesBlock {
    /// Number of deduplicated sources.
    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

/// Rendered body of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedContent {
    pub role: MessageRole,
    pub body: String,
    /// `None` when the message has no sources at all.
    pub sources: Option<SourcesBlock>,
}

/// A conversation message ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub id: Uuid,
    pub kind: MessageKind,
    pub content: RenderedContent,
}

/// Collapse duplicate source labels, keeping first-seen order.
///
/// Returns `(label, link)` pairs. The link for a label is taken from the same
/// index as its first occurrence; a missing index or an empty string counts as
/// no link.
pub fn dedupe_sources<'a>(
    sources: &'a [String],
    links: &'a [Option<String>],
) -> Vec<(&'a str, Option<&'a str>)> {
    let mut seen = HashSet::new();
    sources
        .iter()
        .enumerate()
        .filter(|&(_, source)| seen.insert(source.as_str()))
        .map(|(index, source)| {
            let link = links
                .get(index)
                .and_then(|link| link.as_deref())
                .filter(|link| !link.is_empty());
            (source.as_str(), link)
        })
        .collect()
}

/// Pure renderer from message data to [`RenderedContent`].
pub struct MessageRenderer<F: ContentFormatter> {
    formatter: F,
}

impl<F: ContentFormatter> MessageRenderer<F> {
    pub fn new(formatter: F) -> Self {
        Self { formatter }
    }

    pub fn formatter(&self) -> &F {
        &self.formatter
    }

    /// Render message content and its citations.
    ///
    /// User text is escaped verbatim; assistant text goes through markdown.
    pub fn render(
        &self,
        content: &str,
        role: MessageRole,
        sources: Option<&[String]>,
        source_links: Option<&[Option<String>]>,
    ) -> RenderedContent {
        let body = match role {
            MessageRole::User => self.formatter.escape(content),
            MessageRole::Assistant => self.formatter.markdown(content),
        };

        let sources = sources.filter(|s| !s.is_empty()).map(|sources| {
            let entries = dedupe_sources(sources, source_links.unwrap_or_default())
                .into_iter()
                .map(|(label, link)| SourceEntry {
                    label: self.formatter.escape(label),
                    link: link.map(str::to_string),
                })
                .collect();
            SourcesBlock {
                entries,
                collapsed: true,
            }
        });

        RenderedContent { role, body, sources }
    }

    /// Render a stored conversation message.
    pub fn render_message(&self, message: &Message) -> RenderedMessage {
        RenderedMessage {
            id: message.id,
            kind: message.kind,
            content: self.render(
                &message.content,
                message.role,
                message.sources.as_deref(),
                message.source_links.as_deref(),
            ),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Tags output so tests can tell which transform ran.
    pub(crate) struct TaggingFormatter;

    impl ContentFormatter for TaggingFormatter {
        fn escape(&self, text: &str) -> String {
            text.replace('<', "&lt;").replace('>', "&gt;")
        }

        fn markdown(&self, text: &str) -> String {
            format!("<md>{text}</md>")
        }
    }

    fn renderer() -> MessageRenderer<TaggingFormatter> {
        MessageRenderer::new(TaggingFormatter)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_user_content_is_escaped_not_markdown() {
        let rendered = renderer().render("<b>hi</b> **x**", MessageRole::User, None, None);
        assert_eq!(rendered.body, "&lt;b&gt;hi&lt;/b&gt; **x**");
        assert!(rendered.sources.is_none());
    }

    #[test]
    fn test_assistant_content_goes_through_markdown() {
        let rendered = renderer().render("**bold**", MessageRole::Assistant, None, None);
        assert_eq!(rendered.body, "<md>**bold**</md>");
    }

    #[test]
    fn test_duplicate_sources_keep_first_link() {
        let sources = strings(&["X", "Y", "X"]);
        let links = vec![
            Some("l1".to_string()),
            Some("l2".to_string()),
            Some("l3".to_string()),
        ];
        let rendered = renderer().render("a", MessageRole::Assistant, Some(sources.as_slice()), Some(links.as_slice()));
        let block = rendered.sources.unwrap();
        assert_eq!(block.count(), 2);
        assert_eq!(
            block.entries,
            vec![
                SourceEntry { label: "X".to_string(), link: Some("l1".to_string()) },
                SourceEntry { label: "Y".to_string(), link: Some("l2".to_string()) },
            ]
        );
        assert!(block.collapsed);
    }

    #[test]
    fn test_first_occurrence_without_link_stays_unlinked() {
        let sources = strings(&["X", "X"]);
        let links = vec![None, Some("late".to_string())];
        let deduped = dedupe_sources(&sources, &links);
        assert_eq!(deduped, vec![("X", None)]);
    }

    #[test]
    fn test_missing_and_empty_links_render_plain() {
        let sources = strings(&["A", "B", "C"]);
        let links = vec![Some(String::new())];
        let deduped = dedupe_sources(&sources, &links);
        assert_eq!(deduped, vec![("A", None), ("B", None), ("C", None)]);

        let rendered = renderer().render("a", MessageRole::Assistant, Some(sources.as_slice()), None);
        assert!(rendered.sources.unwrap().entries.iter().all(|e| e.link.is_none()));
    }

    #[test]
    fn test_empty_sources_render_no_block() {
        let rendered = renderer().render("a", MessageRole::Assistant, Some(&[][..]), Some(&[][..]));
        assert!(rendered.sources.is_none());
    }

    #[test]
    fn test_source_labels_are_escaped() {
        let sources = strings(&["<Lesson 1>"]);
        let rendered = renderer().render("a", MessageRole::Assistant, Some(sources.as_slice()), None);
        assert_eq!(rendered.sources.unwrap().entries[0].label, "&lt;Lesson 1&gt;");
    }

    #[test]
    fn test_render_message_keeps_identity() {
        let message = Message::assistant(
            "It covers X.",
            Some(strings(&["Lesson 2"])),
            Some(vec![Some("http://a".to_string())]),
        );
        let rendered = renderer().render_message(&message);
        assert_eq!(rendered.id, message.id);
        assert_eq!(rendered.kind, MessageKind::Standard);
        assert_eq!(rendered.content.body, "<md>It covers X.</md>");
        assert_eq!(
            rendered.content.sources.unwrap().entries[0].link.as_deref(),
            Some("http://a")
        );
    }
}

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// Render markdown as plain terminal text: emphasis is dropped, list items
/// become indented dashes and blocks end with a newline.
pub fn render_plain(text: &str) -> String {
    let mut out = String::new();

    for event in Parser::new(text) {
        match event {
            Event::Start(Tag::Item) => out.push_str("  - "),
            Event::End(TagEnd::Paragraph | TagEnd::Item | TagEnd::Heading(_)) => {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            _ => {}
        }
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_emphasis() {
        assert_eq!(
            render_plain("**Invalid title**: must not be empty!"),
            "Invalid title: must not be empty!"
        );
    }

    #[test]
    fn test_renders_list_items() {
        let text = "**Invalid estimation:**\n\n * Expected format is like _2d3h4m5s_.\n * Leaving the field empty means no estimation";
        assert_eq!(
            render_plain(text),
            "Invalid estimation:\n  - Expected format is like 2d3h4m5s.\n  - Leaving the field empty means no estimation"
        );
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        assert_eq!(render_plain("nothing special"), "nothing special");
        assert_eq!(render_plain(""), "");
    }
}

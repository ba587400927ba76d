use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};

/// Heading that marks an issue as an app creation request.
pub const HEADING: &str = "GitHub App Creation Automation";

/// Payload carried in the fenced JSON block of an app creation issue.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AppCreationRequest {
    pub code: String,
    pub manifest_name: String,
}

/// Builds the issue body for an app creation request.
///
/// The output is consumed by tooling that parses issue bodies, so the heading
/// and the fence layout must not change:
///
/// ````text
/// ### GitHub App Creation Automation
/// ```json
/// {
///   "code": "abc123",
///   "manifest_name": "my-app"
/// }
/// ```
/// ````
pub fn format_issue_body(code: &str, manifest_name: &str) -> String {
    let payload = serde_json::json!({
        "code": code,
        "manifest_name": manifest_name,
    });
    format!("### {HEADING}\n```json\n{payload:#}\n```")
}

/// Extracts the app creation request from an issue body.
///
/// Returns `None` unless the body has the app creation heading followed by a
/// `json` fenced block holding both fields.
pub fn parse_issue_body(body: &str) -> Option<AppCreationRequest> {
    let mut in_heading = false;
    let mut heading_text = String::new();
    let mut seen_heading = false;
    let mut in_json_block = false;
    let mut block = String::new();

    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                in_heading = true;
                heading_text.clear();
            }
            Event::End(TagEnd::Heading(_)) => {
                in_heading = false;
                seen_heading = heading_text.trim() == HEADING;
            }
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) if seen_heading => {
                in_json_block = info.split_whitespace().next() == Some("json");
            }
            Event::End(TagEnd::CodeBlock) if in_json_block => {
                return serde_json::from_str(&block).ok();
            }
            Event::Text(text) if in_heading => heading_text.push_str(&text),
            Event::Text(text) if in_json_block => block.push_str(&text),
            _ => {}
        }
    }

    None
}

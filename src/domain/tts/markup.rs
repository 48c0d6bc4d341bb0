/// Pause between the spoken title and the narration
pub const TITLE_PAUSE: &str = "750ms";

/// Wrap a chapter in the SSML document sent to the synthesis service:
/// the title, a short pause, then the body.
pub fn build(title: &str, body: &str) -> String {
    let title = escape(title);
    let body = escape(body);

    let mut ssml = String::with_capacity(title.len() + body.len() + 48);
    ssml.push_str("<speak>");
    ssml.push_str(&title);
    ssml.push_str("<break time=\"");
    ssml.push_str(TITLE_PAUSE);
    ssml.push_str("\"/>");
    ssml.push_str(&body);
    ssml.push_str("</speak>");
    ssml
}

/// Escape characters reserved by SSML
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

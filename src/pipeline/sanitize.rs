//! Markup stripping for submitted form fields.
//!
//! Tags and comments are removed. The contents of `script` and `style`
//! elements are removed along with their tags. A `<` that cannot start a tag
//! (for example `a < b`) is kept as text; the renderer escapes it.

use async_trait::async_trait;

use crate::pipeline::{csrf::CSRF_FIELD, Exchange, Rejection, Stage};

const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Strip markup from `input`.
pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(comment) = tail.strip_prefix("<!--") {
            rest = comment.find("-->").map_or("", |end| &comment[end + 3..]);
            continue;
        }

        if !starts_tag(&tail[1..]) {
            out.push('<');
            rest = &tail[1..];
            continue;
        }

        // An unterminated tag swallows the remainder.
        let Some(close) = tail.find('>') else {
            rest = "";
            break;
        };
        let tag = &tail[1..close];
        rest = &tail[close + 1..];

        if let Some(element) = raw_text_element(tag) {
            rest = skip_past_end_tag(rest, element);
        }
    }

    out.push_str(rest);
    out
}

fn starts_tag(s: &str) -> bool {
    s.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

fn raw_text_element(tag: &str) -> Option<&'static str> {
    let name: String = tag
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    RAW_TEXT_ELEMENTS.into_iter().find(|e| *e == name)
}

fn skip_past_end_tag<'a>(rest: &'a str, element: &str) -> &'a str {
    // ASCII lowercasing keeps byte offsets aligned with `rest`.
    let lowered = rest.to_ascii_lowercase();
    let needle = format!("</{}", element);
    lowered
        .find(&needle)
        .and_then(|start| lowered[start..].find('>').map(|end| start + end + 1))
        .map_or("", |after| &rest[after..])
}

/// Sanitizes every form field except the CSRF token.
pub struct SanitizeForm;

#[async_trait]
impl Stage for SanitizeForm {
    fn name(&self) -> &'static str {
        "sanitize"
    }

    async fn process(&self, exchange: &mut Exchange) -> Result<(), Rejection> {
        for (key, value) in exchange.form.iter_mut() {
            if key != CSRF_FIELD {
                *value = sanitize(value);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Form;
    use axum::body::Body;
    use axum::http::{HeaderMap, Method};

    #[test]
    fn plain_text_untouched() {
        assert_eq!(sanitize("buy milk"), "buy milk");
        assert_eq!(sanitize("a < b > c"), "a < b > c");
        assert_eq!(sanitize("1 <2"), "1 <2");
        assert_eq!(sanitize("☕ <3"), "☕ <3");
    }

    #[test]
    fn script_removed_with_contents() {
        assert_eq!(sanitize("<script>x</script>"), "");
        assert_eq!(sanitize("a<SCRIPT type=\"text/javascript\">alert(1)</Script >b"), "ab");
        assert_eq!(sanitize("<style>body{}</style>ok"), "ok");
        assert_eq!(sanitize("<script>never closed"), "");
    }

    #[test]
    fn tags_stripped_text_kept() {
        assert_eq!(sanitize("hello <b>world</b>"), "hello world");
        assert_eq!(sanitize("<img src=x onerror=alert(1)>"), "");
        assert_eq!(sanitize("<a href=\"javascript:x\">link</a>"), "link");
        assert_eq!(sanitize("x<!-- hidden -->y"), "xy");
        assert_eq!(sanitize("tail <b"), "tail ");
    }

    #[tokio::test]
    async fn stage_skips_csrf_field() {
        let mut ex = Exchange::new(Method::POST, HeaderMap::new(), Body::empty());
        ex.form = [("item", "<b>hi</b>"), (CSRF_FIELD, "<tok>")].into_iter().collect::<Form>();

        SanitizeForm.process(&mut ex).await.unwrap();
        assert_eq!(ex.form.get("item"), Some("hi"));
        assert_eq!(ex.form.get(CSRF_FIELD), Some("<tok>"));
    }
}

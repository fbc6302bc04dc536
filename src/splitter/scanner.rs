//! Tag scanner for the splitter.
//!
//! A small state machine over the raw document text: outside a tag, inside a
//! tag, inside a quoted attribute value. It only locates start tags and their
//! attribute text; it never builds a tree, and it never assumes
//! well-formedness beyond locatable tags.

use regex::Regex;
use std::sync::LazyLock;

/// One HTML start tag located in the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    /// Byte offset of the tag's `<`.
    pub start: usize,
    /// Byte offset just past the tag's `>`.
    pub end: usize,
    /// Concatenated `style` and `class` attribute values.
    pub attrs: String,
}

impl StartTag {
    /// The tag's full markup, `<` through `>` inclusive.
    pub fn markup<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

static HEAD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<head.*?</head>").expect("valid head pattern"));

/// Extract the document's `<head>...</head>` markup, if present.
pub fn extract_head(source: &str) -> Option<String> {
    HEAD_PATTERN
        .find(source)
        .map(|found| found.as_str().to_string())
}

/// Locate every start tag in `source`, in document order.
///
/// End tags, comments, declarations and processing instructions are skipped,
/// so commented-out markup is never reported. An unterminated construct ends
/// the scan; the remaining text is ordinary content.
pub fn start_tags(source: &str) -> Vec<StartTag> {
    let bytes = source.as_bytes();
    let mut tags = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }

        // Comments are opaque; skip to their terminator.
        if bytes[i..].starts_with(b"<!--") {
            match find_from(bytes, i + 4, b"-->") {
                Some(end) => {
                    i = end + 3;
                    continue;
                }
                None => break,
            }
        }

        let Some(&next) = bytes.get(i + 1) else {
            break;
        };

        if next.is_ascii_alphabetic() {
            let Some(gt) = find_tag_end(bytes, i) else {
                break;
            };
            let markup = &source[i..=gt];
            tags.push(StartTag {
                start: i,
                end: gt + 1,
                attrs: break_attr_text(markup),
            });
            i = gt + 1;
        } else if next == b'/' || next == b'!' || next == b'?' {
            // End tag, declaration, or processing instruction.
            match find_tag_end(bytes, i) {
                Some(gt) => i = gt + 1,
                None => break,
            }
        } else {
            // A bare '<' in text.
            i += 1;
        }
    }

    tags
}

/// Find the `>` that closes the tag whose `<` is at `i`.
///
/// Quote-aware: a `>` inside a quoted attribute value does not terminate the
/// tag.
fn find_tag_end(bytes: &[u8], mut i: usize) -> Option<usize> {
    let n = bytes.len();
    i += 1;
    let mut quote: u8 = 0;
    while i < n {
        let b = bytes[i];
        if quote != 0 {
            if b == quote {
                quote = 0;
            }
        } else if b == b'"' || b == b'\'' {
            quote = b;
        } else if b == b'>' {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Collect the `style` and `class` attribute values of a start tag, joined
/// with a single space.
///
/// The scanner walks `[name] ( '=' [value] )?` pairs; values may be quoted
/// with either quote or unquoted. Attribute names are matched
/// case-insensitively.
fn break_attr_text(markup: &str) -> String {
    let bytes = markup.as_bytes();
    let len = bytes.len();
    let mut out = String::new();
    let mut i = 1usize;

    // Skip the tag name.
    while i < len && is_name_byte(bytes[i]) {
        i += 1;
    }

    while i < len && bytes[i] != b'>' {
        while i < len && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        if i >= len || bytes[i] == b'>' {
            break;
        }

        if !is_name_byte(bytes[i]) {
            // Not a valid name start; advance to avoid an infinite loop.
            i += 1;
            continue;
        }
        let name_start = i;
        while i < len && is_name_byte(bytes[i]) {
            i += 1;
        }
        let name = &markup[name_start..i];

        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let mut value: Option<&str> = None;
        if i < len && bytes[i] == b'=' {
            i += 1;
            while i < len && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < len && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let quote = bytes[i];
                i += 1;
                let value_start = i;
                while i < len && bytes[i] != quote {
                    i += 1;
                }
                value = Some(&markup[value_start..i]);
                if i < len {
                    i += 1;
                }
            } else {
                let value_start = i;
                while i < len && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    i += 1;
                }
                value = Some(&markup[value_start..i]);
            }
        }

        if name.eq_ignore_ascii_case("style") || name.eq_ignore_ascii_case("class") {
            if let Some(value) = value {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(value);
            }
        }
    }

    out
}

#[inline]
fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

fn find_from(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from > bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| from + pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locates_start_tags_in_order() {
        let source = "<p>A</p><div>B</div>";
        let tags = start_tags(source);

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].markup(source), "<p>");
        assert_eq!(tags[1].markup(source), "<div>");
        assert_eq!(tags[1].start, 8);
        assert_eq!(tags[1].end, 13);
    }

    #[test]
    fn test_end_tags_skipped() {
        let tags = start_tags("</div></p>");
        assert!(tags.is_empty());
    }

    #[test]
    fn test_declarations_and_pis_skipped() {
        let tags = start_tags("<!DOCTYPE html><?xml version=\"1.0\"?><html>");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].start, 36);
    }

    #[test]
    fn test_comments_are_opaque() {
        let source = "<!-- <div style=\"page-break-before: always\"> --><p>A</p>";
        let tags = start_tags(source);

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].markup(source), "<p>");
    }

    #[test]
    fn test_bare_lt_in_text() {
        let tags = start_tags("a < b <em>c</em>");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].start, 6);
    }

    #[test]
    fn test_quoted_gt_does_not_end_tag() {
        let source = "<div title=\"a > b\" style=\"color: red\">x</div>";
        let tags = start_tags(source);

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].end, 38);
        assert_eq!(tags[0].attrs, "color: red");
    }

    #[test]
    fn test_unterminated_tag_ends_scan() {
        let tags = start_tags("<p>A</p><div style=\"page-break-before: always\" ");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].start, 0);
    }

    #[test]
    fn test_style_and_class_concatenated() {
        let tags = start_tags("<div class=\"page\" style=\"margin: 0\">");
        assert_eq!(tags[0].attrs, "page margin: 0");
    }

    #[test]
    fn test_attr_names_case_insensitive() {
        let tags = start_tags("<div STYLE='page-break-before: always'>");
        assert_eq!(tags[0].attrs, "page-break-before: always");
    }

    #[test]
    fn test_unquoted_attr_value() {
        let tags = start_tags("<div class=page data-x=1>");
        assert_eq!(tags[0].attrs, "page");
    }

    #[test]
    fn test_other_attrs_ignored() {
        let tags = start_tags("<div title=\"page-break-before: always\">");
        assert_eq!(tags[0].attrs, "");
    }

    #[test]
    fn test_multiline_style_attr() {
        let tags = start_tags("<div\n    style=\"page-break-before:\n        always\"\n>");
        assert_eq!(tags.len(), 1);
        assert!(tags[0].attrs.contains("page-break-before:"));
    }

    #[test]
    fn test_extract_head() {
        let source = "<html><head><title>T</title></head><body></body></html>";
        assert_eq!(
            extract_head(source).as_deref(),
            Some("<head><title>T</title></head>")
        );
    }

    #[test]
    fn test_extract_head_case_insensitive_multiline() {
        let source = "<HEAD>\n<meta charset=\"utf-8\">\n</HEAD><body/>";
        assert_eq!(
            extract_head(source).as_deref(),
            Some("<HEAD>\n<meta charset=\"utf-8\">\n</HEAD>")
        );
    }

    #[test]
    fn test_extract_head_absent() {
        assert_eq!(extract_head("<body>no head</body>"), None);
    }
}

// src/engine/sniff.rs
//
// Format sniffing: decide whether a byte stream is ours to decode.
// Heuristic only - no XML parsing. An XML document that mentions `<svg`
// inside the probe window is a false positive we accept.

pub const MIME_TYPE_SVG: &str = "image/svg+xml";
pub const MIME_TYPE_XML: &str = "text/xml";

/// How far into the stream the `<svg` marker may appear.
pub const SVG_DETECT_BUFFER_SIZE: usize = 1024;

const LEFT_ANGLE_BRACKET: u8 = b'<';
const SVG_TAG: &[u8] = b"<svg";

/// True when the MIME hint names SVG/XML, or the head bytes look like SVG.
///
/// `head` may be the whole stream or just its first bytes; only the first
/// [`SVG_DETECT_BUFFER_SIZE`] bytes are probed.
pub fn is_svg(mime_type: Option<&str>, head: &[u8]) -> bool {
    if mime_type.is_some_and(is_svg_mime) {
        return true;
    }
    probe_content(head)
}

fn is_svg_mime(mime_type: &str) -> bool {
    // Ignore parameters such as "; charset=utf-8"
    let essence = mime_type.split(';').next().unwrap_or_default().trim();
    essence.eq_ignore_ascii_case(MIME_TYPE_SVG) || essence.eq_ignore_ascii_case(MIME_TYPE_XML)
}

fn probe_content(head: &[u8]) -> bool {
    if head.first() != Some(&LEFT_ANGLE_BRACKET) {
        return false;
    }
    let window = &head[..head.len().min(SVG_DETECT_BUFFER_SIZE)];
    window.windows(SVG_TAG.len()).any(|w| w == SVG_TAG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_mime_wins_regardless_of_body() {
        assert!(is_svg(Some("image/svg+xml"), b"\x89PNG"));
        assert!(is_svg(Some("text/xml"), b""));
        assert!(is_svg(Some("Image/SVG+XML; charset=utf-8"), b""));
    }

    #[test]
    fn png_mime_without_svg_tag_is_rejected() {
        assert!(!is_svg(Some("image/png"), b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn other_mime_still_probes_content() {
        assert!(is_svg(Some("application/octet-stream"), b"<svg/>"));
    }

    #[test]
    fn content_starting_with_svg_tag() {
        assert!(is_svg(None, br#"<svg width="10" height="10"></svg>"#));
    }

    #[test]
    fn xml_prolog_before_svg_tag() {
        let body = br#"<?xml version="1.0"?><!-- icon --><svg xmlns="http://www.w3.org/2000/svg"/>"#;
        assert!(is_svg(None, body));
    }

    #[test]
    fn must_start_with_angle_bracket() {
        assert!(!is_svg(None, b" <svg/>"));
        assert!(!is_svg(None, b""));
    }

    #[test]
    fn svg_tag_outside_window_is_rejected() {
        let mut body = vec![b'<'];
        body.extend(std::iter::repeat(b'a').take(1999));
        body.extend_from_slice(b"<svg/>");
        assert!(!is_svg(None, &body));
    }

    #[test]
    fn svg_tag_ending_exactly_at_window_edge() {
        let mut body = vec![b'<'];
        body.extend(std::iter::repeat(b' ').take(SVG_DETECT_BUFFER_SIZE - 1 - SVG_TAG.len()));
        body.extend_from_slice(SVG_TAG);
        assert_eq!(body.len(), SVG_DETECT_BUFFER_SIZE);
        assert!(is_svg(None, &body));

        body.insert(1, b' ');
        assert!(!is_svg(None, &body));
    }

    #[test]
    fn non_svg_xml_with_svg_marker_is_accepted() {
        assert!(is_svg(None, b"<html><body><svg></svg></body></html>"));
    }
}

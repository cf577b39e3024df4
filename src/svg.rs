//! Just enough SVG markup scanning to minify safely and to recognize an SVG
//! root behind an XML prolog.

use crate::error::{OptimError, Result};
use crate::formats::ImageKind;

/// Elements whose whitespace is rendered as text
const TEXT_ELEMENTS: &[&str] = &["text", "tspan", "textPath"];
/// Elements whose content is copied through unparsed
const RAW_ELEMENTS: &[&str] = &["style", "script"];

fn malformed(reason: &str) -> OptimError {
    OptimError::codec(ImageKind::Svg, reason)
}

/// Remove comments, whitespace-only text between structural tags, and
/// redundant whitespace inside tags.
///
/// Text content, attribute values, and everything inside `<text>`,
/// `<tspan>`, `<textPath>`, `<style>`, `<script>` or an
/// `xml:space="preserve"` element are left byte for byte.
pub fn minify(data: &[u8]) -> Result<Vec<u8>> {
    let text = std::str::from_utf8(data)
        .map_err(|e| OptimError::codec(ImageKind::Svg, format!("not valid UTF-8: {}", e)))?;

    let mut output = String::with_capacity(text.len());
    // One entry per open element: whether its whitespace is significant
    let mut open: Vec<bool> = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let preserving = open.last().copied().unwrap_or(false);
        let Some(start) = rest.find('<') else {
            push_text(&mut output, rest, preserving);
            break;
        };
        push_text(&mut output, &rest[..start], preserving);
        rest = &rest[start..];

        if rest.starts_with("<!--") {
            let end = rest
                .find("-->")
                .ok_or_else(|| malformed("unterminated comment"))?;
            rest = &rest[end + 3..];
        } else if rest.starts_with("<![CDATA[") {
            let end = rest
                .find("]]>")
                .ok_or_else(|| malformed("unterminated CDATA section"))?;
            output.push_str(&rest[..end + 3]);
            rest = &rest[end + 3..];
        } else if rest.starts_with("<?") || rest.starts_with("<!") {
            let end = declaration_end(rest).ok_or_else(|| malformed("unterminated declaration"))?;
            output.push_str(&rest[..end]);
            rest = &rest[end..];
        } else {
            let end = tag_end(rest).ok_or_else(|| malformed("unterminated tag"))?;
            let tag = &rest[..end];
            push_tag(&mut output, tag);
            rest = &rest[end..];

            if tag.starts_with("</") {
                open.pop();
            } else if !tag.ends_with("/>") {
                let name = tag_name(tag);
                let local = name.rsplit(':').next().unwrap_or(name);
                open.push(
                    preserving
                        || TEXT_ELEMENTS.contains(&local)
                        || RAW_ELEMENTS.contains(&local)
                        || declares_preserve(tag),
                );

                if RAW_ELEMENTS.contains(&local) {
                    let close = format!("</{}", name);
                    let end = rest
                        .find(&close)
                        .ok_or_else(|| malformed("unterminated raw text element"))?;
                    output.push_str(&rest[..end]);
                    rest = &rest[end..];
                }
            }
        }
    }

    Ok(output.into_bytes())
}

/// Whether `text` starts (after BOM, XML declaration, comments, processing
/// instructions and DOCTYPE) with an `<svg` root element
pub fn has_svg_root(text: &str) -> bool {
    let mut rest = text.trim_start_matches('\u{feff}');
    loop {
        rest = rest.trim_start();
        if rest.starts_with("<!--") {
            match rest.find("-->") {
                Some(end) => rest = &rest[end + 3..],
                None => return false,
            }
        } else if rest.starts_with("<?") || rest.starts_with("<!") {
            match declaration_end(rest) {
                Some(end) => rest = &rest[end..],
                None => return false,
            }
        } else {
            return rest.starts_with("<svg")
                && rest[4..]
                    .chars()
                    .next()
                    .map_or(false, |c| c.is_whitespace() || c == '>' || c == '/');
        }
    }
}

fn push_text(output: &mut String, text: &str, preserving: bool) {
    if preserving || !text.trim().is_empty() {
        output.push_str(text);
    }
}

/// Copy a tag, collapsing whitespace runs outside quoted values to one space
/// and dropping them before the closing `>` or `/>`.
fn push_tag(output: &mut String, tag: &str) {
    let mut quote = None;
    let mut pending_space = false;
    for c in tag.chars() {
        match quote {
            Some(q) => {
                output.push(c);
                if c == q {
                    quote = None;
                }
            }
            None if c.is_whitespace() => pending_space = true,
            None => {
                if pending_space && c != '>' && c != '/' {
                    output.push(' ');
                }
                pending_space = false;
                if c == '"' || c == '\'' {
                    quote = Some(c);
                }
                output.push(c);
            }
        }
    }
}

/// Byte offset just past the `>` closing the tag at the start of `s`
fn tag_end(s: &str) -> Option<usize> {
    let mut quote = None;
    for (i, c) in s.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => return Some(i + 1),
            None => {}
        }
    }
    None
}

/// End of a `<?...?>` instruction or a `<!...>` declaration, including a
/// DOCTYPE with an internal `[...]` subset
fn declaration_end(s: &str) -> Option<usize> {
    if s.starts_with("<?") {
        return s.find("?>").map(|end| end + 2);
    }

    let mut quote = None;
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '[' => depth += 1,
                ']' => depth = depth.saturating_sub(1),
                '>' if depth == 0 => return Some(i + 1),
                _ => {}
            },
        }
    }
    None
}

fn tag_name(tag: &str) -> &str {
    let name = tag.trim_start_matches('<');
    let end = name
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(name.len());
    &name[..end]
}

fn declares_preserve(tag: &str) -> bool {
    tag.contains("xml:space=\"preserve\"") || tag.contains("xml:space='preserve'")
}

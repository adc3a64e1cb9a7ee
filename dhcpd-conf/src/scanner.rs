use std::ops::Range;

use crate::record::{normalize_mac, Reservation};

/// A `host <name> { ... }` declaration located in configuration text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostBlock {
    /// Byte range of the block: start of the `host` line through the line
    /// terminator after the closing brace.
    pub span: Range<usize>,
    /// Host name exactly as written in the header.
    pub fqdn: String,
    /// Leading whitespace of the `host` line.
    pub indent: String,
    /// Raw `hardware ethernet` value.
    pub mac: Option<String>,
    /// Raw `fixed-address` value.
    pub ip: Option<String>,
    /// Any other statements, comments or nested blocks, verbatim.
    pub extras: Vec<String>,
}

impl HostBlock {
    /// Lowercased MAC, canonicalized when it parses.
    pub fn normalized_mac(&self) -> Option<String> {
        self.mac
            .as_deref()
            .map(|raw| normalize_mac(raw).unwrap_or_else(|| raw.to_ascii_lowercase()))
    }

    /// The block as a reservation, or `None` when either statement is missing.
    pub fn reservation(&self) -> Option<Reservation> {
        Some(Reservation {
            fqdn: self.fqdn.clone(),
            mac: self.normalized_mac()?,
            ip: self.ip.clone()?,
        })
    }
}

/// Scan `text` once and return every host block in document order.
///
/// Blocks are recognized wherever a line starts with `host`, including inside
/// `subnet` or `group` scopes, and right after a block that closes mid-line.
/// A header without a matching closing brace is left alone. Returned spans
/// never overlap.
pub fn scan_blocks(text: &str) -> Vec<HostBlock> {
    let mut blocks = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        match parse_block_at(text, pos) {
            Some(block) => {
                // A block ending mid-line leaves `pos` on that line, so a
                // following `host` on the same line is tried next.
                pos = block.span.end;
                blocks.push(block);
            }
            None => pos = next_line_start(text, pos),
        }
    }

    blocks
}

fn parse_block_at(text: &str, line_start: usize) -> Option<HostBlock> {
    let bytes = text.as_bytes();
    let mut pos = line_start;
    while pos < bytes.len() && matches!(bytes[pos], b' ' | b'\t') {
        pos += 1;
    }
    let indent = text[line_start..pos].to_string();

    let rest = &text[pos..];
    if !rest.starts_with("host") {
        return None;
    }
    pos += "host".len();
    let ws_start = pos;
    pos = skip_whitespace(bytes, pos);
    if pos == ws_start {
        return None;
    }

    let name_start = pos;
    while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() && !matches!(bytes[pos], b'{' | b';')
    {
        pos += 1;
    }
    if pos == name_start {
        return None;
    }
    let fqdn = text[name_start..pos].to_string();

    pos = skip_whitespace(bytes, pos);
    if bytes.get(pos) != Some(&b'{') {
        return None;
    }
    let body_start = pos + 1;
    let close = find_closing_brace(bytes, body_start)?;

    let mut end = close + 1;
    while end < bytes.len() && matches!(bytes[end], b' ' | b'\t') {
        end += 1;
    }
    end = if text[end..].starts_with("\r\n") {
        end + 2
    } else if text[end..].starts_with('\n') {
        end + 1
    } else if end == bytes.len() {
        end
    } else {
        close + 1
    };

    let mut block = HostBlock {
        span: line_start..end,
        fqdn,
        indent,
        mac: None,
        ip: None,
        extras: Vec::new(),
    };
    for statement in split_statements(&text[body_start..close]) {
        classify(&mut block, statement);
    }
    Some(block)
}

/// Index of the `}` that closes the scope opened just before `from`.
fn find_closing_brace(bytes: &[u8], from: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut pos = from;
    while pos < bytes.len() {
        match bytes[pos] {
            b'#' => pos = skip_comment(bytes, pos),
            b'"' => pos = skip_quoted(bytes, pos),
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(pos);
                }
            }
            _ => {}
        }
        pos += 1;
    }
    None
}

#[derive(Debug, PartialEq, Eq)]
enum Statement<'a> {
    /// `;`-terminated statement without its terminator.
    Simple(&'a str),
    /// Comment, nested block or trailing text kept as written.
    Verbatim(&'a str),
}

fn split_statements(body: &str) -> Vec<Statement<'_>> {
    let bytes = body.as_bytes();
    let mut out = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'"' => pos = skip_quoted(bytes, pos),
            b'#' if depth == 0 => {
                push_trimmed(&mut out, &body[start..pos], Statement::Verbatim);
                let end = skip_comment(bytes, pos);
                push_trimmed(&mut out, &body[pos..end], Statement::Verbatim);
                start = end;
                pos = end;
            }
            b'#' => pos = skip_comment(bytes, pos),
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    push_trimmed(&mut out, &body[start..=pos], Statement::Verbatim);
                    start = pos + 1;
                }
            }
            b';' if depth == 0 => {
                push_trimmed(&mut out, &body[start..pos], Statement::Simple);
                start = pos + 1;
            }
            _ => {}
        }
        pos += 1;
    }
    push_trimmed(&mut out, &body[start..], Statement::Verbatim);
    out
}

fn push_trimmed<'a>(
    out: &mut Vec<Statement<'a>>,
    raw: &'a str,
    kind: fn(&'a str) -> Statement<'a>,
) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        out.push(kind(trimmed));
    }
}

fn classify(block: &mut HostBlock, statement: Statement<'_>) {
    let raw = match statement {
        Statement::Simple(raw) => raw,
        Statement::Verbatim(raw) => {
            block.extras.push(raw.to_string());
            return;
        }
    };

    let tokens: Vec<&str> = raw.split_whitespace().collect();
    match tokens.as_slice() {
        [kw, kind, mac]
            if block.mac.is_none()
                && kw.eq_ignore_ascii_case("hardware")
                && kind.eq_ignore_ascii_case("ethernet") =>
        {
            block.mac = Some((*mac).to_string());
        }
        [kw, ip] if block.ip.is_none() && kw.eq_ignore_ascii_case("fixed-address") => {
            block.ip = Some((*ip).to_string());
        }
        _ => block.extras.push(format!("{raw};")),
    }
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Position of the newline ending the comment at `pos` (or end of input).
fn skip_comment(bytes: &[u8], pos: usize) -> usize {
    bytes[pos..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |offset| pos + offset)
}

/// Position of the closing quote for the string opened at `pos`.
fn skip_quoted(bytes: &[u8], pos: usize) -> usize {
    let mut cursor = pos + 1;
    while cursor < bytes.len() {
        match bytes[cursor] {
            b'\\' => cursor += 1,
            b'"' => return cursor,
            _ => {}
        }
        cursor += 1;
    }
    bytes.len()
}

fn next_line_start(text: &str, from: usize) -> usize {
    text[from..]
        .find('\n')
        .map_or(text.len(), |offset| from + offset + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_line_block_span_covers_header_through_newline() {
        let text = "option domain-name \"x\";\n\nhost a.example.com {\n  hardware ethernet AA:BB:CC:DD:EE:FF;\n  fixed-address 10.0.0.1;\n}\nhost b {\n}\n";
        let blocks = scan_blocks(text);
        assert_eq!(blocks.len(), 2);

        let first = &blocks[0];
        assert_eq!(first.fqdn, "a.example.com");
        assert!(text[first.span.clone()].starts_with("host a.example.com {"));
        assert!(text[first.span.clone()].ends_with("}\n"));
        assert_eq!(first.normalized_mac().as_deref(), Some("aa:bb:cc:dd:ee:ff"));
        assert_eq!(first.ip.as_deref(), Some("10.0.0.1"));
        assert!(first.extras.is_empty());

        assert_eq!(blocks[1].reservation(), None);
    }

    #[test]
    fn single_line_block_with_reversed_statements() {
        let text = "host a { fixed-address 10.0.0.1; hardware ethernet aa:bb:cc:dd:ee:ff; }";
        let blocks = scan_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].span, 0..text.len());
        assert_eq!(blocks[0].ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(blocks[0].mac.as_deref(), Some("aa:bb:cc:dd:ee:ff"));
    }

    #[test]
    fn extra_directives_and_comments_are_kept() {
        let text = "host a {\n  # lab rack 3\n  hardware ethernet aa:bb:cc:dd:ee:ff;\n  option host-name \"a\";\n  fixed-address 10.0.0.1;\n}\n";
        let blocks = scan_blocks(text);
        assert_eq!(
            blocks[0].extras,
            vec!["# lab rack 3".to_string(), "option host-name \"a\";".to_string()]
        );
    }

    #[test]
    fn braces_inside_comments_and_strings_do_not_close_block() {
        let text = "host a {\n  # } not the end\n  option x \"}\";\n  fixed-address 10.0.0.1;\n}\nrest\n";
        let blocks = scan_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(&text[blocks[0].span.end..], "rest\n");
    }

    #[test]
    fn nested_hosts_inside_subnet_are_found() {
        let text = "subnet 10.0.0.0 netmask 255.255.255.0 {\n  host a {\n    hardware ethernet aa:bb:cc:dd:ee:ff;\n    fixed-address 10.0.0.1;\n  }\n}\n";
        let blocks = scan_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].indent, "  ");
        assert_eq!(&text[blocks[0].span.end..], "}\n");
    }

    #[test]
    fn unterminated_and_lookalike_headers_are_ignored() {
        assert!(scan_blocks("host a {\n  fixed-address 10.0.0.1;\n").is_empty());
        assert!(scan_blocks("hostname a {\n}\n").is_empty());
        assert!(scan_blocks("host a;\n").is_empty());
        assert!(scan_blocks("  # host a {\n").is_empty());
    }

    #[test]
    fn crlf_terminator_is_part_of_span() {
        let text = "host a {\r\n  fixed-address 10.0.0.1;\r\n}\r\nnext\r\n";
        let blocks = scan_blocks(text);
        assert_eq!(&text[blocks[0].span.end..], "next\r\n");
    }

    #[test]
    fn second_block_on_the_same_line_is_found() {
        let text = "host a { hardware ethernet aa:bb:cc:dd:ee:01; fixed-address 10.0.0.1; } host b { hardware ethernet aa:bb:cc:dd:ee:02; fixed-address 10.0.0.2; }\n";
        let blocks = scan_blocks(text);
        let names: Vec<&str> = blocks.iter().map(|b| b.fqdn.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(blocks[0].span.end, blocks[1].span.start);
        assert_eq!(blocks[1].span.end, text.len());
        assert_eq!(blocks[1].normalized_mac().as_deref(), Some("aa:bb:cc:dd:ee:02"));
    }
}

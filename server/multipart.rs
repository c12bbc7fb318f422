//! Byte-level `multipart/form-data` parsing, just enough for a single
//! file upload. Parts are borrowed views into the request body; nothing
//! is copied until the caller decides what to keep.

/// Extracts the boundary token from a Content-Type header value like
/// `multipart/form-data; boundary=----WebKitFormBoundaryXXX`.
pub fn extract_boundary(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .map(|s| s.trim())
        .find(|s| s.starts_with("boundary="))
        .map(|s| s["boundary=".len()..].trim_matches('"').to_owned())
}

/// Returns the raw bytes of the first part that carries a filename, i.e.
/// the uploaded file. `None` when the body holds no file part.
pub fn first_file<'a>(body: &'a [u8], boundary: &str) -> Option<&'a [u8]> {
    parts(body, boundary)
        .into_iter()
        .find(|part| part.is_file())
        .map(|part| part.data)
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

/// One part of a multipart body: its header block (lossily decoded, headers
/// are ASCII in practice) and its payload bytes with the trailing CRLF
/// already stripped.
struct Part<'a> {
    headers: String,
    data: &'a [u8],
}

impl Part<'_> {
    fn is_file(&self) -> bool {
        self.headers.to_ascii_lowercase().contains("filename")
    }
}

fn parts<'a>(body: &'a [u8], boundary: &str) -> Vec<Part<'a>> {
    let delimiter = format!("--{boundary}");
    split_on(body, delimiter.as_bytes())
        .into_iter()
        .filter_map(|piece| {
            let sep_pos = find_subsequence(piece, b"\r\n\r\n")?;
            let raw = &piece[sep_pos + 4..];
            Some(Part {
                headers: String::from_utf8_lossy(&piece[..sep_pos]).into_owned(),
                data: raw.strip_suffix(b"\r\n").unwrap_or(raw),
            })
        })
        .collect()
}

/// Index of the first occurrence of `needle` in `haystack`.
fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Splits `haystack` on every occurrence of `needle`, returning the pieces
/// between occurrences (excluding the needle itself).
fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut result = Vec::new();
    let mut start = 0;
    while start <= haystack.len() {
        if let Some(pos) = find_subsequence(&haystack[start..], needle) {
            result.push(&haystack[start..start + pos]);
            start += pos + needle.len();
        } else {
            result.push(&haystack[start..]);
            break;
        }
    }
    result
}

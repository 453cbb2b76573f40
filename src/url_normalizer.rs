use url::Url;

use crate::utils::error::Result;

/// Characters left as-is in a path besides the unreserved set.
const PATH_SEPARATORS: &[char] = &['/'];

/// Characters left as-is in a query besides the unreserved set.
const QUERY_SEPARATORS: &[char] = &['&', '='];

/// Resolves `href` against `base` and percent-encodes the path and query so
/// the result is plain ASCII.
///
/// Well-formed `%XX` escapes already present are kept as they are.
pub fn normalize(base: &Url, href: &str) -> Result<Url> {
    let mut url = base.join(href)?;

    let path = encode_component(url.path(), PATH_SEPARATORS);
    url.set_path(&path);

    if let Some(query) = url.query() {
        let query = encode_component(query, QUERY_SEPARATORS);
        url.set_query(Some(&query));
    }

    Ok(url)
}

// urlencoding keeps only `A-Z a-z 0-9 - . _ ~`, so separators and existing
// escapes are copied through between encoded runs
fn encode_component(raw: &str, separators: &[char]) -> String {
    let mut encoded = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find(|c: char| c == '%' || separators.contains(&c)) {
        let (plain, tail) = rest.split_at(pos);
        encoded.push_str(&urlencoding::encode(plain));

        let consumed = if !tail.starts_with('%') {
            encoded.push_str(&tail[..1]);
            1
        } else if is_escape(tail) {
            encoded.push_str(&tail[..3]);
            3
        } else {
            encoded.push_str("%25");
            1
        };
        rest = &tail[consumed..];
    }

    encoded.push_str(&urlencoding::encode(rest));
    encoded
}

fn is_escape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 3
        && bytes[0] == b'%'
        && bytes[1].is_ascii_hexdigit()
        && bytes[2].is_ascii_hexdigit()
}

//! Filename extraction from `Content-Disposition` headers.
//!
//! The header follows a small structured grammar — `disposition-type
//! *( ";" parameter )` — so it is parsed as such instead of spliced as a
//! string: quoted strings may contain `;` and `\`-escaped quotes, and the
//! `filename*` extended parameter (RFC 8187 `charset'lang'pct-encoded`)
//! takes precedence over plain `filename` when both are present.

/// Extract the save filename from a header value, or `None` when the header
/// carries no usable name. Plain `filename` values are percent-decoded after
/// quote stripping; path components are dropped before the name touches disk.
pub fn filename(header: &str) -> Option<String> {
  let params = parse_params(header);

  if let Some(value) = params.iter().find(|(name, _)| name == "filename*").map(|(_, v)| v)
    && let Some(decoded) = decode_ext_value(value)
    && let Some(name) = sanitize(&decoded)
  {
    return Some(name);
  }

  let value = params.iter().find(|(name, _)| name == "filename").map(|(_, v)| v)?;
  sanitize(&percent_decode(value))
}

/// Split the header into lowercased `(name, value)` parameters, skipping the
/// disposition type. A `;` inside a quoted string does not terminate a
/// parameter; quoting and escapes are resolved here.
fn parse_params(header: &str) -> Vec<(String, String)> {
  let mut segments = Vec::new();
  let mut current = String::new();
  let mut in_quotes = false;
  let mut escaped = false;
  for c in header.chars() {
    if escaped {
      current.push(c);
      escaped = false;
      continue;
    }
    match c {
      '\\' if in_quotes => {
        current.push(c);
        escaped = true;
      }
      '"' => {
        in_quotes = !in_quotes;
        current.push(c);
      }
      ';' if !in_quotes => segments.push(std::mem::take(&mut current)),
      _ => current.push(c),
    }
  }
  segments.push(current);

  // The first segment is the disposition type itself.
  segments
    .into_iter()
    .skip(1)
    .filter_map(|segment| {
      let (name, value) = segment.split_once('=')?;
      Some((name.trim().to_ascii_lowercase(), unquote(value.trim())))
    })
    .collect()
}

/// Strip surrounding quotes and resolve `\`-escapes; tokens pass through.
fn unquote(value: &str) -> String {
  let Some(inner) = value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) else {
    return value.to_string();
  };
  let mut out = String::with_capacity(inner.len());
  let mut escaped = false;
  for c in inner.chars() {
    if escaped {
      out.push(c);
      escaped = false;
    } else if c == '\\' {
      escaped = true;
    } else {
      out.push(c);
    }
  }
  out
}

/// Decode an RFC 8187 ext-value: `charset'lang'pct-encoded`.
/// RFC 8187 only requires UTF-8; other charsets fall back to plain `filename`.
fn decode_ext_value(value: &str) -> Option<String> {
  let mut parts = value.splitn(3, '\'');
  let charset = parts.next()?;
  let _lang = parts.next()?;
  let encoded = parts.next()?;
  if !charset.eq_ignore_ascii_case("utf-8") {
    return None;
  }
  Some(percent_decode(encoded))
}

fn percent_decode(s: &str) -> String {
  let bytes = s.as_bytes();
  let mut out = Vec::with_capacity(bytes.len());
  let mut i = 0;
  while i < bytes.len() {
    if bytes[i] == b'%'
      && i + 2 < bytes.len()
      && let (Some(hi), Some(lo)) = (hex(bytes[i + 1]), hex(bytes[i + 2]))
    {
      out.push(hi << 4 | lo);
      i += 3;
    } else {
      out.push(bytes[i]);
      i += 1;
    }
  }
  String::from_utf8_lossy(&out).into_owned()
}

fn hex(b: u8) -> Option<u8> {
  match b {
    b'0'..=b'9' => Some(b - b'0'),
    b'a'..=b'f' => Some(b - b'a' + 10),
    b'A'..=b'F' => Some(b - b'A' + 10),
    _ => None,
  }
}

/// Drop path components and reject names that would escape the save directory.
fn sanitize(name: &str) -> Option<String> {
  let base = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
  if base.is_empty() || base == "." || base == ".." {
    return None;
  }
  Some(base.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quoted_filename() {
    assert_eq!(filename(r#"attachment; filename="clip.mp4""#), Some("clip.mp4".to_string()));
  }

  #[test]
  fn unquoted_token_filename() {
    assert_eq!(filename("inline; filename=video.mp4"), Some("video.mp4".to_string()));
  }

  #[test]
  fn semicolon_inside_quotes() {
    assert_eq!(filename(r#"attachment; filename="a;b.mp4""#), Some("a;b.mp4".to_string()));
  }

  #[test]
  fn escaped_quotes_resolved() {
    assert_eq!(filename(r#"attachment; filename="she said \"hi\".mp4""#), Some(r#"she said "hi".mp4"#.to_string()));
  }

  #[test]
  fn plain_filename_is_percent_decoded() {
    assert_eq!(filename(r#"attachment; filename="My%20Video.mp4""#), Some("My Video.mp4".to_string()));
  }

  #[test]
  fn extended_filename_takes_precedence() {
    let header = r#"attachment; filename="fallback.mp4"; filename*=UTF-8''na%C3%AFve%20clip.mp4"#;
    assert_eq!(filename(header), Some("naïve clip.mp4".to_string()));
  }

  #[test]
  fn extended_filename_unknown_charset_falls_back() {
    let header = r#"attachment; filename*=ISO-8859-1'en'a%E9.mp4; filename="plain.mp4""#;
    assert_eq!(filename(header), Some("plain.mp4".to_string()));
  }

  #[test]
  fn parameter_names_are_case_insensitive() {
    assert_eq!(filename(r#"attachment; FileName="x.mp4""#), Some("x.mp4".to_string()));
  }

  #[test]
  fn no_filename_parameter() {
    assert_eq!(filename("attachment"), None);
    assert_eq!(filename("attachment; size=42"), None);
  }

  #[test]
  fn path_components_are_dropped() {
    assert_eq!(filename(r#"attachment; filename="../../etc/passwd""#), Some("passwd".to_string()));
    // Unquoted, so the backslashes are separators rather than escapes.
    assert_eq!(filename(r"attachment; filename=C:\evil\clip.mp4"), Some("clip.mp4".to_string()));
  }

  #[test]
  fn dot_names_are_rejected() {
    assert_eq!(filename(r#"attachment; filename="..""#), None);
    assert_eq!(filename(r#"attachment; filename="""#), None);
  }

  #[test]
  fn stray_percent_passes_through() {
    assert_eq!(filename(r#"attachment; filename="100%.mp4""#), Some("100%.mp4".to_string()));
  }
}

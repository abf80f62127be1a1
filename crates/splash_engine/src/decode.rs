use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static str,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("could not decode body as {encoding}")]
pub struct DecodeFailure {
    pub encoding: String,
}

/// Decode a fetched body into UTF-8 text.
///
/// Charset resolution order: BOM, `Content-Type` charset parameter, chardetng
/// guess over the raw bytes.
pub fn decode_text(bytes: &[u8], content_type: Option<&str>) -> Result<DecodedText, DecodeFailure> {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| {
            content_type
                .and_then(charset_label)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeFailure {
            encoding: encoding.name().to_string(),
        });
    }
    Ok(DecodedText {
        text: text.into_owned(),
        encoding: encoding.name(),
    })
}

fn charset_label(content_type: &str) -> Option<&str> {
    content_type.split(';').find_map(|part| {
        let part = part.trim();
        let prefix = part.get(..8)?;
        if prefix.eq_ignore_ascii_case("charset=") {
            Some(part[8..].trim_matches(|c| c == ' ' || c == '"' || c == '\''))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_without_hints_decodes() {
        let decoded = decode_text("<html>ok</html>".as_bytes(), None).unwrap();
        assert_eq!(decoded.text, "<html>ok</html>");
    }

    #[test]
    fn charset_parameter_wins_over_detection() {
        let bytes = [0xE4u8, 0xF6, 0xFC]; // "äöü" in latin-1
        let decoded = decode_text(&bytes, Some("text/html; charset=iso-8859-1")).unwrap();
        assert_eq!(decoded.text, "äöü");
    }

    #[test]
    fn quoted_charset_parameter_is_accepted() {
        let decoded = decode_text(b"hi", Some("text/html; charset=\"utf-8\"")).unwrap();
        assert_eq!(decoded.encoding, "UTF-8");
    }
}

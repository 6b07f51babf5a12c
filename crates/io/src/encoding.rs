// Text encoding detection and decoding

use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::{DecoderResult, Encoding};

use crate::error::LoadError;

/// Guess the text encoding of a file from its full byte content.
///
/// The guess is statistical and carries no accuracy guarantee. An unreadable
/// file is an error; there is no retry.
pub fn detect_encoding(path: &Path) -> Result<&'static Encoding, LoadError> {
    let bytes = std::fs::read(path).map_err(|e| LoadError::from_io(path, e))?;
    let encoding = detect_encoding_bytes(&bytes);
    log::debug!("{}: detected encoding {}", path.display(), encoding.name());
    Ok(encoding)
}

/// Byte-level detector behind [`detect_encoding`].
///
/// A byte-order mark wins outright; otherwise chardetng decides, with UTF-8
/// allowed as an answer.
pub fn detect_encoding_bytes(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Drop a leading BOM when it belongs to `encoding`.
fn strip_bom<'a>(bytes: &'a [u8], encoding: &'static Encoding) -> &'a [u8] {
    match Encoding::for_bom(bytes) {
        Some((bom_encoding, len)) if bom_encoding == encoding => &bytes[len..],
        _ => bytes,
    }
}

/// Decode a complete buffer, failing on any malformed sequence.
pub fn decode_strict(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(strip_bom(bytes, encoding))
        .map(|text| text.into_owned())
}

/// Decode the head of a file.
///
/// Like [`decode_strict`], except that a multi-byte sequence cut off by the
/// end of the sample is dropped instead of failing the decode.
pub fn decode_prefix(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    let body = strip_bom(bytes, encoding);
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let capacity = decoder.max_utf8_buffer_length_without_replacement(body.len())?;
    let mut out = String::with_capacity(capacity);
    let (result, _read) = decoder.decode_to_string_without_replacement(body, &mut out, false);
    match result {
        DecoderResult::InputEmpty => Some(out),
        DecoderResult::Malformed(_, _) | DecoderResult::OutputFull => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{UTF_16LE, UTF_8, WINDOWS_1252};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn utf8_with_accents() {
        let text = "Name,DOB\nJosé Núñez,2010-05-01\nZoë Ångström,2011-06-02\n";
        assert_eq!(detect_encoding_bytes(text.as_bytes()), UTF_8);
    }

    #[test]
    fn legacy_single_byte_is_not_utf8() {
        // "José Núñez" in windows-1252
        let bytes = b"Name,DOB\nJos\xe9 N\xfa\xf1ez,2010-05-01\nRen\xe9e Dupr\xe9,2011-06-02\n";
        assert_ne!(detect_encoding_bytes(bytes), UTF_8);
    }

    #[test]
    fn bom_wins() {
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend("a".encode_utf16().flat_map(|u| u.to_le_bytes()));
        assert_eq!(detect_encoding_bytes(&bytes), UTF_16LE);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = detect_encoding(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }), "{err}");
    }

    #[test]
    fn detect_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roster.csv");
        fs::write(&path, "Name,Birthdate\nBjörk Guðmundsdóttir,1965-11-21\n").unwrap();
        assert_eq!(detect_encoding(&path).unwrap(), UTF_8);
    }

    #[test]
    fn strict_decode_strips_bom_and_rejects_garbage() {
        let bytes = b"\xEF\xBB\xBFName,DOB\n";
        assert_eq!(decode_strict(bytes, UTF_8).as_deref(), Some("Name,DOB\n"));
        assert_eq!(decode_strict(b"Jos\xe9", UTF_8), None);
        assert_eq!(decode_strict(b"Jos\xe9", WINDOWS_1252).as_deref(), Some("José"));
    }

    #[test]
    fn prefix_decode_tolerates_cut_sequence() {
        let full = "Zoë".as_bytes();
        // cut in the middle of the two-byte 'ë'
        let cut = &full[..full.len() - 1];
        assert_eq!(decode_prefix(cut, UTF_8).as_deref(), Some("Zo"));
        assert_eq!(decode_prefix(b"a\xffb", UTF_8), None);
    }
}

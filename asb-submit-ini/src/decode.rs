use crate::error::IniError;

const BOM: char = '\u{FEFF}';

/// Decode raw file contents into UTF-8 text.
///
/// UTF-8 is tried first (a leading byte-order mark is dropped). If that
/// fails the bytes are read as UTF-16LE and every byte-order mark is removed.
/// When neither encoding fits the whole file, the file is unusable.
pub fn decode(bytes: &[u8]) -> Result<String, IniError> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.strip_prefix(BOM).unwrap_or(text).to_string()),
        Err(utf8_err) => {
            log::debug!("Not UTF-8 ({utf8_err}), retrying as UTF-16LE");
            decode_utf16_le(bytes).map_err(|utf16_err| {
                IniError::decode(format!("utf-8: {utf8_err}; utf-16le: {utf16_err}"))
            })
        }
    }
}

fn decode_utf16_le(bytes: &[u8]) -> Result<String, String> {
    if bytes.len() % 2 != 0 {
        return Err(format!("odd byte count ({})", bytes.len()));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let text = String::from_utf16(&units).map_err(|e| e.to_string())?;
    Ok(text.replace(BOM, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16_le(text: &str, bom: bool) -> Vec<u8> {
        let mut out = Vec::new();
        if bom {
            out.extend_from_slice(&[0xFF, 0xFE]);
        }
        for unit in text.encode_utf16() {
            out.extend_from_slice(&unit.to_le_bytes());
        }
        out
    }

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode(b"[Dino Data]\nDinoID1=1").unwrap(), "[Dino Data]\nDinoID1=1");
    }

    #[test]
    fn test_decode_utf8_strips_leading_bom() {
        let bytes = "\u{FEFF}[Dino Data]".as_bytes();
        assert_eq!(decode(bytes).unwrap(), "[Dino Data]");
    }

    #[test]
    fn test_decode_utf16_with_bom() {
        let bytes = utf16_le("[Dino Data]\r\nTamedName=Rex", true);
        assert_eq!(decode(&bytes).unwrap(), "[Dino Data]\r\nTamedName=Rex");
    }

    #[test]
    fn test_decode_utf16_non_ascii() {
        let bytes = utf16_le("TamedName=Ünïcødé", false);
        assert_eq!(decode(&bytes).unwrap(), "TamedName=Ünïcødé");
    }

    #[test]
    fn test_decode_fails_for_odd_length_garbage() {
        let err = decode(&[0xFF, 0xFE, 0x41]).unwrap_err();
        assert!(matches!(err, IniError::Decode(_)));
    }

    #[test]
    fn test_decode_fails_for_unpaired_surrogate() {
        // 0xC3 alone is invalid UTF-8; 0xD800 is an unpaired high surrogate
        let bytes = [0xC3, 0x00, 0x00, 0xD8];
        assert!(decode(&bytes).is_err());
    }
}

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use super::types::CesrError;

const B64_ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

pub(crate) fn encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

pub(crate) fn decode(text: &[u8]) -> Result<Vec<u8>, CesrError> {
    URL_SAFE_NO_PAD
        .decode(text)
        .map_err(|err| CesrError::EncodingError(err.to_string()))
}

/// `to_qb2` converts a quadlet aligned text domain stream into the binary domain
pub fn to_qb2(text: &[u8]) -> Result<Vec<u8>, CesrError> {
    if text.len() % 4 != 0 {
        return Err(CesrError::EncodingError(format!(
            "text stream of {} bytes is not quadlet aligned",
            text.len()
        )));
    }

    decode(text)
}

/// `to_qb64` converts a triplet aligned binary domain stream into the text domain
pub fn to_qb64(bny: &[u8]) -> Result<Vec<u8>, CesrError> {
    if bny.len() % 3 != 0 {
        return Err(CesrError::EncodingError(format!(
            "binary stream of {} bytes is not triplet aligned",
            bny.len()
        )));
    }

    Ok(encode(bny).into_bytes())
}

pub(crate) fn index_of(ch: u8) -> Option<u64> {
    B64_ALPHABET
        .iter()
        .position(|val| *val == ch)
        .map(|pos| pos as u64)
}

/// `int_to_b64` renders `value` as exactly `length` base64 sextets, left padded with `A`
pub(crate) fn int_to_b64(value: u64, length: usize) -> Result<String, CesrError> {
    if length < 16 && value >= 1u64 << (6 * length) {
        return Err(CesrError::EncodingError(format!(
            "value {} does not fit in {} sextets",
            value, length
        )));
    }

    let mut out = vec![b'A'; length];
    let mut rest = value;
    for slot in out.iter_mut().rev() {
        *slot = B64_ALPHABET[(rest & 0x3f) as usize];
        rest >>= 6;
    }

    String::from_utf8(out).map_err(|err| CesrError::EncodingError(err.to_string()))
}

pub(crate) fn b64_to_int(text: &[u8]) -> Result<u64, CesrError> {
    text.iter().try_fold(0u64, |acc, ch| {
        let idx = index_of(*ch).ok_or(CesrError::EncodingError(format!(
            "invalid base64 character: {}",
            *ch as char
        )))?;

        Ok((acc << 6) | idx)
    })
}

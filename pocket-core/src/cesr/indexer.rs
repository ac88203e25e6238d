use super::b64;
use super::matter::{self, MatterCode};
use super::types::{CesrError, Kind};

/// `IndexerCode` is the derivation code table for indexed signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexerCode {
    Ed25519Sig,
    EcdsaSecp256k1Sig,
    Ed448Sig,
}

impl IndexerCode {
    pub fn code(&self) -> &'static str {
        match self {
            IndexerCode::Ed25519Sig => "A",
            IndexerCode::EcdsaSecp256k1Sig => "B",
            IndexerCode::Ed448Sig => "0A",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "A" => Some(IndexerCode::Ed25519Sig),
            "B" => Some(IndexerCode::EcdsaSecp256k1Sig),
            "0A" => Some(IndexerCode::Ed448Sig),
            _ => None,
        }
    }

    pub fn hard_size(&self) -> usize {
        self.code().len()
    }

    /// `soft_size` is the number of characters carrying the signer index
    pub fn soft_size(&self) -> usize {
        match self {
            IndexerCode::Ed448Sig => 2,
            _ => 1,
        }
    }

    pub fn full_size(&self) -> usize {
        match self {
            IndexerCode::Ed448Sig => 156,
            _ => 88,
        }
    }

    pub fn raw_size(&self) -> usize {
        match self {
            IndexerCode::Ed448Sig => 114,
            _ => 64,
        }
    }

    fn pad_size(&self) -> usize {
        (self.hard_size() + self.soft_size()) % 4
    }
}

fn hard_size(first: u8) -> Option<usize> {
    match first {
        b'A'..=b'Z' | b'a'..=b'z' => Some(1),
        b'0' => Some(2),
        _ => None,
    }
}

fn lookup(text: &[u8]) -> Result<IndexerCode, CesrError> {
    let first = *text.first().ok_or(CesrError::short(1, 0))?;

    let Some(hs) = hard_size(first) else {
        return Err(not_a_signature(text));
    };

    if text.len() < hs {
        return Err(CesrError::short(hs, text.len()));
    }

    let code = std::str::from_utf8(&text[..hs])
        .map_err(|err| CesrError::EncodingError(err.to_string()))?;

    IndexerCode::from_code(code).ok_or_else(|| not_a_signature(text))
}

// A valid matter code sitting where a signature belongs is a category error,
// anything else is simply unknown
fn not_a_signature(text: &[u8]) -> CesrError {
    let matter_code = text
        .first()
        .and_then(|first| matter::hard_size(*first))
        .filter(|hs| text.len() >= *hs)
        .and_then(|hs| std::str::from_utf8(&text[..hs]).ok())
        .and_then(MatterCode::from_code);

    match matter_code {
        Some(code) => CesrError::WrongKind {
            expected: Kind::Signature,
            code: code.code().to_string(),
        },
        None => CesrError::UnknownCode(
            String::from_utf8_lossy(&text[..text.len().min(4)]).to_string(),
        ),
    }
}

/// `Siger` is an indexed signature: the signature bytes plus the position of the
/// signing key in the controller's current key list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Siger {
    code: IndexerCode,
    index: u32,
    raw: Vec<u8>,
}

impl Siger {
    pub fn new(code: IndexerCode, index: u32, raw: Vec<u8>) -> Result<Self, CesrError> {
        if raw.len() != code.raw_size() {
            return Err(CesrError::EncodingError(format!(
                "raw size {} invalid for signature code {}, expected {}",
                raw.len(),
                code.code(),
                code.raw_size()
            )));
        }

        if (index as u64) >= 1u64 << (6 * code.soft_size()) {
            return Err(CesrError::EncodingError(format!(
                "signature index {} out of range for code {}",
                index,
                code.code()
            )));
        }

        Ok(Self { code, index, raw })
    }

    pub fn code(&self) -> IndexerCode {
        self.code
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn qb64(&self) -> String {
        let ps = self.code.pad_size();
        let mut padded = vec![0u8; ps];
        padded.extend_from_slice(&self.raw);

        let encoded = b64::encode(&padded);
        // index range is checked in `new`
        let soft = b64::int_to_b64(self.index as u64, self.code.soft_size()).unwrap_or_default();

        format!("{}{}{}", self.code.code(), soft, &encoded[ps..])
    }

    pub fn qb64b(&self) -> Vec<u8> {
        self.qb64().into_bytes()
    }

    pub fn qb2(&self) -> Vec<u8> {
        b64::decode(self.qb64().as_bytes()).unwrap_or_default()
    }

    pub fn from_qb64b(bytes: &[u8]) -> Result<(Self, usize), CesrError> {
        let code = lookup(bytes)?;

        let fs = code.full_size();
        if bytes.len() < fs {
            return Err(CesrError::short(fs, bytes.len()));
        }

        let hs = code.hard_size();
        let ss = code.soft_size();
        let index = b64::b64_to_int(&bytes[hs..hs + ss])?;

        let ps = code.pad_size();
        let mut padded = vec![b'A'; ps];
        padded.extend_from_slice(&bytes[hs + ss..fs]);

        let decoded = b64::decode(&padded)?;
        if decoded[..ps].iter().any(|val| *val != 0) {
            return Err(CesrError::EncodingError(format!(
                "non zero pad bits in signature with code {}",
                code.code()
            )));
        }

        let siger = Siger::new(code, index as u32, decoded[ps..].to_vec())?;
        Ok((siger, fs))
    }

    pub fn from_qb2(bytes: &[u8]) -> Result<(Self, usize), CesrError> {
        if bytes.len() < 3 {
            return Err(CesrError::short(3, bytes.len()));
        }

        let head = b64::encode(&bytes[..3]);
        let code = lookup(head.as_bytes())?;

        let bs = code.full_size() * 3 / 4;
        if bytes.len() < bs {
            return Err(CesrError::short(bs, bytes.len()));
        }

        let text = b64::encode(&bytes[..bs]);
        let (siger, _) = Siger::from_qb64b(text.as_bytes())?;
        Ok((siger, bs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cesr::matter::Matter;

    #[test]
    fn test_round_trip_with_index() {
        let siger = Siger::new(IndexerCode::Ed25519Sig, 3, vec![7u8; 64]).unwrap();
        let qb64 = siger.qb64();

        assert_eq!(qb64.len(), 88);
        assert!(qb64.starts_with("AD"));

        let (decoded, size) = Siger::from_qb64b(qb64.as_bytes()).unwrap();
        assert_eq!(size, 88);
        assert_eq!(decoded.index(), 3);
        assert_eq!(decoded, siger);

        let qb2 = siger.qb2();
        assert_eq!(qb2.len(), 66);

        let (decoded_bny, size_bny) = Siger::from_qb2(&qb2).unwrap();
        assert_eq!(size_bny, 66);
        assert_eq!(decoded_bny, siger);
    }

    #[test]
    fn test_ed448_round_trip() {
        let siger = Siger::new(IndexerCode::Ed448Sig, 65, vec![9u8; 114]).unwrap();
        let qb64 = siger.qb64();
        assert_eq!(qb64.len(), 156);

        let (decoded, _) = Siger::from_qb64b(qb64.as_bytes()).unwrap();
        assert_eq!(decoded.index(), 65);
        assert_eq!(decoded.raw(), siger.raw());
    }

    #[test]
    fn test_index_out_of_range() {
        let siger = Siger::new(IndexerCode::Ed25519Sig, 64, vec![7u8; 64]);
        assert!(matches!(siger.unwrap_err(), CesrError::EncodingError(_)))
    }

    #[test]
    fn test_matter_code_is_wrong_kind() {
        let digest = Matter::new(MatterCode::Blake3_256, vec![1u8; 32]).unwrap();
        let decoded = Siger::from_qb64b(&digest.qb64b());

        assert_eq!(
            decoded.unwrap_err(),
            CesrError::WrongKind {
                expected: Kind::Signature,
                code: "E".to_string()
            }
        )
    }

    #[test]
    fn test_short_signature() {
        let siger = Siger::new(IndexerCode::Ed25519Sig, 0, vec![7u8; 64]).unwrap();
        let qb64 = siger.qb64b();

        let decoded = Siger::from_qb64b(&qb64[..50]);
        assert_eq!(decoded.unwrap_err(), CesrError::short(88, 50));
    }
}

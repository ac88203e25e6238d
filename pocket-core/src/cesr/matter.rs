use super::b64;
use super::indexer::IndexerCode;
use super::types::{CesrError, Kind};

/// `MatterCode` is the derivation code table for fixed size primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatterCode {
    Ed25519N,
    Ed25519,
    Blake3_256,
    Blake2b256,
    Blake2s256,
    Sha3_256,
    Sha2_256,
    Salt128,
    Blake3_512,
    Blake2b512,
    Sha3_512,
    Sha2_512,
    EcdsaSecp256k1N,
    EcdsaSecp256k1,
    Ed448N,
    Ed448,
}

const MATTER_CODES: [MatterCode; 16] = [
    MatterCode::Ed25519N,
    MatterCode::Ed25519,
    MatterCode::Blake3_256,
    MatterCode::Blake2b256,
    MatterCode::Blake2s256,
    MatterCode::Sha3_256,
    MatterCode::Sha2_256,
    MatterCode::Salt128,
    MatterCode::Blake3_512,
    MatterCode::Blake2b512,
    MatterCode::Sha3_512,
    MatterCode::Sha2_512,
    MatterCode::EcdsaSecp256k1N,
    MatterCode::EcdsaSecp256k1,
    MatterCode::Ed448N,
    MatterCode::Ed448,
];

impl MatterCode {
    pub fn code(&self) -> &'static str {
        match self {
            MatterCode::Ed25519N => "B",
            MatterCode::Ed25519 => "D",
            MatterCode::Blake3_256 => "E",
            MatterCode::Blake2b256 => "F",
            MatterCode::Blake2s256 => "G",
            MatterCode::Sha3_256 => "H",
            MatterCode::Sha2_256 => "I",
            MatterCode::Salt128 => "0A",
            MatterCode::Blake3_512 => "0D",
            MatterCode::Blake2b512 => "0E",
            MatterCode::Sha3_512 => "0F",
            MatterCode::Sha2_512 => "0G",
            MatterCode::EcdsaSecp256k1N => "1AAA",
            MatterCode::EcdsaSecp256k1 => "1AAB",
            MatterCode::Ed448N => "1AAC",
            MatterCode::Ed448 => "1AAD",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        MATTER_CODES.iter().find(|val| val.code() == code).copied()
    }

    /// `full_size` is the qb64 length in characters, code included
    pub fn full_size(&self) -> usize {
        match self {
            MatterCode::Salt128 => 24,
            MatterCode::Blake3_512
            | MatterCode::Blake2b512
            | MatterCode::Sha3_512
            | MatterCode::Sha2_512 => 88,
            MatterCode::EcdsaSecp256k1N | MatterCode::EcdsaSecp256k1 => 48,
            MatterCode::Ed448N | MatterCode::Ed448 => 80,
            _ => 44,
        }
    }

    pub fn hard_size(&self) -> usize {
        self.code().len()
    }

    pub fn raw_size(&self) -> usize {
        (self.full_size() - self.hard_size()) * 3 / 4
    }

    pub fn is_kind(&self, kind: Kind) -> bool {
        match kind {
            Kind::Prefix => !matches!(
                self,
                MatterCode::Salt128
                    | MatterCode::Blake3_512
                    | MatterCode::Blake2b512
                    | MatterCode::Sha3_512
                    | MatterCode::Sha2_512
            ),
            Kind::Digest => matches!(
                self,
                MatterCode::Blake3_256
                    | MatterCode::Blake2b256
                    | MatterCode::Blake2s256
                    | MatterCode::Sha3_256
                    | MatterCode::Sha2_256
                    | MatterCode::Blake3_512
                    | MatterCode::Blake2b512
                    | MatterCode::Sha3_512
                    | MatterCode::Sha2_512
            ),
            Kind::SeqNum => matches!(self, MatterCode::Salt128),
            Kind::Signature => false,
        }
    }
}

/// Hard size of a matter code, selected by its first character
pub(crate) fn hard_size(first: u8) -> Option<usize> {
    match first {
        b'A'..=b'Z' | b'a'..=b'z' => Some(1),
        b'0' | b'4' | b'5' => Some(2),
        b'1'..=b'3' | b'6'..=b'9' => Some(4),
        _ => None,
    }
}

/// `Matter` is a fully qualified fixed size primitive: derivation code plus raw bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matter {
    code: MatterCode,
    raw: Vec<u8>,
}

impl Matter {
    pub fn new(code: MatterCode, raw: Vec<u8>) -> Result<Self, CesrError> {
        if raw.len() != code.raw_size() {
            return Err(CesrError::EncodingError(format!(
                "raw size {} invalid for code {}, expected {}",
                raw.len(),
                code.code(),
                code.raw_size()
            )));
        }

        Ok(Self { code, raw })
    }

    pub fn code(&self) -> MatterCode {
        self.code
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn qb64(&self) -> String {
        let ps = self.code.hard_size() % 4;
        let mut padded = vec![0u8; ps];
        padded.extend_from_slice(&self.raw);

        let encoded = b64::encode(&padded);
        format!("{}{}", self.code.code(), &encoded[ps..])
    }

    pub fn qb64b(&self) -> Vec<u8> {
        self.qb64().into_bytes()
    }

    pub fn qb2(&self) -> Vec<u8> {
        // qb64 length is always a multiple of four
        b64::decode(self.qb64().as_bytes()).unwrap_or_default()
    }

    /// `from_qb64b` decodes the primitive at the front of `bytes`, returning it with
    /// the number of characters consumed
    pub fn from_qb64b(bytes: &[u8]) -> Result<(Self, usize), CesrError> {
        let first = *bytes.first().ok_or(CesrError::short(1, 0))?;
        let hs = hard_size(first).ok_or(CesrError::UnknownCode((first as char).to_string()))?;
        if bytes.len() < hs {
            return Err(CesrError::short(hs, bytes.len()));
        }

        let code_text = std::str::from_utf8(&bytes[..hs])
            .map_err(|err| CesrError::EncodingError(err.to_string()))?;
        let code = MatterCode::from_code(code_text)
            .ok_or(CesrError::UnknownCode(code_text.to_string()))?;

        let fs = code.full_size();
        if bytes.len() < fs {
            return Err(CesrError::short(fs, bytes.len()));
        }

        let ps = hs % 4;
        let mut padded = vec![b'A'; ps];
        padded.extend_from_slice(&bytes[hs..fs]);

        let decoded = b64::decode(&padded)?;
        if decoded[..ps].iter().any(|val| *val != 0) {
            return Err(CesrError::EncodingError(format!(
                "non zero pad bits in primitive with code {}",
                code.code()
            )));
        }

        let matter = Matter::new(code, decoded[ps..].to_vec())?;
        Ok((matter, fs))
    }

    /// `from_qb2` decodes the binary domain primitive at the front of `bytes`,
    /// returning it with the number of bytes consumed
    pub fn from_qb2(bytes: &[u8]) -> Result<(Self, usize), CesrError> {
        if bytes.len() < 3 {
            return Err(CesrError::short(3, bytes.len()));
        }

        let head = b64::encode(&bytes[..3]);
        let head = head.as_bytes();
        let hs = hard_size(head[0]).ok_or(CesrError::UnknownCode((head[0] as char).to_string()))?;

        let code_text = std::str::from_utf8(&head[..hs])
            .map_err(|err| CesrError::EncodingError(err.to_string()))?;
        let code = MatterCode::from_code(code_text)
            .ok_or(CesrError::UnknownCode(code_text.to_string()))?;

        let bs = code.full_size() * 3 / 4;
        if bytes.len() < bs {
            return Err(CesrError::short(bs, bytes.len()));
        }

        let text = b64::encode(&bytes[..bs]);
        let (matter, _) = Matter::from_qb64b(text.as_bytes())?;
        Ok((matter, bs))
    }

    fn into_kind(self, kind: Kind) -> Result<Self, CesrError> {
        if !self.code.is_kind(kind) {
            return Err(CesrError::WrongKind {
                expected: kind,
                code: self.code.code().to_string(),
            });
        }

        Ok(self)
    }
}

// A signature code sitting where a matter primitive belongs is a category error
fn not_a_matter(err: CesrError, kind: Kind) -> CesrError {
    match err {
        CesrError::UnknownCode(code) if IndexerCode::from_code(&code).is_some() => {
            CesrError::WrongKind {
                expected: kind,
                code,
            }
        }
        other => other,
    }
}

macro_rules! matter_kind {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(Matter);

        impl $name {
            pub const KIND: Kind = $kind;

            pub fn new(matter: Matter) -> Result<Self, CesrError> {
                matter.into_kind(Self::KIND).map(Self)
            }

            pub fn from_raw(code: MatterCode, raw: Vec<u8>) -> Result<Self, CesrError> {
                Self::new(Matter::new(code, raw)?)
            }

            pub fn from_qb64b(bytes: &[u8]) -> Result<(Self, usize), CesrError> {
                let (matter, size) = Matter::from_qb64b(bytes)
                    .map_err(|err| not_a_matter(err, Self::KIND))?;
                Ok((Self::new(matter)?, size))
            }

            pub fn from_qb2(bytes: &[u8]) -> Result<(Self, usize), CesrError> {
                let (matter, size) = Matter::from_qb2(bytes)
                    .map_err(|err| not_a_matter(err, Self::KIND))?;
                Ok((Self::new(matter)?, size))
            }

            pub fn matter(&self) -> &Matter {
                &self.0
            }

            pub fn code(&self) -> MatterCode {
                self.0.code()
            }

            pub fn raw(&self) -> &[u8] {
                self.0.raw()
            }

            pub fn qb64(&self) -> String {
                self.0.qb64()
            }

            pub fn qb64b(&self) -> Vec<u8> {
                self.0.qb64b()
            }

            pub fn qb2(&self) -> Vec<u8> {
                self.0.qb2()
            }
        }
    };
}

matter_kind!(
    /// Fully qualified identifier prefix of a key holding entity
    Prefixer,
    Kind::Prefix
);

matter_kind!(
    /// Key event sequence number, 16 bytes big endian under the `0A` code
    Seqner,
    Kind::SeqNum
);

matter_kind!(
    /// Fully qualified digest
    Diger,
    Kind::Digest
);

impl Seqner {
    pub fn from_sn(sn: u128) -> Self {
        Self(Matter {
            code: MatterCode::Salt128,
            raw: sn.to_be_bytes().to_vec(),
        })
    }

    pub fn sn(&self) -> u128 {
        let mut buf = [0u8; 16];
        buf.copy_from_slice(self.raw());
        u128::from_be_bytes(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use table_test::table_test;

    #[test]
    fn test_code_sizes() {
        let table = vec![
            (MatterCode::Ed25519, (44, 32)),
            (MatterCode::Blake3_256, (44, 32)),
            (MatterCode::Salt128, (24, 16)),
            (MatterCode::Sha2_512, (88, 64)),
            (MatterCode::EcdsaSecp256k1, (48, 33)),
            (MatterCode::Ed448, (80, 57)),
        ];

        for (validator, input, expected) in table_test!(table) {
            validator
                .given(input.code())
                .when("sizes looked up")
                .then("full and raw sizes match the code table")
                .assert_eq(expected, (input.full_size(), input.raw_size()));
        }
    }

    #[test]
    fn test_qb64_round_trip() {
        for code in MATTER_CODES.iter() {
            let raw: Vec<u8> = (0..code.raw_size()).map(|val| val as u8).collect();
            let matter = Matter::new(*code, raw.clone()).unwrap();

            let qb64 = matter.qb64();
            assert_eq!(qb64.len(), code.full_size());
            assert!(qb64.starts_with(code.code()));

            let (decoded, size) = Matter::from_qb64b(qb64.as_bytes()).unwrap();
            assert_eq!(size, code.full_size());
            assert_eq!(decoded, matter);

            let qb2 = matter.qb2();
            assert_eq!(qb2.len(), code.full_size() * 3 / 4);

            let (decoded_bny, size_bny) = Matter::from_qb2(&qb2).unwrap();
            assert_eq!(size_bny, qb2.len());
            assert_eq!(decoded_bny.raw(), raw.as_slice());
        }
    }

    #[test]
    fn test_short_input() {
        let matter = Matter::new(MatterCode::Ed25519, vec![1u8; 32]).unwrap();
        let qb64 = matter.qb64b();

        let decoded = Matter::from_qb64b(&qb64[..20]);
        assert_eq!(decoded.unwrap_err(), CesrError::short(44, 20));
    }

    #[test]
    fn test_unknown_code() {
        let decoded = Matter::from_qb64b(b"0Z");
        assert!(matches!(decoded.unwrap_err(), CesrError::UnknownCode(_)));

        let decoded = Matter::from_qb64b(b"-AAB");
        assert!(matches!(decoded.unwrap_err(), CesrError::UnknownCode(_)));
    }

    #[test]
    fn test_wrong_kind() {
        let key = Matter::new(MatterCode::Ed25519, vec![1u8; 32]).unwrap();
        let diger = Diger::new(key.clone());
        assert_eq!(
            diger.unwrap_err(),
            CesrError::WrongKind {
                expected: Kind::Digest,
                code: "D".to_string()
            }
        );

        let digest = Matter::new(MatterCode::Blake3_256, vec![2u8; 32]).unwrap();
        assert!(Prefixer::new(digest.clone()).is_ok());
        assert!(Seqner::new(digest).is_err());
    }

    #[test]
    fn test_signature_code_is_wrong_kind() {
        let siger = crate::cesr::Siger::new(IndexerCode::Ed25519Sig, 0, vec![8u8; 64]).unwrap();

        let decoded = Diger::from_qb64b(&siger.qb64b());
        assert_eq!(
            decoded.unwrap_err(),
            CesrError::WrongKind {
                expected: Kind::Digest,
                code: "A".to_string()
            }
        );

        let decoded = Prefixer::from_qb2(&siger.qb2());
        assert!(matches!(
            decoded.unwrap_err(),
            CesrError::WrongKind {
                expected: Kind::Prefix,
                ..
            }
        ));
    }

    #[test]
    fn test_seqner() {
        let seqner = Seqner::from_sn(0);
        assert_eq!(seqner.qb64(), "0AAAAAAAAAAAAAAAAAAAAAAA");

        let seqner = Seqner::from_sn(5);
        let (decoded, _) = Seqner::from_qb64b(seqner.qb64().as_bytes()).unwrap();
        assert_eq!(decoded.sn(), 5);
    }

    #[test]
    fn test_non_zero_pad_rejected() {
        // "E" followed by a lead character carrying set pad bits
        let mut qb64 = Matter::new(MatterCode::Blake3_256, vec![0u8; 32])
            .unwrap()
            .qb64b();
        qb64[1] = b'_';

        let decoded = Matter::from_qb64b(&qb64);
        assert!(matches!(decoded.unwrap_err(), CesrError::EncodingError(_)))
    }
}

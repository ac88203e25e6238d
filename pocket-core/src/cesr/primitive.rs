use super::indexer::Siger;
use super::matter::{Diger, Prefixer, Seqner};
use super::stream::Cursor;
use super::types::{CesrError, Cold, Kind};

/// `Primitive` is one tagged value per primitive category
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Primitive {
    Prefix(Prefixer),
    SeqNum(Seqner),
    Digest(Diger),
    Signature(Siger),
}

impl Primitive {
    pub fn kind(&self) -> Kind {
        match self {
            Primitive::Prefix(_) => Kind::Prefix,
            Primitive::SeqNum(_) => Kind::SeqNum,
            Primitive::Digest(_) => Kind::Digest,
            Primitive::Signature(_) => Kind::Signature,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Primitive::Prefix(val) => val.code().code(),
            Primitive::SeqNum(val) => val.code().code(),
            Primitive::Digest(val) => val.code().code(),
            Primitive::Signature(val) => val.code().code(),
        }
    }

    pub fn qb64(&self) -> String {
        match self {
            Primitive::Prefix(val) => val.qb64(),
            Primitive::SeqNum(val) => val.qb64(),
            Primitive::Digest(val) => val.qb64(),
            Primitive::Signature(val) => val.qb64(),
        }
    }

    pub fn qb2(&self) -> Vec<u8> {
        match self {
            Primitive::Prefix(val) => val.qb2(),
            Primitive::SeqNum(val) => val.qb2(),
            Primitive::Digest(val) => val.qb2(),
            Primitive::Signature(val) => val.qb2(),
        }
    }

    fn wrong_kind(self, expected: Kind) -> CesrError {
        CesrError::WrongKind {
            expected,
            code: self.code().to_string(),
        }
    }
}

macro_rules! primitive_variant {
    ($variant:ident, $name:ident) => {
        impl From<$name> for Primitive {
            fn from(value: $name) -> Self {
                Primitive::$variant(value)
            }
        }

        impl TryFrom<Primitive> for $name {
            type Error = CesrError;

            fn try_from(value: Primitive) -> Result<Self, Self::Error> {
                match value {
                    Primitive::$variant(val) => Ok(val),
                    other => Err(other.wrong_kind(Kind::$variant)),
                }
            }
        }
    };
}

primitive_variant!(Prefix, Prefixer);
primitive_variant!(SeqNum, Seqner);
primitive_variant!(Digest, Diger);
primitive_variant!(Signature, Siger);

fn decode_qb64b(bytes: &[u8], expected: Kind) -> Result<(Primitive, usize), CesrError> {
    match expected {
        Kind::Prefix => Prefixer::from_qb64b(bytes).map(|(val, size)| (val.into(), size)),
        Kind::SeqNum => Seqner::from_qb64b(bytes).map(|(val, size)| (val.into(), size)),
        Kind::Digest => Diger::from_qb64b(bytes).map(|(val, size)| (val.into(), size)),
        Kind::Signature => Siger::from_qb64b(bytes).map(|(val, size)| (val.into(), size)),
    }
}

fn decode_qb2(bytes: &[u8], expected: Kind) -> Result<(Primitive, usize), CesrError> {
    match expected {
        Kind::Prefix => Prefixer::from_qb2(bytes).map(|(val, size)| (val.into(), size)),
        Kind::SeqNum => Seqner::from_qb2(bytes).map(|(val, size)| (val.into(), size)),
        Kind::Digest => Diger::from_qb2(bytes).map(|(val, size)| (val.into(), size)),
        Kind::Signature => Siger::from_qb2(bytes).map(|(val, size)| (val.into(), size)),
    }
}

/// `decode_primitive` reads one primitive of the expected kind from the front of
/// `bytes` in the given domain, returning it with the number of bytes consumed
pub fn decode_primitive(
    bytes: &[u8],
    expected: Kind,
    cold: Cold,
) -> Result<(Primitive, usize), CesrError> {
    match cold {
        Cold::Txt => decode_qb64b(bytes, expected),
        Cold::Bny => decode_qb2(bytes, expected),
        Cold::Msg => Err(CesrError::ColdStart(format!(
            "expected a {} primitive, found a message",
            expected
        ))),
    }
}

/// `extract_primitive` decodes at the cursor and moves it past the primitive.
/// On any error the cursor stays where it was
pub fn extract_primitive<T>(
    cursor: &mut Cursor<'_>,
    expected: Kind,
    cold: Cold,
) -> Result<T, CesrError>
where
    T: TryFrom<Primitive, Error = CesrError>,
{
    let (primitive, size) = decode_primitive(cursor.remaining(), expected, cold)?;
    let value = T::try_from(primitive)?;

    cursor.advance(size);
    Ok(value)
}

/// `encode_primitive` renders a primitive in the given domain
pub fn encode_primitive(value: &Primitive, cold: Cold) -> Result<Vec<u8>, CesrError> {
    match cold {
        Cold::Txt => Ok(value.qb64().into_bytes()),
        Cold::Bny => Ok(value.qb2()),
        Cold::Msg => Err(CesrError::ColdStart(
            "primitives have no message domain".to_string(),
        )),
    }
}

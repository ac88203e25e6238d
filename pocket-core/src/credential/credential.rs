use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json::{self, Value};

use crate::cesr::CesrError;

use super::types::{Aid, Said};
use super::version::{sniff_version, Serial, Version};

const CREDENTIAL_PROTO: &str = "ACDC";

#[derive(Deserialize)]
#[serde(crate = "self::serde")]
struct Subject {
    #[serde(alias = "id")]
    i: Aid,
}

#[derive(Deserialize)]
#[serde(crate = "self::serde")]
struct Fields {
    d: Said,
    i: Aid,
    s: Said,
    a: Subject,
}

#[derive(Serialize)]
#[serde(crate = "self::serde")]
struct Body<'a> {
    v: String,
    d: &'a Said,
    i: &'a Aid,
    s: &'a Said,
    a: Value,
}

/// `Credential` is an immutable serialized credential body together with the
/// fields the pocket indexes it by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    raw: Vec<u8>,
    version: Version,
    said: Said,
    issuer: Aid,
    subject: Aid,
    schema: Said,
}

impl Credential {
    /// `from_bytes` materializes the credential at the front of `ims`. The body is
    /// self framing, its size comes from the version string. Trailing bytes are
    /// left alone for the attachment parser
    pub fn from_bytes(ims: &[u8]) -> Result<Self, CesrError> {
        let version = sniff_version(ims)?;
        if ims.len() < version.size {
            return Err(CesrError::short(version.size, ims.len()));
        }

        let raw = ims[..version.size].to_vec();
        let fields: Fields = serde_json::from_slice(&raw)
            .map_err(|err| CesrError::UnserializeError(err.to_string()))?;

        Ok(Self {
            raw,
            version,
            said: fields.d,
            issuer: fields.i,
            subject: fields.a.i,
            schema: fields.s,
        })
    }

    /// `compose` serializes a minimal credential body. The SAID is taken as given,
    /// deriving it belongs to the issuer
    pub fn compose(said: Said, issuer: Aid, subject: Aid, schema: Said) -> Result<Self, CesrError> {
        let mut body = Body {
            v: Version::new(CREDENTIAL_PROTO, Serial::Json, 0).render(),
            d: &said,
            i: &issuer,
            s: &schema,
            a: serde_json::json!({ "i": subject.as_str() }),
        };

        // the placeholder version has the same length as the final one
        let sized = serde_json::to_vec(&body)
            .map_err(|err| CesrError::UnserializeError(err.to_string()))?;
        body.v = Version::new(CREDENTIAL_PROTO, Serial::Json, sized.len()).render();

        let raw = serde_json::to_vec(&body)
            .map_err(|err| CesrError::UnserializeError(err.to_string()))?;

        Credential::from_bytes(&raw)
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn size(&self) -> usize {
        self.raw.len()
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn said(&self) -> &Said {
        &self.said
    }

    pub fn issuer(&self) -> &Aid {
        &self.issuer
    }

    pub fn subject(&self) -> &Aid {
        &self.subject
    }

    pub fn schema(&self) -> &Said {
        &self.schema
    }
}

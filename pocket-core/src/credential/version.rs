use crate::cesr::CesrError;

/// Length of a version string, `XXXXvvKKKKssssss_`
pub const VERSION_SIZE: usize = 17;

/// A version string must start within the first twelve bytes of a body
pub const MIN_SNIFF_SIZE: usize = 12 + VERSION_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Serial {
    Json,
    Cbor,
    Mgpk,
}

impl Serial {
    pub fn code(&self) -> &'static str {
        match self {
            Serial::Json => "JSON",
            Serial::Cbor => "CBOR",
            Serial::Mgpk => "MGPK",
        }
    }

    fn from_code(code: &[u8]) -> Option<Self> {
        match code {
            b"JSON" => Some(Serial::Json),
            b"CBOR" => Some(Serial::Cbor),
            b"MGPK" => Some(Serial::Mgpk),
            _ => None,
        }
    }
}

/// `Version` is a decoded version string: protocol, version, serialization kind and
/// the total size in bytes of the body carrying it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub proto: String,
    pub major: u8,
    pub minor: u8,
    pub kind: Serial,
    pub size: usize,
}

impl Version {
    pub fn new(proto: &str, kind: Serial, size: usize) -> Self {
        Self {
            proto: proto.to_string(),
            major: 1,
            minor: 0,
            kind,
            size,
        }
    }

    pub fn render(&self) -> String {
        format!(
            "{}{:x}{:x}{}{:06x}_",
            self.proto,
            self.major,
            self.minor,
            self.kind.code(),
            self.size
        )
    }

    /// Matches the version string layout, then resolves its serialization kind
    fn parse(window: &[u8]) -> Option<Result<Self, CesrError>> {
        if window.len() != VERSION_SIZE || window[16] != b'_' {
            return None;
        }

        let proto = &window[..4];
        let kind = &window[6..10];
        let is_upper = |part: &[u8]| part.iter().all(|ch| ch.is_ascii_uppercase());
        if !is_upper(proto) || !is_upper(kind) {
            return None;
        }

        let major = hex_digit(window[4])?;
        let minor = hex_digit(window[5])?;
        let size = window[10..16]
            .iter()
            .try_fold(0usize, |acc, ch| hex_digit(*ch).map(|val| acc * 16 + val as usize))?;

        let kind = match Serial::from_code(kind) {
            Some(Serial::Json) => Serial::Json,
            Some(other) => return Some(Err(CesrError::UnsupportedKind(other.code().to_string()))),
            None => {
                return Some(Err(CesrError::VersionError(format!(
                    "unknown serialization kind {}",
                    String::from_utf8_lossy(kind)
                ))))
            }
        };

        Some(Ok(Self {
            proto: String::from_utf8_lossy(proto).to_string(),
            major,
            minor,
            kind,
            size,
        }))
    }
}

fn hex_digit(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        _ => None,
    }
}

/// `sniff_version` locates and decodes the version string near the front of a
/// serialized body
pub fn sniff_version(raw: &[u8]) -> Result<Version, CesrError> {
    if raw.len() < MIN_SNIFF_SIZE {
        return Err(CesrError::short(MIN_SNIFF_SIZE, raw.len()));
    }

    raw[..MIN_SNIFF_SIZE]
        .windows(VERSION_SIZE)
        .find_map(Version::parse)
        .ok_or(CesrError::VersionError(
            "no version string in body head".to_string(),
        ))?
}

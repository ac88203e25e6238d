use rst_common::with_logging::log::debug;

use crate::cesr::{
    decode_primitive, encode_primitive, extract_primitive, sniff, CesrError, Cold, Counter,
    CounterCode, Cursor, Diger, Kind, Prefixer, Primitive, Seqner, Siger,
};
use crate::credential::Credential;

/// `Proof` is the signature attachment of a credential: the issuer's key event
/// location (prefix, sequence number, event digest) and the indexed signatures
/// made with the keys established at that event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    prefixer: Prefixer,
    seqner: Seqner,
    diger: Diger,
    sigers: Vec<Siger>,
}

impl Proof {
    pub fn new(prefixer: Prefixer, seqner: Seqner, diger: Diger, sigers: Vec<Siger>) -> Self {
        Self {
            prefixer,
            seqner,
            diger,
            sigers,
        }
    }

    pub fn prefixer(&self) -> &Prefixer {
        &self.prefixer
    }

    pub fn seqner(&self) -> &Seqner {
        &self.seqner
    }

    pub fn diger(&self) -> &Diger {
        &self.diger
    }

    pub fn sigers(&self) -> &[Siger] {
        &self.sigers
    }

    /// `seal` is the concatenated qb64 triple of the signing event location
    pub fn seal(&self) -> Vec<u8> {
        let mut triple = self.prefixer.qb64b();
        triple.extend(self.seqner.qb64b());
        triple.extend(self.diger.qb64b());
        triple
    }

    /// `from_seal` rebuilds a proof from a stored seal triple and stored signatures
    pub fn from_seal(triple: &[u8], sigs: &[Vec<u8>]) -> Result<Self, CesrError> {
        let mut cursor = Cursor::new(triple);
        let prefixer: Prefixer = extract_primitive(&mut cursor, Kind::Prefix, Cold::Txt)?;
        let seqner: Seqner = extract_primitive(&mut cursor, Kind::SeqNum, Cold::Txt)?;
        let diger: Diger = extract_primitive(&mut cursor, Kind::Digest, Cold::Txt)?;

        if !cursor.is_exhausted() {
            return Err(CesrError::MalformedAttachment(format!(
                "seal has {} trailing bytes",
                cursor.remaining().len()
            )));
        }

        let sigers = sigs
            .iter()
            .map(|sig| {
                decode_primitive(sig, Kind::Signature, Cold::Txt)
                    .and_then(|(primitive, _)| Siger::try_from(primitive))
            })
            .collect::<Result<Vec<Siger>, CesrError>>()?;

        Ok(Self::new(prefixer, seqner, diger, sigers))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CesrError> {
        build_proof(&self.prefixer, &self.seqner, &self.diger, &self.sigers)
    }

    /// `attach` emits the credential body followed by its proof wrapped in an
    /// attached material quadlets group, the form `parse_credential` consumes
    pub fn attach(&self, credential: &Credential) -> Result<Vec<u8>, CesrError> {
        let proof = self.to_bytes()?;
        let counter = Counter::new(
            CounterCode::AttachedMaterialQuadlets,
            (proof.len() / 4) as u32,
        )?;

        let mut out = credential.raw().to_vec();
        out.extend(counter.qb64b());
        out.extend(proof);
        Ok(out)
    }
}

/// `build_proof` serializes a proof in the text domain
pub fn build_proof(
    prefixer: &Prefixer,
    seqner: &Seqner,
    diger: &Diger,
    sigers: &[Siger],
) -> Result<Vec<u8>, CesrError> {
    if sigers.is_empty() {
        return Err(CesrError::EncodingError(
            "proof requires at least one signature".to_string(),
        ));
    }

    let mut out = Counter::new(CounterCode::TransIndexedSigGroups, 1)?.qb64b();
    out.extend(encode_primitive(&Primitive::from(prefixer.clone()), Cold::Txt)?);
    out.extend(encode_primitive(&Primitive::from(seqner.clone()), Cold::Txt)?);
    out.extend(encode_primitive(&Primitive::from(diger.clone()), Cold::Txt)?);

    out.extend(Counter::new(CounterCode::ControllerIdxSigs, sigers.len() as u32)?.qb64b());
    for siger in sigers {
        out.extend(encode_primitive(&Primitive::from(siger.clone()), Cold::Txt)?);
    }

    Ok(out)
}

// Any framing failure other than running out of bytes is a malformed attachment
fn framing(err: CesrError) -> CesrError {
    match err {
        CesrError::UnknownCode(code) => {
            CesrError::MalformedAttachment(format!("unknown counter code {}", code))
        }
        other => other,
    }
}

/// `parse_proof` reads one proof from the cursor. The cursor only moves forward
/// on success
pub fn parse_proof(cursor: &mut Cursor<'_>) -> Result<Proof, CesrError> {
    let mut lookahead = *cursor;

    let cold = sniff(lookahead.remaining())?;
    if cold == Cold::Msg {
        return Err(CesrError::ColdStart(
            "unable to parse proof, attachments expected".to_string(),
        ));
    }

    let counter = Counter::extract(&mut lookahead, cold).map_err(framing)?;
    if counter.code() != CounterCode::TransIndexedSigGroups || counter.count() != 1 {
        return Err(CesrError::MalformedAttachment(format!(
            "invalid proof group {} with count {}, expected {} with count 1",
            counter.code().code(),
            counter.count(),
            CounterCode::TransIndexedSigGroups.code()
        )));
    }

    let prefixer: Prefixer = extract_primitive(&mut lookahead, Kind::Prefix, cold)?;
    let seqner: Seqner = extract_primitive(&mut lookahead, Kind::SeqNum, cold)?;
    let diger: Diger = extract_primitive(&mut lookahead, Kind::Digest, cold)?;

    let counter = Counter::extract(&mut lookahead, cold).map_err(framing)?;
    if counter.code() != CounterCode::ControllerIdxSigs {
        return Err(CesrError::MalformedAttachment(format!(
            "invalid signature group {}, expected {}",
            counter.code().code(),
            CounterCode::ControllerIdxSigs.code()
        )));
    }

    if counter.count() == 0 {
        return Err(CesrError::MalformedAttachment(
            "empty signature group".to_string(),
        ));
    }

    let sigers = (0..counter.count())
        .map(|_| extract_primitive::<Siger>(&mut lookahead, Kind::Signature, cold))
        .collect::<Result<Vec<Siger>, CesrError>>()?;

    debug!(
        "parsed proof for {} with {} signatures",
        prefixer.qb64(),
        sigers.len()
    );

    *cursor = lookahead;
    Ok(Proof::new(prefixer, seqner, diger, sigers))
}

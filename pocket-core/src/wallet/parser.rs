use rst_common::with_logging::log::debug;

use crate::cesr::{sniff, CesrError, Cold, Counter, CounterCode, Cursor, Stream};
use crate::credential::types::Said;
use crate::credential::Credential;
use crate::proof::{parse_proof, Proof};

use super::types::{WalletAPI, WalletError};

/// `Progress` is the outcome of one parse attempt over a growing stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// a credential was framed, verified and stored
    Processed(Said),

    /// the stream holds a partial frame, nothing was consumed
    Incomplete { needed: usize, available: usize },
}

// Bytes per quadlet counted by an attachment counter
fn quadlet_size(cold: Cold) -> usize {
    match cold {
        Cold::Bny => 3,
        _ => 4,
    }
}

fn extract_attachment(cursor: &mut Cursor<'_>) -> Result<Proof, CesrError> {
    let cold = sniff(cursor.remaining())?;
    if cold == Cold::Msg {
        return Err(CesrError::ColdStart(
            "unable to parse credential, attachments expected".to_string(),
        ));
    }

    let mut lookahead = *cursor;
    let counter = Counter::extract(&mut lookahead, cold).map_err(|err| match err {
        CesrError::UnknownCode(code) => {
            CesrError::MalformedAttachment(format!("unknown attachment code {}", code))
        }
        other => other,
    })?;

    if counter.code() != CounterCode::AttachedMaterialQuadlets {
        return Err(CesrError::MalformedAttachment(format!(
            "invalid attachment {}, expected {}",
            counter.code().code(),
            CounterCode::AttachedMaterialQuadlets.code()
        )));
    }

    let expected = counter.count() as usize * quadlet_size(cold);
    let framed = lookahead.take(expected)?;

    // the frame is complete, whatever happens inside it belongs to this credential
    *cursor = lookahead;

    let mut inner = Cursor::new(framed);
    let proof = parse_proof(&mut inner).map_err(|err| match err {
        CesrError::ShortInput { needed, available } => {
            CesrError::MalformedAttachment(format!(
                "attachment declares {} bytes, proof needs {} more than the {} left",
                expected,
                needed - available,
                available
            ))
        }
        other => other,
    })?;

    if !inner.is_exhausted() {
        return Err(CesrError::MalformedAttachment(format!(
            "attachment declares {} bytes, proof used {}",
            expected,
            inner.offset()
        )));
    }

    Ok(proof)
}

/// `extract_credential` frames one credential and its proof at the front of the
/// stream
///
/// On [`CesrError::ShortInput`] the stream is left untouched so the caller can
/// append bytes and retry. A permanent failure consumes the body, and the whole
/// attachment frame too when its declared length was fully buffered
pub fn extract_credential(stream: &mut Stream) -> Result<(Credential, Proof), CesrError> {
    let credential = Credential::from_bytes(stream.as_bytes())?;

    let mut cursor = stream.cursor();
    cursor.advance(credential.size());

    match extract_attachment(&mut cursor) {
        Ok(proof) => {
            let consumed = cursor.offset();
            stream.consume(consumed);

            debug!(
                "extracted credential {} with {} bytes",
                credential.said().as_str(),
                consumed
            );
            Ok((credential, proof))
        }
        Err(err) if err.is_resumable() => Err(err),
        Err(err) => {
            let skipped = cursor.offset();
            stream.consume(skipped);

            debug!(
                "skipped {} bytes of credential {}: {}",
                skipped,
                credential.said().as_str(),
                err
            );
            Err(err)
        }
    }
}

/// `parse_credential` runs one credential from the stream through the wallet
///
/// A partial frame is reported as [`Progress::Incomplete`], every other framing
/// failure is an error and never reaches the wallet
pub async fn parse_credential<TWallet>(
    stream: &mut Stream,
    wallet: &TWallet,
) -> Result<Progress, WalletError>
where
    TWallet: WalletAPI,
{
    let (credential, proof) = match extract_credential(stream) {
        Ok(extracted) => extracted,
        Err(CesrError::ShortInput { needed, available }) => {
            return Ok(Progress::Incomplete { needed, available })
        }
        Err(err) => return Err(err.into()),
    };

    let said = credential.said().clone();
    wallet.process_credential(credential, proof).await?;
    Ok(Progress::Processed(said))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;

    use rst_common::standard::async_trait::async_trait;
    use rst_common::with_tokio::tokio;

    use crate::cesr::{to_qb2, Diger, IndexerCode, MatterCode, Prefixer, Seqner, Siger};
    use crate::credential::types::Aid;
    use crate::pocket::InMemoryPocket;
    use crate::wallet::types::{KeyStateVerifier, StoredCredential};
    use crate::wallet::Wallet;

    mock!(
        FakeWallet{}

        #[async_trait]
        impl WalletAPI for FakeWallet {
            async fn process_credential(&self, credential: Credential, proof: Proof) -> Result<(), WalletError>;
            async fn save_credential(&self, credential: &Credential, proof: &Proof) -> Result<(), WalletError>;
            async fn get_credentials(&self, schema: &Said) -> Result<Vec<StoredCredential>, WalletError>;
        }
    );

    struct AcceptAll;

    #[async_trait]
    impl KeyStateVerifier for AcceptAll {
        async fn verify(
            &self,
            _credential: &Credential,
            _prefixer: &Prefixer,
            _seqner: &Seqner,
            _diger: &Diger,
            _sigers: &[Siger],
        ) -> bool {
            true
        }
    }

    fn generate_message(said: &str) -> (Credential, Proof, Vec<u8>) {
        let credential = Credential::compose(
            Said::from(said),
            Aid::from("EIssuer"),
            Aid::from("ESubject"),
            Said::from("ESchema"),
        )
        .unwrap();

        let prefixer = Prefixer::from_raw(MatterCode::Ed25519, vec![1u8; 32]).unwrap();
        let diger = Diger::from_raw(MatterCode::Blake3_256, vec![2u8; 32]).unwrap();
        let sigers = vec![Siger::new(IndexerCode::Ed25519Sig, 0, vec![8u8; 64]).unwrap()];
        let proof = Proof::new(prefixer, Seqner::from_sn(3), diger, sigers);

        let message = proof.attach(&credential).unwrap();
        (credential, proof, message)
    }

    #[test]
    fn test_extract_consumes_exactly_one_message() {
        let (credential, proof, message) = generate_message("ESaidOne");
        let (_, _, next) = generate_message("ESaidTwo");

        let mut stream = Stream::from(message.clone());
        stream.extend(&next);

        let (extracted, extracted_proof) = extract_credential(&mut stream).unwrap();
        assert_eq!(extracted, credential);
        assert_eq!(extracted_proof, proof);
        assert_eq!(stream.as_bytes(), next.as_slice());
    }

    #[test]
    fn test_partial_stream_is_untouched() {
        let (_, _, message) = generate_message("ESaidOne");

        for cut in [10, 40, message.len() - 1] {
            let mut stream = Stream::from(&message[..cut]);
            let extracted = extract_credential(&mut stream);

            assert!(extracted.unwrap_err().is_resumable());
            assert_eq!(stream.len(), cut);
        }
    }

    #[test]
    fn test_counter_overstated_is_short() {
        let (credential, _, mut message) = generate_message("ESaidOne");
        let start = credential.size();

        let (counter, _) = Counter::from_qb64b(&message[start..]).unwrap();
        let bumped = Counter::new(CounterCode::AttachedMaterialQuadlets, counter.count() + 1)
            .unwrap()
            .qb64b();
        message[start..start + 4].copy_from_slice(&bumped);

        let mut stream = Stream::from(message.clone());
        let extracted = extract_credential(&mut stream);

        let proof_len = message.len() - start - 4;
        assert_eq!(
            extracted.unwrap_err(),
            CesrError::short(proof_len + 4, proof_len)
        );
        assert_eq!(stream.len(), message.len());
    }

    #[test]
    fn test_body_then_message_is_cold_start() {
        let (credential, _, _) = generate_message("ESaidOne");
        let (other, _, _) = generate_message("ESaidTwo");

        let mut stream = Stream::from(credential.raw());
        stream.extend(other.raw());

        let extracted = extract_credential(&mut stream);
        assert!(matches!(extracted.unwrap_err(), CesrError::ColdStart(_)));
        assert_eq!(stream.as_bytes(), other.raw());
    }

    #[test]
    fn test_wrong_attachment_group() {
        let (credential, _, mut message) = generate_message("ESaidOne");
        message[credential.size() + 1] = b'U';

        let mut stream = Stream::from(message);
        let extracted = extract_credential(&mut stream);
        assert!(matches!(
            extracted.unwrap_err(),
            CesrError::MalformedAttachment(_)
        ));
    }

    #[test]
    fn test_binary_attachment() {
        let (credential, proof, message) = generate_message("ESaidOne");

        let mut bny = credential.raw().to_vec();
        bny.extend(to_qb2(&message[credential.size()..]).unwrap());

        let mut stream = Stream::from(bny);
        let (extracted, extracted_proof) = extract_credential(&mut stream).unwrap();
        assert_eq!(extracted, credential);
        assert_eq!(extracted_proof, proof);
        assert!(stream.is_empty());
    }

    #[tokio::test]
    async fn test_parse_incomplete_never_reaches_wallet() {
        let (credential, _, message) = generate_message("ESaidOne");
        let wallet = MockFakeWallet::new();

        let mut stream = Stream::from(&message[..message.len() - 4]);
        let progress = parse_credential(&mut stream, &wallet).await.unwrap();

        let proof_len = message.len() - credential.size() - 4;
        assert_eq!(
            progress,
            Progress::Incomplete {
                needed: proof_len,
                available: proof_len - 4,
            }
        );
        assert_eq!(stream.len(), message.len() - 4);
    }

    #[tokio::test]
    async fn test_parse_then_query_end_to_end() {
        let wallet = Wallet::new(InMemoryPocket::new(), AcceptAll);

        let (first, first_proof, first_message) = generate_message("ESaidOne");
        let (second, _, second_message) = generate_message("ESaidTwo");

        let mut stream = Stream::new();
        stream.extend(&first_message[..50]);

        let progress = parse_credential(&mut stream, &wallet).await.unwrap();
        assert!(matches!(progress, Progress::Incomplete { .. }));

        stream.extend(&first_message[50..]);
        stream.extend(&second_message);

        let progress = parse_credential(&mut stream, &wallet).await.unwrap();
        assert_eq!(progress, Progress::Processed(Said::from("ESaidOne")));

        let progress = parse_credential(&mut stream, &wallet).await.unwrap();
        assert_eq!(progress, Progress::Processed(Said::from("ESaidTwo")));
        assert!(stream.is_empty());

        let creds = wallet.get_credentials(&Said::from("ESchema")).await.unwrap();
        assert_eq!(creds.len(), 2);
        assert_eq!(creds[0].0, first);
        assert_eq!(creds[0].1, first_proof);
        assert_eq!(creds[1].0, second);
    }

    #[tokio::test]
    async fn test_parse_rejected_credential() {
        let (_, _, message) = generate_message("ESaidOne");

        let mut wallet = MockFakeWallet::new();
        wallet
            .expect_process_credential()
            .times(1)
            .returning(|_, _| Err(WalletError::UnverifiedProof("rejected".to_string())));

        let mut stream = Stream::from(message);
        let progress = parse_credential(&mut stream, &wallet).await;
        assert!(matches!(progress, Err(WalletError::UnverifiedProof(_))));
        assert!(stream.is_empty());
    }

    #[test]
    fn test_inner_count_overstated_skips_frame() {
        let (credential, _, mut message) = generate_message("ESaidOne");
        let (second, second_proof, next) = generate_message("ESaidTwo");

        // -AAB becomes -AAC inside a complete -V frame
        let start = credential.size();
        let pos = message[start..]
            .windows(4)
            .position(|window| window == b"-AAB")
            .unwrap()
            + start;
        message[pos + 3] = b'C';

        let mut stream = Stream::from(message);
        stream.extend(&next);

        let extracted = extract_credential(&mut stream);
        assert!(matches!(
            extracted.unwrap_err(),
            CesrError::MalformedAttachment(_)
        ));
        assert_eq!(stream.as_bytes(), next.as_slice());

        let (extracted, extracted_proof) = extract_credential(&mut stream).unwrap();
        assert_eq!(extracted, second);
        assert_eq!(extracted_proof, second_proof);
        assert!(stream.is_empty());
    }

    #[tokio::test]
    async fn test_parse_moves_past_broken_frame() {
        let wallet = Wallet::new(InMemoryPocket::new(), AcceptAll);

        let (credential, _, mut message) = generate_message("ESaidOne");
        let (_, _, next) = generate_message("ESaidTwo");

        let start = credential.size();
        let pos = message[start..]
            .windows(4)
            .position(|window| window == b"-AAB")
            .unwrap()
            + start;
        message[pos + 3] = b'C';

        let mut stream = Stream::from(message);
        stream.extend(&next);

        let progress = parse_credential(&mut stream, &wallet).await;
        assert!(matches!(
            progress,
            Err(WalletError::CesrError(CesrError::MalformedAttachment(_)))
        ));

        let progress = parse_credential(&mut stream, &wallet).await.unwrap();
        assert_eq!(progress, Progress::Processed(Said::from("ESaidTwo")));
        assert!(stream.is_empty());
    }
}

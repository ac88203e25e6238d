use super::b64;
use super::stream::Cursor;
use super::types::{CesrError, Cold};

/// Counters use two code characters followed by two count characters
pub const COUNTER_SIZE: usize = 4;
pub const COUNTER_SIZE_BNY: usize = 3;
pub const MAX_COUNT: u32 = 4095;

/// `CounterCode` names the group a counter announces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterCode {
    ControllerIdxSigs,
    WitnessIdxSigs,
    NonTransReceiptCouples,
    TransReceiptQuadruples,
    FirstSeenReplayCouples,
    TransIndexedSigGroups,
    MessageDataGroups,
    AttachedMaterialQuadlets,
    MessageDataMaterialQuadlets,
    CombinedMaterialQuadlets,
    MaterialGroups,
    MaterialQuadlets,
}

impl CounterCode {
    pub fn code(&self) -> &'static str {
        match self {
            CounterCode::ControllerIdxSigs => "-A",
            CounterCode::WitnessIdxSigs => "-B",
            CounterCode::NonTransReceiptCouples => "-C",
            CounterCode::TransReceiptQuadruples => "-D",
            CounterCode::FirstSeenReplayCouples => "-E",
            CounterCode::TransIndexedSigGroups => "-F",
            CounterCode::MessageDataGroups => "-U",
            CounterCode::AttachedMaterialQuadlets => "-V",
            CounterCode::MessageDataMaterialQuadlets => "-W",
            CounterCode::CombinedMaterialQuadlets => "-X",
            CounterCode::MaterialGroups => "-Y",
            CounterCode::MaterialQuadlets => "-Z",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let counter = match code {
            "-A" => CounterCode::ControllerIdxSigs,
            "-B" => CounterCode::WitnessIdxSigs,
            "-C" => CounterCode::NonTransReceiptCouples,
            "-D" => CounterCode::TransReceiptQuadruples,
            "-E" => CounterCode::FirstSeenReplayCouples,
            "-F" => CounterCode::TransIndexedSigGroups,
            "-U" => CounterCode::MessageDataGroups,
            "-V" => CounterCode::AttachedMaterialQuadlets,
            "-W" => CounterCode::MessageDataMaterialQuadlets,
            "-X" => CounterCode::CombinedMaterialQuadlets,
            "-Y" => CounterCode::MaterialGroups,
            "-Z" => CounterCode::MaterialQuadlets,
            _ => return None,
        };

        Some(counter)
    }
}

/// `Counter` is a group framing header: which group follows and how many
/// elements (or quadlets) it holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Counter {
    code: CounterCode,
    count: u32,
}

impl Counter {
    pub fn new(code: CounterCode, count: u32) -> Result<Self, CesrError> {
        if count > MAX_COUNT {
            return Err(CesrError::EncodingError(format!(
                "count {} exceeds {} for counter {}",
                count,
                MAX_COUNT,
                code.code()
            )));
        }

        Ok(Self { code, count })
    }

    pub fn code(&self) -> CounterCode {
        self.code
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn qb64(&self) -> String {
        // count range is checked in `new`
        let count = b64::int_to_b64(self.count as u64, 2).unwrap_or_default();
        format!("{}{}", self.code.code(), count)
    }

    pub fn qb64b(&self) -> Vec<u8> {
        self.qb64().into_bytes()
    }

    pub fn qb2(&self) -> Vec<u8> {
        b64::decode(self.qb64().as_bytes()).unwrap_or_default()
    }

    pub fn from_qb64b(bytes: &[u8]) -> Result<(Self, usize), CesrError> {
        if bytes.len() < 2 {
            return Err(CesrError::short(2, bytes.len()));
        }

        let code_text = String::from_utf8_lossy(&bytes[..2]).to_string();
        let code = CounterCode::from_code(&code_text).ok_or(CesrError::UnknownCode(code_text))?;

        if bytes.len() < COUNTER_SIZE {
            return Err(CesrError::short(COUNTER_SIZE, bytes.len()));
        }

        let count = b64::b64_to_int(&bytes[2..COUNTER_SIZE])?;
        let counter = Counter::new(code, count as u32)?;
        Ok((counter, COUNTER_SIZE))
    }

    pub fn from_qb2(bytes: &[u8]) -> Result<(Self, usize), CesrError> {
        if bytes.len() < COUNTER_SIZE_BNY {
            return Err(CesrError::short(COUNTER_SIZE_BNY, bytes.len()));
        }

        let text = b64::encode(&bytes[..COUNTER_SIZE_BNY]);
        let (counter, _) = Counter::from_qb64b(text.as_bytes())?;
        Ok((counter, COUNTER_SIZE_BNY))
    }

    pub fn extract(cursor: &mut Cursor<'_>, cold: Cold) -> Result<Self, CesrError> {
        let (counter, size) = match cold {
            Cold::Txt => Counter::from_qb64b(cursor.remaining())?,
            Cold::Bny => Counter::from_qb2(cursor.remaining())?,
            Cold::Msg => {
                return Err(CesrError::ColdStart(
                    "expected a counter, found a message".to_string(),
                ))
            }
        };

        cursor.advance(size);
        Ok(counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use table_test::table_test;

    #[test]
    fn test_qb64() {
        let table = vec![
            ((CounterCode::ControllerIdxSigs, 1), "-AAB"),
            ((CounterCode::TransIndexedSigGroups, 1), "-FAB"),
            ((CounterCode::AttachedMaterialQuadlets, 64), "-VBA"),
            ((CounterCode::MaterialQuadlets, MAX_COUNT), "-Z__"),
        ];

        for (validator, input, expected) in table_test!(table) {
            let counter = Counter::new(input.0, input.1).unwrap();

            validator
                .given(&format!("{:?}", input))
                .when("encode counter")
                .then("qb64 matches")
                .assert_eq(expected.to_string(), counter.qb64());
        }
    }

    #[test]
    fn test_decode_text_and_binary() {
        let counter = Counter::new(CounterCode::AttachedMaterialQuadlets, 70).unwrap();

        let (decoded, size) = Counter::from_qb64b(&counter.qb64b()).unwrap();
        assert_eq!(size, 4);
        assert_eq!(decoded, counter);

        let qb2 = counter.qb2();
        assert_eq!(qb2.len(), 3);

        let (decoded, size) = Counter::from_qb2(&qb2).unwrap();
        assert_eq!(size, 3);
        assert_eq!(decoded.count(), 70);
    }

    #[test]
    fn test_count_overflow() {
        let counter = Counter::new(CounterCode::ControllerIdxSigs, 4096);
        assert!(counter.is_err())
    }

    #[test]
    fn test_unknown_and_short() {
        let unknown = Counter::from_qb64b(b"-QAB");
        assert!(matches!(unknown.unwrap_err(), CesrError::UnknownCode(_)));

        let short = Counter::from_qb64b(b"-A");
        assert_eq!(short.unwrap_err(), CesrError::short(4, 2));
    }

    #[test]
    fn test_extract_moves_cursor() {
        let bytes = b"-AABrest".to_vec();
        let mut cursor = Cursor::new(&bytes);

        let counter = Counter::extract(&mut cursor, Cold::Txt).unwrap();
        assert_eq!(counter.code(), CounterCode::ControllerIdxSigs);
        assert_eq!(cursor.remaining(), b"rest");
    }
}

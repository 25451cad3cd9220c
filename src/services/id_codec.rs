/*
 * Responsibility
 * - Public content id <-> internal id (sqids)
 * - Internal ids never leave the process; handlers only see the encoded form
 * - A string that does not decode to exactly one id is "no such item", not an error
 */
use sqids::Sqids;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdCodecError {
    #[error("SQIDS_MIN_LENGTH must be between 0 and 255, got {value}")]
    InvalidMinLength { value: usize },
    #[error("sqids error: {0}")]
    Sqids(#[from] sqids::Error),
    #[error("id must be non-negative, got {value}")]
    NegativeId { value: i64 },
}

#[derive(Clone, Debug)]
pub struct IdCodec {
    sqids: Sqids,
}

impl IdCodec {
    pub fn new(min_length: usize, alphabet: &str) -> Result<Self, IdCodecError> {
        let min_length: u8 = min_length
            .try_into()
            .map_err(|_| IdCodecError::InvalidMinLength { value: min_length })?;

        let sqids = Sqids::builder()
            .min_length(min_length)
            .alphabet(alphabet.chars().collect())
            .build()?;

        Ok(Self { sqids })
    }

    pub fn encode(&self, id: i64) -> Result<String, IdCodecError> {
        let n = u64::try_from(id).map_err(|_| IdCodecError::NegativeId { value: id })?;
        Ok(self.sqids.encode(&[n])?)
    }

    pub fn decode(&self, public_id: &str) -> Option<i64> {
        let nums = self.sqids.decode(public_id);
        let [n] = nums.as_slice() else {
            return None;
        };
        let id = i64::try_from(*n).ok()?;

        // Reject non-canonical spellings so one item has exactly one public id.
        match self.sqids.encode(&[*n]) {
            Ok(canonical) if canonical == public_id => Some(id),
            _ => None,
        }
    }

    pub fn encode_all(&self, ids: &[i64]) -> Result<Vec<String>, IdCodecError> {
        ids.iter().map(|id| self.encode(*id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    fn codec() -> IdCodec {
        IdCodec::new(10, ALPHABET).unwrap()
    }

    #[test]
    fn encoded_ids_decode_back() {
        let codec = codec();
        let public = codec.encode(42).unwrap();

        assert!(public.len() >= 10);
        assert_eq!(codec.decode(&public), Some(42));
    }

    #[test]
    fn garbage_does_not_decode() {
        let codec = codec();
        assert_eq!(codec.decode(""), None);
        assert_eq!(codec.decode("!!!"), None);
    }

    #[test]
    fn negative_ids_and_bad_config_are_errors() {
        assert!(matches!(codec().encode(-1), Err(IdCodecError::NegativeId { value: -1 })));
        assert!(matches!(
            IdCodec::new(300, ALPHABET),
            Err(IdCodecError::InvalidMinLength { value: 300 })
        ));
    }
}

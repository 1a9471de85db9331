use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compare a presented shared secret with the configured one in constant time
///
/// Both values are MACed under the expected secret and the tags compared with
/// `verify_slice`, so timing does not depend on where the inputs differ or on
/// the presented length.
pub fn secrets_match(expected: &str, presented: &str) -> bool {
    let Ok(mut reference) = HmacSha256::new_from_slice(expected.as_bytes()) else {
        return false;
    };
    reference.update(expected.as_bytes());
    let expected_tag = reference.finalize().into_bytes();

    let Ok(mut mac) = HmacSha256::new_from_slice(expected.as_bytes()) else {
        return false;
    };
    mac.update(presented.as_bytes());
    mac.verify_slice(&expected_tag).is_ok()
}

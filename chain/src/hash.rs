//! Hash digests identifying transactions and blocks.

/// 32-byte identifier produced by hashing a transaction or block header.
pub type HashDigest = [u8; blake3::OUT_LEN];

/// All-zero sentinel meaning "no stop hash / unspecified".
pub const NULL_HASH: HashDigest = [0u8; blake3::OUT_LEN];

/// Renders the first 8 bytes of a hash for log output.
pub fn short_hash(hash: &HashDigest) -> String {
    hex::encode(&hash[..8])
}

use std::hash::Hasher;

use fnv::FnvHasher;

/// 64-bit FNV-1a digest of `bytes`.
///
/// Used as a cheap identity tag, never as a cryptographic commitment.
pub fn fingerprint(bytes: &[u8]) -> u64 {
    let mut hasher: FnvHasher = FnvHasher::default();
    hasher.write(bytes);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::fingerprint;

    #[test]
    fn fingerprint_is_stable_and_discriminating() {
        assert_eq!(fingerprint(b"ou"), fingerprint(b"ou"));
        assert_ne!(fingerprint(b"ou"), fingerprint(b"elgamal"));
        // FNV-1a offset basis for the empty input.
        assert_eq!(fingerprint(b""), 0xcbf29ce484222325);
    }
}

//! Detection of leading encoding signatures (byte-order marks and friends).

/// Signature of the BOCU-1 encoding; may carry a fourth trailing `0xFF`.
const BOCU_1: &[u8] = &[0xFB, 0xEE, 0x28];

/// Known encoding signatures, longest first so that a four-byte signature
/// wins over a two-byte prefix of itself (UTF-32 LE vs. UTF-16 LE).
const SIGNATURES: &[&[u8]] = &[
    &[0x00, 0x00, 0xFE, 0xFF], // UTF-32 BE
    &[0xFF, 0xFE, 0x00, 0x00], // UTF-32 LE
    &[0xDD, 0x73, 0x66, 0x73], // UTF-EBCDIC
    &[0x84, 0x31, 0x95, 0x33], // GB-18030
    &[0x2B, 0x2F, 0x76, 0x38], // UTF-7
    &[0x2B, 0x2F, 0x76, 0x39], // UTF-7
    &[0x2B, 0x2F, 0x76, 0x2B], // UTF-7
    &[0x2B, 0x2F, 0x76, 0x2F], // UTF-7
    &[0xEF, 0xBB, 0xBF],       // UTF-8
    &[0xF7, 0x64, 0x4C],       // UTF-1
    &[0x0E, 0xFE, 0xFF],       // SCSU
    BOCU_1,                    // BOCU-1
    &[0xFE, 0xFF],             // UTF-16 BE
    &[0xFF, 0xFE],             // UTF-16 LE
];

/// Returns how many leading bytes of `bytes` form a known encoding
/// signature, or 0 when none matches. Pure and infallible; short or empty
/// input simply reports 0.
pub fn signature_length(bytes: &[u8]) -> usize {
    for signature in SIGNATURES {
        if bytes.starts_with(signature) {
            if *signature == BOCU_1 && bytes.get(3) == Some(&0xFF) {
                return 4;
            }
            return signature.len();
        }
    }
    0
}

use chrono::Utc;
use password_hash::rand_core::{OsRng, RngCore};

/// Length of the random suffix in an order reference.
pub const SUFFIX_LEN: usize = 6;

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Mint a globally unique order reference: `<PREFIX>-<unix millis>-<6
/// uppercase base36 chars>`. Payment initiation mints a fresh one on every
/// call, so retried initiations never reuse a gateway reference.
pub fn new_order_reference(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = encode_base36(OsRng.next_u64(), SUFFIX_LEN);
    format!("{prefix}-{millis}-{suffix}")
}

/// Encode the low digits of `value` as fixed-width uppercase base36.
pub fn encode_base36(mut value: u64, width: usize) -> String {
    let mut out = vec![b'0'; width];
    for slot in out.iter_mut().rev() {
        *slot = BASE36[(value % 36) as usize];
        value /= 36;
    }
    out.into_iter().map(char::from).collect()
}

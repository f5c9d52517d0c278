//! Wallet address validation and extraction.
//!
//! Solana addresses are base58-encoded ed25519 public keys. The encoding uses
//! the Bitcoin base58 alphabet (no `0`, `O`, `I`, `l`) and produces 32-44
//! characters for a 32-byte key. Validation here is purely syntactic; whether
//! the account exists on chain is the RPC layer's problem.

pub const MIN_ADDRESS_LEN: usize = 32;
pub const MAX_ADDRESS_LEN: usize = 44;

/// Whether a character belongs to the base58 alphabet.
pub fn is_base58_char(c: char) -> bool {
    c.is_ascii_alphanumeric() && !matches!(c, '0' | 'O' | 'I' | 'l')
}

/// Whether a string is a plausible Solana wallet address.
pub fn is_valid_address(s: &str) -> bool {
    (MIN_ADDRESS_LEN..=MAX_ADDRESS_LEN).contains(&s.len()) && s.chars().all(is_base58_char)
}

/// Extract the first plausible wallet address from free text.
///
/// Scans maximal base58 runs and returns the first one of address length.
/// A run longer than 44 characters is not an address and is skipped whole.
pub fn extract_address(text: &str) -> Option<&str> {
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if is_base58_char(c) {
            if start.is_none() {
                start = Some(i);
            }
        } else if let Some(s) = start.take() {
            if is_valid_address(&text[s..i]) {
                return Some(&text[s..i]);
            }
        }
    }

    if let Some(s) = start {
        if is_valid_address(&text[s..]) {
            return Some(&text[s..]);
        }
    }

    None
}

/// Shorten an address for display: `7pQHLgaT...AvYLHsSX` style.
///
/// Addresses shorter than 16 characters are returned unchanged.
pub fn shorten(address: &str) -> String {
    if address.len() <= 16 {
        return address.to_string();
    }
    format!("{}...{}", &address[..8], &address[address.len() - 8..])
}

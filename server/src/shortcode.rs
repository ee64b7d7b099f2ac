use rand::Rng;

pub const CODE_LENGTH: usize = 6;

/// Generation attempts before giving up on finding an unused code.
pub const MAX_ATTEMPTS: usize = 10;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a random alphanumeric string of the given length.
pub fn random_code<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Draw codes from `generate` until one is not `taken`, up to `MAX_ATTEMPTS` times.
pub fn unused_code(
    mut generate: impl FnMut() -> String,
    taken: impl Fn(&str) -> bool,
) -> Option<String> {
    for _ in 0..MAX_ATTEMPTS {
        let code = generate();
        if !taken(&code) {
            return Some(code);
        }
        tracing::debug!("Short code '{}' already in use, retrying", code);
    }
    None
}

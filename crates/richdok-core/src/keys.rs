//! Block key generation
//!
//! Every compiled block carries an opaque key that must not collide with any
//! other key issued by the same generator. Random keys are unique across the
//! whole process, so blocks from separately compiled documents can be mixed.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, OnceLock, PoisonError};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque block identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockKey(String);

impl BlockKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of fresh block keys
pub trait KeyGenerator {
    /// Produce a key never returned before by this generator
    fn next_key(&mut self) -> BlockKey;
}

impl<G: KeyGenerator + ?Sized> KeyGenerator for Box<G> {
    fn next_key(&mut self) -> BlockKey {
        (**self).next_key()
    }
}

/// Key space: 2^25, i.e. at most five base-32 digits
const RANDOM_KEY_SPACE: u32 = 1 << 25;
const BASE32_DIGITS: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";

/// Random keys issued so far by any [`RandomKeys`] in this process
static SEEN_KEYS: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();

/// Short random keys in base 32, re-drawn on collision
///
/// The set of issued keys is shared by every instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomKeys;

impl RandomKeys {
    pub fn new() -> Self {
        Self
    }

    fn draw() -> String {
        let n = (Uuid::new_v4().as_u128() % RANDOM_KEY_SPACE as u128) as u32;
        to_base32(n)
    }
}

impl KeyGenerator for RandomKeys {
    fn next_key(&mut self) -> BlockKey {
        let mut seen = SEEN_KEYS
            .get_or_init(Default::default)
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        loop {
            let key = Self::draw();
            if seen.insert(key.clone()) {
                return BlockKey(key);
            }
        }
    }
}

/// Deterministic `prefix` + counter keys
#[derive(Debug, Clone)]
pub struct SequentialKeys {
    prefix: String,
    next: u64,
}

impl SequentialKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl Default for SequentialKeys {
    fn default() -> Self {
        Self::new("b")
    }
}

impl KeyGenerator for SequentialKeys {
    fn next_key(&mut self) -> BlockKey {
        let key = BlockKey(format!("{}{}", self.prefix, self.next));
        self.next += 1;
        key
    }
}

fn to_base32(mut n: u32) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE32_DIGITS[(n % 32) as usize]);
        n /= 32;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

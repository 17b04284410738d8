use std::collections::HashMap;
use std::io::{Read, Write};
use std::sync::Mutex;

use crate::error::WordDetectorError;

/// Thread-safe token -> dense id mapping. `getOrAdd`/`getOrAddMany` are the hot
/// path and are serialized behind a single mutex, matching the source's
/// `WordDictionary`: batched inserts amortize lock contention across a document's
/// tokens.
#[derive(Debug, Default)]
pub struct TokenDictionary {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    word2id: HashMap<String, u32>,
    id2word: Vec<String>,
}

impl TokenDictionary {
    pub fn new() -> Self {
        TokenDictionary::default()
    }

    pub fn get_or_add(&self, token: &str) -> u32 {
        let mut inner = self.inner.lock().expect("dictionary mutex poisoned");
        Self::get_or_add_locked(&mut inner, token)
    }

    /// Batches a whole document's tokens under one lock acquisition.
    pub fn get_or_add_many<'a, I>(&self, tokens: I) -> Vec<u32>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut inner = self.inner.lock().expect("dictionary mutex poisoned");
        tokens
            .into_iter()
            .map(|token| Self::get_or_add_locked(&mut inner, token))
            .collect()
    }

    fn get_or_add_locked(inner: &mut Inner, token: &str) -> u32 {
        if let Some(&id) = inner.word2id.get(token) {
            return id;
        }
        let id = inner.id2word.len() as u32;
        inner.id2word.push(token.to_string());
        inner.word2id.insert(token.to_string(), id);
        id
    }

    pub fn get(&self, token: &str) -> Option<u32> {
        let inner = self.inner.lock().expect("dictionary mutex poisoned");
        inner.word2id.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("dictionary mutex poisoned").id2word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn str_of(&self, id: u32) -> String {
        self.inner.lock().expect("dictionary mutex poisoned").id2word[id as usize].clone()
    }

    /// Binary framing: `u32 vocab_size` (little-endian) followed by
    /// `vocab_size` records of `u32 length` + `length` bytes.
    pub fn write_to<W: Write>(&self, mut out: W) -> Result<(), WordDetectorError> {
        let inner = self.inner.lock().expect("dictionary mutex poisoned");
        out.write_all(&(inner.id2word.len() as u32).to_le_bytes())?;
        for word in &inner.id2word {
            let bytes = word.as_bytes();
            out.write_all(&(bytes.len() as u32).to_le_bytes())?;
            out.write_all(bytes)?;
        }
        Ok(())
    }

    pub fn read_from<R: Read>(mut input: R) -> Result<Self, WordDetectorError> {
        let mut len_buf = [0u8; 4];
        input.read_exact(&mut len_buf)?;
        let vocab = u32::from_le_bytes(len_buf) as usize;

        let mut id2word = Vec::with_capacity(vocab);
        let mut word2id = HashMap::with_capacity(vocab);
        for id in 0..vocab {
            input.read_exact(&mut len_buf)?;
            let str_len = u32::from_le_bytes(len_buf) as usize;
            let mut bytes = vec![0u8; str_len];
            input.read_exact(&mut bytes)?;
            let word = String::from_utf8(bytes)
                .map_err(|e| WordDetectorError::Reader(e.to_string()))?;
            word2id.insert(word.clone(), id as u32);
            id2word.push(word);
        }
        Ok(TokenDictionary {
            inner: Mutex::new(Inner { word2id, id2word }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn get_or_add_is_idempotent() {
        let dict = TokenDictionary::new();
        let a = dict.get_or_add("a");
        let a_again = dict.get_or_add("a");
        let b = dict.get_or_add("b");
        assert_eq!(a, a_again);
        assert_ne!(a, b);
    }

    #[test]
    fn dictionary_bijection_holds() {
        let dict = TokenDictionary::new();
        let ids = dict.get_or_add_many(["a", "b", "c", "a", "b"]);
        assert_eq!(ids, vec![0, 1, 2, 0, 1]);
        for (i, expected) in ["a", "b", "c"].iter().enumerate() {
            assert_eq!(dict.str_of(i as u32), *expected);
            assert_eq!(dict.get(expected), Some(i as u32));
        }
    }

    #[test]
    fn concurrent_inserts_stay_consistent() {
        let dict = Arc::new(TokenDictionary::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let dict = Arc::clone(&dict);
            handles.push(thread::spawn(move || {
                dict.get_or_add_many(["x", "y", "z"]);
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(dict.len(), 3);
        let x = dict.get("x").unwrap();
        let y = dict.get("y").unwrap();
        let z = dict.get("z").unwrap();
        assert_eq!(dict.str_of(x), "x");
        assert_eq!(dict.str_of(y), "y");
        assert_eq!(dict.str_of(z), "z");
    }

    #[test]
    fn round_trip_preserves_lookups() {
        let dict = TokenDictionary::new();
        dict.get_or_add_many(["alpha", "beta", "gamma"]);

        let mut buf = Vec::new();
        dict.write_to(&mut buf).unwrap();

        let reloaded = TokenDictionary::read_from(Cursor::new(buf)).unwrap();
        assert_eq!(reloaded.get("alpha"), dict.get("alpha"));
        assert_eq!(reloaded.get("beta"), dict.get("beta"));
        assert_eq!(reloaded.get("gamma"), dict.get("gamma"));
        assert_eq!(reloaded.get("delta"), None);
        assert_eq!(reloaded.len(), dict.len());
    }
}

//! SMILES tokenization for the sequence model.
//!
//! Greedy longest-match against a vocabulary file: multi-character tokens
//! (`Cl`, `Br`, `[nH]`, ring-closure escapes) win over their single-char
//! prefixes. Characters outside the vocabulary map to `[UNK]` so encoding
//! is total over arbitrary input strings.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{EmbedError, Result};

pub const PAD_TOKEN: &str = "[PAD]";
pub const UNK_TOKEN: &str = "[UNK]";
pub const BOS_TOKEN: &str = "[BOS]";
pub const EOS_TOKEN: &str = "[EOS]";

pub const PAD_ID: usize = 0;
pub const UNK_ID: usize = 1;
pub const BOS_ID: usize = 2;
pub const EOS_ID: usize = 3;

#[derive(Debug, Clone)]
pub struct SmilesTokenizer {
    vocab: HashMap<String, usize>,
    max_token_len: usize,
}

impl SmilesTokenizer {
    /// Build from a vocabulary token list. The four specials are prepended
    /// with fixed ids; file tokens follow in order.
    pub fn from_tokens(tokens: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut vocab = HashMap::new();
        for (id, special) in [PAD_TOKEN, UNK_TOKEN, BOS_TOKEN, EOS_TOKEN]
            .iter()
            .enumerate()
        {
            vocab.insert(special.to_string(), id);
        }
        for token in tokens {
            let token = token.trim().to_string();
            if token.is_empty() || vocab.contains_key(&token) {
                continue;
            }
            let id = vocab.len();
            vocab.insert(token, id);
        }
        if vocab.len() <= 4 {
            return Err(EmbedError::Vocabulary("no tokens beyond specials".into()));
        }
        let max_token_len = vocab.keys().map(|t| t.chars().count()).max().unwrap_or(1);
        Ok(SmilesTokenizer {
            vocab,
            max_token_len,
        })
    }

    /// Load a vocabulary file, one token per line.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| EmbedError::Vocabulary(format!("{}: {e}", path.display())))?;
        Self::from_tokens(content.lines().map(|l| l.to_string()))
    }

    /// Number of entries including specials.
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    /// Encode a SMILES string to `[BOS] tokens [EOS]`, truncated to
    /// `max_len` ids. Deterministic: same input, same ids.
    pub fn encode(&self, smiles: &str, max_len: usize) -> Vec<usize> {
        let chars: Vec<char> = smiles.chars().collect();
        let mut ids = Vec::with_capacity(chars.len().min(max_len) + 2);
        ids.push(BOS_ID);

        let mut pos = 0;
        while pos < chars.len() && ids.len() + 1 < max_len {
            let longest = self.max_token_len.min(chars.len() - pos);
            let mut matched = None;
            for len in (1..=longest).rev() {
                let candidate: String = chars[pos..pos + len].iter().collect();
                if let Some(&id) = self.vocab.get(&candidate) {
                    matched = Some((id, len));
                    break;
                }
            }
            match matched {
                Some((id, len)) => {
                    ids.push(id);
                    pos += len;
                }
                None => {
                    ids.push(UNK_ID);
                    pos += 1;
                }
            }
        }

        ids.push(EOS_ID);
        ids
    }
}

/// A practical default SMILES vocabulary: organic-subset atoms, aromatic
/// atoms, common bracket atoms, bonds, branches, and ring-closure digits.
/// Used when creating a fresh bundle; shipped models carry their own file.
pub fn default_smiles_vocab() -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for t in [
        "C", "N", "O", "S", "P", "F", "I", "B", "Cl", "Br", "c", "n", "o", "s", "p", "b",
        "[nH]", "[NH+]", "[NH2+]", "[NH3+]", "[N+]", "[N-]", "[O-]", "[OH+]", "[S-]", "[S+]",
        "[Na]", "[K]", "[Li]", "[Ca]", "[Fe]", "[Zn]", "[C@H]", "[C@@H]", "[C@]", "[C@@]",
        "[Si]", "[Se]", "[se]", "[As]",
        "(", ")", "=", "#", "-", "+", "/", "\\", ".", ":", "@", "[", "]", "%",
    ] {
        tokens.push(t.to_string());
    }
    for digit in 0..=9 {
        tokens.push(digit.to_string());
    }
    tokens
}

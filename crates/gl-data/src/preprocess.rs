//! Corpus preprocessing: punctuation token substitution, lookup-table
//! construction, integer encoding, and the on-disk cache artifact that lets
//! repeated search runs skip this step.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use gl_types::{DataError, TuneResult, Vocabulary};

/// Everything the search needs from the corpus, computed once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprocessed {
    /// The corpus encoded as token ids.
    pub int_text: Vec<u32>,
    pub vocab: Vocabulary,
    /// Punctuation substitutions applied during tokenization.
    pub token_dict: HashMap<String, String>,
}

/// Punctuation symbols replaced with standalone tokens so they don't fuse
/// with adjacent words ("shakin?" vs "shakin").
pub fn token_lookup() -> HashMap<String, String> {
    [
        (".", "||Period||"),
        (",", "||Comma||"),
        ("\"", "||Quotation_Mark||"),
        (";", "||Semicolon||"),
        ("!", "||Exclamation_Mark||"),
        ("?", "||Question_Mark||"),
        ("(", "||Left_Parentheses||"),
        (")", "||Right_Parentheses||"),
        ("--", "||Dash||"),
        ("\n", "||Return||"),
    ]
    .into_iter()
    .map(|(symbol, token)| (symbol.to_string(), token.to_string()))
    .collect()
}

/// Tokenize and encode `text`.
///
/// Tokens are ranked by descending frequency (ties broken alphabetically)
/// so ids are deterministic for a given corpus.
pub fn preprocess(text: &str) -> Preprocessed {
    let token_dict = token_lookup();

    let mut substituted = text.to_string();
    // Replace the dash first so "--" doesn't survive as two hyphens.
    let mut symbols: Vec<&String> = token_dict.keys().collect();
    symbols.sort_by_key(|s| std::cmp::Reverse(s.len()));
    for symbol in symbols {
        let spaced = format!(" {} ", token_dict[symbol]);
        substituted = substituted.replace(symbol, &spaced);
    }

    let tokens: Vec<String> = substituted
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in &tokens {
        *counts.entry(token).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut index: HashMap<&str, u32> = HashMap::new();
    for (id, (token, _)) in ranked.iter().enumerate() {
        index.insert(token, id as u32);
    }

    let int_text: Vec<u32> = tokens.iter().map(|t| index[t.as_str()]).collect();
    let vocab =
        Vocabulary::from_ordered_tokens(ranked.into_iter().map(|(t, _)| t.to_string()));

    tracing::info!(
        "Preprocessed corpus: {} tokens, vocabulary of {}",
        int_text.len(),
        vocab.len()
    );

    Preprocessed {
        int_text,
        vocab,
        token_dict,
    }
}

/// Load the preprocessing artifact from `cache_path`, or build it from
/// `text` and persist it for the next run.
pub fn preprocess_or_load<P: AsRef<Path>>(text: &str, cache_path: P) -> TuneResult<Preprocessed> {
    let cache_path = cache_path.as_ref();

    if cache_path.exists() {
        tracing::info!("Reusing preprocess cache: {}", cache_path.display());
        let raw = fs::read_to_string(cache_path)?;
        let cached: Preprocessed =
            serde_json::from_str(&raw).map_err(|e| DataError::CacheCorrupted {
                message: format!("{}: {e}", cache_path.display()),
            })?;
        return Ok(cached);
    }

    let processed = preprocess(text);
    fs::write(cache_path, serde_json::to_string(&processed)?)?;
    tracing::info!("Wrote preprocess cache: {}", cache_path.display());
    Ok(processed)
}

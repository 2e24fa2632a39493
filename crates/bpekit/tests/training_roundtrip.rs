//! End-to-end training, round-trip, and persistence checks.

use bpekit::{Tokenizer, TokenizerOptions};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Deterministic pseudo-random corpus with multi-byte characters mixed in.
fn random_corpus(
    seed: u64,
    chars: usize,
) -> String {
    const ALPHABET: &[char] = &[
        'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q',
        'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', ' ', ' ', ' ', ',', '.', '!', '?', '\n',
        '\t', 'é', 'ü', 'ß', '中', '文', '🦀',
    ];

    let mut rng = StdRng::seed_from_u64(seed);
    (0..chars)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())])
        .collect()
}

fn char_boundaries(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain([text.len()])
        .collect()
}

#[test]
fn test_random_corpus_round_trip() {
    let corpus = random_corpus(0x5EED, 16 * 1024);
    let tokenizer: Tokenizer<u32> =
        Tokenizer::train_from_texts([corpus.as_str()], TokenizerOptions::new(512)).unwrap();

    // The whole corpus survives a round trip.
    let tokens = tokenizer.encode_text(&corpus).unwrap();
    assert_eq!(tokenizer.decode(&tokens).unwrap(), corpus);

    // And so do random substrings, including ones the trainer never saw
    // as block-aligned units.
    let boundaries = char_boundaries(&corpus);
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..1000 {
        let i = rng.random_range(0..boundaries.len());
        let j = rng.random_range(0..boundaries.len());
        let (lo, hi) = (boundaries[i.min(j)], boundaries[i.max(j)]);
        let substring = &corpus[lo..hi];

        let tokens = tokenizer.encode_text(substring).unwrap();
        assert_eq!(tokenizer.decode(&tokens).unwrap(), substring);
    }
}

#[test]
fn test_training_is_deterministic_across_runs() {
    let corpus = random_corpus(99, 8 * 1024);
    let docs: Vec<&str> = corpus.split('\n').collect();

    let first: Tokenizer<u32> =
        Tokenizer::train_from_texts(&docs, TokenizerOptions::new(400)).unwrap();
    let second: Tokenizer<u32> =
        Tokenizer::train_from_texts(&docs, TokenizerOptions::new(400)).unwrap();

    assert_eq!(first.merges().rules(), second.merges().rules());
}

#[test]
fn test_rules_are_referentially_closed() {
    let corpus = random_corpus(3, 8 * 1024);
    let tokenizer: Tokenizer<u32> =
        Tokenizer::train_from_texts([corpus.as_str()], TokenizerOptions::new(384)).unwrap();

    for (i, &(a, b)) in tokenizer.merges().rules().iter().enumerate() {
        let limit = 256 + i as u32;
        assert!(a < limit, "rule {i}: parent {a} out of range");
        assert!(b < limit, "rule {i}: parent {b} out of range");
    }
}

#[test]
fn test_save_load_re_encode() {
    let corpus = random_corpus(21, 8 * 1024);
    let docs: Vec<&str> = corpus.split(' ').collect();

    let trained: Tokenizer<u32> =
        Tokenizer::train_from_texts(&docs, TokenizerOptions::new(384)).unwrap();

    let dir = tempdir::TempDir::new("bpekit_tokenizer").unwrap();
    let path = dir.path().join("tokenizer.bin");

    trained.save(&path).unwrap();
    let loaded: Tokenizer<u32> = Tokenizer::load(&path).unwrap();

    assert_eq!(loaded.merges().rules(), trained.merges().rules());
    for doc in &docs {
        assert_eq!(
            loaded.encode_text(doc).unwrap(),
            trained.encode_text(doc).unwrap(),
        );
    }
}

#[test]
fn test_load_into_narrower_token_type() {
    let trained: Tokenizer<u32> = Tokenizer::train_from_texts(
        ["the heat the salt the heat"],
        TokenizerOptions::new(300),
    )
    .unwrap();

    let dir = tempdir::TempDir::new("bpekit_tokenizer").unwrap();
    let path = dir.path().join("tokenizer.bin");
    trained.save(&path).unwrap();

    // Small vocabularies load into u16 for 16-bit shard pipelines.
    let narrow: Tokenizer<u16> = Tokenizer::load(&path).unwrap();
    assert_eq!(narrow.vocab_size(), trained.vocab_size());

    let text = "the heat";
    let wide = trained.encode_text(text).unwrap();
    let tokens = narrow.encode_text(text).unwrap();
    assert_eq!(
        tokens.iter().map(|&t| t as u32).collect::<Vec<_>>(),
        wide,
    );
}

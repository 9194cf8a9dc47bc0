//! Stopword-filtered keyword extraction.

use std::collections::HashSet;

/// Words that never carry search intent on their own.
const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "an", "and", "any", "are", "as", "at", "be", "been", "but", "by",
    "can", "could", "did", "do", "does", "for", "from", "get", "give", "good", "great", "had",
    "has", "have", "hello", "hey", "hi", "how", "i", "i'd", "i'm", "if", "in", "into", "is", "it",
    "its", "just", "like", "looking", "me", "more", "my", "need", "of", "on", "one", "or",
    "other", "please", "recommend", "recommendation", "recommendations", "set", "should",
    "show", "shows", "similar", "so", "some", "something", "suggest", "that", "the", "their",
    "them", "there", "these", "they", "thing", "things", "this", "to", "tonight", "up", "us",
    "want", "was", "watch", "we", "what", "when", "where", "which", "who", "with", "would",
    "you", "film", "films", "movie", "movies", "series", "there's", "find", "anything",
];

/// Distil search keywords from free text.
///
/// Lowercases, splits on anything that is not alphanumeric or an apostrophe,
/// drops stopwords and single characters, de-duplicates while keeping first
/// occurrence order, and stops after `max` keywords.
pub fn extract_keywords(text: &str, max: usize) -> Vec<String> {
    let stopwords: HashSet<&str> = STOPWORDS.iter().copied().collect();
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();

    for raw in text.split(|c: char| !(c.is_alphanumeric() || c == '\'')) {
        if keywords.len() >= max {
            break;
        }
        let word = raw.trim_matches('\'').to_lowercase();
        if word.chars().count() < 2 || stopwords.contains(word.as_str()) {
            continue;
        }
        if seen.insert(word.clone()) {
            keywords.push(word);
        }
    }

    keywords
}

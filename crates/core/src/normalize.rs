/// Tokens shorter than this take no part in lexical scoring.
pub const MIN_SCORING_TOKEN_CHARS: usize = 3;

/// Lowercases `text`, turns punctuation into spaces and collapses whitespace runs.
pub fn normalize(text: &str) -> String {
    let replaced: String = text
        .to_lowercase()
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch == '_' || ch.is_whitespace() {
                ch
            } else {
                ' '
            }
        })
        .collect();

    normalize_whitespace(&replaced)
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tokens long enough to count towards a relevance score.
pub fn scoring_tokens(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|token| token.chars().count() >= MIN_SCORING_TOKEN_CHARS)
        .collect()
}

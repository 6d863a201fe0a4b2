use std::collections::BTreeSet;

pub type TokenSet = BTreeSet<String>;

/// Lower-cases `text` and splits it into the set of maximal ASCII
/// alphanumeric runs. Everything else, including non-ASCII letters, acts as
/// a separator. No stemming, no stop words.
pub fn normalize(text: &str) -> TokenSet {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
fn join_tokens(tokens: &TokenSet) -> String {
    tokens.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
}

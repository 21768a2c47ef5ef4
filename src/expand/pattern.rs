//! Glob patterns used by the `#`, `##`, `%` and `%%` parameter operators.

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Char(char),
    Any,
    Star,
    Class { negated: bool, items: Vec<(char, char)> },
}

impl Token {
    fn accepts(&self, c: char) -> bool {
        match self {
            Token::Char(expected) => *expected == c,
            Token::Any => true,
            Token::Star => false,
            Token::Class { negated, items } => {
                items.iter().any(|&(lo, hi)| lo <= c && c <= hi) != *negated
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Pattern {
    tokens: Vec<Token>,
}

impl Pattern {
    pub fn new(pattern: &str) -> Self {
        let chars: Vec<char> = pattern.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            match chars[i] {
                '\\' if i + 1 < chars.len() => {
                    tokens.push(Token::Char(chars[i + 1]));
                    i += 2;
                }
                '?' => {
                    tokens.push(Token::Any);
                    i += 1;
                }
                '*' => {
                    if tokens.last() != Some(&Token::Star) {
                        tokens.push(Token::Star);
                    }
                    i += 1;
                }
                '[' => match parse_class(&chars[i + 1..]) {
                    Some((token, consumed)) => {
                        tokens.push(token);
                        i += consumed + 1;
                    }
                    None => {
                        tokens.push(Token::Char('['));
                        i += 1;
                    }
                },
                c => {
                    tokens.push(Token::Char(c));
                    i += 1;
                }
            }
        }
        Self { tokens }
    }

    pub fn matches(&self, text: &[char]) -> bool {
        let tokens = &self.tokens;
        let (mut t, mut s) = (0, 0);
        let mut backtrack: Option<(usize, usize)> = None;

        while s < text.len() {
            if t < tokens.len() && tokens[t] == Token::Star {
                backtrack = Some((t, s));
                t += 1;
            } else if t < tokens.len() && tokens[t].accepts(text[s]) {
                t += 1;
                s += 1;
            } else if let Some((star, from)) = backtrack {
                t = star + 1;
                s = from + 1;
                backtrack = Some((star, from + 1));
            } else {
                return false;
            }
        }
        tokens[t..].iter().all(|token| *token == Token::Star)
    }

    /// Removes the shortest (or longest) matching prefix from `value`.
    pub fn trim_prefix(&self, value: &str, longest: bool) -> String {
        let chars: Vec<char> = value.chars().collect();
        let mut ends: Box<dyn Iterator<Item = usize>> =
            if longest { Box::new((0..=chars.len()).rev()) } else { Box::new(0..=chars.len()) };
        match ends.find(|&end| self.matches(&chars[..end])) {
            Some(end) => chars[end..].iter().collect(),
            None => value.to_string(),
        }
    }

    /// Removes the shortest (or longest) matching suffix from `value`.
    pub fn trim_suffix(&self, value: &str, longest: bool) -> String {
        let chars: Vec<char> = value.chars().collect();
        let mut starts: Box<dyn Iterator<Item = usize>> =
            if longest { Box::new(0..=chars.len()) } else { Box::new((0..=chars.len()).rev()) };
        match starts.find(|&start| self.matches(&chars[start..])) {
            Some(start) => chars[..start].iter().collect(),
            None => value.to_string(),
        }
    }
}

/// Parses a bracket expression body (after `[`). Returns the token and the
/// number of chars consumed including the closing `]`.
fn parse_class(chars: &[char]) -> Option<(Token, usize)> {
    let mut i = 0;
    let negated = matches!(chars.first(), Some('!' | '^'));
    if negated {
        i += 1;
    }

    let mut items = Vec::new();
    let mut first = true;
    while i < chars.len() {
        let c = chars[i];
        if c == ']' && !first {
            return Some((Token::Class { negated, items }, i + 1));
        }
        first = false;
        if i + 2 < chars.len() && chars[i + 1] == '-' && chars[i + 2] != ']' {
            items.push((c, chars[i + 2]));
            i += 3;
        } else {
            items.push((c, c));
            i += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn is_match(pattern: &str, text: &str) -> bool {
        Pattern::new(pattern).matches(&text.chars().collect::<Vec<_>>())
    }

    #[test]
    fn test_matches() {
        assert!(is_match("*.yml", "eeditor.yml"));
        assert!(!is_match("*.yml", "eeditor.yaml"));
        assert!(is_match("v?m", "vim"));
        assert!(is_match("[nv]*", "nvim"));
        assert!(!is_match("[!nv]*", "nvim"));
        assert!(is_match("[a-c]x", "bx"));
        assert!(is_match("[]]", "]"));
        assert!(is_match("\\*", "*"));
        assert!(!is_match("\\*", "a"));
        assert!(is_match("[", "["));
        assert!(is_match("", ""));
        assert!(is_match("**", ""));
    }

    #[test]
    fn test_trim() {
        let path = "/usr/local/bin/nvim";
        assert_eq!(Pattern::new("*/").trim_prefix(path, false), "usr/local/bin/nvim");
        assert_eq!(Pattern::new("*/").trim_prefix(path, true), "nvim");
        assert_eq!(Pattern::new("/*").trim_suffix(path, false), "/usr/local/bin");
        assert_eq!(Pattern::new("/*").trim_suffix(path, true), "");
        assert_eq!(Pattern::new("x*").trim_prefix(path, true), path);
    }
}

/// Splits an input line into whitespace-separated tokens.
///
/// No quoting or escaping is recognized.
pub struct Lexer<'a> {
    line: &'a str,
    offset: usize,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            line,
            offset: 0,
            position: 0,
        }
    }

    pub fn scan_word(&mut self) -> Option<Token<'a>> {
        self.skip_whitespace();
        let start = self.offset;
        self.skip_until(char::is_whitespace);
        let end = self.offset;

        if start == end {
            return None;
        }

        self.position += 1;
        Some(Token {
            data: &self.line[start..end],
            position: self.position,
        })
    }

    pub fn skip_whitespace(&mut self) {
        self.skip_while(char::is_whitespace)
    }

    pub fn skip_until<P: Delimiter>(&mut self, mut p: P) {
        self.skip_while(|c| !p.delim(c));
    }

    pub fn skip_while<P: Delimiter>(&mut self, mut p: P) {
        let prev_offset = self.offset;
        for (offset, c) in self.line[self.offset..].char_indices() {
            if !p.delim(c) {
                self.offset = prev_offset + offset;
                return;
            }
        }
        self.offset = self.line.len();
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.scan_word()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub data: &'a str,
    /// 1-based index among all tokens of the line.
    pub position: usize,
}

impl Token<'_> {
    pub fn normalized(&self) -> String {
        normalize(self.data)
    }
}

pub trait Delimiter {
    fn delim(&mut self, c: char) -> bool;
}

impl<T: FnMut(char) -> bool> Delimiter for T {
    fn delim(&mut self, c: char) -> bool {
        (self)(c)
    }
}

pub fn tokenize(line: &str) -> Vec<Token<'_>> {
    Lexer::new(line).collect()
}

/// Strips surrounding punctuation and lowercases the token.
pub fn normalize(token: &str) -> String {
    token
        .trim_matches(|c: char| c.is_ascii_punctuation())
        .to_lowercase()
}

/// A source of recognized keyword names, keyed by normalized form.
pub trait KeywordSet {
    fn contains_keyword(&self, key: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub keyword: String,
    pub position: usize,
}

impl Occurrence {
    pub fn new<T: Into<String>>(keyword: T, position: usize) -> Self {
        Self {
            keyword: keyword.into(),
            position,
        }
    }
}

/// Collects every token matching either set, duplicates included, in input order.
pub fn scan(
    tokens: &[Token<'_>],
    catalog: &dyn KeywordSet,
    store: &dyn KeywordSet,
) -> Vec<Occurrence> {
    let mut occurrences = Vec::with_capacity(tokens.len());
    for token in tokens {
        let key = token.normalized();
        if key.is_empty() {
            continue;
        }
        if catalog.contains_keyword(&key) || store.contains_keyword(&key) {
            occurrences.push(Occurrence {
                keyword: key,
                position: token.position,
            });
        }
    }
    occurrences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog;

    struct Names(&'static [&'static str]);

    impl KeywordSet for Names {
        fn contains_keyword(&self, key: &str) -> bool {
            self.0.iter().any(|name| *name == key)
        }
    }

    #[test]
    fn tokens_keep_positions() {
        let tokens = tokenize("  if\tx   for ");
        let data = tokens.iter().map(|t| (t.data, t.position)).collect::<Vec<_>>();
        assert_eq!(data, [("if", 1), ("x", 2), ("for", 3)]);
    }

    #[test]
    fn blank_lines_have_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t  ").is_empty());
    }

    #[test]
    fn normalization_strips_punctuation() {
        assert_eq!(normalize("(While);"), "while");
        assert_eq!(normalize("static_cast<int>"), "static_cast<int");
        assert_eq!(normalize("\"INT\","), "int");
        assert_eq!(normalize("..."), "");
    }

    #[test]
    fn scans_in_token_order() {
        let tokens = tokenize("if x for");
        let occurrences = scan(&tokens, catalog(), &Names(&[]));
        assert_eq!(occurrences, [Occurrence::new("if", 1), Occurrence::new("for", 3)]);
    }

    #[test]
    fn scans_duplicates_and_custom_keywords() {
        let tokens = tokenize("greet int, -- INT greet!");
        let occurrences = scan(&tokens, catalog(), &Names(&["greet"]));
        assert_eq!(occurrences, [
            Occurrence::new("greet", 1),
            Occurrence::new("int", 2),
            Occurrence::new("int", 4),
            Occurrence::new("greet", 5),
        ]);
    }

    #[test]
    fn nothing_recognized() {
        let tokens = tokenize("hello world ;;");
        assert!(scan(&tokens, catalog(), &Names(&[])).is_empty());
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// LSP SymbolKind values
pub const SYMBOL_KIND_CLASS: u8 = 5;
pub const SYMBOL_KIND_FUNCTION: u8 = 12;

/// Zero-based line and character offset. `character` counts UTF-16 code
/// units, the LSP default position encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    fn on_line(line: usize, start: usize, end: usize) -> Self {
        Self {
            start: Position::new(line, start),
            end: Position::new(line, end),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub uri: String,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSymbol {
    pub name: String,
    pub kind: u8,
    pub range: Range,
    pub selection_range: Range,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l))
}

fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Index of the char covering a UTF-16 offset; an offset inside a surrogate
/// pair maps to that pair's char
fn char_index(line: &[char], utf16_offset: usize) -> Option<usize> {
    let mut units = 0;
    for (index, c) in line.iter().enumerate() {
        units += c.len_utf16();
        if utf16_offset < units {
            return Some(index);
        }
    }
    None
}

/// Identifier under `position`: letters, digits and `_`
pub fn word_at(text: &str, position: Position) -> Option<String> {
    let line: Vec<char> = lines(text).nth(position.line)?.chars().collect();
    let index = char_index(&line, position.character)?;
    if !is_word_char(line[index]) {
        return None;
    }
    let mut start = index;
    while start > 0 && is_word_char(line[start - 1]) {
        start -= 1;
    }
    let mut end = index;
    while end < line.len() && is_word_char(line[end]) {
        end += 1;
    }
    Some(line[start..end].iter().collect())
}

/// `class`, `def` and `async def` declarations, in document order
pub fn extract_symbols(text: &str) -> Vec<DocumentSymbol> {
    const DECLARATIONS: [(&str, u8); 3] = [
        ("class ", SYMBOL_KIND_CLASS),
        ("def ", SYMBOL_KIND_FUNCTION),
        ("async def ", SYMBOL_KIND_FUNCTION),
    ];

    let mut symbols = Vec::new();
    for (line_no, line) in lines(text).enumerate() {
        let trimmed = line.trim_start();
        let indent = utf16_len(line) - utf16_len(trimmed);
        let Some((keyword, kind)) = DECLARATIONS
            .iter()
            .find(|(keyword, _)| trimmed.starts_with(keyword))
        else {
            continue;
        };

        let name: String = trimmed[keyword.len()..]
            .trim_start()
            .chars()
            .take_while(|c| is_word_char(*c))
            .collect();
        if name.is_empty() {
            continue;
        }

        let after_keyword = &trimmed[keyword.len()..];
        let name_offset = indent
            + utf16_len(keyword)
            + (utf16_len(after_keyword) - utf16_len(after_keyword.trim_start()));
        let name_len = utf16_len(&name);
        symbols.push(DocumentSymbol {
            name,
            kind: *kind,
            range: Range::on_line(line_no, indent, indent + utf16_len(trimmed.trim_end())),
            selection_range: Range::on_line(line_no, name_offset, name_offset + name_len),
        });
    }
    symbols
}

/// Open documents by URI; full-text sync only
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: HashMap<String, String>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, uri: String, text: String) {
        self.documents.insert(uri, text);
    }

    /// Replace the text of an open document; returns false when it is not open
    pub fn change(&mut self, uri: &str, text: String) -> bool {
        match self.documents.get_mut(uri) {
            Some(current) => {
                *current = text;
                true
            }
            None => false,
        }
    }

    pub fn close(&mut self, uri: &str) -> bool {
        self.documents.remove(uri).is_some()
    }

    pub fn get(&self, uri: &str) -> Option<&str> {
        self.documents.get(uri).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Where the identifier under `position` is declared in the same document
    pub fn definition(&self, uri: &str, position: Position) -> Option<Location> {
        let text = self.get(uri)?;
        let word = word_at(text, position)?;
        extract_symbols(text)
            .into_iter()
            .find(|symbol| symbol.name == word)
            .map(|symbol| Location {
                uri: uri.to_string(),
                range: symbol.selection_range,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "class CognitiveCity(Base):\n    async def register_cognitive_city(self, city):\n        return encode(city)\n\ndef encode(city):\n    pass\n";

    #[test]
    fn test_word_at_position() {
        assert_eq!(word_at(SOURCE, Position::new(0, 8)).as_deref(), Some("CognitiveCity"));
        assert_eq!(
            word_at(SOURCE, Position::new(1, 20)).as_deref(),
            Some("register_cognitive_city")
        );
        assert_eq!(word_at(SOURCE, Position::new(0, 5)), None);
        assert_eq!(word_at(SOURCE, Position::new(0, 200)), None);
        assert_eq!(word_at(SOURCE, Position::new(42, 0)), None);
    }

    #[test]
    fn test_symbols_account_for_indentation() {
        let symbols = extract_symbols(SOURCE);
        assert_eq!(symbols.len(), 3);

        assert_eq!(symbols[0].name, "CognitiveCity");
        assert_eq!(symbols[0].kind, SYMBOL_KIND_CLASS);
        assert_eq!(symbols[0].selection_range, Range::on_line(0, 6, 19));

        let method = &symbols[1];
        assert_eq!(method.name, "register_cognitive_city");
        assert_eq!(method.kind, SYMBOL_KIND_FUNCTION);
        assert_eq!(method.range.start, Position::new(1, 4));
        assert_eq!(method.selection_range, Range::on_line(1, 14, 37));

        assert_eq!(symbols[2].name, "encode");
        assert_eq!(symbols[2].range, Range::on_line(4, 0, 17));
    }

    #[test]
    fn test_definition_points_at_declaration() {
        let mut store = DocumentStore::new();
        store.open("file:///city.py".into(), SOURCE.into());

        // the call to `encode` on line 2 resolves to the def on line 4
        let location = store.definition("file:///city.py", Position::new(2, 17)).unwrap();
        assert_eq!(location.range, Range::on_line(4, 4, 10));

        assert_eq!(store.definition("file:///city.py", Position::new(2, 25)), None);
        assert_eq!(store.definition("file:///other.py", Position::new(0, 0)), None);
    }

    #[test]
    fn test_positions_count_utf16_units() {
        // the emoji is two UTF-16 units, so `greet` on line 1 spans units 13..18
        let text = "class Crab: # 🦀\n    x = 🦀 + greet\ndef greet():\n    pass\n";
        assert_eq!(word_at(text, Position::new(1, 13)).as_deref(), Some("greet"));
        assert_eq!(word_at(text, Position::new(1, 17)).as_deref(), Some("greet"));
        assert_eq!(word_at(text, Position::new(1, 18)), None);
        assert_eq!(word_at(text, Position::new(1, 9)), None);

        let symbols = extract_symbols(text);
        assert_eq!(symbols[0].name, "Crab");
        assert_eq!(symbols[0].range, Range::on_line(0, 0, 16));

        let mut store = DocumentStore::new();
        store.open("file:///crab.py".into(), text.into());
        let location = store.definition("file:///crab.py", Position::new(1, 17)).unwrap();
        assert_eq!(location.range, Range::on_line(2, 4, 9));
    }

    #[test]
    fn test_change_requires_open_document() {
        let mut store = DocumentStore::new();
        assert!(!store.change("file:///a", "x".into()));
        store.open("file:///a".into(), "old".into());
        assert!(store.change("file:///a", "new".into()));
        assert_eq!(store.get("file:///a"), Some("new"));
        assert!(store.close("file:///a"));
        assert!(store.is_empty());
    }
}

//! The symbol table shared by the lexer and the parser.
//!
//! The lexer inserts every identifier it sees; the parser later refines the
//! type of entries that play a known role. Entries are never removed, and
//! iteration follows first-seen order.
use indexmap::IndexMap;
use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SymbolType {
    Identifier,
    MemoryAddress,
    Label,
}

impl fmt::Display for SymbolType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SymbolType::Identifier => write!(f, "identifier"),
            SymbolType::MemoryAddress => write!(f, "memory address"),
            SymbolType::Label => write!(f, "Label"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SymbolEntry {
    pub kind: SymbolType,
    pub line: Option<usize>,
}

#[derive(Clone, Default, Debug)]
pub struct SymbolTable {
    entries: IndexMap<String, SymbolEntry>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable { entries: IndexMap::new() }
    }

    /// Records `name` as a plain identifier unless it is already known.
    /// Returns true if a new entry was created.
    pub fn insert_if_absent(&mut self, name: &str, line: Option<usize>) -> bool {
        if self.entries.contains_key(name) {
            return false;
        }
        self.entries.insert(name.to_owned(), SymbolEntry { kind: SymbolType::Identifier, line });
        true
    }

    pub fn get(&self, name: &str) -> Option<&SymbolEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Changes the type of an existing entry. Unknown names are left alone.
    pub fn refine(&mut self, name: &str, kind: SymbolType) -> bool {
        match self.entries.get_mut(name) {
            Some(entry) => {
                trace!("refining symbol `{}`: {} -> {}", name, entry.kind, kind);
                entry.kind = kind;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SymbolEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forgets every entry, readying the table for a fresh session.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

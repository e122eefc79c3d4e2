//! This parse tree describes the recognized instructions of a lexeme stream.
//!
//! The root is always a `Program` node whose first child is the
//! `TextSection`. Each recognized instruction hangs off the text section in
//! source order:
//!
//! ```text
//! Program
//! |--TextSection
//! |--|--Load
//! |--|--|--Operation: lw
//! |--|--|--Operands
//! |--|--|--|--Register: $v0
//! ```
//!
//! Node identity (`kind`) and payload (`value`) are kept apart, so a
//! register operand is `Operand(Role::Register)` carrying `$v0` rather
//! than a label string with the name baked in.

use std::fmt;

use super::lexer::Lexeme;

/// The instruction forms the parser knows about.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Form {
    Load,
    BranchNotEqual,
    Add,
    Branch,
    Default,
    Move,
    Exit,
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The part an operand lexeme plays inside its instruction.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Role {
    Register,
    Identifier,
    Comma,
    Integer,
    Label,
    Colon,
    Zero,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum NodeKind {
    Program,
    TextSection,
    Instruction(Form),
    Operation,
    Operands,
    Operand(Role),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ParseNode {
    pub kind: NodeKind,
    pub value: Option<Lexeme>,
    pub children: Vec<ParseNode>,
}

impl ParseNode {
    pub fn new(kind: NodeKind) -> Self {
        ParseNode { kind, value: None, children: Vec::new() }
    }

    pub fn with_value(kind: NodeKind, value: Lexeme) -> Self {
        ParseNode { kind, value: Some(value), children: Vec::new() }
    }

    /// A fresh tree: `Program` holding an empty `TextSection`.
    pub fn program() -> Self {
        let mut root = ParseNode::new(NodeKind::Program);
        root.add_child(ParseNode::new(NodeKind::TextSection));
        root
    }

    pub fn add_child(&mut self, child: ParseNode) {
        self.children.push(child);
    }

    /// The text section of a tree built with `program()`.
    pub fn text_section(&self) -> Option<&ParseNode> {
        self.children.iter().find(|c| c.kind == NodeKind::TextSection)
    }

    pub fn text_section_mut(&mut self) -> Option<&mut ParseNode> {
        self.children.iter_mut().find(|c| c.kind == NodeKind::TextSection)
    }

    /// The label shown when the tree is printed.
    pub fn label(&self) -> String {
        let name = match self.kind {
            NodeKind::Program => "Program".to_owned(),
            NodeKind::TextSection => "TextSection".to_owned(),
            NodeKind::Instruction(form) => form.to_string(),
            NodeKind::Operation => "Operation".to_owned(),
            NodeKind::Operands => "Operands".to_owned(),
            NodeKind::Operand(role) => role.to_string(),
        };
        match &self.value {
            Some(value) => format!("{}: {}", name, value),
            None => name,
        }
    }

    fn write_tree(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        writeln!(f, "{}{}", "|--".repeat(depth), self.label())?;
        for child in &self.children {
            child.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Pre-order, one node per line, indented by `|--` per level.
impl fmt::Display for ParseNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

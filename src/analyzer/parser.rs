//! The Parser module takes a lexeme stream and converts it into a parse tree.
//!
//! Recognition is table driven: each known keyword maps to a descriptor
//! giving its operand roles and the shape of the subtree it produces. A
//! single routine interprets every descriptor. Lexemes that don't start a
//! known instruction are skipped.
use super::ast::{Form, NodeKind, ParseNode, Role};
use super::error::{Diagnostic, Error, Result};
use super::lexer::Lexeme;
use super::symbols::{SymbolTable, SymbolType};

/// What leads the instruction node's children.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Head {
    /// An `Operation` node holding the keyword.
    Operation,
    /// The keyword itself, as an operand with the given role.
    Keyword(Role),
    None,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Layout {
    /// Operands are wrapped in an `Operands` node.
    Grouped,
    /// Operands are direct children of the instruction.
    Inline,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Attach {
    TextSection,
    Program,
}

/// Symbol table bookkeeping done with the first operand.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Action {
    None,
    /// Retype the operand if the table knows it; stay quiet otherwise.
    RefineIfKnown(SymbolType),
    /// The operand must already be in the table. Missing names are reported.
    RequireDefined(SymbolType),
}

#[derive(Debug)]
struct Descriptor {
    keyword: &'static str,
    form: Form,
    head: Head,
    operands: &'static [Role],
    layout: Layout,
    attach: Attach,
    action: Action,
}

const ARITHMETIC_OPERANDS: &[Role] = &[Role::Identifier, Role::Comma, Role::Identifier, Role::Comma, Role::Identifier];

const INSTRUCTIONS: &[Descriptor] = &[
    Descriptor {
        keyword: "lw",
        form: Form::Load,
        head: Head::Operation,
        operands: &[Role::Register],
        layout: Layout::Grouped,
        attach: Attach::TextSection,
        action: Action::RefineIfKnown(SymbolType::MemoryAddress),
    },
    Descriptor {
        keyword: "bne",
        form: Form::BranchNotEqual,
        head: Head::Operation,
        operands: &[Role::Identifier, Role::Comma, Role::Integer, Role::Comma, Role::Identifier],
        layout: Layout::Grouped,
        attach: Attach::TextSection,
        action: Action::None,
    },
    Descriptor {
        keyword: "add",
        form: Form::Add,
        head: Head::Operation,
        operands: ARITHMETIC_OPERANDS,
        layout: Layout::Grouped,
        attach: Attach::TextSection,
        action: Action::None,
    },
    Descriptor {
        keyword: "b",
        form: Form::Branch,
        head: Head::Operation,
        operands: &[Role::Label],
        layout: Layout::Inline,
        attach: Attach::TextSection,
        action: Action::RequireDefined(SymbolType::Label),
    },
    Descriptor {
        keyword: "DEFAULT",
        form: Form::Default,
        head: Head::Keyword(Role::Label),
        operands: &[Role::Colon],
        layout: Layout::Inline,
        attach: Attach::TextSection,
        action: Action::None,
    },
    Descriptor {
        keyword: "move",
        form: Form::Move,
        head: Head::Operation,
        operands: &[Role::Identifier, Role::Comma, Role::Zero],
        layout: Layout::Grouped,
        attach: Attach::TextSection,
        action: Action::None,
    },
    Descriptor {
        keyword: "Exit",
        form: Form::Exit,
        head: Head::None,
        operands: &[],
        layout: Layout::Inline,
        attach: Attach::Program,
        action: Action::None,
    },
];

fn lookup(lexeme: &Lexeme) -> Option<&'static Descriptor> {
    let text = lexeme.as_text()?;
    INSTRUCTIONS.iter().find(|d| d.keyword == text)
}

/// The output of one structural pass.
#[derive(Debug)]
pub struct Parsed {
    pub tree: ParseNode,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Parser<'a> {
    lexemes: &'a [Lexeme],
    cursor: usize,
    text: ParseNode,
    program: Vec<ParseNode>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    pub fn new(lexemes: &'a [Lexeme]) -> Self {
        Parser {
            lexemes,
            cursor: 0,
            text: ParseNode::new(NodeKind::TextSection),
            program: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Run the parser, consuming itself and returning the tree.
    /// Fails only when an instruction runs past the end of the input.
    pub fn run(mut self, symbols: &mut SymbolTable) -> Result<Parsed> {
        while self.cursor < self.lexemes.len() {
            match lookup(&self.lexemes[self.cursor]) {
                Some(desc) => self.instruction(desc, symbols)?,
                None => {
                    trace!("skipping `{}` at position {}", self.lexemes[self.cursor], self.cursor);
                    self.cursor += 1;
                },
            }
        }

        let mut tree = ParseNode::new(NodeKind::Program);
        tree.add_child(self.text);
        for node in self.program {
            tree.add_child(node);
        }

        debug!("parsed {} lexeme(s) with {} diagnostic(s)", self.lexemes.len(), self.diagnostics.len());
        Ok(Parsed { tree, diagnostics: self.diagnostics })
    }

    /// Consumes the keyword at the cursor and its operands, attaching the
    /// resulting subtree.
    fn instruction(&mut self, desc: &Descriptor, symbols: &mut SymbolTable) -> Result<()> {
        let position = self.cursor;
        let needed = desc.operands.len();
        let available = self.lexemes.len() - position - 1;
        if needed > available {
            return Err(Error::MissingOperand {
                keyword: desc.keyword.to_owned(),
                position,
                needed,
                available,
            });
        }
        debug!("recognized `{}` at position {}", desc.keyword, position);

        let lexemes = self.lexemes;
        let keyword = &lexemes[position];
        let operands = &lexemes[position + 1..position + 1 + needed];

        let mut node = ParseNode::new(NodeKind::Instruction(desc.form));
        match desc.head {
            Head::Operation => node.add_child(ParseNode::with_value(NodeKind::Operation, keyword.clone())),
            Head::Keyword(role) => node.add_child(ParseNode::with_value(NodeKind::Operand(role), keyword.clone())),
            Head::None => {},
        }

        let children = operands.iter()
            .zip(desc.operands)
            .map(|(lexeme, role)| ParseNode::with_value(NodeKind::Operand(*role), lexeme.clone()));
        match desc.layout {
            Layout::Grouped => {
                let mut group = ParseNode::new(NodeKind::Operands);
                group.children.extend(children);
                node.add_child(group);
            },
            Layout::Inline => node.children.extend(children),
        }

        if let Some(first) = operands.first() {
            self.apply(desc.action, first, position + 1, symbols);
        }

        match desc.attach {
            Attach::TextSection => self.text.add_child(node),
            Attach::Program => self.program.push(node),
        }

        self.cursor += 1 + needed;
        Ok(())
    }

    fn apply(&mut self, action: Action, operand: &Lexeme, position: usize, symbols: &mut SymbolTable) {
        let name = operand.to_string();
        match action {
            Action::None => {},
            Action::RefineIfKnown(kind) => {
                symbols.refine(&name, kind);
            },
            Action::RequireDefined(kind) => {
                if !symbols.refine(&name, kind) {
                    self.diagnostics.push(Diagnostic::UndefinedLabel { label: name, position });
                }
            },
        }
    }
}

/// Builds the parse tree for `lexemes`, consulting and annotating `symbols`.
pub fn parse(lexemes: &[Lexeme], symbols: &mut SymbolTable) -> Result<Parsed> {
    Parser::new(lexemes).run(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::lexer;

    fn lexemes(words: &[&str]) -> Vec<Lexeme> {
        words.iter().map(|w| Lexeme::from(*w)).collect()
    }

    fn operand(role: Role, value: &str) -> ParseNode {
        ParseNode::with_value(NodeKind::Operand(role), Lexeme::from(value))
    }

    fn operation(keyword: &str) -> ParseNode {
        ParseNode::with_value(NodeKind::Operation, Lexeme::from(keyword))
    }

    fn instructions(parsed: &Parsed) -> &[ParseNode] {
        &parsed.tree.text_section().unwrap().children
    }

    #[test]
    fn test_descriptors_unique() {
        for (i, a) in INSTRUCTIONS.iter().enumerate() {
            for b in &INSTRUCTIONS[i + 1..] {
                assert_ne!(a.keyword, b.keyword);
            }
        }
    }

    #[test]
    fn test_empty() {
        let mut symbols = SymbolTable::new();
        let parsed = parse(&[], &mut symbols).unwrap();
        assert_eq!(parsed.tree, ParseNode::program());
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_load() {
        let mut symbols = SymbolTable::new();
        symbols.insert_if_absent("$v0", None);

        let parsed = parse(&lexemes(&["lw", "$v0"]), &mut symbols).unwrap();
        assert!(parsed.diagnostics.is_empty());
        assert_eq!(symbols.get("$v0").map(|e| e.kind), Some(SymbolType::MemoryAddress));

        let mut operands = ParseNode::new(NodeKind::Operands);
        operands.add_child(operand(Role::Register, "$v0"));
        let mut load = ParseNode::new(NodeKind::Instruction(Form::Load));
        load.add_child(operation("lw"));
        load.add_child(operands);
        let mut expected = ParseNode::program();
        expected.text_section_mut().unwrap().add_child(load);

        assert_eq!(parsed.tree, expected);
    }

    #[test]
    fn test_load_unknown_register() {
        let mut symbols = SymbolTable::new();
        let parsed = parse(&lexemes(&["lw", "$a0"]), &mut symbols).unwrap();
        assert!(parsed.diagnostics.is_empty());
        assert!(symbols.is_empty());
        assert_eq!(instructions(&parsed).len(), 1);
    }

    #[test]
    fn test_branch_undefined_label() {
        let mut symbols = SymbolTable::new();
        let parsed = parse(&lexemes(&["b", "Exit"]), &mut symbols).unwrap();
        assert_eq!(parsed.diagnostics, vec![
            Diagnostic::UndefinedLabel { label: "Exit".to_owned(), position: 1 },
        ]);
        // No symbol is made up for the missing label.
        assert!(symbols.is_empty());

        let mut branch = ParseNode::new(NodeKind::Instruction(Form::Branch));
        branch.add_child(operation("b"));
        branch.add_child(operand(Role::Label, "Exit"));
        assert_eq!(instructions(&parsed), &[branch][..]);
    }

    #[test]
    fn test_branch_defined_label() {
        let mut symbols = SymbolTable::new();
        symbols.insert_if_absent("loop", Some(4));
        let parsed = parse(&lexemes(&["b", "loop"]), &mut symbols).unwrap();
        assert!(parsed.diagnostics.is_empty());
        assert_eq!(symbols.get("loop").map(|e| e.kind), Some(SymbolType::Label));
        assert_eq!(symbols.get("loop").and_then(|e| e.line), Some(4));
    }

    #[test]
    fn test_add() {
        let mut symbols = SymbolTable::new();
        let parsed = parse(&lexemes(&["add", "num2", ",", "num3", ",", "num4"]), &mut symbols).unwrap();
        let add = &instructions(&parsed)[0];
        assert_eq!(add.kind, NodeKind::Instruction(Form::Add));
        assert_eq!(add.children[0], operation("add"));

        let operands = &add.children[1];
        assert_eq!(operands.kind, NodeKind::Operands);
        assert_eq!(operands.children, vec![
            operand(Role::Identifier, "num2"),
            operand(Role::Comma, ","),
            operand(Role::Identifier, "num3"),
            operand(Role::Comma, ","),
            operand(Role::Identifier, "num4"),
        ]);
    }

    #[test]
    fn test_branch_not_equal() {
        let mut symbols = SymbolTable::new();
        let mut input = lexemes(&["bne", "num1", ","]);
        input.push(Lexeme::Number(0));
        input.extend(lexemes(&[",", "L1"]));

        let parsed = parse(&input, &mut symbols).unwrap();
        let bne = &instructions(&parsed)[0];
        assert_eq!(bne.kind, NodeKind::Instruction(Form::BranchNotEqual));
        assert_eq!(bne.children[1].children, vec![
            operand(Role::Identifier, "num1"),
            operand(Role::Comma, ","),
            ParseNode::with_value(NodeKind::Operand(Role::Integer), Lexeme::Number(0)),
            operand(Role::Comma, ","),
            operand(Role::Identifier, "L1"),
        ]);
    }

    #[test]
    fn test_default_and_move() {
        let mut symbols = SymbolTable::new();
        let parsed = parse(&lexemes(&["DEFAULT", ":", "move", "num2", ",", "zero"]), &mut symbols).unwrap();

        let mut default = ParseNode::new(NodeKind::Instruction(Form::Default));
        default.add_child(operand(Role::Label, "DEFAULT"));
        default.add_child(operand(Role::Colon, ":"));

        let mut operands = ParseNode::new(NodeKind::Operands);
        operands.add_child(operand(Role::Identifier, "num2"));
        operands.add_child(operand(Role::Comma, ","));
        operands.add_child(operand(Role::Zero, "zero"));
        let mut mv = ParseNode::new(NodeKind::Instruction(Form::Move));
        mv.add_child(operation("move"));
        mv.add_child(operands);

        assert_eq!(instructions(&parsed), &[default, mv][..]);
    }

    #[test]
    fn test_exit_attaches_to_program() {
        let mut symbols = SymbolTable::new();
        let parsed = parse(&lexemes(&["Exit", "lw", "$v0"]), &mut symbols).unwrap();
        assert_eq!(parsed.tree.children.len(), 2);
        assert_eq!(parsed.tree.children[0].kind, NodeKind::TextSection);
        assert_eq!(parsed.tree.children[1], ParseNode::new(NodeKind::Instruction(Form::Exit)));
        assert_eq!(instructions(&parsed).len(), 1);
    }

    #[test]
    fn test_unknown_lexemes_skipped() {
        let mut symbols = SymbolTable::new();
        let parsed = parse(&lexemes(&["main", ":", "sw", "$ra", "lw", "$a0", "(", "jr"]), &mut symbols).unwrap();
        let forms: Vec<NodeKind> = instructions(&parsed).iter().map(|n| n.kind).collect();
        assert_eq!(forms, vec![NodeKind::Instruction(Form::Load)]);
    }

    #[test]
    fn test_missing_operand() {
        let mut symbols = SymbolTable::new();
        match parse(&lexemes(&["lw", "$v0", "add", "num2", ","]), &mut symbols) {
            Err(Error::MissingOperand { keyword, position, needed, available }) => {
                assert_eq!(keyword, "add");
                assert_eq!(position, 2);
                assert_eq!(needed, 5);
                assert_eq!(available, 2);
            },
            other => panic!("expected a missing operand error, got {:?}", other),
        }

        assert!(parse(&lexemes(&["b"]), &mut symbols).is_err());
    }

    #[test]
    fn test_instruction_sequence() {
        let mut symbols = SymbolTable::new();
        let input = lexemes(&[
            "lw", "$v0", "bne", "num1", ",", "0", ",", "L1", "add", "num2", ",", "num3", ",", "num4",
            "b", "Exit", "DEFAULT", ":", "move", "num2", ",", "zero",
        ]);
        let parsed = parse(&input, &mut symbols).unwrap();

        let forms: Vec<NodeKind> = instructions(&parsed).iter().map(|n| n.kind).collect();
        assert_eq!(forms, vec![
            NodeKind::Instruction(Form::Load),
            NodeKind::Instruction(Form::BranchNotEqual),
            NodeKind::Instruction(Form::Add),
            NodeKind::Instruction(Form::Branch),
            NodeKind::Instruction(Form::Default),
            NodeKind::Instruction(Form::Move),
        ]);
        // `Exit` was taken as the branch target, so nothing hangs off the root.
        assert_eq!(parsed.tree.children.len(), 1);
        assert_eq!(parsed.diagnostics, vec![
            Diagnostic::UndefinedLabel { label: "Exit".to_owned(), position: 15 },
        ]);
    }

    #[test]
    fn test_parse_lexed_program() {
        let source = "main:\nExit:\n    lw $a0, 0($sp)\n    b Exit\n";
        let lexed = lexer::tokenize(source).unwrap();
        let mut symbols = lexed.symbols;

        let parsed = parse(&lexer::lexemes(&lexed.tokens), &mut symbols).unwrap();
        assert!(parsed.diagnostics.is_empty());
        assert_eq!(symbols.get("Exit").map(|e| e.kind), Some(SymbolType::Label));
        assert_eq!(symbols.get("main").map(|e| e.kind), Some(SymbolType::Identifier));

        assert_eq!(parsed.tree.to_string(), "\
Program
|--TextSection
|--|--Load
|--|--|--Operation: lw
|--|--|--Operands
|--|--|--|--Register: $a0
|--|--Branch
|--|--|--Operation: b
|--|--|--Label: Exit
|--Exit
");
    }
}

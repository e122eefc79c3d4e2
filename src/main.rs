
extern crate clap;
#[macro_use] extern crate log;
extern crate fern;
extern crate chrono;
extern crate term_grid;

pub mod analyzer;

use clap::{Arg, ArgMatches, App};
use term_grid::{Grid, GridOptions, Direction, Filling, Cell};

use analyzer::error::Diagnostic;
use analyzer::lexer::{self, Lexeme, Token, TokenKind};
use analyzer::parser;
use analyzer::symbols::SymbolTable;

use std::fs;
use std::path::Path;

fn main() {
    let args = process_arguments();
    initialize_logging(args.occurrences_of("verbose"));

    debug!("Arguments:\n\tVerbosity: {}\n\tTokens: {}\n\tUnique: {}\n\tSymbols: {}\n\tParse Tree: {}\n\tLexemes: {}\n\tInfile: {}",
        match args.occurrences_of("verbose") {
            0 => log::LevelFilter::Error.to_string(),
            1 => log::LevelFilter::Warn.to_string(),
            2 => log::LevelFilter::Info.to_string(),
            3 | _ => log::LevelFilter::Debug.to_string(),
        },
        args.is_present("tokens"),
        args.is_present("unique"),
        args.is_present("symbols"),
        args.is_present("parse-tree"),
        args.value_of("lexemes").unwrap_or("None"),
        args.value_of("INPUT").unwrap_or("None")
    );

    // With no report selected, show all of them.
    let show_all = !(args.is_present("tokens") || args.is_present("symbols") || args.is_present("parse-tree"));

    let ipath = Path::new(args.value_of("INPUT").unwrap_or_default());
    let source = match fs::read_to_string(&ipath) {
        Err(err) => {
            error!("fatal: unable to read input file `{}`: {}", ipath.display(), err);
            std::process::exit(1);
        },
        Ok(text) => text,
    };

    let lexed = match lexer::tokenize(&source) {
        Err(err) => {
            error!("fatal: {}", err);
            std::process::exit(1);
        },
        Ok(lexed) => lexed,
    };
    info!("{}: {} token(s), {} symbol(s)", ipath.display(), lexed.tokens.len(), lexed.symbols.len());

    let mut symbols = lexed.symbols;
    let mut diagnostics = lexed.diagnostics;

    if show_all || args.is_present("tokens") {
        print_tokens(&lexed.tokens, args.is_present("unique"));
    }

    if show_all || args.is_present("parse-tree") {
        let lexemes = match args.value_of("lexemes") {
            Some(path) => read_lexemes(Path::new(path)),
            None => lexer::lexemes(&lexed.tokens),
        };

        match parser::parse(&lexemes, &mut symbols) {
            Err(err) => {
                error!("fatal: {}", err);
                std::process::exit(1);
            },
            Ok(parsed) => {
                println!("\nParse Tree:");
                println!("{}", "-".repeat(25));
                print!("{}", parsed.tree);
                diagnostics.extend(parsed.diagnostics);
            },
        }
    }

    // Printed last so the parser's refinements show up.
    if show_all || args.is_present("symbols") {
        print_symbols(&symbols);
    }

    print_diagnostics(&diagnostics);
}

fn read_lexemes(path: &Path) -> Vec<Lexeme> {
    match fs::read_to_string(path) {
        Err(err) => {
            error!("fatal: unable to read lexeme file `{}`: {}", path.display(), err);
            std::process::exit(1);
        },
        Ok(text) => text.split_whitespace().map(Lexeme::from).collect(),
    }
}

fn new_grid() -> Grid {
    Grid::new(GridOptions {
        filling:     Filling::Spaces(2),
        direction:   Direction::LeftToRight,
    })
}

fn print_tokens(tokens: &[Token], unique: bool) {
    let mut grid = new_grid();
    grid.add(Cell::from("Token".to_string()));
    grid.add(Cell::from("Lexemes".to_string()));

    for kind in TokenKind::ALL.iter().filter(|k| !k.is_trivia()) {
        let mut lexemes: Vec<String> = Vec::new();
        for tok in tokens.iter().filter(|t| t.kind == *kind) {
            let text = tok.lexeme.to_string();
            if unique && lexemes.contains(&text) {
                continue;
            }
            lexemes.push(text);
        }
        grid.add(Cell::from(kind.name().to_string()));
        grid.add(Cell::from(lexemes.join(" ")));
    }

    println!("{}", grid.fit_into_columns(2));
}

fn print_symbols(symbols: &SymbolTable) {
    let mut grid = new_grid();
    for header in &["Name", "Type", "Line"] {
        grid.add(Cell::from(header.to_string()));
    }
    for (name, entry) in symbols.iter() {
        grid.add(Cell::from(name.clone()));
        grid.add(Cell::from(entry.kind.to_string()));
        grid.add(Cell::from(entry.line.map_or("-".to_string(), |l| l.to_string())));
    }

    println!("\nSymbol Table:");
    println!("{}", "-".repeat(25));
    println!("{}", grid.fit_into_columns(3));
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    println!("\nSemantic Analysis:");
    println!("-------------------");
    if diagnostics.is_empty() {
        println!("No semantic errors found.");
        return;
    }
    for diag in diagnostics {
        warn!("{}", diag);
        println!("{}: {}", diag.kind(), diag);
    }
}

fn process_arguments() -> ArgMatches<'static> {
    App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(Arg::with_name("INPUT")
            .help("Sets the MIPS source file to analyze")
            .required(true)
            .multiple(false)
            .index(1))
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .takes_value(false)
            .help("Sets the level of verbosity"))
        .arg(Arg::with_name("tokens")
            .short("t")
            .long("tokens")
            .takes_value(false)
            .help("prints the lexemes of every token kind"))
        .arg(Arg::with_name("unique")
            .short("u")
            .long("unique")
            .takes_value(false)
            .requires("tokens")
            .help("lists each lexeme once per token kind"))
        .arg(Arg::with_name("symbols")
            .short("s")
            .long("symbols")
            .takes_value(false)
            .help("prints the symbol table"))
        .arg(Arg::with_name("parse-tree")
            .short("p")
            .long("parse-tree")
            .takes_value(false)
            .help("prints the parse tree"))
        .arg(Arg::with_name("lexemes")
            .short("l")
            .long("lexemes")
            .takes_value(true)
            .value_name("FILE")
            .help("parses the whitespace separated lexemes in FILE instead of the input's tokens"))
        .get_matches()
}

fn initialize_logging(verbosity: u64) {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(match verbosity {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Warn,
            2 => log::LevelFilter::Info,
            3 | _ => log::LevelFilter::Debug,
        })
        .chain(std::io::stderr())
        .apply().ok();
}

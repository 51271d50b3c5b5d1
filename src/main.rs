use std::{
    env,
    fs::{read_to_string, File},
    io::{self, BufWriter},
    path::Path,
    process::exit,
    time::Instant,
};

use cminor::{
    ast::ast::Program,
    compiler::compiler::{generate_to, Target},
    display_error,
    errors::errors::{CodegenError, Error},
    lexer::{lexer::tokenize, tokens::TokenKind},
    parse_source,
    resolver::resolver::resolve,
    type_checker::type_checker::type_check,
};
use log::{debug, error, info};

const EXIT_FAILURE: i32 = 1;
const EXIT_USAGE: i32 = 64;
const EXIT_IO: i32 = 74;

const USAGE: &str = "usage: cminor -scan|-print|-resolve|-typecheck|-codegen <source> [output]";

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        eprintln!("{}", USAGE);
        exit(EXIT_USAGE);
    }

    let mode = args[1].as_str();
    let file_path = args[2].as_str();
    let output = args.get(3).map(String::as_str);
    if output.is_some() && mode != "-codegen" {
        eprintln!("{}", USAGE);
        exit(EXIT_USAGE);
    }

    let file_name = Path::new(file_path)
        .file_name()
        .map_or(file_path.to_string(), |name| name.to_string_lossy().into_owned());

    let source = match read_to_string(file_path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("cminor: cannot read {}: {}", file_path, e);
            exit(EXIT_IO);
        }
    };

    let start = Instant::now();
    let status = match mode {
        "-scan" => scan(&source, &file_name),
        "-print" => print(&source, &file_name),
        "-resolve" => run_resolver(&source, &file_name),
        "-typecheck" => run_type_checker(&source, &file_name),
        "-codegen" => codegen(&source, &file_name, output),
        _ => {
            eprintln!("{}", USAGE);
            EXIT_USAGE
        }
    };
    info!("{} finished in {:?}", mode, start.elapsed());

    exit(status);
}

fn scan(source: &str, file_name: &str) -> i32 {
    match tokenize(source.to_string(), Some(file_name.to_string())) {
        Ok(tokens) => {
            for token in tokens.iter().filter(|token| token.kind != TokenKind::EOF) {
                println!("{}", token);
            }
            0
        }
        Err(error) => report(&error, source),
    }
}

fn print(source: &str, file_name: &str) -> i32 {
    match parse_source(source, file_name) {
        Ok(program) => {
            print!("{}", program);
            0
        }
        Err(error) => report(&error, source),
    }
}

/// Parses and resolves, printing diagnostics. `None` means the caller should
/// stop with a failure status.
fn resolved_program(source: &str, file_name: &str, trace: bool) -> Option<Program> {
    let mut program = match parse_source(source, file_name) {
        Ok(program) => program,
        Err(error) => {
            report(&error, source);
            return None;
        }
    };

    let resolver = resolve(&mut program);
    if trace {
        for (name, symbol) in resolver.resolutions() {
            println!("{} resolves to {}", name, symbol.borrow());
        }
    }

    if resolver.error_count() > 0 {
        for error in resolver.errors() {
            display_error(error, source);
        }
        eprintln!("encountered {} name error(s)", resolver.error_count());
        return None;
    }

    Some(program)
}

fn run_resolver(source: &str, file_name: &str) -> i32 {
    match resolved_program(source, file_name, true) {
        Some(_) => 0,
        None => EXIT_FAILURE,
    }
}

fn checked_program(source: &str, file_name: &str) -> Option<Program> {
    let program = resolved_program(source, file_name, false)?;

    let checker = type_check(&program);
    if checker.error_count() > 0 {
        for error in checker.errors() {
            display_error(error, source);
        }
        eprintln!("encountered {} type error(s)", checker.error_count());
        return None;
    }

    Some(program)
}

fn run_type_checker(source: &str, file_name: &str) -> i32 {
    match checked_program(source, file_name) {
        Some(_) => 0,
        None => EXIT_FAILURE,
    }
}

fn codegen(source: &str, file_name: &str, output: Option<&str>) -> i32 {
    let program = match checked_program(source, file_name) {
        Some(program) => program,
        None => return EXIT_FAILURE,
    };

    let target = Target::from_env();
    debug!("code generation target: {}", target);

    let result = match output {
        Some(path) => match File::create(path) {
            Ok(file) => generate_to(&program, target, BufWriter::new(file)).map(|_| ()),
            Err(e) => {
                eprintln!("cminor: cannot create {}: {}", path, e);
                return EXIT_IO;
            }
        },
        None => generate_to(&program, target, io::stdout().lock()).map(|_| ()),
    };

    match result {
        Ok(()) => 0,
        Err(CodegenError::Io(e)) => {
            error!("failed writing assembly: {}", e);
            eprintln!("cminor: {}", e);
            EXIT_IO
        }
        Err(e) => {
            eprintln!("codegen error: {}", e);
            EXIT_FAILURE
        }
    }
}

fn report(error: &Error, source: &str) -> i32 {
    display_error(error, source);
    EXIT_FAILURE
}

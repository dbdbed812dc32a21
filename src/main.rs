use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use quill::ast::statement::{CodeBlock, StatementKind};
use quill::bytecode::{Module, disassemble};
use quill::types::AnnotationTable;
use quill::{build_source, check_source, vm};

const DEFAULT_OUTPUT: &str = "build/program";

const USAGE: &str = "usage:
  quill build <source> [-o <output>]
  quill run <module>
  quill check <source> [--dump]";

enum Command {
    Build { source: PathBuf, output: PathBuf },
    Run { module: PathBuf },
    Check { source: PathBuf, dump: bool },
}

fn usage_error(msg: &str) -> ! {
    eprintln!("error: {msg}");
    eprintln!("{USAGE}");
    process::exit(2);
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Command {
    let Some(command) = args.next() else {
        usage_error("missing command");
    };
    let Some(path) = args.next() else {
        usage_error("missing input file");
    };
    let path = PathBuf::from(path);

    let command = match command.as_str() {
        "build" => {
            let output = match args.next().as_deref() {
                None => PathBuf::from(DEFAULT_OUTPUT),
                Some("-o") => match args.next() {
                    Some(out) => PathBuf::from(out),
                    None => usage_error("-o expects a path"),
                },
                Some(other) => usage_error(&format!("unexpected argument '{other}'")),
            };
            Command::Build {
                source: path,
                output,
            }
        }
        "run" => Command::Run { module: path },
        "check" => {
            let dump = match args.next().as_deref() {
                None => false,
                Some("--dump") => true,
                Some(other) => usage_error(&format!("unexpected argument '{other}'")),
            };
            Command::Check { source: path, dump }
        }
        other => usage_error(&format!("unknown command '{other}'")),
    };

    if args.next().is_some() {
        usage_error("too many arguments");
    }
    command
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn build(source: &Path, output: &Path) -> anyhow::Result<()> {
    let module = build_source(&read_source(source)?)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(output, module.to_bytes())
        .with_context(|| format!("failed to write {}", output.display()))?;

    eprintln!("compiled {} to {}", source.display(), output.display());
    Ok(())
}

fn run(path: &Path) -> anyhow::Result<i32> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let module = Module::from_bytes(&bytes)
        .with_context(|| format!("{} is not a valid module", path.display()))?;

    let value = vm::run(&module, io::stdout().lock())?;
    Ok(value.exit_code())
}

fn print_block(block: &CodeBlock, annotations: &AnnotationTable, indent: usize) {
    for statement in &block.statements {
        let pad = "  ".repeat(indent);
        match &statement.kind {
            StatementKind::Conditional(conditional) => {
                if let Some(ty) = annotations.get(conditional.condition.id) {
                    println!("{pad}#{} if condition: {ty}", conditional.condition.id.0);
                }
                print_block(&conditional.then_block, annotations, indent + 1);
            }
            StatementKind::Block(inner) => print_block(inner, annotations, indent + 1),
            _ => {
                if let Some(ty) = annotations.get(statement.id) {
                    println!("{pad}#{}: {ty}", statement.id.0);
                }
            }
        }
    }
}

fn check(source: &Path, dump: bool) -> anyhow::Result<()> {
    let (program, checked) = check_source(&read_source(source)?)?;

    for function in &program.functions {
        let name = &function.name.value;
        if let Some(ty) = checked.context.get(name) {
            println!("{name} : {ty}");
        }
        print_block(&function.body, &checked.annotations, 1);
    }

    if dump {
        let module = quill::bytecode::compile(&program, &checked)?;
        for function in &module.functions {
            println!("\n{}({}):", function.name, function.params.join(", "));
            println!("{}", disassemble(&function.code)?);
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match parse_args(env::args().skip(1)) {
        Command::Build { source, output } => build(&source, &output),
        Command::Run { module } => {
            let code = run(&module)?;
            process::exit(code);
        }
        Command::Check { source, dump } => check(&source, dump),
    }
}

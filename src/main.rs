use clap::Parser;
use minipascal::{analyze_ast_file, ast_io, check_file, dot, CompilationError, LexicalError};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code for a program that parsed but was rejected by the analyzer.
const EXIT_REJECTED: u8 = 2;

#[derive(Debug, clap::Parser)]
#[clap(author, version, about = "Syntax and semantic checker for MiniPascal programs")]
struct Args {
    /// Source file, or a JSON AST when --from-ast is given
    input: PathBuf,

    /// Read the input as a JSON AST and run only the semantic analysis
    #[clap(long)]
    from_ast: bool,

    /// Write the parsed AST as JSON
    #[clap(long, value_name = "FILE")]
    ast_out: Option<PathBuf>,

    /// Write the AST as a Graphviz DOT graph
    #[clap(long, value_name = "FILE")]
    dot_out: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "minipascal=warn",
        1 => "minipascal=debug",
        _ => "minipascal=trace",
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(args.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(code) => code,
        Err(CompilationError::Parse { error, lexical_errors }) => {
            print_lexical_errors(&lexical_errors);
            eprintln!("{}", error);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_lexical_errors(errors: &[LexicalError]) {
    for error in errors {
        eprintln!("Lexical error: {}", error);
    }
}

fn run(args: &Args) -> Result<ExitCode, CompilationError> {
    let (program, analysis) = if args.from_ast {
        analyze_ast_file(&args.input)?
    } else {
        let output = check_file(&args.input)?;
        print_lexical_errors(&output.lexical_errors);
        println!("Syntax analysis finished successfully.");
        (output.program, output.analysis)
    };

    if let Some(path) = &args.ast_out {
        ast_io::write_ast_file(path, &program)?;
        println!("AST saved to '{}'", path.display());
    }
    if let Some(path) = &args.dot_out {
        fs::write(path, dot::render_dot(&program)?)?;
        println!("AST graph saved to '{}'", path.display());
    }

    if analysis.is_accepted() {
        println!("Semantic analysis finished successfully! No errors found.");
        Ok(ExitCode::SUCCESS)
    } else {
        for message in analysis.messages() {
            println!("{}", message);
        }
        Ok(ExitCode::from(EXIT_REJECTED))
    }
}

use std::{env, fs::read_to_string, path::PathBuf, process::ExitCode, time::Instant};

use somnium::{errors::errors::Diagnostic, init_tracing, parse_with_options, ParseOptions};

const USAGE: &str = "usage: somnium [--tokens] [--tree] [--library] <file>";

#[derive(Debug, Default)]
struct Args {
    tokens: bool,
    tree: bool,
    library: bool,
    file: Option<PathBuf>,
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut out = Args::default();
    for arg in args {
        match arg.as_str() {
            "--tokens" => out.tokens = true,
            "--tree" => out.tree = true,
            "--library" => out.library = true,
            flag if flag.starts_with("--") => return Err(format!("unknown flag `{}`", flag)),
            _ if out.file.is_some() => return Err(String::from("more than one input file")),
            _ => out.file = Some(PathBuf::from(arg)),
        }
    }
    Ok(out)
}

fn main() -> ExitCode {
    init_tracing();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("error: {}\n{}", message, USAGE);
            return ExitCode::from(2);
        }
    };
    let Some(file_path) = args.file else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };

    let file_contents = match read_to_string(&file_path) {
        Ok(contents) => contents,
        Err(error) => {
            eprintln!("error: failed to read {}: {}", file_path.display(), error);
            return ExitCode::from(2);
        }
    };
    let file_name = file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.to_string_lossy().into_owned());

    let options = if args.library {
        ParseOptions::library()
    } else {
        ParseOptions::default()
    };

    let start = Instant::now();
    let (unit, diagnostics) = parse_with_options(&file_contents, &file_name, options);
    eprintln!("Parsed in {:?}", start.elapsed());

    if args.tokens {
        for token in &unit.tokens {
            println!("{}", token.debug_line());
        }
    }

    if args.tree {
        print!("{}", unit.dump_tree());
    }

    display_diagnostics(&diagnostics, &file_contents);

    if diagnostics.iter().any(Diagnostic::is_error) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn display_diagnostics(diagnostics: &[Diagnostic], source: &str) {
    for diagnostic in diagnostics {
        eprintln!("{}", diagnostic.render(source));
    }

    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    let warnings = diagnostics.len() - errors;
    if !diagnostics.is_empty() {
        eprintln!("{} error(s), {} warning(s)", errors, warnings);
    }
}

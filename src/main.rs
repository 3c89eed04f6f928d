use clap::Parser as ClapParser;
use needle::cli::{Args, Commands, generate_completions};
use needle::config::AppConfig;
use needle::diagnostic::render_diagnostics;
use needle::interpreter::{Interpreter, Parser, ScriptError};
use needle::lexer::Lexer;
use needle::token::{self, TokenKind};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

fn main() {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = args.command {
        generate_completions(shell);
        return;
    }

    let config = AppConfig::from_args(&args);

    match &args.script {
        Some(path) => {
            let code = if config.debug {
                run_file_debug(path, &config)
            } else {
                run_file(path, &config)
            };
            std::process::exit(code);
        }
        None => run_repl(&config),
    }
}

fn run_file(path: &Path, config: &AppConfig) -> i32 {
    let source = match read_source(path, config) {
        Some(source) => source,
        None => return 1,
    };

    let mut interpreter = Interpreter::new();
    match interpreter.run(&source) {
        Ok(()) => 0,
        Err(error) => {
            report_error(&source, &path.display().to_string(), &error, config);
            1
        }
    }
}

/// `--debug`: token table, reconstructed AST, parse errors, wall time.
fn run_file_debug(path: &Path, config: &AppConfig) -> i32 {
    let source = match read_source(path, config) {
        Some(source) => source,
        None => return 1,
    };

    println!("[file path] -> {}", path.display());

    let mut lexer = Lexer::new(&source);
    println!("== tokens ==");
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            break;
        }
    }
    token::print_tokens(&tokens);

    lexer.reset();
    let (script, errors) = Parser::new(lexer).parse();

    println!("== ast ==");
    println!("{}", script);

    if !errors.is_empty() {
        println!("== errors ==");
        let diagnostics: Vec<_> = errors.iter().map(|e| e.to_diagnostic()).collect();
        print!(
            "{}",
            render_diagnostics(
                &source,
                &path.display().to_string(),
                &diagnostics,
                config.color_enabled
            )
        );
        return 1;
    }

    let start = Instant::now();
    println!("== runtime ==");
    let mut interpreter = Interpreter::new();
    let result = interpreter.eval_script(&script);
    println!("== result ==");
    println!("program ends in {:?}", start.elapsed());

    match result {
        Ok(()) => 0,
        Err(error) => {
            error_message(config, &error.to_string());
            1
        }
    }
}

fn run_repl(config: &AppConfig) {
    if config.color_enabled {
        println!("{} [ver{}]", "Needle".cyan(), env!("CARGO_PKG_VERSION"));
        println!("exit using {}", "ctrl+c".red());
    } else {
        println!("Needle [ver{}]", env!("CARGO_PKG_VERSION"));
        println!("exit using ctrl+c");
    }

    let mut interpreter = Interpreter::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                let source = line.trim_end();
                if source.is_empty() {
                    continue;
                }
                if let Err(error) = interpreter.run(source) {
                    report_error(source, "repl", &error, config);
                }
            }
            Err(error) => {
                error_message(config, &format!("error reading input: {}", error));
                break;
            }
        }
    }
}

fn read_source(path: &Path, config: &AppConfig) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(source) => Some(source),
        Err(error) => {
            error_message(
                config,
                &format!("failed to read {}: {}", path.display(), error),
            );
            None
        }
    }
}

fn report_error(source: &str, file_name: &str, error: &ScriptError, config: &AppConfig) {
    match error {
        ScriptError::Parse(errors) => {
            let diagnostics: Vec<_> = errors.iter().map(|e| e.to_diagnostic()).collect();
            eprint!(
                "{}",
                render_diagnostics(source, file_name, &diagnostics, config.color_enabled)
            );
        }
        ScriptError::Runtime(error) => error_message(config, &error.to_string()),
    }
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}

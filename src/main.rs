// tarn - A small MAL-family Lisp with source cursors
// Copyright (c) 2025 Tom Waddington. MIT licensed.

use std::env;
use std::fs;
use std::process;

use tarn_core::{CancelToken, Env, TarnVal, eval, init_prelude, register_builtins};
use tarn_parser::{Parser, Position};

mod repl;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() == 2 && (args[1] == "--version" || args[1] == "-v") {
        println!("tarn v0.1.0");
        return;
    }

    // Create the base environment with builtins and the prelude
    let env = Env::new();
    register_builtins(&env);
    if let Err(e) = init_prelude(&env) {
        eprintln!("Failed to load prelude: {}", e);
        process::exit(1);
    }

    // *ARGV* holds the arguments after the script name
    let argv: Vec<TarnVal> = if args.len() > 2 {
        args[2..].iter().map(|a| TarnVal::string(a.as_str())).collect()
    } else {
        Vec::new()
    };
    env.set("*ARGV*", TarnVal::list(argv));

    // If a script is provided, run it; otherwise start the REPL
    if args.len() > 1 {
        if let Err(e) = run_file(&args[1], &env) {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    } else if let Err(e) = repl::run(&env) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Evaluate every form of a source file, with cursors naming the file.
fn run_file(path: &str, env: &Env) -> Result<(), String> {
    let source =
        fs::read_to_string(path).map_err(|e| format!("reading '{}': {}", path, e))?;

    let start = Position::in_module(path);
    let mut parser = Parser::positioned(&source, &start)
        .map_err(|e| e.to_string())?
        .with_host(env);

    let token = CancelToken::new();
    loop {
        match parser.parse() {
            Ok(Some(form)) => {
                eval(&form, env, &token).map_err(|e| e.to_string())?;
            }
            Ok(None) => return Ok(()),
            Err(e) => return Err(e.to_string()),
        }
    }
}

// tarn - Interactive REPL shell
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Interactive line-editor shell around the read–eval–print façade.
//!
//! Lines accumulate until the reader stops reporting incomplete input (the
//! `expected ')', got EOF` family), so multi-line forms can be typed
//! naturally. Completion draws from the environment's bound names plus the
//! special form names.

use std::path::PathBuf;

use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use tarn_core::{CancelToken, Env, repl};

const PROMPT: &str = "\x1b[32m»\x1b[0m ";
const CONTINUATION_PROMPT: &str = "\x1b[31m›\x1b[0m ";

/// Head symbols handled by the evaluator's dispatch, offered alongside the
/// environment's bindings when completing.
const SPECIAL_FORMS: &[&str] = &[
    "def!",
    "defmacro!",
    "let*",
    "fn*",
    "do",
    "if",
    "quote",
    "quasiquote",
    "quasiquoteexpand",
    "macroexpand",
    "try*",
    "catch*",
    "context*",
    "trace",
];

struct TarnHelper {
    env: Env,
}

impl Completer for TarnHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let head = &line[..pos];
        let start = head
            .rfind(|c: char| c.is_whitespace() || "()[]{}'`~@^".contains(c))
            .map_or(0, |i| i + head[i..].chars().next().map_or(1, char::len_utf8));
        let partial = &head[start..];

        let mut candidates: Vec<String> = self
            .env
            .symbols()
            .into_iter()
            .chain(SPECIAL_FORMS.iter().map(|s| s.to_string()))
            .filter(|name| name.starts_with(partial))
            .collect();
        candidates.sort();
        candidates.dedup();
        Ok((start, candidates))
    }
}

impl Hinter for TarnHelper {
    type Hint = String;
}

impl Highlighter for TarnHelper {}
impl Validator for TarnHelper {}
impl Helper for TarnHelper {}

fn history_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".tarn_history"))
}

/// Run the interactive REPL loop until EOF.
pub fn run(env: &Env) -> Result<(), String> {
    let mut rl: Editor<TarnHelper, DefaultHistory> =
        Editor::new().map_err(|e| e.to_string())?;
    rl.set_helper(Some(TarnHelper { env: env.clone() }));

    let history = history_path();
    if let Some(path) = &history {
        let _ = rl.load_history(path);
    }

    let token = CancelToken::new();
    let mut lines: Vec<String> = Vec::new();

    loop {
        let prompt = if lines.is_empty() {
            PROMPT
        } else {
            CONTINUATION_PROMPT
        };
        let line = match rl.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                lines.clear();
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.to_string()),
        };

        let _ = rl.add_history_entry(line.trim());
        lines.push(line.trim().to_string());
        let source = lines.join("\n");

        match repl(env, &source, &token) {
            Ok(out) => {
                lines.clear();
                println!("{}", out);
            }
            Err(e) if e.is_incomplete_input() => {
                // Keep reading; the form is not closed yet.
            }
            Err(e) if e.is_empty_input() => {
                lines.clear();
            }
            Err(e) => {
                lines.clear();
                println!("\x1b[31mError:\x1b[0m {}", e);
            }
        }
    }

    if let Some(path) = &history {
        let _ = rl.save_history(path);
    }
    Ok(())
}

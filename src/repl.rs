//! Interactive REPL with line editing and persistent history.

use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::engine::{eval_source, top_level_environment, Value};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("tailspin").join("history.txt"))
}

pub fn run() {
    println!("Tailspin REPL v{}", VERSION);
    println!("Enter Scheme expressions. Ctrl-D to exit.\n");

    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Failed to initialize line editor: {}", e);
            return;
        }
    };

    let history = history_path();
    if let Some(path) = &history {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = editor.load_history(path);
    }

    let env = top_level_environment();
    loop {
        match editor.readline("tailspin> ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(input);
                match eval_source(&env, input) {
                    Ok(Value::Unspecified) => {}
                    Ok(value) => println!("{}", value),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Read error: {}", e);
                break;
            }
        }
    }

    if let Some(path) = &history {
        let _ = editor.save_history(path);
    }
}

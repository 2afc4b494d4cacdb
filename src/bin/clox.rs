use std::{env, fs, process};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use loxtwo::{error, vm, EX_DATAERR, EX_SOFTWARE};

fn history_path() -> Option<std::path::PathBuf> {
    home::home_dir().map(|home| home.join(".clox_history"))
}

fn run_prompt() {
    let mut editor = DefaultEditor::new().expect("terminal supports line editing");

    let history = history_path();
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                error::reset_error();
                let _ = vm::interpret(&line);
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error reading line: {err}");
                break;
            }
        }
    }

    if let Some(path) = &history {
        let _ = editor.save_history(path);
    }
}

fn run_file(path: &str) -> i32 {
    let contents = fs::read_to_string(path).expect("Should have been able to read the file");
    error::reset_error();

    match vm::interpret(&contents) {
        Ok(()) => 0,
        Err(()) if error::did_runtime_error() => EX_SOFTWARE,
        Err(()) => EX_DATAERR,
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    match args.len() {
        n if n > 2 => {
            println!("Usage: clox [script]");
            process::exit(64);
        }
        2 => process::exit(run_file(&args[1])),
        _ => run_prompt(),
    }
}

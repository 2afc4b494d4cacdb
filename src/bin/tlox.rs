use std::{env, process};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use loxtwo::TreeWalk;

fn history_path() -> Option<std::path::PathBuf> {
    home::home_dir().map(|home| home.join(".tlox_history"))
}

fn run_prompt() {
    let mut editor = DefaultEditor::new().expect("terminal supports line editing");

    let history = history_path();
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    let mut tree_walk = TreeWalk::new();

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                tree_walk.run_source(&line);
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

fn main() {
    let args: Vec<String> = env::args().collect();

    match args.len() {
        n if n > 3 => {
            println!("Usage: tlox [--ast] [script]");
            process::exit(64);
        }
        3 if args[1] == "--ast" => {
            let contents = std::fs::read_to_string(&args[2]).expect("Should have been able to read the file");
            for line in loxtwo::debug_ast(&contents) {
                println!("{line}");
            }
        }
        2 => {
            let mut tree_walk = TreeWalk::new();
            process::exit(tree_walk.run_file(&args[1]));
        }
        _ => run_prompt(),
    }
}

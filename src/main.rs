use std::{env, process};

use rocks_lang::Rocks;

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut rocks = Rocks::new();

    match args.len() {
        n if n > 2 => {
            println!("Usage: rocks [script]");
            process::exit(64);
        }
        2 => rocks.run_file(&args[1]),
        _ => rocks.run_prompt(),
    }
}

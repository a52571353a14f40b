use std::env;
use std::fs;
use std::process;

use colored::Colorize;

use roboscript::engine::runtime::Interpreter;
use roboscript::lexing::parser::Parser;
use roboscript::scan::scanner::Scanner;

fn read_file() -> (String, String) {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Uso: {} <caminho/para/seu/arquivo.robo>", args[0]);
        process::exit(1);
    }
    let file_path = args[1].clone();
    match fs::read_to_string(&file_path) {
        Ok(source) => (file_path, source),
        Err(_) => {
            eprintln!("{} Arquivo '{}' não encontrado.", "Erro:".red(), file_path);
            process::exit(1);
        }
    }
}

fn run() {
    let (file_path, source) = read_file();

    println!("--- Executando RoboScript: {} ---", file_path);

    let tokens = match Scanner::new(&source).tokenize() {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("{} {}", "Erro Léxico:".red(), e);
            process::exit(1);
        }
    };

    let program = match Parser::new(tokens).parse() {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{} {}", "Erro Sintático:".red(), e);
            process::exit(1);
        }
    };

    let mut interpreter = Interpreter::new();
    if let Err(e) = interpreter.interpret(&program) {
        eprintln!("{} {}", "Erro de Execução:".red(), e);
        process::exit(1);
    }

    println!("{}", "--- Execução Concluída ---".green());
}

fn main() {
    run()
}

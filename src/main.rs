use std::env;
use std::fs;
use std::process;

use umlerd::db::DatabaseType;
use umlerd::document::Element;
use umlerd::parser::{Editor, Parser, create_parser};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <input.xmi> [options]", args[0]);
        eprintln!();
        eprintln!("Options:");
        eprintln!("  -d, --database <type>  Database type: sql, mongodb, cassandra (default: sql)");
        eprintln!("  -e, --editor <name>    Skip detection: modelio, genmymodel, visualparadigm");
        process::exit(1);
    }

    let input_path = &args[1];
    let mut database = DatabaseType::Sql;
    let mut editor: Option<Editor> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "-d" | "--database" => {
                i += 1;
                if i < args.len() {
                    database = DatabaseType::from_str(&args[i]).unwrap_or_else(|| {
                        eprintln!("Invalid database type: {}", args[i]);
                        process::exit(1);
                    });
                }
            }
            "-e" | "--editor" => {
                i += 1;
                if i < args.len() {
                    editor = Some(Editor::from_str(&args[i]).unwrap_or_else(|| {
                        eprintln!("Invalid editor: {}", args[i]);
                        process::exit(1);
                    }));
                }
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let input = match fs::read_to_string(input_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {}: {}", input_path, e);
            process::exit(1);
        }
    };

    let root = match Element::parse_xml(&input) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("Failed to read {}: {}", input_path, e);
            process::exit(1);
        }
    };

    let parser = match editor {
        Some(editor) => Parser::new(&root, editor, database),
        None => match create_parser(&root, database) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        },
    };

    let model = match parser.parse() {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&model) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize model: {}", e);
            process::exit(1);
        }
    }
}

use crossterm::style::Stylize;
use csv_pager::config::config::{parse_delimiter, Config};
use csv_pager::ui::pager_tui::run_pager;
use csv_pager::utils::logging::init_tracing;
use std::path::{Path, PathBuf};

fn print_help() {
    println!("{}", "csv-pager - page through delimited files".blue().bold());
    println!();
    println!("Usage: csv-pager [OPTIONS] <FILE>");
    println!();
    println!("{}", "Options:".yellow());
    println!("  {} <path>      - File to page (or pass it positionally)", "--file".green());
    println!("  {} <char>     - Field delimiter (default ',', use \\t for tabs)", "--comma".green());
    println!("  {} <path>    - Read settings from this config file", "--config".green());
    println!("  {} - Print a commented default config", "--generate-config".green());
    println!("  {}              - Show this help", "--help".green());
    println!();
    println!("{}", "Keys:".yellow());
    println!("  {}  - Move one line (prefix a count, e.g. 10j)", "j/k, Down/Up".green());
    println!("  {}  - Pan one column", "h/l, Left/Right".green());
    println!("  {}  - Page down / up", "Ctrl-n / Ctrl-p".green());
    println!("  {}            - Half page down", "Space".green());
    println!("  {}              - First / last page", "g / G".green());
    println!("  {}                - Toggle column width mode", "w".green());
    println!("  {}           - Redraw", "Ctrl-l".green());
    println!("  {}       - Quit", "q / Ctrl-c".green());
}

/// Value following `flag`, if the flag is present
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|pos| args.get(pos + 1))
        .map(String::as_str)
}

/// First argument that is neither a flag nor a flag's value
fn positional_file(args: &[String]) -> Option<&str> {
    const VALUE_FLAGS: [&str; 3] = ["--file", "--comma", "--config"];

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
            continue;
        }
        if !arg.starts_with("--") {
            return Some(arg.as_str());
        }
    }
    None
}

fn load_config(args: &[String]) -> Config {
    let loaded = match flag_value(args, "--config") {
        Some(path) => Config::load_from(Path::new(path)),
        None => Config::load(),
    };

    loaded.unwrap_or_else(|e| {
        eprintln!("{}", format!("Warning: {:#}, using defaults", e).yellow());
        Config::default()
    })
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.contains(&"--help".to_string()) || args.contains(&"-h".to_string()) {
        print_help();
        return;
    }

    if args.contains(&"--generate-config".to_string()) {
        print!("{}", Config::create_default_with_comments());
        return;
    }

    // Logging is best effort; the pager works without it
    let _log_path = init_tracing().ok();

    let config = load_config(&args);

    let raw_delimiter = flag_value(&args, "--comma").unwrap_or(config.behavior.delimiter.as_str());
    let delimiter = match parse_delimiter(raw_delimiter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            std::process::exit(1);
        }
    };

    let file = flag_value(&args, "--file").or_else(|| positional_file(&args));
    let Some(file) = file.map(PathBuf::from) else {
        eprintln!("{}", "Error: no file given".red());
        eprintln!("Usage: csv-pager [--comma <char>] <FILE>  (see --help)");
        std::process::exit(1);
    };

    if let Err(e) = run_pager(&file, delimiter, &config) {
        tracing::error!(target: "system", "Pager failed: {:#}", e);
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

use anyhow::Result;
use blockdoc_config::Config;
use blockdoc_engine::convert::{from_tree, to_tree};
use blockdoc_engine::editing::check_page;
use blockdoc_engine::models::{Block, Node};
use serde::Serialize;
use std::io::{Read, stdin};
use std::{env, fs, process};

const USAGE: &str = "\
Usage: blockdoc <command> [file]

Commands:
  to-tree    flat block list (JSON array) -> editor document
  to-flat    editor document -> flat block list
  roundtrip  flat block list -> editor document -> flat block list
  check      validate a flat block list

Reads from stdin when no file (or `-`) is given.";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    ToTree,
    ToFlat,
    Roundtrip,
    Check,
}

impl Command {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "to-tree" => Some(Self::ToTree),
            "to-flat" => Some(Self::ToFlat),
            "roundtrip" => Some(Self::Roundtrip),
            "check" => Some(Self::Check),
            _ => None,
        }
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        None | Some("-") => {
            let mut input = String::new();
            stdin().read_to_string(&mut input)?;
            Ok(input)
        }
        Some(path) => Ok(fs::read_to_string(path)?),
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

/// Run `command` over `input`, returning what should be printed.
fn run(command: Command, input: &str, config: &Config) -> Result<String> {
    let options = &config.convert;
    let pretty = config.output.pretty;

    match command {
        Command::ToTree => {
            let blocks: Vec<Block> = serde_json::from_str(input)?;
            to_json(&to_tree(&blocks, options), pretty)
        }
        Command::ToFlat => {
            let doc: Node = serde_json::from_str(input)?;
            to_json(&from_tree(&doc, options), pretty)
        }
        Command::Roundtrip => {
            let blocks: Vec<Block> = serde_json::from_str(input)?;
            let back = from_tree(&to_tree(&blocks, options), options);
            if back.len() != blocks.len() {
                log::warn!(
                    "roundtrip changed block count from {} to {}",
                    blocks.len(),
                    back.len()
                );
            }
            to_json(&back, pretty)
        }
        Command::Check => {
            let blocks: Vec<Block> = serde_json::from_str(input)?;
            check_page(&blocks)?;
            Ok(format!("ok: {} blocks", blocks.len()))
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(command) = args.get(1).and_then(|name| Command::parse(name)) else {
        eprintln!("{USAGE}");
        process::exit(1);
    };
    if args.len() > 3 {
        eprintln!("{USAGE}");
        process::exit(1);
    }

    let config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    log::debug!("Config path: {}", Config::config_path().display());

    let input = read_input(args.get(2).map(String::as_str))?;
    match run(command, &input, &config) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
    Ok(())
}

#[macro_use]
extern crate slog;

mod cli;

use clap::Parser as _;
use cli::Args;
use nws_lsr::domain::Product;
use nws_lsr::util;
use nws_lsr::{Config, Parser};
use std::fs;
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::thread;

fn main() {
    let args = Args::parse();
    let config = match Config::new(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("unable to load config: {}", e);
            process::exit(1);
        }
    };
    let logger = util::root_logger(util::parse_level(&config.log_level));

    info!(logger, "initializing"; "config" => format!("{:?}", config));

    let parser = match Parser::new(logger.clone(), config.parser_config()) {
        Ok(parser) => Arc::new(parser),
        Err(e) => {
            crit!(logger, "unable to build parser"; "error" => e.to_string());
            process::exit(1);
        }
    };

    let mut threads = vec![];

    for path in args.files {
        let parser = parser.clone();
        let logger = logger.new(o!("path" => path.display().to_string()));

        threads.push(thread::spawn(move || {
            let product = match read_product(&path) {
                Ok(product) => product,
                Err(e) => {
                    error!(logger, "unable to read product"; "error" => e.to_string());
                    return;
                }
            };

            let parsed = match parser.parse(&product) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!(logger, "product skipped"; "reason" => e.to_string());
                    return;
                }
            };

            match serde_json::to_string(&parsed) {
                Ok(json) => println!("{}", json),
                Err(e) => error!(logger, "unable to serialize"; "error" => e.to_string()),
            }
        }));
    }

    for thread in threads {
        let _ = thread.join();
    }
}

fn read_product(path: &Path) -> nws_lsr::Result<Product> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

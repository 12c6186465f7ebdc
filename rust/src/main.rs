//! Minimal CLI over the library. Every command maps onto one library call so
//! operators can check hashes and conversions by hand.

use std::env;

use qubit_security::config::{load_config, EncoderConfig};
use qubit_security::convert::{ConverterSet, TemporalKind};
use qubit_security::crypto::passwords::{truncate_password, MAX_PASSWORD_BYTES};
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Environment variable naming an optional JSON config file.
const CONFIG_ENV: &str = "QUBIT_SECURITY_CONFIG";

fn print_usage() {
    eprintln!("Commands:\n  hash-password <plaintext>\n  verify-password <plaintext> <bcrypt-hash>\n  truncate <plaintext>\n  convert <instant|date|local-date|local-date-time|local-time> <text>\n  load-config <path>\n\nSet {CONFIG_ENV} to a JSON config file to choose the bcrypt cost.");
}

fn init_logging(config: &EncoderConfig) {
    let filter = env::var("RUST_LOG")
        .ok()
        .or_else(|| config.debug_level.clone())
        .unwrap_or_else(|| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn runtime_config() -> Result<EncoderConfig, String> {
    match env::var(CONFIG_ENV) {
        Ok(path) => load_config(&path).map_err(|e| format!("config load failed: {e}")),
        Err(_) => Ok(EncoderConfig::default()),
    }
}

fn main() {
    let config = match runtime_config() {
        Ok(cfg) => cfg,
        Err(err) => return eprintln!("{err}"),
    };
    init_logging(&config);

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "hash-password" => {
            if args.len() != 3 {
                return print_usage();
            }
            match config.build_encoder().hash(&args[2]) {
                Ok(hash) => println!("{hash}"),
                Err(err) => eprintln!("hashing failed: {err}"),
            }
        }
        "verify-password" => {
            if args.len() != 4 {
                return print_usage();
            }
            match config.build_encoder().verify(&args[2], &args[3]) {
                Ok(matches) => println!("{}", if matches { "match" } else { "no-match" }),
                Err(err) => eprintln!("verification failed: {err}"),
            }
        }
        "truncate" => {
            if args.len() != 3 {
                return print_usage();
            }
            let truncated = truncate_password(&args[2]);
            let report = json!({
                "originalBytes": args[2].len(),
                "limit": MAX_PASSWORD_BYTES,
                "truncatedBytes": truncated.len(),
                "truncated": truncated,
            });
            match serde_json::to_string_pretty(&report) {
                Ok(text) => println!("{text}"),
                Err(err) => eprintln!("report serialization failed: {err}"),
            }
        }
        "convert" => {
            if args.len() != 4 {
                return print_usage();
            }
            let Some(kind) = TemporalKind::parse(&args[2]) else {
                return print_usage();
            };
            match ConverterSet::standard().convert(kind, &args[3]) {
                Ok(Some(value)) => println!("{value}"),
                Ok(None) => println!("null"),
                Err(err) => eprintln!("conversion failed: {err}"),
            }
        }
        "load-config" => {
            if args.len() != 3 {
                return print_usage();
            }
            match load_config(&args[2]) {
                Ok(cfg) => {
                    let printable = json!({
                        "bcrypt": { "cost": cfg.bcrypt.cost },
                        "debugLevel": cfg.debug_level,
                    });
                    match serde_json::to_string_pretty(&printable) {
                        Ok(text) => println!("{text}"),
                        Err(err) => eprintln!("config serialization failed: {err}"),
                    }
                }
                Err(err) => eprintln!("config load failed: {err}"),
            }
        }
        _ => print_usage(),
    }
}

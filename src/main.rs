//! Command line front-end for the langtag library.
//!
//! Usage:
//!   langtag parse <tag>                 # Print the parsed components as JSON
//!   langtag canonicalize <tag>          # Print the canonical form
//!   langtag match <tag> <range>         # Exit 0 if the range matches the tag
//!   langtag lookup <tag> <range>        # Print the lookup result for the range
//!   langtag transform <tag>             # Print the likely-subtags expansion
//!   langtag from-locale [locale]        # Convert a POSIX locale (default: current)
//!   langtag to-locale <tag>             # Convert a tag to a POSIX locale
//!
//! Optional environment variables:
//! - LANGTAG_REGISTRY (JSON registry file, defaults to the embedded data)
//! - LANGTAG_LOCALE (locale used by from-locale without an argument)
//! - RUST_LOG (log filter, defaults to langtag=info)

use anyhow::{bail, Context, Result};
use langtag::config::Config;
use langtag::{Registry, Tag};
use tracing::debug;

fn print_usage() {
    println!(
        r#"
langtag - BCP 47 language tag tool

USAGE:
    langtag <command> [arguments]

COMMANDS:
    parse <tag>             Print the parsed components as JSON
    canonicalize <tag>      Print the canonical form of a tag
    match <tag> <range>     Check whether a language range matches a tag
    lookup <tag> <range>    Print the tag as seen through a language range
    transform <tag>         Print the likely-subtags expansion of a tag
    from-locale [locale]    Convert a POSIX locale name to a tag
    to-locale <tag>         Convert a tag to a POSIX locale name
    help                    Show this message
"#
    );
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .with_context(|| format!("Missing argument: <{}>", name))
}

fn parse_tag(input: &str, registry: &Registry) -> Result<Tag> {
    Tag::parse(input, registry).with_context(|| format!("Failed to parse '{}'", input))
}

fn run(command: &str, args: &[String], config: &Config, registry: &Registry) -> Result<()> {
    match command {
        "parse" => {
            let tag = parse_tag(arg(args, 2, "tag")?, registry)?;
            println!("{}", serde_json::to_string_pretty(&tag.summary())?);
        }
        "canonicalize" => {
            let tag = parse_tag(arg(args, 2, "tag")?, registry)?;
            println!("{}", tag.canonicalize(registry)?);
        }
        "match" => {
            let tag = parse_tag(arg(args, 2, "tag")?, registry)?;
            let range = arg(args, 3, "range")?;
            let matched = tag.matches(range, registry)?;
            println!("{}", matched);
            if !matched {
                std::process::exit(1);
            }
        }
        "lookup" => {
            let tag = parse_tag(arg(args, 2, "tag")?, registry)?;
            match tag.lookup(arg(args, 3, "range")?, registry)? {
                Some(result) => println!("{}", result),
                None => std::process::exit(1),
            }
        }
        "transform" => {
            let tag = parse_tag(arg(args, 2, "tag")?, registry)?;
            match tag.transform(registry)? {
                Some(result) => println!("{}", result),
                None => bail!("No likely subtags for '{}'", tag),
            }
        }
        "from-locale" => {
            let locale = args
                .get(2)
                .cloned()
                .unwrap_or_else(|| config.locale_name());
            debug!("Converting locale '{}'", locale);
            let tag = Tag::from_locale(&locale, registry)
                .with_context(|| format!("Failed to convert locale '{}'", locale))?;
            println!("{}", tag);
        }
        "to-locale" => {
            let tag = parse_tag(arg(args, 2, "tag")?, registry)?;
            println!("{}", tag.to_locale(registry)?);
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            std::process::exit(2);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("langtag=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let command = args[1].as_str();
    if matches!(command, "--help" | "-h" | "help") {
        print_usage();
        return Ok(());
    }

    let config = Config::from_env()?;
    let registry = config.load_registry()?;

    run(command, &args, &config, &registry)
}

// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Decodes SQL string literals and evaluates LIKE patterns from the command
//! line.

use std::collections::BTreeMap;
use std::io;
use std::process;

use anyhow::Context;
use mz_ore::cli::{self, CliConfig, KeyValueArg};
use mz_ore::display::LazyString;
use mz_stringutil::case::{lower_ascii, lower_excluding_escape};
use mz_stringutil::format::{QuoteStyle, labels_to_string, quote_ident};
use mz_stringutil::like::Matcher;
use mz_stringutil::literal;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Decodes SQL string literals and evaluates LIKE patterns.
#[derive(clap::Parser, Debug)]
#[clap(name = "mz-stringutil", next_line_help = true)]
struct Args {
    /// Which log messages to emit, in `tracing_subscriber::EnvFilter` syntax.
    #[clap(long, value_name = "FILTER", default_value = "warn", global = true)]
    log_filter: String,
    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct PatternArgs {
    /// The escape character. Must be a single character no greater than U+00FF.
    #[clap(
        long,
        env = "MZ_LIKE_ESCAPE",
        value_parser = parse_escape,
        default_value = "\\"
    )]
    escape: u8,
    /// Match case-insensitively, as ILIKE does.
    #[clap(long, short = 'i')]
    case_insensitive: bool,
    /// The LIKE pattern.
    pattern: String,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Decode a quoted string literal, quotes included.
    Unquote { literal: String },
    /// Show how a LIKE pattern compiles.
    Compile {
        #[clap(flatten)]
        pattern: PatternArgs,
    },
    /// Match subjects against a LIKE pattern.
    Like {
        #[clap(flatten)]
        pattern: PatternArgs,
        /// The strings to match.
        #[clap(required = true)]
        subjects: Vec<String>,
    },
    /// Fold text to lowercase as for case-insensitive matching.
    Fold {
        /// Preserve this escape character while folding, as is done for
        /// patterns.
        #[clap(long, env = "MZ_LIKE_ESCAPE", value_parser = parse_escape)]
        escape: Option<u8>,
        text: String,
    },
    /// Render KEY=VALUE labels in canonical form.
    Labels {
        #[clap(required = true)]
        labels: Vec<KeyValueArg<String, String>>,
    },
    /// Quote an identifier for display.
    QuoteIdent {
        /// Use ANSI double quotes instead of backticks.
        #[clap(long)]
        ansi_quotes: bool,
        ident: String,
    },
}

/// Top-level flags without an explicit variable read `MZ_<FLAG>`.
const CLI_CONFIG: CliConfig = CliConfig {
    env_prefix: Some("MZ_"),
};

fn parse_escape(s: &str) -> Result<u8, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => u8::try_from(c)
            .map_err(|_| format!("escape character {:?} is outside U+0000..=U+00FF", c)),
        _ => Err("escape must be a single character".into()),
    }
}

fn main() {
    let args: Args = cli::parse_args(CLI_CONFIG);

    let filter = match EnvFilter::try_new(&args.log_filter) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("mz-stringutil: invalid log filter {:?}: {}", args.log_filter, e);
            process::exit(2);
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    if let Err(err) = run(args.command) {
        eprintln!("mz-stringutil: {:#}", err);
        process::exit(1);
    }
}

fn run(command: Command) -> Result<(), anyhow::Error> {
    match command {
        Command::Unquote { literal: input } => {
            let value = literal::unquote(&input)
                .with_context(|| format!("decoding literal {}", input))?;
            println!("{}", value);
        }
        Command::Compile { pattern } => {
            let matcher = Matcher::compile(
                &pattern.pattern,
                pattern.case_insensitive,
                pattern.escape,
            );
            let compiled = matcher.compiled();
            for (ty, c) in compiled.positions() {
                println!("{:?}\t{:?}", ty, c);
            }
            println!("normalized: {}", compiled);
            println!("regex: {}", compiled.to_regex());
            println!("exact: {}", compiled.is_exact_match());
        }
        Command::Like { pattern, subjects } => {
            let matcher = Matcher::compile(
                &pattern.pattern,
                pattern.case_insensitive,
                pattern.escape,
            );
            let normalized = LazyString::new(|| matcher.compiled().to_string());
            for subject in subjects {
                let matched = matcher.is_match(&subject);
                debug!(%normalized, subject = subject.as_str(), matched, "evaluated LIKE");
                println!("{}\t{}", subject, matched);
            }
        }
        Command::Fold { escape, text } => {
            let mut buf = text.into_bytes();
            let escape = escape.map(|escape| lower_excluding_escape(&mut buf, escape));
            if escape.is_none() {
                lower_ascii(&mut buf);
            }
            let folded = String::from_utf8(buf).context("folded text is not UTF-8")?;
            println!("{}", folded);
            if let Some(escape) = escape {
                println!("escape: {}", char::from(escape));
            }
        }
        Command::Labels { labels } => {
            let labels: BTreeMap<_, _> = labels.into_iter().map(|kv| (kv.key, kv.value)).collect();
            println!("{}", labels_to_string(&labels));
        }
        Command::QuoteIdent { ansi_quotes, ident } => {
            let style = if ansi_quotes {
                QuoteStyle::DoubleQuote
            } else {
                QuoteStyle::Backtick
            };
            println!("{}", quote_ident(&ident, style));
        }
    }
    Ok(())
}

// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository, or online at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Command-line parsing utilities.

use std::ffi::OsString;
use std::fmt::Display;
use std::str::FromStr;

use clap::{Arg, ArgMatches, Command, FromArgMatches, Parser};

/// A help template for use with clap that does not include the name of the
/// binary or the version in the help output.
const NO_VERSION_HELP_TEMPLATE: &str = "{about}

USAGE:
    {usage}

{all-args}";

/// Configures command-line parsing via [`parse_args`].
#[derive(Debug, Default, Clone)]
pub struct CliConfig {
    /// An optional prefix to apply to the environment variable name for all
    /// arguments that do not already name one.
    ///
    /// The prefix is joined to the argument's ID, uppercased, with hyphens
    /// replaced by underscores. For example, with a prefix of `MZ_`, the
    /// argument `--escape` reads `MZ_ESCAPE`. Only top-level arguments are
    /// affected; subcommand flags must name their variable explicitly.
    pub env_prefix: Option<&'static str>,
}

/// Parses command-line arguments according to a clap `Parser` after
/// applying Materialize-specific customizations.
pub fn parse_args<O>(config: CliConfig) -> O
where
    O: Parser,
{
    let matches = command::<O>(&config).get_matches();
    match O::from_arg_matches(&matches) {
        Ok(args) => args,
        Err(e) => e.exit(),
    }
}

/// Like [`parse_args`], but parses the given iterator of arguments instead of
/// the process's arguments, returning any error rather than exiting.
pub fn try_parse_args_from<O, I, T>(config: CliConfig, args: I) -> Result<O, clap::Error>
where
    O: Parser,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches: ArgMatches = command::<O>(&config).try_get_matches_from(args)?;
    O::from_arg_matches(&matches)
}

/// Builds the clap [`Command`] that [`parse_args`] parses with, for callers
/// that want to inspect it.
pub fn command<O>(config: &CliConfig) -> Command
where
    O: Parser,
{
    let mut clap = O::command()
        .args_override_self(true)
        .disable_version_flag(true)
        .help_template(NO_VERSION_HELP_TEMPLATE);
    if let Some(prefix) = config.env_prefix {
        clap = clap.mut_args(|arg| apply_env_prefix(arg, prefix));
    }
    clap
}

fn apply_env_prefix(arg: Arg, prefix: &str) -> Arg {
    if arg.get_env().is_some() || arg.is_positional() {
        return arg;
    }
    let name = format!(
        "{}{}",
        prefix,
        arg.get_id().as_str().to_uppercase().replace('-', "_")
    );
    arg.env(name)
}

/// A command-line argument of the form `KEY=VALUE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueArg<K, V> {
    /// The key of the command-line argument.
    pub key: K,
    /// The value of the command-line argument.
    pub value: V,
}

impl<K, V> FromStr for KeyValueArg<K, V>
where
    K: FromStr,
    K::Err: Display,
    V: FromStr,
    V::Err: Display,
{
    type Err = String;

    fn from_str(s: &str) -> Result<KeyValueArg<K, V>, String> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| "must have format KEY=VALUE".to_string())?;
        Ok(KeyValueArg {
            key: key.parse().map_err(|e| format!("parsing key: {}", e))?,
            value: value.parse().map_err(|e| format!("parsing value: {}", e))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Parser)]
    struct Args {
        /// The escape character.
        #[clap(long, default_value = "x")]
        escape: String,
        #[clap(long = "label")]
        labels: Vec<KeyValueArg<String, String>>,
    }

    #[test]
    fn test_key_value_arg() {
        let kv: KeyValueArg<String, String> = "zone=us-east=1".parse().unwrap();
        assert_eq!(kv.key, "zone");
        assert_eq!(kv.value, "us-east=1");

        let kv: KeyValueArg<String, String> = "empty=".parse().unwrap();
        assert_eq!(kv.value, "");

        let err = "novalue".parse::<KeyValueArg<String, String>>().unwrap_err();
        assert_eq!(err, "must have format KEY=VALUE");

        let err = "n=x".parse::<KeyValueArg<String, u32>>().unwrap_err();
        assert!(err.starts_with("parsing value: "), "{}", err);
    }

    #[test]
    fn test_parse_args_from() {
        let args: Args = try_parse_args_from(
            CliConfig::default(),
            ["prog", "--label", "a=1", "--label", "b=2", "--escape", "!"],
        )
        .unwrap();
        assert_eq!(args.escape, "!");
        assert_eq!(
            args.labels,
            vec![
                KeyValueArg {
                    key: "a".into(),
                    value: "1".into()
                },
                KeyValueArg {
                    key: "b".into(),
                    value: "2".into()
                },
            ]
        );

        let res: Result<Args, _> =
            try_parse_args_from(CliConfig::default(), ["prog", "--label", "bogus"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_env_prefix() {
        let config = CliConfig {
            env_prefix: Some("MZ_TEST_CLI_"),
        };
        let cmd = command::<Args>(&config);
        let escape = cmd
            .get_arguments()
            .find(|arg| arg.get_id() == "escape")
            .unwrap();
        assert_eq!(
            escape.get_env().and_then(|e| e.to_str()),
            Some("MZ_TEST_CLI_ESCAPE")
        );
    }
}

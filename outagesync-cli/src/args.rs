//! Command-line argument filtering.
//!
//! Arguments the CLI does not define are dropped before clap sees them, so
//! a scheduler can pass extra flags without breaking the run.

use clap::{Arg, Command, CommandFactory};

/// Result of [`retain_known_args`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FilteredArgs {
    /// Arguments to hand to clap, program name first.
    pub kept: Vec<String>,
    /// Arguments that were dropped.
    pub ignored: Vec<String>,
}

/// Keeps only the arguments `C` defines, plus the values they take.
///
/// The first item (the program name) is always kept. Everything after a
/// bare `--` is ignored.
pub fn retain_known_args<C, I, S>(args: I) -> FilteredArgs
where
    C: CommandFactory,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut cmd = C::command();
    cmd.build();

    let mut args = args.into_iter().map(Into::into);
    let mut out = FilteredArgs {
        kept: args.next().into_iter().collect(),
        ignored: Vec::new(),
    };

    while let Some(token) = args.next() {
        if token == "--" {
            out.ignored.push(token);
            out.ignored.extend(args.by_ref());
            break;
        }

        let needs_value = if let Some(long) = token.strip_prefix("--") {
            match long.split_once('=') {
                Some((name, _)) => find_long(&cmd, name).map(|_| false),
                None => find_long(&cmd, long).map(takes_value),
            }
        } else if let Some(shorts) = token.strip_prefix('-').filter(|s| !s.is_empty()) {
            let flags: Option<Vec<&Arg>> = shorts.chars().map(|c| find_short(&cmd, c)).collect();
            flags.map(|flags| flags.len() == 1 && takes_value(flags[0]))
        } else {
            None
        };

        match needs_value {
            Some(needs_value) => {
                out.kept.push(token);
                if needs_value {
                    out.kept.extend(args.next());
                }
            }
            None => out.ignored.push(token),
        }
    }

    out
}

fn find_long<'a>(cmd: &'a Command, name: &str) -> Option<&'a Arg> {
    cmd.get_arguments().find(|a| a.get_long() == Some(name))
}

fn find_short(cmd: &Command, short: char) -> Option<&Arg> {
    cmd.get_arguments().find(|a| a.get_short() == Some(short))
}

fn takes_value(arg: &Arg) -> bool {
    arg.get_action().takes_values()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cli;
    use clap::Parser;

    fn retain(args: &[&str]) -> FilteredArgs {
        retain_known_args::<Cli, _, _>(args.iter().copied())
    }

    #[test]
    fn test_known_args_pass_through() {
        let args = retain(&["outagesync", "--site-id", "kingfisher", "--dry-run"]);
        assert_eq!(args.kept, vec!["outagesync", "--site-id", "kingfisher", "--dry-run"]);
        assert!(args.ignored.is_empty());
    }

    #[test]
    fn test_unknown_long_args_dropped() {
        let args = retain(&[
            "outagesync",
            "--env=prod",
            "--site-id",
            "kingfisher",
            "--color",
            "stray",
            "--start-date=2023-01-01T00:00:00Z",
        ]);
        assert_eq!(
            args.kept,
            vec![
                "outagesync",
                "--site-id",
                "kingfisher",
                "--start-date=2023-01-01T00:00:00Z"
            ]
        );
        assert_eq!(args.ignored, vec!["--env=prod", "--color", "stray"]);
    }

    #[test]
    fn test_unknown_short_args_dropped() {
        let args = retain(&["outagesync", "-x", "-v", "-vq", "-vz"]);
        assert_eq!(args.kept, vec!["outagesync", "-v", "-vq"]);
        assert_eq!(args.ignored, vec!["-x", "-vz"]);
    }

    #[test]
    fn test_everything_after_double_dash_ignored() {
        let args = retain(&["outagesync", "--", "--site-id", "x"]);
        assert_eq!(args.kept, vec!["outagesync"]);
        assert_eq!(args.ignored, vec!["--", "--site-id", "x"]);
    }

    #[test]
    fn test_value_that_looks_like_flag_is_kept() {
        let args = retain(&["outagesync", "--site-id", "-odd-", "-q"]);
        assert_eq!(args.kept, vec!["outagesync", "--site-id", "-odd-", "-q"]);
    }

    #[test]
    fn test_filtered_args_parse() {
        let args = retain(&["outagesync", "--foo", "--site-id", "s1", "--bar=1", "extra"]);
        let cli = Cli::try_parse_from(args.kept).unwrap();
        assert_eq!(cli.site_id, "s1");
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_empty_args() {
        let args = retain(&[]);
        assert_eq!(args, FilteredArgs::default());
    }
}

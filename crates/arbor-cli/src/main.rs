mod outline;

use anyhow::{Context, Result};
use arbor_library::{BehaviorTreeLibrary, DebugLevel, LibraryConfig};
use clap::{crate_version, value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("arbor")
        .version(crate_version!())
        .about("Inspect and validate behavior tree archetypes")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("root")
                .long("root")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory tree references are resolved against"),
        )
        .arg(
            Arg::new("debug-level")
                .long("debug-level")
                .global(true)
                .value_parser(value_parser!(u8))
                .help("Parser diagnostic verbosity (0 = silent)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print the task outline of a tree")
                .arg(Arg::new("reference").required(true).help("Tree reference")),
        )
        .subcommand(
            Command::new("check")
                .about("Parse trees and report failures")
                .arg(
                    Arg::new("reference")
                        .required(true)
                        .action(ArgAction::Append)
                        .help("Tree references"),
                ),
        )
}

/// Config file first, then command-line overrides
fn load_config(matches: &ArgMatches) -> Result<LibraryConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => LibraryConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LibraryConfig::default(),
    };
    if let Some(root) = matches.get_one::<PathBuf>("root") {
        config = config.with_root_dir(root);
    }
    if let Some(&level) = matches.get_one::<u8>("debug-level") {
        config = config.with_debug_level(DebugLevel(level));
    }
    Ok(config)
}

fn init_tracing(debug_level: DebugLevel) {
    let default = match debug_level {
        DebugLevel::NONE => "warn",
        DebugLevel::LOW => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    init_tracing(config.debug_level);
    run(&matches, &config, &mut std::io::stdout().lock())
}

/// Execute the selected subcommand, writing its report to `out`
fn run(matches: &ArgMatches, config: &LibraryConfig, out: &mut impl Write) -> Result<()> {
    let library = BehaviorTreeLibrary::from_config(config);
    tracing::debug!(root = %config.root_dir.display(), "library ready");

    match matches.subcommand() {
        Some(("inspect", args)) => {
            let reference = args
                .get_one::<String>("reference")
                .context("missing reference")?;
            let archetype = library.archetype(reference)?;
            write!(out, "{}", outline::render(&archetype))?;
        }
        Some(("check", args)) => {
            let mut failures = 0usize;
            for reference in args.get_many::<String>("reference").into_iter().flatten() {
                match library.archetype(reference) {
                    Ok(archetype) => {
                        writeln!(out, "ok    {reference} ({} tasks)", archetype.node_count())?;
                    }
                    Err(err) => {
                        failures += 1;
                        writeln!(out, "FAIL  {reference}: {err}")?;
                    }
                }
            }
            if failures > 0 {
                anyhow::bail!("{failures} tree(s) failed to load");
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn command_line_overrides_defaults() {
        let matches = cli()
            .try_get_matches_from(["arbor", "--root", "trees", "--debug-level", "2", "check", "a.tree"])
            .unwrap();
        let config = load_config(&matches).unwrap();
        assert_eq!(config.root_dir, PathBuf::from("trees"));
        assert_eq!(config.debug_level, DebugLevel::HIGH);
    }

    fn run_in(dir: &tempfile::TempDir, args: &[&str]) -> (Result<()>, String) {
        let root = dir.path().to_str().unwrap();
        let argv = ["arbor", "--root", root].into_iter().chain(args.iter().copied());
        let matches = cli().try_get_matches_from(argv).unwrap();
        let config = load_config(&matches).unwrap();
        let mut out = Vec::new();
        let result = run(&matches, &config, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn tree_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("ok.tree"),
            "root -> sequence [ wait(seconds=2), moveTo ]\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("bad.tree"), "root -> sequence [\n").unwrap();
        dir
    }

    #[test]
    fn check_fails_when_any_tree_fails() {
        let dir = tree_dir();
        let (result, output) = run_in(&dir, &["check", "ok.tree", "bad.tree"]);

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "1 tree(s) failed to load");
        assert!(output.contains("ok    ok.tree (3 tasks)"));
        assert!(output.contains("FAIL  bad.tree:"));
    }

    #[test]
    fn check_passes_when_all_trees_load() {
        let dir = tree_dir();
        let (result, output) = run_in(&dir, &["check", "ok.tree"]);
        assert!(result.is_ok());
        assert_eq!(output, "ok    ok.tree (3 tasks)\n");
    }

    #[test]
    fn inspect_prints_outline() {
        let dir = tree_dir();
        let (result, output) = run_in(&dir, &["inspect", "ok.tree"]);

        result.unwrap();
        assert_eq!(output, "ok.tree (3 tasks)\n  sequence\n    wait(seconds=2)\n    moveTo\n");
    }

    #[test]
    fn inspect_reports_missing_tree() {
        let dir = tree_dir();
        let (result, output) = run_in(&dir, &["inspect", "ghost.tree"]);
        assert!(result.unwrap_err().to_string().contains("ghost.tree"));
        assert!(output.is_empty());
    }

    #[test]
    fn check_accepts_many_references() {
        let matches = cli()
            .try_get_matches_from(["arbor", "check", "a.tree", "b.tree"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        let refs: Vec<_> = args.get_many::<String>("reference").unwrap().collect();
        assert_eq!(refs, ["a.tree", "b.tree"]);
    }
}

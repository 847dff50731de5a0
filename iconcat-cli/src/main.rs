//! iconcat CLI - static icon catalog generator.
//!
//! Features:
//! - Full catalog generation from a directory of SVG icons
//! - Usage mining across downstream source trees
//! - Usage-based generation with a migration mapping file
//! - Incremental patching of an existing generated file
//! - Inventory and demo listing of an existing generated file

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use iconcat_core::{
    init_plain_logging, init_structured_logging, print_json, print_mining_json,
    print_mining_plain, print_plain, CatalogConfig, Generated, Iconcat, Layout,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Static icon catalog generator")]
#[command(group(ArgGroup::new("run_mode").args(["mine", "from_usages", "patch", "inventory"])))]
pub struct Cli {
    /// Configuration file (default: iconcat.toml in the working directory, if present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the solid/, regular/ and brands/ icon folders
    #[arg(long, value_name = "DIR")]
    icons: Option<PathBuf>,

    /// Generated file to write (or patch, or inventory)
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output layout: flat or namespaced
    #[arg(long, value_name = "LAYOUT")]
    layout: Option<Layout>,

    /// Downstream source tree to mine (repeatable)
    #[arg(long, value_name = "DIR")]
    mine_root: Vec<PathBuf>,

    /// Interchange file between mining and generation
    #[arg(long, value_name = "FILE")]
    interchange: Option<PathBuf>,

    /// Write a pathData|name migration mapping here after merging
    #[arg(long, value_name = "FILE")]
    mapping: Option<PathBuf>,

    /// Mine downstream sources and write the interchange file
    #[arg(long)]
    mine: bool,

    /// Generate only the icons found by mining
    #[arg(long)]
    from_usages: bool,

    /// Append mined icons missing from the existing generated file
    #[arg(long)]
    patch: bool,

    /// Print the demo listing of the existing generated file
    #[arg(long)]
    inventory: bool,

    /// Module path of the generated `icons` scope, used in the demo listing
    #[arg(long, value_name = "PATH", default_value = "icons")]
    icons_path: String,

    /// Render to stdout instead of writing any file
    #[arg(long)]
    dry_run: bool,

    /// Output the run summary in JSON format
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON on stderr
    #[arg(long)]
    log_json: bool,
}

/// Applies command line overrides on top of the loaded configuration.
fn build_runner(mut cfg: CatalogConfig, cli: &Cli) -> Iconcat {
    if let Some(mapping) = &cli.mapping {
        cfg.mapping_path = Some(mapping.clone());
    }

    let mut runner = Iconcat::new(cfg).dry_run(cli.dry_run);
    if let Some(icons) = &cli.icons {
        runner = runner.source_icon_root(icons);
    }
    if let Some(output) = &cli.output {
        runner = runner.output_path(output);
    }
    if let Some(layout) = cli.layout {
        runner = runner.layout(layout);
    }
    if !cli.mine_root.is_empty() {
        runner = runner.mine_roots(cli.mine_root.iter().cloned());
    }
    if let Some(interchange) = &cli.interchange {
        runner = runner.interchange_path(interchange);
    }
    runner
}

/// Prints a generation result: the artifact on a dry run, then the summary.
fn emit(generated: &Generated, json: bool) {
    if json {
        print_json(&generated.summary);
        return;
    }
    if generated.summary.dry_run {
        print!("{}", generated.text);
        println!();
    }
    print_plain(&generated.summary);
}

fn main() -> Result<()> {
    // Global panic guard
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] iconcat internal error: {}", info);
        eprintln!("[PANIC] The process will exit with code 2.");
        std::process::exit(2);
    }));

    let cli = Cli::parse();

    if cli.log_json {
        init_structured_logging();
    } else {
        init_plain_logging();
    }

    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let cfg = CatalogConfig::load(&cwd, cli.config.as_deref())
        .context("Failed to load configuration")?;
    let runner = build_runner(cfg, &cli);

    // Usage mining mode
    if cli.mine {
        let mined = runner.mine()?;
        if cli.json {
            print_mining_json(&mined.usages, mined.unique);
        } else {
            print_mining_plain(&mined.usages, mined.unique);
            println!();
            println!("Scanned {} file(s), skipped {}", mined.files_scanned, mined.files_skipped.len());
            match mined.written {
                Some(n) => println!("wrote {} line(s) to {}", n, mined.interchange_path.display()),
                None => println!("would write {}", mined.interchange_path.display()),
            }
        }
        return Ok(());
    }

    // Inventory mode
    if cli.inventory {
        let listed = runner.inventory(&cli.icons_path)?;
        if cli.json {
            let value = serde_json::json!({
                "summary": listed.summary,
                "listing": listed.text,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else {
            print!("{}", listed.text);
            println!();
            print_plain(&listed.summary);
        }
        return Ok(());
    }

    // Incremental patch mode
    if cli.patch {
        let patched = runner.patch_missing()?;
        emit(&patched, cli.json);
        return Ok(());
    }

    // Usage-based generation mode
    if cli.from_usages {
        let generated = runner.generate_from_usages()?;
        emit(&generated, cli.json);
        return Ok(());
    }

    // Default: full catalog generation
    let generated = runner.generate_full()?;
    emit(&generated, cli.json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("iconcat").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_mode_flags() {
        let cli = parse(&[]);
        assert!(!cli.mine && !cli.from_usages && !cli.patch && !cli.inventory);
        assert_eq!(cli.icons_path, "icons");
    }

    #[test]
    fn test_mode_flags_are_exclusive() {
        assert!(Cli::try_parse_from(["iconcat", "--mine", "--patch"]).is_err());
        assert!(Cli::try_parse_from(["iconcat", "--from-usages", "--inventory"]).is_err());
    }

    #[test]
    fn test_layout_parsed() {
        assert_eq!(parse(&["--layout", "flat"]).layout, Some(Layout::Flat));
        assert!(Cli::try_parse_from(["iconcat", "--layout", "diagonal"]).is_err());
    }

    #[test]
    fn test_overrides_applied() {
        let cli = parse(&[
            "--icons",
            "assets/svgs",
            "--output",
            "src/icons.rs",
            "--layout",
            "flat",
            "--mine-root",
            "../app",
            "--mine-root",
            "../site",
            "--interchange",
            "usages.txt",
            "--mapping",
            "map.txt",
        ]);
        let runner = build_runner(CatalogConfig::default(), &cli);
        let cfg = runner.config();
        assert_eq!(cfg.source_icon_root, PathBuf::from("assets/svgs"));
        assert_eq!(cfg.output_path, PathBuf::from("src/icons.rs"));
        assert_eq!(cfg.mode, Layout::Flat);
        assert_eq!(cfg.mine_roots, vec![PathBuf::from("../app"), PathBuf::from("../site")]);
        assert_eq!(cfg.interchange_path, PathBuf::from("usages.txt"));
        assert_eq!(cfg.mapping_path, Some(PathBuf::from("map.txt")));
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let cfg = CatalogConfig {
            mine_roots: vec![PathBuf::from("web")],
            ..CatalogConfig::default()
        };
        let runner = build_runner(cfg, &parse(&[]));
        assert_eq!(runner.config().mine_roots, vec![PathBuf::from("web")]);
        assert_eq!(runner.config().mode, Layout::Namespaced);
    }
}

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{Context, IntoDiagnostic, Result};

use stray_audit::manifest::parse_manifest;
use stray_audit::scanner::{scan, OrphanItem};
use stray_audit::selectors::classify;
use stray_core::{OutputFormat, StrayConfig};
use stray_history::authors::{dir_contributors, file_contributors, AuthorCount};
use stray_history::log::{collect_history, CommitInfo, LogOptions};

#[derive(Parser)]
#[command(
    name = "stray",
    version,
    about = "Find files that nobody owns",
    long_about = "Stray audits a source tree against an ownership manifest (CODEOWNERS)\n\
                   and reports every file and directory no entry claims, together with\n\
                   a summary of who has touched each orphan according to git history.\n\n\
                   Examples:\n  \
                     stray                       Audit the current directory\n  \
                     stray audit --path repo/    Audit another tree\n  \
                     stray audit --no-history    Skip git attribution\n  \
                     stray --format json         Machine-readable output\n  \
                     stray init                  Create a default .stray.toml"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .stray.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for audit results.\n\n\
                       Formats:\n  \
                         text  Human-readable listing with contributor bars (default)\n  \
                         json  Machine-readable JSON"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Audit a tree against its ownership manifest (the default)
    #[command(long_about = "Audit a tree against its ownership manifest.\n\n\
        Reads the manifest, classifies its selectors into owned directories and\n\
        owned files, then walks the tree. Owned and excluded directories are\n\
        pruned; a directory whose files are all unowned is reported as a single\n\
        item, otherwise each unowned file is reported on its own.\n\n\
        Examples:\n  stray audit\n  stray audit --path ../other-repo --manifest OWNERS")]
    Audit {
        /// Base directory to audit (default: $STRAY_ROOT, then current directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Manifest file to read (default: CODEOWNERS in the base directory)
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Skip git history attribution
        #[arg(long)]
        no_history: bool,
    },
    /// Create a default .stray.toml configuration file
    #[command(long_about = "Create a default .stray.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .stray.toml already exists.")]
    Init,
}

const DEFAULT_CONFIG: &str = r#"# Stray configuration
# See: https://github.com/strayaudit/stray

[audit]
# Manifest file name, relative to the audited directory.
# manifest = "CODEOWNERS"
# Directory basenames never descended into.
# excluded_dirs = [".git", "outdir", "sanity-out"]

[history]
# Attach git contribution history to each reported orphan.
# enabled = true
# Most frequent authors shown per orphan.
# max_authors = 3
# Only consider commits from the last N days (default: full history).
# since_days = 365
"#;

#[derive(serde::Serialize)]
struct OrphanReport {
    kind: &'static str,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    contributors: Option<Vec<AuthorCount>>,
}

fn resolve_base(path: Option<PathBuf>) -> Result<PathBuf> {
    let base = match path {
        Some(p) => p,
        None => match std::env::var_os("STRAY_ROOT") {
            Some(root) => PathBuf::from(root),
            None => PathBuf::from("."),
        },
    };
    if !base.is_dir() {
        miette::bail!(miette::miette!(
            help = "Pass --path to an existing directory, or set STRAY_ROOT",
            "Base directory does not exist: {}",
            base.display()
        ));
    }
    std::fs::canonicalize(&base)
        .into_diagnostic()
        .wrap_err(format!("resolving {}", base.display()))
}

/// Relative display path for an orphan, with `/` separators. The base
/// directory itself displays as `.`.
fn relative_display(path: &Path, base: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    if rel.as_os_str().is_empty() {
        return ".".to_string();
    }
    let s = rel.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        s.into_owned()
    } else {
        s.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

fn contributors_for(commits: &[CommitInfo], item: &OrphanItem, rel: &str) -> Vec<AuthorCount> {
    match item {
        OrphanItem::Directory(_) => dir_contributors(commits, rel),
        OrphanItem::File(_) => file_contributors(commits, rel),
    }
}

/// Columns of `#` for a contributor bar.
///
/// Raw commit counts below a top count of 10; beyond that, scaled so the most
/// active contributor fills a 10-column bar, with ties rounding to even.
fn bar_columns(count: u32, highest: u32) -> usize {
    if highest < 10 {
        count as usize
    } else {
        (count as f64 / highest as f64 * 10.0).round_ties_even() as usize
    }
}

/// Prints a bar chart of contributors, most active first.
fn render_contributors(contributors: &[AuthorCount]) {
    let Some(highest) = contributors.first().map(|c| c.commits) else {
        return;
    };
    let width_count = highest.to_string().len();
    let width_bar = highest.min(10) as usize;

    for c in contributors {
        println!(
            "  {:>width_count$} | {:<width_bar$} {}",
            c.commits,
            "#".repeat(bar_columns(c.commits, highest)),
            c.author,
        );
    }
}

fn run_audit(
    config: &StrayConfig,
    format: OutputFormat,
    verbose: bool,
    path: Option<PathBuf>,
    manifest: Option<PathBuf>,
    no_history: bool,
) -> Result<()> {
    let base = resolve_base(path)?;

    let manifest_path = manifest.unwrap_or_else(|| base.join(&config.audit.manifest));
    let manifest_content = match std::fs::read_to_string(&manifest_path) {
        Ok(content) => content,
        Err(_) => {
            miette::bail!(miette::miette!(
                help = "Create a CODEOWNERS file, or point --manifest at one",
                "Manifest not found: {}",
                manifest_path.display()
            ));
        }
    };

    let entries = parse_manifest(&manifest_content);
    let selectors: Vec<String> = entries.iter().map(|e| e.selector.clone()).collect();
    let ownership = classify(&selectors, &base).into_diagnostic()?;

    if verbose {
        eprintln!(
            "manifest: {} ({} entries)",
            manifest_path.display(),
            entries.len()
        );
        eprintln!(
            "ownership: {} directories, {} files",
            ownership.dir_count(),
            ownership.file_count()
        );
    }

    let excluded: HashSet<String> = config.audit.excluded_dirs.iter().cloned().collect();

    let history = if no_history || !config.history.enabled {
        None
    } else {
        let options = LogOptions {
            since_days: config.history.since_days,
        };
        match collect_history(&base, &options) {
            Ok(commits) => {
                if verbose {
                    eprintln!("history: {} commits", commits.len());
                }
                Some(commits)
            }
            Err(err) => {
                eprintln!("warning: no git history available: {err}");
                None
            }
        }
    };

    match format {
        OutputFormat::Text => {
            for item in scan(&base, &ownership, &excluded).into_diagnostic()? {
                let item = item.into_diagnostic()?;
                let rel = relative_display(item.path(), &base);

                match &history {
                    Some(commits) => {
                        let mut contributors = contributors_for(commits, &item, &rel);
                        contributors.truncate(config.history.max_authors);
                        if contributors.is_empty() {
                            println!("{} {} - not tracked.", item.marker(), rel);
                        } else {
                            println!("{} {}:", item.marker(), rel);
                            render_contributors(&contributors);
                        }
                    }
                    None => println!("{} {}", item.marker(), rel),
                }
            }
        }
        OutputFormat::Json => {
            let mut reports = Vec::new();
            for item in scan(&base, &ownership, &excluded).into_diagnostic()? {
                let item = item.into_diagnostic()?;
                let rel = relative_display(item.path(), &base);
                let contributors = history.as_ref().map(|commits| {
                    let mut c = contributors_for(commits, &item, &rel);
                    c.truncate(config.history.max_authors);
                    c
                });
                reports.push(OrphanReport {
                    kind: match item {
                        OrphanItem::Directory(_) => "directory",
                        OrphanItem::File(_) => "file",
                    },
                    path: rel,
                    contributors,
                });
            }
            let json = serde_json::json!({ "orphans": reports });
            println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => StrayConfig::from_file(path).into_diagnostic()?,
        None => {
            let default_path = Path::new(".stray.toml");
            if default_path.exists() {
                StrayConfig::from_file(default_path).into_diagnostic()?
            } else {
                StrayConfig::default()
            }
        }
    };

    match cli.command {
        None => run_audit(&config, cli.format, cli.verbose, None, None, false),
        Some(Command::Audit {
            path,
            manifest,
            no_history,
        }) => run_audit(&config, cli.format, cli.verbose, path, manifest, no_history),
        Some(Command::Init) => {
            let path = Path::new(".stray.toml");
            if path.exists() {
                miette::bail!(".stray.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .stray.toml with default configuration");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_columns_uses_raw_counts_below_ten() {
        assert_eq!(bar_columns(7, 9), 7);
        assert_eq!(bar_columns(1, 3), 1);
    }

    #[test]
    fn bar_columns_scales_to_ten_with_even_ties() {
        assert_eq!(bar_columns(20, 20), 10);
        assert_eq!(bar_columns(3, 10), 3);
        // 2.5 columns rounds to the even neighbor.
        assert_eq!(bar_columns(5, 20), 2);
        assert_eq!(bar_columns(15, 20), 8);
    }

    #[test]
    fn relative_display_maps_the_base_itself_to_dot() {
        let base = Path::new("/repo");
        assert_eq!(relative_display(base, base), ".");
        assert_eq!(relative_display(Path::new("/repo/tools"), base), "tools");
        assert_eq!(
            relative_display(Path::new("/repo/lib/extra.c"), base),
            "lib/extra.c"
        );
    }
}

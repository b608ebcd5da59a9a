//! `gfxstate` command line tool.
//!
//! Lists, inspects and combines collection files, and wraps an external build
//! command with stripping of collections that do not belong to its target.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use gfxstate_core::BuildTarget;
use gfxstate_editor::{
    BuildReport, BuildResult, BuildStripper, EditorCommands, Selection, StripSettings,
};
use gfxstate_io::{CollectionStore, read_meta};

#[derive(Parser, Debug)]
#[command(name = "gfxstate")]
#[command(about = "Manage graphics pipeline state collections")]
#[command(version)]
struct Cli {
    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List every collection under a folder
    List {
        root: PathBuf,
    },
    /// Merge sources into a destination collection and delete merged sources
    Combine {
        destination: PathBuf,
        #[arg(required = true)]
        sources: Vec<PathBuf>,
    },
    /// Run a build command with foreign-platform collections moved aside
    Build {
        /// Build target, e.g. StandaloneWindows64, Android, iOS
        #[arg(short, long)]
        target: BuildTarget,
        /// Collection folder to strip
        #[arg(short, long, value_name = "DIR")]
        root: PathBuf,
        /// Where stripped files wait during the build
        #[arg(long, value_name = "DIR")]
        holding: Option<PathBuf>,
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },
    /// Print a collection's key and variant table
    Inspect {
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn run(command: Cmd) -> anyhow::Result<ExitCode> {
    match command {
        Cmd::List { root } => list(&root)?,
        Cmd::Combine {
            destination,
            sources,
        } => combine(destination, sources)?,
        Cmd::Build {
            target,
            root,
            holding,
            command,
        } => return build(target, &root, holding, &command),
        Cmd::Inspect { file } => inspect(&file)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn list(root: &Path) -> anyhow::Result<()> {
    let store = CollectionStore::new(root);
    let paths = store.discover()?;
    if paths.is_empty() {
        println!("No collections under {}", root.display());
        return Ok(());
    }

    for path in paths {
        match store.read_header(&path) {
            Ok(header) => println!(
                "{}  {}  {} variants, {} states",
                path.display(),
                header.key,
                header.variant_count,
                header.state_count
            ),
            Err(e) => println!("{}  <unreadable: {e}>", path.display()),
        }
    }
    Ok(())
}

fn combine(destination: PathBuf, sources: Vec<PathBuf>) -> anyhow::Result<()> {
    let root = destination
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let commands = EditorCommands::new(CollectionStore::new(root));

    let mut paths = vec![destination.clone()];
    paths.extend(sources);
    let selection = Selection::new(paths).with_active(&destination);

    let Some(report) = commands.combine_selected(&selection)? else {
        bail!("combine needs a destination and at least one source collection");
    };
    for skipped in &report.skipped {
        println!("skipped {}: {}", skipped.path.display(), skipped.mismatches);
    }
    println!(
        "{}: +{} variants, +{} states from {} collection(s)",
        destination.display(),
        report.added_variants,
        report.added_states,
        report.combined.len()
    );
    Ok(())
}

fn build(
    target: BuildTarget,
    root: &Path,
    holding: Option<PathBuf>,
    command: &[String],
) -> anyhow::Result<ExitCode> {
    let holding = holding.unwrap_or_else(|| StripSettings::default().holding_folder);
    let mut stripper = BuildStripper::new(CollectionStore::new(root), holding);

    let report = BuildReport::new(target);
    let summary = stripper
        .on_preprocess(&report)
        .context("stripping collections before the build")?;
    println!(
        "Building {target} with {} collection(s), {} moved aside",
        summary.kept.len(),
        summary.stripped.len()
    );

    let (program, args) = command
        .split_first()
        .context("missing build command after `--`")?;
    let status = Command::new(program).args(args).status();

    let result = match &status {
        Ok(s) if s.success() => BuildResult::Succeeded,
        _ => BuildResult::Failed,
    };
    let restored = stripper.on_postprocess(&report.with_result(result));
    for file in &restored.failed {
        println!(
            "not restored: {} (still at {})",
            file.original_path.display(),
            file.temp_path.display()
        );
    }

    let status = status.with_context(|| format!("running `{program}`"))?;
    if !restored.is_complete() {
        bail!("{} stripped file(s) could not be restored", restored.failed.len());
    }
    Ok(match status.code() {
        Some(0) => ExitCode::SUCCESS,
        Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        None => ExitCode::FAILURE,
    })
}

fn inspect(file: &Path) -> anyhow::Result<()> {
    let store = CollectionStore::new(file.parent().unwrap_or(Path::new(".")));
    let collection = store.load(file)?;

    println!("{}", file.display());
    println!("  key:      {}", collection.key());
    if let Ok(meta) = read_meta(file) {
        println!("  guid:     {}", meta.guid);
    }
    println!(
        "  variants: {}, states: {}",
        collection.variant_count(),
        collection.total_state_count()
    );
    for entry in collection.entries() {
        println!("  {}  [{} state(s)]", entry.variant(), entry.states().len());
    }
    Ok(())
}

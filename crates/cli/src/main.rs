mod cmd;
mod completions;
mod error;
mod logging;

use std::error::Error as _;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use clap_complete::engine::ArgValueCompleter;
use clap_complete::env::CompleteEnv;
use obsidian_core::config::{ConfigLoader, Overrides};
use obsidian_core::query::OutputStyle;

use crate::error::CliError;

#[derive(Debug, Parser)]
#[command(
    name = "obsidian-cli",
    version,
    about = "Query and manage frontmatter in a vault of markdown notes"
)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Path to the vault
    #[arg(long, global = true, env = "OBSIDIAN_VAULT", value_name = "PATH")]
    vault: Option<PathBuf>,

    /// Config file to use instead of the default search path
    #[arg(long, global = true, env = "OBSIDIAN_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Colon-separated path prefixes to skip, e.g. `Assets/:.obsidian/`
    #[arg(
        long,
        global = true,
        env = "OBSIDIAN_BLACKLIST",
        value_delimiter = ':',
        value_name = "PREFIXES"
    )]
    blacklist: Option<Vec<String>>,

    /// Editor command used by `edit`, `new` and `journal`
    #[arg(long, global = true, env = "EDITOR", value_name = "CMD")]
    editor: Option<String>,

    /// Show diagnostics, skipped files and error causes
    #[arg(short, long, global = true)]
    verbose: bool,
}

impl GlobalArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            config: self.config.clone(),
            vault: self.vault.clone(),
            blacklist: self.blacklist.clone(),
            editor: self.editor.clone(),
            verbose: self.verbose,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List every note in the vault, skipping blacklisted paths
    Ls,

    /// Find notes by file name or title
    Find(FindArgs),

    /// Query notes by a frontmatter key
    Query(QueryArgs),

    /// Print the contents of a note
    Cat(CatArgs),

    /// View or update frontmatter of a note
    #[command(alias = "frontmatter")]
    Meta(MetaArgs),

    /// Add a unique identifier to a note's frontmatter
    AddUid(AddUidArgs),

    /// Create a new note
    New(NewArgs),

    /// Open a note in the editor
    Edit(NoteArg),

    /// Open the journal note for a date
    Journal(JournalArgs),

    /// Remove a note
    Rm(RmArgs),

    /// Show vault statistics and the effective configuration
    Info(InfoArgs),

    /// Run the Model Context Protocol server on stdio
    Serve,

    /// Print a shell completion script
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct NoteArg {
    /// Note path, path relative to the vault, or bare name
    #[arg(add = ArgValueCompleter::new(completions::complete_notes))]
    pub note: String,
}

#[derive(Debug, Args)]
pub struct FindArgs {
    /// Term to look for in file names and titles
    pub term: String,

    /// Require an exact, case-sensitive match on the file name
    #[arg(short, long)]
    pub exact: bool,
}

#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("predicate")
        .required(true)
        .multiple(false)
        .args(["exists", "missing", "value", "contains", "any"])
))]
pub struct QueryArgs {
    /// Frontmatter key to query
    pub key: String,

    /// Match notes that have the key
    #[arg(long)]
    pub exists: bool,

    /// Match notes that lack the key
    #[arg(long)]
    pub missing: bool,

    /// Match notes whose value equals this
    #[arg(long, value_name = "VALUE")]
    pub value: Option<String>,

    /// Match notes whose value contains this substring
    #[arg(long, value_name = "TEXT")]
    pub contains: Option<String>,

    /// Match every note
    #[arg(long)]
    pub any: bool,

    /// Group matches by the value of another key
    #[arg(long, value_name = "KEY")]
    pub group_by: Option<String>,

    /// Leave out matches that lack the group-by key
    #[arg(long, requires = "group_by")]
    pub drop_ungrouped: bool,

    /// Output style: path, title, table (or full), count, json
    #[arg(short, long, default_value = "path")]
    pub style: OutputStyle,

    /// Only print the number of matches
    #[arg(short, long)]
    pub count: bool,
}

#[derive(Debug, Args)]
pub struct CatArgs {
    #[command(flatten)]
    pub target: NoteArg,

    /// Include the frontmatter block
    #[arg(long)]
    pub show_frontmatter: bool,
}

#[derive(Debug, Args)]
pub struct MetaArgs {
    #[command(flatten)]
    pub target: NoteArg,

    /// Key to view or update; all keys are listed when omitted
    #[arg(long)]
    pub key: Option<String>,

    /// New value for the key
    #[arg(long, requires = "key")]
    pub value: Option<String>,
}

#[derive(Debug, Args)]
pub struct AddUidArgs {
    #[command(flatten)]
    pub target: NoteArg,

    /// Replace an existing identifier
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Note name relative to the vault; `.md` is optional
    pub note: String,

    /// Overwrite an existing note
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct JournalArgs {
    /// Date in YYYY-MM-DD format; today when omitted
    #[arg(long, value_parser = cmd::journal::parse_date)]
    pub date: Option<chrono::NaiveDate>,
}

#[derive(Debug, Args)]
pub struct RmArgs {
    #[command(flatten)]
    pub target: NoteArg,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: Shell,
}

fn main() -> ExitCode {
    CompleteEnv::with_factory(Cli::command).complete();

    let cli = Cli::parse();
    let verbose = cli.global.verbose;

    let result = run(cli);
    logging::shutdown();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err, verbose);
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Commands::Completions(args) = &cli.command {
        completions::print(args.shell);
        return Ok(());
    }

    let config = ConfigLoader::load(&cli.global.overrides())?;
    logging::init(&config)?;

    match cli.command {
        Commands::Ls => cmd::ls::run(&config),
        Commands::Find(args) => cmd::find::run(&config, &args),
        Commands::Query(args) => cmd::query::run(&config, args),
        Commands::Cat(args) => cmd::cat::run(&config, &args),
        Commands::Meta(args) => cmd::meta::run(&config, &args),
        Commands::AddUid(args) => cmd::add_uid::run(&config, &args),
        Commands::New(args) => cmd::new::run(&config, &args),
        Commands::Edit(args) => cmd::edit::run(&config, &args.note),
        Commands::Journal(args) => cmd::journal::run(&config, &args),
        Commands::Rm(args) => cmd::rm::run(&config, &args),
        Commands::Info(args) => cmd::info::run(&config, &args),
        Commands::Serve => cmd::serve::run(&config),
        Commands::Completions(_) => Ok(()),
    }
}

fn report(err: &CliError, verbose: bool) {
    eprintln!("Error: {err}");
    if verbose {
        let mut source = err.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
    }
}

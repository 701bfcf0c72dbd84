//! Query command implementation.

use obsidian_core::config::ResolvedConfig;
use obsidian_core::query::{MissingGroup, OutputStyle, Predicate, Query, render, run as run_query};
use obsidian_core::vault::VaultScanner;
use tracing::{debug, info};

use crate::QueryArgs;
use crate::error::CliError;

pub fn run(config: &ResolvedConfig, args: QueryArgs) -> Result<(), CliError> {
    let query = build_query(args.key, args.exists, args.missing, args.value, args.contains, args.any)?;
    let query = match args.group_by {
        Some(group) => query.group_by(group).missing_group(if args.drop_ungrouped {
            MissingGroup::Drop
        } else {
            MissingGroup::Bucket
        }),
        None => query,
    };
    let style = if args.count { OutputStyle::Count } else { args.style };
    debug!(?query, %style, "query");

    let scanner =
        VaultScanner::new(&config.vault_root, &config.exclusions).verbose(config.verbose);
    let result = run_query(&scanner, &query)?;
    if !result.skipped.is_empty() && !config.verbose {
        info!(skipped = result.skipped.len(), "notes with unreadable frontmatter were skipped");
    }

    let rendered = render(&result.matches, style, &query.key)?;
    println!("{rendered}");
    Ok(())
}

fn build_query(
    key: String,
    exists: bool,
    missing: bool,
    value: Option<String>,
    contains: Option<String>,
    any: bool,
) -> Result<Query, CliError> {
    let predicate = Predicate::from_flags(exists, missing, value, contains, any)?;
    Ok(Query::new(key, predicate))
}

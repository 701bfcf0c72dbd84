//! MCP tool definitions and handlers

use anyhow::{Context, Result};
use chrono::Local;
use obsidian_core::config::ResolvedConfig;
use obsidian_core::info::VaultInfo;
use obsidian_core::note::{NoteError, create_note, note_content};
use obsidian_core::query::{OutputStyle, Predicate, Query, render, run, search};
use obsidian_core::vault::{SkippedNote, VaultScanner, posix_path};
use obsidian_core::{list_notes, resolve_note};
use serde_json::Value;
use tracing::debug;

use crate::protocol::*;

pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        list_notes_definition(),
        find_notes_definition(),
        query_notes_definition(),
        get_note_content_definition(),
        create_note_definition(),
        get_vault_info_definition(),
    ]
}

pub fn list_notes_definition() -> ToolDefinition {
    ToolDefinition {
        name: "list_notes".to_string(),
        description: "List every note in the vault, skipping blacklisted directories".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {}
        }),
    }
}

pub fn find_notes_definition() -> ToolDefinition {
    ToolDefinition {
        name: "find_notes".to_string(),
        description: "Find notes whose file name or title matches a term".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "term": {
                    "type": "string",
                    "description": "Text to look for in file names and titles"
                },
                "exact": {
                    "type": "boolean",
                    "description": "Require an exact, case-sensitive match (default: false)",
                    "default": false
                }
            },
            "required": ["term"]
        }),
    }
}

pub fn query_notes_definition() -> ToolDefinition {
    ToolDefinition {
        name: "query_notes".to_string(),
        description: "Query notes by a frontmatter key. Give exactly one of exists, missing, value or contains".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "key": {
                    "type": "string",
                    "description": "Frontmatter key to query"
                },
                "exists": {
                    "type": "boolean",
                    "description": "Match notes that have the key"
                },
                "missing": {
                    "type": "boolean",
                    "description": "Match notes that lack the key"
                },
                "value": {
                    "type": "string",
                    "description": "Match notes whose value equals this"
                },
                "contains": {
                    "type": "string",
                    "description": "Match notes whose value contains this substring"
                },
                "group_by": {
                    "type": "string",
                    "description": "Group matches by the value of this key"
                },
                "style": {
                    "type": "string",
                    "enum": ["path", "title", "table", "count", "json"],
                    "description": "Output style (default: json)",
                    "default": "json"
                }
            },
            "required": ["key"]
        }),
    }
}

pub fn get_note_content_definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_note_content".to_string(),
        description: "Read a note by path, relative path or bare name".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "filename": {
                    "type": "string",
                    "description": "Note reference, with or without .md"
                },
                "show_frontmatter": {
                    "type": "boolean",
                    "description": "Include the frontmatter block (default: false)",
                    "default": false
                }
            },
            "required": ["filename"]
        }),
    }
}

pub fn create_note_definition() -> ToolDefinition {
    ToolDefinition {
        name: "create_note".to_string(),
        description: "Create a note with created, modified, title and identifier metadata".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "filename": {
                    "type": "string",
                    "description": "Note name relative to the vault; .md is optional"
                },
                "content": {
                    "type": "string",
                    "description": "Note body (default: a heading with the title)"
                },
                "force": {
                    "type": "boolean",
                    "description": "Overwrite an existing note (default: false)",
                    "default": false
                }
            },
            "required": ["filename"]
        }),
    }
}

pub fn get_vault_info_definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_vault_info".to_string(),
        description: "Vault statistics and effective configuration".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {}
        }),
    }
}

fn required_str<'a>(args: &'a Value, name: &str) -> Result<&'a str> {
    args.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow::anyhow!("Missing {name}"))
}

fn optional_str(args: &Value, name: &str) -> Option<String> {
    args.get(name).and_then(Value::as_str).map(str::to_string)
}

fn flag(args: &Value, name: &str) -> bool {
    args.get(name).and_then(Value::as_bool).unwrap_or(false)
}

fn scanner(config: &ResolvedConfig) -> VaultScanner {
    VaultScanner::new(&config.vault_root, &config.exclusions).verbose(config.verbose)
}

/// Add the skipped-note count as a separate text item so the main item
/// stays machine readable.
fn with_skipped(result: ToolResult, skipped: &[SkippedNote]) -> ToolResult {
    if skipped.is_empty() {
        return result;
    }
    result.with_text(format!("Skipped {} note(s) with unreadable frontmatter", skipped.len()))
}

pub fn handle_list_notes(config: &ResolvedConfig) -> Result<ToolResult> {
    let notes = list_notes(&config.vault_root, &config.exclusions)?;
    if notes.is_empty() {
        return Ok(ToolResult::text("No notes found in vault"));
    }
    let lines: Vec<String> = notes.iter().map(|p| posix_path(p)).collect();
    Ok(ToolResult::text(lines.join("\n")))
}

pub fn handle_find_notes(config: &ResolvedConfig, args: &Value) -> Result<ToolResult> {
    let term = required_str(args, "term")?;
    let exact = flag(args, "exact");
    debug!(term, exact, "find_notes");

    let found = search(&scanner(config), term, exact)?;
    if found.notes.is_empty() {
        let result = ToolResult::text(format!("No files found matching '{term}'"));
        return Ok(with_skipped(result, &found.skipped));
    }
    let mut text = format!("Found {} file(s) matching '{term}':", found.notes.len());
    for note in &found.notes {
        text.push_str("\n- ");
        text.push_str(&note.display_path());
    }
    Ok(with_skipped(ToolResult::text(text), &found.skipped))
}

pub fn handle_query_notes(config: &ResolvedConfig, args: &Value) -> Result<ToolResult> {
    let key = required_str(args, "key")?;
    let predicate = Predicate::from_flags(
        flag(args, "exists"),
        flag(args, "missing"),
        optional_str(args, "value"),
        optional_str(args, "contains"),
        false,
    )?;
    let style: OutputStyle = match args.get("style").and_then(Value::as_str) {
        Some(name) => name.parse()?,
        None => OutputStyle::Json,
    };

    let mut query = Query::new(key, predicate);
    if let Some(group) = optional_str(args, "group_by") {
        query = query.group_by(group);
    }
    debug!(?query, %style, "query_notes");

    let result = run(&scanner(config), &query)?;
    let rendered = render(&result.matches, style, &query.key)?;
    Ok(with_skipped(ToolResult::text(rendered.text()), &result.skipped))
}

pub fn handle_get_note_content(config: &ResolvedConfig, args: &Value) -> Result<ToolResult> {
    let filename = required_str(args, "filename")?;
    let path = match resolve_note(filename, &config.vault_root) {
        Ok(path) => path,
        Err(_) => return Ok(ToolResult::error(format!("File not found: {filename}"))),
    };
    let text = note_content(&path, flag(args, "show_frontmatter"))
        .with_context(|| format!("reading {filename}"))?;
    Ok(ToolResult::text(text))
}

pub fn handle_create_note(config: &ResolvedConfig, args: &Value) -> Result<ToolResult> {
    let filename = required_str(args, "filename")?;
    let name = filename.strip_suffix(".md").unwrap_or(filename);
    let content = args.get("content").and_then(Value::as_str);
    let force = flag(args, "force");

    match create_note(&config.vault_root, name, content, &config.ident_key, force) {
        Ok(_) => Ok(ToolResult::text(format!("Successfully created note: {name}.md"))),
        Err(NoteError::AlreadyExists(_)) => Ok(ToolResult::error(format!(
            "File {name}.md already exists. Use force=true to overwrite."
        ))),
        Err(e) => Err(e.into()),
    }
}

pub fn handle_get_vault_info(config: &ResolvedConfig) -> Result<ToolResult> {
    let info = VaultInfo::gather(config, Local::now().date_naive())?;
    Ok(ToolResult::text(info.to_text()))
}

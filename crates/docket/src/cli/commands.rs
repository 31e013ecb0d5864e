use super::render;
use super::setup::{Cli, Commands, SaveArgs, SearchArgs};
use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use directories::ProjectDirs;
use docketapp::api::{Author, DocketApi};
use docketapp::model::Document;
use docketapp::search::SearchRequest;
use docketapp::store::fs::FileStore;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let root = resolve_root(cli.root.clone())?;
    debug!(root = %root.display(), "opening store");
    let store = FileStore::open(&root)
        .with_context(|| format!("Failed to open store at {}", root.display()))?;
    let mut api = DocketApi::new(store);

    match cli.command {
        Commands::Save(args) => handle_save(&mut api, args, cli.json),
        Commands::Get { id } => handle_get(&api, &id, cli.json),
        Commands::Search(args) => handle_search(&api, args, cli.json),
        Commands::List => handle_list(&api, cli.json),
        Commands::Check => handle_check(&api, cli.json),
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn resolve_root(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(root) = explicit {
        return Ok(root);
    }
    ProjectDirs::from("com", "docket", "docket")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| anyhow!("Could not determine a data directory; pass --root"))
}

fn handle_save(api: &mut DocketApi<FileStore>, args: SaveArgs, json: bool) -> Result<ExitCode> {
    let content = match args.content {
        Some(content) => content,
        None => try_read_stdin()?.unwrap_or_default(),
    };
    let author_name = args.author_name.unwrap_or_else(|| args.author_id.clone());

    let mut document = Document::new(args.title, content, Author::new(args.author_id, author_name));
    if let Some(id) = args.id {
        document = document.with_id(id);
    }

    let saved = api.save(document)?;
    if json {
        println!("{}", render::document_json(&saved)?);
    } else {
        print!("{}", render::render_saved(&saved));
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_get(api: &DocketApi<FileStore>, id: &str, json: bool) -> Result<ExitCode> {
    let Some(document) = api.find_by_id(id)? else {
        bail!("No document with id '{}'", id);
    };

    if json {
        println!("{}", render::document_json(&document)?);
    } else {
        let path = api.content_path(&document);
        print!("{}", render::render_full(&document, &path));
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_search(api: &DocketApi<FileStore>, args: SearchArgs, json: bool) -> Result<ExitCode> {
    // Bodies are only loaded when a content filter ran.
    let hydrated = !args.contains.is_empty();
    let results = api.search(&search_request(args))?;
    if json {
        println!("{}", render::documents_json(&results, hydrated)?);
    } else {
        print!("{}", render::render_list(&results, Utc::now()));
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_list(api: &DocketApi<FileStore>, json: bool) -> Result<ExitCode> {
    let documents = api.list()?;
    if json {
        println!("{}", render::documents_json(&documents, false)?);
    } else {
        print!("{}", render::render_list(&documents, Utc::now()));
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_check(api: &DocketApi<FileStore>, json: bool) -> Result<ExitCode> {
    let report = api.verify()?;
    if json {
        println!("{}", render::report_json(&report)?);
    } else {
        print!("{}", render::render_report(&report));
    }

    if report.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn search_request(args: SearchArgs) -> SearchRequest {
    let mut request = SearchRequest::new();
    for prefix in args.prefixes {
        request = request.with_title_prefix(prefix);
    }
    for author in args.authors {
        request = request.with_author(author);
    }
    for word in args.contains {
        request = request.with_content(word);
    }
    if let Some(from) = args.from {
        request = request.created_from(from);
    }
    if let Some(to) = args.to {
        request = request.created_to(to);
    }
    request
}

/// Piped stdin, or `None` when stdin is a terminal.
fn try_read_stdin() -> Result<Option<String>> {
    if std::io::stdin().is_terminal() {
        return Ok(None);
    }
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read stdin")?;
    Ok(Some(content))
}

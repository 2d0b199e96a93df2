//! Command dispatch.
//!
//! Every invocation opens one board session, runs a single command through
//! the mutation engine and closes the session, which saves the board.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use log::info;
use taskflow_core::db::open_db;
use taskflow_core::{
    init_from_config, BoardService, ListId, Outcome, SqliteSlotRepository, TaskId, TaskPatch,
    TaskflowConfig,
};

use crate::cli::{Cli, Command, GlobalArgs, ListAction, TaskAction};
use crate::output::{print_board, TerminalView};

const DB_PATH_ENV: &str = "TASKFLOW_DB_PATH";
const DEFAULT_DB_FILE_NAME: &str = "taskflow.sqlite3";

type Service = BoardService<SqliteSlotRepository, TerminalView>;

pub fn handle(cli: Cli) -> Result<()> {
    let config = load_config(&cli.global)?;
    init_from_config(&config.logging).context("failed to initialize logging")?;

    let db_path = resolve_db_path(cli.global.db.clone());
    let conn = open_db(&db_path)
        .with_context(|| format!("failed to open database `{}`", db_path.display()))?;
    let repo = SqliteSlotRepository::try_new(conn)?;
    info!(
        "event=cli_start module=cli status=ok db_path={}",
        db_path.display()
    );

    let mut service = BoardService::open(repo, TerminalView::default(), config.engine);
    service.view_mut().echo_board = cli.global.show;

    let result = dispatch(&mut service, cli.command);
    drop(service.close());
    result
}

fn load_config(global: &GlobalArgs) -> Result<TaskflowConfig> {
    let mut config = match &global.config {
        Some(path) => TaskflowConfig::load(path)?,
        None => TaskflowConfig::default(),
    };
    if let Some(dir) = &global.log_dir {
        config.logging.log_dir = Some(dir.clone());
    }
    if let Some(level) = &global.log_level {
        config.logging.level = level.clone();
    }
    Ok(config)
}

/// `--db` wins, then `TASKFLOW_DB_PATH`, then the system temp dir.
fn resolve_db_path(flag: Option<PathBuf>) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }
    match std::env::var_os(DB_PATH_ENV) {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
    }
}

fn dispatch(service: &mut Service, command: Command) -> Result<()> {
    match command {
        Command::Board => {
            print_board(service.store(), service.history().len());
            Ok(())
        }
        Command::List { action } => list(service, action),
        Command::Task { action } => task(service, action),
        Command::Undo => undo(service),
        Command::History => {
            history(service);
            Ok(())
        }
        Command::Export { out } => export(service, out),
        Command::Import { file, yes } => import(service, file, yes),
    }
}

fn list(service: &mut Service, action: ListAction) -> Result<()> {
    match action {
        ListAction::Add { title } => match service.create_list(&title) {
            Some(id) => println!("created list #{id}"),
            None => bail!("list title must not be blank"),
        },
        ListAction::Rename { id, title } => {
            report(service.update_list_title(ListId(id), &title));
        }
        ListAction::Delete { id, yes } => {
            let outcome = service.delete_list(ListId(id));
            resolve(service, outcome, yes)?;
        }
    }
    Ok(())
}

fn task(service: &mut Service, action: TaskAction) -> Result<()> {
    match action {
        TaskAction::Add { list, title } => match service.create_task(&title, ListId(list)) {
            Some(id) => println!("created task #{id}"),
            None => bail!("task title must not be blank and list #{list} must exist"),
        },
        TaskAction::Edit {
            id,
            title,
            description,
        } => {
            let patch = match (title, description) {
                (Some(title), Some(description)) => TaskPatch::DetailsChange { title, description },
                (Some(title), None) => TaskPatch::TitleChange { title },
                (None, Some(description)) => TaskPatch::DescriptionChange { description },
                (None, None) => bail!("pass --title and/or --description"),
            };
            report(service.update_task(TaskId(id), patch));
        }
        TaskAction::Done { id } => {
            report(service.update_task(TaskId(id), TaskPatch::SetDone { done: true }));
        }
        TaskAction::Reopen { id } => {
            report(service.update_task(TaskId(id), TaskPatch::SetDone { done: false }));
        }
        TaskAction::Move { id, list } => report(service.move_task(TaskId(id), ListId(list))),
        TaskAction::Delete { id, yes } => {
            let task_id = TaskId(id);
            let Some(task) = service.store().task(task_id) else {
                println!("nothing changed");
                return Ok(());
            };
            let question = format!("Delete task #{id} \"{}\"?", task.title);
            if yes || ask(&question)? {
                report(service.delete_task(task_id));
            } else {
                println!("aborted");
            }
        }
    }
    Ok(())
}

fn undo(service: &mut Service) -> Result<()> {
    match service.undo_last_action()? {
        Some(kind) => println!("undid {kind}"),
        None => println!("nothing to undo"),
    }
    Ok(())
}

fn history(service: &Service) {
    if service.history().is_empty() {
        println!("no history");
        return;
    }
    for record in service.history().iter().rev() {
        let at = chrono::DateTime::from_timestamp_millis(record.timestamp)
            .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| record.timestamp.to_string());
        println!("{at}  {}", record.action.kind_label());
    }
}

fn export(service: &mut Service, out: Option<PathBuf>) -> Result<()> {
    let file = service.export_board()?;
    let path = out.unwrap_or_else(|| PathBuf::from(&file.file_name));
    fs::write(&path, &file.contents)
        .with_context(|| format!("failed to write `{}`", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}

fn import(service: &mut Service, file: PathBuf, yes: bool) -> Result<()> {
    let text = fs::read_to_string(&file)
        .with_context(|| format!("failed to read `{}`", file.display()))?;
    let ticket = service.import_board(&text)?;
    resolve(service, Outcome::NeedsConfirmation(ticket), yes)
}

fn resolve(service: &mut Service, outcome: Outcome, yes: bool) -> Result<()> {
    let ticket = match outcome {
        Outcome::Applied => return Ok(()),
        Outcome::Skipped => {
            println!("nothing changed");
            return Ok(());
        }
        Outcome::NeedsConfirmation(ticket) => ticket,
    };

    if yes || ask(&ticket.prompt().message())? {
        if service.confirm(ticket).is_skipped() {
            println!("nothing changed");
        }
    } else {
        service.decline(ticket);
        println!("aborted");
    }
    Ok(())
}

fn ask(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn report(changed: bool) {
    if !changed {
        println!("nothing changed");
    }
}

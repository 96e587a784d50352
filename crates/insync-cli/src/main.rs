//! InSync command line driver
//!
//! Runs one editing-session operation per invocation against the configured
//! scenario API. Local slots (draft and selected project) persist in a JSON
//! file between runs.

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use insync_client::HttpScenarioStore;
use insync_editor::{
    EditorConfig, EditorError, EditorSession, LogNavigator, SessionDeps, StaticIdentity,
    TextBuffer, TracingNotifier,
};
use insync_model::{author_label, created_at_label, ProjectId, Scenario, ScenarioId, UserId};
use insync_storage::{FileStorage, KeyValueStorage};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_STORE: &str = ".insync/slots.json";

fn cli() -> Command {
    Command::new("insync")
        .version(insync_editor::VERSION)
        .about("InSync scenario editor: load, save, rename and delete scenarios")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("store")
                .long("store")
                .global(true)
                .default_value(DEFAULT_STORE)
                .value_parser(value_parser!(PathBuf))
                .help("File holding the local draft and selected project"),
        )
        .arg(
            Arg::new("token")
                .long("token")
                .global(true)
                .help("Bearer token sent with every request"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .help("Signed-in user id; rename and delete require one"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("load")
                .about("Load a scenario and stage its web steps as the draft")
                .arg(Arg::new("id").required(true).help("Scenario id")),
        )
        .subcommand(
            Command::new("save")
                .about("Load a scenario, then push the draft and android steps")
                .arg(Arg::new("id").required(true).help("Scenario id"))
                .arg(
                    Arg::new("web-file")
                        .long("web-file")
                        .value_parser(value_parser!(PathBuf))
                        .help("File with edited web steps; omitted keeps the server's"),
                )
                .arg(
                    Arg::new("android-file")
                        .long("android-file")
                        .value_parser(value_parser!(PathBuf))
                        .help("File with edited android steps; omitted keeps the server's"),
                ),
        )
        .subcommand(
            Command::new("rename")
                .about("Rename a scenario")
                .arg(Arg::new("id").required(true).help("Scenario id"))
                .arg(Arg::new("title").required(true).help("New title")),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a scenario")
                .arg(Arg::new("id").required(true).help("Scenario id")),
        )
        .subcommand(
            Command::new("select-project")
                .about("Set the selected project marker")
                .arg(Arg::new("project").required(true).help("Project id")),
        )
        .subcommand(
            Command::new("draft")
                .about("Inspect the local draft")
                .subcommand_required(true)
                .subcommand(Command::new("show").about("Print the draft"))
                .subcommand(Command::new("clear").about("Empty the draft slot")),
        )
}

/// Shared state built from the global options
struct Workspace {
    config: EditorConfig,
    storage: Arc<FileStorage>,
    token: Option<String>,
    user: Option<UserId>,
}

impl Workspace {
    fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let config = match matches.get_one::<PathBuf>("config") {
            Some(path) => EditorConfig::from_toml_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => EditorConfig::default(),
        }
        .with_env_overrides()
        .context("applying environment overrides")?;

        let store_path = matches
            .get_one::<PathBuf>("store")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE));
        let storage = FileStorage::open(&store_path)
            .with_context(|| format!("opening slot storage {}", store_path.display()))?;

        let user = matches
            .get_one::<String>("user")
            .map(UserId::new)
            .transpose()
            .context("invalid --user")?;

        Ok(Self {
            config,
            storage: Arc::new(storage),
            token: matches.get_one::<String>("token").cloned(),
            user,
        })
    }

    fn session(&self, surface: TextBuffer) -> Result<EditorSession> {
        let mut store = HttpScenarioStore::new(&self.config.api)
            .with_context(|| format!("invalid API url {}", self.config.api.base_url))?;
        if let Some(token) = &self.token {
            store = store.with_bearer_token(token.clone());
        }
        let identity = match &self.user {
            Some(user) => StaticIdentity::signed_in(user.clone()),
            None => StaticIdentity::signed_out(),
        };

        let deps = SessionDeps {
            store: Arc::new(store),
            storage: self.storage.clone(),
            identity: Arc::new(identity),
            surface: Arc::new(surface),
            notifier: Arc::new(TracingNotifier),
            navigator: Arc::new(LogNavigator),
        };
        Ok(EditorSession::new(self.config.clone(), deps))
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_card(scenario: &Scenario, viewer: Option<&UserId>) {
    println!("{} ({})", scenario.title, scenario.id);
    println!("  Project: {}", scenario.project_id);
    println!("  Author: {}", author_label(scenario, viewer));
    if let Some(created) = created_at_label(scenario, chrono::Utc::now()) {
        println!("  Created: {created}");
    }
    println!(
        "  Web steps: {}",
        if scenario.web_steps().is_some() { "present" } else { "none" }
    );
    println!(
        "  Android steps: {}",
        if scenario.steps_android.is_some() { "present" } else { "none" }
    );
}

/// Load `id`; on failure wait out the redirect delay like an open editor would
async fn open(session: &mut EditorSession, id: &ScenarioId) -> Result<Option<Scenario>> {
    match session.load(id.clone()).await.cloned() {
        Ok(scenario) => Ok(Some(scenario)),
        Err(err @ EditorError::NotFound { .. }) => {
            eprintln!("{err}");
            session.wait_for_exit().await;
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

/// Edited payloads for `save`; `None` keeps the loaded value
#[derive(Debug, Default)]
struct SaveEdits {
    web: Option<String>,
    android: Option<String>,
}

impl SaveEdits {
    fn from_args(args: &ArgMatches) -> Result<Self> {
        let read = |name: &str| -> Result<Option<String>> {
            args.get_one::<PathBuf>(name)
                .map(|path| {
                    std::fs::read_to_string(path)
                        .with_context(|| format!("reading {}", path.display()))
                })
                .transpose()
        };
        Ok(Self {
            web: read("web-file")?,
            android: read("android-file")?,
        })
    }
}

/// Load `id`, stage `edits` over the loaded payloads, then save
///
/// Returns `false` when the scenario could not be loaded.
async fn save_edited(
    session: &mut EditorSession,
    surface: &TextBuffer,
    id: &ScenarioId,
    edits: SaveEdits,
) -> Result<bool> {
    let Some(scenario) = open(session, id).await? else {
        return Ok(false);
    };

    if let Some(web) = &edits.web {
        session.set_draft(web).context("staging web steps")?;
    }
    match edits.android.or(scenario.steps_android) {
        Some(text) => surface.set_text(text),
        None => surface.unmount(),
    }

    session.save().await.context("save failed")?;
    Ok(true)
}

fn scenario_arg(args: &ArgMatches) -> Result<ScenarioId> {
    let raw = args
        .get_one::<String>("id")
        .context("missing scenario id")?;
    ScenarioId::new(raw.as_str()).context("invalid scenario id")
}

async fn run(matches: &ArgMatches) -> Result<ExitCode> {
    let ctx = Workspace::from_matches(matches)?;

    match matches.subcommand() {
        Some(("load", args)) => {
            let id = scenario_arg(args)?;
            let mut session = ctx.session(TextBuffer::default())?;
            let Some(scenario) = open(&mut session, &id).await? else {
                return Ok(ExitCode::FAILURE);
            };
            print_card(&scenario, ctx.user.as_ref());
        }
        Some(("save", args)) => {
            let id = scenario_arg(args)?;
            let edits = SaveEdits::from_args(args)?;
            let surface = TextBuffer::default();
            let mut session = ctx.session(surface.clone())?;
            if !save_edited(&mut session, &surface, &id, edits).await? {
                return Ok(ExitCode::FAILURE);
            }
            println!("Saved {id}");
        }
        Some(("rename", args)) => {
            let id = scenario_arg(args)?;
            let title = args.get_one::<String>("title").context("missing title")?;
            let mut session = ctx.session(TextBuffer::default())?;
            if open(&mut session, &id).await?.is_none() {
                return Ok(ExitCode::FAILURE);
            }
            let reply = session
                .rename(&id, title)
                .await
                .context("rename failed")?;
            println!("{}", reply.message);
        }
        Some(("delete", args)) => {
            let id = scenario_arg(args)?;
            let mut session = ctx.session(TextBuffer::default())?;
            if open(&mut session, &id).await?.is_none() {
                return Ok(ExitCode::FAILURE);
            }
            let reply = session.delete(&id).await.context("delete failed")?;
            println!("{}", reply.message);
        }
        Some(("select-project", args)) => {
            let raw = args
                .get_one::<String>("project")
                .context("missing project id")?;
            let project = ProjectId::new(raw.as_str()).context("invalid project id")?;
            ctx.storage
                .set(&ctx.config.marker_key, project.as_str())
                .context("writing project marker")?;
            println!("Selected project {project}");
        }
        Some(("draft", args)) => match args.subcommand() {
            Some(("show", _)) => {
                let draft = ctx
                    .storage
                    .get(&ctx.config.draft_key)
                    .context("reading draft")?;
                match draft {
                    Some(raw) => match serde_json::from_str::<serde_json::Value>(&raw) {
                        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                        Err(_) => println!("{raw}"),
                    },
                    None => println!("(empty)"),
                }
            }
            Some(("clear", _)) => {
                ctx.storage
                    .remove(&ctx.config.draft_key)
                    .context("clearing draft")?;
                println!("Draft cleared");
            }
            Some((other, _)) => bail!("unknown draft command {other}"),
            None => bail!("missing draft command"),
        },
        Some((other, _)) => bail!("unknown command {other}"),
        None => bail!("missing command"),
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    match run(&matches).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("command failed: {err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

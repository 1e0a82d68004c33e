mod app;
mod catalog;
mod cli;
mod columns;
mod config;
mod controller;
mod error;
mod extract;
mod input;
mod inspect;
mod k8s;
mod logging;
mod model;
mod render;
mod templates;
mod ui;
mod watch;

use anyhow::{Context, Result};
use app::{App, AppCommand};
use clap::Parser;
use cli::CliArgs;
use config::RuntimeConfig;
use crossterm::event::{
    Event, EventStream, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    supports_keyboard_enhancement,
};
use futures::StreamExt;
use k8s::KubeGateway;
use model::NamespaceScope;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use std::process::Stdio;
use templates::TemplateStore;
use tokio::process::Command as TokioCommand;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use watch::{WatchTick, spawn_tick};

type TuiTerminal = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    let config = RuntimeConfig::load(&args)?;
    let _log_guard = logging::initialize(&args.log_filter, config.log_file.as_deref())?;
    if let Some(source) = &config.source {
        info!("loaded runtime config from {}", source.display());
    }

    let gateway = KubeGateway::new(config.request_timeout).await?;
    let scope = resolve_namespace_scope(&config, &gateway);
    info!(
        "connected to {} (context {}), scope {scope}",
        gateway.cluster(),
        gateway.context()
    );

    let mut app = App::new(
        gateway.cluster().to_string(),
        gateway.context().to_string(),
        scope,
    )
    .with_default_namespace(gateway.default_namespace())
    .with_templates(TemplateStore::new(config.template_dir.clone()))
    .with_log_tail_lines(config.log_tail_lines)
    .with_pending_kind(config.kind.clone());

    run(&mut app, &gateway).await
}

fn resolve_namespace_scope(config: &RuntimeConfig, gateway: &KubeGateway) -> NamespaceScope {
    if config.all_namespaces {
        if config.namespace.is_some() {
            warn!("both --all-namespaces and a namespace were provided, using all namespaces");
        }
        NamespaceScope::All
    } else if let Some(namespace) = &config.namespace {
        NamespaceScope::Named(namespace.clone())
    } else {
        NamespaceScope::Named(gateway.default_namespace().to_string())
    }
}

async fn run(app: &mut App, gateway: &KubeGateway) -> Result<()> {
    let (mut terminal, keyboard_enhanced) = init_terminal()?;
    let run_result = run_loop(&mut terminal, app, gateway).await;
    let restore_result = restore_terminal(&mut terminal, keyboard_enhanced);

    match (run_result, restore_result) {
        (Err(run_error), Err(restore_error)) => Err(anyhow::anyhow!(
            "{run_error:#}\nterminal restore error: {restore_error:#}"
        )),
        (Err(error), _) => Err(error),
        (_, Err(error)) => Err(error),
        (Ok(()), Ok(())) => Ok(()),
    }
}

fn init_terminal() -> Result<(TuiTerminal, bool)> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    let keyboard_enhanced = matches!(supports_keyboard_enhancement(), Ok(true));
    if keyboard_enhanced {
        execute!(
            stdout,
            EnterAlternateScreen,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )
        .context("failed to enter alternate screen with keyboard enhancement")?;
    } else {
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.clear().context("failed to clear terminal")?;
    Ok((terminal, keyboard_enhanced))
}

fn restore_terminal(terminal: &mut TuiTerminal, keyboard_enhanced: bool) -> Result<()> {
    if keyboard_enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)
            .context("failed to pop keyboard enhancement flags")?;
    }
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

async fn run_loop(terminal: &mut TuiTerminal, app: &mut App, gateway: &KubeGateway) -> Result<()> {
    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel::<WatchTick>();

    app.set_status("Discovering resource kinds...");
    terminal
        .draw(|frame| ui::render(frame, app))
        .context("failed to render terminal frame")?;
    execute_app_command(terminal, app, gateway, AppCommand::DiscoverKinds, &tick_tx).await;

    let mut reader = EventStream::new();
    loop {
        terminal
            .draw(|frame| ui::render(frame, app))
            .context("failed to render terminal frame")?;

        if !app.running() {
            break;
        }

        tokio::select! {
            maybe_event = reader.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if let Some(action) = input::map_key(app.mode(), key) {
                            debug!("action={action:?}");
                            let command = app.apply_action(action);
                            terminal
                                .draw(|frame| ui::render(frame, app))
                                .context("failed to render terminal frame")?;
                            execute_app_command(terminal, app, gateway, command, &tick_tx).await;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(error)) => {
                        app.set_status(format!("terminal event error: {error}"));
                    }
                    None => {
                        app.set_status("terminal event stream closed");
                        break;
                    }
                }
            }
            maybe_tick = tick_rx.recv() => {
                if let Some(tick) = maybe_tick {
                    let command = app.accept_tick(tick);
                    execute_app_command(terminal, app, gateway, command, &tick_tx).await;
                }
            }
        }
    }

    Ok(())
}

async fn execute_app_command(
    terminal: &mut TuiTerminal,
    app: &mut App,
    gateway: &KubeGateway,
    command: AppCommand,
    tick_tx: &mpsc::UnboundedSender<WatchTick>,
) {
    let mut next = command;
    loop {
        next = match next {
            AppCommand::None => return,
            AppCommand::DiscoverKinds => {
                let report = gateway.list_kinds().await;
                app.apply_discovery(report)
            }
            AppCommand::LoadTable(load) => {
                let outcome = gateway
                    .list_instances(&load.kind, load.scope.namespace())
                    .await;
                app.apply_table_result(&load, outcome)
            }
            AppCommand::ScheduleWatch(ticket) => {
                spawn_tick(ticket, tick_tx.clone());
                AppCommand::None
            }
            AppCommand::LoadDescribe {
                kind,
                namespace,
                name,
            } => {
                let outcome = gateway.list_instances(&kind, namespace.as_deref()).await;
                app.apply_describe(&kind, &name, outcome);
                AppCommand::None
            }
            AppCommand::LoadLogs(request) => {
                let outcome = gateway
                    .get_logs(&request.pod, &request.namespace, request.tail_lines)
                    .await;
                app.apply_logs(&request, outcome)
            }
            AppCommand::LoadNamespaces => {
                let outcome = gateway.list_namespaces().await;
                app.apply_namespaces(outcome);
                AppCommand::None
            }
            AppCommand::EditDraft => {
                if let Some(text) = app.draft_text().map(str::to_string) {
                    match edit_in_external_editor(terminal, &text).await {
                        Ok(edited) => app.set_draft_text(edited),
                        Err(error) => {
                            app.set_status(format!("Editor failed: {}", compact_error(&error)))
                        }
                    }
                }
                AppCommand::None
            }
            AppCommand::CreateInstance {
                manifest,
                namespace,
            } => {
                let outcome = gateway.create_instance(&manifest, &namespace).await;
                app.apply_create(&manifest, outcome);
                AppCommand::None
            }
        };
    }
}

async fn edit_in_external_editor(terminal: &mut TuiTerminal, text: &str) -> Result<String> {
    let file = tempfile::Builder::new()
        .prefix("kubeglass-")
        .suffix(".yaml")
        .tempfile()
        .context("failed to create draft file")?;
    std::fs::write(file.path(), text).context("failed to write draft file")?;

    let editor = std::env::var_os("KUBE_EDITOR")
        .or_else(|| std::env::var_os("EDITOR"))
        .unwrap_or_else(|| "vi".into());

    suspend_terminal_for_subprocess(terminal)?;
    let run_result = TokioCommand::new(&editor)
        .arg(file.path())
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .with_context(|| format!("failed to run editor {}", editor.to_string_lossy()));
    let restore_result = resume_terminal_after_subprocess(terminal);

    let status = match (run_result, restore_result) {
        (Err(run_error), Err(restore_error)) => {
            return Err(anyhow::anyhow!(
                "{run_error:#}\nterminal resume error: {restore_error:#}"
            ));
        }
        (Err(error), _) => return Err(error),
        (_, Err(error)) => return Err(error),
        (Ok(status), Ok(())) => status,
    };
    if !status.success() {
        return Err(anyhow::anyhow!("editor exited with {status}"));
    }

    std::fs::read_to_string(file.path()).context("failed to read edited draft")
}

fn suspend_terminal_for_subprocess(terminal: &mut TuiTerminal) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode for subprocess")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen for subprocess")?;
    terminal
        .show_cursor()
        .context("failed to show cursor for subprocess")?;
    Ok(())
}

fn resume_terminal_after_subprocess(terminal: &mut TuiTerminal) -> Result<()> {
    enable_raw_mode().context("failed to re-enable raw mode after subprocess")?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)
        .context("failed to re-enter alternate screen after subprocess")?;
    terminal
        .clear()
        .context("failed to clear terminal after subprocess")?;
    Ok(())
}

fn compact_error(error: &anyhow::Error) -> String {
    let mut out = Vec::new();
    for (index, cause) in error.chain().enumerate() {
        if index == 0 {
            out.push(cause.to_string());
        } else if index <= 2 {
            out.push(format!("caused by: {cause}"));
        } else {
            break;
        }
    }

    out.join(" / ")
}

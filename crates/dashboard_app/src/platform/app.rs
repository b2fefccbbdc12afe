use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use dashboard_core::{update, AppState, EmbedDelivery, Effect, Msg};
use dashboard_engine::EngineHandle;
use dashboard_logging::{dash_info, dash_warn};

use super::config::{self, ConfigSource, DEFAULT_CONFIG_FILENAME};
use super::effects::EffectRunner;
use super::logging;
use super::selection;
use super::ui::commands::{self, ConsoleCommand, HELP_TEXT};
use super::ui::render;

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum AppInput {
    Console(ConsoleCommand),
    Core(Msg),
    /// Stdin reached end of file.
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME));
    let (config, source) = config::load_config(&config_path)?;

    logging::initialize(config.log_destination, config.level_filter());
    match &source {
        ConfigSource::File(path) => dash_info!("Loaded config from {:?}", path),
        ConfigSource::Defaults(path) => {
            dash_info!("No config at {:?}; using built-in defaults", path)
        }
    }

    let target = config.embed_target()?;
    let (engine, events) = EngineHandle::spawn(config.upload_settings())?;
    dash_info!("Upload endpoint {}", config.endpoint);

    let (input_tx, input_rx) = mpsc::channel();
    let runner = EffectRunner::new(engine, events, input_tx.clone());
    spawn_console_reader(input_tx);

    let mut console = Console::new(runner, config.delivery());
    console.run(AppState::new(target), input_rx);
    dash_info!("Dashboard client exiting");
    Ok(())
}

fn spawn_console_reader(input_tx: mpsc::Sender<AppInput>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            match commands::parse_command(&line) {
                Ok(Some(command)) => {
                    if input_tx.send(AppInput::Console(command)).is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(err) => println!("{err}. Type 'help' for commands."),
            }
        }
        let _ = input_tx.send(AppInput::InputClosed);
    });
}

struct Console {
    runner: EffectRunner,
    delivery: EmbedDelivery,
}

impl Console {
    fn new(runner: EffectRunner, delivery: EmbedDelivery) -> Self {
        Self { runner, delivery }
    }

    fn run(&mut self, initial: AppState, inputs: mpsc::Receiver<AppInput>) {
        println!("{HELP_TEXT}");
        print_lines(&render::render(&initial.view()));

        let mut state = initial;
        let mut input_closed = false;
        for input in inputs.iter() {
            match input {
                AppInput::Core(msg) => state = self.dispatch(state, msg),
                AppInput::Console(ConsoleCommand::Quit) => break,
                AppInput::Console(command) => state = self.handle_command(state, command),
                AppInput::InputClosed => input_closed = true,
            }
            // Let a running upload finish before leaving on end of input.
            if input_closed && state.controller().in_flight().is_none() {
                break;
            }
        }
    }

    fn handle_command(&mut self, state: AppState, command: ConsoleCommand) -> AppState {
        let busy = state.controller().in_flight().is_some();
        match command {
            ConsoleCommand::Select(path) => {
                if busy {
                    println!("An upload is in progress; wait for it to finish.");
                    return state;
                }
                match selection::load_selected_file(&path) {
                    Ok(file) => {
                        dash_info!("Selected {:?} ({} bytes)", path, file.len());
                        self.dispatch(state, Msg::FileSelected(file))
                    }
                    Err(err) => {
                        dash_warn!("File selection failed: {}", err);
                        println!("Error: {err}");
                        state
                    }
                }
            }
            ConsoleCommand::Upload => {
                if busy {
                    println!("An upload is already in progress.");
                }
                self.dispatch(state, Msg::UploadClicked)
            }
            ConsoleCommand::Reset => {
                if busy {
                    println!("An upload is in progress; wait for it to finish.");
                }
                self.dispatch(state, Msg::ResetClicked)
            }
            ConsoleCommand::Status => {
                let view = state.view();
                print_lines(&render::render(&view));
                println!(
                    "Embed markup: {}",
                    dashboard_core::render_embed_markup(&view.embed, self.delivery)
                );
                state
            }
            ConsoleCommand::Help => {
                println!("{HELP_TEXT}");
                state
            }
            ConsoleCommand::Quit => state,
        }
    }

    fn dispatch(&mut self, state: AppState, msg: Msg) -> AppState {
        let mut pending = VecDeque::from([msg]);
        let mut state = state;
        while let Some(msg) = pending.pop_front() {
            let (next, effects) = update(state, msg);
            state = next;
            for effect in &effects {
                if let Effect::ReloadEmbed { reference } = effect {
                    println!("{}", render::render_embed(reference, self.delivery));
                }
            }
            pending.extend(self.runner.run(effects));
        }

        if state.consume_dirty() {
            print_lines(&render::render(&state.view()));
        }
        state
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

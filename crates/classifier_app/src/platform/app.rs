use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use chrono::Utc;
use classifier_core::{update, Msg, Session, SessionView};
use classifier_engine::{ClientSettings, EngineEvent};
use engine_logging::{engine_info, engine_warn, LogDestination};
use log::LevelFilter;

use super::effects::{self, EffectRunner, EffectTarget, EngineTarget};
use super::input::{self, Command, USAGE};
use super::ui;

/// Everything the main loop reacts to, in arrival order.
pub enum AppEvent {
    Input(Command),
    InputClosed,
    Msg(Msg),
    Engine(EngineEvent),
}

pub fn run_app() -> anyhow::Result<()> {
    engine_logging::initialize(LogDestination::default(), LevelFilter::Info);

    let settings = ClientSettings::from_env().context("reading classifier endpoint")?;
    engine_info!("Classifier endpoint: {}", settings.base_url);

    let (tx, rx) = mpsc::channel::<AppEvent>();
    spawn_input_reader(tx.clone());
    let mut driver = Driver::new(EffectRunner::new(EngineTarget::new(settings, tx)));

    println!("{USAGE}\n");
    print_view(&driver.view());

    let mut input_closed = false;
    while let Ok(event) = rx.recv() {
        let changed = match event {
            AppEvent::Input(Command::Quit) => break,
            AppEvent::Input(Command::Help) => {
                println!("{USAGE}");
                None
            }
            AppEvent::Input(command) => match input::command_to_msg(command) {
                Ok(Some(msg)) => driver.dispatch(msg),
                Ok(None) => None,
                Err(err) => {
                    engine_warn!("Failed to read input file: {}", err);
                    eprintln!("Could not read file: {err}");
                    None
                }
            },
            AppEvent::InputClosed => {
                input_closed = true;
                None
            }
            AppEvent::Msg(msg) => driver.dispatch(msg),
            // Stamped here: this is the moment the session accepts the outcome.
            AppEvent::Engine(event) => driver.dispatch(effects::completion_msg(event, Utc::now())),
        };

        if let Some(view) = changed {
            print_view(&view);
        }
        // Piped input: stay alive until the last request has been answered.
        if input_closed && !driver.view().is_loading() {
            break;
        }
    }

    engine_info!("Shutting down");
    Ok(())
}

fn spawn_input_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    engine_warn!("Failed to read stdin: {}", err);
                    break;
                }
            };
            match input::parse_command(&line) {
                Ok(Some(command)) => {
                    if tx.send(AppEvent::Input(command)).is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(err) => eprintln!("{err}. Type 'help' for commands."),
            }
        }
        let _ = tx.send(AppEvent::InputClosed);
    });
}

fn print_view(view: &SessionView) {
    for line in ui::render::render(view) {
        println!("{line}");
    }
    println!();
}

/// Owns the session and threads it through `update`.
pub struct Driver<T> {
    state: Session,
    runner: EffectRunner<T>,
}

impl<T: EffectTarget> Driver<T> {
    pub fn new(runner: EffectRunner<T>) -> Self {
        Self {
            state: Session::new(),
            runner,
        }
    }

    /// Applies `msg`, runs its effects and returns a fresh view if anything changed.
    pub fn dispatch(&mut self, msg: Msg) -> Option<SessionView> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let view = state.consume_dirty().then(|| state.view());
        self.state = state;
        self.runner.enqueue(effects);
        view
    }

    pub fn view(&self) -> SessionView {
        self.state.view()
    }

    #[cfg(test)]
    pub fn runner(&self) -> &EffectRunner<T> {
        &self.runner
    }
}

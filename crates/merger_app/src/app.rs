use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::{engine_debug, engine_info};
use log::LevelFilter;
use merger_core::{update, AppState, ArchiveCandidate, JobPhase, Msg};
use merger_engine::{ensure_output_dir, EngineHandle};

use crate::cli::Args;
use crate::config::ClientConfig;
use crate::effects::{AppInput, EffectRunner, MsgSink, Prompt};
use crate::error::CliError;
use crate::input::{parse_line, Command};
use crate::logging;
use crate::ui::render::{help_text, Renderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Loads config, starts the engine and runs the event loop until the user
/// quits (or the job ends with `--exit-when-done`). Returns the final phase.
pub fn run(args: Args) -> Result<JobPhase, CliError> {
    let mut config = ClientConfig::load(&args.config)?;
    config.apply_overrides(&args);
    logging::initialize(config.log, LevelFilter::Info);
    if args.write_config {
        config.save(&args.config)?;
    }
    ensure_output_dir(&config.output_dir)?;
    engine_info!(
        "Using {} (poll every {} ms), saving to {:?}",
        config.server_url,
        config.poll_interval_ms,
        config.output_dir
    );

    let (tx, rx) = mpsc::channel();
    let engine = EngineHandle::new(
        config.transport_settings(),
        config.output_dir.clone(),
        Arc::new(MsgSink::new(tx.clone())),
    )?;
    spawn_line_reader(tx);

    let state = AppState::with_config(config.controller_config());
    let mut app = App::new(
        state,
        EffectRunner::new(engine),
        args.exit_when_done,
        io::stdout(),
    );
    app.start(args.archive.map(ArchiveCandidate::from_path))?;

    while let Ok(input) = rx.recv() {
        if app.handle(input)? == Flow::Quit {
            break;
        }
    }
    Ok(app.state().phase())
}

fn spawn_line_reader(tx: mpsc::Sender<AppInput>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(AppInput::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(AppInput::InputClosed);
    });
}

/// The event loop's state: controller state plus whatever the terminal is waiting on.
pub struct App<W: Write> {
    state: AppState,
    runner: EffectRunner,
    renderer: Renderer,
    prompt: Option<Prompt>,
    exit_when_done: bool,
    input_closed: bool,
    out: W,
}

impl<W: Write> App<W> {
    pub fn new(state: AppState, runner: EffectRunner, exit_when_done: bool, out: W) -> Self {
        Self {
            state,
            runner,
            renderer: Renderer::new(),
            prompt: None,
            exit_when_done,
            input_closed: false,
            out,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn prompt(&self) -> Option<Prompt> {
        self.prompt
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Draws the first frame and submits `archive` when one was given.
    pub fn start(&mut self, archive: Option<ArchiveCandidate>) -> io::Result<()> {
        self.renderer.draw(&self.state.view(), &mut self.out)?;
        if let Some(candidate) = archive {
            self.dispatch(Msg::FileSubmitted(candidate))?;
        }
        Ok(())
    }

    pub fn handle(&mut self, input: AppInput) -> io::Result<Flow> {
        match input {
            AppInput::Msg(msg) => self.dispatch(msg)?,
            AppInput::Line(line) => {
                let prompt = self.prompt.take();
                match parse_line(&line, prompt) {
                    Command::Dispatch(msg) => self.dispatch(msg)?,
                    Command::Quit => return Ok(Flow::Quit),
                    Command::Ignore => {}
                    Command::Unknown(text) => {
                        writeln!(self.out, "Unknown command {text:?}; type 'help'")?;
                    }
                }
            }
            AppInput::InputClosed => {
                engine_debug!("Input closed");
                self.input_closed = true;
            }
        }
        Ok(self.flow())
    }

    /// With stdin gone nothing can move an idle or finished job forward.
    fn flow(&self) -> Flow {
        let phase = self.state.phase();
        if self.exit_when_done && phase.is_terminal() {
            return Flow::Quit;
        }
        if self.input_closed && !phase.is_busy() {
            return Flow::Quit;
        }
        Flow::Continue
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let prompts = self.runner.run(effects);
        let dirty = state.consume_dirty();
        self.state = state;

        if dirty {
            self.renderer.draw(&self.state.view(), &mut self.out)?;
        }
        for prompt in prompts {
            self.ask(prompt)?;
        }
        Ok(())
    }

    fn ask(&mut self, prompt: Prompt) -> io::Result<()> {
        match prompt {
            Prompt::Help => {
                self.out.write_all(help_text().as_bytes())?;
            }
            Prompt::ChooseFile => {
                write!(self.out, "Path to ZIP archive: ")?;
                self.prompt = Some(prompt);
            }
            Prompt::ConfirmCancel => {
                write!(self.out, "Cancel the running job? [y/N] ")?;
                self.prompt = Some(prompt);
            }
        }
        self.out.flush()
    }
}

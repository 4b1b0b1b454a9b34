use clap::ArgAction;
use clap::Parser;
use std::io::{IsTerminal, Write};

mod config;
mod dispatch;
mod form;
mod logger;
mod persona;
mod prompt;
mod server;

use crate::config::{API_KEY_VAR, Config};
use crate::dispatch::Submission;
use crate::form::Answer;
use crate::persona::Persona;
use crate::prompt::EMPTY_INPUT_MESSAGE;
use crate::server::Completion;

/// Ask an LLM a question as a nutrition expert or a travel planner.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Persona to answer as: 'A' (nutrition expert) or 'B' (travel
    /// planner).  Asked for interactively if omitted.
    #[arg(long, short)]
    persona: Option<String>,

    /// Use this model instead of the configured one.
    #[arg(long, short)]
    model: Option<String>,

    /// Use this sampling temperature instead of the configured one.
    #[arg(long, short)]
    temperature: Option<f64>,

    /// Print the answer in JSON form.
    #[arg(long, short = 'j')]
    output_json: bool,

    /// Set log level (-v for info, -vv for debug, -vvv for trace).
    #[arg(long, short, action = ArgAction::Count)]
    verbose: u8,

    /// The question.  Read from stdin if omitted and stdin is not a
    /// terminal, asked for interactively otherwise.
    question: Option<String>,
}

/// Where the persona and the question come from.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Interactive,
    Batch,
}

fn resolve_label(selector: &str) -> String {
    match Persona::from_selector(selector) {
        Some(persona) => persona.label().to_string(),
        None => {
            log::warn!(
                "unknown persona {selector:?}, answering as a generic \
                 assistant"
            );
            selector.to_string()
        }
    }
}

/// How the form runs for this invocation.
#[derive(Debug, Clone, Copy)]
struct Session {
    mode: Mode,
    output_json: bool,
    show_spinner: bool,
}

impl Session {
    /// Shows the intro in interactive mode and warns if there is no
    /// API key.  A missing key never stops the form.
    fn start(
        &self,
        out: &mut impl Write,
        config: &Config,
    ) -> Result<(), String> {
        log::debug!("running in {:?} mode", self.mode);

        if self.mode == Mode::Interactive {
            form::render_intro(out).map_err(|x| x.to_string())?;
        }

        if !config.has_api_key() {
            log::warn!("{}", form::missing_key_warning());
        }

        Ok(())
    }

    /// Submits one question and renders the answer to `out`.
    ///
    /// Returns `Submission::Empty` if the question was blank and should
    /// be asked again.
    ///
    /// # Errors
    ///
    /// This method returns an error if
    ///
    /// - the question is blank in batch mode,
    /// - the completion fails, or
    /// - the answer cannot be written.
    fn answer(
        &self,
        completion: &impl Completion,
        out: &mut impl Write,
        label: &str,
        question: &str,
    ) -> Result<Submission, String> {
        let submission = form::with_spinner(self.show_spinner, || {
            dispatch::submit(completion, label, question)
        })?;

        match submission {
            Submission::Empty if self.mode == Mode::Interactive => {
                log::error!("{EMPTY_INPUT_MESSAGE}");
            }
            Submission::Empty => {
                return Err(EMPTY_INPUT_MESSAGE.to_string());
            }
            Submission::Answered(ref answer) if self.output_json => {
                form::render_json(
                    out,
                    &Answer {
                        persona: label,
                        question,
                        answer,
                    },
                )?;
            }
            Submission::Answered(ref answer) => {
                form::render_answer(out, answer)
                    .map_err(|x| x.to_string())?;
            }
        }

        Ok(submission)
    }
}

fn process() -> Result<(), String> {
    let args = Args::parse();

    logger::init(logger::level_from_verbosity(args.verbose)?)
        .map_err(|x| x.to_string())?;

    let mut config = Config::load()?;

    config.apply_api_key(std::env::var(API_KEY_VAR).ok());

    if let Some(model) = args.model {
        config.model = model;
    }

    if let Some(temperature) = args.temperature {
        config.temperature = temperature;
    }

    // Prompts go to stderr, so stdout may be piped.
    let mode =
        if args.question.is_none() && std::io::stdin().is_terminal() {
            Mode::Interactive
        } else {
            Mode::Batch
        };
    let session = Session {
        mode,
        output_json: args.output_json,
        show_spinner: std::io::stderr().is_terminal() && !args.output_json,
    };
    let mut stdout = std::io::stdout();

    session.start(&mut stdout, &config)?;

    loop {
        let label = match (args.persona.as_deref(), mode) {
            (Some(x), _) => resolve_label(x),
            (None, Mode::Interactive) => {
                form::choose_persona()?.label().to_string()
            }
            (None, Mode::Batch) => Persona::ALL[0].label().to_string(),
        };

        loop {
            let question = match (args.question.as_deref(), mode) {
                (Some(x), _) => x.to_string(),
                (None, Mode::Interactive) => form::ask_question()?,
                (None, Mode::Batch) => form::read_question()?,
            };

            let submission =
                session.answer(&config, &mut stdout, &label, &question)?;

            if submission != Submission::Empty {
                break;
            }
        }

        if mode == Mode::Batch || !form::ask_again()? {
            return Ok(());
        }
    }
}

fn main() {
    match process() {
        Ok(_) => std::process::exit(0),
        Err(x) => {
            eprintln!("error: {x}");
            std::process::exit(1);
        }
    }
}

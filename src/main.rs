//! Interactive driver for the texture generator client.
//!
//! Reads one command per line from stdin, turns it into a workflow event, and
//! prints whatever the workflow reports.
//!
//! # Usage
//!
//! ```text
//! shelltex [--config FILE] [key=value ...]
//! ```
//!
//! `key=value` pairs override the configuration file; see [`Config::from_map`]
//! for the recognized keys.
//!
//! # Commands
//!
//! - `set <param> <value>`: change a field (`K`, `t_max`, `delta_t`, `color1`, `color2`)
//! - `submit`: validate the form and request a texture
//! - `reset`: restore default values
//! - `help`: list commands
//! - `quit`: stop reading input (a pending request still completes)
//!
//! Input keeps being read while a request is in flight, so a second `submit`
//! during that time is accepted as input but ignored by the workflow.

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use shelltex::domain::ParameterId;
use shelltex::ui::{render, FormView, PresentationSink};
use shelltex::{Config, Event, Result, Runtime, ShelltexError};

const HELP: &str = "commands: set <param> <value> | submit | reset | help | quit";

/// Sink printing every notification to stdout.
struct ConsoleSink;

impl PresentationSink for ConsoleSink {
    fn on_generation_start(&mut self) {
        println!("generating...");
    }

    fn on_generation_success(&mut self, image_url: &str) {
        println!("Texture generated successfully! {image_url}");
    }

    fn on_generation_error(&mut self, message: &str) {
        println!("Error: {message}");
    }

    fn on_validation_failed(&mut self, fields: &[ParameterId]) {
        let names: Vec<&str> = fields.iter().map(|id| id.wire_name()).collect();
        println!("cannot submit, invalid fields: {}", names.join(", "));
    }

    fn render(&mut self, view: &FormView) {
        print!("{}", render(view));
    }
}

/// Command-line arguments: an optional config file plus `key=value` overrides.
fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Config> {
    let mut file = None;
    let mut overrides = BTreeMap::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--config" {
            let path = args
                .next()
                .ok_or_else(|| ShelltexError::Config("--config requires a file".to_string()))?;
            file = Some(path);
        } else if let Some((key, value)) = arg.split_once('=') {
            overrides.insert(key.to_string(), value.to_string());
        } else {
            return Err(ShelltexError::Config(format!("unrecognized argument: {arg}")));
        }
    }

    let mut config = match file {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if !overrides.is_empty() {
        let parsed = Config::from_map(&overrides);
        if overrides.contains_key("endpoint") {
            config.endpoint = parsed.endpoint;
        }
        if overrides.contains_key("request_timeout_secs") {
            config.request_timeout_secs = parsed.request_timeout_secs;
        }
        if parsed.trace_level.is_some() {
            config.trace_level = parsed.trace_level;
        }
        if parsed.log_file.is_some() {
            config.log_file = parsed.log_file;
        }
    }
    Ok(config)
}

/// What a line of input asks for.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Event(Event),
    Help,
    Quit,
}

fn parse_command(line: &str) -> std::result::Result<Option<Command>, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

    let command = match word {
        "" => return Ok(None),
        "set" => {
            let (name, value) = rest.trim().split_once(char::is_whitespace).unwrap_or((rest.trim(), ""));
            let id = name.parse::<ParameterId>().map_err(|e| e.to_string())?;
            Command::Event(Event::SetValue {
                id,
                raw: value.trim().to_string(),
            })
        }
        "submit" => Command::Event(Event::Submit),
        "reset" => Command::Event(Event::ResetDefaults),
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(Some(command))
}

/// Forwards stdin commands as events until `quit` or end of input.
async fn read_commands(events: mpsc::UnboundedSender<Event>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(Some(Command::Event(event))) => {
                if events.send(event).is_err() {
                    break;
                }
            }
            Ok(Some(Command::Help)) => println!("{HELP}"),
            Ok(Some(Command::Quit)) => break,
            Ok(None) => {}
            Err(message) => println!("{message}\n{HELP}"),
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match parse_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("shelltex: {e}");
            return ExitCode::FAILURE;
        }
    };
    shelltex::observability::init_tracing(&config);

    tracing::debug!(endpoint = %config.endpoint, timeout = ?config.request_timeout(), "starting driver");

    let runtime = match Runtime::from_config(&config, ConsoleSink) {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("shelltex: {e}");
            return ExitCode::FAILURE;
        }
    };

    print!("{}", render(&runtime.state().compute_viewmodel()));
    println!("{HELP}");

    let (tx, rx) = mpsc::unbounded_channel();
    let (read_result, run_result) = tokio::join!(read_commands(tx), runtime.run(rx));

    if let Err(e) = read_result.and(run_result.map(|_| ())) {
        tracing::warn!(error = %e, "driver stopped with an error");
        eprintln!("shelltex: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

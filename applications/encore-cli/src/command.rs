//! Typed player commands
//!
//! One command per input line, e.g. `play 4`, `seek 1:30`, `seek 50%`,
//! `volume 80`, `key ArrowLeft`.

use crate::error::CliError;
use encore_playback::{InputFocus, Key, RepeatMode};
use std::convert::Infallible;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Play one catalog track
    Play(String),
    /// Replace the queue (whole catalog when no ids are given) and start it
    PlayAll(Vec<String>),
    /// Append catalog tracks to the queue
    Enqueue(Vec<String>),
    Pause,
    Toggle,
    Next,
    Prev,
    Seek(SeekTarget),
    /// Volume in percent
    Volume(f64),
    Clear,
    Repeat(RepeatMode),
    Shuffle(bool),
    /// Simulated key press
    Key(Key),
    /// Move simulated keyboard focus
    Focus(InputFocus),
    Status,
    Queue,
    Tracks,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekTarget {
    /// Position in milliseconds
    Absolute(f64),
    /// Offset from the current position in milliseconds
    Relative(f64),
    /// Fraction of the track, 0-100
    Percent(f64),
}

pub const HELP: &str = "\
Commands:
  play <id>            play a catalog track
  playall [<id>...]    replace the queue and start it (whole catalog by default)
  queue <id>...        append tracks to the queue
  queue                show the queue
  pause | toggle | next | prev
  seek <m:ss|secs|N%|+secs|-secs>
  volume <0-100>
  clear                clear the queue and stop
  repeat <off|track|context>
  shuffle <on|off>
  key <Space|ArrowLeft|ArrowRight|ArrowUp|ArrowDown>
  focus <document|text>
  status | tracks | help | quit";

impl FromStr for Command {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CliError::InvalidCommand("empty input".to_string()));
        };
        let args: Vec<String> = words.map(str::to_string).collect();

        let command = match name.to_ascii_lowercase().as_str() {
            "play" => Command::Play(single_arg(name, &args)?.to_string()),
            "playall" => Command::PlayAll(args),
            "queue" | "q" if args.is_empty() => Command::Queue,
            "queue" | "q" | "add" => Command::Enqueue(args),
            "pause" => Command::Pause,
            "toggle" | "t" => Command::Toggle,
            "next" | "n" => Command::Next,
            "prev" | "p" => Command::Prev,
            "seek" => Command::Seek(parse_seek(single_arg(name, &args)?)?),
            "volume" | "vol" => {
                let arg = single_arg(name, &args)?;
                let percent = arg
                    .trim_end_matches('%')
                    .parse::<f64>()
                    .map_err(|_| invalid(format!("volume expects a percentage, got '{arg}'")))?;
                Command::Volume(percent)
            }
            "clear" => Command::Clear,
            "repeat" => Command::Repeat(single_arg(name, &args)?.parse().map_err(invalid)?),
            "shuffle" => Command::Shuffle(parse_switch(single_arg(name, &args)?)?),
            "key" => Command::Key(
                single_arg(name, &args)?
                    .parse()
                    .unwrap_or_else(|never: Infallible| match never {}),
            ),
            "focus" => Command::Focus(match single_arg(name, &args)? {
                "document" | "doc" => InputFocus::Document,
                "text" | "input" => InputFocus::TextInput,
                other => return Err(invalid(format!("unknown focus '{other}'"))),
            }),
            "status" | "s" => Command::Status,
            "tracks" | "ls" => Command::Tracks,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(invalid(format!("unknown command '{other}', try 'help'"))),
        };
        Ok(command)
    }
}

fn invalid(message: impl Into<String>) -> CliError {
    CliError::InvalidCommand(message.into())
}

fn single_arg<'a>(name: &str, args: &'a [String]) -> Result<&'a str, CliError> {
    match args {
        [arg] => Ok(arg.as_str()),
        _ => Err(invalid(format!("'{name}' takes exactly one argument"))),
    }
}

fn parse_switch(arg: &str) -> Result<bool, CliError> {
    match arg {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        other => Err(invalid(format!("expected on/off, got '{other}'"))),
    }
}

/// Parse `m:ss` or plain seconds into milliseconds
pub fn parse_time(arg: &str) -> Option<f64> {
    let seconds = match arg.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes: u64 = minutes.parse().ok()?;
            let seconds: f64 = seconds.parse().ok()?;
            if !(0.0..60.0).contains(&seconds) {
                return None;
            }
            minutes as f64 * 60.0 + seconds
        }
        None => arg.parse().ok()?,
    };
    seconds.is_finite().then_some(seconds * 1000.0)
}

fn parse_seek(arg: &str) -> Result<SeekTarget, CliError> {
    let bad = || invalid(format!("cannot parse seek target '{arg}'"));

    if let Some(percent) = arg.strip_suffix('%') {
        let percent: f64 = percent.parse().map_err(|_| bad())?;
        return Ok(SeekTarget::Percent(percent));
    }
    if let Some(offset) = arg.strip_prefix('+') {
        return parse_time(offset).map(SeekTarget::Relative).ok_or_else(bad);
    }
    if let Some(offset) = arg.strip_prefix('-') {
        return parse_time(offset)
            .map(|ms| SeekTarget::Relative(-ms))
            .ok_or_else(bad);
    }
    parse_time(arg).map(SeekTarget::Absolute).ok_or_else(bad)
}

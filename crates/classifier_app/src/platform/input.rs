use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use classifier_core::{DragEvent, Msg, RawFile};
use image::ImageFormat;

const FALLBACK_MIME: &str = "application/octet-stream";

pub const USAGE: &str = "Commands:
  pick <path> [<path>...]   choose image file(s); only the first is used
  drop <path> [<path>...]   drop file(s) onto the drop target
  drag enter|over|leave     move a drag over or off the drop target
  retry                     classify the current image again
  reset                     clear the image and result
  help                      show this help
  quit                      exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Pick(Vec<PathBuf>),
    Drop(Vec<PathBuf>),
    Drag(DragEvent),
    Retry,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command {0:?}")]
    Unknown(String),
    #[error("{0} needs at least one path")]
    MissingPaths(&'static str),
    #[error("drag expects enter, over or leave, got {0:?}")]
    BadDrag(String),
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let command = match head.to_ascii_lowercase().as_str() {
        "pick" => Command::Pick(collect_paths(words, "pick")?),
        "drop" => Command::Drop(collect_paths(words, "drop")?),
        "drag" => {
            let what = words.next().unwrap_or_default();
            match what.to_ascii_lowercase().as_str() {
                "enter" => Command::Drag(DragEvent::Enter),
                "over" => Command::Drag(DragEvent::Over),
                "leave" => Command::Drag(DragEvent::Leave),
                _ => return Err(CommandError::BadDrag(what.to_string())),
            }
        }
        "retry" => Command::Retry,
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn collect_paths<'a>(
    words: impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<Vec<PathBuf>, CommandError> {
    let paths: Vec<PathBuf> = words.map(PathBuf::from).collect();
    if paths.is_empty() {
        return Err(CommandError::MissingPaths(command));
    }
    Ok(paths)
}

/// Reads every file of a pick/drop payload. Fails if any of them is unreadable,
/// so the payload order the user gave is never shifted.
pub fn load_files(paths: &[PathBuf]) -> io::Result<Vec<RawFile>> {
    paths.iter().map(|path| load_file(path)).collect()
}

fn load_file(path: &Path) -> io::Result<RawFile> {
    let bytes = fs::read(path)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(RawFile::new(name, guess_mime(path), bytes))
}

/// Declared MIME type from the file extension, as a browser would report it.
pub fn guess_mime(path: &Path) -> &'static str {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME)
}

/// Converts a user command into a core message, loading files as needed.
pub fn command_to_msg(command: Command) -> io::Result<Option<Msg>> {
    let msg = match command {
        Command::Pick(paths) => Some(Msg::FilesPicked(load_files(&paths)?)),
        Command::Drop(paths) => Some(Msg::FilesDropped(load_files(&paths)?)),
        Command::Drag(event) => Some(Msg::Drag(event)),
        Command::Retry => Some(Msg::RetryClicked),
        Command::Reset => Some(Msg::ResetClicked),
        Command::Help | Command::Quit => None,
    };
    Ok(msg)
}

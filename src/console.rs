use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::fs;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::mirror::{
    format_relative_time, ClientKind, ConfirmDialog, DrivePage, MemorySurface, Panel, StatusTag,
    SurfaceState, UnloadOutcome,
};
use crate::types::MirrorError;

type InputLines = Lines<BufReader<Box<dyn AsyncRead + Unpin + Send>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Files(usize),
    Load { slot: usize, path: PathBuf },
    Unload,
    Save,
    Reset,
    Resync(Option<ClientKind>),
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("not a drive number: {0}")]
    BadSlot(String),
    #[error("unknown client type: {0}")]
    BadClient(String),
}

const HELP: &str = "\
ls              show the drive list
files N         show the files on drive N
load N PATH     load a cartridge image into drive N
unload          unload the drive whose files are shown
save            save the drive whose files are shown
reset           reset the client connection
resync [if1|ql] resync with the client, optionally forcing its type
status          show client and last change
quit            leave";

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(ParseError::Usage("help"));
        };

        let command = match verb {
            "ls" | "list" => Command::List,
            "files" => {
                let slot = words.next().ok_or(ParseError::Usage("files N"))?;
                Command::Files(parse_slot(slot)?)
            }
            "load" => {
                let slot = words.next().ok_or(ParseError::Usage("load N PATH"))?;
                let slot = parse_slot(slot)?;
                let rest: Vec<&str> = words.by_ref().collect();
                if rest.is_empty() {
                    return Err(ParseError::Usage("load N PATH"));
                }
                return Ok(Command::Load {
                    slot,
                    path: PathBuf::from(rest.join(" ")),
                });
            }
            "unload" => Command::Unload,
            "save" => Command::Save,
            "reset" => Command::Reset,
            "resync" => match words.next() {
                Some(raw) => Command::Resync(Some(
                    ClientKind::parse(raw).ok_or_else(|| ParseError::BadClient(raw.to_string()))?,
                )),
                None => Command::Resync(None),
            },
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn parse_slot(raw: &str) -> Result<usize, ParseError> {
    raw.parse()
        .map_err(|_| ParseError::BadSlot(raw.to_string()))
}

/// Line-oriented input shared by the command loop and the confirmation prompt.
#[derive(Clone)]
pub struct ConsoleInput {
    lines: Arc<Mutex<InputLines>>,
}

impl ConsoleInput {
    pub fn stdin() -> Self {
        Self::from_reader(tokio::io::stdin())
    }

    pub fn from_reader(reader: impl AsyncRead + Unpin + Send + 'static) -> Self {
        let reader: Box<dyn AsyncRead + Unpin + Send> = Box::new(reader);
        Self {
            lines: Arc::new(Mutex::new(BufReader::new(reader).lines())),
        }
    }

    /// Next line, or `None` at end of input.
    pub async fn next_line(&self) -> Result<Option<String>, MirrorError> {
        Ok(self.lines.lock().await.next_line().await?)
    }
}

/// Asks on the terminal. Anything but `y`/`yes` declines, as does end of input.
pub struct ConsoleDialog {
    input: ConsoleInput,
}

impl ConsoleDialog {
    pub fn new(input: ConsoleInput) -> Self {
        Self { input }
    }
}

#[async_trait]
impl ConfirmDialog for ConsoleDialog {
    async fn ask(&self, title: &str, message: &str) -> bool {
        print_prompt(&format!("{title} {message} [y/N] "));
        match self.input.next_line().await {
            Ok(Some(answer)) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Ok(None) => false,
            Err(err) => {
                warn!(error = %err, "Failed to read answer");
                false
            }
        }
    }
}

/// Drive list as a table, one row per slot.
pub fn render_table(state: &SurfaceState) -> String {
    let mut out = String::new();
    let client = match state.client_icon {
        Some(icon) => format!("{} ({})", state.client_label, tag_name(icon)),
        None => "-".to_string(),
    };
    out.push_str(&format!("client: {client}\n"));
    out.push_str(&format!("{:<5} {:<16} {}\n", "drive", "state", "cartridge"));
    for row in &state.rows {
        let marker = if row.enabled { "" } else { " (busy)" };
        out.push_str(&format!(
            "{:<5} {:<16} {}{}\n",
            row.button_label,
            tag_name(row.icon),
            row.label,
            marker
        ));
    }
    out
}

/// Text of the file panel, or `None` when the drive list is showing.
pub fn render_files(state: &SurfaceState) -> Option<String> {
    if state.panel != Panel::Files {
        return None;
    }
    Some(state.file_list.clone())
}

fn tag_name(icon: &str) -> &str {
    StatusTag::ALL
        .iter()
        .find(|tag| tag.icon() == icon)
        .map(|tag| tag.as_str())
        .unwrap_or(icon)
}

fn print_prompt(text: &str) {
    let mut out = std::io::stdout();
    if let Err(err) = write!(out, "{text}").and_then(|_| out.flush()) {
        debug!(error = %err, "Failed to write prompt");
    }
}

/// Interactive front-end over a [`DrivePage`] rendering into a [`MemorySurface`].
pub struct Console {
    page: DrivePage,
    surface: MemorySurface,
    input: ConsoleInput,
}

impl Console {
    pub fn new(page: DrivePage, surface: MemorySurface, input: ConsoleInput) -> Self {
        Self {
            page,
            surface,
            input,
        }
    }

    /// Read and execute commands until `quit` or end of input.
    pub async fn run(&self) -> Result<(), MirrorError> {
        println!("{}", render_table(&self.surface.snapshot()));
        loop {
            print_prompt("> ");
            let Some(line) = self.input.next_line().await? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => {
                    if let Err(err) = self.execute(command).await {
                        warn!(error = %err, "Command failed");
                        println!("error: {err}");
                    }
                }
                Err(err) => println!("{err}"),
            }
        }
        info!("Console closed");
        Ok(())
    }

    pub async fn execute(&self, command: Command) -> Result<(), MirrorError> {
        match command {
            Command::List => {
                self.page.session().show_panel(Panel::Drives).await;
                println!("{}", render_table(&self.surface.snapshot()));
            }
            Command::Files(slot) => {
                self.page.show_files(slot).await?;
                if let Some(files) = render_files(&self.surface.snapshot()) {
                    println!("{files}");
                }
            }
            Command::Load { slot, path } => {
                let (file_name, image) = read_image(&path).await?;
                let result = self.page.choose_file(slot, &file_name, image).await?;
                println!("{}", result.as_str().map_or_else(|| result.to_string(), str::to_string));
            }
            Command::Unload => match self.page.request_unload().await? {
                UnloadOutcome::Declined => println!("kept"),
                UnloadOutcome::Unloaded { message, .. } => println!("{message}"),
            },
            Command::Save => {
                let notice = self.page.request_save().await?;
                println!("drive {}: {}", notice.slot, notice.message);
            }
            Command::Reset => {
                let message = self.page.reset_client().await?;
                println!("{message}");
            }
            Command::Resync(client) => {
                let message = self.page.actions().resync(client, false).await?;
                println!("{message}");
            }
            Command::Status => {
                println!("{}", self.status_line().await);
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => {}
        }
        Ok(())
    }

    async fn status_line(&self) -> String {
        let session = self.page.session();
        let client = match session.client().await.indicator() {
            Some((_, label)) => label.to_string(),
            None => "-".to_string(),
        };
        let changed = session
            .last_change()
            .await
            .map(|then| format_relative_time(then, Utc::now()))
            .unwrap_or_else(|| "never".to_string());
        format!(
            "client: {client}, drives: {}, last change: {changed}",
            session.slot_count().await
        )
    }
}

async fn read_image(path: &Path) -> Result<(String, Vec<u8>), MirrorError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| MirrorError::UnsupportedFormat(path.display().to_string()))?;
    let image = fs::read(path).await?;
    Ok((file_name, image))
}

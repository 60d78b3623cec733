use std::path::PathBuf;

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Chat(String),
    File(PathBuf),
    Share,
    Peers,
    Quit,
    Help,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Chat(line.to_owned());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name {
            "file" if !arg.is_empty() => Command::File(PathBuf::from(arg)),
            "share" => Command::Share,
            "peers" => Command::Peers,
            "quit" | "exit" => Command::Quit,
            "help" => Command::Help,
            _ => Command::Unknown(line.to_owned()),
        }
    }
}

pub const HELP: &str = "\
  <text>        send a chat message to everyone
  /file <path>  send a file to one connected peer
  /share        start sharing the screen
  /peers        list room members and connections
  /quit         leave";

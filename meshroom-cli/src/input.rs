/// A line typed at the `join` prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Chat(String),
    Join(String),
    Leave,
    Audio(bool),
    Video(bool),
    Clear,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

pub const HELP: &str = "\
/join <room>   switch rooms
/leave         leave the current room
/mute /unmute  microphone
/cam on|off    camera
/clear         clear the shared canvas
/quit          exit
anything else is sent as chat";

pub fn parse(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Input::Chat(line.to_owned());
    };

    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map(|(n, r)| (n, r.trim()))
        .unwrap_or((command, ""));

    match (name, rest) {
        ("join", room) if !room.is_empty() => Input::Join(room.to_owned()),
        ("leave", "") => Input::Leave,
        ("mute", "") => Input::Audio(false),
        ("unmute", "") => Input::Audio(true),
        ("cam", "on") => Input::Video(true),
        ("cam", "off") => Input::Video(false),
        ("clear", "") => Input::Clear,
        ("help", "") => Input::Help,
        ("quit" | "exit", "") => Input::Quit,
        _ => Input::Unknown(line.to_owned()),
    }
}

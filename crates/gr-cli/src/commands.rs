//! Play-loop command parsing

use gr_slot::AutoSpin;

/// A player intent typed at the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Spin,
    BetUp,
    BetDown,
    MaxBet,
    /// Toggle autoplay in the given mode
    Auto(AutoSpin),
    Collect,
    Stats,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. An empty line spins.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Some(Command::Spin);
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "s" | "spin" => Command::Spin,
            "+" | "up" => Command::BetUp,
            "-" | "down" => Command::BetDown,
            "max" => Command::MaxBet,
            "a" | "auto" => Command::Auto(match words.next() {
                None | Some("inf") | Some("infinite") => AutoSpin::Infinite,
                Some(n) => AutoSpin::Count(n.parse().ok().filter(|&n: &u32| n > 0)?),
            }),
            "c" | "collect" => Command::Collect,
            "stats" => Command::Stats,
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            _ => return None,
        };
        Some(command)
    }
}

pub const HELP: &str = "\
Commands:
  spin, s, <enter>   spin the reels
  +, -               raise / lower the bet one step
  max                maximum bet
  auto [N|inf]       toggle autoplay (N spins or until stopped)
  collect, c         open the bonus prize
  stats              session statistics
  help               this text
  quit, q            leave";

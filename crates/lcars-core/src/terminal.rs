//! Terminal interpreter: a small command set with history and a one-shot staged command
//! that the assistant fills when it routes a captain request here.

use crate::compose::stardate;
use crate::quotes::{self, pick, Captain};
use chrono::{DateTime, Local};
use rand::Rng;
use serde::Serialize;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Plain,
    Primary,
    Success,
    Warning,
    Destructive,
    Muted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerminalLine {
    pub text: String,
    pub tone: Tone,
}

impl TerminalLine {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    fn blank() -> Self {
        Self::new("", Tone::Plain)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TerminalResponse {
    pub lines: Vec<TerminalLine>,
    /// The screen should be wiped before `lines` are shown.
    pub clear: bool,
}

impl TerminalResponse {
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }
}

pub const BANNER: &[&str] = &["🖖 LCARS Terminal v4.0 initialized", "Type 'help' for available commands"];

const HELP: &[(&str, &str)] = &[
    ("help", "Show this help message"),
    ("clear", "Clear terminal"),
    ("status", "Show system status"),
    ("date", "Show current date/time"),
    ("stardate", "Show Star Trek stardate"),
    ("tasks", "List active tasks"),
    ("weather", "Get weather info"),
    ("joke", "Tell a programming joke"),
    ("fortune", "Get a fortune"),
    ("spock", "Spock quote"),
    ("picard", "Picard quote"),
    ("sisko", "Sisko quote"),
    ("janeway", "Janeway quote"),
    ("archer", "Archer quote"),
    ("mariner", "Mariner quote"),
    ("calc <expr>", "Calculate expression"),
    ("echo <text>", "Echo text"),
];

const EASTER_EGGS: &[(&str, &str)] = &[
    ("redshirt", "Random redshirt fate"),
    ("khan", "KHAAAAN!"),
    ("beam", "Transporter effect"),
    ("cowsay <msg>", "Make a cow say something"),
];

/// Oldest entries are dropped past this many commands.
pub const HISTORY_LIMIT: usize = 100;

/// Deepest nesting of parentheses and unary signs `calc` accepts.
pub const CALC_MAX_DEPTH: usize = 64;

/// Command interpreter with bounded history.
#[derive(Debug, Default)]
pub struct Terminal {
    history: VecDeque<String>,
    /// Steps back from the newest entry while browsing; `None` when not browsing.
    cursor: Option<usize>,
    staged: Option<String>,
}

impl Terminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executed commands, oldest first.
    pub fn history(&self) -> &VecDeque<String> {
        &self.history
    }

    /// Queues a command to run when the terminal next opens.
    pub fn stage(&mut self, command: impl Into<String>) {
        self.staged = Some(command.into());
    }

    /// Consumes the staged command.
    pub fn take_staged(&mut self) -> Option<String> {
        self.staged.take()
    }

    /// Older history entry (arrow up). Stops at the oldest.
    pub fn history_up(&mut self) -> Option<&str> {
        if self.history.is_empty() {
            return None;
        }
        let next = match self.cursor {
            None => 0,
            Some(i) if i + 1 < self.history.len() => i + 1,
            Some(i) => i,
        };
        self.cursor = Some(next);
        self.history.get(self.history.len() - 1 - next).map(String::as_str)
    }

    /// Newer history entry (arrow down). `None` once past the newest, meaning an empty prompt.
    pub fn history_down(&mut self) -> Option<&str> {
        match self.cursor {
            Some(i) if i > 0 => {
                self.cursor = Some(i - 1);
                self.history.get(self.history.len() - i).map(String::as_str)
            }
            _ => {
                self.cursor = None;
                None
            }
        }
    }

    pub fn execute<R: Rng + ?Sized>(&mut self, cmd: &str, rng: &mut R) -> TerminalResponse {
        self.execute_at(cmd, Local::now(), rng)
    }

    pub fn execute_at<R: Rng + ?Sized>(
        &mut self,
        cmd: &str,
        now: DateTime<Local>,
        rng: &mut R,
    ) -> TerminalResponse {
        let input = cmd.trim();
        if input.is_empty() {
            return TerminalResponse::default();
        }
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(input.to_string());
        self.cursor = None;
        tracing::debug!(target: "lcars::terminal", command = input, "terminal command");

        let (word, rest) = match input.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r),
            None => (input, ""),
        };
        let command = word.to_lowercase();

        let mut out = vec![TerminalLine::new(format!("> {}", input), Tone::Primary)];
        let mut clear = false;

        match command.as_str() {
            "help" => help(&mut out),
            "clear" => {
                clear = true;
                out.clear();
            }
            "status" => {
                out.push(TerminalLine::blank());
                out.push(TerminalLine::new("🖥️  LCARS SYSTEM STATUS", Tone::Primary));
                for line in [
                    "  Core Systems:    OPTIMAL",
                    "  AI Module:       READY",
                    "  Data Storage:    NOMINAL",
                    "  Network:         CONNECTED",
                ] {
                    out.push(TerminalLine::new(line, Tone::Success));
                }
                out.push(TerminalLine::blank());
            }
            "date" => out.push(TerminalLine::new(
                now.format("%a %b %d %Y %H:%M:%S GMT%z").to_string(),
                Tone::Success,
            )),
            "stardate" => {
                out.push(TerminalLine::new(
                    format!("⭐ Stardate: {}", stardate(now.timestamp_millis())),
                    Tone::Primary,
                ));
                out.push(TerminalLine::new(
                    format!("   Earth Date: {}", now.format("%-m/%-d/%Y")),
                    Tone::Muted,
                ));
            }
            "tasks" => {
                out.push(TerminalLine::new("📋 Active Tasks:", Tone::Primary));
                out.push(TerminalLine::new(
                    "  Use /tasks page to view and manage tasks",
                    Tone::Muted,
                ));
            }
            "weather" => {
                out.push(TerminalLine::new("🌤️  Weather:", Tone::Primary));
                out.push(TerminalLine::new(
                    "  Use /weather page for detailed weather info",
                    Tone::Muted,
                ));
            }
            "joke" => out.push(TerminalLine::new(pick(quotes::TERMINAL_JOKES, rng), Tone::Success)),
            "fortune" => out.push(TerminalLine::new(pick(quotes::FORTUNES, rng), Tone::Success)),
            "calc" => {
                if rest.trim().is_empty() {
                    out.push(TerminalLine::new("Usage: calc <expression>", Tone::Warning));
                } else {
                    let expr: String = rest
                        .chars()
                        .filter(|c| c.is_ascii_digit() || "+-*/().".contains(*c))
                        .collect();
                    match evaluate(&expr) {
                        Some(value) => out.push(TerminalLine::new(
                            format!("🔢 {} = {}", expr, format_number(value)),
                            Tone::Success,
                        )),
                        None => out.push(TerminalLine::new("❌ Invalid expression", Tone::Destructive)),
                    }
                }
            }
            "echo" => out.push(TerminalLine::new(rest, Tone::Plain)),
            "redshirt" => {
                out.push(TerminalLine::new("🔴 Beaming down redshirt...", Tone::Destructive));
                let fate = pick(quotes::REDSHIRT_FATES, rng);
                let tone = if fate.contains("survived") {
                    Tone::Success
                } else {
                    Tone::Destructive
                };
                out.push(TerminalLine::new(fate, tone));
                out.push(TerminalLine::blank());
            }
            "khan" => {
                out.push(TerminalLine::blank());
                for line in [
                    "🗣️  KHAAAAAAAAAAAAAN!",
                    "   KHAAAAAAAAAAAAAAN!",
                    "     KHAAAAAAAAAAN!",
                ] {
                    out.push(TerminalLine::new(line, Tone::Destructive));
                }
                out.push(TerminalLine::blank());
                out.push(TerminalLine::new("   - Captain James T. Kirk", Tone::Muted));
                out.push(TerminalLine::blank());
            }
            "beam" => {
                out.push(TerminalLine::new("⚡ Energizing...", Tone::Warning));
                for bar in ['█', '▓', '▒', '░'] {
                    out.push(TerminalLine::new(bar.to_string().repeat(21), Tone::Primary));
                }
                out.push(TerminalLine::new("✨ Transport complete!", Tone::Success));
                out.push(TerminalLine::blank());
            }
            "cowsay" => cowsay(&mut out, rest.trim()),
            other => match other.parse::<Captain>() {
                Ok(captain) => {
                    out.push(TerminalLine::new(captain.random_quote(rng), Tone::Primary))
                }
                Err(_) => {
                    out.push(TerminalLine::new(
                        format!("Unknown command: '{}'", other),
                        Tone::Destructive,
                    ));
                    out.push(TerminalLine::new(
                        "Type 'help' for available commands",
                        Tone::Muted,
                    ));
                }
            },
        }

        if !clear {
            out.push(TerminalLine::blank());
        }
        TerminalResponse { lines: out, clear }
    }
}

fn help(out: &mut Vec<TerminalLine>) {
    out.push(TerminalLine::blank());
    out.push(TerminalLine::new("Available Commands:", Tone::Primary));
    for (cmd, what) in HELP {
        out.push(TerminalLine::new(format!("  {:<18}- {}", cmd, what), Tone::Plain));
    }
    out.push(TerminalLine::blank());
    out.push(TerminalLine::new("Easter Eggs:", Tone::Primary));
    for (cmd, what) in EASTER_EGGS {
        out.push(TerminalLine::new(format!("  {:<18}- {}", cmd, what), Tone::Plain));
    }
    out.push(TerminalLine::blank());
}

fn cowsay(out: &mut Vec<TerminalLine>, message: &str) {
    let message = if message.is_empty() { "Moo!" } else { message };
    let width = message.chars().count() + 2;
    out.push(TerminalLine::blank());
    out.push(TerminalLine::new(format!(" {}", "_".repeat(width)), Tone::Plain));
    out.push(TerminalLine::new(format!("< {} >", message), Tone::Plain));
    out.push(TerminalLine::new(format!(" {}", "-".repeat(width)), Tone::Plain));
    for line in [
        "        \\   ^__^",
        "         \\  (oo)\\_______",
        "            (__)\\       )\\/\\",
        "                ||----w |",
        "                ||     ||",
    ] {
        out.push(TerminalLine::new(line, Tone::Plain));
    }
    out.push(TerminalLine::blank());
}

/// Integers print without a fractional part.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Evaluates `+ - * /` with parentheses and unary signs. `None` on any syntax error or a
/// non-finite result.
pub fn evaluate(expr: &str) -> Option<f64> {
    let mut parser = Calc {
        src: expr.as_bytes(),
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if parser.pos != parser.src.len() || !value.is_finite() {
        return None;
    }
    Some(value)
}

struct Calc<'a> {
    src: &'a [u8],
    pos: usize,
    depth: usize,
}

impl Calc<'_> {
    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn expr(&mut self) -> Option<f64> {
        let mut acc = self.term()?;
        while let Some(op @ (b'+' | b'-')) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            acc = if op == b'+' { acc + rhs } else { acc - rhs };
        }
        Some(acc)
    }

    fn term(&mut self) -> Option<f64> {
        let mut acc = self.factor()?;
        while let Some(op @ (b'*' | b'/')) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            acc = if op == b'*' { acc * rhs } else { acc / rhs };
        }
        Some(acc)
    }

    fn factor(&mut self) -> Option<f64> {
        if self.depth >= CALC_MAX_DEPTH {
            return None;
        }
        self.depth += 1;
        let value = self.nested();
        self.depth -= 1;
        value
    }

    fn nested(&mut self) -> Option<f64> {
        match self.peek()? {
            b'+' => {
                self.pos += 1;
                self.factor()
            }
            b'-' => {
                self.pos += 1;
                self.factor().map(|v| -v)
            }
            b'(' => {
                self.pos += 1;
                let v = self.expr()?;
                if self.peek()? != b')' {
                    return None;
                }
                self.pos += 1;
                Some(v)
            }
            _ => self.number(),
        }
    }

    fn number(&mut self) -> Option<f64> {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9' | b'.')) {
            self.pos += 1;
        }
        std::str::from_utf8(&self.src[start..self.pos])
            .ok()?
            .parse()
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn run(term: &mut Terminal, cmd: &str) -> TerminalResponse {
        let mut rng = StdRng::seed_from_u64(42);
        let now = Local.with_ymd_and_hms(2024, 5, 4, 12, 0, 0).unwrap();
        term.execute_at(cmd, now, &mut rng)
    }

    #[test]
    fn calc_respects_precedence() {
        assert_eq!(evaluate("2+3*4"), Some(14.0));
        assert_eq!(evaluate("(2+3)*4"), Some(20.0));
        assert_eq!(evaluate("-3+10/4"), Some(-0.5));
        assert_eq!(evaluate("1/0"), None);
        assert_eq!(evaluate("2+"), None);
        assert_eq!(evaluate(""), None);
        assert_eq!(evaluate("1..2"), None);
    }

    #[test]
    fn calc_rejects_deep_nesting() {
        assert_eq!(evaluate(&"(".repeat(200_000)), None);
        assert_eq!(evaluate(&format!("{}1", "-".repeat(100_000))), None);
        let ok = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(evaluate(&ok), Some(1.0));
        assert_eq!(evaluate("--1"), Some(1.0));

        let mut term = Terminal::new();
        let r = run(&mut term, &format!("calc {}", "(".repeat(100_000)));
        assert_eq!(r.lines[1].text, "❌ Invalid expression");
    }

    #[test]
    fn history_is_bounded() {
        let mut term = Terminal::new();
        for i in 0..HISTORY_LIMIT + 25 {
            run(&mut term, &format!("echo {}", i));
        }
        assert_eq!(term.history().len(), HISTORY_LIMIT);
        assert_eq!(term.history().front().map(String::as_str), Some("echo 25"));
        assert_eq!(term.history_up(), Some("echo 124"));
    }

    #[test]
    fn calc_command_strips_junk() {
        let mut term = Terminal::new();
        let r = run(&mut term, "calc 7 * 6 apples");
        assert_eq!(r.lines[1].text, "🔢 7*6 = 42");
        let r = run(&mut term, "calc (1");
        assert_eq!(r.lines[1].text, "❌ Invalid expression");
        let r = run(&mut term, "calc");
        assert_eq!(r.lines[1].text, "Usage: calc <expression>");
    }

    #[test]
    fn captain_commands_quote_from_table() {
        let mut term = Terminal::new();
        let r = run(&mut term, "PICARD");
        assert!(quotes::PICARD_QUOTES.contains(&r.lines[1].text.as_str()));
    }

    #[test]
    fn unknown_command_is_reported() {
        let mut term = Terminal::new();
        let r = run(&mut term, "warp 9");
        assert_eq!(r.lines[1].text, "Unknown command: 'warp'");
        assert_eq!(r.lines[1].tone, Tone::Destructive);
    }

    #[test]
    fn clear_wipes_screen() {
        let mut term = Terminal::new();
        let r = run(&mut term, "clear");
        assert!(r.clear);
        assert!(r.lines.is_empty());
    }

    #[test]
    fn echo_keeps_case_and_cowsay_defaults() {
        let mut term = Terminal::new();
        assert_eq!(run(&mut term, "echo Make It So").lines[1].text, "Make It So");
        let r = run(&mut term, "cowsay");
        assert!(r.texts().contains(&"< Moo! >"));
        assert!(r.texts().contains(&" ______"));
    }

    #[test]
    fn stardate_uses_clock() {
        let mut term = Terminal::new();
        let r = run(&mut term, "stardate");
        assert!(r.lines[1].text.starts_with("⭐ Stardate: 41"));
        assert_eq!(r.lines[2].text, "   Earth Date: 5/4/2024");
    }

    #[test]
    fn history_navigation() {
        let mut term = Terminal::new();
        assert_eq!(term.history_up(), None);
        run(&mut term, "help");
        run(&mut term, "joke");
        run(&mut term, "   ");
        assert_eq!(term.history().len(), 2);
        assert_eq!(term.history_up(), Some("joke"));
        assert_eq!(term.history_up(), Some("help"));
        assert_eq!(term.history_up(), Some("help"));
        assert_eq!(term.history_down(), Some("joke"));
        assert_eq!(term.history_down(), None);
    }

    #[test]
    fn staged_command_is_one_shot() {
        let mut term = Terminal::new();
        term.stage("spock");
        assert_eq!(term.take_staged().as_deref(), Some("spock"));
        assert_eq!(term.take_staged(), None);
    }
}

//! Quote, joke and fortune tables shared by the composer and the terminal.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Captain roster. Declaration order is the resolution order when an utterance names
/// more than one captain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Captain {
    Spock,
    Picard,
    Sisko,
    Janeway,
    Archer,
    Mariner,
}

impl Captain {
    pub const ROSTER: [Captain; 6] = [
        Captain::Spock,
        Captain::Picard,
        Captain::Sisko,
        Captain::Janeway,
        Captain::Archer,
        Captain::Mariner,
    ];

    /// Lowercase name; also the terminal command that prints a quote.
    pub fn name(&self) -> &'static str {
        match self {
            Captain::Spock => "spock",
            Captain::Picard => "picard",
            Captain::Sisko => "sisko",
            Captain::Janeway => "janeway",
            Captain::Archer => "archer",
            Captain::Mariner => "mariner",
        }
    }

    pub fn quotes(&self) -> &'static [&'static str] {
        match self {
            Captain::Spock => SPOCK_QUOTES,
            Captain::Picard => PICARD_QUOTES,
            Captain::Sisko => SISKO_QUOTES,
            Captain::Janeway => JANEWAY_QUOTES,
            Captain::Archer => ARCHER_QUOTES,
            Captain::Mariner => MARINER_QUOTES,
        }
    }

    pub fn random_quote<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        pick(self.quotes(), rng)
    }
}

impl fmt::Display for Captain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Captain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Captain::ROSTER
            .iter()
            .find(|c| c.name() == name)
            .copied()
            .ok_or_else(|| format!("unknown captain: {}", s.trim()))
    }
}

/// Uniform pick from a non-empty table.
pub fn pick<R: Rng + ?Sized>(table: &'static [&'static str], rng: &mut R) -> &'static str {
    table.choose(rng).copied().unwrap_or_default()
}

pub const SPOCK_QUOTES: &[&str] = &[
    "🖖 'Live long and prosper.'",
    "🖖 'Logic is the beginning of wisdom, not the end.'",
    "🖖 'Change is the essential process of all existence.'",
    "🖖 'Fascinating.'",
];

pub const PICARD_QUOTES: &[&str] = &[
    "👨‍✈️ 'Make it so.'",
    "👨‍✈️ 'Engage!'",
    "👨‍✈️ 'Tea. Earl Grey. Hot.'",
    "👨‍✈️ 'Things are only impossible until they're not.'",
    "👨‍✈️ 'The line must be drawn here!'",
    "👨‍✈️ 'There are four lights!'",
];

pub const SISKO_QUOTES: &[&str] = &[
    "⚾ 'It's easy to be a saint in paradise.'",
    "⚾ 'I can live with it.'",
    "⚾ 'If you want to know who you are, it's important to know who you were.'",
    "⚾ 'Sometimes the only way to save a life is to take one.'",
    "⚾ 'I am far more than just another Starfleet captain.'",
    "⚾ 'In the Pale Moonlight...'",
];

pub const JANEWAY_QUOTES: &[&str] = &[
    "☕ 'Coffee. Black.'",
    "☕ 'There's coffee in that nebula!'",
    "☕ 'Do it.'",
    "☕ 'We're Starfleet officers. Weird is part of the job.'",
    "☕ 'Time's up!'",
    "☕ 'I don't break rules, but I bend them... a lot.'",
];

pub const ARCHER_QUOTES: &[&str] = &[
    "🐕 'Let's see what's out there.'",
    "🐕 'We're going to stumble, make mistakes... but we're going to keep going.'",
    "🐕 'Where no man has gone before.'",
    "🐕 'We can't turn tail every time we get slapped.'",
    "🐕 'Someday, my people are going to come up with some sort of a doctrine.'",
    "🐕 'This is why we're out here, Doctor.'",
];

pub const MARINER_QUOTES: &[&str] = &[
    "🍺 'Second contact is where the magic happens!'",
    "🍺 'I know every loophole, every exploit, every-'",
    "🍺 'Actually, that's pretty badass.'",
    "🍺 'Don't overthink it!'",
    "🍺 'We're the Cerritos! We're the best at being the worst!'",
    "🍺 'Classic Starfleet hubris.'",
];

/// Jokes told by the chat composer (prefixed with 😄 when used).
pub const CHAT_JOKES: &[&str] = &[
    "Why do programmers prefer dark mode? Because light attracts bugs! 😄",
    "How many programmers does it take to change a light bulb? None, that's a hardware problem!",
    "Why did the developer go broke? Because he used up all his cache!",
    "What's the object-oriented way to become wealthy? Inheritance! 💰",
];

pub const TERMINAL_JOKES: &[&str] = &[
    "Why do programmers prefer dark mode? Because light attracts bugs! 😄",
    "How many programmers does it take to change a light bulb? None, that's a hardware problem! 💡",
    "Why did the developer go broke? Because he used up all his cache! 💸",
    "There are 10 types of people: those who understand binary and those who don't. 🔢",
];

pub const FORTUNES: &[&str] = &[
    "✨ 'The best way to predict the future is to invent it.' - Alan Kay",
    "💡 'Any sufficiently advanced technology is indistinguishable from magic.' - Arthur C. Clarke",
    "🚀 'Innovation distinguishes between a leader and a follower.' - Steve Jobs",
    "🌟 'The only way to do great work is to love what you do.' - Steve Jobs",
];

pub const REDSHIRT_FATES: &[&str] = &[
    "💀 Killed by alien life form on away mission",
    "⚡ Vaporized by unknown energy weapon",
    "🪨 Crushed by falling rocks on Class M planet",
    "👾 Assimilated by the Borg",
    "🌌 Lost in transporter malfunction",
    "🔥 Consumed by plasma fire",
    "✨ Actually survived! (Rare outcome)",
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn captain_names_round_trip() {
        for captain in Captain::ROSTER {
            assert_eq!(captain.name().parse::<Captain>().unwrap(), captain);
        }
        assert!("kirk".parse::<Captain>().is_err());
    }

    #[test]
    fn random_quote_comes_from_table() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let q = Captain::Janeway.random_quote(&mut rng);
            assert!(JANEWAY_QUOTES.contains(&q));
        }
    }
}

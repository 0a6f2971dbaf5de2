//! Terminal rendering of grids, outcomes and session status

use std::collections::BTreeSet;

use gr_slot::{BonusPrize, Position, SlotMachine, SpinOutcome, Symbol};
use rand::Rng;

pub struct Renderer {
    ascii: bool,
}

impl Renderer {
    pub fn new(ascii: bool) -> Self {
        Self { ascii }
    }

    fn cell(&self, symbol: Symbol, highlighted: bool) -> String {
        let face = if self.ascii { symbol.code() } else { symbol.glyph() };
        if highlighted {
            format!("[{face}]")
        } else {
            format!(" {face} ")
        }
    }

    /// One line per grid row; highlighted cells are bracketed
    pub fn grid_lines(&self, rows: &[Vec<Symbol>], highlight: &BTreeSet<Position>) -> Vec<String> {
        rows.iter()
            .enumerate()
            .map(|(r, row)| {
                let cells: Vec<String> = row
                    .iter()
                    .enumerate()
                    .map(|(c, &symbol)| {
                        self.cell(symbol, highlight.contains(&Position::new(r as u8, c as u8)))
                    })
                    .collect();
                format!("  │{}│", cells.join(" "))
            })
            .collect()
    }

    pub fn status_line<R: Rng>(&self, machine: &SlotMachine<R>) -> String {
        let mut line = format!(
            "Balance {}  Bet {} × {} lines = {}  Last win {}",
            format_credits(machine.balance()),
            format_credits(machine.bet()),
            machine.lines(),
            format_credits(machine.total_stake()),
            format_credits(machine.last_win()),
        );
        if machine.free_spins_remaining() > 0 {
            line.push_str(&format!("  Free spins {}", machine.free_spins_remaining()));
        }
        if machine.auto_spin().is_active() {
            line.push_str(&format!("  Auto {:?}", machine.auto_spin()));
        }
        line
    }

    /// Summary lines for a settled spin
    pub fn outcome_lines(&self, outcome: &SpinOutcome) -> Vec<String> {
        let mut lines = Vec::new();
        let win = &outcome.win;

        for line_win in &win.line_wins {
            let mut text = format!(
                "  Line {:>2}: {} × {} pays {}",
                line_win.line_index + 1,
                line_win.run_length,
                self.cell(line_win.symbol, false).trim(),
                format_credits(line_win.win_amount)
            );
            if line_win.multiplier > 1 {
                text.push_str(&format!(" (wild ×{})", line_win.multiplier));
            }
            lines.push(text);
        }

        if let Some(scatter) = &win.scatter_win {
            lines.push(format!(
                "  {} scatters pay {} and award {} free spins",
                scatter.count,
                format_credits(scatter.win_amount),
                scatter.free_spins
            ));
        }

        if let Some(bonus) = &win.bonus {
            lines.push(format!(
                "  🎁 {} bonus symbols! Type 'collect' to open your prize",
                bonus.count
            ));
        }

        if outcome.tier.is_big() {
            lines.push(format!(
                "  ★ {} ★ {} ({}× stake)",
                outcome.tier.label(),
                format_credits(win.total_win),
                outcome.stake_multiple
            ));
        } else if win.is_win() {
            lines.push(format!("  Win {}", format_credits(win.total_win)));
        }

        if outcome.funding.is_free() {
            lines.push(format!(
                "  Free spin, {} left",
                outcome.free_spins_remaining
            ));
        }

        lines
    }

    pub fn bonus_line(&self, prize: &BonusPrize) -> String {
        format!(
            "  🎁 Prize: {}× bet = {}",
            prize.multiplier,
            format_credits(prize.amount)
        )
    }
}

/// Group digits in thousands: 10000 → "10,000"
pub fn format_credits(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_credits() {
        assert_eq!(format_credits(0), "0");
        assert_eq!(format_credits(999), "999");
        assert_eq!(format_credits(1000), "1,000");
        assert_eq!(format_credits(10_000), "10,000");
        assert_eq!(format_credits(1_234_567), "1,234,567");
    }

    #[test]
    fn test_grid_highlight() {
        let renderer = Renderer::new(true);
        let rows = vec![vec![Symbol::Diamond, Symbol::Wild, Symbol::Lemon]];
        let highlight: BTreeSet<Position> = [Position::new(0, 1)].into_iter().collect();
        let lines = renderer.grid_lines(&rows, &highlight);
        assert_eq!(lines, vec!["  │ DIA  [WLD]  LEM │".to_string()]);
    }
}

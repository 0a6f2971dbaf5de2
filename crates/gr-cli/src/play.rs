//! Interactive play loop
//!
//! Reads one command per line, drives the [`SlotMachine`] and animates each
//! spin with the machine's churn schedule before settling it.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use gr_slot::{GameError, SlotMachine, Symbol};
use log::debug;
use rand::Rng;

use crate::commands::{Command, HELP};
use crate::render::{Renderer, format_credits};

pub fn run(machine: &mut SlotMachine, renderer: Renderer) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("🎰 {}", machine.config().name);
    println!("Type 'help' for commands.\n");
    draw_grid(&renderer, &display_rows(machine), &Default::default(), &mut stdout)?;
    println!("{}", renderer.status_line(machine));

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let Some(command) = Command::parse(&line) else {
            println!("Unknown command. Type 'help' for commands.");
            continue;
        };
        debug!("Command: {:?}", command);

        match command {
            Command::Spin => spin(machine, &renderer, &mut stdout)?,
            Command::BetUp => report(machine.increase_bet().map(|_| ())),
            Command::BetDown => report(machine.decrease_bet().map(|_| ())),
            Command::MaxBet => report(machine.set_max_bet().map(|_| ())),
            Command::Auto(mode) => {
                machine.toggle_auto_spin(mode);
                autoplay(machine, &renderer, &mut stdout)?;
            }
            Command::Collect => match machine.collect_bonus() {
                Ok(prize) => println!("{}", renderer.bonus_line(&prize)),
                Err(err) => println!("  {err}"),
            },
            Command::Stats => print_stats(machine),
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Quit => break,
        }
        println!("{}", renderer.status_line(machine));
    }

    print_stats(machine);
    Ok(())
}

fn report(result: Result<(), GameError>) {
    if let Err(err) = result {
        println!("  {err}");
    }
}

/// Spin with animation. Rejections are printed, not propagated.
fn spin(machine: &mut SlotMachine, renderer: &Renderer, out: &mut impl Write) -> Result<()> {
    if let Err(err) = machine.begin_spin() {
        println!("  {err}");
        return Ok(());
    }

    let height = machine.grid().rows() as usize;
    let mut rows = display_rows(machine);
    let mut rng = rand::rng();
    for frame in machine.timing().churn_frames() {
        for cell in rows.iter_mut().flatten() {
            if rng.random_bool(frame.probability.clamp(0.0, 1.0)) {
                *cell = machine.catalog().draw(&mut rng);
            }
        }
        draw_grid(renderer, &rows, &Default::default(), out)?;
        write!(out, "\x1b[{height}A")?;
        out.flush()?;
        thread::sleep(Duration::from_millis(frame.delay_ms));
    }

    let outcome = machine.complete_spin()?;
    let rows: Vec<Vec<Symbol>> = outcome.grid.row_slices().map(<[Symbol]>::to_vec).collect();
    draw_grid(renderer, &rows, &outcome.win.winning_cells, out)?;
    for line in renderer.outcome_lines(&outcome) {
        println!("{line}");
    }
    Ok(())
}

/// Run autoplay until it stops. Bonus rounds are opened automatically.
fn autoplay(machine: &mut SlotMachine, renderer: &Renderer, out: &mut impl Write) -> Result<()> {
    while machine.take_auto_spin() {
        spin(machine, renderer, out)?;
        if machine.bonus_pending().is_some() {
            let prize = machine.collect_bonus()?;
            println!("{}", renderer.bonus_line(&prize));
        }
        println!("{}", renderer.status_line(machine));
        thread::sleep(Duration::from_millis(machine.timing().auto_spin_delay_ms));
    }
    if machine.balance() < machine.total_stake() && machine.free_spins_remaining() == 0 {
        println!("  Not enough credits for another spin.");
    }
    Ok(())
}

fn display_rows(machine: &SlotMachine) -> Vec<Vec<Symbol>> {
    machine.grid().row_slices().map(<[Symbol]>::to_vec).collect()
}

fn draw_grid(
    renderer: &Renderer,
    rows: &[Vec<Symbol>],
    highlight: &std::collections::BTreeSet<gr_slot::Position>,
    out: &mut impl Write,
) -> Result<()> {
    for line in renderer.grid_lines(rows, highlight) {
        writeln!(out, "\x1b[2K{line}")?;
    }
    Ok(())
}

fn print_stats(machine: &SlotMachine) {
    let stats = machine.stats();
    println!("  Spins        {} ({} free)", stats.total_spins, stats.free_spins_played);
    println!("  Staked       {}", format_credits(stats.total_staked));
    println!("  Won          {}", format_credits(stats.total_won));
    println!("  RTP          {:.2}%", stats.rtp());
    println!("  Hit rate     {:.2}%", stats.hit_rate());
    println!("  Biggest win  {}", format_credits(stats.max_win));
    println!("  Bonus rounds {} ({} won)", stats.bonus_triggers, format_credits(stats.bonus_won));
}

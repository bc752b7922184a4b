//! Interactive console session

use std::io::{self, BufRead, Write};

use rand::Rng;

use dh_slot::{DoghouseEngine, SpinResult};

const HELP: &str =
    "Commands: Enter = spin, + = raise bet, - = lower bet, m = max bet, h = help, q = quit";

/// Status line shown before every prompt
pub fn status_line<R: Rng>(engine: &DoghouseEngine<R>) -> String {
    let mut line = format!(
        "Balance: {} | Bet/line: {} | Lines: {} | Total bet: {}",
        engine.balance(),
        engine.bet_per_line(),
        engine.lines(),
        engine.total_bet()
    );
    if engine.in_free_spins() {
        line.push_str(&format!(
            "\nBONUS! Free spins left: {}",
            engine.free_spins_remaining()
        ));
        let sticky = &engine.bonus_state().sticky_wilds;
        if !sticky.is_empty() {
            let cells: Vec<String> = sticky
                .iter()
                .map(|(reel, row)| format!("({reel},{row})"))
                .collect();
            line.push_str(&format!(" | Sticky wilds: {}", cells.join(" ")));
        }
    }
    line
}

/// Grid plus win breakdown for one spin
pub fn describe_spin(result: &SpinResult, balance: u64) -> String {
    let mut out = result.grid.to_string();
    if result.scatter_payout > 0 {
        out.push_str(&format!(
            "SCATTER x{} pays {}\n",
            result.scatter_count, result.scatter_payout
        ));
    }
    if result.free_spins_awarded > 0 {
        out.push_str(&format!("+{} free spins!\n", result.free_spins_awarded));
    }
    if !result.line_wins.is_empty() {
        out.push_str("Line wins:\n");
        for win in &result.line_wins {
            out.push_str(&format!(
                "  Line {:02}: {} x{} -> multiplier {}, pays {}\n",
                win.line_index + 1,
                win.base_symbol.display_name(),
                win.run_length,
                win.effective_multiplier,
                win.payout_coins
            ));
        }
        let lines: Vec<String> = result
            .winning_lines()
            .map(|index| (index + 1).to_string())
            .collect();
        out.push_str(&format!("Winning lines: {}\n", lines.join(", ")));
    }
    if result.is_win() {
        out.push_str(&format!(
            "Total win: {} ({:.1}x total bet). Balance: {}\n",
            result.total_payout,
            result.win_ratio(),
            balance
        ));
    } else {
        out.push_str("No win this time.\n");
    }
    out
}

/// Read commands until the player quits, input ends or funds run out
pub fn cli_loop<R: Rng>(
    engine: &mut DoghouseEngine<R>,
    input: impl BufRead,
    mut output: impl Write,
) -> io::Result<()> {
    writeln!(output, "Welcome to Doghouse!\n")?;
    writeln!(output, "{HELP}\n")?;

    let mut lines = input.lines();
    loop {
        writeln!(output, "{}", status_line(engine))?;
        write!(output, "[Enter=SPIN / + / - / m / h / q]: ")?;
        output.flush()?;

        let Some(line) = lines.next().transpose()? else {
            writeln!(output)?;
            return Ok(());
        };
        match line.trim().to_lowercase().as_str() {
            "q" => {
                writeln!(output, "Bye, thanks for playing!")?;
                return Ok(());
            }
            "+" => engine.change_bet(1),
            "-" => engine.change_bet(-1),
            "m" => engine.max_bet(),
            "h" => writeln!(output, "{HELP}")?,
            _ => {
                if !engine.can_spin() {
                    let config = engine.config();
                    if engine.balance() >= config.total_bet(config.session.min_bet) {
                        writeln!(output, "Not enough funds for this bet. Lower it with -.")?;
                        continue;
                    }
                    writeln!(output, "Not enough funds. Game over.")?;
                    return Ok(());
                }
                match engine.spin() {
                    Ok(result) => {
                        write!(output, "{}", describe_spin(&result, engine.balance()))?;
                        writeln!(output, "{}", "-".repeat(60))?;
                    }
                    Err(e) => {
                        log::warn!("Spin failed: {e}");
                        writeln!(output, "{e}")?;
                        return Ok(());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dh_slot::{BonusState, EngineSnapshot, GameConfig, SessionConfig, Symbol, SymbolWeights};

    fn run(engine: &mut DoghouseEngine, script: &str) -> String {
        let mut out = Vec::new();
        cli_loop(engine, script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_bet_commands() {
        let mut engine = DoghouseEngine::seeded(GameConfig::default(), 1).unwrap();
        run(&mut engine, "+\n+\n-\nq\n");
        assert_eq!(engine.bet_per_line(), 2);
        run(&mut engine, "m\nq\n");
        assert_eq!(engine.bet_per_line(), 10);
    }

    #[test]
    fn test_spin_prints_grid_and_wins() {
        let config = GameConfig::default().with_weights(SymbolWeights::only(Symbol::Dog1));
        let mut engine = DoghouseEngine::seeded(config, 1).unwrap();
        let text = run(&mut engine, "\nq\n");
        assert!(text.contains("| D1  |"));
        assert!(text.contains("Line 01: Rottweiler x5 -> multiplier 100, pays 100"));
        assert!(text.contains("Winning lines: 1, 2, 3, 4, 5, 6, 7, 8, 9, 10"));
        assert!(text.contains("Total win: 1000 (100.0x total bet). Balance: 1990"));
        assert_eq!(engine.stats().total_spins, 1);
    }

    #[test]
    fn test_game_over_when_broke() {
        let config = GameConfig::default().with_session(SessionConfig {
            starting_balance: 9,
            ..Default::default()
        });
        let mut engine = DoghouseEngine::seeded(config, 1).unwrap();
        let text = run(&mut engine, "\n");
        assert!(text.contains("Not enough funds. Game over."));
        assert_eq!(engine.balance(), 9);
    }

    #[test]
    fn test_high_bet_asks_to_lower() {
        let config = GameConfig::default().with_session(SessionConfig {
            starting_balance: 50,
            ..Default::default()
        });
        let mut engine = DoghouseEngine::seeded(config, 1).unwrap();
        let text = run(&mut engine, "m\n\nq\n");
        assert!(text.contains("Lower it with -."));
        assert!(text.contains("Bye"));
        assert_eq!(engine.balance(), 50);
    }

    #[test]
    fn test_status_shows_bonus_and_sticky_wilds() {
        let mut engine = DoghouseEngine::seeded(GameConfig::default(), 1).unwrap();
        assert!(!status_line(&engine).contains("BONUS"));

        let mut bonus = BonusState::with_free_spins(4);
        bonus.sticky_wilds.insert(2, 1);
        bonus.sticky_wilds.insert(0, 2);
        let snapshot = EngineSnapshot {
            bonus,
            ..engine.snapshot()
        };
        engine.restore(&snapshot).unwrap();

        let status = status_line(&engine);
        assert!(status.contains("BONUS! Free spins left: 4"));
        assert!(status.contains("Sticky wilds: (0,2) (2,1)"));
    }

    #[test]
    fn test_end_of_input_quits() {
        let mut engine = DoghouseEngine::seeded(GameConfig::default(), 1).unwrap();
        let text = run(&mut engine, "");
        assert!(text.starts_with("Welcome to Doghouse!"));
        assert_eq!(engine.stats().total_spins, 0);
    }
}

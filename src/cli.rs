/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::{perft, splitperft, Game, Move, Position, FEN_STARTPOS};

/// Command-line driver for the position engine.
#[derive(Debug, Clone, Parser)]
#[command(version, about, rename_all = "lower")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// A command to run against a single position.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Performs a perft on the position at the supplied depth, printing total node count.
    Perft {
        depth: usize,

        /// The position to start from.
        #[arg(short, long, default_value = FEN_STARTPOS)]
        fen: String,
    },

    /// Performs a split perft on the position at the supplied depth.
    #[command(alias = "sperft")]
    Splitperft {
        depth: usize,

        /// The position to start from.
        #[arg(short, long, default_value = FEN_STARTPOS)]
        fen: String,
    },

    /// Shows all legal moves in the position.
    Moves {
        /// The position to generate moves for.
        #[arg(short, long, default_value = FEN_STARTPOS)]
        fen: String,

        /// If set, moves will be sorted in alphabetical order.
        ///
        /// By default, moves are generated in no particular order.
        #[arg(short, long, default_value = "false")]
        sort: bool,

        /// If set, moves will be printed using their debug formatter, which displays what kind of move it is (castle, en passant, etc.).
        #[arg(short, long, default_value = "false")]
        debug: bool,
    },

    /// Print a visual representation of the position.
    #[command(alias = "d")]
    Display {
        /// The position to display.
        #[arg(short, long, default_value = FEN_STARTPOS)]
        fen: String,
    },

    /// Apply moves in UCI notation, in order, then print the resulting position and status.
    Play {
        /// The position to start from.
        #[arg(short, long, default_value = FEN_STARTPOS)]
        fen: String,

        /// Moves to play, such as `e2e4 e7e5 g1f3`.
        moves: Vec<String>,
    },
}

impl Command {
    /// Executes this command, printing its results to stdout.
    pub fn run(self) -> Result<()> {
        match self {
            Self::Perft { depth, fen } => {
                let mut position = Position::from_fen(&fen)?;
                let start = Instant::now();
                let nodes = perft(&mut position, depth);
                print_node_rate(nodes, start);
            }

            Self::Splitperft { depth, fen } => {
                let mut position = Position::from_fen(&fen)?;
                let start = Instant::now();
                let split = splitperft(&mut position, depth);

                for (mv, nodes) in &split {
                    println!("{mv}\t{nodes}");
                }
                let nodes = split.iter().map(|(_, nodes)| nodes).sum();
                println!();
                print_node_rate(nodes, start);
            }

            Self::Moves { fen, sort, debug } => {
                let position = Position::from_fen(&fen)?;
                let mut moves: Vec<Move> = position.legal_moves().into_iter().collect();
                if sort {
                    moves.sort_by_key(Move::to_uci);
                }

                let strings: Vec<String> = if debug {
                    moves.iter().map(|mv| format!("{mv:?}")).collect()
                } else {
                    moves.iter().map(Move::to_uci).collect()
                };
                println!("{}", strings.join(", "));
            }

            Self::Display { fen } => {
                println!("{}", Game::from_fen(&fen)?);
            }

            Self::Play { fen, moves } => {
                let mut game = Game::from_fen(&fen)?;
                for uci in &moves {
                    game.make_move_uci(uci)?;
                }
                info!(moves = moves.len(), "played moves");

                println!("{}", game.to_fen());
                println!("{}", game.status());
            }
        }

        Ok(())
    }
}

/// Prints `nodes` along with the time taken since `start` and the resulting speed.
fn print_node_rate(nodes: u64, start: Instant) {
    let elapsed = start.elapsed();
    let nps = (nodes as f32 / elapsed.as_secs_f32()) as u64;
    let ms = elapsed.as_millis();
    println!("{nodes} nodes in {ms}ms ({nps} nps)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cli = Cli::try_parse_from(["gambit", "perft", "3"]).unwrap();
        assert!(matches!(cli.command, Command::Perft { depth: 3, ref fen } if fen == FEN_STARTPOS));

        let cli = Cli::try_parse_from(["gambit", "play", "e2e4", "e7e5"]).unwrap();
        assert!(matches!(cli.command, Command::Play { ref moves, .. } if moves.len() == 2));

        let args = ["gambit", "moves", "--sort", "--fen", crate::FEN_KIWIPETE];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Moves { sort: true, .. }));

        assert!(Cli::try_parse_from(["gambit", "perft", "deep"]).is_err());
    }

    #[test]
    fn test_play_rejects_illegal_moves() {
        let cmd = Command::Play {
            fen: FEN_STARTPOS.to_string(),
            moves: vec![String::from("e2e4"), String::from("e2e4")],
        };
        assert!(cmd.run().is_err());
    }
}

//! Plain-text board for terminals and logs.
//!
//! Each maze cell is three characters wide. Walls are `+---+` / `|`, doors
//! are `#`, and the cell centre shows (in order of priority) the initial of
//! the player standing there, `*` for several players, `$` for the coin
//! and `k` for a key.

use std::fmt::Write;

use chatmaze_core::player::{Direction, Player};
use chatmaze_core::time::Timestamp;
use chatmaze_hunt::{BORDER, Coin, Maze, MazeCell, Simulation};

/// Render the board followed by a one-line summary per visible player.
pub fn render(simulation: &Simulation, now: Timestamp) -> String {
    let players = simulation.players(now);
    let coin = simulation.coin();
    let mut out = render_maze(simulation.maze(), &players, coin);

    let status = if coin.is_collected() { "collected" } else { "up for grabs" };
    let _ = writeln!(
        out,
        "round {} | coin at ({}, {}) {status}",
        simulation.round(),
        coin.row,
        coin.column
    );
    for player in players.iter().rev() {
        let _ = writeln!(
            out,
            "{} [{}] coins={} at ({}, {}) facing {} queued={}",
            player.name,
            player.source,
            player.coins,
            player.row,
            player.column,
            player.direction,
            player.commands.len()
        );
    }
    out
}

/// Render only the maze grid with players and coin on top.
pub fn render_maze(maze: &Maze, players: &[Player], coin: Coin) -> String {
    let mut out = String::new();
    for row in maze.grid() {
        for cell in row {
            out.push('+');
            out.push_str(edge(cell, Direction::Up, "---", "-#-"));
        }
        out.push_str("+\n");

        for cell in row {
            out.push_str(edge(cell, Direction::Left, "|", "#"));
            out.push(' ');
            out.push(content(cell, players, coin));
            out.push(' ');
        }
        if let Some(last) = row.last() {
            out.push_str(edge(last, Direction::Right, "|", "#"));
        }
        out.push('\n');
    }

    if let Some(bottom) = maze.grid().last() {
        for cell in bottom {
            out.push('+');
            out.push_str(edge(cell, Direction::Down, "---", "-#-"));
        }
        out.push_str("+\n");
    }
    out
}

fn edge(cell: &MazeCell, side: Direction, wall: &'static str, door: &'static str) -> &'static str {
    if cell.door(side).is_some() {
        door
    } else if cell.has_wall(side) {
        wall
    } else if wall.len() == 1 {
        " "
    } else {
        "   "
    }
}

fn content(cell: &MazeCell, players: &[Player], coin: Coin) -> char {
    let (row, column) = (cell.row + BORDER, cell.column + BORDER);
    let mut here = players
        .iter()
        .filter(|p| p.row == row && p.column == column);
    match (here.next(), here.next()) {
        (Some(_), Some(_)) => return '*',
        (Some(player), None) => {
            return player
                .name
                .chars()
                .next()
                .map_or('@', |c| c.to_ascii_uppercase());
        },
        _ => {},
    }
    if !coin.is_collected() && (coin.row, coin.column) == (row, column) {
        '$'
    } else if cell.key.is_some() {
        'k'
    } else {
        ' '
    }
}

#[cfg(test)]
mod tests {
    use chatmaze_core::test_helpers::make_user;
    use chatmaze_hunt::HuntConfig;

    use super::*;

    fn small() -> HuntConfig {
        HuntConfig {
            maze_rows: 2,
            maze_columns: 3,
            ..HuntConfig::default()
        }
    }

    #[test]
    fn grid_has_expected_shape() {
        let sim = Simulation::with_seed(small(), 3);
        let text = render_maze(sim.maze(), &[], sim.coin());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2 * 2 + 1);
        assert!(lines.iter().all(|line| line.chars().count() == 3 * 4 + 1));
        assert_eq!(lines[0], "+---+---+---+");
        assert_eq!(lines[4], "+---+---+---+");
        assert_eq!(text.matches('$').count(), 1);
    }

    #[test]
    fn player_initial_replaces_cell_content() {
        let sim = Simulation::with_seed(small(), 3);
        let coin = sim.coin();
        let player = Player::spawn(&make_user("zed"), coin.row, coin.column, 0, 0);

        let text = render_maze(sim.maze(), &[player], coin);

        assert!(!text.contains('$'));
        assert!(text.contains('V'), "make_user names players \"Viewer ...\"");
    }

    #[test]
    fn stacked_players_show_a_star() {
        let sim = Simulation::with_seed(small(), 3);
        let players = vec![
            Player::spawn(&make_user("a"), 1, 1, 0, 0),
            Player::spawn(&make_user("b"), 1, 1, 0, 0),
        ];
        let text = render_maze(sim.maze(), &players, sim.coin());
        assert_eq!(text.matches('*').count(), 1);
    }

    #[test]
    fn summary_lists_visible_players() {
        let mut sim = Simulation::with_seed(small(), 3);
        sim.update(100, &[make_user("a")]);

        let text = render(&sim, 200);

        assert!(text.contains("round 0"));
        assert!(text.contains("Viewer a [test] coins=0"));
    }
}

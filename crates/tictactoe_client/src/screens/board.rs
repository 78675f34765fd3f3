//! Board of a single game.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tictactoe_api::{GameDetail, GameStatus, PlayerRef, next_player};
use tracing::{debug, info, instrument};

use super::screen::{Screen, ScreenAction, ViewContext};
use super::status_line;
use crate::input::{Cell, move_cursor};

/// Shown while the open seat is still free.
pub const WAITING_NOTICE: &str = "Waiting for the second player to join the game...";

/// State for the board screen: only the cell cursor is local.
#[derive(Debug, Default)]
pub struct BoardScreen {
    cursor: Cell,
}

impl BoardScreen {
    /// Creates the board screen with the cursor in the top-left cell.
    #[instrument]
    pub fn new() -> Self {
        debug!("Initializing BoardScreen");
        Self::default()
    }
}

fn player_line(label: &str, player: &Option<PlayerRef>) -> String {
    match player {
        Some(p) => format!("{}: {} (ID: {})", label, p.username(), p.id()),
        None => format!("{}: N/A", label),
    }
}

/// Lines describing seats, turn and outcome.
fn info_lines(game: &GameDetail) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(player_line("First Player", game.first_player())),
        Line::from(player_line("Second Player", game.second_player())),
    ];

    match game.status() {
        GameStatus::Open => {}
        GameStatus::Progress => {
            let turn = next_player(
                game.board(),
                game.first_player().as_ref(),
                game.second_player().as_ref(),
            )
            .map_or("N/A".to_string(), |p| p.username().clone());
            lines.push(Line::from(format!("Current Turn: {}", turn)));
        }
        GameStatus::Finished => {
            let outcome = match game.winner() {
                Some(winner) => format!("Winner: {}", winner.username()),
                None => "Draw".to_string(),
            };
            lines.push(Line::styled(
                outcome,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ));
        }
    }

    if game.second_player().is_none() {
        lines.push(Line::styled(
            WAITING_NOTICE,
            Style::default().fg(Color::Yellow),
        ));
    }
    lines
}

/// Grid lines with the cursor highlighted.
fn grid_lines(game: &GameDetail, cursor: Cell) -> Vec<Line<'static>> {
    let first = game.first_player().as_ref();
    let mut lines = Vec::new();
    for (r, cells) in game.board().rows().iter().enumerate() {
        let mut spans = Vec::new();
        for (c, cell) in cells.iter().enumerate() {
            let here = Cell { row: r, col: c };
            let (text, mut style) = match cell {
                Some(mark) => {
                    let symbol = mark.symbol(first);
                    let color = if symbol == "X" { Color::Blue } else { Color::Red };
                    (
                        symbol,
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )
                }
                None => (here.digit().to_string(), Style::default().fg(Color::DarkGray)),
            };
            if here == cursor {
                style = style.bg(Color::Yellow).fg(Color::Black);
            }
            spans.push(Span::styled(format!(" {} ", text), style));
            if c < 2 {
                spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
            }
        }
        lines.push(Line::from(spans));
        if r < 2 {
            lines.push(Line::styled(
                "───┼───┼───",
                Style::default().fg(Color::DarkGray),
            ));
        }
    }
    lines
}

impl Screen for BoardScreen {
    #[instrument(skip(self, frame, ctx))]
    fn render(&self, frame: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
        let games = ctx.games;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(6),
                Constraint::Min(7),
                Constraint::Length(1),
                Constraint::Length(3),
            ])
            .split(area);

        let viewed = ctx.viewed.map_or("N/A".to_string(), |id| id.to_string());
        let title = Paragraph::new(format!("Game Board for Game ID: {}", viewed))
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let game = games
            .current_game()
            .as_ref()
            .filter(|g| Some(*g.id()) == ctx.viewed);

        match game {
            Some(game) => {
                frame.render_widget(
                    Paragraph::new(info_lines(game))
                        .block(Block::default().borders(Borders::ALL)),
                    chunks[1],
                );
                frame.render_widget(
                    Paragraph::new(grid_lines(game, self.cursor))
                        .alignment(Alignment::Center)
                        .block(Block::default().borders(Borders::ALL)),
                    chunks[2],
                );
            }
            None => {
                frame.render_widget(
                    Paragraph::new("Loading game...")
                        .alignment(Alignment::Center)
                        .block(Block::default().borders(Borders::ALL)),
                    chunks[1],
                );
            }
        }

        frame.render_widget(
            status_line(games.error().as_deref(), *games.is_loading()),
            chunks[3],
        );

        let can_join = game.is_some_and(|g| *g.status() == GameStatus::Open);
        let help_text = if can_join {
            "←↑↓→/1-9: Cell | Enter: Move | j: Join Game | r: Refresh | Esc: Back"
        } else {
            "←↑↓→/1-9: Cell | Enter: Move | r: Refresh | Esc: Back"
        };
        let help = Paragraph::new(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[4]);
    }

    #[instrument(skip(self, key, ctx))]
    fn handle_key(&mut self, key: KeyEvent, ctx: &ViewContext<'_>) -> ScreenAction {
        match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                self.cursor = move_cursor(self.cursor, key.code);
                ScreenAction::Stay
            }
            KeyCode::Enter => {
                info!(row = self.cursor.row, col = self.cursor.col, "Move chosen");
                ScreenAction::MakeMove {
                    row: self.cursor.row,
                    col: self.cursor.col,
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() => match Cell::from_digit(c) {
                Some(cell) => {
                    self.cursor = cell;
                    info!(row = cell.row, col = cell.col, "Move chosen");
                    ScreenAction::MakeMove {
                        row: cell.row,
                        col: cell.col,
                    }
                }
                None => ScreenAction::Stay,
            },
            KeyCode::Char('j') => {
                let open = ctx
                    .games
                    .current_game()
                    .as_ref()
                    .filter(|g| Some(*g.id()) == ctx.viewed)
                    .is_some_and(|g| *g.status() == GameStatus::Open);
                if open {
                    ScreenAction::JoinGame
                } else {
                    ScreenAction::Stay
                }
            }
            KeyCode::Char('r') => ScreenAction::Refresh,
            KeyCode::Esc | KeyCode::Char('b') => ScreenAction::BackToList,
            _ => ScreenAction::Stay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictactoe_api::{Board, Mark};

    fn alice() -> PlayerRef {
        PlayerRef::new(1, "alice".to_string())
    }

    fn bob() -> PlayerRef {
        PlayerRef::new(2, "bob".to_string())
    }

    fn text(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn progress_shows_turn_from_parity() {
        let board = Board::from_rows([
            [Some(Mark::Player(1)), None, None],
            [None, None, None],
            [None, None, None],
        ]);
        let game = GameDetail::new(
            1,
            GameStatus::Progress,
            board,
            Some(alice()),
            Some(bob()),
            None,
        );
        let lines = text(&info_lines(&game));
        assert!(lines.contains(&"Current Turn: bob".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("Winner")));
    }

    #[test]
    fn open_game_waits_for_second_player() {
        let game = GameDetail::new(1, GameStatus::Open, Board::default(), Some(alice()), None, None);
        let lines = text(&info_lines(&game));
        assert!(lines.contains(&"Second Player: N/A".to_string()));
        assert!(lines.contains(&WAITING_NOTICE.to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("Current Turn")));
    }

    #[test]
    fn finished_game_shows_winner_or_draw() {
        let won = GameDetail::new(
            1,
            GameStatus::Finished,
            Board::default(),
            Some(alice()),
            Some(bob()),
            Some(alice()),
        );
        assert!(text(&info_lines(&won)).contains(&"Winner: alice".to_string()));

        let drawn = GameDetail::new(
            1,
            GameStatus::Finished,
            Board::default(),
            Some(alice()),
            Some(bob()),
            None,
        );
        assert!(text(&info_lines(&drawn)).contains(&"Draw".to_string()));
    }

    #[test]
    fn digits_move_directly() {
        let session = crate::store::SessionState::default();
        let games = crate::store::GameState::new(10);
        let ctx = ViewContext {
            session: &session,
            games: &games,
            viewed: Some(1),
        };
        let mut screen = BoardScreen::new();
        assert_eq!(
            screen.handle_key(KeyEvent::from(KeyCode::Char('5')), &ctx),
            ScreenAction::MakeMove { row: 1, col: 1 }
        );
        assert_eq!(
            screen.handle_key(KeyEvent::from(KeyCode::Char('j')), &ctx),
            ScreenAction::Stay
        );
    }

    #[test]
    fn join_needs_the_viewed_game_loaded() {
        let session = crate::store::SessionState::default();
        let open = GameDetail::new(1, GameStatus::Open, Board::default(), Some(alice()), None, None);
        let games = crate::store::reduce_games(
            &crate::store::GameState::new(10),
            crate::store::GameAction::SetCurrentGame(Some(open)),
        );
        let mut screen = BoardScreen::new();

        let stale = ViewContext {
            session: &session,
            games: &games,
            viewed: Some(2),
        };
        assert_eq!(
            screen.handle_key(KeyEvent::from(KeyCode::Char('j')), &stale),
            ScreenAction::Stay
        );

        let loaded = ViewContext {
            viewed: Some(1),
            ..stale
        };
        assert_eq!(
            screen.handle_key(KeyEvent::from(KeyCode::Char('j')), &loaded),
            ScreenAction::JoinGame
        );
    }
}

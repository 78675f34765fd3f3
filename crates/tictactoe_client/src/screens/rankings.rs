//! Player rankings table.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use tictactoe_api::RankingEntry;
use tracing::instrument;

use super::screen::{Screen, ScreenAction, ViewContext};
use super::status_line;

/// Rankings have no local state; paging lives in the game store.
#[derive(Debug, Default)]
pub struct RankingsScreen;

impl RankingsScreen {
    /// Creates the rankings screen.
    pub fn new() -> Self {
        Self
    }
}

fn ranking_row(entry: &RankingEntry) -> Row<'static> {
    Row::new(vec![
        Cell::from(entry.username().clone()),
        Cell::from(entry.games_played().to_string()),
        Cell::from(format!("{}%", entry.win_rate())),
    ])
}

impl Screen for RankingsScreen {
    #[instrument(skip(self, frame, ctx))]
    fn render(&self, frame: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
        let games = ctx.games;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(3),
            ])
            .split(area);

        let header = Row::new(vec!["Username", "Games Played", "Win Rate"]).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        let rows: Vec<Row> = games.rankings().iter().map(ranking_row).collect();
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(50),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Rankings"));
        frame.render_widget(table, chunks[0]);

        let previous_style = if *games.rankings_offset() > 0 {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let paging = Line::from(vec![
            Span::styled("[p] Previous", previous_style),
            Span::raw("   "),
            Span::styled("[n] Next", Style::default().fg(Color::White)),
        ]);
        frame.render_widget(
            Paragraph::new(paging).alignment(Alignment::Center),
            chunks[1],
        );

        frame.render_widget(
            status_line(games.error().as_deref(), *games.is_loading()),
            chunks[2],
        );

        let help = Paragraph::new("n: Next page | p: Previous page")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[3]);
    }

    #[instrument(skip(self, key, ctx))]
    fn handle_key(&mut self, key: KeyEvent, ctx: &ViewContext<'_>) -> ScreenAction {
        match key.code {
            KeyCode::Char('n') => ScreenAction::RankingsNext,
            KeyCode::Char('p') if *ctx.games.rankings_offset() > 0 => {
                ScreenAction::RankingsPrevious
            }
            _ => ScreenAction::Stay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{GameAction, GameState, SessionState, reduce_games};

    fn press(games: &GameState, code: KeyCode) -> ScreenAction {
        let session = SessionState::default();
        let ctx = ViewContext {
            session: &session,
            games,
            viewed: None,
        };
        RankingsScreen::new().handle_key(KeyEvent::from(code), &ctx)
    }

    #[test]
    fn previous_disabled_on_first_page() {
        let first = GameState::new(10);
        assert_eq!(press(&first, KeyCode::Char('p')), ScreenAction::Stay);
        assert_eq!(press(&first, KeyCode::Char('n')), ScreenAction::RankingsNext);

        let second = reduce_games(&first, GameAction::NextRankingsPage);
        assert_eq!(
            press(&second, KeyCode::Char('p')),
            ScreenAction::RankingsPrevious
        );
    }
}

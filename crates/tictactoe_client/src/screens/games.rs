//! Game list: filter, paging, create and open.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tictactoe_api::{GameSummary, PlayerRef};
use tracing::{debug, info, instrument};

use super::screen::{Screen, ScreenAction, ViewContext};
use super::status_line;

/// State for the game list.
#[derive(Debug, Default)]
pub struct GameListScreen {
    list_state: ListState,
}

impl GameListScreen {
    /// Creates the list screen with nothing selected.
    #[instrument]
    pub fn new() -> Self {
        debug!("Initializing GameListScreen");
        Self::default()
    }

    /// Index of the highlighted row, clamped to `len`.
    fn selected(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.list_state.selected().unwrap_or(0).min(len - 1))
    }

    #[instrument(skip(self))]
    fn select_previous(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let i = match self.selected(len) {
            Some(i) if i > 0 => i - 1,
            _ => len - 1,
        };
        self.list_state.select(Some(i));
    }

    #[instrument(skip(self))]
    fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let i = match self.selected(len) {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.list_state.select(Some(i));
    }
}

fn player_name(player: &Option<PlayerRef>) -> &str {
    player.as_ref().map_or("N/A", |p| p.username().as_str())
}

fn row(game: &GameSummary, username: &str) -> ListItem<'static> {
    let mut spans = vec![
        Span::raw(format!("#{:<6}", game.id())),
        Span::styled(
            format!("{:<10}", game.status().to_string()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(format!(
            "{} vs {}",
            player_name(game.first_player()),
            player_name(game.second_player())
        )),
    ];
    if game.has_participant(username) {
        spans.push(Span::styled(
            "  (you)",
            Style::default().fg(Color::Green),
        ));
    }
    ListItem::new(Line::from(spans))
}

fn enabled(enabled: bool) -> Style {
    if enabled {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

impl Screen for GameListScreen {
    #[instrument(skip(self, frame, ctx))]
    fn render(&self, frame: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
        let games = ctx.games;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(3),
            ])
            .split(area);

        let toolbar = Paragraph::new(format!(
            "Filter: {}   Total: {}   Page offset: {}",
            games.filter(),
            games.pagination().count(),
            games.list_offset()
        ))
        .block(Block::default().borders(Borders::ALL).title("Games"));
        frame.render_widget(toolbar, chunks[0]);

        let items: Vec<ListItem> = games
            .existing_games()
            .iter()
            .map(|g| row(g, ctx.session.username()))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut list_state = ListState::default();
        list_state.select(self.selected(games.existing_games().len()));
        frame.render_stateful_widget(list, chunks[1], &mut list_state);

        let paging = Line::from(vec![
            Span::styled("[p] Previous", enabled(games.pagination().has_previous())),
            Span::raw("   "),
            Span::styled("[n] Next", enabled(games.pagination().has_next())),
        ]);
        frame.render_widget(
            Paragraph::new(paging).alignment(Alignment::Center),
            chunks[2],
        );

        frame.render_widget(
            status_line(games.error().as_deref(), *games.is_loading()),
            chunks[3],
        );

        let help = Paragraph::new("↑↓: Navigate | Enter: Open | c: Create | f: Filter")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[4]);
    }

    #[instrument(skip(self, key, ctx))]
    fn handle_key(&mut self, key: KeyEvent, ctx: &ViewContext<'_>) -> ScreenAction {
        let games = ctx.games;
        let len = games.existing_games().len();
        match key.code {
            KeyCode::Up => {
                self.select_previous(len);
                ScreenAction::Stay
            }
            KeyCode::Down => {
                self.select_next(len);
                ScreenAction::Stay
            }
            KeyCode::Enter => match self.selected(len) {
                Some(i) => {
                    let id = *games.existing_games()[i].id();
                    info!(game_id = id, "Game selected");
                    ScreenAction::SelectGame(id)
                }
                None => ScreenAction::Stay,
            },
            KeyCode::Char('c') => ScreenAction::CreateGame,
            KeyCode::Char('f') => {
                self.list_state.select(None);
                ScreenAction::CycleFilter
            }
            KeyCode::Char('n') if games.pagination().has_next() => {
                self.list_state.select(None);
                ScreenAction::NextPage
            }
            KeyCode::Char('p') if games.pagination().has_previous() => {
                self.list_state.select(None);
                ScreenAction::PreviousPage
            }
            _ => ScreenAction::Stay,
        }
    }
}

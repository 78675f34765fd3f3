//! Welcome line and tab bar shown above every logged-in screen.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Tabs},
};

/// Top-level tabs of the logged-in client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumIter)]
pub enum Tab {
    /// Game list and board.
    #[default]
    #[strum(to_string = "Existing Games")]
    Games,
    /// Player rankings.
    #[strum(to_string = "Rankings")]
    Rankings,
}

impl Tab {
    /// Returns the other tab.
    pub fn toggle(self) -> Self {
        match self {
            Self::Games => Self::Rankings,
            Self::Rankings => Self::Games,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Games => 0,
            Self::Rankings => 1,
        }
    }
}

/// Renders the header into `area` (five rows tall).
pub fn render_header(frame: &mut Frame, area: Rect, username: &str, active: Tab) {
    use strum::IntoEnumIterator;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(2)])
        .split(area);

    let welcome = Paragraph::new(format!("Welcome, {}", username))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("L: Logout | Tab: Switch tab | q: Quit"),
        );
    frame.render_widget(welcome, chunks[0]);

    let titles: Vec<Line> = Tab::iter().map(|t| Line::from(t.to_string())).collect();
    let tabs = Tabs::new(titles)
        .select(active.index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(tabs, chunks[1]);
}

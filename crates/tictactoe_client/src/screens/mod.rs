//! Terminal screens.

mod board;
mod games;
mod header;
mod login;
mod rankings;
mod screen;

pub use board::BoardScreen;
pub use games::GameListScreen;
pub use header::{Tab, render_header};
pub use login::{LoginScreen, REGISTERED_NOTICE};
pub use rankings::RankingsScreen;
pub use screen::{Screen, ScreenAction, ViewContext};

use ratatui::{
    layout::Alignment,
    style::{Color, Style},
    widgets::Paragraph,
};

/// Error line if there is one, else a loading line, else nothing.
pub(crate) fn status_line(error: Option<&str>, is_loading: bool) -> Paragraph<'_> {
    match (error, is_loading) {
        (Some(error), _) => Paragraph::new(error)
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center),
        (None, true) => Paragraph::new("Loading...")
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center),
        (None, false) => Paragraph::new(""),
    }
}

//! Login / register form.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use derive_getters::Getters;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};
use tracing::{debug, info, instrument};

use super::screen::{Screen, ScreenAction, ViewContext};
use super::status_line;
use crate::commands::AuthMode;

/// Shown after a successful registration.
pub const REGISTERED_NOTICE: &str = "Successfully registered. Proceed to login.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Field {
    #[default]
    Username,
    Password,
}

impl Field {
    fn other(self) -> Self {
        match self {
            Self::Username => Self::Password,
            Self::Password => Self::Username,
        }
    }
}

/// State for the credentials form.
#[derive(Debug, Default, Getters)]
pub struct LoginScreen {
    mode: AuthMode,
    username: String,
    #[getter(skip)]
    password: String,
    #[getter(skip)]
    focus: Field,
    notice: Option<String>,
}

impl LoginScreen {
    /// Creates an empty login form.
    #[instrument]
    pub fn new() -> Self {
        debug!("Initializing LoginScreen");
        Self::default()
    }

    /// Switches back to login after a successful registration.
    #[instrument(skip(self))]
    pub fn registered(&mut self) {
        info!(username = %self.username, "Registration confirmed");
        self.mode = AuthMode::Login;
        self.password.clear();
        self.focus = Field::Password;
        self.notice = Some(REGISTERED_NOTICE.to_string());
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
        }
    }

    fn field_style(&self, field: Field) -> Style {
        if self.focus == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        }
    }
}

impl Screen for LoginScreen {
    #[instrument(skip(self, frame, ctx))]
    fn render(&self, frame: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new(self.mode.to_string())
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let username = Paragraph::new(self.username.as_str())
            .style(self.field_style(Field::Username))
            .block(Block::default().borders(Borders::ALL).title("Username"));
        frame.render_widget(username, chunks[1]);

        let masked = "*".repeat(self.password.chars().count());
        let password = Paragraph::new(masked)
            .style(self.field_style(Field::Password))
            .block(Block::default().borders(Borders::ALL).title("Password"));
        frame.render_widget(password, chunks[2]);

        let status = match (&self.notice, ctx.session.error()) {
            (_, Some(_)) | (None, None) => {
                status_line(ctx.session.error().as_deref(), *ctx.session.is_loading())
            }
            (Some(notice), None) => Paragraph::new(notice.as_str())
                .style(Style::default().fg(Color::Green))
                .alignment(Alignment::Center),
        };
        frame.render_widget(status.block(Block::default().borders(Borders::ALL)), chunks[3]);

        let toggle_hint = match self.mode {
            AuthMode::Login => "Ctrl+T: Register instead",
            AuthMode::Register => "Ctrl+T: Login instead",
        };
        let help = Paragraph::new(format!(
            "Tab: Switch field | Enter: {} | {} | Esc: Quit",
            self.mode, toggle_hint
        ))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[5]);
    }

    #[instrument(skip(self, key, _ctx))]
    fn handle_key(&mut self, key: KeyEvent, _ctx: &ViewContext<'_>) -> ScreenAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('t') | KeyCode::Char('T') = key.code {
                self.mode = self.mode.toggle();
                self.notice = None;
                debug!(mode = %self.mode, "Form mode toggled");
            }
            return ScreenAction::Stay;
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = self.focus.other();
                ScreenAction::Stay
            }
            KeyCode::Char(c) => {
                self.focused_mut().push(c);
                ScreenAction::Stay
            }
            KeyCode::Backspace => {
                self.focused_mut().pop();
                ScreenAction::Stay
            }
            KeyCode::Enter => {
                info!(mode = %self.mode, username = %self.username, "Submitting credentials");
                self.notice = None;
                ScreenAction::Submit {
                    mode: self.mode,
                    username: self.username.trim().to_string(),
                    password: self.password.clone(),
                }
            }
            KeyCode::Esc => ScreenAction::Quit,
            _ => ScreenAction::Stay,
        }
    }
}

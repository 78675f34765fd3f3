//! App controller: the event loop driving stores, navigation and screens.

use std::future::Future;
use std::sync::Arc;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
};
use tictactoe_api::{GameId, GameService};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{Duration, sleep};
use tracing::{debug, info, instrument, warn};

use crate::commands::Commands;
use crate::config::ClientConfig;
use crate::event::AppEvent;
use crate::navigation::{Navigator, ViewEffect};
use crate::poller::Poller;
use crate::scope::ViewScope;
use crate::screens::{
    BoardScreen, GameListScreen, LoginScreen, RankingsScreen, Screen, ScreenAction, Tab,
    ViewContext, render_header,
};
use crate::storage::CredentialStore;
use crate::store::{GameAction, GameState, SessionAction, SessionStore, reduce_games};

/// Controller that owns both stores and drives the terminal client.
///
/// Call [`AppController::run`] to start the event loop. Background commands
/// report back over a channel that the loop drains between frames, so the
/// stores are only ever touched from here.
#[derive(Debug)]
pub struct AppController {
    config: ClientConfig,
    commands: Commands,
    session: SessionStore,
    games: GameState,
    navigator: Navigator,
    scope: ViewScope,
    poller: Option<Poller>,
    tab: Tab,
    login: LoginScreen,
    list: GameListScreen,
    board: BoardScreen,
    rankings: RankingsScreen,
    sender: UnboundedSender<AppEvent>,
    events: UnboundedReceiver<AppEvent>,
    should_quit: bool,
}

impl AppController {
    /// Creates a controller, restoring the session from `storage`.
    #[instrument(skip(service, storage))]
    pub fn new(
        config: ClientConfig,
        service: Arc<dyn GameService>,
        storage: Box<dyn CredentialStore>,
    ) -> Self {
        info!("Creating AppController");
        let (sender, events) = mpsc::unbounded_channel();
        let commands = Commands::new(service, *config.page_size(), sender.clone());
        let games = GameState::new(*config.page_size());
        Self {
            config,
            commands,
            session: SessionStore::load(storage),
            games,
            navigator: Navigator::new(),
            scope: ViewScope::new(),
            poller: None,
            tab: Tab::Games,
            login: LoginScreen::new(),
            list: GameListScreen::new(),
            board: BoardScreen::new(),
            rankings: RankingsScreen::new(),
            sender,
            events,
            should_quit: false,
        }
    }

    /// Session store.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Game store state.
    pub fn games(&self) -> &GameState {
        &self.games
    }

    /// Listing / viewing state.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Active tab.
    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Game the running poller refreshes, if one is running.
    pub fn polling(&self) -> Option<GameId> {
        self.poller.as_ref().map(Poller::game_id)
    }

    /// True once the user asked to exit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Loads the first page of games when a stored session was restored.
    #[instrument(skip(self))]
    pub fn start(&mut self) {
        if *self.session.state().is_logged_in() {
            self.enter_games();
        }
    }

    /// Runs the event loop until the user quits.
    #[instrument(skip(self, terminal))]
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()>
    where
        <B as Backend>::Error: Send + Sync + 'static,
    {
        info!("Starting client event loop");
        self.start();

        while !self.should_quit {
            terminal.draw(|f| self.render(f))?;

            while let Ok(event) = self.events.try_recv() {
                self.handle_event(event);
            }

            // Poll for input with short timeout to keep the loop responsive.
            if event::poll(Duration::from_millis(100))?
                && let Event::Key(key) = event::read()?
            {
                self.handle_key(key);
            }

            sleep(Duration::from_millis(10)).await;
        }

        self.poller = None;
        info!("Client quitting");
        Ok(())
    }

    /// Waits for one background event and applies it.
    ///
    /// Returns false if the channel closed.
    pub async fn process_next_event(&mut self) -> bool {
        match self.events.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    fn context(&self) -> ViewContext<'_> {
        ViewContext {
            session: self.session.state(),
            games: &self.games,
            viewed: self.navigator.viewed_game(),
        }
    }

    fn render(&self, frame: &mut Frame) {
        let ctx = self.context();
        let area = frame.area();
        if !*ctx.session.is_logged_in() {
            self.login.render(frame, area, &ctx);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(10)])
            .split(area);
        render_header(frame, chunks[0], ctx.session.username(), self.tab);

        match (self.tab, ctx.viewed) {
            (Tab::Rankings, _) => self.rankings.render(frame, chunks[1], &ctx),
            (Tab::Games, None) => self.list.render(frame, chunks[1], &ctx),
            (Tab::Games, Some(_)) => self.board.render(frame, chunks[1], &ctx),
        }
    }

    /// Routes a key press to the global bindings or the active screen.
    #[instrument(skip(self, key), fields(code = ?key.code))]
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Skip key release events (crossterm fires both press and release).
        if key.kind == KeyEventKind::Release {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        let logged_in = *self.session.state().is_logged_in();
        if logged_in {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('L') => {
                    self.logout();
                    return;
                }
                KeyCode::Tab => {
                    self.switch_tab();
                    return;
                }
                _ => {}
            }
        }

        let ctx = ViewContext {
            session: self.session.state(),
            games: &self.games,
            viewed: self.navigator.viewed_game(),
        };
        let action = match (logged_in, self.tab, ctx.viewed) {
            (false, _, _) => self.login.handle_key(key, &ctx),
            (true, Tab::Rankings, _) => self.rankings.handle_key(key, &ctx),
            (true, Tab::Games, None) => self.list.handle_key(key, &ctx),
            (true, Tab::Games, Some(_)) => self.board.handle_key(key, &ctx),
        };
        self.apply_action(action);
    }

    /// Carries out what a screen asked for.
    #[instrument(skip(self, action))]
    pub fn apply_action(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::Stay => {}
            ScreenAction::Submit {
                mode,
                username,
                password,
            } => {
                let commands = self.commands.clone();
                self.spawn(async move {
                    commands.submit_credentials(mode, username, password).await;
                });
            }
            ScreenAction::CreateGame => {
                if let Some(credential) = self.credential() {
                    let commands = self.commands.clone();
                    let token = self.scope.token();
                    self.spawn(async move { commands.create_game(token, credential).await });
                }
            }
            ScreenAction::CycleFilter => {
                let filter = self.games.filter().cycle();
                info!(filter = %filter, "Filter changed");
                self.dispatch(GameAction::SetFilter(filter));
                self.fetch_list();
            }
            ScreenAction::NextPage => {
                self.dispatch(GameAction::NextPage);
                self.fetch_list();
            }
            ScreenAction::PreviousPage => {
                self.dispatch(GameAction::PreviousPage);
                self.fetch_list();
            }
            ScreenAction::SelectGame(game_id) => self.open_game(game_id),
            ScreenAction::BackToList => {
                self.advance_scope();
                let effects = self.navigator.back();
                self.apply_effects(effects);
            }
            ScreenAction::JoinGame => {
                if let Some(credential) = self.credential() {
                    let commands = self.commands.clone();
                    let token = self.scope.token();
                    let game_id = self.target_game();
                    self.spawn(async move { commands.join_game(token, credential, game_id).await });
                }
            }
            ScreenAction::MakeMove { row, col } => {
                if let Some(credential) = self.credential() {
                    let commands = self.commands.clone();
                    let token = self.scope.token();
                    let game_id = self.target_game();
                    self.spawn(async move {
                        commands
                            .make_move(token, credential, game_id, row, col)
                            .await
                    });
                }
            }
            ScreenAction::Refresh => {
                if let Some(game_id) = self.navigator.viewed_game() {
                    self.fetch_detail(game_id);
                }
            }
            ScreenAction::RankingsNext => {
                self.dispatch(GameAction::NextRankingsPage);
                self.fetch_rankings();
            }
            ScreenAction::RankingsPrevious => {
                self.dispatch(GameAction::PreviousRankingsPage);
                self.fetch_rankings();
            }
            ScreenAction::Quit => self.should_quit = true,
        }
    }

    /// Applies one background event to the stores.
    #[instrument(skip(self))]
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Session(action) => {
                let logging_in = matches!(action, SessionAction::Login { .. });
                self.session.dispatch(action);
                if logging_in {
                    self.enter_games();
                }
            }
            AppEvent::Game { token, action } => {
                if !token.is_current() {
                    debug!(issued = token.issued(), "Dropping stale game action");
                    return;
                }
                let effects = match &action {
                    GameAction::SetCurrentGame(Some(detail)) => self.navigator.on_detail(detail),
                    _ => Vec::new(),
                };
                self.dispatch(action);
                self.apply_effects(effects);
            }
            AppEvent::Registered => self.login.registered(),
            AppEvent::GameCreated(game_id) => self.open_game(game_id),
            AppEvent::PollTick(game_id) => {
                if self.navigator.viewed_game() == Some(game_id) {
                    self.fetch_detail(game_id);
                } else {
                    debug!(game_id, "Ignoring tick for a game not on screen");
                }
            }
        }
    }

    fn dispatch(&mut self, action: GameAction) {
        self.games = reduce_games(&self.games, action);
    }

    /// Game that join and move act on: the stored game, but only while it is
    /// the one on screen. Until the viewed game's detail arrives the store
    /// may still hold the previously opened one.
    fn target_game(&self) -> Option<GameId> {
        let target = self
            .games
            .current_game_id()
            .filter(|id| Some(*id) == self.navigator.viewed_game());
        if target.is_none() {
            debug!(
                stored = ?self.games.current_game_id(),
                viewed = ?self.navigator.viewed_game(),
                "No loaded game on screen"
            );
        }
        target
    }

    fn credential(&self) -> Option<String> {
        let credential = self.session.credential().map(str::to_string);
        if credential.is_none() {
            warn!("Game command issued without a credential");
        }
        credential
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(task);
    }

    /// Invalidates in-flight results and clears the loading flag they would
    /// otherwise have cleared.
    fn advance_scope(&mut self) {
        self.scope.advance();
        self.dispatch(GameAction::SetLoading(false));
    }

    #[instrument(skip(self))]
    fn enter_games(&mut self) {
        self.tab = Tab::Games;
        self.advance_scope();
        let effects = self.navigator.reset();
        self.apply_effects(effects);
        self.dispatch(GameAction::ResetListOffset);
        self.fetch_list();
    }

    #[instrument(skip(self))]
    fn open_game(&mut self, game_id: GameId) {
        self.advance_scope();
        self.board = BoardScreen::new();
        let effects = self.navigator.select(game_id);
        self.apply_effects(effects);
    }

    #[instrument(skip(self))]
    fn switch_tab(&mut self) {
        let next = self.tab.toggle();
        info!(tab = %next, "Switching tab");
        match next {
            Tab::Games => self.enter_games(),
            Tab::Rankings => {
                self.tab = Tab::Rankings;
                self.advance_scope();
                let effects = self.navigator.reset();
                self.apply_effects(effects);
                self.dispatch(GameAction::ResetRankingsOffset);
                self.fetch_rankings();
            }
        }
    }

    #[instrument(skip(self))]
    fn logout(&mut self) {
        self.advance_scope();
        let effects = self.navigator.reset();
        self.apply_effects(effects);
        self.poller = None;
        self.session.dispatch(SessionAction::Logout);
        self.dispatch(GameAction::Reset);
        self.tab = Tab::Games;
        self.login = LoginScreen::new();
        self.list = GameListScreen::new();
    }

    fn apply_effects(&mut self, effects: Vec<ViewEffect>) {
        for effect in effects {
            debug!(?effect, "Applying view effect");
            match effect {
                ViewEffect::FetchDetail(game_id) => self.fetch_detail(game_id),
                ViewEffect::FetchList => self.fetch_list(),
                ViewEffect::StartPolling(game_id) => {
                    self.poller = Some(Poller::start(
                        game_id,
                        self.config.poll_interval(),
                        self.sender.clone(),
                    ));
                }
                ViewEffect::StopPolling => self.poller = None,
            }
        }
    }

    fn fetch_list(&self) {
        if let Some(credential) = self.credential() {
            let commands = self.commands.clone();
            let token = self.scope.token();
            let offset = *self.games.list_offset();
            let status = self.games.filter().status();
            self.spawn(async move {
                commands
                    .fetch_games(token, credential, offset, status)
                    .await
            });
        }
    }

    fn fetch_detail(&self, game_id: GameId) {
        if let Some(credential) = self.credential() {
            let commands = self.commands.clone();
            let token = self.scope.token();
            self.spawn(async move { commands.fetch_game(token, credential, game_id).await });
        }
    }

    fn fetch_rankings(&self) {
        if let Some(credential) = self.credential() {
            let commands = self.commands.clone();
            let token = self.scope.token();
            let offset = *self.games.rankings_offset();
            self.spawn(async move { commands.fetch_rankings(token, credential, offset).await });
        }
    }
}

use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::guard::{self, Decision, Route};
use crate::session::{SessionStorage, SessionStore};
use crate::store::Stores;
use crate::ui;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::renderfns::header_title;
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::{
  DashboardView, LoginView, ProductDetailView, ProductListView, UserDetailView, UserListView,
};

/// Everything a view may read or drive: the API, the session and the list
/// stores of the current session.
pub struct Context {
  pub api: ApiClient,
  pub config: Config,
  pub session: SessionStore,
  pub stores: Stores,
}

/// Main application state
pub struct App {
  ctx: Context,
  /// Navigation stack, root at index 0
  views: Vec<Box<dyn View>>,
  command: CommandInput,
  should_quit: bool,
}

impl App {
  pub fn new(config: Config) -> Result<Self> {
    let api = ApiClient::new(&config.api)?;
    let storage = SessionStorage::open()?;

    let mut session = SessionStore::new(
      Arc::new(api.clone()),
      storage,
      config.session.ttl_minutes,
    );
    session.restore();

    let stores = Stores::remote(&api, &config);

    Ok(Self::with_context(Context {
      api,
      config,
      session,
      stores,
    }))
  }

  /// Start at the dashboard; the guard sends a signed-out session to login.
  pub fn with_context(ctx: Context) -> Self {
    let mut app = Self {
      ctx,
      views: Vec::new(),
      command: CommandInput::new(),
      should_quit: false,
    };
    app.navigate(Route::Dashboard);
    app
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.event_loop(&mut terminal).await;

    // Restore the terminal even if the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(100));

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Tick) => self.tick(),
        Some(Event::Resize) => {}
        None => break,
      }
    }

    Ok(())
  }

  pub fn current_route(&self) -> Option<Route> {
    self.views.last().map(|v| v.route())
  }

  pub fn should_quit(&self) -> bool {
    self.should_quit
  }

  pub fn context(&self) -> &Context {
    &self.ctx
  }

  pub fn handle_key(&mut self, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      self.should_quit = true;
      return;
    }

    let typing = self.views.last().is_some_and(|v| v.captures_input());
    if !typing {
      match self.command.handle_key(key) {
        KeyResult::Event(CommandEvent::Submitted(command)) => {
          self.execute_command(&command);
          return;
        }
        KeyResult::Event(CommandEvent::Cancelled) | KeyResult::Handled => return,
        KeyResult::NotHandled => {}
      }
    }

    let Some(view) = self.views.last_mut() else {
      return;
    };
    let action = view.handle_key(key, &mut self.ctx);
    self.apply(action);
  }

  /// Apply finished requests, then re-check the current route: the session
  /// may have just logged in or expired.
  pub fn tick(&mut self) {
    self.ctx.session.poll();
    self.ctx.stores.poll();
    if let Some(view) = self.views.last_mut() {
      view.tick(&mut self.ctx);
    }

    let Some(route) = self.current_route() else {
      return;
    };
    if let Decision::Redirect(target) = guard::check(&route, &self.ctx.session) {
      if target == Route::Login && self.ctx.session.token().is_some() {
        info!("session expired");
        self.logout();
      } else {
        self.navigate(target);
      }
    }
  }

  fn apply(&mut self, action: ViewAction) {
    match action {
      ViewAction::None => {}
      ViewAction::Navigate(route) => self.navigate(route),
      ViewAction::Pop => {
        if self.views.len() > 1 {
          self.views.pop();
        } else {
          self.should_quit = true;
        }
      }
      ViewAction::Logout => self.logout(),
      ViewAction::Quit => self.should_quit = true,
    }
  }

  fn execute_command(&mut self, command: &str) {
    match command {
      "dashboard" => self.navigate(Route::Dashboard),
      "users" => self.navigate(Route::Users),
      "products" => self.navigate(Route::Products),
      "logout" => self.apply(ViewAction::Logout),
      "quit" => self.should_quit = true,
      other => warn!(command = other, "unknown command"),
    }
  }

  fn logout(&mut self) {
    self.ctx.session.logout();
    self.ctx.stores.reset();
    self.navigate(Route::Login);
  }

  /// Follow guard redirects until a route is allowed.
  fn resolve(&self, mut route: Route) -> Route {
    // Login and Dashboard redirect to each other, so two hops always settle
    for _ in 0..2 {
      match guard::check(&route, &self.ctx.session) {
        Decision::Allow => break,
        Decision::Redirect(target) => {
          debug!(from = %route, to = %target, "guard redirect");
          route = target;
        }
      }
    }
    route
  }

  /// Mount the view for `route`. Sections sit on top of the dashboard and
  /// detail views on top of whatever is showing.
  fn navigate(&mut self, route: Route) {
    let route = self.resolve(route);
    if self.current_route().as_ref() == Some(&route) {
      return;
    }
    info!(%route, "navigate");

    match route {
      Route::Login => {
        self.views.clear();
        self.views.push(Box::new(LoginView::new()));
      }
      Route::Dashboard => {
        self.views.clear();
        self.views.push(Box::new(DashboardView::new(&mut self.ctx)));
      }
      Route::Users | Route::Products => {
        self.views.truncate(1);
        if self.current_route() != Some(Route::Dashboard) {
          self.views.clear();
          self.views.push(Box::new(DashboardView::new(&mut self.ctx)));
        }
        let view: Box<dyn View> = if route == Route::Users {
          Box::new(UserListView::new(&mut self.ctx))
        } else {
          Box::new(ProductListView::new(&mut self.ctx))
        };
        self.views.push(view);
      }
      Route::UserDetail(id) => {
        let view = UserDetailView::new(id, self.ctx.api.clone());
        self.views.push(Box::new(view));
      }
      Route::ProductDetail(id) => {
        let view = ProductDetailView::new(id, self.ctx.api.clone());
        self.views.push(Box::new(view));
      }
    }
  }

  // Rendering accessors

  pub fn title(&self) -> String {
    header_title(self.ctx.config.title.as_deref(), self.ctx.api.base_url())
  }

  pub fn account_label(&self) -> Option<String> {
    self
      .ctx
      .session
      .account()
      .map(|a| match (a.first_name.is_empty(), a.last_name.is_empty()) {
        (true, true) => a.username.clone(),
        _ => format!("{} {}", a.first_name, a.last_name).trim().to_string(),
      })
  }

  pub fn breadcrumb(&self) -> Vec<String> {
    self.views.iter().map(|v| v.breadcrumb_label()).collect()
  }

  pub fn session_expiry(&self) -> Option<DateTime<Utc>> {
    self.ctx.session.expires_at()
  }

  pub fn shortcuts(&self) -> Vec<ShortcutInfo> {
    self.views.last().map(|v| v.shortcuts()).unwrap_or_default()
  }

  pub fn command_input(&self) -> &CommandInput {
    &self.command
  }

  pub fn render_view(&mut self, frame: &mut Frame, area: Rect) {
    if let Some(view) = self.views.last_mut() {
      view.render(frame, area, &self.ctx);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::{
    Account, ApiError, AuthSession, Authenticator, CategorySource, Collection, ListRequest,
    ListSource, Page,
  };
  use crate::cache::PageCache;
  use crate::store::{CategoryList, FetchStore};
  use futures::future::{BoxFuture, FutureExt};

  /// One page with a single default row
  struct OneRow;

  impl<T: Default + Send + 'static> ListSource<T> for OneRow {
    fn fetch_page(&self, _: ListRequest) -> BoxFuture<'static, Result<Page<T>, ApiError>> {
      async {
        Ok(Page {
          items: vec![T::default()],
          total: 1,
          skip: 0,
          limit: 10,
        })
      }
      .boxed()
    }
  }

  impl CategorySource for OneRow {
    fn fetch_categories(&self) -> BoxFuture<'static, Result<Vec<String>, ApiError>> {
      async { Ok(vec!["beauty".to_string()]) }.boxed()
    }
  }

  struct AcceptAll;

  impl Authenticator for AcceptAll {
    fn login(
      &self,
      username: String,
      _: String,
      _: u32,
    ) -> BoxFuture<'static, Result<AuthSession, ApiError>> {
      async move {
        Ok(AuthSession {
          token: "t".to_string(),
          account: Account {
            username,
            first_name: "Emily".to_string(),
            last_name: "Johnson".to_string(),
            ..Account::default()
          },
        })
      }
      .boxed()
    }
  }

  fn app() -> App {
    let config = Config::default();
    let api = ApiClient::new(&config.api).unwrap();
    let session = SessionStore::new(
      Arc::new(AcceptAll),
      SessionStorage::in_memory().unwrap(),
      60,
    );
    let stores = Stores {
      users: FetchStore::new(Collection::Users, Arc::new(OneRow), 10, PageCache::new(8, None)),
      products: FetchStore::new(
        Collection::Products,
        Arc::new(OneRow),
        10,
        PageCache::new(8, None),
      ),
      categories: CategoryList::new(Arc::new(OneRow)),
    };
    App::with_context(Context {
      api,
      config,
      session,
      stores,
    })
  }

  async fn signed_in() -> App {
    let mut app = app();
    app.ctx.session.login("emilys", "emilyspass");
    app.ctx.session.settle().await;
    app.tick();
    app
  }

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn command(app: &mut App, name: &str) {
    app.handle_key(key(KeyCode::Char(':')));
    for c in name.chars() {
      app.handle_key(key(KeyCode::Char(c)));
    }
    app.handle_key(key(KeyCode::Enter));
  }

  #[tokio::test]
  async fn test_starts_at_login_when_signed_out() {
    let app = app();
    assert_eq!(app.current_route(), Some(Route::Login));
    assert_eq!(app.account_label(), None);
  }

  #[tokio::test]
  async fn test_login_redirects_to_dashboard() {
    let app = signed_in().await;
    assert_eq!(app.current_route(), Some(Route::Dashboard));
    assert_eq!(app.account_label().as_deref(), Some("Emily Johnson"));
    // The dashboard asked for both totals
    assert!(app.context().stores.users.is_loading());
    assert!(app.context().stores.products.is_loading());
  }

  #[tokio::test]
  async fn test_commands_navigate() {
    let mut app = signed_in().await;

    command(&mut app, "users");
    assert_eq!(app.current_route(), Some(Route::Users));
    assert_eq!(app.breadcrumb(), vec!["Dashboard", "Users"]);

    command(&mut app, "prod");
    assert_eq!(app.current_route(), Some(Route::Products));
    assert_eq!(app.breadcrumb(), vec!["Dashboard", "Products"]);

    app.handle_key(key(KeyCode::Char('q')));
    assert_eq!(app.current_route(), Some(Route::Dashboard));

    app.handle_key(key(KeyCode::Char('q')));
    assert!(app.should_quit());
  }

  #[tokio::test]
  async fn test_logout_resets_stores() {
    let mut app = signed_in().await;
    command(&mut app, "users");
    app.ctx.stores.users.settle().await;
    assert_eq!(app.context().stores.users.total(), 1);

    command(&mut app, "logout");
    assert_eq!(app.current_route(), Some(Route::Login));
    assert!(!app.context().session.is_authenticated());
    assert_eq!(app.context().stores.users.total(), 0);
    assert_eq!(app.context().stores.users.cached_pages(), 0);
  }

  #[tokio::test]
  async fn test_signed_out_cannot_reach_sections() {
    let mut app = app();
    app.apply(ViewAction::Navigate(Route::ProductDetail(3)));
    assert_eq!(app.current_route(), Some(Route::Login));
  }

  #[tokio::test]
  async fn test_login_form_swallows_colon() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char(':')));
    assert!(!app.command_input().is_active());
  }

  #[tokio::test]
  async fn test_enter_opens_user_detail() {
    let mut app = signed_in().await;
    command(&mut app, "users");
    app.ctx.stores.users.settle().await;

    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.current_route(), Some(Route::UserDetail(0)));
    assert_eq!(app.breadcrumb().len(), 3);
  }
}

// TUI application state and event handling
//
// Everything the screens show lives in `App`. Keys and finished requests go
// through `handle_key` / `handle_event`, which only touch state and hand back
// the network work for the runner to spawn.
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use issuescout_core::{
    detail::{DetailTicket, IssueDetail, IssueDetailState},
    directory::{self, FeaturedRepo},
    models::{Issue, Repository},
    pipeline::{Completion, IssueQuery, PageResult, Ticket},
    repo_ref::{RepoRef, Route},
    view::{derive_view, search_labels, FilterState, SortField, SortState},
    Config, Result,
};
use ratatui::widgets::ListState;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Directory, // Featured repositories
    Issues,    // Issue list of one repository
    Detail,    // One issue and its comments
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,          // Navigating lists
    RepoInput,       // Typing owner/repo
    DirectorySearch, // Typing in the directory search box
    KeywordFilter,   // Typing the keyword filter
    AssigneeFilter,  // Typing the assignee filter
    PerPageInput,    // Typing a page size
    PageInput,       // Typing a page number to jump to
    LabelPicker,     // Choosing labels to filter by
    AssigneePicker,  // Choosing one of the loaded assignees
}

/// Network work the reducer wants done
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchPage(Ticket),
    FetchRepository(RepoRef),
    FetchDetail(DetailTicket),
}

/// Finished background work on its way back into the loop
#[derive(Debug)]
pub enum AppEvent {
    PageLoaded(Ticket, Result<PageResult>),
    RepositoryLoaded(RepoRef, Result<Repository>),
    DetailLoaded(DetailTicket, Result<IssueDetail>),
}

pub struct App {
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,
    // Edit buffer shared by every text input mode
    pub input: String,
    // What a live filter held before editing, restored on ESC
    input_before: String,
    pub mouse_enabled: bool,
    pub status_message: Option<String>,

    pub directory_query: String,
    pub directory_language: Option<&'static str>,
    pub directory_state: ListState,

    pub query: IssueQuery,
    pub filters: FilterState,
    pub sort: SortState,
    pub issue_state: ListState,
    pub repository: Option<Repository>,
    pub repository_error: Option<String>,
    pub repository_loading: bool,
    pub label_search: String,
    pub label_cursor: usize,
    pub assignee_cursor: usize,

    pub detail: IssueDetailState,
    pub detail_target: Option<(RepoRef, u64)>,
    pub detail_scroll: u16,
}

impl App {
    pub fn new(per_page: u32, mouse_enabled: bool) -> Self {
        let mut directory_state = ListState::default();
        directory_state.select(Some(0));
        let mut issue_state = ListState::default();
        issue_state.select(Some(0));

        Self {
            should_quit: false,
            screen: Screen::Directory,
            input_mode: InputMode::Normal,
            input: String::new(),
            input_before: String::new(),
            mouse_enabled,
            status_message: None,
            directory_query: String::new(),
            directory_language: None,
            directory_state,
            query: IssueQuery::new(per_page),
            filters: FilterState::default(),
            sort: SortState::default(),
            issue_state,
            repository: None,
            repository_error: None,
            repository_loading: false,
            label_search: String::new(),
            label_cursor: 0,
            assignee_cursor: 0,
            detail: IssueDetailState::new(),
            detail_target: None,
            detail_scroll: 0,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.per_page(), config.ui.mouse_enabled)
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Featured repositories matching the directory search
    pub fn visible_featured(&self) -> Vec<&'static FeaturedRepo> {
        directory::search(
            directory::featured(),
            &self.directory_query,
            self.directory_language,
        )
    }

    pub fn selected_featured(&self) -> Option<&'static FeaturedRepo> {
        let index = self.directory_state.selected().unwrap_or(0);
        self.visible_featured().get(index).copied()
    }

    /// The loaded page after filters and sort
    pub fn visible_issues(&self) -> Vec<&Issue> {
        derive_view(self.query.issues(), &self.filters, &self.sort)
    }

    pub fn selected_issue(&self) -> Option<&Issue> {
        let index = self.issue_state.selected().unwrap_or(0);
        self.visible_issues().get(index).copied()
    }

    /// Labels offered by the label picker for what has been typed so far
    pub fn matching_labels(&self) -> Vec<&str> {
        search_labels(self.query.available_labels(), &self.label_search)
    }

    /// Rows of the assignee picker: `None` clears the filter
    pub fn assignee_choices(&self) -> Vec<Option<&str>> {
        std::iter::once(None)
            .chain(self.query.available_assignees().iter().map(|a| Some(a.as_str())))
            .collect()
    }

    /// Jump to a route, issuing whatever fetches it needs
    pub fn open_route(&mut self, route: Route) -> Vec<Command> {
        match route {
            Route::Directory => {
                self.screen = Screen::Directory;
                Vec::new()
            }
            Route::Repository(repo) => self.open_repo(&repo.full_name()),
            Route::Issue(repo, number) => {
                let mut commands = self.open_repo(&repo.full_name());
                commands.extend(self.open_detail(repo, number));
                commands
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return Vec::new();
        }

        match self.input_mode {
            InputMode::Normal => match self.screen {
                Screen::Directory => self.directory_key(key),
                Screen::Issues => self.issues_key(key),
                Screen::Detail => self.detail_key(key),
            },
            InputMode::LabelPicker => {
                self.label_picker_key(key);
                Vec::new()
            }
            InputMode::AssigneePicker => {
                self.assignee_picker_key(key);
                Vec::new()
            }
            _ => self.text_input_key(key),
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::PageLoaded(ticket, result) => {
                if self.query.complete(&ticket, result) == Completion::Stale {
                    return;
                }
                if !ticket.request().append {
                    self.reset_issue_selection();
                }
                // Errors that emptied the list are shown in its place, the rest down here
                self.status_message = match (self.query.last_error(), self.query.blocking_error()) {
                    (Some(err), None) => Some(err.to_string()),
                    _ => None,
                };
            }
            AppEvent::RepositoryLoaded(repo, result) => {
                if self.query.repo() != Some(&repo) {
                    debug!("Dropping repository details for {}, no longer open", repo);
                    return;
                }
                self.repository_loading = false;
                match result {
                    Ok(repository) => {
                        self.repository = Some(repository);
                        self.repository_error = None;
                    }
                    Err(err) => {
                        self.repository = None;
                        self.repository_error = Some(err.to_string());
                    }
                }
            }
            AppEvent::DetailLoaded(ticket, result) => {
                self.detail.complete(&ticket, result);
            }
        }
    }

    fn directory_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.visible_featured().len();
                select_next(&mut self.directory_state, len);
            }
            KeyCode::Char('k') | KeyCode::Up => select_previous(&mut self.directory_state),
            KeyCode::Char('/') => {
                let current = self.directory_query.clone();
                self.begin_input(InputMode::DirectorySearch, current);
            }
            KeyCode::Char('l') => self.cycle_language(),
            KeyCode::Char('o') => self.begin_input(InputMode::RepoInput, String::new()),
            KeyCode::Enter => {
                if let Some(repo) = self.selected_featured() {
                    return self.open_repo(&repo.full_name());
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn issues_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Esc | KeyCode::Backspace => self.screen = Screen::Directory,
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.visible_issues().len();
                select_next(&mut self.issue_state, len);
            }
            KeyCode::Char('k') | KeyCode::Up => select_previous(&mut self.issue_state),
            KeyCode::Enter => {
                let number = self.selected_issue().map(|issue| issue.number);
                if let (Some(repo), Some(number)) = (self.query.repo().cloned(), number) {
                    return self.open_detail(repo, number);
                }
            }
            KeyCode::Char('n') | KeyCode::Right => {
                let result = self.query.next_page();
                return self.page_command(result);
            }
            KeyCode::Char('p') | KeyCode::Left => {
                let result = self.query.prev_page();
                return self.page_command(result);
            }
            KeyCode::Char('N') => {
                let result = self.query.load_more();
                return self.page_command(result);
            }
            KeyCode::Char('r') => {
                let result = self.query.refresh();
                let mut commands = self.page_command(result);
                // Repository details only get another try when they failed
                if self.repository.is_none() && !self.repository_loading && !commands.is_empty() {
                    if let Some(repo) = self.query.repo().cloned() {
                        self.repository_loading = true;
                        commands.push(Command::FetchRepository(repo));
                    }
                }
                return commands;
            }
            KeyCode::Char('s') => {
                self.filters.state = self.filters.state.cycle();
                self.reset_issue_selection();
            }
            KeyCode::Char('c') => {
                self.sort.select(SortField::Created);
                self.reset_issue_selection();
            }
            KeyCode::Char('m') => {
                self.sort.select(SortField::Comments);
                self.reset_issue_selection();
            }
            KeyCode::Char('x') => {
                self.filters.clear();
                self.reset_issue_selection();
            }
            KeyCode::Char('l') => {
                self.input_mode = InputMode::LabelPicker;
                self.label_search.clear();
                self.label_cursor = 0;
            }
            KeyCode::Char('/') => {
                let current = self.filters.keyword.clone();
                self.begin_input(InputMode::KeywordFilter, current);
            }
            KeyCode::Char('a') => {
                let current = self.filters.assignee.clone();
                self.begin_input(InputMode::AssigneeFilter, current);
            }
            KeyCode::Char('A') => {
                self.input_mode = InputMode::AssigneePicker;
                // Start on the current choice
                self.assignee_cursor = self
                    .assignee_choices()
                    .iter()
                    .position(|choice| choice.unwrap_or("") == self.filters.assignee)
                    .unwrap_or(0);
            }
            KeyCode::Char('P') => {
                let current = self.query.per_page().to_string();
                self.begin_input(InputMode::PerPageInput, current);
            }
            KeyCode::Char('g') => self.begin_input(InputMode::PageInput, String::new()),
            KeyCode::Char('o') => self.begin_input(InputMode::RepoInput, String::new()),
            _ => {}
        }
        Vec::new()
    }

    fn detail_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Esc | KeyCode::Backspace => self.screen = Screen::Issues,
            KeyCode::Char('j') | KeyCode::Down => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1);
            }
            KeyCode::Char('r') => {
                if let Some((repo, number)) = self.detail_target.clone() {
                    return self.open_detail(repo, number);
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn label_picker_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.label_search.clear();
            }
            KeyCode::Down => {
                let len = self.matching_labels().len();
                if len > 0 {
                    self.label_cursor = (self.label_cursor + 1).min(len - 1);
                }
            }
            KeyCode::Up => self.label_cursor = self.label_cursor.saturating_sub(1),
            KeyCode::Enter => {
                let label = self
                    .matching_labels()
                    .get(self.label_cursor)
                    .map(|label| label.to_string());
                if let Some(label) = label {
                    self.filters.toggle_label(&label);
                    self.reset_issue_selection();
                }
            }
            KeyCode::Backspace => {
                self.label_search.pop();
                self.label_cursor = 0;
            }
            KeyCode::Char(c) => {
                self.label_search.push(c);
                self.label_cursor = 0;
            }
            _ => {}
        }
    }

    fn assignee_picker_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.assignee_choices().len();
                self.assignee_cursor = (self.assignee_cursor + 1).min(len - 1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.assignee_cursor = self.assignee_cursor.saturating_sub(1);
            }
            KeyCode::Enter => {
                let choice = self
                    .assignee_choices()
                    .get(self.assignee_cursor)
                    .map(|choice| choice.unwrap_or("").to_string());
                if let Some(assignee) = choice {
                    self.filters.assignee = assignee;
                    self.reset_issue_selection();
                }
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
    }

    fn text_input_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Char(c) => {
                self.input.push(c);
                self.sync_live_input();
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.sync_live_input();
            }
            KeyCode::Esc => {
                // Live filters go back to what they held before editing
                self.input = std::mem::take(&mut self.input_before);
                self.sync_live_input();
                self.input.clear();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => return self.submit_input(),
            _ => {}
        }
        Vec::new()
    }

    fn begin_input(&mut self, mode: InputMode, initial: String) {
        self.input_mode = mode;
        self.input_before = initial.clone();
        self.input = initial;
        self.status_message = None;
    }

    /// Filters and the directory search follow every keystroke
    fn sync_live_input(&mut self) {
        match self.input_mode {
            InputMode::DirectorySearch => {
                self.directory_query = self.input.clone();
                self.directory_state.select(Some(0));
            }
            InputMode::KeywordFilter => {
                self.filters.keyword = self.input.clone();
                self.reset_issue_selection();
            }
            InputMode::AssigneeFilter => {
                self.filters.assignee = self.input.clone();
                self.reset_issue_selection();
            }
            _ => {}
        }
    }

    fn submit_input(&mut self) -> Vec<Command> {
        let mode = self.input_mode;
        let input = std::mem::take(&mut self.input);
        self.input_mode = InputMode::Normal;

        match mode {
            InputMode::RepoInput => self.open_repo(&input),
            InputMode::PerPageInput => match input.trim().parse::<u32>() {
                Ok(per_page) => {
                    let result = self.query.set_per_page(per_page);
                    self.page_command(result)
                }
                Err(_) => {
                    self.status_message =
                        Some(format!("Page size must be a number, got {:?}", input));
                    Vec::new()
                }
            },
            InputMode::PageInput => match input.trim().parse::<u32>() {
                Ok(page) => {
                    let result = self.query.goto_page(page);
                    self.page_command(result)
                }
                Err(_) => {
                    self.status_message =
                        Some(format!("Page must be a number, got {:?}", input));
                    Vec::new()
                }
            },
            _ => Vec::new(),
        }
    }

    fn open_repo(&mut self, input: &str) -> Vec<Command> {
        if self.is_opening(input) {
            debug!("{} is already loading", input.trim());
            self.screen = Screen::Issues;
            return Vec::new();
        }

        match self.query.set_repo(input) {
            Ok(ticket) => {
                let repo = ticket.request().repo.clone();
                self.screen = Screen::Issues;
                self.repository = None;
                self.repository_error = None;
                self.repository_loading = true;
                self.status_message = None;
                self.reset_issue_selection();
                vec![Command::FetchPage(ticket), Command::FetchRepository(repo)]
            }
            Err(err) => {
                self.status_message = Some(err.to_string());
                Vec::new()
            }
        }
    }

    /// The first page of this repository is already on its way
    fn is_opening(&self, input: &str) -> bool {
        let Ok(repo) = RepoRef::parse(input) else {
            return false;
        };
        self.query.in_flight().is_some_and(|ticket| {
            let request = ticket.request();
            request.repo == repo && request.page == 1 && !request.append
        })
    }

    fn open_detail(&mut self, repo: RepoRef, number: u64) -> Vec<Command> {
        if self.detail.is_loading_issue(&repo, number) {
            self.screen = Screen::Detail;
            return Vec::new();
        }

        let ticket = self.detail.open(repo.clone(), number);
        self.detail_target = Some((repo, number));
        self.screen = Screen::Detail;
        self.detail_scroll = 0;
        vec![Command::FetchDetail(ticket)]
    }

    fn page_command(&mut self, result: Result<Option<Ticket>>) -> Vec<Command> {
        match result {
            Ok(Some(ticket)) => vec![Command::FetchPage(ticket)],
            Ok(None) => Vec::new(),
            Err(err) => {
                self.status_message = Some(err.to_string());
                Vec::new()
            }
        }
    }

    fn cycle_language(&mut self) {
        let languages = directory::languages(directory::featured());
        self.directory_language = match self.directory_language {
            None => languages.first().copied(),
            Some(current) => languages
                .iter()
                .position(|language| *language == current)
                .and_then(|index| languages.get(index + 1))
                .copied(),
        };
        self.directory_state.select(Some(0));
    }

    fn reset_issue_selection(&mut self) {
        self.issue_state.select(Some(0));
    }
}

impl Default for App {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

fn select_next(state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }
    let next = state.selected().map(|i| (i + 1).min(len - 1)).unwrap_or(0);
    state.select(Some(next));
}

fn select_previous(state: &mut ListState) {
    let previous = state.selected().map(|i| i.saturating_sub(1)).unwrap_or(0);
    state.select(Some(previous));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use issuescout_core::models::{IssueState, Label, User};
    use issuescout_core::pipeline::Pagination;
    use issuescout_core::Error;
    use issuescout_core::PageLinks;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) -> Vec<Command> {
        let mut commands = Vec::new();
        for c in text.chars() {
            commands.extend(app.handle_key(key(KeyCode::Char(c))));
        }
        commands
    }

    fn user(login: &str) -> User {
        User {
            login: login.to_string(),
            avatar_url: String::new(),
        }
    }

    fn issue(number: u64, state: IssueState, labels: &[&str]) -> Issue {
        let created = Utc
            .with_ymd_and_hms(2024, 1, number as u32, 0, 0, 0)
            .unwrap();
        Issue {
            id: number,
            number,
            title: format!("Issue {}", number),
            body: None,
            state,
            labels: labels
                .iter()
                .map(|name| Label {
                    id: 1,
                    name: name.to_string(),
                    color: "d73a4a".to_string(),
                })
                .collect(),
            assignee: None,
            assignees: Vec::new(),
            author: user("octocat"),
            created_at: created,
            updated_at: created,
            closed_at: None,
            comments: number as u32,
            html_url: format!("https://github.com/o/r/issues/{}", number),
        }
    }

    fn page(number: u32, issues: Vec<Issue>, next: Option<u32>, last: Option<u32>) -> PageResult {
        PageResult {
            issues,
            pagination: Pagination::from_links(
                number,
                30,
                &PageLinks {
                    next,
                    last,
                    ..Default::default()
                },
            ),
        }
    }

    fn page_ticket(commands: &[Command]) -> Ticket {
        commands
            .iter()
            .find_map(|command| match command {
                Command::FetchPage(ticket) => Some(ticket.clone()),
                _ => None,
            })
            .expect("no page fetch issued")
    }

    /// An app showing page 1 of o/r with three issues
    fn loaded_app() -> App {
        let mut app = App::default();
        let commands = app.open_route(Route::parse("o/r").unwrap());
        let ticket = page_ticket(&commands);
        app.handle_event(AppEvent::PageLoaded(
            ticket,
            Ok(page(
                1,
                vec![
                    issue(1, IssueState::Open, &["bug"]),
                    issue(2, IssueState::Closed, &["good first issue"]),
                    issue(3, IssueState::Open, &["docs", "bug"]),
                ],
                Some(2),
                Some(3),
            )),
        ));
        app
    }

    #[test]
    fn test_opening_a_repository_fetches_issues_and_details() {
        let mut app = App::default();
        let commands = app.open_route(Route::parse("rust-lang/rust").unwrap());

        assert_eq!(app.screen, Screen::Issues);
        assert_eq!(commands.len(), 2);
        assert_eq!(page_ticket(&commands).request().page, 1);
        assert!(matches!(&commands[1], Command::FetchRepository(repo) if repo.full_name() == "rust-lang/rust"));
    }

    #[test]
    fn test_issue_route_also_opens_detail() {
        let mut app = App::default();
        let commands = app.open_route(Route::parse("o/r#7").unwrap());

        assert_eq!(app.screen, Screen::Detail);
        assert!(commands
            .iter()
            .any(|command| matches!(command, Command::FetchDetail(ticket) if ticket.number == 7)));
    }

    #[test]
    fn test_paging_keys_are_ignored_while_loading() {
        let mut app = App::default();
        app.open_route(Route::parse("o/r").unwrap());

        assert!(app.handle_key(key(KeyCode::Char('n'))).is_empty());
        assert!(app.handle_key(key(KeyCode::Char('r'))).is_empty());
    }

    #[test]
    fn test_next_page_after_load() {
        let mut app = loaded_app();
        let commands = app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(page_ticket(&commands).request().page, 2);
    }

    #[test]
    fn test_stale_page_is_not_applied() {
        let mut app = App::default();
        let old = page_ticket(&app.open_route(Route::parse("o/old").unwrap()));
        app.open_route(Route::parse("o/new").unwrap());

        app.handle_event(AppEvent::PageLoaded(
            old,
            Ok(page(1, vec![issue(1, IssueState::Open, &[])], None, None)),
        ));
        assert!(app.query.issues().is_empty());
        assert!(app.query.is_loading());
    }

    #[test]
    fn test_changing_page_size_restarts_at_page_one() {
        let mut app = loaded_app();
        let ticket = page_ticket(&app.handle_key(key(KeyCode::Char('n'))));
        app.handle_event(AppEvent::PageLoaded(
            ticket,
            Ok(page(2, vec![issue(4, IssueState::Open, &[])], Some(3), Some(3))),
        ));
        assert_eq!(app.query.page(), 2);

        app.handle_key(key(KeyCode::Char('P')));
        assert_eq!(app.input_mode, InputMode::PerPageInput);
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Backspace));
        type_text(&mut app, "50");
        let commands = app.handle_key(key(KeyCode::Enter));

        let ticket = page_ticket(&commands);
        assert_eq!(ticket.request().page, 1);
        assert_eq!(ticket.request().per_page, 50);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_bad_page_size_is_reported_without_fetching() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('P')));
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Backspace));
        let commands = type_text(&mut app, "500");
        assert!(commands.is_empty());
        assert!(app.handle_key(key(KeyCode::Enter)).is_empty());
        assert!(app.status_message.is_some());
        assert_eq!(app.query.issues().len(), 3);
    }

    #[test]
    fn test_out_of_bounds_keeps_the_list() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('g')));
        type_text(&mut app, "9");
        let ticket = page_ticket(&app.handle_key(key(KeyCode::Enter)));

        app.handle_event(AppEvent::PageLoaded(
            ticket,
            Err(Error::OutOfBounds { page: 9, per_page: 30 }),
        ));
        assert_eq!(app.query.issues().len(), 3);
        assert_eq!(app.query.page(), 1);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_filters_narrow_the_visible_list() {
        let mut app = loaded_app();

        app.handle_key(key(KeyCode::Char('s')));
        assert_eq!(app.visible_issues().len(), 2);

        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(key(KeyCode::Char('/')));
        type_text(&mut app, "ISSUE 2");
        assert_eq!(app.input_mode, InputMode::KeywordFilter);
        assert_eq!(app.visible_issues().len(), 1);

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.filters.keyword, "ISSUE 2");
        // The loaded page itself is untouched
        assert_eq!(app.query.issues().len(), 3);
    }

    #[test]
    fn test_label_picker_toggles_labels() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('l')));
        assert_eq!(app.input_mode, InputMode::LabelPicker);

        type_text(&mut app, "do");
        assert_eq!(app.matching_labels(), vec!["docs"]);
        app.handle_key(key(KeyCode::Enter));
        assert!(app.filters.labels.contains("docs"));
        assert_eq!(app.visible_issues().len(), 1);

        app.handle_key(key(KeyCode::Enter));
        assert!(app.filters.labels.is_empty());
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_sort_keys() {
        let mut app = loaded_app();
        let numbers = |app: &App| app.visible_issues().iter().map(|i| i.number).collect::<Vec<_>>();

        assert_eq!(numbers(&app), vec![3, 2, 1]);
        app.handle_key(key(KeyCode::Char('c')));
        assert_eq!(numbers(&app), vec![1, 2, 3]);
        app.handle_key(key(KeyCode::Char('m')));
        assert_eq!(numbers(&app), vec![3, 2, 1]);
    }

    #[test]
    fn test_enter_opens_selected_issue() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('j')));
        let commands = app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.screen, Screen::Detail);
        assert!(matches!(&commands[..], [Command::FetchDetail(ticket)] if ticket.number == 2));

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.screen, Screen::Issues);
    }

    #[test]
    fn test_hard_error_clears_list_and_stays_out_of_status_bar() {
        let mut app = loaded_app();
        let ticket = page_ticket(&app.handle_key(key(KeyCode::Char('r'))));
        app.handle_event(AppEvent::PageLoaded(
            ticket,
            Err(Error::NetworkError("connection reset".into())),
        ));

        assert!(app.query.issues().is_empty());
        assert!(app.query.last_error().is_some());
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_repository_details_for_another_repo_are_dropped() {
        let mut app = App::default();
        app.open_route(Route::parse("o/first").unwrap());
        app.open_route(Route::parse("o/second").unwrap());

        let first = RepoRef::parse("o/first").unwrap();
        app.handle_event(AppEvent::RepositoryLoaded(
            first,
            Err(Error::NotFound("o/first".into())),
        ));
        assert!(app.repository_error.is_none());
    }

    #[test]
    fn test_invalid_repo_input_is_reported() {
        let mut app = App::default();
        app.handle_key(key(KeyCode::Char('o')));
        type_text(&mut app, "not-a-repo");
        let commands = app.handle_key(key(KeyCode::Enter));

        assert!(commands.is_empty());
        assert_eq!(app.screen, Screen::Directory);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_directory_search_and_language_cycle() {
        let mut app = App::default();
        app.handle_key(key(KeyCode::Char('/')));
        type_text(&mut app, "kube");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.visible_featured().len(), 1);

        let commands = app.handle_key(key(KeyCode::Enter));
        assert!(matches!(&commands[1], Command::FetchRepository(repo) if repo.full_name() == "kubernetes/kubernetes"));

        let mut app = App::default();
        app.handle_key(key(KeyCode::Char('l')));
        assert_eq!(app.directory_language, Some("Go"));
        for _ in 0..5 {
            app.handle_key(key(KeyCode::Char('l')));
        }
        assert_eq!(app.directory_language, None);
    }

    fn assigned(number: u64, login: &str) -> Issue {
        let mut issue = issue(number, IssueState::Open, &[]);
        issue.assignee = Some(user(login));
        issue
    }

    #[test]
    fn test_assignee_picker_filters_by_loaded_assignee() {
        let mut app = App::default();
        let ticket = page_ticket(&app.open_route(Route::parse("o/r").unwrap()));
        app.handle_event(AppEvent::PageLoaded(
            ticket,
            Ok(page(
                1,
                vec![assigned(1, "zoe"), assigned(2, "adam"), issue(3, IssueState::Open, &[])],
                None,
                None,
            )),
        ));

        app.handle_key(key(KeyCode::Char('A')));
        assert_eq!(app.input_mode, InputMode::AssigneePicker);
        assert_eq!(app.assignee_choices(), vec![None, Some("adam"), Some("zoe")]);
        assert_eq!(app.assignee_cursor, 0);

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.filters.assignee, "zoe");
        let numbers: Vec<u64> = app.visible_issues().iter().map(|i| i.number).collect();
        assert_eq!(numbers, vec![1]);

        // Reopening starts on the current choice, the first row clears it
        app.handle_key(key(KeyCode::Char('A')));
        assert_eq!(app.assignee_cursor, 2);
        app.handle_key(key(KeyCode::Up));
        app.handle_key(key(KeyCode::Up));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.filters.assignee.is_empty());
        assert_eq!(app.visible_issues().len(), 3);
    }

    #[test]
    fn test_detail_reload_is_ignored_while_loading() {
        let mut app = App::default();
        let commands = app.open_route(Route::parse("o/r#7").unwrap());
        assert_eq!(commands.len(), 3);

        assert!(app.handle_key(key(KeyCode::Char('r'))).is_empty());
        assert!(app.handle_key(key(KeyCode::Char('r'))).is_empty());
        assert!(app.detail.is_loading());
        assert_eq!(app.screen, Screen::Detail);

        let ticket = commands
            .iter()
            .find_map(|command| match command {
                Command::FetchDetail(ticket) => Some(ticket.clone()),
                _ => None,
            })
            .unwrap();
        app.handle_event(AppEvent::DetailLoaded(
            ticket,
            Err(Error::NetworkError("reset".into())),
        ));
        let commands = app.handle_key(key(KeyCode::Char('r')));
        assert!(matches!(&commands[..], [Command::FetchDetail(ticket)] if ticket.number == 7));
    }

    #[test]
    fn test_reopening_a_loading_repo_issues_nothing() {
        let mut app = App::default();
        assert_eq!(app.open_route(Route::parse("o/r").unwrap()).len(), 2);

        app.handle_key(key(KeyCode::Char('o')));
        type_text(&mut app, "o/r");
        assert!(app.handle_key(key(KeyCode::Enter)).is_empty());
        assert_eq!(app.screen, Screen::Issues);

        // Another repository still supersedes it
        app.handle_key(key(KeyCode::Char('o')));
        type_text(&mut app, "o/other");
        assert_eq!(app.handle_key(key(KeyCode::Enter)).len(), 2);
    }

    #[test]
    fn test_repository_summary_is_not_requested_twice() {
        let mut app = loaded_app();
        assert!(app.repository_loading);

        let commands = app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(commands.len(), 1);
        app.handle_event(AppEvent::PageLoaded(
            page_ticket(&commands),
            Ok(page(1, vec![issue(1, IssueState::Open, &[])], None, None)),
        ));

        app.handle_event(AppEvent::RepositoryLoaded(
            RepoRef::parse("o/r").unwrap(),
            Err(Error::NetworkError("reset".into())),
        ));
        assert!(!app.repository_loading);

        let commands = app.handle_key(key(KeyCode::Char('r')));
        assert!(matches!(&commands[..], [Command::FetchPage(_), Command::FetchRepository(_)]));
        assert!(app.repository_loading);
    }

    #[test]
    fn test_esc_restores_live_filter() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('/')));
        type_text(&mut app, "issue 1");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.visible_issues().len(), 1);

        app.handle_key(key(KeyCode::Char('/')));
        type_text(&mut app, "23");
        assert!(app.visible_issues().is_empty());
        app.handle_key(key(KeyCode::Esc));

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.filters.keyword, "issue 1");
        assert_eq!(app.visible_issues().len(), 1);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_load_more_keeps_list_and_appends() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('j')));

        let commands = app.handle_key(key(KeyCode::Char('N')));
        let ticket = page_ticket(&commands);
        assert!(ticket.request().append);
        assert!(app.query.is_loading_more());
        assert_eq!(app.query.issues().len(), 3);

        app.handle_event(AppEvent::PageLoaded(
            ticket,
            Ok(page(2, vec![issue(4, IssueState::Open, &["help wanted"])], None, None)),
        ));
        assert_eq!(app.query.issues().len(), 4);
        assert_eq!(app.issue_state.selected(), Some(1));
        assert!(app
            .query
            .available_labels()
            .contains(&"help wanted".to_string()));
        assert!(app.handle_key(key(KeyCode::Char('N'))).is_empty());
    }

    #[test]
    fn test_failed_load_more_goes_to_status_bar() {
        let mut app = loaded_app();
        let ticket = page_ticket(&app.handle_key(key(KeyCode::Char('N'))));
        app.handle_event(AppEvent::PageLoaded(
            ticket,
            Err(Error::NetworkError("connection reset".into())),
        ));

        assert_eq!(app.query.issues().len(), 3);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_ctrl_c_quits_from_any_mode() {
        let mut app = App::default();
        app.handle_key(key(KeyCode::Char('o')));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}

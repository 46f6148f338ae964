// UI rendering logic
use crate::{App, InputMode, Screen};
use issuescout_core::{
    contrast::{label_text_color, parse_hex_color},
    models::{Issue, IssueState, Label},
    view::{beginner_counts, derive_view},
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Input / filter bar
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_input_bar(frame, app, chunks[1]);

    match app.screen {
        Screen::Directory => render_directory(frame, app, chunks[2]),
        Screen::Issues => {
            let content = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(chunks[2]);
            render_issue_list(frame, app, content[0]);
            render_issue_preview(frame, app, content[1]);
        }
        Screen::Detail => render_detail(frame, app, chunks[2]),
    }

    match app.input_mode {
        InputMode::LabelPicker => render_label_picker(frame, app, frame.area()),
        InputMode::AssigneePicker => render_assignee_picker(frame, app, frame.area()),
        _ => {}
    }

    render_status_bar(frame, app, chunks[3]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        "IssueScout",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];

    if app.screen != Screen::Directory {
        if let Some(repo) = app.query.repo() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                repo.full_name(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
        }

        if let Some(repository) = &app.repository {
            spans.push(Span::styled(
                format!(
                    "  ★ {}  forks {}  open {}",
                    format_number(repository.stars),
                    format_number(repository.forks),
                    format_number(repository.open_issues)
                ),
                Style::default().fg(Color::Gray),
            ));
            if let Some(language) = &repository.language {
                spans.push(Span::styled(
                    format!("  {}", language),
                    Style::default().fg(Color::Magenta),
                ));
            }
        } else if let Some(error) = &app.repository_error {
            spans.push(Span::styled(
                format!("  ({})", error),
                Style::default().fg(Color::Red),
            ));
        }

        let counts = beginner_counts(app.query.issues());
        if counts.good_first_issues > 0 || counts.help_wanted > 0 {
            spans.push(Span::styled(
                format!(
                    "  good first issue: {}  help wanted: {}",
                    counts.good_first_issues, counts.help_wanted
                ),
                Style::default().fg(Color::Green),
            ));
        }
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_input_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (title, text) = match app.input_mode {
        InputMode::RepoInput => (" Open repository (owner/repo) ", app.input.clone()),
        InputMode::DirectorySearch => (" Search featured ", app.input.clone()),
        InputMode::KeywordFilter => (" Keyword (title or author) ", app.input.clone()),
        InputMode::AssigneeFilter => (" Assignee ", app.input.clone()),
        InputMode::PerPageInput => (" Issues per page (1-100) ", app.input.clone()),
        InputMode::PageInput => (" Go to page ", app.input.clone()),
        InputMode::Normal | InputMode::LabelPicker | InputMode::AssigneePicker => match app.screen {
            Screen::Directory => (" Featured ", directory_summary(app)),
            Screen::Issues | Screen::Detail => (" Filters ", filter_summary(app)),
        },
    };

    let editing = !matches!(
        app.input_mode,
        InputMode::Normal | InputMode::LabelPicker | InputMode::AssigneePicker
    );
    let style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let input = Paragraph::new(text.as_str()).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(style),
    );
    frame.render_widget(input, area);

    if editing {
        frame.set_cursor_position((area.x + app.input.chars().count() as u16 + 1, area.y + 1));
    }
}

fn directory_summary(app: &App) -> String {
    let mut parts = Vec::new();
    if !app.directory_query.is_empty() {
        parts.push(format!("search: {}", app.directory_query));
    }
    parts.push(format!(
        "language: {}",
        app.directory_language.unwrap_or("any")
    ));
    parts.join("  |  ")
}

fn filter_summary(app: &App) -> String {
    let mut parts = vec![format!("state: {}", app.filters.state)];
    if !app.filters.labels.is_empty() {
        let labels: Vec<&str> = app.filters.labels.iter().map(String::as_str).collect();
        parts.push(format!("labels: {}", labels.join(", ")));
    }
    if !app.filters.assignee.is_empty() {
        parts.push(format!("assignee: {}", app.filters.assignee));
    }
    if !app.filters.keyword.is_empty() {
        parts.push(format!("keyword: {}", app.filters.keyword));
    }
    parts.push(format!("sort: {} {}", app.sort.field, app.sort.direction));
    parts.push(format!("{} per page", app.query.per_page()));
    parts.join("  |  ")
}

fn render_directory(frame: &mut Frame, app: &mut App, area: Rect) {
    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let entries = app.visible_featured();
    let items: Vec<ListItem> = entries
        .iter()
        .map(|repo| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    repo.full_name(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  {}", repo.language), Style::default().fg(Color::Magenta)),
            ]))
        })
        .collect();

    let title = format!(" Featured repositories ({}) ", entries.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, content[0], &mut app.directory_state);

    let preview = match app.selected_featured() {
        Some(repo) => vec![
            Line::from(Span::styled(
                repo.full_name(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(repo.description),
            Line::from(""),
            Line::from(vec![
                Span::styled("Language: ", Style::default().fg(Color::Gray)),
                Span::raw(repo.language),
            ]),
            Line::from(vec![
                Span::styled("Tags: ", Style::default().fg(Color::Gray)),
                Span::raw(repo.tags.join(", ")),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "ENTER to browse issues",
                Style::default().fg(Color::DarkGray),
            )),
        ],
        None => vec![Line::from(Span::styled(
            "No featured repository matches",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let paragraph = Paragraph::new(preview)
        .block(Block::default().borders(Borders::ALL).title(" Details "))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, content[1]);
}

fn render_issue_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let title = format!(" Issues - {} ", page_label(app));

    if app.query.is_loading() && !app.query.is_loading_more() {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Loading issues...",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
        ])
        .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);
        return;
    }

    // Hard errors replace the list; the user can retry with r
    if let Some(err) = app.query.blocking_error() {
        let paragraph = Paragraph::new(vec![
            Line::from(Span::styled(
                err.to_string(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("Press r to retry", Style::default().fg(Color::DarkGray))),
        ])
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    if app.query.is_empty_repository() {
        let paragraph = Paragraph::new("This repository has no issues yet.")
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);
        return;
    }

    let view = derive_view(app.query.issues(), &app.filters, &app.sort);
    if view.is_empty() {
        let message = if app.filters.has_active_filters() {
            "No issues on this page match the filters (x clears them)."
        } else {
            "No issues on this page, only pull requests."
        };
        let paragraph = Paragraph::new(message)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = view.iter().map(|issue| issue_item(issue)).collect();
    let title = format!(
        " Issues - {} ({} of {} shown){} ",
        page_label(app),
        items.len(),
        app.query.issues().len(),
        if app.query.is_loading_more() {
            "  loading more..."
        } else {
            ""
        }
    );
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut app.issue_state);
}

fn issue_item(issue: &Issue) -> ListItem<'static> {
    let (marker, marker_color) = state_marker(issue.state);

    let mut first = vec![
        Span::styled(marker, Style::default().fg(marker_color)),
        Span::styled(
            format!(" #{} ", issue.number),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            issue.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ];
    if issue.comments > 0 {
        first.push(Span::styled(
            format!("  💬 {}", issue.comments),
            Style::default().fg(Color::Gray),
        ));
    }

    let mut second = vec![Span::styled(
        format!(
            "    {} by {} ",
            issue.created_at.format("%Y-%m-%d"),
            issue.author.login
        ),
        Style::default().fg(Color::DarkGray),
    )];
    for label in &issue.labels {
        second.push(label_span(label));
        second.push(Span::raw(" "));
    }

    ListItem::new(vec![Line::from(first), Line::from(second)])
}

fn render_issue_preview(frame: &mut Frame, app: &App, area: Rect) {
    let lines = match app.selected_issue() {
        Some(issue) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    issue.title.clone(),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                meta_line(issue),
            ];
            if !issue.labels.is_empty() {
                lines.push(Line::from(
                    issue
                        .labels
                        .iter()
                        .flat_map(|label| [label_span(label), Span::raw(" ")])
                        .collect::<Vec<_>>(),
                ));
            }
            lines.push(Line::from(""));
            let body = issue.body.as_deref().unwrap_or("No description provided.");
            lines.extend(body.lines().take(30).map(|line| Line::from(line.to_string())));
            lines
        }
        None => vec![Line::from(Span::styled(
            "Nothing selected",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Preview (ENTER for comments) "))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let title = match &app.detail_target {
        Some((repo, number)) => format!(" {}#{} ", repo, number),
        None => " Issue ".to_string(),
    };

    let lines: Vec<Line> = if app.detail.is_loading() {
        vec![Line::from(Span::styled(
            "Loading issue...",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))]
    } else if let Some(err) = app.detail.error() {
        vec![
            Line::from(Span::styled(
                err.to_string(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("Press r to retry", Style::default().fg(Color::DarkGray))),
        ]
    } else if let Some(detail) = app.detail.detail() {
        let issue = &detail.issue;
        let mut lines = vec![
            Line::from(Span::styled(
                issue.title.clone(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            meta_line(issue),
        ];
        if let Some(assignee) = issue.assignee_login() {
            lines.push(Line::from(vec![
                Span::styled("Assignee: ", Style::default().fg(Color::Gray)),
                Span::raw(assignee.to_string()),
            ]));
        }
        if !issue.labels.is_empty() {
            lines.push(Line::from(
                issue
                    .labels
                    .iter()
                    .flat_map(|label| [label_span(label), Span::raw(" ")])
                    .collect::<Vec<_>>(),
            ));
        }
        lines.push(Line::from(""));
        let body = issue.body.as_deref().unwrap_or("No description provided.");
        lines.extend(body.lines().map(|line| Line::from(line.to_string())));

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("── Comments ({}) ──", issue.comments),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));

        if let Some(err) = &detail.comments_error {
            lines.push(Line::from(Span::styled(
                format!("Comments could not be loaded: {}", err),
                Style::default().fg(Color::Red),
            )));
        }
        for comment in &detail.comments {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled(
                    comment.author.login.clone(),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" on {}", comment.created_at.format("%Y-%m-%d %H:%M")),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
            lines.extend(comment.body.lines().map(|line| Line::from(line.to_string())));
        }
        lines
    } else {
        Vec::new()
    };

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_label_picker(frame: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect(50, 60, area);
    frame.render_widget(Clear, popup);

    let labels = app.matching_labels();
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Search: ", Style::default().fg(Color::Gray)),
            Span::styled(app.label_search.clone(), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(""),
    ];

    if labels.is_empty() {
        lines.push(Line::from(Span::styled(
            "No labels on this page",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (i, name) in labels.iter().enumerate() {
        let checked = if app.filters.labels.contains(*name) { "[x] " } else { "[ ] " };
        let style = if i == app.label_cursor {
            Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(format!("{}{}", checked, name), style)));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Labels (type to search, ENTER toggles, ESC closes) ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(paragraph, popup);
}

fn render_assignee_picker(frame: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect(40, 50, area);
    frame.render_widget(Clear, popup);

    let lines: Vec<Line> = app
        .assignee_choices()
        .iter()
        .enumerate()
        .map(|(i, choice)| {
            let name = choice.unwrap_or("All assignees");
            let current = choice.unwrap_or("") == app.filters.assignee;
            let mut style = if i == app.assignee_cursor {
                Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            if current {
                style = style.fg(Color::Yellow);
            }
            Line::from(Span::styled(format!("{}{}", if current { "* " } else { "  " }, name), style))
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Assignee (ENTER picks, ESC closes) ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(paragraph, popup);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(message) = &app.status_message {
        Span::styled(message.clone(), Style::default().fg(Color::Red))
    } else {
        match app.input_mode {
            InputMode::Normal => match app.screen {
                Screen::Directory => Span::raw(
                    "j/k: navigate | /: search | l: language | o: open owner/repo | ENTER: browse | q: quit",
                ),
                Screen::Issues => Span::raw(
                    "j/k: navigate | n/p: page | N: load more | g: go to | P: per page | s: state | l: labels | a/A: assignee | /: keyword | c/m: sort | x: clear | r: reload | ESC: back",
                ),
                Screen::Detail => {
                    Span::raw("j/k: scroll | r: reload | ESC: back to issues | q: quit")
                }
            },
            InputMode::LabelPicker => Span::styled(
                "LABELS | UP/DOWN: move | ENTER: toggle | ESC: close",
                Style::default().fg(Color::Cyan),
            ),
            InputMode::AssigneePicker => Span::styled(
                "ASSIGNEE | j/k: move | ENTER: pick | ESC: close",
                Style::default().fg(Color::Cyan),
            ),
            InputMode::KeywordFilter | InputMode::AssigneeFilter | InputMode::DirectorySearch => {
                Span::styled(
                    "FILTER | Type to narrow | ENTER: done | ESC: undo",
                    Style::default().fg(Color::Yellow),
                )
            }
            InputMode::RepoInput | InputMode::PerPageInput | InputMode::PageInput => {
                Span::styled(
                    "EDITING | ENTER: apply | ESC: cancel",
                    Style::default().fg(Color::Green),
                )
            }
        }
    };

    frame.render_widget(Paragraph::new(Line::from(status)), area);
}

fn meta_line(issue: &Issue) -> Line<'static> {
    let (marker, color) = state_marker(issue.state);
    Line::from(vec![
        Span::styled(
            format!("{} {}", marker, issue.state),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "  #{} opened {} by {}",
                issue.number,
                issue.created_at.format("%Y-%m-%d"),
                issue.author.login
            ),
            Style::default().fg(Color::Gray),
        ),
    ])
}

fn state_marker(state: IssueState) -> (&'static str, Color) {
    match state {
        IssueState::Open => ("●", Color::Green),
        IssueState::Closed => ("✔", Color::Magenta),
    }
}

/// Label chip in the label's own colour, text picked for contrast
fn label_span(label: &Label) -> Span<'static> {
    let (r, g, b) = label_text_color(&label.color).rgb();
    let background = parse_hex_color(&label.color)
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(Color::Gray);

    Span::styled(
        format!(" {} ", label.name),
        Style::default().fg(Color::Rgb(r, g, b)).bg(background),
    )
}

fn page_label(app: &App) -> String {
    let (Some(pagination), Some((first, last))) = (app.query.pagination(), app.query.loaded_pages())
    else {
        return format!("page {}", app.query.page());
    };
    let pages = if first < last {
        format!("pages {}-{}", first, last)
    } else {
        format!("page {}", last)
    };
    match pagination.total_pages {
        Some(total) => format!("{} of {}", pages, total),
        None => format!("{} of many", pages),
    }
}

fn format_number(num: u32) -> String {
    if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}k", num as f64 / 1_000.0)
    } else {
        num.to_string()
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use issuescout_core::repo_ref::Route;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_directory_screen_lists_featured_repos() {
        let mut app = App::default();
        let screen = draw(&mut app);
        assert!(screen.contains("IssueScout"));
        assert!(screen.contains("facebook/react"));
    }

    #[test]
    fn test_issue_screen_shows_loading() {
        let mut app = App::default();
        app.open_route(Route::parse("o/r").unwrap());
        let screen = draw(&mut app);
        assert!(screen.contains("Loading issues"));
        assert!(screen.contains("o/r"));
    }

    #[test]
    fn test_assignee_picker_and_page_range() {
        use crate::AppEvent;
        use issuescout_core::models::User;
        use issuescout_core::pipeline::{PageResult, Pagination};
        use issuescout_core::PageLinks;

        let mut app = App::default();
        let commands = app.open_route(Route::parse("o/r").unwrap());
        let Some(crate::Command::FetchPage(ticket)) = commands.into_iter().next() else {
            panic!("expected a page fetch");
        };
        let issue = Issue {
            id: 1,
            number: 1,
            title: "Crash on start".into(),
            body: None,
            state: IssueState::Open,
            labels: Vec::new(),
            assignee: Some(User {
                login: "hubot".into(),
                avatar_url: String::new(),
            }),
            assignees: Vec::new(),
            author: User {
                login: "octocat".into(),
                avatar_url: String::new(),
            },
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            closed_at: None,
            comments: 0,
            html_url: "https://github.com/o/r/issues/1".into(),
        };
        let links = PageLinks {
            next: Some(2),
            last: Some(4),
            ..Default::default()
        };
        app.handle_event(AppEvent::PageLoaded(
            ticket,
            Ok(PageResult {
                issues: vec![issue.clone()],
                pagination: Pagination::from_links(1, 30, &links),
            }),
        ));

        let more = app.query.load_more().unwrap().unwrap();
        let mut second = issue;
        second.id = 2;
        second.number = 2;
        app.handle_event(AppEvent::PageLoaded(
            more,
            Ok(PageResult {
                issues: vec![second],
                pagination: Pagination::from_links(2, 30, &links),
            }),
        ));
        assert!(draw(&mut app).contains("pages 1-2 of 4"));

        app.input_mode = InputMode::AssigneePicker;
        let screen = draw(&mut app);
        assert!(screen.contains("All assignees"));
        assert!(screen.contains("hubot"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_500), "1.5k");
        assert_eq!(format_number(2_300_000), "2.3M");
    }

    #[test]
    fn test_label_chip_uses_contrasting_text() {
        let light = Label {
            id: 1,
            name: "docs".into(),
            color: "ffffff".into(),
        };
        let span = label_span(&light);
        assert_eq!(span.style.fg, Some(Color::Rgb(0, 0, 0)));
        assert_eq!(span.style.bg, Some(Color::Rgb(255, 255, 255)));

        let broken = Label {
            id: 2,
            name: "odd".into(),
            color: "zzz".into(),
        };
        assert_eq!(label_span(&broken).style.bg, Some(Color::Gray));
    }
}

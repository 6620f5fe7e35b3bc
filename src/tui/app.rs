use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::config::{AppConfig, TOKEN_ENV};
use crate::core::api::{AuthContext, ErrorKind};
use crate::core::campaign::CampaignStatus;
use crate::core::review::{ReviewOutcome, ReviewRequest, ReviewView};
use crate::core::search::SearchTicket;

use super::events::{Action, AppEvent, Focus, NotificationLevel, Notifications};
use super::layout::AppLayout;
use super::services::Services;
use super::theme;
use super::views::review::{ReviewIntent, ReviewViewState};
use super::views::search::SearchViewState;
use super::views::wizard::{WizardIntent, WizardViewState};

/// Central application state (Elm architecture).
pub struct AppState {
    pub running: bool,
    pub focus: Focus,
    pub notifications: Notifications,
    pub show_help: bool,
    /// Shown instead of retrying when a protected call needs a signed-in user.
    pub show_sign_in: bool,
    pub wizard: WizardViewState,
    pub review: ReviewViewState,
    pub search: SearchViewState,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    services: Services,
}

impl AppState {
    pub fn new(event_rx: mpsc::UnboundedReceiver<AppEvent>, services: Services, config: &AppConfig) -> Self {
        let mut state = Self {
            running: true,
            focus: Focus::Create,
            notifications: Notifications::default(),
            show_help: false,
            show_sign_in: false,
            wizard: WizardViewState::new(config.wizard.strict_steps),
            review: ReviewViewState::new(services.api.clone()),
            search: SearchViewState::new(&config.search),
            event_rx,
            services,
        };
        state.on_focus_changed();
        state
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(input) => self.handle_input(input),
            AppEvent::Tick => self.on_tick(),
            AppEvent::ReviewListed(ticket, result) => {
                if let Err(e) = self.review.on_listed(ticket, result) {
                    self.report(e.kind(), format!("Could not load pending campaigns: {e}"));
                }
            }
            AppEvent::ReviewFinished(outcome) => {
                let success = match &outcome {
                    ReviewOutcome::Approved(c) if c.status == CampaignStatus::Active => {
                        Some(format!("Approved \"{}\"", c.title))
                    }
                    ReviewOutcome::Approved(c) => Some(format!("\"{}\" is now {}", c.title, c.status)),
                    ReviewOutcome::Rejected(id) => Some(format!("Rejected campaign {id}")),
                    ReviewOutcome::Failed { .. } => None,
                };
                match self.review.on_finished(outcome) {
                    Ok(()) => {
                        if let Some(msg) = success {
                            self.push_notification(msg, NotificationLevel::Success);
                        }
                    }
                    Err(e) => self.report(e.kind(), e.to_string()),
                }
            }
            AppEvent::SearchFinished(response) => self.search.on_response(response),
            AppEvent::Submitted(result) => {
                self.wizard.on_submitted(&result);
                match result {
                    Ok(id) => {
                        self.push_notification(
                            format!("Campaign submitted for review ({id})"),
                            NotificationLevel::Success,
                        );
                        if self.review.client().view() != ReviewView::Loading {
                            self.refresh_review();
                        }
                    }
                    Err(e) => self.report(e.kind(), format!("Submission failed: {e}")),
                }
            }
            AppEvent::Quit => self.running = false,
        }
    }

    fn handle_input(&mut self, input: Event) {
        // Priority 1: modals
        if self.show_sign_in {
            if is_dismiss_key(&input) {
                self.handle_action(Action::CloseSignIn);
            }
            return;
        }
        if self.show_help {
            if is_dismiss_key(&input) || is_key(&input, KeyCode::Char('?')) {
                self.handle_action(Action::CloseHelp);
            }
            return;
        }

        // Priority 2: focused view
        if self.dispatch_view_input(&input) {
            return;
        }

        // Priority 3: global keybindings
        if let Some(action) = self.map_input_to_action(&input) {
            self.handle_action(action);
        }
    }

    fn dispatch_view_input(&mut self, input: &Event) -> bool {
        match self.focus {
            Focus::Create => match self.wizard.handle_input(input) {
                WizardIntent::Ignored => false,
                WizardIntent::Consumed => true,
                WizardIntent::Submit => {
                    self.submit();
                    true
                }
            },
            Focus::Review => match self.review.handle_input(input) {
                ReviewIntent::Ignored => false,
                ReviewIntent::Consumed => true,
                ReviewIntent::Refresh => {
                    self.refresh_review();
                    true
                }
                ReviewIntent::Dispatch(request) => {
                    self.dispatch_review(request);
                    true
                }
                ReviewIntent::Refused(reason) => {
                    self.push_notification(reason, NotificationLevel::Warning);
                    true
                }
            },
            Focus::Search => self.search.handle_input(input),
        }
    }

    fn map_input_to_action(&self, input: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = input
        else {
            return None;
        };

        match (*modifiers, *code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
            (_, KeyCode::F(1)) => Some(Action::FocusCreate),
            (_, KeyCode::F(2)) => Some(Action::FocusReview),
            (_, KeyCode::F(3)) => Some(Action::FocusSearch),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, code) => match code {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('?') => Some(Action::ShowHelp),
                KeyCode::Tab => Some(Action::TabNext),
                KeyCode::BackTab => Some(Action::TabPrev),
                _ => None,
            },
            _ => None,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::FocusCreate => self.set_focus(Focus::Create),
            Action::FocusReview => self.set_focus(Focus::Review),
            Action::FocusSearch => self.set_focus(Focus::Search),
            Action::TabNext => self.set_focus(self.focus.next()),
            Action::TabPrev => self.set_focus(self.focus.prev()),
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
            Action::CloseSignIn => self.show_sign_in = false,
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        if self.focus != focus {
            self.focus = focus;
            self.on_focus_changed();
        }
    }

    fn on_focus_changed(&mut self) {
        self.search.set_focus(self.focus == Focus::Search);
        match self.focus {
            Focus::Create => {
                if !self.is_signed_in() {
                    self.show_sign_in = true;
                }
            }
            Focus::Review => {
                if self.review.client().view() == ReviewView::Loading {
                    self.refresh_review();
                }
            }
            Focus::Search => {}
        }
    }

    fn is_signed_in(&self) -> bool {
        self.services.auth.current_user().is_some()
    }

    // ── Background work ─────────────────────────────────────────────────

    fn submit(&mut self) {
        let draft = self.wizard.draft().clone();
        let gateway = self.services.gateway.clone();
        let tx = self.services.event_tx.clone();
        self.wizard.set_submitting();

        tokio::spawn(async move {
            let result = gateway.submit(&draft).await;
            let _ = tx.send(AppEvent::Submitted(result));
        });
    }

    fn refresh_review(&mut self) {
        let Some(ticket) = self.review.begin_refresh() else {
            return;
        };
        let api = self.services.api.clone();
        let tx = self.services.event_tx.clone();
        tokio::spawn(async move {
            let result = api.list_campaigns(CampaignStatus::Pending).await;
            let _ = tx.send(AppEvent::ReviewListed(ticket, result));
        });
    }

    fn dispatch_review(&mut self, request: ReviewRequest) {
        let api = self.services.api.clone();
        let tx = self.services.event_tx.clone();
        tokio::spawn(async move {
            let outcome = request.execute(api.as_ref()).await;
            let _ = tx.send(AppEvent::ReviewFinished(outcome));
        });
    }

    fn spawn_search(&self, ticket: SearchTicket) {
        let api = self.services.api.clone();
        let tx = self.services.event_tx.clone();
        tokio::spawn(async move {
            let response = ticket.execute(api.as_ref()).await;
            let _ = tx.send(AppEvent::SearchFinished(response));
        });
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Surface an error according to its class.
    fn report(&mut self, kind: ErrorKind, message: String) {
        let level = match kind {
            ErrorKind::Auth => {
                self.show_sign_in = true;
                NotificationLevel::Warning
            }
            ErrorKind::Network | ErrorKind::NotFound => NotificationLevel::Warning,
            ErrorKind::Validation | ErrorKind::Other => NotificationLevel::Error,
        };
        self.push_notification(message, level);
    }

    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if !self.notifications.push(message, level) {
            log::trace!("Duplicate notification suppressed");
        }
    }

    /// Tick: expire notifications, fire due search queries.
    fn on_tick(&mut self) {
        self.notifications.tick();
        if let Some(ticket) = self.search.poll(Instant::now()) {
            self.spawn_search(ticket);
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = AppLayout::compute(area);

        if let Some(tabs) = layout.tabs {
            self.render_tabs(frame, tabs);
        }
        match self.focus {
            Focus::Create => self.wizard.render(frame, layout.main),
            Focus::Review => self.review.render(frame, layout.main),
            Focus::Search => self.search.render(frame, layout.main),
        }
        self.render_status_bar(frame, layout.status);

        // Overlays
        self.render_notifications(frame, area);
        if self.show_help {
            self.render_help_modal(frame, area);
        }
        if self.show_sign_in {
            self.render_sign_in(frame, area);
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        for (i, focus) in Focus::ALL.iter().enumerate() {
            let style = if *focus == self.focus {
                theme::highlight()
            } else {
                theme::muted()
            };
            spans.push(Span::styled(format!(" F{} {} ", i + 1, focus.label()), style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let user = match self.services.auth.current_user() {
            Some(identity) => Span::styled(format!(" {} ", identity.display()), Style::default().fg(theme::SUCCESS)),
            None => Span::styled(" signed out ", Style::default().fg(theme::WARNING)),
        };
        let line = Line::from(vec![
            Span::styled(" FUNDRAISER ", theme::brand_badge()),
            Span::styled(format!(" {} ", self.focus.label()), theme::heading()),
            user,
            Span::styled(" ?", theme::key_hint()),
            Span::styled(" help ", theme::dim()),
            Span::styled("q", theme::key_hint()),
            Span::styled(" quit", theme::dim()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        // Top-right, under the tab bar.
        let width = area.width.saturating_sub(2).min(56);
        let rows = (self.notifications.len() as u16).min(area.height);
        let overlay = Rect::new(area.width.saturating_sub(width + 1), 1, width, rows);

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let color = theme::level_color(n.level);
                Line::from(vec![
                    Span::styled(format!(" {} ", n.level.icon()), Style::default().fg(color).add_modifier(Modifier::BOLD)),
                    Span::raw(n.message.as_str()),
                ])
            })
            .collect();

        frame.render_widget(Clear, overlay);
        frame.render_widget(Paragraph::new(lines), overlay);
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 80, area);

        let mut lines = vec![Line::raw(""), Line::from(Span::styled(" Keybindings", theme::title()))];
        for (section, bindings) in KEYMAP {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(format!("  {section}"), theme::heading())));
            lines.extend(bindings.iter().map(|(keys, what)| {
                Line::from(vec![
                    Span::styled(format!("    {keys:<22}"), theme::key_hint()),
                    Span::styled(*what, Style::default().fg(theme::TEXT)),
                ])
            }));
        }

        let block = theme::block_focused("Help").title_alignment(Alignment::Center);
        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }

    fn render_sign_in(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 40, area);
        let lines = vec![
            Line::raw(""),
            Line::from(Span::styled(" Sign in required", theme::title())),
            Line::raw(""),
            Line::raw(" Creating and moderating campaigns needs a signed-in account."),
            Line::raw(" Sign in with the platform's hosted sign-in page, then start"),
            Line::from(vec![
                Span::raw(" again with the issued token in "),
                Span::styled(TOKEN_ENV, theme::key_hint()),
                Span::raw(" or [api].token in the config file."),
            ]),
            Line::raw(""),
            Line::from(Span::styled(" Press Esc to continue browsing", theme::dim())),
        ];
        let block = Block::bordered()
            .title(" Sign in ")
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(theme::WARNING));

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), modal);
    }
}

/// Help overlay contents, grouped by the view they apply to.
const KEYMAP: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("F1 / F2 / F3", "Create / Review / Search"),
            ("Tab / Shift+Tab", "Next / previous view"),
            ("?", "Toggle this help"),
            ("q / Ctrl+C", "Quit"),
        ],
    ),
    (
        "Create",
        &[
            ("Tab / Up / Down", "Move between fields"),
            ("PgDn / Ctrl+N", "Next step"),
            ("PgUp / Ctrl+B / Esc", "Previous step"),
            ("Ctrl+S", "Submit (review step)"),
        ],
    ),
    (
        "Review",
        &[
            ("j / k", "Move cursor"),
            ("Enter", "Select campaign"),
            ("a / r", "Approve / reject selected"),
            ("R", "Refresh pending list"),
        ],
    ),
    (
        "Search",
        &[("type", "Search after a short pause"), ("Esc", "Clear query")],
    ),
];

fn is_key(input: &Event, code: KeyCode) -> bool {
    matches!(input, Event::Key(k) if k.kind == KeyEventKind::Press && k.code == code)
}

fn is_dismiss_key(input: &Event) -> bool {
    is_key(input, KeyCode::Esc) || is_key(input, KeyCode::Enter)
}

/// Calculate a centered rect using percentage of parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

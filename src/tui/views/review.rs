use std::sync::Arc;

use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::core::api::{ApiError, CampaignApi};
use crate::core::campaign::Campaign;
use crate::core::review::{ListingTicket, ReviewAction, ReviewClient, ReviewError, ReviewOutcome, ReviewRequest, ReviewView};
use crate::tui::theme;

/// What the app should do after the review view handled a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewIntent {
    Ignored,
    Consumed,
    /// Fetch the pending list again.
    Refresh,
    /// Send this request in the background.
    Dispatch(ReviewRequest),
    /// The action was refused locally.
    Refused(String),
}

pub struct ReviewViewState {
    client: ReviewClient,
    cursor: usize,
    refreshing: bool,
}

impl ReviewViewState {
    pub fn new(api: Arc<dyn CampaignApi>) -> Self {
        Self {
            client: ReviewClient::new(api),
            cursor: 0,
            refreshing: false,
        }
    }

    pub fn client(&self) -> &ReviewClient {
        &self.client
    }

    /// Mark a refresh as started. Returns `None` if one is already running.
    pub fn begin_refresh(&mut self) -> Option<ListingTicket> {
        if std::mem::replace(&mut self.refreshing, true) {
            return None;
        }
        Some(self.client.begin_listing())
    }

    pub fn on_listed(
        &mut self,
        ticket: ListingTicket,
        result: Result<Vec<Campaign>, ApiError>,
    ) -> Result<(), ReviewError> {
        self.refreshing = false;
        let applied = self.client.apply_listing(ticket, result);
        self.clamp_cursor();
        applied
    }

    pub fn on_finished(&mut self, outcome: ReviewOutcome) -> Result<(), ReviewError> {
        let applied = self.client.apply(outcome);
        self.clamp_cursor();
        applied
    }

    fn clamp_cursor(&mut self) {
        let len = self.client.campaigns().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    fn move_cursor(&mut self, down: bool) {
        let len = self.client.campaigns().len();
        if len == 0 {
            return;
        }
        self.cursor = if down {
            (self.cursor + 1).min(len - 1)
        } else {
            self.cursor.saturating_sub(1)
        };
    }

    fn select_cursor(&mut self) {
        if let Some(id) = self.client.campaigns().get(self.cursor).map(|c| c.id.clone()) {
            if let Err(e) = self.client.select(&id) {
                log::warn!("Could not select row {}: {e}", self.cursor);
            }
        }
    }

    fn request(&mut self, action: ReviewAction) -> ReviewIntent {
        let Some(id) = self.client.selected_id().cloned() else {
            return ReviewIntent::Refused("Select a campaign first (Enter)".into());
        };
        match self.client.begin(&id, action) {
            Ok(request) => ReviewIntent::Dispatch(request),
            Err(e) => ReviewIntent::Refused(e.to_string()),
        }
    }

    pub fn handle_input(&mut self, event: &Event) -> ReviewIntent {
        let Event::Key(key) = event else {
            return ReviewIntent::Ignored;
        };
        if key.kind != KeyEventKind::Press {
            return ReviewIntent::Ignored;
        }
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_cursor(true);
                ReviewIntent::Consumed
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_cursor(false);
                ReviewIntent::Consumed
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.select_cursor();
                ReviewIntent::Consumed
            }
            KeyCode::Char('a') => self.request(ReviewAction::Approve),
            KeyCode::Char('r') => self.request(ReviewAction::Reject),
            KeyCode::Char('R') => ReviewIntent::Refresh,
            _ => ReviewIntent::Ignored,
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let cols = Layout::horizontal([Constraint::Percentage(38), Constraint::Percentage(62)]).split(area);
        self.render_list(frame, cols[0]);
        self.render_detail(frame, cols[1]);
    }

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        let title = if self.refreshing {
            "Pending · refreshing…".to_string()
        } else {
            format!("Pending ({})", self.client.campaigns().len())
        };
        let block = theme::block_focused(&title);

        let campaigns = match self.client.view() {
            ReviewView::Populated(campaigns) => campaigns,
            other => {
                let (text, style) = match other {
                    ReviewView::Loading => ("Loading pending campaigns…".to_string(), theme::muted()),
                    ReviewView::Empty => ("No pending campaigns".to_string(), theme::muted()),
                    ReviewView::Failed(err) => (format!("Could not load campaigns: {err}"), Style::default().fg(theme::ERROR)),
                    ReviewView::Populated(_) => (String::new(), theme::muted()),
                };
                frame.render_widget(
                    Paragraph::new(Span::styled(text, style)).wrap(Wrap { trim: true }).block(block),
                    area,
                );
                return;
            }
        };

        let selected = self.client.selected_id();
        let items: Vec<ListItem> = campaigns
            .iter()
            .map(|c| {
                let marker = if self.client.is_in_flight(&c.id) {
                    Span::styled("… ", Style::default().fg(theme::INFO))
                } else if Some(&c.id) == selected {
                    Span::styled("▸ ", theme::title())
                } else {
                    Span::raw("  ")
                };
                ListItem::new(Line::from(vec![
                    marker,
                    Span::styled(c.title.clone(), Style::default().fg(theme::TEXT)),
                    Span::styled(format!("  {}", c.status), Style::default().fg(theme::status_color(c.status))),
                ]))
            })
            .collect();

        let mut state = ListState::default();
        state.select(Some(self.cursor));
        frame.render_stateful_widget(
            List::new(items).block(block).highlight_style(theme::highlight()),
            area,
            &mut state,
        );
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let block = theme::block_default("Details");
        let Some(c) = self.client.selected() else {
            frame.render_widget(
                Paragraph::new(Span::styled("Select a campaign with Enter", theme::dim())).block(block),
                area,
            );
            return;
        };

        let field = |label: &'static str, value: String| {
            Line::from(vec![Span::styled(format!("{label:<12}"), theme::muted()), Span::raw(value)])
        };

        let mut lines = vec![
            Line::from(Span::styled(c.title.clone(), theme::title())),
            Line::raw(""),
            Line::from(vec![
                Span::styled(format!("{:<12}", "Category"), theme::muted()),
                Span::styled(c.category.label(), Style::default().fg(theme::category_color(c.category))),
            ]),
            field("Goal", format!("{:.2}", c.goal_amount)),
            Line::from(vec![
                Span::styled(format!("{:<12}", "Status"), theme::muted()),
                Span::styled(c.status.as_str(), Style::default().fg(theme::status_color(c.status))),
            ]),
            field(
                "Created",
                c.created_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".into()),
            ),
            Line::raw(""),
            Line::from(Span::styled("Description", theme::heading())),
            Line::raw(c.description.clone()),
            Line::raw(""),
            Line::from(Span::styled("Media", theme::heading())),
        ];
        lines.push(field("Image", c.primary_image().unwrap_or("-").to_string()));
        lines.push(field("Video", c.video_url().unwrap_or("-").to_string()));
        if c.document.is_empty() {
            lines.push(field("Documents", "-".into()));
        }
        for doc in &c.document {
            lines.push(field("Document", doc.clone()));
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled("[a]", theme::key_hint()),
            Span::styled(" approve  ", theme::dim()),
            Span::styled("[r]", theme::key_hint()),
            Span::styled(" reject  ", theme::dim()),
            Span::styled("[R]", theme::key_hint()),
            Span::styled(" refresh", theme::dim()),
        ]));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), area);
    }
}

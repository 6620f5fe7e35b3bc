use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use crate::config::SearchConfig;
use crate::core::search::{SearchClient, SearchResponse, SearchTicket, SearchView};
use crate::tui::theme;
use crate::tui::widgets::InputBuffer;

pub struct SearchViewState {
    client: SearchClient,
    input: InputBuffer,
}

impl SearchViewState {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            client: SearchClient::new(config),
            input: InputBuffer::new(),
        }
    }

    pub fn client(&self) -> &SearchClient {
        &self.client
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.client.set_focus(focused);
    }

    /// Ticket for a query whose debounce window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<SearchTicket> {
        self.client.poll_due(now)
    }

    pub fn on_response(&mut self, response: SearchResponse) {
        self.client.apply(response);
    }

    pub fn handle_input(&mut self, event: &Event) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        if key.kind != KeyEventKind::Press {
            return false;
        }
        if key.code == KeyCode::Esc && !self.input.is_blank() {
            self.input.clear();
            self.client.clear();
            return true;
        }
        if self.input.handle_key(key) {
            self.client.on_input(self.input.text(), Instant::now());
            return true;
        }
        false
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).split(area);

        frame.render_widget(
            Paragraph::new(self.input.line(true)).block(theme::block_focused("Search campaigns")),
            rows[0],
        );

        let block = theme::block_default("Top matches");
        let message = |text: String, style: Style| Paragraph::new(Span::styled(text, style)).block(block.clone());

        match self.client.view() {
            SearchView::Hidden => frame.render_widget(block.clone(), rows[1]),
            SearchView::Prompt => frame.render_widget(
                message("Start typing to search (2+ characters)".into(), theme::muted()),
                rows[1],
            ),
            SearchView::Loading => frame.render_widget(message("Searching…".into(), theme::muted()), rows[1]),
            SearchView::NoResults => frame.render_widget(
                message(format!("No campaigns match \"{}\"", self.client.query().trim()), theme::muted()),
                rows[1],
            ),
            SearchView::Failed(err) => frame.render_widget(
                message(format!("Search failed: {err}"), Style::default().fg(theme::ERROR)),
                rows[1],
            ),
            SearchView::Results(results) => {
                let items: Vec<ListItem> = results
                    .iter()
                    .map(|r| {
                        let mut spans = vec![Span::styled(r.title.clone(), Style::default().fg(theme::TEXT))];
                        if let Some(category) = r.category {
                            spans.push(Span::styled(
                                format!("  {category}"),
                                Style::default().fg(theme::category_color(category)),
                            ));
                        }
                        if let Some(goal) = r.goal_amount {
                            spans.push(Span::styled(format!("  goal {goal:.0}"), theme::dim()));
                        }
                        ListItem::new(Line::from(spans))
                    })
                    .collect();
                frame.render_widget(List::new(items).block(block.clone()), rows[1]);
            }
        }
    }
}

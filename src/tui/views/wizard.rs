use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Wrap},
    Frame,
};

use crate::core::campaign::wizard::{
    AssetRef, CampaignDraft, CampaignWizard, DraftField, FieldValue, VideoSource, WizardStep,
};
use crate::core::campaign::{CampaignId, Category};
use crate::core::submission::SubmissionError;
use crate::tui::theme;
use crate::tui::widgets::InputBuffer;

/// What the app should do after the wizard handled a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardIntent {
    Ignored,
    Consumed,
    /// The user asked to submit the draft.
    Submit,
}

pub struct WizardViewState {
    wizard: CampaignWizard,
    field_index: usize,
    input: InputBuffer,
    error: Option<String>,
    submitting: bool,
}

impl WizardViewState {
    pub fn new(strict_steps: bool) -> Self {
        let mut state = Self {
            wizard: CampaignWizard::new().with_strict_steps(strict_steps),
            field_index: 0,
            input: InputBuffer::new(),
            error: None,
            submitting: false,
        };
        state.load_field();
        state
    }

    pub fn step(&self) -> WizardStep {
        self.wizard.step()
    }

    pub fn draft(&self) -> &CampaignDraft {
        self.wizard.draft()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set_submitting(&mut self) {
        self.submitting = true;
        self.error = None;
    }

    pub fn focused_field(&self) -> Option<DraftField> {
        self.step().fields().get(self.field_index).copied()
    }

    /// Write the edit buffer into the draft.
    fn commit(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };
        // Files picked outside the text box are kept unless the text changed.
        if self.input.text() == field_text(self.draft(), field) {
            return;
        }
        let draft = self.wizard.draft_mut();
        if self.input.is_blank() {
            draft.clear_field(field);
        } else {
            draft.set_text(field, self.input.text());
        }
    }

    fn load_field(&mut self) {
        let text = self
            .focused_field()
            .map(|field| field_text(self.draft(), field))
            .unwrap_or_default();
        self.input.set_text(text);
    }

    fn focus_field(&mut self, index: usize) {
        self.commit();
        let count = self.step().fields().len();
        self.field_index = if count == 0 { 0 } else { index % count };
        self.load_field();
    }

    fn focus_offset(&mut self, forward: bool) {
        let count = self.step().fields().len();
        if count == 0 {
            return;
        }
        let next = if forward {
            self.field_index + 1
        } else {
            self.field_index + count - 1
        };
        self.focus_field(next);
    }

    pub fn next_step(&mut self) {
        self.commit();
        match self.wizard.next() {
            Ok(_) => {
                self.error = None;
                self.field_index = 0;
                self.load_field();
            }
            Err(e) => {
                if let Some(index) = e.field().and_then(|f| self.step().fields().iter().position(|&x| x == f)) {
                    self.field_index = index;
                    self.load_field();
                }
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn previous_step(&mut self) {
        self.commit();
        self.wizard.back();
        self.field_index = 0;
        self.error = None;
        self.load_field();
    }

    /// Walk back one step at a time until `field` is on screen.
    fn reveal(&mut self, field: DraftField) {
        self.commit();
        while self.step().index() > field.step().index() {
            self.wizard.back();
        }
        self.field_index = self.step().fields().iter().position(|&f| f == field).unwrap_or(0);
        self.load_field();
    }

    /// Record the outcome of a submission started by [`WizardIntent::Submit`].
    pub fn on_submitted(&mut self, result: &Result<CampaignId, SubmissionError>) {
        self.submitting = false;
        match result {
            Ok(_) => {
                self.wizard.reset();
                self.field_index = 0;
                self.error = None;
                self.load_field();
            }
            Err(SubmissionError::Validation(e)) => {
                if let Some(field) = e.field() {
                    self.reveal(field);
                }
                self.error = Some(e.to_string());
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn handle_input(&mut self, event: &Event) -> WizardIntent {
        let Event::Key(key) = event else {
            return WizardIntent::Ignored;
        };
        if key.kind != KeyEventKind::Press {
            return WizardIntent::Ignored;
        }
        self.handle_key(key)
    }

    fn handle_key(&mut self, key: &KeyEvent) -> WizardIntent {
        if self.submitting {
            return Self::frozen_key(key);
        }
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => {
                if !self.wizard.at_review() {
                    return WizardIntent::Consumed;
                }
                self.commit();
                WizardIntent::Submit
            }
            (KeyModifiers::CONTROL, KeyCode::Char('n')) | (_, KeyCode::PageDown) => {
                self.next_step();
                WizardIntent::Consumed
            }
            (KeyModifiers::CONTROL, KeyCode::Char('b')) | (_, KeyCode::PageUp) => {
                self.previous_step();
                WizardIntent::Consumed
            }
            (_, KeyCode::Esc) if self.wizard.navigator().can_go_back() => {
                self.previous_step();
                WizardIntent::Consumed
            }
            (_, KeyCode::Tab | KeyCode::Down | KeyCode::Enter) if self.focused_field().is_some() => {
                self.focus_offset(true);
                WizardIntent::Consumed
            }
            (_, KeyCode::BackTab | KeyCode::Up) if self.focused_field().is_some() => {
                self.focus_offset(false);
                WizardIntent::Consumed
            }
            _ if self.focused_field().is_some() => {
                if self.input.handle_key(key) {
                    self.error = None;
                    WizardIntent::Consumed
                } else {
                    WizardIntent::Ignored
                }
            }
            _ => WizardIntent::Ignored,
        }
    }

    /// The draft stays frozen until the submission settles. Focus switches
    /// and quit still reach the app.
    fn frozen_key(key: &KeyEvent) -> WizardIntent {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::F(_)) => WizardIntent::Ignored,
            _ => WizardIntent::Consumed,
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = theme::block_focused("New Campaign");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(1), // step tabs
            Constraint::Length(1), // progress
            Constraint::Length(1),
            Constraint::Min(3),    // fields / summary
            Constraint::Length(2), // error
            Constraint::Length(1), // hints
        ])
        .split(inner);

        frame.render_widget(Paragraph::new(self.steps_line()), rows[0]);

        let percent = self.wizard.navigator().progress_percent();
        frame.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(theme::PRIMARY))
                .percent(u16::from(percent))
                .label(format!("{} · {}", self.step().label(), self.step().description())),
            rows[1],
        );

        let body = if self.wizard.at_review() {
            self.review_lines()
        } else {
            self.field_lines()
        };
        frame.render_widget(Paragraph::new(body).wrap(Wrap { trim: false }), rows[3]);

        if let Some(ref err) = self.error {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(format!(" {err}"), Style::default().fg(theme::ERROR))))
                    .wrap(Wrap { trim: true }),
                rows[4],
            );
        }

        frame.render_widget(Paragraph::new(self.hints()), rows[5]);
    }

    fn steps_line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for step in WizardStep::ALL {
            let style = if step == self.step() {
                theme::highlight()
            } else if step.index() < self.step().index() {
                Style::default().fg(theme::SUCCESS)
            } else {
                theme::muted()
            };
            spans.push(Span::styled(format!(" {}. {} ", step.index() + 1, step.label()), style));
            if !step.is_terminal() {
                spans.push(Span::styled("›", theme::dim()));
            }
        }
        Line::from(spans)
    }

    fn field_lines(&self) -> Vec<Line<'_>> {
        let mut lines = Vec::new();
        for (i, &field) in self.step().fields().iter().enumerate() {
            let focused = i == self.field_index;
            let marker = if field.is_required() { "*" } else { " " };
            let label_style = if focused {
                theme::heading()
            } else {
                theme::muted()
            };
            lines.push(Line::from(vec![
                Span::styled(marker, theme::required_missing()),
                Span::styled(format!("{:<22}", field.label()), label_style),
            ]));

            let value = if focused {
                self.input.line(true)
            } else {
                Line::raw(field_text(self.draft(), field))
            };
            let mut spans = vec![Span::raw("   ")];
            spans.extend(value.spans);
            lines.push(Line::from(spans));

            if focused {
                if let Some(hint) = field_hint(field) {
                    lines.push(Line::from(Span::styled(format!("   {hint}"), theme::dim())));
                }
            }
            lines.push(Line::raw(""));
        }
        lines
    }

    fn review_lines(&self) -> Vec<Line<'_>> {
        let draft = self.draft();
        let mut lines = vec![Line::from(Span::styled("Review your campaign", theme::title())), Line::raw("")];

        for field in DraftField::ALL {
            let text = field_text(draft, field);
            let value = if text.is_empty() {
                if field.is_required() {
                    Span::styled("missing", theme::required_missing())
                } else {
                    Span::styled("-", theme::dim())
                }
            } else {
                Span::styled(text, Style::default().fg(theme::TEXT))
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<22}", field.label()), theme::muted()),
                value,
            ]));
        }

        lines.push(Line::raw(""));
        let missing = draft.missing_required();
        if self.submitting {
            lines.push(Line::from(Span::styled("  Submitting…", Style::default().fg(theme::INFO))));
        } else if missing.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  Press "),
                Span::styled("Ctrl+S", theme::key_hint()),
                Span::raw(" to submit for review"),
            ]));
        } else {
            lines.push(Line::from(Span::styled(
                format!("  {} required field(s) still empty", missing.len()),
                Style::default().fg(theme::WARNING).add_modifier(Modifier::ITALIC),
            )));
        }
        lines
    }

    fn hints(&self) -> Line<'static> {
        if self.submitting {
            return Line::from(Span::styled(" Waiting for the server; editing is paused", theme::dim()));
        }
        let mut spans = vec![
            Span::styled(" Tab", theme::key_hint()),
            Span::styled(" field  ", theme::dim()),
            Span::styled("PgDn/Ctrl+N", theme::key_hint()),
            Span::styled(" next  ", theme::dim()),
            Span::styled("PgUp/Esc", theme::key_hint()),
            Span::styled(" back", theme::dim()),
        ];
        if self.wizard.at_review() {
            spans.push(Span::styled("  Ctrl+S", theme::key_hint()));
            spans.push(Span::styled(" submit", theme::dim()));
        }
        Line::from(spans)
    }
}

/// Text shown for a field, whatever kind of value it holds.
fn field_text(draft: &CampaignDraft, field: DraftField) -> String {
    match draft.get_field(field) {
        None => String::new(),
        Some(FieldValue::Text(text)) => text.clone(),
        Some(FieldValue::Asset(asset)) => asset_label(asset),
        Some(FieldValue::Assets(assets)) => assets.iter().map(asset_label).collect::<Vec<_>>().join(", "),
        Some(FieldValue::Video(VideoSource::Url(url))) => url.clone(),
        Some(FieldValue::Video(VideoSource::Asset(asset))) => asset_label(asset),
    }
}

fn asset_label(asset: &AssetRef) -> String {
    match asset {
        AssetRef::File(path) => path.display().to_string(),
        AssetRef::Bytes { file_name, .. } => file_name.clone(),
    }
}

fn field_hint(field: DraftField) -> Option<String> {
    match field {
        DraftField::Category => Some(
            Category::ALL
                .iter()
                .map(|c| c.label())
                .collect::<Vec<_>>()
                .join(" | "),
        ),
        DraftField::Target => Some("Goal amount, e.g. 5000".into()),
        DraftField::Duration => Some("Days the campaign runs".into()),
        DraftField::Image => Some("Path to an image file".into()),
        DraftField::Video => Some("Video URL or path to a video file".into()),
        DraftField::Documents => Some("Paths separated by commas".into()),
        _ => None,
    }
}

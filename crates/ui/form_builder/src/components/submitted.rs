use color_eyre::Result;
use form::ValueMap;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::Paragraph,
};

use crate::{
    action::Action,
    components::{Component, draw_panel_frame},
    tui::Frame,
};

/// Shows the last submitted value map as indented JSON.
#[derive(Default)]
pub struct SubmittedPanel {
    last_submitted: Option<ValueMap>,
}

impl SubmittedPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_submitted(&self) -> Option<&ValueMap> {
        self.last_submitted.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.last_submitted.is_some()
    }

    fn body(&self) -> Option<String> {
        self.last_submitted.as_ref().map(ValueMap::to_pretty_json)
    }
}

impl Component for SubmittedPanel {
    fn height_constraint(&self) -> Constraint {
        match self.body() {
            // lines plus the border
            Some(body) => Constraint::Length(body.lines().count() as u16 + 2),
            None => Constraint::Length(0),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Action::FormSubmitted(values) = action {
            self.last_submitted = Some(values);
            return Ok(Some(Action::Update));
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let Some(body) = self.body() else {
            return Ok(());
        };
        if area.height < 3 {
            return Ok(());
        }
        let inner = draw_panel_frame(f, area, "Submitted Data");
        let lines: Vec<Line> = body
            .lines()
            .map(|l| Line::styled(l.to_string(), Style::default().fg(Color::Gray)))
            .collect();
        f.render_widget(Paragraph::new(Text::from(lines)), inner);
        Ok(())
    }
}

//! Interactive form component.
//!
//! Renders the view tree of a [`FormState`] as indented lines and turns key
//! presses into change events:
//! - Up/Down, Tab/BackTab, Home/End move focus between controls
//! - Enter on a text or email control starts editing; every keystroke while
//!   editing is one change event. Enter or Esc stops editing.
//! - Left/Right cycle a select, Space/Left/Right toggle a checkbox
//! - Ctrl+S, or Enter on any other control, submits
//! - Esc outside of editing quits

use std::collections::HashMap;

use color_eyre::Result;
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use form::{
    Binding, FieldEvent, FieldKind, FieldPath, FieldValue, FormState, InputType, Schema, ValueMap,
    ViewNode, ViolationKind, bindings, render,
};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::Paragraph,
};
use tracing::{debug, info, warn};
use tui_input::{Input, InputRequest, backend::crossterm::EventHandler};

use crate::{
    action::Action,
    components::{Component, draw_panel_frame},
    tui::Frame,
};

/// Receives the value map of every successful submission.
pub type SubmitHandler = Box<dyn FnMut(ValueMap)>;

type ControlKey = (FieldPath, String);

pub struct DynamicForm {
    title: String,
    state: FormState,
    on_submit: SubmitHandler,

    // UI state
    focused: usize,
    editing: bool,
    input: Input,
    errors: HashMap<ControlKey, ViolationKind>,
    scroll: u16,
}

impl DynamicForm {
    pub fn new(title: impl Into<String>, schema: Schema, on_submit: SubmitHandler) -> Self {
        Self {
            title: title.into(),
            state: FormState::new(schema),
            on_submit,
            focused: 0,
            editing: false,
            input: Input::default(),
            errors: HashMap::new(),
            scroll: 0,
        }
    }

    pub fn values(&self) -> &ValueMap {
        self.state.values()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    fn view(&self) -> Vec<ViewNode> {
        render(&self.state.schema().fields, &FieldPath::root(), self.state.values())
    }

    fn controls(&self) -> Vec<Binding> {
        bindings(&self.view())
    }

    fn focused_control(&self) -> Option<Binding> {
        self.controls().into_iter().nth(self.focused)
    }

    fn focus_next(&mut self) {
        let count = self.controls().len();
        if count == 0 {
            return;
        }
        self.focused = (self.focused + 1) % count;
    }

    fn focus_prev(&mut self) {
        let count = self.controls().len();
        if count == 0 {
            return;
        }
        if self.focused == 0 {
            self.focused = count - 1;
        } else {
            self.focused -= 1;
        }
    }

    fn text_of(&self, binding: &Binding) -> String {
        self.state
            .value_at(&binding.path, &binding.name)
            .and_then(FieldValue::as_text)
            .unwrap_or_default()
            .to_string()
    }

    fn checked_of(&self, binding: &Binding) -> bool {
        self.state
            .value_at(&binding.path, &binding.name)
            .and_then(FieldValue::as_checked)
            .unwrap_or(false)
    }

    /// Route one change event of `binding` into the form state.
    fn emit(&mut self, binding: &Binding, event: FieldEvent) {
        if let Err(err) = self
            .state
            .edit(&binding.path, &binding.name, &binding.kind, &event)
        {
            warn!(%err, field = %binding.name, "edit rejected");
            return;
        }
        self.errors
            .remove(&(binding.path.clone(), binding.name.clone()));
    }

    fn start_editing(&mut self, binding: &Binding) {
        self.editing = true;
        self.input = Input::default().with_value(self.text_of(binding));
    }

    fn stop_editing(&mut self) {
        self.editing = false;
        self.input = Input::default();
    }

    fn cycle_select(&mut self, binding: &Binding, options: &[String], dir: i32) {
        if options.is_empty() {
            return;
        }
        let len = options.len() as i32;
        let current = self.text_of(binding);
        let next = match options.iter().position(|o| *o == current) {
            Some(idx) => (idx as i32 + dir).rem_euclid(len) as usize,
            None if dir < 0 => options.len() - 1,
            None => 0,
        };
        self.emit(binding, FieldEvent::value(options[next].clone()));
    }

    fn toggle_checkbox(&mut self, binding: &Binding) {
        let checked = !self.checked_of(binding);
        self.emit(binding, FieldEvent::checked(checked));
    }

    /// Run the input constraints and hand the values to the submit handler.
    fn submit(&mut self) -> Option<Action> {
        self.stop_editing();
        match self.state.submit() {
            Ok(values) => {
                self.errors.clear();
                info!(fields = values.len(), "form submitted");
                (self.on_submit)(values);
            }
            Err(violations) => {
                debug!(count = violations.len(), "submission blocked");
                self.errors = violations
                    .iter()
                    .map(|v| ((v.path.clone(), v.name.clone()), v.kind))
                    .collect();
                if let Some(first) = violations.first() {
                    let controls = self.controls();
                    if let Some(idx) = controls
                        .iter()
                        .position(|b| b.path == first.path && b.name == first.name)
                    {
                        self.focused = idx;
                    }
                }
            }
        }
        Some(Action::Update)
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.stop_editing(),
            _ => {
                let changed = self
                    .input
                    .handle_event(&CrosstermEvent::Key(key))
                    .is_some_and(|change| change.value);
                if changed {
                    self.emit_input();
                }
            }
        }
        Some(Action::Update)
    }

    fn emit_input(&mut self) {
        if let Some(binding) = self.focused_control() {
            self.emit(&binding, FieldEvent::value(self.input.value()));
        }
    }

    fn draw_lines(&self) -> (Vec<Line<'static>>, usize) {
        let mut painter = Painter {
            form: self,
            lines: Vec::new(),
            control_idx: 0,
            focused_line: 0,
        };
        painter.nodes(&self.view(), 0);
        (painter.lines, painter.focused_line)
    }
}

/// Walks the view tree once and emits styled lines.
struct Painter<'a> {
    form: &'a DynamicForm,
    lines: Vec<Line<'static>>,
    control_idx: usize,
    focused_line: usize,
}

impl Painter<'_> {
    fn nodes(&mut self, nodes: &[ViewNode], depth: usize) {
        for node in nodes {
            self.node(node, depth);
        }
    }

    fn indent(depth: usize) -> Span<'static> {
        Span::styled("│ ".repeat(depth), Style::default().fg(Color::DarkGray))
    }

    fn node(&mut self, node: &ViewNode, depth: usize) {
        let ViewNode::Section {
            label, children, ..
        } = node
        else {
            self.leaf(node, depth);
            return;
        };
        self.lines.push(Line::from(vec![
            Self::indent(depth),
            Span::styled(
                label.clone(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        self.nodes(children, depth + 1);
        self.lines.push(Line::from(Self::indent(depth)));
    }

    fn leaf(&mut self, node: &ViewNode, depth: usize) {
        let focused = self.control_idx == self.form.focused;
        self.control_idx += 1;
        if focused {
            self.focused_line = self.lines.len();
        }

        let label_style = Style::default().fg(Color::White).add_modifier(if focused {
            Modifier::BOLD
        } else {
            Modifier::empty()
        });
        let value_style = if focused {
            Style::default().fg(Color::Black).bg(Color::White)
        } else {
            Style::default().fg(Color::Cyan)
        };

        let mut spans = vec![Self::indent(depth)];
        match node {
            ViewNode::Input {
                label,
                input_type,
                required,
                value,
                ..
            } => {
                let marker = if *required { "*" } else { "" };
                spans.push(Span::styled(format!("{label}{marker}: "), label_style));
                if focused && self.form.editing {
                    spans.extend(editing_spans(&self.form.input, value_style));
                } else {
                    spans.push(Span::styled(format!("[{value}]"), value_style));
                }
                if *input_type == InputType::Email {
                    spans.push(Span::styled(" @", Style::default().fg(Color::DarkGray)));
                }
            }
            ViewNode::Select {
                label,
                options,
                selected,
                ..
            } => {
                spans.push(Span::styled(format!("{label}: "), label_style));
                let shown = if selected.is_empty() {
                    "--".to_string()
                } else {
                    selected.clone()
                };
                spans.push(Span::styled(format!("< {shown} >"), value_style));
                spans.push(Span::styled(
                    format!("  {}", options.join(" | ")),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ViewNode::Checkbox { label, checked, .. } => {
                let mark = if *checked { "[x]" } else { "[ ]" };
                spans.push(Span::styled(mark, value_style));
                spans.push(Span::styled(format!(" {label}"), label_style));
            }
            ViewNode::Section { .. } => {}
        }
        self.lines.push(Line::from(spans));

        if let Some(binding) = node.binding() {
            let key = (binding.path.clone(), binding.name.clone());
            if let Some(kind) = self.form.errors.get(&key) {
                self.lines.push(Line::from(vec![
                    Self::indent(depth),
                    Span::styled(format!("  ! {}", kind.message()), Style::default().fg(Color::Red)),
                ]));
            }
        }
    }
}

/// Input value with a block cursor at the editing position.
fn editing_spans(input: &Input, style: Style) -> Vec<Span<'static>> {
    let value = input.value();
    let cursor = input.cursor();
    let split = value
        .char_indices()
        .nth(cursor)
        .map(|(i, _)| i)
        .unwrap_or(value.len());
    let (before, after) = value.split_at(split);
    let mut rest = after.chars();
    let under_cursor = rest.next().map(String::from).unwrap_or_else(|| " ".into());
    vec![
        Span::styled(format!("[{before}"), style),
        Span::styled(under_cursor, style.add_modifier(Modifier::REVERSED)),
        Span::styled(format!("{}]", rest.as_str()), style),
    ]
}

impl Component for DynamicForm {
    fn height_constraint(&self) -> Constraint {
        Constraint::Min(8)
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return Ok(Some(Action::Submit));
        }

        if self.editing {
            return Ok(self.handle_editing_key(key));
        }

        let update = Some(Action::Update);
        match key.code {
            KeyCode::Up | KeyCode::BackTab => {
                self.focus_prev();
                return Ok(update);
            }
            KeyCode::Down | KeyCode::Tab => {
                self.focus_next();
                return Ok(update);
            }
            KeyCode::Home => {
                self.focused = 0;
                return Ok(update);
            }
            KeyCode::End => {
                self.focused = self.controls().len().saturating_sub(1);
                return Ok(update);
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
                if let Some(binding) = self.focused_control() {
                    match &binding.kind {
                        FieldKind::Checkbox => {
                            self.toggle_checkbox(&binding);
                            return Ok(update);
                        }
                        FieldKind::Select { options } if key.code != KeyCode::Char(' ') => {
                            let dir = if key.code == KeyCode::Left { -1 } else { 1 };
                            self.cycle_select(&binding, options, dir);
                            return Ok(update);
                        }
                        _ => {}
                    }
                }
            }
            KeyCode::Enter => {
                if let Some(binding) = self.focused_control() {
                    if binding.kind.is_textual() {
                        self.start_editing(&binding);
                        return Ok(update);
                    }
                }
                return Ok(Some(Action::Submit));
            }
            KeyCode::Esc => return Ok(Some(Action::Quit)),
            _ => {}
        }
        Ok(None)
    }

    fn handle_paste(&mut self, text: String) -> Result<Option<Action>> {
        if !self.editing {
            return Ok(None);
        }
        for c in text.chars().filter(|c| !c.is_control()) {
            self.input.handle(InputRequest::InsertChar(c));
        }
        self.emit_input();
        Ok(Some(Action::Update))
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Submit => Ok(self.submit()),
            _ => Ok(None),
        }
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let inner = draw_panel_frame(f, area, &self.title);
        let [body, footer] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);

        let (lines, focused_line) = self.draw_lines();
        let visible = body.height.max(1) as usize;
        let focused_line = focused_line as u16;
        if focused_line < self.scroll {
            self.scroll = focused_line;
        } else if focused_line as usize >= self.scroll as usize + visible {
            self.scroll = focused_line + 1 - visible as u16;
        }

        // one line per row, so line indices are row offsets
        let para = Paragraph::new(Text::from(lines)).scroll((self.scroll, 0));
        f.render_widget(para, body);

        let hints = if self.editing {
            vec![
                Span::styled("Enter/Esc", Style::default().fg(Color::White)),
                Span::raw(": Done editing   "),
                Span::styled("Ctrl+S", Style::default().fg(Color::White)),
                Span::raw(": Submit"),
            ]
        } else {
            vec![
                Span::styled("Up/Down", Style::default().fg(Color::White)),
                Span::raw(": Navigate   "),
                Span::styled("Enter", Style::default().fg(Color::White)),
                Span::raw(": Edit/Submit   "),
                Span::styled("Left/Right/Space", Style::default().fg(Color::White)),
                Span::raw(": Select/Toggle   "),
                Span::styled("Ctrl+S", Style::default().fg(Color::White)),
                Span::raw(": Submit   "),
                Span::styled("Esc", Style::default().fg(Color::White)),
                Span::raw(": Quit"),
            ]
        };
        f.render_widget(Paragraph::new(Line::from(hints).fg(Color::DarkGray)), footer);
        Ok(())
    }
}

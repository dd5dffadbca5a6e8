use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Frame, layout::Layout, prelude::Rect};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info};

use crate::{
    action::Action,
    components::{Component, form::DynamicForm, submitted::SubmittedPanel},
    config::Config,
    schema_file::SchemaDocument,
    tui::{Event, Tui},
};

/// Hosts the form and shows whatever it submitted beneath it.
pub struct App {
    pub config: Config,
    pub form: DynamicForm,
    pub submitted: SubmittedPanel,
    pub should_quit: bool,
    pub should_suspend: bool,
    action_tx: UnboundedSender<Action>,
    action_rx: UnboundedReceiver<Action>,
}

impl App {
    pub fn new(config: Config, document: SchemaDocument) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel::<Action>();
        let submit_tx = action_tx.clone();
        let form = DynamicForm::new(
            document.title,
            document.schema,
            Box::new(move |values| {
                if submit_tx.send(Action::FormSubmitted(values)).is_err() {
                    error!("action channel closed, submission dropped");
                }
            }),
        );
        Self {
            config,
            form,
            submitted: SubmittedPanel::new(),
            should_quit: false,
            should_suspend: false,
            action_tx,
            action_rx,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?
            .tick_rate(self.config.tick_rate)
            .frame_rate(self.config.frame_rate)
            .paste(true);
        tui.enter()?;

        self.form.init()?;
        self.submitted.init()?;

        loop {
            if let Some(e) = tui.next().await {
                self.handle_event(e)?;
            }

            while let Ok(action) = self.action_rx.try_recv() {
                if action != Action::Tick && action != Action::Render {
                    log::debug!("{action:?}");
                }
                match action {
                    Action::Quit => self.should_quit = true,
                    Action::Suspend => self.should_suspend = true,
                    Action::Resume => self.should_suspend = false,
                    Action::Error(ref msg) => error!("{msg}"),
                    Action::Resize(w, h) => {
                        tui.resize(Rect::new(0, 0, w, h))?;
                        self.draw(&mut tui)?;
                    }
                    Action::Render => self.draw(&mut tui)?,
                    _ => {}
                }
                self.dispatch(action)?;
            }

            if self.should_suspend {
                tui.suspend()?;
                self.action_tx.send(Action::Resume)?;
                tui = Tui::new()?
                    .tick_rate(self.config.tick_rate)
                    .frame_rate(self.config.frame_rate)
                    .paste(true);
                tui.resume()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        info!("form builder closed");
        Ok(())
    }

    /// Global keys first, then the form; the submitted panel only listens to actions.
    fn handle_event(&mut self, e: Event) -> Result<()> {
        match e {
            Event::Tick => return Ok(self.action_tx.send(Action::Tick)?),
            Event::Render => return Ok(self.action_tx.send(Action::Render)?),
            Event::Resize(x, y) => return Ok(self.action_tx.send(Action::Resize(x, y))?),
            Event::Error(msg) => {
                return Ok(self.action_tx.send(Action::Error(format!("terminal event: {msg}")))?);
            }
            Event::Key(key) => {
                if let Some(action) = global_action(key) {
                    return Ok(self.action_tx.send(action)?);
                }
            }
            _ => {}
        }

        if let Some(action) = self.form.handle_events(e)? {
            self.action_tx.send(action)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, action: Action) -> Result<()> {
        if let Some(next) = self.form.update(action.clone())? {
            self.action_tx.send(next)?;
        }
        if let Some(next) = self.submitted.update(action)? {
            self.action_tx.send(next)?;
        }
        Ok(())
    }

    fn draw(&mut self, tui: &mut Tui) -> Result<()> {
        let action_tx = self.action_tx.clone();
        tui.draw(|f| {
            if let Err(err) = self.render(f) {
                let _ = action_tx.send(Action::Error(format!("Failed to draw: {err:?}")));
            }
        })?;
        Ok(())
    }

    fn render(&mut self, f: &mut Frame<'_>) -> Result<()> {
        let [form_area, submitted_area] = Layout::vertical([
            self.form.height_constraint(),
            self.submitted.height_constraint(),
        ])
        .areas(f.area());
        self.form.draw(f, form_area)?;
        self.submitted.draw(f, submitted_area)?;
        Ok(())
    }
}

fn global_action(key: KeyEvent) -> Option<Action> {
    if !key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Char('c') => Some(Action::Quit),
        KeyCode::Char('z') => Some(Action::Suspend),
        _ => None,
    }
}

use form::ValueMap;
use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, PartialEq, Serialize, Display, Deserialize)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    Error(String),
    /// Ask the form to run its constraints and submit.
    Submit,
    /// Something changed; redraw on the next render tick.
    Update,
    /// A submission passed its constraints; carries the value map snapshot.
    FormSubmitted(ValueMap),
}

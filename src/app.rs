//! Demo application state and key handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use formstore::{
    ChangeStateAction, Field, FieldValue, FormConfig, FormStore, ReadField, Submit, SubmitOutcome,
    Subscription, Values,
};
use serde_json::json;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Main application struct
pub struct App {
    /// The form being edited
    pub store: FormStore,
    /// One binding per field, in display order
    pub fields: Vec<Field>,
    /// Index of the focused field
    pub active_field_index: usize,
    /// Read-only projection of every field, for the summary line
    pub summary: ReadField,
    /// How often each field has been re-rendered
    pub render_counts: Rc<RefCell<HashMap<String, usize>>>,
    /// Feedback from the last submit/reset/clear
    pub status_message: Option<String>,
    /// Payload of the last successful submit
    pub last_submitted: Option<String>,
    _subscriptions: Vec<Subscription>,
    quit: bool,
}

impl App {
    pub fn new() -> Result<Self> {
        let config = FormConfig::load()?;
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: FormConfig) -> Self {
        let mut ids: Vec<String> = config.initial_values.keys().cloned().collect();
        ids.sort();
        let store = config.into_store();

        let fields: Vec<Field> = ids.iter().map(|id| Field::new(&store, id.as_str())).collect();
        let render_counts = Rc::new(RefCell::new(HashMap::new()));
        let subscriptions = fields
            .iter()
            .map(|field| {
                let counts = Rc::clone(&render_counts);
                field.watch(move |props| {
                    *counts
                        .borrow_mut()
                        .entry(props.id().to_string())
                        .or_insert(0) += 1;
                })
            })
            .collect();

        Self {
            summary: ReadField::new(&store, ids),
            store,
            fields,
            active_field_index: 0,
            render_counts,
            status_message: None,
            last_submitted: None,
            _subscriptions: subscriptions,
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn active_field(&self) -> Option<&Field> {
        self.fields.get(self.active_field_index)
    }

    pub fn next_field(&mut self) {
        let count = self.fields.len();
        if count > 0 {
            self.active_field_index = (self.active_field_index + 1) % count;
        }
    }

    pub fn prev_field(&mut self) {
        let count = self.fields.len();
        if count == 0 {
            return;
        }
        if self.active_field_index == 0 {
            self.active_field_index = count - 1;
        } else {
            self.active_field_index -= 1;
        }
    }

    pub fn render_count(&self, id: &str) -> usize {
        self.render_counts.borrow().get(id).copied().unwrap_or(0)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if ctrl => self.quit = true,
            KeyCode::Char('r') if ctrl => {
                self.store.reset();
                self.status_message = Some("Form reset".to_string());
            }
            KeyCode::Char('l') if ctrl => {
                self.store.clear();
                self.status_message = Some("Form cleared".to_string());
            }
            KeyCode::Char('s') if ctrl => self.submit()?,
            KeyCode::Enter => self.submit()?,
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.prev_field(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Char(c) if !ctrl => self.input_char(c),
            _ => {}
        }
        Ok(())
    }

    fn input_char(&self, c: char) {
        let Some(field) = self.active_field() else {
            return;
        };
        match field.value() {
            FieldValue::Bool(_) => {
                if c == ' ' {
                    field.change_value(ChangeStateAction::update(|prev| {
                        json!(!prev.as_bool().unwrap_or(false))
                    }));
                }
            }
            FieldValue::Number(_) => {
                if let Some(digit) = c.to_digit(10) {
                    field.change_value(ChangeStateAction::update(move |prev| {
                        let n = prev.as_i64().unwrap_or(0);
                        json!(n.saturating_mul(10).saturating_add(i64::from(digit)))
                    }));
                }
            }
            FieldValue::Null | FieldValue::String(_) => {
                field.change_value(ChangeStateAction::update(move |prev| {
                    let mut text = prev.as_str().unwrap_or("").to_string();
                    text.push(c);
                    json!(text)
                }));
            }
            // Lists and objects are not editable from the keyboard
            _ => {}
        }
    }

    fn backspace(&self) {
        let Some(field) = self.active_field() else {
            return;
        };
        match field.value() {
            FieldValue::String(_) => field.change_value(ChangeStateAction::update(|prev| {
                let mut text = prev.as_str().unwrap_or("").to_string();
                text.pop();
                json!(text)
            })),
            FieldValue::Number(_) => field.change_value(ChangeStateAction::update(|prev| {
                json!(prev.as_i64().unwrap_or(0) / 10)
            })),
            _ => {}
        }
    }

    fn submit(&mut self) -> Result<()> {
        let outcome = Submit::new(&self.store, |values: &Values| serde_json::to_string(values))
            .submit();
        match outcome {
            SubmitOutcome::Submitted(payload) => {
                self.last_submitted = Some(payload?);
                self.status_message = Some("Submitted!".to_string());
            }
            SubmitOutcome::Rejected(errors) => {
                self.status_message = Some(format!("Fix {} field(s) before submitting", errors.len()));
            }
        }
        Ok(())
    }
}

/// Display text for a field value
pub fn display_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => String::new(),
        FieldValue::String(s) => s.clone(),
        FieldValue::Bool(true) => "[x]".to_string(),
        FieldValue::Bool(false) => "[ ]".to_string(),
        other => other.to_string(),
    }
}

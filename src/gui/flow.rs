//! Popup state machine
//!
//! Hidden → label selection → text input → hidden. No drawing happens here;
//! the app maps each [`ViewChange`] onto viewport commands.

use tracing::error;

use crate::constants::gui::LABEL_WINDOW_TITLE;
use crate::gui::input_window::{InputForm, InputStatus, SubmitOutcome};
use crate::gui::label_window::{LabelAction, LabelSelection};
use crate::input::TriggerSource;
use crate::logger::Logger;

#[derive(Debug, Clone)]
pub enum Screen {
    Hidden,
    Labels,
    Input(InputForm),
}

/// What the window has to do after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewChange {
    None,
    ShowLabels,
    ShowInput { title: String },
    Hide,
    /// Popup already open; bring it back to the front
    Refocus,
}

pub struct PopupFlow {
    screen: Screen,
    labels: LabelSelection,
    last_error: Option<String>,
}

impl PopupFlow {
    pub fn new(labels: LabelSelection) -> Self {
        Self {
            screen: Screen::Hidden,
            labels,
            last_error: None,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self.screen, Screen::Hidden)
    }

    /// Window title for the current screen
    pub fn title(&self) -> Option<String> {
        match &self.screen {
            Screen::Hidden => None,
            Screen::Labels => Some(LABEL_WINDOW_TITLE.to_string()),
            Screen::Input(form) => Some(form.title()),
        }
    }

    /// Last log write failure, shown under the input line until the next transition
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn labels_mut(&mut self) -> &mut LabelSelection {
        &mut self.labels
    }

    /// Split borrow for rendering the input screen
    pub fn input_form_mut(&mut self) -> Option<&mut InputForm> {
        match &mut self.screen {
            Screen::Input(form) => Some(form),
            _ => None,
        }
    }

    pub fn on_trigger(&mut self, source: TriggerSource, logger: &Logger) -> ViewChange {
        if self.is_visible() {
            logger.debug(&format!("Trigger from {source:?} while popup open, refocusing"));
            return ViewChange::Refocus;
        }

        self.labels.discard_edits();
        self.last_error = None;
        self.screen = Screen::Labels;
        logger.info("Label Selection Window initialized");
        ViewChange::ShowLabels
    }

    pub fn on_label_action(&mut self, action: LabelAction, logger: &Logger) -> ViewChange {
        if !matches!(self.screen, Screen::Labels) {
            return ViewChange::None;
        }

        match action {
            LabelAction::Selected(label) => {
                logger.info(&format!("Label selected: {label}"));
                let form = InputForm::new(Some(label));
                logger.info(&format!(
                    "Input Window initialized with label: {}",
                    form.label().unwrap_or("None")
                ));
                let title = form.title();
                self.screen = Screen::Input(form);
                ViewChange::ShowInput { title }
            }
            LabelAction::Cancelled => {
                logger.info("Label selection canceled");
                self.screen = Screen::Hidden;
                ViewChange::Hide
            }
            LabelAction::Ignored => ViewChange::None,
        }
    }

    pub fn on_submit(&mut self, logger: &Logger) -> ViewChange {
        let Screen::Input(form) = &mut self.screen else {
            return ViewChange::None;
        };

        let outcome = form.submit(logger);
        if form.status() == InputStatus::Submitted {
            self.last_error = None;
            self.screen = Screen::Hidden;
            return ViewChange::Hide;
        }

        match outcome {
            SubmitOutcome::Logged | SubmitOutcome::Empty => ViewChange::None,
            SubmitOutcome::Failed(err) => {
                error!(error = %err, kind = err.kind(), "Failed to record input");
                logger.error(&format!("Error handling submission: {err}"));
                self.last_error = Some(err.to_string());
                ViewChange::None
            }
        }
    }

    pub fn on_input_cancel(&mut self, logger: &Logger) -> ViewChange {
        let Screen::Input(form) = &self.screen else {
            return ViewChange::None;
        };

        form.cancel(logger);
        self.last_error = None;
        self.screen = Screen::Hidden;
        ViewChange::Hide
    }

    /// Window manager close button: behaves like Escape on the current screen
    pub fn on_close_requested(&mut self, logger: &Logger) -> ViewChange {
        match self.screen {
            Screen::Hidden => ViewChange::None,
            Screen::Labels => {
                let action = self.labels.handle_key(eframe::egui::Key::Escape);
                self.on_label_action(action, logger)
            }
            Screen::Input(_) => self.on_input_cancel(logger),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::Key;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Logger, PopupFlow) {
        let dir = TempDir::new().unwrap();
        let logger = Logger::open(dir.path()).unwrap();
        let flow = PopupFlow::new(LabelSelection::from_labels([("1", "A"), ("2", "B")]));
        (dir, logger, flow)
    }

    fn select(flow: &mut PopupFlow, key: Key, logger: &Logger) -> ViewChange {
        let action = flow.labels_mut().handle_key(key);
        flow.on_label_action(action, logger)
    }

    #[test]
    fn test_full_flow_logs_input() {
        let (_dir, logger, mut flow) = setup();

        assert_eq!(flow.on_trigger(TriggerSource::Hotkey, &logger), ViewChange::ShowLabels);
        assert_eq!(flow.title().as_deref(), Some("Select a Label"));

        assert_eq!(
            select(&mut flow, Key::Num1, &logger),
            ViewChange::ShowInput {
                title: "User Input - A".into()
            }
        );

        flow.input_form_mut().unwrap().text = "hello".into();
        assert_eq!(flow.on_submit(&logger), ViewChange::Hide);
        assert!(!flow.is_visible());

        let inputs = fs::read_to_string(logger.inputs_path()).unwrap();
        assert!(inputs.contains("hello"));
        assert!(inputs.contains("Label: A"));

        let general = fs::read_to_string(logger.general_path()).unwrap();
        assert!(general.contains("Label selected: A"));
        assert!(general.contains("User input: hello, Label: A"));
    }

    #[test]
    fn test_empty_submit_keeps_input_open() {
        let (_dir, logger, mut flow) = setup();
        flow.on_trigger(TriggerSource::Tray, &logger);
        select(&mut flow, Key::Num2, &logger);

        assert_eq!(flow.on_submit(&logger), ViewChange::None);
        assert!(matches!(flow.screen(), Screen::Input(_)));
        assert!(fs::read_to_string(logger.inputs_path()).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_write_keeps_input_open() {
        let dir = TempDir::new().unwrap();
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        std::os::unix::fs::symlink("/dev/full", dir.path().join("inputs_20240101.log")).unwrap();
        let logger = Logger::open_for_date(dir.path(), date).unwrap();
        let mut flow = PopupFlow::new(LabelSelection::from_labels([("1", "A")]));

        flow.on_trigger(TriggerSource::Hotkey, &logger);
        select(&mut flow, Key::Num1, &logger);
        flow.input_form_mut().unwrap().text = "hello".into();

        assert_eq!(flow.on_submit(&logger), ViewChange::None);
        assert!(flow.last_error().is_some());
        let form = flow.input_form_mut().unwrap();
        assert_eq!(form.text, "hello");
        assert_eq!(form.status(), InputStatus::Idle);

        let general = fs::read_to_string(logger.general_path()).unwrap();
        assert!(general.contains("Error handling submission"));
        assert!(!general.contains("User input"));
    }

    #[test]
    fn test_escape_on_labels_logs_cancel_only() {
        let (_dir, logger, mut flow) = setup();
        flow.on_trigger(TriggerSource::Hotkey, &logger);

        assert_eq!(select(&mut flow, Key::Escape, &logger), ViewChange::Hide);

        let general = fs::read_to_string(logger.general_path()).unwrap();
        assert!(general.contains("Label selection canceled"));
        assert!(!general.contains("Label selected"));
        assert!(fs::read_to_string(logger.inputs_path()).unwrap().is_empty());
    }

    #[test]
    fn test_escape_on_input_never_submits() {
        let (_dir, logger, mut flow) = setup();
        flow.on_trigger(TriggerSource::Hotkey, &logger);
        select(&mut flow, Key::Num1, &logger);
        flow.input_form_mut().unwrap().text = "typed".into();

        assert_eq!(flow.on_input_cancel(&logger), ViewChange::Hide);

        let general = fs::read_to_string(logger.general_path()).unwrap();
        assert!(general.contains("Input window closed"));
        assert!(!general.contains("User input"));
        assert!(fs::read_to_string(logger.inputs_path()).unwrap().is_empty());
    }

    #[test]
    fn test_trigger_while_open_keeps_state() {
        let (_dir, logger, mut flow) = setup();
        flow.on_trigger(TriggerSource::Hotkey, &logger);
        select(&mut flow, Key::Num1, &logger);
        flow.input_form_mut().unwrap().text = "half written".into();

        assert_eq!(flow.on_trigger(TriggerSource::Hotkey, &logger), ViewChange::Refocus);
        assert_eq!(flow.input_form_mut().unwrap().text, "half written");
    }

    #[test]
    fn test_close_request_acts_like_escape() {
        let (_dir, logger, mut flow) = setup();
        assert_eq!(flow.on_close_requested(&logger), ViewChange::None);

        flow.on_trigger(TriggerSource::Hotkey, &logger);
        assert_eq!(flow.on_close_requested(&logger), ViewChange::Hide);

        flow.on_trigger(TriggerSource::Hotkey, &logger);
        select(&mut flow, Key::Num2, &logger);
        assert_eq!(flow.on_close_requested(&logger), ViewChange::Hide);
        assert!(fs::read_to_string(logger.inputs_path()).unwrap().is_empty());
    }

    #[test]
    fn test_reopen_discards_unsaved_label_edits() {
        let (_dir, logger, mut flow) = setup();
        flow.on_trigger(TriggerSource::Hotkey, &logger);
        flow.labels_mut().toggle_edit();
        assert_eq!(flow.on_close_requested(&logger), ViewChange::Hide);

        flow.on_trigger(TriggerSource::Hotkey, &logger);
        assert_eq!(
            select(&mut flow, Key::Num1, &logger),
            ViewChange::ShowInput {
                title: "User Input - A".into()
            }
        );
    }

    #[test]
    fn test_actions_outside_their_screen_are_ignored() {
        let (_dir, logger, mut flow) = setup();
        assert_eq!(flow.on_submit(&logger), ViewChange::None);
        assert_eq!(flow.on_input_cancel(&logger), ViewChange::None);
        assert_eq!(
            flow.on_label_action(LabelAction::Selected("A".into()), &logger),
            ViewChange::None
        );
    }
}

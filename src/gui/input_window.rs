//! Text input screen
//!
//! A single borderless line with a trailing Enter glyph and a live clock.
//! Enter submits the text to the inputs log; Escape closes without logging.

use chrono::{DateTime, Local};
use eframe::egui::{self, RichText};

use crate::constants::gui::{
    CLOCK_FORMAT, CLOCK_WIDTH, ENTER_GLYPH, INPUT_PADDING, INPUT_PLACEHOLDER, INPUT_WINDOW_TITLE,
    TRAILING_SPACER,
};
use crate::error::AppError;
use crate::gui::style::Theme;
use crate::logger::Logger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputStatus {
    Idle,
    Submitted,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Text went to the inputs log; the window should close
    Logged,
    /// Nothing to log; the window stays open
    Empty,
    /// The inputs log could not be written; text is kept for another try
    Failed(AppError),
}

/// What the user did on this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Submit,
    Cancel,
    None,
}

#[derive(Debug, Clone)]
pub struct InputForm {
    label: Option<String>,
    pub text: String,
    status: InputStatus,
}

impl InputForm {
    pub fn new(label: Option<String>) -> Self {
        Self {
            label: label.filter(|l| !l.is_empty()),
            text: String::new(),
            status: InputStatus::Idle,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn status(&self) -> InputStatus {
        self.status
    }

    pub fn title(&self) -> String {
        match &self.label {
            Some(label) => format!("{INPUT_WINDOW_TITLE} - {label}"),
            None => INPUT_WINDOW_TITLE.to_string(),
        }
    }

    pub fn submit(&mut self, logger: &Logger) -> SubmitOutcome {
        if self.text.is_empty() {
            logger.warning("Empty text submitted");
            return SubmitOutcome::Empty;
        }

        match logger.log_input(&self.text, self.label()) {
            Ok(()) => {
                self.text.clear();
                self.status = InputStatus::Submitted;
                SubmitOutcome::Logged
            }
            Err(err) => SubmitOutcome::Failed(err),
        }
    }

    pub fn cancel(&self, logger: &Logger) {
        logger.info("Input window closed");
    }
}

pub fn clock_text(now: DateTime<Local>) -> String {
    now.format(CLOCK_FORMAT).to_string()
}

/// Draw the input line. `request_focus` puts the caret in the field.
pub fn ui(ui: &mut egui::Ui, form: &mut InputForm, theme: &Theme, request_focus: bool) -> InputAction {
    let escape = ui.input(|i| i.key_pressed(egui::Key::Escape));
    if escape {
        return InputAction::Cancel;
    }

    let font = egui::FontId::proportional(theme.font_normal);
    let mut action = InputAction::None;

    ui.horizontal_centered(|ui| {
        let trailing = CLOCK_WIDTH + TRAILING_SPACER + theme.font_normal * 1.5;
        let field_width = (ui.available_width() - trailing).max(CLOCK_WIDTH);

        let response = ui.add(
            egui::TextEdit::singleline(&mut form.text)
                .font(font.clone())
                .text_color(theme.text)
                .hint_text(RichText::new(INPUT_PLACEHOLDER).color(theme.text.gamma_multiply(0.5)))
                .frame(false)
                .margin(egui::Margin::same(INPUT_PADDING))
                .desired_width(field_width),
        );
        if request_focus {
            response.request_focus();
        }
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            // Enter drops focus; keep the caret here in case the window stays open
            response.request_focus();
            action = InputAction::Submit;
        }

        ui.label(RichText::new(ENTER_GLYPH).font(font.clone()).color(theme.text));
        ui.add_space(TRAILING_SPACER);
        ui.allocate_ui(egui::vec2(CLOCK_WIDTH, ui.available_height()), |ui| {
            ui.label(
                RichText::new(clock_text(Local::now()))
                    .font(font)
                    .color(theme.text),
            );
        });
    });

    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    fn logger() -> (TempDir, Logger) {
        let dir = TempDir::new().unwrap();
        let logger = Logger::open(dir.path()).unwrap();
        (dir, logger)
    }

    #[test]
    fn test_title_includes_label() {
        assert_eq!(InputForm::new(None).title(), "User Input");
        assert_eq!(InputForm::new(Some(String::new())).title(), "User Input");
        assert_eq!(
            InputForm::new(Some("Snack".into())).title(),
            "User Input - Snack"
        );
    }

    #[test]
    fn test_submit_logs_and_clears() {
        let (_dir, logger) = logger();
        let mut form = InputForm::new(Some("A".into()));
        form.text = "hello".into();

        assert!(matches!(form.submit(&logger), SubmitOutcome::Logged));
        assert!(form.text.is_empty());
        assert_eq!(form.status(), InputStatus::Submitted);

        let inputs = fs::read_to_string(logger.inputs_path()).unwrap();
        assert_eq!(inputs.lines().count(), 1);
        assert!(inputs.contains("Input: hello, Label: A"));
    }

    #[test]
    fn test_empty_submit_warns_only() {
        let (_dir, logger) = logger();
        let mut form = InputForm::new(Some("A".into()));

        assert!(matches!(form.submit(&logger), SubmitOutcome::Empty));
        assert_eq!(form.status(), InputStatus::Idle);

        let inputs = fs::read_to_string(logger.inputs_path()).unwrap();
        assert!(inputs.is_empty());
        let general = fs::read_to_string(logger.general_path()).unwrap();
        assert!(general.contains(" - WARNING - Empty text submitted"));
    }

    #[test]
    fn test_whitespace_counts_as_text() {
        let (_dir, logger) = logger();
        let mut form = InputForm::new(None);
        form.text = "   ".into();

        assert!(matches!(form.submit(&logger), SubmitOutcome::Logged));
        let inputs = fs::read_to_string(logger.inputs_path()).unwrap();
        assert!(inputs.contains("Input:    "));
        assert!(!inputs.contains("Label:"));
    }

    #[test]
    fn test_cancel_never_writes_inputs_log() {
        let (_dir, logger) = logger();
        let mut form = InputForm::new(Some("A".into()));
        form.text = "draft".into();
        form.cancel(&logger);

        assert!(fs::read_to_string(logger.inputs_path()).unwrap().is_empty());
        let general = fs::read_to_string(logger.general_path()).unwrap();
        assert!(general.contains(" - INFO - Input window closed"));
    }

    #[test]
    fn test_clock_text_is_hours_and_minutes() {
        let now = Local.with_ymd_and_hms(2024, 6, 15, 7, 5, 59).single().unwrap();
        assert_eq!(clock_text(now), "07:05");
    }
}

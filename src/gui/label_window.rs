//! Label selection screen
//!
//! Shows one column per configured label with its shortcut key. In view mode
//! a shortcut press selects the label; the Edit/Save toggle lets the user
//! rename labels for the rest of the session.

use std::collections::HashMap;

use eframe::egui::{self, Key, RichText};
use tracing::warn;

use crate::constants::gui::{LABEL_COLUMN_SPACING, LABEL_PROMPT};
use crate::gui::style::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMode {
    View,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelAction {
    Selected(String),
    Cancelled,
    Ignored,
}

#[derive(Debug, Clone)]
struct LabelOption {
    key: Key,
    shortcut: String,
    text: String,
    draft: String,
}

#[derive(Debug, Clone)]
pub struct LabelSelection {
    options: Vec<LabelOption>,
    mode: LabelMode,
}

impl LabelSelection {
    /// Build from `(shortcut, text)` pairs. Shortcuts that don't name a key,
    /// or repeat an earlier one, are skipped.
    pub fn from_labels<I, K, V>(labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut options: Vec<LabelOption> = Vec::new();

        for (shortcut, text) in labels {
            let shortcut = shortcut.as_ref().trim();
            let Some(key) = key_for_shortcut(shortcut) else {
                warn!(shortcut = %shortcut, "Label shortcut is not a usable key, skipping");
                continue;
            };
            if options.iter().any(|o| o.key == key) {
                warn!(shortcut = %shortcut, "Duplicate label shortcut, skipping");
                continue;
            }

            let text = text.into();
            options.push(LabelOption {
                key,
                shortcut: shortcut.to_string(),
                draft: text.clone(),
                text,
            });
        }

        Self {
            options,
            mode: LabelMode::View,
        }
    }

    /// Shortcut key → current label text
    pub fn keymap(&self) -> HashMap<Key, String> {
        self.options
            .iter()
            .map(|o| (o.key, o.text.clone()))
            .collect()
    }

    pub fn mode(&self) -> LabelMode {
        self.mode
    }

    /// View → Edit unlocks every field; Edit → View commits the drafts
    pub fn toggle_edit(&mut self) {
        match self.mode {
            LabelMode::View => {
                for option in &mut self.options {
                    option.draft = option.text.clone();
                }
                self.mode = LabelMode::Edit;
            }
            LabelMode::Edit => {
                for option in &mut self.options {
                    option.text = option.draft.clone();
                }
                self.mode = LabelMode::View;
            }
        }
    }

    /// Drop uncommitted edits and return to view mode
    pub fn discard_edits(&mut self) {
        for option in &mut self.options {
            option.draft = option.text.clone();
        }
        self.mode = LabelMode::View;
    }

    pub fn handle_key(&mut self, key: Key) -> LabelAction {
        if key == Key::Escape {
            self.discard_edits();
            return LabelAction::Cancelled;
        }

        if self.mode == LabelMode::Edit {
            return LabelAction::Ignored;
        }

        self.options
            .iter()
            .find(|o| o.key == key)
            .map(|o| LabelAction::Selected(o.text.clone()))
            .unwrap_or(LabelAction::Ignored)
    }

    fn toggle_button_text(&self) -> &'static str {
        match self.mode {
            LabelMode::View => "Edit",
            LabelMode::Edit => "Save",
        }
    }
}

/// Map a config shortcut (`"1"`, `"a"`, `"F2"`) to an egui key
fn key_for_shortcut(name: &str) -> Option<Key> {
    const DIGITS: [Key; 10] = [
        Key::Num0,
        Key::Num1,
        Key::Num2,
        Key::Num3,
        Key::Num4,
        Key::Num5,
        Key::Num6,
        Key::Num7,
        Key::Num8,
        Key::Num9,
    ];

    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next())
        && let Some(digit) = c.to_digit(10)
    {
        return Some(DIGITS[digit as usize]);
    }

    let key = Key::from_name(&name.to_ascii_uppercase()).or_else(|| Key::from_name(name))?;
    (key != Key::Escape).then_some(key)
}

/// Unmodified key presses of this frame, in order
fn pressed_keys(ui: &egui::Ui) -> Vec<Key> {
    ui.input(|i| {
        i.events
            .iter()
            .filter_map(|event| match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    repeat: false,
                    modifiers,
                    ..
                } if modifiers.is_none() => Some(*key),
                _ => None,
            })
            .collect()
    })
}

/// Draw the label screen and report the first meaningful key press
pub fn ui(ui: &mut egui::Ui, selection: &mut LabelSelection, theme: &Theme) -> LabelAction {
    for key in pressed_keys(ui) {
        let action = selection.handle_key(key);
        if action != LabelAction::Ignored {
            return action;
        }
    }

    ui.horizontal(|ui| {
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let button = egui::Button::new(
                RichText::new(selection.toggle_button_text())
                    .size(theme.font_normal)
                    .color(theme.text),
            )
            .fill(egui::Color32::TRANSPARENT)
            .stroke(egui::Stroke::new(1.0, theme.text));
            if ui.add(button).clicked() {
                selection.toggle_edit();
            }
        });
    });

    ui.label(
        RichText::new(LABEL_PROMPT)
            .size(theme.font_large)
            .color(theme.text),
    );
    ui.add_space(10.0);

    let editing = selection.mode() == LabelMode::Edit;
    let width = column_width(ui.available_width(), selection.options.len());

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = LABEL_COLUMN_SPACING;
        for option in &mut selection.options {
            ui.vertical(|ui| {
                ui.set_width(width);
                ui.label(
                    RichText::new(format!("{}:", option.shortcut))
                        .size(theme.font_normal)
                        .color(theme.text),
                );

                let font = egui::FontId::proportional(theme.font_normal);
                if editing {
                    ui.add(
                        egui::TextEdit::singleline(&mut option.draft)
                            .font(font)
                            .text_color(theme.text)
                            .desired_width(width),
                    );
                } else {
                    ui.add(
                        egui::TextEdit::singleline(&mut option.text.as_str())
                            .font(font)
                            .text_color(theme.text)
                            .frame(false)
                            .desired_width(width),
                    );
                }
            });
        }
    });

    LabelAction::Ignored
}

fn column_width(available: f32, columns: usize) -> f32 {
    if columns == 0 {
        return available;
    }
    let gaps = LABEL_COLUMN_SPACING * (columns - 1) as f32;
    ((available - gaps) / columns as f32).max(20.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LabelSelection {
        LabelSelection::from_labels([("1", "A"), ("2", "B")])
    }

    #[test]
    fn test_keymap_has_one_entry_per_label() {
        let keymap = sample().keymap();
        assert_eq!(keymap.len(), 2);
        assert_eq!(keymap.get(&Key::Num1).map(String::as_str), Some("A"));
        assert_eq!(keymap.get(&Key::Num2).map(String::as_str), Some("B"));
    }

    #[test]
    fn test_invalid_and_duplicate_shortcuts_skipped() {
        let selection = LabelSelection::from_labels([
            ("1", "One"),
            ("not a key", "Bad"),
            (" 1 ", "Again"),
            ("Escape", "Esc"),
            ("a", "Letter"),
        ]);
        let keymap = selection.keymap();
        assert_eq!(keymap.len(), 2);
        assert_eq!(keymap.get(&Key::Num1).map(String::as_str), Some("One"));
        assert_eq!(keymap.get(&Key::A).map(String::as_str), Some("Letter"));
    }

    #[test]
    fn test_select_in_view_mode() {
        let mut selection = sample();
        assert_eq!(
            selection.handle_key(Key::Num2),
            LabelAction::Selected("B".into())
        );
        assert_eq!(selection.handle_key(Key::Num9), LabelAction::Ignored);
        assert_eq!(selection.handle_key(Key::Enter), LabelAction::Ignored);
    }

    #[test]
    fn test_edit_mode_ignores_shortcuts() {
        let mut selection = sample();
        selection.toggle_edit();
        assert_eq!(selection.mode(), LabelMode::Edit);
        assert_eq!(selection.toggle_button_text(), "Save");
        assert_eq!(selection.handle_key(Key::Num1), LabelAction::Ignored);
    }

    #[test]
    fn test_save_commits_edits_in_memory() {
        let mut selection = sample();
        selection.toggle_edit();
        selection.options[0].draft = "Focus".into();
        selection.toggle_edit();

        assert_eq!(selection.mode(), LabelMode::View);
        assert_eq!(selection.toggle_button_text(), "Edit");
        assert_eq!(
            selection.handle_key(Key::Num1),
            LabelAction::Selected("Focus".into())
        );
    }

    #[test]
    fn test_escape_cancels_and_discards_drafts() {
        let mut selection = sample();
        assert_eq!(selection.handle_key(Key::Escape), LabelAction::Cancelled);

        selection.toggle_edit();
        selection.options[1].draft = "Changed".into();
        assert_eq!(selection.handle_key(Key::Escape), LabelAction::Cancelled);
        assert_eq!(selection.mode(), LabelMode::View);
        assert_eq!(selection.keymap().get(&Key::Num2).map(String::as_str), Some("B"));
    }

    #[test]
    fn test_column_width_splits_available_space() {
        assert_eq!(column_width(560.0, 0), 560.0);
        assert_eq!(column_width(100.0, 1), 100.0);
        assert_eq!(column_width(560.0, 5), 96.0);
    }
}

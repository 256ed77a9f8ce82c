//! Shared UI components.

use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, Response, RichText, Ui};
use egui_phosphor::regular::{ARROW_LEFT, CLOCK, X};

/// Status indicator colors.
pub mod colors {
    use super::Color32;

    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
    pub const WARNING: Color32 = Color32::from_rgb(255, 200, 100);
    pub const NEUTRAL: Color32 = Color32::from_rgb(150, 150, 150);
    pub const PRIMARY: Color32 = Color32::from_rgb(37, 99, 235);
}

/// Render a back button that returns true when clicked.
pub fn back_button(ui: &mut Ui) -> bool {
    ui.button(RichText::new(format!("{ARROW_LEFT} Back")).size(14.0)).clicked()
}

/// Render a page header: title on the left, `right` content on the right.
pub fn page_header<R>(ui: &mut Ui, title: &str, right: impl FnOnce(&mut Ui) -> R) -> R {
    let inner = ui.horizontal(|ui| {
        ui.heading(RichText::new(title).size(24.0));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), right).inner
    });
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(10.0);
    inner.inner
}

/// Framed card with a bold title.
pub fn card<R>(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui) -> R) -> R {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(egui::Margin::same(15))
        .corner_radius(egui::CornerRadius::same(8))
        .show(ui, |ui| {
            ui.label(RichText::new(title).strong());
            ui.add_space(10.0);
            add_contents(ui)
        })
        .inner
}

/// Primary (filled) button with an icon.
pub fn primary_button_with_icon(ui: &mut Ui, enabled: bool, icon: &str, label: &str) -> Response {
    let text = RichText::new(format!("{icon} {label}")).color(Color32::WHITE);
    ui.add_enabled(enabled, egui::Button::new(text).fill(colors::PRIMARY))
}

/// Single-line text input. Returns the new value when it was edited.
pub fn text_input(ui: &mut Ui, current: &str, hint: &str, width: f32) -> Option<String> {
    let mut value = current.to_string();
    let response = ui.add(
        egui::TextEdit::singleline(&mut value)
            .desired_width(width)
            .hint_text(hint),
    );
    response.changed().then_some(value)
}

/// Multi-line text input. Returns the new value when it was edited.
pub fn text_area(ui: &mut Ui, current: &str, width: f32) -> Option<String> {
    let mut value = current.to_string();
    let response = ui.add(
        egui::TextEdit::multiline(&mut value)
            .desired_width(width)
            .desired_rows(4),
    );
    response.changed().then_some(value)
}

/// Drop-down over a fixed option list. Returns the picked option when the
/// selection changed.
pub fn select(ui: &mut Ui, id: &str, current: &str, options: &[&str], width: f32) -> Option<String> {
    let mut picked = None;
    egui::ComboBox::from_id_salt(id)
        .width(width)
        .selected_text(current)
        .show_ui(ui, |ui| {
            for option in options {
                if ui.selectable_label(current == *option, *option).clicked() && current != *option {
                    picked = Some(option.to_string());
                }
            }
        });
    picked
}

/// Parse `HH:MM` or `HH:MM:SS` into hour and minute.
pub fn parse_time(value: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = value.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }
    let mut numbers = Vec::with_capacity(parts.len());
    for part in &parts {
        if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        numbers.push(part.parse::<u32>().ok()?);
    }
    let (hour, minute) = (numbers[0], numbers[1]);
    let second = numbers.get(2).copied().unwrap_or(0);
    (hour < 24 && minute < 60 && second < 60).then_some((hour, minute))
}

pub fn format_time(hour: u32, minute: u32) -> String {
    format!("{hour:02}:{minute:02}")
}

/// Time-of-day input: hour and minute spinners. Returns the new value when
/// it was edited.
///
/// Edits always yield `HH:MM`. An empty value shows `--:--` with a button to
/// set it; a value that is not a valid time is shown as text until it is
/// reset or cleared.
pub fn time_input(ui: &mut Ui, current: &str) -> Option<String> {
    let mut changed = None;
    ui.horizontal(|ui| match parse_time(current) {
        Some((mut hour, mut minute)) => {
            let two_digits = |n: f64, _: RangeInclusive<usize>| format!("{:02}", n as u32);
            let hour_edit = ui.add(
                egui::DragValue::new(&mut hour)
                    .range(0..=23)
                    .custom_formatter(two_digits),
            );
            ui.label(":");
            let minute_edit = ui.add(
                egui::DragValue::new(&mut minute)
                    .range(0..=59)
                    .custom_formatter(two_digits),
            );
            if hour_edit.changed() || minute_edit.changed() {
                changed = Some(format_time(hour, minute));
            }
            if ui.small_button(X).on_hover_text("Clear").clicked() {
                changed = Some(String::new());
            }
        }
        None => {
            let shown = if current.is_empty() { "--:--" } else { current };
            ui.label(RichText::new(shown).weak());
            if ui.small_button(CLOCK).on_hover_text("Set time").clicked() {
                changed = Some(format_time(0, 0));
            }
            if !current.is_empty() && ui.small_button(X).on_hover_text("Clear").clicked() {
                changed = Some(String::new());
            }
        }
    });
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("08:15"), Some((8, 15)));
        assert_eq!(parse_time("23:59:59"), Some((23, 59)));
        assert_eq!(parse_time("00:00:00"), Some((0, 0)));
    }

    #[test]
    fn test_parse_time_rejects_malformed() {
        for value in ["", "8:15", "24:00", "12:60", "12:30:60", "ab:cd", "12:30:00:00", "12"] {
            assert_eq!(parse_time(value), None, "{value}");
        }
    }

    #[test]
    fn test_format_time_pads() {
        assert_eq!(format_time(7, 5), "07:05");
        assert_eq!(format_time(17, 30), "17:30");
    }
}

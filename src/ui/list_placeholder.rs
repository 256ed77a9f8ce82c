//! Landing page for the list routes (`/absen`, `/data-absen`).
//!
//! The lists themselves live in the web admin; here the user can only jump
//! to a record by id.

use eframe::egui::{RichText, Ui};
use egui_phosphor::regular::PENCIL;

use super::components::{card, page_header, primary_button_with_icon, text_input};
use crate::routes::Route;

pub fn title(route: &Route) -> &'static str {
    match route {
        Route::DataAbsen => "Data Absen",
        _ => "Absen",
    }
}

/// Show the placeholder page. Returns the edit route to open, if any.
pub fn show(ui: &mut Ui, route: &Route, id_input: &mut String) -> Option<Route> {
    let mut open = None;

    page_header(ui, title(route), |_ui| {});

    ui.label(RichText::new(format!("Path: {}", route.path())).weak());
    ui.add_space(15.0);

    card(ui, "Buka Absensi", |ui| {
        ui.horizontal(|ui| {
            ui.label("ID Absensi:");
            if let Some(value) = text_input(ui, id_input.as_str(), "mis. 42", 160.0) {
                *id_input = value;
            }

            let id = id_input.trim();
            if primary_button_with_icon(ui, !id.is_empty(), PENCIL, "Edit").clicked() {
                open = Some(Route::EditAbsen(id.to_string()));
            }
        });
    });

    open
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles() {
        assert_eq!(title(&Route::Absen), "Absen");
        assert_eq!(title(&Route::DataAbsen), "Data Absen");
    }
}

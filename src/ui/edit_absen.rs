//! Edit form for a single attendance record.

use eframe::egui::{self, Ui};
use egui_phosphor::regular::FLOPPY_DISK;

use super::components::{
    back_button, card, page_header, primary_button_with_icon, select, text_area, text_input, time_input,
};
use crate::models::attendance::{Field, Status, Verification};
use crate::screen::EditAbsen;

pub const PAGE_TITLE: &str = "Edit Absen";

/// User intent from one frame of the edit screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    /// Header back button: go to `/absen`.
    GoBack,
    Submit,
}

/// Show the edit screen.
///
/// While the record is loading only a loading indicator is drawn.
pub fn show(screen: &mut EditAbsen, ui: &mut Ui) -> Action {
    if screen.is_loading() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading...");
        });
        return Action::None;
    }

    let mut action = Action::None;

    if page_header(ui, PAGE_TITLE, back_button) {
        action = Action::GoBack;
    }

    egui::ScrollArea::vertical().id_salt("edit_absen_scroll").show(ui, |ui| {
        card(ui, "Form Edit Absensi", |ui| {
            egui::Grid::new("edit_absen_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Jam Masuk");
                    if let Some(value) = time_input(ui, screen.form().get(Field::JamMasuk)) {
                        screen.change(Field::JamMasuk, value);
                    }
                    ui.end_row();

                    ui.label("Jam Pulang");
                    if let Some(value) = time_input(ui, screen.form().get(Field::JamPulang)) {
                        screen.change(Field::JamPulang, value);
                    }
                    ui.end_row();

                    ui.label("Lokasi Masuk");
                    if let Some(value) = text_input(ui, screen.form().get(Field::LokasiMasuk), "", 320.0) {
                        screen.change(Field::LokasiMasuk, value);
                    }
                    ui.end_row();

                    ui.label("Lokasi Pulang");
                    if let Some(value) = text_input(ui, screen.form().get(Field::LokasiPulang), "", 320.0) {
                        screen.change(Field::LokasiPulang, value);
                    }
                    ui.end_row();

                    ui.label("Status");
                    let options: Vec<&str> = Status::ALL.iter().map(|s| s.as_str()).collect();
                    if let Some(value) = select(ui, "edit_absen_status", screen.form().get(Field::Status), &options, 200.0)
                    {
                        screen.change(Field::Status, value);
                    }
                    ui.end_row();

                    ui.label("Verifikasi");
                    let options: Vec<&str> = Verification::ALL.iter().map(|v| v.as_str()).collect();
                    if let Some(value) = select(
                        ui,
                        "edit_absen_verifikasi",
                        screen.form().get(Field::Verifikasi),
                        &options,
                        200.0,
                    ) {
                        screen.change(Field::Verifikasi, value);
                    }
                    ui.end_row();

                    ui.label("Keterangan");
                    if let Some(value) = text_area(ui, screen.form().get(Field::Keterangan), 320.0) {
                        screen.change(Field::Keterangan, value);
                    }
                    ui.end_row();
                });

            ui.add_space(15.0);

            ui.horizontal(|ui| {
                let submitting = screen.is_submitting();
                if primary_button_with_icon(ui, !submitting, FLOPPY_DISK, "Simpan Perubahan").clicked() {
                    action = Action::Submit;
                }
                if submitting {
                    ui.spinner();
                    ui.label("Menyimpan...");
                }
            });
        });
    });

    action
}

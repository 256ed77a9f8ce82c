//! Attendance record DTOs, the editable form state and the partial-update payload.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Attendance status options, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Hadir,
    Sakit,
    Izin,
    Cuti,
    DinasLuar,
    Libur,
    Alpha,
}

impl Status {
    pub const ALL: [Status; 7] = [
        Status::Hadir,
        Status::Sakit,
        Status::Izin,
        Status::Cuti,
        Status::DinasLuar,
        Status::Libur,
        Status::Alpha,
    ];

    /// Wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Hadir => "hadir",
            Status::Sakit => "sakit",
            Status::Izin => "izin",
            Status::Cuti => "cuti",
            Status::DinasLuar => "dinas_luar",
            Status::Libur => "libur",
            Status::Alpha => "alpha",
        }
    }
}

/// Supervisor verification state, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verification {
    #[default]
    Pending,
    Disetujui,
    Ditolak,
}

impl Verification {
    pub const ALL: [Verification; 3] = [Verification::Pending, Verification::Disetujui, Verification::Ditolak];

    /// Wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verification::Pending => "pending",
            Verification::Disetujui => "disetujui",
            Verification::Ditolak => "ditolak",
        }
    }
}

/// The seven editable fields of an attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    JamMasuk,
    JamPulang,
    LokasiMasuk,
    LokasiPulang,
    Status,
    Verifikasi,
    Keterangan,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::JamMasuk,
        Field::JamPulang,
        Field::LokasiMasuk,
        Field::LokasiPulang,
        Field::Status,
        Field::Verifikasi,
        Field::Keterangan,
    ];

    /// Field name as used on the wire and by the change handler.
    pub fn name(&self) -> &'static str {
        match self {
            Field::JamMasuk => "jam_masuk",
            Field::JamPulang => "jam_pulang",
            Field::LokasiMasuk => "lokasi_masuk",
            Field::LokasiPulang => "lokasi_pulang",
            Field::Status => "status",
            Field::Verifikasi => "verifikasi",
            Field::Keterangan => "keterangan",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Time-of-day fields get seconds stripped before submission.
    pub fn is_time(&self) -> bool {
        matches!(self, Field::JamMasuk | Field::JamPulang)
    }

    /// Value the form holds before a record is loaded, and for absent fields.
    pub fn default_value(&self) -> &'static str {
        match self {
            Field::Status => Status::default().as_str(),
            Field::Verifikasi => Verification::default().as_str(),
            _ => "",
        }
    }
}

/// Attendance record as returned by `GET /absensi/{id}`.
///
/// Every field is optional. Falsy JSON values (`null`, `""`, `false`, `0`)
/// are treated as absent; other non-string scalars keep their JSON text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub jam_masuk: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub jam_pulang: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lokasi_masuk: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lokasi_pulang: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub verifikasi: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub keterangan: Option<String>,
}

/// Response envelope: `{ "data": { ... } }`.
///
/// `data` must be a JSON object; arrays and scalars are rejected rather than
/// mapped onto the fields by position.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordEnvelope {
    #[serde(deserialize_with = "record_object")]
    pub data: AttendanceRecord,
}

fn record_object<'de, D>(deserializer: D) -> Result<AttendanceRecord, D::Error>
where
    D: Deserializer<'de>,
{
    let fields = Map::<String, Value>::deserialize(deserializer)?;
    AttendanceRecord::deserialize(Value::Object(fields)).map_err(serde::de::Error::custom)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    })
}

impl AttendanceRecord {
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::JamMasuk => &self.jam_masuk,
            Field::JamPulang => &self.jam_pulang,
            Field::LokasiMasuk => &self.lokasi_masuk,
            Field::LokasiPulang => &self.lokasi_pulang,
            Field::Status => &self.status,
            Field::Verifikasi => &self.verifikasi,
            Field::Keterangan => &self.keterangan,
        };
        value.as_deref()
    }
}

/// Local, editable copy of the seven fields. All values are strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub jam_masuk: String,
    pub jam_pulang: String,
    pub lokasi_masuk: String,
    pub lokasi_pulang: String,
    pub status: String,
    pub verifikasi: String,
    pub keterangan: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            jam_masuk: String::new(),
            jam_pulang: String::new(),
            lokasi_masuk: String::new(),
            lokasi_pulang: String::new(),
            status: Field::Status.default_value().to_string(),
            verifikasi: Field::Verifikasi.default_value().to_string(),
            keterangan: String::new(),
        }
    }
}

impl FormState {
    /// Build form state from a loaded record, applying per-field defaults.
    pub fn from_record(record: &AttendanceRecord) -> Self {
        let mut form = Self::default();
        for field in Field::ALL {
            *form.slot_mut(field) = record.get(field).unwrap_or(field.default_value()).to_string();
        }
        form
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::JamMasuk => &self.jam_masuk,
            Field::JamPulang => &self.jam_pulang,
            Field::LokasiMasuk => &self.lokasi_masuk,
            Field::LokasiPulang => &self.lokasi_pulang,
            Field::Status => &self.status,
            Field::Verifikasi => &self.verifikasi,
            Field::Keterangan => &self.keterangan,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::JamMasuk => &mut self.jam_masuk,
            Field::JamPulang => &mut self.jam_pulang,
            Field::LokasiMasuk => &mut self.lokasi_masuk,
            Field::LokasiPulang => &mut self.lokasi_pulang,
            Field::Status => &mut self.status,
            Field::Verifikasi => &mut self.verifikasi,
            Field::Keterangan => &mut self.keterangan,
        }
    }

    /// Return a new state with one field replaced. No validation.
    pub fn with(&self, field: Field, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        *next.slot_mut(field) = value.into();
        next
    }

    /// Change handler keyed by field name. Unknown names yield `None`.
    pub fn with_named(&self, name: &str, value: impl Into<String>) -> Option<Self> {
        Field::from_name(name).map(|field| self.with(field, value))
    }
}

/// Drop the seconds from an `HH:MM:SS` value.
///
/// Only values of exactly 8 characters are truncated (to their first 5);
/// anything else is returned as is.
pub fn normalize_time(value: &str) -> &str {
    if value.chars().count() != 8 {
        return value;
    }
    match value.char_indices().nth(5) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

/// Body of `PUT /absensi/{id}`: only the fields that carry a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateAttendance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jam_masuk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jam_pulang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lokasi_masuk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lokasi_pulang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verifikasi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keterangan: Option<String>,
}

impl UpdateAttendance {
    /// Build the partial update from the current form.
    ///
    /// Empty values are omitted entirely. Time fields pass through
    /// [`normalize_time`].
    pub fn from_form(form: &FormState) -> Self {
        let mut update = Self::default();
        for field in Field::ALL {
            let value = form.get(field);
            if value.is_empty() {
                continue;
            }
            let value = if field.is_time() { normalize_time(value) } else { value };
            *update.slot_mut(field) = Some(value.to_string());
        }
        update
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::JamMasuk => &mut self.jam_masuk,
            Field::JamPulang => &mut self.jam_pulang,
            Field::LokasiMasuk => &mut self.lokasi_masuk,
            Field::LokasiPulang => &mut self.lokasi_pulang,
            Field::Status => &mut self.status,
            Field::Verifikasi => &mut self.verifikasi,
            Field::Keterangan => &mut self.keterangan,
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::JamMasuk => &self.jam_masuk,
            Field::JamPulang => &self.jam_pulang,
            Field::LokasiMasuk => &self.lokasi_masuk,
            Field::LokasiPulang => &self.lokasi_pulang,
            Field::Status => &self.status,
            Field::Verifikasi => &self.verifikasi,
            Field::Keterangan => &self.keterangan,
        };
        value.as_deref()
    }

    /// Number of fields that will be sent.
    pub fn len(&self) -> usize {
        Field::ALL.into_iter().filter(|f| self.get(*f).is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

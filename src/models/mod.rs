//! Data models for attendance records and their edit form.

pub mod attendance;

pub use attendance::{
    AttendanceRecord, Field, FormState, RecordEnvelope, Status, UpdateAttendance, Verification, normalize_time,
};

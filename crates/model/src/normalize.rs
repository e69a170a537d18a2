//! Boundary adapter for callers that never agreed on field names. Each
//! attribute is resolved from whichever convention is present; malformed
//! entries are coerced to defaults, never rejected.

use bson::oid::ObjectId;
use chrono::{DateTime, NaiveDate, TimeZone as _, Utc};
use serde_json::Value;

use crate::{
    attendance::AttendanceRecord,
    class::{ClassDefinition, ClassStatus},
    slot::RecurringSlot,
};

const UNKNOWN_INSTRUCTOR: &str = "Unknown";

/// Returns `None` only for a `null` input; a present-but-empty object
/// still yields a best-effort record built from defaults.
pub fn normalize_class(input: &Value) -> Option<ClassDefinition> {
    if input.is_null() {
        return None;
    }

    let (instructor, instructor_name) = instructor_of(input);

    Some(ClassDefinition {
        id: field(input, &["_id", "id"]).map(object_id).unwrap_or_else(nil_object_id),
        name: string_of(input, &["name", "className"]).unwrap_or_default(),
        description: string_of(input, &["description"]).unwrap_or_default(),
        capacity: number_of(input, &["capacity", "maxMembers", "max_members"]),
        enrolled: number_of(input, &["enrolled", "currentMembers", "current_members"]),
        instructor,
        instructor_name,
        service_id: field(input, &["service", "serviceId", "service_id"])
            .map(object_id)
            .unwrap_or_else(nil_object_id),
        start_date: date_of(input, &["startDate", "start_date"]).unwrap_or_default(),
        end_date: date_of(input, &["endDate", "end_date"]).unwrap_or_default(),
        slots: slots_of(input),
        total_sessions: number_of(input, &["totalSessions", "total_sessions"]),
        status: string_of(input, &["status"])
            .and_then(|status| status.parse::<ClassStatus>().ok())
            .unwrap_or_default(),
        version: 0,
    })
}

/// When both `isPresent` and a `"present"/"absent"` status string are
/// supplied and disagree, the boolean is authoritative.
pub fn normalize_attendance(input: &Value) -> Option<AttendanceRecord> {
    if input.is_null() {
        return None;
    }

    let explicit = field(input, &["isPresent", "is_present"]).and_then(Value::as_bool);
    let status = string_of(input, &["status"]);
    let is_present = match (explicit, status) {
        (Some(flag), _) => flag,
        (None, Some(status)) => status == "present",
        (None, None) => false,
    };

    Some(AttendanceRecord {
        id: field(input, &["_id", "id"]).map(object_id).unwrap_or_else(nil_object_id),
        class_id: field(input, &["class", "classId", "class_id"])
            .map(object_id)
            .unwrap_or_else(nil_object_id),
        student_id: field(input, &["student", "user", "studentId", "student_id", "userId"])
            .map(object_id)
            .unwrap_or_else(nil_object_id),
        date: date_of(input, &["date", "sessionDate", "session_date"]).unwrap_or_default(),
        session_number: number_of(input, &["sessionNumber", "session_number"]),
        is_present,
        notes: string_of(input, &["notes"]).filter(|notes| !notes.is_empty()),
        marked_at: timestamp_of(input, &["markedAt", "marked_at"]).unwrap_or(DateTime::UNIX_EPOCH),
        is_locked: field(input, &["isLocked", "is_locked"])
            .and_then(Value::as_bool)
            .unwrap_or(false),
        version: 0,
    })
}

pub fn normalize_class_list(inputs: &Value) -> Vec<ClassDefinition> {
    inputs
        .as_array()
        .map(|items| items.iter().filter_map(normalize_class).collect())
        .unwrap_or_default()
}

pub fn normalize_attendance_list(inputs: &Value) -> Vec<AttendanceRecord> {
    inputs
        .as_array()
        .map(|items| items.iter().filter_map(normalize_attendance).collect())
        .unwrap_or_default()
}

/// First present, non-null field among the accepted names.
fn field<'v>(input: &'v Value, names: &[&str]) -> Option<&'v Value> {
    names
        .iter()
        .find_map(|name| input.get(*name))
        .filter(|value| !value.is_null())
}

fn string_of(input: &Value, names: &[&str]) -> Option<String> {
    field(input, names)?.as_str().map(str::to_string)
}

fn number_of(input: &Value, names: &[&str]) -> u32 {
    field(input, names)
        .and_then(Value::as_u64)
        .map(|value| value as u32)
        .unwrap_or(0)
}

fn date_of(input: &Value, names: &[&str]) -> Option<NaiveDate> {
    match field(input, names)? {
        // Date-only or a full timestamp; only the calendar day matters.
        Value::String(raw) => raw.get(..10)?.parse().ok(),
        value => parse_timestamp(value).map(|stamp| stamp.date_naive()),
    }
}

fn timestamp_of(input: &Value, names: &[&str]) -> Option<DateTime<Utc>> {
    parse_timestamp(field(input, names)?)
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|stamp| stamp.with_timezone(&Utc)),
        // bson::DateTime serialized through serde_json.
        Value::Object(map) => {
            let date = map.get("$date")?;
            let millis = match date {
                Value::String(raw) => {
                    return DateTime::parse_from_rfc3339(raw)
                        .ok()
                        .map(|stamp| stamp.with_timezone(&Utc));
                }
                Value::Object(inner) => inner.get("$numberLong")?.as_str()?.parse().ok()?,
                Value::Number(number) => number.as_i64()?,
                _ => return None,
            };
            Utc.timestamp_millis_opt(millis).single()
        }
        _ => None,
    }
}

// Hex string, `{"$oid": ...}` extended JSON, or a nested object
// carrying its own `_id`. Unparsable ids become the nil id.
fn object_id(value: &Value) -> ObjectId {
    match value {
        Value::String(raw) => ObjectId::parse_str(raw).unwrap_or_else(|_| nil_object_id()),
        Value::Object(_) => field(value, &["$oid", "_id", "id"])
            .map(object_id)
            .unwrap_or_else(nil_object_id),
        _ => nil_object_id(),
    }
}

fn nil_object_id() -> ObjectId {
    ObjectId::from_bytes([0; 12])
}

fn instructor_of(input: &Value) -> (ObjectId, String) {
    match input.get("instructor") {
        Some(Value::Object(_)) => {
            let nested = &input["instructor"];
            let name = string_of(nested, &["name", "fullName"])
                .unwrap_or_else(|| UNKNOWN_INSTRUCTOR.to_string());
            (object_id(nested), name)
        }
        Some(bare) if !bare.is_null() => {
            let name = string_of(input, &["instructorName", "instructor_name"])
                .unwrap_or_else(|| UNKNOWN_INSTRUCTOR.to_string());
            (object_id(bare), name)
        }
        _ => (nil_object_id(), UNKNOWN_INSTRUCTOR.to_string()),
    }
}

fn slots_of(input: &Value) -> Vec<RecurringSlot> {
    let Some(items) = field(input, &["schedule", "slots"]).and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let day_of_week = field(item, &["dayOfWeek", "day_of_week"])?.as_u64()?;
            if day_of_week > 6 {
                return None;
            }
            Some(RecurringSlot::new(
                day_of_week as u8,
                string_of(item, &["startTime", "start_time"]).unwrap_or_default(),
                string_of(item, &["endTime", "end_time"]).unwrap_or_default(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_class_field_name_independence() {
        let admin = normalize_class(&json!({"name": "Yoga", "capacity": 10})).unwrap();
        let mobile = normalize_class(&json!({"className": "Yoga", "maxMembers": 10})).unwrap();

        assert_eq!(admin.name, mobile.name);
        assert_eq!(admin.capacity, mobile.capacity);
        assert_eq!(admin.enrolled, 0);
        assert_eq!(mobile.enrolled, 0);
    }

    #[test]
    fn test_null_input_is_none() {
        assert!(normalize_class(&Value::Null).is_none());
        assert!(normalize_attendance(&Value::Null).is_none());
    }

    #[test]
    fn test_empty_object_gets_defaults() {
        let class = normalize_class(&json!({})).unwrap();
        assert_eq!(class.name, "");
        assert_eq!(class.capacity, 0);
        assert_eq!(class.instructor_name, "Unknown");
        assert!(class.slots.is_empty());
        assert_eq!(class.status, ClassStatus::Upcoming);
    }

    #[test]
    fn test_nested_and_bare_instructor() {
        let id = ObjectId::new();
        let nested = normalize_class(&json!({
            "instructor": {"_id": id.to_hex(), "name": "Anna"}
        }))
        .unwrap();
        assert_eq!(nested.instructor, id);
        assert_eq!(nested.instructor_name, "Anna");

        let bare = normalize_class(&json!({
            "instructor": id.to_hex(),
            "instructorName": "Anna"
        }))
        .unwrap();
        assert_eq!(bare.instructor, id);
        assert_eq!(bare.instructor_name, "Anna");

        let anonymous = normalize_class(&json!({"instructor": id.to_hex()})).unwrap();
        assert_eq!(anonymous.instructor_name, "Unknown");
    }

    #[test]
    fn test_slots_from_either_key() {
        let class = normalize_class(&json!({
            "schedule": [
                {"dayOfWeek": 1, "startTime": "18:00", "endTime": "19:00"},
                {"dayOfWeek": 9, "startTime": "18:00", "endTime": "19:00"}
            ]
        }))
        .unwrap();
        // Out-of-range weekday is dropped, not an error.
        assert_eq!(class.slots, vec![RecurringSlot::new(1, "18:00", "19:00")]);

        let snake = normalize_class(&json!({
            "slots": [{"day_of_week": 3, "start_time": "07:00", "end_time": "08:00"}]
        }))
        .unwrap();
        assert_eq!(snake.slots, vec![RecurringSlot::new(3, "07:00", "08:00")]);
    }

    #[test]
    fn test_attendance_presence_from_status_string() {
        let present = normalize_attendance(&json!({"status": "present"})).unwrap();
        assert!(present.is_present);

        let absent = normalize_attendance(&json!({"status": "absent"})).unwrap();
        assert!(!absent.is_present);

        assert_eq!(present.status(), "present");
        assert_eq!(absent.status(), "absent");
    }

    #[test]
    fn test_attendance_boolean_wins_over_status() {
        let record = normalize_attendance(&json!({
            "isPresent": true,
            "status": "absent"
        }))
        .unwrap();
        assert!(record.is_present);
    }

    #[test]
    fn test_attendance_date_aliases() {
        let plain = normalize_attendance(&json!({"date": "2024-01-08"})).unwrap();
        let aliased = normalize_attendance(&json!({"sessionDate": "2024-01-08T18:00:00Z"})).unwrap();
        assert_eq!(plain.date, aliased.date);
        assert_eq!(plain.date, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
    }

    #[test]
    fn test_attendance_refs_nested_or_bare() {
        let class_id = ObjectId::new();
        let student_id = ObjectId::new();

        let nested = normalize_attendance(&json!({
            "class": {"_id": class_id.to_hex()},
            "student": {"_id": student_id.to_hex()}
        }))
        .unwrap();
        assert_eq!(nested.class_id, class_id);
        assert_eq!(nested.student_id, student_id);

        let bare = normalize_attendance(&json!({
            "classId": class_id.to_hex(),
            "studentId": student_id.to_hex()
        }))
        .unwrap();
        assert_eq!(bare.class_id, class_id);
        assert_eq!(bare.student_id, student_id);
    }

    #[test]
    fn test_extended_json_object_id() {
        let id = ObjectId::new();
        let record = normalize_attendance(&json!({"classId": {"$oid": id.to_hex()}})).unwrap();
        assert_eq!(record.class_id, id);

        let garbage = normalize_attendance(&json!({"classId": "not-an-oid"})).unwrap();
        assert_eq!(garbage.class_id, ObjectId::from_bytes([0; 12]));
    }

    #[test]
    fn test_list_drops_nulls_preserves_order() {
        let classes = normalize_class_list(&json!([
            {"name": "Yoga"},
            null,
            {"className": "Boxing"}
        ]));
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].name, "Yoga");
        assert_eq!(classes[1].name, "Boxing");

        assert!(normalize_attendance_list(&json!("not-a-list")).is_empty());
    }
}

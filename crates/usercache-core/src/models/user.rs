use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Fields every user record must carry as text
const REQUIRED_FIELDS: [&str; 2] = ["first_name", "last_name"];

/// A user record as returned by the API.
///
/// Only the two name fields are interpreted. The whole record is kept in
/// arrival order, so serializing a `User` writes back exactly what the API
/// sent.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub first_name: String,
    pub last_name: String,
    record: Map<String, Value>,
}

impl User {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        let first_name = first_name.into();
        let last_name = last_name.into();
        let mut record = Map::new();
        record.insert("first_name".to_string(), Value::String(first_name.clone()));
        record.insert("last_name".to_string(), Value::String(last_name.clone()));
        Self {
            first_name,
            last_name,
            record,
        }
    }

    /// Display name as "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Fields other than the two names, in the order the API sent them
    pub fn other_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.record
            .iter()
            .filter(|(key, _)| !REQUIRED_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.as_str(), value))
    }

    fn from_record(record: Map<String, Value>) -> Option<Self> {
        let text = |field: &str| record.get(field).and_then(Value::as_str).map(str::to_string);
        let first_name = text("first_name")?;
        let last_name = text("last_name")?;
        Some(Self {
            first_name,
            last_name,
            record,
        })
    }
}

impl Serialize for User {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for User {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = Map::deserialize(deserializer)?;
        User::from_record(record)
            .ok_or_else(|| D::Error::custom("user record needs text first_name and last_name"))
    }
}

fn has_required_fields(record: &Value) -> bool {
    match record.as_object() {
        Some(obj) => REQUIRED_FIELDS
            .iter()
            .all(|field| obj.get(*field).is_some_and(Value::is_string)),
        None => false,
    }
}

/// Check that every record carries `first_name` and `last_name` as text.
/// An empty list is valid.
pub fn validate_user_data(records: &[Value]) -> bool {
    records.iter().all(has_required_fields)
}

/// Convert raw records into users, or `None` if any record fails validation.
pub fn users_from_records(records: Vec<Value>) -> Option<Vec<User>> {
    if !validate_user_data(&records) {
        return None;
    }
    records
        .into_iter()
        .map(|record| match record {
            Value::Object(map) => User::from_record(map),
            _ => None,
        })
        .collect()
}

/// Lines shown for a user list, one "First Last" per user, in order.
pub fn render_user_list(users: &[User]) -> Vec<String> {
    users.iter().map(User::full_name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_name() {
        let user = User::new("George", "Bluth");
        assert_eq!(user.full_name(), "George Bluth");
    }

    #[test]
    fn test_validate_user_data_accepts_complete_records() {
        let records = vec![
            json!({"id": 1, "first_name": "George", "last_name": "Bluth"}),
            json!({"first_name": "Janet", "last_name": "Weaver", "email": "janet.weaver@reqres.in"}),
        ];
        assert!(validate_user_data(&records));
    }

    #[test]
    fn test_validate_user_data_empty_is_valid() {
        assert!(validate_user_data(&[]));
    }

    #[test]
    fn test_validate_user_data_rejects_missing_fields() {
        let missing_last = vec![
            json!({"first_name": "George", "last_name": "Bluth"}),
            json!({"first_name": "Janet"}),
        ];
        assert!(!validate_user_data(&missing_last));

        let missing_first = vec![json!({"last_name": "Weaver"})];
        assert!(!validate_user_data(&missing_first));
    }

    #[test]
    fn test_validate_user_data_rejects_non_text_and_non_objects() {
        assert!(!validate_user_data(&[json!({"first_name": 1, "last_name": "Bluth"})]));
        assert!(!validate_user_data(&[json!({"first_name": "George", "last_name": null})]));
        assert!(!validate_user_data(&[json!("George Bluth")]));
        assert!(!validate_user_data(&[json!(["George", "Bluth"])]));
    }

    #[test]
    fn test_users_from_records_keeps_record_in_arrival_order() {
        let raw = r#"{"id":2,"email":"janet.weaver@reqres.in","first_name":"Janet","last_name":"Weaver","avatar":"https://reqres.in/img/faces/2-image.jpg"}"#;
        let records = vec![serde_json::from_str::<Value>(raw).unwrap()];
        let users = users_from_records(records).expect("records are valid");
        assert_eq!(users.len(), 1);

        let others: Vec<&str> = users[0].other_fields().map(|(key, _)| key).collect();
        assert_eq!(others, vec!["id", "email", "avatar"]);

        // Serializing the user writes back the original text, key order included
        assert_eq!(serde_json::to_string(&users[0]).unwrap(), raw);
    }

    #[test]
    fn test_deserialize_rejects_missing_names() {
        assert!(serde_json::from_str::<User>(r#"{"first_name":"Janet"}"#).is_err());
        assert!(serde_json::from_str::<User>(r#"{"first_name":"Janet","last_name":7}"#).is_err());
    }

    #[test]
    fn test_users_from_records_rejects_invalid() {
        assert!(users_from_records(vec![json!({"first_name": "Emma"})]).is_none());
    }

    #[test]
    fn test_render_user_list_preserves_order() {
        let users = vec![
            User::new("George", "Bluth"),
            User::new("Janet", "Weaver"),
            User::new("Emma", "Wong"),
        ];
        assert_eq!(
            render_user_list(&users),
            vec!["George Bluth", "Janet Weaver", "Emma Wong"]
        );
    }
}

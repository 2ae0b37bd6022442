use serde_json::{json, Map, Value};
use thiserror::Error;

/// Rejection of a property submission, pointing at the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}' {message}")]
pub struct SchemaError {
  pub field: &'static str,
  pub message: &'static str,
}

impl SchemaError {
  fn new(field: &'static str, message: &'static str) -> Self {
    Self { field, message }
  }
}

/// A property submission that has passed schema validation.
///
/// `title`, `price`, `location`, `bedrooms`, `bathrooms` and `area_sqft`
/// are required; `image` and `description` may be absent; `featured`
/// defaults to false. Unknown fields in the input are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDraft {
  pub title: String,
  pub price: f64,
  pub location: String,
  pub bedrooms: i64,
  pub bathrooms: i64,
  pub area_sqft: i64,
  pub image: Option<String>,
  pub description: Option<String>,
  pub featured: bool,
}

impl PropertyDraft {
  /// Validates an untyped JSON record against the property schema.
  pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
    let Some(obj) = value.as_object() else {
      return Err(SchemaError::new("body", "must be a JSON object"));
    };

    Ok(Self {
      title: required_string(obj, "title")?,
      price: required_number(obj, "price")?,
      location: required_string(obj, "location")?,
      bedrooms: required_integer(obj, "bedrooms")?,
      bathrooms: required_integer(obj, "bathrooms")?,
      area_sqft: positive_integer(obj, "area_sqft")?,
      image: optional_string(obj, "image")?,
      description: optional_string(obj, "description")?,
      featured: featured_flag(obj)?,
    })
  }

  /// The JSON object persisted for this draft. Absent optionals are
  /// omitted rather than stored as null.
  pub fn into_document(self) -> Value {
    let mut doc = Map::new();
    doc.insert("title".to_string(), Value::String(self.title));
    doc.insert("price".to_string(), json!(self.price));
    doc.insert("location".to_string(), Value::String(self.location));
    doc.insert("bedrooms".to_string(), json!(self.bedrooms));
    doc.insert("bathrooms".to_string(), json!(self.bathrooms));
    doc.insert("area_sqft".to_string(), json!(self.area_sqft));
    if let Some(image) = self.image {
      doc.insert("image".to_string(), Value::String(image));
    }
    if let Some(description) = self.description {
      doc.insert("description".to_string(), Value::String(description));
    }
    doc.insert("featured".to_string(), Value::Bool(self.featured));
    Value::Object(doc)
  }
}

fn required_string(obj: &Map<String, Value>, field: &'static str) -> Result<String, SchemaError> {
  match obj.get(field) {
    Some(Value::String(s)) => Ok(s.clone()),
    Some(Value::Null) | None => Err(SchemaError::new(field, "is required")),
    Some(_) => Err(SchemaError::new(field, "must be a string")),
  }
}

fn required_number(obj: &Map<String, Value>, field: &'static str) -> Result<f64, SchemaError> {
  match obj.get(field) {
    Some(Value::Number(n)) => n
      .as_f64()
      .ok_or_else(|| SchemaError::new(field, "must be a number")),
    Some(Value::Null) | None => Err(SchemaError::new(field, "is required")),
    Some(_) => Err(SchemaError::new(field, "must be a number")),
  }
}

fn required_integer(obj: &Map<String, Value>, field: &'static str) -> Result<i64, SchemaError> {
  match obj.get(field) {
    Some(Value::Number(n)) => n
      .as_i64()
      .ok_or_else(|| SchemaError::new(field, "must be an integer")),
    Some(Value::Null) | None => Err(SchemaError::new(field, "is required")),
    Some(_) => Err(SchemaError::new(field, "must be an integer")),
  }
}

fn positive_integer(obj: &Map<String, Value>, field: &'static str) -> Result<i64, SchemaError> {
  let n = required_integer(obj, field)?;
  if n <= 0 {
    return Err(SchemaError::new(field, "must be greater than 0"));
  }
  Ok(n)
}

fn optional_string(
  obj: &Map<String, Value>,
  field: &'static str,
) -> Result<Option<String>, SchemaError> {
  match obj.get(field) {
    Some(Value::String(s)) => Ok(Some(s.clone())),
    Some(Value::Null) | None => Ok(None),
    Some(_) => Err(SchemaError::new(field, "must be a string")),
  }
}

fn featured_flag(obj: &Map<String, Value>) -> Result<bool, SchemaError> {
  match obj.get("featured") {
    Some(Value::Bool(b)) => Ok(*b),
    Some(Value::Null) | None => Ok(false),
    Some(_) => Err(SchemaError::new("featured", "must be a boolean")),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn valid_body() -> Value {
    json!({
      "title": "Seaside Villa",
      "price": 450000.0,
      "location": "Lagos",
      "bedrooms": 4,
      "bathrooms": 3,
      "area_sqft": 2800,
      "featured": true
    })
  }

  #[test]
  fn accepts_valid_submission() {
    let draft = PropertyDraft::from_value(&valid_body()).unwrap();
    assert_eq!(draft.title, "Seaside Villa");
    assert_eq!(draft.price, 450000.0);
    assert_eq!(draft.bedrooms, 4);
    assert_eq!(draft.area_sqft, 2800);
    assert!(draft.featured);
    assert_eq!(draft.image, None);
  }

  #[test]
  fn featured_defaults_to_false() {
    let mut body = valid_body();
    body.as_object_mut().unwrap().remove("featured");
    let draft = PropertyDraft::from_value(&body).unwrap();
    assert!(!draft.featured);
  }

  #[test]
  fn integer_price_is_accepted() {
    let mut body = valid_body();
    body["price"] = json!(450000);
    let draft = PropertyDraft::from_value(&body).unwrap();
    assert_eq!(draft.price, 450000.0);
  }

  #[test]
  fn missing_required_field_is_rejected() {
    for field in ["title", "price", "location", "bedrooms", "bathrooms", "area_sqft"] {
      let mut body = valid_body();
      body.as_object_mut().unwrap().remove(field);
      let err = PropertyDraft::from_value(&body).unwrap_err();
      assert_eq!(err.field, field);
      assert_eq!(err.message, "is required");
    }
  }

  #[test]
  fn null_required_field_is_rejected() {
    let mut body = valid_body();
    body["title"] = Value::Null;
    let err = PropertyDraft::from_value(&body).unwrap_err();
    assert_eq!(err.field, "title");
    assert_eq!(err.message, "is required");
  }

  #[test]
  fn wrong_type_is_rejected() {
    let mut body = valid_body();
    body["title"] = json!(42);
    let err = PropertyDraft::from_value(&body).unwrap_err();
    assert_eq!(err.field, "title");
    assert_eq!(err.message, "must be a string");

    let mut body = valid_body();
    body["bedrooms"] = json!("three");
    let err = PropertyDraft::from_value(&body).unwrap_err();
    assert_eq!(err.field, "bedrooms");
    assert_eq!(err.message, "must be an integer");

    let mut body = valid_body();
    body["bedrooms"] = json!(2.5);
    let err = PropertyDraft::from_value(&body).unwrap_err();
    assert_eq!(err.message, "must be an integer");
  }

  #[test]
  fn zero_area_is_rejected() {
    let mut body = valid_body();
    body["area_sqft"] = json!(0);
    let err = PropertyDraft::from_value(&body).unwrap_err();
    assert_eq!(err.field, "area_sqft");
    assert_eq!(err.message, "must be greater than 0");
  }

  #[test]
  fn negative_area_is_rejected() {
    let mut body = valid_body();
    body["area_sqft"] = json!(-5);
    let err = PropertyDraft::from_value(&body).unwrap_err();
    assert_eq!(err.message, "must be greater than 0");
  }

  #[test]
  fn non_object_body_is_rejected() {
    assert!(PropertyDraft::from_value(&json!([1, 2, 3])).is_err());
    assert!(PropertyDraft::from_value(&json!("villa")).is_err());
  }

  #[test]
  fn optional_fields_accept_null_or_absent() {
    let mut body = valid_body();
    body["image"] = Value::Null;
    let draft = PropertyDraft::from_value(&body).unwrap();
    assert_eq!(draft.image, None);

    body["description"] = json!("Quiet street");
    let draft = PropertyDraft::from_value(&body).unwrap();
    assert_eq!(draft.description.as_deref(), Some("Quiet street"));
  }

  #[test]
  fn unknown_fields_are_ignored() {
    let mut body = valid_body();
    body["pool"] = json!(true);
    assert!(PropertyDraft::from_value(&body).is_ok());
  }

  #[test]
  fn document_omits_absent_optionals() {
    let draft = PropertyDraft::from_value(&valid_body()).unwrap();
    let doc = draft.into_document();
    let obj = doc.as_object().unwrap();
    assert!(!obj.contains_key("image"));
    assert!(!obj.contains_key("description"));
    assert_eq!(doc["featured"], json!(true));
    assert_eq!(doc["area_sqft"], json!(2800));
  }

  #[test]
  fn document_keeps_present_optionals() {
    let mut body = valid_body();
    body["description"] = json!("Steps from the beach");
    let doc = PropertyDraft::from_value(&body).unwrap().into_document();
    assert_eq!(doc["description"], json!("Steps from the beach"));
  }
}

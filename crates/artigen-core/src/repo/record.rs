//! Registro genérico del store: `{id, content, metadata}`.
//!
//! En disco (y en la columna `metadata` del backend relacional) un registro es
//! un único objeto JSON plano: `id`, `content` y las claves de metadata al
//! mismo nivel. Sólo en esta frontera el registro es no tipado.
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    // `Some(Value::Null)` es contenido válido; sólo la ausencia de la clave es `None`.
    #[serde(default, deserialize_with = "present_value", skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

fn present_value<'de, D>(d: D) -> Result<Option<Value>, D::Error>
    where D: Deserializer<'de>
{
    Value::deserialize(d).map(Some)
}

impl Record {
    /// Construye un registro a partir de contenido y metadata. Una clave `id`
    /// en la metadata se promueve a identificador; una clave `content` se
    /// descarta (manda el parámetro).
    pub fn new(content: Option<Value>, mut metadata: Map<String, Value>) -> Self {
        let id = match metadata.remove("id") {
            Some(Value::String(s)) => Some(s),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };
        metadata.remove("content");
        Self { id, content, metadata }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Valor de un campo: `id`, `content` o una clave de metadata.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => self.id.clone().map(Value::String),
            "content" => self.content.clone(),
            _ => self.metadata.get(name).cloned(),
        }
    }

    /// Igualdad campo a campo contra todos los pares de `criteria`.
    pub fn matches(&self, criteria: &Criteria) -> bool {
        criteria.iter().all(|(k, v)| match k.as_str() {
                           "id" => matches!((self.id.as_deref(), v), (Some(id), Value::String(s)) if id == s),
                           "content" => self.content.as_ref() == Some(v),
                           _ => self.metadata.get(k) == Some(v),
                       })
    }
}

/// Criterios de búsqueda: pares campo→valor que deben cumplirse todos.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria(Map<String, Value>);

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for Criteria {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Criteria {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn flat_json_shape() {
        let r = Record::new(Some(json!("hola")), meta(json!({"id": "c1", "type": "stakeholder"})));
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v, json!({"id": "c1", "content": "hola", "type": "stakeholder"}));
        let back: Record = serde_json::from_value(v).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn null_content_is_kept_distinct_from_missing_content() {
        let with_null: Record = serde_json::from_value(json!({"id": "a", "content": null})).unwrap();
        assert_eq!(with_null.content, Some(Value::Null));
        let without: Record = serde_json::from_value(json!({"id": "b", "type": "use_case"})).unwrap();
        assert_eq!(without.content, None);
        assert_eq!(without.metadata.get("type"), Some(&json!("use_case")));
    }

    #[test]
    fn matches_requires_every_pair() {
        let r = Record::new(Some(json!(1)), meta(json!({"type": "user_story", "lang": "es"})));
        assert!(r.matches(&Criteria::new().with("type", "user_story")));
        assert!(r.matches(&Criteria::new().with("type", "user_story").with("lang", "es")));
        assert!(!r.matches(&Criteria::new().with("type", "user_story").with("lang", "en")));
        assert!(!r.matches(&Criteria::new().with("missing", "x")));
    }

    #[test]
    fn matches_on_id_and_content() {
        let r = Record::new(Some(json!({"a": 1})), Map::new()).with_id("r-1");
        assert!(r.matches(&Criteria::new().with("id", "r-1")));
        assert!(r.matches(&Criteria::new().with("content", json!({"a": 1}))));
        assert!(!r.matches(&Criteria::new().with("id", "r-2")));
    }

    #[test]
    fn field_lookup() {
        let r = Record::new(Some(json!("x")), meta(json!({"id": "r-9", "type": "feature"})));
        assert_eq!(r.field("id"), Some(json!("r-9")));
        assert_eq!(r.field("content"), Some(json!("x")));
        assert_eq!(r.field("type"), Some(json!("feature")));
        assert_eq!(r.field("otro"), None);
    }
}

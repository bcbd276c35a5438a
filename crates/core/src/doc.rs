//! Mapping between [`Product`] records and catalog store documents.
//!
//! The catalog store speaks the Firestore REST document format: a document
//! is a JSON object carrying a `name` (full resource path whose last
//! segment is the opaque document key) and a `fields` map of typed values
//! such as `{"stringValue": "..."}` or `{"integerValue": "3"}`. This module
//! is pure JSON construction and parsing; the HTTP clients in the binaries
//! own the transport.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value, json};

use crate::types::{Category, DocId, ImageData, Price, Product, ProductId};

/// Field paths the admin panel may change on an existing document.
///
/// The business `id` and `criadoEm` are absent: they are set once at
/// creation and never patched.
pub const MUTABLE_FIELDS: &[&str] = &[
    "nome",
    "preco",
    "categoria",
    "imagens",
    "destaque",
    "descricao",
    "atualizadoEm",
];

/// Errors that can occur when decoding a store document.
#[derive(thiserror::Error, Debug)]
pub enum DocError {
    /// The document carries no `name` resource path.
    #[error("document has no name")]
    MissingName,
    /// The document carries no `fields` map.
    #[error("document has no fields")]
    MissingFields,
    /// A required field is absent.
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    /// A field holds a value of an unexpected kind.
    #[error("field `{field}` is not a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    /// A field was present but its contents could not be interpreted.
    #[error("field `{field}` is invalid: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode a product as a store `fields` map.
///
/// `descricao` is always written (empty string when absent) to match the
/// documents the store already holds; timestamps are written only when set.
#[must_use]
pub fn product_to_fields(product: &Product) -> Value {
    let mut fields = Map::new();
    fields.insert("id".into(), integer_value(product.id.as_i64()));
    fields.insert("nome".into(), string_value(&product.name));
    fields.insert("preco".into(), double_value(product.price.amount()));
    fields.insert("categoria".into(), string_value(product.category.as_str()));
    fields.insert("imagens".into(), image_array_value(&product.images));
    fields.insert("destaque".into(), json!({ "booleanValue": product.featured }));
    fields.insert(
        "descricao".into(),
        string_value(product.description.as_deref().unwrap_or("")),
    );
    if let Some(ts) = product.created_at {
        fields.insert("criadoEm".into(), timestamp_value(ts));
    }
    if let Some(ts) = product.updated_at {
        fields.insert("atualizadoEm".into(), timestamp_value(ts));
    }
    Value::Object(fields)
}

/// Encode a featured-flag-only `fields` map, used for the single-field
/// toggle update.
#[must_use]
pub fn featured_to_fields(featured: bool) -> Value {
    json!({ "destaque": { "booleanValue": featured } })
}

fn string_value(s: &str) -> Value {
    json!({ "stringValue": s })
}

fn integer_value(i: i64) -> Value {
    // Firestore integers travel as decimal strings.
    json!({ "integerValue": i.to_string() })
}

fn double_value(d: Decimal) -> Value {
    // Prices travel as doubles on the wire; existing documents all use
    // doubleValue.
    let as_f64: f64 = d.to_string().parse().unwrap_or(0.0);
    json!({ "doubleValue": as_f64 })
}

fn timestamp_value(ts: DateTime<Utc>) -> Value {
    json!({ "timestampValue": ts.to_rfc3339_opts(SecondsFormat::Micros, true) })
}

fn image_array_value(images: &[ImageData]) -> Value {
    let values: Vec<Value> = images.iter().map(|img| string_value(img.as_str())).collect();
    json!({ "arrayValue": { "values": values } })
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a full store document into its key and product record.
///
/// # Errors
///
/// Returns a [`DocError`] when the document name, a required field, or a
/// field's type does not match the catalog schema.
pub fn product_from_document(doc: &Value) -> Result<(DocId, Product), DocError> {
    let name = doc
        .get("name")
        .and_then(Value::as_str)
        .ok_or(DocError::MissingName)?;
    let fields = doc
        .get("fields")
        .and_then(Value::as_object)
        .ok_or(DocError::MissingFields)?;

    let product = Product {
        id: ProductId::new(get_integer(fields, "id")?),
        name: get_string(fields, "nome")?.to_owned(),
        price: get_price(fields, "preco")?,
        category: Category::from_stored(get_string(fields, "categoria")?),
        images: get_images(fields)?,
        featured: get_bool_or(fields, "destaque", false)?,
        description: get_optional_text(fields, "descricao")?,
        created_at: get_optional_timestamp(fields, "criadoEm")?,
        updated_at: get_optional_timestamp(fields, "atualizadoEm")?,
    };

    Ok((doc_id_from_name(name), product))
}

/// Extract the opaque document key from a full resource path, e.g.
/// `projects/p/databases/(default)/documents/produtos/a1b2` -> `a1b2`.
#[must_use]
pub fn doc_id_from_name(name: &str) -> DocId {
    let key = name.rsplit('/').next().unwrap_or(name);
    DocId::new(key)
}

fn get_raw<'a>(
    fields: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, DocError> {
    fields.get(field).ok_or(DocError::MissingField(field))
}

fn get_string<'a>(
    fields: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, DocError> {
    get_raw(fields, field)?
        .get("stringValue")
        .and_then(Value::as_str)
        .ok_or(DocError::WrongType {
            field,
            expected: "string",
        })
}

fn get_integer(fields: &Map<String, Value>, field: &'static str) -> Result<i64, DocError> {
    let raw = get_raw(fields, field)?;
    // integerValue is a decimal string on the wire, but tolerate a bare
    // number in case a document was written by hand.
    if let Some(s) = raw.get("integerValue").and_then(Value::as_str) {
        return s.parse().map_err(|_| DocError::InvalidValue {
            field,
            reason: format!("not an integer: {s:?}"),
        });
    }
    if let Some(i) = raw.get("integerValue").and_then(Value::as_i64) {
        return Ok(i);
    }
    Err(DocError::WrongType {
        field,
        expected: "integer",
    })
}

fn get_price(fields: &Map<String, Value>, field: &'static str) -> Result<Price, DocError> {
    let raw = get_raw(fields, field)?;
    // Prices appear as doubleValue in JS-written documents, but a whole
    // amount may have been stored as integerValue.
    let literal = if let Some(n) = raw.get("doubleValue") {
        match n {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            _ => {
                return Err(DocError::WrongType {
                    field,
                    expected: "double",
                });
            }
        }
    } else if let Some(s) = raw.get("integerValue").and_then(Value::as_str) {
        s.to_owned()
    } else {
        return Err(DocError::WrongType {
            field,
            expected: "double",
        });
    };

    let amount: Decimal = literal.parse().map_err(|_| DocError::InvalidValue {
        field,
        reason: format!("not a number: {literal:?}"),
    })?;
    Price::from_decimal(amount).map_err(|e| DocError::InvalidValue {
        field,
        reason: e.to_string(),
    })
}

fn get_bool_or(
    fields: &Map<String, Value>,
    field: &'static str,
    default: bool,
) -> Result<bool, DocError> {
    match fields.get(field) {
        None => Ok(default),
        Some(raw) => raw
            .get("booleanValue")
            .and_then(Value::as_bool)
            .ok_or(DocError::WrongType {
                field,
                expected: "boolean",
            }),
    }
}

fn get_optional_text(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, DocError> {
    match fields.get(field) {
        None => Ok(None),
        Some(raw) => {
            let s = raw
                .get("stringValue")
                .and_then(Value::as_str)
                .ok_or(DocError::WrongType {
                    field,
                    expected: "string",
                })?;
            Ok(if s.is_empty() { None } else { Some(s.to_owned()) })
        }
    }
}

fn get_optional_timestamp(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<DateTime<Utc>>, DocError> {
    match fields.get(field) {
        None => Ok(None),
        Some(raw) => {
            let s = raw
                .get("timestampValue")
                .and_then(Value::as_str)
                .ok_or(DocError::WrongType {
                    field,
                    expected: "timestamp",
                })?;
            let parsed = DateTime::parse_from_rfc3339(s).map_err(|e| DocError::InvalidValue {
                field,
                reason: e.to_string(),
            })?;
            Ok(Some(parsed.with_timezone(&Utc)))
        }
    }
}

fn get_images(fields: &Map<String, Value>) -> Result<Vec<ImageData>, DocError> {
    let field = "imagens";
    let raw = get_raw(fields, field)?;
    // An empty arrayValue arrives without a `values` key.
    let Some(array) = raw.get("arrayValue") else {
        // Very old documents stored a single image as a plain string.
        if let Some(s) = raw.get("stringValue").and_then(Value::as_str) {
            return Ok(vec![ImageData::new(s)]);
        }
        return Err(DocError::WrongType {
            field,
            expected: "array",
        });
    };
    let Some(values) = array.get("values").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    values
        .iter()
        .map(|v| {
            v.get("stringValue")
                .and_then(Value::as_str)
                .map(ImageData::new)
                .ok_or(DocError::WrongType {
                    field,
                    expected: "array of strings",
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample_product() -> Product {
        Product {
            id: ProductId::new(7),
            name: "Manta de crochê".to_owned(),
            price: Price::parse("149.90").expect("valid price"),
            category: Category::slugify("croche").expect("valid category"),
            images: vec![
                ImageData::new("data:image/jpeg;base64,AAAA"),
                ImageData::new("data:image/jpeg;base64,BBBB"),
            ],
            featured: true,
            description: Some("Feita à mão".to_owned()),
            created_at: Some(Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()),
            updated_at: None,
        }
    }

    fn wrap_document(fields: Value) -> Value {
        json!({
            "name": "projects/p/databases/(default)/documents/produtos/a1b2c3",
            "fields": fields,
        })
    }

    #[test]
    fn product_round_trips_through_document_fields() {
        let product = sample_product();
        let doc = wrap_document(product_to_fields(&product));

        let (doc_id, decoded) = product_from_document(&doc).expect("decodes");
        assert_eq!(doc_id.as_str(), "a1b2c3");
        assert_eq!(decoded, product);
    }

    #[test]
    fn empty_description_decodes_as_none() {
        let mut product = sample_product();
        product.description = None;
        let doc = wrap_document(product_to_fields(&product));

        let (_, decoded) = product_from_document(&doc).expect("decodes");
        assert_eq!(decoded.description, None);
    }

    #[test]
    fn whole_number_price_stored_as_integer_still_decodes() {
        let mut fields = product_to_fields(&sample_product());
        fields["preco"] = json!({ "integerValue": "45" });
        let doc = wrap_document(fields);

        let (_, decoded) = product_from_document(&doc).expect("decodes");
        assert_eq!(decoded.price.display(), "R$ 45.00");
    }

    #[test]
    fn missing_name_field_is_an_error() {
        let mut fields = product_to_fields(&sample_product());
        fields.as_object_mut().expect("object").remove("nome");
        let doc = wrap_document(fields);

        assert!(matches!(
            product_from_document(&doc),
            Err(DocError::MissingField("nome"))
        ));
    }

    #[test]
    fn absent_destaque_defaults_to_false() {
        let mut fields = product_to_fields(&sample_product());
        fields.as_object_mut().expect("object").remove("destaque");
        let doc = wrap_document(fields);

        let (_, decoded) = product_from_document(&doc).expect("decodes");
        assert!(!decoded.featured);
    }

    #[test]
    fn non_positive_stored_price_is_rejected() {
        let mut fields = product_to_fields(&sample_product());
        fields["preco"] = json!({ "doubleValue": 0.0 });
        let doc = wrap_document(fields);

        assert!(matches!(
            product_from_document(&doc),
            Err(DocError::InvalidValue { field: "preco", .. })
        ));
    }

    #[test]
    fn doc_id_is_last_segment_of_resource_name() {
        let id = doc_id_from_name("projects/p/databases/(default)/documents/produtos/xyz9");
        assert_eq!(id.as_str(), "xyz9");
    }
}

//! Knowledge document types.
//!
//! Every section and every field is optional: absence is never an error at
//! this layer. Scalar fields keep whatever JSON value the author wrote and
//! render it verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The whole knowledge base.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_info: Option<CompanyInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Amenities>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_info: Option<PricingInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faqs: Option<Vec<Faq>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<ContactInfo>,
}

impl KnowledgeDocument {
    /// Number of top-level sections present.
    pub fn section_count(&self) -> usize {
        [
            self.company_info.is_some(),
            self.projects.is_some(),
            self.amenities.is_some(),
            self.pricing_info.is_some(),
            self.faqs.is_some(),
            self.contact_info.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    pub fn project_count(&self) -> usize {
        self.projects.as_ref().map_or(0, Vec::len)
    }

    pub fn faq_count(&self) -> usize {
        self.faqs.as_ref().map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: Option<Field>,
    pub tagline: Option<Field>,
    pub years_of_experience: Option<Field>,
    pub about: Option<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: Option<Field>,
    #[serde(rename = "type")]
    pub kind: Option<Field>,
    pub location: Option<Field>,
    pub configurations: Option<Vec<Field>>,
    /// Configuration label → price, in document order
    pub price_range: Option<Map<String, Value>>,
    /// Configuration label → size, in document order
    pub sizes: Option<Map<String, Value>>,
    pub rera_number: Option<Field>,
    pub possession_date: Option<Field>,
    pub status: Option<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Amenities {
    pub common: Option<Vec<Field>>,
    pub premium_villas_only: Option<Vec<Field>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingInfo {
    pub booking_amount: Option<Field>,
    pub home_loan_assistance: Option<Field>,
    pub special_offers: Option<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    pub question: Option<Field>,
    pub answer: Option<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone: Option<Field>,
    pub email: Option<Field>,
    pub office_address: Option<Field>,
    pub working_hours: Option<Field>,
}

/// A leaf value as written in the document.
///
/// Strings render without quotes, numbers and booleans as written, arrays as
/// a comma-joined list, objects as compact JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Field(pub Value);

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Self(Value::String(s.to_string()))
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_value(f, &self.0)
    }
}

/// Render any JSON value the way [`Field`] does.
pub(crate) fn render_value(value: &Value) -> String {
    Field(value.clone()).to_string()
}

fn write_value(f: &mut std::fmt::Formatter<'_>, value: &Value) -> std::fmt::Result {
    match value {
        Value::String(s) => f.write_str(s),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, item)?;
            }
            Ok(())
        }
        other => write!(f, "{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fields_render_verbatim() {
        assert_eq!(Field(json!("Noida")).to_string(), "Noida");
        assert_eq!(Field(json!(15)).to_string(), "15");
        assert_eq!(Field(json!(4.5)).to_string(), "4.5");
        assert_eq!(Field(json!(true)).to_string(), "true");
        assert_eq!(Field(json!(["Gym", "Pool"])).to_string(), "Gym, Pool");
    }

    #[test]
    fn null_field_deserializes_as_missing() {
        let info: ContactInfo = serde_json::from_value(json!({"phone": null})).unwrap();
        assert!(info.phone.is_none());
    }

    #[test]
    fn project_type_key_maps_to_kind() {
        let project: Project =
            serde_json::from_value(json!({"name": "Skyline Heights", "type": "Apartments"}))
                .unwrap();
        assert_eq!(project.kind, Some(Field::from("Apartments")));
    }

    #[test]
    fn price_range_keeps_document_order() {
        let project: Project = serde_json::from_str(
            r#"{"price_range": {"3BHK": "1.2 Cr", "2BHK": "85 L", "4BHK": "1.8 Cr"}}"#,
        )
        .unwrap();
        let keys: Vec<&String> = project.price_range.as_ref().unwrap().keys().collect();
        assert_eq!(keys, ["3BHK", "2BHK", "4BHK"]);
    }

    #[test]
    fn counts_sections() {
        let doc: KnowledgeDocument = serde_json::from_value(json!({
            "projects": [{}, {}],
            "contact_info": {},
            "unrelated": 1
        }))
        .unwrap();
        assert_eq!(doc.section_count(), 2);
        assert_eq!(doc.project_count(), 2);
        assert_eq!(doc.faq_count(), 0);
    }
}

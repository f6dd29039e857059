//! Context formatting — knowledge document to prompt text.
//!
//! Sections always appear in the same order: company info, projects,
//! amenities, pricing, FAQs, contact info. Absent sections are skipped
//! entirely; absent scalar fields inside a present section render as
//! [`MISSING`]. The output depends on nothing but the document and the title.

use serde_json::{Map, Value};

use crate::document::{
    Amenities, CompanyInfo, ContactInfo, Faq, Field, KnowledgeDocument, PricingInfo, Project,
    render_value,
};

/// Placeholder for any missing scalar.
pub const MISSING: &str = "N/A";

/// Title used when none is configured.
pub const DEFAULT_TITLE: &str = "SKYLINE RESIDENCES";

/// Formats a [`KnowledgeDocument`] into the context block.
#[derive(Debug, Clone)]
pub struct ContextFormatter {
    title: String,
}

impl ContextFormatter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Render the whole document. Never fails.
    pub fn format(&self, doc: &KnowledgeDocument) -> String {
        let mut ctx = format!("{} - KNOWLEDGE BASE\n\n", self.title);

        if let Some(company) = &doc.company_info {
            push_company(&mut ctx, company);
        }
        if let Some(projects) = &doc.projects {
            ctx.push_str("=== AVAILABLE PROJECTS ===\n");
            for project in projects {
                push_project(&mut ctx, project);
            }
        }
        if let Some(amenities) = &doc.amenities {
            push_amenities(&mut ctx, amenities);
        }
        if let Some(pricing) = &doc.pricing_info {
            push_pricing(&mut ctx, pricing);
        }
        if let Some(faqs) = &doc.faqs {
            ctx.push_str("\n=== FREQUENTLY ASKED QUESTIONS ===\n");
            for faq in faqs {
                push_faq(&mut ctx, faq);
            }
        }
        if let Some(contact) = &doc.contact_info {
            push_contact(&mut ctx, contact);
        }

        ctx
    }
}

impl Default for ContextFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

/// Format with the default title.
pub fn format_context(doc: &KnowledgeDocument) -> String {
    ContextFormatter::default().format(doc)
}

fn or_missing(field: &Option<Field>) -> String {
    field
        .as_ref()
        .map_or_else(|| MISSING.to_string(), Field::to_string)
}

fn join(items: &[Field]) -> String {
    items
        .iter()
        .map(Field::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn push_company(ctx: &mut String, company: &CompanyInfo) {
    ctx.push_str("=== COMPANY INFORMATION ===\n");
    ctx.push_str(&format!("Name: {}\n", or_missing(&company.name)));
    ctx.push_str(&format!("Tagline: {}\n", or_missing(&company.tagline)));
    ctx.push_str(&format!(
        "Experience: {} years\n",
        or_missing(&company.years_of_experience)
    ));
    ctx.push_str(&format!("About: {}\n\n", or_missing(&company.about)));
}

fn push_project(ctx: &mut String, project: &Project) {
    ctx.push_str(&format!("\nProject: {}\n", or_missing(&project.name)));
    ctx.push_str(&format!("Type: {}\n", or_missing(&project.kind)));
    ctx.push_str(&format!("Location: {}\n", or_missing(&project.location)));
    ctx.push_str(&format!(
        "Configurations: {}\n",
        project.configurations.as_deref().map(join).unwrap_or_default()
    ));

    if let Some(prices) = &project.price_range {
        push_itemized(ctx, "Pricing:", prices);
    }
    if let Some(sizes) = &project.sizes {
        push_itemized(ctx, "Sizes:", sizes);
    }

    ctx.push_str(&format!("RERA: {}\n", or_missing(&project.rera_number)));
    ctx.push_str(&format!("Possession: {}\n", or_missing(&project.possession_date)));
    ctx.push_str(&format!("Status: {}\n", or_missing(&project.status)));
}

fn push_itemized(ctx: &mut String, heading: &str, items: &Map<String, Value>) {
    ctx.push_str(heading);
    ctx.push('\n');
    for (config, value) in items {
        ctx.push_str(&format!("  {config}: {}\n", render_value(value)));
    }
}

fn push_amenities(ctx: &mut String, amenities: &Amenities) {
    ctx.push_str("\n=== AMENITIES ===\n");
    if let Some(common) = &amenities.common {
        ctx.push_str(&format!("Common Amenities: {}\n", join(common)));
    }
    if let Some(premium) = &amenities.premium_villas_only {
        ctx.push_str(&format!("Premium (Villas Only): {}\n", join(premium)));
    }
}

fn push_pricing(ctx: &mut String, pricing: &PricingInfo) {
    ctx.push_str("\n=== PRICING & PAYMENT ===\n");
    ctx.push_str(&format!("Booking Amount: {}\n", or_missing(&pricing.booking_amount)));
    ctx.push_str(&format!("Home Loan: {}\n", or_missing(&pricing.home_loan_assistance)));
    ctx.push_str(&format!("Special Offers: {}\n", or_missing(&pricing.special_offers)));
}

fn push_faq(ctx: &mut String, faq: &Faq) {
    ctx.push_str(&format!("\nQ: {}\n", or_missing(&faq.question)));
    ctx.push_str(&format!("A: {}\n", or_missing(&faq.answer)));
}

fn push_contact(ctx: &mut String, contact: &ContactInfo) {
    ctx.push_str("\n=== CONTACT INFORMATION ===\n");
    ctx.push_str(&format!("Phone: {}\n", or_missing(&contact.phone)));
    ctx.push_str(&format!("Email: {}\n", or_missing(&contact.email)));
    ctx.push_str(&format!("Office: {}\n", or_missing(&contact.office_address)));
    ctx.push_str(&format!("Hours: {}\n", or_missing(&contact.working_hours)));
}

//! Static page content handlers

use axum::Json;
use shared::{PageContent, PageSection};

fn page(title: &str, sections: &[(&str, &str)]) -> PageContent {
    PageContent {
        title: title.to_string(),
        sections: sections
            .iter()
            .map(|(heading, body)| PageSection {
                heading: heading.to_string(),
                body: body.to_string(),
            })
            .collect(),
    }
}

/// Home page endpoint handler
pub async fn home() -> Json<PageContent> {
    Json(page(
        "Crop Advisor",
        &[
            (
                "Smart crop recommendation",
                "Enter your soil and weather conditions and get the crop best suited to them.",
            ),
            (
                "Weather pre-fill",
                "Search your city or share your location to fill temperature, humidity, wind and rainfall automatically.",
            ),
            (
                "Guidance and market outlook",
                "Each recommendation comes with a cultivation guide, common diseases and an indicative price chart.",
            ),
        ],
    ))
}

/// About page endpoint handler
pub async fn about() -> Json<PageContent> {
    Json(page(
        "About",
        &[
            (
                "What it does",
                "Crop Advisor uses a machine learning model trained on field records to match conditions to crops.",
            ),
            (
                "Market charts",
                "Price and demand charts are simulated for illustration and are not live market data.",
            ),
        ],
    ))
}

/// Contact page endpoint handler
pub async fn contact_page() -> Json<PageContent> {
    Json(page(
        "Contact",
        &[(
            "Get in touch",
            "Send us your name, email, a subject and your message and we will get back to you.",
        )],
    ))
}

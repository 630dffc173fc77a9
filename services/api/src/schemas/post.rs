//! Post payload validation: a tag-directed union over events, offers and news
//!
//! Creation requires every variant-specific field for the claimed `type`;
//! updates accept the same union with every field optional. Date-like fields
//! are coerced from strings during validation.

use serde_json::Value;
use uuid::Uuid;

use crate::error::FieldError;
use crate::models::{NewPost, PostDetails, PostUpdate};
use crate::schemas::{
    FromData, optional_date, optional_string, optional_string_array, require_date,
    require_string, require_string_array,
};

const KINDS: [&str; 3] = ["event", "offer", "news"];
const KIND_MESSAGE: &str = "type must be one of 'event', 'offer', or 'news'";

impl FromData for NewPost {
    fn from_data(value: &Value) -> Result<Self, Vec<FieldError>> {
        let mut errors = vec![];

        let title = require_string(value, "title", &mut errors);
        let description = require_string(value, "description", &mut errors);
        let kind = require_string(value, "type", &mut errors);
        let attachments = optional_string(value, "attachments", &mut errors);
        let images = optional_string_array(value, "images", &mut errors).unwrap_or_default();

        let organizer_id = require_string(value, "organizer_id", &mut errors).and_then(|raw| {
            match Uuid::parse_str(&raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.push(FieldError::new(
                        "organizer_id",
                        "organizer_id is not a valid id",
                    ));
                    None
                }
            }
        });

        let cities = require_string_array(value, "cities", &mut errors);
        let tags = require_string_array(value, "tags", &mut errors);

        let details = match kind.as_deref() {
            Some("event") => {
                let date = require_date(value, "date", &mut errors);
                let location = require_string(value, "location", &mut errors);
                let registration_link = require_string(value, "registration_link", &mut errors);

                match (date, location, registration_link) {
                    (Some(date), Some(location), Some(registration_link)) => {
                        Some(PostDetails::Event {
                            date,
                            location,
                            registration_link,
                        })
                    }
                    _ => None,
                }
            }
            Some("offer") => {
                let external_link = require_string(value, "external_link", &mut errors);
                let deadline = require_date(value, "deadline", &mut errors);

                match (external_link, deadline) {
                    (Some(external_link), Some(deadline)) => Some(PostDetails::Offer {
                        external_link,
                        deadline,
                    }),
                    _ => None,
                }
            }
            Some("news") => require_string(value, "author", &mut errors)
                .map(|author| PostDetails::News { author }),
            Some(_) => {
                errors.push(FieldError::new("type", KIND_MESSAGE));
                None
            }
            None => None,
        };

        match (title, description, organizer_id, cities, tags, details) {
            (Some(title), Some(description), Some(organizer_id), Some(cities), Some(tags), Some(details))
                if errors.is_empty() =>
            {
                Ok(NewPost {
                    title,
                    description,
                    attachments,
                    images,
                    organizer_id,
                    cities,
                    tags,
                    details,
                })
            }
            _ => Err(errors),
        }
    }
}

impl FromData for PostUpdate {
    fn from_data(value: &Value) -> Result<Self, Vec<FieldError>> {
        let mut errors = vec![];

        let kind = optional_string(value, "type", &mut errors).and_then(|kind| {
            if KINDS.contains(&kind.as_str()) {
                Some(kind)
            } else {
                errors.push(FieldError::new("type", KIND_MESSAGE));
                None
            }
        });

        let update = PostUpdate {
            title: optional_string(value, "title", &mut errors),
            description: optional_string(value, "description", &mut errors),
            attachments: optional_string(value, "attachments", &mut errors),
            images: optional_string_array(value, "images", &mut errors),
            cities: optional_string_array(value, "cities", &mut errors),
            tags: optional_string_array(value, "tags", &mut errors),
            kind,
            date: optional_date(value, "date", &mut errors),
            location: optional_string(value, "location", &mut errors),
            registration_link: optional_string(value, "registration_link", &mut errors),
            external_link: optional_string(value, "external_link", &mut errors),
            deadline: optional_date(value, "deadline", &mut errors),
            author: optional_string(value, "author", &mut errors),
        };

        if errors.is_empty() { Ok(update) } else { Err(errors) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event_payload() -> Value {
        json!({
            "title": "Clean-up day",
            "description": "Neighbourhood clean-up",
            "type": "event",
            "organizer_id": "7e0cf1fe-7e0c-4aa0-a721-3db262b7cbb8",
            "cities": ["Bogota"],
            "tags": ["community"],
            "date": "2026-06-01T18:00:00Z",
            "location": "Central park",
            "registration_link": "https://example.org/signup"
        })
    }

    #[test]
    fn test_event_with_all_fields_passes() {
        let post = NewPost::from_data(&event_payload()).unwrap();
        assert!(matches!(post.details, PostDetails::Event { .. }));
        assert_eq!(post.details.kind(), "event");
    }

    #[test]
    fn test_event_missing_location_fails_with_field_path() {
        let mut payload = event_payload();
        payload.as_object_mut().unwrap().remove("location");

        let errors = NewPost::from_data(&payload).unwrap_err();
        assert!(errors.iter().any(|e| e.path == "location" && e.message == "location is required"));
    }

    #[test]
    fn test_event_with_unparseable_date_fails() {
        let mut payload = event_payload();
        payload["date"] = json!("next tuesday");

        let errors = NewPost::from_data(&payload).unwrap_err();
        assert!(errors.iter().any(|e| e.path == "date" && e.message == "date is not a valid date"));
    }

    #[test]
    fn test_news_payload() {
        let payload = json!({
            "title": "T",
            "description": "D",
            "type": "news",
            "organizer_id": "7e0cf1fe-7e0c-4aa0-a721-3db262b7cbb8",
            "cities": ["X"],
            "tags": ["y"],
            "author": "A"
        });

        let post = NewPost::from_data(&payload).unwrap();
        assert!(matches!(post.details, PostDetails::News { ref author } if author == "A"));
    }

    #[test]
    fn test_offer_requires_deadline_and_external_link() {
        let payload = json!({
            "title": "Internship",
            "description": "Summer internship",
            "type": "offer",
            "organizer_id": "7e0cf1fe-7e0c-4aa0-a721-3db262b7cbb8",
            "cities": ["Cali"],
            "tags": ["work"]
        });

        let errors = NewPost::from_data(&payload).unwrap_err();
        let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&"external_link"));
        assert!(paths.contains(&"deadline"));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let mut payload = event_payload();
        payload["type"] = json!("banner");

        let errors = NewPost::from_data(&payload).unwrap_err();
        assert!(errors.iter().any(|e| e.path == "type" && e.message == KIND_MESSAGE));
    }

    #[test]
    fn test_update_accepts_partial_tagged_payload() {
        let update = PostUpdate::from_data(&json!({
            "type": "event",
            "location": "New venue"
        }))
        .unwrap();

        assert_eq!(update.kind.as_deref(), Some("event"));
        assert_eq!(update.location.as_deref(), Some("New venue"));
        assert!(update.date.is_none());
        assert!(update.title.is_none());
    }

    #[test]
    fn test_update_still_coerces_dates() {
        let update = PostUpdate::from_data(&json!({"deadline": "2026-09-30"})).unwrap();
        assert!(update.deadline.is_some());

        let errors = PostUpdate::from_data(&json!({"deadline": "soon"})).unwrap_err();
        assert_eq!(errors[0].path, "deadline");
    }
}

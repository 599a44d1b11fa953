use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Six-facet personality descriptor generated once per pet and fed into
/// every downstream generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaDna {
    pub personality: String,
    pub guiding_theme: String,
    pub emotional_trigger: String,
    pub mobility_range: String,
    pub interest_depth: String,
    pub temporal_focus: String,
}

/// Generated profile of a pet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetProfile {
    pub name: String,
    pub persona_dna: PersonaDna,
    pub introduction: String,
}

/// Travel target generated for one diary cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub selected_location: String,
    pub summary: String,
    pub news_context: String,
    pub local_details: String,
}

/// Pet record
///
/// At most one live pet exists per owner email at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pet {
    pub id: Uuid,
    pub email: String,
    pub profile: PetProfile,
    pub created_at: DateTime<Utc>,
    pub next_destination: Option<Destination>,
    pub destinations: Vec<Destination>,
}

impl Pet {
    /// Whole days elapsed since the pet was created.
    pub fn age_in_days(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.created_at).num_days()
    }

    /// A pet is eligible for expiry once its age reaches the configured
    /// lifespan. The boundary is inclusive: age == lifespan expires.
    pub fn is_expired(&self, now: DateTime<Utc>, lifespan_days: i64) -> bool {
        self.age_in_days(now) >= lifespan_days
    }
}

/// One diary page, keyed by calendar date. Regenerating on the same day
/// overwrites the existing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub itinerary: Destination,
    pub diary: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Narrative plus image prompt produced by the diary model for one
/// destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiaryPage {
    pub diary: String,
    pub image_prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn pet(created_at: DateTime<Utc>) -> Pet {
        Pet {
            id: Uuid::new_v4(),
            email: "owner@example.com".to_string(),
            profile: PetProfile {
                name: "ぽち".to_string(),
                persona_dna: PersonaDna {
                    personality: "a".to_string(),
                    guiding_theme: "b".to_string(),
                    emotional_trigger: "c".to_string(),
                    mobility_range: "d".to_string(),
                    interest_depth: "e".to_string(),
                    temporal_focus: "f".to_string(),
                },
                introduction: "hi".to_string(),
            },
            created_at,
            next_destination: None,
            destinations: vec![],
        }
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let now = Utc::now();
        assert!(pet(now - Duration::days(10)).is_expired(now, 10));
        assert!(pet(now - Duration::days(11)).is_expired(now, 10));
        assert!(!pet(now - Duration::days(9)).is_expired(now, 10));
    }

    #[test]
    fn persona_serializes_with_six_facets() {
        let dna = PersonaDna {
            personality: "curious".to_string(),
            guiding_theme: "food".to_string(),
            emotional_trigger: "sunsets".to_string(),
            mobility_range: "global".to_string(),
            interest_depth: "deep".to_string(),
            temporal_focus: "present".to_string(),
        };
        let value = serde_json::to_value(&dna).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 6);
        assert_eq!(value["guiding_theme"], "food");
    }
}

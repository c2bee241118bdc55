use chrono::{Duration, Utc};
use futures::future::{join, join_all};

use crate::models::itinerary::{DayPlan, GeneratedItineraries, Itinerary};
use crate::models::preferences::TripPreferences;
use crate::services::completion_service::{CompletionError, CompletionService};
use crate::services::hotel_service::HotelLookup;
use crate::services::image_service::ImageLookup;

const SYSTEM_PROMPT: &str = "You are a travel planner that responds with JSON only. \
Do not wrap the JSON in markdown code fences and do not add commentary.";

const ITINERARY_COUNT: usize = 2;

#[derive(Debug)]
pub enum GenerationError {
    MissingCredential(&'static str),
    UpstreamUnavailable(String),
    UpstreamEmptyResponse,
    MalformedResponse { error: String, cleaned: String },
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::MissingCredential(var) => {
                write!(f, "{} environment variable not set", var)
            }
            GenerationError::UpstreamUnavailable(details) => {
                write!(f, "Completion API unavailable: {}", details)
            }
            GenerationError::UpstreamEmptyResponse => {
                write!(f, "No response choices returned from the completion API")
            }
            GenerationError::MalformedResponse { error, .. } => {
                write!(f, "Completion text is not a valid itinerary: {}", error)
            }
        }
    }
}

impl std::error::Error for GenerationError {}

/// The orchestration core: one completion call drafts the itineraries, a
/// validated parse types them, and a concurrent per-day pass decorates them
/// with photos and lodging. Enrichment is best effort; only the completion
/// leg can fail the request.
pub struct RecommendationService<I, H> {
    completion: CompletionService,
    images: I,
    hotels: H,
}

impl<I: ImageLookup, H: HotelLookup> RecommendationService<I, H> {
    pub fn new(completion: CompletionService, images: I, hotels: H) -> Self {
        Self {
            completion,
            images,
            hotels,
        }
    }

    pub async fn generate_recommendations(
        &self,
        preferences: &TripPreferences,
    ) -> Result<GeneratedItineraries, GenerationError> {
        let prompt = build_prompt(preferences);

        let response = self
            .completion
            .complete(SYSTEM_PROMPT, &prompt)
            .await
            .map_err(|err| match err {
                CompletionError::MissingCredential(var) => GenerationError::MissingCredential(var),
                other => GenerationError::UpstreamUnavailable(other.to_string()),
            })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(GenerationError::UpstreamEmptyResponse)?;
        let raw_text = choice.message.content.unwrap_or_default();
        if raw_text.trim().is_empty() {
            return Err(GenerationError::UpstreamEmptyResponse);
        }

        let cleaned = clean_completion_text(&raw_text);
        let mut generated = parse_itineraries(cleaned, preferences.travel_time)?;

        println!(
            "Generated {} itinerary options, enriching {} days",
            generated.itineraries.len(),
            generated
                .itineraries
                .iter()
                .map(|itinerary| itinerary.daily_plan.len())
                .sum::<usize>()
        );

        self.enrich(&mut generated.itineraries, preferences).await;

        Ok(generated)
    }

    /// Attach an image and hotel offers to every day of every itinerary.
    /// All days are enriched concurrently and every task is awaited; a
    /// failed lookup logs and leaves its field unset without touching the
    /// other days or failing the request.
    async fn enrich(&self, itineraries: &mut [Itinerary], preferences: &TripPreferences) {
        let mut tasks = Vec::new();
        for itinerary in itineraries.iter_mut() {
            for day in itinerary.daily_plan.iter_mut() {
                tasks.push(self.enrich_day(day, preferences));
            }
        }

        join_all(tasks).await;
    }

    async fn enrich_day(&self, day: &mut DayPlan, preferences: &TripPreferences) {
        let primary_location = match day.locations.first() {
            Some(location) => location.clone(),
            None => {
                eprintln!("Day {} has no locations to enrich", day.day);
                return;
            }
        };

        // The overall destination text disambiguates same-named cities.
        let image_query = match &preferences.destinations {
            Some(destinations) if !destinations.trim().is_empty() => {
                format!("{} {}", primary_location, destinations.trim())
            }
            _ => primary_location.clone(),
        };

        let check_in = Utc::now().date_naive() + Duration::days(i64::from(day.day) - 1);
        let check_out = check_in + Duration::days(1);

        let (image, hotels) = join(
            self.images.location_image(&image_query),
            self.hotels.hotels_for_location(
                &primary_location,
                preferences.budget,
                check_in,
                check_out,
            ),
        )
        .await;

        match image {
            Ok(image) => day.image = Some(image),
            Err(err) => eprintln!("Image enrichment failed for day {}: {}", day.day, err),
        }

        match hotels {
            Ok(offers) => day.hotels = Some(offers),
            Err(err) => eprintln!("Hotel enrichment failed for day {}: {}", day.day, err),
        }
    }
}

fn build_prompt(preferences: &TripPreferences) -> String {
    let destinations = match &preferences.destinations {
        Some(destinations) if !destinations.trim().is_empty() => destinations.trim(),
        _ => "No preference",
    };
    let trip_type = preferences
        .trip_type
        .as_ref()
        .map(|trip_type| trip_type.as_str())
        .unwrap_or("No preference");
    let activities = match &preferences.activities {
        Some(activities) if !activities.trim().is_empty() => activities.trim(),
        _ => "No preference",
    };

    format!(
        r#"You are a helpful travel planner assistant. Create {count} distinctly themed trip itineraries for a traveler with the following preferences:

Traveler Preferences:
- Destinations: {destinations}
- Travel Time: {travel_time} days
- Budget: ${budget}
- Trip Type: {trip_type}
- Activities: {activities}

Respond with valid JSON only, matching exactly this schema:
{{
  "itineraries": [
    {{
      "name": "short label for this option",
      "overview": "why this trip matches the preferences",
      "dailyPlan": [
        {{
          "day": 1,
          "locations": ["place name", "place name"],
          "activities": [
            {{
              "name": "activity name",
              "duration": "2 hours",
              "cost": "$40",
              "description": "what the traveler does",
              "coordinates": [48.8584, 2.2945]
            }}
          ],
          "transportation": {{ "method": "metro", "duration": "30 minutes", "cost": "$5" }},
          "totalDayCost": "$120"
        }}
      ],
      "totalCost": "$1450"
    }}
  ]
}}

Each dailyPlan must contain exactly {travel_time} entries numbered 1 through {travel_time} with no gaps or repeats, and every day must list at least two locations. Keep the total cost within the budget."#,
        count = ITINERARY_COUNT,
        travel_time = preferences.travel_time,
        budget = preferences.budget,
    )
}

/// Completion replies often arrive wrapped in markdown fences despite the
/// system instruction. Strip one leading ```json marker, one trailing ```
/// marker, any remaining stray single backticks, and surrounding
/// whitespace. Already-clean text passes through unchanged.
pub fn clean_completion_text(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        text = stripped;
    }
    if let Some(stripped) = text.strip_suffix("```") {
        text = stripped;
    }
    text = text.trim();
    text = text.strip_prefix('`').unwrap_or(text);
    text = text.strip_suffix('`').unwrap_or(text);
    text.trim()
}

fn parse_itineraries(
    cleaned: &str,
    travel_time: u32,
) -> Result<GeneratedItineraries, GenerationError> {
    let generated: GeneratedItineraries = serde_json::from_str(cleaned).map_err(|err| {
        eprintln!(
            "Failed to parse completion as itineraries: {}. Cleaned text: {}",
            err, cleaned
        );
        GenerationError::MalformedResponse {
            error: err.to_string(),
            cleaned: cleaned.to_string(),
        }
    })?;

    if generated.itineraries.is_empty() {
        return Err(GenerationError::MalformedResponse {
            error: "completion contained no itineraries".to_string(),
            cleaned: cleaned.to_string(),
        });
    }

    for itinerary in &generated.itineraries {
        if let Err(error) = check_daily_plan(itinerary, travel_time) {
            eprintln!("Completion dailyPlan rejected: {}. Cleaned text: {}", error, cleaned);
            return Err(GenerationError::MalformedResponse {
                error,
                cleaned: cleaned.to_string(),
            });
        }
    }

    Ok(generated)
}

/// The daily plan must cover days 1..=travel_time exactly once each.
fn check_daily_plan(itinerary: &Itinerary, travel_time: u32) -> Result<(), String> {
    if itinerary.daily_plan.len() != travel_time as usize {
        return Err(format!(
            "itinerary \"{}\" has {} days, expected {}",
            itinerary.name,
            itinerary.daily_plan.len(),
            travel_time
        ));
    }

    let mut seen = vec![false; travel_time as usize];
    for day in &itinerary.daily_plan {
        if day.day == 0 || day.day > travel_time || seen[(day.day - 1) as usize] {
            return Err(format!(
                "itinerary \"{}\" has an out-of-range or duplicate day {}",
                itinerary.name, day.day
            ));
        }
        seen[(day.day - 1) as usize] = true;
    }

    Ok(())
}

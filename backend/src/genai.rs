//! Generative model client.
//!
//! Structured persona/destination/diary generation goes through the Gemini
//! REST API with a JSON response mime type; the image goes through the
//! `:predict` endpoint of the imagen model family.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;

use shared::models::{Destination, DiaryPage, PersonaDna, PetProfile};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Structured-input/structured-output generation calls backing pet creation
/// and the daily diary cycle.
#[async_trait]
pub trait PetModel: Send + Sync {
    /// Generate a fresh pet profile (name, six-facet persona, introduction).
    async fn generate_profile(&self) -> Result<PetProfile>;

    /// Pick today's travel destination. Past destinations are passed along to
    /// discourage repeats.
    async fn generate_destination(
        &self,
        persona: &PersonaDna,
        date: NaiveDate,
        past_destinations: &[Destination],
    ) -> Result<Destination>;

    /// Write the diary narrative and an image prompt for the destination.
    async fn generate_diary(
        &self,
        persona: &PersonaDna,
        destination: &Destination,
    ) -> Result<DiaryPage>;

    /// Render the diary illustration. Returns an image URL (data URL for
    /// inline payloads).
    async fn generate_image(&self, prompt: &str) -> Result<String>;
}

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    text_model: String,
    image_model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, text_model: String, image_model: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            text_model,
            image_model,
        })
    }

    /// Run one structured-output generation call and deserialize the JSON
    /// text part into `T`.
    async fn generate_json<T: DeserializeOwned>(&self, prompt: String) -> Result<T> {
        let url = format!("{}/models/{}:generateContent", API_BASE, self.text_model);

        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" },
        });

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .context("Model request failed")?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .context("Model response was not JSON")?;

        if !status.is_success() {
            bail!("Model API error {}: {}", status, payload);
        }

        let text = payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| anyhow!("Model response contained no text part"))?;

        serde_json::from_str(text).context("Model output did not match the expected schema")
    }
}

#[async_trait]
impl PetModel for GeminiClient {
    async fn generate_profile(&self) -> Result<PetProfile> {
        self.generate_json(profile_prompt()).await
    }

    async fn generate_destination(
        &self,
        persona: &PersonaDna,
        date: NaiveDate,
        past_destinations: &[Destination],
    ) -> Result<Destination> {
        self.generate_json(destination_prompt(persona, date, past_destinations)?)
            .await
    }

    async fn generate_diary(
        &self,
        persona: &PersonaDna,
        destination: &Destination,
    ) -> Result<DiaryPage> {
        self.generate_json(diary_prompt(persona, destination)?).await
    }

    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:predict", API_BASE, self.image_model);

        let body = json!({
            "instances": [{ "prompt": format!("{}\n\n上記の日記を絵日記風に描いた画像を生成してください。", prompt) }],
            "parameters": { "sampleCount": 1 },
        });

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .context("Image request failed")?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .context("Image response was not JSON")?;

        if !status.is_success() {
            bail!("Image API error {}: {}", status, payload);
        }

        let encoded = payload["predictions"][0]["bytesBase64Encoded"]
            .as_str()
            .ok_or_else(|| anyhow!("Failed to generate image"))?;

        Ok(format!("data:image/png;base64,{}", encoded))
    }
}

fn profile_prompt() -> String {
    "あなたは旅する架空のデジタルペットです。新しいペットのプロフィールを1体分作ってください。\n\
     Respond with a JSON object with exactly these fields: \
     \"name\" (short Japanese pet name), \
     \"persona_dna\" (object with string fields \"personality\", \"guiding_theme\", \
     \"emotional_trigger\", \"mobility_range\", \"interest_depth\", \"temporal_focus\"), \
     \"introduction\" (a few sentences of self-introduction in Japanese, in the pet's voice)."
        .to_string()
}

fn destination_prompt(
    persona: &PersonaDna,
    date: NaiveDate,
    past_destinations: &[Destination],
) -> Result<String> {
    let visited: Vec<&str> = past_destinations
        .iter()
        .map(|d| d.selected_location.as_str())
        .collect();

    Ok(format!(
        "ペットのペルソナ:\n{persona}\n\n日付: {date}\n訪問済み: {visited}\n\n\
         このペットが今日向かう旅先を1つ選んでください。訪問済みの場所は避けてください。\n\
         Respond with a JSON object with exactly these string fields: \
         \"selected_location\", \"summary\", \"news_context\" (a recent topical blurb \
         about the area), \"local_details\".",
        persona = serde_json::to_string_pretty(persona)?,
        date = date,
        visited = serde_json::to_string(&visited)?,
    ))
}

fn diary_prompt(persona: &PersonaDna, destination: &Destination) -> Result<String> {
    Ok(format!(
        "ペットのペルソナ:\n{persona}\n\n今日の旅先:\n{destination}\n\n\
         このペットの今日の旅日記を日本語で書いてください。\n\
         Respond with a JSON object with exactly these string fields: \
         \"diary\" (the diary text, in the pet's voice), \
         \"image_prompt\" (an English prompt describing an illustration of the day).",
        persona = serde_json::to_string_pretty(persona)?,
        destination = serde_json::to_string_pretty(destination)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persona() -> PersonaDna {
        PersonaDna {
            personality: "おっとり".to_string(),
            guiding_theme: "食べ歩き".to_string(),
            emotional_trigger: "夕焼け".to_string(),
            mobility_range: "世界中".to_string(),
            interest_depth: "広く浅く".to_string(),
            temporal_focus: "いま".to_string(),
        }
    }

    #[test]
    fn destination_prompt_lists_past_locations() {
        let past = vec![Destination {
            selected_location: "Kyoto".to_string(),
            summary: "s".to_string(),
            news_context: "n".to_string(),
            local_details: "l".to_string(),
        }];
        let date = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let prompt = destination_prompt(&persona(), date, &past).unwrap();
        assert!(prompt.contains("Kyoto"));
        assert!(prompt.contains("2026-08-29"));
    }

    #[test]
    fn diary_prompt_carries_the_destination() {
        let destination = Destination {
            selected_location: "Lisbon".to_string(),
            summary: "s".to_string(),
            news_context: "n".to_string(),
            local_details: "l".to_string(),
        };
        let prompt = diary_prompt(&persona(), &destination).unwrap();
        assert!(prompt.contains("Lisbon"));
        assert!(prompt.contains("image_prompt"));
    }
}

//! In-memory fakes shared by the service tests.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use shared::models::{Destination, DiaryEntry, DiaryPage, PersonaDna, Pet, PetProfile};

use crate::genai::PetModel;
use crate::mail::imap::{InboundMessage, MailboxSession};
use crate::mail::{Mailer, OutgoingEmail};
use crate::store::PetStore;

pub fn persona(personality: &str) -> PersonaDna {
    PersonaDna {
        personality: personality.to_string(),
        guiding_theme: "food".to_string(),
        emotional_trigger: "sunsets".to_string(),
        mobility_range: "worldwide".to_string(),
        interest_depth: "broad".to_string(),
        temporal_focus: "present".to_string(),
    }
}

pub fn profile(name: &str, personality: &str) -> PetProfile {
    PetProfile {
        name: name.to_string(),
        persona_dna: persona(personality),
        introduction: format!("こんにちは、{}です！", name),
    }
}

pub fn destination(location: &str) -> Destination {
    Destination {
        selected_location: location.to_string(),
        summary: "summary".to_string(),
        news_context: "news".to_string(),
        local_details: "details".to_string(),
    }
}

pub fn pet(email: &str, name: &str, personality: &str, created_at: DateTime<Utc>) -> Pet {
    Pet {
        id: Uuid::new_v4(),
        email: email.to_string(),
        profile: profile(name, personality),
        created_at,
        next_destination: None,
        destinations: vec![],
    }
}

// ============================================================================
// Store
// ============================================================================

#[derive(Default)]
pub struct MemoryPetStore {
    pets: Mutex<Vec<Pet>>,
    diaries: Mutex<HashMap<(Uuid, NaiveDate), DiaryEntry>>,
}

impl MemoryPetStore {
    pub fn with_pets(pets: Vec<Pet>) -> Self {
        Self {
            pets: Mutex::new(pets),
            diaries: Mutex::new(HashMap::new()),
        }
    }

    pub fn pet_count(&self) -> usize {
        self.pets.lock().unwrap().len()
    }

    pub fn emails(&self) -> Vec<String> {
        self.pets.lock().unwrap().iter().map(|p| p.email.clone()).collect()
    }

    pub fn diary_for(&self, pet_id: Uuid, date: NaiveDate) -> Option<DiaryEntry> {
        self.diaries.lock().unwrap().get(&(pet_id, date)).cloned()
    }

    pub fn insert_diary(&self, pet_id: Uuid, entry: DiaryEntry) {
        self.diaries
            .lock()
            .unwrap()
            .insert((pet_id, entry.date), entry);
    }

    pub fn destinations_of(&self, pet_id: Uuid) -> Vec<Destination> {
        self.pets
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == pet_id)
            .map(|p| p.destinations.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PetStore for MemoryPetStore {
    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        Ok(self.pets.lock().unwrap().iter().any(|p| p.email == email))
    }

    async fn insert_pet(
        &self,
        email: &str,
        profile: &PetProfile,
        created_at: DateTime<Utc>,
    ) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.pets.lock().unwrap().push(Pet {
            id,
            email: email.to_string(),
            profile: profile.clone(),
            created_at,
            next_destination: None,
            destinations: vec![],
        });
        Ok(id)
    }

    async fn list_pets(&self) -> Result<Vec<Pet>> {
        Ok(self.pets.lock().unwrap().clone())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Pet>> {
        Ok(self
            .pets
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.email == email)
            .cloned())
    }

    async fn delete_pet(&self, pet_id: Uuid) -> Result<()> {
        self.diaries.lock().unwrap().retain(|(id, _), _| *id != pet_id);
        self.pets.lock().unwrap().retain(|p| p.id != pet_id);
        Ok(())
    }

    async fn append_destination(&self, pet_id: Uuid, destination: &Destination) -> Result<()> {
        let mut pets = self.pets.lock().unwrap();
        let pet = pets
            .iter_mut()
            .find(|p| p.id == pet_id)
            .ok_or_else(|| anyhow::anyhow!("no such pet"))?;
        pet.next_destination = Some(destination.clone());
        pet.destinations.push(destination.clone());
        Ok(())
    }

    async fn upsert_diary_entry(&self, pet_id: Uuid, entry: &DiaryEntry) -> Result<()> {
        self.diaries
            .lock()
            .unwrap()
            .insert((pet_id, entry.date), entry.clone());
        Ok(())
    }

    async fn get_diary_entry(&self, pet_id: Uuid, date: NaiveDate) -> Result<Option<DiaryEntry>> {
        Ok(self.diaries.lock().unwrap().get(&(pet_id, date)).cloned())
    }
}

// ============================================================================
// Mailer
// ============================================================================

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    fail_for: Mutex<Option<String>>,
}

impl RecordingMailer {
    /// Make `send` fail for this recipient address.
    pub fn fail_for(&self, to: &str) {
        *self.fail_for.lock().unwrap() = Some(to.to_string());
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, to: &str) -> Vec<OutgoingEmail> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.to == to)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingEmail) -> Result<()> {
        if self.fail_for.lock().unwrap().as_deref() == Some(mail.to.as_str()) {
            bail!("smtp rejected recipient {}", mail.to);
        }
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

// ============================================================================
// Model
// ============================================================================

/// Canned model. `fail_personality` makes destination generation fail for
/// pets whose persona carries that personality string.
#[derive(Default)]
pub struct StubPetModel {
    pub fail_profile: bool,
    pub fail_personality: Option<String>,
    pub fail_image: bool,
}

#[async_trait]
impl PetModel for StubPetModel {
    async fn generate_profile(&self) -> Result<PetProfile> {
        if self.fail_profile {
            bail!("model returned no usable output");
        }
        Ok(profile("ぽち", "curious"))
    }

    async fn generate_destination(
        &self,
        persona: &PersonaDna,
        _date: NaiveDate,
        past_destinations: &[Destination],
    ) -> Result<Destination> {
        if self.fail_personality.as_deref() == Some(persona.personality.as_str()) {
            bail!("model returned no usable output");
        }
        Ok(destination(&format!("Stop {}", past_destinations.len() + 1)))
    }

    async fn generate_diary(
        &self,
        _persona: &PersonaDna,
        destination: &Destination,
    ) -> Result<DiaryPage> {
        Ok(DiaryPage {
            diary: format!("{}を歩いた。", destination.selected_location),
            image_prompt: format!("a pet in {}", destination.selected_location),
        })
    }

    async fn generate_image(&self, _prompt: &str) -> Result<String> {
        if self.fail_image {
            bail!("image model unavailable");
        }
        Ok("data:image/png;base64,AAAA".to_string())
    }
}

// ============================================================================
// Mailbox
// ============================================================================

#[derive(Debug, Clone)]
pub struct FakeMessage {
    pub seq: u32,
    pub to: String,
    pub unseen: bool,
    pub sender: Option<String>,
    pub subject: String,
}

impl FakeMessage {
    pub fn unseen(seq: u32, to: &str, sender: &str, subject: &str) -> Self {
        Self {
            seq,
            to: to.to_string(),
            unseen: true,
            sender: Some(sender.to_string()),
            subject: subject.to_string(),
        }
    }
}

/// Mailbox fake that mimics server-side search semantics: only unseen
/// messages addressed to the queried alias are ever surfaced.
#[derive(Default)]
pub struct FakeMailbox {
    pub messages: Vec<FakeMessage>,
    pub flagged: Vec<u32>,
    pub logged_out: bool,
}

impl FakeMailbox {
    pub fn new(messages: Vec<FakeMessage>) -> Self {
        Self {
            messages,
            flagged: vec![],
            logged_out: false,
        }
    }
}

#[async_trait]
impl MailboxSession for FakeMailbox {
    async fn search_unseen_to(&mut self, alias: &str) -> Result<Vec<u32>> {
        Ok(self
            .messages
            .iter()
            .filter(|m| m.unseen && m.to == alias)
            .map(|m| m.seq)
            .collect())
    }

    async fn fetch(&mut self, seqs: &[u32]) -> Result<Vec<InboundMessage>> {
        Ok(self
            .messages
            .iter()
            .filter(|m| seqs.contains(&m.seq))
            .map(|m| InboundMessage {
                seq: m.seq,
                sender: m.sender.clone(),
                subject: m.subject.clone(),
            })
            .collect())
    }

    async fn mark_seen(&mut self, seqs: &[u32]) -> Result<()> {
        for message in &mut self.messages {
            if seqs.contains(&message.seq) {
                message.unseen = false;
            }
        }
        self.flagged.extend_from_slice(seqs);
        Ok(())
    }

    async fn logout(&mut self) -> Result<()> {
        self.logged_out = true;
        Ok(())
    }
}

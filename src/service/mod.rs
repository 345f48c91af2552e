//! Orchestration of store, engine and content generator.
//!
//! Every mutation follows the same cycle: claim the entity, load it, run
//! the pure engine, save the result, release. Claims are per entity, so two
//! updates of one character never interleave.

mod inflight;

pub use inflight::{character_key, guild_key, Claim, InFlight};

use chrono::Utc;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::achievements::{evaluate, Achievements, RewardDefinition};
use crate::character::{AttributeType, Character};
use crate::config::Config;
use crate::content::{self, ContentGenerator};
use crate::core::constants::QUEST_OFFER_COUNT;
use crate::core::progression::{apply_reward_with, RewardOutcome, XpGain};
use crate::error::{Error, Result};
use crate::guild::{self, EventCompletion, Guild, GuildEvent, GuildRole};
use crate::quests::{self, generate_offers, Quest};
use crate::store::Store;
use crate::workout::Workout;

/// What one logged workout or completed quest did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityOutcome {
    pub character: Character,
    pub xp_gained: u64,
    pub leveled_up: bool,
    pub levels_gained: u32,
    pub stat_increased: Option<AttributeType>,
    pub new_rewards: Vec<RewardDefinition>,
    /// XP the character's guild received, if any.
    pub guild_gain: Option<XpGain>,
}

pub struct ProgressionService<S: Store> {
    store: S,
    generator: Box<dyn ContentGenerator>,
    rewards: Vec<RewardDefinition>,
    config: Config,
    inflight: InFlight,
}

impl<S: Store> ProgressionService<S> {
    pub fn new(store: S, generator: Box<dyn ContentGenerator>, config: &Config) -> Result<Self> {
        Ok(Self {
            store,
            generator,
            rewards: config.reward_definitions()?,
            config: config.clone(),
            inflight: InFlight::new(),
        })
    }

    pub fn with_rewards(mut self, rewards: Vec<RewardDefinition>) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn rewards(&self) -> &[RewardDefinition] {
        &self.rewards
    }

    // =========================================================================
    // Characters
    // =========================================================================

    pub fn create_character(
        &self,
        name: &str,
        class_specialty: Option<AttributeType>,
    ) -> Result<Character> {
        let character = Character::new(name, class_specialty)?;
        let _claim = self.inflight.claim(character_key(&character.id))?;

        if self.store.character_exists(&character.id)? {
            return Err(Error::AlreadyExists {
                kind: "character",
                id: character.id,
            });
        }
        self.store.save_character(&character)?;
        info!(character = %character.id, class = ?class_specialty, "character created");
        Ok(character)
    }

    pub fn character(&self, id: &str) -> Result<Character> {
        self.store.load_character(id)
    }

    pub fn list_characters(&self) -> Result<Vec<Character>> {
        self.store.list_characters()
    }

    pub fn achievements(&self, character_id: &str) -> Result<Achievements> {
        self.store.load_achievements(character_id)
    }

    /// Deletes a character, leaving its guild first. A leader with other
    /// members still in the guild cannot be deleted.
    pub fn delete_character(&self, id: &str) -> Result<()> {
        let _claim = self.inflight.claim(character_key(id))?;
        let character = self.store.load_character(id)?;
        if let Some(guild_id) = &character.guild_id {
            let _guild_claim = self.inflight.claim(guild_key(guild_id))?;
            match self.store.load_guild(guild_id) {
                Ok(guild) => {
                    let updated = guild::remove_member(&guild, id);
                    if updated.is_member(id) {
                        return Err(leader_must_stay());
                    }
                    self.store.save_guild(&updated)?;
                }
                Err(Error::NotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        self.store.delete_character(id)?;
        info!(character = id, "character deleted");
        Ok(())
    }

    // =========================================================================
    // Activities
    // =========================================================================

    /// Logs a workout and applies its reward.
    pub fn log_workout(&self, character_id: &str, workout: &Workout) -> Result<ActivityOutcome> {
        let _claim = self.inflight.claim(character_key(character_id))?;
        let character = self.store.load_character(character_id)?;

        let event = workout.to_event(&character)?;
        let reward = apply_reward_with(&character, &event, self.config.stat_growth);
        debug!(
            character = character_id,
            category = %workout.category,
            minutes = workout.minutes,
            bonus = event.bonus,
            "workout logged"
        );

        self.finish_activity(reward, workout.category)
    }

    /// Generates and stores a fresh batch of quest offers.
    pub fn offer_quests(&self, character_id: &str, rng: &mut impl Rng) -> Result<Vec<Quest>> {
        let _claim = self.inflight.claim(character_key(character_id))?;
        self.store.load_character(character_id)?;

        let offers = generate_offers(self.generator.as_ref(), QUEST_OFFER_COUNT, rng);
        let mut quests = self.store.load_quests(character_id)?;
        quests.extend(offers.iter().cloned());
        self.store.save_quests(character_id, &quests)?;

        info!(character = character_id, count = offers.len(), "quests offered");
        Ok(offers)
    }

    pub fn quests(&self, character_id: &str) -> Result<Vec<Quest>> {
        self.store.load_quests(character_id)
    }

    pub fn accept_quest(&self, character_id: &str, quest_id: &str) -> Result<Quest> {
        let _claim = self.inflight.claim(character_key(character_id))?;
        let mut quests = self.store.load_quests(character_id)?;
        let slot = find_quest(&mut quests, quest_id)?;

        let accepted = quests::accept(slot)?;
        *slot = accepted.clone();
        self.store.save_quests(character_id, &quests)?;

        info!(character = character_id, quest = quest_id, "quest accepted");
        Ok(accepted)
    }

    /// Completes a quest and grants its reward once.
    pub fn complete_quest(&self, character_id: &str, quest_id: &str) -> Result<ActivityOutcome> {
        let _claim = self.inflight.claim(character_key(character_id))?;
        let character = self.store.load_character(character_id)?;
        let mut quests = self.store.load_quests(character_id)?;
        let slot = find_quest(&mut quests, quest_id)?;

        let completion = quests::complete(slot, &character, self.config.stat_growth)?;
        let category = completion.quest.category;
        *slot = completion.quest;
        slot.completed_at = Some(Utc::now().timestamp());

        // the quest is marked first: a failed character write loses XP
        // rather than leaving the quest open to a second grant
        self.store.save_quests(character_id, &quests)?;
        info!(character = character_id, quest = quest_id, "quest completed");

        self.finish_activity(completion.reward, category)
    }

    /// Persists a reward outcome, evaluates rewards and feeds the guild.
    /// The caller holds the character claim.
    fn finish_activity(&self, reward: RewardOutcome, category: AttributeType) -> Result<ActivityOutcome> {
        let mut character = reward.character;
        character.updated_at = Utc::now().timestamp();

        let mut achievements = self.store.load_achievements(&character.id)?;
        achievements.counts.record(category);
        let new_rewards: Vec<RewardDefinition> =
            evaluate(&achievements.counts, &self.rewards, &achievements.earned_ids())
                .into_iter()
                .cloned()
                .collect();
        for definition in &new_rewards {
            achievements.grant(definition, character.updated_at);
        }

        self.store.save_character(&character)?;
        self.store.save_achievements(&character.id, &achievements)?;

        if reward.leveled_up {
            info!(character = %character.id, level = character.level, "level up");
        }
        for definition in &new_rewards {
            info!(character = %character.id, reward = %definition.id, tier = %definition.tier, "reward earned");
        }

        let guild_gain = match &character.guild_id {
            Some(guild_id) => self.contribute_to_guild(guild_id, &character.id, reward.xp_gained),
            None => None,
        };

        Ok(ActivityOutcome {
            character,
            xp_gained: reward.xp_gained,
            leveled_up: reward.leveled_up,
            levels_gained: reward.levels_gained,
            stat_increased: reward.stat_increased,
            new_rewards,
            guild_gain,
        })
    }

    /// Best effort: the member's own progress is already saved, so a guild
    /// failure is logged and skipped.
    fn contribute_to_guild(&self, guild_id: &str, character_id: &str, xp: u64) -> Option<XpGain> {
        let share = self.config.guild_share(xp);
        if share == 0 {
            return None;
        }
        let result = (|| -> Result<XpGain> {
            let _claim = self.inflight.claim(guild_key(guild_id))?;
            let guild = self.store.load_guild(guild_id)?;
            let (updated, gain) = guild::contribute(&guild, character_id, share);
            self.store.save_guild(&updated)?;
            Ok(gain)
        })();

        match result {
            Ok(gain) => {
                debug!(guild = guild_id, gained = gain.gained, "guild contribution");
                Some(gain)
            }
            Err(e) => {
                warn!(guild = guild_id, error = %e, "guild contribution skipped");
                None
            }
        }
    }

    // =========================================================================
    // Guilds
    // =========================================================================

    pub fn guild(&self, id: &str) -> Result<Guild> {
        self.store.load_guild(id)
    }

    pub fn guild_events(&self, guild_id: &str) -> Result<Vec<GuildEvent>> {
        self.store.load_guild_events(guild_id)
    }

    /// Founds a guild led by `leader_id`.
    pub fn create_guild(&self, name: &str, leader_id: &str) -> Result<Guild> {
        let _claim = self.inflight.claim(character_key(leader_id))?;
        let mut leader = self.store.load_character(leader_id)?;
        ensure_guildless(&leader)?;

        let guild = Guild::new(name, leader_id)?;
        let _guild_claim = self.inflight.claim(guild_key(&guild.id))?;
        if self.store.guild_exists(&guild.id)? {
            return Err(Error::AlreadyExists {
                kind: "guild",
                id: guild.id,
            });
        }

        self.store.save_guild(&guild)?;
        leader.guild_id = Some(guild.id.clone());
        leader.updated_at = Utc::now().timestamp();
        self.store.save_character(&leader)?;

        info!(guild = %guild.id, leader = leader_id, "guild created");
        Ok(guild)
    }

    pub fn join_guild(&self, guild_id: &str, character_id: &str) -> Result<Guild> {
        let _claim = self.inflight.claim(character_key(character_id))?;
        let mut character = self.store.load_character(character_id)?;
        if character.guild_id.as_deref() == Some(guild_id) {
            return self.store.load_guild(guild_id);
        }
        ensure_guildless(&character)?;

        let _guild_claim = self.inflight.claim(guild_key(guild_id))?;
        let guild = self.store.load_guild(guild_id)?;
        let now = Utc::now().timestamp();
        let updated = guild::add_member(&guild, character_id, GuildRole::Member, now);
        self.store.save_guild(&updated)?;

        character.guild_id = Some(guild_id.to_string());
        character.updated_at = now;
        self.store.save_character(&character)?;

        info!(guild = guild_id, character = character_id, "joined guild");
        Ok(updated)
    }

    pub fn leave_guild(&self, character_id: &str) -> Result<()> {
        let _claim = self.inflight.claim(character_key(character_id))?;
        let mut character = self.store.load_character(character_id)?;
        let Some(guild_id) = character.guild_id.clone() else {
            return Ok(());
        };

        let _guild_claim = self.inflight.claim(guild_key(&guild_id))?;
        let guild = self.store.load_guild(&guild_id)?;
        let updated = guild::remove_member(&guild, character_id);
        if updated.is_member(character_id) {
            return Err(leader_must_stay());
        }
        self.store.save_guild(&updated)?;

        character.guild_id = None;
        character.updated_at = Utc::now().timestamp();
        self.store.save_character(&character)?;

        info!(guild = %guild_id, character = character_id, "left guild");
        Ok(())
    }

    /// Schedules a guild event. Only leaders and officers may do this.
    pub fn schedule_guild_event(
        &self,
        guild_id: &str,
        organizer_id: &str,
        category: AttributeType,
        xp_reward: u32,
    ) -> Result<GuildEvent> {
        let _claim = self.inflight.claim(guild_key(guild_id))?;
        let guild = self.store.load_guild(guild_id)?;
        ensure_manager(&guild, organizer_id)?;

        let flavor = content::event_flavor(self.generator.as_ref(), &guild.name, category);
        let event = GuildEvent::new(guild_id, category, xp_reward, flavor.title, flavor.description)?;

        let mut events = self.store.load_guild_events(guild_id)?;
        events.push(event.clone());
        self.store.save_guild_events(guild_id, &events)?;

        info!(guild = guild_id, event = %event.id, xp = xp_reward, "guild event scheduled");
        Ok(event)
    }

    /// Adds a member to an event; the first participant starts it.
    pub fn join_guild_event(
        &self,
        guild_id: &str,
        event_id: &str,
        character_id: &str,
    ) -> Result<GuildEvent> {
        let _claim = self.inflight.claim(guild_key(guild_id))?;
        let guild = self.store.load_guild(guild_id)?;
        if !guild.is_member(character_id) {
            return Err(Error::NotPermitted(format!(
                "{} is not a member of {}",
                character_id, guild_id
            )));
        }

        let mut events = self.store.load_guild_events(guild_id)?;
        let slot = find_event(&mut events, event_id)?;
        let joined = guild::join_event(slot, character_id)?;
        *slot = joined.clone();
        self.store.save_guild_events(guild_id, &events)?;

        debug!(guild = guild_id, event = event_id, character = character_id, "joined event");
        Ok(joined)
    }

    /// Closes an active event and grants its XP to the guild once.
    pub fn complete_guild_event(
        &self,
        guild_id: &str,
        event_id: &str,
        organizer_id: &str,
    ) -> Result<EventCompletion> {
        let _claim = self.inflight.claim(guild_key(guild_id))?;
        let guild = self.store.load_guild(guild_id)?;
        ensure_manager(&guild, organizer_id)?;

        let mut events = self.store.load_guild_events(guild_id)?;
        let slot = find_event(&mut events, event_id)?;
        let mut completion = guild::complete_event(slot, &guild)?;
        completion.event.completed_at = Some(Utc::now().timestamp());
        *slot = completion.event.clone();

        // event first, for the same reason as quests
        self.store.save_guild_events(guild_id, &events)?;
        self.store.save_guild(&completion.guild)?;

        info!(
            guild = guild_id,
            event = event_id,
            xp = completion.gain.gained,
            level = completion.guild.level,
            "guild event completed"
        );
        Ok(completion)
    }
}

fn find_quest<'a>(quests: &'a mut [Quest], quest_id: &str) -> Result<&'a mut Quest> {
    quests
        .iter_mut()
        .find(|q| q.id == quest_id)
        .ok_or_else(|| Error::not_found("quest", quest_id))
}

fn find_event<'a>(events: &'a mut [GuildEvent], event_id: &str) -> Result<&'a mut GuildEvent> {
    events
        .iter_mut()
        .find(|e| e.id == event_id)
        .ok_or_else(|| Error::not_found("event", event_id))
}

fn leader_must_stay() -> Error {
    Error::NotPermitted("the leader cannot leave while other members remain".to_string())
}

fn ensure_guildless(character: &Character) -> Result<()> {
    match &character.guild_id {
        Some(guild_id) => Err(Error::AlreadyExists {
            kind: "guild membership",
            id: guild_id.clone(),
        }),
        None => Ok(()),
    }
}

fn ensure_manager(guild: &Guild, character_id: &str) -> Result<()> {
    match guild.member(character_id) {
        Some(member) if member.role.can_manage_events() => Ok(()),
        _ => Err(Error::NotPermitted(format!(
            "{} cannot manage events of {}",
            character_id, guild.id
        ))),
    }
}

//! Integration test: the progression service over the JSON store
//!
//! Tests the full flow a user takes through the CLI: create → workout →
//! quests → guild events, then reopens the store to check persistence.

use fitquest::achievements::RewardDefinition;
use fitquest::achievements::RewardTier;
use fitquest::content::{OfflineGenerator, StaticGenerator};
use fitquest::guild::EventStatus;
use fitquest::{
    AttributeType, Config, Error, Intensity, JsonStore, ProgressionService, Store, Workout,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("fitquest-service-{}", uuid::Uuid::new_v4()))
}

fn open(dir: &Path) -> ProgressionService<JsonStore> {
    let config = Config {
        data_dir: Some(dir.to_path_buf()),
        ..Config::default()
    };
    let store = JsonStore::new(dir).unwrap();
    ProgressionService::new(store, Box::new(OfflineGenerator), &config).unwrap()
}

#[test]
fn test_progress_survives_reopening() {
    let dir = temp_dir();
    {
        let service = open(&dir);
        service
            .create_character("Iron Lifter", Some(AttributeType::Strength))
            .unwrap();
        let workout = Workout::new(AttributeType::Strength, 45, Intensity::Vigorous);
        let outcome = service.log_workout("iron_lifter", &workout).unwrap();
        // 45 * 15 = 675, class bonus 810
        assert_eq!(outcome.xp_gained, 810);
        assert!(!outcome.leveled_up);
        let outcome = service.log_workout("iron_lifter", &workout).unwrap();
        assert!(outcome.leveled_up);
        assert_eq!(outcome.character.level, 2);
    }

    let service = open(&dir);
    let character = service.character("iron_lifter").unwrap();
    assert_eq!(character.experience, 1620);
    assert_eq!(character.level, 2);
    assert_eq!(character.attributes.get(AttributeType::Strength), 2);
    assert_eq!(
        service
            .achievements("iron_lifter")
            .unwrap()
            .counts
            .get(AttributeType::Strength),
        2
    );
}

#[test]
fn test_invalid_workout_changes_nothing() {
    let dir = temp_dir();
    let service = open(&dir);
    service.create_character("Hero", None).unwrap();

    let too_long = Workout::new(AttributeType::Speed, 601, Intensity::Light);
    assert!(matches!(
        service.log_workout("hero", &too_long),
        Err(Error::Validation(_))
    ));
    let empty = Workout::new(AttributeType::Speed, 0, Intensity::Light);
    assert!(service.log_workout("hero", &empty).is_err());

    assert_eq!(service.character("hero").unwrap().experience, 0);
}

#[test]
fn test_quest_completed_once_across_reopen() {
    let dir = temp_dir();
    let quest_id;
    let reward;
    {
        let service = open(&dir);
        service.create_character("Hero", None).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let offers = service.offer_quests("hero", &mut rng).unwrap();
        quest_id = offers[1].id.clone();
        reward = u64::from(offers[1].reward_amount);
        service.complete_quest("hero", &quest_id).unwrap();
    }

    let service = open(&dir);
    let err = service.complete_quest("hero", &quest_id).unwrap_err();
    assert!(err.is_double_application());
    assert_eq!(service.character("hero").unwrap().experience, reward);
}

#[test]
fn test_generated_event_text_and_lifecycle() {
    let dir = temp_dir();
    let config = Config::default();
    let generator = StaticGenerator::new(
        r#"{"title": "Moonlight Run", "description": "Five laps under the full moon."}"#,
    );
    let service =
        ProgressionService::new(JsonStore::new(&dir).unwrap(), Box::new(generator), &config).unwrap();

    service.create_character("Leader", None).unwrap();
    service.create_character("Runner", None).unwrap();
    service.create_guild("Night Owls", "leader").unwrap();
    service.join_guild("night_owls", "runner").unwrap();

    let event = service
        .schedule_guild_event("night_owls", "leader", AttributeType::Speed, 1200)
        .unwrap();
    assert_eq!(event.title, "Moonlight Run");
    assert_eq!(event.status, EventStatus::Upcoming);

    // not started yet
    assert!(service
        .complete_guild_event("night_owls", &event.id, "leader")
        .is_err());

    let joined = service
        .join_guild_event("night_owls", &event.id, "runner")
        .unwrap();
    assert_eq!(joined.status, EventStatus::Active);

    let completion = service
        .complete_guild_event("night_owls", &event.id, "leader")
        .unwrap();
    assert_eq!(completion.guild.level, 2);
    assert!(completion.event.completed_at.is_some());

    let err = service
        .complete_guild_event("night_owls", &event.id, "leader")
        .unwrap_err();
    assert!(err.is_double_application());
    assert_eq!(service.guild("night_owls").unwrap().experience, 1200);

    let stored = service.guild_events("night_owls").unwrap();
    assert_eq!(stored[0].status, EventStatus::Completed);
}

#[test]
fn test_outsider_cannot_attend() {
    let dir = temp_dir();
    let service = open(&dir);
    service.create_character("Leader", None).unwrap();
    service.create_character("Stranger", None).unwrap();
    service.create_guild("Night Owls", "leader").unwrap();
    let event = service
        .schedule_guild_event("night_owls", "leader", AttributeType::Magic, 100)
        .unwrap();

    assert!(matches!(
        service.join_guild_event("night_owls", &event.id, "stranger"),
        Err(Error::NotPermitted(_))
    ));
}

#[test]
fn test_custom_reward_definitions_from_file() {
    let dir = temp_dir();
    std::fs::create_dir_all(&dir).unwrap();
    let rewards_path = dir.join("rewards.json");
    let definitions = vec![RewardDefinition::new(
        "first-lift",
        AttributeType::Strength,
        1,
        RewardTier::Bronze,
    )];
    std::fs::write(&rewards_path, serde_json::to_string(&definitions).unwrap()).unwrap();

    let config = Config {
        rewards_file: Some(rewards_path),
        ..Config::default()
    };
    let service = ProgressionService::new(
        JsonStore::new(&dir).unwrap(),
        Box::new(OfflineGenerator),
        &config,
    )
    .unwrap();
    service.create_character("Hero", None).unwrap();

    let outcome = service
        .log_workout(
            "hero",
            &Workout::new(AttributeType::Strength, 10, Intensity::Moderate),
        )
        .unwrap();
    let ids: Vec<&str> = outcome.new_rewards.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["first-lift"]);
    assert!(service
        .store()
        .load_achievements("hero")
        .unwrap()
        .is_earned("first-lift"));
}

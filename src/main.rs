use fitquest::achievements::{next_milestones, RewardTier};
use fitquest::build_info;
use fitquest::content::{ContentGenerator, HttpGenerator, OfflineGenerator};
use fitquest::core::progression::level_progress;
use fitquest::error::ValidationError;
use fitquest::guild::Guild;
use fitquest::quests::Quest;
use fitquest::{
    ActivityOutcome, AttributeType, Character, Config, Error, Intensity, JsonStore,
    ProgressionService, Workout,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
FitQuest - fitness progression tracker

Usage: fitquest <command> [args]

Characters:
  create <name> [--class <category>]     Create a character
  list                                   List characters
  status <character>                     Show level, attributes and rewards
  delete <character>                     Delete a character

Activities:
  workout <character> <category> <minutes> [--intensity light|moderate|vigorous]
  quests <character> [--new] [--seed <n>]  List quests, optionally offering new ones
  accept <character> <quest-id>          Accept a quest (id prefix is enough)
  complete <character> <quest-id>        Complete a quest

Guilds:
  guild create <name> <leader>
  guild join <guild> <character>
  guild leave <character>
  guild status <guild>
  guild event <guild> <organizer> <category> <xp>
  guild attend <guild> <event-id> <character>
  guild finish <guild> <event-id> <organizer>

Categories: strength, speed, magic, willpower

Options:
  -v, --version    Show version information
  -h, --help       Show this help message

Logging is controlled by FITQUEST_LOG (default: warn).";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    App(#[from] Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

type Result<T> = std::result::Result<T, CliError>;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        None | Some("--help") | Some("-h") => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Some("--version") | Some("-v") => {
            println!("{}", build_info::version_line());
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    init_logging();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("FITQUEST_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_service(config: &Config) -> Result<ProgressionService<JsonStore>> {
    let store = JsonStore::new(config.data_dir().map_err(Error::from)?).map_err(Error::from)?;
    let generator: Box<dyn ContentGenerator> = match HttpGenerator::from_config(&config.content) {
        Ok(generator) => Box::new(generator),
        Err(e) => {
            debug!(reason = %e, "using offline content");
            Box::new(OfflineGenerator)
        }
    };
    Ok(ProgressionService::new(store, generator, config)?)
}

fn run(args: &[String]) -> Result<()> {
    let config = Config::load();
    let service = open_service(&config)?;
    let command = args[0].as_str();
    let rest = &args[1..];

    match command {
        "create" => {
            let name = positional(rest, 0, "name")?;
            let class: Option<AttributeType> =
                option(rest, "--class").map(str::parse).transpose()?;
            let character = service.create_character(name, class)?;
            println!("Created {} (id: {})", character.name, character.id);
        }
        "list" => {
            let characters = service.list_characters()?;
            if characters.is_empty() {
                println!("No characters yet. Create one with `fitquest create <name>`.");
            }
            for c in characters {
                println!(
                    "{:<16} Lv.{:<4} {:>8} XP  {}",
                    c.name,
                    c.level,
                    c.experience,
                    c.class_specialty.map(|a| a.name()).unwrap_or("-")
                );
            }
        }
        "status" => {
            let id = positional(rest, 0, "character")?;
            print_status(&service, &service.character(id)?)?;
        }
        "delete" => {
            let id = positional(rest, 0, "character")?;
            service.delete_character(id)?;
            println!("Deleted {}", id);
        }
        "workout" => {
            let id = positional(rest, 0, "character")?;
            let category: AttributeType = positional(rest, 1, "category")?.parse()?;
            let minutes = parse_number(positional(rest, 2, "minutes")?, "minutes")?;
            let intensity: Intensity = match option(rest, "--intensity") {
                Some(value) => value.parse()?,
                None => Intensity::default(),
            };
            let outcome = service.log_workout(id, &Workout::new(category, minutes, intensity))?;
            print_outcome(&outcome);
        }
        "quests" => {
            let id = positional(rest, 0, "character")?;
            if rest.iter().any(|a| a == "--new") {
                let offers = match option(rest, "--seed") {
                    Some(seed) => {
                        let mut rng = StdRng::seed_from_u64(parse_number(seed, "seed")?);
                        service.offer_quests(id, &mut rng)?
                    }
                    None => service.offer_quests(id, &mut rand::thread_rng())?,
                };
                println!("New offers:");
                for quest in &offers {
                    print_quest(quest);
                }
            } else {
                let quests = service.quests(id)?;
                if quests.is_empty() {
                    println!("No quests. Ask for some with `fitquest quests {} --new`.", id);
                }
                for quest in &quests {
                    print_quest(quest);
                }
            }
        }
        "accept" => {
            let id = positional(rest, 0, "character")?;
            let quest_id = resolve_quest(&service, id, positional(rest, 1, "quest-id")?)?;
            let quest = service.accept_quest(id, &quest_id)?;
            println!("Accepted \"{}\"", quest.title);
        }
        "complete" => {
            let id = positional(rest, 0, "character")?;
            let quest_id = resolve_quest(&service, id, positional(rest, 1, "quest-id")?)?;
            let outcome = service.complete_quest(id, &quest_id)?;
            print_outcome(&outcome);
        }
        "guild" => run_guild(&service, rest)?,
        other => {
            return Err(invalid(format!(
                "unknown command '{}', see `fitquest --help`",
                other
            )))
        }
    }
    Ok(())
}

fn run_guild(service: &ProgressionService<JsonStore>, args: &[String]) -> Result<()> {
    let sub = positional(args, 0, "guild command")?;
    let rest = &args[1..];

    match sub {
        "create" => {
            let guild = service.create_guild(
                positional(rest, 0, "name")?,
                positional(rest, 1, "leader")?,
            )?;
            println!("Founded {} (id: {})", guild.name, guild.id);
        }
        "join" => {
            let guild = service.join_guild(
                positional(rest, 0, "guild")?,
                positional(rest, 1, "character")?,
            )?;
            println!("Joined {} ({} members)", guild.name, guild.members.len());
        }
        "leave" => {
            let id = positional(rest, 0, "character")?;
            service.leave_guild(id)?;
            println!("{} left their guild", id);
        }
        "status" => {
            let guild = service.guild(positional(rest, 0, "guild")?)?;
            print_guild(service, &guild)?;
        }
        "event" => {
            let guild_id = positional(rest, 0, "guild")?;
            let organizer = positional(rest, 1, "organizer")?;
            let category: AttributeType = positional(rest, 2, "category")?.parse()?;
            let xp = parse_number(positional(rest, 3, "xp")?, "xp")?;
            let event = service.schedule_guild_event(guild_id, organizer, category, xp)?;
            println!("Scheduled \"{}\" (id: {})", event.title, event.id);
            println!("  {}", event.description);
        }
        "attend" => {
            let event = service.join_guild_event(
                positional(rest, 0, "guild")?,
                positional(rest, 1, "event-id")?,
                positional(rest, 2, "character")?,
            )?;
            println!(
                "\"{}\" now has {} participant(s)",
                event.title,
                event.participants.len()
            );
        }
        "finish" => {
            let completion = service.complete_guild_event(
                positional(rest, 0, "guild")?,
                positional(rest, 1, "event-id")?,
                positional(rest, 2, "organizer")?,
            )?;
            println!(
                "\"{}\" completed: +{} guild XP",
                completion.event.title, completion.gain.gained
            );
            if completion.gain.leveled_up() {
                println!("{} reached level {}!", completion.guild.name, completion.guild.level);
            }
        }
        other => return Err(invalid(format!("unknown guild command '{}'", other))),
    }
    Ok(())
}

fn print_status(service: &ProgressionService<JsonStore>, c: &Character) -> Result<()> {
    println!("{} (Lv.{})", c.name, c.level);
    println!(
        "  XP: {} ({:.0}% to next level, {} needed)",
        c.experience,
        level_progress(c.experience) * 100.0,
        c.xp_to_next_level()
    );
    if let Some(class) = c.class_specialty {
        println!("  Class: {}", class.name());
    }
    if let Some(guild) = &c.guild_id {
        println!("  Guild: {}", guild);
    }
    for attr in AttributeType::ALL {
        println!("  {} {:>4}", attr.abbrev(), c.attributes.get(attr));
    }

    let achievements = service.achievements(&c.id)?;
    println!(
        "  Rewards: {} earned ({} gold, {} silver, {} bronze)",
        achievements.earned_count(),
        achievements.count_by_tier(RewardTier::Gold),
        achievements.count_by_tier(RewardTier::Silver),
        achievements.count_by_tier(RewardTier::Bronze)
    );
    let milestones = next_milestones(
        &achievements.counts,
        service.rewards(),
        &achievements.earned_ids(),
    );
    for (definition, remaining) in milestones.iter().take(3) {
        println!(
            "  Next: {} ({} more {})",
            definition.display_name(),
            remaining,
            definition.category.activity()
        );
    }
    Ok(())
}

fn print_guild(service: &ProgressionService<JsonStore>, guild: &Guild) -> Result<()> {
    println!("{} (Lv.{}, {} XP)", guild.name, guild.level, guild.experience);
    for member in &guild.members {
        println!(
            "  {:<16} {:?}  contributed {} XP",
            member.character_id, member.role, member.contributed_xp
        );
    }
    for event in service.guild_events(&guild.id)? {
        println!(
            "  [{:?}] {} ({} XP, {} participants) id: {}",
            event.status,
            event.title,
            event.xp_reward,
            event.participants.len(),
            event.id
        );
    }
    Ok(())
}

fn print_quest(quest: &Quest) {
    println!(
        "  [{:?}] {} ({} {}, {} XP) id: {}",
        quest.status(),
        quest.title,
        quest.difficulty_tier,
        quest.category,
        quest.reward_amount,
        quest.id
    );
    println!("      {}", quest.description);
}

fn print_outcome(outcome: &ActivityOutcome) {
    let c = &outcome.character;
    println!("+{} XP ({} total)", outcome.xp_gained, c.experience);
    if let Some(attr) = outcome.stat_increased {
        println!("{} +1 (now {})", attr.name(), c.attributes.get(attr));
    }
    if outcome.leveled_up {
        println!("Level up! {} is now level {}", c.name, c.level);
    }
    for reward in &outcome.new_rewards {
        println!("Reward earned: {} [{}]", reward.display_name(), reward.tier);
    }
    if let Some(gain) = &outcome.guild_gain {
        println!("Guild +{} XP", gain.gained);
    }
}

/// Accepts a full quest id or a unique prefix of one.
fn resolve_quest(
    service: &ProgressionService<JsonStore>,
    character_id: &str,
    prefix: &str,
) -> Result<String> {
    let quests = service.quests(character_id)?;
    let mut matches = quests.iter().filter(|q| q.id.starts_with(prefix));
    match (matches.next(), matches.next()) {
        (Some(quest), None) => Ok(quest.id.clone()),
        (Some(_), Some(_)) => Err(invalid(format!("quest id '{}' is ambiguous", prefix))),
        (None, _) => Err(Error::not_found("quest", prefix).into()),
    }
}

fn positional<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str> {
    args.iter()
        .enumerate()
        .filter(|(i, a)| !a.starts_with("--") && !is_option_value(args, *i))
        .map(|(_, a)| a.as_str())
        .nth(index)
        .ok_or_else(|| invalid(format!("missing <{}>", name)))
}

fn is_option_value(args: &[String], index: usize) -> bool {
    index > 0
        && matches!(
            args[index - 1].as_str(),
            "--class" | "--intensity" | "--seed"
        )
}

fn option<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_number<T: std::str::FromStr>(value: &str, name: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| invalid(format!("<{}> must be a number, got '{}'", name, value)))
}

fn invalid(message: String) -> CliError {
    CliError::Usage(message)
}

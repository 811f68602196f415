use chrono::{Duration, Utc};
use gentle_srs::{
    Decision, Item, MemoryRepository, Rating, SessionConfig, SessionEngine, SessionObserver,
    SessionState, StartOutcome,
};

struct Console;

impl SessionObserver for Console {
    fn on_presenting(&mut self, item: &Item) {
        println!("Q: {}", item.question);
    }

    fn on_revealed(&mut self, item: &Item) {
        println!("A: {}", item.answer);
    }

    fn on_session_ended(&mut self) {
        println!("Session finished.");
    }

    fn on_nothing_due(&mut self) {
        println!("Nothing due. Take a rest.");
    }
}

fn setup_logging() -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
        })
        .level(log::LevelFilter::Debug)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

fn preview_new_card() -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();
    let card = Item::new(0, "What is the capital of Japan?", "Tokyo", now)?;

    // Intervals each rating would give
    let next_states = card.next_states(now);
    println!("Remembered interval: {} days", next_states.remembered.interval);
    println!("Hard interval: {} days", next_states.hard.interval);
    println!("Forgot interval: {} days", next_states.forgot.interval);
    Ok(())
}

fn run_session() -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();
    let mut repository = MemoryRepository::new();
    repository.add("2 + 2", "4", now)?;
    repository.add("Largest planet", "Jupiter", now)?;
    repository.add("H2O", "Water", now)?;

    let config = SessionConfig {
        session_size_limit: 2,
        item_limit: Some(30),
    };
    config.ensure_capacity(repository.len())?;
    repository.add("Speed of light", "299 792 458 m/s", now)?;

    let mut engine = SessionEngine::with_observer(repository, config, Console);
    if engine.start(now)? == StartOutcome::NothingDue {
        return Ok(());
    }

    // The first card is answered `hard` and comes back at the end of the queue
    let ratings = [Rating::Hard, Rating::Remembered, Rating::Remembered];
    for rating in ratings {
        engine.reveal()?;
        let review = engine.rate(rating, now)?;
        println!(
            "Rated {rating}: next review in {} days, ease {:.2}",
            review.item.interval, review.item.ease
        );
        if engine.decide(Decision::Continue)? == SessionState::Idle {
            break;
        }
    }

    let (repository, _) = engine.into_parts();
    let tomorrow = now + Duration::days(1);
    println!(
        "{} of {} cards due tomorrow",
        repository.due_count(tomorrow),
        repository.len()
    );
    for item in repository.items() {
        println!("{}: {} day(s) left", item.question, item.days_until_due(&now));
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging()?;

    println!("Previewing a new card:");
    preview_new_card()?;

    println!("\nRunning a session:");
    run_session()?;

    Ok(())
}

use chrono::Utc;
use gentle_srs::{SimulationResult, SimulatorConfig, simulate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    fern::Dispatch::new()
        .level(log::LevelFilter::Info)
        .chain(std::io::stderr())
        .apply()?;

    let config = SimulatorConfig {
        deck_size: 200,
        days: 60,
        session_size_limit: 30,
        ..Default::default()
    };
    let SimulationResult {
        review_cnt_per_day,
        due_cnt_per_day,
        rating_counts,
        items,
        ..
    } = simulate(&config, Utc::now(), Some(2024))?;

    for (day, (reviews, due)) in review_cnt_per_day.iter().zip(&due_cnt_per_day).enumerate() {
        println!("day {day:>3}: {due:>4} due, {reviews:>4} reviews");
    }
    println!("ratings: {rating_counts:?}");
    let mean_interval =
        items.iter().map(|item| item.interval as f32).sum::<f32>() / items.len() as f32;
    println!("mean interval after {} days: {mean_interval:.1}", config.days);
    Ok(())
}

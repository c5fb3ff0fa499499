//! A scripted team-battle session, end to end.
//!
//! Runs one complete game against the in-process store and gateway and
//! prints every broadcast event as a client would receive it. Handy for
//! eyeballing the event shapes:
//!
//! ```text
//! RUST_LOG=quizrally=debug cargo run -p trivia-night
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use quizrally::{
    LocalGateway, MemoryStore, PlayerId, Question, QuizService, TeamId,
};

fn question(id: &str, text: &str, options: &[&str], correct: &[usize]) -> Question {
    Question {
        id: id.into(),
        text: text.into(),
        options: options.iter().map(|s| s.to_string()).collect(),
        correct_options: correct.iter().copied().collect::<BTreeSet<_>>(),
        time_limit_ms: 15_000,
        image: None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let gateway = Arc::new(LocalGateway::new());
    let service = QuizService::new(
        Arc::new(MemoryStore::new()),
        Arc::clone(&gateway),
    );

    let created = service
        .create_room(
            "Trivia Night".into(),
            vec![
                question(
                    "q1",
                    "Which planet has the most moons?",
                    &["Mars", "Saturn", "Venus", "Mercury"],
                    &[1],
                ),
                question(
                    "q2",
                    "Which of these are prime?",
                    &["21", "23", "27", "29"],
                    &[1, 3],
                ),
            ],
        )
        .await?;
    let pin = created.pin;
    println!("room ready, join with pin {pin}\n");

    // A client per the room's channel: print every event as it lands.
    let mut rx = gateway.subscribe(&created.channel).await;
    let printer = tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            println!("-> {}", serde_json::to_string(&event).unwrap());
        }
    });

    for (id, nickname) in
        [("p1", "Ali"), ("p2", "Bea"), ("p3", "Cho"), ("p4", "Dan")]
    {
        service
            .join(pin, PlayerId::new(id), nickname.into(), None)
            .await?;
    }

    service
        .setup_teams(pin, 2, vec!["Davenport".into(), "Uptown".into()])
        .await?;
    for (id, team) in
        [("p1", 0), ("p2", 0), ("p3", 1), ("p4", 1)]
    {
        service.join_team(pin, PlayerId::new(id), TeamId(team)).await?;
    }

    // Round 1: Uptown plays it safe behind a shield; Dan still misses.
    service.activate_shield(pin, TeamId(1)).await?;
    service.start_question(pin).await?;
    for (id, choice) in
        [("p1", vec![1]), ("p2", vec![1]), ("p3", vec![1]), ("p4", vec![0])]
    {
        tokio::time::sleep(Duration::from_millis(120)).await;
        service.submit_answer(pin, PlayerId::new(id), choice).await?;
    }
    service.end_question(pin).await?;

    // Round 2: the multi-correct question splits the field.
    service.start_question(pin).await?;
    for (id, choice) in [
        ("p1", vec![1, 3]),
        ("p2", vec![3]),
        ("p3", vec![1, 3]),
        ("p4", vec![1, 3]),
    ] {
        tokio::time::sleep(Duration::from_millis(120)).await;
        service.submit_answer(pin, PlayerId::new(id), choice).await?;
    }
    let report = service.end_question(pin).await?;
    service.finish(pin).await?;

    println!("\nfinal standings:");
    for entry in &report.leaderboard {
        println!("  #{} {} - {}", entry.rank, entry.nickname, entry.score);
    }
    if let Some(teams) = &report.teams {
        for team in teams {
            println!(
                "  {} {}: {} pts, {} hp, combo x{}",
                team.emoji, team.name, team.score, team.health, team.combo
            );
        }
    }

    // Back to the lobby for another round, then wind down.
    service.reset_for_continue(pin).await?;
    tokio::time::sleep(Duration::from_millis(100)).await;
    printer.abort();
    Ok(())
}

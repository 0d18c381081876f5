//! Two scripted games against a small in-memory question bank.
//!
//! Run with: `cargo run --example play`
//! Engine logs: `RUST_LOG=quiz_ladder=debug cargo run --example play`
//!
//! 1. **Careful player**: answers correctly, spends every help type on the
//!    way up and takes the money at level 7.
//! 2. **Unlucky player**: climbs past the first fireproof level, then answers
//!    wrong and keeps the fireproof prize.
//!
//! Both games use a fixed seed, so the draw and the shuffles never change.

use quiz_ladder::{
    EngineConfig, GameId, GameService, HelpPayload, HelpType, InMemoryAccounts, InMemoryGameStore,
    InMemoryQuestionBank, Letter, PlayerId, Question, SystemClock,
};
use tracing_subscriber::EnvFilter;

type Service = GameService<InMemoryQuestionBank, InMemoryGameStore, InMemoryAccounts, SystemClock>;

// ── question bank ─────────────────────────────────────────────────────────────

/// Two questions per level. The correct answer is always stored first; each
/// game shuffles it onto a different letter.
fn bank() -> InMemoryQuestionBank {
    let questions = (0..15)
        .flat_map(|level| {
            (0..2).map(move |n| Question {
                id: (level * 2 + n) as u64,
                level,
                text: format!("Level {} question #{}: what is {} + {}?", level + 1, n + 1, level, n),
                answers: [
                    (level + n).to_string(),
                    (level + n + 1).to_string(),
                    (level + n + 2).to_string(),
                    (level * 2 + n + 3).to_string(),
                ],
                correct_answer: 1,
            })
        })
        .collect();
    InMemoryQuestionBank::new(questions).expect("demo bank is valid")
}

// ── printing ──────────────────────────────────────────────────────────────────

fn print_question(service: &Service, id: GameId) {
    let game = service.game(id).expect("game exists");
    let question = game.current_question().expect("game in progress");
    let visible = question.visible_letters();
    println!("  [{:>2}] {}", question.level() + 1, question.text());
    for (letter, text) in question.display_answers() {
        if visible.contains(&letter) {
            println!("        {}) {}", letter.label(), text);
        }
    }
}

fn print_help(payload: &HelpPayload) {
    match payload {
        HelpPayload::AudienceHelp(votes) => {
            let line: Vec<String> = votes.iter().map(|(l, v)| format!("{}: {v}%", l.label())).collect();
            println!("        audience → {}", line.join("  "));
        }
        HelpPayload::FiftyFifty(pair) => {
            println!("        fifty-fifty → {} or {}", pair[0].label(), pair[1].label());
        }
        HelpPayload::FriendCall(text) => println!("        friend → \"{text}\""),
    }
}

fn correct(service: &Service, id: GameId) -> Letter {
    service.game(id).unwrap().current_question().unwrap().correct_letter()
}

// ── games ─────────────────────────────────────────────────────────────────────

fn careful_player(service: &Service) {
    let player = PlayerId(1);
    let game = service.create_game(player).expect("player has no active game");
    println!("━━━━ careful player, game {} ━━━━", game.id());

    let helps = [(2, HelpType::AudienceHelp), (4, HelpType::FiftyFifty), (5, HelpType::FriendCall)];
    for level in 0..7 {
        print_question(service, game.id());
        if let Some(&(_, help)) = helps.iter().find(|(at, _)| *at == level) {
            let payload = service.use_help(game.id(), help).unwrap();
            print_help(&payload);
        }
        let letter = correct(service, game.id());
        let outcome = service.answer(game.id(), letter).unwrap();
        println!("        answered {} → correct, banked {}",
            letter.label(), service.rules().prize_table.prize_for(outcome.level - 1));
    }

    let outcome = service.take_money(game.id()).unwrap();
    println!("  took the money: {} with {}", outcome.status, outcome.prize);
    println!("  balance: {}", service.accounts().balance(player));
    println!();
}

fn unlucky_player(service: &Service) {
    let player = PlayerId(2);
    let game = service.create_game(player).expect("player has no active game");
    println!("━━━━ unlucky player, game {} ━━━━", game.id());

    for _ in 0..6 {
        let letter = correct(service, game.id());
        service.answer(game.id(), letter).unwrap();
    }
    print_question(service, game.id());
    let right = correct(service, game.id());
    let wrong = Letter::ALL.into_iter().find(|&l| l != right).unwrap();
    let outcome = service.answer(game.id(), wrong).unwrap();
    println!("        answered {} → wrong (it was {})", wrong.label(), right.label());
    println!("  game over: {} at level {}, keeps {}", outcome.status, outcome.level + 1, outcome.prize);
    println!("  balance: {}", service.accounts().balance(player));

    let again = service.create_game(player).expect("finished game frees the player");
    println!("  new game {} started; {} games on record",
        again.id(), service.games_for_player(player).len());
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = EngineConfig { rng_seed: Some(2024), ..EngineConfig::default() };
    let service = GameService::from_config(
        &config,
        bank(),
        InMemoryGameStore::new(),
        InMemoryAccounts::new(),
        SystemClock,
    )
    .expect("default config is valid");

    careful_player(&service);
    unlucky_player(&service);
}

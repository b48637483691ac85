use holdem_engine::engine::Engine;
use holdem_engine::logging::TestLogSubscriber;
use holdem_engine::player::{Player, PlayerAction};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

#[test]
fn rejected_input_is_logged_as_warning() {
    let subscriber = TestLogSubscriber::new();
    let registry = Registry::default().with(subscriber.clone().into_layer::<Registry>());

    tracing::subscriber::with_default(registry, || {
        let (mut engine, _events) = Engine::new(4, None);
        let a = engine.add_player(Player::new("a", 100)).unwrap();
        let b = engine.add_player(Player::new("b", 100)).unwrap();
        engine.start().unwrap();
        engine.apply_action(b, PlayerAction::bet(2)).unwrap();
        engine.apply_action(a, PlayerAction::bet(5)).unwrap();
    });

    let entries = subscriber.entries();
    let warnings: Vec<_> = entries.iter().filter(|e| e.level == Level::WARN).collect();
    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].message.contains("out of turn"));
    assert!(warnings[1].message.contains("invalid blind"));
    assert_eq!(warnings[1].field("blind"), Some("2"));
}

#[test]
fn hand_start_is_logged_at_info() {
    let subscriber = TestLogSubscriber::new();
    let registry = Registry::default().with(subscriber.clone().into_layer::<Registry>());

    tracing::subscriber::with_default(registry, || {
        let (mut engine, _events) = Engine::new(4, None);
        engine.add_player(Player::new("a", 100)).unwrap();
        engine.add_player(Player::new("b", 100)).unwrap();
        engine.start().unwrap();
    });

    let entries = subscriber.entries();
    let started = entries
        .iter()
        .find(|e| e.message.contains("hand started"))
        .expect("hand start logged");
    assert_eq!(started.level, Level::INFO);
    assert_eq!(started.field("hand"), Some("1"));
    assert_eq!(started.field("players"), Some("2"));
    assert!(entries
        .iter()
        .any(|e| e.level == Level::DEBUG && e.message.contains("phase transition")));
}

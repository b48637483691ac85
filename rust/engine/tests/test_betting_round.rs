use holdem_engine::events::EventKind;
use holdem_engine::history::Street;
use holdem_engine::player::{Player, PlayerAction, PlayerId};
use holdem_engine::round::{BettingRound, Outcome};
use holdem_engine::rules::{BettingStructure, StructureKind};
use holdem_engine::table::Table;

struct Fixture {
    table: Table,
    round: BettingRound,
    ids: Vec<PlayerId>,
}

impl Fixture {
    fn new(stacks: &[u32], street: Street, kind: StructureKind) -> Self {
        let players: Vec<Player> = stacks
            .iter()
            .enumerate()
            .map(|(i, &s)| Player::new(format!("p{i}"), s))
            .collect();
        let ids = players.iter().map(Player::id).collect();
        let mut table = Table::with_players(players);
        if !(street == Street::Preflop && table.is_heads_up()) {
            table.move_next();
        }
        let structure = BettingStructure::for_street(kind, street, 4, 3);
        let round = BettingRound::new(&table, street, structure, 4);
        Self { table, round, ids }
    }

    /// Applies an action and advances the turn when it is accepted.
    fn act(&mut self, seat: usize, action: PlayerAction) -> Outcome {
        let outcome = self
            .round
            .apply(&mut self.table, self.ids[seat], action)
            .unwrap();
        if outcome.is_accepted() {
            self.table.move_next();
        }
        outcome
    }

    fn stack(&self, seat: usize) -> u32 {
        self.table.get(self.ids[seat]).unwrap().stack()
    }
}

#[test]
fn blinds_are_small_then_big() {
    let mut f = Fixture::new(&[100, 100, 100], Street::Preflop, StructureKind::FixedLimit);
    assert_eq!(
        f.act(1, PlayerAction::bet(2)),
        Outcome::Accepted(vec![EventKind::BlindPosted {
            player_id: f.ids[1],
            amount: 2
        }])
    );
    assert!(f.act(2, PlayerAction::bet(4)).is_accepted());
    assert_eq!(f.round.pot().total(), 6);
    assert_eq!(f.round.to_call(f.ids[0]), 4);
    assert_eq!(f.round.to_call(f.ids[1]), 2);
    assert_eq!(f.round.to_call(f.ids[2]), 0);
}

#[test]
fn short_stack_posts_what_it_has() {
    let mut f = Fixture::new(&[100, 100, 3], Street::Preflop, StructureKind::FixedLimit);
    f.act(1, PlayerAction::bet(2));
    let wrong = f.act(2, PlayerAction::bet(4));
    assert_eq!(
        wrong,
        Outcome::Rejected(EventKind::InvalidBlind {
            player_id: f.ids[2],
            action: PlayerAction::bet(4),
            blind: 3,
        })
    );
    assert!(f.act(2, PlayerAction::bet(3)).is_accepted());
    assert_eq!(f.stack(2), 0);
}

#[test]
fn blind_must_be_a_bet() {
    let mut f = Fixture::new(&[100, 100, 100], Street::Preflop, StructureKind::FixedLimit);
    let outcome = f.act(1, PlayerAction::call(2));
    assert!(matches!(outcome, Outcome::Rejected(EventKind::InvalidBlind { .. })));
    assert_eq!(f.stack(1), 100);
    assert!(f.round.is_pending(f.ids[1]));
}

#[test]
fn out_of_turn_is_rejected_without_changes() {
    let mut f = Fixture::new(&[100, 100, 100], Street::Flop, StructureKind::FixedLimit);
    assert_eq!(
        f.act(2, PlayerAction::check()),
        Outcome::Rejected(EventKind::OutOfTurn { player_id: f.ids[2] })
    );
    assert!(f.round.is_pending(f.ids[2]));
    assert!(f.act(1, PlayerAction::check()).is_accepted());
}

#[test]
fn checked_around_round_completes_and_then_refuses_actions() {
    let mut f = Fixture::new(&[100, 100, 100], Street::Flop, StructureKind::FixedLimit);
    for seat in [1, 2, 0] {
        assert!(f.act(seat, PlayerAction::check()).is_accepted());
    }
    assert!(f.round.is_complete());
    assert_eq!(
        f.act(1, PlayerAction::check()),
        Outcome::Rejected(EventKind::ActionAfterRoundCompleted { player_id: f.ids[1] })
    );
}

#[test]
fn raise_reopens_for_players_who_already_acted() {
    let mut f = Fixture::new(&[100, 100, 100], Street::Flop, StructureKind::FixedLimit);
    f.act(1, PlayerAction::check());
    f.act(2, PlayerAction::bet(4));
    assert!(f.round.is_pending(f.ids[1]));
    assert!(f.round.is_pending(f.ids[0]));
    f.act(0, PlayerAction::call(4));
    f.act(1, PlayerAction::bet(8));
    assert!(f.round.is_pending(f.ids[2]));
    assert!(f.round.is_pending(f.ids[0]));
    f.act(2, PlayerAction::call(4));
    f.act(0, PlayerAction::call(4));
    assert!(f.round.is_complete());
    assert_eq!(f.round.pot().total(), 24);
}

#[test]
fn invalid_amount_reports_context() {
    let mut f = Fixture::new(&[100, 100, 100], Street::Flop, StructureKind::FixedLimit);
    f.act(1, PlayerAction::bet(4));
    let outcome = f.act(2, PlayerAction::call(3));
    let Outcome::Rejected(EventKind::InvalidAction { context, .. }) = outcome else {
        panic!("expected InvalidAction, got {outcome:?}");
    };
    assert_eq!(context.to_call, 4);
    assert_eq!(context.to_raise, 8);
    assert!(context.can_raise);
    assert!(f.round.is_pending(f.ids[2]));
    assert_eq!(f.stack(2), 100);
}

#[test]
fn check_facing_a_bet_is_invalid() {
    let mut f = Fixture::new(&[100, 100], Street::Flop, StructureKind::FixedLimit);
    f.act(1, PlayerAction::bet(4));
    let outcome = f.act(0, PlayerAction::check());
    assert!(matches!(outcome, Outcome::Rejected(EventKind::InvalidAction { .. })));
}

#[test]
fn fold_deactivates_and_completes() {
    let mut f = Fixture::new(&[100, 100], Street::Turn, StructureKind::FixedLimit);
    f.act(1, PlayerAction::bet(8));
    assert_eq!(
        f.act(0, PlayerAction::fold()),
        Outcome::Accepted(vec![EventKind::PlayerFolded { player_id: f.ids[0] }])
    );
    assert!(!f.table.get(f.ids[0]).unwrap().is_active());
    assert!(f.round.is_complete());
}

#[test]
fn no_limit_short_all_in_does_not_reopen() {
    let mut f = Fixture::new(&[100, 100, 14], Street::Flop, StructureKind::NoLimit);
    f.act(1, PlayerAction::bet(10));
    f.act(2, PlayerAction::bet(14));
    assert_eq!(f.stack(2), 0);
    // Seat 1 already acted and the all-in was only 4 over the call.
    assert!(!f.round.is_pending(f.ids[1]));
    // Seat 0 has not acted yet and faces the full all-in amount.
    assert!(f.round.is_pending(f.ids[0]));
    assert_eq!(f.round.to_call(f.ids[0]), 14);
    assert!(!f.act(0, PlayerAction::call(10)).is_accepted());
    f.act(0, PlayerAction::call(14));
    assert!(f.round.is_complete());
    assert_eq!(f.round.pot().total(), 38);
}

#[test]
fn no_limit_full_raise_reopens() {
    let mut f = Fixture::new(&[100, 100, 100], Street::Flop, StructureKind::NoLimit);
    f.act(1, PlayerAction::bet(10));
    f.act(2, PlayerAction::bet(30));
    assert!(f.round.is_pending(f.ids[1]));
    assert_eq!(f.round.to_call(f.ids[1]), 20);
    let ctx = f.round.context(f.ids[1], false);
    assert_eq!(ctx.to_raise, 40);
}

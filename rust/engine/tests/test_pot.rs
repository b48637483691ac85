use holdem_engine::cards::parse_cards;
use holdem_engine::hand::HandRanking;
use holdem_engine::player::PlayerId;
use holdem_engine::pot::{Contestant, Pot, PotAward};
use proptest::prelude::*;

fn contestant(player_id: PlayerId, cards: &str) -> Contestant {
    let hand = parse_cards(cards).unwrap();
    let ranking = HandRanking::from_hand(&hand).unwrap();
    Contestant {
        player_id,
        hand,
        ranking,
    }
}

const NUTS: &str = "As Ks Qs Js 10s";
const STRAIGHT: &str = "9c 10d Jh Qs Kc";
const STRAIGHT_2: &str = "9d 10h Js Qc Kd";
const STRAIGHT_3: &str = "9h 10s Jc Qd Kh";
const JUNK: &str = "2c 4d 7h 9s Jd";

fn total(awards: &[PotAward]) -> u32 {
    awards.iter().map(|a| a.amount).sum()
}

#[test]
fn three_contributors_form_two_layers() {
    let (a, b, c) = (PlayerId::new(), PlayerId::new(), PlayerId::new());
    let mut pot = Pot::new();
    pot.add(a, 30);
    pot.add(b, 10);
    pot.add(c, 30);

    let layers = pot.side_pots();
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[0].amount, 30);
    assert_eq!(layers[0].eligible.len(), 3);
    assert_eq!(layers[1].amount, 40);
    assert_eq!(layers[1].eligible.len(), 2);
    assert!(!layers[1].eligible.contains(&b));

    // The short stack holds the best hand: it takes the main pot only.
    let awards = pot.award(&[
        contestant(a, STRAIGHT),
        contestant(b, NUTS),
        contestant(c, JUNK),
    ]);
    assert_eq!(
        awards,
        vec![
            PotAward { player_id: b, amount: 30 },
            PotAward { player_id: a, amount: 40 },
        ]
    );
    assert_eq!(total(&awards), 70);
}

#[test]
fn odd_chips_go_to_earliest_winners() {
    let ids: Vec<PlayerId> = (0..4).map(|_| PlayerId::new()).collect();
    let mut pot = Pot::new();
    for &id in &ids {
        pot.add(id, 11);
    }
    let awards = pot.award(&[
        contestant(ids[0], STRAIGHT),
        contestant(ids[1], JUNK),
        contestant(ids[2], STRAIGHT_2),
        contestant(ids[3], STRAIGHT_3),
    ]);
    assert_eq!(
        awards,
        vec![
            PotAward { player_id: ids[0], amount: 15 },
            PotAward { player_id: ids[2], amount: 15 },
            PotAward { player_id: ids[3], amount: 14 },
        ]
    );
}

#[test]
fn lone_contestant_takes_everything() {
    let (a, b, c) = (PlayerId::new(), PlayerId::new(), PlayerId::new());
    let mut pot = Pot::new();
    pot.add(a, 2);
    pot.add(b, 4);
    pot.add(c, 9);
    let awards = pot.award(&[contestant(b, JUNK)]);
    assert_eq!(awards, vec![PotAward { player_id: b, amount: 15 }]);
}

#[test]
fn uncalled_excess_of_folded_player_is_returned() {
    let (a, b) = (PlayerId::new(), PlayerId::new());
    let mut pot = Pot::new();
    pot.add(a, 10);
    pot.add(b, 25);
    // b folded; a and an uninvolved third player are still in the hand.
    let awards = pot.award(&[contestant(a, JUNK), contestant(PlayerId::new(), NUTS)]);
    assert_eq!(
        awards,
        vec![
            PotAward { player_id: a, amount: 20 },
            PotAward { player_id: b, amount: 15 },
        ]
    );
}

#[test]
fn empty_pot_awards_nothing() {
    let pot = Pot::new();
    assert!(pot.award(&[contestant(PlayerId::new(), NUTS)]).is_empty());
    assert!(pot.is_empty());
}

const HANDS: [&str; 5] = [NUTS, STRAIGHT, STRAIGHT_2, JUNK, "2d 2h 5c 8s Qh"];

proptest! {
    #[test]
    fn awards_conserve_chips_and_respect_eligibility(
        entries in prop::collection::vec((0u32..200, 0usize..HANDS.len(), any::<bool>()), 2..7)
    ) {
        let ids: Vec<PlayerId> = entries.iter().map(|_| PlayerId::new()).collect();
        let mut pot = Pot::new();
        let mut contestants = Vec::new();
        for (&id, &(amount, hand, folded)) in ids.iter().zip(&entries) {
            pot.add(id, amount);
            if !folded {
                contestants.push(contestant(id, HANDS[hand]));
            }
        }

        let awards = pot.award(&contestants);
        prop_assert_eq!(total(&awards), pot.total());

        // Only contestants profit, and only from layers they covered.
        for award in &awards {
            let paid = pot.contribution(award.player_id);
            let won: u32 = awards
                .iter()
                .filter(|a| a.player_id == award.player_id)
                .map(|a| a.amount)
                .sum();
            let is_contestant = contestants.iter().any(|c| c.player_id == award.player_id);
            prop_assert!(is_contestant || won <= paid);
            if contestants.len() != 1 {
                let cap: u32 = ids.iter().map(|&id| pot.contribution(id).min(paid)).sum();
                prop_assert!(won <= cap);
            }
        }
    }
}

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use fish_core::{Ask, AskEvent, Deal, Event, GroupId, Observers, Rules, Seat};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

const SCRIPTED_ASKS: usize = 150;

fn deal(seed: u64) -> Deal {
    let mut rng = SmallRng::seed_from_u64(seed);
    Deal::random(Arc::new(Rules::standard()), &mut rng)
}

fn revealed(deal: &Deal, group: GroupId) -> Vec<u8> {
    let rules = deal.rules();
    let cards = rules.group(group).cards();
    rules
        .seats()
        .map(|seat| {
            cards
                .iter()
                .filter(|card| deal.holder_of(rules.card(**card)) == Some(seat))
                .count() as u8
        })
        .collect()
}

/// Seeded ask sequence resolved against the true hands: each turn a random seat
/// with a legal ask makes one of them.
fn scripted_asks(deal: &Deal, seed: u64) -> Vec<Event> {
    let rules = deal.rules();
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut hands = deal.hands().to_vec();
    let mut observers = Observers::from_deal(deal).expect("deal is valid");
    let mut events = Vec::with_capacity(SCRIPTED_ASKS);
    while events.len() < SCRIPTED_ASKS {
        let askers: Vec<(Seat, Vec<Ask>)> = rules
            .seats()
            .map(|seat| (seat, observers.states()[seat.index()].legal_asks()))
            .filter(|(_, asks)| !asks.is_empty())
            .collect();
        if askers.is_empty() {
            break;
        }
        let (asker, asks) = &askers[rng.gen_range(0..askers.len())];
        let asker = *asker;
        let ask = asks[rng.gen_range(0..asks.len())];
        let position = hands[ask.target.index()].iter().position(|card| *card == ask.card);
        if let Some(position) = position {
            let card = hands[ask.target.index()].remove(position);
            hands[asker.index()].push(card);
        }
        let event = Event::Ask(AskEvent {
            asker,
            target: ask.target,
            card: ask.card,
            success: position.is_some(),
        });
        observers.apply(&event).expect("truthful ask is consistent");
        events.push(event);
    }
    events
}

fn full_game_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay");
    group.sample_size(20);
    for seed in [7u64, 19] {
        let deal = deal(seed);
        let events = scripted_asks(&deal, seed);
        let fresh = Observers::from_deal(&deal).expect("deal is valid");
        group.bench_function(format!("asks_{SCRIPTED_ASKS}_{seed}"), |b| {
            b.iter(|| {
                let mut table = fresh.clone();
                for event in &events {
                    black_box(table.apply(event)).expect("replay is consistent");
                }
                table
            })
        });
    }
    group.finish();
}

fn propagate_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("propagate");
    for seed in [7u64, 19, 23] {
        let deal = deal(seed);
        group.bench_function(format!("initialize_table_{seed}"), |b| {
            b.iter(|| black_box(Observers::from_deal(&deal)))
        });

        let observers = Observers::from_deal(&deal).expect("deal is valid");
        let call = Event::Call(fish_core::CallEvent {
            group: GroupId::new(0),
            revealed: revealed(&deal, GroupId::new(0)),
        });
        group.bench_function(format!("call_full_rescan_{seed}"), |b| {
            b.iter(|| {
                let mut table = observers.clone();
                black_box(table.apply(&call))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, propagate_bench, full_game_bench);
criterion_main!(benches);

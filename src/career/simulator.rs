//! Whole-career simulator: plays many seeded games through the public
//! engine API and checks the invariants that must hold in every one.
//! Run with: cargo test simulate_ -- --nocapture

mod tests {
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use crate::career::engine::{CareerEngine, MonthAdvance, Notification};
    use crate::career::outcome::Outcome;
    use crate::career::state::Stats;
    use crate::career::ActionId;
    use crate::config::EngineConfig;

    /// Hard stop for careers that neither win nor lose.
    const MONTH_CAP: u32 = 12 * 60;

    #[derive(Default, Debug)]
    struct Tally {
        victories: u32,
        failures: u32,
        capped: u32,
        promotions: u32,
        events: u32,
    }

    /// How the simulated player picks an action.
    #[derive(Clone, Copy)]
    enum Policy {
        /// Uniform over the listed actions, skipping a month now and then.
        Random,
        /// Rest when tired, train when weak, otherwise push the project.
        Careful,
    }

    fn pick(policy: Policy, engine: &CareerEngine, rng: &mut ChaCha8Rng) -> Option<ActionId> {
        let available = engine.available_actions();
        match policy {
            Policy::Random => {
                if rng.gen_bool(0.05) {
                    return None;
                }
                available.choose(rng).map(|def| def.id)
            }
            Policy::Careful => {
                let s = &engine.state().stats;
                let id = if s.energy < 40.0 {
                    ActionId::Rest
                } else if s.ability < 60.0 {
                    ActionId::Training
                } else if s.team_morale < 50.0 && available.iter().any(|d| d.id == ActionId::TeamBuilding) {
                    ActionId::TeamBuilding
                } else {
                    ActionId::PushProject
                };
                Some(id)
            }
        }
    }

    fn assert_bounded(stats: &Stats, config: &EngineConfig) {
        let max = config.limits.max_stat;
        for (name, value) in [
            ("energy", stats.energy),
            ("reputation", stats.reputation),
            ("executive", stats.executive),
            ("network", stats.network),
            ("ability", stats.ability),
            ("team_morale", stats.team_morale),
        ] {
            assert!((0.0..=max).contains(&value), "{} out of range: {}", name, value);
        }
        assert!(stats.performance <= config.limits.max_performance);
        assert!((0.0..=config.limits.max_risk).contains(&stats.risk));
    }

    /// Play one career to its end (or the cap) and return what happened.
    fn play(seed: u64, policy: Policy, tally: &mut Tally) {
        let config = EngineConfig::default();
        let mut engine = CareerEngine::seeded(config.clone(), seed);
        let mut player = ChaCha8Rng::seed_from_u64(seed ^ 0x5eed);
        let mut endings = 0;
        let mut tier = engine.state().career_level;
        let mut months = 0;

        while !engine.state().is_game_over && months < MONTH_CAP {
            if let Some(event) = engine.pending_event() {
                let index = player.gen_range(0..event.choices.len());
                engine
                    .request_event_choice(event.id, index)
                    .expect("choosing a listed option of the open event");
            } else if engine.state().has_monthly_action {
                match pick(policy, &engine, &mut player) {
                    Some(id) => {
                        engine.request_action(id).expect("listed action with a free slot");
                        engine.run_scheduled();
                    }
                    None => {
                        engine.request_month_advance(true).expect("confirmed skip");
                    }
                }
            } else {
                match engine.request_month_advance(false).expect("slot already used") {
                    MonthAdvance::Advanced(_) => {}
                    MonthAdvance::ConfirmationRequired => panic!("used slot never needs confirmation"),
                }
            }

            for note in engine.drain_notifications() {
                match note {
                    Notification::StateChanged(snap) => assert_bounded(&snap.stats, &config),
                    Notification::EventPresented(_) => tally.events += 1,
                    Notification::GameEnded(_) => endings += 1,
                }
            }

            let state = engine.state();
            assert_bounded(&state.stats, &config);
            assert!((1..=12).contains(&state.month));
            assert!(state.career_level >= tier, "tier went down");
            assert!(state.career_level <= tier + 1, "tier skipped");
            tally.promotions += (state.career_level - tier) as u32;
            tier = state.career_level;

            let (years, rem) = state.career_length();
            months = years * 12 + rem;
        }

        match engine.outcome() {
            Outcome::Ongoing => {
                assert_eq!(endings, 0);
                tally.capped += 1;
            }
            Outcome::Victory(_) => {
                assert_eq!(endings, 1);
                tally.victories += 1;
            }
            Outcome::Failure(_) => {
                assert_eq!(endings, 1);
                tally.failures += 1;
            }
        }
    }

    #[test]
    fn simulate_random_careers() {
        let mut tally = Tally::default();
        for seed in 0..200 {
            play(seed, Policy::Random, &mut tally);
        }
        println!("random policy: {:?}", tally);
        assert_eq!(tally.victories + tally.failures + tally.capped, 200);
        assert!(tally.events > 0);
    }

    #[test]
    fn simulate_careful_careers() {
        let mut tally = Tally::default();
        for seed in 0..100 {
            play(seed, Policy::Careful, &mut tally);
        }
        println!("careful policy: {:?}", tally);
        assert_eq!(tally.victories + tally.failures + tally.capped, 100);
    }

    #[test]
    fn same_seed_same_career() {
        let run = |seed| {
            let mut engine = CareerEngine::seeded(EngineConfig::default(), seed);
            let plan = [ActionId::Training, ActionId::PushProject, ActionId::BusinessTrip];
            for i in 0..24 {
                if let Some(event) = engine.pending_event() {
                    engine.request_event_choice(event.id, 0).unwrap();
                }
                if engine.state().is_game_over {
                    break;
                }
                engine.request_action(plan[i % plan.len()]).unwrap();
                engine.run_scheduled();
            }
            engine.snapshot()
        };
        assert_eq!(run(42), run(42));
    }
}

//! Randomised search-like sequences of decisions, propagation and backtracking.
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;
use trellis_core::propagation::NegatablePropagator;
use trellis_core::propagation::Propagator;
use trellis_core::propagation::PropagatorConstructor;
use trellis_core::propagators::AbsXeqY;
use trellis_core::propagators::AlldiffArgs;
use trellis_core::propagators::AmongArgs;
use trellis_core::propagators::AndBoolVectorArgs;
use trellis_core::propagators::AtLeastArgs;
use trellis_core::propagators::BoolClauseArgs;
use trellis_core::propagators::CircuitArgs;
use trellis_core::propagators::Distance;
use trellis_core::propagators::EqBool;
use trellis_core::propagators::LexOrderArgs;
use trellis_core::propagators::NogoodArgs;
use trellis_core::propagators::OrBoolVectorArgs;
use trellis_core::propagators::ReifiedArgs;
use trellis_core::propagators::Relation;
use trellis_core::propagators::SubcircuitArgs;
use trellis_core::propagators::SumWeightArgs;
use trellis_core::propagators::ValuesArgs;
use trellis_core::propagators::XRelC;
use trellis_core::propagators::XRelY;
use trellis_core::propagators::XdivYeqZ;
use trellis_core::propagators::XplusYeqZ;
use trellis_core::DomainId;
use trellis_core::IntervalDomain;
use trellis_core::Store;

fn snapshot(store: &Store) -> Vec<IntervalDomain> {
    store
        .variables()
        .map(|var| store.domain(var).clone())
        .collect()
}

/// Narrows a random open variable, or returns `false` if every variable is fixed.
fn decide(store: &mut Store, rng: &mut SmallRng) -> bool {
    let open = store
        .variables()
        .filter(|&var| !store.is_fixed(var))
        .collect::<Vec<_>>();
    if open.is_empty() {
        return false;
    }

    let var = open[rng.gen_range(0..open.len())];
    let values = store.domain(var).values().collect::<Vec<_>>();
    let value = values[rng.gen_range(0..values.len())];

    let decision = match rng.gen_range(0..3) {
        0 => store.assign(var, value),
        1 => store.remove(var, value),
        _ => store.set_upper_bound(var, value),
    };
    let _ = decision.expect("the domain keeps at least one value");

    true
}

fn model(store: &mut Store) {
    let xs = (0..6).map(|_| store.new_variable(0, 5)).collect::<Vec<_>>();
    let bs = (0..3).map(|_| store.new_variable(0, 1)).collect::<Vec<_>>();
    let count = store.new_variable(0, 3);
    let among = store.new_variable(0, 3);
    let successors = (0..4).map(|_| store.new_variable(1, 4)).collect::<Vec<_>>();
    let nodes = (0..4).map(|_| store.new_variable(1, 4)).collect::<Vec<_>>();

    let _ = store
        .impose(AlldiffArgs::new(xs[..3].to_vec()).expect("distinct variables"))
        .expect("valid model");
    let _ = store
        .impose(XplusYeqZ::new(xs[0], xs[3], xs[4]))
        .expect("valid model");
    let _ = store
        .impose(AtLeastArgs::new(xs[3..].to_vec(), 1, 2).expect("valid counter"))
        .expect("valid model");
    let _ = store
        .impose(LexOrderArgs::new(xs[..2].to_vec(), xs[4..].to_vec(), false).expect("same length"))
        .expect("valid model");
    let _ = store
        .impose(NogoodArgs::new(vec![(xs[1], 2), (xs[3], 1), (xs[5], 0)]).expect("valid nogood"))
        .expect("valid model");
    let _ = store
        .impose(ValuesArgs::new(xs[3..].to_vec(), count).expect("distinct variables"))
        .expect("valid model");
    let _ = store
        .impose(
            AmongArgs::new(xs[..3].to_vec(), IntervalDomain::new(0, 1), among)
                .expect("distinct variables"),
        )
        .expect("valid model");
    let _ = store
        .impose(ReifiedArgs::new(XRelC::new(xs[5], Relation::Ge, 3), bs[0]))
        .expect("valid model");
    let _ = store
        .impose(OrBoolVectorArgs::new(bs[..2].to_vec(), bs[2]))
        .expect("valid model");
    let _ = store
        .impose(CircuitArgs::new(successors).expect("distinct variables"))
        .expect("valid model");
    let _ = store
        .impose(SubcircuitArgs::new(nodes).expect("distinct variables"))
        .expect("valid model");
}

#[test]
fn restoring_a_level_returns_the_domains_of_that_level() {
    for seed in 0..50 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut store = Store::default();
        model(&mut store);
        store.consistency().expect("the root of the model is consistent");

        // The domains at each level, taken just before the next level was opened.
        let mut levels = Vec::new();

        for _ in 0..60 {
            let descend = store.level() == 0 || rng.gen_bool(0.7);

            if descend {
                let before = snapshot(&store);
                store.new_checkpoint();
                levels.push(before);

                if !decide(&mut store, &mut rng) || store.consistency().is_err() {
                    let level = store.level() - 1;
                    store.restore(level);
                    let expected = levels.pop().expect("a level was opened");
                    assert_eq!(snapshot(&store), expected, "seed {seed}");
                }
            } else {
                let level = rng.gen_range(0..store.level());
                store.restore(level);
                levels.truncate(level + 1);
                let expected = levels.pop().expect("a level was opened");
                assert_eq!(snapshot(&store), expected, "seed {seed}");
            }

            assert_eq!(store.level(), levels.len(), "seed {seed}");
        }
    }
}

fn check_status_exclusion<Constructor>(constructor: impl Fn(&mut Store) -> Constructor)
where
    Constructor: PropagatorConstructor,
    Constructor::PropagatorImpl: NegatablePropagator,
{
    for seed in 0..50 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut store = Store::default();
        let constraint = constructor(&mut store);
        let handle = store.impose(constraint).expect("valid model");

        loop {
            let propagator = store.propagator(handle).expect("imposed on this store");
            let domains = store.domains();
            assert!(
                !(propagator.satisfied(domains) && propagator.not_satisfied(domains)),
                "{} is both satisfied and violated (seed {seed})",
                propagator.name()
            );

            if !decide(&mut store, &mut rng) {
                break;
            }
        }
    }
}

fn variables(store: &mut Store, n: usize, lower: i32, upper: i32) -> Vec<DomainId> {
    (0..n).map(|_| store.new_variable(lower, upper)).collect()
}

#[test]
fn constraints_are_never_both_satisfied_and_violated() {
    check_status_exclusion(|store| {
        let v = variables(store, 3, -2, 3);
        XplusYeqZ::new(v[0], v[1], v[2])
    });
    check_status_exclusion(|store| {
        let v = variables(store, 2, -3, 3);
        AbsXeqY::new(v[0], v[1])
    });
    check_status_exclusion(|store| {
        let v = variables(store, 3, 0, 3);
        Distance::new(v[0], v[1], v[2])
    });
    check_status_exclusion(|store| {
        let v = variables(store, 2, 0, 3);
        XRelY::new(v[0], Relation::Le, v[1])
    });
    check_status_exclusion(|store| {
        let v = variables(store, 4, 0, 3);
        SumWeightArgs::new(v[..3].to_vec(), vec![1, -2, 3], v[3]).expect("matching lengths")
    });
    check_status_exclusion(|store| {
        let v = variables(store, 4, 0, 2);
        AtLeastArgs::new(v, 2, 1).expect("valid counter")
    });
    check_status_exclusion(|store| {
        let v = variables(store, 3, -3, 3);
        XdivYeqZ::new(v[0], v[1], v[2])
    });
    check_status_exclusion(|store| {
        let v = variables(store, 4, 0, 1);
        EqBool::new(v[..3].to_vec(), v[3])
    });
    check_status_exclusion(|store| {
        let v = variables(store, 4, 0, 1);
        AndBoolVectorArgs::new(v[..3].to_vec(), v[3])
    });
    check_status_exclusion(|store| {
        let v = variables(store, 3, 0, 1);
        BoolClauseArgs::new(v[..1].to_vec(), v[1..].to_vec()).expect("non-empty clause")
    });
    check_status_exclusion(|store| {
        let v = variables(store, 3, 0, 2);
        NogoodArgs::new(vec![(v[0], 1), (v[1], 1), (v[2], 0)]).expect("valid nogood")
    });
}

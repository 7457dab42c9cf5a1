use crate::containers::HashMap;
use crate::containers::HashSet;
use crate::engine::IntervalDomain;

/// The size of a maximum matching in the bipartite graph between variables (given by their
/// domains) and values.
///
/// A domain with at least as many values as there are domains can always be matched, whatever
/// the others take, so only the smaller domains are matched explicitly (with augmenting paths).
pub(crate) fn maximum_matching(domains: &[&IntervalDomain]) -> usize {
    let num_domains = domains.len() as u64;
    let (large, small): (Vec<&IntervalDomain>, Vec<&IntervalDomain>) = domains
        .iter()
        .copied()
        .partition(|domain| domain.size() >= num_domains);

    let mut owners: HashMap<i32, usize> = HashMap::default();
    let mut matched = 0;
    for index in 0..small.len() {
        let mut visited: HashSet<i32> = HashSet::default();
        if augment(index, &small, &mut owners, &mut visited) {
            matched += 1;
        }
    }

    matched + large.len()
}

/// Tries to match `small[index]`, re-matching already matched domains if needed.
fn augment(
    index: usize,
    small: &[&IntervalDomain],
    owners: &mut HashMap<i32, usize>,
    visited: &mut HashSet<i32>,
) -> bool {
    for value in small[index].values() {
        if !visited.insert(value) {
            continue;
        }

        let free = match owners.get(&value).copied() {
            None => true,
            Some(owner) => augment(owner, small, owners, visited),
        };

        if free {
            let _ = owners.insert(value, index);
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_values_limit_the_matching() {
        let a = IntervalDomain::new(1, 2);
        let b = IntervalDomain::new(1, 2);
        let c = IntervalDomain::new(1, 2);

        assert_eq!(maximum_matching(&[&a, &b, &c]), 2);
    }

    #[test]
    fn augmenting_paths_rematch_earlier_domains() {
        let a = IntervalDomain::from_values([1, 2]);
        let b = IntervalDomain::singleton(1);
        let c = IntervalDomain::from_values([2, 3]);

        assert_eq!(maximum_matching(&[&a, &b, &c]), 3);
    }

    #[test]
    fn large_domains_are_always_matched() {
        let a = IntervalDomain::singleton(1);
        let b = IntervalDomain::singleton(1);
        let c = IntervalDomain::new(0, 2);

        assert_eq!(maximum_matching(&[&a, &b, &c]), 2);
    }
}

use crate::basic_types::Contradiction;

/// Tightens the lower bounds of a set of variables which take pairwise distinct values, where
/// variable `i` ranges over `intervals[i]`.
///
/// An interval `[low, high]` which contains as many variable ranges as it contains values is a
/// Hall interval: those variables use up all of its values, so every other variable whose range
/// starts inside the Hall interval has to start after it. Upper bounds are tightened by calling
/// this on the negated ranges.
///
/// Returns the new lower bounds, or a contradiction if some interval contains more variable
/// ranges than values.
pub(crate) fn hall_lower_bounds(intervals: &[(i64, i64)]) -> Result<Vec<i64>, Contradiction> {
    let mut by_upper_bound = (0..intervals.len()).collect::<Vec<_>>();
    by_upper_bound.sort_by_key(|&index| intervals[index].1);

    let mut lows = intervals.iter().map(|&(low, _)| low).collect::<Vec<_>>();
    lows.sort_unstable();
    lows.dedup();

    // counts[i]: the number of ranges seen so far which start at or after lows[i].
    let mut counts = vec![0_i64; lows.len()];
    let mut new_lower_bounds = intervals.iter().map(|&(low, _)| low).collect::<Vec<_>>();

    let mut position = 0;
    while position < by_upper_bound.len() {
        let high = intervals[by_upper_bound[position]].1;

        while position < by_upper_bound.len() && intervals[by_upper_bound[position]].1 == high {
            let low = intervals[by_upper_bound[position]].0;
            for (count, _) in counts
                .iter_mut()
                .zip(&lows)
                .take_while(|(_, l)| **l <= low)
            {
                *count += 1;
            }
            position += 1;
        }

        for (&count, &low) in counts.iter().zip(&lows) {
            if low > high {
                break;
            }

            let capacity = high - low + 1;
            if count > capacity {
                return Err(Contradiction);
            }

            if count == capacity {
                for (index, &(other_low, other_high)) in intervals.iter().enumerate() {
                    if other_low >= low && other_high > high {
                        new_lower_bounds[index] = new_lower_bounds[index].max(high + 1);
                    }
                }
            }
        }
    }

    Ok(new_lower_bounds)
}

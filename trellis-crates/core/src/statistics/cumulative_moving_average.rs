use std::fmt::Debug;
use std::fmt::Display;

use num::cast::AsPrimitive;
use num::traits::NumAssign;

/// The average of every term added so far.
#[derive(Default, Debug, Copy, Clone)]
pub struct CumulativeMovingAverage<Term> {
    sum: Term,
    num_terms: u64,
}

impl<Term> CumulativeMovingAverage<Term>
where
    Term: Debug + NumAssign + AsPrimitive<f64>,
{
    pub fn add_term(&mut self, new_term: Term) {
        self.sum += new_term;
        self.num_terms += 1
    }

    pub fn value(&self) -> f64 {
        if self.num_terms > 0 {
            self.sum.as_() / (self.num_terms as f64)
        } else {
            0.0
        }
    }
}

impl<Term> Display for CumulativeMovingAverage<Term>
where
    Term: Debug + NumAssign + AsPrimitive<f64>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::CumulativeMovingAverage;

    #[test]
    fn an_empty_average_is_zero() {
        let average: CumulativeMovingAverage<u64> = CumulativeMovingAverage::default();
        assert_eq!(average.value(), 0.0);
    }

    #[test]
    fn the_average_follows_the_terms() {
        let mut average = CumulativeMovingAverage::default();
        average.add_term(10_u64);
        assert_eq!(average.value(), 10.0);
        average.add_term(20);
        assert_eq!(average.value(), 15.0);
        average.add_term(30);
        assert_eq!(average.value(), 20.0);
    }
}

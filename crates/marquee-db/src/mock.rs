//! Sample catalog and picker used by `add` and preview stores.

/// A title/cast pair that `add` can instantiate.
pub(crate) struct MockMovie {
    pub title: &'static str,
    pub cast: &'static [&'static str],
}

/// Compiled-in sample catalog.
pub(crate) const CATALOG: &[MockMovie] = &[
    MockMovie {
        title: "Se7en",
        cast: &["Brad Pitt", "Morgan Freeman", "Gwyneth Paltrow"],
    },
    MockMovie {
        title: "The Score",
        cast: &["Robert De Niro", "Marlon Brando", "Edward Norton"],
    },
    MockMovie {
        title: "Heat",
        cast: &["Al Pacino", "Robert De Niro", "Val Kilmer"],
    },
    MockMovie {
        title: "The Godfather",
        cast: &["Marlon Brando", "Al Pacino", "James Caan"],
    },
    MockMovie {
        title: "Amélie",
        cast: &["Audrey Tautou", "Mathieu Kassovitz"],
    },
    MockMovie {
        title: "The Shawshank Redemption",
        cast: &["Tim Robbins", "Morgan Freeman"],
    },
    MockMovie {
        title: "Léon: The Professional",
        cast: &["Jean Reno", "Gary Oldman", "Natalie Portman"],
    },
    MockMovie {
        title: "A Beautiful Mind",
        cast: &["Russell Crowe", "Jennifer Connelly", "Ed Harris"],
    },
    MockMovie {
        title: "Fight Club",
        cast: &["Brad Pitt", "Edward Norton", "Helena Bonham Carter"],
    },
    MockMovie {
        title: "The Silence of the Lambs",
        cast: &["Jodie Foster", "Anthony Hopkins"],
    },
    MockMovie {
        title: "Goodfellas",
        cast: &["Robert De Niro", "Ray Liotta", "Joe Pesci"],
    },
    MockMovie {
        title: "An American in Paris",
        cast: &["Gene Kelly", "Leslie Caron"],
    },
    MockMovie {
        title: "La Dolce Vita",
        cast: &["Marcello Mastroianni", "Anita Ekberg"],
    },
    MockMovie {
        title: "The Usual Suspects",
        cast: &["Kevin Spacey", "Gabriel Byrne", "Benicio del Toro"],
    },
    MockMovie {
        title: "No Country for Old Men",
        cast: &["Tommy Lee Jones", "Javier Bardem", "Josh Brolin"],
    },
    MockMovie {
        title: "The Departed",
        cast: &["Leonardo DiCaprio", "Matt Damon", "Jack Nicholson"],
    },
];

/// Small xorshift64 generator for sample picking.
///
/// Sample choice is display sugar, not simulation state, so the seed comes
/// from the clock rather than from anything persisted.
#[derive(Debug, Clone)]
pub(crate) struct SampleRng {
    state: u64,
}

impl SampleRng {
    pub fn new(seed: u64) -> Self {
        // xorshift requires a non-zero state
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    pub fn from_entropy() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9e37_79b9_7f4a_7c15);
        Self::new(seed)
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Pick an index in `0..len`.
    pub fn pick_index(&mut self, len: usize) -> usize {
        (self.next_u64() as usize) % len.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_not_empty() {
        assert!(!CATALOG.is_empty());
        for entry in CATALOG {
            assert!(!entry.title.is_empty());
        }
    }

    #[test]
    fn test_pick_index_stays_in_bounds() {
        let mut rng = SampleRng::new(42);
        for _ in 0..100 {
            assert!(rng.pick_index(CATALOG.len()) < CATALOG.len());
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SampleRng::new(7);
        let mut b = SampleRng::new(7);
        for _ in 0..10 {
            assert_eq!(a.pick_index(100), b.pick_index(100));
        }
    }
}

//! # Objective
//!
//! Whether a problem prefers higher or lower fitness. The objective decides both the
//! order of a sorted population and whether a hill-climb trial replaces its original.

use std::cmp::Ordering;
use std::fmt;

/// The optimisation direction of a problem.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Objective {
    /// Higher fitness is better.
    #[default]
    Maximize,
    /// Lower fitness is better.
    Minimize,
}

impl Objective {
    /// Orders two fitness values so that the better one comes first.
    ///
    /// The base order is ascending, which `Minimize` uses directly and `Maximize`
    /// reverses. Missing or NaN fitness always sorts after every real value.
    ///
    /// ```rust
    /// use evosolve::objective::Objective;
    /// use std::cmp::Ordering;
    ///
    /// assert_eq!(Objective::Maximize.compare(Some(3.0), Some(1.0)), Ordering::Less);
    /// assert_eq!(Objective::Minimize.compare(Some(3.0), Some(1.0)), Ordering::Greater);
    /// assert_eq!(Objective::Minimize.compare(None, Some(1.0)), Ordering::Greater);
    /// ```
    pub fn compare(self, a: Option<f64>, b: Option<f64>) -> Ordering {
        let a = a.filter(|value| !value.is_nan());
        let b = b.filter(|value| !value.is_nan());

        match (a, b) {
            (Some(a), Some(b)) => {
                let ascending = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
                match self {
                    Objective::Minimize => ascending,
                    Objective::Maximize => ascending.reverse(),
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    /// Whether `challenger` may replace `incumbent` after a hill-climb trial.
    ///
    /// Ties admit the challenger: `Maximize` accepts `challenger >= incumbent`,
    /// `Minimize` accepts `challenger <= incumbent`. An unevaluated incumbent admits
    /// any real challenger and an unevaluated or NaN challenger is never admitted.
    pub fn admits(self, challenger: Option<f64>, incumbent: Option<f64>) -> bool {
        let Some(challenger) = challenger.filter(|value| !value.is_nan()) else {
            return false;
        };
        let Some(incumbent) = incumbent.filter(|value| !value.is_nan()) else {
            return true;
        };

        match self {
            Objective::Maximize => challenger >= incumbent,
            Objective::Minimize => challenger <= incumbent,
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Objective::Maximize => write!(f, "Maximisation"),
            Objective::Minimize => write!(f, "Minimisation"),
        }
    }
}

/// Errors that can occur when creating validated numeric types.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ProbabilityError {
    /// The value was NaN or infinite
    #[error("probability must be a finite number")]
    NotFinite,
    /// The value fell outside the closed unit interval
    #[error("probability must be within [0, 1], got {0}")]
    OutOfRange(f64),
}

/// A floating point value that is guaranteed to lie within `[0, 1]`.
///
/// Class probabilities produced by the classifier and probabilities supplied by API callers are
/// wrapped in this type so that scoring code never has to re-check for NaN or negative values.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Probability(f64);

impl Probability {
    /// Creates a new `Probability` from the given value.
    ///
    /// # Arguments
    ///
    /// * `value` - The raw probability.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Probability)` if the value is finite and within `[0, 1]`,
    /// or a `ProbabilityError` describing why it was rejected.
    pub fn new(value: f64) -> Result<Self, ProbabilityError> {
        if !value.is_finite() {
            return Err(ProbabilityError::NotFinite);
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(ProbabilityError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Returns the inner value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Probability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Probability> for f64 {
    fn from(p: Probability) -> Self {
        p.0
    }
}

impl TryFrom<f64> for Probability {
    type Error = ProbabilityError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Probability::new(value)
    }
}

impl serde::Serialize for Probability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Probability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Probability::new(value).map_err(serde::de::Error::custom)
    }
}

use crate::error::ExtractionError;
use crate::fields;

/// Section holding the twelve stat values.
pub const STATS_SECTION: &str = "Max Character Status Values";

/// Stat names in positional order.
pub const STAT_NAMES: [&str; 12] = [
    "Health",
    "Stamina",
    "Torpidity",
    "Oxygen",
    "food",
    "Water",
    "Temperature",
    "Weight",
    "Melee Damage",
    "Movement Speed",
    "Fortitude",
    "Crafting Skill",
];

/// The twelve maximum stat values of a creature, in [`STAT_NAMES`] order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stats {
    values: [f64; 12],
}

impl Stats {
    pub fn new(values: [f64; 12]) -> Self {
        Self { values }
    }

    /// Read values positionally. Missing trailing stats are zero; more than
    /// twelve is an error.
    pub fn from_values<'a, I>(values: I) -> Result<Self, ExtractionError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let raw: Vec<&str> = values.into_iter().collect();
        if raw.len() > STAT_NAMES.len() {
            return Err(ExtractionError::cardinality(
                STATS_SECTION,
                format!("at most {}", STAT_NAMES.len()),
                raw.len(),
            ));
        }
        let mut stats = Self::default();
        for (i, value) in raw.into_iter().enumerate() {
            stats.values[i] = fields::float(STAT_NAMES[i], value)?;
        }
        Ok(stats)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        STAT_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.values[i])
    }

    pub fn values(&self) -> &[f64; 12] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        STAT_NAMES.iter().copied().zip(self.values.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionErrorKind;

    #[test]
    fn test_pads_missing_stats_with_zero() {
        let stats = Stats::from_values(["100", "200.5"]).unwrap();
        assert_eq!(stats.get("Health"), Some(100.0));
        assert_eq!(stats.get("Stamina"), Some(200.5));
        assert_eq!(stats.get("Crafting Skill"), Some(0.0));
        assert_eq!(stats.iter().count(), 12);
    }

    #[test]
    fn test_rejects_thirteen_stats() {
        let err = Stats::from_values(["1"; 13]).unwrap_err();
        assert!(matches!(
            err.kind,
            ExtractionErrorKind::Cardinality { actual: 13, .. }
        ));
    }

    #[test]
    fn test_non_numeric_stat_names_the_stat() {
        let err = Stats::from_values(["1", "1", "lots"]).unwrap_err();
        assert_eq!(err.field_name(), Some("Torpidity"));
    }

    #[test]
    fn test_unknown_stat_name() {
        assert_eq!(Stats::default().get("Luck"), None);
    }
}

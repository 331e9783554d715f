use std::time::Duration;
use typed_builder::TypedBuilder;

/// Lower bound on generation attempts: the first try plus one retry.
pub const MIN_GENERATION_ATTEMPTS: u32 = 2;

/// Tuning knobs for [`RegistryService`][crate::RegistryService].
#[derive(Debug, Clone, TypedBuilder)]
pub struct RegistrySettings {
    /// Total attempts at allocating a generated slug before giving up.
    /// Values below [`MIN_GENERATION_ATTEMPTS`] are raised to it.
    #[builder(default = 3)]
    max_generation_attempts: u32,
    /// Deadline applied to every individual store call.
    #[builder(default = Duration::from_secs(5))]
    store_timeout: Duration,
}

impl RegistrySettings {
    pub fn max_generation_attempts(&self) -> u32 {
        self.max_generation_attempts.max(MIN_GENERATION_ATTEMPTS)
    }

    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = RegistrySettings::default();
        assert_eq!(settings.max_generation_attempts(), 3);
        assert_eq!(settings.store_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn attempts_never_drop_below_one_retry() {
        let settings = RegistrySettings::builder().max_generation_attempts(1).build();
        assert_eq!(settings.max_generation_attempts(), 2);

        let settings = RegistrySettings::builder().max_generation_attempts(0).build();
        assert_eq!(settings.max_generation_attempts(), 2);
    }
}

use crate::distribution::DistributionConfig;
use crate::persistence::{ConfigSlot, KeyValueStore, PersistenceResult};
use crate::validation::ValidationError;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    /// Floor count and total people.
    Totals,
    /// People per floor.
    Groups,
}

impl WizardStep {
    pub fn number(self) -> u8 {
        match self {
            WizardStep::Totals => 1,
            WizardStep::Groups => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardOutcome {
    InProgress(ConfigWizard),
    Finished(DistributionConfig),
}

/// Two-step setup of a [`DistributionConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigWizard {
    step: WizardStep,
    draft: DistributionConfig,
}

impl Default for ConfigWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Totals,
            draft: DistributionConfig::default(),
        }
    }

    /// Starts over from a saved configuration with its values filled in.
    pub fn resume(saved: DistributionConfig) -> Self {
        Self {
            step: WizardStep::Totals,
            draft: saved,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &DistributionConfig {
        &self.draft
    }

    pub fn progress_percent(&self) -> u8 {
        match self.step {
            WizardStep::Totals => 50,
            WizardStep::Groups => 100,
        }
    }

    pub fn with_group_count(self, count: i64) -> Result<Self, ValidationError> {
        let draft = self.draft.with_group_count(count)?;
        Ok(Self { draft, ..self })
    }

    pub fn with_total_people(self, total: i64) -> Result<Self, ValidationError> {
        let draft = self.draft.with_total_people(total)?;
        Ok(Self { draft, ..self })
    }

    pub fn with_group_people(self, id: u32, people: i64) -> Result<Self, ValidationError> {
        let draft = self.draft.with_group_people(id, people)?;
        Ok(Self { draft, ..self })
    }

    pub fn auto_distributed(self) -> Self {
        Self {
            draft: self.draft.auto_distributed(),
            ..self
        }
    }

    /// Moves to the floor step, or finishes once every person is assigned.
    pub fn next(self, now: DateTime<Utc>) -> Result<WizardOutcome, ValidationError> {
        match self.step {
            WizardStep::Totals => Ok(WizardOutcome::InProgress(Self {
                step: WizardStep::Groups,
                ..self
            })),
            WizardStep::Groups => self.completed(now).map(WizardOutcome::Finished),
        }
    }

    pub fn back(self) -> Self {
        Self {
            step: WizardStep::Totals,
            ..self
        }
    }

    /// Final "save" action: checks the balance, stamps the configuration and
    /// overwrites the slot with it. Fails without writing when people are
    /// still unassigned.
    pub fn finish<S: KeyValueStore>(
        self,
        slot: &ConfigSlot<S>,
        now: DateTime<Utc>,
    ) -> PersistenceResult<DistributionConfig> {
        let config = self.completed(now)?;
        slot.save(&config)?;
        Ok(config)
    }

    fn completed(self, now: DateTime<Utc>) -> Result<DistributionConfig, ValidationError> {
        let deviation = self.draft.current_deviation();
        if deviation != 0 {
            return Err(ValidationError::Unbalanced { deviation });
        }
        Ok(self.draft.stamped(now))
    }
}

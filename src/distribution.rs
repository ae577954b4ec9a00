use crate::group::Group;
use crate::validation::{
    ValidationError, validate_group_count, validate_people_count, validate_total_people,
};
use chrono::{DateTime, Utc};

/// How many people live on each floor, plus the head count they should add up to.
///
/// The value is immutable: every setter consumes it and hands back a new one,
/// so a rejected input leaves the previous configuration untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionConfig {
    total_people: u32,
    groups: Vec<Group>,
    created_at: Option<DateTime<Utc>>,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            total_people: 1,
            groups: vec![Group::new(1, 0)],
            created_at: None,
        }
    }
}

impl DistributionConfig {
    /// Creates `group_count` empty groups targeting `total_people`.
    pub fn new(group_count: i64, total_people: i64) -> Result<Self, ValidationError> {
        let count = validate_group_count(group_count)?;
        let total_people = validate_total_people(total_people)?;
        Ok(Self {
            total_people,
            groups: (1..=count).map(|id| Group::new(id, 0)).collect(),
            created_at: None,
        })
    }

    /// Builds a configuration from per-group counts in creation order.
    pub fn from_counts(total_people: i64, counts: &[i64]) -> Result<Self, ValidationError> {
        let mut config = Self::new(counts.len() as i64, total_people)?;
        for (idx, count) in counts.iter().enumerate() {
            config = config.with_group_people(idx as u32 + 1, *count)?;
        }
        Ok(config)
    }

    pub(crate) fn from_parts(
        total_people: u32,
        groups: Vec<Group>,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            total_people,
            groups,
            created_at,
        }
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn total_people(&self) -> u32 {
        self.total_people
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, id: u32) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Resizes to `count` groups. Groups that stay in range keep their people;
    /// new groups start empty.
    pub fn with_group_count(mut self, count: i64) -> Result<Self, ValidationError> {
        let count = validate_group_count(count)?;
        self.groups.truncate(count as usize);
        let existing = self.groups.len() as u32;
        self.groups
            .extend((existing + 1..=count).map(|id| Group::new(id, 0)));
        Ok(self)
    }

    pub fn with_total_people(mut self, total_people: i64) -> Result<Self, ValidationError> {
        self.total_people = validate_total_people(total_people)?;
        Ok(self)
    }

    pub fn with_group_people(mut self, id: u32, people: i64) -> Result<Self, ValidationError> {
        let people = validate_people_count(id, people)?;
        let group = self
            .groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(ValidationError::UnknownGroup { group: id })?;
        group.people_count = people;
        Ok(self)
    }

    /// Demo-widget stepping: adds `delta` people to a group without going
    /// below one person.
    pub fn step_group_people(mut self, id: u32, delta: i64) -> Result<Self, ValidationError> {
        let group = self
            .groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(ValidationError::UnknownGroup { group: id })?;
        let stepped = (i64::from(group.people_count) + delta).max(1);
        group.people_count = validate_people_count(id, stepped)?;
        Ok(self)
    }

    /// Replaces every group's count with an even spread of `total_people`.
    pub fn auto_distributed(mut self) -> Self {
        let counts = auto_distribute(self.total_people, self.groups.len() as u32);
        for (group, people) in self.groups.iter_mut().zip(counts) {
            group.people_count = people;
        }
        self
    }

    /// Widened so that no combination of per-floor counts can overflow.
    pub fn assigned_people(&self) -> u64 {
        self.groups.iter().map(|g| u64::from(g.people_count)).sum()
    }

    /// `total_people - assigned`; positive means people are still unassigned,
    /// negative means the floors hold more people than the target.
    pub fn current_deviation(&self) -> i64 {
        let assigned: i64 = self.groups.iter().map(|g| i64::from(g.people_count)).sum();
        i64::from(self.total_people) - assigned
    }

    pub fn is_balanced(&self) -> bool {
        self.current_deviation() == 0
    }

    pub fn stamped(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }
}

/// Spreads `total_people` over `group_count` groups: everyone gets
/// `total / count` and the first `total % count` groups get one more.
pub fn auto_distribute(total_people: u32, group_count: u32) -> Vec<u32> {
    if group_count == 0 {
        return Vec::new();
    }
    let base = total_people / group_count;
    let remainder = total_people % group_count;
    (0..group_count)
        .map(|idx| if idx < remainder { base + 1 } else { base })
        .collect()
}

use crate::group::Group;
use crate::rounding::{CURRENCY_STEP, RoundingRule};
use crate::validation::{self, ValidationError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    /// Every person pays the same; a floor pays for its head count.
    #[default]
    PerPerson,
    /// Every floor pays the same regardless of head count.
    Equal,
}

impl CalculationMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            CalculationMethod::PerPerson => "per_person",
            CalculationMethod::Equal => "equal",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CalculationMethod::PerPerson => "Per Person",
            CalculationMethod::Equal => "Equal per Floor",
        }
    }

    pub fn variants() -> [CalculationMethod; 2] {
        [CalculationMethod::PerPerson, CalculationMethod::Equal]
    }
}

impl FromStr for CalculationMethod {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "per_person" | "perperson" | "per-person" | "person" => Ok(CalculationMethod::PerPerson),
            "equal" => Ok(CalculationMethod::Equal),
            _ => Err(ValidationError::UnknownMethod {
                input: input.to_string(),
            }),
        }
    }
}

/// One floor's share of the bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitResult {
    pub group_id: u32,
    pub label: String,
    pub people_count: u32,
    pub raw_amount: f64,
    pub rounded_amount: f64,
    pub percentage_of_total: f64,
    /// Zero for an empty floor.
    pub amount_per_person: f64,
}

impl SplitResult {
    /// What rounding added on top of the exact share.
    pub fn difference(&self) -> f64 {
        self.rounded_amount - self.raw_amount
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayOrder {
    #[default]
    Creation,
    Reversed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitSummary {
    pub total_amount: f64,
    pub total_rounded: f64,
    pub total_people: u64,
    pub average_per_person: f64,
    pub rounding_difference: f64,
}

impl SplitSummary {
    pub fn to_cli_summary(&self) -> String {
        format!(
            "total={:.2}, rounded={:.2}, people={}, avg/person={:.2}, rounding+={:.2}",
            self.total_amount,
            self.total_rounded,
            self.total_people,
            self.average_per_person,
            self.rounding_difference
        )
    }
}

/// Results for one amount and method, with the reconciliation figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitReport {
    pub method: CalculationMethod,
    pub results: Vec<SplitResult>,
    pub summary: SplitSummary,
}

impl SplitReport {
    /// `None` when the inputs produce no results.
    pub fn build(total_amount: f64, groups: &[Group], method: CalculationMethod) -> Option<Self> {
        let results = compute_split(total_amount, groups, method);
        let summary = summarize(total_amount, &results)?;
        Some(Self {
            method,
            results,
            summary,
        })
    }

    pub fn ordered(&self, order: DisplayOrder) -> Vec<&SplitResult> {
        match order {
            DisplayOrder::Creation => self.results.iter().collect(),
            DisplayOrder::Reversed => self.results.iter().rev().collect(),
        }
    }
}

/// Splits `total_amount` across `groups` in their given order.
///
/// Returns no results when the amount is not a positive finite number, when
/// there are no groups, or when nobody is assigned to any group.
pub fn compute_split(
    total_amount: f64,
    groups: &[Group],
    method: CalculationMethod,
) -> Vec<SplitResult> {
    if !total_amount.is_finite() || total_amount <= 0.0 || groups.is_empty() {
        return Vec::new();
    }
    let total_people: u64 = groups.iter().map(|g| u64::from(g.people_count)).sum();
    if total_people == 0 {
        return Vec::new();
    }

    let rule = RoundingRule::Ceiling;
    let results: Vec<SplitResult> = match method {
        CalculationMethod::PerPerson => {
            let amount_per_person = total_amount / total_people as f64;
            groups
                .iter()
                .map(|group| {
                    let raw_amount = amount_per_person * f64::from(group.people_count);
                    SplitResult {
                        group_id: group.id,
                        label: group.label.clone(),
                        people_count: group.people_count,
                        raw_amount,
                        rounded_amount: rule.apply(raw_amount, CURRENCY_STEP),
                        percentage_of_total: 100.0 * f64::from(group.people_count)
                            / total_people as f64,
                        amount_per_person: per_person(raw_amount, group.people_count),
                    }
                })
                .collect()
        }
        CalculationMethod::Equal => {
            let group_count = groups.len() as f64;
            let raw_per_group = total_amount / group_count;
            // one rounded figure shared by every floor
            let rounded_per_group = rule.apply(raw_per_group, CURRENCY_STEP);
            groups
                .iter()
                .map(|group| SplitResult {
                    group_id: group.id,
                    label: group.label.clone(),
                    people_count: group.people_count,
                    raw_amount: raw_per_group,
                    rounded_amount: rounded_per_group,
                    percentage_of_total: 100.0 / group_count,
                    amount_per_person: per_person(raw_per_group, group.people_count),
                })
                .collect()
        }
    };

    debug!(
        method = method.as_str(),
        rounding = rule.as_str(),
        total_amount,
        total_people,
        groups = results.len(),
        "computed split"
    );
    results
}

/// Parses the amount as typed and splits it. Unparseable or incomplete input
/// yields no results rather than an error.
pub fn compute_split_from_input(
    amount_input: &str,
    groups: &[Group],
    method: CalculationMethod,
) -> Vec<SplitResult> {
    match validation::parse_amount_input(amount_input) {
        Ok(Some(amount)) => compute_split(amount, groups, method),
        Ok(None) | Err(_) => Vec::new(),
    }
}

pub fn summarize(total_amount: f64, results: &[SplitResult]) -> Option<SplitSummary> {
    if results.is_empty() {
        return None;
    }
    let total_rounded: f64 = results.iter().map(|r| r.rounded_amount).sum();
    let total_people: u64 = results.iter().map(|r| u64::from(r.people_count)).sum();
    let average_per_person = if total_people > 0 {
        total_amount / total_people as f64
    } else {
        0.0
    };
    let rounding_difference: f64 = results.iter().map(SplitResult::difference).sum();
    Some(SplitSummary {
        total_amount,
        total_rounded,
        total_people,
        average_per_person,
        rounding_difference,
    })
}

fn per_person(amount: f64, people: u32) -> f64 {
    if people > 0 {
        amount / f64::from(people)
    } else {
        0.0
    }
}

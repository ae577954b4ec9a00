use crate::distribution::DistributionConfig;
use crate::split::{CalculationMethod, SplitReport};
use crate::validation::{ValidationError, parse_amount_input};

/// Inputs of one calculation screen: the saved distribution, the amount as
/// typed and the chosen method. Results are recomputed from these on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationSession {
    config: DistributionConfig,
    amount_input: String,
    method: CalculationMethod,
}

impl CalculationSession {
    pub fn new(config: DistributionConfig) -> Self {
        Self {
            config,
            amount_input: String::new(),
            method: CalculationMethod::default(),
        }
    }

    pub fn config(&self) -> &DistributionConfig {
        &self.config
    }

    pub fn amount_input(&self) -> &str {
        &self.amount_input
    }

    pub fn method(&self) -> CalculationMethod {
        self.method
    }

    /// Accepts the typed amount, or rejects it and keeps the previous one.
    pub fn with_amount(mut self, input: &str) -> Result<Self, ValidationError> {
        parse_amount_input(input)?;
        self.amount_input = input.trim().to_string();
        Ok(self)
    }

    pub fn with_method(mut self, method: CalculationMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_config(mut self, config: DistributionConfig) -> Self {
        self.config = config;
        self
    }

    /// Clears the amount for a new calculation.
    pub fn reset(mut self) -> Self {
        self.amount_input.clear();
        self
    }

    pub fn amount(&self) -> Option<f64> {
        parse_amount_input(&self.amount_input).ok().flatten()
    }

    pub fn report(&self) -> Option<SplitReport> {
        let amount = self.amount()?;
        SplitReport::build(amount, self.config.groups(), self.method)
    }
}

use thiserror::Error;

pub const MIN_GROUPS: i64 = 1;
pub const MAX_GROUPS: i64 = 10;

/// Largest bill the calculator accepts, in soles.
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

/// Rejected user input. Each variant maps to one input field so callers can
/// show the message next to it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("group count must be between 1 and 10 (got {value})")]
    GroupCountOutOfRange { value: i64 },
    #[error("total people must be at least 1 (got {value})")]
    NonPositiveTotalPeople { value: i64 },
    #[error("people count for floor {group} cannot be negative (got {value})")]
    NegativePeopleCount { group: u32, value: i64 },
    #[error("floor {group} does not exist")]
    UnknownGroup { group: u32 },
    #[error("'{input}' is not a whole number for {field}")]
    NotAnInteger { field: String, input: String },
    #[error("'{input}' is not a valid amount (digits with at most 2 decimals)")]
    InvalidAmount { input: String },
    #[error("'{input}' is above the largest accepted amount of 1,000,000,000,000")]
    AmountTooLarge { input: String },
    #[error("distribution is unbalanced: {deviation} people left to assign")]
    Unbalanced { deviation: i64 },
    #[error("unknown calculation method '{input}' (expected per_person or equal)")]
    UnknownMethod { input: String },
}

impl ValidationError {
    /// Name of the input field the error belongs to, using the persisted
    /// record's field names.
    pub fn field(&self) -> String {
        match self {
            ValidationError::GroupCountOutOfRange { .. } => "floors".to_string(),
            ValidationError::NonPositiveTotalPeople { .. } => "totalPeople".to_string(),
            ValidationError::NegativePeopleCount { group, .. }
            | ValidationError::UnknownGroup { group } => format!("floor{group}"),
            ValidationError::NotAnInteger { field, .. } => field.clone(),
            ValidationError::InvalidAmount { .. } | ValidationError::AmountTooLarge { .. } => {
                "totalAmount".to_string()
            }
            ValidationError::Unbalanced { .. } => "floorPeople".to_string(),
            ValidationError::UnknownMethod { .. } => "method".to_string(),
        }
    }
}

pub fn validate_group_count(value: i64) -> Result<u32, ValidationError> {
    if !(MIN_GROUPS..=MAX_GROUPS).contains(&value) {
        return Err(ValidationError::GroupCountOutOfRange { value });
    }
    Ok(value as u32)
}

pub fn validate_total_people(value: i64) -> Result<u32, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NonPositiveTotalPeople { value });
    }
    u32::try_from(value).map_err(|_| ValidationError::NotAnInteger {
        field: "totalPeople".to_string(),
        input: value.to_string(),
    })
}

pub fn validate_people_count(group: u32, value: i64) -> Result<u32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::NegativePeopleCount { group, value });
    }
    u32::try_from(value).map_err(|_| ValidationError::NotAnInteger {
        field: format!("floor{group}"),
        input: value.to_string(),
    })
}

pub fn parse_integer(field: &str, input: &str) -> Result<i64, ValidationError> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::NotAnInteger {
            field: field.to_string(),
            input: input.to_string(),
        })
}

/// Checks an amount as typed: optional digits, an optional point and at most
/// two decimals. `Ok(None)` means the text is acceptable but not a number yet
/// (empty or a lone `.`).
pub fn parse_amount_input(input: &str) -> Result<Option<f64>, ValidationError> {
    let trimmed = input.trim();
    if !is_amount_shape(trimmed) {
        return Err(ValidationError::InvalidAmount {
            input: input.to_string(),
        });
    }
    if trimmed.is_empty() || trimmed == "." {
        return Ok(None);
    }
    let amount = trimmed
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidAmount {
            input: input.to_string(),
        })?;
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge {
            input: input.to_string(),
        });
    }
    Ok(Some(amount))
}

fn is_amount_shape(input: &str) -> bool {
    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (input, None),
    };
    if !whole.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match fraction {
        Some(fraction) => fraction.len() <= 2 && fraction.bytes().all(|b| b.is_ascii_digit()),
        None => true,
    }
}

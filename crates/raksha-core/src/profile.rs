//! User profile record and input validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Youngest accepted age.
pub const MIN_AGE: u8 = 1;

/// Oldest accepted age.
pub const MAX_AGE: u8 = 120;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty value where one is required.
    Empty(String),
    /// Numeric value outside its allowed range.
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },
    /// Value not in a closed set of choices.
    Unknown { field: String, value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::OutOfRange {
                field,
                min,
                max,
                actual,
            } => write!(f, "{} must be between {} and {} (got {})", field, min, max, actual),
            ValidationError::Unknown { field, value } => {
                write!(f, "unknown {}: {}", field, value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::Unknown {
                field: "gender".to_string(),
                value: s.to_string(),
            })
    }
}

/// The eight ABO/Rh blood groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        BloodType::ALL
            .into_iter()
            .find(|b| b.as_str() == wanted)
            .ok_or_else(|| ValidationError::Unknown {
                field: "blood type".to_string(),
                value: s.to_string(),
            })
    }
}

/// Personal details shown in settings and embedded in medical context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    pub blood_type: BloodType,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "User".to_string(),
            age: 25,
            gender: Gender::Male,
            blood_type: BloodType::AbPositive,
        }
    }
}

impl UserProfile {
    /// Check the name is present and the age is in range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty("name".to_string()));
        }
        validate_age(i64::from(self.age))?;
        Ok(())
    }
}

/// Validate an age against the accepted range.
pub fn validate_age(age: i64) -> Result<u8, ValidationError> {
    if age < i64::from(MIN_AGE) || age > i64::from(MAX_AGE) {
        return Err(ValidationError::OutOfRange {
            field: "age".to_string(),
            min: i64::from(MIN_AGE),
            max: i64::from(MAX_AGE),
            actual: age,
        });
    }
    Ok(age as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = UserProfile::default();
        assert_eq!(profile.name, "User");
        assert_eq!(profile.age, 25);
        assert_eq!(profile.gender, Gender::Male);
        assert_eq!(profile.blood_type, BloodType::AbPositive);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_age_bounds() {
        assert!(validate_age(0).is_err());
        assert_eq!(validate_age(1).unwrap(), 1);
        assert_eq!(validate_age(120).unwrap(), 120);
        assert!(validate_age(121).is_err());
    }

    #[test]
    fn test_blank_name_rejected() {
        let profile = UserProfile {
            name: " ".to_string(),
            ..UserProfile::default()
        };
        assert_eq!(
            profile.validate(),
            Err(ValidationError::Empty("name".to_string()))
        );
    }

    #[test]
    fn test_parse_blood_type() {
        assert_eq!("ab-".parse::<BloodType>().unwrap(), BloodType::AbNegative);
        assert_eq!("O+".parse::<BloodType>().unwrap(), BloodType::OPositive);
        assert!("C+".parse::<BloodType>().is_err());
    }

    #[test]
    fn test_parse_gender() {
        assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
        assert!("robot".parse::<Gender>().is_err());
    }

    #[test]
    fn test_blood_type_serializes_canonically() {
        let json = serde_json::to_string(&BloodType::AbPositive).unwrap();
        assert_eq!(json, "\"AB+\"");
    }
}

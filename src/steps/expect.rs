//! Assertion helpers returning `StepError::Assertion` instead of panicking.

use std::fmt::Debug;

use crate::error::StepError;

pub fn contains(actual: &str, expected: &str, what: &str) -> Result<(), StepError> {
    if actual.contains(expected) {
        Ok(())
    } else {
        Err(StepError::assertion(format!(
            "{} should contain \"{}\" but was \"{}\"",
            what, expected, actual
        )))
    }
}

pub fn equals<T: PartialEq + Debug>(actual: T, expected: T, what: &str) -> Result<(), StepError> {
    if actual == expected {
        Ok(())
    } else {
        Err(StepError::assertion(format!(
            "{} should be {:?} but was {:?}",
            what, expected, actual
        )))
    }
}

pub fn not_equals<T: PartialEq + Debug>(actual: T, unexpected: T, what: &str) -> Result<(), StepError> {
    if actual != unexpected {
        Ok(())
    } else {
        Err(StepError::assertion(format!(
            "{} should differ from {:?}",
            what, unexpected
        )))
    }
}

pub fn greater_than<T: PartialOrd + Debug>(actual: T, bound: T, what: &str) -> Result<(), StepError> {
    if actual > bound {
        Ok(())
    } else {
        Err(StepError::assertion(format!(
            "{} should be greater than {:?} but was {:?}",
            what, bound, actual
        )))
    }
}

pub fn is_true(condition: bool, message: &str) -> Result<(), StepError> {
    if condition {
        Ok(())
    } else {
        Err(StepError::assertion(message))
    }
}

//! Validation of submitted forms and uploads.
//!
//! Checks are composed into a [`Pipeline`], which evaluates them in order and stops at the first
//! failing one.

pub mod field;
pub mod password;
pub mod upload;

use std::borrow::Cow;

/// The first failed check of a validation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct Rejected {
    pub field: Cow<'static, str>,
    pub message: Cow<'static, str>,
}

impl Rejected {
    pub fn new(field: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

type Check<'a, T> = Box<dyn Fn(&T) -> Result<(), Cow<'static, str>> + 'a>;

/// An ordered list of checks, each bound to the form field it reports on.
pub struct Pipeline<'a, T: ?Sized> {
    checks: Vec<(Cow<'static, str>, Check<'a, T>)>,
}

impl<T: ?Sized> Default for Pipeline<'_, T> {
    fn default() -> Self {
        Self { checks: Vec::new() }
    }
}

impl<'a, T: ?Sized> Pipeline<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a check failing with `message` when the predicate doesn't hold.
    pub fn check<P>(
        self,
        field: impl Into<Cow<'static, str>>,
        predicate: P,
        message: impl Into<Cow<'static, str>>,
    ) -> Self
    where
        P: Fn(&T) -> bool + 'a,
    {
        let message = message.into();
        self.rule(field, move |value| {
            if predicate(value) {
                Ok(())
            } else {
                Err(message.clone())
            }
        })
    }

    /// Add a check which decides on its own message.
    pub fn rule<R>(mut self, field: impl Into<Cow<'static, str>>, rule: R) -> Self
    where
        R: Fn(&T) -> Result<(), Cow<'static, str>> + 'a,
    {
        self.checks.push((field.into(), Box::new(rule)));
        self
    }

    pub fn validate(&self, value: &T) -> Result<(), Rejected> {
        for (field, check) in &self.checks {
            if let Err(message) = check(value) {
                log::debug!("rejected field '{field}': {message}");
                return Err(Rejected {
                    field: field.clone(),
                    message,
                });
            }
        }
        Ok(())
    }
}

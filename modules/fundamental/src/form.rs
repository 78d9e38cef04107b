use crate::validation::Rejected;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// The field name used for errors not bound to a single field.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Error messages of a submitted form, by field name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

impl From<Rejected> for FormErrors {
    fn from(value: Rejected) -> Self {
        let mut errors = Self::default();
        errors.add(value.field, value.message);
        errors
    }
}

/// The state of a form page.
///
/// `successful_submit` is `None` when the form was only requested, and carries the outcome of
/// the validation after a submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FormState<T> {
    pub successful_submit: Option<bool>,
    pub errors: FormErrors,
    #[serde(flatten)]
    pub data: T,
}

impl<T> FormState<T> {
    /// A form which was not submitted yet.
    pub fn unbound(data: T) -> Self {
        Self {
            successful_submit: None,
            errors: Default::default(),
            data,
        }
    }

    pub fn accepted(data: T) -> Self {
        Self {
            successful_submit: Some(true),
            errors: Default::default(),
            data,
        }
    }

    pub fn rejected(errors: impl Into<FormErrors>, data: T) -> Self {
        Self {
            successful_submit: Some(false),
            errors: errors.into(),
            data,
        }
    }

    /// Turn the outcome of a validation into the state of the submitted form.
    pub fn submitted(outcome: Result<T, Rejected>, rejected: impl FnOnce() -> T) -> Self {
        match outcome {
            Ok(data) => Self::accepted(data),
            Err(err) => Self::rejected(err, rejected()),
        }
    }
}

/// Form data for pages without additional context.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NoData {}

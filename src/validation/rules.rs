//! Validation rules for members, classes, and the actions carrying them.

use crate::core::{ActionKind, Dataset, FitnessClass, Member};
use crate::validation::builder::RulesBuilder;
use crate::validation::context::RuleContext;
use crate::validation::violations::{ValidationError, Violations};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Type alias for validation check functions
pub type ValidationCheck<T> =
    Box<dyn Fn(&RuleContext<'_, T>) -> Validation<(), NonEmptyVec<ValidationError>> + Send + Sync>;

/// An ordered set of checks over one payload type.
/// Uses Validation to accumulate ALL violations.
pub struct Rules<T> {
    pub(crate) checks: Vec<ValidationCheck<T>>,
}

impl<T> Rules<T> {
    /// Run every check, accumulating ALL violations.
    pub fn validate(
        &self,
        subject: &T,
        dataset: &Dataset,
    ) -> Validation<(), NonEmptyVec<ValidationError>> {
        let context = RuleContext::new(subject, dataset);
        let checks: Vec<Validation<(), NonEmptyVec<ValidationError>>> =
            self.checks.iter().map(|check| check(&context)).collect();

        Validation::all_vec(checks).map(|_| ())
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn looks_like_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

/// The form-layer rules for a member payload.
pub fn member_rules() -> Rules<Member> {
    RulesBuilder::<Member>::new()
        .require_that(
            |ctx| !blank(&ctx.subject.name),
            ValidationError::MissingField { field: "name" },
        )
        .require(|ctx| {
            if looks_like_email(&ctx.subject.email) {
                Validation::success(())
            } else {
                Validation::fail(ValidationError::InvalidEmail {
                    email: ctx.subject.email.clone(),
                })
            }
        })
        .require_that(
            |ctx| !blank(&ctx.subject.phone),
            ValidationError::MissingField { field: "phone" },
        )
        .build()
}

/// The form-layer rules for a class payload.
///
/// Enrolled members must exist in the dataset the class is checked against.
pub fn class_rules() -> Rules<FitnessClass> {
    RulesBuilder::<FitnessClass>::new()
        .require_that(
            |ctx| !blank(&ctx.subject.name),
            ValidationError::MissingField { field: "name" },
        )
        .require_that(
            |ctx| !blank(&ctx.subject.instructor),
            ValidationError::MissingField {
                field: "instructor",
            },
        )
        .require_that(
            |ctx| !blank(&ctx.subject.schedule),
            ValidationError::MissingField { field: "schedule" },
        )
        .require_that(
            |ctx| ctx.subject.capacity > 0,
            ValidationError::NonPositiveCapacity,
        )
        .require(|ctx| {
            let class = ctx.subject;
            if class.enrolled.len() as u64 <= u64::from(class.capacity) {
                Validation::success(())
            } else {
                Validation::fail(ValidationError::OverCapacity {
                    enrolled: class.enrolled.len(),
                    capacity: class.capacity,
                })
            }
        })
        .require(|ctx| {
            let checks: Vec<Validation<(), NonEmptyVec<ValidationError>>> = ctx
                .subject
                .enrolled
                .iter()
                .map(|id| match ctx.dataset.member(*id) {
                    Some(_) => Validation::success(()),
                    None => Validation::fail(ValidationError::UnknownMember(*id)),
                })
                .collect();
            Validation::all_vec(checks).map(|_| ())
        })
        .build()
}

/// Validate the payload of an action against the dataset it targets.
///
/// Actions without an entity payload always pass. `SET_DATASET` is checked
/// against its own contents, since it replaces the dataset wholesale.
pub fn validate_action(
    kind: &ActionKind,
    dataset: &Dataset,
) -> Validation<(), NonEmptyVec<ValidationError>> {
    let members = member_rules();
    let classes = class_rules();

    let checks: Vec<Validation<(), NonEmptyVec<ValidationError>>> = match kind {
        ActionKind::AddMember(member) | ActionKind::UpdateMember(member) => {
            vec![members.validate(member, dataset)]
        }
        ActionKind::AddClass(class) | ActionKind::UpdateClass(class) => {
            vec![classes.validate(class, dataset)]
        }
        ActionKind::BatchUpdateMembers(batch) => batch
            .iter()
            .map(|member| members.validate(member, dataset))
            .collect(),
        ActionKind::BatchUpdateClasses(batch) => batch
            .iter()
            .map(|class| classes.validate(class, dataset))
            .collect(),
        ActionKind::SetDataset(next) => next
            .members()
            .iter()
            .map(|member| members.validate(member, next))
            .chain(next.classes().iter().map(|class| classes.validate(class, next)))
            .collect(),
        _ => Vec::new(),
    };

    Validation::all_vec(checks).map(|_| ())
}

/// Collapse a validation outcome into a `Result`.
pub fn into_result(validation: Validation<(), NonEmptyVec<ValidationError>>) -> Result<(), Violations> {
    match validation {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => Err(Violations(errors.iter().cloned().collect())),
    }
}

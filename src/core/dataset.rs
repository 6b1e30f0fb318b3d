//! Normalized entity collections for members and classes.
//!
//! Collections are held behind `Arc<Vec<_>>` so that history snapshots share
//! structure with the live dataset. Mutations go through `Arc::make_mut`,
//! which copies only the collection being changed and only when a snapshot
//! still references it.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Identifier of a [`Member`].
pub type MemberId = i64;

/// Identifier of a [`FitnessClass`].
pub type ClassId = i64;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Allocate a fresh entity identifier.
///
/// Identifiers are millisecond timestamps, bumped past the previously issued
/// value when two allocations land in the same millisecond, so they are
/// unique and strictly increasing for the lifetime of the process.
///
/// # Example
///
/// ```rust
/// use fitstore::core::next_id;
///
/// let first = next_id();
/// let second = next_id();
/// assert!(second > first);
/// ```
pub fn next_id() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_ID.compare_exchange_weak(last, candidate, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return candidate,
            Err(actual) => last = actual,
        }
    }
}

/// Membership classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MembershipType {
    #[default]
    Basic,
    Premium,
    #[serde(rename = "VIP", alias = "Vip")]
    Vip,
}

impl MembershipType {
    pub fn name(&self) -> &str {
        match self {
            Self::Basic => "Basic",
            Self::Premium => "Premium",
            Self::Vip => "VIP",
        }
    }
}

/// A member of the fitness center.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub membership_type: MembershipType,
    pub start_date: NaiveDate,
}

impl Member {
    /// Create a member with a freshly allocated identifier.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        membership_type: MembershipType,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: next_id(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            membership_type,
            start_date,
        }
    }
}

/// A scheduled class with a bounded set of enrolled members.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitnessClass {
    pub id: ClassId,
    pub name: String,
    pub instructor: String,
    pub schedule: String,
    pub capacity: u32,
    #[serde(default)]
    pub enrolled: BTreeSet<MemberId>,
}

impl FitnessClass {
    /// Create an empty class with a freshly allocated identifier.
    pub fn new(
        name: impl Into<String>,
        instructor: impl Into<String>,
        schedule: impl Into<String>,
        capacity: u32,
    ) -> Self {
        Self {
            id: next_id(),
            name: name.into(),
            instructor: instructor.into(),
            schedule: schedule.into(),
            capacity,
            enrolled: BTreeSet::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.enrolled.len() as u64 >= u64::from(self.capacity)
    }

    /// Remaining seats, saturating at zero for over-filled payloads.
    pub fn available_spots(&self) -> u32 {
        let taken = u32::try_from(self.enrolled.len()).unwrap_or(u32::MAX);
        self.capacity.saturating_sub(taken)
    }
}

/// Errors returned by the enrollment helpers.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DatasetError {
    #[error("Class {0} not found")]
    ClassNotFound(ClassId),

    #[error("Member {0} not found")]
    MemberNotFound(MemberId),

    #[error("Class {class_id} is full (capacity {capacity})")]
    ClassFull { class_id: ClassId, capacity: u32 },

    #[error("Member {member_id} is already enrolled in class {class_id}")]
    AlreadyEnrolled {
        class_id: ClassId,
        member_id: MemberId,
    },

    #[error("Member {member_id} is not enrolled in class {class_id}")]
    NotEnrolled {
        class_id: ClassId,
        member_id: MemberId,
    },
}

/// The normalized collection of members and classes.
///
/// Missing collections deserialize as empty, which is how a partial payload
/// from a persistence provider is merged over the defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    members: Arc<Vec<Member>>,
    #[serde(default)]
    classes: Arc<Vec<FitnessClass>>,
}

impl Dataset {
    pub fn new(members: Vec<Member>, classes: Vec<FitnessClass>) -> Self {
        Self {
            members: Arc::new(members),
            classes: Arc::new(classes),
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn classes(&self) -> &[FitnessClass] {
        &self.classes
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn class(&self, id: ClassId) -> Option<&FitnessClass> {
        self.classes.iter().find(|c| c.id == id)
    }

    /// Classes the given member is enrolled in.
    pub fn classes_for_member(&self, id: MemberId) -> Vec<&FitnessClass> {
        self.classes
            .iter()
            .filter(|c| c.enrolled.contains(&id))
            .collect()
    }

    /// Whether two datasets hold the very same collection allocations.
    pub fn shares_storage_with(&self, other: &Dataset) -> bool {
        Arc::ptr_eq(&self.members, &other.members) && Arc::ptr_eq(&self.classes, &other.classes)
    }

    /// Build the class update that enrolls `member_id` in `class_id`.
    ///
    /// The dataset itself is untouched; dispatch the returned class as an
    /// `UPDATE_CLASS` action to apply it.
    pub fn enroll(&self, class_id: ClassId, member_id: MemberId) -> Result<FitnessClass, DatasetError> {
        let class = self
            .class(class_id)
            .ok_or(DatasetError::ClassNotFound(class_id))?;
        if self.member(member_id).is_none() {
            return Err(DatasetError::MemberNotFound(member_id));
        }
        if class.enrolled.contains(&member_id) {
            return Err(DatasetError::AlreadyEnrolled {
                class_id,
                member_id,
            });
        }
        if class.is_full() {
            return Err(DatasetError::ClassFull {
                class_id,
                capacity: class.capacity,
            });
        }

        let mut updated = class.clone();
        updated.enrolled.insert(member_id);
        Ok(updated)
    }

    /// Build the class update that removes `member_id` from `class_id`.
    pub fn unenroll(
        &self,
        class_id: ClassId,
        member_id: MemberId,
    ) -> Result<FitnessClass, DatasetError> {
        let class = self
            .class(class_id)
            .ok_or(DatasetError::ClassNotFound(class_id))?;
        if !class.enrolled.contains(&member_id) {
            return Err(DatasetError::NotEnrolled {
                class_id,
                member_id,
            });
        }

        let mut updated = class.clone();
        updated.enrolled.remove(&member_id);
        Ok(updated)
    }

    // Mutations below are used by the reducer only.

    pub(crate) fn upsert_member(&mut self, member: &Member) {
        let members = Arc::make_mut(&mut self.members);
        match members.iter_mut().find(|m| m.id == member.id) {
            Some(existing) => *existing = member.clone(),
            None => members.push(member.clone()),
        }
    }

    pub(crate) fn update_member(&mut self, member: &Member) {
        if self.member(member.id).is_none() {
            return;
        }
        self.upsert_member(member);
    }

    /// Remove a member and cascade the removal into every class roster.
    pub(crate) fn delete_member(&mut self, id: MemberId) {
        if self.member(id).is_some() {
            Arc::make_mut(&mut self.members).retain(|m| m.id != id);
        }
        if self.classes.iter().any(|c| c.enrolled.contains(&id)) {
            for class in Arc::make_mut(&mut self.classes).iter_mut() {
                class.enrolled.remove(&id);
            }
        }
    }

    pub(crate) fn upsert_class(&mut self, class: &FitnessClass) {
        let classes = Arc::make_mut(&mut self.classes);
        match classes.iter_mut().find(|c| c.id == class.id) {
            Some(existing) => *existing = class.clone(),
            None => classes.push(class.clone()),
        }
    }

    pub(crate) fn update_class(&mut self, class: &FitnessClass) {
        if self.class(class.id).is_none() {
            return;
        }
        self.upsert_class(class);
    }

    pub(crate) fn delete_class(&mut self, id: ClassId) {
        if self.class(id).is_some() {
            Arc::make_mut(&mut self.classes).retain(|c| c.id != id);
        }
    }

    pub(crate) fn replace_members(&mut self, members: &[Member]) {
        self.members = Arc::new(members.to_vec());
    }

    pub(crate) fn replace_classes(&mut self, classes: &[FitnessClass]) {
        self.classes = Arc::new(classes.to_vec());
    }
}

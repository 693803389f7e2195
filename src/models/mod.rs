//! Wire models for the JobTrack backend.
//!
//! Field names and shapes are the compatibility surface with the REST
//! service; the client holds read-through cache copies only and never owns
//! these records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a job application.
///
/// Any status may be set directly; the lifecycle order (wishlist -> applied
/// -> interview -> offer/rejected) is a display convention, not an enforced
/// transition graph. This mirrors the backend, which accepts arbitrary
/// status edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Wishlist,
    Applied,
    Interview,
    Offer,
    Rejected,
}

impl JobStatus {
    /// All statuses in display order.
    pub fn all() -> &'static [JobStatus] {
        &[
            JobStatus::Wishlist,
            JobStatus::Applied,
            JobStatus::Interview,
            JobStatus::Offer,
            JobStatus::Rejected,
        ]
    }

    /// Wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Wishlist => "wishlist",
            JobStatus::Applied => "applied",
            JobStatus::Interview => "interview",
            JobStatus::Offer => "offer",
            JobStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tag attached to a job application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub name: String,
}

/// A job application record as returned by `GET /jobs/` and `GET /jobs/{id}/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: u64,
    pub company_name: String,
    pub job_title: String,
    #[serde(default)]
    pub location: String,
    pub status: JobStatus,
    #[serde(default)]
    pub salary: Option<i64>,
    #[serde(default)]
    pub applied_date: Option<NaiveDate>,
    #[serde(default)]
    pub job_url: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Body for `POST /jobs/`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewJobApplication {
    pub company_name: String,
    pub job_title: String,
    pub location: String,
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
}

/// Partial update body for `PATCH /jobs/{id}/`.
///
/// Only set fields are serialized; unset fields are left untouched by the
/// server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl JobPatch {
    /// A patch that only moves the status.
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Check whether the patch carries no changes.
    pub fn is_empty(&self) -> bool {
        serde_json::to_value(self)
            .map(|v| v.as_object().map(|o| o.is_empty()).unwrap_or(true))
            .unwrap_or(true)
    }
}

/// The authenticated user's profile, from `GET /auth/users/me/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub created_at: String,
}

/// A per-status count in the dashboard aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

/// A labeled count row (per month, per title, per location).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountRow {
    #[serde(alias = "month", alias = "job_title", alias = "location")]
    pub label: String,
    pub count: u64,
}

/// Aggregate dashboard analytics, from `GET /analytics/dashboard/`.
///
/// Consumed read-only; rates arrive as strings and are passed through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardAnalytics {
    pub total_applications: u64,
    #[serde(default)]
    pub applications_this_month: u64,
    #[serde(default)]
    pub interview_rate: String,
    #[serde(default)]
    pub offer_rate: String,
    #[serde(default)]
    pub rejection_rate: String,
    #[serde(default)]
    pub by_status: Vec<StatusCount>,
    #[serde(default)]
    pub over_time: Vec<CountRow>,
    #[serde(default)]
    pub top_titles: Vec<CountRow>,
    #[serde(default)]
    pub top_locations: Vec<CountRow>,
}

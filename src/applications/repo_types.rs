use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::pipeline::{ApplicationStatus, Milestones, PipelineError};

/// Row as stored in `job_applications`; status is plain text.
#[derive(Debug, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub board_id: Uuid,
    pub company: String,
    pub job_title: String,
    pub location: String,
    pub url: Option<String>,
    pub salary: Option<String>,
    pub description: String,
    pub status: String,
    pub created_at: OffsetDateTime,
    pub applied_at: Option<OffsetDateTime>,
    pub interviewed_at: Option<OffsetDateTime>,
    pub offered_at: Option<OffsetDateTime>,
    pub rejected_at: Option<OffsetDateTime>,
}

/// One tracked job application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub id: Uuid,
    pub board_id: Uuid,
    pub company: String,
    pub job_title: String,
    pub location: String,
    pub url: Option<String>,
    pub salary: Option<String>,
    pub description: String,
    pub status: ApplicationStatus,
    pub created_at: OffsetDateTime,
    pub milestones: Milestones,
}

/// User-editable fields, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationFields {
    pub company: String,
    pub job_title: String,
    pub location: String,
    pub url: Option<String>,
    pub salary: Option<String>,
    pub description: String,
    pub status: ApplicationStatus,
}

impl Application {
    /// New application on `board_id`. A status other than wishlist stamps its
    /// milestone right away.
    pub fn create(board_id: Uuid, fields: ApplicationFields, now: OffsetDateTime) -> Self {
        let mut application = Self {
            id: Uuid::new_v4(),
            board_id,
            company: fields.company,
            job_title: fields.job_title,
            location: fields.location,
            url: fields.url,
            salary: fields.salary,
            description: fields.description,
            status: ApplicationStatus::Wishlist,
            created_at: now,
            milestones: Milestones::default(),
        };
        application.transition_to(fields.status, now);
        application
    }

    /// Full-field edit. Only a changed status goes through the pipeline.
    pub fn update(&mut self, fields: ApplicationFields, now: OffsetDateTime) {
        self.company = fields.company;
        self.job_title = fields.job_title;
        self.location = fields.location;
        self.url = fields.url;
        self.salary = fields.salary;
        self.description = fields.description;
        if fields.status != self.status {
            self.transition_to(fields.status, now);
        }
    }

    /// Parses `raw` and applies it. On error the application is left as is.
    pub fn apply_status(
        &mut self,
        raw: &str,
        now: OffsetDateTime,
    ) -> Result<ApplicationStatus, PipelineError> {
        let next: ApplicationStatus = raw.parse()?;
        self.transition_to(next, now);
        Ok(next)
    }

    pub fn transition_to(&mut self, next: ApplicationStatus, now: OffsetDateTime) {
        self.status = next;
        self.milestones.record(next, now);
    }

    pub fn last_activity_at(&self) -> OffsetDateTime {
        self.milestones
            .latest()
            .map_or(self.created_at, |latest| latest.max(self.created_at))
    }

    pub fn fields(&self) -> ApplicationFields {
        ApplicationFields {
            company: self.company.clone(),
            job_title: self.job_title.clone(),
            location: self.location.clone(),
            url: self.url.clone(),
            salary: self.salary.clone(),
            description: self.description.clone(),
            status: self.status,
        }
    }
}

impl TryFrom<ApplicationRow> for Application {
    type Error = PipelineError;

    fn try_from(r: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            board_id: r.board_id,
            company: r.company,
            job_title: r.job_title,
            location: r.location,
            url: r.url,
            salary: r.salary,
            description: r.description,
            status: r.status.parse()?,
            created_at: r.created_at,
            milestones: Milestones {
                applied_at: r.applied_at,
                interviewed_at: r.interviewed_at,
                offered_at: r.offered_at,
                rejected_at: r.rejected_at,
            },
        })
    }
}

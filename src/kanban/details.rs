//! Renders the details modal from the JSON record, on the client.

use serde::Serialize;
use thiserror::Error;
use time::{format_description::BorrowedFormatItem, macros::format_description, OffsetDateTime};

use crate::{
    kanban::protocol::{paths, ApplicationDetails},
    templates::{Templates, APPLICATION_DETAILS},
};

const DISPLAY_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Template(#[from] minijinja::Error),
    #[error(transparent)]
    Format(#[from] time::error::Format),
}

#[derive(Serialize)]
struct MilestoneLine {
    label: &'static str,
    at: String,
}

#[derive(Serialize)]
struct DetailsContext<'a> {
    id: String,
    company: &'a str,
    job_title: &'a str,
    location: &'a str,
    salary: Option<&'a str>,
    url: Option<&'a str>,
    status_label: &'static str,
    description_lines: Vec<&'a str>,
    created_at: String,
    milestones: Vec<MilestoneLine>,
    edit_path: String,
}

fn display(at: OffsetDateTime) -> Result<String, time::error::Format> {
    at.format(DISPLAY_FORMAT)
}

/// Optional fields and unset milestones are left out of the layout.
pub fn render(templates: &Templates, details: &ApplicationDetails) -> Result<String, RenderError> {
    let milestones = [
        ("Applied", details.applied_at),
        ("Interviewed", details.interviewed_at),
        ("Offered", details.offered_at),
        ("Rejected", details.rejected_at),
    ]
    .into_iter()
    .filter_map(|(label, at)| at.map(|at| (label, at)))
    .map(|(label, at)| display(at).map(|at| MilestoneLine { label, at }))
    .collect::<Result<Vec<_>, time::error::Format>>()?;

    let ctx = DetailsContext {
        id: details.id.to_string(),
        company: &details.company,
        job_title: &details.job_title,
        location: &details.location,
        salary: details.salary.as_deref().filter(|s| !s.is_empty()),
        url: details.url.as_deref().filter(|s| !s.is_empty()),
        status_label: details.status.label(),
        description_lines: details.description.lines().collect(),
        created_at: display(details.created_at)?,
        milestones,
        edit_path: paths::edit_application_modal(details.id),
    };
    Ok(templates.render(APPLICATION_DETAILS, &ctx)?)
}

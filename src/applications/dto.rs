use serde::{Deserialize, Serialize};

use crate::applications::repo_types::Application;

/// Form-encoded application create/edit submission. Every field is kept as
/// submitted so a rejected form can be re-rendered verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationForm {
    pub company: String,
    pub job_title: String,
    pub location: String,
    pub url: String,
    pub salary: String,
    pub description: String,
    pub status: String,
}

impl From<&Application> for ApplicationForm {
    fn from(a: &Application) -> Self {
        Self {
            company: a.company.clone(),
            job_title: a.job_title.clone(),
            location: a.location.clone(),
            url: a.url.clone().unwrap_or_default(),
            salary: a.salary.clone().unwrap_or_default(),
            description: a.description.clone(),
            status: a.status.as_str().to_string(),
        }
    }
}

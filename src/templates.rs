//! HTML fragments spliced into modals. Names end in `.html`, so minijinja
//! escapes every interpolated value.

use minijinja::Environment;
use serde::Serialize;

pub const BOARD_MODAL: &str = "board_modal.html";
pub const APPLICATION_MODAL: &str = "application_modal.html";
pub const APPLICATION_DETAILS: &str = "application_details.html";

const BOARD_MODAL_SRC: &str = r#"<div class="modal-header">
  <h5 class="modal-title">{{ title }}</h5>
  <button type="button" class="btn-close" data-bs-dismiss="modal"></button>
</div>
<form method="post" action="{{ action }}" novalidate>
  <div class="modal-body">
    <div class="mb-3">
      <label for="job_board_name" class="form-label">Board Name</label>
      <input type="text" id="job_board_name" name="name" value="{{ form.name }}"
             class="form-control{% if errors.name %} is-invalid{% endif %}" required>
      {% for message in errors.name|default([]) %}<div class="invalid-feedback d-block">{{ message }}</div>{% endfor %}
    </div>
    <div class="mb-3">
      <label for="job_board_description" class="form-label">Description</label>
      <textarea id="job_board_description" name="description" rows="3"
                class="form-control{% if errors.description %} is-invalid{% endif %}">{{ form.description }}</textarea>
      {% for message in errors.description|default([]) %}<div class="invalid-feedback d-block">{{ message }}</div>{% endfor %}
    </div>
  </div>
  <div class="modal-footer">
    {% if delete_action %}<button type="button" class="btn btn-outline-danger me-auto" data-delete-url="{{ delete_action }}">Delete</button>{% endif %}
    <button type="button" class="btn btn-secondary" data-bs-dismiss="modal">Cancel</button>
    <button type="submit" class="btn btn-primary">{{ submit_label }}</button>
  </div>
</form>
"#;

const APPLICATION_MODAL_SRC: &str = r#"{% macro text_field(name, label, value, placeholder, required, messages) %}
    <div class="mb-3">
      <label for="job_application_{{ name }}" class="form-label">{{ label }}</label>
      <input type="text" id="job_application_{{ name }}" name="{{ name }}" value="{{ value }}" placeholder="{{ placeholder }}"
             class="form-control{% if messages %} is-invalid{% endif %}"{% if required %} required{% endif %}>
      {% for message in messages %}<div class="invalid-feedback d-block">{{ message }}</div>{% endfor %}
    </div>
{% endmacro %}<div class="modal-header">
  <h5 class="modal-title">{{ title }}{% if board_name %} <small class="text-muted">{{ board_name }}</small>{% endif %}</h5>
  <button type="button" class="btn-close" data-bs-dismiss="modal"></button>
</div>
<form method="post" action="{{ action }}" novalidate>
  <div class="modal-body">
    {{ text_field("company", "Company Name", form.company, "e.g., Google, Microsoft, etc.", true, errors.company|default([])) }}
    {{ text_field("job_title", "Job Title", form.job_title, "e.g., Senior Software Engineer", true, errors.job_title|default([])) }}
    {{ text_field("location", "Location", form.location, "e.g., San Francisco, Remote, etc.", true, errors.location|default([])) }}
    {{ text_field("url", "Job Posting URL", form.url, "https://...", false, errors.url|default([])) }}
    {{ text_field("salary", "Salary Range", form.salary, "e.g., $120k - $150k", false, errors.salary|default([])) }}
    <div class="mb-3">
      <label for="job_application_description" class="form-label">Description / Notes</label>
      <textarea id="job_application_description" name="description" rows="4"
                placeholder="Key responsibilities, requirements, notes, etc."
                class="form-control{% if errors.description %} is-invalid{% endif %}">{{ form.description }}</textarea>
      {% for message in errors.description|default([]) %}<div class="invalid-feedback d-block">{{ message }}</div>{% endfor %}
    </div>
    <div class="mb-3">
      <label for="job_application_status" class="form-label">Status</label>
      <select id="job_application_status" name="status" class="form-select{% if errors.status %} is-invalid{% endif %}">
        {% for option in statuses %}<option value="{{ option.value }}"{% if option.value == form.status %} selected{% endif %}>{{ option.label }}</option>{% endfor %}
      </select>
      {% for message in errors.status|default([]) %}<div class="invalid-feedback d-block">{{ message }}</div>{% endfor %}
    </div>
  </div>
  <div class="modal-footer">
    {% if delete_action %}<button type="button" class="btn btn-outline-danger me-auto" data-delete-url="{{ delete_action }}">Delete</button>{% endif %}
    <button type="button" class="btn btn-secondary" data-bs-dismiss="modal">Cancel</button>
    <button type="submit" class="btn btn-primary">{{ submit_label }}</button>
  </div>
</form>
"#;

const APPLICATION_DETAILS_SRC: &str = r#"<div class="modal-header align-items-center">
  <h5 class="modal-title mb-0">Application Details</h5>
  <button type="button" class="btn-close" data-bs-dismiss="modal"></button>
</div>
<div class="modal-body">
  <div class="row g-3">
    <div class="col-12">
      <h4 class="fw-bold mb-1">{{ company }}</h4>
      <p class="text-muted h6">{{ job_title }}</p>
    </div>
    <div class="col-md-6">
      <label class="small text-muted d-block mb-1">Location</label>
      <div>{{ location }}</div>
    </div>
    {% if salary %}<div class="col-md-6">
      <label class="small text-muted d-block mb-1">Salary Range</label>
      <div class="text-success fw-semibold">{{ salary }}</div>
    </div>{% endif %}
    {% if url %}<div class="col-12">
      <label class="small text-muted d-block mb-1">Job Posting</label>
      <div><a href="{{ url }}" target="_blank" rel="noopener">{{ url }}</a></div>
    </div>{% endif %}
    <div class="col-12">
      <label class="small text-muted d-block mb-1">Status</label>
      <span class="badge bg-primary">{{ status_label }}</span>
    </div>
    <div class="col-12">
      <label class="small text-muted d-block mb-1">Description / Notes</label>
      <div class="border rounded p-3 bg-light">{% for line in description_lines %}{{ line }}{% if not loop.last %}<br>{% endif %}{% endfor %}</div>
    </div>
    <div class="col-12">
      <hr>
      <div class="small text-muted">
        <div class="mb-1"><strong>Created:</strong> {{ created_at }}</div>
        {% for milestone in milestones %}<div class="mb-1"><strong>{{ milestone.label }}:</strong> {{ milestone.at }}</div>{% endfor %}
      </div>
    </div>
  </div>
</div>
<div class="modal-footer">
  <button type="button" class="btn btn-secondary" data-bs-dismiss="modal">Close</button>
  <button type="button" class="btn btn-primary" data-application-id="{{ id }}" data-edit-url="{{ edit_path }}">Edit</button>
</div>
"#;

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(BOARD_MODAL, BOARD_MODAL_SRC)?;
        env.add_template(APPLICATION_MODAL, APPLICATION_MODAL_SRC)?;
        env.add_template(APPLICATION_DETAILS, APPLICATION_DETAILS_SRC)?;
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: &S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn built_in_templates_parse() {
        assert!(Templates::new().is_ok());
    }

    #[test]
    fn board_modal_escapes_values_and_shows_errors() {
        let templates = Templates::new().unwrap();
        let html = templates
            .render(
                BOARD_MODAL,
                &json!({
                    "title": "Create Job Board",
                    "action": "/api/v1/job-boards",
                    "submit_label": "Create",
                    "form": { "name": "<script>", "description": "" },
                    "errors": { "name": ["Board name is required."] },
                }),
            )
            .unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Board name is required."));
        assert!(html.contains("is-invalid"));
        assert!(!html.contains("data-delete-url"));
    }
}

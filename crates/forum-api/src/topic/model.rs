use forum_db::models::NewTopic;
use validator::Validate;

use crate::{form_fields::FormFields, form_state::FormErrors, validation::SLUG_REGEX};

/// Raw fields submitted by the new-topic form
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateTopicForm {
    /// Becomes the topic slug
    #[validate(
        required(message = "Expected string, received null"),
        length(min = 3, message = "String must contain at least 3 character(s)"),
        regex(
            path = *SLUG_REGEX,
            message = "Must be lowercase letters or dashes without spaces"
        )
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "Expected string, received null"),
        length(min = 10, message = "String must contain at least 10 character(s)")
    )]
    pub description: Option<String>,
}

impl From<FormFields> for CreateTopicForm {
    fn from(fields: FormFields) -> Self {
        Self {
            name: fields.get("name"),
            description: fields.get("description"),
        }
    }
}

impl CreateTopicForm {
    /// Check every field, reporting all violations at once
    pub fn parse(self) -> Result<NewTopic, FormErrors> {
        self.validate().map_err(|e| FormErrors::from(&e))?;

        Ok(NewTopic {
            slug: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
        })
    }
}

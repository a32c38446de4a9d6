use validator::Validate;

use crate::{form_fields::FormFields, form_state::FormErrors};

/// Raw fields submitted by the new-post form
#[derive(Debug, Clone, Default, Validate)]
pub struct CreatePostForm {
    #[validate(
        required(message = "Expected string, received null"),
        length(min = 3, message = "String must contain at least 3 character(s)")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "Expected string, received null"),
        length(min = 10, message = "String must contain at least 10 character(s)")
    )]
    pub content: Option<String>,
}

/// A post body that passed validation, not yet attached to a topic or author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInput {
    pub title: String,
    pub content: String,
}

impl From<FormFields> for CreatePostForm {
    fn from(fields: FormFields) -> Self {
        Self {
            title: fields.get("title"),
            content: fields.get("content"),
        }
    }
}

impl CreatePostForm {
    pub fn parse(self) -> Result<PostInput, FormErrors> {
        self.validate().map_err(|e| FormErrors::from(&e))?;

        Ok(PostInput {
            title: self.title.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
        })
    }
}

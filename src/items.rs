use crate::api::Backend;
use crate::error::{ApiError, ValidationError};
use crate::session::Session;
use crate::state::{Category, Item, ItemStatus};

/// Image picked in the post form, already read into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAttachment {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Post form as typed so far. Survives failed submissions untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDraft {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub location: String,
    pub contact_phone: String,
    pub image: Option<ImageAttachment>,
    /// A picked file whose bytes are still being read.
    pub image_loading: bool,
}

/// A draft that passed [`ItemDraft::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub location: String,
    pub contact_phone: String,
    pub image: ImageAttachment,
}

impl ItemDraft {
    pub fn validate(&self) -> Result<NewItem, ValidationError> {
        if self.image_loading {
            return Err(ValidationError::ImageLoading);
        }
        let Some(image) = self.image.clone() else {
            return Err(ValidationError::MissingImage);
        };
        let fields = [
            ("item title", &self.title),
            ("description", &self.description),
            ("location", &self.location),
            ("contact phone", &self.contact_phone),
        ];
        if let Some(&(name, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ValidationError::MissingField(name));
        }
        Ok(NewItem {
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category,
            location: self.location.clone(),
            contact_phone: self.contact_phone.clone(),
            image,
        })
    }
}

/// Validates locally, then posts the draft in one multipart request.
pub async fn submit_item<B: Backend>(
    backend: &B,
    session: &Session,
    draft: &ItemDraft,
) -> Result<Item, ApiError> {
    let item = draft.validate()?;
    let token = session.require_token()?;
    backend.create_item(&token, item).await
}

/// Asks for the opposite of `current` and returns the status requested.
pub async fn toggle_status<B: Backend>(
    backend: &B,
    session: &Session,
    item_id: &str,
    current: ItemStatus,
) -> Result<ItemStatus, ApiError> {
    let token = session.require_token()?;
    let next = current.toggled();
    backend.update_status(&token, item_id, next).await?;
    Ok(next)
}
